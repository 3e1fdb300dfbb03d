//! The Bearer-token guard on the protected scope: middleware
//! rejections, token-kind confusion, and the role gate.

mod common;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend::entities::users::UserRole;
use backend::error::AppError;
use backend::extractors::current_user::CurrentUser;
use backend::middleware::jwt_extract::JwtExtract;
use backend::middleware::request_trace::RequestTrace;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::json;

use common::{mint_tokens, state_without_db};

async fn whoami(current_user: CurrentUser) -> Result<web::Json<serde_json::Value>, AppError> {
    Ok(web::Json(json!({
        "user_id": current_user.user_id()?,
        "org_id": current_user.org_id(),
        "role": current_user.role(),
    })))
}

async fn admin_only(current_user: CurrentUser) -> Result<web::Json<serde_json::Value>, AppError> {
    current_user.require(UserRole::Admin)?;
    Ok(web::Json(json!({"ok": true})))
}

async fn guarded_app(
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state_without_db()))
            .service(
                web::scope("/api/v1")
                    .wrap(JwtExtract)
                    .route("/whoami", web::get().to(whoami))
                    .route("/admin-only", web::get().to(admin_only)),
            ),
    )
    .await
}

async fn capture_middleware_error<S>(app: &S, req: Request) -> (StatusCode, String)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let err = app.call(req).await.expect_err("expected middleware rejection");
    (err.as_response_error().status_code(), err.to_string())
}

#[actix_web::test]
async fn valid_access_token_passes() {
    let app = guarded_app().await;
    let tokens = mint_tokens(42, 7, UserRole::Tester);

    let req = test::TestRequest::get()
        .uri("/api/v1/whoami")
        .insert_header(("Authorization", format!("Bearer {}", tokens.access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], 42);
    assert_eq!(body["org_id"], 7);
    assert_eq!(body["role"], "TESTER");
}

#[actix_web::test]
async fn missing_header_is_rejected() {
    let app = guarded_app().await;

    let req = test::TestRequest::get().uri("/api/v1/whoami").to_request();
    let (status, detail) = capture_middleware_error(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(detail.contains("Bearer"));
}

#[actix_web::test]
async fn malformed_scheme_is_rejected() {
    let app = guarded_app().await;

    let req = test::TestRequest::get()
        .uri("/api/v1/whoami")
        .insert_header(("Authorization", "Token abc"))
        .to_request();
    let (status, _) = capture_middleware_error(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn garbage_token_is_rejected() {
    let app = guarded_app().await;

    let req = test::TestRequest::get()
        .uri("/api/v1/whoami")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let (status, detail) = capture_middleware_error(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(detail.contains("Invalid JWT"));
}

#[actix_web::test]
async fn refresh_token_cannot_reach_protected_routes() {
    let app = guarded_app().await;
    let tokens = mint_tokens(42, 7, UserRole::Admin);

    let req = test::TestRequest::get()
        .uri("/api/v1/whoami")
        .insert_header(("Authorization", format!("Bearer {}", tokens.refresh_token)))
        .to_request();
    let (status, detail) = capture_middleware_error(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(detail.contains("token kind"));
}

#[actix_web::test]
async fn role_gate_forbids_lower_roles() {
    let app = guarded_app().await;
    let tokens = mint_tokens(42, 7, UserRole::Tester);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin-only")
        .insert_header(("Authorization", format!("Bearer {}", tokens.access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "FORBIDDEN",
        StatusCode::FORBIDDEN,
        Some("Insufficient role"),
    )
    .await;
}

#[actix_web::test]
async fn role_gate_admits_sufficient_roles() {
    let app = guarded_app().await;
    let tokens = mint_tokens(1, 1, UserRole::Admin);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin-only")
        .insert_header(("Authorization", format!("Bearer {}", tokens.access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}
