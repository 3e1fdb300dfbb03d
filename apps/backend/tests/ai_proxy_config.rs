//! AI endpoints answer 503 when no upstream service is configured.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend::entities::users::UserRole;
use backend::middleware::jwt_extract::JwtExtract;
use backend::middleware::request_trace::RequestTrace;
use backend::routes;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::json;

use common::{mint_tokens, state_without_db};

#[actix_web::test]
async fn generate_tests_unconfigured_is_503() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state_without_db()))
            .service(
                web::scope("/api/v1")
                    .wrap(JwtExtract)
                    .configure(routes::ai::configure_routes),
            ),
    )
    .await;
    let tokens = mint_tokens(1, 1, UserRole::Tester);

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/generate/tests")
        .insert_header(("Authorization", format!("Bearer {}", tokens.access_token)))
        .set_json(json!({"description": "Login form validation"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "AI_UNAVAILABLE",
        StatusCode::SERVICE_UNAVAILABLE,
        Some("not configured"),
    )
    .await;
}

#[actix_web::test]
async fn generate_bdd_unconfigured_is_503() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state_without_db()))
            .service(
                web::scope("/api/v1")
                    .wrap(JwtExtract)
                    .configure(routes::ai::configure_routes),
            ),
    )
    .await;
    let tokens = mint_tokens(1, 1, UserRole::Viewer);

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/generate/bdd")
        .insert_header(("Authorization", format!("Bearer {}", tokens.access_token)))
        .set_json(json!({"feature_description": "Password reset flow"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "AI_UNAVAILABLE",
        StatusCode::SERVICE_UNAVAILABLE,
        Some("not configured"),
    )
    .await;
}
