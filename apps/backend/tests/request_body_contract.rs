//! Malformed request bodies come back as Problem Details, not as
//! actix's default error body.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend::error::AppError;
use backend::extractors::validated_json::ValidatedJson;
use backend::middleware::request_trace::RequestTrace;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct EchoInput {
    name: String,
}

async fn echo(body: ValidatedJson<EchoInput>) -> Result<web::Json<String>, AppError> {
    Ok(web::Json(body.into_inner().name))
}

fn echo_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(RequestTrace)
        .route("/echo", web::post().to(echo))
}

#[actix_web::test]
async fn syntactically_invalid_json_is_400() {
    let app = test::init_service(echo_app()).await;

    let req = test::TestRequest::post()
        .uri("/echo")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"name": }"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        Some("Invalid JSON"),
    )
    .await;
}

#[actix_web::test]
async fn wrong_field_types_are_400_without_echoing_content() {
    let app = test::init_service(echo_app()).await;

    let req = test::TestRequest::post()
        .uri("/echo")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"name": 42}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body = test::read_body(resp).await;
    let problem: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(problem["code"], "BAD_REQUEST");
    assert_eq!(problem["status"], 400);
    // The offending value must not be echoed back
    assert!(!problem["detail"].as_str().unwrap().contains("42"));
}

#[actix_web::test]
async fn valid_body_passes_through() {
    let app = test::init_service(echo_app()).await;

    let req = test::TestRequest::post()
        .uri("/echo")
        .set_json(serde_json::json!({"name": "smoke"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: String = test::read_body_json(resp).await;
    assert_eq!(body, "smoke");
}
