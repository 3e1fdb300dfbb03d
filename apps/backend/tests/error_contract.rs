//! The stable error contract: RFC 7807 bodies, machine-readable codes,
//! and trace id parity between the body and response headers.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend::error::AppError;
use backend::errors::ErrorCode;
use backend::middleware::request_trace::RequestTrace;
use backend_test_support::problem_details::assert_problem_details_from_service_response;

async fn not_found_handler() -> Result<web::Json<()>, AppError> {
    Err(AppError::not_found(
        ErrorCode::CaseNotFound,
        "Test case not found",
    ))
}

async fn conflict_handler() -> Result<web::Json<()>, AppError> {
    Err(AppError::conflict(
        ErrorCode::RunCompleted,
        "Results cannot be recorded on a completed run",
    ))
}

#[actix_web::test]
async fn not_found_renders_problem_details() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/boom", web::get().to(not_found_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/boom").to_request();
    let resp = test::call_service(&app, req).await;

    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_eq!(content_type, "application/problem+json");

    assert_problem_details_from_service_response(
        resp,
        "CASE_NOT_FOUND",
        StatusCode::NOT_FOUND,
        Some("Test case not found"),
    )
    .await;
}

#[actix_web::test]
async fn conflict_renders_problem_details() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/conflict", web::get().to(conflict_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/conflict").to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "RUN_COMPLETED",
        StatusCode::CONFLICT,
        Some("completed run"),
    )
    .await;
}

#[actix_web::test]
async fn trace_id_matches_request_id_header() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/boom", web::get().to(not_found_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/boom").to_request();
    let resp = test::call_service(&app, req).await;

    let headers = resp.headers().clone();
    let request_id = headers
        .get("x-request-id")
        .expect("x-request-id header present")
        .to_str()
        .unwrap()
        .to_string();
    let trace_id = headers
        .get("x-trace-id")
        .expect("x-trace-id header present")
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(request_id, trace_id);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["trace_id"], trace_id.as_str());
}
