//! AI generation endpoints. The backend forwards these to the upstream
//! AI service; when none is configured the endpoints answer 503.

use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::services::ai::{AiClient, BddGenerationRequest, TestGenerationRequest};
use crate::state::app_state::AppState;

fn ai_client(app_state: &AppState) -> Result<&AiClient, AppError> {
    app_state.ai.as_ref().ok_or(AppError::UpstreamUnavailable {
        code: ErrorCode::AiUnavailable,
        detail: "AI generation is not configured".to_string(),
    })
}

/// POST /api/v1/ai/generate/tests
async fn generate_tests(
    _current_user: CurrentUser,
    body: ValidatedJson<TestGenerationRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let client = ai_client(&app_state)?;
    let response = client.generate_tests(&body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/v1/ai/generate/bdd
async fn generate_bdd(
    _current_user: CurrentUser,
    body: ValidatedJson<BddGenerationRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let client = ai_client(&app_state)?;
    let response = client.generate_bdd(&body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ai/generate/tests").route(web::post().to(generate_tests)));
    cfg.service(web::resource("/ai/generate/bdd").route(web::post().to(generate_bdd)));
}
