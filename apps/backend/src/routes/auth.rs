//! Registration, login, refresh, and the current-user endpoint.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::TokenPair;
use crate::db::txn::with_txn;
use crate::entities::users;
use crate::error::AppError;
use crate::extractors::validated_json::ValidatedJson;
use crate::services::auth as auth_service;
use crate::services::auth::RegisterInput;
use crate::state::app_state::AppState;

#[derive(Serialize)]
struct AuthResponse {
    user: users::Model,
    access_token: String,
    refresh_token: String,
}

impl AuthResponse {
    fn new(user: users::Model, tokens: TokenPair) -> Self {
        Self {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// POST /api/v1/auth/register
async fn register(
    http_req: HttpRequest,
    body: ValidatedJson<RegisterInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    let security = app_state.security.clone();

    let (user, tokens) = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { auth_service::register(txn, &security, input).await })
    })
    .await?;

    Ok(HttpResponse::Created().json(AuthResponse::new(user, tokens)))
}

#[derive(Debug, Deserialize)]
struct LoginInput {
    email: String,
    password: String,
}

/// POST /api/v1/auth/login
async fn login(
    http_req: HttpRequest,
    body: ValidatedJson<LoginInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    let security = app_state.security.clone();

    let (user, tokens) = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(
            async move { auth_service::login(txn, &security, &input.email, &input.password).await },
        )
    })
    .await?;

    Ok(HttpResponse::Ok().json(AuthResponse::new(user, tokens)))
}

#[derive(Debug, Deserialize)]
struct RefreshInput {
    refresh_token: String,
}

/// POST /api/v1/auth/refresh
async fn refresh(
    body: ValidatedJson<RefreshInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let tokens = auth_service::refresh(&app_state.security, &body.refresh_token)?;
    Ok(HttpResponse::Ok().json(tokens))
}

/// GET /api/v1/auth/me
///
/// Unlike the rest of the auth scope this requires a valid access
/// token; it is registered here so all auth endpoints share a prefix,
/// with the token verified explicitly.
async fn me(
    http_req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = http_req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
        .ok_or_else(AppError::unauthorized_missing_bearer)?;
    let claims = crate::auth::jwt::verify_access_token(&token, &app_state.security)?;

    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { auth_service::current_user(txn, &claims).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(user))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)));
    cfg.service(web::resource("/login").route(web::post().to(login)));
    cfg.service(web::resource("/refresh").route(web::post().to(refresh)));
    cfg.service(web::resource("/me").route(web::get().to(me)));
}
