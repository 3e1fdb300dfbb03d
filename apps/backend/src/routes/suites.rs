//! Test suite endpoints. Mutation requires TESTER or above.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::db::txn::with_txn;
use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos;
use crate::routes::double_option;
use crate::routes::projects::project_not_found;
use crate::services::validation;
use crate::state::app_state::AppState;

pub(crate) fn suite_not_found() -> AppError {
    AppError::not_found(ErrorCode::SuiteNotFound, "Test suite not found")
}

/// GET /api/v1/projects/{project_id}/suites
async fn list(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let project_id = path.into_inner();

    let suites = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, project_id)
                .await?
                .ok_or_else(project_not_found)?;
            repos::suites::list_suites(txn, project.id).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(suites))
}

#[derive(Debug, Deserialize)]
struct CreateSuiteInput {
    name: String,
    description: Option<String>,
}

/// POST /api/v1/projects/{project_id}/suites
async fn create(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<CreateSuiteInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let project_id = path.into_inner();
    let input = body.into_inner();
    validation::require_non_empty("name", &input.name)?;

    let suite = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, project_id)
                .await?
                .ok_or_else(project_not_found)?;
            repos::suites::create_suite(txn, project.id, &input.name, input.description).await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(suite))
}

/// GET /api/v1/suites/{id}
async fn get(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let suite = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { repos::suites::find_suite_in_org(txn, org_id, id).await })
    })
    .await?
    .ok_or_else(suite_not_found)?;

    Ok(HttpResponse::Ok().json(suite))
}

#[derive(Debug, Deserialize)]
struct PatchSuiteInput {
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
}

/// PATCH /api/v1/suites/{id}
async fn patch(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<PatchSuiteInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let id = path.into_inner();
    let input = body.into_inner();

    if let Some(name) = &input.name {
        validation::require_non_empty("name", name)?;
    }

    let suite = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let suite = repos::suites::find_suite_in_org(txn, org_id, id)
                .await?
                .ok_or_else(suite_not_found)?;
            repos::suites::update_suite(txn, suite, input.name, input.description).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(suite))
}

/// DELETE /api/v1/suites/{id}
async fn delete(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let id = path.into_inner();

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let suite = repos::suites::find_suite_in_org(txn, org_id, id)
                .await?
                .ok_or_else(suite_not_found)?;
            repos::suites::soft_delete_suite(txn, suite).await
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects/{project_id}/suites")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    );
    cfg.service(
        web::resource("/suites/{id}")
            .route(web::get().to(get))
            .route(web::patch().to(patch))
            .route(web::delete().to(delete)),
    );
}
