//! Project endpoints. Creation and deletion require MANAGER or above.

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
use crate::services::validation;
use crate::state::app_state::AppState;

pub(crate) fn project_not_found() -> AppError {
    AppError::not_found(ErrorCode::ProjectNotFound, "Project not found")
}

/// GET /api/v1/projects
async fn list(
    http_req: HttpRequest,
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let projects = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { repos::projects::list_in_org(txn, org_id).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[derive(Debug, Deserialize)]
struct CreateProjectInput {
    name: String,
    key: String,
    description: Option<String>,
}

/// POST /api/v1/projects
async fn create(
    http_req: HttpRequest,
    current_user: CurrentUser,
    body: ValidatedJson<CreateProjectInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Manager)?;
    let org_id = current_user.org_id();
    let input = body.into_inner();

    validation::require_non_empty("name", &input.name)?;
    validation::validate_project_key(&input.key)?;

    let project = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            repos::projects::create(txn, org_id, &input.name, &input.key, input.description).await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(project))
}

/// GET /api/v1/projects/{id}
async fn get(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let project = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { repos::projects::find_in_org(txn, org_id, id).await })
    })
    .await?
    .ok_or_else(project_not_found)?;

    Ok(HttpResponse::Ok().json(project))
}

#[derive(Debug, Deserialize)]
struct PatchProjectInput {
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
}

/// PATCH /api/v1/projects/{id}
async fn patch(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<PatchProjectInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Manager)?;
    let org_id = current_user.org_id();
    let id = path.into_inner();
    let input = body.into_inner();

    if let Some(name) = &input.name {
        validation::require_non_empty("name", name)?;
    }

    let project = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(project_not_found)?;
            repos::projects::update(txn, project, input.name, input.description).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(project))
}

/// DELETE /api/v1/projects/{id}
async fn delete(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Manager)?;
    let org_id = current_user.org_id();
    let id = path.into_inner();

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(project_not_found)?;
            repos::projects::soft_delete(txn, project).await
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    );
    cfg.service(
        web::resource("/projects/{id}")
            .route(web::get().to(get))
            .route(web::patch().to(patch))
            .route(web::delete().to(delete)),
    );
}
