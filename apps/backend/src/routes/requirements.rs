//! Requirement endpoints, coverage links and the coverage statistic.

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
use crate::services;
use crate::services::validation;
use crate::state::app_state::AppState;

fn requirement_not_found() -> AppError {
    AppError::not_found(ErrorCode::RequirementNotFound, "Requirement not found")
}

/// GET /api/v1/projects/{project_id}/requirements
async fn list(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let project_id = path.into_inner();

    let requirements = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, project_id)
                .await?
                .ok_or_else(project_not_found)?;
            repos::requirements::list_by_project(txn, project.id).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(requirements))
}

#[derive(Debug, Deserialize)]
struct CreateRequirementInput {
    external_key: String,
    title: String,
    description: Option<String>,
}

/// POST /api/v1/projects/{project_id}/requirements
async fn create(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<CreateRequirementInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let project_id = path.into_inner();
    let input = body.into_inner();

    validation::require_non_empty("external_key", &input.external_key)?;
    validation::require_non_empty("title", &input.title)?;

    let requirement = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, project_id)
                .await?
                .ok_or_else(project_not_found)?;
            repos::requirements::create(
                txn,
                project.id,
                &input.external_key,
                &input.title,
                input.description,
            )
            .await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(requirement))
}

/// GET /api/v1/requirements/{id}
async fn get(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let requirement = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { repos::requirements::find_in_org(txn, org_id, id).await })
    })
    .await?
    .ok_or_else(requirement_not_found)?;

    Ok(HttpResponse::Ok().json(requirement))
}

#[derive(Debug, Deserialize)]
struct PatchRequirementInput {
    title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
}

/// PATCH /api/v1/requirements/{id}
async fn patch(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<PatchRequirementInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let id = path.into_inner();
    let input = body.into_inner();

    if let Some(title) = &input.title {
        validation::require_non_empty("title", title)?;
    }

    let requirement = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let requirement = repos::requirements::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(requirement_not_found)?;
            repos::requirements::update(txn, requirement, input.title, input.description).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(requirement))
}

/// DELETE /api/v1/requirements/{id}
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
            let requirement = repos::requirements::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(requirement_not_found)?;
            repos::requirements::soft_delete(txn, requirement).await
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/v1/requirements/{id}/coverage/{case_id}
async fn link_case(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<(i64, i64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let (requirement_id, case_id) = path.into_inner();

    let link = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let requirement = repos::requirements::find_in_org(txn, org_id, requirement_id)
                .await?
                .ok_or_else(requirement_not_found)?;
            services::requirements::link_case(txn, org_id, &requirement, case_id).await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(link))
}

/// DELETE /api/v1/requirements/{id}/coverage/{case_id}
async fn unlink_case(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<(i64, i64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let (requirement_id, case_id) = path.into_inner();

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let requirement = repos::requirements::find_in_org(txn, org_id, requirement_id)
                .await?
                .ok_or_else(requirement_not_found)?;
            services::requirements::unlink_case(txn, requirement.id, case_id).await
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/projects/{project_id}/requirements/coverage/stats
async fn coverage_stats(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let project_id = path.into_inner();

    let stats = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, project_id)
                .await?
                .ok_or_else(project_not_found)?;
            services::requirements::coverage_stats(txn, project.id).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(stats))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects/{project_id}/requirements")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    );
    // Registered before /requirements/{id} so "coverage" never parses as
    // an id.
    cfg.service(
        web::resource("/projects/{project_id}/requirements/coverage/stats")
            .route(web::get().to(coverage_stats)),
    );
    cfg.service(
        web::resource("/requirements/{id}")
            .route(web::get().to(get))
            .route(web::patch().to(patch))
            .route(web::delete().to(delete)),
    );
    cfg.service(
        web::resource("/requirements/{id}/coverage/{case_id}")
            .route(web::post().to(link_case))
            .route(web::delete().to(unlink_case)),
    );
}
