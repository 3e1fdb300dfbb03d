//! Test plan endpoints. Mutation requires TESTER or above.

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

fn plan_not_found() -> AppError {
    AppError::not_found(ErrorCode::PlanNotFound, "Test plan not found")
}

/// GET /api/v1/projects/{project_id}/plans
async fn list(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let project_id = path.into_inner();

    let plans = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, project_id)
                .await?
                .ok_or_else(project_not_found)?;
            repos::plans::list_by_project(txn, project.id).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(plans))
}

#[derive(Debug, Deserialize)]
struct CreatePlanInput {
    name: String,
    description: Option<String>,
}

/// POST /api/v1/projects/{project_id}/plans
async fn create(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<CreatePlanInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let project_id = path.into_inner();
    let input = body.into_inner();
    validation::require_non_empty("name", &input.name)?;

    let plan = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, project_id)
                .await?
                .ok_or_else(project_not_found)?;
            repos::plans::create(txn, project.id, &input.name, input.description).await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(plan))
}

/// GET /api/v1/plans/{id}
async fn get(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let plan = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { repos::plans::find_in_org(txn, org_id, id).await })
    })
    .await?
    .ok_or_else(plan_not_found)?;

    Ok(HttpResponse::Ok().json(plan))
}

#[derive(Debug, Deserialize)]
struct PatchPlanInput {
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
}

/// PATCH /api/v1/plans/{id}
async fn patch(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<PatchPlanInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let id = path.into_inner();
    let input = body.into_inner();

    if let Some(name) = &input.name {
        validation::require_non_empty("name", name)?;
    }

    let plan = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let plan = repos::plans::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(plan_not_found)?;
            repos::plans::update(txn, plan, input.name, input.description).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(plan))
}

/// DELETE /api/v1/plans/{id}
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
            let plan = repos::plans::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(plan_not_found)?;
            repos::plans::soft_delete(txn, plan).await
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects/{project_id}/plans")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    );
    cfg.service(
        web::resource("/plans/{id}")
            .route(web::get().to(get))
            .route(web::patch().to(patch))
            .route(web::delete().to(delete)),
    );
}
