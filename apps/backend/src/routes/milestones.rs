//! Milestone endpoints. Mutation requires MANAGER or above.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use time::Date;

use crate::db::txn::with_txn;
use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos;
use crate::repos::milestones::MilestonePatch;
use crate::routes::double_option;
use crate::routes::projects::project_not_found;
use crate::services::validation;
use crate::state::app_state::AppState;

fn milestone_not_found() -> AppError {
    AppError::not_found(ErrorCode::MilestoneNotFound, "Milestone not found")
}

/// GET /api/v1/projects/{project_id}/milestones
async fn list(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let project_id = path.into_inner();

    let milestones = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, project_id)
                .await?
                .ok_or_else(project_not_found)?;
            repos::milestones::list_by_project(txn, project.id).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(milestones))
}

#[derive(Debug, Deserialize)]
struct CreateMilestoneInput {
    name: String,
    description: Option<String>,
    due_date: Option<Date>,
}

/// POST /api/v1/projects/{project_id}/milestones
async fn create(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<CreateMilestoneInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Manager)?;
    let org_id = current_user.org_id();
    let project_id = path.into_inner();
    let input = body.into_inner();
    validation::require_non_empty("name", &input.name)?;

    let milestone = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, project_id)
                .await?
                .ok_or_else(project_not_found)?;
            repos::milestones::create(txn, project.id, &input.name, input.description, input.due_date)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(milestone))
}

/// GET /api/v1/milestones/{id}
async fn get(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let milestone = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { repos::milestones::find_in_org(txn, org_id, id).await })
    })
    .await?
    .ok_or_else(milestone_not_found)?;

    Ok(HttpResponse::Ok().json(milestone))
}

#[derive(Debug, Deserialize)]
struct PatchMilestoneInput {
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    due_date: Option<Option<Date>>,
    completed: Option<bool>,
}

/// PATCH /api/v1/milestones/{id}
async fn patch(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<PatchMilestoneInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Manager)?;
    let org_id = current_user.org_id();
    let id = path.into_inner();
    let input = body.into_inner();

    if let Some(name) = &input.name {
        validation::require_non_empty("name", name)?;
    }

    let milestone = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let milestone = repos::milestones::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(milestone_not_found)?;
            repos::milestones::update(
                txn,
                milestone,
                MilestonePatch {
                    name: input.name,
                    description: input.description,
                    due_date: input.due_date,
                    completed: input.completed,
                },
            )
            .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(milestone))
}

/// DELETE /api/v1/milestones/{id}
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
            let milestone = repos::milestones::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(milestone_not_found)?;
            repos::milestones::soft_delete(txn, milestone).await
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects/{project_id}/milestones")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    );
    cfg.service(
        web::resource("/milestones/{id}")
            .route(web::get().to(get))
            .route(web::patch().to(patch))
            .route(web::delete().to(delete)),
    );
}
