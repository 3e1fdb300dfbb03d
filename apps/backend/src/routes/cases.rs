//! Test case endpoints. Updates snapshot the prior state into the
//! version history before applying the patch.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::db::txn::with_txn;
use crate::entities::test_cases::CasePriority;
use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos;
use crate::repos::cases::{CasePatch, NewCase};
use crate::routes::double_option;
use crate::routes::sections::section_not_found;
use crate::services;
use crate::state::app_state::AppState;

pub(crate) fn case_not_found() -> AppError {
    AppError::not_found(ErrorCode::CaseNotFound, "Test case not found")
}

/// GET /api/v1/sections/{section_id}/cases
async fn list(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let section_id = path.into_inner();

    let cases = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let section = repos::suites::find_section_in_org(txn, org_id, section_id)
                .await?
                .ok_or_else(section_not_found)?;
            repos::cases::list_by_section(txn, section.id).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(cases))
}

fn default_priority() -> CasePriority {
    CasePriority::Medium
}

#[derive(Debug, Deserialize)]
struct CreateCaseInput {
    title: String,
    preconditions: Option<String>,
    steps: serde_json::Value,
    expected_result: String,
    #[serde(default = "default_priority")]
    priority: CasePriority,
}

/// POST /api/v1/sections/{section_id}/cases
async fn create(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<CreateCaseInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let user_id = current_user.user_id()?;
    let section_id = path.into_inner();
    let input = body.into_inner();

    let case = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let section = repos::suites::find_section_in_org(txn, org_id, section_id)
                .await?
                .ok_or_else(section_not_found)?;
            services::cases::create(
                txn,
                NewCase {
                    section_id: section.id,
                    title: input.title,
                    preconditions: input.preconditions,
                    steps: input.steps,
                    expected_result: input.expected_result,
                    priority: input.priority,
                    created_by: Some(user_id),
                },
            )
            .await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(case))
}

/// GET /api/v1/cases/{id}
async fn get(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let case = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { repos::cases::find_in_org(txn, org_id, id).await })
    })
    .await?
    .ok_or_else(case_not_found)?;

    Ok(HttpResponse::Ok().json(case))
}

#[derive(Debug, Deserialize)]
struct PatchCaseInput {
    title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    preconditions: Option<Option<String>>,
    steps: Option<serde_json::Value>,
    expected_result: Option<String>,
    priority: Option<CasePriority>,
}

/// PATCH /api/v1/cases/{id}
///
/// A non-empty patch snapshots the previous revision and bumps the
/// case's version.
async fn patch(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<PatchCaseInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let id = path.into_inner();
    let input = body.into_inner();

    let case = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let case = repos::cases::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(case_not_found)?;
            services::cases::update(
                txn,
                case,
                CasePatch {
                    title: input.title,
                    preconditions: input.preconditions,
                    steps: input.steps,
                    expected_result: input.expected_result,
                    priority: input.priority,
                },
            )
            .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(case))
}

/// DELETE /api/v1/cases/{id}
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
            let case = repos::cases::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(case_not_found)?;
            repos::cases::soft_delete(txn, case).await
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/cases/{id}/versions
async fn versions(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let versions = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let case = repos::cases::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(case_not_found)?;
            repos::cases::list_versions(txn, case.id).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(versions))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/sections/{section_id}/cases")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    );
    cfg.service(
        web::resource("/cases/{id}")
            .route(web::get().to(get))
            .route(web::patch().to(patch))
            .route(web::delete().to(delete)),
    );
    cfg.service(web::resource("/cases/{id}/versions").route(web::get().to(versions)));
}
