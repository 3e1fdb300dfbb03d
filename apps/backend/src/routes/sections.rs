//! Section endpoints. Sections are hard-deleted; removing one cascades
//! to the cases underneath it.

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
use crate::routes::suites::suite_not_found;
use crate::services::validation;
use crate::state::app_state::AppState;

pub(crate) fn section_not_found() -> AppError {
    AppError::not_found(ErrorCode::SectionNotFound, "Section not found")
}

/// GET /api/v1/suites/{suite_id}/sections
async fn list(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let suite_id = path.into_inner();

    let sections = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let suite = repos::suites::find_suite_in_org(txn, org_id, suite_id)
                .await?
                .ok_or_else(suite_not_found)?;
            repos::suites::list_sections(txn, suite.id).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(sections))
}

fn default_position() -> i32 {
    0
}

#[derive(Debug, Deserialize)]
struct CreateSectionInput {
    name: String,
    parent_id: Option<i64>,
    #[serde(default = "default_position")]
    position: i32,
}

/// POST /api/v1/suites/{suite_id}/sections
async fn create(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<CreateSectionInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let suite_id = path.into_inner();
    let input = body.into_inner();
    validation::require_non_empty("name", &input.name)?;

    let section = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let suite = repos::suites::find_suite_in_org(txn, org_id, suite_id)
                .await?
                .ok_or_else(suite_not_found)?;

            // A parent must live in the same suite
            if let Some(parent_id) = input.parent_id {
                let parent = repos::suites::find_section_in_org(txn, org_id, parent_id)
                    .await?
                    .ok_or_else(section_not_found)?;
                if parent.suite_id != suite.id {
                    return Err(section_not_found());
                }
            }

            repos::suites::create_section(txn, suite.id, input.parent_id, &input.name, input.position)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(section))
}

/// GET /api/v1/sections/{id}
async fn get(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let section = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { repos::suites::find_section_in_org(txn, org_id, id).await })
    })
    .await?
    .ok_or_else(section_not_found)?;

    Ok(HttpResponse::Ok().json(section))
}

#[derive(Debug, Deserialize)]
struct PatchSectionInput {
    name: Option<String>,
    position: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    parent_id: Option<Option<i64>>,
}

/// PATCH /api/v1/sections/{id}
async fn patch(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<PatchSectionInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let id = path.into_inner();
    let input = body.into_inner();

    if let Some(name) = &input.name {
        validation::require_non_empty("name", name)?;
    }

    let section = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let section = repos::suites::find_section_in_org(txn, org_id, id)
                .await?
                .ok_or_else(section_not_found)?;

            if let Some(Some(parent_id)) = input.parent_id {
                if parent_id == section.id {
                    return Err(AppError::invalid(
                        ErrorCode::ValidationError,
                        "A section cannot be its own parent",
                    ));
                }
                let parent = repos::suites::find_section_in_org(txn, org_id, parent_id)
                    .await?
                    .ok_or_else(section_not_found)?;
                if parent.suite_id != section.suite_id {
                    return Err(section_not_found());
                }
            }

            repos::suites::update_section(txn, section, input.name, input.position, input.parent_id)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(section))
}

/// DELETE /api/v1/sections/{id}
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
            let section = repos::suites::find_section_in_org(txn, org_id, id)
                .await?
                .ok_or_else(section_not_found)?;
            repos::suites::delete_section(txn, section).await
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/suites/{suite_id}/sections")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    );
    cfg.service(
        web::resource("/sections/{id}")
            .route(web::get().to(get))
            .route(web::patch().to(patch))
            .route(web::delete().to(delete)),
    );
}
