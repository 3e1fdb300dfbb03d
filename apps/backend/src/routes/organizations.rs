//! Organization endpoints. A caller only ever sees their own
//! organization; mutation requires the ADMIN role.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::db::txn::with_txn;
use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos;
use crate::services::validation;
use crate::state::app_state::AppState;

/// GET /api/v1/organizations
///
/// Multi-tenancy boundary: the list only ever contains the caller's
/// organization.
async fn list(
    http_req: HttpRequest,
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let org = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { repos::organizations::find_by_id(txn, org_id).await })
    })
    .await?;

    let orgs: Vec<_> = org.into_iter().collect();
    Ok(HttpResponse::Ok().json(orgs))
}

/// GET /api/v1/organizations/{id}
async fn get(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if id != current_user.org_id() {
        return Err(org_not_found());
    }

    let org = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { repos::organizations::find_by_id(txn, id).await })
    })
    .await?
    .ok_or_else(org_not_found)?;

    Ok(HttpResponse::Ok().json(org))
}

#[derive(Debug, Deserialize)]
struct OrganizationPatch {
    name: Option<String>,
    slug: Option<String>,
}

/// PATCH /api/v1/organizations/{id}
async fn patch(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<OrganizationPatch>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Admin)?;
    let id = path.into_inner();
    if id != current_user.org_id() {
        return Err(org_not_found());
    }

    let input = body.into_inner();
    if let Some(name) = &input.name {
        validation::require_non_empty("name", name)?;
    }
    if let Some(slug) = &input.slug {
        validation::validate_slug(slug)?;
    }

    let org = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let org = repos::organizations::find_by_id(txn, id)
                .await?
                .ok_or_else(org_not_found)?;
            repos::organizations::update(txn, org, input.name, input.slug).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(org))
}

/// DELETE /api/v1/organizations/{id}
async fn delete(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Admin)?;
    let id = path.into_inner();
    if id != current_user.org_id() {
        return Err(org_not_found());
    }

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let org = repos::organizations::find_by_id(txn, id)
                .await?
                .ok_or_else(org_not_found)?;
            repos::organizations::soft_delete(txn, org).await
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

fn org_not_found() -> AppError {
    AppError::not_found(ErrorCode::OrganizationNotFound, "Organization not found")
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/organizations").route(web::get().to(list)));
    cfg.service(
        web::resource("/organizations/{id}")
            .route(web::get().to(get))
            .route(web::patch().to(patch))
            .route(web::delete().to(delete)),
    );
}
