//! User management within the caller's organization. Mutation requires
//! ADMIN.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::auth::password::hash_password;
use crate::db::txn::with_txn;
use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos;
use crate::repos::users::UserPatch;
use crate::services::validation;
use crate::state::app_state::AppState;

/// GET /api/v1/users
async fn list(
    http_req: HttpRequest,
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let users = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { repos::users::list_in_org(txn, org_id).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(users))
}

#[derive(Debug, Deserialize)]
struct CreateUserInput {
    email: String,
    password: String,
    display_name: String,
    role: UserRole,
}

/// POST /api/v1/users
async fn create(
    http_req: HttpRequest,
    current_user: CurrentUser,
    body: ValidatedJson<CreateUserInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Admin)?;
    let org_id = current_user.org_id();
    let input = body.into_inner();

    validation::validate_email(&input.email)?;
    validation::validate_password(&input.password)?;
    validation::require_non_empty("display_name", &input.display_name)?;
    let password_hash = hash_password(&input.password)?;

    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            repos::users::create(
                txn,
                org_id,
                &input.email,
                &password_hash,
                &input.display_name,
                input.role,
            )
            .await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(user))
}

/// GET /api/v1/users/{id}
async fn get(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { repos::users::find_in_org(txn, org_id, id).await })
    })
    .await?
    .ok_or_else(user_not_found)?;

    Ok(HttpResponse::Ok().json(user))
}

#[derive(Debug, Deserialize)]
struct PatchUserInput {
    display_name: Option<String>,
    role: Option<UserRole>,
    password: Option<String>,
}

/// PATCH /api/v1/users/{id}
async fn patch(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<PatchUserInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Admin)?;
    let org_id = current_user.org_id();
    let id = path.into_inner();
    let input = body.into_inner();

    if let Some(display_name) = &input.display_name {
        validation::require_non_empty("display_name", display_name)?;
    }
    let password_hash = match &input.password {
        Some(password) => {
            validation::validate_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let user = repos::users::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(user_not_found)?;
            repos::users::update(
                txn,
                user,
                UserPatch {
                    display_name: input.display_name,
                    role: input.role,
                    password_hash,
                },
            )
            .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(user))
}

/// DELETE /api/v1/users/{id}
async fn delete(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Admin)?;
    let org_id = current_user.org_id();
    let id = path.into_inner();

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let user = repos::users::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(user_not_found)?;
            repos::users::soft_delete(txn, user).await
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

fn user_not_found() -> AppError {
    AppError::not_found(ErrorCode::UserNotFound, "User not found")
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    );
    cfg.service(
        web::resource("/users/{id}")
            .route(web::get().to(get))
            .route(web::patch().to(patch))
            .route(web::delete().to(delete)),
    );
}
