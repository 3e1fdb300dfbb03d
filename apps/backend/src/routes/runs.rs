//! Test run endpoints: lifecycle, result recording and tallies.

use actix_web::{web, HttpRequest, HttpResponse};

use crate::db::txn::with_txn;
use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos;
use crate::routes::projects::project_not_found;
use crate::services;
use crate::services::runs::{NewRunInput, RecordResultInput};
use crate::state::app_state::AppState;

pub(crate) fn run_not_found() -> AppError {
    AppError::not_found(ErrorCode::RunNotFound, "Test run not found")
}

/// GET /api/v1/projects/{project_id}/runs
async fn list(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let project_id = path.into_inner();

    let runs = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, project_id)
                .await?
                .ok_or_else(project_not_found)?;
            repos::runs::list_by_project(txn, project.id).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(runs))
}

/// POST /api/v1/projects/{project_id}/runs
async fn create(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<NewRunInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let user_id = current_user.user_id()?;
    let project_id = path.into_inner();
    let input = body.into_inner();

    let run = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, project_id)
                .await?
                .ok_or_else(project_not_found)?;
            services::runs::create(txn, org_id, project.id, input, Some(user_id)).await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(run))
}

/// GET /api/v1/runs/{id}
async fn get(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let run = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { repos::runs::find_in_org(txn, org_id, id).await })
    })
    .await?
    .ok_or_else(run_not_found)?;

    Ok(HttpResponse::Ok().json(run))
}

/// GET /api/v1/runs/{id}/results
async fn list_results(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let results = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let run = repos::runs::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(run_not_found)?;
            repos::runs::list_results(txn, run.id).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(results))
}

/// POST /api/v1/runs/{id}/results
///
/// Upserts the result for (run, case). Conflicts with 409 once the run
/// is completed.
async fn record_result(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<RecordResultInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let user_id = current_user.user_id()?;
    let id = path.into_inner();
    let input = body.into_inner();

    let result = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let run = repos::runs::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(run_not_found)?;
            services::runs::record_result(txn, org_id, &run, input, Some(user_id)).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// POST /api/v1/runs/{id}/complete
async fn complete(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let run = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let run = repos::runs::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(run_not_found)?;
            services::runs::complete(txn, run).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(run))
}

/// GET /api/v1/runs/{id}/stats
async fn stats(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let stats = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let run = repos::runs::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(run_not_found)?;
            services::runs::stats(txn, run.id).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(stats))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects/{project_id}/runs")
            .route(web::get().to(list))
            .route(web::post().to(create)),
    );
    cfg.service(web::resource("/runs/{id}").route(web::get().to(get)));
    cfg.service(
        web::resource("/runs/{id}/results")
            .route(web::get().to(list_results))
            .route(web::post().to(record_result)),
    );
    cfg.service(web::resource("/runs/{id}/complete").route(web::post().to(complete)));
    cfg.service(web::resource("/runs/{id}/stats").route(web::get().to(stats)));
}
