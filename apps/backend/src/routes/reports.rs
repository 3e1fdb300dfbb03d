//! PDF report endpoints. Each handler gathers the data inside the
//! request transaction and renders outside of it.

use actix_web::{web, HttpRequest, HttpResponse};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::repos;
use crate::reports::pdf;
use crate::routes::projects::project_not_found;
use crate::routes::runs::run_not_found;
use crate::services;
use crate::state::app_state::AppState;

fn pdf_response(file_name: &str, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "content-disposition",
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(bytes)
}

/// GET /api/v1/projects/{project_id}/reports/summary
async fn project_summary(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let project_id = path.into_inner();

    let data = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, project_id)
                .await?
                .ok_or_else(project_not_found)?;
            services::reports::project_summary(txn, project).await
        })
    })
    .await?;

    let bytes = pdf::render_project_summary(&data)?;
    Ok(pdf_response(
        &format!("project-{}-summary.pdf", data.project.key),
        bytes,
    ))
}

/// GET /api/v1/projects/{project_id}/reports/coverage
async fn coverage_report(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let project_id = path.into_inner();

    let data = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let project = repos::projects::find_in_org(txn, org_id, project_id)
                .await?
                .ok_or_else(project_not_found)?;
            services::reports::coverage_report(txn, project).await
        })
    })
    .await?;

    let bytes = pdf::render_coverage_report(&data)?;
    Ok(pdf_response(
        &format!("project-{}-coverage.pdf", data.project.key),
        bytes,
    ))
}

/// GET /api/v1/runs/{id}/report
async fn run_report(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let data = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let run = repos::runs::find_in_org(txn, org_id, id)
                .await?
                .ok_or_else(run_not_found)?;
            services::reports::run_report(txn, run).await
        })
    })
    .await?;

    let bytes = pdf::render_run_report(&data)?;
    Ok(pdf_response(&format!("run-{}-report.pdf", data.run.id), bytes))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projects/{project_id}/reports/summary")
            .route(web::get().to(project_summary)),
    );
    cfg.service(
        web::resource("/projects/{project_id}/reports/coverage")
            .route(web::get().to(coverage_report)),
    );
    cfg.service(web::resource("/runs/{id}/report").route(web::get().to(run_report)));
}
