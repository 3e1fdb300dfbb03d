//! Requirements traceability: coverage links and the coverage statistic.

use sea_orm::ConnectionTrait;

use crate::entities::{requirement_coverage, requirements};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos;
use crate::services::stats::CoverageStats;

/// The project-level coverage statistic. When the project has no
/// requirements the coverage table is never queried.
pub async fn coverage_stats<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> Result<CoverageStats, AppError> {
    let total = repos::requirements::count_by_project(conn, project_id).await?;
    if total == 0 {
        return Ok(CoverageStats::compute(0, 0));
    }
    let covered = repos::requirements::covered_requirement_ids(conn, project_id)
        .await?
        .len() as u64;
    Ok(CoverageStats::compute(total, covered))
}

/// Link a case to a requirement. Both must live in the same project;
/// a duplicate link is a 409.
pub async fn link_case<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    requirement: &requirements::Model,
    case_id: i64,
) -> Result<requirement_coverage::Model, AppError> {
    let case = repos::cases::find_in_org(conn, org_id, case_id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::CaseNotFound, "Test case not found"))?;
    let case_project = repos::cases::project_id_for_case(conn, case.id).await?;
    if case_project != Some(requirement.project_id) {
        return Err(AppError::not_found(
            ErrorCode::CaseNotFound,
            "Test case not found",
        ));
    }

    if repos::requirements::find_link(conn, requirement.id, case.id)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(
            ErrorCode::CoverageExists,
            "Requirement is already covered by this case",
        ));
    }

    repos::requirements::link_case(conn, requirement.id, case.id).await
}

pub async fn unlink_case<C: ConnectionTrait>(
    conn: &C,
    requirement_id: i64,
    case_id: i64,
) -> Result<(), AppError> {
    let link = repos::requirements::find_link(conn, requirement_id, case_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(ErrorCode::CoverageNotFound, "Coverage link not found")
        })?;
    repos::requirements::unlink_case(conn, link).await
}
