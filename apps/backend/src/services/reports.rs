//! Assembles the data behind the PDF reports. Rendering lives in
//! `crate::reports`.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;

use crate::entities::test_results::ResultStatus;
use crate::entities::{projects, test_runs};
use crate::error::AppError;
use crate::repos;
use crate::services::stats::{CoverageStats, RunStats};
use crate::services::{requirements as requirements_service, runs as runs_service};

pub struct ProjectSummaryData {
    pub project: projects::Model,
    pub suite_count: u64,
    pub case_count: u64,
    pub run_count: u64,
    pub latest_run: Option<(test_runs::Model, RunStats)>,
}

pub async fn project_summary<C: ConnectionTrait>(
    conn: &C,
    project: projects::Model,
) -> Result<ProjectSummaryData, AppError> {
    let suite_count = repos::suites::count_suites(conn, project.id).await?;
    let case_count = repos::cases::count_by_project(conn, project.id).await?;
    let run_count = repos::runs::count_by_project(conn, project.id).await?;

    let latest_run = match repos::runs::latest_for_project(conn, project.id).await? {
        Some(run) => {
            let stats = runs_service::stats(conn, run.id).await?;
            Some((run, stats))
        }
        None => None,
    };

    Ok(ProjectSummaryData {
        project,
        suite_count,
        case_count,
        run_count,
        latest_run,
    })
}

pub struct RequirementRow {
    pub external_key: String,
    pub title: String,
    pub covered: bool,
}

pub struct CoverageReportData {
    pub project: projects::Model,
    pub stats: CoverageStats,
    pub rows: Vec<RequirementRow>,
}

pub async fn coverage_report<C: ConnectionTrait>(
    conn: &C,
    project: projects::Model,
) -> Result<CoverageReportData, AppError> {
    let stats = requirements_service::coverage_stats(conn, project.id).await?;

    let rows = if stats.total_requirements == 0 {
        Vec::new()
    } else {
        let requirements = repos::requirements::list_by_project(conn, project.id).await?;
        let covered_ids: std::collections::HashSet<i64> =
            repos::requirements::covered_requirement_ids(conn, project.id)
                .await?
                .into_iter()
                .collect();
        requirements
            .into_iter()
            .map(|r| RequirementRow {
                covered: covered_ids.contains(&r.id),
                external_key: r.external_key,
                title: r.title,
            })
            .collect()
    };

    Ok(CoverageReportData {
        project,
        stats,
        rows,
    })
}

pub struct ResultRow {
    pub case_title: String,
    pub status: ResultStatus,
    pub comment: Option<String>,
    pub elapsed_seconds: Option<i32>,
}

pub struct RunReportData {
    pub run: test_runs::Model,
    pub stats: RunStats,
    pub rows: Vec<ResultRow>,
}

pub async fn run_report<C: ConnectionTrait>(
    conn: &C,
    run: test_runs::Model,
) -> Result<RunReportData, AppError> {
    let stats = runs_service::stats(conn, run.id).await?;
    let results = repos::runs::list_results(conn, run.id).await?;

    // Soft-deleted cases still show up in historic results; title them
    // by id when the case row is gone.
    let cases = repos::cases::list_by_project(conn, run.project_id).await?;
    let titles: HashMap<i64, String> = cases.into_iter().map(|c| (c.id, c.title)).collect();

    let rows = results
        .into_iter()
        .map(|r| ResultRow {
            case_title: titles
                .get(&r.case_id)
                .cloned()
                .unwrap_or_else(|| format!("Case #{}", r.case_id)),
            status: r.status,
            comment: r.comment,
            elapsed_seconds: r.elapsed_seconds,
        })
        .collect();

    Ok(RunReportData { run, stats, rows })
}
