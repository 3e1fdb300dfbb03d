//! Test run lifecycle: create, record results, complete, tally.

use sea_orm::ConnectionTrait;
use serde::Deserialize;

use crate::entities::test_results::ResultStatus;
use crate::entities::test_runs::{self, RunState};
use crate::entities::test_results;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos;
use crate::repos::runs::ResultUpdate;
use crate::services::stats::RunStats;
use crate::services::validation;

fn default_include_all_cases() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct NewRunInput {
    pub name: String,
    pub milestone_id: Option<i64>,
    /// Seed one UNTESTED result per live case in the project.
    #[serde(default = "default_include_all_cases")]
    pub include_all_cases: bool,
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    project_id: i64,
    input: NewRunInput,
    created_by: Option<i64>,
) -> Result<test_runs::Model, AppError> {
    validation::require_non_empty("name", &input.name)?;

    if let Some(milestone_id) = input.milestone_id {
        let milestone = repos::milestones::find_in_org(conn, org_id, milestone_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(ErrorCode::MilestoneNotFound, "Milestone not found")
            })?;
        if milestone.project_id != project_id {
            return Err(AppError::not_found(
                ErrorCode::MilestoneNotFound,
                "Milestone not found",
            ));
        }
    }

    let run =
        repos::runs::create(conn, project_id, &input.name, input.milestone_id, created_by).await?;

    if input.include_all_cases {
        let cases = repos::cases::list_by_project(conn, project_id).await?;
        let case_ids: Vec<i64> = cases.iter().map(|c| c.id).collect();
        repos::runs::seed_untested_results(conn, run.id, &case_ids).await?;
    }

    Ok(run)
}

#[derive(Debug, Deserialize)]
pub struct RecordResultInput {
    pub case_id: i64,
    pub status: ResultStatus,
    pub comment: Option<String>,
    pub elapsed_seconds: Option<i32>,
}

/// Upsert the result for (run, case). Rejected once the run is
/// COMPLETED; the case must live in the run's project.
pub async fn record_result<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    run: &test_runs::Model,
    input: RecordResultInput,
    executed_by: Option<i64>,
) -> Result<test_results::Model, AppError> {
    if run.state == RunState::Completed {
        return Err(AppError::conflict(
            ErrorCode::RunCompleted,
            "Results cannot be recorded on a completed run",
        ));
    }

    let case = repos::cases::find_in_org(conn, org_id, input.case_id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::CaseNotFound, "Test case not found"))?;
    let case_project = repos::cases::project_id_for_case(conn, case.id).await?;
    if case_project != Some(run.project_id) {
        return Err(AppError::not_found(
            ErrorCode::CaseNotFound,
            "Test case not found",
        ));
    }

    if let Some(elapsed) = input.elapsed_seconds {
        if elapsed < 0 {
            return Err(AppError::invalid(
                ErrorCode::ValidationError,
                "elapsed_seconds must not be negative",
            ));
        }
    }

    repos::runs::upsert_result(
        conn,
        run.id,
        case.id,
        ResultUpdate {
            status: input.status,
            comment: input.comment,
            elapsed_seconds: input.elapsed_seconds,
            executed_by,
        },
    )
    .await
}

pub async fn complete<C: ConnectionTrait>(
    conn: &C,
    run: test_runs::Model,
) -> Result<test_runs::Model, AppError> {
    if run.state == RunState::Completed {
        return Err(AppError::conflict(
            ErrorCode::RunCompleted,
            "Run is already completed",
        ));
    }
    repos::runs::complete(conn, run).await
}

pub async fn stats<C: ConnectionTrait>(conn: &C, run_id: i64) -> Result<RunStats, AppError> {
    let counts = repos::runs::status_counts(conn, run_id).await?;
    Ok(RunStats::from_counts(&counts))
}
