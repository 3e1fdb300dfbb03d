//! Test runs and their per-case results.

use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use time::OffsetDateTime;

use crate::entities::test_results::ResultStatus;
use crate::entities::test_runs::RunState;
use crate::entities::{projects, test_results, test_runs};
use crate::error::AppError;

pub async fn find_in_org<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    id: i64,
) -> Result<Option<test_runs::Model>, AppError> {
    let run = test_runs::Entity::find_by_id(id)
        .join(JoinType::InnerJoin, test_runs::Relation::Project.def())
        .filter(projects::Column::OrgId.eq(org_id))
        .filter(projects::Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(run)
}

pub async fn list_by_project<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> Result<Vec<test_runs::Model>, AppError> {
    let runs = test_runs::Entity::find()
        .filter(test_runs::Column::ProjectId.eq(project_id))
        .order_by_desc(test_runs::Column::Id)
        .all(conn)
        .await?;
    Ok(runs)
}

pub async fn count_by_project<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> Result<u64, AppError> {
    let count = test_runs::Entity::find()
        .filter(test_runs::Column::ProjectId.eq(project_id))
        .count(conn)
        .await?;
    Ok(count)
}

pub async fn latest_for_project<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> Result<Option<test_runs::Model>, AppError> {
    let run = test_runs::Entity::find()
        .filter(test_runs::Column::ProjectId.eq(project_id))
        .order_by_desc(test_runs::Column::Id)
        .one(conn)
        .await?;
    Ok(run)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
    name: &str,
    milestone_id: Option<i64>,
    created_by: Option<i64>,
) -> Result<test_runs::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let run = test_runs::ActiveModel {
        project_id: Set(project_id),
        milestone_id: Set(milestone_id),
        name: Set(name.to_string()),
        state: Set(RunState::Active),
        created_by: Set(created_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let run = run.insert(conn).await?;
    Ok(run)
}

pub async fn complete<C: ConnectionTrait>(
    conn: &C,
    run: test_runs::Model,
) -> Result<test_runs::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let mut am: test_runs::ActiveModel = run.into();
    am.state = Set(RunState::Completed);
    am.completed_at = Set(Some(now));
    am.updated_at = Set(now);
    let run = am.update(conn).await?;
    Ok(run)
}

/// Seed one UNTESTED result per case so the run starts with a full
/// scoreboard.
pub async fn seed_untested_results<C: ConnectionTrait>(
    conn: &C,
    run_id: i64,
    case_ids: &[i64],
) -> Result<(), AppError> {
    if case_ids.is_empty() {
        return Ok(());
    }
    let now = OffsetDateTime::now_utc();
    let rows = case_ids.iter().map(|case_id| test_results::ActiveModel {
        run_id: Set(run_id),
        case_id: Set(*case_id),
        status: Set(ResultStatus::Untested),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    });
    test_results::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

pub async fn find_result<C: ConnectionTrait>(
    conn: &C,
    run_id: i64,
    case_id: i64,
) -> Result<Option<test_results::Model>, AppError> {
    let result = test_results::Entity::find()
        .filter(test_results::Column::RunId.eq(run_id))
        .filter(test_results::Column::CaseId.eq(case_id))
        .one(conn)
        .await?;
    Ok(result)
}

/// A result row scoped to the caller's organization, resolved through
/// its run's project.
pub async fn find_result_in_org<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    result_id: i64,
) -> Result<Option<test_results::Model>, AppError> {
    let result = test_results::Entity::find_by_id(result_id)
        .join(JoinType::InnerJoin, test_results::Relation::TestRun.def())
        .join(JoinType::InnerJoin, test_runs::Relation::Project.def())
        .filter(projects::Column::OrgId.eq(org_id))
        .filter(projects::Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(result)
}

pub struct ResultUpdate {
    pub status: ResultStatus,
    pub comment: Option<String>,
    pub elapsed_seconds: Option<i32>,
    pub executed_by: Option<i64>,
}

/// Insert or update the result row for (run, case).
pub async fn upsert_result<C: ConnectionTrait>(
    conn: &C,
    run_id: i64,
    case_id: i64,
    update: ResultUpdate,
) -> Result<test_results::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    match find_result(conn, run_id, case_id).await? {
        Some(existing) => {
            let mut am: test_results::ActiveModel = existing.into();
            am.status = Set(update.status);
            am.comment = Set(update.comment);
            am.elapsed_seconds = Set(update.elapsed_seconds);
            am.executed_by = Set(update.executed_by);
            am.executed_at = Set(Some(now));
            am.updated_at = Set(now);
            let result = am.update(conn).await?;
            Ok(result)
        }
        None => {
            let result = test_results::ActiveModel {
                run_id: Set(run_id),
                case_id: Set(case_id),
                status: Set(update.status),
                comment: Set(update.comment),
                elapsed_seconds: Set(update.elapsed_seconds),
                executed_by: Set(update.executed_by),
                executed_at: Set(Some(now)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            let result = result.insert(conn).await?;
            Ok(result)
        }
    }
}

pub async fn list_results<C: ConnectionTrait>(
    conn: &C,
    run_id: i64,
) -> Result<Vec<test_results::Model>, AppError> {
    let results = test_results::Entity::find()
        .filter(test_results::Column::RunId.eq(run_id))
        .order_by_asc(test_results::Column::CaseId)
        .all(conn)
        .await?;
    Ok(results)
}

/// Per-status tallies for a run, one row per status present.
pub async fn status_counts<C: ConnectionTrait>(
    conn: &C,
    run_id: i64,
) -> Result<Vec<(ResultStatus, i64)>, AppError> {
    let counts: Vec<(ResultStatus, i64)> = test_results::Entity::find()
        .select_only()
        .column(test_results::Column::Status)
        .column_as(test_results::Column::Id.count(), "count")
        .filter(test_results::Column::RunId.eq(run_id))
        .group_by(test_results::Column::Status)
        .into_tuple()
        .all(conn)
        .await?;
    Ok(counts)
}
