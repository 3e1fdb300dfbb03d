//! Test cases and their immutable version snapshots.

use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use time::OffsetDateTime;

use crate::entities::test_cases::CasePriority;
use crate::entities::{projects, test_case_versions, test_cases, test_sections, test_suites};
use crate::error::AppError;

pub async fn find_in_org<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    id: i64,
) -> Result<Option<test_cases::Model>, AppError> {
    let case = test_cases::Entity::find_by_id(id)
        .join(JoinType::InnerJoin, test_cases::Relation::TestSection.def())
        .join(JoinType::InnerJoin, test_sections::Relation::TestSuite.def())
        .join(JoinType::InnerJoin, test_suites::Relation::Project.def())
        .filter(projects::Column::OrgId.eq(org_id))
        .filter(projects::Column::DeletedAt.is_null())
        .filter(test_suites::Column::DeletedAt.is_null())
        .filter(test_cases::Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(case)
}

pub async fn list_by_section<C: ConnectionTrait>(
    conn: &C,
    section_id: i64,
) -> Result<Vec<test_cases::Model>, AppError> {
    let cases = test_cases::Entity::find()
        .filter(test_cases::Column::SectionId.eq(section_id))
        .filter(test_cases::Column::DeletedAt.is_null())
        .order_by_asc(test_cases::Column::Id)
        .all(conn)
        .await?;
    Ok(cases)
}

/// All live cases under a project, across every suite and section.
pub async fn list_by_project<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> Result<Vec<test_cases::Model>, AppError> {
    let cases = test_cases::Entity::find()
        .join(JoinType::InnerJoin, test_cases::Relation::TestSection.def())
        .join(JoinType::InnerJoin, test_sections::Relation::TestSuite.def())
        .filter(test_suites::Column::ProjectId.eq(project_id))
        .filter(test_suites::Column::DeletedAt.is_null())
        .filter(test_cases::Column::DeletedAt.is_null())
        .order_by_asc(test_cases::Column::Id)
        .all(conn)
        .await?;
    Ok(cases)
}

/// Project owning a case, resolved through its section and suite.
pub async fn project_id_for_case<C: ConnectionTrait>(
    conn: &C,
    case_id: i64,
) -> Result<Option<i64>, AppError> {
    let project_id: Option<i64> = test_cases::Entity::find_by_id(case_id)
        .select_only()
        .column(test_suites::Column::ProjectId)
        .join(JoinType::InnerJoin, test_cases::Relation::TestSection.def())
        .join(JoinType::InnerJoin, test_sections::Relation::TestSuite.def())
        .filter(test_cases::Column::DeletedAt.is_null())
        .into_tuple()
        .one(conn)
        .await?;
    Ok(project_id)
}

/// Live case count for a project.
pub async fn count_by_project<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> Result<u64, AppError> {
    let count = test_cases::Entity::find()
        .join(JoinType::InnerJoin, test_cases::Relation::TestSection.def())
        .join(JoinType::InnerJoin, test_sections::Relation::TestSuite.def())
        .filter(test_suites::Column::ProjectId.eq(project_id))
        .filter(test_suites::Column::DeletedAt.is_null())
        .filter(test_cases::Column::DeletedAt.is_null())
        .count(conn)
        .await?;
    Ok(count)
}

pub struct NewCase {
    pub section_id: i64,
    pub title: String,
    pub preconditions: Option<String>,
    pub steps: serde_json::Value,
    pub expected_result: String,
    pub priority: CasePriority,
    pub created_by: Option<i64>,
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    new: NewCase,
) -> Result<test_cases::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let case = test_cases::ActiveModel {
        section_id: Set(new.section_id),
        title: Set(new.title),
        preconditions: Set(new.preconditions),
        steps: Set(new.steps),
        expected_result: Set(new.expected_result),
        priority: Set(new.priority),
        version: Set(1),
        created_by: Set(new.created_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let case = case.insert(conn).await?;
    Ok(case)
}

#[derive(Default)]
pub struct CasePatch {
    pub title: Option<String>,
    pub preconditions: Option<Option<String>>,
    pub steps: Option<serde_json::Value>,
    pub expected_result: Option<String>,
    pub priority: Option<CasePriority>,
}

impl CasePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.preconditions.is_none()
            && self.steps.is_none()
            && self.expected_result.is_none()
            && self.priority.is_none()
    }
}

/// Snapshot the case's current state into `test_case_versions`, then
/// apply the patch and bump `version`. Callers run this inside a
/// transaction so the snapshot and update land together.
pub async fn snapshot_and_update<C: ConnectionTrait>(
    conn: &C,
    case: test_cases::Model,
    patch: CasePatch,
) -> Result<test_cases::Model, AppError> {
    let now = OffsetDateTime::now_utc();

    let snapshot = test_case_versions::ActiveModel {
        case_id: Set(case.id),
        version: Set(case.version),
        title: Set(case.title.clone()),
        preconditions: Set(case.preconditions.clone()),
        steps: Set(case.steps.clone()),
        expected_result: Set(case.expected_result.clone()),
        priority: Set(case.priority),
        created_at: Set(now),
        ..Default::default()
    };
    snapshot.insert(conn).await?;

    let next_version = case.version + 1;
    let mut am: test_cases::ActiveModel = case.into();
    if let Some(title) = patch.title {
        am.title = Set(title);
    }
    if let Some(preconditions) = patch.preconditions {
        am.preconditions = Set(preconditions);
    }
    if let Some(steps) = patch.steps {
        am.steps = Set(steps);
    }
    if let Some(expected_result) = patch.expected_result {
        am.expected_result = Set(expected_result);
    }
    if let Some(priority) = patch.priority {
        am.priority = Set(priority);
    }
    am.version = Set(next_version);
    am.updated_at = Set(now);
    let case = am.update(conn).await?;
    Ok(case)
}

/// Version history, newest first.
pub async fn list_versions<C: ConnectionTrait>(
    conn: &C,
    case_id: i64,
) -> Result<Vec<test_case_versions::Model>, AppError> {
    let versions = test_case_versions::Entity::find()
        .filter(test_case_versions::Column::CaseId.eq(case_id))
        .order_by_desc(test_case_versions::Column::Version)
        .all(conn)
        .await?;
    Ok(versions)
}

pub async fn soft_delete<C: ConnectionTrait>(
    conn: &C,
    case: test_cases::Model,
) -> Result<(), AppError> {
    let now = OffsetDateTime::now_utc();
    let mut am: test_cases::ActiveModel = case.into();
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    am.update(conn).await?;
    Ok(())
}
