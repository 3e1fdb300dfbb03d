//! Test suites and their sections. Lookups are tenancy-scoped by
//! joining up to the owning project's organization.

use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use time::OffsetDateTime;

use crate::entities::{projects, test_sections, test_suites};
use crate::error::AppError;

pub async fn find_suite_in_org<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    id: i64,
) -> Result<Option<test_suites::Model>, AppError> {
    let suite = test_suites::Entity::find_by_id(id)
        .join(JoinType::InnerJoin, test_suites::Relation::Project.def())
        .filter(projects::Column::OrgId.eq(org_id))
        .filter(projects::Column::DeletedAt.is_null())
        .filter(test_suites::Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(suite)
}

pub async fn list_suites<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> Result<Vec<test_suites::Model>, AppError> {
    let suites = test_suites::Entity::find()
        .filter(test_suites::Column::ProjectId.eq(project_id))
        .filter(test_suites::Column::DeletedAt.is_null())
        .order_by_asc(test_suites::Column::Id)
        .all(conn)
        .await?;
    Ok(suites)
}

pub async fn count_suites<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> Result<u64, AppError> {
    let count = test_suites::Entity::find()
        .filter(test_suites::Column::ProjectId.eq(project_id))
        .filter(test_suites::Column::DeletedAt.is_null())
        .count(conn)
        .await?;
    Ok(count)
}

pub async fn create_suite<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
    name: &str,
    description: Option<String>,
) -> Result<test_suites::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let suite = test_suites::ActiveModel {
        project_id: Set(project_id),
        name: Set(name.to_string()),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let suite = suite.insert(conn).await?;
    Ok(suite)
}

pub async fn update_suite<C: ConnectionTrait>(
    conn: &C,
    suite: test_suites::Model,
    name: Option<String>,
    description: Option<Option<String>>,
) -> Result<test_suites::Model, AppError> {
    let mut am: test_suites::ActiveModel = suite.into();
    if let Some(name) = name {
        am.name = Set(name);
    }
    if let Some(description) = description {
        am.description = Set(description);
    }
    am.updated_at = Set(OffsetDateTime::now_utc());
    let suite = am.update(conn).await?;
    Ok(suite)
}

pub async fn soft_delete_suite<C: ConnectionTrait>(
    conn: &C,
    suite: test_suites::Model,
) -> Result<(), AppError> {
    let now = OffsetDateTime::now_utc();
    let mut am: test_suites::ActiveModel = suite.into();
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    am.update(conn).await?;
    Ok(())
}

pub async fn find_section_in_org<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    id: i64,
) -> Result<Option<test_sections::Model>, AppError> {
    let section = test_sections::Entity::find_by_id(id)
        .join(JoinType::InnerJoin, test_sections::Relation::TestSuite.def())
        .join(JoinType::InnerJoin, test_suites::Relation::Project.def())
        .filter(projects::Column::OrgId.eq(org_id))
        .filter(projects::Column::DeletedAt.is_null())
        .filter(test_suites::Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(section)
}

pub async fn list_sections<C: ConnectionTrait>(
    conn: &C,
    suite_id: i64,
) -> Result<Vec<test_sections::Model>, AppError> {
    let sections = test_sections::Entity::find()
        .filter(test_sections::Column::SuiteId.eq(suite_id))
        .order_by_asc(test_sections::Column::Position)
        .order_by_asc(test_sections::Column::Id)
        .all(conn)
        .await?;
    Ok(sections)
}

pub async fn create_section<C: ConnectionTrait>(
    conn: &C,
    suite_id: i64,
    parent_id: Option<i64>,
    name: &str,
    position: i32,
) -> Result<test_sections::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let section = test_sections::ActiveModel {
        suite_id: Set(suite_id),
        parent_id: Set(parent_id),
        name: Set(name.to_string()),
        position: Set(position),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let section = section.insert(conn).await?;
    Ok(section)
}

pub async fn update_section<C: ConnectionTrait>(
    conn: &C,
    section: test_sections::Model,
    name: Option<String>,
    position: Option<i32>,
    parent_id: Option<Option<i64>>,
) -> Result<test_sections::Model, AppError> {
    let mut am: test_sections::ActiveModel = section.into();
    if let Some(name) = name {
        am.name = Set(name);
    }
    if let Some(position) = position {
        am.position = Set(position);
    }
    if let Some(parent_id) = parent_id {
        am.parent_id = Set(parent_id);
    }
    am.updated_at = Set(OffsetDateTime::now_utc());
    let section = am.update(conn).await?;
    Ok(section)
}

/// Sections have no `deleted_at`; removal is a hard delete and cascades
/// to the cases underneath.
pub async fn delete_section<C: ConnectionTrait>(
    conn: &C,
    section: test_sections::Model,
) -> Result<(), AppError> {
    section.delete(conn).await?;
    Ok(())
}
