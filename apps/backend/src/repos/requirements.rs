//! Requirements and their coverage links to test cases.

use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use time::OffsetDateTime;

use crate::entities::{projects, requirement_coverage, requirements};
use crate::error::AppError;

pub async fn find_in_org<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    id: i64,
) -> Result<Option<requirements::Model>, AppError> {
    let requirement = requirements::Entity::find_by_id(id)
        .join(JoinType::InnerJoin, requirements::Relation::Project.def())
        .filter(projects::Column::OrgId.eq(org_id))
        .filter(projects::Column::DeletedAt.is_null())
        .filter(requirements::Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(requirement)
}

pub async fn list_by_project<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> Result<Vec<requirements::Model>, AppError> {
    let list = requirements::Entity::find()
        .filter(requirements::Column::ProjectId.eq(project_id))
        .filter(requirements::Column::DeletedAt.is_null())
        .order_by_asc(requirements::Column::Id)
        .all(conn)
        .await?;
    Ok(list)
}

pub async fn count_by_project<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> Result<u64, AppError> {
    let count = requirements::Entity::find()
        .filter(requirements::Column::ProjectId.eq(project_id))
        .filter(requirements::Column::DeletedAt.is_null())
        .count(conn)
        .await?;
    Ok(count)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
    external_key: &str,
    title: &str,
    description: Option<String>,
) -> Result<requirements::Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let requirement = requirements::ActiveModel {
        project_id: Set(project_id),
        external_key: Set(external_key.to_string()),
        title: Set(title.to_string()),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let requirement = requirement.insert(conn).await?;
    Ok(requirement)
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    requirement: requirements::Model,
    title: Option<String>,
    description: Option<Option<String>>,
) -> Result<requirements::Model, AppError> {
    let mut am: requirements::ActiveModel = requirement.into();
    if let Some(title) = title {
        am.title = Set(title);
    }
    if let Some(description) = description {
        am.description = Set(description);
    }
    am.updated_at = Set(OffsetDateTime::now_utc());
    let requirement = am.update(conn).await?;
    Ok(requirement)
}

pub async fn soft_delete<C: ConnectionTrait>(
    conn: &C,
    requirement: requirements::Model,
) -> Result<(), AppError> {
    let now = OffsetDateTime::now_utc();
    let mut am: requirements::ActiveModel = requirement.into();
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    am.update(conn).await?;
    Ok(())
}

pub async fn link_case<C: ConnectionTrait>(
    conn: &C,
    requirement_id: i64,
    case_id: i64,
) -> Result<requirement_coverage::Model, AppError> {
    let link = requirement_coverage::ActiveModel {
        requirement_id: Set(requirement_id),
        case_id: Set(case_id),
        created_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    let link = link.insert(conn).await?;
    Ok(link)
}

pub async fn find_link<C: ConnectionTrait>(
    conn: &C,
    requirement_id: i64,
    case_id: i64,
) -> Result<Option<requirement_coverage::Model>, AppError> {
    let link = requirement_coverage::Entity::find()
        .filter(requirement_coverage::Column::RequirementId.eq(requirement_id))
        .filter(requirement_coverage::Column::CaseId.eq(case_id))
        .one(conn)
        .await?;
    Ok(link)
}

pub async fn unlink_case<C: ConnectionTrait>(
    conn: &C,
    link: requirement_coverage::Model,
) -> Result<(), AppError> {
    link.delete(conn).await?;
    Ok(())
}

/// Distinct requirement ids in the project with at least one coverage
/// link.
pub async fn covered_requirement_ids<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> Result<Vec<i64>, AppError> {
    let ids: Vec<i64> = requirement_coverage::Entity::find()
        .select_only()
        .column(requirement_coverage::Column::RequirementId)
        .distinct()
        .join(
            JoinType::InnerJoin,
            requirement_coverage::Relation::Requirement.def(),
        )
        .filter(requirements::Column::ProjectId.eq(project_id))
        .filter(requirements::Column::DeletedAt.is_null())
        .into_tuple()
        .all(conn)
        .await?;
    Ok(ids)
}
