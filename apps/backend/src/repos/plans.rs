use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use time::OffsetDateTime;

use crate::entities::test_plans::{ActiveModel, Column, Model, Relation};
use crate::entities::{projects, test_plans};
use crate::error::AppError;

pub async fn find_in_org<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    id: i64,
) -> Result<Option<Model>, AppError> {
    let plan = test_plans::Entity::find_by_id(id)
        .join(JoinType::InnerJoin, Relation::Project.def())
        .filter(projects::Column::OrgId.eq(org_id))
        .filter(projects::Column::DeletedAt.is_null())
        .filter(Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(plan)
}

pub async fn list_by_project<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> Result<Vec<Model>, AppError> {
    let plans = test_plans::Entity::find()
        .filter(Column::ProjectId.eq(project_id))
        .filter(Column::DeletedAt.is_null())
        .order_by_asc(Column::Id)
        .all(conn)
        .await?;
    Ok(plans)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
    name: &str,
    description: Option<String>,
) -> Result<Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let plan = ActiveModel {
        project_id: Set(project_id),
        name: Set(name.to_string()),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let plan = plan.insert(conn).await?;
    Ok(plan)
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    plan: Model,
    name: Option<String>,
    description: Option<Option<String>>,
) -> Result<Model, AppError> {
    let mut am: ActiveModel = plan.into();
    if let Some(name) = name {
        am.name = Set(name);
    }
    if let Some(description) = description {
        am.description = Set(description);
    }
    am.updated_at = Set(OffsetDateTime::now_utc());
    let plan = am.update(conn).await?;
    Ok(plan)
}

pub async fn soft_delete<C: ConnectionTrait>(conn: &C, plan: Model) -> Result<(), AppError> {
    let now = OffsetDateTime::now_utc();
    let mut am: ActiveModel = plan.into();
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    am.update(conn).await?;
    Ok(())
}
