use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use time::{Date, OffsetDateTime};

use crate::entities::milestones::{ActiveModel, Column, Model, Relation};
use crate::entities::{milestones, projects};
use crate::error::AppError;

pub async fn find_in_org<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    id: i64,
) -> Result<Option<Model>, AppError> {
    let milestone = milestones::Entity::find_by_id(id)
        .join(JoinType::InnerJoin, Relation::Project.def())
        .filter(projects::Column::OrgId.eq(org_id))
        .filter(projects::Column::DeletedAt.is_null())
        .filter(Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(milestone)
}

pub async fn list_by_project<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
) -> Result<Vec<Model>, AppError> {
    let list = milestones::Entity::find()
        .filter(Column::ProjectId.eq(project_id))
        .filter(Column::DeletedAt.is_null())
        .order_by_asc(Column::Id)
        .all(conn)
        .await?;
    Ok(list)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    project_id: i64,
    name: &str,
    description: Option<String>,
    due_date: Option<Date>,
) -> Result<Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let milestone = ActiveModel {
        project_id: Set(project_id),
        name: Set(name.to_string()),
        description: Set(description),
        due_date: Set(due_date),
        completed: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let milestone = milestone.insert(conn).await?;
    Ok(milestone)
}

pub struct MilestonePatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<Date>>,
    pub completed: Option<bool>,
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    milestone: Model,
    patch: MilestonePatch,
) -> Result<Model, AppError> {
    let mut am: ActiveModel = milestone.into();
    if let Some(name) = patch.name {
        am.name = Set(name);
    }
    if let Some(description) = patch.description {
        am.description = Set(description);
    }
    if let Some(due_date) = patch.due_date {
        am.due_date = Set(due_date);
    }
    if let Some(completed) = patch.completed {
        am.completed = Set(completed);
    }
    am.updated_at = Set(OffsetDateTime::now_utc());
    let milestone = am.update(conn).await?;
    Ok(milestone)
}

pub async fn soft_delete<C: ConnectionTrait>(conn: &C, milestone: Model) -> Result<(), AppError> {
    let now = OffsetDateTime::now_utc();
    let mut am: ActiveModel = milestone.into();
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    am.update(conn).await?;
    Ok(())
}
