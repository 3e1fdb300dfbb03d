use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use time::OffsetDateTime;

use crate::entities::projects::{ActiveModel, Column, Entity, Model};
use crate::error::AppError;

pub async fn find_in_org<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    id: i64,
) -> Result<Option<Model>, AppError> {
    let project = Entity::find_by_id(id)
        .filter(Column::OrgId.eq(org_id))
        .filter(Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(project)
}

pub async fn list_in_org<C: ConnectionTrait>(conn: &C, org_id: i64) -> Result<Vec<Model>, AppError> {
    let projects = Entity::find()
        .filter(Column::OrgId.eq(org_id))
        .filter(Column::DeletedAt.is_null())
        .order_by_asc(Column::Id)
        .all(conn)
        .await?;
    Ok(projects)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    name: &str,
    key: &str,
    description: Option<String>,
) -> Result<Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let project = ActiveModel {
        org_id: Set(org_id),
        name: Set(name.to_string()),
        key: Set(key.to_string()),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let project = project.insert(conn).await?;
    Ok(project)
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    project: Model,
    name: Option<String>,
    description: Option<Option<String>>,
) -> Result<Model, AppError> {
    let mut am: ActiveModel = project.into();
    if let Some(name) = name {
        am.name = Set(name);
    }
    if let Some(description) = description {
        am.description = Set(description);
    }
    am.updated_at = Set(OffsetDateTime::now_utc());
    let project = am.update(conn).await?;
    Ok(project)
}

pub async fn soft_delete<C: ConnectionTrait>(conn: &C, project: Model) -> Result<(), AppError> {
    let now = OffsetDateTime::now_utc();
    let mut am: ActiveModel = project.into();
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    am.update(conn).await?;
    Ok(())
}
