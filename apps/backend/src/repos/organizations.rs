use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use time::OffsetDateTime;

use crate::entities::organizations::{ActiveModel, Column, Entity, Model};
use crate::error::AppError;

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Option<Model>, AppError> {
    let org = Entity::find_by_id(id)
        .filter(Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(org)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    slug: &str,
) -> Result<Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let org = ActiveModel {
        name: Set(name.to_string()),
        slug: Set(slug.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let org = org.insert(conn).await?;
    Ok(org)
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    org: Model,
    name: Option<String>,
    slug: Option<String>,
) -> Result<Model, AppError> {
    let mut am: ActiveModel = org.into();
    if let Some(name) = name {
        am.name = Set(name);
    }
    if let Some(slug) = slug {
        am.slug = Set(slug);
    }
    am.updated_at = Set(OffsetDateTime::now_utc());
    let org = am.update(conn).await?;
    Ok(org)
}

pub async fn soft_delete<C: ConnectionTrait>(conn: &C, org: Model) -> Result<(), AppError> {
    let now = OffsetDateTime::now_utc();
    let mut am: ActiveModel = org.into();
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    am.update(conn).await?;
    Ok(())
}
