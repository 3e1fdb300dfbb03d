use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use time::OffsetDateTime;

use crate::entities::users::{ActiveModel, Column, Entity, Model, UserRole};
use crate::error::AppError;

/// Lookup by email across all organizations (login path).
pub async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> Result<Option<Model>, AppError> {
    let user = Entity::find()
        .filter(Column::Email.eq(email))
        .filter(Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(user)
}

pub async fn find_in_org<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    id: i64,
) -> Result<Option<Model>, AppError> {
    let user = Entity::find_by_id(id)
        .filter(Column::OrgId.eq(org_id))
        .filter(Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(user)
}

pub async fn list_in_org<C: ConnectionTrait>(conn: &C, org_id: i64) -> Result<Vec<Model>, AppError> {
    let users = Entity::find()
        .filter(Column::OrgId.eq(org_id))
        .filter(Column::DeletedAt.is_null())
        .order_by_asc(Column::Id)
        .all(conn)
        .await?;
    Ok(users)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    org_id: i64,
    email: &str,
    password_hash: &str,
    display_name: &str,
    role: UserRole,
) -> Result<Model, AppError> {
    let now = OffsetDateTime::now_utc();
    let user = ActiveModel {
        org_id: Set(org_id),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        display_name: Set(display_name.to_string()),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let user = user.insert(conn).await?;
    Ok(user)
}

pub struct UserPatch {
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub password_hash: Option<String>,
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    user: Model,
    patch: UserPatch,
) -> Result<Model, AppError> {
    let mut am: ActiveModel = user.into();
    if let Some(display_name) = patch.display_name {
        am.display_name = Set(display_name);
    }
    if let Some(role) = patch.role {
        am.role = Set(role);
    }
    if let Some(password_hash) = patch.password_hash {
        am.password_hash = Set(password_hash);
    }
    am.updated_at = Set(OffsetDateTime::now_utc());
    let user = am.update(conn).await?;
    Ok(user)
}

pub async fn soft_delete<C: ConnectionTrait>(conn: &C, user: Model) -> Result<(), AppError> {
    let now = OffsetDateTime::now_utc();
    let mut am: ActiveModel = user.into();
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    am.update(conn).await?;
    Ok(())
}
