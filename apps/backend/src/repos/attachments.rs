use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, ModelTrait};
use time::OffsetDateTime;

use crate::entities::attachments::{ActiveModel, AttachmentOwner, Entity, Model};
use crate::error::AppError;

pub struct NewAttachment {
    pub owner_kind: AttachmentOwner,
    pub owner_id: i64,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
}

pub async fn create<C: ConnectionTrait>(conn: &C, new: NewAttachment) -> Result<Model, AppError> {
    let attachment = ActiveModel {
        owner_kind: Set(new.owner_kind),
        owner_id: Set(new.owner_id),
        file_name: Set(new.file_name),
        content_type: Set(new.content_type),
        size_bytes: Set(new.size_bytes),
        storage_key: Set(new.storage_key),
        created_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    let attachment = attachment.insert(conn).await?;
    Ok(attachment)
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Option<Model>, AppError> {
    let attachment = Entity::find_by_id(id).one(conn).await?;
    Ok(attachment)
}

pub async fn delete<C: ConnectionTrait>(conn: &C, attachment: Model) -> Result<(), AppError> {
    attachment.delete(conn).await?;
    Ok(())
}
