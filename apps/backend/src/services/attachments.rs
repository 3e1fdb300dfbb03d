//! Attachment storage: metadata rows in Postgres, bytes on disk under
//! `STORAGE_ROOT/{storage_key}`.

use std::path::PathBuf;

use sea_orm::ConnectionTrait;
use tracing::warn;
use uuid::Uuid;

use crate::config::storage::StorageConfig;
use crate::entities::attachments::{self, AttachmentOwner};
use crate::error::AppError;
use crate::repos;
use crate::repos::attachments::NewAttachment;

fn path_for(storage: &StorageConfig, storage_key: &str) -> PathBuf {
    storage.root.join(storage_key)
}

/// Write the bytes first, then the metadata row. If the row insert
/// fails the orphaned file is removed best-effort.
pub async fn store<C: ConnectionTrait>(
    conn: &C,
    storage: &StorageConfig,
    owner_kind: AttachmentOwner,
    owner_id: i64,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<attachments::Model, AppError> {
    let storage_key = Uuid::new_v4().to_string();
    let path = path_for(storage, &storage_key);

    tokio::fs::create_dir_all(&storage.root)
        .await
        .map_err(|e| AppError::storage(format!("Failed to create storage root: {e}")))?;
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::storage(format!("Failed to write attachment: {e}")))?;

    let row = repos::attachments::create(
        conn,
        NewAttachment {
            owner_kind,
            owner_id,
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            size_bytes: bytes.len() as i64,
            storage_key,
        },
    )
    .await;

    match row {
        Ok(attachment) => Ok(attachment),
        Err(err) => {
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                warn!(error = %cleanup, path = %path.display(), "orphaned attachment file left behind");
            }
            Err(err)
        }
    }
}

pub async fn read_content(
    storage: &StorageConfig,
    attachment: &attachments::Model,
) -> Result<Vec<u8>, AppError> {
    let path = path_for(storage, &attachment.storage_key);
    tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::storage(format!("Failed to read attachment: {e}")))
}

/// Remove the metadata row, then the file. A missing file is logged,
/// not an error.
pub async fn delete<C: ConnectionTrait>(
    conn: &C,
    storage: &StorageConfig,
    attachment: attachments::Model,
) -> Result<(), AppError> {
    let path = path_for(storage, &attachment.storage_key);
    repos::attachments::delete(conn, attachment).await?;
    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!(error = %e, path = %path.display(), "attachment file removal failed");
    }
    Ok(())
}
