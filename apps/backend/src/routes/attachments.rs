//! Attachment endpoints. Uploads carry the raw bytes as the request
//! body; ownership and tenancy are checked against the owning test
//! case or test result before any storage I/O.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::config::storage::StorageConfig;
use crate::db::txn::with_txn;
use crate::entities::attachments::AttachmentOwner;
use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::repos;
use crate::routes::cases::case_not_found;
use crate::services;
use crate::services::validation;
use crate::state::app_state::AppState;

fn attachment_not_found() -> AppError {
    AppError::not_found(ErrorCode::AttachmentNotFound, "Attachment not found")
}

/// Quoted-string filename parameter for content-disposition. Quotes,
/// backslashes and control characters would make the header invalid,
/// so they are replaced.
fn disposition_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c == '"' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

fn storage_config(app_state: &AppState) -> Result<&StorageConfig, AppError> {
    app_state
        .storage
        .as_ref()
        .ok_or_else(|| AppError::config("Attachment storage is not configured"))
}

async fn check_owner_in_org(
    txn: &sea_orm::DatabaseTransaction,
    org_id: i64,
    owner_kind: AttachmentOwner,
    owner_id: i64,
) -> Result<(), AppError> {
    match owner_kind {
        AttachmentOwner::TestCase => {
            repos::cases::find_in_org(txn, org_id, owner_id)
                .await?
                .ok_or_else(case_not_found)?;
        }
        AttachmentOwner::TestResult => {
            repos::runs::find_result_in_org(txn, org_id, owner_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(ErrorCode::NotFound, "Test result not found")
                })?;
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct UploadQuery {
    owner_kind: AttachmentOwner,
    owner_id: i64,
    file_name: String,
}

/// POST /api/v1/attachments?owner_kind=&owner_id=&file_name=
///
/// The request body is the attachment content; the Content-Type header
/// is stored alongside it.
async fn upload(
    http_req: HttpRequest,
    current_user: CurrentUser,
    query: web::Query<UploadQuery>,
    bytes: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let query = query.into_inner();
    validation::require_non_empty("file_name", &query.file_name)?;

    let storage = storage_config(&app_state)?.clone();
    let content_type = http_req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let attachment = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            check_owner_in_org(txn, org_id, query.owner_kind, query.owner_id).await?;
            services::attachments::store(
                txn,
                &storage,
                query.owner_kind,
                query.owner_id,
                &query.file_name,
                &content_type,
                &bytes,
            )
            .await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(attachment))
}

/// GET /api/v1/attachments/{id}
async fn get(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let attachment = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let attachment = repos::attachments::find_by_id(txn, id)
                .await?
                .ok_or_else(attachment_not_found)?;
            check_owner_in_org(txn, org_id, attachment.owner_kind, attachment.owner_id)
                .await
                .map_err(|_| attachment_not_found())?;
            Ok(attachment)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(attachment))
}

/// GET /api/v1/attachments/{id}/content
async fn content(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let storage = storage_config(&app_state)?.clone();
    let attachment = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let attachment = repos::attachments::find_by_id(txn, id)
                .await?
                .ok_or_else(attachment_not_found)?;
            check_owner_in_org(txn, org_id, attachment.owner_kind, attachment.owner_id)
                .await
                .map_err(|_| attachment_not_found())?;
            Ok(attachment)
        })
    })
    .await?;

    let bytes = services::attachments::read_content(&storage, &attachment).await?;
    Ok(HttpResponse::Ok()
        .content_type(attachment.content_type.clone())
        .insert_header((
            "content-disposition",
            format!(
                "attachment; filename=\"{}\"",
                disposition_filename(&attachment.file_name)
            ),
        ))
        .body(bytes))
}

/// DELETE /api/v1/attachments/{id}
async fn delete(
    http_req: HttpRequest,
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user.require(UserRole::Tester)?;
    let org_id = current_user.org_id();
    let id = path.into_inner();

    let storage = storage_config(&app_state)?.clone();
    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let attachment = repos::attachments::find_by_id(txn, id)
                .await?
                .ok_or_else(attachment_not_found)?;
            check_owner_in_org(txn, org_id, attachment.owner_kind, attachment.owner_id)
                .await
                .map_err(|_| attachment_not_found())?;
            services::attachments::delete(txn, &storage, attachment).await
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/attachments").route(web::post().to(upload)));
    cfg.service(
        web::resource("/attachments/{id}")
            .route(web::get().to(get))
            .route(web::delete().to(delete)),
    );
    cfg.service(web::resource("/attachments/{id}/content").route(web::get().to(content)));
}

#[cfg(test)]
mod tests {
    use super::disposition_filename;

    #[test]
    fn plain_filenames_pass_through() {
        assert_eq!(disposition_filename("report.pdf"), "report.pdf");
        assert_eq!(disposition_filename("screen shot (1).png"), "screen shot (1).png");
    }

    #[test]
    fn quotes_backslashes_and_control_chars_are_replaced() {
        assert_eq!(disposition_filename("a\"b.png"), "a_b.png");
        assert_eq!(disposition_filename("dir\\file.txt"), "dir_file.txt");
        assert_eq!(disposition_filename("evil\r\nname.bin"), "evil__name.bin");
    }
}
