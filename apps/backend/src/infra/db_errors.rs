//! `sea_orm::DbErr` -> `AppError` translation.
//!
//! Constraint violations surface as typed conflicts so handlers can return
//! 409 with a stable code instead of a 500 with a raw driver message.

use tracing::{error, warn};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Map Postgres constraint names to domain-specific conflict errors.
fn map_constraint_to_conflict(error_msg: &str) -> Option<(ErrorCode, &'static str)> {
    if error_msg.contains("ux_organizations_slug") {
        return Some((ErrorCode::UniqueSlug, "Organization slug already taken"));
    }
    if error_msg.contains("ux_users_email") {
        return Some((ErrorCode::UniqueEmail, "Email already registered"));
    }
    if error_msg.contains("ux_projects_org_id_key") {
        return Some((
            ErrorCode::UniqueProjectKey,
            "Project key already used in this organization",
        ));
    }
    if error_msg.contains("ux_requirements_project_id_external_key") {
        return Some((
            ErrorCode::UniqueRequirementKey,
            "Requirement key already used in this project",
        ));
    }
    if error_msg.contains("ux_requirement_coverage_requirement_id_case_id") {
        return Some((
            ErrorCode::CoverageExists,
            "Requirement is already linked to this test case",
        ));
    }
    None
}

/// Translate a `DbErr` into an `AppError` with a sanitized detail string.
pub fn map_db_err(e: sea_orm::DbErr) -> AppError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return AppError::not_found(ErrorCode::NotFound, "Record not found");
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, "database unavailable: {error_msg}");
            return AppError::db_unavailable("Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
    {
        warn!(trace_id = %trace_id, "unique constraint violation: {error_msg}");

        if let Some((code, detail)) = map_constraint_to_conflict(&error_msg) {
            return AppError::conflict(code, detail);
        }
        return AppError::conflict(ErrorCode::UniqueViolation, "Unique constraint violation");
    }

    if mentions_sqlstate(&error_msg, "23503") {
        warn!(trace_id = %trace_id, "foreign key constraint violation: {error_msg}");
        return AppError::bad_request(
            ErrorCode::FkViolation,
            "Referenced record does not exist",
        );
    }

    if mentions_sqlstate(&error_msg, "23514") {
        warn!(trace_id = %trace_id, "check constraint violation: {error_msg}");
        return AppError::bad_request(ErrorCode::CheckViolation, "Check constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("pool") {
        warn!(trace_id = %trace_id, "database timeout or pool issue: {error_msg}");
        return AppError::db_unavailable("Database timeout");
    }

    error!(trace_id = %trace_id, "unhandled database error: {error_msg}");
    AppError::db("Database operation failed")
}

#[cfg(test)]
mod tests {
    use super::map_db_err;
    use crate::error::AppError;
    use crate::errors::ErrorCode;

    #[test]
    fn unique_slug_violation_maps_to_conflict() {
        let err = sea_orm::DbErr::Custom(
            "error returned from database: duplicate key value violates unique constraint \"ux_organizations_slug\"".to_string(),
        );
        match map_db_err(err) {
            AppError::Conflict { code, .. } => assert_eq!(code, ErrorCode::UniqueSlug),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn unknown_unique_violation_maps_to_generic_conflict() {
        let err = sea_orm::DbErr::Custom("SQLSTATE(23505) something".to_string());
        match map_db_err(err) {
            AppError::Conflict { code, .. } => assert_eq!(code, ErrorCode::UniqueViolation),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn fk_violation_maps_to_bad_request() {
        let err = sea_orm::DbErr::Custom("SQLSTATE(23503) fk".to_string());
        match map_db_err(err) {
            AppError::BadRequest { code, .. } => assert_eq!(code, ErrorCode::FkViolation),
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn record_not_found_maps_to_not_found() {
        let err = sea_orm::DbErr::RecordNotFound("row".to_string());
        match map_db_err(err) {
            AppError::NotFound { code, .. } => assert_eq!(code, ErrorCode::NotFound),
            other => panic!("expected not found, got {other:?}"),
        }
    }
}
