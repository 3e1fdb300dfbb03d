//! Test case creation and versioned updates.

use sea_orm::ConnectionTrait;

use crate::entities::test_cases::{self, TestStep};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::cases::{CasePatch, NewCase};
use crate::repos;
use crate::services::validation;

/// `steps` must be a JSON array of `{step_number, action, expected_result}`.
pub fn validate_steps(steps: &serde_json::Value) -> Result<(), AppError> {
    serde_json::from_value::<Vec<TestStep>>(steps.clone()).map_err(|e| {
        AppError::invalid(
            ErrorCode::InvalidSteps,
            format!("steps must be an array of test steps: {e}"),
        )
    })?;
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    new: NewCase,
) -> Result<test_cases::Model, AppError> {
    validation::require_non_empty("title", &new.title)?;
    validation::require_non_empty("expected_result", &new.expected_result)?;
    validate_steps(&new.steps)?;
    repos::cases::create(conn, new).await
}

/// Apply a patch, snapshotting the prior state first. An empty patch is
/// a no-op and does not create a version. Runs inside the caller's
/// transaction so the snapshot and the update land atomically.
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    case: test_cases::Model,
    patch: CasePatch,
) -> Result<test_cases::Model, AppError> {
    if patch.is_empty() {
        return Ok(case);
    }
    if let Some(title) = &patch.title {
        validation::require_non_empty("title", title)?;
    }
    if let Some(expected_result) = &patch.expected_result {
        validation::require_non_empty("expected_result", expected_result)?;
    }
    if let Some(steps) = &patch.steps {
        validate_steps(steps)?;
    }
    repos::cases::snapshot_and_update(conn, case, patch).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::validate_steps;

    #[test]
    fn accepts_well_formed_steps() {
        let steps = json!([
            {"step_number": 1, "action": "Open the login page", "expected_result": "Form shown"},
            {"step_number": 2, "action": "Submit valid credentials", "expected_result": "Redirect to dashboard"}
        ]);
        assert!(validate_steps(&steps).is_ok());
    }

    #[test]
    fn accepts_empty_array() {
        assert!(validate_steps(&serde_json::json!([])).is_ok());
    }

    #[test]
    fn rejects_non_array() {
        assert!(validate_steps(&serde_json::json!({"step_number": 1})).is_err());
    }

    #[test]
    fn rejects_missing_fields() {
        let steps = serde_json::json!([{"step_number": 1, "action": "Click"}]);
        assert!(validate_steps(&steps).is_err());
    }
}
