use lazy_regex::regex_is_match;

use crate::auth::password::MIN_PASSWORD_LEN;
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Lowercase alphanumeric segments separated by single hyphens.
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if regex_is_match!(r"^[a-z0-9]+(?:-[a-z0-9]+)*$", slug) {
        Ok(())
    } else {
        Err(AppError::invalid(
            ErrorCode::InvalidSlug,
            "Slug must be lowercase alphanumeric segments separated by hyphens",
        ))
    }
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    if regex_is_match!(r"^[^@\s]+@[^@\s]+\.[^@\s]+$", email) {
        Ok(())
    } else {
        Err(AppError::invalid(
            ErrorCode::InvalidEmail,
            "Email address is not valid",
        ))
    }
}

/// Short uppercase identifier, e.g. `QA` or `WEB3`.
pub fn validate_project_key(key: &str) -> Result<(), AppError> {
    if regex_is_match!(r"^[A-Z][A-Z0-9]{1,9}$", key) {
        Ok(())
    } else {
        Err(AppError::invalid(
            ErrorCode::InvalidProjectKey,
            "Project key must be 2-10 uppercase alphanumeric characters starting with a letter",
        ))
    }
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid(
            ErrorCode::InvalidPassword,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            format!("Field '{field}' must not be empty"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs() {
        assert!(validate_slug("acme").is_ok());
        assert!(validate_slug("acme-qa-team").is_ok());
        assert!(validate_slug("Acme").is_err());
        assert!(validate_slug("acme--qa").is_err());
        assert!(validate_slug("-acme").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn emails() {
        assert!(validate_email("dev@example.test").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("spaces in@example.test").is_err());
    }

    #[test]
    fn project_keys() {
        assert!(validate_project_key("QA").is_ok());
        assert!(validate_project_key("WEB3").is_ok());
        assert!(validate_project_key("A").is_err());
        assert!(validate_project_key("lower").is_err());
        assert!(validate_project_key("TOOLONGKEY1").is_err());
        assert!(validate_project_key("1AB").is_err());
    }

    #[test]
    fn passwords() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn non_empty() {
        assert!(require_non_empty("name", "x").is_ok());
        assert!(require_non_empty("name", "   ").is_err());
    }
}
