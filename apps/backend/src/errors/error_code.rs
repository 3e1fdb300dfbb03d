//! Error codes for the QualityHub backend API.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses. Add new codes here; never pass ad-hoc
//! strings as error codes.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// A token of the wrong kind was presented (access vs refresh)
    UnauthorizedWrongTokenKind,
    /// Unknown email or wrong password
    InvalidCredentials,
    /// Access denied
    Forbidden,

    // Request Validation
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,
    /// Invalid organization slug
    InvalidSlug,
    /// Invalid email address
    InvalidEmail,
    /// Invalid project key
    InvalidProjectKey,
    /// Password does not meet minimum requirements
    InvalidPassword,
    /// Steps payload is not a valid step list
    InvalidSteps,

    // Resource Not Found
    /// General not found error
    NotFound,
    OrganizationNotFound,
    UserNotFound,
    ProjectNotFound,
    SuiteNotFound,
    SectionNotFound,
    CaseNotFound,
    RunNotFound,
    MilestoneNotFound,
    PlanNotFound,
    RequirementNotFound,
    CoverageNotFound,
    AttachmentNotFound,

    // Business Logic Conflicts
    /// Organization slug already taken
    UniqueSlug,
    /// Email already registered
    UniqueEmail,
    /// Project key already used within the organization
    UniqueProjectKey,
    /// Requirement external key already used within the project
    UniqueRequirementKey,
    /// Requirement is already linked to this test case
    CoverageExists,
    /// The run is completed and no longer accepts results
    RunCompleted,
    /// Unique constraint violation (SQLSTATE 23505; generic 409)
    UniqueViolation,
    /// Foreign key constraint violation (SQLSTATE 23503)
    FkViolation,
    /// Check constraint violation (SQLSTATE 23514)
    CheckViolation,

    // Upstream AI service
    /// AI service is unreachable
    AiUnavailable,
    /// AI service did not answer in time
    AiTimeout,
    /// AI service rejected the request body
    AiRejected,
    /// AI service failed
    AiUpstream,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Storage I/O error
    StorageError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            ErrorCode::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            ErrorCode::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            ErrorCode::UnauthorizedWrongTokenKind => "UNAUTHORIZED_WRONG_TOKEN_KIND",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::InvalidSlug => "INVALID_SLUG",
            ErrorCode::InvalidEmail => "INVALID_EMAIL",
            ErrorCode::InvalidProjectKey => "INVALID_PROJECT_KEY",
            ErrorCode::InvalidPassword => "INVALID_PASSWORD",
            ErrorCode::InvalidSteps => "INVALID_STEPS",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::OrganizationNotFound => "ORGANIZATION_NOT_FOUND",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::ProjectNotFound => "PROJECT_NOT_FOUND",
            ErrorCode::SuiteNotFound => "SUITE_NOT_FOUND",
            ErrorCode::SectionNotFound => "SECTION_NOT_FOUND",
            ErrorCode::CaseNotFound => "CASE_NOT_FOUND",
            ErrorCode::RunNotFound => "RUN_NOT_FOUND",
            ErrorCode::MilestoneNotFound => "MILESTONE_NOT_FOUND",
            ErrorCode::PlanNotFound => "PLAN_NOT_FOUND",
            ErrorCode::RequirementNotFound => "REQUIREMENT_NOT_FOUND",
            ErrorCode::CoverageNotFound => "COVERAGE_NOT_FOUND",
            ErrorCode::AttachmentNotFound => "ATTACHMENT_NOT_FOUND",
            ErrorCode::UniqueSlug => "UNIQUE_SLUG",
            ErrorCode::UniqueEmail => "UNIQUE_EMAIL",
            ErrorCode::UniqueProjectKey => "UNIQUE_PROJECT_KEY",
            ErrorCode::UniqueRequirementKey => "UNIQUE_REQUIREMENT_KEY",
            ErrorCode::CoverageExists => "COVERAGE_EXISTS",
            ErrorCode::RunCompleted => "RUN_COMPLETED",
            ErrorCode::UniqueViolation => "UNIQUE_VIOLATION",
            ErrorCode::FkViolation => "FK_VIOLATION",
            ErrorCode::CheckViolation => "CHECK_VIOLATION",
            ErrorCode::AiUnavailable => "AI_UNAVAILABLE",
            ErrorCode::AiTimeout => "AI_TIMEOUT",
            ErrorCode::AiRejected => "AI_REJECTED",
            ErrorCode::AiUpstream => "AI_UPSTREAM",
            ErrorCode::DbError => "DB_ERROR",
            ErrorCode::DbUnavailable => "DB_UNAVAILABLE",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::ErrorCode;

    const ALL: &[ErrorCode] = &[
        ErrorCode::Unauthorized,
        ErrorCode::UnauthorizedMissingBearer,
        ErrorCode::UnauthorizedInvalidJwt,
        ErrorCode::UnauthorizedExpiredJwt,
        ErrorCode::UnauthorizedWrongTokenKind,
        ErrorCode::InvalidCredentials,
        ErrorCode::Forbidden,
        ErrorCode::ValidationError,
        ErrorCode::BadRequest,
        ErrorCode::InvalidSlug,
        ErrorCode::InvalidEmail,
        ErrorCode::InvalidProjectKey,
        ErrorCode::InvalidPassword,
        ErrorCode::InvalidSteps,
        ErrorCode::NotFound,
        ErrorCode::OrganizationNotFound,
        ErrorCode::UserNotFound,
        ErrorCode::ProjectNotFound,
        ErrorCode::SuiteNotFound,
        ErrorCode::SectionNotFound,
        ErrorCode::CaseNotFound,
        ErrorCode::RunNotFound,
        ErrorCode::MilestoneNotFound,
        ErrorCode::PlanNotFound,
        ErrorCode::RequirementNotFound,
        ErrorCode::CoverageNotFound,
        ErrorCode::AttachmentNotFound,
        ErrorCode::UniqueSlug,
        ErrorCode::UniqueEmail,
        ErrorCode::UniqueProjectKey,
        ErrorCode::UniqueRequirementKey,
        ErrorCode::CoverageExists,
        ErrorCode::RunCompleted,
        ErrorCode::UniqueViolation,
        ErrorCode::FkViolation,
        ErrorCode::CheckViolation,
        ErrorCode::AiUnavailable,
        ErrorCode::AiTimeout,
        ErrorCode::AiRejected,
        ErrorCode::AiUpstream,
        ErrorCode::DbError,
        ErrorCode::DbUnavailable,
        ErrorCode::Internal,
        ErrorCode::ConfigError,
        ErrorCode::StorageError,
    ];

    #[test]
    fn codes_are_unique_and_screaming_snake() {
        let mut seen = HashSet::new();
        for code in ALL {
            let s = code.as_str();
            assert!(seen.insert(s), "duplicate error code string: {s}");
            assert!(
                s.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
                "not SCREAMING_SNAKE_CASE: {s}"
            );
        }
    }
}
