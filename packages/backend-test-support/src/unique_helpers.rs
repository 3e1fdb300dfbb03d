//! Helpers for generating unique test data.
//!
//! ULID-suffixed values keep concurrently-running tests from colliding on
//! the unique columns (org slug, user email, project key).

use ulid::Ulid;

/// Unique string in the format `{prefix}-{ulid}`.
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Unique email in the format `{prefix}-{ulid}@example.test`.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}

/// Unique lowercase slug suitable for organization slugs and project keys.
pub fn unique_slug(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new()).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_values_differ() {
        assert_ne!(unique_str("a"), unique_str("a"));
        assert_ne!(unique_email("a"), unique_email("a"));
        assert_ne!(unique_slug("a"), unique_slug("a"));
    }

    #[test]
    fn slug_is_lowercase() {
        let slug = unique_slug("Acme");
        assert_eq!(slug, slug.to_lowercase());
    }
}
