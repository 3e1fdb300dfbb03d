use actix_web::web;
use serde::{Deserialize, Deserializer};

pub mod ai;
pub mod attachments;
pub mod auth;
pub mod cases;
pub mod health;
pub mod milestones;
pub mod organizations;
pub mod plans;
pub mod projects;
pub mod reports;
pub mod requirements;
pub mod runs;
pub mod sections;
pub mod suites;
pub mod users;

/// Configure application routes for tests and non-HttpServer contexts.
///
/// In production, `main.rs` wires the protected scope behind the
/// `JwtExtract` middleware. Tests register the same paths and attach
/// whatever middleware the scenario needs.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(web::scope("/api/v1/auth").configure(auth::configure_routes));
    cfg.service(web::scope("/api/v1").configure(configure_protected));
}

/// Everything that requires a Bearer token.
pub fn configure_protected(cfg: &mut web::ServiceConfig) {
    organizations::configure_routes(cfg);
    users::configure_routes(cfg);
    projects::configure_routes(cfg);
    suites::configure_routes(cfg);
    sections::configure_routes(cfg);
    cases::configure_routes(cfg);
    runs::configure_routes(cfg);
    milestones::configure_routes(cfg);
    plans::configure_routes(cfg);
    requirements::configure_routes(cfg);
    reports::configure_routes(cfg);
    ai::configure_routes(cfg);
    attachments::configure_routes(cfg);
}

/// For PATCH bodies: distinguishes an absent field (`None`) from an
/// explicit `null` (`Some(None)`). Use with `#[serde(default,
/// deserialize_with = "double_option")]`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::double_option;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        description: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert!(absent.description.is_none());

        let null: Patch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(null.description, Some(None));

        let value: Patch = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(value.description, Some(Some("x".to_string())));
    }
}
