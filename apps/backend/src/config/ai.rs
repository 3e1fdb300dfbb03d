use std::env;
use std::time::Duration;

use crate::error::AppError;

/// Configuration for the upstream AI generation microservice.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Base URL of the AI service, without a trailing slash.
    pub base_url: String,
    /// Value sent in the `X-API-Key` header.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl AiConfig {
    /// Read `AI_SERVICE_URL`, `AI_SERVICE_API_KEY` and
    /// `AI_SERVICE_TIMEOUT_SECS` from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = env::var("AI_SERVICE_URL").map_err(|_| {
            AppError::config("Required environment variable 'AI_SERVICE_URL' is not set")
        })?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let api_key = env::var("AI_SERVICE_API_KEY").ok().filter(|k| !k.is_empty());

        let timeout_secs = match env::var("AI_SERVICE_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::config("AI_SERVICE_TIMEOUT_SECS must be a positive integer")
            })?,
            Err(_) => 30,
        };

        Ok(Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::time::Duration;

    use serial_test::serial;

    use super::AiConfig;

    fn clear_env() {
        env::remove_var("AI_SERVICE_URL");
        env::remove_var("AI_SERVICE_API_KEY");
        env::remove_var("AI_SERVICE_TIMEOUT_SECS");
    }

    #[test]
    #[serial]
    fn trailing_slash_is_stripped() {
        clear_env();
        env::set_var("AI_SERVICE_URL", "http://ai:8000/");
        let cfg = AiConfig::from_env().unwrap();
        assert_eq!(cfg.base_url, "http://ai:8000");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert!(cfg.api_key.is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn missing_url_is_config_error() {
        clear_env();
        assert!(AiConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn timeout_and_key_from_env() {
        clear_env();
        env::set_var("AI_SERVICE_URL", "http://ai:8000");
        env::set_var("AI_SERVICE_API_KEY", "k-123");
        env::set_var("AI_SERVICE_TIMEOUT_SECS", "5");
        let cfg = AiConfig::from_env().unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("k-123"));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        clear_env();
    }
}
