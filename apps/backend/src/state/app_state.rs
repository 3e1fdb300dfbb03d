use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::config::ai::AiConfig;
use crate::config::storage::StorageConfig;
use crate::error::AppError;
use crate::services::ai::AiClient;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// JWT settings.
    pub security: SecurityConfig,
    /// Client for the upstream AI generation service, when configured.
    pub ai: Option<AiClient>,
    /// Attachment storage location, when configured.
    pub storage: Option<StorageConfig>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db,
            security,
            ai: None,
            storage: None,
        }
    }

    pub fn with_ai(mut self, config: AiConfig) -> Result<Self, AppError> {
        self.ai = Some(AiClient::new(config)?);
        Ok(self)
    }

    pub fn with_storage(mut self, config: StorageConfig) -> Self {
        self.storage = Some(config);
        self
    }

    #[cfg(test)]
    pub fn for_tests(db: DatabaseConnection) -> Self {
        Self::new(db, SecurityConfig::for_tests())
    }
}
