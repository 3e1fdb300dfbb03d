use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Filesystem storage configuration for attachments.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub root: PathBuf,
}

impl StorageConfig {
    /// Read `STORAGE_ROOT` from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        let root = env::var("STORAGE_ROOT").map_err(|_| {
            AppError::config("Required environment variable 'STORAGE_ROOT' is not set")
        })?;
        Ok(Self {
            root: PathBuf::from(root),
        })
    }
}
