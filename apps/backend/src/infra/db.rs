//! Database connection bootstrap.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::db_url;
use crate::error::AppError;

/// Connect to the configured Postgres database.
///
/// Pool sizing and timeouts are deliberately modest; the API is a
/// conventional request/response server and the database is the only
/// shared resource.
pub async fn connect_db() -> Result<DatabaseConnection, AppError> {
    let url = db_url()?;

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .map_err(|e| AppError::db_unavailable(format!("failed to connect: {e}")))?;

    info!("database connection established");
    Ok(db)
}
