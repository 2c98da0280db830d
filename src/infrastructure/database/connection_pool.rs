use crate::shared::config::DatabaseConfig;
use crate::shared::error::AppError;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub type DbPool = Pool<Sqlite>;

pub struct Database;

impl Database {
    /// Open (creating on first use) the embedded database and bring the
    /// schema up to date. Any failure here means the host has no working
    /// local storage and must run in always-online mode.
    pub async fn initialize(config: &DatabaseConfig) -> Result<DbPool, AppError> {
        ensure_parent_dir(&config.url)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;

        info!(target: "offline::db", url = %config.url, "database connected");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;

        Ok(pool)
    }
}

fn ensure_parent_dir(url: &str) -> Result<(), AppError> {
    let path_part = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    if path_part.starts_with(":memory:") || path_part.contains("mode=memory") {
        return Ok(());
    }
    let file_part = path_part.split('?').next().unwrap_or(path_part);
    if let Some(parent) = Path::new(file_part).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;
        }
    }
    Ok(())
}
