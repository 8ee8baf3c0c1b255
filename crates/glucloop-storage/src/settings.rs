use std::str::FromStr;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;

use crate::error::{Result, StorageError};

/// Initializes the settings database, creating it and running migrations
/// if it doesn't already exist.
pub async fn init_settings_db(db_path: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(db_path)?.create_if_missing(true);

    let pool = SqlitePool::connect_with(options).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!(db_path, "settings database initialized");
    Ok(pool)
}

/// Persists the `dosingEnabled` user setting (§6) — the one piece of the
/// engine's surrounding state that is in scope to keep across restarts.
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn dosing_enabled(&self) -> Result<bool> {
        let row: (i64,) = sqlx::query_as("SELECT dosing_enabled FROM settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::SettingsRowMissing)?;
        Ok(row.0 != 0)
    }

    pub async fn set_dosing_enabled(&self, enabled: bool) -> Result<()> {
        sqlx::query("UPDATE settings SET dosing_enabled = ? WHERE id = 1")
            .bind(enabled as i64)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
