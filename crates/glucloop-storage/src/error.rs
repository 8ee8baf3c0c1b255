use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Settings row missing; database was not initialized correctly")]
    SettingsRowMissing,
}

pub type Result<T> = std::result::Result<T, StorageError>;
