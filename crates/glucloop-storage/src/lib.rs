pub mod error;
pub mod settings;

pub use error::{Result, StorageError};
pub use settings::{init_settings_db, SettingsRepository};
