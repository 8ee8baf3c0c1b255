use thiserror::Error;

/// Errors that can abort a decision cycle or a dosing attempt.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoopError {
    #[error("Communication error: {0}")]
    CommunicationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Stale data: {0}")]
    StaleData(String),
}
