use thiserror::Error;

use crate::drag::GestureState;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Invalid project ID: {0:?}")]
    InvalidProjectId(String),

    #[error("Invalid project status: {0}")]
    InvalidStatus(String),

    #[error("Subscriber failed during notification: {0}")]
    Subscriber(#[source] anyhow::Error),

    #[error("Invalid drag gesture: cannot {event} while {from}")]
    InvalidGesture { from: GestureState, event: String },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Invalid insertion: {0}")]
    InvalidInsert(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),
}
