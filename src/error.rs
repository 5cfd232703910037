use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failure to turn the raw command line into a `Command`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// `Invalid <kind> <value>`, the shape every value parser reports.
    pub fn invalid(kind: &str, value: &str) -> Self {
        Self::new(format!("Invalid {} {}", kind, value))
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Time entry ends ({end}) before it starts ({start})")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Parse(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
