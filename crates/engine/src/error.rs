//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`ListNotFound`] thrown when a list (spreadsheet tab) does not exist.
//! - [`ListExists`] thrown when creating a list whose name is already taken.
//! - [`Unauthorized`] thrown when the storage backend rejects the credentials.
//! - [`Storage`] thrown on any other transport failure while reading or writing.
//!
//! Numeric parse failures are never errors: the codec coerces them to `0.0`.
//!
//!  [`ListNotFound`]: EngineError::ListNotFound
//!  [`ListExists`]: EngineError::ListExists
//!  [`Unauthorized`]: EngineError::Unauthorized
//!  [`Storage`]: EngineError::Storage
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("list \"{0}\" not found")]
    ListNotFound(String),
    #[error("list \"{0}\" already present")]
    ListExists(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Returns `true` for failures that make the whole session unusable
    /// (bad credentials or an unreachable backend), as opposed to failures
    /// scoped to a single list or action.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Unauthorized(_) => true,
            Self::Http(err) => err.is_connect() || err.is_timeout(),
            _ => false,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ListNotFound(a), Self::ListNotFound(b)) => a == b,
            (Self::ListExists(a), Self::ListExists(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::Storage(a), Self::Storage(b)) => a == b,
            (Self::Io(a), Self::Io(b)) => a.to_string() == b.to_string(),
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            (Self::Http(a), Self::Http(b)) => a.to_string() == b.to_string(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
