use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the domain, storage, and service layers.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("Entry not found: {0}")]
    EntryNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Malformed entry{}: {reason}", format_id(.id))]
    MalformedEntry { id: Option<String>, reason: String },
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("No entry snapshot has been loaded yet")]
    SnapshotUnavailable,
    #[error("Change subscription closed")]
    SubscriptionClosed,
}

pub type Result<T> = StdResult<T, FinanceError>;

impl FinanceError {
    pub fn malformed(id: Option<&str>, reason: impl Into<String>) -> Self {
        FinanceError::MalformedEntry {
            id: id.map(str::to_string),
            reason: reason.into(),
        }
    }
}

fn format_id(id: &Option<String>) -> String {
    match id {
        Some(id) => format!(" `{id}`"),
        None => String::new(),
    }
}

impl From<std::io::Error> for FinanceError {
    fn from(err: std::io::Error) -> Self {
        FinanceError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        FinanceError::StorageError(err.to_string())
    }
}
