use std::fmt;
use thiserror::Error;

/// Store operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Read,
    Write,
    Monitor,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOperation::Read => write!(f, "read"),
            StoreOperation::Write => write!(f, "write"),
            StoreOperation::Monitor => write!(f, "monitor"),
        }
    }
}

/// Errors raised by a [`SettingsStore`](super::SettingsStore).
///
/// Store failures are scoped to the single operation that hit them; callers
/// decide how to recover. The menu model keeps its previous markers on any
/// of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached
    #[error("Settings store unavailable ({operation} of {key}): {reason}")]
    Unavailable {
        operation: StoreOperation,
        key: String,
        reason: String,
    },

    /// The store answered with something that is not a string value
    #[error("Settings key {key} holds a value that is not a string: {raw}")]
    InvalidValue { key: String, raw: String },
}

impl StoreError {
    pub fn unavailable(
        operation: StoreOperation,
        key: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        StoreError::Unavailable {
            operation,
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}
