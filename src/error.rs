//! Error types for tododeck.
//!
//! The taxonomy is deliberately shallow. Storage and identity failures are
//! typed so the CLI can print a message; inside the store's read path they
//! degrade to safe defaults instead of propagating. Missing mutation targets
//! are not errors at all (the store absorbs them as no-ops).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A persisted value failed to deserialize. Last writer wins and there
    /// is no migration layer, so this only happens on hand-edited data.
    #[error("corrupt value under key '{key}': {source}")]
    CorruptValue {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("an account already exists for {0}")]
    EmailTaken(String),

    #[error("not signed in")]
    NotSignedIn,

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl Error {
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
