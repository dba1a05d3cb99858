//! Error types for transaction email handling

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Transaction field that could not be located or normalized
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    LastDigits,
    Amount,
    Payee,
    Date,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LastDigits => "last_digits",
            Self::Amount => "amount",
            Self::Payee => "payee",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while decoding or parsing an alert email
#[derive(Error, Debug)]
pub enum ParseError {
    /// The email does not have the expected alert structure
    #[error("Malformed transaction email, could not parse {field}: {details}")]
    Malformed { field: Field, details: String },

    /// Text is not a transaction alert
    #[error("Email does not contain the transaction alert signature")]
    MissingSignature,

    /// Failed to decode the stored message
    #[error("Failed to decode content: {0}")]
    Decode(String),
}

impl ParseError {
    pub(crate) fn malformed(field: Field, details: impl Into<String>) -> Self {
        Self::Malformed {
            field,
            details: details.into(),
        }
    }
}

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors raised by object and record store backends
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the handler; store faults keep their original source
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Invalid event: {0}")]
    Event(String),

    #[error("Object store error: {0}")]
    ObjectStore(#[source] StoreError),

    #[error("Record store error: {0}")]
    RecordStore(#[source] StoreError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
