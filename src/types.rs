//! Core types for parsed transaction alerts

use crate::error::Field;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction fields read from a single alert email
///
/// Only built by [`TransactionRecord::extract`], so every record comes from
/// text that carried the alert signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    last_digits: String,
    date: String,
    amount: String,
    payee: String,
}

impl TransactionRecord {
    pub(crate) const fn new(
        last_digits: String,
        date: String,
        amount: String,
        payee: String,
    ) -> Self {
        Self {
            last_digits,
            date,
            amount,
            payee,
        }
    }

    /// Trailing digits of the account identifier
    #[must_use]
    pub fn last_digits(&self) -> &str {
        &self.last_digits
    }

    /// ISO 8601 full-date (`YYYY-MM-DD`)
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Decimal amount with two fraction digits, `-` prefixed for charges
    #[must_use]
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Merchant text from the `Description:` line
    #[must_use]
    pub fn payee(&self) -> &str {
        &self.payee
    }

    /// Whether the amount is a charge rather than a credit or refund
    #[must_use]
    pub fn is_debit(&self) -> bool {
        self.amount.starts_with('-')
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.last_digits, self.date, self.amount, self.payee
        )
    }
}

/// Storage key of the source email, unique per delivered message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted shape of a transaction, keyed by `message_id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredTransaction {
    pub message_id: String,
    pub last_digits: String,
    pub amount: String,
    pub payee: String,
    pub date: String,
}

impl StoredTransaction {
    #[must_use]
    pub fn new(message_id: &MessageId, record: &TransactionRecord) -> Self {
        Self {
            message_id: message_id.as_str().to_string(),
            last_digits: record.last_digits.clone(),
            amount: record.amount.clone(),
            payee: record.payee.clone(),
            date: record.date.clone(),
        }
    }
}

/// Result of handling one email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Not a transaction alert; nothing to do
    Skipped,

    /// Source email could not be retrieved
    NotFound { message_id: MessageId },

    /// Record parsed and stored
    Parsed(TransactionRecord),

    /// Record parsed, but one already exists for this message
    Duplicate(TransactionRecord),

    /// Email carried the signature but a field could not be parsed
    Malformed { field: Field, details: String },
}

impl Outcome {
    /// Only malformed alerts count as failures; everything else is a clean exit
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    #[must_use]
    pub const fn record(&self) -> Option<&TransactionRecord> {
        match self {
            Self::Parsed(record) | Self::Duplicate(record) => Some(record),
            _ => None,
        }
    }
}

/// Mail receipt notification that triggers the handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SesEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<SesRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SesRecord {
    pub ses: SesNotification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SesNotification {
    pub mail: SesMail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SesMail {
    #[serde(rename = "messageId")]
    pub message_id: String,
}

impl SesEvent {
    /// Message id of the first record; later records are not handled
    #[must_use]
    pub fn message_id(&self) -> Option<MessageId> {
        self.records
            .first()
            .map(|record| MessageId::new(record.ses.mail.message_id.clone()))
    }
}
