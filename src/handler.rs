//! Single-email handler: fetch, parse, store

use crate::error::{HandlerError, ParseError};
use crate::extract::parse_transaction;
use crate::parser::decode_email;
use crate::store::{ObjectStore, PutOutcome, RecordStore};
use crate::types::{MessageId, Outcome, SesEvent, StoredTransaction};
use tracing::{error, info, warn};

/// Handles one delivered email at a time with injected stores
#[derive(Debug)]
pub struct Handler<O, R> {
    objects: O,
    records: R,
}

impl<O: ObjectStore, R: RecordStore> Handler<O, R> {
    pub const fn new(objects: O, records: R) -> Self {
        Self { objects, records }
    }

    pub const fn objects(&self) -> &O {
        &self.objects
    }

    pub const fn records(&self) -> &R {
        &self.records
    }

    /// Handle the first email named in a receipt notification
    pub fn handle_event(&self, event: &SesEvent) -> Result<Outcome, HandlerError> {
        let message_id = event
            .message_id()
            .ok_or_else(|| HandlerError::Event("event has no records".into()))?;
        self.handle(&message_id)
    }

    /// Fetch, parse and store the email stored under `message_id`
    pub fn handle(&self, message_id: &MessageId) -> Result<Outcome, HandlerError> {
        let Some(raw) = self
            .objects
            .get_object(message_id.as_str())
            .map_err(HandlerError::ObjectStore)?
        else {
            warn!("The object does not exist. Key: {}", message_id);
            return Ok(Outcome::NotFound {
                message_id: message_id.clone(),
            });
        };

        let text = decode_email(&raw)?;
        let record = match parse_transaction(&text) {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!("Email {} is not a transaction alert, skipping", message_id);
                return Ok(Outcome::Skipped);
            }
            Err(ParseError::Malformed { field, details }) => {
                error!(
                    message_id = %message_id,
                    field = %field,
                    "Malformed transaction email: {}",
                    details
                );
                return Ok(Outcome::Malformed { field, details });
            }
            Err(e) => return Err(e.into()),
        };

        info!("Parsed result: {}", record);

        let item = StoredTransaction::new(message_id, &record);
        match self
            .records
            .put_if_absent(&item)
            .map_err(HandlerError::RecordStore)?
        {
            PutOutcome::Inserted => {
                info!("Stored transaction for {}", message_id);
                Ok(Outcome::Parsed(record))
            }
            PutOutcome::AlreadyExists => {
                warn!("Transaction for {} already stored, ignoring", message_id);
                Ok(Outcome::Duplicate(record))
            }
        }
    }
}
