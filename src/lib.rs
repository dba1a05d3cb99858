// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Coastal Transaction Alert Parser
//!
//! Turns Coastal "A Transaction Has Occurred on Your Account" alert emails
//! into structured transaction records and stores each one exactly once.
//!
//! # Pipeline
//!
//! - Fetch the raw message from an [`ObjectStore`] by its message id
//! - Decode the MIME structure into searchable text
//! - Check for the alert signature, skipping anything else
//! - Extract account digits, amount, payee and date
//! - Insert the record into a [`RecordStore`] unless it already exists
//!
//! # Example
//!
//! ```rust
//! use coastal_alert_parser::parse_transaction;
//!
//! let text = "Coastal Alert: A Transaction Has Occurred on Your Account\n\
//!             Account:1234 Amount:($45.67)45.67 Description:Grocery Store\n \
//!             Date: 3 Mar 2022";
//! let record = parse_transaction(text).unwrap().unwrap();
//!
//! assert_eq!(record.last_digits(), "1234");
//! assert_eq!(record.amount(), "-45.67");
//! assert_eq!(record.payee(), "Grocery Store");
//! assert_eq!(record.date(), "2022-03-03");
//! ```

mod config;
mod error;
mod extract;
mod handler;
mod parser;
mod store;
mod types;

pub use config::Config;
pub use error::{Field, HandlerError, ParseError, Result, StoreError};
pub use extract::{NUM_DIGITS, SIGNATURE, format_date, matches_signature, parse_transaction};
pub use handler::Handler;
pub use parser::{decode_email, parse_email};
pub use store::*;
pub use types::*;
