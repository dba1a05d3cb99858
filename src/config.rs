//! Environment configuration

use anyhow::Context;
use dotenv::dotenv;
use serde::Deserialize;
use tracing::warn;

/// Resource names supplied by the hosting environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Container holding raw emails, keyed by message id
    pub bucket_name: String,

    /// Table receiving transaction records
    pub table_name: String,
}

impl Config {
    /// Load from the process environment, reading `.env` first when present
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let _ = dotenv().map_err(|err| warn!("error loading .env: {:?}", err));

        envy::from_env::<Self>().context("invalid environment variables")
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, anyhow::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Self>(vars).context("invalid environment variables")
    }
}
