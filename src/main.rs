use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use coastal_alert_parser::{Config, FsObjectStore, FsRecordStore, Handler, Outcome, SesEvent};
use tracing::error;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(outcome) if outcome.is_failure() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<Outcome> {
    let config = Config::from_env()?;

    let event: SesEvent = serde_json::from_reader(io::stdin().lock())
        .context("failed to read receipt event from stdin")?;

    let handler = Handler::new(
        FsObjectStore::new(&config.bucket_name),
        FsRecordStore::open(&config.table_name)
            .with_context(|| format!("failed to open table {}", config.table_name))?,
    );
    let outcome = handler.handle_event(&event)?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &outcome)?;
    writeln!(stdout)?;

    Ok(outcome)
}
