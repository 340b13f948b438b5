mod args;

use std::env;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use chooser_api::{ClientOptions, ListClient};
use chooser_types::{PickerConfiguration, PickerOutcome};
use chooser_util::{default_log_path, discover_config_value, open_log_file, summarize};
use clap::Parser;
use serde_json::json;
use tracing::debug;

use crate::args::Args;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let base = discover_config_value(args.config.as_deref())?;
    let config = args.into_configuration(base)?;
    debug!(endpoint = %config.endpoint, label = %config.label, "starting picker");

    let client = ListClient::new(ClientOptions::from_env(config.base_url.as_deref()))
        .context("failed to build the list client")?;
    let outcome = chooser_tui::run(config.clone(), Arc::new(client)).await?;
    report(&config, outcome)
}

/// Logs go to a file while the dialog owns the terminal; stdout carries
/// only the selection. Without a writable log file only errors reach stderr.
fn init_tracing() {
    let path = default_log_path();
    match open_log_file(&path) {
        Ok(file) => {
            let filter = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(error) => {
            eprintln!("chooser: cannot open log file {}: {error}", path.display());
            let filter = env::var("RUST_LOG").unwrap_or_else(|_| "error".into());
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

fn report(config: &PickerConfiguration, outcome: PickerOutcome) -> Result<()> {
    match outcome {
        PickerOutcome::Selected { pk, item, source_url } => {
            let display = summarize(&item, &config.display);
            let out = json!({
                "pk": pk,
                "item": item,
                "source_url": source_url,
                "display": display,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        PickerOutcome::Closed(event) if config.required => {
            bail!("a {} must be chosen (dialog closed: {event:?})", config.label)
        }
        PickerOutcome::Closed(event) => {
            debug!(?event, "closed without a selection");
            Ok(())
        }
    }
}
