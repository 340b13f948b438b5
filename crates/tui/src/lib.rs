//! # Chooser TUI
//!
//! Terminal host for the chooser picker. It draws the dialog with Ratatui,
//! feeds keyboard input into the picker state machine and hands the single
//! outcome back to the caller.
//!
//! ## Key Features
//!
//! - Paginated results table with a row cursor
//! - Debounced server-side search
//! - Terminal raw mode and alternate screen held only while the dialog is
//!   open, restored on every exit path
//! - Create-record shortcut that opens the configured page in a browser
//!
//! ## Architecture
//!
//! The picker itself lives in `chooser-engine`; this crate supplies the
//! [`host::TerminalHost`] it calls back into, the [`search::SearchWidget`],
//! the [`view::PickerView`] and the event loop that ties them together.

pub mod host;
mod runtime;
pub mod search;
pub mod terminal;
pub mod theme;
pub mod view;

use std::sync::Arc;

use anyhow::Result;
use chooser_api::ListSource;
use chooser_types::{PickerConfiguration, PickerOutcome};

/// Runs the picker in the current terminal until it closes.
///
/// # Errors
///
/// Fails when the terminal cannot be put into raw mode, when drawing fails,
/// or when terminal input ends before the dialog produced an outcome. Request
/// failures are not errors; they leave the dialog open.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use chooser_api::{ClientOptions, ListClient};
/// use chooser_types::{DisplayField, PickerConfiguration};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = PickerConfiguration::new("/api/widgets", "Widget", vec![DisplayField::new("title", "Title")]);
///     let client = ListClient::new(ClientOptions::from_env(None))?;
///     let outcome = chooser_tui::run(config, Arc::new(client)).await?;
///     println!("{outcome:?}");
///     Ok(())
/// }
/// ```
pub async fn run(config: PickerConfiguration, source: Arc<dyn ListSource>) -> Result<PickerOutcome> {
    runtime::run_picker(config, source).await
}
