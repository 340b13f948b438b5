//! # Chooser Engine
//!
//! State machine and effect executor for the remote selection dialog.
//!
//! The engine is split the same way as the rest of the workspace: a
//! functional core and an imperative shell.
//!
//! - **`picker`**: [`Picker`], the pure reducer. It turns a [`Msg`] into
//!   state changes plus a list of [`Effect`]s and never blocks.
//! - **`state`**: [`PickerState`] and the lifecycle [`Phase`].
//! - **`session`**: [`PickerSession`], which runs effects on tokio (fetches,
//!   timers, host callbacks) and feeds their completions back in.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chooser_engine::{Picker, PickerSession};
//!
//! let picker = Picker::new(config);
//! let (mut session, mut inbox) = PickerSession::new(picker, Arc::new(client), host);
//! session.run(&mut inbox).await;
//! ```

pub mod picker;
pub mod session;
pub mod state;

pub use chooser_types::{Effect, Msg};
pub use picker::Picker;
pub use session::{Inbox, PickerHost, PickerSession};
pub use state::{Phase, PickerState};
