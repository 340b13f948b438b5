//! Shared vocabulary of the chooser workspace.
//!
//! The picker is driven as a reducer: hosts and background tasks send
//! [`Msg`]s, the state machine answers with [`Effect`]s that the host layer
//! executes. Both enums, the configuration and the page shapes live here so
//! the engine, the API client and the terminal host agree on them without
//! depending on each other.

mod config;
mod page;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use config::{
    ConfigError, DEFAULT_CLOSE_DELAY, DEFAULT_OPEN_DELAY, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_PARAM, DEFAULT_PK_NAME, DisplayField,
    Filter, PickerConfiguration, Timings,
};
pub use page::{Item, ListResponse, PageResult};

/// The two one-shot timers of the dialog lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Delay between mount and the initial navigation
    Open,
    /// Delay between the exit marker and the host callback
    Close,
}

/// What caused an explicit close request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseEvent {
    /// The user dismissed the dialog (Escape / close button)
    Dismissed,
    /// The user interrupted the program (Ctrl+C)
    Interrupted,
    /// The host closed the dialog programmatically
    Host(String),
}

/// The single result handed back to the host when the dialog finishes.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerOutcome {
    /// A record was chosen.
    Selected {
        pk: Value,
        item: Item,
        /// URL of the page the record was listed on
        source_url: Option<String>,
    },
    /// The dialog was closed without choosing.
    Closed(CloseEvent),
}

/// Summary of a failed list request, small enough to travel inside a [`Msg`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    /// HTTP status when the server answered with a non-success code
    pub status: Option<u16>,
    pub message: String,
}

impl std::fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {status}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Messages that drive the picker state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The dialog was attached to its host
    Mount,
    /// The host observed the end of the open transition
    OpenTransitionFinished,
    /// A timer scheduled through [`Effect::ScheduleTimer`] fired
    TimerElapsed { kind: TimerKind, token: u64 },
    /// Load an arbitrary list URL (filters are added by the picker)
    Navigate(String),
    NavigatePrevious,
    NavigateNext,
    /// A fetch issued through [`Effect::Fetch`] finished
    NavigationCompleted {
        generation: u64,
        url: String,
        result: Result<ListResponse, RequestFailure>,
    },
    /// Choose the suggestion with this primary key
    Select(Value),
    RequestClose(CloseEvent),
    /// Search text edited; carries the current query
    SearchChanged(String),
    /// The search widget started request `search`
    SearchStarted { search: u64 },
    /// Search request `search` produced a page of results
    SearchResultsLoaded {
        search: u64,
        url: Option<String>,
        page: PageResult,
    },
    /// Search request `search` failed
    SearchFailed { search: u64, failure: RequestFailure },
    /// The search query was emptied
    SearchCleared,
    /// Open the create-record page, if configured
    OpenCreateRecord,
}

/// Side effects requested by the picker state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Acquire the host's viewport lock for the dialog lifetime
    LockViewport,
    /// Release the viewport lock acquired on mount
    UnlockViewport,
    /// Start a one-shot timer; answer with [`Msg::TimerElapsed`]
    ScheduleTimer { kind: TimerKind, token: u64, delay: Duration },
    /// Abort outstanding timers and requests
    CancelPending,
    /// GET `url`; answer with [`Msg::NavigationCompleted`]
    Fetch { url: String, generation: u64 },
    /// Scroll the results view back to the top
    ResetScroll,
    /// Open the create-record page in a separate surface
    OpenCreateRecord(String),
    /// Invoke the host callback with the final outcome
    Deliver(PickerOutcome),
}
