//! Mutable state owned by a [`crate::Picker`].

use chooser_types::{PageResult, PickerOutcome, RequestFailure};

/// Lifecycle phase of the dialog.
///
/// `Unmounted → Opening → Loading → Loaded ⇄ Loading → Closing → Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Created but not yet attached to a host
    #[default]
    Unmounted,
    /// Visible, waiting for the open transition before the first request
    Opening,
    /// A navigation request is outstanding
    Loading,
    /// A page (possibly empty) is displayed and the dialog is idle
    Loaded,
    /// The exit marker is applied; waiting for the close delay
    Closing,
    /// The outcome was delivered; every further message is ignored
    Closed,
}

impl Phase {
    /// Whether navigation, selection and search are still accepted.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Opening | Self::Loading | Self::Loaded)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PickerState {
    pub phase: Phase,
    pub visible: bool,
    /// A navigation request is in flight
    pub loading: bool,
    /// The search widget is loading results
    pub search_loading: bool,
    /// Current page; replaced wholesale, never merged
    pub page: PageResult,
    /// URL of the last navigation or search request
    pub last_request_url: Option<String>,
    /// Bumped on every navigation; completions from older generations are dropped
    pub generation: u64,
    /// Token of the only timer whose expiry is honored
    pub timer_token: u64,
    /// Exit marker applied when closing starts
    pub exiting: bool,
    /// Bumped whenever the results view should scroll back to the top
    pub scroll_epoch: u64,
    /// Search request whose response is still awaited; cleared by any navigation
    pub pending_search: Option<u64>,
    /// Most recent request failure, cleared by the next successful page
    pub last_error: Option<RequestFailure>,
    pub(crate) pending_outcome: Option<PickerOutcome>,
}

impl PickerState {
    pub(crate) fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn next_timer_token(&mut self) -> u64 {
        self.timer_token += 1;
        self.timer_token
    }

    /// Adopt a page and mark the dialog idle.
    pub(crate) fn apply_page(&mut self, page: PageResult) {
        self.page = page;
        self.loading = false;
        self.last_error = None;
        self.phase = Phase::Loaded;
        self.scroll_epoch += 1;
    }
}
