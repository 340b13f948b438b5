//! Terminal implementation of [`PickerHost`].

use chooser_engine::PickerHost;
use chooser_types::{CloseEvent, Item, PickerOutcome};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::terminal::TerminalGuard;

/// Opens a URL outside the terminal; `webbrowser::open` in production.
pub type UrlOpener = Box<dyn Fn(&str) -> std::io::Result<()> + Send>;

pub struct TerminalHost {
    guard: Option<TerminalGuard>,
    lock_error: Option<anyhow::Error>,
    outcome: Option<PickerOutcome>,
    base_url: Option<String>,
    opener: UrlOpener,
    headless: bool,
}

impl TerminalHost {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            guard: None,
            lock_error: None,
            outcome: None,
            base_url,
            opener: Box::new(|url: &str| webbrowser::open(url)),
            headless: false,
        }
    }

    /// A host that never touches the real terminal.
    pub fn headless(base_url: Option<String>, opener: UrlOpener) -> Self {
        Self {
            opener,
            headless: true,
            ..Self::new(base_url)
        }
    }

    pub fn guard_mut(&mut self) -> Option<&mut TerminalGuard> {
        self.guard.as_mut()
    }

    /// Error raised while acquiring the terminal, if any.
    pub fn take_lock_error(&mut self) -> Option<anyhow::Error> {
        self.lock_error.take()
    }

    pub fn take_outcome(&mut self) -> Option<PickerOutcome> {
        self.outcome.take()
    }

    /// Absolute form of `url` for the browser.
    fn browser_url(&self, url: &str) -> String {
        if Url::parse(url).is_ok() {
            return url.to_string();
        }
        self.base_url
            .as_deref()
            .and_then(|base| Url::parse(base).ok())
            .and_then(|base| base.join(url).ok())
            .map(String::from)
            .unwrap_or_else(|| url.to_string())
    }
}

impl PickerHost for TerminalHost {
    fn on_select(&mut self, pk: Value, item: Item, source_url: Option<String>) {
        debug!(%pk, "record selected");
        self.outcome = Some(PickerOutcome::Selected { pk, item, source_url });
    }

    fn on_close(&mut self, event: CloseEvent) {
        debug!(?event, "picker closed");
        self.outcome = Some(PickerOutcome::Closed(event));
    }

    fn lock_viewport(&mut self) {
        if self.headless || self.guard.is_some() {
            return;
        }
        match TerminalGuard::acquire() {
            Ok(guard) => self.guard = Some(guard),
            Err(error) => self.lock_error = Some(error),
        }
    }

    fn unlock_viewport(&mut self) {
        self.guard = None;
    }

    fn open_create_record(&mut self, url: &str) {
        let target = self.browser_url(url);
        if let Err(error) = (self.opener)(&target) {
            warn!(%error, url = %target, "failed to open create-record page");
        }
    }
}
