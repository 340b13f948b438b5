//! Search box above the results table.
//!
//! The widget owns the query text and its own request counter. Edits are
//! debounced; when the debounce expires the widget asks the list source for
//! `<default url>&search=<query><filter prefix>` and forwards the page, or
//! the failure, to the picker only if no newer search was issued meanwhile.
//! Every message carries the request counter so the picker can tell searches
//! apart from each other and from its own navigations.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chooser_api::ListSource;
use chooser_types::Msg;
use chooser_util::{page_from_response, search_url};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// UTF-8 safe single-line input with a cursor.
#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    input: String,
    /// Byte index into `input`, always on a char boundary
    cursor: usize,
}

impl TextInputState {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the text holds no query, ignoring surrounding whitespace.
    pub fn is_blank(&self) -> bool {
        self.input.trim().is_empty()
    }

    pub fn move_left(&mut self) {
        if let Some(previous) = self.input[..self.cursor].chars().last() {
            self.cursor -= previous.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(previous) = self.input[..self.cursor].chars().last() {
            let start = self.cursor - previous.len_utf8();
            self.input.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }
}

/// Request parameters handed over by the picker.
#[derive(Debug, Clone)]
pub struct SearchTarget {
    pub default_url: String,
    pub filter_prefix: String,
    pub page_size: u32,
}

impl SearchTarget {
    pub fn url_for(&self, query: &str) -> String {
        search_url(&self.default_url, &self.filter_prefix, query)
    }
}

pub struct SearchWidget {
    text: TextInputState,
    target: SearchTarget,
    source: Arc<dyn ListSource>,
    sender: UnboundedSender<Msg>,
    /// Counter of the newest issued search
    latest: Arc<AtomicU64>,
    deadline: Option<Instant>,
    in_flight: Option<JoinHandle<()>>,
    debounce: Duration,
}

impl SearchWidget {
    pub fn new(target: SearchTarget, source: Arc<dyn ListSource>, sender: UnboundedSender<Msg>) -> Self {
        Self {
            text: TextInputState::default(),
            target,
            source,
            sender,
            latest: Arc::new(AtomicU64::new(0)),
            deadline: None,
            in_flight: None,
            debounce: SEARCH_DEBOUNCE,
        }
    }

    pub fn text(&self) -> &TextInputState {
        &self.text
    }

    /// When the pending debounce expires, if an edit is waiting.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn insert_char(&mut self, c: char) -> Vec<Msg> {
        let was_blank = self.text.is_blank();
        self.text.insert_char(c);
        self.edited(was_blank)
    }

    pub fn backspace(&mut self) -> Vec<Msg> {
        if self.text.input().is_empty() {
            return Vec::new();
        }
        let was_blank = self.text.is_blank();
        self.text.backspace();
        self.edited(was_blank)
    }

    pub fn clear(&mut self) -> Vec<Msg> {
        if self.text.input().is_empty() {
            return Vec::new();
        }
        let was_blank = self.text.is_blank();
        self.text.clear();
        self.edited(was_blank)
    }

    pub fn move_left(&mut self) {
        self.text.move_left();
    }

    pub fn move_right(&mut self) {
        self.text.move_right();
    }

    /// `SearchCleared` is emitted only when a query is removed, not for
    /// whitespace typed into an empty box.
    fn edited(&mut self, was_blank: bool) -> Vec<Msg> {
        let mut messages = vec![Msg::SearchChanged(self.text.input().to_string())];
        if self.text.is_blank() {
            self.deadline = None;
            if !was_blank {
                self.cancel_in_flight();
                messages.push(Msg::SearchCleared);
            }
        } else {
            self.deadline = Some(Instant::now() + self.debounce);
        }
        messages
    }

    /// Issues the search for the current text. Call when [`Self::deadline`]
    /// has passed; returns the load-start message for the picker.
    pub fn fire(&mut self) -> Option<Msg> {
        self.deadline = None;
        if self.text.is_blank() {
            return None;
        }
        self.cancel_in_flight();

        let counter = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.text.input().trim().to_string();
        let url = self.target.url_for(&query);
        let page_size = self.target.page_size;
        let latest = Arc::clone(&self.latest);
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        debug!(counter, %query, "search started");

        self.in_flight = Some(tokio::spawn(async move {
            let result = source.fetch_page(&url).await;
            if latest.load(Ordering::SeqCst) != counter {
                debug!(counter, "dropped superseded search response");
                return;
            }
            let msg = match result {
                Ok(response) => {
                    let page = page_from_response(response, page_size, &url);
                    Msg::SearchResultsLoaded {
                        search: counter,
                        url: Some(url),
                        page,
                    }
                }
                Err(error) => Msg::SearchFailed {
                    search: counter,
                    failure: error.to_failure(),
                },
            };
            let _ = sender.send(msg);
        }));
        Some(Msg::SearchStarted { search: counter })
    }

    fn cancel_in_flight(&mut self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchWidget {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
