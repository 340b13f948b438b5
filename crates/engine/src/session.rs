//! Effect executor for a [`Picker`].
//!
//! The session owns the picker, runs the effects returned by
//! [`Picker::update`] on the current tokio runtime and routes completions
//! back as [`Msg`]s through an unbounded channel. Hosts interact with it in
//! one of two ways:
//!
//! - drive it headless with [`PickerSession::run`], sending user actions
//!   through [`PickerSession::sender`]
//! - poll the [`Inbox`] in their own event loop next to input events and
//!   call [`PickerSession::dispatch`] for both
//!
//! Dropping a session aborts every spawned task and releases the viewport
//! lock if it is still held.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chooser_api::ListSource;
use chooser_types::{CloseEvent, Effect, Item, Msg, PickerOutcome, TimerKind};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::Picker;

/// Receiving half of a session's message channel.
pub type Inbox = mpsc::UnboundedReceiver<Msg>;

/// Callbacks and hooks a host provides to a picker.
///
/// Exactly one of [`on_select`](Self::on_select) and
/// [`on_close`](Self::on_close) is invoked per session, after the close
/// delay. The remaining hooks default to no-ops.
pub trait PickerHost {
    fn on_select(&mut self, pk: Value, item: Item, source_url: Option<String>);

    fn on_close(&mut self, event: CloseEvent);

    /// Acquire exclusive use of the viewport while the dialog is shown.
    fn lock_viewport(&mut self) {}

    fn unlock_viewport(&mut self) {}

    /// Scroll the results view back to the top.
    fn reset_scroll(&mut self) {}

    /// Open the create-record page somewhere outside the dialog.
    fn open_create_record(&mut self, _url: &str) {}
}

pub struct PickerSession<H: PickerHost> {
    picker: Picker,
    host: H,
    source: Arc<dyn ListSource>,
    sender: mpsc::UnboundedSender<Msg>,
    timers: HashMap<TimerKind, JoinHandle<()>>,
    fetches: Vec<JoinHandle<()>>,
    viewport_locked: bool,
}

impl<H: PickerHost> PickerSession<H> {
    /// Creates a session and the inbox its completions arrive on.
    pub fn new(picker: Picker, source: Arc<dyn ListSource>, host: H) -> (Self, Inbox) {
        let (sender, inbox) = mpsc::unbounded_channel();
        let session = Self {
            picker,
            host,
            source,
            sender,
            timers: HashMap::new(),
            fetches: Vec::new(),
            viewport_locked: false,
        };
        (session, inbox)
    }

    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The picker and the host borrowed together, e.g. for rendering.
    pub fn parts_mut(&mut self) -> (&Picker, &mut H) {
        (&self.picker, &mut self.host)
    }

    /// A sender for messages that should be processed by this session.
    pub fn sender(&self) -> mpsc::UnboundedSender<Msg> {
        self.sender.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.picker.is_closed()
    }

    /// Runs the reducer for `msg` and executes the resulting effects.
    pub fn dispatch(&mut self, msg: Msg) {
        for effect in self.picker.update(msg) {
            self.execute(effect);
        }
    }

    /// Mounts the picker if needed and processes messages until it closes.
    pub async fn run(&mut self, inbox: &mut Inbox) {
        self.dispatch(Msg::Mount);
        while !self.is_finished() {
            match inbox.recv().await {
                Some(msg) => self.dispatch(msg),
                None => break,
            }
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::LockViewport => {
                if !self.viewport_locked {
                    self.host.lock_viewport();
                    self.viewport_locked = true;
                }
            }
            Effect::UnlockViewport => self.release_viewport(),
            Effect::ScheduleTimer { kind, token, delay } => self.schedule_timer(kind, token, delay),
            Effect::CancelPending => self.cancel_pending(),
            Effect::Fetch { url, generation } => self.spawn_fetch(url, generation),
            Effect::ResetScroll => self.host.reset_scroll(),
            Effect::OpenCreateRecord(url) => self.host.open_create_record(&url),
            Effect::Deliver(outcome) => match outcome {
                PickerOutcome::Selected { pk, item, source_url } => self.host.on_select(pk, item, source_url),
                PickerOutcome::Closed(event) => self.host.on_close(event),
            },
        }
    }

    fn schedule_timer(&mut self, kind: TimerKind, token: u64, delay: Duration) {
        let sender = self.sender.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(Msg::TimerElapsed { kind, token });
        });
        if let Some(previous) = self.timers.insert(kind, handle) {
            previous.abort();
        }
    }

    fn spawn_fetch(&mut self, url: String, generation: u64) {
        self.fetches.retain(|handle| !handle.is_finished());

        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        self.fetches.push(tokio::spawn(async move {
            let result = source.fetch_page(&url).await.map_err(|error| error.to_failure());
            let _ = sender.send(Msg::NavigationCompleted { generation, url, result });
        }));
    }

    fn cancel_pending(&mut self) {
        let timers = self.timers.len();
        let fetches = self.fetches.len();
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
        for handle in self.fetches.drain(..) {
            handle.abort();
        }
        debug!(timers, fetches, "cancelled pending work");
    }

    fn release_viewport(&mut self) {
        if self.viewport_locked {
            self.viewport_locked = false;
            self.host.unlock_viewport();
        }
    }
}

impl<H: PickerHost> Drop for PickerSession<H> {
    fn drop(&mut self) {
        self.cancel_pending();
        self.release_viewport();
    }
}
