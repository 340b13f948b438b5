//! Runtime: event loop and input routing for the picker.
//!
//! Responsibilities
//! - Mount the picker; the terminal is acquired through the viewport lock.
//! - Wait on three sources at once: session messages (fetch completions and
//!   timers), terminal input from the input thread, and the search debounce
//!   deadline.
//! - Translate keys into picker messages or search edits.
//! - Redraw after every handled event while the terminal is held.
//!
//! The loop ends once the picker reports it is closed, which happens only
//! after the close delay and the single host callback.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chooser_api::ListSource;
use chooser_engine::{Msg, Picker, PickerSession};
use chooser_types::{CloseEvent, PickerConfiguration, PickerOutcome};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use crate::host::TerminalHost;
use crate::search::{SearchTarget, SearchWidget};
use crate::theme::{NordTheme, Theme};
use crate::view::PickerView;

const INPUT_POLL: Duration = Duration::from_millis(16);

/// Reads terminal input on a dedicated OS thread and forwards it over a
/// channel. `poll` and `read` stay on the same thread; the thread exits once
/// the receiver is dropped or reading fails.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(256);
    thread::spawn(move || {
        while !sender.is_closed() {
            match event::poll(INPUT_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(error) => {
                    warn!(%error, "failed to poll terminal input");
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "failed to read terminal input");
                    break;
                }
            }
        }
    });
    receiver
}

/// Shows the picker until it closes and returns its outcome.
pub async fn run_picker(config: PickerConfiguration, source: Arc<dyn ListSource>) -> Result<PickerOutcome> {
    let base_url = config.base_url.clone();
    let picker = Picker::new(config);
    let target = SearchTarget {
        default_url: picker.default_url(),
        filter_prefix: picker.filter_prefix(),
        page_size: picker.config().page_size,
    };

    let (mut session, mut inbox) = PickerSession::new(picker, Arc::clone(&source), TerminalHost::new(base_url));
    let mut search = SearchWidget::new(target, source, session.sender());
    let mut view = PickerView::default();
    let theme = NordTheme::new();

    session.dispatch(Msg::Mount);
    if let Some(error) = session.host_mut().take_lock_error() {
        return Err(error.context("failed to take over the terminal"));
    }
    let mut events = spawn_input_thread();

    while !session.is_finished() {
        render(&mut session, &mut view, &search, &theme)?;

        let search_deadline = search.deadline();
        tokio::select! {
            maybe_msg = inbox.recv() => match maybe_msg {
                Some(msg) => session.dispatch(msg),
                None => break,
            },
            maybe_event = events.recv() => match maybe_event {
                Some(event) => {
                    let messages = handle_event(event, &mut view, &mut search, session.picker());
                    for msg in messages {
                        session.dispatch(msg);
                    }
                }
                None => break,
            },
            _ = sleep_until(search_deadline.unwrap_or_else(Instant::now)), if search_deadline.is_some() => {
                if let Some(msg) = search.fire() {
                    session.dispatch(msg);
                }
            }
        }
        view.sync(session.picker());
    }

    let outcome = session.host_mut().take_outcome();
    // Releases the terminal if the loop ended before the close delay.
    drop(session);
    outcome.ok_or_else(|| anyhow!("terminal input ended before the picker closed"))
}

fn render(session: &mut PickerSession<TerminalHost>, view: &mut PickerView, search: &SearchWidget, theme: &dyn Theme) -> Result<()> {
    let (picker, host) = session.parts_mut();
    if let Some(guard) = host.guard_mut() {
        guard
            .terminal_mut()
            .draw(|frame| view.render(frame, picker, search.text(), theme))
            .context("failed to draw picker")?;
    }
    Ok(())
}

fn handle_event(event: Event, view: &mut PickerView, search: &mut SearchWidget, picker: &Picker) -> Vec<Msg> {
    match event {
        Event::Key(key) => handle_key(key, view, search, picker),
        Event::Paste(text) => text.chars().filter(|c| !c.is_control()).flat_map(|c| search.insert_char(c)).collect(),
        // Resize and focus changes only need the redraw at the top of the loop.
        _ => Vec::new(),
    }
}

/// Maps one key press to picker messages.
fn handle_key(key: KeyEvent, view: &mut PickerView, search: &mut SearchWidget, picker: &Picker) -> Vec<Msg> {
    if key.kind != KeyEventKind::Press {
        return Vec::new();
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let rows = picker.suggestions().len();

    match key.code {
        KeyCode::Char('c') if ctrl => vec![Msg::RequestClose(CloseEvent::Interrupted)],
        KeyCode::Char('n') if ctrl => vec![Msg::OpenCreateRecord],
        KeyCode::Char('u') if ctrl => search.clear(),
        KeyCode::Char('b') if ctrl => {
            search.move_left();
            Vec::new()
        }
        KeyCode::Char('f') if ctrl => {
            search.move_right();
            Vec::new()
        }
        KeyCode::Char(c) if !ctrl => search.insert_char(c),
        KeyCode::Backspace => search.backspace(),
        KeyCode::Esc => vec![Msg::RequestClose(CloseEvent::Dismissed)],
        KeyCode::Enter => match view.selected_pk(picker) {
            Some(pk) => vec![Msg::Select(pk)],
            None => {
                debug!("enter pressed without a highlighted row");
                Vec::new()
            }
        },
        KeyCode::Up => {
            view.move_cursor(-1, rows);
            Vec::new()
        }
        KeyCode::Down => {
            view.move_cursor(1, rows);
            Vec::new()
        }
        KeyCode::Left | KeyCode::PageUp => vec![Msg::NavigatePrevious],
        KeyCode::Right | KeyCode::PageDown => vec![Msg::NavigateNext],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chooser_api::ApiError;
    use chooser_engine::Effect;
    use chooser_types::{DisplayField, ListResponse};
    use crossterm::event::KeyEventState;
    use serde_json::json;

    struct EmptySource;

    #[async_trait]
    impl ListSource for EmptySource {
        async fn fetch_page(&self, _url: &str) -> Result<ListResponse, ApiError> {
            Ok(ListResponse::default())
        }
    }

    fn loaded_picker() -> Picker {
        let config = PickerConfiguration::new("/api/widgets", "Widget", vec![DisplayField::new("title", "Title")]);
        let mut picker = Picker::new(config);
        picker.update(Msg::Mount);
        let Some(Effect::Fetch { url, generation }) = picker.update(Msg::OpenTransitionFinished).into_iter().next() else {
            panic!("expected fetch");
        };
        let response: ListResponse = serde_json::from_value(json!({
            "count": 2,
            "results": [{"uuid": 1, "title": "One"}, {"uuid": 2, "title": "Two"}]
        }))
        .expect("response");
        picker.update(Msg::NavigationCompleted {
            generation,
            url,
            result: Ok(response),
        });
        picker
    }

    fn fixture(picker: &Picker) -> (PickerView, SearchWidget) {
        let mut view = PickerView::default();
        view.sync(picker);
        let (sender, _receiver) = tokio::sync::mpsc::unbounded_channel();
        let target = SearchTarget {
            default_url: picker.default_url(),
            filter_prefix: picker.filter_prefix(),
            page_size: 10,
        };
        (view, SearchWidget::new(target, Arc::new(EmptySource), sender))
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[tokio::test]
    async fn enter_selects_highlighted_row() {
        let picker = loaded_picker();
        let (mut view, mut search) = fixture(&picker);

        assert!(handle_key(press(KeyCode::Down, KeyModifiers::NONE), &mut view, &mut search, &picker).is_empty());
        let messages = handle_key(press(KeyCode::Enter, KeyModifiers::NONE), &mut view, &mut search, &picker);
        assert_eq!(messages, vec![Msg::Select(json!(2))]);
    }

    #[tokio::test]
    async fn close_and_navigation_keys() {
        let picker = loaded_picker();
        let (mut view, mut search) = fixture(&picker);
        let mut key = |code, modifiers| handle_key(press(code, modifiers), &mut view, &mut search, &picker);

        assert_eq!(key(KeyCode::Esc, KeyModifiers::NONE), vec![Msg::RequestClose(CloseEvent::Dismissed)]);
        assert_eq!(
            key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            vec![Msg::RequestClose(CloseEvent::Interrupted)]
        );
        assert_eq!(key(KeyCode::Right, KeyModifiers::NONE), vec![Msg::NavigateNext]);
        assert_eq!(key(KeyCode::PageUp, KeyModifiers::NONE), vec![Msg::NavigatePrevious]);
        assert_eq!(key(KeyCode::Char('n'), KeyModifiers::CONTROL), vec![Msg::OpenCreateRecord]);
    }

    #[tokio::test]
    async fn typing_edits_the_search_query() {
        let picker = loaded_picker();
        let (mut view, mut search) = fixture(&picker);

        let messages = handle_key(press(KeyCode::Char('w'), KeyModifiers::SHIFT), &mut view, &mut search, &picker);
        assert_eq!(messages, vec![Msg::SearchChanged("w".into())]);
        assert!(search.deadline().is_some());

        let messages = handle_key(press(KeyCode::Char('u'), KeyModifiers::CONTROL), &mut view, &mut search, &picker);
        assert_eq!(messages, vec![Msg::SearchChanged(String::new()), Msg::SearchCleared]);

        let pasted = handle_event(Event::Paste("ab\n".into()), &mut view, &mut search, &picker);
        assert_eq!(pasted, vec![Msg::SearchChanged("a".into()), Msg::SearchChanged("ab".into())]);
    }

    #[tokio::test]
    async fn key_releases_are_ignored() {
        let picker = loaded_picker();
        let (mut view, mut search) = fixture(&picker);
        let release = KeyEvent {
            code: KeyCode::Esc,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(handle_key(release, &mut view, &mut search, &picker).is_empty());
    }
}
