//! The picker reducer.
//!
//! [`Picker::update`] is the only place dialog state changes. It never
//! performs I/O or calls the host; everything observable happens through the
//! returned [`Effect`]s, which a [`crate::PickerSession`] (or a test) runs.

use std::sync::Arc;

use chooser_types::{Effect, Item, ListResponse, Msg, PageResult, PickerConfiguration, PickerOutcome, RequestFailure, TimerKind};
use chooser_util::{
    PageDirection, append_filters, coerce_value, default_url, filter_prefix, page_from_response, pluralize, resolve_page_url, tr,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::state::{Phase, PickerState};

/// A selection dialog over one remote collection.
#[derive(Debug, Clone)]
pub struct Picker {
    config: Arc<PickerConfiguration>,
    state: PickerState,
}

impl Picker {
    pub fn new(config: impl Into<Arc<PickerConfiguration>>) -> Self {
        let state = PickerState {
            loading: true,
            ..PickerState::default()
        };
        Self {
            config: config.into(),
            state,
        }
    }

    pub fn config(&self) -> &PickerConfiguration {
        &self.config
    }

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_closed(&self) -> bool {
        self.state.phase == Phase::Closed
    }

    /// Apply one message and return the effects it requests, in order.
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Mount => self.mount(),
            Msg::OpenTransitionFinished => self.begin_initial_navigation(),
            Msg::TimerElapsed { kind, token } => self.timer_elapsed(kind, token),
            Msg::Navigate(url) => {
                if !self.state.phase.is_live() {
                    return Vec::new();
                }
                self.navigate(&url)
            }
            Msg::NavigatePrevious => self.paginate(PageDirection::Previous),
            Msg::NavigateNext => self.paginate(PageDirection::Next),
            Msg::NavigationCompleted { generation, url, result } => self.navigation_completed(generation, url, result),
            Msg::Select(pk) => self.select(pk),
            Msg::RequestClose(event) => {
                if self.state.phase == Phase::Unmounted {
                    return Vec::new();
                }
                self.begin_close(PickerOutcome::Closed(event))
            }
            // The query text itself lives in the search widget.
            Msg::SearchChanged(_) => Vec::new(),
            Msg::SearchStarted { search } => self.search_started(search),
            Msg::SearchResultsLoaded { search, url, page } => self.search_results_loaded(search, url, page),
            Msg::SearchFailed { search, failure } => self.search_failed(search, failure),
            Msg::SearchCleared => self.search_cleared(),
            Msg::OpenCreateRecord => self.open_create_record(),
        }
    }

    fn mount(&mut self) -> Vec<Effect> {
        if self.state.phase != Phase::Unmounted {
            return Vec::new();
        }
        self.state.phase = Phase::Opening;
        self.state.visible = true;
        self.state.loading = true;
        let token = self.state.next_timer_token();
        debug!(endpoint = %self.config.endpoint, "picker mounted");
        vec![
            Effect::LockViewport,
            Effect::ScheduleTimer {
                kind: TimerKind::Open,
                token,
                delay: self.config.timings.open_delay(),
            },
        ]
    }

    /// Starts the first request once, whether triggered by the open timer or
    /// by the host reporting the end of the open transition.
    fn begin_initial_navigation(&mut self) -> Vec<Effect> {
        if self.state.phase != Phase::Opening {
            return Vec::new();
        }
        // Invalidate the open timer if it is still pending.
        self.state.next_timer_token();
        self.navigate(&default_url(&self.config))
    }

    fn timer_elapsed(&mut self, kind: TimerKind, token: u64) -> Vec<Effect> {
        if token != self.state.timer_token {
            debug!(?kind, token, current = self.state.timer_token, "ignored stale timer");
            return Vec::new();
        }
        match kind {
            TimerKind::Open => self.begin_initial_navigation(),
            TimerKind::Close => self.finish_close(),
        }
    }

    fn navigate(&mut self, url: &str) -> Vec<Effect> {
        let url = append_filters(url, &self.config.filters);
        let generation = self.state.next_generation();
        self.state.loading = true;
        self.state.phase = Phase::Loading;
        self.state.last_request_url = Some(url.clone());
        // The newest request wins; a search still in flight is superseded.
        self.state.search_loading = false;
        self.state.pending_search = None;
        debug!(%url, generation, "navigation started");
        vec![Effect::Fetch { url, generation }]
    }

    fn paginate(&mut self, direction: PageDirection) -> Vec<Effect> {
        if !self.state.phase.is_live() {
            return Vec::new();
        }
        match resolve_page_url(&self.config, &self.state.page, direction) {
            Some(url) => self.navigate(&url),
            None => {
                debug!(?direction, page = self.state.page.current_page, "no page in that direction");
                Vec::new()
            }
        }
    }

    fn navigation_completed(
        &mut self,
        generation: u64,
        url: String,
        result: Result<ListResponse, RequestFailure>,
    ) -> Vec<Effect> {
        if !self.state.phase.is_live() || generation != self.state.generation {
            debug!(%url, generation, current = self.state.generation, "dropped stale navigation result");
            return Vec::new();
        }

        match result {
            Ok(response) => {
                let page = page_from_response(response, self.config.page_size, &url);
                debug!(%url, generation, count = page.count, page = page.current_page, "navigation finished");
                self.state.apply_page(page);
                vec![Effect::ResetScroll]
            }
            Err(failure) => {
                warn!(%url, generation, error = %failure, "navigation failed");
                self.state.loading = false;
                if self.state.phase == Phase::Loading {
                    self.state.phase = Phase::Loaded;
                }
                self.state.last_error = Some(failure);
                Vec::new()
            }
        }
    }

    fn select(&mut self, pk: Value) -> Vec<Effect> {
        if !self.state.phase.is_live() {
            return Vec::new();
        }
        let Some(item) = self.find(&pk).cloned() else {
            debug!(%pk, "select ignored: no suggestion with that key");
            return Vec::new();
        };
        let source_url = self.state.last_request_url.clone();
        self.begin_close(PickerOutcome::Selected { pk, item, source_url })
    }

    /// Applies the exit marker and schedules the single callback.
    fn begin_close(&mut self, outcome: PickerOutcome) -> Vec<Effect> {
        if matches!(self.state.phase, Phase::Closing | Phase::Closed) {
            debug!("close ignored: already closing");
            return Vec::new();
        }
        self.state.phase = Phase::Closing;
        self.state.exiting = true;
        self.state.loading = false;
        self.state.search_loading = false;
        self.state.next_generation();
        self.state.pending_outcome = Some(outcome);
        let token = self.state.next_timer_token();
        debug!(token, "picker closing");
        vec![
            Effect::CancelPending,
            Effect::ScheduleTimer {
                kind: TimerKind::Close,
                token,
                delay: self.config.timings.close_delay(),
            },
        ]
    }

    fn finish_close(&mut self) -> Vec<Effect> {
        if self.state.phase != Phase::Closing {
            return Vec::new();
        }
        self.state.phase = Phase::Closed;
        self.state.visible = false;
        let mut effects = Vec::with_capacity(2);
        if let Some(outcome) = self.state.pending_outcome.take() {
            effects.push(Effect::Deliver(outcome));
        }
        effects.push(Effect::UnlockViewport);
        effects
    }

    fn search_started(&mut self, search: u64) -> Vec<Effect> {
        if !self.state.phase.is_live() {
            return Vec::new();
        }
        self.state.search_loading = true;
        self.state.pending_search = Some(search);
        // A page requested before this point would overwrite the search results.
        self.state.next_generation();
        self.state.loading = false;
        Vec::new()
    }

    /// Whether `search` is the outstanding search and nothing was requested since.
    fn accepts_search(&self, search: u64) -> bool {
        self.state.phase.is_live() && self.state.pending_search == Some(search)
    }

    fn search_results_loaded(&mut self, search: u64, url: Option<String>, page: PageResult) -> Vec<Effect> {
        if !self.accepts_search(search) {
            debug!(search, pending = ?self.state.pending_search, "dropped superseded search results");
            return Vec::new();
        }
        self.state.pending_search = None;
        self.state.search_loading = false;
        if url.is_some() {
            self.state.last_request_url = url;
        }
        debug!(search, count = page.count, "search results adopted");
        self.state.apply_page(page);
        vec![Effect::ResetScroll]
    }

    fn search_failed(&mut self, search: u64, failure: RequestFailure) -> Vec<Effect> {
        if !self.accepts_search(search) {
            debug!(search, "dropped superseded search failure");
            return Vec::new();
        }
        warn!(search, error = %failure, "search failed");
        self.state.pending_search = None;
        self.state.search_loading = false;
        if self.state.phase == Phase::Loading {
            self.state.phase = Phase::Loaded;
        }
        self.state.last_error = Some(failure);
        Vec::new()
    }

    fn search_cleared(&mut self) -> Vec<Effect> {
        if !self.state.phase.is_live() {
            return Vec::new();
        }
        self.state.page = PageResult::default();
        self.navigate(&default_url(&self.config))
    }

    fn open_create_record(&mut self) -> Vec<Effect> {
        if !self.state.phase.is_live() {
            return Vec::new();
        }
        match self.config.create_endpoint.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => vec![Effect::OpenCreateRecord(url.to_string())],
            None => Vec::new(),
        }
    }

    fn find(&self, pk: &Value) -> Option<&Item> {
        self.state
            .page
            .items
            .iter()
            .find(|item| item.get(&self.config.pk_name) == Some(pk))
    }

    /// Items on the current page.
    pub fn suggestions(&self) -> &[Item] {
        &self.state.page.items
    }

    /// Row index of the suggestion whose primary key equals `pk`.
    pub fn position_of(&self, pk: &Value) -> Option<usize> {
        self.suggestions()
            .iter()
            .position(|item| item.get(&self.config.pk_name) == Some(pk))
    }

    /// Display cells for every suggestion, one column per display field.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.suggestions()
            .iter()
            .map(|item| {
                self.config
                    .list_display
                    .iter()
                    .map(|field| coerce_value(item.get(&field.name), &field.name))
                    .collect()
            })
            .collect()
    }

    /// `"Choose <label>"`
    pub fn heading(&self) -> String {
        format!("{} {}", tr(&self.config.translations, "choose"), self.config.label)
    }

    /// `"<count> Result(s)"`
    pub fn count_label(&self) -> String {
        let count = self.state.page.count;
        format!("{count} {}", pluralize(&self.config.translations, "result", "results", count))
    }

    /// `"<current> / <pages> Page(s)"`
    pub fn page_label(&self) -> String {
        let page = &self.state.page;
        format!(
            "{} / {} {}",
            page.current_page,
            page.num_pages,
            pluralize(&self.config.translations, "page", "pages", page.num_pages)
        )
    }

    /// Text shown instead of the table when there are no rows.
    pub fn placeholder(&self) -> Option<String> {
        if !self.suggestions().is_empty() {
            return None;
        }
        let key = if self.state.loading || self.state.search_loading { "loading" } else { "no_results" };
        Some(tr(&self.config.translations, key))
    }

    pub fn can_go_previous(&self) -> bool {
        self.state.page.previous.is_some()
    }

    pub fn can_go_next(&self) -> bool {
        self.state.page.next.is_some()
    }

    /// Filter query string handed to the search widget.
    pub fn filter_prefix(&self) -> String {
        filter_prefix(&self.config.filters)
    }

    pub fn default_url(&self) -> String {
        default_url(&self.config)
    }

    /// The configured initial value, if any.
    pub fn initial_value(&self) -> Option<&Value> {
        self.config.value.as_ref().filter(|value| !value.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chooser_types::{CloseEvent, DEFAULT_CLOSE_DELAY, DEFAULT_OPEN_DELAY, DisplayField, Filter};
    use serde_json::json;

    fn config() -> PickerConfiguration {
        let mut config = PickerConfiguration::new("/api/widgets", "Widget", vec![DisplayField::new("title", "Title")]);
        config.filters = vec![Filter::new("site", "3")];
        config
    }

    fn response(body: Value) -> ListResponse {
        serde_json::from_value(body).expect("list response")
    }

    /// Mounts and runs the initial navigation through the open timer.
    fn loaded(body: Value) -> Picker {
        let mut picker = Picker::new(config());
        let effects = picker.update(Msg::Mount);
        let Effect::ScheduleTimer { token, .. } = effects[1] else {
            panic!("expected open timer, got {effects:?}");
        };
        let effects = picker.update(Msg::TimerElapsed { kind: TimerKind::Open, token });
        let Effect::Fetch { url, generation } = effects[0].clone() else {
            panic!("expected fetch, got {effects:?}");
        };
        picker.update(Msg::NavigationCompleted {
            generation,
            url,
            result: Ok(response(body)),
        });
        picker
    }

    fn two_widgets() -> Value {
        json!({
            "count": 25,
            "next": null,
            "previous": null,
            "page": 1,
            "results": [
                {"uuid": "a", "title": "Alpha"},
                {"uuid": "b", "title": "Beta"}
            ]
        })
    }

    fn fetch_url(effects: &[Effect]) -> Option<&str> {
        effects.iter().find_map(|effect| match effect {
            Effect::Fetch { url, .. } => Some(url.as_str()),
            _ => None,
        })
    }

    #[test]
    fn mount_locks_viewport_and_delays_first_request() {
        let mut picker = Picker::new(config());
        assert!(picker.state().loading);

        let effects = picker.update(Msg::Mount);
        assert_eq!(effects[0], Effect::LockViewport);
        assert!(matches!(
            effects[1],
            Effect::ScheduleTimer { kind: TimerKind::Open, delay, .. } if delay == DEFAULT_OPEN_DELAY
        ));
        assert_eq!(picker.phase(), Phase::Opening);
        assert!(picker.state().visible);

        assert!(picker.update(Msg::Mount).is_empty());
    }

    #[test]
    fn initial_request_uses_default_url_with_filters() {
        let mut picker = Picker::new(config());
        picker.update(Msg::Mount);
        let effects = picker.update(Msg::OpenTransitionFinished);
        assert_eq!(fetch_url(&effects), Some("/api/widgets/?page_size=10&site=3"));
        assert_eq!(picker.phase(), Phase::Loading);
    }

    #[test]
    fn open_transition_and_open_timer_start_only_one_request() {
        let mut picker = Picker::new(config());
        let effects = picker.update(Msg::Mount);
        let Effect::ScheduleTimer { token, .. } = effects[1] else {
            panic!("expected open timer");
        };
        assert_eq!(picker.update(Msg::OpenTransitionFinished).len(), 1);
        assert!(picker.update(Msg::TimerElapsed { kind: TimerKind::Open, token }).is_empty());
    }

    #[test]
    fn successful_navigation_replaces_page_and_resets_scroll() {
        let picker = loaded(two_widgets());
        let state = picker.state();
        assert_eq!(state.phase, Phase::Loaded);
        assert!(!state.loading);
        assert_eq!(state.page.num_pages, 3);
        assert_eq!(state.page.items.len(), 2);
        assert_eq!(state.scroll_epoch, 1);
        assert_eq!(picker.rows(), vec![vec!["Alpha".to_string()], vec!["Beta".to_string()]]);
    }

    #[test]
    fn failed_navigation_only_clears_loading() {
        let mut picker = loaded(two_widgets());
        let effects = picker.update(Msg::NavigateNext);
        let Effect::Fetch { url, generation } = effects[0].clone() else {
            panic!("expected fetch");
        };
        assert!(picker.state().loading);

        let effects = picker.update(Msg::NavigationCompleted {
            generation,
            url,
            result: Err(RequestFailure {
                status: Some(500),
                message: "boom".into(),
            }),
        });
        assert!(effects.is_empty());
        assert!(!picker.state().loading);
        assert_eq!(picker.state().page.items.len(), 2);
        assert_eq!(picker.state().last_error.as_ref().and_then(|f| f.status), Some(500));
    }

    #[test]
    fn synthesized_pagination_carries_filters() {
        let mut picker = loaded(two_widgets());
        let effects = picker.update(Msg::NavigateNext);
        assert_eq!(fetch_url(&effects), Some("/api/widgets/?page_size=10&page=2&site=3"));
    }

    #[test]
    fn server_links_are_followed() {
        let mut picker = loaded(json!({
            "count": 25,
            "next": "/api/widgets/?page=2&page_size=10",
            "previous": null,
            "page": 1,
            "results": []
        }));
        let effects = picker.update(Msg::NavigateNext);
        assert_eq!(fetch_url(&effects), Some("/api/widgets/?page=2&page_size=10&site=3"));
        assert!(picker.can_go_next());
        assert!(!picker.can_go_previous());
    }

    #[test]
    fn previous_from_first_page_does_nothing() {
        let mut picker = loaded(two_widgets());
        let before = picker.state().generation;
        assert!(picker.update(Msg::NavigatePrevious).is_empty());
        assert_eq!(picker.state().generation, before);
        assert_eq!(picker.phase(), Phase::Loaded);
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut picker = loaded(two_widgets());
        let first = picker.update(Msg::Navigate("/api/widgets/?page=2".into()));
        let second = picker.update(Msg::Navigate("/api/widgets/?page=3".into()));
        let (Effect::Fetch { generation: old, url: old_url }, Effect::Fetch { generation: new, url: new_url }) =
            (first[0].clone(), second[0].clone())
        else {
            panic!("expected fetches");
        };

        picker.update(Msg::NavigationCompleted {
            generation: new,
            url: new_url,
            result: Ok(response(json!({"count": 30, "page": 3, "results": [{"uuid": "z"}]}))),
        });
        picker.update(Msg::NavigationCompleted {
            generation: old,
            url: old_url,
            result: Ok(response(json!({"count": 30, "page": 2, "results": [{"uuid": "y"}]}))),
        });

        assert_eq!(picker.state().page.current_page, 3);
        assert_eq!(picker.position_of(&json!("z")), Some(0));
    }

    #[test]
    fn select_closes_after_delay_with_item_and_source_url() {
        let mut picker = loaded(two_widgets());
        let effects = picker.update(Msg::Select(json!("b")));
        assert_eq!(effects[0], Effect::CancelPending);
        let Effect::ScheduleTimer { kind: TimerKind::Close, token, delay } = effects[1] else {
            panic!("expected close timer");
        };
        assert_eq!(delay, DEFAULT_CLOSE_DELAY);
        assert!(picker.state().exiting);
        assert_eq!(picker.phase(), Phase::Closing);

        let effects = picker.update(Msg::TimerElapsed { kind: TimerKind::Close, token });
        let Effect::Deliver(PickerOutcome::Selected { pk, item, source_url }) = &effects[0] else {
            panic!("expected selection, got {effects:?}");
        };
        assert_eq!(pk, &json!("b"));
        assert_eq!(item["title"], "Beta");
        assert_eq!(source_url.as_deref(), Some("/api/widgets/?page_size=10&site=3"));
        assert_eq!(effects[1], Effect::UnlockViewport);
        assert!(picker.is_closed());
    }

    #[test]
    fn unmatched_select_is_a_no_op() {
        let mut picker = loaded(two_widgets());
        assert!(picker.update(Msg::Select(json!("missing"))).is_empty());
        // Identity is JSON equality; a number never matches a string key.
        let mut numeric = loaded(json!({"count": 1, "results": [{"uuid": "1"}]}));
        assert!(numeric.update(Msg::Select(json!(1))).is_empty());
        assert_eq!(picker.phase(), Phase::Loaded);
        assert!(!picker.state().exiting);
    }

    #[test]
    fn only_the_first_close_request_counts() {
        let mut picker = loaded(two_widgets());
        let effects = picker.update(Msg::RequestClose(CloseEvent::Dismissed));
        let Effect::ScheduleTimer { token, .. } = effects[1] else {
            panic!("expected close timer");
        };
        assert!(picker.update(Msg::Select(json!("a"))).is_empty());
        assert!(picker.update(Msg::RequestClose(CloseEvent::Interrupted)).is_empty());
        assert!(picker.update(Msg::NavigateNext).is_empty());

        let effects = picker.update(Msg::TimerElapsed { kind: TimerKind::Close, token });
        assert_eq!(effects[0], Effect::Deliver(PickerOutcome::Closed(CloseEvent::Dismissed)));
        assert!(picker.update(Msg::TimerElapsed { kind: TimerKind::Close, token }).is_empty());
    }

    #[test]
    fn late_results_after_close_are_ignored() {
        let mut picker = loaded(two_widgets());
        let effects = picker.update(Msg::NavigateNext);
        let Effect::Fetch { url, generation } = effects[0].clone() else {
            panic!("expected fetch");
        };
        picker.update(Msg::RequestClose(CloseEvent::Dismissed));
        let effects = picker.update(Msg::NavigationCompleted {
            generation,
            url,
            result: Ok(response(json!({"count": 1, "results": [{"uuid": "late"}]}))),
        });
        assert!(effects.is_empty());
        assert_eq!(picker.position_of(&json!("late")), None);
    }

    #[test]
    fn search_results_replace_page_and_invalidate_navigation() {
        let mut picker = loaded(two_widgets());
        let effects = picker.update(Msg::NavigateNext);
        let Effect::Fetch { url, generation } = effects[0].clone() else {
            panic!("expected fetch");
        };

        picker.update(Msg::SearchStarted { search: 1 });
        assert!(picker.state().search_loading);

        let found = searched_page();
        let effects = picker.update(Msg::SearchResultsLoaded {
            search: 1,
            url: Some("/api/widgets/?page_size=10&search=sea&site=3".into()),
            page: found,
        });
        assert_eq!(effects, vec![Effect::ResetScroll]);
        assert!(!picker.state().search_loading);

        picker.update(Msg::NavigationCompleted {
            generation,
            url,
            result: Ok(response(two_widgets())),
        });
        assert_eq!(picker.rows(), vec![vec!["Searched".to_string()]]);
        assert_eq!(picker.count_label(), "1 Result");
    }

    fn searched_page() -> PageResult {
        PageResult {
            count: 1,
            num_pages: 1,
            current_page: 1,
            items: vec![json!({"uuid": "s", "title": "Searched"}).as_object().cloned().expect("object")],
            ..PageResult::default()
        }
    }

    #[test]
    fn navigation_issued_after_search_wins() {
        let mut picker = loaded(two_widgets());
        picker.update(Msg::SearchStarted { search: 1 });
        let effects = picker.update(Msg::NavigateNext);
        let Effect::Fetch { url, generation } = effects[0].clone() else {
            panic!("expected fetch");
        };
        assert!(!picker.state().search_loading);

        let effects = picker.update(Msg::SearchResultsLoaded {
            search: 1,
            url: Some("/api/widgets/?page_size=10&search=sea&site=3".into()),
            page: searched_page(),
        });
        assert!(effects.is_empty());
        assert!(picker.state().loading);

        picker.update(Msg::NavigationCompleted {
            generation,
            url,
            result: Ok(response(json!({
                "count": 25,
                "page": 2,
                "results": [{"uuid": "c", "title": "Gamma"}]
            }))),
        });
        assert_eq!(picker.state().page.current_page, 2);
        assert_eq!(picker.rows(), vec![vec!["Gamma".to_string()]]);
        assert_eq!(picker.state().last_request_url.as_deref(), Some("/api/widgets/?page_size=10&page=2&site=3"));
    }

    #[test]
    fn only_the_newest_search_is_adopted() {
        let mut picker = loaded(two_widgets());
        picker.update(Msg::SearchStarted { search: 1 });
        picker.update(Msg::SearchStarted { search: 2 });

        let stale = picker.update(Msg::SearchResultsLoaded {
            search: 1,
            url: None,
            page: searched_page(),
        });
        assert!(stale.is_empty());
        assert!(picker.state().search_loading);
        assert_eq!(picker.rows().len(), 2);

        let fresh = picker.update(Msg::SearchResultsLoaded {
            search: 2,
            url: None,
            page: searched_page(),
        });
        assert_eq!(fresh, vec![Effect::ResetScroll]);
        assert_eq!(picker.rows(), vec![vec!["Searched".to_string()]]);
    }

    #[test]
    fn failed_search_stops_loading() {
        let mut picker = loaded(two_widgets());
        picker.update(Msg::SearchCleared);
        picker.update(Msg::SearchStarted { search: 4 });
        assert_eq!(picker.placeholder().as_deref(), Some("Loading"));

        let effects = picker.update(Msg::SearchFailed {
            search: 4,
            failure: RequestFailure {
                status: Some(500),
                message: "boom".into(),
            },
        });
        assert!(effects.is_empty());
        assert!(!picker.state().search_loading);
        assert!(!picker.state().loading);
        assert_eq!(picker.phase(), Phase::Loaded);
        assert_eq!(picker.state().last_error.as_ref().and_then(|f| f.status), Some(500));
        assert_eq!(picker.placeholder().as_deref(), Some("Sorry, no results"));

        // A failure for a search nobody waits for changes nothing.
        let before = picker.state().last_error.clone();
        picker.update(Msg::SearchFailed {
            search: 3,
            failure: RequestFailure {
                status: None,
                message: "late".into(),
            },
        });
        assert_eq!(picker.state().last_error, before);
    }

    #[test]
    fn clearing_search_reloads_default_page() {
        let mut picker = loaded(two_widgets());
        let effects = picker.update(Msg::SearchCleared);
        assert!(picker.suggestions().is_empty());
        assert_eq!(picker.state().page.count, 0);
        assert_eq!(fetch_url(&effects), Some("/api/widgets/?page_size=10&site=3"));
        assert_eq!(picker.placeholder().as_deref(), Some("Loading"));
    }

    #[test]
    fn labels_use_translations() {
        let mut config = config();
        config.translations.insert("results".into(), "Treffer".into());
        config.translations.insert("choose".into(), "Wähle".into());
        let mut picker = Picker::new(config);
        assert_eq!(picker.heading(), "Wähle Widget");
        assert_eq!(picker.count_label(), "0 Treffer");
        assert_eq!(picker.placeholder().as_deref(), Some("Loading"));

        picker.update(Msg::Mount);
        let effects = picker.update(Msg::OpenTransitionFinished);
        let Effect::Fetch { url, generation } = effects[0].clone() else {
            panic!("expected fetch");
        };
        picker.update(Msg::NavigationCompleted {
            generation,
            url,
            result: Ok(response(json!({"count": 0, "results": []}))),
        });
        assert_eq!(picker.placeholder().as_deref(), Some("Sorry, no results"));
        assert_eq!(picker.page_label(), "1 / 0 Pages");
    }

    #[test]
    fn create_record_requires_a_url() {
        let mut picker = loaded(two_widgets());
        assert!(picker.update(Msg::OpenCreateRecord).is_empty());

        let mut config = config();
        config.create_endpoint = Some("/admin/widgets/add/".into());
        let mut picker = Picker::new(config);
        picker.update(Msg::Mount);
        assert_eq!(
            picker.update(Msg::OpenCreateRecord),
            vec![Effect::OpenCreateRecord("/admin/widgets/add/".into())]
        );
    }
}
