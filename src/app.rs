//! Application State
//!
//! Central application state for cloudcate: the query being edited, its
//! location mirror, the search controller, and table navigation.

use crate::api::{format_search_error, SearchClient};
use crate::config::Config;
use crate::location::{HistoryLocation, Location, LocationSync};
use crate::query::{is_dispatchable, selector_choices, SearchQuery, SelectorChoice};
use crate::resource::{ResourceRecord, SearchResult};
use crate::search::{spawn_search, SearchController, SearchMessage, SearchRequest};
use crossterm::event::KeyCode;
use std::ops::Range;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

// =========================================================================
// Configuration Constants
// =========================================================================

/// Default viewport height (will be updated during render based on terminal size)
const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Frames of the loading spinner
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Application modes
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,     // Editing the query or browsing results
    TypePicker, // Resource type popup
    Help,       // ? help popup
    Details,    // Fields of the selected row
}

/// Which part of the normal view receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Term,
    Results,
}

/// Main application state
pub struct App {
    pub client: SearchClient,

    // Query and its location mirror
    pub query: SearchQuery,
    pub location: HistoryLocation,
    location_sync: LocationSync,

    // Search lifecycle
    pub controller: SearchController,
    tx: UnboundedSender<SearchMessage>,
    rx: UnboundedReceiver<SearchMessage>,

    // Navigation state
    pub mode: Mode,
    pub focus: Focus,
    pub selected: usize,

    // Type picker
    pub picker_choices: Vec<SelectorChoice>,
    pub picker_selected: usize,

    // UI state
    pub details_scroll: usize,
    pub tick: usize,

    // Key press tracking
    pub last_key_press: Option<(KeyCode, std::time::Instant)>,

    // Persistent configuration
    pub config: Config,

    // Virtual scrolling
    pub viewport_height: usize,
    pub scroll_offset: usize,
}

impl App {
    /// Create the app, seeding the query from the location once
    pub fn new(client: SearchClient, location: HistoryLocation, config: Config) -> Self {
        let (location_sync, query) = LocationSync::init(&location);
        let (tx, rx) = unbounded_channel();

        Self {
            client,
            query,
            location,
            location_sync,
            controller: SearchController::new(),
            tx,
            rx,
            mode: Mode::Normal,
            focus: Focus::Term,
            selected: 0,
            picker_choices: selector_choices(),
            picker_selected: 0,
            details_scroll: 0,
            tick: 0,
            last_key_press: None,
            config,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            scroll_offset: 0,
        }
    }

    // =========================================================================
    // Query Editing
    // =========================================================================

    pub fn push_term_char(&mut self, c: char) {
        self.query.term.push(c);
        self.sync_location();
    }

    pub fn pop_term_char(&mut self) {
        if self.query.term.pop().is_some() {
            self.sync_location();
        }
    }

    pub fn clear_term(&mut self) {
        if !self.query.term.is_empty() {
            self.query.term.clear();
            self.sync_location();
        }
    }

    /// Apply a picker value (`type` or `type:subtype`, "" for any type)
    pub fn set_selector(&mut self, value: &str) {
        if value.is_empty() {
            self.query.clear_selector();
        } else {
            self.query.set_selector(value);
        }
        self.sync_location();
    }

    /// Replace the whole query (e.g. from command line flags)
    pub fn set_query(&mut self, query: SearchQuery) {
        self.query = query;
        self.sync_location();
    }

    fn sync_location(&mut self) {
        if self
            .location_sync
            .on_local_change(&mut self.location, &self.query)
        {
            tracing::debug!("Location updated: {}", self.location.href());
        }
    }

    // =========================================================================
    // Location History
    // =========================================================================

    pub fn navigate_back(&mut self) -> bool {
        if !self.location.back() {
            return false;
        }
        self.query = self.location_sync.on_navigation(&self.location);
        true
    }

    /// Adopt a pasted link as an external navigation
    pub fn open_location(&mut self, href: &str) -> anyhow::Result<()> {
        self.location.navigate(href)?;
        self.query = self.location_sync.on_navigation(&self.location);
        Ok(())
    }

    /// Pasted text: links navigate, anything else is typed into the term
    pub fn paste(&mut self, text: &str) {
        let text = text.trim();
        if text.starts_with("http://") || text.starts_with("https://") {
            if let Err(e) = self.open_location(text) {
                tracing::warn!("Ignoring pasted link: {:#}", e);
            }
            return;
        }
        let line = text.lines().next().unwrap_or_default();
        if !line.is_empty() {
            self.query.term.push_str(line);
            self.sync_location();
        }
    }

    pub fn navigate_forward(&mut self) -> bool {
        if !self.location.forward() {
            return false;
        }
        self.query = self.location_sync.on_navigation(&self.location);
        true
    }

    /// Label of the currently selected type filter
    pub fn selector_label(&self) -> String {
        let value = self.query.selector();
        if value.is_empty() {
            return "Any type".to_string();
        }
        match crate::query::codec::label_for(&value) {
            Some(label) => label.to_string(),
            None => format!("{} (unrecognized)", value),
        }
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Whether the search trigger is live
    pub fn can_search(&self) -> bool {
        is_dispatchable(&self.query.term)
    }

    /// Dispatch the current query through the controller
    pub fn submit_search(&mut self) -> Option<SearchRequest> {
        let request = self.controller.dispatch(&self.query)?;
        self.selected = 0;
        self.scroll_offset = 0;
        Some(request)
    }

    /// Dispatch and run the round trip in the background
    pub fn start_search(&mut self) {
        if let Some(request) = self.submit_search() {
            spawn_search(self.client.clone(), request, self.tx.clone());
        }
    }

    /// Apply a round trip outcome
    pub fn apply_message(&mut self, message: SearchMessage) {
        if self.controller.handle(message) {
            self.selected = 0;
            self.scroll_offset = 0;
            if self.result_count() == 0 {
                self.focus = Focus::Term;
            }
        }
    }

    /// Apply every outcome that has arrived. Returns whether any did.
    pub fn drain_messages(&mut self) -> bool {
        let mut received = false;
        while let Ok(message) = self.rx.try_recv() {
            self.apply_message(message);
            received = true;
        }
        received
    }

    pub fn error_message(&self) -> Option<String> {
        self.controller.last_error().map(format_search_error)
    }

    pub fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()]
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    // =========================================================================
    // Result Access
    // =========================================================================

    pub fn results(&self) -> &[SearchResult] {
        self.controller.results().rows()
    }

    pub fn result_count(&self) -> usize {
        self.results().len()
    }

    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.results().get(self.selected)
    }

    pub fn selected_record(&self) -> Option<ResourceRecord> {
        self.selected_result().map(ResourceRecord::classify)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn next(&mut self) {
        let count = self.result_count();
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
        }
    }

    pub fn previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn go_to_top(&mut self) {
        self.selected = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.selected = self.result_count().saturating_sub(1);
    }

    pub fn page_down(&mut self, page_size: usize) {
        let count = self.result_count();
        if count > 0 {
            self.selected = (self.selected + page_size).min(count - 1);
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
    }

    pub fn focus_results(&mut self) {
        if self.result_count() > 0 {
            self.focus = Focus::Results;
        }
    }

    pub fn focus_term(&mut self) {
        self.focus = Focus::Term;
    }

    // =========================================================================
    // Modes
    // =========================================================================

    pub fn enter_help_mode(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn enter_details_mode(&mut self) {
        if self.selected_result().is_some() {
            self.details_scroll = 0;
            self.mode = Mode::Details;
        }
    }

    /// Open the type picker with the current filter highlighted.
    /// Index 0 is "any type".
    pub fn enter_type_picker(&mut self) {
        let current = self.query.selector();
        self.picker_selected = self
            .picker_choices
            .iter()
            .position(|c| c.value == current)
            .map(|i| i + 1)
            .unwrap_or(0);
        self.mode = Mode::TypePicker;
    }

    pub fn picker_next(&mut self) {
        self.picker_selected = (self.picker_selected + 1).min(self.picker_choices.len());
    }

    pub fn picker_previous(&mut self) {
        self.picker_selected = self.picker_selected.saturating_sub(1);
    }

    pub fn apply_picker(&mut self) {
        let value = match self.picker_selected {
            0 => String::new(),
            i => self
                .picker_choices
                .get(i - 1)
                .map(|c| c.value.clone())
                .unwrap_or_default(),
        };
        self.set_selector(&value);
        self.mode = Mode::Normal;
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
    }

    // =========================================================================
    // Virtual Scrolling
    // =========================================================================

    /// Update the viewport height (called from UI during render)
    pub fn update_viewport(&mut self, height: usize) {
        self.viewport_height = height.max(1);
    }

    /// Ensure the selected item is visible in the viewport
    pub fn ensure_visible(&mut self) {
        let count = self.result_count();
        if count == 0 {
            self.scroll_offset = 0;
            return;
        }

        let visible_height = self.viewport_height;
        let margin = 2;

        if self.selected < self.scroll_offset + margin {
            self.scroll_offset = self.selected.saturating_sub(margin);
        } else if self.selected >= self.scroll_offset + visible_height.saturating_sub(margin) {
            self.scroll_offset = self
                .selected
                .saturating_sub(visible_height.saturating_sub(margin + 1));
        }

        let max_offset = count.saturating_sub(self.viewport_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Get the range of visible rows based on scroll offset and viewport
    pub fn visible_range(&self) -> Range<usize> {
        let count = self.result_count();
        let start = self.scroll_offset.min(count);
        let end = (self.scroll_offset + self.viewport_height).min(count);
        start..end
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Remember the current location for the next start
    pub fn save_location(&mut self) {
        let href = self.location.href().to_string();
        if let Err(e) = self.config.set_last_location(&href) {
            tracing::warn!("Failed to save location to config: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResultSet;
    use std::time::Duration;

    fn app_at(href: &str) -> App {
        let client = SearchClient::new("http://localhost:8080", Duration::from_secs(5)).unwrap();
        let location = HistoryLocation::parse(href).unwrap();
        App::new(client, location, Config::default())
    }

    fn rows(n: usize) -> ResultSet {
        ResultSet::Rows(
            (0..n)
                .map(|i| SearchResult::from_pairs([("BucketName", format!("b{}", i))]))
                .collect(),
        )
    }

    fn complete(app: &mut App, results: ResultSet) {
        let request = app.submit_search().unwrap();
        app.apply_message(SearchMessage::ResponseReceived {
            token: request.token,
            results,
        });
    }

    #[test]
    fn test_query_seeded_from_location() {
        let app = app_at("http://localhost:8080/?q=i-1234&type=iam&subtype=key");
        assert_eq!(app.query, SearchQuery::new("i-1234", "iam", "key"));
        assert_eq!(app.selector_label(), "IAM (Access Key)");
        assert_eq!(app.location.len(), 1);
    }

    #[test]
    fn test_typing_mirrors_into_location() {
        let mut app = app_at("http://localhost:8080/");
        app.push_term_char('a');
        app.push_term_char('b');
        assert_eq!(app.location.href(), "http://localhost:8080/?q=ab");

        app.set_selector("s3");
        assert_eq!(app.location.href(), "http://localhost:8080/?q=ab&type=s3");
    }

    #[test]
    fn test_back_restores_query_without_new_entry() {
        let mut app = app_at("http://localhost:8080/");
        app.push_term_char('a');
        app.push_term_char('b');
        let entries = app.location.len();

        assert!(app.navigate_back());
        assert_eq!(app.query.term, "a");
        assert_eq!(app.location.len(), entries);

        assert!(app.navigate_forward());
        assert_eq!(app.query.term, "ab");
        assert!(!app.navigate_forward());
    }

    #[test]
    fn test_blank_term_cannot_search() {
        let mut app = app_at("http://localhost:8080/?q=%20%20");
        assert!(!app.can_search());
        assert!(app.submit_search().is_none());
        assert!(!app.controller.is_loading());
    }

    #[test]
    fn test_results_reset_selection() {
        let mut app = app_at("http://localhost:8080/?q=b");
        complete(&mut app, rows(5));
        app.focus_results();
        app.go_to_bottom();
        assert_eq!(app.selected, 4);
        assert_eq!(app.focus, Focus::Results);

        complete(&mut app, rows(2));
        assert_eq!(app.selected, 0);
        assert_eq!(app.result_count(), 2);
    }

    #[test]
    fn test_empty_results_return_focus_to_term() {
        let mut app = app_at("http://localhost:8080/?q=b");
        complete(&mut app, rows(3));
        app.focus_results();
        complete(&mut app, rows(0));
        assert_eq!(app.focus, Focus::Term);
    }

    #[test]
    fn test_navigation_bounds() {
        let mut app = app_at("http://localhost:8080/?q=b");
        complete(&mut app, rows(3));
        app.previous();
        assert_eq!(app.selected, 0);
        app.page_down(10);
        assert_eq!(app.selected, 2);
        app.next();
        assert_eq!(app.selected, 2);
        app.page_up(10);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_visible_range_scrolled() {
        let mut app = app_at("http://localhost:8080/?q=b");
        complete(&mut app, rows(100));
        app.update_viewport(10);
        app.selected = 50;
        app.ensure_visible();
        let range = app.visible_range();
        assert!(range.contains(&50));
        assert_eq!(range.len(), 10);
    }

    #[test]
    fn test_picker_selects_identity_subtype() {
        let mut app = app_at("http://localhost:8080/?q=alice");
        app.enter_type_picker();
        assert_eq!(app.picker_selected, 0);

        let index = app
            .picker_choices
            .iter()
            .position(|c| c.value == "iam:user")
            .unwrap();
        app.picker_selected = index + 1;
        app.apply_picker();

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.query.resource_type, "iam");
        assert_eq!(app.query.subtype, "user");
        assert!(app.location.href().ends_with("type=iam&subtype=user"));

        app.enter_type_picker();
        assert_eq!(app.picker_selected, index + 1);
        app.picker_selected = 0;
        app.apply_picker();
        assert_eq!(app.query.selector(), "");
    }

    #[test]
    fn test_details_requires_selection() {
        let mut app = app_at("http://localhost:8080/?q=b");
        app.enter_details_mode();
        assert_eq!(app.mode, Mode::Normal);

        complete(&mut app, rows(1));
        app.enter_details_mode();
        assert_eq!(app.mode, Mode::Details);
        assert_eq!(
            app.selected_record().and_then(|r| r.identifier().map(str::to_string)),
            Some("b0".to_string())
        );
    }

    #[test]
    fn test_pasted_link_navigates_without_echo() {
        let mut app = app_at("http://localhost:8080/");
        app.paste("http://localhost:8080/?q=web&type=iam&subtype=key\n");
        assert_eq!(app.query, SearchQuery::new("web", "iam", "key"));
        assert_eq!(app.location.len(), 2);

        app.paste("01");
        assert_eq!(app.query.term, "web01");
        assert_eq!(app.location.href(), "http://localhost:8080/?q=web01&type=iam&subtype=key");
    }
}
