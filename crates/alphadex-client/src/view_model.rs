#![forbid(unsafe_code)]

//! The name browsing view model.
//!
//! Two inputs feed one effective prefix: the alphabet bar and the free-text
//! field. Setting either clears the other. Every change of the effective
//! prefix bumps a sequence number and, if the prefix is non-empty, issues one
//! fetch tagged with it. A completion is applied only if its tag is still the
//! latest, so responses arriving out of order never overwrite newer state.
//!
//! # Phases
//!
//! ```text
//! Idle ──input──▶ Loading ──Ok──▶ Loaded
//!   ▲                │  └──Err──▶ Failed
//!   └──empty input───┘
//! ```
//!
//! `Failed` is left only by the next input; nothing retries on its own.

use std::sync::Arc;

use alphadex_core::{Prefix, ResultPage};
use alphadex_runtime::{Cmd, Frame, Model};
use alphadex_widgets::{AlphabetBar, TextInput, VirtualizedList, VirtualizedListState};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::transport::{FetchError, QueryClient};

const TITLE: &str = "User List";
const FILTER_LABEL: &str = "Filter: ";
const LOADING_TEXT: &str = "Loading...";
const EMPTY_TEXT: &str = "No users found.";

/// Lines above the list: title, alphabet bar, filter input, status.
pub const HEADER_ROWS: u16 = 4;
/// Frame line holding the alphabet bar.
pub const ALPHABET_ROW: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No prefix yet, nothing fetched.
    Idle,
    Loading,
    Loaded,
    /// Last fetch failed; the list is empty.
    Failed,
}

#[derive(Debug)]
pub enum FilterMsg {
    /// Alphabet selector clicked.
    SelectLetter(char),
    /// Free-text field changed to this value.
    SetFilterText(String),
    /// A character typed into the free-text field.
    InsertChar(char),
    Backspace,
    /// Pointer press on the alphabet bar at column `x`.
    ClickAlphabet(u16),
    /// A fetch tagged `seq` completed.
    Fetched {
        seq: u64,
        result: Result<ResultPage, FetchError>,
    },
    /// Scroll the list by this many units, positive is down.
    Scroll(i64),
    PageUp,
    PageDown,
    /// The terminal is now `width` x `height` cells.
    Resize { width: u16, height: u16 },
}

/// What the user sees, minus geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub effective_prefix: String,
    pub current_page: Arc<ResultPage>,
    pub loading: bool,
}

pub struct FilterViewModel {
    client: Arc<dyn QueryClient>,
    letter: Option<char>,
    input: TextInput,
    phase: Phase,
    page: Arc<ResultPage>,
    list: VirtualizedListState,
    latest_seq: u64,
    last_error: Option<FetchError>,
    size: (u16, u16),
}

impl FilterViewModel {
    pub fn new(client: impl QueryClient + 'static) -> Self {
        Self::with_config(client, &ClientConfig::default())
    }

    /// Build a model using the list geometry from `config`.
    pub fn with_config(client: impl QueryClient + 'static, config: &ClientConfig) -> Self {
        Self {
            client: Arc::new(client),
            letter: None,
            input: TextInput::new().with_placeholder("type a prefix"),
            phase: Phase::Idle,
            page: Arc::new(ResultPage::empty()),
            list: VirtualizedListState::new()
                .with_viewport_height(config.viewport_height)
                .with_row_height(config.row_height)
                .with_overscan(config.overscan),
            latest_seq: 0,
            last_error: None,
            size: (0, 0),
        }
    }

    /// Free text wins when non-empty, then the selected letter, else empty.
    #[must_use]
    pub fn effective_prefix(&self) -> String {
        if !self.input.is_empty() {
            return self.input.value().to_string();
        }
        self.letter.map(String::from).unwrap_or_default()
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        ViewState {
            effective_prefix: self.effective_prefix(),
            current_page: Arc::clone(&self.page),
            loading: self.phase == Phase::Loading,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn selected_letter(&self) -> Option<char> {
        self.letter
    }

    #[must_use]
    pub fn filter_text(&self) -> &str {
        self.input.value()
    }

    #[must_use]
    pub fn page(&self) -> &Arc<ResultPage> {
        &self.page
    }

    #[must_use]
    pub fn list_state(&self) -> &VirtualizedListState {
        &self.list
    }

    /// Sequence number of the most recent input.
    #[must_use]
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    fn select_letter(&mut self, letter: char) -> Cmd<FilterMsg> {
        let letter = letter.to_ascii_uppercase();
        if !AlphabetBar::is_selector(letter) {
            return Cmd::none();
        }
        let previous = self.effective_prefix();
        self.letter = Some(letter);
        self.input.clear();
        self.refresh(&previous)
    }

    /// Apply an edit to the free-text field.
    ///
    /// Only an edit that changes the value deselects the letter; a backspace
    /// on an empty field or a dropped control character is a no-op.
    fn edit_text(&mut self, edit: impl FnOnce(&mut TextInput)) -> Cmd<FilterMsg> {
        let previous = self.effective_prefix();
        let before = self.input.value().to_string();
        edit(&mut self.input);
        if self.input.value() == before {
            return Cmd::none();
        }
        self.letter = None;
        self.refresh(&previous)
    }

    fn refresh(&mut self, previous: &str) -> Cmd<FilterMsg> {
        let effective = self.effective_prefix();
        if effective == previous && matches!(self.phase, Phase::Loading | Phase::Loaded) {
            debug!(prefix = %effective, "prefix unchanged, not refetching");
            return Cmd::none();
        }

        self.latest_seq += 1;
        let seq = self.latest_seq;
        let Ok(prefix) = Prefix::parse(&effective) else {
            self.phase = Phase::Idle;
            self.page = Arc::new(ResultPage::empty());
            self.list.clear_source();
            self.last_error = None;
            return Cmd::none();
        };

        self.phase = Phase::Loading;
        debug!(seq, prefix = %prefix, "issuing fetch");
        let client = Arc::clone(&self.client);
        Cmd::task_named(format!("fetch:{prefix}#{seq}"), move || {
            let result = client.fetch(&prefix);
            FilterMsg::Fetched { seq, result }
        })
    }

    fn apply_fetched(
        &mut self,
        seq: u64,
        result: Result<ResultPage, FetchError>,
    ) -> Cmd<FilterMsg> {
        if seq != self.latest_seq {
            debug!(seq, latest = self.latest_seq, "discarding stale response");
            return Cmd::none();
        }
        match result {
            Ok(page) => {
                self.page = Arc::new(page);
                self.list.sync_source(&self.page);
                self.phase = Phase::Loaded;
                self.last_error = None;
                Cmd::none()
            }
            Err(err) => {
                let prefix = self.effective_prefix();
                warn!(seq, prefix = %prefix, error = %err, "fetch failed");
                self.page = Arc::new(ResultPage::empty());
                self.list.clear_source();
                self.phase = Phase::Failed;
                let line = format!("error fetching {prefix:?}: {err}");
                self.last_error = Some(err);
                Cmd::log(line)
            }
        }
    }

    fn status_line(&self) -> String {
        match (&self.phase, &self.last_error) {
            (Phase::Failed, Some(err)) => format!("Error: {err}"),
            (Phase::Loaded, _) => format!("{} shown", self.page.len()),
            _ => String::new(),
        }
    }
}

impl Model for FilterViewModel {
    type Message = FilterMsg;

    fn update(&mut self, msg: FilterMsg) -> Cmd<FilterMsg> {
        match msg {
            FilterMsg::SelectLetter(letter) => self.select_letter(letter),
            FilterMsg::ClickAlphabet(x) => match AlphabetBar::letter_at(x) {
                Some(letter) => Cmd::msg(FilterMsg::SelectLetter(letter)),
                None => Cmd::none(),
            },
            FilterMsg::SetFilterText(text) => self.edit_text(|input| input.set_value(&text)),
            FilterMsg::InsertChar(c) => self.edit_text(|input| input.insert_char(c)),
            FilterMsg::Backspace => self.edit_text(|input| {
                input.backspace();
            }),
            FilterMsg::Fetched { seq, result } => self.apply_fetched(seq, result),
            FilterMsg::Scroll(delta) => {
                self.list.scroll(delta);
                Cmd::none()
            }
            FilterMsg::PageUp => {
                self.list.page_up();
                Cmd::none()
            }
            FilterMsg::PageDown => {
                self.list.page_down();
                Cmd::none()
            }
            FilterMsg::Resize { width, height } => {
                self.size = (width, height);
                let lines = u32::from(height.saturating_sub(HEADER_ROWS));
                self.list
                    .set_viewport_height(lines.saturating_mul(self.list.row_height()));
                Cmd::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame) {
        frame.set_row(0, TITLE);
        AlphabetBar::new(self.letter).render(frame, ALPHABET_ROW);
        self.input.render(frame, 2, FILTER_LABEL);
        frame.set_row(3, &self.status_line());

        let body_height = frame.height().saturating_sub(HEADER_ROWS);
        if body_height == 0 {
            return;
        }
        if self.phase == Phase::Loading {
            frame.set_row(HEADER_ROWS, LOADING_TEXT);
        } else if self.page.is_empty() {
            frame.set_row(HEADER_ROWS, EMPTY_TEXT);
        } else {
            VirtualizedList::new().render(frame, HEADER_ROWS, body_height, &self.list);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alphadex_core::NameStore;
    use alphadex_runtime::ProgramSimulator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::transport::InProcessClient;

    fn names() -> Arc<NameStore> {
        let mut lines = vec![
            "alice".to_string(),
            "albert".to_string(),
            "bob".to_string(),
            "bella".to_string(),
        ];
        lines.extend((0..40).map(|i| format!("carl{i}")));
        Arc::new(NameStore::from_lines(lines))
    }

    fn sim() -> ProgramSimulator<FilterViewModel> {
        ProgramSimulator::new(FilterViewModel::new(InProcessClient::new(names())))
    }

    fn page_names(model: &FilterViewModel) -> Vec<String> {
        model.page().iter().map(|n| n.as_str().to_string()).collect()
    }

    struct Failing;

    impl QueryClient for Failing {
        fn fetch(&self, _prefix: &Prefix) -> Result<ResultPage, FetchError> {
            Err(FetchError::Timeout)
        }
    }

    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    impl QueryClient for Counting {
        fn fetch(&self, _prefix: &Prefix) -> Result<ResultPage, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ResultPage::empty())
        }
    }

    #[test]
    fn test_starts_idle_without_fetching() {
        let mut sim = ProgramSimulator::with_deferred_tasks(FilterViewModel::new(
            InProcessClient::new(names()),
        ));
        sim.init();
        assert_eq!(sim.pending_tasks(), 0);
        assert_eq!(sim.model().phase(), Phase::Idle);
        assert!(sim.model().page().is_empty());
    }

    #[test]
    fn test_select_letter_loads_matches() {
        let mut sim = sim();
        sim.send(FilterMsg::SelectLetter('A'));
        assert_eq!(sim.model().phase(), Phase::Loaded);
        assert_eq!(page_names(sim.model()), ["ALICE", "ALBERT"]);
    }

    #[test]
    fn test_lowercase_letter_is_normalized() {
        let mut sim = sim();
        sim.send(FilterMsg::SelectLetter('b'));
        assert_eq!(sim.model().selected_letter(), Some('B'));
        assert_eq!(page_names(sim.model()), ["BOB", "BELLA"]);
    }

    #[test]
    fn test_non_letter_selection_ignored() {
        let mut sim = sim();
        sim.send(FilterMsg::SelectLetter('7'));
        assert_eq!(sim.model().selected_letter(), None);
        assert_eq!(sim.model().latest_seq(), 0);
    }

    #[test]
    fn test_filter_text_clears_letter_and_back() {
        let mut sim = sim();
        sim.send(FilterMsg::SelectLetter('A'));
        sim.send(FilterMsg::SetFilterText("bo".into()));
        assert_eq!(sim.model().selected_letter(), None);
        assert_eq!(sim.model().effective_prefix(), "BO");
        assert_eq!(page_names(sim.model()), ["BOB"]);

        sim.send(FilterMsg::SelectLetter('C'));
        assert_eq!(sim.model().filter_text(), "");
        assert_eq!(sim.model().effective_prefix(), "C");
        assert_eq!(sim.model().page().len(), 40);
    }

    #[test]
    fn test_clearing_text_returns_to_idle() {
        let mut sim = sim();
        sim.send(FilterMsg::SetFilterText("al".into()));
        assert_eq!(sim.model().phase(), Phase::Loaded);
        let seq = sim.model().latest_seq();

        sim.send(FilterMsg::SetFilterText(String::new()));
        assert_eq!(sim.model().phase(), Phase::Idle);
        assert!(sim.model().page().is_empty());
        assert_eq!(sim.model().latest_seq(), seq + 1);
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut sim = ProgramSimulator::with_deferred_tasks(FilterViewModel::new(
            InProcessClient::new(names()),
        ));
        sim.send(FilterMsg::SelectLetter('A'));
        sim.send(FilterMsg::SelectLetter('B'));
        assert_eq!(sim.pending_tasks(), 2);

        // B completes first, then the older A response arrives.
        assert!(sim.complete_task(1));
        assert_eq!(page_names(sim.model()), ["BOB", "BELLA"]);
        assert!(sim.complete_task(0));
        assert_eq!(page_names(sim.model()), ["BOB", "BELLA"]);
        assert_eq!(sim.model().effective_prefix(), "B");
        assert_eq!(sim.model().phase(), Phase::Loaded);
    }

    #[test]
    fn test_response_after_clear_discarded() {
        let mut sim = ProgramSimulator::with_deferred_tasks(FilterViewModel::new(
            InProcessClient::new(names()),
        ));
        sim.send(FilterMsg::SetFilterText("a".into()));
        sim.send(FilterMsg::SetFilterText(String::new()));
        sim.complete_all_tasks();
        assert_eq!(sim.model().phase(), Phase::Idle);
        assert!(sim.model().page().is_empty());
    }

    #[test]
    fn test_loading_while_pending() {
        let mut sim = ProgramSimulator::with_deferred_tasks(FilterViewModel::new(
            InProcessClient::new(names()),
        ));
        sim.send(FilterMsg::SelectLetter('A'));
        assert!(sim.model().view_state().loading);
        let frame = sim.capture_frame(80, 10);
        assert_eq!(frame.row(4), Some("Loading..."));
    }

    #[test]
    fn test_reselecting_letter_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut sim = ProgramSimulator::new(FilterViewModel::new(Counting {
            calls: Arc::clone(&calls),
        }));
        sim.send(FilterMsg::SelectLetter('A'));
        let once = sim.model().view_state();
        sim.send(FilterMsg::SelectLetter('A'));
        assert_eq!(sim.model().view_state(), once);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_clears_page_and_logs() {
        let mut sim = ProgramSimulator::new(FilterViewModel::new(Failing));
        sim.send(FilterMsg::SelectLetter('A'));
        assert_eq!(sim.model().phase(), Phase::Failed);
        assert!(sim.model().page().is_empty());
        assert_eq!(sim.model().last_error(), Some(&FetchError::Timeout));
        assert_eq!(sim.logs().len(), 1);
        assert!(sim.logs()[0].contains("timed out"));

        let frame = sim.capture_frame(80, 10);
        assert_eq!(frame.row(3), Some("Error: request timed out"));
        assert_eq!(frame.row(4), Some("No users found."));
    }

    #[test]
    fn test_failed_state_retries_on_same_letter() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut sim = ProgramSimulator::with_deferred_tasks(FilterViewModel::new(Counting {
            calls: Arc::clone(&calls),
        }));
        sim.send(FilterMsg::SelectLetter('A'));
        let seq = sim.model().latest_seq();
        sim.send(FilterMsg::Fetched {
            seq,
            result: Err(FetchError::Status(500)),
        });
        assert_eq!(sim.model().phase(), Phase::Failed);

        sim.send(FilterMsg::SelectLetter('A'));
        assert_eq!(sim.model().phase(), Phase::Loading);
        assert_eq!(sim.pending_tasks(), 2);
    }

    #[test]
    fn test_new_page_resets_scroll() {
        let mut sim = sim();
        sim.send(FilterMsg::SelectLetter('C'));
        sim.send(FilterMsg::Scroll(300));
        assert_eq!(sim.model().list_state().scroll_offset(), 300);

        sim.send(FilterMsg::SetFilterText("carl1".into()));
        assert_eq!(sim.model().list_state().scroll_offset(), 0);
    }

    #[test]
    fn test_typing_and_backspace_refetch() {
        let mut sim = sim();
        sim.send(FilterMsg::SelectLetter('B'));
        sim.send(FilterMsg::InsertChar('a'));
        assert_eq!(sim.model().selected_letter(), None);
        assert_eq!(sim.model().effective_prefix(), "A");
        assert_eq!(page_names(sim.model()), ["ALICE", "ALBERT"]);

        sim.send(FilterMsg::InsertChar('l'));
        sim.send(FilterMsg::InsertChar('i'));
        assert_eq!(page_names(sim.model()), ["ALICE"]);

        sim.send(FilterMsg::Backspace);
        assert_eq!(sim.model().filter_text(), "AL");
        assert_eq!(page_names(sim.model()), ["ALICE", "ALBERT"]);
    }

    #[test]
    fn test_unchanged_text_edit_keeps_letter() {
        let mut sim = sim();
        sim.send(FilterMsg::SelectLetter('B'));
        let seq = sim.model().latest_seq();

        sim.send(FilterMsg::Backspace);
        sim.send(FilterMsg::InsertChar('\u{7}'));
        sim.send(FilterMsg::SetFilterText(String::new()));

        assert_eq!(sim.model().selected_letter(), Some('B'));
        assert_eq!(sim.model().phase(), Phase::Loaded);
        assert_eq!(sim.model().latest_seq(), seq);
        assert_eq!(page_names(sim.model()), ["BOB", "BELLA"]);
    }

    #[test]
    fn test_loading_keeps_previous_page() {
        let mut sim = ProgramSimulator::with_deferred_tasks(FilterViewModel::new(
            InProcessClient::new(names()),
        ));
        sim.send(FilterMsg::SelectLetter('A'));
        assert!(sim.complete_task(0));
        let loaded = Arc::clone(sim.model().page());

        sim.send(FilterMsg::SelectLetter('B'));
        let state = sim.model().view_state();
        assert!(state.loading);
        assert_eq!(state.effective_prefix, "B");
        assert!(Arc::ptr_eq(&state.current_page, &loaded));
        assert_eq!(page_names(sim.model()), ["ALICE", "ALBERT"]);

        assert!(sim.complete_task(0));
        assert!(!sim.model().view_state().loading);
        assert_eq!(page_names(sim.model()), ["BOB", "BELLA"]);
    }

    #[test]
    fn test_click_alphabet_selects_letter() {
        let mut sim = sim();
        sim.send(FilterMsg::SetFilterText("al".into()));
        sim.send(FilterMsg::ClickAlphabet(4));
        assert_eq!(sim.model().selected_letter(), Some('B'));
        assert_eq!(sim.model().filter_text(), "");
        assert_eq!(page_names(sim.model()), ["BOB", "BELLA"]);

        let seq = sim.model().latest_seq();
        sim.send(FilterMsg::ClickAlphabet(200));
        assert_eq!(sim.model().latest_seq(), seq);
    }

    #[test]
    fn test_paging_moves_by_viewport() {
        let mut sim = sim();
        sim.send(FilterMsg::Resize {
            width: 80,
            height: 8,
        });
        sim.send(FilterMsg::SelectLetter('C'));
        sim.send(FilterMsg::PageDown);
        assert_eq!(sim.model().list_state().scroll_offset(), 120);
        sim.send(FilterMsg::PageUp);
        sim.send(FilterMsg::PageUp);
        assert_eq!(sim.model().list_state().scroll_offset(), 0);
    }

    #[test]
    fn test_resize_sets_viewport_from_rows() {
        let mut sim = sim();
        sim.send(FilterMsg::Resize {
            width: 80,
            height: 14,
        });
        assert_eq!(sim.model().size(), (80, 14));
        assert_eq!(sim.model().list_state().viewport_height(), 10 * 30);
    }

    #[test]
    fn test_view_renders_list_window() {
        let mut sim = sim();
        sim.send(FilterMsg::Resize {
            width: 80,
            height: 8,
        });
        sim.send(FilterMsg::SelectLetter('C'));
        sim.send(FilterMsg::Scroll(60));
        let frame = sim.capture_frame(80, 8);
        assert_eq!(frame.row(0), Some("User List"));
        assert!(frame.row(1).unwrap().contains("[C]"));
        assert_eq!(frame.row(2), Some("Filter: type a prefix"));
        assert_eq!(frame.row(3), Some("40 shown"));
        assert_eq!(frame.row(4), Some("CARL2"));
        assert_eq!(frame.row(7), Some("CARL5"));
    }
}
