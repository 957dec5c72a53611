//! Symbol search: a static catalog index plus the search box state around it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::engine::loader::{RequestTracker, Ticket};
use crate::errors::AppError;
use crate::models::config::SearchMode;
use crate::models::quote::SymbolEntry;
use crate::utils::events::{EventBus, Subscription};

const DEFAULT_SYMBOLS: [(&str, &str); 10] = [
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("AMZN", "Amazon.com Inc."),
    ("GOOGL", "Alphabet Inc."),
    ("META", "Meta Platforms Inc."),
    ("TSLA", "Tesla Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("JPM", "JPMorgan Chase & Co."),
    ("V", "Visa Inc."),
    ("JNJ", "Johnson & Johnson"),
];

/// Case-insensitive substring filter over `symbol` and `name`, in input order.
/// A blank query matches nothing. A non-blank query is matched as typed,
/// surrounding spaces included.
pub fn filter_entries<'a, I>(entries: I, query: &str) -> Vec<SymbolEntry>
where
    I: IntoIterator<Item = &'a SymbolEntry>,
{
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    entries
        .into_iter()
        .filter(|e| {
            e.symbol.to_lowercase().contains(&needle) || e.name.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Result of a catalog search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was blank: there is no active search.
    Inactive,
    /// An active search. May be empty.
    Matches(Vec<SymbolEntry>),
}

impl SearchOutcome {
    pub fn into_entries(self) -> Vec<SymbolEntry> {
        match self {
            SearchOutcome::Inactive => Vec::new(),
            SearchOutcome::Matches(entries) => entries,
        }
    }
}

/// Fixed, ordered symbol catalog. Symbols are unique; later duplicates are dropped.
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    entries: Vec<SymbolEntry>,
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        SymbolCatalog::new(
            DEFAULT_SYMBOLS
                .iter()
                .map(|(symbol, name)| SymbolEntry::new(*symbol, *name)),
        )
    }
}

impl SymbolCatalog {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = SymbolEntry>,
    {
        let mut unique: Vec<SymbolEntry> = Vec::new();
        for entry in entries {
            if unique.iter().any(|e| e.symbol == entry.symbol) {
                warn!("Duplicate catalog symbol {} ignored", entry.symbol);
                continue;
            }
            unique.push(entry);
        }
        SymbolCatalog { entries: unique }
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn search(&self, query: &str) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::Inactive;
        }
        SearchOutcome::Matches(filter_entries(&self.entries, query))
    }

    pub fn lookup(&self, symbol: &str) -> Option<&SymbolEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }
}

/// Where the view should go after a search interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NavigationTarget {
    Stock { symbol: String },
    SearchResults { query: String },
}

impl NavigationTarget {
    pub fn route(&self) -> String {
        match self {
            NavigationTarget::Stock { symbol } => format!("/stock/{}", symbol),
            NavigationTarget::SearchResults { .. } => "/search".to_string(),
        }
    }
}

/// A pointer press somewhere in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerDown {
    pub inside_search: bool,
}

/// Intents the search box understands.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    Input(String),
    Select(String),
    Submit,
    Dismiss,
}

/// What the caller has to do after applying an action.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEffect {
    None,
    Navigate(NavigationTarget),
    /// Remote mode: fetch results for the ticket's query and hand them to `finish_remote`.
    Fetch(Ticket<String>),
}

/// Serializable snapshot of the search box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchView {
    pub query: String,
    pub results: Vec<SymbolEntry>,
    pub loading: bool,
    pub show_results: bool,
    pub no_results: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Search box state.
///
/// While results are visible the box holds a pointer subscription that hides
/// them on a press outside the box. The subscription is dropped as soon as
/// the results are hidden, and with the box itself.
pub struct SearchBox {
    catalog: SymbolCatalog,
    mode: SearchMode,
    limit: usize,
    query: String,
    results: Vec<SymbolEntry>,
    active: bool,
    loading: bool,
    error: Option<String>,
    tracker: RequestTracker,
    visible: Arc<AtomicBool>,
    pointer: EventBus<PointerDown>,
    dismissal: Option<Subscription<PointerDown>>,
}

impl SearchBox {
    pub fn new(
        catalog: SymbolCatalog,
        mode: SearchMode,
        limit: usize,
        pointer: EventBus<PointerDown>,
    ) -> Self {
        SearchBox {
            catalog,
            mode,
            limit,
            query: String::new(),
            results: Vec::new(),
            active: false,
            loading: false,
            error: None,
            tracker: RequestTracker::default(),
            visible: Arc::new(AtomicBool::new(false)),
            pointer,
            dismissal: None,
        }
    }

    pub fn apply(&mut self, action: SearchAction) -> SearchEffect {
        let effect = match action {
            SearchAction::Input(query) => self.input(query),
            SearchAction::Select(symbol) => {
                self.clear();
                SearchEffect::Navigate(NavigationTarget::Stock { symbol })
            }
            SearchAction::Submit => self.submit(),
            SearchAction::Dismiss => {
                self.visible.store(false, Ordering::Relaxed);
                SearchEffect::None
            }
        };
        self.sync_dismissal();
        effect
    }

    /// Land remote results. Results for anything but the latest keystroke are ignored.
    pub fn finish_remote(
        &mut self,
        ticket: &Ticket<String>,
        result: Result<Vec<SymbolEntry>, AppError>,
    ) -> bool {
        if !self.tracker.is_current(ticket) {
            debug!("Ignoring search results for stale query '{}'", ticket.key());
            return false;
        }
        self.loading = false;
        match result {
            Ok(mut entries) => {
                entries.truncate(self.limit);
                self.results = entries;
                self.error = None;
            }
            Err(err) => {
                warn!("Symbol search failed for '{}': {}", ticket.key(), err);
                self.results.clear();
                self.error = Some(err.to_string());
            }
        }
        self.sync_dismissal();
        true
    }

    pub fn view(&self) -> SearchView {
        let show_results = self.visible.load(Ordering::Relaxed);
        SearchView {
            query: self.query.clone(),
            results: self.results.clone(),
            loading: self.loading,
            show_results,
            no_results: show_results && !self.loading && self.results.is_empty(),
            error: self.error.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn input(&mut self, query: String) -> SearchEffect {
        self.query = query;
        self.error = None;
        if self.query.trim().is_empty() {
            // Invalidate any in-flight remote request.
            self.tracker.issue(String::new());
            self.results.clear();
            self.active = false;
            self.loading = false;
            self.visible.store(false, Ordering::Relaxed);
            return SearchEffect::None;
        }

        self.active = true;
        self.visible.store(true, Ordering::Relaxed);
        match self.mode {
            SearchMode::Local => {
                let mut results = self.catalog.search(&self.query).into_entries();
                results.truncate(self.limit);
                self.results = results;
                SearchEffect::None
            }
            SearchMode::Remote => {
                self.loading = true;
                SearchEffect::Fetch(self.tracker.issue(self.query.clone()))
            }
        }
    }

    fn submit(&mut self) -> SearchEffect {
        if self.query.trim().is_empty() {
            return SearchEffect::None;
        }
        let target = match self.results.first() {
            Some(first) => NavigationTarget::Stock {
                symbol: first.symbol.clone(),
            },
            None => NavigationTarget::SearchResults {
                query: self.query.clone(),
            },
        };
        self.clear();
        SearchEffect::Navigate(target)
    }

    fn clear(&mut self) {
        self.tracker.issue(String::new());
        self.query.clear();
        self.results.clear();
        self.active = false;
        self.loading = false;
        self.error = None;
        self.visible.store(false, Ordering::Relaxed);
    }

    /// Hold the outside-press subscription exactly while results are visible.
    fn sync_dismissal(&mut self) {
        let visible = self.visible.load(Ordering::Relaxed);
        if visible && self.dismissal.is_none() {
            let flag = self.visible.clone();
            self.dismissal = Some(self.pointer.subscribe(move |event: &PointerDown| {
                if !event.inside_search {
                    flag.store(false, Ordering::Relaxed);
                }
            }));
        } else if !visible {
            self.dismissal = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_entry_catalog() -> SymbolCatalog {
        SymbolCatalog::new(vec![
            SymbolEntry::new("AAPL", "Apple Inc."),
            SymbolEntry::new("MSFT", "Microsoft Corporation"),
        ])
    }

    fn local_box() -> (SearchBox, EventBus<PointerDown>) {
        let bus = EventBus::new();
        let sb = SearchBox::new(SymbolCatalog::default(), SearchMode::Local, 10, bus.clone());
        (sb, bus)
    }

    fn symbols(entries: &[SymbolEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.symbol.as_str()).collect()
    }

    #[test]
    fn test_two_entry_catalog_queries() {
        let catalog = two_entry_catalog();
        let ap = catalog.search("ap").into_entries();
        assert_eq!(symbols(&ap), vec!["AAPL"]);
        let c = catalog.search("c").into_entries();
        assert_eq!(symbols(&c), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_inc_matches_by_name_substring_only() {
        // "Microsoft Corporation" does not contain "inc".
        let inc = two_entry_catalog().search("Inc").into_entries();
        assert_eq!(symbols(&inc), vec!["AAPL"]);

        let catalog = SymbolCatalog::new(vec![
            SymbolEntry::new("AAPL", "Apple Inc."),
            SymbolEntry::new("MSFT", "Microsoft Inc."),
        ]);
        let inc = catalog.search("Inc").into_entries();
        assert_eq!(symbols(&inc), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_blank_query_is_inactive() {
        let catalog = SymbolCatalog::default();
        assert_eq!(catalog.search(""), SearchOutcome::Inactive);
        assert_eq!(catalog.search("   "), SearchOutcome::Inactive);
        assert_eq!(catalog.search("zzzz"), SearchOutcome::Matches(vec![]));
    }

    #[test]
    fn test_results_only_contain_matches() {
        let catalog = SymbolCatalog::default();
        for q in ["a", "INC", "corp", "j", " j", "nv ", "&", "nv", "xyz"] {
            let needle = q.to_lowercase();
            for e in catalog.search(q).into_entries() {
                assert!(
                    e.symbol.to_lowercase().contains(&needle)
                        || e.name.to_lowercase().contains(&needle),
                    "{} does not match {}",
                    e.symbol,
                    q
                );
            }
        }
    }

    #[test]
    fn test_query_spaces_are_part_of_the_match() {
        let catalog = SymbolCatalog::default();
        // Only "Johnson & Johnson" has a word starting with j after a space.
        let res = catalog.search(" j").into_entries();
        assert_eq!(symbols(&res), vec!["JNJ"]);
        let res = catalog.search("j").into_entries();
        assert_eq!(symbols(&res), vec!["JPM", "JNJ"]);
    }

    #[test]
    fn test_results_preserve_catalog_order() {
        let catalog = SymbolCatalog::default();
        let res = catalog.search("inc").into_entries();
        assert_eq!(symbols(&res), vec!["AAPL", "AMZN", "GOOGL", "META", "TSLA", "V"]);
    }

    #[test]
    fn test_duplicate_symbols_dropped() {
        let catalog = SymbolCatalog::new(vec![
            SymbolEntry::new("AAPL", "Apple Inc."),
            SymbolEntry::new("AAPL", "Apple Duplicate"),
        ]);
        assert_eq!(catalog.entries().len(), 1);
        assert_eq!(catalog.lookup("AAPL").unwrap().name, "Apple Inc.");
    }

    #[test]
    fn test_select_clears_and_navigates() {
        let (mut sb, _bus) = local_box();
        sb.apply(SearchAction::Input("micro".into()));
        assert_eq!(symbols(&sb.view().results), vec!["MSFT"]);

        let effect = sb.apply(SearchAction::Select("MSFT".into()));
        assert_eq!(
            effect,
            SearchEffect::Navigate(NavigationTarget::Stock { symbol: "MSFT".into() })
        );
        let view = sb.view();
        assert!(view.query.is_empty());
        assert!(view.results.is_empty());
        assert!(!view.show_results);
    }

    #[test]
    fn test_submit_picks_first_result() {
        let (mut sb, _bus) = local_box();
        sb.apply(SearchAction::Input("inc".into()));
        let effect = sb.apply(SearchAction::Submit);
        assert_eq!(
            effect,
            SearchEffect::Navigate(NavigationTarget::Stock { symbol: "AAPL".into() })
        );
    }

    #[test]
    fn test_submit_without_results_goes_to_search_page() {
        let (mut sb, _bus) = local_box();
        sb.apply(SearchAction::Input("berkshire".into()));
        assert!(sb.view().no_results);
        match sb.apply(SearchAction::Submit) {
            SearchEffect::Navigate(target) => {
                assert_eq!(target.route(), "/search");
                assert_eq!(target, NavigationTarget::SearchResults { query: "berkshire".into() });
            }
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[test]
    fn test_blank_submit_does_nothing() {
        let (mut sb, _bus) = local_box();
        sb.apply(SearchAction::Input("  ".into()));
        assert_eq!(sb.apply(SearchAction::Submit), SearchEffect::None);
        assert!(!sb.is_active());
    }

    #[test]
    fn test_limit_truncates_results() {
        let bus = EventBus::new();
        let mut sb = SearchBox::new(SymbolCatalog::default(), SearchMode::Local, 2, bus);
        sb.apply(SearchAction::Input("inc".into()));
        assert_eq!(symbols(&sb.view().results), vec!["AAPL", "AMZN"]);
    }

    #[test]
    fn test_outside_press_hides_results_and_unsubscribes() {
        let (mut sb, bus) = local_box();
        sb.apply(SearchAction::Input("a".into()));
        assert!(sb.view().show_results);
        assert_eq!(bus.listener_count(), 1);

        bus.emit(&PointerDown { inside_search: true });
        assert!(sb.view().show_results);

        bus.emit(&PointerDown { inside_search: false });
        assert!(!sb.view().show_results);

        sb.apply(SearchAction::Input("".into()));
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_dropping_box_tears_down_subscription() {
        let (mut sb, bus) = local_box();
        sb.apply(SearchAction::Input("a".into()));
        assert_eq!(bus.listener_count(), 1);
        drop(sb);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_remote_last_query_wins() {
        let bus = EventBus::new();
        let mut sb = SearchBox::new(SymbolCatalog::default(), SearchMode::Remote, 10, bus);

        let first = match sb.apply(SearchAction::Input("a".into())) {
            SearchEffect::Fetch(t) => t,
            other => panic!("expected fetch, got {:?}", other),
        };
        assert!(sb.view().loading);
        let second = match sb.apply(SearchAction::Input("ap".into())) {
            SearchEffect::Fetch(t) => t,
            other => panic!("expected fetch, got {:?}", other),
        };

        let catalog = SymbolCatalog::default();
        assert!(sb.finish_remote(&second, Ok(catalog.search("ap").into_entries())));
        assert!(!sb.finish_remote(&first, Ok(catalog.search("a").into_entries())));

        let view = sb.view();
        assert!(!view.loading);
        assert_eq!(symbols(&view.results), vec!["AAPL"]);
    }

    #[test]
    fn test_remote_error_is_reported() {
        let bus = EventBus::new();
        let mut sb = SearchBox::new(SymbolCatalog::default(), SearchMode::Remote, 10, bus);
        let SearchEffect::Fetch(ticket) = sb.apply(SearchAction::Input("a".into())) else {
            panic!("expected fetch");
        };
        sb.finish_remote(&ticket, Err(AppError::DataUnavailable("offline".into())));
        let view = sb.view();
        assert!(view.results.is_empty());
        assert_eq!(view.error.as_deref(), Some("Data unavailable: offline"));
    }

    #[test]
    fn test_navigation_route() {
        let target = NavigationTarget::Stock { symbol: "AAPL".into() };
        assert_eq!(target.route(), "/stock/AAPL");
    }
}
