use std::fmt::Debug;

use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;

/// Handle for one issued request. Only the most recently issued ticket may apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    id: u64,
    key: K,
}

impl<K> Ticket<K> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Monotonic request counter. Last request started wins.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn issue<K>(&mut self, key: K) -> Ticket<K> {
        self.latest += 1;
        Ticket {
            id: self.latest,
            key,
        }
    }

    pub fn is_current<K>(&self, ticket: &Ticket<K>) -> bool {
        ticket.id == self.latest
    }
}

/// View-facing state of an asynchronous page load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(T),
    Unavailable(AppError),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    /// Render the ready payload, keeping every other state as is.
    pub fn map_ready<U, F>(&self, f: F) -> LoadState<U>
    where
        F: FnOnce(&T) -> U,
    {
        match self {
            LoadState::Idle => LoadState::Idle,
            LoadState::Loading => LoadState::Loading,
            LoadState::Ready(data) => LoadState::Ready(f(data)),
            LoadState::Unavailable(err) => LoadState::Unavailable(err.clone()),
        }
    }
}

/// Whether a finished request changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Superseded,
}

/// Load state plus the tracker that decides which result may land.
#[derive(Debug)]
pub struct Loader<K, T> {
    tracker: RequestTracker,
    key: Option<K>,
    state: LoadState<T>,
}

impl<K, T> Default for Loader<K, T> {
    fn default() -> Self {
        Loader {
            tracker: RequestTracker::default(),
            key: None,
            state: LoadState::Idle,
        }
    }
}

impl<K: Clone + Debug, T> Loader<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Loading` for `key`. Any ticket issued before this one becomes stale.
    pub fn begin(&mut self, key: K) -> Ticket<K> {
        self.key = Some(key.clone());
        self.state = LoadState::Loading;
        self.tracker.issue(key)
    }

    /// Swap in the full result, unless a newer request has been issued since.
    pub fn finish(&mut self, ticket: &Ticket<K>, result: Result<T, AppError>) -> LoadOutcome {
        if !self.tracker.is_current(ticket) {
            debug!("Discarding stale result for {:?} (ticket {})", ticket.key, ticket.id);
            return LoadOutcome::Superseded;
        }
        self.state = match result {
            Ok(data) => LoadState::Ready(data),
            Err(err) => LoadState::Unavailable(err),
        };
        LoadOutcome::Applied
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }
}
