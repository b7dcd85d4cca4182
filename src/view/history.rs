use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Everything needed to put a view back on screen without re-deriving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub url: String,
    pub title: String,
    pub html: String,
}

/// One session history entry. Entries created outside the controller (the
/// initial page load) carry no state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    pub state: Option<NavigationState>,
}

/// Session history as seen by the controller.
pub trait NavigationHistory: Send {
    /// Hash of the active entry.
    fn current_hash(&self) -> String;
    /// Add an entry after the active one, dropping any forward entries.
    fn push(&mut self, state: NavigationState);
    /// Overwrite the active entry.
    fn replace(&mut self, state: NavigationState);
    /// Step back. `None` when already at the first entry.
    fn back(&mut self) -> Option<HistoryEntry>;
    /// Step forward. `None` when already at the last entry.
    fn forward(&mut self) -> Option<HistoryEntry>;
}

#[derive(Debug)]
struct Session {
    entries: Vec<HistoryEntry>,
    index: usize,
}

/// In-memory session history. Clones share the same history.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    inner: Arc<Mutex<Session>>,
}

impl MemoryHistory {
    /// A history whose only entry is the page as first loaded.
    pub fn new(initial_hash: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Session {
                entries: vec![HistoryEntry {
                    url: initial_hash.into(),
                    state: None,
                }],
                index: 0,
            })),
        }
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.inner.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.inner.lock().index
    }

    pub fn current(&self) -> HistoryEntry {
        let session = self.inner.lock();
        session.entries[session.index].clone()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("")
    }
}

impl NavigationHistory for MemoryHistory {
    fn current_hash(&self) -> String {
        let session = self.inner.lock();
        session.entries[session.index].url.clone()
    }

    fn push(&mut self, state: NavigationState) {
        let mut session = self.inner.lock();
        let keep = session.index + 1;
        session.entries.truncate(keep);
        session.entries.push(HistoryEntry {
            url: state.url.clone(),
            state: Some(state),
        });
        session.index = keep;
    }

    fn replace(&mut self, state: NavigationState) {
        let mut session = self.inner.lock();
        let index = session.index;
        session.entries[index] = HistoryEntry {
            url: state.url.clone(),
            state: Some(state),
        };
    }

    fn back(&mut self) -> Option<HistoryEntry> {
        let mut session = self.inner.lock();
        if session.index == 0 {
            return None;
        }
        session.index -= 1;
        Some(session.entries[session.index].clone())
    }

    fn forward(&mut self) -> Option<HistoryEntry> {
        let mut session = self.inner.lock();
        if session.index + 1 >= session.entries.len() {
            return None;
        }
        session.index += 1;
        Some(session.entries[session.index].clone())
    }
}
