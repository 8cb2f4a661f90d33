use tracing::error;

use crate::{HistoryEntry, HistoryProvider};

/// A [`HistoryProvider`] that stores all navigation information in memory.
#[derive(Debug)]
pub struct MemoryHistory {
    current: HistoryEntry,
    past: Vec<HistoryEntry>,
    future: Vec<HistoryEntry>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::with_initial_path("/")
    }
}

impl MemoryHistory {
    /// Create a [`MemoryHistory`] starting at `path`.
    ///
    /// A missing leading `/` is added.
    ///
    /// ```rust
    /// # use waypoint_history::{HistoryProvider, MemoryHistory};
    /// let history = MemoryHistory::with_initial_path("/app");
    /// assert_eq!(history.current().path, "/app");
    /// assert_eq!(history.can_go_back(), false);
    /// ```
    pub fn with_initial_path(path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }

        Self {
            current: HistoryEntry::new(path),
            past: Vec::new(),
            future: Vec::new(),
        }
    }

    /// All entries before the current one, oldest first.
    pub fn past(&self) -> &[HistoryEntry] {
        &self.past
    }
}

impl HistoryProvider for MemoryHistory {
    fn current(&self) -> &HistoryEntry {
        &self.current
    }

    fn can_go_back(&self) -> bool {
        !self.past.is_empty()
    }

    fn go_back(&mut self) {
        if let Some(last) = self.past.pop() {
            let old = std::mem::replace(&mut self.current, last);
            self.future.push(old);
        }
    }

    fn can_go_forward(&self) -> bool {
        !self.future.is_empty()
    }

    fn go_forward(&mut self) {
        if let Some(next) = self.future.pop() {
            let old = std::mem::replace(&mut self.current, next);
            self.past.push(old);
        }
    }

    fn push(&mut self, entry: HistoryEntry) {
        if entry.path.starts_with("//") {
            error!(r#"cannot navigate to paths starting with "//", path: {}"#, entry.path);
            return;
        }

        // don't push the same entry twice
        if self.current == entry {
            return;
        }

        let old = std::mem::replace(&mut self.current, entry);
        self.past.push(old);
        self.future.clear();
    }

    fn replace(&mut self, entry: HistoryEntry) {
        if entry.path.starts_with("//") {
            error!(r#"cannot navigate to paths starting with "//", path: {}"#, entry.path);
            return;
        }

        self.current = entry;
    }

    fn len(&self) -> usize {
        self.past.len() + 1 + self.future.len()
    }
}
