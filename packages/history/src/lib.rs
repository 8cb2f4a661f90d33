//! History Integration
//!
//! The router relies on so-called [`HistoryProvider`]s to store the current URL, and possibly a
//! history (i.e. a browsers back button) and future (i.e. a browsers forward button).
//!
//! To integrate the router with any kind of history, implement the [`HistoryProvider`] trait.
//! [`MemoryHistory`] is the default implementation and keeps everything in memory.

#![deny(missing_docs)]

mod memory;
pub use memory::*;

/// A single entry of a navigation history.
///
/// `path` contains the pathname and, optionally, a query string (`/app/xyz?page=2`). `state` is
/// opaque data attached by the navigation that created the entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryEntry {
    /// The pathname, optionally followed by `?` and a query string.
    pub path: String,
    /// State attached to the entry when it was created.
    pub state: Option<serde_json::Value>,
}

impl HistoryEntry {
    /// Create an entry without state.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: None,
        }
    }

    /// Attach `state` to the entry.
    pub fn with_state(mut self, state: Option<serde_json::Value>) -> Self {
        self.state = state;
        self
    }
}

impl From<&str> for HistoryEntry {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for HistoryEntry {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

/// An integration with some kind of navigation history.
///
/// Depending on your use case, your implementation may deviate from the described procedure. This
/// is fine, as long as `current` follows the described format. The described behaviors are
/// designed to mimic a web browser, which most users should already know.
pub trait HistoryProvider {
    /// Get the current entry.
    ///
    /// The path **must start** with `/`.
    ///
    /// ```rust
    /// # use waypoint_history::{HistoryProvider, MemoryHistory};
    /// let mut history = MemoryHistory::default();
    /// assert_eq!(history.current().path, "/");
    ///
    /// history.push("/path".into());
    /// assert_eq!(history.current().path, "/path");
    /// ```
    #[must_use]
    fn current(&self) -> &HistoryEntry;

    /// Check whether there is a previous page to navigate back to.
    ///
    /// If a [`HistoryProvider`] cannot know this, it should return [`true`].
    #[must_use]
    fn can_go_back(&self) -> bool {
        true
    }

    /// Go back to a previous page.
    ///
    /// If a [`HistoryProvider`] cannot go to a previous page, it should do nothing. This method
    /// might be called, even if `can_go_back` returns [`false`].
    ///
    /// ```rust
    /// # use waypoint_history::{HistoryProvider, MemoryHistory};
    /// let mut history = MemoryHistory::default();
    /// history.go_back();
    /// assert_eq!(history.current().path, "/");
    ///
    /// history.push("/some-other-page".into());
    /// history.go_back();
    /// assert_eq!(history.current().path, "/");
    /// ```
    fn go_back(&mut self);

    /// Check whether there is a future page to navigate forward to.
    ///
    /// If a [`HistoryProvider`] cannot know this, it should return [`true`].
    #[must_use]
    fn can_go_forward(&self) -> bool {
        true
    }

    /// Go forward to a future page.
    ///
    /// If a [`HistoryProvider`] cannot go to a future page, it should do nothing.
    fn go_forward(&mut self);

    /// Go to another page.
    ///
    /// This should do three things:
    /// 1. Make `entry` the current entry.
    /// 2. Add the previous entry to the navigation history.
    /// 3. Clear the navigation future.
    ///
    /// ```rust
    /// # use waypoint_history::{HistoryProvider, MemoryHistory};
    /// let mut history = MemoryHistory::default();
    /// history.push("/some-other-page".into());
    /// assert_eq!(history.current().path, "/some-other-page");
    /// assert!(history.can_go_back());
    /// ```
    fn push(&mut self, entry: HistoryEntry);

    /// Replace the current page with another one.
    ///
    /// In contrast to `push`, the navigation history and future stay untouched.
    ///
    /// ```rust
    /// # use waypoint_history::{HistoryProvider, MemoryHistory};
    /// let mut history = MemoryHistory::default();
    /// history.replace("/some-other-page".into());
    /// assert_eq!(history.current().path, "/some-other-page");
    /// assert!(!history.can_go_back());
    /// ```
    fn replace(&mut self, entry: HistoryEntry);

    /// The number of entries in the history, counting the past, the current and the future.
    fn len(&self) -> usize;

    /// Whether the history is empty. A history always holds a current entry, so this is
    /// [`false`] unless an implementation says otherwise.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
