//! Locations and navigation target resolution.

use std::collections::BTreeMap;

use url::Url;
use waypoint_history::HistoryEntry;

use crate::error::RouterError;

/// Base used to resolve paths. Only the path, query and fragment of results are ever used.
const BASE: &str = "waypoint://index.html/";

/// Where the application currently is.
///
/// A [`Location`] is never modified in place; every navigation produces a new one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Location {
    /// The path, always starting with `/` and never ending with one (except for the root).
    pub pathname: String,
    /// The query parameters. If a key appears more than once, the last value wins.
    pub query: BTreeMap<String, String>,
    /// State attached by the navigation that produced this location.
    pub state: Option<serde_json::Value>,
}

impl Location {
    /// Parse an absolute `path`, optionally followed by a query string.
    ///
    /// ```rust
    /// # use waypoint_router::prelude::*;
    /// let location = Location::parse("/app/xyz/?page=2").unwrap();
    /// assert_eq!(location.pathname, "/app/xyz");
    /// assert_eq!(location.query["page"], "2");
    /// ```
    pub fn parse(path: &str) -> Result<Self, RouterError> {
        Self::resolve("/", path)
    }

    /// Resolve `target` against the pathname `base`.
    ///
    /// Targets starting with `/` are absolute. All others are relative to `base`, which is
    /// treated as a directory, so `contact` resolved against `/app` is `/app/contact`. `.` and
    /// `..` segments are supported. A target consisting only of a query string keeps `base`.
    pub fn resolve(base: &str, target: &str) -> Result<Self, RouterError> {
        let invalid = |source| RouterError::InvalidTarget {
            target: target.to_string(),
            source,
        };

        // kept absolute, so a first segment like `a:b` can't be taken for a scheme
        let mut base_path = format!("/{}", base.trim_start_matches('/'));
        if !base_path.ends_with('/') {
            base_path.push('/');
        }

        let base = Url::parse(BASE)
            .and_then(|u| u.join(&base_path))
            .map_err(invalid)?;
        let url = base.join(target).map_err(invalid)?;

        Ok(Self {
            pathname: normalize_pathname(url.path()),
            query: url.query_pairs().into_owned().collect(),
            state: None,
        })
    }

    /// Create a location from a history entry.
    pub fn from_entry(entry: &HistoryEntry) -> Result<Self, RouterError> {
        let mut location = Self::parse(&entry.path)?;
        location.state = entry.state.clone();
        Ok(location)
    }

    /// Create the history entry for this location.
    pub fn to_entry(&self) -> HistoryEntry {
        HistoryEntry::new(self.path()).with_state(self.state.clone())
    }

    /// The serialized query string, without a leading `?`.
    pub fn search(&self) -> String {
        // a map of strings always serializes
        serde_urlencoded::to_string(&self.query).unwrap_or_default()
    }

    /// The pathname followed by the query string, if there is one.
    pub fn path(&self) -> String {
        let search = self.search();
        match search.is_empty() {
            true => self.pathname.clone(),
            false => format!("{}?{search}", self.pathname),
        }
    }

    /// Attach `state`.
    pub fn with_state(mut self, state: Option<serde_json::Value>) -> Self {
        self.state = state;
        self
    }
}

/// Collapse repeated slashes and drop a trailing one.
fn normalize_pathname(path: &str) -> String {
    let mut res = String::with_capacity(path.len());
    for seg in path.split('/').filter(|s| !s.is_empty()) {
        res.push('/');
        res += seg;
    }

    if res.is_empty() {
        res.push('/');
    }
    res
}
