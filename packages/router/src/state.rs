//! The current routing information.

use std::collections::BTreeMap;

use crate::{location::Location, matching::MatchResult};

/// The current routing information.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouterState {
    /// The current location.
    pub location: Location,

    /// The active routes.
    ///
    /// Empty if no route matches the current location.
    pub matches: MatchResult,

    /// Whether there is a prior path to go back to.
    pub can_go_back: bool,

    /// Whether there is a later path to forward to.
    pub can_go_forward: bool,

    /// The number of history entries.
    pub history_len: usize,
}

impl RouterState {
    /// The parameters of the innermost matched route.
    pub fn params(&self) -> BTreeMap<String, String> {
        self.matches.params().cloned().unwrap_or_default()
    }

    /// The pathname relative targets resolve against by default.
    pub fn base(&self) -> &str {
        self.matches
            .deepest()
            .map(|m| m.pathname_base.as_str())
            .unwrap_or(&self.location.pathname)
    }

    /// Checks if the provided `target` is currently active.
    ///
    /// Relative targets are resolved against `base` first, or [`RouterState::base`] if it is
    /// [`None`].
    ///
    /// If `exact` is [`true`], the current pathname must match the target exactly. Otherwise the
    /// current pathname may also continue below the target, so `/app` is active at
    /// `/app/about`, but not at `/application`. The root is only ever active exactly.
    ///
    /// The query is ignored.
    #[must_use]
    pub fn is_active(&self, target: &str, base: Option<&str>, exact: bool) -> bool {
        let base = base.unwrap_or_else(|| self.base());
        let Ok(target) = Location::resolve(base, target) else {
            return false;
        };

        let current = self.location.pathname.to_ascii_lowercase();
        let target = target.pathname.to_ascii_lowercase();

        if current == target {
            return true;
        }
        !exact
            && target != "/"
            && current.starts_with(&target)
            && current[target.len()..].starts_with('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> RouterState {
        RouterState {
            location: Location::parse("/app/about").unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn is_active_path_absolute() {
        let state = test_state();

        assert!(state.is_active("/app", None, false));
        assert!(state.is_active("/app/about", None, false));
        assert!(!state.is_active("/application", None, false));
        assert!(!state.is_active("/app/contact", None, false));
    }

    #[test]
    fn is_active_path_exact() {
        let state = test_state();

        assert!(state.is_active("/app/about", None, true));
        assert!(state.is_active("/app/about/", None, true));
        assert!(!state.is_active("/app", None, true));
    }

    #[test]
    fn is_active_root_only_exact() {
        let state = test_state();
        assert!(!state.is_active("/", None, false));

        let root = RouterState::default();
        assert!(RouterState {
            location: Location::parse("/").unwrap(),
            ..root
        }
        .is_active("/", None, false));
    }

    #[test]
    fn is_active_path_relative() {
        let state = test_state();

        assert!(state.is_active("about", Some("/app"), false));
        assert!(!state.is_active("contact", Some("/app"), false));
        assert!(state.is_active("app", Some("/"), false));
    }

    #[test]
    fn is_active_ignores_query_and_case() {
        let state = test_state();
        assert!(state.is_active("/App/About?tab=1", None, true));
    }

    #[test]
    fn params_of_empty_match() {
        assert!(test_state().params().is_empty());
    }
}
