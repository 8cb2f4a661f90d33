use std::{fmt::Debug, rc::Rc};

use waypoint_history::{HistoryProvider, MemoryHistory};

use crate::state::RouterState;

/// The number of redirects the router follows in a single navigation by default.
pub const DEFAULT_MAX_REDIRECTS: usize = 16;

/// A function called after every routing update. See [`RouterConfig::on_update`].
pub type RoutingCallback = Rc<dyn Fn(&RouterState) -> Option<String>>;

/// Global configuration options for the router.
///
/// This implements [`Default`] and follows the builder pattern, so you can use it like this:
/// ```rust
/// # use waypoint_router::prelude::*;
/// let cfg = RouterConfig::default()
///     .history(MemoryHistory::with_initial_path("/app"))
///     .max_redirects(4);
/// ```
pub struct RouterConfig {
    pub(crate) history: Box<dyn HistoryProvider>,
    pub(crate) max_redirects: usize,
    pub(crate) on_update: Option<RoutingCallback>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            history: Box::<MemoryHistory>::default(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            on_update: None,
        }
    }
}

impl RouterConfig {
    /// The history provider the router reads its initial location from and writes to.
    ///
    /// Defaults to a [`MemoryHistory`] starting at `/`.
    pub fn history(self, history: impl HistoryProvider + 'static) -> Self {
        Self {
            history: Box::new(history),
            ..self
        }
    }

    /// How many redirects a single navigation may follow before the router gives up.
    ///
    /// Defaults to [`DEFAULT_MAX_REDIRECTS`].
    pub fn max_redirects(self, max_redirects: usize) -> Self {
        Self {
            max_redirects,
            ..self
        }
    }

    /// A function to be called whenever the routing is updated.
    ///
    /// The callback is invoked after the routing is updated, but before subscribers are
    /// notified. If it returns a target, the router will replace the current location with it.
    ///
    /// The callback is called no more than once per navigation. If its target can't be routed,
    /// e.g. because of a redirect loop, the navigation that triggered it stays in place,
    /// subscribers are still notified and the error is returned.
    ///
    /// Defaults to [`None`].
    pub fn on_update(self, callback: impl Fn(&RouterState) -> Option<String> + 'static) -> Self {
        Self {
            on_update: Some(Rc::new(callback)),
            ..self
        }
    }
}

impl Debug for RouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterConfig")
            .field("max_redirects", &self.max_redirects)
            .field("on_update", &self.on_update.is_some())
            .finish_non_exhaustive()
    }
}
