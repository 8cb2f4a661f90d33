#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod error;
pub mod location;
pub mod matching;
pub mod navigation;
pub mod outlet;
pub mod routes;
pub mod state;

mod router_cfg;
mod service;

pub use service::{Router, Subscription};

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::error::*;
    pub use crate::location::Location;
    pub use crate::matching::{resolve, MatchResult, RouteMatch};
    pub use crate::navigation::{NavigateOptions, Navigator};
    pub use crate::outlet::{render_match, OutletContext, Renderer};
    pub use crate::router_cfg::{RouterConfig, RoutingCallback, DEFAULT_MAX_REDIRECTS};
    pub use crate::routes::*;
    pub use crate::state::RouterState;
    pub use crate::{Router, Subscription};
    pub use waypoint_history::{HistoryEntry, HistoryProvider, MemoryHistory};
}
