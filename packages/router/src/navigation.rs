//! Types relating to navigation.

use futures_channel::mpsc::UnboundedSender;
use serde::Serialize;
use tracing::warn;

use crate::error::QueryError;

/// How a navigation affects the history.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
    /// Opaque state stored with the new history entry.
    pub state: Option<serde_json::Value>,
}

impl NavigateOptions {
    /// Options for a push navigation.
    pub fn push() -> Self {
        Self::default()
    }

    /// Options for a replace navigation.
    pub fn replace() -> Self {
        Self {
            replace: true,
            state: None,
        }
    }

    /// Attach `state` to the new history entry.
    pub fn with_state(mut self, state: serde_json::Value) -> Self {
        self.state = Some(state);
        self
    }
}

/// A set of messages that the [`Router`](crate::Router) can handle.
#[derive(Debug)]
pub(crate) enum RouterMessage {
    /// Go back a step in the navigation history.
    GoBack,

    /// Go a step forward in the navigation history.
    GoForward,

    /// Navigate to `target`, resolved against `base`, or the innermost matched route if there is
    /// none.
    Navigate {
        target: String,
        base: Option<String>,
        options: NavigateOptions,
    },

    /// Replace the query of the current location with an already serialized query string.
    SetQuery {
        query: String,
        options: NavigateOptions,
    },
}

/// A handle views use to ask the router to navigate.
///
/// Requests are queued and carried out in order, each to completion, when the owner of the
/// [`Router`](crate::Router) calls [`handle_messages`](crate::Router::handle_messages).
#[derive(Clone, Debug)]
pub struct Navigator {
    tx: UnboundedSender<RouterMessage>,
    base: Option<String>,
}

impl Navigator {
    pub(crate) fn new(tx: UnboundedSender<RouterMessage>) -> Self {
        Self { tx, base: None }
    }

    /// A navigator resolving relative targets against `base` instead of the innermost route.
    pub(crate) fn with_base(&self, base: impl Into<String>) -> Self {
        Self {
            tx: self.tx.clone(),
            base: Some(base.into()),
        }
    }

    fn send(&self, msg: RouterMessage) {
        if let Err(e) = self.tx.unbounded_send(msg) {
            warn!("router is gone, dropping navigation: {:?}", e.into_inner());
        }
    }

    /// Navigate to `target`.
    pub fn navigate(&self, target: impl Into<String>, options: NavigateOptions) {
        self.send(RouterMessage::Navigate {
            target: target.into(),
            base: self.base.clone(),
            options,
        });
    }

    /// Push `target`.
    pub fn push(&self, target: impl Into<String>) {
        self.navigate(target, NavigateOptions::push());
    }

    /// Replace the current location with `target`.
    pub fn replace(&self, target: impl Into<String>) {
        self.navigate(target, NavigateOptions::replace());
    }

    /// Go back a step in the history.
    pub fn go_back(&self) {
        self.send(RouterMessage::GoBack);
    }

    /// Go forward a step in the history.
    pub fn go_forward(&self) {
        self.send(RouterMessage::GoForward);
    }

    /// Replace the query parameters of the current location.
    ///
    /// Parameters are not merged: keys missing from `query` are gone afterwards. `query` is
    /// serialized right away, so values that cannot be part of a query string are reported
    /// here rather than when the navigation is carried out.
    pub fn set_query<T: Serialize + ?Sized>(
        &self,
        query: &T,
        options: NavigateOptions,
    ) -> Result<(), QueryError> {
        let query = serde_urlencoded::to_string(query)?;
        self.send(RouterMessage::SetQuery { query, options });
        Ok(())
    }
}
