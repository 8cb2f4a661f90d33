use std::{
    collections::BTreeMap,
    rc::{Rc, Weak},
};

use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use serde::Serialize;
use tracing::{debug, error, warn};
use waypoint_history::HistoryProvider;

use crate::{
    error::{QueryError, RouterError},
    location::Location,
    matching::{resolve, MatchResult},
    navigation::{NavigateOptions, Navigator, RouterMessage},
    outlet::{render_match, Renderer},
    router_cfg::{RouterConfig, RoutingCallback},
    routes::RouteTree,
    state::RouterState,
};

/// Keeps a subscription registered with [`Router::subscribe`] alive.
///
/// The router only holds on to the callback weakly; dropping this unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription(#[allow(dead_code)] Rc<dyn Fn(&RouterState)>);

/// The core of the router.
///
/// This combines a [`RouteTree`] and a [`HistoryProvider`] to find what views should be rendered
/// on what level. Also notifies subscribers when the current location changes.
///
/// Views don't get mutable access to the router while it renders them. Instead they queue
/// requests through a [`Navigator`], which are carried out by [`Router::handle_messages`].
pub struct Router<V> {
    tree: RouteTree<V>,
    history: Box<dyn HistoryProvider>,
    max_redirects: usize,
    on_update: Option<RoutingCallback>,
    state: RouterState,
    tx: UnboundedSender<RouterMessage>,
    rx: UnboundedReceiver<RouterMessage>,
    subscribers: Vec<Weak<dyn Fn(&RouterState)>>,
}

impl<V> Router<V> {
    /// Create a new [`Router`] and route to the current entry of the configured history.
    ///
    /// If that entry hits a redirect, the redirect replaces it.
    pub fn new(tree: RouteTree<V>, config: RouterConfig) -> Result<Self, RouterError> {
        let RouterConfig {
            history,
            max_redirects,
            on_update,
        } = config;
        let (tx, rx) = unbounded();

        let mut router = Self {
            tree,
            history,
            max_redirects,
            on_update,
            state: RouterState::default(),
            tx,
            rx,
            subscribers: Vec::new(),
        };
        router.sync_with_history()?;
        Ok(router)
    }

    /// The current routing information.
    pub fn state(&self) -> &RouterState {
        &self.state
    }

    /// The route table.
    pub fn tree(&self) -> &RouteTree<V> {
        &self.tree
    }

    /// The current location.
    pub fn location(&self) -> &Location {
        &self.state.location
    }

    /// The active routes.
    pub fn matches(&self) -> &MatchResult {
        &self.state.matches
    }

    /// The history the router writes to.
    pub fn history(&self) -> &dyn HistoryProvider {
        self.history.as_ref()
    }

    /// A handle to queue navigations with. Relative targets resolve against the innermost
    /// matched route at the time the navigation is carried out.
    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.tx.clone())
    }

    /// Navigate to `target`.
    ///
    /// Relative targets resolve against the innermost matched route. Redirects are followed
    /// before the history is touched, so only the final location is pushed (or replaced).
    pub fn navigate(&mut self, target: &str, options: NavigateOptions) -> Result<(), RouterError> {
        let base = self.state.base().to_string();
        self.navigate_from(&base, target, options)
    }

    /// Push `target`. See [`Router::navigate`].
    pub fn push(&mut self, target: &str) -> Result<(), RouterError> {
        self.navigate(target, NavigateOptions::push())
    }

    /// Replace the current location with `target`. See [`Router::navigate`].
    pub fn replace(&mut self, target: &str) -> Result<(), RouterError> {
        self.navigate(target, NavigateOptions::replace())
    }

    /// Go back a step in the history, if possible.
    pub fn go_back(&mut self) -> Result<(), RouterError> {
        if !self.history.can_go_back() {
            debug!("nothing to go back to");
            return Ok(());
        }
        self.history.go_back();
        self.sync_with_history()
    }

    /// Go forward a step in the history, if possible.
    pub fn go_forward(&mut self) -> Result<(), RouterError> {
        if !self.history.can_go_forward() {
            debug!("nothing to go forward to");
            return Ok(());
        }
        self.history.go_forward();
        self.sync_with_history()
    }

    /// The query parameters of the current location.
    pub fn read_query_parameters(&self) -> &BTreeMap<String, String> {
        &self.state.location.query
    }

    /// Replace the query parameters of the current location, pushing a new history entry.
    ///
    /// Parameters are not merged: keys missing from `query` are gone afterwards.
    ///
    /// ```rust
    /// # use waypoint_router::prelude::*;
    /// # #[derive(serde::Serialize)] struct Query { page: u32 }
    /// let tree = RouteTree::new(vec![RouteNode::new("/app", "app")]).unwrap();
    /// let cfg = RouterConfig::default().history(MemoryHistory::with_initial_path("/app?tab=a"));
    /// let mut router = Router::new(tree, cfg).unwrap();
    ///
    /// router.write_query_parameters(&Query { page: 2 }).unwrap();
    /// assert_eq!(router.location().path(), "/app?page=2");
    /// ```
    pub fn write_query_parameters<T: Serialize + ?Sized>(
        &mut self,
        query: &T,
    ) -> Result<(), RouterError> {
        self.write_query_parameters_with(query, NavigateOptions::push())
    }

    /// Like [`Router::write_query_parameters`], with control over the history entry.
    pub fn write_query_parameters_with<T: Serialize + ?Sized>(
        &mut self,
        query: &T,
        options: NavigateOptions,
    ) -> Result<(), RouterError> {
        let query = serde_urlencoded::to_string(query).map_err(QueryError::from)?;
        self.set_query(&query, options)
    }

    /// Resolve `target` against the innermost matched route.
    pub fn build_link(&self, target: &str) -> Result<String, RouterError> {
        Location::resolve(self.state.base(), target).map(|l| l.path())
    }

    /// Call `callback` after every routing update.
    ///
    /// The subscription lasts until the returned [`Subscription`] is dropped.
    pub fn subscribe(&mut self, callback: impl Fn(&RouterState) + 'static) -> Subscription {
        let callback: Rc<dyn Fn(&RouterState)> = Rc::new(callback);
        self.subscribers.push(Rc::downgrade(&callback));
        Subscription(callback)
    }

    /// Carry out all navigations queued through [`Navigator`]s, in order.
    ///
    /// Returns how many requests were handled. Stops at the first failing request; the rest
    /// stay queued.
    pub fn handle_messages(&mut self) -> Result<usize, RouterError> {
        let mut handled = 0;

        while let Ok(msg) = self.rx.try_recv() {
            handled += 1;
            match msg {
                RouterMessage::GoBack => self.go_back()?,
                RouterMessage::GoForward => self.go_forward()?,
                RouterMessage::Navigate {
                    target,
                    base,
                    options,
                } => {
                    let base = base.unwrap_or_else(|| self.state.base().to_string());
                    self.navigate_from(&base, &target, options)?;
                }
                RouterMessage::SetQuery { query, options } => self.set_query(&query, options)?,
            }
        }

        Ok(handled)
    }

    /// Render the active routes. Returns [`None`] if no route is active.
    pub fn render<R: Renderer<V>>(&self, renderer: &mut R) -> Option<R::Output> {
        render_match(&self.tree, &self.state, &self.navigator(), renderer)
    }

    fn navigate_from(
        &mut self,
        base: &str,
        target: &str,
        options: NavigateOptions,
    ) -> Result<(), RouterError> {
        let NavigateOptions { replace, state } = options;
        let location = Location::resolve(base, target)?.with_state(state);
        let (location, matches) = self.route(location)?;

        debug!(path = %location.path(), replace, "navigating");
        match replace {
            true => self.history.replace(location.to_entry()),
            false => self.history.push(location.to_entry()),
        }
        self.commit(location, matches)
    }

    fn set_query(&mut self, query: &str, options: NavigateOptions) -> Result<(), RouterError> {
        let target = format!("{}?{query}", self.state.location.pathname);
        self.navigate_from("/", &target, options)
    }

    /// Route to the current history entry, replacing it if it redirects.
    fn sync_with_history(&mut self) -> Result<(), RouterError> {
        let current = Location::from_entry(self.history.current())?;
        let path = current.path();
        let (location, matches) = self.route(current)?;

        if location.path() != path {
            self.history.replace(location.to_entry());
        }
        self.commit(location, matches)
    }

    /// Find the active routes for `location`, following redirects.
    fn route(&self, mut location: Location) -> Result<(Location, MatchResult), RouterError> {
        let mut redirects = 0;

        loop {
            let matches = match resolve(&location, &self.tree) {
                Ok(matches) => matches,
                Err(e) => {
                    warn!("{e}");
                    return Ok((location, MatchResult::default()));
                }
            };

            let Some((target, base)) = matches.redirect(&self.tree) else {
                return Ok((location, matches));
            };

            if redirects == self.max_redirects {
                error!(path = %location.path(), limit = self.max_redirects, "redirect loop");
                return Err(RouterError::RedirectLoop {
                    path: location.path(),
                    limit: self.max_redirects,
                });
            }
            redirects += 1;

            debug!(from = %location.pathname, to = target, "following redirect");
            location = Location::resolve(&base, target)?;
        }
    }

    /// Publish a new state, give the update callback a chance to redirect, then notify
    /// subscribers.
    ///
    /// If the callback's target can't be routed, the navigation that was already written to the
    /// history stays published and subscribers still see it before the error is returned.
    fn commit(&mut self, location: Location, matches: MatchResult) -> Result<(), RouterError> {
        self.publish(location, matches);
        let res = self.apply_update_callback();
        self.update_subscribers();
        res
    }

    fn apply_update_callback(&mut self) -> Result<(), RouterError> {
        let Some(callback) = self.on_update.clone() else {
            return Ok(());
        };
        let Some(target) = callback(&self.state) else {
            return Ok(());
        };

        debug!(%target, "update callback redirected");
        let location = Location::resolve(self.state.base(), &target)?;
        let (location, matches) = self.route(location)?;
        self.history.replace(location.to_entry());
        self.publish(location, matches);
        Ok(())
    }

    fn publish(&mut self, location: Location, matches: MatchResult) {
        self.state = RouterState {
            location,
            matches,
            can_go_back: self.history.can_go_back(),
            can_go_forward: self.history.can_go_forward(),
            history_len: self.history.len(),
        };
    }

    /// Notify all live subscribers, forgetting dropped ones.
    fn update_subscribers(&mut self) {
        let state = &self.state;
        self.subscribers.retain(|s| match s.upgrade() {
            Some(callback) => {
                callback(state);
                true
            }
            None => false,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;
    use waypoint_history::MemoryHistory;

    use super::*;
    use crate::routes::RouteNode;

    fn test_router(path: &str) -> Router<&'static str> {
        let tree = RouteTree::new(vec![RouteNode::new("/", "layout")
            .child(RouteNode::index("welcome"))
            .child(RouteNode::redirect("old", "/app"))
            .child(
                RouteNode::new("/app", "app")
                    .child(RouteNode::index("home"))
                    .child(RouteNode::new("about", "about"))
                    .child(RouteNode::new(":slug", "other")),
            )
            .child(RouteNode::new("*", "not found"))])
        .unwrap();

        Router::new(
            tree,
            RouterConfig::default().history(MemoryHistory::with_initial_path(path)),
        )
        .unwrap()
    }

    fn deepest_view(router: &Router<&'static str>) -> Option<&'static str> {
        let deepest = router.matches().deepest()?;
        router.tree().route(deepest.route).view().copied()
    }

    #[test]
    fn initial_routing() {
        let router = test_router("/app/about");
        assert_eq!(deepest_view(&router), Some("about"));
        assert_eq!(router.state().history_len, 1);
    }

    #[test]
    fn initial_redirect_replaces_entry() {
        let router = test_router("/old");
        assert_eq!(router.location().pathname, "/app");
        assert_eq!(router.history().current().path, "/app");
        assert_eq!(router.history().len(), 1);
    }

    #[test]
    fn relative_navigation_resolves_against_innermost_route() {
        let mut router = test_router("/app/about");
        router.push("xyz").unwrap();
        assert_eq!(router.location().pathname, "/app/about/xyz");
        assert_eq!(deepest_view(&router), Some("not found"));

        let mut router = test_router("/app");
        router.push("xyz").unwrap();
        assert_eq!(router.location().pathname, "/app/xyz");
        assert_eq!(router.state().params()["slug"], "xyz");
    }

    #[test]
    fn state_travels_with_navigation() {
        let mut router = test_router("/");
        router
            .navigate(
                "/app/contact",
                NavigateOptions::push().with_state(serde_json::json!({ "foo": "sent" })),
            )
            .unwrap();
        assert_eq!(
            router.location().state,
            Some(serde_json::json!({ "foo": "sent" }))
        );

        router.go_back().unwrap();
        assert_eq!(router.location().state, None);
        router.go_forward().unwrap();
        assert_eq!(
            router.location().state,
            Some(serde_json::json!({ "foo": "sent" }))
        );
    }

    #[test]
    fn go_back_without_history_is_noop() {
        let mut router = test_router("/app");
        router.go_back().unwrap();
        assert_eq!(router.location().pathname, "/app");
        router.go_forward().unwrap();
        assert_eq!(router.location().pathname, "/app");
    }

    #[test]
    fn navigator_requests_wait_for_handle_messages() {
        let mut router = test_router("/");
        let navigator = router.navigator();

        navigator.push("/app");
        navigator.push("about");
        assert_eq!(router.location().pathname, "/");

        assert_eq!(router.handle_messages().unwrap(), 2);
        assert_eq!(router.location().pathname, "/app/about");
        assert_eq!(router.handle_messages().unwrap(), 0);
    }

    #[test]
    fn failing_update_callback_keeps_navigation_consistent() {
        let tree = RouteTree::new(vec![
            RouteNode::new("/", "root"),
            RouteNode::new("/a", "a"),
            RouteNode::redirect("/ping", "/pong"),
            RouteNode::redirect("/pong", "/ping"),
        ])
        .unwrap();
        let cfg = RouterConfig::default()
            .max_redirects(2)
            .on_update(|state| (state.location.pathname == "/a").then(|| String::from("/ping")));
        let mut router = Router::new(tree, cfg).unwrap();

        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let _sub = router.subscribe(move |_| c.set(c.get() + 1));

        let err = router.push("/a").unwrap_err();
        assert!(matches!(err, RouterError::RedirectLoop { limit: 2, .. }));

        assert_eq!(router.location().pathname, "/a");
        assert_eq!(router.history().current().path, "/a");
        assert_eq!(router.state().history_len, router.history().len());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn dropped_subscriptions_are_pruned() {
        let mut router = test_router("/");
        let calls = Rc::new(Cell::new(0));

        let c = calls.clone();
        let sub = router.subscribe(move |_| c.set(c.get() + 1));
        router.push("/app").unwrap();
        assert_eq!(calls.get(), 1);

        drop(sub);
        router.push("/app/about").unwrap();
        assert_eq!(calls.get(), 1);
        assert!(router.subscribers.is_empty());
    }
}
