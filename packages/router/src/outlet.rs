//! Rendering the active routes into nested outlets.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    error::{QueryError, RouterError},
    location::Location,
    matching::RouteMatch,
    navigation::{NavigateOptions, Navigator},
    routes::{CompiledRoute, RouteTree},
    state::RouterState,
};

/// Turns views into output.
///
/// This is the only part of the router that touches presentation. The router calls
/// [`Renderer::render`] once per active route, innermost first, and passes the output of the
/// next inner route as `outlet`.
pub trait Renderer<V> {
    /// What rendering produces, e.g. a string or a node tree.
    type Output;

    /// Render `view`.
    ///
    /// `outlet` is the rendered next inner route, or [`None`] for the innermost route.
    fn render(
        &mut self,
        view: &V,
        cx: &OutletContext<'_, V>,
        outlet: Option<Self::Output>,
    ) -> Self::Output;
}

/// Everything a view may know about its place in the routing.
pub struct OutletContext<'a, V> {
    level: usize,
    route: &'a CompiledRoute<V>,
    matched: &'a RouteMatch,
    state: &'a RouterState,
    navigator: Navigator,
}

impl<'a, V> OutletContext<'a, V> {
    /// How deeply the view is nested, `0` for the outermost route.
    pub fn level(&self) -> usize {
        self.level
    }

    /// The route the view belongs to.
    pub fn route(&self) -> &'a CompiledRoute<V> {
        self.route
    }

    /// The match of the route the view belongs to.
    pub fn route_match(&self) -> &'a RouteMatch {
        self.matched
    }

    /// The whole router state.
    pub fn state(&self) -> &'a RouterState {
        self.state
    }

    /// The current location.
    pub fn location(&self) -> &'a Location {
        &self.state.location
    }

    /// The state attached to the current location by the navigation that produced it.
    pub fn location_state(&self) -> Option<&'a serde_json::Value> {
        self.state.location.state.as_ref()
    }

    /// The parameters captured by this view's route and its ancestors.
    pub fn params(&self) -> &'a BTreeMap<String, String> {
        &self.matched.params
    }

    /// A single parameter.
    pub fn param(&self, name: &str) -> Option<&'a str> {
        self.matched.params.get(name).map(String::as_str)
    }

    /// The query parameters of the current location.
    pub fn query(&self) -> &'a BTreeMap<String, String> {
        &self.state.location.query
    }

    /// Resolve `target` for a link rendered by this view.
    ///
    /// Relative targets resolve against this view's route, so `contact` rendered by the view of
    /// `/app` links to `/app/contact`, no matter how deep the current location is.
    pub fn build_link(&self, target: &str) -> Result<String, RouterError> {
        Location::resolve(&self.matched.pathname_base, target).map(|l| l.path())
    }

    /// Whether a link to `target` rendered by this view points at the current location.
    pub fn is_active(&self, target: &str, exact: bool) -> bool {
        self.state
            .is_active(target, Some(self.matched.pathname_base.as_str()), exact)
    }

    /// A navigator resolving relative targets against this view's route.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Navigate to `target`, relative to this view's route.
    pub fn navigate(&self, target: impl Into<String>, options: NavigateOptions) {
        self.navigator.navigate(target, options);
    }

    /// Replace the query parameters of the current location. See [`Navigator::set_query`].
    pub fn set_query<T: Serialize + ?Sized>(
        &self,
        query: &T,
        options: NavigateOptions,
    ) -> Result<(), QueryError> {
        self.navigator.set_query(query, options)
    }
}

/// Render the active routes of `state`.
///
/// Returns [`None`] if no route is active. Redirect routes never render.
pub fn render_match<V, R: Renderer<V>>(
    tree: &RouteTree<V>,
    state: &RouterState,
    navigator: &Navigator,
    renderer: &mut R,
) -> Option<R::Output> {
    let mut outlet = None;

    for (level, matched) in state.matches.matches().iter().enumerate().rev() {
        let route = tree.route(matched.route);
        let Some(view) = route.view() else {
            outlet = None;
            continue;
        };

        let cx = OutletContext {
            level,
            route,
            matched,
            state,
            navigator: navigator.with_base(matched.pathname_base.clone()),
        };
        outlet = Some(renderer.render(view, &cx, outlet.take()));
    }

    outlet
}
