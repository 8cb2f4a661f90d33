/// What a route does once it is matched.
#[derive(Clone, Debug, PartialEq)]
pub enum RouteContent<V> {
    /// Render a view.
    View(V),
    /// Causes a redirect when the route is matched.
    ///
    /// Redirects are performed as a _replace_ operation. This means that the redirecting path
    /// won't be part of the history. Relative targets resolve against the parent route.
    Redirect(String),
}

impl<V> RouteContent<V> {
    /// The view, unless this is a redirect.
    pub fn view(&self) -> Option<&V> {
        match self {
            RouteContent::View(v) => Some(v),
            RouteContent::Redirect(_) => None,
        }
    }

    /// The redirect target, if this is a redirect.
    pub fn redirect(&self) -> Option<&str> {
        match self {
            RouteContent::View(_) => None,
            RouteContent::Redirect(target) => Some(target),
        }
    }
}

/// A route declaration.
///
/// Routes are declared as a tree and compiled into a [`RouteTree`](super::RouteTree) once at
/// startup:
///
/// ```rust
/// # use waypoint_router::prelude::*;
/// let routes = vec![RouteNode::new("/", "layout")
///     .child(RouteNode::index("welcome"))
///     .child(
///         RouteNode::new("/app", "app")
///             .child(RouteNode::index("app home"))
///             .child(RouteNode::new(":slug", "other"))
///             .child(RouteNode::new("about", "about"))
///             .child(RouteNode::new("/app/contact", "contact"))
///             .child(RouteNode::redirect("redirect-me", "/app/about")),
///     )
///     .child(RouteNode::new("*", "not found"))];
///
/// let tree = RouteTree::new(routes).unwrap();
/// assert_eq!(tree.len(), 9);
/// ```
#[derive(Clone, Debug)]
pub struct RouteNode<V> {
    pub(crate) path: Option<String>,
    pub(crate) index: bool,
    pub(crate) content: RouteContent<V>,
    pub(crate) children: Vec<RouteNode<V>>,
    pub(crate) case_sensitive: bool,
}

impl<V> RouteNode<V> {
    /// A route rendering `view` at `path`.
    ///
    /// Paths starting with `/` are absolute and must continue the parent's path. All other paths
    /// are relative to the parent.
    pub fn new(path: impl Into<String>, view: V) -> Self {
        Self::with_content(Some(path.into()), false, RouteContent::View(view))
    }

    /// An _index_ route.
    ///
    /// The index route is rendered into its parent's outlet when no further path segment is
    /// present. It has no path and no children.
    pub fn index(view: V) -> Self {
        Self::with_content(None, true, RouteContent::View(view))
    }

    /// A route without a path of its own, wrapping its children in `view`.
    pub fn layout(view: V) -> Self {
        Self::with_content(None, false, RouteContent::View(view))
    }

    /// A route that replaces the current location with `to` instead of rendering.
    pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
        Self::with_content(Some(path.into()), false, RouteContent::Redirect(to.into()))
    }

    /// An index route that redirects.
    pub fn index_redirect(to: impl Into<String>) -> Self {
        Self::with_content(None, true, RouteContent::Redirect(to.into()))
    }

    fn with_content(path: Option<String>, index: bool, content: RouteContent<V>) -> Self {
        Self {
            path,
            index,
            content,
            children: Vec::new(),
            case_sensitive: false,
        }
    }

    /// Add a nested route.
    pub fn child(mut self, child: RouteNode<V>) -> Self {
        self.children.push(child);
        self
    }

    /// Add several nested routes, in order.
    pub fn children(mut self, children: impl IntoIterator<Item = RouteNode<V>>) -> Self {
        self.children.extend(children);
        self
    }

    /// Compare this route's literal segments case sensitively. Defaults to [`false`].
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// The declared path, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Whether this is an index route.
    pub fn is_index(&self) -> bool {
        self.index
    }
}
