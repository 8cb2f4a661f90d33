//! Errors reported by the route table and the router.

/// No route, not even a wildcard, matches a pathname.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(r#"no route matches "{pathname}""#)]
pub struct NoMatchError {
    /// The pathname that could not be matched.
    pub pathname: String,
}

/// A route declaration that can never be matched unambiguously.
///
/// These are detected when a [`RouteTree`](crate::routes::RouteTree) is built, never while
/// matching.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteConfigError {
    /// A parameter name occurs more than once along one accumulated path.
    #[error(r#"duplicate parameter ":{name}" in route "{path}""#)]
    DuplicateParameter {
        /// The full pattern of the offending route.
        path: String,
        /// The repeated parameter name.
        name: String,
    },

    /// A parameter segment without a name (a lone `:`).
    #[error(r#"empty parameter name in route "{path}""#)]
    EmptyParameterName {
        /// The declared path of the offending route.
        path: String,
    },

    /// A `*` that is not the final segment of a route's full pattern.
    #[error(r#"a wildcard must be the last segment of a route, found "{path}""#)]
    MisplacedWildcard {
        /// The full pattern of the offending route.
        path: String,
    },

    /// An absolute path that doesn't continue its parent's path.
    #[error(r#"absolute route path "{path}" nested under "{parent}" must start with "{parent}""#)]
    AbsolutePathOutsideParent {
        /// The declared absolute path.
        path: String,
        /// The parent's full pattern.
        parent: String,
    },

    /// Two or more index routes share a parent.
    #[error(r#"more than one index route under "{parent}""#)]
    MultipleIndexRoutes {
        /// The parent's full pattern.
        parent: String,
    },

    /// An index route was declared with children.
    #[error(r#"index route under "{parent}" must not have children"#)]
    IndexWithChildren {
        /// The parent's full pattern.
        parent: String,
    },

    /// A redirect route was declared with children, which could never render.
    #[error(r#"redirect route "{path}" must not have children"#)]
    RedirectWithChildren {
        /// The full pattern of the redirect route.
        path: String,
    },
}

/// Query parameters that cannot be written as a query string.
#[derive(Debug, thiserror::Error)]
#[error("cannot serialize query parameters: {0}")]
pub struct QueryError(#[from] pub serde_urlencoded::ser::Error);

/// An error produced while navigating.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Redirect routes kept redirecting past the configured limit.
    #[error(r#"more than {limit} redirects while navigating, last path "{path}""#)]
    RedirectLoop {
        /// The path the router arrived at when it gave up.
        path: String,
        /// The configured limit.
        limit: usize,
    },

    /// A navigation target that cannot be resolved to a path.
    #[error(r#"invalid navigation target "{target}": {source}"#)]
    InvalidTarget {
        /// The target as given.
        target: String,
        /// Why it could not be resolved.
        #[source]
        source: url::ParseError,
    },

    /// See [`QueryError`].
    #[error(transparent)]
    Query(#[from] QueryError),
}
