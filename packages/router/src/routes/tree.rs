use std::collections::HashSet;

use tracing::debug;

use crate::error::RouteConfigError;

use super::{
    pattern::{parse_pattern, pattern_to_string},
    PatternSegment, RouteContent, RouteNode,
};

/// Identifies a route within its [`RouteTree`].
pub type RouteId = usize;

/// A route after compilation, with its full accumulated pattern.
#[derive(Debug)]
pub struct CompiledRoute<V> {
    id: RouteId,
    parent: Option<RouteId>,
    pattern: Vec<PatternSegment>,
    own_start: usize,
    index: bool,
    content: RouteContent<V>,
    children: Vec<RouteId>,
    case_sensitive: bool,
}

impl<V> CompiledRoute<V> {
    /// The id of this route.
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// The id of the parent route, [`None`] for top level routes.
    pub fn parent(&self) -> Option<RouteId> {
        self.parent
    }

    /// The full pattern, from the application root.
    pub fn pattern(&self) -> &[PatternSegment] {
        &self.pattern
    }

    /// The segments this route adds to its parent's pattern.
    pub fn own_segments(&self) -> &[PatternSegment] {
        &self.pattern[self.own_start..]
    }

    /// The full pattern formatted as a path, e.g. `/app/:slug`.
    pub fn path_pattern(&self) -> String {
        pattern_to_string(&self.pattern)
    }

    /// Whether this is an index route.
    pub fn is_index(&self) -> bool {
        self.index
    }

    /// What the route does when matched.
    pub fn content(&self) -> &RouteContent<V> {
        &self.content
    }

    /// The view, unless this is a redirect.
    pub fn view(&self) -> Option<&V> {
        self.content.view()
    }

    /// Nested routes, in declaration order.
    pub fn children(&self) -> &[RouteId] {
        &self.children
    }

    /// Whether literal segments are compared case sensitively.
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

/// The compiled, immutable route table.
///
/// Built once from a list of top level [`RouteNode`]s. All declaration errors are reported here,
/// so matching never has to deal with an ambiguous table.
#[derive(Debug)]
pub struct RouteTree<V> {
    routes: Vec<CompiledRoute<V>>,
    roots: Vec<RouteId>,
}

impl<V> RouteTree<V> {
    /// Compile `routes`.
    pub fn new(routes: Vec<RouteNode<V>>) -> Result<Self, RouteConfigError> {
        let mut tree = Self {
            routes: Vec::new(),
            roots: Vec::new(),
        };

        check_index_count(&routes, &[])?;
        for route in routes {
            let id = tree.compile(route, None, &[])?;
            tree.roots.push(id);
        }

        debug!(routes = tree.routes.len(), "compiled route tree");
        Ok(tree)
    }

    fn compile(
        &mut self,
        node: RouteNode<V>,
        parent: Option<RouteId>,
        parent_pattern: &[PatternSegment],
    ) -> Result<RouteId, RouteConfigError> {
        let RouteNode {
            path,
            index,
            content,
            children,
            case_sensitive,
        } = node;

        if index && !children.is_empty() {
            return Err(RouteConfigError::IndexWithChildren {
                parent: pattern_to_string(parent_pattern),
            });
        }

        let pattern = match &path {
            None => parent_pattern.to_vec(),
            Some(p) if p.starts_with('/') => {
                let absolute = parse_pattern(p)?;
                if !absolute.starts_with(parent_pattern) {
                    return Err(RouteConfigError::AbsolutePathOutsideParent {
                        path: p.clone(),
                        parent: pattern_to_string(parent_pattern),
                    });
                }
                absolute
            }
            Some(p) => {
                let mut full = parent_pattern.to_vec();
                full.extend(parse_pattern(p)?);
                full
            }
        };

        let full = pattern_to_string(&pattern);
        if let Some(pos) = pattern.iter().position(|s| *s == PatternSegment::Wildcard) {
            if pos + 1 != pattern.len() {
                return Err(RouteConfigError::MisplacedWildcard { path: full });
            }
        }

        let mut names = HashSet::new();
        for seg in &pattern {
            if let PatternSegment::Parameter(name) = seg {
                if !names.insert(name.as_str()) {
                    return Err(RouteConfigError::DuplicateParameter {
                        path: full,
                        name: name.clone(),
                    });
                }
            }
        }

        if content.redirect().is_some() && !children.is_empty() {
            return Err(RouteConfigError::RedirectWithChildren { path: full });
        }

        check_index_count(&children, &pattern)?;

        let id = self.routes.len();
        self.routes.push(CompiledRoute {
            id,
            parent,
            own_start: parent_pattern.len(),
            pattern,
            index,
            content,
            children: Vec::with_capacity(children.len()),
            case_sensitive,
        });

        let pattern = self.routes[id].pattern.clone();
        for child in children {
            let child_id = self.compile(child, Some(id), &pattern)?;
            self.routes[id].children.push(child_id);
        }

        Ok(id)
    }

    /// Get a route by id.
    ///
    /// # Panic
    /// If `id` doesn't belong to this tree.
    pub fn route(&self, id: RouteId) -> &CompiledRoute<V> {
        &self.routes[id]
    }

    /// The top level routes, in declaration order.
    pub fn roots(&self) -> &[RouteId] {
        &self.roots
    }

    /// All routes in depth first declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledRoute<V>> {
        self.routes.iter()
    }

    /// The number of routes, including index and redirect routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the tree has no routes at all.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Generate a sitemap.
    ///
    /// Every path the table can route, in declaration order. Parameter segments keep their
    /// `:name` and wildcards their `*`. Redirect routes are listed with their target. Index
    /// routes and routes without a path of their own are covered by their parent's entry.
    ///
    /// ```rust
    /// # use waypoint_router::prelude::*;
    /// let tree = RouteTree::new(vec![RouteNode::new("/", ())
    ///     .child(RouteNode::index(()))
    ///     .child(RouteNode::new("app", ()).child(RouteNode::new(":slug", ())))
    ///     .child(RouteNode::redirect("old", "/app"))
    ///     .child(RouteNode::new("*", ()))])
    /// .unwrap();
    ///
    /// assert_eq!(tree.sitemap(), vec!["/", "/app", "/app/:slug", "/old -> /app", "/*"]);
    /// ```
    pub fn sitemap(&self) -> Vec<String> {
        self.routes
            .iter()
            .filter(|r| !r.index && (r.parent.is_none() || !r.own_segments().is_empty()))
            .map(|r| match r.content.redirect() {
                Some(target) => format!("{} -> {target}", r.path_pattern()),
                None => r.path_pattern(),
            })
            .collect()
    }
}

fn check_index_count<V>(
    siblings: &[RouteNode<V>],
    parent_pattern: &[PatternSegment],
) -> Result<(), RouteConfigError> {
    if siblings.iter().filter(|c| c.index).count() > 1 {
        return Err(RouteConfigError::MultipleIndexRoutes {
            parent: pattern_to_string(parent_pattern),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn demo() -> Vec<RouteNode<&'static str>> {
        vec![RouteNode::new("/", "layout")
            .child(RouteNode::index("welcome"))
            .child(
                RouteNode::new("/app", "app")
                    .child(RouteNode::index("app home"))
                    .child(RouteNode::new(":slug", "other"))
                    .child(RouteNode::new("about", "about"))
                    .child(RouteNode::new("/app/contact", "contact"))
                    .child(RouteNode::redirect("redirect-me", "/app/about")),
            )
            .child(RouteNode::new("*", "not found"))]
    }

    #[test]
    fn accumulates_patterns() {
        let tree = RouteTree::new(demo()).unwrap();
        let patterns: Vec<_> = tree.iter().map(|r| r.path_pattern()).collect();
        assert_eq!(
            patterns,
            vec![
                "/",
                "/",
                "/app",
                "/app",
                "/app/:slug",
                "/app/about",
                "/app/contact",
                "/app/redirect-me",
                "/*",
            ]
        );
    }

    #[test]
    fn own_segments_of_absolute_child() {
        let tree = RouteTree::new(demo()).unwrap();
        let contact = tree
            .iter()
            .find(|r| r.view() == Some(&"contact"))
            .unwrap();
        assert_eq!(
            contact.own_segments(),
            &[PatternSegment::Literal("contact".into())]
        );
        assert_eq!(tree.route(contact.parent().unwrap()).view(), Some(&"app"));
    }

    #[test]
    fn children_and_roots() {
        let tree = RouteTree::new(demo()).unwrap();
        assert_eq!(tree.roots(), &[0]);
        assert_eq!(tree.route(0).children(), &[1, 2, 8]);
        assert_eq!(tree.route(2).children(), &[3, 4, 5, 6, 7]);
    }

    #[test]
    fn duplicate_parameter() {
        let err = RouteTree::new(vec![
            RouteNode::new("/user/:id", ()).child(RouteNode::new("post/:id", ()))
        ])
        .unwrap_err();

        assert_eq!(
            err,
            RouteConfigError::DuplicateParameter {
                path: "/user/:id/post/:id".into(),
                name: "id".into(),
            }
        );
    }

    #[test]
    fn two_index_routes() {
        let err = RouteTree::new(vec![RouteNode::new("/app", ())
            .child(RouteNode::index(()))
            .child(RouteNode::index(()))])
        .unwrap_err();

        assert_eq!(
            err,
            RouteConfigError::MultipleIndexRoutes {
                parent: "/app".into()
            }
        );
    }

    #[test]
    fn two_top_level_index_routes() {
        let err = RouteTree::new(vec![RouteNode::index(()), RouteNode::index(())]).unwrap_err();
        assert_eq!(
            err,
            RouteConfigError::MultipleIndexRoutes { parent: "/".into() }
        );
    }

    #[test]
    fn absolute_child_outside_parent() {
        let err = RouteTree::new(vec![
            RouteNode::new("/app", ()).child(RouteNode::new("/contact", ()))
        ])
        .unwrap_err();

        assert_eq!(
            err,
            RouteConfigError::AbsolutePathOutsideParent {
                path: "/contact".into(),
                parent: "/app".into(),
            }
        );
    }

    #[test]
    fn wildcard_must_be_last() {
        let err = RouteTree::new(vec![RouteNode::new("/files/*/raw", ())]).unwrap_err();
        assert_eq!(
            err,
            RouteConfigError::MisplacedWildcard {
                path: "/files/*/raw".into()
            }
        );

        let err = RouteTree::new(vec![
            RouteNode::new("/files/*", ()).child(RouteNode::new("raw", ()))
        ])
        .unwrap_err();
        assert!(matches!(err, RouteConfigError::MisplacedWildcard { .. }));
    }

    #[test]
    fn index_with_children() {
        let err = RouteTree::new(vec![
            RouteNode::index(()).child(RouteNode::new("nested", ()))
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RouteConfigError::IndexWithChildren { parent: "/".into() }
        );
    }

    #[test]
    fn redirect_with_children() {
        let err = RouteTree::new(vec![
            RouteNode::redirect("/old", "/new").child(RouteNode::new("nested", ()))
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RouteConfigError::RedirectWithChildren {
                path: "/old".into()
            }
        );
    }

    #[test]
    fn sitemap_of_demo() {
        let tree = RouteTree::new(demo()).unwrap();
        assert_eq!(
            tree.sitemap(),
            vec![
                "/",
                "/app",
                "/app/:slug",
                "/app/about",
                "/app/contact",
                "/app/redirect-me -> /app/about",
                "/*",
            ]
        );
    }
}
