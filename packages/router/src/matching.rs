//! Finding the active routes for a location.

use std::collections::BTreeMap;

use tracing::trace;
use urlencoding::decode;

use crate::{
    error::NoMatchError,
    location::Location,
    routes::{CompiledRoute, PatternSegment, RouteId, RouteTree},
};

/// One matched route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch {
    /// The matched route.
    pub route: RouteId,
    /// All parameters captured by this route and its ancestors.
    pub params: BTreeMap<String, String>,
    /// The part of the pathname matched by this route and its ancestors.
    pub pathname: String,
    /// Like `pathname`, but without the part matched by a wildcard. Relative links resolve
    /// against this.
    pub pathname_base: String,
}

/// The chain of active routes, from the outermost to the innermost.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchResult {
    matches: Vec<RouteMatch>,
}

impl MatchResult {
    /// All matched routes, outermost first.
    pub fn matches(&self) -> &[RouteMatch] {
        &self.matches
    }

    /// The innermost matched route.
    pub fn deepest(&self) -> Option<&RouteMatch> {
        self.matches.last()
    }

    /// The parameters of the innermost matched route (which include all outer parameters).
    pub fn params(&self) -> Option<&BTreeMap<String, String>> {
        self.deepest().map(|m| &m.params)
    }

    /// Whether no route is matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The number of matched routes.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether `route` is part of the chain.
    pub fn contains(&self, route: RouteId) -> bool {
        self.matches.iter().any(|m| m.route == route)
    }

    /// If the innermost route redirects, its target and the base the target resolves against.
    pub fn redirect<'a, V>(&self, tree: &'a RouteTree<V>) -> Option<(&'a str, String)> {
        let deepest = self.deepest()?;
        let target = tree.route(deepest.route).content().redirect()?;
        let base = match self.matches.len() {
            0 | 1 => String::from("/"),
            n => self.matches[n - 2].pathname_base.clone(),
        };
        Some((target, base))
    }
}

/// A pathname segment, as found in the location and decoded.
struct PathSegment<'a> {
    raw: &'a str,
    decoded: String,
}

/// Find the active routes for `location`.
///
/// Candidates on each level are tried from most to least specific: literal segments before
/// parameters before wildcards, in declaration order otherwise. If a candidate matches but none
/// of its children can take the rest of the path, the next candidate is tried.
///
/// ```rust
/// # use waypoint_router::prelude::*;
/// let tree = RouteTree::new(vec![RouteNode::new("/app", "app")
///     .child(RouteNode::new(":slug", "other"))
///     .child(RouteNode::new("about", "about"))])
/// .unwrap();
///
/// let matched = resolve(&Location::parse("/app/about").unwrap(), &tree).unwrap();
/// assert_eq!(tree.route(matched.deepest().unwrap().route).view(), Some(&"about"));
///
/// let matched = resolve(&Location::parse("/app/xyz").unwrap(), &tree).unwrap();
/// assert_eq!(matched.params().unwrap()["slug"], "xyz");
/// ```
pub fn resolve<V>(location: &Location, tree: &RouteTree<V>) -> Result<MatchResult, NoMatchError> {
    let segments: Vec<_> = location
        .pathname
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|raw| PathSegment {
            raw,
            decoded: decode(raw)
                .map(|d| d.into_owned())
                .unwrap_or_else(|_| raw.to_string()),
        })
        .collect();

    let mut result = MatchResult::default();
    let mut params = BTreeMap::new();
    if match_level(tree, tree.roots(), &segments, 0, &mut params, &mut result.matches) {
        Ok(result)
    } else {
        Err(NoMatchError {
            pathname: location.pathname.clone(),
        })
    }
}

/// Order `candidates` from most to least specific.
fn rank<V>(tree: &RouteTree<V>, candidates: &[RouteId]) -> Vec<RouteId> {
    let mut ranked = candidates.to_vec();
    // stable, so declaration order breaks ties
    ranked.sort_by_cached_key(|id| {
        let route = tree.route(*id);
        let ranks: Vec<u8> = route.own_segments().iter().map(|s| s.rank()).collect();
        (ranks, !route.is_index())
    });
    ranked
}

fn join(segments: &[PathSegment]) -> String {
    let mut res = String::new();
    for seg in segments {
        res.push('/');
        res += seg.raw;
    }
    if res.is_empty() {
        res.push('/');
    }
    res
}

fn match_level<V>(
    tree: &RouteTree<V>,
    candidates: &[RouteId],
    segments: &[PathSegment],
    consumed: usize,
    params: &mut BTreeMap<String, String>,
    chain: &mut Vec<RouteMatch>,
) -> bool {
    for id in rank(tree, candidates) {
        let route = tree.route(id);

        if route.is_index() {
            if consumed == segments.len() {
                trace!(route = id, "index route matched");
                chain.push(RouteMatch {
                    route: id,
                    params: params.clone(),
                    pathname: join(&segments[..consumed]),
                    pathname_base: join(&segments[..consumed]),
                });
                return true;
            }
            continue;
        }

        let saved_params = params.clone();
        let saved_len = chain.len();

        let Some((end, base_end)) = match_own(route, segments, consumed, params) else {
            *params = saved_params;
            continue;
        };

        trace!(route = id, pattern = %route.path_pattern(), "candidate matched");
        chain.push(RouteMatch {
            route: id,
            params: params.clone(),
            pathname: join(&segments[..end]),
            pathname_base: join(&segments[..base_end]),
        });

        let children = route.children();
        let nested = !children.is_empty()
            && match_level(tree, children, segments, end, params, chain);

        // a route is the innermost match only if it used up the whole path
        if nested || end == segments.len() {
            return true;
        }

        chain.truncate(saved_len);
        *params = saved_params;
    }

    false
}

/// Match the segments `route` adds to its parent against the path, starting at `start`.
///
/// Returns where the match ends and where the part before a wildcard ends.
fn match_own<V>(
    route: &CompiledRoute<V>,
    segments: &[PathSegment],
    start: usize,
    params: &mut BTreeMap<String, String>,
) -> Option<(usize, usize)> {
    let mut pos = start;
    for seg in route.own_segments() {
        match seg {
            PatternSegment::Literal(literal) => {
                let current = segments.get(pos)?;
                let equal = match route.is_case_sensitive() {
                    true => current.decoded == *literal,
                    false => current.decoded.eq_ignore_ascii_case(literal),
                };
                if !equal {
                    return None;
                }
                pos += 1;
            }
            PatternSegment::Parameter(name) => {
                let current = segments.get(pos)?;
                params.insert(name.clone(), current.decoded.clone());
                pos += 1;
            }
            PatternSegment::Wildcard => {
                let rest: Vec<_> = segments[pos..].iter().map(|s| s.decoded.as_str()).collect();
                params.insert(String::from("*"), rest.join("/"));
                return Some((segments.len(), pos));
            }
        }
    }

    Some((pos, pos))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::routes::RouteNode;

    fn tree() -> RouteTree<&'static str> {
        RouteTree::new(vec![RouteNode::new("/", "layout")
            .child(RouteNode::index("welcome"))
            .child(
                RouteNode::new("/app", "app")
                    .child(RouteNode::index("app home"))
                    .child(RouteNode::new(":slug", "other"))
                    .child(RouteNode::new("about", "about"))
                    .child(RouteNode::new("/app/contact", "contact"))
                    .child(RouteNode::redirect("redirect-me", "/app/about")),
            )
            .child(RouteNode::new("*", "not found"))])
        .unwrap()
    }

    fn views(tree: &RouteTree<&'static str>, path: &str) -> Vec<&'static str> {
        let matched = resolve(&Location::parse(path).unwrap(), tree).unwrap();
        matched
            .matches()
            .iter()
            .filter_map(|m| tree.route(m.route).view().copied())
            .collect()
    }

    #[test]
    fn root_renders_index() {
        let tree = tree();
        assert_eq!(views(&tree, "/"), vec!["layout", "welcome"]);
    }

    #[test]
    fn literal_beats_parameter_declared_earlier() {
        let tree = tree();
        assert_eq!(views(&tree, "/app/about"), vec!["layout", "app", "about"]);
        assert_eq!(views(&tree, "/app/contact"), vec!["layout", "app", "contact"]);
    }

    #[test]
    fn parameter_is_captured() {
        let tree = tree();
        let matched = resolve(&Location::parse("/app/xyz").unwrap(), &tree).unwrap();
        let deepest = matched.deepest().unwrap();
        assert_eq!(tree.route(deepest.route).view(), Some(&"other"));
        assert_eq!(deepest.params.get("slug").map(String::as_str), Some("xyz"));
        assert_eq!(deepest.pathname, "/app/xyz");
    }

    #[test]
    fn parameter_is_decoded() {
        let tree = tree();
        let matched = resolve(&Location::parse("/app/hello%20world").unwrap(), &tree).unwrap();
        assert_eq!(matched.params().unwrap()["slug"], "hello world");
    }

    #[test]
    fn too_deep_falls_back_to_wildcard() {
        let tree = tree();
        let matched =
            resolve(&Location::parse("/app/does/not/exist/at/all").unwrap(), &tree).unwrap();
        assert_eq!(
            views(&tree, "/app/does/not/exist/at/all"),
            vec!["layout", "not found"]
        );
        let deepest = matched.deepest().unwrap();
        assert_eq!(deepest.params["*"], "app/does/not/exist/at/all");
        assert_eq!(deepest.pathname, "/app/does/not/exist/at/all");
        assert_eq!(deepest.pathname_base, "/");
    }

    #[test]
    fn parent_exact_renders_index() {
        let tree = tree();
        assert_eq!(views(&tree, "/app"), vec!["layout", "app", "app home"]);
        assert_eq!(views(&tree, "/app/"), vec!["layout", "app", "app home"]);
    }

    #[test]
    fn literals_ignore_case_by_default() {
        let tree = tree();
        assert_eq!(views(&tree, "/APP/About"), vec!["layout", "app", "about"]);
    }

    #[test]
    fn case_sensitive_route() {
        let tree = RouteTree::new(vec![
            RouteNode::new("/About", "about").case_sensitive(true),
            RouteNode::new("*", "not found"),
        ])
        .unwrap();
        assert_eq!(views(&tree, "/About"), vec!["about"]);
        assert_eq!(views(&tree, "/about"), vec!["not found"]);
    }

    #[test]
    fn redirect_is_reported() {
        let tree = tree();
        let matched = resolve(&Location::parse("/app/redirect-me").unwrap(), &tree).unwrap();
        assert_eq!(matched.redirect(&tree), Some(("/app/about", String::from("/app"))));

        let matched = resolve(&Location::parse("/app/about").unwrap(), &tree).unwrap();
        assert_eq!(matched.redirect(&tree), None);
    }

    #[test]
    fn no_match_without_wildcard() {
        let tree = RouteTree::new(vec![RouteNode::new("/app", "app")]).unwrap();
        let err = resolve(&Location::parse("/nope").unwrap(), &tree).unwrap_err();
        assert_eq!(
            err,
            NoMatchError {
                pathname: "/nope".into()
            }
        );
    }

    #[test]
    fn leaf_needs_whole_path() {
        let tree = RouteTree::new(vec![RouteNode::new("/app", "app")]).unwrap();
        assert!(resolve(&Location::parse("/app/more").unwrap(), &tree).is_err());
    }

    #[test]
    fn parent_without_index_is_innermost() {
        let tree = RouteTree::new(vec![
            RouteNode::new("/app", "app").child(RouteNode::new("about", "about"))
        ])
        .unwrap();
        assert_eq!(views(&tree, "/app"), vec!["app"]);
    }

    #[test]
    fn backtracks_to_longer_sibling() {
        let tree = RouteTree::new(vec![
            RouteNode::new("/a", "short"),
            RouteNode::new("/a/b", "long"),
        ])
        .unwrap();
        assert_eq!(views(&tree, "/a/b"), vec!["long"]);
        assert_eq!(views(&tree, "/a"), vec!["short"]);
    }

    #[test]
    fn backtracking_drops_captured_parameters() {
        let tree = RouteTree::new(vec![
            RouteNode::new("/:first", "param").child(RouteNode::new("deep", "deep")),
            RouteNode::new("*", "rest"),
        ])
        .unwrap();
        let matched = resolve(&Location::parse("/x/other").unwrap(), &tree).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched.params().unwrap().get("first"), None);
        assert_eq!(matched.params().unwrap()["*"], "x/other");
    }

    #[test]
    fn nested_parameters_accumulate() {
        let tree = RouteTree::new(vec![
            RouteNode::new("/user/:user", "user").child(RouteNode::new("post/:post", "post"))
        ])
        .unwrap();
        let matched = resolve(&Location::parse("/user/7/post/42").unwrap(), &tree).unwrap();
        let outer = &matched.matches()[0];
        assert_eq!(outer.params.len(), 1);
        assert_eq!(outer.pathname, "/user/7");

        let inner = matched.deepest().unwrap();
        assert_eq!(inner.params["user"], "7");
        assert_eq!(inner.params["post"], "42");
    }

    #[test]
    fn nested_wildcard_keeps_outer_base() {
        let tree = RouteTree::new(vec![
            RouteNode::new("/docs", "docs").child(RouteNode::new("*", "page"))
        ])
        .unwrap();
        let matched = resolve(&Location::parse("/docs/guide/intro").unwrap(), &tree).unwrap();
        let deepest = matched.deepest().unwrap();
        assert_eq!(deepest.params["*"], "guide/intro");
        assert_eq!(deepest.pathname_base, "/docs");
    }

    #[test]
    fn pathless_layout_is_transparent() {
        let tree = RouteTree::new(vec![RouteNode::layout("shell")
            .child(RouteNode::new("about", "about"))])
        .unwrap();
        assert_eq!(views(&tree, "/about"), vec!["shell", "about"]);
    }
}
