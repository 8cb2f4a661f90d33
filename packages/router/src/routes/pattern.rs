use std::fmt::{Display, Formatter};

use crate::error::RouteConfigError;

/// One segment of a route pattern, i.e. the stuff between two slashes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PatternSegment {
    /// Matches exactly this text.
    Literal(String),
    /// `:name`, matches any single segment and captures it.
    Parameter(String),
    /// `*`, matches the rest of the path, including nothing.
    Wildcard,
}

impl PatternSegment {
    /// Lower is more specific. Candidates are tried in this order.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            PatternSegment::Literal(_) => 0,
            PatternSegment::Parameter(_) => 1,
            PatternSegment::Wildcard => 2,
        }
    }
}

impl Display for PatternSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternSegment::Literal(l) => write!(f, "{l}"),
            PatternSegment::Parameter(p) => write!(f, ":{p}"),
            PatternSegment::Wildcard => write!(f, "*"),
        }
    }
}

/// Format a full pattern as a path, `/` for the empty pattern.
pub(crate) fn pattern_to_string(pattern: &[PatternSegment]) -> String {
    let mut res = String::new();
    for seg in pattern {
        res.push('/');
        res += &seg.to_string();
    }

    if res.is_empty() {
        res.push('/');
    }
    res
}

/// Split a declared path into segments.
///
/// Empty segments are dropped, so `/app/`, `app` and `//app` all yield `["app"]`.
pub(crate) fn parse_pattern(path: &str) -> Result<Vec<PatternSegment>, RouteConfigError> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s {
            "*" => Ok(PatternSegment::Wildcard),
            _ => match s.strip_prefix(':') {
                Some("") => Err(RouteConfigError::EmptyParameterName {
                    path: path.to_string(),
                }),
                Some(name) => Ok(PatternSegment::Parameter(name.to_string())),
                None => Ok(PatternSegment::Literal(s.to_string())),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_mixed() {
        assert_eq!(
            parse_pattern("/app/:slug/*").unwrap(),
            vec![
                PatternSegment::Literal("app".into()),
                PatternSegment::Parameter("slug".into()),
                PatternSegment::Wildcard,
            ]
        );
    }

    #[test]
    fn parse_ignores_redundant_slashes() {
        assert_eq!(parse_pattern("//about/").unwrap(), parse_pattern("about").unwrap());
        assert!(parse_pattern("/").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_empty_parameter() {
        assert_eq!(
            parse_pattern("/app/:"),
            Err(RouteConfigError::EmptyParameterName {
                path: "/app/:".into()
            })
        );
    }

    #[test]
    fn display_round_trip() {
        let pattern = parse_pattern("app/:slug/*").unwrap();
        assert_eq!(pattern_to_string(&pattern), "/app/:slug/*");
        assert_eq!(pattern_to_string(&[]), "/");
    }

    #[test]
    fn rank_orders_literal_parameter_wildcard() {
        let lit = PatternSegment::Literal("a".into());
        let par = PatternSegment::Parameter("a".into());
        assert!(lit.rank() < par.rank());
        assert!(par.rank() < PatternSegment::Wildcard.rank());
    }
}
