//! Pattern compilation and matching for route templates
//!
//! A template such as `/racks/$asn/*` compiles into one [`Token`] per
//! segment. Compilation is pure and validates the template so that a
//! malformed route fails when it is registered, not when a path is dispatched.

use std::fmt;

use super::{MatchResult, RouteArgs};
use crate::error::RouterError;
use crate::path::split;

/// Argument name bound by a wildcard segment
pub const WILDCARD_KEY: &str = "path";

/// Value bound by a wildcard that consumed no segments
pub const EMPTY_WILDCARD: &str = "/";

/// One compiled segment of a route template
///
/// # Examples
///
/// ```
/// use rackd_router::route::pattern::{classify_segment, Token};
///
/// assert_eq!(classify_segment("racks"), Token::Constant("racks".to_string()));
/// assert_eq!(classify_segment("$asn"), Token::Variable("asn".to_string()));
/// assert_eq!(classify_segment("*"), Token::Wildcard);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal segment, compared lower-cased
    Constant(String),
    /// `$name`: binds exactly one segment to `name`
    Variable(String),
    /// `*`: binds the rest of the path to `path`
    Wildcard,
}

/// Classifies an already lower-cased segment (pure function)
pub fn classify_segment(segment: &str) -> Token {
    if segment == "*" {
        return Token::Wildcard;
    }

    match segment.strip_prefix('$') {
        Some(name) => Token::Variable(name.to_string()),
        None => Token::Constant(segment.to_string()),
    }
}

/// Compiled route template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    template: String,
    tokens: Vec<Token>,
}

/// Compiles a route template into a [`RoutePattern`]
///
/// Rejects a wildcard anywhere but the last segment and `$` segments without
/// a name.
///
/// # Examples
///
/// ```
/// use rackd_router::route::pattern::{tokenize, Token};
///
/// let pattern = tokenize("/Racks/$asn/*").unwrap();
/// assert_eq!(
///     pattern.tokens(),
///     &[
///         Token::Constant("racks".to_string()),
///         Token::Variable("asn".to_string()),
///         Token::Wildcard,
///     ]
/// );
///
/// assert!(tokenize("/racks/*/nodes").is_err());
/// ```
pub fn tokenize(template: &str) -> Result<RoutePattern, RouterError> {
    let tokens: Vec<Token> = split(template).iter().map(|s| classify_segment(s)).collect();

    let last = tokens.len().saturating_sub(1);
    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::Wildcard if idx != last => {
                return Err(RouterError::MisplacedWildcard {
                    pattern: template.to_string(),
                });
            }
            Token::Variable(name) if name.is_empty() => {
                return Err(RouterError::EmptyVariableName {
                    pattern: template.to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(RoutePattern {
        template: template.to_string(),
        tokens,
    })
}

impl RoutePattern {
    /// The template this pattern was compiled from, as declared
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Whether the pattern ends in a wildcard
    pub fn has_wildcard(&self) -> bool {
        matches!(self.tokens.last(), Some(Token::Wildcard))
    }

    /// Matches a concrete path against this pattern
    ///
    /// Tokens and path segments are walked in lock-step. A constant must equal
    /// its segment, a variable binds whatever segment is there, and a wildcard
    /// swallows everything that is left (binding `"/"` when nothing is). The
    /// match succeeds only when both sides run out together.
    ///
    /// Bound values are lower-cased, like every segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use rackd_router::route::pattern::tokenize;
    ///
    /// let pattern = tokenize("/racks/$asn/*").unwrap();
    ///
    /// let result = pattern.matches("/racks/65000/nodes/node1");
    /// assert!(result.matched);
    /// assert_eq!(result.args.get("asn"), Some("65000"));
    /// assert_eq!(result.args.get("path"), Some("nodes/node1"));
    ///
    /// let result = pattern.matches("/racks/65000");
    /// assert_eq!(result.args.get("path"), Some("/"));
    /// ```
    pub fn matches(&self, target: &str) -> MatchResult {
        let mut values = split(target).into_iter();
        let mut tokens = self.tokens.iter();
        let mut args = RouteArgs::new();

        loop {
            match (tokens.next(), values.next()) {
                (None, None) => return MatchResult::matched(args),
                (Some(Token::Wildcard), first) => {
                    let rest: Vec<String> = first.into_iter().chain(values.by_ref()).collect();
                    let value = if rest.is_empty() {
                        EMPTY_WILDCARD.to_string()
                    } else {
                        rest.join("/")
                    };
                    args.insert(WILDCARD_KEY, value);
                    return MatchResult::matched(args);
                }
                (Some(_), None) | (None, Some(_)) => return MatchResult::unmatched(),
                (Some(Token::Variable(name)), Some(value)) => args.insert(name.as_str(), value),
                (Some(Token::Constant(expected)), Some(value)) => {
                    if *expected != value {
                        return MatchResult::unmatched();
                    }
                }
            }
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_segment() {
        assert_eq!(classify_segment("nodes"), Token::Constant("nodes".to_string()));
        assert_eq!(classify_segment("$tab"), Token::Variable("tab".to_string()));
        assert_eq!(classify_segment("*"), Token::Wildcard);
        // Only a lone star is a wildcard
        assert_eq!(classify_segment("*x"), Token::Constant("*x".to_string()));
    }

    #[test]
    fn test_tokenize_lowercases_template() {
        let pattern = tokenize("/Racks/$ASN").unwrap();
        assert_eq!(
            pattern.tokens(),
            &[
                Token::Constant("racks".to_string()),
                Token::Variable("asn".to_string())
            ]
        );
        assert_eq!(pattern.template(), "/Racks/$ASN");
    }

    #[test]
    fn test_tokenize_ignores_slashes() {
        assert_eq!(
            tokenize("racks/").unwrap().tokens(),
            tokenize("//racks").unwrap().tokens()
        );
        assert!(tokenize("/").unwrap().tokens().is_empty());
    }

    #[test]
    fn test_tokenize_rejects_misplaced_wildcard() {
        let err = tokenize("/racks/*/nodes").unwrap_err();
        assert_eq!(
            err,
            RouterError::MisplacedWildcard {
                pattern: "/racks/*/nodes".to_string()
            }
        );
        assert!(tokenize("/*/*").is_err());
        assert!(tokenize("/*").unwrap().has_wildcard());
    }

    #[test]
    fn test_tokenize_rejects_empty_variable() {
        assert!(matches!(
            tokenize("/racks/$"),
            Err(RouterError::EmptyVariableName { .. })
        ));
    }

    #[test]
    fn test_root_pattern_matches_only_root() {
        let pattern = tokenize("/").unwrap();
        assert!(pattern.matches("/").matched);
        assert!(pattern.matches("").matched);
        assert!(!pattern.matches("/racks").matched);
    }

    #[test]
    fn test_failed_match_binds_nothing() {
        let pattern = tokenize("/racks/$asn/nodes").unwrap();
        let result = pattern.matches("/racks/65000/lans");
        assert!(!result.matched);
        assert!(result.args.is_empty());
    }

    #[test]
    fn test_wildcard_alone_matches_everything() {
        let pattern = tokenize("/*").unwrap();
        assert_eq!(pattern.matches("/").args.get("path"), Some("/"));
        assert_eq!(pattern.matches("/a/B/c").args.get("path"), Some("a/b/c"));
    }
}
