//! Route definitions: compiled pattern plus what to do on a match
//!
//! - `pattern`: template compilation and segment matching
//! - `RouteArgs`/`MatchResult`: the values a match binds
//! - `RouteAction`: invoke a handler or redirect elsewhere

pub mod pattern;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

pub use pattern::{classify_segment, tokenize, RoutePattern, Token};

/// Callback invoked with the arguments of a matched route
pub type Handler = Arc<dyn Fn(&RouteArgs) + Send + Sync>;

/// Callback invoked when no route matches
pub type FallbackHandler = Arc<dyn Fn() + Send + Sync>;

/// Ordered name → value mapping bound while matching
///
/// Order follows the order in which tokens were bound. Binding a name a
/// second time replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteArgs {
    entries: Vec<(String, String)>,
}

impl RouteArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plain key/value view of the arguments (order is not preserved)
    pub fn to_map(&self) -> HashMap<String, String> {
        self.entries.iter().cloned().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for RouteArgs
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = RouteArgs::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

impl From<RouteArgs> for HashMap<String, String> {
    fn from(args: RouteArgs) -> Self {
        args.entries.into_iter().collect()
    }
}

// Serialized as an object with keys in binding order
impl Serialize for RouteArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Outcome of matching one pattern against one path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: bool,
    /// Bound arguments; empty when `matched` is false
    pub args: RouteArgs,
}

impl MatchResult {
    pub fn matched(args: RouteArgs) -> Self {
        Self {
            matched: true,
            args,
        }
    }

    pub fn unmatched() -> Self {
        Self::default()
    }
}

/// What a route does once it matched
#[derive(Clone)]
pub enum RouteAction {
    /// Hand the bound arguments to a callback
    Invoke(Handler),
    /// Rewrite the location from this template and dispatch again
    Redirect(String),
}

impl fmt::Debug for RouteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteAction::Invoke(_) => f.write_str("Invoke(<handler>)"),
            RouteAction::Redirect(target) => f.debug_tuple("Redirect").field(target).finish(),
        }
    }
}

/// A registered route
#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: RoutePattern,
    pub action: RouteAction,
}

impl Route {
    /// Creates a handler route, validating the template
    pub fn handler(
        template: &str,
        handler: impl Fn(&RouteArgs) + Send + Sync + 'static,
    ) -> Result<Self, crate::RouterError> {
        Ok(Self {
            pattern: tokenize(template)?,
            action: RouteAction::Invoke(Arc::new(handler)),
        })
    }

    /// Creates a redirect route, validating the template
    pub fn redirect(template: &str, target: impl Into<String>) -> Result<Self, crate::RouterError> {
        Ok(Self {
            pattern: tokenize(template)?,
            action: RouteAction::Redirect(target.into()),
        })
    }

    pub fn matches(&self, path: &str) -> MatchResult {
        self.pattern.matches(path)
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self.action, RouteAction::Redirect(_))
    }

    /// Redirect target with the bound arguments substituted
    ///
    /// Returns None if this is not a redirect route.
    ///
    /// # Examples
    ///
    /// ```
    /// use rackd_router::route::Route;
    ///
    /// let route = Route::redirect("/racks/$asn/", "/racks/$asn/nodes").unwrap();
    /// let result = route.matches("/racks/65000/");
    ///
    /// assert_eq!(route.redirect_target(&result.args).as_deref(), Some("/racks/65000/nodes"));
    /// ```
    pub fn redirect_target(&self, args: &RouteArgs) -> Option<String> {
        match &self.action {
            RouteAction::Redirect(target) => Some(substitute(target, args)),
            RouteAction::Invoke(_) => None,
        }
    }
}

/// Replaces every `$name` placeholder of `template` whose name is bound in `args`
///
/// Placeholders may sit anywhere in the text (`/racks/as$asn.json`). When
/// several bound names fit at a `$`, the longest one wins, so `$as` never
/// eats the front of `$asn`. Unbound placeholders are left in place.
///
/// # Examples
///
/// ```
/// use rackd_router::route::substitute;
/// use rackd_router::RouteArgs;
///
/// let args: RouteArgs = [("asn", "65000")].into_iter().collect();
/// assert_eq!(substitute("/racks/as$asn/$tab", &args), "/racks/as65000/$tab");
/// ```
pub fn substitute(template: &str, args: &RouteArgs) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    let mut bound: Vec<(&str, &str)> = args.iter().collect();
    bound.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];

        // Names are stored lower-cased
        let hit = bound.iter().find(|(name, _)| {
            after
                .get(..name.len())
                .is_some_and(|head| head.to_lowercase() == *name)
        });

        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len()..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
