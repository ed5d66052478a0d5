//! # rackd router
//!
//! Client-side path router for the rackd dashboard:
//! - Constant segments (`/racks`), matched case-insensitively
//! - Variables (`/racks/$asn`), bound by name
//! - Trailing wildcards (`/racks/$asn/*`), bound to `path`
//! - Redirect routes with argument substitution
//! - A fallback for paths nothing matches
//! - Relative navigation (`../lans` from `/racks/65000/nodes`)
//!
//! ## Dispatch
//!
//! Routes are tried in registration order and the first match wins. A
//! handler route calls its handler with the bound arguments. A redirect route
//! rewrites the location through the injected [`LocationProvider`] and
//! dispatches the new path. When nothing matches the fallback runs, if there
//! is one.
//!
//! ## Example
//!
//! ```
//! use rackd_router::{Dispatch, Router};
//! use std::sync::{Arc, Mutex};
//!
//! # fn main() -> Result<(), rackd_router::RouterError> {
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let router = Router::new()
//!     .redirect("/racks/$asn/", "/racks/$asn/nodes")?
//!     .route("/racks/$asn/$tab", move |args| {
//!         sink.lock().unwrap().push(args.to_map());
//!     })?;
//!
//! let dispatch = router.execute("/racks/65000/")?;
//! assert!(matches!(dispatch, Dispatch::Handled { .. }));
//! assert_eq!(seen.lock().unwrap()[0]["tab"], "nodes");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

// ============================================================================
// Module Declarations
// ============================================================================

mod error;
mod location;
pub mod path;
pub mod route;

pub use error::RouterError;
pub use location::{LocationProvider, MemoryLocation};
pub use path::{navigate, split};
pub use route::pattern::{tokenize, RoutePattern, Token};
pub use route::{FallbackHandler, Handler, MatchResult, Route, RouteAction, RouteArgs};

/// Redirects followed in one dispatch before giving up
pub const DEFAULT_MAX_REDIRECTS: usize = 16;

/// Outcome of dispatching one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A handler route matched and its handler ran
    Handled {
        /// Template of the route that handled the path
        pattern: String,
        args: RouteArgs,
    },
    /// Nothing matched and the fallback ran
    Fallback,
    /// Nothing matched and there is no fallback
    Unmatched,
}

// ============================================================================
// Router Implementation
// ============================================================================

/// Ordered route table plus fallback
///
/// Built once with the chaining methods, then only read. The location
/// defaults to a [`MemoryLocation`] at `/`.
#[derive(Clone)]
pub struct Router {
    routes: Vec<Route>,
    fallback: Option<FallbackHandler>,
    location: Arc<dyn LocationProvider>,
    max_redirects: usize,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            fallback: None,
            location: Arc::new(MemoryLocation::default()),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    /// Uses `location` for redirects, [`Router::run`] and [`Router::goto`]
    pub fn with_location(mut self, location: Arc<dyn LocationProvider>) -> Self {
        self.location = location;
        self
    }

    /// Caps how many redirects one dispatch may follow
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Registers a handler route
    ///
    /// # Errors
    ///
    /// Fails if the template has a wildcard before its last segment or an
    /// unnamed `$` variable.
    pub fn route<F>(mut self, template: &str, handler: F) -> Result<Self, RouterError>
    where
        F: Fn(&RouteArgs) + Send + Sync + 'static,
    {
        self.routes.push(Route::handler(template, handler)?);
        Ok(self)
    }

    /// Registers a redirect route
    ///
    /// `$name` segments of `target` are replaced with the values bound by
    /// `template`.
    ///
    /// # Errors
    ///
    /// Same template validation as [`Router::route`].
    pub fn redirect(mut self, template: &str, target: impl Into<String>) -> Result<Self, RouterError> {
        self.routes.push(Route::redirect(template, target)?);
        Ok(self)
    }

    /// Sets the handler used when no route matches
    pub fn fallback<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(handler));
        self
    }

    /// Registered routes, in match order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Redirects one dispatch may follow
    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Location read by [`Router::run`] and [`Router::goto`] and written on
    /// redirects
    pub fn location(&self) -> &Arc<dyn LocationProvider> {
        &self.location
    }

    /// First route matching `path`, with its bound arguments
    ///
    /// # Examples
    ///
    /// ```
    /// use rackd_router::Router;
    ///
    /// let router = Router::new()
    ///     .route("/$asn", |_| {}).unwrap()
    ///     .route("/$asn/*", |_| {}).unwrap();
    ///
    /// let (route, args) = router.match_route("/65000").unwrap();
    /// assert_eq!(route.pattern.template(), "/$asn");
    /// assert_eq!(args.get("asn"), Some("65000"));
    /// ```
    pub fn match_route(&self, path: &str) -> Option<(&Route, RouteArgs)> {
        self.routes.iter().find_map(|route| {
            let result = route.matches(path);
            result.matched.then_some((route, result.args))
        })
    }

    /// Dispatches `path` to the first matching route
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::RedirectLimit`] when redirects keep matching
    /// past the configured limit (a redirect loop).
    pub fn execute(&self, path: &str) -> Result<Dispatch, RouterError> {
        self.dispatch(path, 0)
    }

    /// Dispatches the current location, as done once at startup
    pub fn run(&self) -> Result<Dispatch, RouterError> {
        self.execute(&self.location.get())
    }

    /// Handles a navigation request
    ///
    /// `target` is resolved against the current location with [`navigate`].
    /// If that yields a path, the location is replaced with it and it is
    /// dispatched. Otherwise nothing happens and `Ok(None)` is returned.
    pub fn goto(&self, target: &str) -> Result<Option<Dispatch>, RouterError> {
        let current = self.location.get();
        let Some(resolved) = navigate(&current, target) else {
            debug!(current = %current, requested = target, "navigation request resolved to nothing");
            return Ok(None);
        };

        debug!(from = %current, to = %resolved, "navigating");
        self.location.set(&resolved);
        self.execute(&resolved).map(Some)
    }

    fn dispatch(&self, path: &str, redirects: usize) -> Result<Dispatch, RouterError> {
        let Some((route, args)) = self.match_route(path) else {
            return Ok(self.fall_back(path));
        };

        match &route.action {
            RouteAction::Invoke(handler) => {
                debug!(path, pattern = %route.pattern, args = args.len(), "route matched");
                handler(&args);
                Ok(Dispatch::Handled {
                    pattern: route.pattern.template().to_string(),
                    args,
                })
            }
            RouteAction::Redirect(template) => {
                if redirects >= self.max_redirects {
                    warn!(path, limit = self.max_redirects, "redirect limit exceeded");
                    return Err(RouterError::RedirectLimit {
                        path: path.to_string(),
                        limit: self.max_redirects,
                    });
                }

                let target = route::substitute(template, &args);
                info!(from = path, to = %target, pattern = %route.pattern, "following redirect");
                self.location.set(&target);
                self.dispatch(&self.location.get(), redirects + 1)
            }
        }
    }

    fn fall_back(&self, path: &str) -> Dispatch {
        match &self.fallback {
            Some(handler) => {
                debug!(path, "no route matched, running fallback");
                handler();
                Dispatch::Fallback
            }
            None => {
                debug!(path, "no route matched");
                Dispatch::Unmatched
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("fallback", &self.fallback.is_some())
            .field("max_redirects", &self.max_redirects)
            .finish_non_exhaustive()
    }
}
