//! Headless stand-in for the dashboard shell
//!
//! Builds a router from the configured route table. A view route "loads" its
//! custom element by recording the view name and the attributes it would set;
//! the fallback loads its view with no attributes. The location is in memory.

use anyhow::{Context, Result};
use rackd_router::{Dispatch, LocationProvider, MemoryLocation, RouteArgs, Router};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::config::{Config, RouteEntry, RouteKind};

/// A custom element and the attributes set on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedView {
    pub view: String,
    pub attributes: RouteArgs,
}

/// How a dispatch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Route,
    Fallback,
    Unmatched,
    NoNavigation,
}

/// Everything a command reports about one dispatch
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub requested: String,
    pub outcome: Outcome,
    /// Final location
    pub location: String,
    /// Locations written during the dispatch, oldest first
    pub history: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<RouteArgs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<LoadedView>,
}

type Slot = Arc<Mutex<Option<LoadedView>>>;

pub struct Shell {
    router: Router,
    location: Arc<MemoryLocation>,
    loaded: Slot,
}

impl Shell {
    /// Builds the router for `config` with the location at `path`
    pub fn new(config: &Config, path: &str) -> Result<Self> {
        let location = Arc::new(MemoryLocation::new(path));
        let loaded: Slot = Arc::new(Mutex::new(None));

        let mut router = Router::new()
            .with_location(location.clone())
            .with_max_redirects(config.router.max_redirects);

        for entry in config.route_table() {
            router = match entry.kind()? {
                RouteKind::View(view) => {
                    router.route(&entry.path, load_view(&loaded, view, entry.clone()))
                }
                RouteKind::Redirect(target) => router.redirect(&entry.path, target),
            }
            .with_context(|| format!("Invalid route `{}`", entry.path))?;
        }

        if let Some(view) = config.fallback_view() {
            let slot = Arc::clone(&loaded);
            let view = view.to_string();
            router = router.fallback(move || {
                store(
                    &slot,
                    LoadedView {
                        view: view.clone(),
                        attributes: RouteArgs::new(),
                    },
                )
            });
        }

        debug!(
            routes = router.routes().len(),
            fallback = router.has_fallback(),
            max_redirects = router.max_redirects(),
            "shell router built"
        );

        Ok(Self {
            router,
            location,
            loaded,
        })
    }

    /// Dispatches the current location (startup)
    pub fn run(&self) -> Result<Report> {
        let requested = self.location.get();
        let dispatch = self.router.run()?;
        Ok(self.report(requested, Some(dispatch)))
    }

    /// Handles a navigation request for `target`
    pub fn goto(&self, target: &str) -> Result<Report> {
        let dispatch = self.router.goto(target)?;
        Ok(self.report(target.to_string(), dispatch))
    }

    fn report(&self, requested: String, dispatch: Option<Dispatch>) -> Report {
        let view = self
            .loaded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        let (outcome, route, args) = match dispatch {
            Some(Dispatch::Handled { pattern, args }) => (Outcome::Route, Some(pattern), Some(args)),
            Some(Dispatch::Fallback) => (Outcome::Fallback, None, None),
            Some(Dispatch::Unmatched) => (Outcome::Unmatched, None, None),
            None => (Outcome::NoNavigation, None, None),
        };

        Report {
            requested,
            outcome,
            location: self.location.get(),
            history: self.location.entries(),
            route,
            args,
            view,
        }
    }
}

fn load_view(
    slot: &Slot,
    view: &str,
    entry: RouteEntry,
) -> impl Fn(&RouteArgs) + Send + Sync + 'static {
    let slot = Arc::clone(slot);
    let view = view.to_string();
    move |args| {
        let attributes = args
            .iter()
            .map(|(name, value)| (entry.attribute_for(name), value))
            .collect();
        store(
            &slot,
            LoadedView {
                view: view.clone(),
                attributes,
            },
        )
    }
}

fn store(slot: &Slot, view: LoadedView) {
    *slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(view);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn attrs(pairs: &[(&str, &str)]) -> RouteArgs {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_dashboard_rack_redirect() {
        let shell = Shell::new(&Config::default(), "/racks/65000/").unwrap();
        let report = shell.run().unwrap();

        assert_eq!(report.outcome, Outcome::Route);
        assert_eq!(report.route.as_deref(), Some("/racks/$asn/$tab"));
        assert_eq!(report.location, "/racks/65000/nodes");
        assert_eq!(report.history, vec!["/racks/65000/nodes"]);
        assert_eq!(
            report.view,
            Some(LoadedView {
                view: "x-rack".to_string(),
                attributes: attrs(&[("asn", "65000"), ("selected-tab", "nodes")]),
            })
        );
    }

    #[test]
    fn test_dashboard_fallback_view() {
        let shell = Shell::new(&Config::default(), "/switches").unwrap();
        let report = shell.run().unwrap();

        assert_eq!(report.outcome, Outcome::Fallback);
        assert_eq!(report.view.map(|v| v.view).as_deref(), Some("not-found"));
    }

    #[test]
    fn test_goto_tab() {
        let shell = Shell::new(&Config::default(), "/racks/65000/nodes").unwrap();
        let report = shell.goto("../wans").unwrap();

        assert_eq!(report.location, "/racks/65000/wans");
        assert_eq!(
            report.args,
            Some(attrs(&[("asn", "65000"), ("tab", "wans")]))
        );
    }

    #[test]
    fn test_goto_empty_target() {
        let shell = Shell::new(&Config::default(), "/racks").unwrap();
        let report = shell.goto("").unwrap();

        assert_eq!(report.outcome, Outcome::NoNavigation);
        assert_eq!(report.location, "/racks");
        assert!(report.view.is_none());
    }

    #[test]
    fn test_unmatched_without_fallback() {
        let config = Config {
            routes: Some(vec![RouteEntry::view("/", "x-home")]),
            ..Config::default()
        };
        let shell = Shell::new(&config, "/racks").unwrap();
        let report = shell.run().unwrap();

        assert_eq!(report.outcome, Outcome::Unmatched);
        assert!(report.view.is_none());
    }

    #[test]
    fn test_invalid_route_template_is_reported() {
        let config = Config {
            routes: Some(vec![RouteEntry::view("/racks/*/nodes", "x-rack")]),
            ..Config::default()
        };
        let err = Shell::new(&config, "/").err().unwrap();
        assert!(format!("{err:#}").contains("/racks/*/nodes"));
    }

    #[test]
    fn test_redirect_loop_is_an_error() {
        let mut config = Config {
            routes: Some(vec![
                RouteEntry::redirect("/a", "/b"),
                RouteEntry::redirect("/b", "/a"),
            ]),
            ..Config::default()
        };
        config.router.max_redirects = 2;

        let shell = Shell::new(&config, "/a").unwrap();
        assert!(shell.run().is_err());
    }

    #[test]
    fn test_report_serializes_as_json() {
        let shell = Shell::new(&Config::default(), "/racks/").unwrap();
        let report = shell.run().unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["outcome"], "route");
        assert_eq!(json["view"]["view"], "x-racks");
        assert_eq!(json["location"], "/racks/");
    }
}
