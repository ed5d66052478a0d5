// File: src/config.rs
// Purpose: Configuration parsing from rackd-router.toml

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "rackd-router.toml";

/// View loaded by the dashboard table when nothing matches
pub const DEFAULT_FALLBACK_VIEW: &str = "not-found";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// View loaded when no route matches
    #[serde(default)]
    pub fallback: Option<String>,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Route table in match order; the dashboard table when absent
    #[serde(default)]
    pub routes: Option<Vec<RouteEntry>>,
}

/// Router tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Redirects one dispatch may follow before it is treated as a loop
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_filter")]
    pub filter: String,
}

/// One `[[routes]]` entry
///
/// Exactly one of `view` and `redirect` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub path: String,

    /// Custom element loaded when the route matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,

    /// Target template of a redirect route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,

    /// Route argument → view attribute renames
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

/// What a validated route entry does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind<'a> {
    View(&'a str),
    Redirect(&'a str),
}

impl RouteEntry {
    pub fn view(path: &str, view: &str) -> Self {
        Self {
            path: path.to_string(),
            view: Some(view.to_string()),
            redirect: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn redirect(path: &str, target: &str) -> Self {
        Self {
            path: path.to_string(),
            view: None,
            redirect: Some(target.to_string()),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, arg: &str, attribute: &str) -> Self {
        self.attributes.insert(arg.to_string(), attribute.to_string());
        self
    }

    pub fn kind(&self) -> Result<RouteKind<'_>> {
        match (&self.view, &self.redirect) {
            (Some(view), None) => Ok(RouteKind::View(view.as_str())),
            (None, Some(target)) => Ok(RouteKind::Redirect(target.as_str())),
            (Some(_), Some(_)) => bail!(
                "route `{}` sets both `view` and `redirect`",
                self.path
            ),
            (None, None) => bail!("route `{}` needs a `view` or a `redirect`", self.path),
        }
    }

    /// Attribute name a route argument is exposed under
    pub fn attribute_for<'a>(&'a self, arg: &'a str) -> &'a str {
        self.attributes.get(arg).map(String::as_str).unwrap_or(arg)
    }
}

// Default values
fn default_max_redirects() -> usize {
    rackd_router::DEFAULT_MAX_REDIRECTS
}

fn default_filter() -> String {
    "warn".to_string()
}

/// Route table of the rack dashboard shell
pub fn dashboard_routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry::view("/racks/", "x-racks"),
        RouteEntry::redirect("/racks/$asn/", "/racks/$asn/nodes"),
        RouteEntry::view("/racks/$asn/$tab", "x-rack").with_attribute("tab", "selected-tab"),
    ]
}

// Default implementations
impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_redirects: default_max_redirects(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::parse(&content).with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Load configuration from default path (./rackd-router.toml)
    pub fn load_default() -> Result<Self> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(content).context("Failed to parse TOML")?;
        for entry in config.route_table().iter() {
            entry.kind()?;
        }

        Ok(config)
    }

    /// Configured routes, or the dashboard table when none are configured
    pub fn route_table(&self) -> Vec<RouteEntry> {
        self.routes.clone().unwrap_or_else(dashboard_routes)
    }

    /// Fallback view; the dashboard table brings its own
    pub fn fallback_view(&self) -> Option<&str> {
        match (&self.fallback, &self.routes) {
            (Some(view), _) => Some(view.as_str()),
            (None, None) => Some(DEFAULT_FALLBACK_VIEW),
            (None, Some(_)) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.router.max_redirects, 16);
        assert_eq!(config.logging.filter, "warn");
        assert_eq!(config.route_table(), dashboard_routes());
        assert_eq!(config.fallback_view(), Some("not-found"));
    }

    #[test]
    fn test_empty_config() {
        let config = Config::parse("  \n").unwrap();
        assert_eq!(config.route_table().len(), 3);
        assert_eq!(config.router.max_redirects, 16);
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load("definitely/not/here/rackd-router.toml").unwrap();
        assert_eq!(config.route_table(), dashboard_routes());
    }

    #[test]
    fn test_custom_routes() {
        let toml = r#"
            fallback = "x-404"

            [router]
            max_redirects = 3

            [logging]
            filter = "rackd_router=debug"

            [[routes]]
            path = "/"
            redirect = "/racks/"

            [[routes]]
            path = "/racks/$asn/*"
            view = "x-rack"
            attributes = { path = "selected-tab" }
        "#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.router.max_redirects, 3);
        assert_eq!(config.logging.filter, "rackd_router=debug");
        assert_eq!(config.fallback_view(), Some("x-404"));

        let routes = config.route_table();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].kind().unwrap(), RouteKind::Redirect("/racks/"));
        assert_eq!(routes[1].kind().unwrap(), RouteKind::View("x-rack"));
        assert_eq!(routes[1].attribute_for("path"), "selected-tab");
        assert_eq!(routes[1].attribute_for("asn"), "asn");
    }

    #[test]
    fn test_custom_routes_without_fallback() {
        let toml = r#"
            [[routes]]
            path = "/"
            view = "x-home"
        "#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.fallback_view(), None);
    }

    #[test]
    fn test_route_needs_exactly_one_action() {
        let both = r#"
            [[routes]]
            path = "/racks/"
            view = "x-racks"
            redirect = "/"
        "#;
        let err = Config::parse(both).unwrap_err();
        assert!(err.to_string().contains("/racks/"));

        let neither = r#"
            [[routes]]
            path = "/racks/"
        "#;
        assert!(Config::parse(neither).is_err());
    }

    #[test]
    fn test_dashboard_table_round_trips_through_toml() {
        let config = Config {
            routes: Some(dashboard_routes()),
            ..Config::default()
        };
        let text = toml::to_string(&config).unwrap();
        let parsed = Config::parse(&text).unwrap();
        assert_eq!(parsed.route_table(), dashboard_routes());
    }
}
