//! The closed set of routes the site can show

use crate::path::route_slug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbolic identifier of a top-level page
///
/// The set is closed: anything that does not parse into one of these
/// variants resolves to [`RouteId::DEFAULT`] through [`RouteId::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteId {
    Home,
    About,
    Services,
    Portfolio,
    Blog,
    Contact,
    Auth,
    Dashboard,
    #[serde(rename = "diged")]
    DigEd,
    Request,
    Careers,
}

impl RouteId {
    /// Route shown at startup and for any unrecognized route value
    pub const DEFAULT: RouteId = RouteId::Home;

    /// Number of routes
    pub const COUNT: usize = 11;

    /// Every route, in navigation-menu order
    pub const ALL: [RouteId; RouteId::COUNT] = [
        RouteId::Home,
        RouteId::About,
        RouteId::Services,
        RouteId::Portfolio,
        RouteId::Blog,
        RouteId::Contact,
        RouteId::Auth,
        RouteId::Dashboard,
        RouteId::DigEd,
        RouteId::Request,
        RouteId::Careers,
    ];

    /// Stable lowercase identifier, also used as the URL segment
    pub fn slug(self) -> &'static str {
        match self {
            RouteId::Home => "home",
            RouteId::About => "about",
            RouteId::Services => "services",
            RouteId::Portfolio => "portfolio",
            RouteId::Blog => "blog",
            RouteId::Contact => "contact",
            RouteId::Auth => "auth",
            RouteId::Dashboard => "dashboard",
            RouteId::DigEd => "diged",
            RouteId::Request => "request",
            RouteId::Careers => "careers",
        }
    }

    /// Canonical URL path for this route (`/` for home)
    pub fn path(self) -> String {
        match self {
            RouteId::Home => "/".to_string(),
            other => format!("/{}", other.slug()),
        }
    }

    /// Parse a route identifier, case-insensitively
    ///
    /// Returns `None` for values outside the enumeration.
    pub fn parse(value: &str) -> Option<RouteId> {
        let value = value.trim();
        RouteId::ALL
            .into_iter()
            .find(|route| route.slug().eq_ignore_ascii_case(value))
    }

    /// Resolve any route value, falling back to [`RouteId::DEFAULT`]
    ///
    /// ```
    /// use agency_router::RouteId;
    ///
    /// assert_eq!(RouteId::resolve("services"), RouteId::Services);
    /// assert_eq!(RouteId::resolve("allen"), RouteId::Home);
    /// ```
    pub fn resolve(value: &str) -> RouteId {
        RouteId::parse(value).unwrap_or(RouteId::DEFAULT)
    }

    /// Resolve a request path such as `/contact/` or `/blog?page=2`
    ///
    /// The root path and unknown first segments resolve to home.
    pub fn from_path(path: &str) -> RouteId {
        RouteId::resolve(&route_slug(path))
    }
}

impl Default for RouteId {
    fn default() -> Self {
        RouteId::DEFAULT
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Returned by [`RouteId::from_str`] for values outside the enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown route: {0}")]
pub struct UnknownRoute(pub String);

impl FromStr for RouteId {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouteId::parse(s).ok_or_else(|| UnknownRoute(s.to_string()))
    }
}
