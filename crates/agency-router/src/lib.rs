//! # Agency Router
//!
//! Client-side style navigation for the agency site:
//! - A closed [`RouteId`] enumeration with deterministic fallback to home
//! - A [`PageRegistry`] holding exactly one lazily loaded page per route
//! - A [`Navigator`] that owns the current route and publishes an [`Outlet`]
//!   (loading placeholder, mounted page, or failure with retry)
//!
//! ## Last navigation wins
//!
//! Each navigation gets a sequence number; a page load only commits if its
//! number is still the latest when it resolves. Pages that finished loading
//! are kept, so going back to them commits immediately.
//!
//! ## Example
//!
//! ```
//! use agency_router::{Navigator, NavigatorConfig, PageEntry, PageKind, PageRegistry, RouteId};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = PageRegistry::new(|route| PageEntry::ready(PageKind::Interactive, route.slug()));
//! let navigator = Navigator::start(registry, NavigatorConfig::default(), RouteId::Home);
//!
//! navigator.navigate(RouteId::Contact);
//! let outlet = navigator.settled().await;
//! assert_eq!(outlet.page(), Some(&"contact"));
//! # }
//! ```

mod error;
mod navigator;
pub mod path;
mod registry;
mod route;

pub use error::LoadError;
pub use navigator::{Navigate, Navigator, NavigatorConfig, Outlet};
pub use path::{is_valid_path, normalize_path, route_slug};
pub use registry::{LoadFuture, PageEntry, PageKind, PageRegistry};
pub use route::{RouteId, UnknownRoute};
