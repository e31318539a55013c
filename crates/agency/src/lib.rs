//! # Agency
//!
//! The Kaizen Digital Solutions site: its pages, forms, visitor preferences
//! and personalization, wired together by the [`App`] shell.
//!
//! - [`pages`] maps every route to exactly one page
//! - [`forms`] defines the contact and account forms on top of `agency-forms`
//! - [`preferences`] persists theme, reduced motion and animation settings
//! - [`personalization`] keeps a visitor profile and derives a segment from it
//! - [`context`] is the shared application state updated through actions
//!
//! ## Example
//!
//! ```
//! use agency::{App, Config, SystemPreferences};
//! use agency_router::RouteId;
//! use agency_store::MemoryStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let app = App::start(
//!     Arc::new(Config::default()),
//!     Arc::new(MemoryStore::new()),
//!     SystemPreferences::default(),
//!     "/services",
//! );
//! app.navigate(RouteId::Contact);
//!
//! let (outlet, html) = app.render().await;
//! assert_eq!(outlet.route(), RouteId::Contact);
//! assert!(html.into_string().contains("Contact Us"));
//! # }
//! ```

pub mod config;
pub mod context;
pub mod forms;
pub mod pages;
pub mod personalization;
pub mod preferences;
pub mod shell;

pub use config::Config;
pub use context::{AppAction, AppContext, AppState, Notification, NotificationKind, User};
pub use pages::{build_registry, page, Page};
pub use personalization::{BehaviorEvent, Personalization, Segment};
pub use preferences::{AnimationKey, AnimationSettings, SystemPreferences, Theme};
pub use shell::{initial_route, App};
