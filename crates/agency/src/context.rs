//! Application-wide state and its reducer
//!
//! [`AppState`] changes only through [`AppAction`]s. [`AppContext`] is the
//! injectable handle that applies them and notifies subscribers.

use crate::preferences::Theme;
use agency_router::RouteId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    /// New unread notification stamped with the current time
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            message: message.into(),
            timestamp: Utc::now(),
            read: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPreferences {
    pub theme: Theme,
    pub reduced_motion: bool,
    pub language: String,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            reduced_motion: false,
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub current_route: RouteId,
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub search_query: String,
    /// Newest first
    pub notifications: Vec<Notification>,
    pub preferences: UiPreferences,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    SetRoute(RouteId),
    SetUser(Option<User>),
    SetSearchQuery(String),
    AddNotification(Notification),
    MarkNotificationRead(Uuid),
    ClearNotifications,
    SetTheme(Theme),
    SetReducedMotion(bool),
    SetLanguage(String),
}

impl AppState {
    pub fn apply(&mut self, action: AppAction) {
        match action {
            AppAction::SetRoute(route) => self.current_route = route,
            AppAction::SetUser(user) => {
                self.is_authenticated = user.is_some();
                self.user = user;
            }
            AppAction::SetSearchQuery(query) => self.search_query = query,
            AppAction::AddNotification(notification) => self.notifications.insert(0, notification),
            AppAction::MarkNotificationRead(id) => {
                for notification in self.notifications.iter_mut().filter(|n| n.id == id) {
                    notification.read = true;
                }
            }
            AppAction::ClearNotifications => self.notifications.clear(),
            AppAction::SetTheme(theme) => self.preferences.theme = theme,
            AppAction::SetReducedMotion(reduced) => self.preferences.reduced_motion = reduced,
            AppAction::SetLanguage(language) => self.preferences.language = language,
        }
    }

    /// Pure form of [`apply`](Self::apply)
    pub fn reduce(mut self, action: AppAction) -> Self {
        self.apply(action);
        self
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }
}

/// Cloneable handle to the shared [`AppState`]
#[derive(Debug, Clone)]
pub struct AppContext {
    state: Arc<watch::Sender<AppState>>,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl AppContext {
    pub fn new(initial: AppState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn dispatch(&self, action: AppAction) {
        debug!(action = ?action, "dispatch");
        self.state.send_modify(|state| state.apply(action));
    }

    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    pub fn navigate(&self, route: RouteId) {
        self.dispatch(AppAction::SetRoute(route));
    }

    pub fn set_user(&self, user: Option<User>) {
        self.dispatch(AppAction::SetUser(user));
    }

    /// Add a notification and return its id
    pub fn add_notification(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Uuid {
        let notification = Notification::new(kind, title, message);
        let id = notification.id;
        self.dispatch(AppAction::AddNotification(notification));
        id
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.dispatch(AppAction::SetSearchQuery(query.into()));
    }
}
