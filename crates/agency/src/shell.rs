//! The application shell: layout around the page outlet
//!
//! [`App`] wires the navigator to the shared [`AppContext`] and the persisted
//! preferences, and renders the current outlet inside the site layout.

use crate::config::Config;
use crate::context::{AppAction, AppContext};
use crate::pages::{build_registry, widgets::nav_link, Page};
use crate::personalization::Personalization;
use crate::preferences::{AnimationPreferences, AnimationSettings, SystemPreferences, Theme, ThemePreferences};
use agency_router::{route_slug, Navigate, Navigator, Outlet, RouteId};
use agency_store::KeyValueStore;
use maud::{html, Markup, DOCTYPE};
use std::sync::Arc;
use tracing::{debug, info};

const MAIN_NAV: [(RouteId, &str); 7] = [
    (RouteId::Home, "Home"),
    (RouteId::About, "About"),
    (RouteId::Services, "Services"),
    (RouteId::Portfolio, "Portfolio"),
    (RouteId::Blog, "Blog"),
    (RouteId::Careers, "Careers"),
    (RouteId::Contact, "Contact"),
];

/// One visitor's running site
///
/// Cloning yields another handle to the same application. Must be started
/// inside a Tokio runtime because page loads run as tasks.
#[derive(Debug, Clone)]
pub struct App {
    config: Arc<Config>,
    context: AppContext,
    theme: ThemePreferences,
    animation: AnimationPreferences,
    personalization: Personalization,
    navigator: Navigator<Page>,
}

/// Route for a request path; the root maps to the configured default route
pub fn initial_route(config: &Config, path: &str) -> RouteId {
    let slug = route_slug(path);
    if slug.is_empty() {
        config.site.default_route()
    } else {
        RouteId::resolve(&slug)
    }
}

impl App {
    /// Load preferences from `store` and start at the route for `path`
    pub fn start(
        config: Arc<Config>,
        store: Arc<dyn KeyValueStore>,
        system: SystemPreferences,
        path: &str,
    ) -> Self {
        let theme = ThemePreferences::load(Arc::clone(&store), system);
        let animation = AnimationPreferences::load(Arc::clone(&store), system.prefers_reduced_motion);
        let personalization = Personalization::load(store);

        let route = initial_route(&config, path);
        let context = AppContext::default();
        context.dispatch(AppAction::SetRoute(route));
        context.dispatch(AppAction::SetTheme(theme.theme()));
        context.dispatch(AppAction::SetReducedMotion(theme.reduced_motion()));
        context.dispatch(AppAction::SetLanguage(config.site.language.clone()));

        let navigator = Navigator::start(build_registry(), config.navigation.navigator_config(), route);
        personalization.track_page_visit(&route.path());

        info!(route = %route, returning = personalization.is_returning_user(), "app started");

        Self {
            config,
            context,
            theme,
            animation,
            personalization,
            navigator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn personalization(&self) -> &Personalization {
        &self.personalization
    }

    pub fn navigator(&self) -> &Navigator<Page> {
        &self.navigator
    }

    pub fn current_route(&self) -> RouteId {
        self.navigator.current_route()
    }

    /// Change route, keeping the shared state and visit history in step
    pub fn navigate(&self, route: RouteId) {
        if route == self.navigator.current_route() && !self.navigator.outlet().is_failed() {
            return;
        }
        self.navigator.navigate(route);
        self.context.dispatch(AppAction::SetRoute(route));
        self.personalization.track_page_visit(&route.path());
    }

    /// Navigation callback handed to interactive pages and forms
    pub fn handle(&self) -> Navigate {
        let app = self.clone();
        Navigate::new(move |route| app.navigate(route))
    }

    /// Reload the current page after a failed load
    pub fn retry(&self) -> bool {
        self.navigator.retry()
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn toggle_theme(&self) -> Theme {
        let theme = self.theme.toggle_theme();
        self.context.dispatch(AppAction::SetTheme(theme));
        theme
    }

    /// Follow a change of the system color scheme unless the visitor chose a theme
    pub fn system_color_scheme_changed(&self, prefers_dark: bool) {
        if self.theme.system_color_scheme_changed(prefers_dark) {
            self.context.dispatch(AppAction::SetTheme(self.theme.theme()));
        }
    }

    pub fn reduced_motion(&self) -> bool {
        self.theme.reduced_motion()
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.theme.set_reduced_motion(reduced);
        self.context.dispatch(AppAction::SetReducedMotion(reduced));
    }

    pub fn animation(&self) -> &AnimationPreferences {
        &self.animation
    }

    /// Animation settings with reduced motion applied
    pub fn animation_settings(&self) -> AnimationSettings {
        self.animation.effective(self.reduced_motion())
    }

    /// Wait for the current page load to settle, then render the document
    pub async fn render(&self) -> (Outlet<Page>, Markup) {
        let outlet = self.navigator.settled().await;
        let markup = self.render_document(&outlet);
        (outlet, markup)
    }

    /// Content area for `outlet`
    pub fn render_outlet(&self, outlet: &Outlet<Page>) -> Markup {
        match outlet {
            Outlet::Loading { route } => html! {
                div.page-skeleton data-route=(route.slug()) aria-busy="true" {
                    p { "Loading..." }
                }
            },
            Outlet::Ready { page, .. } => page.render(&self.handle()),
            Outlet::Failed { route, error } => {
                debug!(route = %route, error = %error, "rendering failed outlet");
                html! {
                    div.page-error role="alert" {
                        h1 { "This page could not be loaded" }
                        p { (error.to_string()) }
                        a.retry href=(route.path()) data-route=(route.slug()) { "Try again" }
                    }
                }
            }
        }
    }

    /// Full HTML document around `outlet`
    pub fn render_document(&self, outlet: &Outlet<Page>) -> Markup {
        let (title, description) = match outlet.page() {
            Some(page) => (page.title(), page.description()),
            None => (self.config.site.name.as_str(), ""),
        };
        self.layout(outlet.route(), title, description, self.render_outlet(outlet))
    }

    /// Site layout around arbitrary content shown for `route`
    pub fn layout(&self, route: RouteId, title: &str, description: &str, content: Markup) -> Markup {
        let state = self.context.state();
        let dark = state.preferences.theme == Theme::Dark;
        let reduced_motion = state.preferences.reduced_motion;
        let animation = self.animation_settings();

        html! {
            (DOCTYPE)
            html lang=(state.preferences.language) class=[dark.then_some("dark")] {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) }
                    @if !description.is_empty() {
                        meta name="description" content=(description);
                    }
                }
                body data-theme=(state.preferences.theme.as_str())
                    data-reduced-motion=[reduced_motion.then_some("true")]
                    data-returning=[self.personalization.is_returning_user().then_some("true")]
                    data-animation-speed=(animation.speed.to_string())
                    data-parallax=(animation.parallax.to_string()) {
                    header {
                        a.brand href="/" { (self.config.site.name) }
                        nav aria-label="Main" {
                            @for (nav_route, label) in MAIN_NAV {
                                (nav_link(nav_route, label, Some(route)))
                            }
                        }
                        p.greeting { (self.personalization.greeting(&self.config.site.name)) }
                        @if state.unread_count() > 0 {
                            span.notifications aria-label="Unread notifications" { (state.unread_count()) }
                        }
                    }
                    main id="content" data-route=(route.slug()) {
                        (content)
                    }
                    footer {
                        p { "© " (self.config.site.name) }
                    }
                }
            }
        }
    }
}
