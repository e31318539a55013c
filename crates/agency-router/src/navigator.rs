//! Current-route state and the page outlet
//!
//! Every navigation is tagged with a sequence number. A load only commits to
//! the outlet when its tag is still the latest one, so a slow page requested
//! earlier can never replace a page requested later.

use crate::error::LoadError;
use crate::registry::{LoadFuture, PageRegistry};
use crate::route::RouteId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// What the content area currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum Outlet<P> {
    /// Placeholder while the page for `route` loads
    Loading { route: RouteId },
    /// The single mounted page
    Ready { route: RouteId, page: P },
    /// The page could not be loaded; the shell offers a retry
    Failed { route: RouteId, error: LoadError },
}

impl<P> Outlet<P> {
    pub fn route(&self) -> RouteId {
        match self {
            Outlet::Loading { route } | Outlet::Ready { route, .. } | Outlet::Failed { route, .. } => {
                *route
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Outlet::Loading { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outlet::Failed { .. })
    }

    pub fn page(&self) -> Option<&P> {
        match self {
            Outlet::Ready { page, .. } => Some(page),
            _ => None,
        }
    }
}

/// Navigator tuning
#[derive(Debug, Clone, Default)]
pub struct NavigatorConfig {
    /// Loads still pending after this long fail with [`LoadError::TimedOut`]
    pub load_timeout: Option<Duration>,
}

/// Navigation callback handed to pages
#[derive(Clone)]
pub struct Navigate(Arc<dyn Fn(RouteId) + Send + Sync>);

impl Navigate {
    pub fn new(f: impl Fn(RouteId) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Request a route change; always accepted
    pub fn to(&self, route: RouteId) {
        (self.0)(route)
    }
}

impl fmt::Debug for Navigate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Navigate")
    }
}

struct NavState<P> {
    requested: RouteId,
    seq: u64,
    loaded: HashMap<RouteId, P>,
}

/// Owns the current route and drives page loads into the outlet
///
/// Cloning yields another handle to the same navigator. Loads run as Tokio
/// tasks, so navigation must happen inside a runtime.
pub struct Navigator<P> {
    registry: Arc<PageRegistry<P>>,
    config: NavigatorConfig,
    state: Arc<Mutex<NavState<P>>>,
    outlet: Arc<watch::Sender<Outlet<P>>>,
}

impl<P> Clone for Navigator<P> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            config: self.config.clone(),
            state: Arc::clone(&self.state),
            outlet: Arc::clone(&self.outlet),
        }
    }
}

impl<P> Navigator<P> {
    fn lock_state(&self) -> MutexGuard<'_, NavState<P>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P> fmt::Debug for Navigator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock_state();
        f.debug_struct("Navigator")
            .field("requested", &state.requested)
            .field("seq", &state.seq)
            .field("loaded", &state.loaded.len())
            .finish()
    }
}

impl<P> Navigator<P>
where
    P: Clone + Send + Sync + 'static,
{
    /// Create a navigator showing `initial` and start loading its page
    pub fn start(registry: PageRegistry<P>, config: NavigatorConfig, initial: RouteId) -> Self {
        let (outlet, _) = watch::channel(Outlet::Loading { route: initial });
        let navigator = Self {
            registry: Arc::new(registry),
            config,
            state: Arc::new(Mutex::new(NavState {
                requested: initial,
                seq: 0,
                loaded: HashMap::new(),
            })),
            outlet: Arc::new(outlet),
        };

        {
            let mut state = navigator.lock_state();
            navigator.begin(&mut state, initial);
        }

        navigator
    }

    /// The route most recently requested
    pub fn current_route(&self) -> RouteId {
        self.lock_state().requested
    }

    /// Snapshot of the outlet
    pub fn outlet(&self) -> Outlet<P> {
        self.outlet.borrow().clone()
    }

    /// Receiver notified on every outlet change
    pub fn subscribe(&self) -> watch::Receiver<Outlet<P>> {
        self.outlet.subscribe()
    }

    /// Navigation callback bound to this navigator
    pub fn handle(&self) -> Navigate {
        let navigator = self.clone();
        Navigate::new(move |route| {
            navigator.navigate(route);
        })
    }

    /// Make `route` current and load its page
    ///
    /// Navigating to the route that is already current is a no-op unless its
    /// last load failed, in which case the load is retried. Returns the
    /// sequence number of the navigation now in effect.
    pub fn navigate(&self, route: RouteId) -> u64 {
        let mut state = self.lock_state();

        if state.requested == route && !self.outlet.borrow().is_failed() {
            debug!(route = %route, seq = state.seq, "navigation to current route ignored");
            return state.seq;
        }

        info!(from = %state.requested, to = %route, "navigation");
        self.begin(&mut state, route)
    }

    /// Navigate to an untyped route value; unknown values go to the default route
    pub fn navigate_to(&self, value: &str) -> RouteId {
        let route = RouteId::resolve(value);
        self.navigate(route);
        route
    }

    /// Reload the current route if its last load failed
    pub fn retry(&self) -> bool {
        let mut state = self.lock_state();
        let failed = self.outlet.borrow().is_failed();
        if !failed {
            return false;
        }

        let route = state.requested;
        info!(route = %route, "retrying page load");
        self.begin(&mut state, route);
        true
    }

    /// Wait until the outlet is no longer showing the loading placeholder
    pub async fn settled(&self) -> Outlet<P> {
        let mut rx = self.outlet.subscribe();
        let settled = match rx.wait_for(|outlet| !outlet.is_loading()).await {
            Ok(outlet) => Some(outlet.clone()),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.outlet())
    }

    fn begin(&self, state: &mut NavState<P>, route: RouteId) -> u64 {
        state.seq += 1;
        state.requested = route;
        let seq = state.seq;

        if let Some(page) = state.loaded.get(&route) {
            debug!(route = %route, seq, "page already loaded");
            self.outlet.send_replace(Outlet::Ready {
                route,
                page: page.clone(),
            });
            return seq;
        }

        self.outlet.send_replace(Outlet::Loading { route });

        let load = self.registry.entry(route).load();
        let navigator = self.clone();
        tokio::spawn(async move {
            let result = navigator.load_with_timeout(load).await;
            navigator.commit(seq, route, result);
        });

        seq
    }

    async fn load_with_timeout(&self, load: LoadFuture<P>) -> Result<P, LoadError> {
        match self.config.load_timeout {
            Some(limit) => match tokio::time::timeout(limit, load).await {
                Ok(result) => result,
                Err(_) => Err(LoadError::TimedOut(limit)),
            },
            None => load.await,
        }
    }

    fn commit(&self, seq: u64, route: RouteId, result: Result<P, LoadError>) {
        let mut state = self.lock_state();

        if let Ok(page) = &result {
            state.loaded.insert(route, page.clone());
        }

        if state.seq != seq {
            debug!(route = %route, seq, latest = state.seq, "discarding superseded page load");
            return;
        }

        match result {
            Ok(page) => {
                debug!(route = %route, seq, "page mounted");
                self.outlet.send_replace(Outlet::Ready { route, page });
            }
            Err(error) => {
                warn!(route = %route, seq, error = %error, "page load failed");
                self.outlet.send_replace(Outlet::Failed { route, error });
            }
        }
    }
}
