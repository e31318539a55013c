//! Static table from [`RouteId`] to a lazily loaded page

use crate::error::LoadError;
use crate::route::RouteId;
use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Future produced by a page loader
pub type LoadFuture<P> = BoxFuture<'static, Result<P, LoadError>>;

type Loader<P> = Arc<dyn Fn() -> LoadFuture<P> + Send + Sync>;

/// Whether a page's render entry point receives the navigation callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Page links to other routes and needs the navigation callback
    Interactive,
    /// Read-only page rendered without the navigation callback
    ReadOnly,
}

/// One registry slot: a loader plus how its page is rendered
pub struct PageEntry<P> {
    kind: PageKind,
    loader: Loader<P>,
}

impl<P> PageEntry<P> {
    /// Entry backed by an async loader, called once per load attempt
    pub fn new<F, Fut>(kind: PageKind, load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<P, LoadError>> + Send + 'static,
    {
        Self {
            kind,
            loader: Arc::new(move || load().boxed()),
        }
    }

    /// Entry whose page is already available
    pub fn ready(kind: PageKind, page: P) -> Self
    where
        P: Clone + Send + Sync + 'static,
    {
        Self::new(kind, move || future::ready(Ok(page.clone())))
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn needs_navigation(&self) -> bool {
        self.kind == PageKind::Interactive
    }

    /// Start loading this entry's page
    pub fn load(&self) -> LoadFuture<P> {
        (self.loader)()
    }
}

impl<P> Clone for PageEntry<P> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            loader: Arc::clone(&self.loader),
        }
    }
}

impl<P> fmt::Debug for PageEntry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageEntry").field("kind", &self.kind).finish()
    }
}

/// Immutable registry with exactly one entry per route
///
/// Built from a factory called once for every [`RouteId`]; writing the
/// factory as an exhaustive `match` makes a new route a compile error until
/// it has a page.
///
/// ```
/// use agency_router::{PageEntry, PageKind, PageRegistry, RouteId};
///
/// let registry = PageRegistry::new(|route| match route {
///     RouteId::Blog | RouteId::Careers => PageEntry::ready(PageKind::ReadOnly, route.slug()),
///     _ => PageEntry::ready(PageKind::Interactive, route.slug()),
/// });
///
/// assert!(!registry.entry(RouteId::Blog).needs_navigation());
/// assert_eq!(registry.resolve("not-a-page").0, RouteId::Home);
/// ```
pub struct PageRegistry<P> {
    entries: [PageEntry<P>; RouteId::COUNT],
}

impl<P> PageRegistry<P> {
    pub fn new<F>(mut factory: F) -> Self
    where
        F: FnMut(RouteId) -> PageEntry<P>,
    {
        Self {
            entries: std::array::from_fn(|index| factory(RouteId::ALL[index])),
        }
    }

    /// Replace the entry for one route
    pub fn with_entry(mut self, route: RouteId, entry: PageEntry<P>) -> Self {
        self.entries[Self::slot(route)] = entry;
        self
    }

    pub fn entry(&self, route: RouteId) -> &PageEntry<P> {
        &self.entries[Self::slot(route)]
    }

    /// Look up an untyped route value, falling back to the default route
    pub fn resolve(&self, value: &str) -> (RouteId, &PageEntry<P>) {
        let route = RouteId::resolve(value);
        (route, self.entry(route))
    }

    fn slot(route: RouteId) -> usize {
        RouteId::ALL
            .iter()
            .position(|candidate| *candidate == route)
            .unwrap_or(0)
    }
}

impl<P> Clone for PageRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<P> fmt::Debug for PageRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(RouteId::ALL.iter().zip(self.entries.iter()))
            .finish()
    }
}
