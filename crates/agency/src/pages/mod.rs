//! The site's pages and the route registry built from them
//!
//! Every [`RouteId`] maps to exactly one [`Page`] through an exhaustive
//! `match`, so adding a route without a page does not compile.

mod account;
mod articles;
mod enquiry;
mod marketing;
pub mod widgets;

pub use account::auth_markup;
pub use enquiry::contact_form_markup;

use agency_router::{Navigate, PageEntry, PageKind, PageRegistry, RouteId};
use maud::Markup;

/// Render entry point of a page
#[derive(Debug, Clone, Copy)]
pub enum PageView {
    /// Pages that link elsewhere receive the navigation callback
    Interactive(fn(&Navigate) -> Markup),
    /// Read-only pages render without it
    ReadOnly(fn() -> Markup),
}

/// A top-level page
#[derive(Debug, Clone, Copy)]
pub struct Page {
    route: RouteId,
    title: &'static str,
    description: &'static str,
    view: PageView,
}

impl Page {
    pub const fn interactive(
        route: RouteId,
        title: &'static str,
        description: &'static str,
        render: fn(&Navigate) -> Markup,
    ) -> Self {
        Self {
            route,
            title,
            description,
            view: PageView::Interactive(render),
        }
    }

    pub const fn read_only(
        route: RouteId,
        title: &'static str,
        description: &'static str,
        render: fn() -> Markup,
    ) -> Self {
        Self {
            route,
            title,
            description,
            view: PageView::ReadOnly(render),
        }
    }

    pub fn route(&self) -> RouteId {
        self.route
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn kind(&self) -> PageKind {
        match self.view {
            PageView::Interactive(_) => PageKind::Interactive,
            PageView::ReadOnly(_) => PageKind::ReadOnly,
        }
    }

    /// Render the page; `navigate` is only handed to interactive pages
    pub fn render(&self, navigate: &Navigate) -> Markup {
        match self.view {
            PageView::Interactive(render) => render(navigate),
            PageView::ReadOnly(render) => render(),
        }
    }
}

/// The page mounted for `route`
pub fn page(route: RouteId) -> Page {
    match route {
        RouteId::Home => marketing::HOME,
        RouteId::About => marketing::ABOUT,
        RouteId::Services => marketing::SERVICES_PAGE,
        RouteId::Portfolio => marketing::PORTFOLIO,
        RouteId::Blog => articles::BLOG,
        RouteId::Contact => enquiry::CONTACT,
        RouteId::Auth => account::AUTH,
        RouteId::Dashboard => account::DASHBOARD,
        RouteId::DigEd => enquiry::DIGED,
        RouteId::Request => enquiry::REQUEST,
        RouteId::Careers => articles::CAREERS,
    }
}

/// Registry with every page available immediately
pub fn build_registry() -> PageRegistry<Page> {
    PageRegistry::new(|route| {
        let page = page(route);
        PageEntry::ready(page.kind(), page)
    })
}
