use super::widgets::cta;
use super::Page;
use crate::personalization::SERVICES;
use agency_router::{Navigate, RouteId};
use maud::{html, Markup};

pub const HOME: Page = Page::interactive(
    RouteId::Home,
    "Kaizen Digital Solutions - Inspiring Borderless Thinking",
    "Transform your business with cutting-edge digital solutions. Web development, mobile apps, digital marketing, and AI integration services.",
    home,
);

pub const ABOUT: Page = Page::interactive(
    RouteId::About,
    "About Us - Kaizen Digital Solutions",
    "Learn about our mission to inspire borderless thinking through innovative digital solutions and cutting-edge technology.",
    about,
);

pub const SERVICES_PAGE: Page = Page::interactive(
    RouteId::Services,
    "Digital Services - Web Development, Apps & Marketing",
    "Comprehensive digital services including custom web development, mobile applications, digital marketing, SEO, and business transformation consulting.",
    services,
);

pub const PORTFOLIO: Page = Page::interactive(
    RouteId::Portfolio,
    "Portfolio - Our Digital Solutions Projects",
    "Explore our portfolio of successful digital transformation projects, websites, mobile apps, and custom software solutions.",
    portfolio,
);

const VALUES: [(&str, &str); 4] = [
    ("Innovation First", "We embrace new technology to keep our clients ahead."),
    ("Client Partnership", "Your goals become our goals from the first call."),
    ("Results Driven", "Every project is measured against real business outcomes."),
    ("Passion for Excellence", "We sweat the details so your users never have to."),
];

const TEAM: [(&str, &str); 4] = [
    ("Alex Chen", "CEO & Founder"),
    ("Sarah Johnson", "CTO"),
    ("Michael Rodriguez", "Head of Design"),
    ("Emma Wilson", "Digital Marketing Director"),
];

const PROJECTS: [(&str, &str, &str); 6] = [
    ("TechStart E-commerce Platform", "ecommerce", "TechStart Inc."),
    ("HealthCare Mobile App", "mobile", "MedCare Solutions"),
    ("Financial Services Website", "web", "SecureFinance"),
    ("Restaurant Chain Digital Campaign", "marketing", "FoodChain Co."),
    ("Educational Platform", "web", "EduTech Academy"),
    ("Logistics Mobile App", "mobile", "FastTrack Logistics"),
];

fn home(_: &Navigate) -> Markup {
    html! {
        section.hero {
            h1 { "Inspiring " span.highlight { "Borderless" } " Thinking" }
            p { "Digital solutions that move your business forward." }
            (cta(RouteId::Request, "Start a project"))
            (cta(RouteId::Portfolio, "See our work"))
        }
        section {
            h2 { "Our Digital Solutions" }
            ul.services {
                @for service in SERVICES.iter().take(3) {
                    li data-service=(service.id) { (service.name) }
                }
            }
            (cta(RouteId::Services, "All services"))
        }
        section {
            h2 { "Ready to Transform Your Business?" }
            (cta(RouteId::Contact, "Get in touch"))
        }
    }
}

fn about(_: &Navigate) -> Markup {
    html! {
        section.hero {
            h1 { "About " span.highlight { "Kaizen Digital" } }
        }
        section {
            h2 { "Our Values" }
            @for (title, text) in VALUES {
                article { h3 { (title) } p { (text) } }
            }
        }
        section {
            h2 { "Our Leadership Team" }
            ul.team {
                @for (name, role) in TEAM {
                    li { strong { (name) } " " span { (role) } }
                }
            }
        }
        section {
            h2 { "Ready to Work Together?" }
            (cta(RouteId::Contact, "Contact us"))
            (cta(RouteId::Careers, "Join the team"))
        }
    }
}

fn services(_: &Navigate) -> Markup {
    html! {
        section.hero {
            h1 { "Our " span.highlight { "Digital Solutions" } }
        }
        section {
            @for service in SERVICES {
                article id=(service.id) data-category=(service.category.as_str()) {
                    h2 { (service.name) }
                }
            }
        }
        section {
            (cta(RouteId::Request, "Request a solution"))
            (cta(RouteId::DigEd, "Learn with DigEd"))
        }
    }
}

fn portfolio(_: &Navigate) -> Markup {
    html! {
        section.hero {
            h1 { "Our " span.highlight { "Portfolio" } }
        }
        section.projects {
            @for (title, category, client) in PROJECTS {
                article data-category=(category) {
                    h2 { (title) }
                    p { "Client: " (client) }
                }
            }
        }
        (cta(RouteId::Contact, "Start your project"))
    }
}
