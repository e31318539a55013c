//! Contact, service-request and DigEd pages

use super::widgets::{cta, input_field, select_field, text_area};
use super::Page;
use crate::forms::contact::{contact_form, BUDGET_RANGES, PROJECT_TYPES, TIMELINES};
use agency_forms::Form;
use agency_router::{Navigate, RouteId};
use maud::{html, Markup};

pub const CONTACT: Page = Page::interactive(
    RouteId::Contact,
    "Contact Us - Get Your Digital Project Started",
    "Ready to transform your business? Contact Kaizen Digital Solutions for a free consultation on your digital project needs.",
    contact,
);

pub const REQUEST: Page = Page::interactive(
    RouteId::Request,
    "Request a Digital Solution - Kaizen Digital Solutions",
    "Tell us about your project and we'll bring your vision to life.",
    request,
);

pub const DIGED: Page = Page::interactive(
    RouteId::DigEd,
    "DigEd Registration - Kaizen Digital Solutions",
    "Enhance your digital skills with our comprehensive education programs.",
    diged,
);

const PROGRAMS: [&str; 3] = [
    "Digital Literacy Fundamentals",
    "Web Development Bootcamp",
    "Digital Marketing Mastery",
];

/// The contact form with its current values and visible errors
pub fn contact_form_markup(form: &Form) -> Markup {
    html! {
        form id="contact" method="post" action="/contact" novalidate
            aria-busy=[form.is_submitting().then_some("true")] {
            (input_field(&form.field("name"), "Name", "text"))
            (input_field(&form.field("email"), "Email", "email"))
            (input_field(&form.field("company"), "Company", "text"))
            (input_field(&form.field("phone"), "Phone", "tel"))
            (select_field(&form.field("projectType"), "Project type", &PROJECT_TYPES))
            (select_field(&form.field("budget"), "Budget", &BUDGET_RANGES))
            (select_field(&form.field("timeline"), "Timeline", &TIMELINES))
            (text_area(&form.field("message"), "Message"))
            button type="submit" disabled[form.is_submitting()] {
                @if form.is_submitting() { "Sending..." } @else { "Send message" }
            }
        }
    }
}

fn contact(_: &Navigate) -> Markup {
    html! {
        h1 { "Contact Us" }
        p { "Ready to transform your business? Tell us about your project." }
        (contact_form_markup(&contact_form(None)))
    }
}

fn request(_: &Navigate) -> Markup {
    html! {
        h1 { "Request a Digital Solution" }
        p { "Let's bring your vision to life" }
        (contact_form_markup(&contact_form(None)))
    }
}

fn diged(_: &Navigate) -> Markup {
    html! {
        h1 { "DigEd Registration" }
        p { "Enhance your digital skills with our comprehensive education programs" }
        ul.programs {
            @for program in PROGRAMS {
                li { (program) }
            }
        }
        (cta(RouteId::Contact, "Register your interest"))
    }
}
