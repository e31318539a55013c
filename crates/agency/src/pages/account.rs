use super::widgets::{cta, input_field};
use super::Page;
use crate::forms::{sign_in_form, sign_up_form};
use agency_forms::Form;
use agency_router::{Navigate, RouteId};
use maud::{html, Markup};

pub const AUTH: Page = Page::interactive(
    RouteId::Auth,
    "Sign In - Kaizen Digital Solutions",
    "Sign in or create an account to follow your projects.",
    auth,
);

pub const DASHBOARD: Page = Page::interactive(
    RouteId::Dashboard,
    "Client Dashboard - Kaizen Digital Solutions",
    "An overview of your projects and account.",
    dashboard,
);

const PROJECTS: [(&str, &str, u8); 3] = [
    ("E-commerce Website", "In Progress", 75),
    ("Mobile App Development", "Review", 90),
    ("SEO Optimization", "Completed", 100),
];

fn auth(_: &Navigate) -> Markup {
    auth_markup(&sign_in_form(), &sign_up_form())
}

/// Sign-in and sign-up forms with their current values and visible errors
pub fn auth_markup(sign_in: &Form, sign_up: &Form) -> Markup {
    html! {
        h1 { "Welcome to Kaizen Digital" }
        form id="sign-in" method="post" action="/auth/sign-in" novalidate {
            h2 { "Sign in" }
            (input_field(&sign_in.field("email"), "Email", "email"))
            (input_field(&sign_in.field("password"), "Password", "password"))
            button type="submit" { "Sign in" }
        }
        form id="sign-up" method="post" action="/auth/sign-up" novalidate {
            h2 { "Create an account" }
            (input_field(&sign_up.field("firstName"), "First name", "text"))
            (input_field(&sign_up.field("lastName"), "Last name", "text"))
            (input_field(&sign_up.field("email"), "Email", "email"))
            (input_field(&sign_up.field("password"), "Password", "password"))
            (input_field(&sign_up.field("confirmPassword"), "Confirm password", "password"))
            button type="submit" { "Create account" }
        }
    }
}

fn dashboard(_: &Navigate) -> Markup {
    html! {
        h1 { "Client Dashboard" }
        p { "Here's an overview of your projects and account." }
        section {
            h2 { "Active Projects" }
            @for (name, status, progress) in PROJECTS {
                article.project {
                    h3 { (name) }
                    p { (status) }
                    progress max="100" value=(progress) { (progress) "%" }
                }
            }
        }
        (cta(RouteId::Request, "Request a new project"))
    }
}
