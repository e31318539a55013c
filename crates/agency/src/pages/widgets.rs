//! Small markup helpers shared by pages and the shell

use crate::forms::SelectOption;
use agency_forms::{as_text, FieldView};
use agency_router::RouteId;
use maud::{html, Markup};

/// Link to a route; `data-route` lets the client intercept the click
pub fn nav_link(route: RouteId, label: &str, current: Option<RouteId>) -> Markup {
    let is_current = current == Some(route);
    html! {
        a href=(route.path())
            data-route=(route.slug())
            aria-current=[is_current.then_some("page")] {
            (label)
        }
    }
}

/// Call-to-action rendered as a button-styled link
pub fn cta(route: RouteId, label: &str) -> Markup {
    html! {
        a.cta href=(route.path()) data-route=(route.slug()) { (label) }
    }
}

fn field_error(view: &FieldView) -> Markup {
    html! {
        @if let Some(error) = &view.error {
            p.field-error id=(format!("{}-error", view.name)) role="alert" { (error) }
        }
    }
}

fn label(view: &FieldView, text: &str) -> Markup {
    html! {
        label for=(view.name) {
            (text)
            @if view.required { span aria-hidden="true" { " *" } }
        }
    }
}

/// Single-line input bound to a form field
///
/// Password inputs never echo their value back.
pub fn input_field(view: &FieldView, text: &str, input_type: &str) -> Markup {
    let invalid = view.error.is_some();
    let value = (input_type != "password").then(|| as_text(&view.value).unwrap_or_default());
    html! {
        div.field {
            (label(view, text))
            input type=(input_type)
                id=(view.name)
                name=(view.name)
                value=[value]
                required[view.required]
                aria-invalid=[invalid.then_some("true")]
                aria-describedby=[invalid.then(|| format!("{}-error", view.name))];
            (field_error(view))
        }
    }
}

pub fn text_area(view: &FieldView, text: &str) -> Markup {
    let invalid = view.error.is_some();
    html! {
        div.field {
            (label(view, text))
            textarea id=(view.name)
                name=(view.name)
                rows="5"
                required[view.required]
                aria-invalid=[invalid.then_some("true")] {
                (as_text(&view.value).unwrap_or_default())
            }
            (field_error(view))
        }
    }
}

pub fn select_field(view: &FieldView, text: &str, options: &[SelectOption]) -> Markup {
    let current = as_text(&view.value).unwrap_or_default();
    html! {
        div.field {
            (label(view, text))
            select id=(view.name) name=(view.name) required[view.required] {
                option value="" { "Select..." }
                @for choice in options {
                    option value=(choice.value) selected[current == choice.value] { (choice.label) }
                }
            }
            (field_error(view))
        }
    }
}
