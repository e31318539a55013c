//! Contact and service-request form

use agency_forms::{validators, FieldRule, Form, RuleSet};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One choice of a select field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: &'static str,
    pub value: &'static str,
}

const fn option(label: &'static str, value: &'static str) -> SelectOption {
    SelectOption { label, value }
}

pub const PROJECT_TYPES: [SelectOption; 7] = [
    option("Website Development", "website"),
    option("Mobile App Development", "mobile"),
    option("Custom Software", "software"),
    option("Digital Marketing", "marketing"),
    option("Digital Transformation", "transformation"),
    option("DigEd Program", "diged"),
    option("Other", "other"),
];

pub const BUDGET_RANGES: [SelectOption; 6] = [
    option("Under $5,000", "under_5k"),
    option("$5,000 - $15,000", "5k_15k"),
    option("$15,000 - $50,000", "15k_50k"),
    option("$50,000 - $100,000", "50k_100k"),
    option("Over $100,000", "over_100k"),
    option("Let's discuss", "discuss"),
];

pub const TIMELINES: [SelectOption; 5] = [
    option("ASAP", "asap"),
    option("1-3 months", "1_3_months"),
    option("3-6 months", "3_6_months"),
    option("6+ months", "6_plus_months"),
    option("Just exploring", "exploring"),
];

/// Submitted contact request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub message: String,
    pub project_type: String,
    pub budget: String,
    pub timeline: String,
}

fn one_of(options: &'static [SelectOption]) -> impl Fn(&str) -> Result<(), String> + Send + Sync {
    move |value| {
        if options.iter().any(|o| o.value == value) {
            Ok(())
        } else {
            Err("Please choose one of the listed options".to_string())
        }
    }
}

pub fn contact_rules() -> RuleSet {
    RuleSet::new()
        .field("name", FieldRule::new().required().min_length(2).max_length(100))
        .field(
            "email",
            FieldRule::new().required().custom_text(validators::validate_email),
        )
        .field("company", FieldRule::new().max_length(100))
        .field(
            "phone",
            FieldRule::new().custom_text_if_present(validators::validate_phone),
        )
        .field("message", FieldRule::new().required().min_length(10).max_length(1000))
        .field(
            "projectType",
            FieldRule::new().required().custom_text(one_of(&PROJECT_TYPES)),
        )
        .field(
            "budget",
            FieldRule::new().required().custom_text(one_of(&BUDGET_RANGES)),
        )
        .field(
            "timeline",
            FieldRule::new().required().custom_text(one_of(&TIMELINES)),
        )
}

/// Empty contact form
pub fn contact_form(submit_timeout: Option<Duration>) -> Form {
    let form = match Form::from_model(&ContactRequest::default(), contact_rules()) {
        Ok(form) => form,
        Err(_) => Form::new(Default::default(), contact_rules()),
    };
    match submit_timeout {
        Some(timeout) => form.with_submit_timeout(timeout),
        None => form,
    }
}
