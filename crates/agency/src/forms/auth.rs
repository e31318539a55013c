//! Sign-in and sign-up forms

use crate::context::{AppContext, User};
use agency_forms::{validators, FieldRule, Form, FormValues, RuleSet, SubmitOutcome};
use agency_router::{Navigate, RouteId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignIn {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUp {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

fn email_rule() -> FieldRule {
    FieldRule::new()
        .label("Email")
        .required()
        .custom_text(validators::validate_email)
}

pub fn sign_in_rules() -> RuleSet {
    RuleSet::new()
        .field("email", email_rule())
        .field("password", FieldRule::new().label("Password").required())
}

pub fn sign_up_rules() -> RuleSet {
    RuleSet::new()
        .field("firstName", FieldRule::new().label("First name").required())
        .field("lastName", FieldRule::new().label("Last name").required())
        .field("email", email_rule())
        .field(
            "password",
            FieldRule::new()
                .label("Password")
                .required()
                .custom_text(validators::validate_password),
        )
        .field(
            "confirmPassword",
            FieldRule::new()
                .label("Password confirmation")
                .required()
                .matches_field("password", "Passwords do not match"),
        )
}

fn text_fields(names: &[&str]) -> FormValues {
    names
        .iter()
        .map(|name| (name.to_string(), Value::String(String::new())))
        .collect()
}

pub fn sign_in_form() -> Form {
    Form::new(text_fields(&["email", "password"]), sign_in_rules())
}

pub fn sign_up_form() -> Form {
    Form::new(
        text_fields(&["firstName", "lastName", "email", "password", "confirmPassword"]),
        sign_up_rules(),
    )
}

/// Submit the sign-in form; on success the visitor is sent to the dashboard
pub async fn submit_sign_in(form: &Form, context: &AppContext, navigate: &Navigate) -> SubmitOutcome {
    form.submit(|values| async move {
        let sign_in: SignIn =
            serde_json::from_value(Value::Object(values)).map_err(|e| e.to_string())?;

        context.set_user(Some(User {
            id: uuid::Uuid::new_v4().to_string(),
            email: sign_in.email,
            first_name: String::new(),
            last_name: String::new(),
            avatar: None,
        }));
        navigate.to(RouteId::Dashboard);
        Ok::<(), String>(())
    })
    .await
}

/// Submit the sign-up form; on success the visitor is signed in and sent to
/// the dashboard
pub async fn submit_sign_up(form: &Form, context: &AppContext, navigate: &Navigate) -> SubmitOutcome {
    form.submit(|values| async move {
        let sign_up: SignUp =
            serde_json::from_value(Value::Object(values)).map_err(|e| e.to_string())?;

        context.set_user(Some(User {
            id: uuid::Uuid::new_v4().to_string(),
            email: sign_up.email,
            first_name: sign_up.first_name,
            last_name: sign_up.last_name,
            avatar: None,
        }));
        navigate.to(RouteId::Dashboard);
        Ok::<(), String>(())
    })
    .await
}
