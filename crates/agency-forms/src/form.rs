//! Form state manager
//!
//! [`Form`] owns the values, per-field errors, touched flags and submission
//! phase of one form. It is a cheap cloneable handle so the submit handler,
//! the rendering code and tests can all observe the same state.
//!
//! Errors are a snapshot of the last validation pass: editing an untouched
//! field does not re-validate it, so [`Form::is_valid`] may lag behind the
//! values until the field is touched or the form is submitted.

use crate::rules::RuleSet;
use crate::value::FormValues;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("form model must serialize to a JSON object")]
    NotAnObject,

    #[error("form values do not match the model: {0}")]
    Model(#[from] serde_json::Error),
}

/// Where the form is in its submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
}

/// How the last submit attempt ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "message")]
pub enum SubmitOutcome {
    /// The handler ran and succeeded
    Submitted,
    /// Validation failed; the handler was not called
    Invalid,
    /// The handler returned an error
    Failed(String),
    /// The handler did not settle within the submit timeout
    TimedOut,
    /// Another submission was still running; this one was ignored
    InProgress,
}

/// Submit event passed to [`SubmitHandler::call`]
#[derive(Debug, Clone, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Render-ready view of one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub name: String,
    pub value: Value,
    pub touched: bool,
    /// Present only once the field has been touched
    pub error: Option<String>,
    pub required: bool,
}

/// Point-in-time copy of the whole form state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    pub values: FormValues,
    pub errors: BTreeMap<String, String>,
    pub touched: BTreeMap<String, bool>,
    pub is_submitting: bool,
    pub is_valid: bool,
}

#[derive(Debug)]
struct FormState {
    initial: FormValues,
    values: FormValues,
    errors: BTreeMap<String, String>,
    touched: BTreeMap<String, bool>,
    phase: SubmitPhase,
    /// Bumped by every submission that reaches the handler and by reset
    submission: u64,
    last_outcome: Option<SubmitOutcome>,
}

impl FormState {
    fn new(initial: FormValues) -> Self {
        Self {
            values: initial.clone(),
            initial,
            errors: BTreeMap::new(),
            touched: BTreeMap::new(),
            phase: SubmitPhase::Idle,
            submission: 0,
            last_outcome: None,
        }
    }

    fn value(&self, field: &str) -> &Value {
        self.values.get(field).unwrap_or(&Value::Null)
    }

    fn is_touched(&self, field: &str) -> bool {
        self.touched.get(field).copied().unwrap_or(false)
    }

    fn validate_field(&mut self, rules: &RuleSet, field: &str) {
        match rules.validate_field(field, &self.values) {
            Some(message) => {
                self.errors.insert(field.to_string(), message);
            }
            None => {
                self.errors.remove(field);
            }
        }
    }

    /// Every field with a value or a rule
    fn field_names(&self, rules: &RuleSet) -> BTreeSet<String> {
        self.values
            .keys()
            .map(String::as_str)
            .chain(rules.fields())
            .map(str::to_string)
            .collect()
    }

    fn validate_all(&mut self, rules: &RuleSet) -> bool {
        let errors: BTreeMap<String, String> = self
            .field_names(rules)
            .into_iter()
            .filter_map(|field| {
                rules
                    .validate_field(&field, &self.values)
                    .map(|message| (field, message))
            })
            .collect();

        self.errors = errors;
        self.errors.is_empty()
    }
}

/// Handle to one form's state
#[derive(Debug, Clone)]
pub struct Form {
    rules: Arc<RuleSet>,
    state: Arc<Mutex<FormState>>,
    submit_timeout: Option<Duration>,
}

impl Form {
    pub fn new(initial: FormValues, rules: RuleSet) -> Self {
        Self {
            rules: Arc::new(rules),
            state: Arc::new(Mutex::new(FormState::new(initial))),
            submit_timeout: None,
        }
    }

    /// Build a form whose initial values are the fields of `model`
    pub fn from_model<T: Serialize>(model: &T, rules: RuleSet) -> Result<Self, FormError> {
        match serde_json::to_value(model)? {
            Value::Object(initial) => Ok(Self::new(initial, rules)),
            _ => Err(FormError::NotAnObject),
        }
    }

    /// Submit handlers still pending after this long end with [`SubmitOutcome::TimedOut`]
    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = Some(timeout);
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Set a field's value, re-validating it only if it has been touched
    pub fn set_value(&self, field: &str, value: impl Into<Value>) {
        let mut state = self.lock_state();
        state.values.insert(field.to_string(), value.into());
        if state.is_touched(field) {
            state.validate_field(&self.rules, field);
        }
    }

    /// Set a field's touched flag; touching validates the current value
    pub fn set_field_touched(&self, field: &str, touched: bool) {
        let mut state = self.lock_state();
        state.touched.insert(field.to_string(), touched);
        if touched {
            state.validate_field(&self.rules, field);
        }
    }

    /// Shorthand for `set_field_touched(field, true)`, e.g. on blur
    pub fn touch(&self, field: &str) {
        self.set_field_touched(field, true);
    }

    /// Validate every field, replacing the error map; returns whether it is empty
    pub fn validate_form(&self) -> bool {
        let mut state = self.lock_state();
        let valid = state.validate_all(&self.rules);
        debug!(valid, errors = state.errors.len(), "form validated");
        valid
    }

    /// Validate and, if valid, pass the values to `on_submit`
    ///
    /// All fields are marked touched first so every error becomes visible.
    /// The form reports submitting only while `on_submit` runs, and returns
    /// to idle however it settles, including when this future is dropped.
    /// A handler error is logged and reported in the outcome, never returned.
    /// Submitting while another handler is still running returns
    /// [`SubmitOutcome::InProgress`] and leaves the form untouched.
    pub async fn submit<F, Fut, E>(&self, on_submit: F) -> SubmitOutcome
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        let (values, submission) = {
            let mut state = self.lock_state();
            if state.phase == SubmitPhase::Submitting {
                debug!("submit ignored while another submission is running");
                return SubmitOutcome::InProgress;
            }
            state.phase = SubmitPhase::Validating;

            for field in state.field_names(&self.rules) {
                state.touched.insert(field, true);
            }

            if !state.validate_all(&self.rules) {
                debug!(errors = state.errors.len(), "submit blocked by validation");
                state.phase = SubmitPhase::Idle;
                state.last_outcome = Some(SubmitOutcome::Invalid);
                return SubmitOutcome::Invalid;
            }

            state.phase = SubmitPhase::Submitting;
            state.submission += 1;
            (state.values.clone(), state.submission)
        };

        let guard = SubmittingGuard {
            state: Arc::clone(&self.state),
            submission,
        };

        info!("submitting form");
        let outcome = match self.submit_timeout {
            Some(limit) => match tokio::time::timeout(limit, on_submit(values)).await {
                Ok(result) => Self::outcome(result),
                Err(_) => {
                    warn!(timeout_ms = limit.as_millis() as u64, "form submission timed out");
                    SubmitOutcome::TimedOut
                }
            },
            None => Self::outcome(on_submit(values).await),
        };

        {
            let mut state = self.lock_state();
            if state.submission == submission {
                state.last_outcome = Some(outcome.clone());
            }
        }
        drop(guard);
        outcome
    }

    fn outcome<E: Display>(result: Result<(), E>) -> SubmitOutcome {
        match result {
            Ok(()) => {
                info!("form submitted");
                SubmitOutcome::Submitted
            }
            Err(e) => {
                error!(error = %e, "form submission failed");
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }

    /// Wrap `on_submit` into a reusable submit-event handler
    pub fn handle_submit<F, Fut, E>(&self, on_submit: F) -> SubmitHandler<F>
    where
        F: Fn(FormValues) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        SubmitHandler {
            form: self.clone(),
            on_submit,
        }
    }

    /// Restore the initial values and clear errors, touched flags and submission
    pub fn reset(&self) {
        let mut state = self.lock_state();
        state.values = state.initial.clone();
        state.errors.clear();
        state.touched.clear();
        state.phase = SubmitPhase::Idle;
        state.submission += 1;
        state.last_outcome = None;
        debug!("form reset");
    }

    pub fn values(&self) -> FormValues {
        self.lock_state().values.clone()
    }

    pub fn value(&self, field: &str) -> Value {
        self.lock_state().value(field).clone()
    }

    /// Read the values back into a typed model
    pub fn values_as<T: DeserializeOwned>(&self) -> Result<T, FormError> {
        Ok(serde_json::from_value(Value::Object(self.values()))?)
    }

    pub fn errors(&self) -> BTreeMap<String, String> {
        self.lock_state().errors.clone()
    }

    pub fn error(&self, field: &str) -> Option<String> {
        self.lock_state().errors.get(field).cloned()
    }

    pub fn touched(&self) -> BTreeMap<String, bool> {
        self.lock_state().touched.clone()
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.lock_state().is_touched(field)
    }

    pub fn is_submitting(&self) -> bool {
        self.lock_state().phase == SubmitPhase::Submitting
    }

    /// Whether the last validation pass found no errors
    pub fn is_valid(&self) -> bool {
        self.lock_state().errors.is_empty()
    }

    pub fn phase(&self) -> SubmitPhase {
        self.lock_state().phase
    }

    pub fn last_outcome(&self) -> Option<SubmitOutcome> {
        self.lock_state().last_outcome.clone()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let state = self.lock_state();
        FormSnapshot {
            values: state.values.clone(),
            errors: state.errors.clone(),
            touched: state.touched.clone(),
            is_submitting: state.phase == SubmitPhase::Submitting,
            is_valid: state.errors.is_empty(),
        }
    }

    pub fn field(&self, name: &str) -> FieldView {
        let state = self.lock_state();
        let touched = state.is_touched(name);
        FieldView {
            name: name.to_string(),
            value: state.value(name).clone(),
            touched,
            error: if touched {
                state.errors.get(name).cloned()
            } else {
                None
            },
            required: self.rules.get(name).map_or(false, |rule| rule.is_required()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the form to idle when a submission ends or is abandoned
///
/// Only the submission that is still current may do so: after a reset a
/// newer submission owns the phase.
struct SubmittingGuard {
    state: Arc<Mutex<FormState>>,
    submission: u64,
}

impl Drop for SubmittingGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.submission == self.submission {
            state.phase = SubmitPhase::Idle;
        }
    }
}

/// Submit-event handler produced by [`Form::handle_submit`]
pub struct SubmitHandler<F> {
    form: Form,
    on_submit: F,
}

impl<F, Fut, E> SubmitHandler<F>
where
    F: Fn(FormValues) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    /// Prevent the event's default action, then submit the form
    pub async fn call(&self, event: Option<&mut SubmitEvent>) -> SubmitOutcome {
        if let Some(event) = event {
            event.prevent_default();
        }
        self.form.submit(|values| (self.on_submit)(values)).await
    }

    pub fn form(&self) -> &Form {
        &self.form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::FieldRule;
    use crate::value::values;
    use serde_json::json;

    fn name_form() -> Form {
        Form::new(
            values([("name", "")]),
            RuleSet::new().field("name", FieldRule::new().required()),
        )
    }

    #[test]
    fn test_set_value_on_untouched_field_does_not_validate() {
        let form = name_form();
        form.set_value("name", "");
        assert!(form.errors().is_empty());
        assert!(form.is_valid());
    }

    #[test]
    fn test_touch_validates_current_value() {
        let form = name_form();
        form.touch("name");
        assert_eq!(form.error("name"), Some("name is required".to_string()));

        form.set_value("name", "Ann");
        assert_eq!(form.error("name"), None);
    }

    #[test]
    fn test_untouching_keeps_errors_but_hides_them() {
        let form = name_form();
        form.touch("name");
        form.set_field_touched("name", false);

        assert_eq!(form.error("name"), Some("name is required".to_string()));
        assert_eq!(form.field("name").error, None);
    }

    #[test]
    fn test_validate_form_includes_fields_without_values() {
        let form = Form::new(
            FormValues::new(),
            RuleSet::new().field("email", FieldRule::new().required()),
        );
        assert!(!form.validate_form());
        assert_eq!(form.error("email"), Some("email is required".to_string()));
    }

    #[test]
    fn test_from_model_rejects_non_objects() {
        let result = Form::from_model(&json!(["a"]), RuleSet::new());
        assert!(matches!(result, Err(FormError::NotAnObject)));
    }

    #[test]
    fn test_submit_event_prevent_default() {
        let mut event = SubmitEvent::new();
        assert!(!event.is_default_prevented());
        event.prevent_default();
        assert!(event.is_default_prevented());
    }
}
