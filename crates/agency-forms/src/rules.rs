//! Per-field validation rules
//!
//! A [`FieldRule`] is evaluated in a fixed order and stops at the first
//! failure, so a field never carries more than one message per pass:
//!
//! 1. `required`
//! 2. `min_length` / `max_length` (text values only, counted in characters)
//! 3. `pattern` (text values only)
//! 4. `custom` (its answer is final)

use crate::value::{as_text, is_blank, FormValues};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Custom check over the field value and all form values; `Some(message)`
/// when the value is invalid
pub type CustomCheck = Arc<dyn Fn(&Value, &FormValues) -> Option<String> + Send + Sync>;

/// Validation rule for one field
#[derive(Clone, Default)]
pub struct FieldRule {
    label: Option<String>,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
    custom: Option<CustomCheck>,
}

impl FieldRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name used in built-in messages instead of the field key
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn custom<F>(self, check: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.custom_with_values(move |value, _| check(value))
    }

    /// Custom check that can compare against other fields
    pub fn custom_with_values<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value, &FormValues) -> Option<String> + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(check));
        self
    }

    /// Require the value to equal another field's value
    pub fn matches_field(self, other: impl Into<String>, message: impl Into<String>) -> Self {
        let other = other.into();
        let message = message.into();
        self.custom_with_values(move |value, values| {
            let expected = values.get(&other).unwrap_or(&Value::Null);
            if value == expected {
                None
            } else {
                Some(message.clone())
            }
        })
    }

    /// Custom check over text; non-text values are checked as `""`
    ///
    /// ```
    /// use agency_forms::{validators, FieldRule, FormValues};
    /// use serde_json::json;
    ///
    /// let rule = FieldRule::new().required().custom_text(validators::validate_email);
    /// assert_eq!(
    ///     rule.evaluate("email", &json!("bad"), &FormValues::new()),
    ///     Some("Please enter a valid email address".to_string())
    /// );
    /// ```
    pub fn custom_text<F>(self, check: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        self.custom(move |value| check(as_text(value).unwrap_or_default()).err())
    }

    /// Like [`custom_text`](Self::custom_text) but skips blank values
    pub fn custom_text_if_present<F>(self, check: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        self.custom(move |value| {
            if is_blank(value) {
                None
            } else {
                check(as_text(value).unwrap_or_default()).err()
            }
        })
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Validate `value` for the field named `field`; `values` holds every field
    pub fn evaluate(&self, field: &str, value: &Value, values: &FormValues) -> Option<String> {
        let name = self.label.as_deref().unwrap_or(field);

        if self.required && is_blank(value) {
            return Some(format!("{} is required", name));
        }

        if let Some(text) = as_text(value) {
            let length = text.chars().count();

            if let Some(min) = self.min_length {
                if length < min {
                    return Some(format!("{} must be at least {} characters", name, min));
                }
            }

            if let Some(max) = self.max_length {
                if length > max {
                    return Some(format!("{} must be no more than {} characters", name, max));
                }
            }

            if let Some(pattern) = &self.pattern {
                if !pattern.is_match(text) {
                    return Some(format!("{} format is invalid", name));
                }
            }
        }

        self.custom.as_ref().and_then(|check| check(value, values))
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("label", &self.label)
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

/// Rules for every field of a form; fields without a rule are always valid
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: BTreeMap<String, FieldRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.rules.insert(name.into(), rule);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.rules.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Validate one field of `values`; a missing field is checked as `null`
    pub fn validate_field(&self, name: &str, values: &FormValues) -> Option<String> {
        let value = values.get(name).unwrap_or(&Value::Null);
        self.rules
            .get(name)
            .and_then(|rule| rule.evaluate(name, value, values))
    }
}
