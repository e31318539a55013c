//! Built-in field validators
//!
//! Each validator returns `Err(message)` with a user-facing message, or
//! `Ok(())`. Attach them to a field with [`FieldRule::custom_text`].
//!
//! [`FieldRule::custom_text`]: crate::FieldRule::custom_text

use crate::value::{is_blank, FormValues};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("valid phone regex"));
static PHONE_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-()]").expect("valid separator regex"));

/// Characters accepted as "special" by [`validate_password`]
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Basic email shape: something, `@`, something, `.`, something; no spaces
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub fn validate_email(value: &str) -> Result<(), String> {
    if is_valid_email(value) {
        Ok(())
    } else {
        Err("Please enter a valid email address".to_string())
    }
}

/// Strong password: 8+ chars with lowercase, uppercase, digit and a special
/// character from [`PASSWORD_SPECIALS`]
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number".to_string());
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return Err(format!(
            "Password must contain at least one special character ({})",
            PASSWORD_SPECIALS
        ));
    }
    Ok(())
}

/// Phone number after removing spaces, dashes and parentheses: optional `+`,
/// a non-zero leading digit, at most 16 digits
pub fn is_valid_phone(phone: &str) -> bool {
    let compact = PHONE_SEPARATORS.replace_all(phone, "");
    PHONE.is_match(&compact)
}

pub fn validate_phone(value: &str) -> Result<(), String> {
    if is_valid_phone(value) {
        Ok(())
    } else {
        Err("Please enter a valid phone number".to_string())
    }
}

/// Absolute URL in any scheme, as parsed by the WHATWG URL standard
pub fn is_valid_url(url: &str) -> bool {
    url::Url::parse(url).is_ok()
}

pub fn validate_url(value: &str) -> Result<(), String> {
    if is_valid_url(value) {
        Ok(())
    } else {
        Err("Please enter a valid URL".to_string())
    }
}

pub fn validate_required(value: &Value) -> Result<(), String> {
    if is_blank(value) {
        Err("This field is required".to_string())
    } else {
        Ok(())
    }
}

pub fn validate_min_length(s: &str, min: usize) -> Result<(), String> {
    if s.chars().count() >= min {
        Ok(())
    } else {
        Err(format!("Must be at least {} characters long", min))
    }
}

pub fn validate_max_length(s: &str, max: usize) -> Result<(), String> {
    if s.chars().count() <= max {
        Ok(())
    } else {
        Err(format!("Must be no more than {} characters long", max))
    }
}

/// Validator that accepts only `original`
pub fn confirm_password(original: impl Into<String>) -> impl Fn(&str) -> Result<(), String> {
    let original = original.into();
    move |value| {
        if value == original {
            Ok(())
        } else {
            Err("Passwords do not match".to_string())
        }
    }
}

/// Escape characters that are significant in HTML
pub fn sanitize_input(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            other => out.push(other),
        }
    }
    out
}

/// A single check in a [`validate_values`] list
pub type Check = Box<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Outcome of [`validate_values`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run a list of checks per field; the first failing check sets the field's error
///
/// Fields absent from `values` are checked as `null`.
pub fn validate_values(values: &FormValues, checks: &BTreeMap<String, Vec<Check>>) -> ValidationReport {
    let errors = checks
        .iter()
        .filter_map(|(field, checks)| {
            let value = values.get(field).unwrap_or(&Value::Null);
            checks
                .iter()
                .find_map(|check| check(value).err())
                .map(|message| (field.clone(), message))
        })
        .collect();

    ValidationReport { errors }
}

/// Adapt a text validator into a [`Check`]; non-text values are checked as `""`
pub fn text_check<F>(validator: F) -> Check
where
    F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
{
    Box::new(move |value| validator(value.as_str().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::values;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("user@example.com")]
    #[case("test.user@example.co.uk")]
    #[case("user+tag@example.com")]
    #[case("ann@x.com")]
    fn test_valid_emails(#[case] email: &str) {
        assert!(is_valid_email(email));
        assert!(validate_email(email).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("bad")]
    #[case("user@")]
    #[case("@example.com")]
    #[case("user@example")]
    #[case("us er@example.com")]
    fn test_invalid_emails(#[case] email: &str) {
        assert_eq!(
            validate_email(email),
            Err("Please enter a valid email address".to_string())
        );
    }

    #[test]
    fn test_password_rules_in_order() {
        assert_eq!(
            validate_password("Ab1!"),
            Err("Password must be at least 8 characters long".to_string())
        );
        assert_eq!(
            validate_password("ABCDEFG1!"),
            Err("Password must contain at least one lowercase letter".to_string())
        );
        assert_eq!(
            validate_password("abcdefg1!"),
            Err("Password must contain at least one uppercase letter".to_string())
        );
        assert_eq!(
            validate_password("Abcdefgh!"),
            Err("Password must contain at least one number".to_string())
        );
        assert_eq!(
            validate_password("Abcdefgh1"),
            Err("Password must contain at least one special character (@$!%*?&)".to_string())
        );
        assert!(validate_password("Abcdefg1!").is_ok());
    }

    #[rstest]
    #[case("+1 (555) 123-4567", true)]
    #[case("5551234567", true)]
    #[case("0123456", false)]
    #[case("phone", false)]
    #[case("+12345678901234567", false)]
    fn test_phone(#[case] phone: &str, #[case] valid: bool) {
        assert_eq!(is_valid_phone(phone), valid);
    }

    #[rstest]
    #[case("https://example.com", true)]
    #[case("http://test.co.uk/path?q=1", true)]
    #[case("http://localhost:3000", true)]
    #[case("ftp://files.example.com", true)]
    #[case("mailto:hello@example.com", true)]
    #[case("", false)]
    #[case("example.com", false)]
    #[case("https://", false)]
    #[case("http://exa mple.com", false)]
    fn test_url_validation(#[case] url: &str, #[case] valid: bool) {
        assert_eq!(is_valid_url(url), valid);
    }

    #[test]
    fn test_validate_url_message() {
        assert!(validate_url("https://kaizen.example").is_ok());
        assert_eq!(validate_url("nope"), Err("Please enter a valid URL".to_string()));
    }

    #[test]
    fn test_length_validators() {
        assert!(validate_min_length("hello", 3).is_ok());
        assert_eq!(
            validate_min_length("hi", 3),
            Err("Must be at least 3 characters long".to_string())
        );
        assert!(validate_max_length("hello", 10).is_ok());
        assert_eq!(
            validate_max_length("verylongstring", 5),
            Err("Must be no more than 5 characters long".to_string())
        );
    }

    #[test]
    fn test_required() {
        assert!(validate_required(&json!("x")).is_ok());
        assert_eq!(
            validate_required(&json!("  ")),
            Err("This field is required".to_string())
        );
    }

    #[test]
    fn test_confirm_password() {
        let check = confirm_password("Secret1!");
        assert!(check("Secret1!").is_ok());
        assert_eq!(check("secret1!"), Err("Passwords do not match".to_string()));
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(
            sanitize_input(r#"<script>alert("x's")</script>"#),
            "&lt;script&gt;alert(&quot;x&#x27;s&quot;)&lt;&#x2F;script&gt;"
        );
        assert_eq!(sanitize_input("plain text"), "plain text");
    }

    #[test]
    fn test_validate_values_first_failure_wins() {
        let mut checks: BTreeMap<String, Vec<Check>> = BTreeMap::new();
        checks.insert(
            "email".to_string(),
            vec![Box::new(validate_required) as Check, text_check(validate_email)],
        );
        checks.insert(
            "password".to_string(),
            vec![Box::new(validate_required) as Check, text_check(validate_password)],
        );

        let report = validate_values(&values([("email", "bad"), ("password", "")]), &checks);
        assert!(!report.is_valid());
        assert_eq!(report.errors["email"], "Please enter a valid email address");
        assert_eq!(report.errors["password"], "This field is required");

        let report = validate_values(
            &values([("email", "ann@x.com"), ("password", "Abcdefg1!")]),
            &checks,
        );
        assert!(report.is_valid());
    }
}
