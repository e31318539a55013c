//! Field values
//!
//! Fields hold arbitrary JSON values so a single form can mix text inputs,
//! checkboxes, numbers and multi-selects.

use serde_json::Value;

/// Current value of every field, keyed by field name
pub type FormValues = serde_json::Map<String, Value>;

/// Whether a value counts as "not filled in" for the `required` rule
///
/// Null, `false`, `0`, empty or whitespace-only strings, and empty lists are
/// blank. Everything else is filled.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n == 0.0 || n.is_nan()),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

/// String content of a text field, `None` for any other kind of value
pub fn as_text(value: &Value) -> Option<&str> {
    value.as_str()
}

/// Build [`FormValues`] from `(field, value)` pairs
///
/// ```
/// use agency_forms::values;
///
/// let initial = values([("name", ""), ("email", "bad")]);
/// assert_eq!(initial["email"], "bad");
/// ```
pub fn values<K, V, I>(pairs: I) -> FormValues
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_values() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!("   \t")));
        assert!(is_blank(&json!(false)));
        assert!(is_blank(&json!(0)));
        assert!(is_blank(&json!([])));
    }

    #[test]
    fn test_filled_values() {
        assert!(!is_blank(&json!("Ann")));
        assert!(!is_blank(&json!(true)));
        assert!(!is_blank(&json!(3)));
        assert!(!is_blank(&json!(["web"])));
        assert!(!is_blank(&json!({})));
    }
}
