//! Agency Forms
//!
//! Field validation and form state for the agency site's contact, request
//! and sign-up forms.
//!
//! # Example
//!
//! ```
//! use agency_forms::{validators, values, FieldRule, Form, RuleSet};
//!
//! let form = Form::new(
//!     values([("name", ""), ("email", "bad")]),
//!     RuleSet::new()
//!         .field("name", FieldRule::new().required())
//!         .field("email", FieldRule::new().required().custom_text(validators::validate_email)),
//! );
//!
//! form.touch("name");
//! assert_eq!(form.error("name").as_deref(), Some("name is required"));
//!
//! form.set_value("name", "Ann");
//! assert!(form.is_valid());
//! ```

mod form;
mod rules;
pub mod validators;
mod value;

pub use form::{
    FieldView, Form, FormError, FormSnapshot, SubmitEvent, SubmitHandler, SubmitOutcome,
    SubmitPhase,
};
pub use rules::{CustomCheck, FieldRule, RuleSet};
pub use value::{as_text, is_blank, values, FormValues};
