//! Form definitions used by the site's pages

pub mod auth;
pub mod contact;

pub use auth::{sign_in_form, sign_up_form, submit_sign_in, submit_sign_up, SignIn, SignUp};
pub use contact::{contact_form, contact_rules, ContactRequest, SelectOption};
