//! Visitor display preferences

pub mod animation;
pub mod theme;

pub use animation::{AnimationKey, AnimationPreferences, AnimationSettings};
pub use theme::{SystemPreferences, Theme, ThemePreferences};
