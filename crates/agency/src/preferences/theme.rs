//! Colour theme and reduced-motion preference

use agency_store::{KeyValueStore, Persisted};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

pub const THEME_KEY: &str = "theme";
pub const REDUCED_MOTION_KEY: &str = "reduced-motion";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the visitor's system reports, as far as the site can tell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemPreferences {
    pub prefers_reduced_motion: bool,
    pub prefers_dark: bool,
}

/// Persisted theme and reduced-motion flag
#[derive(Debug, Clone)]
pub struct ThemePreferences {
    theme: Persisted<Theme>,
    reduced_motion: Persisted<bool>,
}

impl ThemePreferences {
    /// Load the stored preferences
    ///
    /// A system reduced-motion preference is adopted, and stored, only when
    /// the visitor has never chosen one.
    pub fn load(store: Arc<dyn KeyValueStore>, system: SystemPreferences) -> Self {
        let prefs = Self {
            theme: Persisted::new(Arc::clone(&store), THEME_KEY, Theme::Light),
            reduced_motion: Persisted::new(store, REDUCED_MOTION_KEY, false),
        };

        if system.prefers_reduced_motion && !prefs.reduced_motion.is_stored() {
            debug!("adopting system reduced-motion preference");
            prefs.reduced_motion.set(&true);
        }

        prefs
    }

    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.theme.set(&theme);
    }

    pub fn toggle_theme(&self) -> Theme {
        let theme = self.theme.update(Theme::toggled);
        info!(theme = %theme, "theme toggled");
        theme
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion.get()
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.reduced_motion.set(&reduced);
    }

    /// Follow a system colour-scheme change unless the visitor picked a theme
    ///
    /// Returns whether the theme changed.
    pub fn system_color_scheme_changed(&self, prefers_dark: bool) -> bool {
        if self.theme.is_stored() {
            return false;
        }
        let theme = if prefers_dark { Theme::Dark } else { Theme::Light };
        self.theme.set(&theme);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agency_store::MemoryStore;

    fn store() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_toggle_persists() {
        let store = store();
        let prefs = ThemePreferences::load(Arc::clone(&store), SystemPreferences::default());
        assert_eq!(prefs.theme(), Theme::Light);
        assert_eq!(prefs.toggle_theme(), Theme::Dark);

        let reloaded = ThemePreferences::load(store, SystemPreferences::default());
        assert_eq!(reloaded.theme(), Theme::Dark);
    }

    #[test]
    fn test_legacy_plain_theme_string() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_entries([("theme", "dark")]));
        let prefs = ThemePreferences::load(store, SystemPreferences::default());
        assert_eq!(prefs.theme(), Theme::Dark);
    }

    #[test]
    fn test_system_reduced_motion_only_when_unset() {
        let system = SystemPreferences {
            prefers_reduced_motion: true,
            prefers_dark: false,
        };

        let fresh = ThemePreferences::load(store(), system);
        assert!(fresh.reduced_motion());

        let chosen: Arc<dyn KeyValueStore> =
            Arc::new(MemoryStore::with_entries([("reduced-motion", "false")]));
        let prefs = ThemePreferences::load(chosen, system);
        assert!(!prefs.reduced_motion());
    }

    #[test]
    fn test_system_color_scheme_respects_stored_choice() {
        let prefs = ThemePreferences::load(store(), SystemPreferences::default());
        assert!(prefs.system_color_scheme_changed(true));
        assert_eq!(prefs.theme(), Theme::Dark);

        // The followed scheme is now stored, so later changes are ignored
        assert!(!prefs.system_color_scheme_changed(false));
        assert_eq!(prefs.theme(), Theme::Dark);
    }
}
