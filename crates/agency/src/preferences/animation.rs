//! Animation speed, parallax and micro-interaction settings

use agency_store::{KeyValueStore, Persisted};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

pub const ANIMATION_KEY: &str = "animation-preferences";

/// Speed used while the system asks for reduced motion
const SYSTEM_REDUCED_SPEED: f64 = 0.5;
/// Speed reported while reduced motion is in effect
const REDUCED_SPEED: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSettings {
    pub speed: f64,
    pub parallax: bool,
    pub micro_interactions: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            speed: 1.0,
            parallax: true,
            micro_interactions: true,
        }
    }
}

impl AnimationSettings {
    /// Settings while reduced motion is on
    pub fn reduced() -> Self {
        Self {
            speed: REDUCED_SPEED,
            parallax: false,
            micro_interactions: false,
        }
    }

    /// Read the stored object leniently; missing or odd values keep defaults
    fn from_stored(stored: &Map<String, Value>) -> Self {
        let speed = stored
            .get("speed")
            .and_then(Value::as_f64)
            .filter(|speed| *speed != 0.0 && speed.is_finite())
            .unwrap_or(1.0);

        Self {
            speed,
            parallax: stored.get("parallax") != Some(&Value::Bool(false)),
            micro_interactions: stored.get("microInteractions") != Some(&Value::Bool(false)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKey {
    Speed,
    Parallax,
    MicroInteractions,
}

impl AnimationKey {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimationKey::Speed => "speed",
            AnimationKey::Parallax => "parallax",
            AnimationKey::MicroInteractions => "microInteractions",
        }
    }
}

/// Animation settings, persisted as one JSON object
#[derive(Debug, Clone)]
pub struct AnimationPreferences {
    stored: Persisted<Map<String, Value>>,
    current: Arc<Mutex<AnimationSettings>>,
}

impl AnimationPreferences {
    pub fn load(store: Arc<dyn KeyValueStore>, system_reduced_motion: bool) -> Self {
        let stored = Persisted::new(store, ANIMATION_KEY, Map::new());
        let mut current = AnimationSettings::from_stored(&stored.get());

        if system_reduced_motion {
            current.speed = SYSTEM_REDUCED_SPEED;
            current.parallax = false;
        }

        Self {
            stored,
            current: Arc::new(Mutex::new(current)),
        }
    }

    /// Settings chosen by the visitor, before reduced motion is applied
    pub fn settings(&self) -> AnimationSettings {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Settings to animate with
    pub fn effective(&self, reduced_motion: bool) -> AnimationSettings {
        if reduced_motion {
            AnimationSettings::reduced()
        } else {
            self.settings()
        }
    }

    /// Merge one setting into the stored object and apply it
    ///
    /// Values of the wrong type are stored but leave the active setting as is.
    pub fn set_animation_preference(&self, key: AnimationKey, value: impl Into<Value>) {
        let value = value.into();
        self.stored.update(|mut prefs| {
            prefs.insert(key.as_str().to_string(), value.clone());
            prefs
        });

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match key {
            AnimationKey::Speed => {
                if let Some(speed) = value.as_f64() {
                    current.speed = speed;
                }
            }
            AnimationKey::Parallax => {
                if let Some(parallax) = value.as_bool() {
                    current.parallax = parallax;
                }
            }
            AnimationKey::MicroInteractions => {
                if let Some(enabled) = value.as_bool() {
                    current.micro_interactions = enabled;
                }
            }
        }
        debug!(key = key.as_str(), "animation preference updated");
    }
}
