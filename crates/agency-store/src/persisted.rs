//! Typed values persisted under a key
//!
//! Values are stored as JSON. Reads never fail: a missing, unreadable or
//! malformed entry yields the default. A raw unquoted string written by an
//! older version (e.g. `dark` rather than `"dark"`) is still accepted when it
//! parses as the target type.

use crate::backend::KeyValueStore;
use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// A value of type `T` stored under a fixed key
pub struct Persisted<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    default: T,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, default: T) -> Self {
        Self {
            store,
            key: key.into(),
            default,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Whether anything is stored under the key, readable or not
    pub fn is_stored(&self) -> bool {
        matches!(self.store.get(&self.key), Ok(Some(_)))
    }

    /// The stored value, or the default
    pub fn get(&self) -> T {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return self.default.clone(),
            Err(e) => {
                error!(key = %self.key, backend = self.store.name(), error = %e, "failed to read stored value");
                return self.default.clone();
            }
        };

        if let Ok(value) = serde_json::from_str::<T>(&raw) {
            return value;
        }

        if let Ok(value) = serde_json::from_value::<T>(Value::String(raw.clone())) {
            debug!(key = %self.key, "accepted legacy raw string value");
            return value;
        }

        warn!(key = %self.key, "could not parse stored value, using default");
        self.default.clone()
    }

    /// Store `value`; failures are logged, the write is otherwise best-effort
    pub fn set(&self, value: &T) {
        if let Err(e) = self.try_set(value) {
            error!(key = %self.key, backend = self.store.name(), error = %e, "failed to store value");
        }
    }

    pub fn try_set(&self, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: self.key.clone(),
            source,
        })?;
        self.store.set(&self.key, &json)
    }

    /// Apply `f` to the current value and store the result
    pub fn update(&self, f: impl FnOnce(T) -> T) -> T {
        let next = f(self.get());
        self.set(&next);
        next
    }

    /// Remove the stored value so reads return the default again
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            error!(key = %self.key, error = %e, "failed to remove stored value");
        }
    }
}

impl<T: Clone> Clone for Persisted<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
            default: self.default.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Persisted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persisted")
            .field("key", &self.key)
            .field("backend", &self.store.name())
            .field("default", &self.default)
            .finish()
    }
}
