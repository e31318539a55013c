//! Namespaced view over another store
//!
//! Lets many visitors share one backend without seeing each other's keys.

use crate::backend::KeyValueStore;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

const SEPARATOR: char = '/';

/// Store whose keys live under `scope/` in an inner store
#[derive(Clone)]
pub struct ScopedStore {
    inner: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl ScopedStore {
    pub fn new(inner: Arc<dyn KeyValueStore>, scope: impl fmt::Display) -> Self {
        Self {
            inner,
            prefix: format!("{}{}", scope, SEPARATOR),
        }
    }

    /// The scope name, without the separator
    pub fn scope(&self) -> &str {
        self.prefix.trim_end_matches(SEPARATOR)
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl fmt::Debug for ScopedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedStore")
            .field("inner", &self.inner.name())
            .field("scope", &self.scope())
            .finish()
    }
}

impl KeyValueStore for ScopedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(&self.scoped(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(&self.scoped(key), value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(&self.scoped(key))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self
            .inner
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.prefix).map(str::to_string))
            .collect())
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
