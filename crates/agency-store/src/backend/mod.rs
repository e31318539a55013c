//! Key-value backends

use crate::error::Result;

pub mod file;
pub mod memory;
pub mod scoped;

/// Synchronous string store keyed by name
///
/// Reads of a missing key return `Ok(None)`; writes replace any previous value.
pub trait KeyValueStore: Send + Sync {
    /// Get the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All stored keys, sorted
    fn keys(&self) -> Result<Vec<String>>;

    /// Backend name for logs
    fn name(&self) -> &'static str;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
