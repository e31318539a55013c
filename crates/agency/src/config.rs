// File: src/config.rs
// Purpose: Configuration parsing from agency.toml

use agency_router::{NavigatorConfig, RouteId};
use agency_store::{FileStore, KeyValueStore, MemoryStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub forms: FormsConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Site metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_name")]
    pub name: String,

    /// Route shown for `/` (default: "home")
    #[serde(default = "default_route_name")]
    pub default_route: String,

    #[serde(default = "default_language")]
    pub language: String,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

/// Page loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Page loads still pending after this many milliseconds fail (0 disables)
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,
}

/// Form configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormsConfig {
    /// Submit handlers still pending after this many milliseconds time out (0 disables)
    #[serde(default = "default_submit_timeout_ms")]
    pub submit_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
}

/// Preference storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory used by the file backend
    #[serde(default = "default_storage_path")]
    pub path: String,
}

// Default values
fn default_name() -> String {
    "Kaizen Digital Solutions".to_string()
}

fn default_route_name() -> String {
    RouteId::DEFAULT.slug().to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_load_timeout_ms() -> u64 {
    10_000
}

fn default_submit_timeout_ms() -> u64 {
    30_000
}

fn default_storage_path() -> String {
    ".agency".to_string()
}

// Default implementations
impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            default_route: default_route_name(),
            language: default_language(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            load_timeout_ms: default_load_timeout_ms(),
        }
    }
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            submit_timeout_ms: default_submit_timeout_ms(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
        }
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

impl SiteConfig {
    /// Configured default route; unknown names fall back to home
    pub fn default_route(&self) -> RouteId {
        RouteId::resolve(&self.default_route)
    }
}

impl NavigationConfig {
    pub fn navigator_config(&self) -> NavigatorConfig {
        NavigatorConfig {
            load_timeout: millis(self.load_timeout_ms),
        }
    }
}

impl FormsConfig {
    pub fn submit_timeout(&self) -> Option<Duration> {
        millis(self.submit_timeout_ms)
    }
}

impl StorageConfig {
    /// Open the configured preference store
    pub fn open(&self) -> Result<Arc<dyn KeyValueStore>> {
        match self.backend {
            StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            StorageBackend::File => {
                let store = FileStore::open(&self.path)
                    .with_context(|| format!("Failed to open preference store at {:?}", self.path))?;
                Ok(Arc::new(store))
            }
        }
    }
}

impl Config {
    /// Load configuration from agency.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./agency.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("agency.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.site.default_route(), RouteId::Home);
        assert_eq!(
            config.navigation.navigator_config().load_timeout,
            Some(Duration::from_secs(10))
        );
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_empty_config() {
        let config = toml::from_str::<Config>("").unwrap_or_default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.forms.submit_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_partial_sections() {
        let toml = r#"
            [site]
            default_route = "services"

            [navigation]
            load_timeout_ms = 0

            [storage]
            backend = "file"
            path = "prefs"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.default_route(), RouteId::Services);
        assert_eq!(config.site.name, "Kaizen Digital Solutions");
        assert_eq!(config.navigation.navigator_config().load_timeout, None);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.path, "prefs");
    }

    #[test]
    fn test_unknown_default_route_is_home() {
        let config: Config = toml::from_str("[site]\ndefault_route = \"allen\"").unwrap();
        assert_eq!(config.site.default_route(), RouteId::Home);
    }

    #[test]
    fn test_load_missing_and_invalid_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = Config::load(dir.path().join("agency.toml")).unwrap();
        assert_eq!(missing.server.port, 3000);

        let path = dir.path().join("broken.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_open_file_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = StorageConfig {
            backend: StorageBackend::File,
            path: dir.path().join("prefs").to_string_lossy().into_owned(),
        };
        let store = storage.open().unwrap();
        assert_eq!(store.name(), "file");
    }
}
