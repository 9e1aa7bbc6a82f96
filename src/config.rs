use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default import cap: 50 MiB.
pub const DEFAULT_MAX_IMPORT_BYTES: usize = 50 * 1024 * 1024;

/// Runtime configuration. Values come from defaults, then an optional
/// TOML file, then `PIM_*` environment variables; CLI flags override all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PimConfig {
    /// SQLite database file, or `:memory:`.
    pub database_path: String,
    pub port: u16,
    /// Allowed CORS origin. Any origin when unset.
    pub cors_origin: Option<String>,
    /// Largest accepted import document in bytes.
    pub max_import_bytes: usize,
    /// Store view used by import rows that name none.
    pub default_store_view: String,
    pub default_locale: String,
}

impl Default for PimConfig {
    fn default() -> Self {
        Self {
            database_path: "pim.db".to_string(),
            port: 3000,
            cors_origin: None,
            max_import_bytes: DEFAULT_MAX_IMPORT_BYTES,
            default_store_view: "default".to_string(),
            default_locale: "en_US".to_string(),
        }
    }
}

impl PimConfig {
    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Read a TOML file, then overlay environment variables.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: PimConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config.with_env())
    }

    fn with_env(self) -> Self {
        self.with_vars(|key| std::env::var(key).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = var("PIM_DATABASE") {
            self.database_path = path;
        }
        if let Some(port) = var("PIM_PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Some(origin) = var("PIM_CORS_ORIGIN") {
            self.cors_origin = Some(origin);
        }
        if let Some(limit) = var("PIM_MAX_IMPORT_BYTES").and_then(|l| l.parse().ok()) {
            self.max_import_bytes = limit;
        }
        if let Some(code) = var("PIM_DEFAULT_STORE_VIEW") {
            self.default_store_view = code;
        }
        self
    }
}
