use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Service configuration, read from `~/.ligtas/config.toml` when present.
///
/// Every section is optional in the file; missing values take defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LigtasConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub model: ModelSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSection {
    /// Address to bind, e.g. "127.0.0.1:8000"
    pub bind: String,
    /// Allow any CORS origin instead of localhost only
    pub cors_permissive: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            cors_permissive: false,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://ligtas.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelSection {
    pub path: PathBuf,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/soil_acidity_model_v3.json"),
        }
    }
}

impl LigtasConfig {
    /// Load config from `LIGTAS_CONFIG` or `~/.ligtas/config.toml`, then apply
    /// environment overrides.
    ///
    /// A missing file is not an error; an unreadable or invalid one is.
    pub fn load() -> Result<Self> {
        let path = env::var("LIGTAS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_path());

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a config file without applying environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&content).context("Failed to parse config file (invalid TOML)")
    }

    /// Get config file path: ~/.ligtas/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ligtas/config.toml")
    }

    /// `DATABASE_URL`, `LIGTAS_MODEL_PATH` and `LIGTAS_BIND` win over the file
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = url;
        }
        if let Some(path) = lookup("LIGTAS_MODEL_PATH").filter(|v| !v.is_empty()) {
            self.model.path = PathBuf::from(path);
        }
        if let Some(bind) = lookup("LIGTAS_BIND").filter(|v| !v.is_empty()) {
            self.server.bind = bind;
        }
    }
}
