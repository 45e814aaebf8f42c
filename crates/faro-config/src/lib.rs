//! # faro-config
//!
//! Layered configuration loading for faro using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`FARO_*` prefix, `__` as separator)
//! 2. Project-level `.faro/config.toml`
//! 3. User-level `~/.config/faro/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `FARO_STORAGE__BUCKET` -> `storage.bucket`,
//! `FARO_MODEL__API_KEY` -> `model.api_key`, etc. The `__` (double
//! underscore) separates nested config sections.
//!
//! The core treats these values as opaque constants injected at startup; the
//! only validation is the per-section `is_configured` gate, checked before a
//! run begins.

mod error;
mod model;
mod pipeline;
mod sources;
mod storage;

pub use error::ConfigError;
pub use model::ModelConfig;
pub use pipeline::PipelineConfig;
pub use sources::default_sources;
pub use storage::StorageConfig;

use std::collections::BTreeMap;
use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FaroConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Data sources mapped label -> object-store prefix. Ordered so runs are
    /// deterministic.
    #[serde(default = "default_sources")]
    pub sources: BTreeMap<String, String>,
}

impl Default for FaroConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            model: ModelConfig::default(),
            pipeline: PipelineConfig::default(),
            sources: default_sources(),
        }
    }
}

impl FaroConfig {
    /// Load configuration from all sources (TOML files + environment
    /// variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when extraction fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support. This is the typical
    /// entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when extraction fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain. Public so tests can layer extra
    /// providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".faro/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("FARO_").split("__"))
    }

    /// Require the sections a pipeline run depends on. Absent configuration
    /// is fatal at startup, before any data is touched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] naming the first incomplete
    /// section.
    pub fn require_run_sections(&self) -> Result<(), ConfigError> {
        if !self.storage.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "storage".into(),
            });
        }
        if !self.model.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "model".into(),
            });
        }
        if self.sources.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "sources".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("faro").join("config.toml"))
    }

    /// Load `.env` from the workspace root, walking up from
    /// `CARGO_MANIFEST_DIR` when available. Silently does nothing if no
    /// `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
