//! Configuration loading
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 are handled by each binary's clap definition (`env = ...`).
//! This module covers the TOML file and the compiled defaults. A missing or
//! malformed config file never aborts startup.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "SPINKIT_CONFIG";

/// Compiled defaults
pub const DEFAULT_PORT: u16 = 5800;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Contents of `config.toml`
///
/// Every field is optional; absent fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    /// Directory holding `djs.json`, `venues.json`, `events.json`, `recordings.json`
    pub data_dir: Option<PathBuf>,
    /// Directory for persisted client state (filters)
    pub state_dir: Option<PathBuf>,
    #[serde(default)]
    pub notion: NotionToml,
}

/// `[notion]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NotionToml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub version: Option<String>,
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
    }

    /// Load the config file if one exists, otherwise defaults
    ///
    /// Parse failures are logged and replaced by defaults.
    pub fn load_or_default() -> Self {
        let Some(path) = config_file_path() else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Locate the config file for this platform
///
/// `SPINKIT_CONFIG` wins when set. Otherwise `<config dir>/spinkit/config.toml`,
/// then `/etc/spinkit/config.toml` on Linux.
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        return path.exists().then_some(path);
    }

    let user_config = dirs::config_dir().map(|d| d.join("spinkit").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/spinkit/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Default directory for persisted client state
pub fn default_state_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("spinkit"))
        .unwrap_or_else(|| PathBuf::from("./spinkit_data"))
}
