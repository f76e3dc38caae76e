//! Server configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AttendanceError, AttendanceResult};
use crate::session::SESSION_TTL;

pub const ENV_BIND: &str = "ROLLCALL_BIND";
pub const ENV_DATA_DIR: &str = "ROLLCALL_DATA_DIR";

static DEFAULT_BIND: &str = "127.0.0.1:8080";

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("rollcall"))
        .unwrap_or_else(|| PathBuf::from("rollcall-data"))
}

fn default_session_ttl_secs() -> u64 {
    SESSION_TTL.as_secs()
}

/// Configuration at ~/.config/rollcall/config.toml
///
/// Every field is optional in the file. `ROLLCALL_BIND` and
/// `ROLLCALL_DATA_DIR` override the file when set.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Directory holding the table files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: default_bind(),
            data_dir: default_data_dir(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

impl ServerConfig {
    pub fn config_path() -> AttendanceResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AttendanceError::Config("Could not determine config directory".into()))?
            .join("rollcall");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file (defaults when absent), then apply env overrides.
    pub fn load() -> AttendanceResult<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> AttendanceResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AttendanceError::Config(e.to_string()))
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup(ENV_BIND) {
            self.bind = bind;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
