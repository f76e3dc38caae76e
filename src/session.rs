//! The admin token the client holds between runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Where `rollcall admin` lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Dashboard,
}

/// Client state at ~/.config/rollcall/session.toml
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ClientSession {
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("rollcall");

        Ok(config_dir.join("session.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).with_context(|| format!("Invalid session file {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Could not write {}", path.display()))?;
        Ok(())
    }

    /// Forget the token. The server keeps it valid until it expires.
    pub fn clear(&mut self) {
        self.token = None;
    }

    /// Dashboard when a token is held, login otherwise.
    pub fn landing_page(&self) -> Page {
        match self.token {
            Some(_) => Page::Dashboard,
            None => Page::Login,
        }
    }

    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .context("Not logged in. Run `rollcall login` first.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/session.toml");

        let session = ClientSession {
            token: Some("abc-123".into()),
        };
        session.save_to(&path).unwrap();

        assert_eq!(ClientSession::load_from(&path).unwrap(), session);
    }

    #[test]
    fn test_missing_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let session = ClientSession::load_from(&dir.path().join("session.toml")).unwrap();

        assert_eq!(session.landing_page(), Page::Login);
        assert!(session.require_token().is_err());
    }

    #[test]
    fn test_clear_goes_back_to_login() {
        let mut session = ClientSession {
            token: Some("abc".into()),
        };
        assert_eq!(session.landing_page(), Page::Dashboard);

        session.clear();
        assert_eq!(session.landing_page(), Page::Login);
    }
}
