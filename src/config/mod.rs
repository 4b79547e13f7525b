//! Configuration management for clubsync

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::client::DEFAULT_REMOTE_PAGE_SIZE;
use crate::error::{ConfigError, Result};
use crate::sync::{PaginatorConfig, SportEligibility, SyncConfig};
use crate::sync::paginator::{DEFAULT_PAGE_SIZE, SAFETY_PAGE_LIMIT};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Club API bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// API host override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Member ID of the configured user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    /// Workout subtypes this member may see; empty means all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub eligible_sports: Vec<String>,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Posts per page when browsing
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Posts requested per remote page
    #[serde(default = "default_remote_page_size")]
    pub remote_page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_remote_page_size() -> usize {
    DEFAULT_REMOTE_PAGE_SIZE
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            format: None,
            page_size: default_page_size(),
            remote_page_size: default_remote_page_size(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".clubsync").join("config.yaml"))
    }

    /// Resolve an optional override to the config file path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an optional override or the default location
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Save configuration to an optional override or the default location
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // Token inside: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Reject values the engine can't work with
    pub fn validate(&self) -> Result<()> {
        if self.preferences.page_size == 0 {
            return Err(
                ConfigError::Invalid("preferences.page_size must be at least 1".to_string()).into(),
            );
        }
        if self.preferences.remote_page_size == 0 {
            return Err(ConfigError::Invalid(
                "preferences.remote_page_size must be at least 1".to_string(),
            )
            .into());
        }
        Ok(())
    }

    /// Validate that required configuration is present
    pub fn validate_auth(&self) -> Result<()> {
        if self.api_token.is_none() {
            return Err(ConfigError::MissingApiToken.into());
        }
        Ok(())
    }

    /// Sport allow-list for browsing
    pub fn eligibility(&self) -> SportEligibility {
        SportEligibility::from_sports(&self.eligible_sports)
    }

    /// Paginator settings from preferences
    pub fn paginator_config(&self) -> PaginatorConfig {
        PaginatorConfig {
            page_size: self.preferences.page_size,
            remote_page_size: self.preferences.remote_page_size,
            max_remote_pages: SAFETY_PAGE_LIMIT,
        }
    }

    /// Orchestrator settings from preferences
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            remote_page_size: self.preferences.remote_page_size,
            ..SyncConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_token.is_none());
        assert!(config.eligible_sports.is_empty());
        assert_eq!(config.preferences.page_size, 5);
        assert_eq!(config.preferences.remote_page_size, 20);
        assert_eq!(config.eligibility(), SportEligibility::Any);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = Config {
            api_token: Some("secret".to_string()),
            user_id: Some(7),
            eligible_sports: vec!["swim".to_string(), "run".to_string()],
            ..Config::default()
        };
        config.save_to(path.clone()).unwrap();

        let loaded = Config::load_from(path.clone()).unwrap();
        assert_eq!(loaded.api_token.as_deref(), Some("secret"));
        assert_eq!(loaded.user_id, Some(7));
        assert!(loaded.eligibility().allows(Some("swim")));
        assert!(!loaded.eligibility().allows(Some("spin")));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_partial_preferences_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "api_token: t\npreferences:\n  page_size: 10\n").unwrap();

        let config = Config::load_from(path).unwrap();
        assert_eq!(config.preferences.page_size, 10);
        assert_eq!(config.preferences.remote_page_size, DEFAULT_REMOTE_PAGE_SIZE);
        assert_eq!(config.paginator_config().page_size, 10);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "preferences:\n  page_size: 0\n").unwrap();

        assert!(Config::load_from(path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load_from(PathBuf::from("/nonexistent/clubsync.yaml")).unwrap_err();
        assert!(matches!(err, crate::error::Error::Config(ConfigError::NotFound)));
    }

    #[test]
    fn test_load_at_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yaml");
        let config = Config {
            api_host: Some("http://localhost:9000".to_string()),
            ..Config::default()
        };
        config.save_at(path.to_str()).unwrap();

        let loaded = Config::load_at(path.to_str()).unwrap();
        assert_eq!(loaded.api_host.as_deref(), Some("http://localhost:9000"));
        assert_eq!(Config::resolve_path(path.to_str()).unwrap(), path);
    }

    #[test]
    fn test_validate_auth() {
        let mut config = Config::default();
        assert!(config.validate_auth().is_err());
        config.api_token = Some("t".to_string());
        assert!(config.validate_auth().is_ok());
    }
}
