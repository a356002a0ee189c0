//! Configuration management for the SponsorsClub client

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Backend used when neither the flag, the environment nor the config file set one
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8001";

/// Web front end hosting the login entry point
pub const DEFAULT_WEB_URL: &str = "http://localhost:3000";

/// Login entry point, relative to the web URL
pub const LOGIN_PATH: &str = "/login";

fn default_timeout_secs() -> u64 {
    30
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Web front end base URL, used to build the login location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,

    /// Transport timeout for every request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Where the token pair is persisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_path: Option<String>,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// User preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            web_url: None,
            timeout_secs: default_timeout_secs(),
            session_path: None,
            preferences: Preferences::default(),
        }
    }
}

impl Config {
    /// Directory holding the config and session files (~/.sponsorsclub)
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".sponsorsclub"))
    }

    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.yaml"))
    }

    /// Resolve an optional override into a concrete config path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration, falling back to defaults when the file does not exist
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values the client cannot work with
    pub fn validate(&self) -> Result<()> {
        for url in [&self.api_base_url, &self.web_url].into_iter().flatten() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!("'{}' is not an http(s) URL", url)).into());
            }
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".to_string()).into());
        }
        Ok(())
    }

    /// Backend base URL, preferring the runtime override
    pub fn api_base_url(&self, override_url: Option<&str>) -> String {
        override_url
            .or(self.api_base_url.as_deref())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Location the session teardown navigates to
    pub fn login_location(&self) -> String {
        let web = self
            .web_url
            .as_deref()
            .unwrap_or(DEFAULT_WEB_URL)
            .trim_end_matches('/');
        format!("{}{}?origin=logout", web, LOGIN_PATH)
    }

    /// Transport timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Session file path, preferring the runtime override
    pub fn session_path(&self, override_path: Option<&str>) -> Result<PathBuf> {
        match override_path.or(self.session_path.as_deref()) {
            Some(p) => Ok(PathBuf::from(p)),
            None => Ok(Self::home_dir()?.join("session.yaml")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_base_url.is_none());
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.api_base_url(None), DEFAULT_API_BASE_URL);
        assert_eq!(
            config.login_location(),
            "http://localhost:3000/login?origin=logout"
        );
    }

    #[test]
    fn test_base_url_precedence() {
        let config = Config {
            api_base_url: Some("https://api.sponsorsclub.example/".to_string()),
            ..Config::default()
        };

        assert_eq!(config.api_base_url(None), "https://api.sponsorsclub.example");
        assert_eq!(
            config.api_base_url(Some("http://localhost:9000")),
            "http://localhost:9000"
        );
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let config = Config::load_from(temp.path().join("absent.yaml")).unwrap();
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            "api_base_url: http://10.0.0.2:8001\n\
             web_url: https://sponsorsclub.example\n\
             timeout_secs: 5\n\
             preferences:\n  format: json\n",
        )
        .unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.api_base_url.as_deref(), Some("http://10.0.0.2:8001"));
        assert_eq!(loaded.timeout(), Duration::from_secs(5));
        assert_eq!(loaded.preferences.format.as_deref(), Some("json"));
        assert_eq!(
            loaded.login_location(),
            "https://sponsorsclub.example/login?origin=logout"
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "api_base_url: ftp://nope\n").unwrap();

        assert!(Config::load_from(path).is_err());
    }

    #[test]
    fn test_session_path_override() {
        let config = Config {
            session_path: Some("/from/config.yaml".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.session_path(Some("/from/flag.yaml")).unwrap(),
            PathBuf::from("/from/flag.yaml")
        );
        assert_eq!(
            config.session_path(None).unwrap(),
            PathBuf::from("/from/config.yaml")
        );
    }
}
