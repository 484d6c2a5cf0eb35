//! Configuration management for taskdeck.
//!
//! Loads configuration from ${TASKDECK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "TASKDECK_API_URL";

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// New comments from the template stay present while the user's values win.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;
    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for taskdeck configuration and data directories.
    //!
    //! TASKDECK_HOME resolution order:
    //! 1. TASKDECK_HOME environment variable (if set)
    //! 2. ~/.config/taskdeck (default)

    use std::path::PathBuf;

    /// Returns the taskdeck home directory.
    pub fn taskdeck_home() -> PathBuf {
        if let Ok(home) = std::env::var("TASKDECK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".taskdeck"),
            |h| h.join(".config").join("taskdeck"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        taskdeck_home().join("config.toml")
    }

    /// Returns the path to the stored session token.
    pub fn session_path() -> PathBuf {
        taskdeck_home().join("session.json")
    }

    /// Returns the directory that receives log files.
    pub fn logs_dir() -> PathBuf {
        taskdeck_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the task API server.
    pub api_base_url: String,
    /// Request timeout in seconds; 0 disables it.
    pub request_timeout_secs: u64,
    /// Log filter used when `TASKDECK_LOG` is unset.
    pub log_level: String,
}

impl Config {
    pub const DEFAULT_API_BASE_URL: &'static str = "http://localhost:8000";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_LOG_LEVEL: &'static str = "info";

    /// Loads configuration from the default path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the API base URL, honoring the `TASKDECK_API_URL` override.
    pub fn effective_api_base_url(&self) -> String {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.api_base_url.clone(),
        }
    }

    /// Returns the request timeout, or None when disabled (0).
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Saves only the `api_base_url` field to the config file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or written.
    pub fn save_api_base_url(url: &str) -> Result<()> {
        Self::save_api_base_url_to(&paths::config_path(), url)
    }

    /// Saves only the `api_base_url` field to a specific config file path.
    ///
    /// Creates the file from the template if it doesn't exist. Existing
    /// values and comments are preserved.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or written.
    pub fn save_api_base_url_to(path: &Path, url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let parsed = url::Url::parse(url).with_context(|| format!("Invalid URL '{url}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("API URL must use http or https, got '{}'", parsed.scheme());
        }

        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        doc["api_base_url"] = value(url.trim_end_matches('/'));

        Self::write_config(path, &doc.to_string())
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "api_base_url = \"https://tasks.example.com\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_base_url, "https://tasks.example.com");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_default_template_parses_to_defaults() {
        let parsed: Config = toml::from_str(default_config_template()).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.api_base_url, defaults.api_base_url);
        assert_eq!(parsed.request_timeout_secs, defaults.request_timeout_secs);
        assert_eq!(parsed.log_level, defaults.log_level);
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("api_base_url = \"http://localhost:8000\""));
        assert!(contents.contains("# HTTP request timeout"));
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_save_api_base_url_preserves_other_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "request_timeout_secs = 5\n").unwrap();

        Config::save_api_base_url_to(&config_path, "https://api.example.com/").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.request_timeout_secs, 5);
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# Base URL of the task API server."));
    }

    #[test]
    fn test_save_api_base_url_rejects_non_http() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        assert!(Config::save_api_base_url_to(&config_path, "ftp://example.com").is_err());
        assert!(Config::save_api_base_url_to(&config_path, "not a url").is_err());
        assert!(!config_path.exists());
    }

    #[test]
    fn test_timeout_zero_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.request_timeout().is_none());
        assert_eq!(
            Config::default().request_timeout(),
            Some(Duration::from_secs(30))
        );
    }
}
