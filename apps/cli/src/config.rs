//! Layered CLI configuration
//!
//! Built-in defaults, then a TOML file (`--config`, or `ocldm.toml` in the
//! user config directory), then `OCLDM__SECTION__KEY` environment variables.

use anyhow::Context;
use config::{Environment, File};
use ocldm_client::{ClientOptions, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "ocldm.toml";
pub const ENV_PREFIX: &str = "OCLDM";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_seconds: u64,
    /// Owner of the dictionaries commands act on when none is given.
    pub username: Option<String>,
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let options = ClientOptions::default();
        Self {
            base_url: options.base_url,
            token: None,
            timeout_seconds: options.timeout.as_secs(),
            username: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.base_url.clone(),
            token: self.token.clone().filter(|t| !t.is_empty()),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// daily, hourly, minutely or never
    pub file_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "./logs".to_string(),
            file_prefix: "ocldm".to_string(),
            file_rotation: "daily".to_string(),
        }
    }
}

impl Config {
    /// Load with a `.env` file applied to the environment first.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from(path)
    }

    /// Load without touching `.env`. An explicit `path` must exist; the
    /// default file is optional.
    pub fn load_from(path: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Config::default())
            .context("Failed to build default configuration")?;
        let mut builder = config::Config::builder().add_source(defaults);

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(path) = default_config_path() {
                    builder = builder.add_source(File::from(path).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        let config: Config = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.client.base_url.starts_with("http://")
            || self.client.base_url.starts_with("https://"))
        {
            return Err(format!(
                "client.base_url must be an http(s) URL, got '{}'",
                self.client.base_url
            ));
        }
        if self.client.timeout_seconds == 0 {
            return Err("client.timeout_seconds must be positive".to_string());
        }
        if self.client.page_size == 0 {
            return Err("client.page_size must be positive".to_string());
        }
        match self.logging.file_rotation.as_str() {
            "daily" | "hourly" | "minutely" | "never" => Ok(()),
            other => Err(format!("unknown logging.file_rotation '{}'", other)),
        }
    }
}

/// `<config dir>/ocldm/ocldm.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ocldm").join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.client.base_url, "https://api.openconceptlab.org");
        assert_eq!(config.client.page_size, 10);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("ocldm-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ocldm.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[client]\nbase_url = \"http://localhost:8000\"\ntoken = \"abc\"\n\n[logging]\njson = true"
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.client.base_url, "http://localhost:8000");
        assert_eq!(config.client.options().token.as_deref(), Some("abc"));
        assert_eq!(config.client.timeout_seconds, 30);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "warn");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("ocldm-does-not-exist.toml");
        assert!(Config::load_from(Some(&path)).is_err());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = Config::default();
        config.client.base_url = "ftp://example.org".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.file_rotation = "weekly".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_token_is_no_token() {
        let mut config = Config::default();
        config.client.token = Some(String::new());
        assert!(config.client.options().token.is_none());
    }
}
