use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::core::checker::DEFAULT_SUBJECT;
use crate::core::reporter::DEFAULT_FAILURE_SUBJECT;

pub const DEFAULT_CONFIG_PATH: &str = "config/stockcheck.toml";
pub const DEFAULT_STATE_FILE: &str = "~/.uatu-stockcheck.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_state_file")]
    pub state_file: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_failure_subject")]
    pub failure_subject: String,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default)]
    pub to_addresses: Vec<String>,
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
}

/// One monitored page as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    /// Identity; the URL is used when absent.
    pub name: Option<String>,
    pub url: String,
    pub query: Option<String>,
    pub pattern: Option<String>,
    #[serde(default)]
    pub case_insensitive: bool,
    #[serde(default)]
    pub expected: ExpectedSetting,
}

/// `expected = 6` or `expected = "dynamic"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ExpectedSetting {
    Count(u64),
    Keyword(String),
}

impl Default for ExpectedSetting {
    fn default() -> Self {
        ExpectedSetting::Keyword("dynamic".to_string())
    }
}

fn default_state_file() -> String {
    DEFAULT_STATE_FILE.to_string()
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}

fn default_failure_subject() -> String {
    DEFAULT_FAILURE_SUBJECT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("UatuStockcheck/{}", env!("CARGO_PKG_VERSION"))
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Uatu Stockcheck".to_string()
}

fn default_use_tls() -> bool {
    true
}

impl AppConfig {
    /// Loads `path`, then applies `UATU__*` environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(
                Environment::with_prefix("UATU")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses an in-memory TOML document. No environment overrides.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.state_file.trim().is_empty() {
            return Err(ConfigError::Message("state_file must not be empty".into()));
        }

        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "fetch.timeout_secs must be greater than 0".into(),
            ));
        }

        if let Some(smtp) = &self.smtp {
            if smtp.port == 0 {
                return Err(ConfigError::Message("SMTP port must be greater than 0".into()));
            }
            if smtp.to_addresses.is_empty() {
                return Err(ConfigError::Message(
                    "SMTP to_addresses must list at least one recipient".into(),
                ));
            }
        }

        for source in &self.sources {
            let label = source.name.as_deref().unwrap_or(&source.url);

            if Url::parse(&source.url).is_err() {
                return Err(ConfigError::Message(format!(
                    "Invalid URL for source '{}'",
                    label
                )));
            }

            if source.query.is_some() == source.pattern.is_some() {
                return Err(ConfigError::Message(format!(
                    "Source '{}' must set exactly one of query or pattern",
                    label
                )));
            }

            if let ExpectedSetting::Keyword(word) = &source.expected {
                if !word.eq_ignore_ascii_case("dynamic") {
                    return Err(ConfigError::Message(format!(
                        "Source '{}' has invalid expected value '{}'",
                        label, word
                    )));
                }
            }
        }

        Ok(())
    }
}
