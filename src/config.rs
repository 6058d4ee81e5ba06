use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use validator::Validate;

use crate::models::MatchingOptions;
use crate::services::OracleConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[validate(nested)]
    pub oracle: OracleSettings,
    #[validate(nested)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OracleSettings {
    #[validate(url)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[validate(length(min = 1))]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    #[validate(range(min = 1))]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

fn default_max_tokens() -> u32 { 200 }
fn default_timeout_secs() -> u64 { 30 }

impl OracleSettings {
    pub fn to_oracle_config(&self) -> OracleConfig {
        OracleConfig {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MatchingSettings {
    /// Minimum final score (0-100) for a pair to become a match
    #[serde(default = "default_threshold")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub threshold: f64,
    #[serde(default = "default_max_concurrent_oracle_calls")]
    #[validate(range(min = 1))]
    pub max_concurrent_oracle_calls: usize,
}

fn default_threshold() -> f64 { 70.0 }
fn default_max_concurrent_oracle_calls() -> usize { 4 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with MATCHMAKER_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Development overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., MATCHMAKER__MATCHING__THRESHOLD -> matching.threshold
            .add_source(
                Environment::with_prefix("MATCHMAKER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MATCHMAKER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        Self::finish(settings)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings
            .validate()
            .map_err(|e| ConfigError::Message(format!("Invalid configuration: {}", e)))?;
        Ok(settings)
    }

    /// Run limits for the matcher
    pub fn matching_options(&self) -> MatchingOptions {
        MatchingOptions {
            threshold: self.matching.threshold,
            max_concurrent_oracle_calls: self.matching.max_concurrent_oracle_calls,
            oracle_timeout: Duration::from_secs(self.oracle.timeout_secs),
        }
    }
}

/// Apply well-known unprefixed environment variables on top of the config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(api_key) = env::var("OPENAI_API_KEY") {
        builder = builder.set_override("oracle.api_key", api_key)?;
    }

    builder.build()
}
