//! # configs
//!
//! Layered settings for the hn-parser binaries. Later layers win:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config` / `HN_PARSER_CONFIG`)
//! 3. environment variables, e.g. `HN_PARSER__SERVER__PORT=9000`
//!
//! A `.env` file in the working directory is loaded into the environment
//! first when present.

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use hn_core::DowngradePolicy;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "HN_PARSER";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub log: LogSettings,
    pub parser: ParserSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Upper bound for a `POST /parse` body.
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogSettings {
    /// Default `EnvFilter` directive; `RUST_LOG` overrides it.
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParserSettings {
    /// How the 1.0 parser treats documents declaring 2.0.
    pub downgrade: DowngradePolicy,
}

impl Settings {
    /// Loads `.env`, then defaults, the optional TOML file and `HN_PARSER__*` variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env file");
        }

        let mut builder = Self::defaults()?;
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        Self::build(builder.add_source(environment()))
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("server.max_body_bytes", 2 * 1024 * 1024)?
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?
            .set_default("parser.downgrade", "reject")?)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "server.host",
                reason: "must not be empty".into(),
            });
        }
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Invalid {
                key: "server.max_body_bytes",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}
