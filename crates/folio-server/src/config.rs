//! Server configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, an optional
//! `folio.toml` in the working directory, and `FOLIO_`-prefixed environment
//! variables (`FOLIO_PORT=8080`, `FOLIO_DATABASE_URL=postgres://...`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Where artefacts are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    /// Single JSON document on local disk.
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    /// Required when `storage` is `postgres`.
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Document used when `storage` is `local`.
    pub local_path: PathBuf,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Loads configuration from `folio.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(File::with_name("folio").required(false))
    }

    /// Loads configuration from a specific file plus the environment.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::build(File::with_name(path))
    }

    fn build(file: File<config::FileSourceFile, config::FileFormat>) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("storage", "postgres")?
            .set_default("max_connections", 10)?
            .set_default("local_path", "portfolio.json")?
            .set_default("log_format", "text")?
            .add_source(file)
            .add_source(Environment::with_prefix("FOLIO").try_parsing(true))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage == StorageBackend::Postgres && self.database_url.is_none() {
            return Err(ConfigError::Message(
                "FOLIO_DATABASE_URL must be set when storage is postgres".to_string(),
            ));
        }
        Ok(())
    }

    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
