use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "hearth.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub max_connections: u32,
    /// `tracing_subscriber::EnvFilter` directives.
    pub log_filter: String,
    pub cors_allow_any: bool,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            database_path: PathBuf::from("hearth.db"),
            max_connections: 5,
            log_filter: "info,tower_http=info,sqlx=warn".to_string(),
            cors_allow_any: false,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// File named by `HEARTH_CONFIG` (or `hearth.toml` when present), then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var_os("HEARTH_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        base.apply_env(|key| std::env::var(key).ok())
    }

    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("HEARTH_BIND_ADDR") {
            self.bind_addr = value.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "HEARTH_BIND_ADDR",
                value,
            })?;
        }
        if let Some(value) = lookup("HEARTH_DATABASE_PATH") {
            self.database_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("HEARTH_MAX_CONNECTIONS") {
            self.max_connections = value.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "HEARTH_MAX_CONNECTIONS",
                value,
            })?;
        }
        if let Some(value) = lookup("RUST_LOG") {
            self.log_filter = value;
        }
        Ok(self)
    }
}
