//! Server configuration loaded from `config.toml`.
//!
//! Every field has a default, so a missing file is not an error. `HOST`,
//! `PORT` and `DATABASE_URL` from the environment override the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use tracing::{debug, info};

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "STOCK_TRACKER_CONFIG";

/// Config file read when [`CONFIG_PATH_ENV`] is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// HTTP server and storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, e.g. "0.0.0.0"
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Requests taking longer than this are answered with 408
    pub request_timeout_secs: u64,
    /// Database URL; `DATABASE_URL` takes precedence
    pub database_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_secs: 30,
            database_url: None,
        }
    }
}

impl ServerConfig {
    /// Parses the socket address to bind.
    ///
    /// # Errors
    /// Returns `Error::Config` if `host` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|e| Error::Config {
            message: format!("Invalid host '{}': {e}", self.host),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Applies `HOST` and `PORT` overrides from the environment.
    ///
    /// # Errors
    /// Returns `Error::Config` if `PORT` is not a valid port number.
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Ok(host) = std::env::var("HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.port = port.parse().map_err(|e| Error::Config {
                message: format!("PORT must be a number, got '{port}': {e}"),
            })?;
        }
        Ok(self)
    }
}

/// Parses a configuration from TOML text.
///
/// # Errors
/// Returns `Error::Config` if the TOML is invalid or a field has the wrong type.
pub fn parse_config(contents: &str) -> Result<ServerConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns `Error::Config` if the file cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServerConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from [`CONFIG_PATH_ENV`] or `./config.toml`, then
/// applies environment overrides. A missing default file yields defaults; a
/// missing explicitly named file is an error.
///
/// # Errors
/// Returns `Error::Config` if a file exists but is invalid, or an override is
/// malformed.
pub fn load_app_configuration() -> Result<ServerConfig> {
    let config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => load_config(path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH)?,
        Err(_) => {
            info!("No {DEFAULT_CONFIG_PATH} found, using default configuration.");
            ServerConfig::default()
        }
    };
    config.apply_env_overrides()
}
