//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

/// Where the server listens and where it reads and writes data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address, `HOST`.
    pub host: String,
    /// Bind port, `PORT`.
    pub port: u16,
    /// Chapter documents, `SCENARIO_DIR`.
    pub scenario_dir: PathBuf,
    /// Save files, `SAVE_DIR`.
    pub save_dir: PathBuf,
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, applying defaults for
    /// unset variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port,
            scenario_dir: lookup("SCENARIO_DIR")
                .map_or_else(|| PathBuf::from("data/scenario"), PathBuf::from),
            save_dir: lookup("SAVE_DIR").map_or_else(|| PathBuf::from("saves"), PathBuf::from),
        })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
