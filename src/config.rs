//! Server settings and the client's two-line connection file.

use std::fmt;
use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::protocol::{DEFAULT_HOST, DEFAULT_PORT};

/// Default location of the client connection file.
pub const DEFAULT_CONFIG_FILE: &str = "server_info.dat";

/// Default number of concurrent sessions.
pub const DEFAULT_WORKERS: NonZeroUsize = NonZeroUsize::new(5).unwrap();

/// Default idle time before a session is dropped.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(300);

/// Settings for the quiz server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on sessions served at once.
    pub workers: NonZeroUsize,
    pub read_timeout: Option<Duration>,
    /// JSON question file replacing the built-in bank.
    pub questions: Option<PathBuf>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
            questions: None,
        }
    }
}

/// Error reading the connection file.
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    MissingHost,
    MissingPort,
    InvalidPort(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read configuration: {}", e),
            ConfigError::MissingHost => f.write_str("first line must hold the server host"),
            ConfigError::MissingPort => f.write_str("second line must hold the server port"),
            ConfigError::InvalidPort(value) => write!(f, "invalid port {:?}", value),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

/// Where a client connects: host on line one, port on line two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
}

impl ConnectionConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let mut lines = contents.lines().map(str::trim);

        let host = match lines.next() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(ConfigError::MissingHost),
        };

        let port = match lines.next() {
            Some(port) if !port.is_empty() => port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port.to_string()))?,
            _ => return Err(ConfigError::MissingPort),
        };

        Ok(Self { host, port })
    }

    /// Read the file, falling back to `localhost:1234` when it is unusable.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::from_file(path).unwrap_or_else(|e| {
            warn!(
                "configuration file {} unusable ({}), using default values",
                path.display(),
                e
            );
            Self::default()
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}
