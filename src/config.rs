//! Configuration management for Listpulse
//!
//! Loads settings from TOML file at ~/.listpulse/config.toml

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend for activity timestamps
    #[serde(default)]
    pub storage: Storage,

    /// Data directory (defaults to ~/.listpulse)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".listpulse"))
        .unwrap_or_else(|| PathBuf::from(".listpulse"))
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
    /// Persistent SQLite database under `data_dir`
    #[default]
    Sqlite,
    /// In-memory map, lost on restart
    Memory,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port (default: 19460)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Server host (default: 127.0.0.1 - localhost only)
    /// WARNING: Setting to "0.0.0.0" exposes the server to your network.
    #[serde(default = "default_host")]
    pub host: String,

    /// Secret credentials gating timestamp writes.
    /// Clients must send: "Authorization: Basic <credentials>".
    /// When unset, every write request is refused.
    #[serde(default)]
    pub credentials: Option<String>,
}

fn default_port() -> u16 {
    19460 // Uncommon port to avoid conflicts
}

fn default_host() -> String {
    "127.0.0.1".to_string() // Localhost only - secure by default
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: default_port(),
            host: default_host(),
            credentials: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            storage: Storage::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let expanded_path = expand_path(path.as_ref());

        if !expanded_path.exists() {
            return Err(CoreError::Config(format!(
                "Configuration file not found: {}",
                expanded_path.display()
            )));
        }

        let content = std::fs::read_to_string(&expanded_path)?;
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }

    /// Load configuration from file or use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_default()
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|p| p.join(".listpulse").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".listpulse/config.toml"))
    }

    /// Get the data directory, expanding ~ if present
    pub fn data_dir(&self) -> PathBuf {
        expand_path(&self.data_dir)
    }

    /// Get the server socket address
    pub fn server_addr(&self) -> SocketAddr {
        use std::net::ToSocketAddrs;

        format!("{}:{}", self.server.host, self.server.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], self.server.port)))
    }

    /// Apply environment variable overrides (server options only)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("LISTPULSE_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("LISTPULSE_SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(credentials) = std::env::var("LISTPULSE_CREDENTIALS") {
            self.server.credentials = if credentials.is_empty() {
                None
            } else {
                Some(credentials)
            };
        }
        if let Ok(data_dir) = std::env::var("LISTPULSE_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CoreError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Create a default configuration file at the given path
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<()> {
        // Write a well-commented config file
        let content = r#"# Listpulse Configuration

# Storage backend: "sqlite" (persistent, default) or "memory" (ephemeral)
storage = "sqlite"

[server]
# Port to listen on (default: 19460)
port = 19460

# Host to bind to
# "127.0.0.1" = localhost only (secure, recommended for testing)
# "0.0.0.0" = all interfaces (required for real clients - set credentials!)
host = "127.0.0.1"

# Secret credentials required on timestamp writes.
# Clients must send: Authorization: Basic <credentials>
# Writes are refused until this is set; reads are always public.
# credentials = "your-secret-credentials"
"#;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        Ok(())
    }
}

/// Expand ~ to home directory in paths
pub fn expand_path(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(path.strip_prefix("~").unwrap());
        }
    }
    path.to_path_buf()
}
