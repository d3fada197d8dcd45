//! Listpulse - headless service for recording and serving shared list
//! activity timestamps
//!
//! This crate provides:
//! - An HTTP API with two routes: credential-gated batch timestamp writes
//!   and public batch reads
//! - Pluggable timestamp storage (persistent SQLite or in-memory)
//! - TOML configuration with environment overrides
//!
//! # Usage
//!
//! As a library (embedded):
//! ```ignore
//! use listpulse::{Config, Core};
//!
//! let config = Config::from_file("~/.listpulse/config.toml").unwrap();
//! let core = Core::new(config).unwrap();
//! // core.start_api_server().await.unwrap();
//! ```
//!
//! As a standalone server (CLI):
//! ```text
//! listpulse --config ~/.listpulse/config.toml
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use error::{CoreError, Result};

use std::sync::Arc;
use store::TimestampStore;

/// Core service wiring configuration to the store and the HTTP API
pub struct Core {
    /// Configuration
    pub config: Config,

    /// Timestamp store backend
    pub store: Arc<dyn TimestampStore>,
}

impl Core {
    /// Create a new Core instance with the backend selected by `config`
    pub fn new(config: Config) -> Result<Self> {
        let store = store::from_config(&config)?;
        Ok(Core { config, store })
    }

    /// Create a Core instance with an injected store (for embedding and tests)
    pub fn with_store(config: Config, store: Arc<dyn TimestampStore>) -> Self {
        Core { config, store }
    }

    /// Start the HTTP API server (blocks until shutdown)
    pub async fn start_api_server(&self) -> Result<()> {
        let addr = self.config.server_addr();
        tracing::info!("Starting API server on {}", addr);
        api::serve(addr, self.store.clone(), &self.config).await
    }
}
