//! Configuration management for the prediction service

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::net::SocketAddr;
use std::path::Path;

/// Default configuration file, read if present
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX model file (`MODEL_FILE` overrides)
    pub path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

fn default_intra_threads() -> usize {
    1
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port (`PORT` overrides)
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from `APP_CONFIG` or the default path, then the environment
    pub fn load() -> Result<Self> {
        let path = env::var("APP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path, then the environment
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_sources(
            path.as_ref(),
            env::var("MODEL_FILE").ok(),
            env::var("PORT").ok(),
        )
    }

    /// Layer defaults, an optional file, `APP__*` variables and the two
    /// well-known overrides, in that order.
    fn from_sources(path: &Path, model_file: Option<String>, port: Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let config = Config::builder()
            .set_default("model.path", defaults.model.path)?
            .set_default("model.intra_threads", defaults.model.intra_threads as u64)?
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as u64)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("model.path", model_file)?
            .set_override_option("server.port", port)?
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                path: "xgboost_model.onnx".to_string(),
                intra_threads: default_intra_threads(),
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 7860,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
