//! Configuration management for the rail assistant
//!
//! Supports loading configuration from:
//! - TOML files (`config/default.toml`, `config/{env}.toml`)
//! - Environment variables (`RAIL_ASSIST__` prefix, `__` separator)
//!
//! Store credentials live in an explicit [`DatabaseConfig`] that is handed to
//! the persistence layer at construction time; nothing reads them from
//! ambient globals.

pub mod settings;

pub use settings::{
    load_settings, load_settings_from, DatabaseConfig, EvalConfig, ObservabilityConfig,
    RuntimeEnvironment, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
