//! Configuration for quip.
//!
//! Covers the optional TOML settings file, `.env` loading, and the
//! completion-service credential. All settings have defaults, so quip runs
//! with nothing but `ANTHROPIC_API_KEY` set.

pub mod credential;
pub mod dotenv;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use credential::{Credential, API_KEY_VAR};
pub use schema::{LogLevel, LoggingConfig, ModelConfig, QuipConfig};

use std::path::Path;

use quip_common::ConfigError;

/// Load and validate settings.
///
/// An explicit `path` must exist; otherwise the platform default path is
/// used and a missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<QuipConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}
