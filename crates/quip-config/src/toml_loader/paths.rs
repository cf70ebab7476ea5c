//! Platform path resolution for the settings and `.env` files.

use quip_common::ConfigError;
use std::path::PathBuf;

/// Get the platform-specific quip config directory.
///
/// On macOS: `~/Library/Application Support/quip`
/// On Linux: `~/.config/quip`
pub fn quip_config_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("quip"))
}

/// Get the platform-specific default settings file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(quip_config_dir()?.join("config.toml"))
}

/// Get the fallback `.env` path inside the quip config directory.
pub fn default_env_path() -> Result<PathBuf, ConfigError> {
    Ok(quip_config_dir()?.join(".env"))
}
