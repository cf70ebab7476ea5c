//! TOML settings file loading.

mod loader;
mod paths;


pub use loader::{load_default, load_from_path};
pub use paths::{default_config_path, default_env_path, quip_config_dir};
