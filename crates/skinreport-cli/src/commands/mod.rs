//! CLI subcommands.

pub mod classify;
pub mod config;
pub mod extract;
pub mod generate;

use std::path::{Path, PathBuf};

use tracing::debug;

use skinreport_core::SkinConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skinreport")
        .join("config.json")
}

/// Load the configuration from `--config`, else from the default location
/// if a file exists there, else use the built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SkinConfig> {
    if let Some(path) = config_path {
        return Ok(SkinConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config {}", default_path.display());
        Ok(SkinConfig::from_file(&default_path)?)
    } else {
        Ok(SkinConfig::default())
    }
}
