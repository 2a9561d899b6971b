//! Configuration file loading
//!
//! Settings resolve in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 are handled by clap in each binary; this module provides
//! tier 3 and small helpers shared by both sides.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Platform config file location for a module
///
/// Linux checks `~/.config/<module>/config.toml` first, then
/// `/etc/<module>/config.toml`. Returns the first one that exists.
pub fn default_config_path(module: &str) -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join(module).join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc").join(module).join("config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Load a TOML config file
///
/// An explicitly requested file must exist and parse. Without one, the
/// platform default location is tried and a missing file yields `T::default()`.
pub fn load_toml_config<T>(explicit: Option<&Path>, module: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path(module) {
            Some(path) => path,
            None => {
                debug!("No config file for {}, using defaults", module);
                return Ok(T::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path).map_err(|e| {
        Error::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let config = toml::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Environment variable value, treating empty as unset
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Join a base URL and an absolute path without doubling the slash
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
