//! pitch-relay configuration
//!
//! Command line and environment come in through clap, the TOML file fills
//! whatever those leave unset, compiled defaults cover the rest.

use std::path::PathBuf;

use clap::Parser;
use pitch_common::api::SERVICE_PATH;
use pitch_common::config::{join_url, load_toml_config};
use serde::Deserialize;

/// Used when `BASIC_PITCH_SERVICE_URL` is not configured anywhere
pub const DEFAULT_SERVICE_URL: &str = "https://basic-pitch-service.railway.app";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5730;
/// Same ceiling the pitch service applies to uploads
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

const MODULE_NAME: &str = "pitch-relay";

/// Command-line arguments for pitch-relay
#[derive(Parser, Debug, Default)]
#[command(name = "pitch-relay")]
#[command(about = "Relays audio uploads to the Basic Pitch service")]
#[command(version)]
pub struct Args {
    /// Address to bind
    #[arg(long, env = "PITCH_RELAY_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PITCH_RELAY_PORT")]
    pub port: Option<u16>,

    /// Base URL of the Basic Pitch service
    #[arg(long, env = "BASIC_PITCH_SERVICE_URL")]
    pub service_url: Option<String>,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "PITCH_RELAY_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    /// Check pitch service responses against the expected result shape
    #[arg(long, env = "PITCH_RELAY_VALIDATE_RESPONSE")]
    pub validate_response: bool,

    /// TOML config file (default: ~/.config/pitch-relay/config.toml)
    #[arg(short, long, env = "PITCH_RELAY_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Settings read from the TOML config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub service_url: Option<String>,
    pub max_upload_bytes: Option<usize>,
    pub validate_response: Option<bool>,
}

/// Resolved relay configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub service_url: String,
    pub max_upload_bytes: usize,
    pub validate_response: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            service_url: DEFAULT_SERVICE_URL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            validate_response: false,
        }
    }
}

impl RelayConfig {
    /// Load the config file named by `args` (or the default one) and merge
    pub fn load(args: Args) -> pitch_common::Result<Self> {
        let file: FileConfig = load_toml_config(args.config.as_deref(), MODULE_NAME)?;
        Ok(Self::merge(args, file))
    }

    /// Merge command line/environment over file values over defaults
    pub fn merge(args: Args, file: FileConfig) -> Self {
        let defaults = Self::default();
        Self {
            host: args.host.or(file.host).unwrap_or(defaults.host),
            port: args.port.or(file.port).unwrap_or(defaults.port),
            service_url: args
                .service_url
                .or(file.service_url)
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.service_url),
            max_upload_bytes: args
                .max_upload_bytes
                .or(file.max_upload_bytes)
                .unwrap_or(defaults.max_upload_bytes),
            validate_response: args.validate_response
                || file.validate_response.unwrap_or(defaults.validate_response),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full URL of the pitch extraction endpoint
    pub fn service_endpoint(&self) -> String {
        join_url(&self.service_url, SERVICE_PATH)
    }
}
