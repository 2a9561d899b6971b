//! Client configuration
//!
//! The relay base URL and bearer token come from the environment
//! (`PITCH_BACKEND_URL`, `PITCH_BACKEND_TOKEN`) or are fixed at construction.
//! Environment values are read again on every extraction.

use pitch_common::api::RELAY_PATH;
use pitch_common::config::{env_var, join_url};

use crate::error::ClientError;

pub const URL_ENV: &str = "PITCH_BACKEND_URL";
pub const TOKEN_ENV: &str = "PITCH_BACKEND_TOKEN";

/// Where the relay lives and how to authenticate to it
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
}

// Keeps the token out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Read both values from the process environment
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = env_var(URL_ENV)
            .ok_or_else(|| ClientError::Config(format!("{} is not set", URL_ENV)))?;
        let token = env_var(TOKEN_ENV)
            .ok_or_else(|| ClientError::Config(format!("{} is not set", TOKEN_ENV)))?;
        Ok(Self { base_url, token })
    }

    /// Full URL of the relay function
    pub fn endpoint(&self) -> String {
        join_url(&self.base_url, RELAY_PATH)
    }
}

/// Source consulted at the start of each extraction
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Process environment, read per call
    Env,
    /// Values supplied by the caller
    Fixed(ClientConfig),
}

impl ConfigSource {
    pub fn resolve(&self) -> Result<ClientConfig, ClientError> {
        match self {
            ConfigSource::Env => ClientConfig::from_env(),
            ConfigSource::Fixed(config) => Ok(config.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_endpoint_appends_relay_path() {
        let config = ClientConfig::new("https://project.example.co/", "anon");
        assert_eq!(
            config.endpoint(),
            "https://project.example.co/functions/v1/extract-pitch"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let config = ClientConfig::new("http://localhost", "secret-token");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret-token"));
    }

    #[test]
    #[serial]
    fn test_env_source_reads_each_time() {
        std::env::set_var(URL_ENV, "http://first.example");
        std::env::set_var(TOKEN_ENV, "t1");
        let source = ConfigSource::Env;
        assert_eq!(source.resolve().unwrap().base_url, "http://first.example");

        std::env::set_var(URL_ENV, "http://second.example");
        assert_eq!(source.resolve().unwrap().base_url, "http://second.example");

        std::env::remove_var(URL_ENV);
        std::env::remove_var(TOKEN_ENV);
    }

    #[test]
    #[serial]
    fn test_env_source_missing_url() {
        std::env::remove_var(URL_ENV);
        std::env::set_var(TOKEN_ENV, "t1");

        let err = ConfigSource::Env.resolve().unwrap_err();
        assert!(err.to_string().contains(URL_ENV));

        std::env::remove_var(TOKEN_ENV);
    }
}
