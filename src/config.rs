// src/config.rs

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use secrecy::SecretString;

use crate::generator::erc7730::GeneratorProfile;

/// Etherscan's multichain endpoint; the chain is selected per request with `chainid`.
pub const DEFAULT_ETHERSCAN_API_URL: &str = "https://api.etherscan.io/v2/api";

/// Where the generator keeps its on-disk caches unless `CACHE_HOME` says otherwise.
pub const DEFAULT_CACHE_HOME: &str = "/tmp";

/// How error responses are mapped to HTTP status codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorStatusMode {
    /// Every failure is reported as 404, matching the published API contract.
    #[default]
    Compat,
    /// 404 for missing input, 400 for invalid input, 502 for upstream failures.
    Typed,
}

impl FromStr for ErrorStatusMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "compat" => Ok(Self::Compat),
            "typed" => Ok(Self::Typed),
            other => anyhow::bail!("unknown error status mode '{}', expected 'compat' or 'typed'", other),
        }
    }
}

impl fmt::Display for ErrorStatusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compat => f.write_str("compat"),
            Self::Typed => f.write_str("typed"),
        }
    }
}

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub host: String,
    pub port: u16,
    pub error_status_mode: ErrorStatusMode,

    // Descriptor generation
    pub generator_profile: GeneratorProfile,
    /// Credential forwarded to the generator for ABI lookups by address
    pub etherscan_api_key: Option<SecretString>,
    pub etherscan_api_url: String,
    /// Root of the generator's cache directory (the `XDG_CACHE_HOME` override)
    pub cache_home: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            error_status_mode: ErrorStatusMode::default(),
            generator_profile: GeneratorProfile::default(),
            etherscan_api_key: None,
            etherscan_api_url: DEFAULT_ETHERSCAN_API_URL.to_string(),
            cache_home: PathBuf::from(DEFAULT_CACHE_HOME),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(port) => port.parse().context("PORT must be a valid number")?,
            None => defaults.port,
        };

        let error_status_mode = match lookup("ERROR_STATUS_MODE") {
            Some(mode) => mode.parse().context("Invalid ERROR_STATUS_MODE")?,
            None => defaults.error_status_mode,
        };

        let generator_profile = match lookup("GENERATOR_PROFILE") {
            Some(profile) => profile.parse().context("Invalid GENERATOR_PROFILE")?,
            None => defaults.generator_profile,
        };

        Ok(Config {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            error_status_mode,
            generator_profile,
            etherscan_api_key: lookup("ETHERSCAN_API_KEY")
                .filter(|key| !key.is_empty())
                .map(SecretString::new),
            etherscan_api_url: lookup("ETHERSCAN_API_URL").unwrap_or(defaults.etherscan_api_url),
            cache_home: lookup("CACHE_HOME")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_home),
        })
    }
}
