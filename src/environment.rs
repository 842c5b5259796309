//! Per-request environment setup for descriptor generation.
//!
//! The generator never reads process-global variables itself. Instead every
//! request resolves a [`GenerationEnv`] here and passes it down explicitly.

use std::env;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::{debug, warn};

use crate::config::Config;

pub const ETHERSCAN_API_KEY: &str = "ETHERSCAN_API_KEY";

/// Settings the generator needs for one call.
#[derive(Clone, Debug)]
pub struct GenerationEnv {
    pub etherscan_api_key: Option<SecretString>,
    /// Replacement for `XDG_CACHE_HOME`; all generator caches live below it.
    pub cache_home: PathBuf,
}

impl GenerationEnv {
    pub fn new(etherscan_api_key: Option<SecretString>, cache_home: impl Into<PathBuf>) -> Self {
        Self {
            etherscan_api_key,
            cache_home: cache_home.into(),
        }
    }

    /// Directory holding ABIs fetched from Etherscan.
    pub fn etherscan_cache_dir(&self) -> PathBuf {
        self.cache_home.join("erc7730").join("etherscan")
    }

    pub fn cache_home(&self) -> &Path {
        &self.cache_home
    }
}

/// Reloads `.env` and resolves the generation settings. Never fails: a missing
/// key simply leaves `etherscan_api_key` empty.
pub fn load_env(config: &Config) -> GenerationEnv {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env file: {}", e),
    }

    resolve(config, |key| env::var(key).ok())
}

/// The ambient value wins over the one captured at startup so a rotated key is
/// picked up without a restart.
pub fn resolve<F>(config: &Config, lookup: F) -> GenerationEnv
where
    F: Fn(&str) -> Option<String>,
{
    let etherscan_api_key = lookup(ETHERSCAN_API_KEY)
        .filter(|key| !key.is_empty())
        .map(SecretString::new)
        .or_else(|| config.etherscan_api_key.clone());

    if etherscan_api_key.is_none() {
        debug!("{} is not set, address lookups will be unauthenticated", ETHERSCAN_API_KEY);
    }

    GenerationEnv::new(etherscan_api_key, config.cache_home.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_ambient_key_takes_precedence() {
        let config = Config {
            etherscan_api_key: Some(SecretString::new("from-config".to_string())),
            ..Config::default()
        };

        let env = resolve(&config, |key| {
            (key == ETHERSCAN_API_KEY).then(|| "from-env".to_string())
        });

        assert_eq!(env.etherscan_api_key.unwrap().expose_secret(), "from-env");
    }

    #[test]
    fn test_falls_back_to_config_key() {
        let config = Config {
            etherscan_api_key: Some(SecretString::new("from-config".to_string())),
            ..Config::default()
        };

        let env = resolve(&config, |_| None);

        assert_eq!(env.etherscan_api_key.unwrap().expose_secret(), "from-config");
    }

    #[test]
    fn test_missing_key_does_not_fail() {
        let env = resolve(&Config::default(), |_| None);

        assert!(env.etherscan_api_key.is_none());
        assert_eq!(env.cache_home(), Path::new("/tmp"));
    }

    #[test]
    fn test_cache_dir_is_under_cache_home() {
        let env = GenerationEnv::new(None, "/var/cache");
        assert_eq!(
            env.etherscan_cache_dir(),
            PathBuf::from("/var/cache/erc7730/etherscan")
        );
    }
}
