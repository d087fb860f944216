use std::path::PathBuf;

use crate::error::{config::ConfigError, Error};

const ENV_API_URL: &str = "PORTCULLIS_API_URL";
const ENV_STORAGE_DIR: &str = "PORTCULLIS_STORAGE_DIR";
const ENV_DEFAULT_LOCALE: &str = "PORTCULLIS_DEFAULT_LOCALE";

/// Runtime configuration for the session core.
///
/// Hosts either read it from the environment with [`Config::from_env`] or
/// build it programmatically with [`Config::new`] and the setters.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the REST API, without a trailing slash.
    pub api_base_url: String,
    /// Path of the public login view.
    pub login_route: String,
    /// Path of the default/home view, the target of silent downgrades.
    pub home_route: String,
    /// Locale tag used when an identity carries no usable preference.
    pub default_locale: String,
    /// Directory the file vault persists the session pair into.
    pub storage_dir: PathBuf,
}

impl Config {
    pub fn new(api_base_url: &str, storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            login_route: "/login".to_string(),
            home_route: "/".to_string(),
            default_locale: "zh-CN".to_string(),
            storage_dir: storage_dir.into(),
        }
    }

    pub fn with_default_locale(mut self, tag: &str) -> Self {
        self.default_locale = tag.to_string();
        self
    }

    pub fn with_routes(mut self, login_route: &str, home_route: &str) -> Self {
        self.login_route = login_route.to_string();
        self.home_route = home_route.to_string();
        self
    }

    /// Reads configuration from the environment, loading a `.env` file
    /// first when one is present.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present
    /// - `Err(Error::ConfigError)` - `PORTCULLIS_API_URL` or
    ///   `PORTCULLIS_STORAGE_DIR` missing
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();

        let api_base_url = require_env(ENV_API_URL)?;
        let storage_dir = require_env(ENV_STORAGE_DIR)?;

        let mut config = Config::new(&api_base_url, storage_dir);
        if let Ok(tag) = std::env::var(ENV_DEFAULT_LOCALE) {
            if tag.is_empty() {
                return Err(ConfigError::InvalidEnvValue {
                    var: ENV_DEFAULT_LOCALE.to_string(),
                    reason: "locale tag must not be empty".to_string(),
                }
                .into());
            }
            config.default_locale = tag;
        }

        Ok(config)
    }
}

fn require_env(var: &str) -> Result<String, Error> {
    std::env::var(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()).into())
}
