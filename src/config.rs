// Configuration: settings read once from the process environment, with
// optional `.env` files filling in whatever is not already set.

use crate::error::ConfigError;
use crate::serde_utils::deserialize_lenient_bool;
use log::{debug, warn};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_LDAP_URL: &str = "ldap://ldap.example.com";
pub const DEFAULT_LDAP_BASE: &str = "ou=People,ou=example,dc=example,dc=com";

/// Name of the optional per-user env file in the home directory.
const USER_ENV_FILE: &str = ".rbcli.env";

const UPLOAD_PATH: &str = "/api/upload";

#[derive(Debug, Deserialize, Default)]
struct ConfigEnv {
    rubberband_url: Option<Url>,
    rubberband_api_key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    rbcli_use_ldap: bool,
    rbcli_ldap_url: Option<String>,
    rbcli_ldap_base: Option<String>,
}

/// Settings for one invocation, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Option<Url>,
    pub api_key: String,
    pub use_ldap: bool,
    pub ldap_url: String,
    pub ldap_base: String,
}

impl Config {
    /// Load `.env` from the working directory and `~/.rbcli.env`, then read
    /// the process environment. Variables already set are never overridden.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        if let Some(home) = dirs::home_dir() {
            let path = home.join(USER_ENV_FILE);
            if dotenvy::from_path(&path).is_ok() {
                debug!("Loaded environment from {}", path.display());
            }
        }
        Self::from_vars(std::env::vars())
    }

    /// Build the configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let env: ConfigEnv = envy::from_iter(vars)?;

        let api_key = env.rubberband_api_key.unwrap_or_else(|| {
            warn!("RUBBERBAND_API_KEY is not set; sending an empty API token");
            String::new()
        });

        Ok(Config {
            base_url: env.rubberband_url,
            api_key,
            use_ldap: env.rbcli_use_ldap,
            ldap_url: env
                .rbcli_ldap_url
                .unwrap_or_else(|| DEFAULT_LDAP_URL.to_string()),
            ldap_base: env
                .rbcli_ldap_base
                .unwrap_or_else(|| DEFAULT_LDAP_BASE.to_string()),
        })
    }

    /// The synchronous upload endpoint, `<base>/api/upload`.
    pub fn upload_endpoint(&self) -> Result<Url, ConfigError> {
        let base = self.base_url.as_ref().ok_or(ConfigError::MissingBaseUrl)?;
        let endpoint = format!("{}{}", base.as_str().trim_end_matches('/'), UPLOAD_PATH);
        Url::parse(&endpoint)
            .map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })
    }
}
