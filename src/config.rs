//! Client configuration.
//!
//! Resolution order used by [`ClientConfig::load`]:
//!
//! 1. Built-in defaults
//! 2. `<config_dir>/saplo/config.json` (or `SAPLO_CONFIG`), if present
//! 3. `SAPLO_ENDPOINT`, `SAPLO_TIMEOUT_SECS`, `SAPLO_USER_AGENT`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{Result, SaploError};

/// Default JSON-RPC endpoint of the Saplo API.
pub const DEFAULT_ENDPOINT: &str = "http://api.saplo.com/rpc/json";

/// Settings for the HTTP transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// JSON-RPC endpoint, without the `access_token` parameter.
    pub endpoint: Url,
    /// Per-request timeout. `None` blocks until the server answers.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: None,
            user_agent: format!("saplo-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("DEFAULT_ENDPOINT is a valid URL")
}

/// On-disk representation; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    endpoint: Option<Url>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    api_key: Option<String>,
    secret_key: Option<String>,
}

impl ClientConfig {
    /// Defaults overridden by environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Defaults overridden by a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = read_config_file(path)?;
        let mut config = Self::default();
        config.apply_file(&file);
        Ok(config)
    }

    /// Defaults, then the config file (when it exists), then the environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = config_path().filter(|p| p.exists()) {
            tracing::info!("Using config file: {}", path.display());
            config.apply_file(&read_config_file(&path)?);
        }
        config.apply_env()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: &ConfigFile) {
        if let Some(endpoint) = &file.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(ua) = &file.user_agent {
            self.user_agent = ua.clone();
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(endpoint) = std::env::var("SAPLO_ENDPOINT") {
            self.endpoint = Url::parse(&endpoint)
                .map_err(|e| SaploError::Config(format!("Invalid SAPLO_ENDPOINT '{}': {}", endpoint, e)))?;
        }
        if let Ok(secs) = std::env::var("SAPLO_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| SaploError::Config(format!("Invalid SAPLO_TIMEOUT_SECS '{}'", secs)))?;
            self.timeout = Some(Duration::from_secs(secs));
        }
        if let Ok(ua) = std::env::var("SAPLO_USER_AGENT") {
            self.user_agent = ua;
        }
        Ok(())
    }
}

/// API key and secret key pair.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Read `SAPLO_API_KEY` and `SAPLO_SECRET_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = require_env("SAPLO_API_KEY")?;
        let secret_key = require_env("SAPLO_SECRET_KEY")?;
        Ok(Self::new(api_key, secret_key))
    }

    /// Environment first, falling back to keys stored in the config file.
    pub fn load() -> Result<Self> {
        if let Ok(creds) = Self::from_env() {
            return Ok(creds);
        }

        let path = config_path().filter(|p| p.exists()).ok_or_else(|| {
            SaploError::Config(
                "No credentials: set SAPLO_API_KEY and SAPLO_SECRET_KEY".to_string(),
            )
        })?;
        let file = read_config_file(&path)?;
        match (file.api_key, file.secret_key) {
            (Some(api_key), Some(secret_key)) => Ok(Self::new(api_key, secret_key)),
            _ => Err(SaploError::Config(format!(
                "{} is missing api_key or secret_key",
                path.display()
            ))),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SaploError::Config(format!("{} is not set", name)))
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SaploError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map_err(|e| SaploError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

fn config_path() -> Option<PathBuf> {
    match std::env::var("SAPLO_CONFIG") {
        Ok(path) => Some(PathBuf::from(path)),
        Err(_) => default_config_path(),
    }
}

/// Default location of the config file.
///
/// - Linux: `$XDG_CONFIG_HOME/saplo/config.json`
/// - macOS: `~/Library/Application Support/saplo/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("saplo").join("config.json"))
}
