//! Configuration loading and credential resolution
//!
//! Bootstrap configuration is read from a TOML file located by priority:
//! 1. Command-line argument (highest priority)
//! 2. `CCRAWL_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/ccrawl/config.toml`)
//!
//! A missing file is not fatal: a warning is logged and built-in defaults
//! are used. A file that exists but cannot be parsed is an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "CCRAWL_CONFIG";

/// Environment variable holding the Spotify client id
pub const CLIENT_ID_ENV_VAR: &str = "SPOTIFY_CLIENT_ID";

/// Environment variable holding the Spotify client secret
pub const CLIENT_SECRET_ENV_VAR: &str = "SPOTIFY_CLIENT_SECRET";

/// Largest page the Spotify albums endpoint will return
pub const MAX_PAGE_SIZE: u32 = 50;

/// Bootstrap configuration loaded from TOML
///
/// Every section is optional; omitted keys take built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub spotify: SpotifyConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Spotify Web API settings
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyConfig {
    /// Client id (overridden by `SPOTIFY_CLIENT_ID`)
    #[serde(default)]
    pub client_id: Option<String>,

    /// Client secret (overridden by `SPOTIFY_CLIENT_SECRET`)
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Albums requested per page, 1..=50
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Total request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,
}

/// Query and response cache settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum entries per cache
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Entry lifetime in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5730
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_api_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_accounts_url() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_cache_capacity() -> usize {
    200
}

fn default_cache_ttl_secs() -> u64 {
    86_400
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            page_size: default_page_size(),
            requests_per_second: default_requests_per_second(),
            timeout_secs: default_timeout_secs(),
            api_base_url: default_api_base_url(),
            accounts_url: default_accounts_url(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl TomlConfig {
    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.spotify.page_size == 0 || self.spotify.page_size > MAX_PAGE_SIZE {
            return Err(Error::Config(format!(
                "spotify.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.spotify.page_size
            )));
        }
        if self.spotify.requests_per_second == 0 {
            return Err(Error::Config(
                "spotify.requests_per_second must be at least 1".to_string(),
            ));
        }
        if self.cache.capacity == 0 {
            return Err(Error::Config("cache.capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Resolve the config file path
///
/// **Priority:** CLI → ENV → platform default. Returns `None` only when no
/// platform config directory exists.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform default
    default_config_path()
}

/// Platform default config path (`~/.config/ccrawl/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ccrawl").join("config.toml"))
}

/// Read, parse and validate a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to defaults when the file is absent
pub fn load_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    match path {
        Some(path) if path.exists() => {
            let config = load_toml_config(path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        Some(path) => {
            warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => {
            warn!("No config directory available, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Spotify client credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Resolve Spotify credentials from environment and TOML
///
/// **Priority:** ENV → TOML, per field. Warns when both sources provide a
/// value, since the TOML value is then silently ignored.
pub fn resolve_credentials(config: &SpotifyConfig) -> Result<Credentials> {
    let client_id = resolve_field(CLIENT_ID_ENV_VAR, config.client_id.as_deref(), "client_id");
    let client_secret = resolve_field(
        CLIENT_SECRET_ENV_VAR,
        config.client_secret.as_deref(),
        "client_secret",
    );

    match (client_id, client_secret) {
        (Some(client_id), Some(client_secret)) => Ok(Credentials {
            client_id,
            client_secret,
        }),
        _ => Err(Error::Config(format!(
            "Spotify credentials not configured. Please configure using one of:\n\
             1. Environment: {}=... and {}=...\n\
             2. TOML config: [spotify] client_id = \"...\", client_secret = \"...\"",
            CLIENT_ID_ENV_VAR, CLIENT_SECRET_ENV_VAR
        ))),
    }
}

fn resolve_field(env_var: &str, toml_value: Option<&str>, field: &str) -> Option<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "Spotify {} found in both {} and TOML. Using environment (highest priority).",
            field, env_var
        );
    }

    if let Some(value) = env_value {
        info!("Spotify {} loaded from environment variable", field);
        return Some(value);
    }

    toml_value.map(|value| {
        info!("Spotify {} loaded from TOML config", field);
        value.to_string()
    })
}

/// Validate credential value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
