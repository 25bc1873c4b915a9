//! Client configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use std::env;
use std::fmt;

/// Default REST API host
pub const DEFAULT_API_HOST: &str = "discordapp.com";

/// Main client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub app: AppSettings,
    pub account: AccountSettings,
    pub credentials: Credentials,
    pub gateway: GatewaySettings,
    pub identify: IdentifySettings,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Account-level settings
///
/// The API host may only be changed while the account is offline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSettings {
    api_host: String,
}

impl AccountSettings {
    #[must_use]
    pub fn new(api_host: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
        }
    }

    /// Current API host
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// Change the API host; refused while the account is online
    pub fn set_api_host(&mut self, api_host: impl Into<String>, online: bool) -> Result<(), ConfigError> {
        if online {
            return Err(ConfigError::OfflineOnly("api_host"));
        }
        let api_host = api_host.into();
        if api_host.trim().is_empty() {
            return Err(ConfigError::InvalidValue("api_host", api_host));
        }
        self.api_host = api_host;
        Ok(())
    }

    /// Base URL of the REST API
    ///
    /// A host given with an explicit scheme is used as is, otherwise https is assumed.
    #[must_use]
    pub fn api_base_url(&self) -> String {
        let host = self.api_host.trim_end_matches('/');
        if host.contains("://") {
            format!("{host}/api")
        } else {
            format!("https://{host}/api")
        }
    }
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self::new(DEFAULT_API_HOST)
    }
}

/// Login credentials
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Gateway session tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    /// Heartbeat interval used until (or unless) the server announces one
    pub default_heartbeat_secs: u64,
    /// Period of the service tick that checks heartbeat deadlines
    pub service_tick_ms: u64,
    /// Largest inbound frame accepted by the frame buffer
    pub max_frame_bytes: usize,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            default_heartbeat_secs: default_heartbeat_secs(),
            service_tick_ms: default_service_tick_ms(),
            max_frame_bytes: default_max_frame_bytes(),
        }
    }
}

/// Client properties sent with Identify
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifySettings {
    pub browser: String,
    pub device: String,
    pub os: String,
}

impl Default for IdentifySettings {
    fn default() -> Self {
        Self {
            browser: default_browser(),
            device: default_device(),
            os: std::env::consts::OS.to_string(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "chat-gateway".to_string()
}

fn default_heartbeat_secs() -> u64 {
    30
}

fn default_service_tick_ms() -> u64 {
    1000
}

fn default_max_frame_bytes() -> usize {
    4 * 1024 * 1024
}

fn default_browser() -> String {
    "chat-gateway".to_string()
}

fn default_device() -> String {
    "chat-gateway".to_string()
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: impl FnOnce() -> T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_heartbeat_secs = parse_var(&lookup, "CHAT_HEARTBEAT_DEFAULT_SECS", default_heartbeat_secs)?;
        if default_heartbeat_secs == 0 {
            return Err(ConfigError::InvalidValue("CHAT_HEARTBEAT_DEFAULT_SECS", "0".to_string()));
        }

        let service_tick_ms = parse_var(&lookup, "CHAT_SERVICE_TICK_MS", default_service_tick_ms)?;
        if service_tick_ms == 0 {
            return Err(ConfigError::InvalidValue("CHAT_SERVICE_TICK_MS", "0".to_string()));
        }

        let identify_defaults = IdentifySettings::default();

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            account: AccountSettings::new(
                lookup("CHAT_API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
            ),
            credentials: Credentials {
                email: lookup("CHAT_EMAIL").ok_or(ConfigError::MissingVar("CHAT_EMAIL"))?,
                password: lookup("CHAT_PASSWORD").ok_or(ConfigError::MissingVar("CHAT_PASSWORD"))?,
            },
            gateway: GatewaySettings {
                default_heartbeat_secs,
                service_tick_ms,
                max_frame_bytes: parse_var(&lookup, "CHAT_MAX_FRAME_BYTES", default_max_frame_bytes)?,
            },
            identify: IdentifySettings {
                browser: lookup("CHAT_CLIENT_BROWSER").unwrap_or(identify_defaults.browser),
                device: lookup("CHAT_CLIENT_DEVICE").unwrap_or(identify_defaults.device),
                os: lookup("CHAT_CLIENT_OS").unwrap_or(identify_defaults.os),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Setting {0} can only be changed while offline")]
    OfflineOnly(&'static str),
}
