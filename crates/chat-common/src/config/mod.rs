//! Configuration structs

mod app_config;

pub use app_config::{
    AccountSettings, AppSettings, ClientConfig, ConfigError, Credentials, Environment,
    GatewaySettings, IdentifySettings, DEFAULT_API_HOST,
};
