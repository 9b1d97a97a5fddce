//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, LogFormat, LoggingConfig, ServerConfig, SessionSettings, StorageSettings,
    MIN_SESSION_SECRET_LEN,
};
