use config::ConfigError;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use tracing::warn;

/// Shortest accepted session signing secret, in bytes
pub const MIN_SESSION_SECRET_LEN: usize = 32;

const GENERATED_SECRET_LEN: usize = 64;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Persistence backend selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `postgres`
    pub backend: String,
    /// Falls back to `DATABASE_URL` when unset
    pub database_url: Option<String>,
    pub max_connections: u32,
}

/// Session cookie settings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub cookie_name: String,
    /// HMAC key for cookie signatures; generated at startup when empty
    pub secret: String,
    pub lifetime_hours: u32,
    pub secure: bool,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("cookie_name", &self.cookie_name)
            .field("secret", &"[REDACTED]")
            .field("lifetime_hours", &self.lifetime_hours)
            .field("secure", &self.secure)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: 10,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "teamboard.sid".to_string(),
            secret: String::new(),
            lifetime_hours: 24,
            secure: false,
        }
    }
}

impl SessionSettings {
    /// Lifetime of a session and of its cookie, in seconds
    pub fn max_age_secs(&self) -> i64 {
        i64::from(self.lifetime_hours) * 3600
    }

    /// The configured secret, or a random one when none is set
    pub fn resolve_secret(&self) -> Result<String, ConfigError> {
        if self.secret.is_empty() {
            warn!("No session secret configured, generating one; sessions will not survive a restart");
            return Ok(rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(GENERATED_SECRET_LEN)
                .map(char::from)
                .collect());
        }

        if self.secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::Message(format!(
                "session.secret must be at least {} bytes",
                MIN_SESSION_SECRET_LEN
            )));
        }

        Ok(self.secret.clone())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.session.cookie_name, "teamboard.sid");
        assert_eq!(config.session.max_age_secs(), 24 * 3600);
    }

    #[test]
    fn test_partial_sources_keep_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("server.port", 9090)
            .unwrap()
            .set_override("session.secure", true)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.session.secure);
        assert_eq!(config.session.lifetime_hours, 24);
    }

    #[test]
    fn test_resolve_secret() {
        let mut session = SessionSettings::default();

        let generated = session.resolve_secret().unwrap();
        assert_eq!(generated.len(), GENERATED_SECRET_LEN);

        session.secret = "too-short".to_string();
        assert!(session.resolve_secret().is_err());

        session.secret = "a".repeat(MIN_SESSION_SECRET_LEN);
        assert_eq!(session.resolve_secret().unwrap(), session.secret);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let session = SessionSettings {
            secret: "super-secret-value-that-is-long-enough".to_string(),
            ..Default::default()
        };
        assert!(!format!("{:?}", session).contains("super-secret"));
    }
}
