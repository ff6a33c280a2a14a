use std::env;
use std::time::Duration as StdDuration;

use auth::ConfigurationError;
use auth::HashingCost;
use auth::SigningSecret;
use auth::TokenSettings;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for admin-service.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub throttle: ThrottleConfig,
    pub revocation: RevocationConfig,
    pub password: HashingCost,
    pub cookie: CookieConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
    /// Interval between sweeps of expired throttle records and revocations.
    pub sweep_interval_minutes: u64,
    /// Identify clients by proxy headers instead of the TCP peer. Enable
    /// only behind a reverse proxy that overwrites them.
    pub trust_proxy: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            http_port: 3001,
            sweep_interval_minutes: 60,
            trust_proxy: false,
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let defaults = TokenSettings::default();
        Self {
            secret: String::new(),
            expiration_hours: defaults.ttl.num_hours(),
            issuer: defaults.issuer,
            audience: defaults.audience,
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"**redacted**")
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThrottleConfig {
    pub max_attempts: u32,
    pub window_minutes: i64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_attempts: auth::LoginThrottle::DEFAULT_MAX_ATTEMPTS,
            window_minutes: auth::LoginThrottle::DEFAULT_WINDOW_MINUTES,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RevocationConfig {
    pub high_water_mark: usize,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            high_water_mark: auth::RevocationList::DEFAULT_HIGH_WATER_MARK,
        }
    }
}

/// Session cookie configuration.
///
/// `secure` should be on wherever the API is served over HTTPS.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CookieConfig {
    pub secure: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AdminConfig {
    /// Username used until setup chooses another.
    pub username: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Validate the signing secret. Called once at startup.
    ///
    /// # Errors
    /// * `ConfigurationError` - Secret is missing, a placeholder, or too short
    pub fn signing_secret(&self) -> Result<SigningSecret, ConfigurationError> {
        SigningSecret::new(&self.jwt.secret)
    }

    /// Token issuer, audience and lifetime.
    ///
    /// # Errors
    /// * `Invalid` - Token lifetime is not positive
    pub fn token_settings(&self) -> Result<TokenSettings, ConfigurationError> {
        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigurationError::Invalid(format!(
                "jwt.expiration_hours must be positive, got {}",
                self.jwt.expiration_hours
            )));
        }

        Ok(TokenSettings {
            issuer: self.jwt.issuer.clone(),
            audience: self.jwt.audience.clone(),
            ttl: Duration::hours(self.jwt.expiration_hours),
        })
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::minutes(self.throttle.window_minutes)
    }

    pub fn sweep_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.server.sweep_interval_minutes.max(1) * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy() {
        let config = Config::default();

        assert_eq!(config.jwt.expiration_hours, 24);
        assert_eq!(config.throttle.max_attempts, 5);
        assert_eq!(config.throttle_window(), Duration::minutes(15));
        assert_eq!(config.revocation.high_water_mark, 1000);
        assert_eq!(config.sweep_interval(), StdDuration::from_secs(3600));
        assert!(!config.cookie.secure);
        assert!(!config.server.trust_proxy);
    }

    #[test]
    fn test_missing_secret_fails_validation() {
        let config = Config::default();
        assert_eq!(
            config.signing_secret().unwrap_err(),
            ConfigurationError::MissingSecret
        );
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let mut config = Config::default();
        config.jwt.expiration_hours = 0;

        assert!(matches!(
            config.token_settings(),
            Err(ConfigurationError::Invalid(_))
        ));
    }

    #[test]
    fn test_secret_is_redacted_in_debug_output() {
        let mut config = Config::default();
        config.jwt.secret = "super-secret-value-that-must-not-leak".to_string();

        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("**redacted**"));
    }
}
