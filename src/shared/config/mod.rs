//! Application configuration module
//!
//! `AppConfig` carries every tunable the server needs: database location,
//! signing secrets, token lifetimes, mail settings, cache timeout and
//! pagination limits. It is built either from the environment
//! (`AppConfig::from_env`) or programmatically through `AppConfigBuilder`,
//! which is what tests use.

use std::time::Duration;
use thiserror::Error;

const DEV_JWT_SECRET: &str = "scribe-dev-secret-change-in-production";

/// Upper bound for every lifetime and timeout setting (ten years)
pub const MAX_LIFETIME: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// SMTP relay settings
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// sqlx connection string
    pub database_url: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// HMAC secret for access/refresh JWTs
    pub jwt_secret: String,
    /// HMAC secret for activation and password reset tokens
    pub secret_key: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    /// Validity window of activation and password reset tokens
    pub account_token_ttl: Duration,
    /// Base URL used when building links sent by email
    pub public_url: String,
    /// Sender address of outgoing mail
    pub email_from: String,
    /// SMTP relay; `None` logs mail to the console instead
    pub smtp: Option<SmtpConfig>,
    /// Lifetime of cached profile entries
    pub cache_timeout: Duration,
    pub page_size: u32,
    pub max_page_size: u32,
    /// Deepest reply level materialized under a comment
    pub max_reply_depth: usize,
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://scribe.db?mode=rwc".to_string(),
            port: 3000,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            secret_key: DEV_JWT_SECRET.to_string(),
            access_token_ttl: Duration::from_secs(5 * 60),
            refresh_token_ttl: Duration::from_secs(24 * 60 * 60),
            account_token_ttl: Duration::from_secs(3 * 24 * 60 * 60),
            public_url: "http://127.0.0.1:3000".to_string(),
            email_from: "noreply@scribe.local".to_string(),
            smtp: None,
            cache_timeout: Duration::from_secs(300),
            page_size: 10,
            max_page_size: 100,
            max_reply_depth: 32,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to the defaults; set but malformed
    /// numeric values are rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };
        let secret_key = lookup("SECRET_KEY").unwrap_or_else(|| jwt_secret.clone());

        let smtp = match lookup("SMTP_HOST") {
            Some(host) => Some(SmtpConfig {
                host,
                port: parse_or("SMTP_PORT", lookup("SMTP_PORT"), 587)?,
                username: lookup("SMTP_USERNAME"),
                password: lookup("SMTP_PASSWORD"),
            }),
            None => None,
        };

        let config = Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            port: parse_or("SERVER_PORT", lookup("SERVER_PORT"), defaults.port)?,
            jwt_secret,
            secret_key,
            access_token_ttl: secs_or(
                "ACCESS_TOKEN_LIFETIME_SECS",
                lookup("ACCESS_TOKEN_LIFETIME_SECS"),
                defaults.access_token_ttl,
            )?,
            refresh_token_ttl: secs_or(
                "REFRESH_TOKEN_LIFETIME_SECS",
                lookup("REFRESH_TOKEN_LIFETIME_SECS"),
                defaults.refresh_token_ttl,
            )?,
            account_token_ttl: secs_or(
                "PASSWORD_RESET_TIMEOUT_SECS",
                lookup("PASSWORD_RESET_TIMEOUT_SECS"),
                defaults.account_token_ttl,
            )?,
            public_url: lookup("PUBLIC_URL").unwrap_or(defaults.public_url),
            email_from: lookup("DEFAULT_FROM_EMAIL").unwrap_or(defaults.email_from),
            smtp,
            cache_timeout: secs_or(
                "USER_CACHE_TIMEOUT_SECS",
                lookup("USER_CACHE_TIMEOUT_SECS"),
                defaults.cache_timeout,
            )?,
            page_size: parse_or("PAGE_SIZE", lookup("PAGE_SIZE"), defaults.page_size)?,
            max_page_size: parse_or("MAX_PAGE_SIZE", lookup("MAX_PAGE_SIZE"), defaults.max_page_size)?,
            max_reply_depth: parse_or(
                "MAX_REPLY_DEPTH",
                lookup("MAX_REPLY_DEPTH"),
                defaults.max_reply_depth,
            )?,
            bcrypt_cost: parse_or("BCRYPT_COST", lookup("BCRYPT_COST"), defaults.bcrypt_cost)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if self.secret_key.is_empty() {
            return Err(ConfigError::MissingValue("SECRET_KEY"));
        }
        match url::Url::parse(&self.public_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => {}
            _ => return Err(ConfigError::InvalidUrl(self.public_url.clone())),
        }
        for (key, ttl) in [
            ("ACCESS_TOKEN_LIFETIME_SECS", self.access_token_ttl),
            ("REFRESH_TOKEN_LIFETIME_SECS", self.refresh_token_ttl),
            ("PASSWORD_RESET_TIMEOUT_SECS", self.account_token_ttl),
            ("USER_CACHE_TIMEOUT_SECS", self.cache_timeout),
        ] {
            if ttl > MAX_LIFETIME {
                return Err(ConfigError::InvalidValue {
                    key,
                    value: ttl.as_secs().to_string(),
                });
            }
        }
        if self.page_size == 0 || self.page_size > self.max_page_size {
            return Err(ConfigError::InvalidValue {
                key: "PAGE_SIZE",
                value: self.page_size.to_string(),
            });
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                value: self.bcrypt_cost.to_string(),
            });
        }
        Ok(())
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn secs_or(key: &'static str, raw: Option<String>, default: Duration) -> Result<Duration, ConfigError> {
    parse_or(key, raw, default.as_secs()).map(Duration::from_secs)
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    pub fn secret_key(mut self, secret: impl Into<String>) -> Self {
        self.config.secret_key = secret.into();
        self
    }

    pub fn access_token_ttl(mut self, ttl: Duration) -> Self {
        self.config.access_token_ttl = ttl;
        self
    }

    pub fn refresh_token_ttl(mut self, ttl: Duration) -> Self {
        self.config.refresh_token_ttl = ttl;
        self
    }

    pub fn account_token_ttl(mut self, ttl: Duration) -> Self {
        self.config.account_token_ttl = ttl;
        self
    }

    pub fn public_url(mut self, url: impl Into<String>) -> Self {
        self.config.public_url = url.into();
        self
    }

    pub fn email_from(mut self, from: impl Into<String>) -> Self {
        self.config.email_from = from.into();
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn max_reply_depth(mut self, depth: usize) -> Self {
        self.config.max_reply_depth = depth;
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.config.bcrypt_cost = cost;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
