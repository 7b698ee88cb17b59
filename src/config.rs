//! Configuration loaded from environment variables.

use std::{env, net::IpAddr};

use axum::http::HeaderValue;
use thiserror::Error;

/// Ten years
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL (`sqlite::memory:` keeps everything in one connection)
    pub database_url: String,

    pub host: IpAddr,
    pub port: u16,

    /// Browser origin allowed to call the API with credentials
    pub cors_origin: HeaderValue,

    /// Secret used to sign session tokens
    pub jwt_secret: String,

    /// Secret from the previous rotation, still accepted when verifying
    pub jwt_previous_secret: Option<String>,

    /// Session token and cookie lifetime in hours
    pub token_ttl_hours: i64,

    /// Send the session cookie with `Secure` and `SameSite=None`
    pub cookie_secure: bool,

    pub bcrypt_cost: u32,

    pub db_max_connections: u32,

    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        // Browsers refuse credentialed responses with a wildcard origin.
        let cors_origin = var("CORS_ORIGIN", "http://localhost:5173");
        if cors_origin.trim() == "*" {
            return Err(ConfigError::InvalidValue(
                "CORS_ORIGIN".to_string(),
                "wildcard origin can't be used with credentials".to_string(),
            ));
        }
        let cors_origin = HeaderValue::from_str(&cors_origin)
            .map_err(|_| ConfigError::InvalidValue("CORS_ORIGIN".to_string(), cors_origin))?;

        let token_ttl_hours: i64 = parse("TOKEN_TTL_HOURS", var("TOKEN_TTL_HOURS", "24"))?;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&token_ttl_hours) {
            return Err(ConfigError::InvalidValue(
                "TOKEN_TTL_HOURS".to_string(),
                token_ttl_hours.to_string(),
            ));
        }

        let bcrypt_cost: u32 = parse(
            "BCRYPT_COST",
            var("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string()),
        )?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue(
                "BCRYPT_COST".to_string(),
                bcrypt_cost.to_string(),
            ));
        }

        Ok(Config {
            database_url: var("DATABASE_URL", "sqlite://todo.db"),
            host: parse("HOST", var("HOST", "127.0.0.1"))?,
            port: parse("PORT", var("PORT", "5000"))?,
            cors_origin,
            jwt_secret,
            jwt_previous_secret: lookup("JWT_PREVIOUS_SECRET").filter(|s| !s.is_empty()),
            token_ttl_hours,
            cookie_secure: parse("COOKIE_SECURE", var("COOKIE_SECURE", "false"))?,
            bcrypt_cost,
            db_max_connections: parse("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS", "10"))?,
            log_level: var("RUST_LOG", "info"),
        })
    }

    /// Whether the database lives only in memory
    pub fn is_memory_database(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.database_url, "sqlite://todo.db");
        assert_eq!(config.port, 5000);
        assert_eq!(config.token_ttl_hours, 24);
        assert!(!config.cookie_secure);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.jwt_previous_secret.is_none());
        assert!(!config.is_memory_database());
    }

    #[test]
    fn test_missing_secret() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "JWT_SECRET"));

        let err = load(&[("JWT_SECRET", "")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("JWT_SECRET", "s"), ("PORT", "http")]).is_err());
        assert!(load(&[("JWT_SECRET", "s"), ("TOKEN_TTL_HOURS", "0")]).is_err());
        assert!(load(&[("JWT_SECRET", "s"), ("BCRYPT_COST", "2")]).is_err());
        assert!(load(&[("JWT_SECRET", "s"), ("COOKIE_SECURE", "maybe")]).is_err());
        assert!(load(&[("JWT_SECRET", "s"), ("CORS_ORIGIN", "bad\norigin")]).is_err());
    }

    #[test]
    fn test_token_ttl_upper_bound() {
        let err = load(&[("JWT_SECRET", "s"), ("TOKEN_TTL_HOURS", "10000000000")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k, _) if k == "TOKEN_TTL_HOURS"));

        let config = load(&[("JWT_SECRET", "s"), ("TOKEN_TTL_HOURS", "87600")]).unwrap();
        assert_eq!(config.token_ttl_hours, MAX_TOKEN_TTL_HOURS);
    }

    #[test]
    fn test_wildcard_cors_origin_rejected() {
        for origin in ["*", " * "] {
            let err = load(&[("JWT_SECRET", "s"), ("CORS_ORIGIN", origin)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref k, _) if k == "CORS_ORIGIN"));
        }

        let config = load(&[("JWT_SECRET", "s"), ("CORS_ORIGIN", "https://todo.example")]).unwrap();
        assert_eq!(config.cors_origin, "https://todo.example");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("JWT_SECRET", "s"),
            ("JWT_PREVIOUS_SECRET", "old"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "8080"),
            ("COOKIE_SECURE", "true"),
            ("TOKEN_TTL_HOURS", "1"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.cookie_secure);
        assert_eq!(config.token_ttl_hours, 1);
        assert_eq!(config.jwt_previous_secret.as_deref(), Some("old"));
        assert!(config.is_memory_database());
    }
}
