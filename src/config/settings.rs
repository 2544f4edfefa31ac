//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::constants::{
    DEFAULT_ACCESS_TTL, DEFAULT_DB_HOST, DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_DB_NAME,
    DEFAULT_DB_PORT, DEFAULT_DB_SSLMODE, DEFAULT_DB_USER, DEFAULT_REFRESH_TTL,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Transport the server listens with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

/// PEM files used when serving over HTTPS
#[derive(Debug, Clone)]
pub struct TlsFiles {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    jwt_secret: String,
    pub jwt_access_ttl: String,
    pub jwt_refresh_ttl: String,
    pub request_timeout: Duration,
    pub server_host: String,
    pub server_port: u16,
    pub protocol: Protocol,
    pub tls: Option<TlsFiles>,
    pub user_routes_require_auth: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("db_max_connections", &self.db_max_connections)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_access_ttl", &self.jwt_access_ttl)
            .field("jwt_refresh_ttl", &self.jwt_refresh_ttl)
            .field("request_timeout", &self.request_timeout)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("protocol", &self.protocol)
            .field("tls", &self.tls)
            .field("user_routes_require_auth", &self.user_routes_require_auth)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    /// Fails if JWT_SECRET is missing in release builds or too short, if a
    /// duration is not a valid humantime expression, or if HTTPS is requested
    /// without certificate and key paths.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            Err(_) => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: format!("must be at least {} characters long", MIN_JWT_SECRET_LENGTH),
            });
        }

        let jwt_access_ttl = var_or("JWT_ACCESS_TTL", DEFAULT_ACCESS_TTL);
        parse_duration("JWT_ACCESS_TTL", &jwt_access_ttl)?;
        let jwt_refresh_ttl = var_or("JWT_REFRESH_TTL", DEFAULT_REFRESH_TTL);
        parse_duration("JWT_REFRESH_TTL", &jwt_refresh_ttl)?;

        let request_timeout = parse_duration(
            "REQUEST_TIMEOUT",
            &var_or("REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT),
        )?;

        let protocol = match var_or("SERVER_PROTOCOL", "http").to_ascii_lowercase().as_str() {
            "http" => Protocol::Http,
            "https" => Protocol::Https,
            other => {
                return Err(ConfigError::Invalid {
                    key: "SERVER_PROTOCOL",
                    reason: format!("expected http or https, got {}", other),
                })
            }
        };

        let tls = match (env::var("TLS_CERT_PATH"), env::var("TLS_KEY_PATH")) {
            (Ok(cert), Ok(key)) => Some(TlsFiles {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            _ => None,
        };
        if protocol == Protocol::Https && tls.is_none() {
            return Err(ConfigError::Missing("TLS_CERT_PATH and TLS_KEY_PATH"));
        }

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => database_url_from_parts(
                &var_or("DB_HOST", DEFAULT_DB_HOST),
                parse_or("DB_PORT", DEFAULT_DB_PORT)?,
                &var_or("DB_NAME", DEFAULT_DB_NAME),
                &var_or("DB_USER", DEFAULT_DB_USER),
                &var_or("DB_PASSWORD", ""),
                &var_or("DB_SSLMODE", DEFAULT_DB_SSLMODE),
            ),
        };

        Ok(Self {
            database_url,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            jwt_secret,
            jwt_access_ttl,
            jwt_refresh_ttl,
            request_timeout,
            server_host: var_or("SERVER_HOST", DEFAULT_SERVER_HOST),
            server_port: parse_or("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            protocol,
            tls,
            user_routes_require_auth: parse_or("USER_ROUTES_REQUIRE_AUTH", true)?,
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Build a PostgreSQL DSN from its individual parts.
pub fn database_url_from_parts(
    host: &str,
    port: u16,
    name: &str,
    user: &str,
    password: &str,
    sslmode: &str,
) -> String {
    let credentials = if password.is_empty() {
        user.to_string()
    } else {
        format!("{}:{}", user, password)
    };
    format!(
        "postgres://{}@{}:{}/{}?sslmode={}",
        credentials, host, port, name, sslmode
    )
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_duration(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(raw).map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_from_parts() {
        let url = database_url_from_parts("db", 5433, "accounts", "app", "s3cret", "require");
        assert_eq!(url, "postgres://app:s3cret@db:5433/accounts?sslmode=require");
    }

    #[test]
    fn test_database_url_without_password() {
        let url = database_url_from_parts("localhost", 5432, "accounts", "postgres", "", "disable");
        assert_eq!(url, "postgres://postgres@localhost:5432/accounts?sslmode=disable");
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("JWT_ACCESS_TTL", "15m").is_ok());
        assert!(matches!(
            parse_duration("JWT_ACCESS_TTL", "fifteen minutes"),
            Err(ConfigError::Invalid { key: "JWT_ACCESS_TTL", .. })
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config {
            database_url: "postgres://app:s3cret@db/accounts".to_string(),
            db_max_connections: 5,
            jwt_secret: "super-secret-value-that-is-long-enough".to_string(),
            jwt_access_ttl: "15m".to_string(),
            jwt_refresh_ttl: "720h".to_string(),
            request_timeout: Duration::from_secs(10),
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            protocol: Protocol::Http,
            tls: None,
            user_routes_require_auth: true,
        };

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("super-secret"));
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
    }
}
