//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `HOTSPOTS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `HOTSPOTS_JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `HOTSPOTS_HOST` - Bind address (default: 127.0.0.1)
//! - `HOTSPOTS_PORT` - Listen port (default: 3001)
//! - `HOTSPOTS_TOKEN_TTL_MINUTES` - Bearer token lifetime (default: 1440, max: 525600)
//! - `HOTSPOTS_CORS_ORIGIN` - Allowed browser origin (default: any)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 24 * 60;
/// One year.
const MAX_TOKEN_TTL_MINUTES: i64 = 365 * 24 * 60;
const DEFAULT_PORT: u16 = 3001;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// API server configuration.
///
/// `Debug` output redacts both secrets.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Bearer token signing secret
    pub jwt_secret: SecretString,
    /// Bearer token lifetime in minutes
    pub token_ttl_minutes: i64,
    /// Allowed CORS origin; `None` allows any origin
    pub cors_origin: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing, a value does
    /// not parse, or the signing secret is weak.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let jwt_secret = env_required("HOTSPOTS_JWT_SECRET")?;
        check_signing_secret(&jwt_secret, "HOTSPOTS_JWT_SECRET")?;

        let token_ttl_minutes = check_token_ttl(env_parsed(
            "HOTSPOTS_TOKEN_TTL_MINUTES",
            DEFAULT_TOKEN_TTL_MINUTES,
        )?)?;

        Ok(Self {
            database_url: database_url_from_env()?,
            host: env_parsed("HOTSPOTS_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: env_parsed("HOTSPOTS_PORT", DEFAULT_PORT)?,
            jwt_secret: SecretString::from(jwt_secret),
            token_ttl_minutes,
            cors_origin: env_optional("HOTSPOTS_CORS_ORIGIN"),
            sentry_dsn: env_optional("SENTRY_DSN"),
            sentry_environment: env_optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Bearer token lifetime.
    #[must_use]
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.token_ttl_minutes)
    }
}

/// Token lifetime must be positive and at most [`MAX_TOKEN_TTL_MINUTES`].
fn check_token_ttl(minutes: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes) {
        Ok(minutes)
    } else {
        Err(ConfigError::InvalidEnvVar(
            "HOTSPOTS_TOKEN_TTL_MINUTES".to_owned(),
            format!("must be between 1 and {MAX_TOKEN_TTL_MINUTES} (got {minutes})"),
        ))
    }
}

/// Database URL from `HOTSPOTS_DATABASE_URL`, falling back to `DATABASE_URL`.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if neither variable is set.
pub fn database_url_from_env() -> Result<SecretString, ConfigError> {
    env_optional("HOTSPOTS_DATABASE_URL")
        .or_else(|| env_optional("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar("HOTSPOTS_DATABASE_URL".to_owned()))
}

/// A variable that must be set and non-empty.
fn env_required(key: &str) -> Result<String, ConfigError> {
    env_optional(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_owned()))
}

/// A variable that may be unset; empty counts as unset.
fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// A variable parsed as `T`, or `default` when unset.
fn env_parsed<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    env_optional(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
    })
}

/// Reject signing secrets that are short, look like placeholders, or are
/// low-entropy.
fn check_signing_secret(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let insecure = |reason: String| Err(ConfigError::InsecureSecret(var_name.to_owned(), reason));

    let length = secret.chars().count();
    if length < MIN_JWT_SECRET_LENGTH {
        return insecure(format!(
            "must be at least {MIN_JWT_SECRET_LENGTH} characters (got {length})"
        ));
    }

    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return insecure(format!("appears to be a placeholder (contains '{pattern}')"));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return insecure(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        ));
    }

    Ok(())
}

/// Shannon entropy in bits per character.
#[allow(clippy::cast_precision_loss)]
fn shannon_entropy(s: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
    }

    let len = counts.values().sum::<usize>() as f64;
    counts
        .values()
        .map(|&n| {
            let p = n as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STRONG: &str = "k7Qz!pW2#rT9vX4$mN8@bL6^hJ3&fD1*";

    #[test]
    fn test_shannon_entropy() {
        assert!(shannon_entropy("").abs() < f64::EPSILON);
        assert!(shannon_entropy("aaaaaaa").abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_signing_secret_checks() {
        assert!(check_signing_secret(STRONG, "S").is_ok());

        for weak in [
            "short",
            "your-jwt-signing-key-goes-here-0123456789",
            "abababababababababababababababababab",
        ] {
            let err = check_signing_secret(weak, "S").unwrap_err();
            assert!(matches!(err, ConfigError::InsecureSecret(_, _)), "{weak}");
        }
    }

    #[test]
    fn test_token_ttl_bounds() {
        assert_eq!(check_token_ttl(1).unwrap(), 1);
        assert_eq!(
            check_token_ttl(MAX_TOKEN_TTL_MINUTES).unwrap(),
            MAX_TOKEN_TTL_MINUTES
        );

        for bad in [0, -5, MAX_TOKEN_TTL_MINUTES + 1, 100_000_000_000_000] {
            let err = check_token_ttl(bad).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)), "{bad}");
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://user:hunter2@db/hotspots"),
            host: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            jwt_secret: SecretString::from(STRONG),
            token_ttl_minutes: 60,
            cors_origin: None,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("k7Qz"));
        assert_eq!(config.socket_addr().port(), 3001);
        assert_eq!(config.token_ttl(), chrono::Duration::hours(1));
    }
}
