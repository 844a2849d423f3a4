//! Configuration management for Auth Service
//!
//! Loads settings from environment variables, with a `.env` file picked up in
//! debug builds. Settings are read once at startup and handed to each
//! component's constructor; nothing reads the environment afterwards.
//!
//! # Example
//!
//! ```no_run
//! use auth_service::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::from_env()?;
//!     println!("listening on {}", settings.server.bind_address());
//!     Ok(())
//! }
//! ```

use anyhow::{bail, Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crypto_core::jwt::{DEFAULT_ACCESS_TOKEN_TTL_MINUTES, DEFAULT_ISSUER, MIN_SECRET_LENGTH};
use crypto_core::token::DEFAULT_REFRESH_TOKEN_TTL_DAYS;

/// Longest token lifetime accepted from configuration (ten years)
pub const MAX_TOKEN_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// Longest sweep interval accepted from configuration (one week)
pub const MAX_REAPER_INTERVAL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    /// `None` when `DATABASE_URL` is unset; the service then keeps its
    /// tables in process memory
    pub database: Option<DatabaseSettings>,
    pub jwt: JwtSettings,
    pub reaper: ReaperSettings,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Settings {
            server: ServerSettings::from_lookup(&lookup)?,
            database: DatabaseSettings::from_lookup(&lookup)?,
            jwt: JwtSettings::from_lookup(&lookup)?,
            reaper: ReaperSettings::from_lookup(&lookup)?,
        })
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> Result<Self> {
        Ok(Self {
            host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(lookup, "SERVER_PORT", 8081)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseSettings {
    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> Result<Option<Self>> {
        let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) else {
            return Ok(None);
        };

        Ok(Some(Self {
            url,
            max_connections: parse_or(lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(parse_or(
                lookup,
                "DATABASE_ACQUIRE_TIMEOUT",
                5,
            )?),
        }))
    }
}

/// Token signing settings
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub access_token_ttl: chrono::Duration,
    pub refresh_token_ttl: chrono::Duration,
}

impl JwtSettings {
    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> Result<Self> {
        let secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.len() < MIN_SECRET_LENGTH {
            bail!(
                "JWT_SECRET must be at least {} bytes, got {}",
                MIN_SECRET_LENGTH,
                secret.len()
            );
        }

        let access_secs: i64 = parse_or(
            lookup,
            "JWT_ACCESS_TOKEN_TTL_SECONDS",
            DEFAULT_ACCESS_TOKEN_TTL_MINUTES * 60,
        )?;
        let refresh_secs: i64 = parse_or(
            lookup,
            "JWT_REFRESH_TOKEN_TTL_SECONDS",
            DEFAULT_REFRESH_TOKEN_TTL_DAYS * 24 * 60 * 60,
        )?;
        for (key, secs) in [
            ("JWT_ACCESS_TOKEN_TTL_SECONDS", access_secs),
            ("JWT_REFRESH_TOKEN_TTL_SECONDS", refresh_secs),
        ] {
            if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&secs) {
                bail!(
                    "{} must be between 1 and {} seconds, got {}",
                    key,
                    MAX_TOKEN_TTL_SECONDS,
                    secs
                );
            }
        }

        Ok(Self {
            secret,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            access_token_ttl: chrono::Duration::seconds(access_secs),
            refresh_token_ttl: chrono::Duration::seconds(refresh_secs),
        })
    }
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

/// Expired refresh token sweep
#[derive(Debug, Clone)]
pub struct ReaperSettings {
    pub interval: Duration,
}

impl ReaperSettings {
    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> Result<Self> {
        let secs: u64 = parse_or(lookup, "TOKEN_REAPER_INTERVAL_SECONDS", 3600)?;
        if !(1..=MAX_REAPER_INTERVAL_SECONDS).contains(&secs) {
            bail!(
                "TOKEN_REAPER_INTERVAL_SECONDS must be between 1 and {} seconds, got {}",
                MAX_REAPER_INTERVAL_SECONDS,
                secs
            );
        }

        Ok(Self {
            interval: Duration::from_secs(secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}", key)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef-config";

    fn load(pairs: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[("DATABASE_URL", "postgres://localhost/auth"), ("JWT_SECRET", SECRET)])
            .unwrap();

        assert_eq!(settings.server.port, 8081);
        assert_eq!(settings.server.bind_address(), "0.0.0.0:8081");
        assert_eq!(settings.database.unwrap().max_connections, 10);
        assert_eq!(settings.jwt.issuer, "auth-service");
        assert_eq!(settings.jwt.access_token_ttl, chrono::Duration::minutes(30));
        assert_eq!(settings.jwt.refresh_token_ttl, chrono::Duration::days(7));
        assert_eq!(settings.reaper.interval, Duration::from_secs(3600));
    }

    #[test]
    fn test_overrides() {
        let settings = load(&[
            ("DATABASE_URL", "postgres://localhost/auth"),
            ("JWT_SECRET", SECRET),
            ("SERVER_PORT", "9000"),
            ("JWT_ACCESS_TOKEN_TTL_SECONDS", "60"),
            ("JWT_ISSUER", "staging-auth"),
        ])
        .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.jwt.access_token_ttl, chrono::Duration::seconds(60));
        assert_eq!(settings.jwt.issuer, "staging-auth");
    }

    #[test]
    fn test_missing_secret_fails() {
        assert!(load(&[("DATABASE_URL", "postgres://localhost/auth")]).is_err());
    }

    #[test]
    fn test_missing_database_url_selects_memory_storage() {
        let settings = load(&[("JWT_SECRET", SECRET)]).unwrap();
        assert!(settings.database.is_none());

        let settings = load(&[("JWT_SECRET", SECRET), ("DATABASE_URL", "  ")]).unwrap();
        assert!(settings.database.is_none());
    }

    #[test]
    fn test_out_of_range_ttl_fails() {
        for raw in ["0", "-5", "9000000000000", "99999999999999999"] {
            let err = load(&[
                ("JWT_SECRET", SECRET),
                ("JWT_ACCESS_TOKEN_TTL_SECONDS", raw),
            ])
            .unwrap_err();
            assert!(err.to_string().contains("JWT_ACCESS_TOKEN_TTL_SECONDS"), "{raw}");
        }

        let err = load(&[
            ("JWT_SECRET", SECRET),
            ("JWT_REFRESH_TOKEN_TTL_SECONDS", "9000000000000"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("JWT_REFRESH_TOKEN_TTL_SECONDS"));
    }

    #[test]
    fn test_out_of_range_reaper_interval_fails() {
        for raw in ["0", "18446744073709551615"] {
            let err = load(&[
                ("JWT_SECRET", SECRET),
                ("TOKEN_REAPER_INTERVAL_SECONDS", raw),
            ])
            .unwrap_err();
            assert!(err.to_string().contains("TOKEN_REAPER_INTERVAL_SECONDS"), "{raw}");
        }
    }

    #[test]
    fn test_short_secret_fails() {
        let err = load(&[("DATABASE_URL", "postgres://x"), ("JWT_SECRET", "short")]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_unparseable_port_fails() {
        let err = load(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", SECRET),
            ("SERVER_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let settings = load(&[("DATABASE_URL", "postgres://x"), ("JWT_SECRET", SECRET)]).unwrap();
        let rendered = format!("{:?}", settings.jwt);

        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("<redacted>"));
    }
}
