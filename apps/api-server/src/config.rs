//! Application configuration loaded from environment variables.
//!
//! Assembled once in `main` and passed by reference to whatever needs it.

use std::env;
use std::str::FromStr;

use bloglist_infra::JwtConfig;
use bloglist_infra::database::DatabaseConfig;

/// Deployment environment, from `RUST_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("test") => Environment::Test,
            _ => Environment::Development,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// `None` runs the server on in-memory repositories.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::parse(lookup("RUST_ENV").as_deref());

        // Tests run against their own database.
        let url_key = match environment {
            Environment::Test => "TEST_DATABASE_URL",
            _ => "DATABASE_URL",
        };

        let database = lookup(url_key).map(|url| DatabaseConfig {
            url,
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var(&lookup, "DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: parse_var(&lookup, "JWT_EXPIRATION_HOURS")
                .unwrap_or(defaults.expiration_hours),
            issuer: lookup("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_var(&lookup, "PORT").unwrap_or(3003),
            environment,
            database,
            jwt,
        }
    }

    /// Log configuration problems that should not stop startup.
    pub fn warn_insecure_defaults(&self) {
        if !self.jwt.uses_default_secret() {
            return;
        }

        if self.environment == Environment::Production {
            tracing::error!(
                "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
            );
        } else {
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.parse().ok())
}
