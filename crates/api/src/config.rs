use std::str::FromStr;

use axum::http::HeaderValue;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Postgres connection string for the job store.
    pub database_url: String,
    /// Upper bound on pooled database connections (default: `10`).
    pub database_max_connections: u32,
}

fn var_or(name: &'static str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = var_or(name, default);
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

/// Split a comma-separated origin list, rejecting values that are not valid
/// header values.
fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map(|_| origin.to_string())
                .map_err(|_| ConfigError::Invalid {
                    name: "CORS_ORIGINS",
                    value: origin.to_string(),
                })
        })
        .collect()
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                       |
    /// | `DATABASE_URL`             | required                   |
    /// | `DATABASE_MAX_CONNECTIONS` | `10`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing {
            name: "DATABASE_URL",
        })?;

        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", "3000")?,
            cors_origins: parse_origins(&var_or("CORS_ORIGINS", "http://localhost:5173"))?,
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", "30")?,
            shutdown_timeout_secs: parse_var("SHUTDOWN_TIMEOUT_SECS", "30")?,
            database_url,
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", "10")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        let origins = parse_origins(" http://a.test , ,http://b.test").unwrap();
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn origin_with_control_character_is_rejected() {
        assert_matches!(
            parse_origins("http://a.test,bad\u{7f}origin"),
            Err(ConfigError::Invalid { name: "CORS_ORIGINS", .. })
        );
    }
}
