use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 8090;
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 120;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the profile engine's HTTP surface.
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_url: require_env("BACKEND_URL")?,
            backend_timeout: Duration::from_secs(parse_env(
                "BACKEND_TIMEOUT_SECS",
                DEFAULT_BACKEND_TIMEOUT_SECS,
            )?),
            port: parse_env("PORT", DEFAULT_PORT)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let port: u16 = parse_env("COORDINATOR_TEST_UNSET_PORT", 8090).unwrap();
        assert_eq!(port, 8090);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("COORDINATOR_TEST_BAD_TIMEOUT", "soon");
        let result: Result<u64> = parse_env("COORDINATOR_TEST_BAD_TIMEOUT", 120);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_env_trims_whitespace() {
        std::env::set_var("COORDINATOR_TEST_PORT", " 9000 ");
        let port: u16 = parse_env("COORDINATOR_TEST_PORT", 8090).unwrap();
        assert_eq!(port, 9000);
    }
}
