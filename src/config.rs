//! Environment configuration
//!
//! Both binaries read their settings from the process environment
//! (optionally seeded from a `.env` file by `dotenv`).

use crate::error::ServiceError;
use crate::Result;
use std::env;

pub const DEFAULT_CHAT_PORT: u16 = 5001;
pub const DEFAULT_API_PORT: u16 = 5000;
const DEFAULT_JWT_SECRET: &str = "your-secret-key-here";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Guard every resource route, not only the transaction listing
    pub require_auth: bool,
    pub seed_demo_data: bool,
    pub cors_permissive: bool,
}

impl Config {
    /// Read configuration, falling back to `default_port` when `PORT` is unset
    pub fn from_env(default_port: u16) -> Result<Self> {
        Self::from_lookup(default_port, |key| env::var(key).ok())
    }

    fn from_lookup<F>(default_port: u16, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ServiceError::Config(format!("PORT must be a port number, got '{}'", raw))
            })?,
            None => default_port,
        };

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            jwt_secret,
            require_auth: parse_flag(&lookup, "REQUIRE_AUTH", false)?,
            seed_demo_data: parse_flag(&lookup, "SEED_DEMO_DATA", true)?,
            cors_permissive: parse_flag(&lookup, "CORS_PERMISSIVE", true)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings used by tests: no seed data, fixed secret
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            require_auth: false,
            seed_demo_data: false,
            cors_permissive: true,
        }
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ServiceError::Config(format!(
                "{} must be a boolean, got '{}'",
                key, other
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(DEFAULT_CHAT_PORT, lookup_from(&[])).unwrap();
        assert_eq!(config.port, 5001);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.jwt_secret, DEFAULT_JWT_SECRET);
        assert!(!config.require_auth);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn test_port_override() {
        let config =
            Config::from_lookup(DEFAULT_API_PORT, lookup_from(&[("PORT", "8088")])).unwrap();
        assert_eq!(config.port, 8088);
        assert_eq!(config.bind_address(), "0.0.0.0:8088");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_lookup(5000, lookup_from(&[("PORT", "abc")])).is_err());
        assert!(Config::from_lookup(5000, lookup_from(&[("REQUIRE_AUTH", "maybe")])).is_err());
    }

    #[test]
    fn test_flags() {
        let config = Config::from_lookup(
            5000,
            lookup_from(&[("REQUIRE_AUTH", "true"), ("SEED_DEMO_DATA", "0")]),
        )
        .unwrap();
        assert!(config.require_auth);
        assert!(!config.seed_demo_data);
    }
}
