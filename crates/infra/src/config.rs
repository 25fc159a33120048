//! Process configuration, read once from the environment at startup.

use thiserror::Error;
use tracing::warn;

const DEV_SESSION_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `BIND_ADDR`
    pub bind_addr: String,
    /// `DATABASE_URL`; in-memory stores are used when unset.
    pub database_url: Option<String>,
    /// `DATABASE_MAX_CONNECTIONS`
    pub database_max_connections: u32,
    /// `SESSION_SECRET`
    pub session_secret: String,
    /// `SESSION_TTL_MINUTES`
    pub session_ttl_minutes: i64,
    /// `SESSION_COOKIE_SECURE`; turn off only for plain-HTTP development.
    pub session_cookie_secure: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            database_url: None,
            database_max_connections: 5,
            session_secret: DEV_SESSION_SECRET.to_string(),
            session_ttl_minutes: 60,
            session_cookie_secure: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();

        if let Some(v) = lookup("BIND_ADDR") {
            settings.bind_addr = v;
        }
        settings.database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());

        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            settings.database_max_connections = match v.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DATABASE_MAX_CONNECTIONS",
                        value: v,
                    });
                }
            };
        }

        match lookup("SESSION_SECRET") {
            Some(v) if !v.is_empty() => settings.session_secret = v,
            _ => warn!("SESSION_SECRET not set; using insecure dev default"),
        }

        if let Some(v) = lookup("SESSION_TTL_MINUTES") {
            settings.session_ttl_minutes = match v.parse::<i64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "SESSION_TTL_MINUTES",
                        value: v,
                    });
                }
            };
        }

        if let Some(v) = lookup("SESSION_COOKIE_SECURE") {
            settings.session_cookie_secure = match v.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "SESSION_COOKIE_SECURE",
                        value: v,
                    });
                }
            };
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.database_url.is_none());
    }

    #[test]
    fn values_override_defaults() {
        let settings = Settings::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("DATABASE_URL", "postgres://localhost/invoices"),
            ("SESSION_SECRET", "s3cret"),
            ("SESSION_TTL_MINUTES", "15"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();
        assert_eq!(settings.bind_addr, "127.0.0.1:3000");
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/invoices"));
        assert_eq!(settings.session_secret, "s3cret");
        assert_eq!(settings.session_ttl_minutes, 15);
        assert_eq!(settings.database_max_connections, 12);
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let settings = Settings::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap();
        assert!(settings.database_url.is_none());
    }

    #[test]
    fn session_cookie_is_secure_unless_disabled() {
        assert!(Settings::from_lookup(lookup(&[])).unwrap().session_cookie_secure);

        let settings = Settings::from_lookup(lookup(&[("SESSION_COOKIE_SECURE", "false")])).unwrap();
        assert!(!settings.session_cookie_secure);

        let err = Settings::from_lookup(lookup(&[("SESSION_COOKIE_SECURE", "maybe")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "SESSION_COOKIE_SECURE",
                value: "maybe".to_string()
            }
        );
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = Settings::from_lookup(lookup(&[("SESSION_TTL_MINUTES", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "SESSION_TTL_MINUTES",
                value: "soon".to_string()
            }
        );
        assert!(Settings::from_lookup(lookup(&[("DATABASE_MAX_CONNECTIONS", "0")])).is_err());
    }
}
