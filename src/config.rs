use std::time::Duration;

use anyhow::{Context, Result};

use crate::leads::EmailPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    // Record store
    pub backend_url: String,
    pub backend_timeout: Duration,

    // HTTP server
    pub host: String,
    pub port: u16,

    // Locale preference
    pub locale_cookie: String,

    // Navigation
    pub submenu_close_delay: Duration,

    // Browse sessions
    pub browse_session_ttl: Duration,
    pub browse_session_capacity: usize,

    // Lead capture
    pub email_policy: EmailPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let backend_url = std::env::var("BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:3001".to_string())
            .trim_end_matches('/')
            .to_string();
        reqwest::Url::parse(&backend_url)
            .with_context(|| format!("BACKEND_URL is not a valid URL: {}", backend_url))?;

        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", value))?,
            Err(_) => 8080,
        };

        let locale_cookie = std::env::var("LOCALE_COOKIE")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "site_lang".to_string());

        let email_policy = match std::env::var("LEAD_VALIDATE_EMAIL_FORMAT").as_deref() {
            Ok("true") | Ok("1") => EmailPolicy::RequireFormat,
            _ => EmailPolicy::RequiredOnly,
        };

        Ok(Self {
            backend_url,
            backend_timeout: Duration::from_secs(
                std::env::var("BACKEND_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),

            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,

            locale_cookie,

            submenu_close_delay: Duration::from_millis(
                std::env::var("SUBMENU_CLOSE_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(200),
            ),

            browse_session_ttl: Duration::from_secs(
                std::env::var("BROWSE_SESSION_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1800),
            ),
            browse_session_capacity: std::env::var("BROWSE_SESSION_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|capacity| *capacity > 0)
                .unwrap_or(1024),

            email_policy,
        })
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:3001".to_string(),
            backend_timeout: Duration::from_secs(10),
            host: "0.0.0.0".to_string(),
            port: 8080,
            locale_cookie: "site_lang".to_string(),
            submenu_close_delay: Duration::from_millis(200),
            browse_session_ttl: Duration::from_secs(1800),
            browse_session_capacity: 1024,
            email_policy: EmailPolicy::RequiredOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 10] = [
        "BACKEND_URL",
        "BACKEND_TIMEOUT_SECS",
        "HOST",
        "PORT",
        "LOCALE_COOKIE",
        "SUBMENU_CLOSE_DELAY_MS",
        "LEAD_VALIDATE_EMAIL_FORMAT",
        "BROWSE_SESSION_TTL_SECS",
        "BROWSE_SESSION_CAPACITY",
        "RUST_LOG",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    // ==================== from_env Tests ====================

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.backend_url, "http://localhost:3001");
        assert_eq!(config.backend_timeout, Duration::from_secs(10));
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.locale_cookie, "site_lang");
        assert_eq!(config.submenu_close_delay, Duration::from_millis(200));
        assert_eq!(config.email_policy, EmailPolicy::RequiredOnly);
        assert_eq!(config.browse_session_ttl, Duration::from_secs(1800));
        assert_eq!(config.browse_session_capacity, 1024);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("BACKEND_URL", "http://records.internal:9000/");
        std::env::set_var("PORT", "3000");
        std::env::set_var("SUBMENU_CLOSE_DELAY_MS", "350");
        std::env::set_var("LEAD_VALIDATE_EMAIL_FORMAT", "true");

        let config = Config::from_env().unwrap();
        assert_eq!(config.backend_url, "http://records.internal:9000");
        assert_eq!(config.port, 3000);
        assert_eq!(config.submenu_close_delay, Duration::from_millis(350));
        assert_eq!(config.email_policy, EmailPolicy::RequireFormat);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_backend_url_is_rejected() {
        clear_env();
        std::env::set_var("BACKEND_URL", "not a url");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("BACKEND_URL"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_rejected() {
        clear_env();
        std::env::set_var("PORT", "eighty");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_cookie_name_uses_default() {
        clear_env();
        std::env::set_var("LOCALE_COOKIE", "  ");
        assert_eq!(Config::from_env().unwrap().locale_cookie, "site_lang");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_browse_session_settings() {
        clear_env();
        std::env::set_var("BROWSE_SESSION_TTL_SECS", "60");
        std::env::set_var("BROWSE_SESSION_CAPACITY", "0");

        let config = Config::from_env().unwrap();
        assert_eq!(config.browse_session_ttl, Duration::from_secs(60));
        assert_eq!(config.browse_session_capacity, 1024);
        clear_env();
    }
}
