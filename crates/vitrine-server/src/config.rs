//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication and session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_secret")]
    pub secret: String,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Access credential lifetime (default: 30 minutes)
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: i64,
    /// Refresh credential lifetime (default: 7 days)
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: i64,
    /// Role permission cache lifetime (default: 24 hours)
    #[serde(default = "default_permission_ttl_secs")]
    pub permission_ttl_secs: i64,
    /// Set the `Secure` flag on session cookies (HTTPS deployments)
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            cookie_name: default_cookie_name(),
            access_ttl_secs: default_access_ttl_secs(),
            refresh_ttl_secs: default_refresh_ttl_secs(),
            permission_ttl_secs: default_permission_ttl_secs(),
            secure_cookies: false,
        }
    }
}

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_language")]
    pub default_language: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: "pretty".to_string(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "./data/vitrine.db".to_string()
}

fn default_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_cookie_name() -> String {
    "vitrine_token".to_string()
}

fn default_access_ttl_secs() -> i64 {
    1800 // 30 minutes
}

fn default_refresh_ttl_secs() -> i64 {
    604_800 // 7 days
}

fn default_permission_ttl_secs() -> i64 {
    86_400 // 24 hours
}

fn default_language() -> String {
    "fr".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        // Check if config file exists
        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Whether the signing secret is still the shipped default.
    pub fn has_default_secret(&self) -> bool {
        self.auth.secret == default_secret()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            site: SiteConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.auth.access_ttl_secs, 1800);
        assert_eq!(config.auth.refresh_ttl_secs, 604_800);
        assert_eq!(config.auth.permission_ttl_secs, 86_400);
        assert_eq!(config.auth.cookie_name, "vitrine_token");
        assert_eq!(config.site.default_language, "fr");
        assert!(config.has_default_secret());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [auth]
            secret = "s3cret"
            access_ttl_secs = 900
            "#,
        )
        .unwrap();

        assert_eq!(config.auth.secret, "s3cret");
        assert_eq!(config.auth.access_ttl_secs, 900);
        assert_eq!(config.auth.refresh_ttl_secs, 604_800);
        assert_eq!(config.server.port, 8080);
        assert!(!config.has_default_secret());
    }
}
