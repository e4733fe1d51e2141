//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (INKWELL_*)
//! 2. TOML config file (if INKWELL_CONFIG_FILE set)
//! 3. Built-in defaults

use std::fmt;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// How a list request uses the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchPolicy {
    /// Serve a cached partition when present; fetch only on a miss.
    CacheFirst,
    /// Serve a cached partition when present and refresh it in the background.
    #[default]
    CacheAndNetwork,
    /// Always fetch; never read the cache.
    NetworkOnly,
}

impl fmt::Display for FetchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchPolicy::CacheFirst => "cache-first",
            FetchPolicy::CacheAndNetwork => "cache-and-network",
            FetchPolicy::NetworkOnly => "network-only",
        })
    }
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (INKWELL_*)
/// 2. TOML config file (if INKWELL_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// GraphQL endpoint of the content API.
    ///
    /// Set via INKWELL_API_URL environment variable.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via INKWELL_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via INKWELL_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Policy used by list calls that do not name one.
    ///
    /// Set via INKWELL_DEFAULT_POLICY environment variable.
    #[serde(default)]
    pub default_policy: FetchPolicy,

    /// Lifetime of notifications shown through the severity helpers, in milliseconds.
    ///
    /// Set via INKWELL_NOTIFICATION_DURATION_MS environment variable. Zero keeps
    /// notifications until removed.
    #[serde(default = "default_notification_duration_ms")]
    pub notification_duration_ms: u64,
}

fn default_api_url() -> String {
    "http://localhost:8080/query".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    "inkwell/0.1".into()
}

fn default_notification_duration_ms() -> u64 {
    3_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            default_policy: FetchPolicy::default(),
            notification_duration_ms: default_notification_duration_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_duration_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `INKWELL_`
    /// 2. TOML file from `INKWELL_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("INKWELL_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("INKWELL_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api_url, "http://localhost:8080/query");
        assert_eq!(config.user_agent, "inkwell/0.1");
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.default_policy, FetchPolicy::CacheAndNetwork);
        assert_eq!(config.notification_duration_ms, 3_000);
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
        assert_eq!(config.notification_duration(), Duration::from_millis(3_000));
    }

    #[test]
    fn test_policy_from_toml() {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string(r#"default_policy = "network-only""#))
            .extract()
            .unwrap();
        assert_eq!(config.default_policy, FetchPolicy::NetworkOnly);
        assert_eq!(config.api_url, default_api_url());
    }

    #[test]
    fn test_policy_display_matches_serde() {
        for policy in [FetchPolicy::CacheFirst, FetchPolicy::CacheAndNetwork, FetchPolicy::NetworkOnly] {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(json, format!("\"{policy}\""));
        }
    }
}
