//! Runtime settings.
//!
//! Everything hand-tuned lives here with its production default: request
//! pacing, the price sanity band, pagination ceilings and the per-strategy
//! early-stop count. A TOML file passed via `--config` overrides any subset.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::normalize::ValidationRules;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Inter-request delay policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DelayConfig {
    /// Sleep exactly this long between requests.
    Fixed { secs: f64 },
    /// Sleep a uniformly-sampled duration from this window.
    Window { min_secs: f64, max_secs: f64 },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Per-request timeout ceiling.
    pub request_timeout_secs: u64,
    pub delay: DelayConfig,
    /// Attempt ceiling for the full product fetch path. Listing-strategy
    /// fetches are never retried; a failed page yields zero URLs.
    pub max_fetch_attempts: u32,
    /// Pagination ceiling: bounds worst-case requests against a site with
    /// no reliable last-page signal.
    pub page_limit: u32,
    /// Page size for search index queries.
    pub hits_per_page: usize,
    /// Early-stop count shared by the fallback-tier listing strategies.
    pub fallback_stop: usize,
    /// Parsed price candidates outside this band are discarded as
    /// mis-parses (phone numbers, SKUs).
    pub price_parse_min: u64,
    pub price_parse_max: u64,
    /// Override the rotating user-agent pool with a fixed string.
    pub user_agent: Option<String>,
    /// Override the search index endpoint URL.
    pub search_endpoint: Option<String>,
    pub rules: ValidationRules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 25,
            delay: DelayConfig::Window {
                min_secs: 1.0,
                max_secs: 2.0,
            },
            max_fetch_attempts: 3,
            page_limit: 10,
            hits_per_page: 50,
            fallback_stop: 5,
            price_parse_min: 10_000,
            price_parse_max: 50_000_000,
            user_agent: None,
            search_endpoint: None,
            rules: ValidationRules::default(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file, filling omitted fields with defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Settings for tests: no delay between requests.
    pub fn without_delay(mut self) -> Self {
        self.delay = DelayConfig::Fixed { secs: 0.0 };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.request_timeout_secs, 25);
        assert_eq!(settings.page_limit, 10);
        assert_eq!(settings.price_parse_min, 10_000);
        assert_eq!(settings.price_parse_max, 50_000_000);
    }

    #[test]
    fn test_toml_overlay_keeps_defaults() {
        let parsed: Settings = toml::from_str(
            r#"
            page_limit = 3
            delay = { secs = 0.5 }
            "#,
        )
        .unwrap();
        assert_eq!(parsed.page_limit, 3);
        assert!(matches!(parsed.delay, DelayConfig::Fixed { .. }));
        // untouched fields keep production defaults
        assert_eq!(parsed.request_timeout_secs, 25);
        assert_eq!(parsed.fallback_stop, 5);
    }

    #[test]
    fn test_delay_window_form() {
        let parsed: Settings = toml::from_str(
            r#"
            delay = { min_secs = 0.5, max_secs = 1.5 }
            "#,
        )
        .unwrap();
        match parsed.delay {
            DelayConfig::Window { min_secs, max_secs } => {
                assert_eq!(min_secs, 0.5);
                assert_eq!(max_secs, 1.5);
            }
            _ => panic!("expected window delay"),
        }
    }
}
