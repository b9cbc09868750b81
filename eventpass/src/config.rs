//! Configuration management for EventPass.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::filter::DEFAULT_RADIUS_KM;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where events come from
    pub catalog: CatalogConfig,
    /// Discovery defaults
    pub discovery: DiscoveryConfig,
    /// Store runtime settings
    pub store: StoreConfig,
    /// Tracing filter directives, from `RUST_LOG` (default: info)
    pub log_level: String,
}

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the event fixture JSON
    pub fixtures_path: PathBuf,
}

/// Discovery configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// City assumed when location is unavailable (default: Stockholm)
    pub fallback_city: String,
    /// Radius for the `nearby` filter in kilometres (default: 20)
    pub default_radius_km: f64,
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Notifications buffered per subscriber (default: 16)
    pub broadcast_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            catalog: CatalogConfig {
                fixtures_path: lookup("EVENTPASS_FIXTURES")
                    .map_or_else(|| PathBuf::from("fixtures/events.json"), PathBuf::from),
            },
            discovery: DiscoveryConfig {
                fallback_city: lookup("EVENTPASS_FALLBACK_CITY")
                    .filter(|city| !city.trim().is_empty())
                    .unwrap_or_else(|| "Stockholm".to_string()),
                default_radius_km: lookup("EVENTPASS_DEFAULT_RADIUS_KM")
                    .and_then(|s| s.parse::<f64>().ok())
                    .filter(|r| r.is_finite() && *r > 0.0)
                    .unwrap_or(DEFAULT_RADIUS_KM),
            },
            store: StoreConfig {
                broadcast_capacity: lookup("EVENTPASS_BROADCAST_CAPACITY")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(eventpass_runtime::DEFAULT_BROADCAST_CAPACITY),
            },
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Tracing filter built from `log_level`
    ///
    /// Directives that do not parse fall back to `info`.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|err| {
            eprintln!("Invalid log filter {:?} ({err}), using info", self.log_level);
            EnvFilter::new("info")
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
