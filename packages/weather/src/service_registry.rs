//! Compile-time registry of weather provider configurations.
//!
//! Each provider is defined in a TOML file under `services/`. The
//! registry embeds these at compile time and exposes them via
//! [`all_services`] and [`enabled_services`]. Lower `priority` runs
//! first; the gateway falls through to the next provider on failure.

use serde::Deserialize;

use crate::WeatherError;

/// A weather provider configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeatherService {
    /// Unique identifier, also used as the cache key prefix.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether the gateway queries this provider.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Execution order; lower values run first.
    pub priority: u32,
    /// Provider-specific configuration.
    pub provider: ProviderConfig,
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Weatherstack `current` endpoint.
    Weatherstack {
        /// API base URL (e.g. `"http://api.weatherstack.com"`).
        base_url: String,
    },
    /// `OpenWeatherMap` 3-hour `forecast` endpoint.
    #[serde(rename = "openweathermap")]
    OpenWeatherMap {
        /// API base URL (e.g. `"https://api.openweathermap.org/data/2.5"`).
        base_url: String,
    },
}

const fn default_true() -> bool {
    true
}

impl WeatherService {
    /// Returns the provider's base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match &self.provider {
            ProviderConfig::Weatherstack { base_url }
            | ProviderConfig::OpenWeatherMap { base_url } => base_url,
        }
    }

    /// Returns a copy pointing at a different base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        match &mut self.provider {
            ProviderConfig::Weatherstack { base_url }
            | ProviderConfig::OpenWeatherMap { base_url } => *base_url = url,
        }
        self
    }
}

/// Id of the Weatherstack service.
pub const WEATHERSTACK: &str = "weatherstack";
/// Id of the `OpenWeatherMap` service.
pub const OPENWEATHERMAP: &str = "openweathermap";

static EMBEDDED: &[&str] = &[
    include_str!("../services/weatherstack.toml"),
    include_str!("../services/openweathermap.toml"),
];

/// Parses one provider definition.
///
/// # Errors
///
/// Returns [`WeatherError::Parse`] if `source` is not a valid provider
/// definition.
pub fn parse_service(source: &str) -> Result<WeatherService, WeatherError> {
    toml::from_str(source).map_err(|e| WeatherError::Parse {
        message: format!("Invalid weather service definition: {e}"),
    })
}

/// Every embedded provider, enabled or not, in file order.
///
/// A definition that fails to parse is logged and left out.
#[must_use]
pub fn all_services() -> Vec<WeatherService> {
    EMBEDDED
        .iter()
        .filter_map(|source| {
            parse_service(source)
                .inspect_err(|e| log::error!("Skipping weather service: {e}"))
                .ok()
        })
        .collect()
}

/// Enabled providers, primary first.
#[must_use]
pub fn enabled_services() -> Vec<WeatherService> {
    let mut services = all_services();
    services.retain(|s| s.enabled);
    services.sort_by_key(|s| s.priority);
    services
}
