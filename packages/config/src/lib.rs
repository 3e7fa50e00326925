#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Runtime settings for the dengue-watch services.
//!
//! Everything is read from environment variables:
//!
//! | Variable                              | Default                 |
//! |---------------------------------------|-------------------------|
//! | `DENGUE_WATCH_API_URL`                | `http://localhost:8000` |
//! | `WEATHERSTACK_API_KEY`                | unset                   |
//! | `OPENWEATHER_API_KEY`                 | unset                   |
//! | `DENGUE_WATCH_HTTP_TIMEOUT_SECS`      | `8`                     |
//! | `DENGUE_WATCH_WEATHER_CACHE_TTL_SECS` | `600`                   |
//!
//! API keys are opaque strings; a missing key disables the provider that
//! needs it rather than failing startup.

use std::time::Duration;

use thiserror::Error;

/// Backend base URL variable.
pub const API_URL_VAR: &str = "DENGUE_WATCH_API_URL";
/// Weatherstack API key variable.
pub const WEATHERSTACK_KEY_VAR: &str = "WEATHERSTACK_API_KEY";
/// `OpenWeatherMap` API key variable.
pub const OPENWEATHER_KEY_VAR: &str = "OPENWEATHER_API_KEY";
/// Per-request timeout variable, in seconds.
pub const TIMEOUT_VAR: &str = "DENGUE_WATCH_HTTP_TIMEOUT_SECS";
/// Weather cache TTL variable, in seconds.
pub const CACHE_TTL_VAR: &str = "DENGUE_WATCH_WEATHER_CACHE_TTL_SECS";

/// Backend base URL used when [`API_URL_VAR`] is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Per-request timeout used when [`TIMEOUT_VAR`] is unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
/// Weather cache TTL used when [`CACHE_TTL_VAR`] is unset.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set to something unusable.
    #[error("Invalid value for {var}: {message}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// What was wrong.
        message: String,
    },
}

/// Settings shared by every dengue-watch service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the prediction / report backend.
    pub api_base_url: String,
    /// Weatherstack API key, if configured.
    pub weatherstack_api_key: Option<String>,
    /// `OpenWeatherMap` API key, if configured.
    pub openweather_api_key: Option<String>,
    /// Timeout applied to every outgoing HTTP request.
    pub request_timeout: Duration,
    /// How long a weather reading stays fresh in the gateway cache.
    pub weather_cache_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            weatherstack_api_key: None,
            openweather_api_key: None,
            request_timeout: DEFAULT_TIMEOUT,
            weather_cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl Settings {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not
    /// parse, the timeout is zero, or the backend URL is not an `http(s)`
    /// URL. A zero cache TTL is allowed and disables caching.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads settings through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = non_empty(API_URL_VAR).unwrap_or_else(|| {
            log::debug!("{API_URL_VAR} not set, using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: API_URL_VAR,
                message: format!("expected an http(s) URL, got '{api_base_url}'"),
            });
        }

        let weatherstack_api_key = non_empty(WEATHERSTACK_KEY_VAR);
        let openweather_api_key = non_empty(OPENWEATHER_KEY_VAR);
        if weatherstack_api_key.is_none() && openweather_api_key.is_none() {
            log::warn!(
                "No weather provider keys configured ({WEATHERSTACK_KEY_VAR}, \
                 {OPENWEATHER_KEY_VAR}); weather readings will be estimated"
            );
        }

        let request_timeout = parse_secs(TIMEOUT_VAR, non_empty(TIMEOUT_VAR))?
            .unwrap_or(DEFAULT_TIMEOUT);
        if request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: TIMEOUT_VAR,
                message: "timeout must be at least one second".to_string(),
            });
        }
        let weather_cache_ttl = parse_secs(CACHE_TTL_VAR, non_empty(CACHE_TTL_VAR))?
            .unwrap_or(DEFAULT_CACHE_TTL);

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            weatherstack_api_key,
            openweather_api_key,
            request_timeout,
            weather_cache_ttl,
        })
    }
}

fn parse_secs(var: &'static str, value: Option<String>) -> Result<Option<Duration>, ConfigError> {
    value
        .map(|v| {
            v.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::Invalid {
                    var,
                    message: format!("'{v}' is not a whole number of seconds: {e}"),
                })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Settings::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(load(&[]).unwrap(), Settings::default());
    }

    #[test]
    fn reads_all_variables() {
        let settings = load(&[
            (API_URL_VAR, "https://api.example.org/"),
            (WEATHERSTACK_KEY_VAR, "ws-key"),
            (OPENWEATHER_KEY_VAR, "ow-key"),
            (TIMEOUT_VAR, "5"),
            (CACHE_TTL_VAR, "60"),
        ])
        .unwrap();
        assert_eq!(settings.api_base_url, "https://api.example.org");
        assert_eq!(settings.weatherstack_api_key.as_deref(), Some("ws-key"));
        assert_eq!(settings.openweather_api_key.as_deref(), Some("ow-key"));
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.weather_cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn blank_keys_are_unset() {
        let settings = load(&[(WEATHERSTACK_KEY_VAR, "  ")]).unwrap();
        assert!(settings.weatherstack_api_key.is_none());
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = load(&[(TIMEOUT_VAR, "soon")]).unwrap_err();
        assert!(err.to_string().contains(TIMEOUT_VAR));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = load(&[(TIMEOUT_VAR, "0")]).unwrap_err();
        assert!(err.to_string().contains(TIMEOUT_VAR));
    }

    #[test]
    fn zero_cache_ttl_is_allowed() {
        let settings = load(&[(CACHE_TTL_VAR, "0")]).unwrap();
        assert_eq!(settings.weather_cache_ttl, Duration::ZERO);
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(load(&[(API_URL_VAR, "ftp://backend")]).is_err());
    }
}
