//! The weather gateway: cache, provider fallback, estimate.
//!
//! Lookup order for a location:
//!
//! 1. A fresh cache entry under `provider:location` for any configured
//!    provider (priority order). No network call.
//! 2. Each configured provider in priority order. The first success is
//!    cached and returned.
//! 3. An estimated reading from the [`FallbackRange`]. Never cached, so
//!    the next call retries the network.
//!
//! The gateway owns its cache. Separate instances do not share entries.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use dengue_watch_risk::assess_risk;
use dengue_watch_transport::{HttpTransport, Outcome, attempt_or_degrade};
use dengue_watch_weather_models::{WeatherReading, WeatherReport};

use crate::WeatherError;
use crate::cache::TtlCache;
use crate::fallback::{self, FallbackRange};
use crate::openweathermap;
use crate::service_registry::{self, ProviderConfig, WeatherService};
use crate::weatherstack;

/// Default freshness window for cached readings.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Construction-time settings for a [`WeatherGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Providers to try, in any order; sorted by priority on build.
    pub services: Vec<WeatherService>,
    /// API keys by service id. Services without a key are skipped.
    pub api_keys: BTreeMap<String, String>,
    /// Base URL overrides by service id (e.g. a regional mirror or a
    /// local stub).
    pub base_urls: BTreeMap<String, String>,
    /// Freshness window for cached readings.
    pub cache_ttl: Duration,
    /// Bounds for estimated readings.
    pub fallback: FallbackRange,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            services: service_registry::enabled_services(),
            api_keys: BTreeMap::new(),
            base_urls: BTreeMap::new(),
            cache_ttl: DEFAULT_CACHE_TTL,
            fallback: FallbackRange::default(),
        }
    }
}

impl GatewayConfig {
    /// Sets the API key for `service_id`. `None` leaves it unset.
    #[must_use]
    pub fn with_api_key(mut self, service_id: &str, key: Option<String>) -> Self {
        if let Some(key) = key {
            self.api_keys.insert(service_id.to_string(), key);
        }
        self
    }

    /// Points `service_id` at `base_url` instead of its embedded default.
    #[must_use]
    pub fn with_base_url(mut self, service_id: &str, base_url: impl Into<String>) -> Self {
        self.base_urls.insert(service_id.to_string(), base_url.into());
        self
    }

    /// Sets the cache TTL.
    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

struct ConfiguredProvider {
    service: WeatherService,
    api_key: String,
}

/// Current-conditions lookup that never fails the caller.
pub struct WeatherGateway {
    transport: Arc<dyn HttpTransport>,
    providers: Vec<ConfiguredProvider>,
    cache: Mutex<TtlCache<WeatherReading>>,
    fallback: FallbackRange,
}

impl WeatherGateway {
    /// Creates a gateway sending requests through `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, config: GatewayConfig) -> Self {
        let GatewayConfig {
            mut services,
            api_keys,
            mut base_urls,
            cache_ttl,
            fallback,
        } = config;

        services.sort_by_key(|s| s.priority);
        let providers = services
            .into_iter()
            .filter(|s| s.enabled)
            .filter_map(|service| {
                let Some(api_key) = api_keys.get(&service.id).cloned() else {
                    log::debug!("Skipping weather provider '{}': no API key", service.id);
                    return None;
                };
                let service = match base_urls.remove(&service.id) {
                    Some(url) => {
                        log::debug!("Weather provider '{}' using {url}", service.id);
                        service.with_base_url(url)
                    }
                    None => service,
                };
                Some(ConfiguredProvider { service, api_key })
            })
            .collect::<Vec<_>>();

        if providers.is_empty() {
            log::warn!("No weather providers configured; all readings will be estimated");
        }

        Self {
            transport,
            providers,
            cache: Mutex::new(TtlCache::new(cache_ttl)),
            fallback,
        }
    }

    /// Ids of the providers this gateway will query, in order.
    #[must_use]
    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers
            .iter()
            .map(|p| p.service.id.as_str())
            .collect()
    }

    /// Returns current conditions for `location`.
    ///
    /// Never fails: when every provider fails the reading is estimated
    /// (see [`WeatherReading::is_estimated`]).
    pub async fn current_weather(&self, location: &str) -> WeatherReading {
        self.fetch_current(location).await.into_value()
    }

    /// Returns current conditions and their breeding-risk assessment.
    pub async fn current_conditions(&self, location: &str) -> WeatherReport {
        let reading = self.current_weather(location).await;
        let risk = assess_risk(reading.temperature, reading.humidity, reading.rainfall_mm);
        WeatherReport {
            location: location.trim().to_string(),
            reading,
            risk,
        }
    }

    /// Like [`Self::current_weather`], but reports whether the reading had
    /// to be estimated and why.
    pub async fn fetch_current(&self, location: &str) -> Outcome<WeatherReading> {
        let location = location.trim();

        if let Some(hit) = self.cached(location) {
            return Outcome::Fresh(hit);
        }

        attempt_or_degrade(
            "weather lookup",
            self.fetch_from_providers(location),
            || fallback::estimate(&self.fallback, Utc::now()),
        )
        .await
    }

    fn cached(&self, location: &str) -> Option<WeatherReading> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now();
        self.providers.iter().find_map(|p| {
            let key = cache_key(&p.service.id, location);
            cache.get_at(&key, now).cloned().inspect(|_| {
                log::debug!("Weather cache hit for {key}");
            })
        })
    }

    async fn fetch_from_providers(&self, location: &str) -> Result<WeatherReading, WeatherError> {
        let mut last_error = None;

        for provider in &self.providers {
            match self.fetch_from(provider, location).await {
                Ok(reading) => {
                    log::info!("Weather for '{location}' from {}", provider.service.id);
                    self.cache
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(cache_key(&provider.service.id, location), reading.clone());
                    return Ok(reading);
                }
                Err(e) => {
                    log::warn!(
                        "Weather provider {} failed for '{location}': {e}",
                        provider.service.id
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(WeatherError::Exhausted {
            attempted: self.providers.len(),
            last: last_error.map_or_else(|| "no providers configured".to_string(), |e| e.to_string()),
        })
    }

    async fn fetch_from(
        &self,
        provider: &ConfiguredProvider,
        location: &str,
    ) -> Result<WeatherReading, WeatherError> {
        let service = &provider.service;
        let request = match &service.provider {
            ProviderConfig::Weatherstack { base_url } => {
                weatherstack::current_request(base_url, &provider.api_key, location)
            }
            ProviderConfig::OpenWeatherMap { base_url } => {
                openweathermap::forecast_request(base_url, &provider.api_key, location)
            }
        };

        let body = self.transport.send(request).await?.success_json()?;
        let now = Utc::now();

        match &service.provider {
            ProviderConfig::Weatherstack { .. } => {
                weatherstack::parse_response(&body, &service.id, now)
            }
            ProviderConfig::OpenWeatherMap { .. } => {
                openweathermap::parse_response(body, &service.id, now)
            }
        }
    }
}

/// Cache key for a provider and location. Locations are compared
/// case-insensitively.
#[must_use]
pub fn cache_key(provider_id: &str, location: &str) -> String {
    format!("{provider_id}:{}", location.trim().to_lowercase())
}
