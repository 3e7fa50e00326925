#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weather data gateway for dengue-watch.
//!
//! Fetches current conditions using a multi-provider strategy configured
//! via TOML files in `services/`:
//!
//! 1. **Weatherstack** (priority 1): current conditions, metric units.
//! 2. **`OpenWeatherMap`** (priority 2): first slot of the 3-hour
//!    forecast, used when Weatherstack fails.
//!
//! Successful readings are cached per provider and location for ten
//! minutes. When every provider fails, the [`gateway::WeatherGateway`]
//! returns an estimated reading from a regional range instead of an
//! error; estimated readings are flagged and never cached.

pub mod cache;
pub mod fallback;
pub mod gateway;
pub mod openweathermap;
pub mod service_registry;
pub mod weatherstack;

pub use dengue_watch_weather_models::{DataQuality, WeatherReading, WeatherReport};
pub use gateway::{GatewayConfig, WeatherGateway};
pub use service_registry::{OPENWEATHERMAP, WEATHERSTACK};

use dengue_watch_transport::TransportError;
use thiserror::Error;

/// Errors from weather provider calls.
///
/// These never reach callers of [`WeatherGateway`]; they are logged and
/// recorded as the degradation reason.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The HTTP exchange failed or the provider reported an error.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The provider's response did not have the expected shape.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Every configured provider failed.
    #[error("All {attempted} weather provider(s) failed; last error: {last}")]
    Exhausted {
        /// Number of providers tried.
        attempted: usize,
        /// Message of the final failure.
        last: String,
    },
}
