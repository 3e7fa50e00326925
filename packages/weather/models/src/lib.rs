#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weather reading types.
//!
//! A [`WeatherReading`] is an immutable snapshot of current conditions.
//! It records where it came from: a named provider, or an estimate
//! generated locally when every provider failed. Consumers must check
//! [`WeatherReading::is_estimated`] before presenting a reading as
//! observed data.

use chrono::{DateTime, Utc};
use dengue_watch_risk_models::RiskAssessment;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Whether a reading was observed by a provider or estimated locally.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum DataQuality {
    /// Reported by an upstream weather provider.
    Observed,
    /// Generated from the regional fallback range.
    Estimated,
}

/// Current conditions at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    /// Air temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Recent precipitation in millimetres.
    pub rainfall_mm: f64,
    /// Wind speed in km/h.
    pub wind_speed_kmh: f64,
    /// When the provider observed (or the gateway estimated) the values.
    pub observed_at: DateTime<Utc>,
    /// Provider id (e.g. `"weatherstack"`), `None` for estimates.
    pub provider: Option<String>,
    /// Observed vs estimated.
    pub quality: DataQuality,
}

impl WeatherReading {
    /// Returns `true` if this reading was generated locally.
    #[must_use]
    pub fn is_estimated(&self) -> bool {
        self.quality == DataQuality::Estimated
    }
}

/// A reading together with its breeding-risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    /// Location label the reading was requested for.
    pub location: String,
    /// Current conditions.
    pub reading: WeatherReading,
    /// Risk scored from `reading`.
    pub risk: RiskAssessment,
}
