#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Outbreak prediction types.
//!
//! [`PredictionRequest`] is serialized as the backend request body
//! (snake-case field names, absent weather fields omitted).
//! [`PredictionResult`] is the one normalized shape every caller sees,
//! whether it came from the backend or was simulated locally; its
//! [`PredictionSource`] records which.

use chrono::{DateTime, Utc};
use dengue_watch_risk_models::RiskLevel;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// An outbreak prediction request for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// City or district name.
    pub location: String,
    /// State / division name.
    pub state: String,
    /// Temperature in °C, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Relative humidity in percent, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// Rainfall in mm, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rainfall: Option<f64>,
    /// Wind speed in km/h, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
}

impl PredictionRequest {
    /// Creates a request with no weather fields.
    #[must_use]
    pub fn new(location: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            state: state.into(),
            temperature: None,
            humidity: None,
            rainfall: None,
            wind_speed: None,
        }
    }

    /// Sets temperature, humidity and rainfall together.
    #[must_use]
    pub const fn with_weather(mut self, temperature: f64, humidity: f64, rainfall: f64) -> Self {
        self.temperature = Some(temperature);
        self.humidity = Some(humidity);
        self.rainfall = Some(rainfall);
        self
    }

    /// Returns `true` if any weather field is present.
    #[must_use]
    pub const fn has_weather(&self) -> bool {
        self.temperature.is_some()
            || self.humidity.is_some()
            || self.rainfall.is_some()
            || self.wind_speed.is_some()
    }
}

/// Where a [`PredictionResult`] came from.
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
pub enum PredictionSource {
    /// Normalized from a backend response.
    Backend,
    /// Computed locally because the backend was unavailable.
    Simulated,
}

/// Per-factor contribution to outbreak risk, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalFactors {
    /// Temperature contribution.
    pub temperature_impact: f64,
    /// Humidity contribution.
    pub humidity_impact: f64,
    /// Rainfall contribution.
    pub rainfall_impact: f64,
    /// Population density contribution.
    pub population_density_impact: f64,
}

/// A normalized outbreak prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Probability of an outbreak, in `[0, 1]`.
    pub outbreak_probability: f64,
    /// Categorical risk.
    pub risk_level: RiskLevel,
    /// Expected case count.
    pub predicted_cases: u32,
    /// Model confidence, in `[0, 1]`.
    pub confidence: f64,
    /// Factor breakdown.
    pub environmental_factors: EnvironmentalFactors,
    /// Preventive actions, most urgent first.
    pub recommendations: Vec<String>,
    /// Backend or simulated.
    pub source: PredictionSource,
    /// When the result was produced.
    pub timestamp: DateTime<Utc>,
}

impl PredictionResult {
    /// Returns `true` if this result was simulated locally.
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        self.source == PredictionSource::Simulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_absent_weather() {
        let json = serde_json::to_value(PredictionRequest::new("Dhaka", "Dhaka Division")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "location": "Dhaka", "state": "Dhaka Division" })
        );
    }

    #[test]
    fn request_uses_snake_case_wind_speed() {
        let mut request = PredictionRequest::new("Dhaka", "Dhaka Division");
        request.wind_speed = Some(12.0);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["wind_speed"], 12.0);
        assert!(request.has_weather());
    }

    #[test]
    fn with_weather_sets_all_three() {
        let request = PredictionRequest::new("Dhaka", "Dhaka").with_weather(32.0, 80.0, 10.0);
        assert_eq!(request.temperature, Some(32.0));
        assert_eq!(request.humidity, Some(80.0));
        assert_eq!(request.rainfall, Some(10.0));
        assert!(request.wind_speed.is_none());
    }
}
