#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Citizen report types.

use chrono::{DateTime, Utc};
use dengue_watch_risk_models::RiskLevel;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Classification of a reported site.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ReportCategory {
    /// Active breeding site.
    Hotspot,
    /// Conditions that could become a breeding site.
    Potential,
    /// No breeding risk found.
    NotHotspot,
    /// The submission could not be assessed (e.g. not a photo of a site).
    Invalid,
}

impl ReportCategory {
    /// Risk level assumed when the backend does not state one.
    #[must_use]
    pub const fn default_risk_level(self) -> RiskLevel {
        match self {
            Self::Hotspot => RiskLevel::High,
            Self::Potential => RiskLevel::Medium,
            Self::NotHotspot | Self::Invalid => RiskLevel::Low,
        }
    }
}

/// Gamification rewards credited for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    /// Leaderboard points.
    pub points: u32,
    /// Experience toward the reporter's next level.
    pub xp: u32,
}

impl Default for Rewards {
    fn default() -> Self {
        Self { points: 50, xp: 25 }
    }
}

/// Weather at the report location as echoed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Degrees Celsius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Relative humidity, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// Recent rainfall in millimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rainfall_mm: Option<f64>,
    /// Wind speed in km/h.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed_kmh: Option<f64>,
    /// Free-text conditions (e.g. "Light rain").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
}

impl WeatherSnapshot {
    /// Returns `true` if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.humidity.is_none()
            && self.rainfall_mm.is_none()
            && self.wind_speed_kmh.is_none()
            && self.conditions.is_none()
    }
}

/// The normalized outcome of a report submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Site classification.
    pub category: ReportCategory,
    /// Classifier confidence, in `[0, 1]`.
    pub confidence: f64,
    /// Breeding risk at the site.
    pub risk_level: RiskLevel,
    /// Actions for the reporter, most urgent first.
    pub recommendations: Vec<String>,
    /// Credited rewards.
    pub rewards: Rewards,
    /// Weather at the site, if the backend echoed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_snapshot: Option<WeatherSnapshot>,
    /// When the backend recorded the report.
    pub timestamp: DateTime<Utc>,
    /// Backend report id, or a generated UUID.
    pub report_id: String,
}

/// An image attached to a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name sent in the multipart part.
    pub file_name: String,
    /// MIME type (e.g. `"image/jpeg"`).
    pub content_type: String,
    /// Raw image contents.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Wraps raw image bytes for upload.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// A citizen report of a possible breeding site.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSubmission {
    /// Free-form place name.
    pub location: String,
    /// What the reporter saw.
    pub description: String,
    /// Optional photo of the site.
    pub image: Option<ImageUpload>,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Reporter contact (phone or email), passed through as-is.
    pub contact: Option<String>,
}

impl ReportSubmission {
    /// Creates a submission with no image, coordinates or contact.
    #[must_use]
    pub fn new(location: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            description: description.into(),
            image: None,
            latitude: None,
            longitude: None,
            contact: None,
        }
    }

    /// Attaches a photo.
    #[must_use]
    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    /// Sets the site's coordinates.
    #[must_use]
    pub const fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Sets the reporter contact.
    #[must_use]
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }
}
