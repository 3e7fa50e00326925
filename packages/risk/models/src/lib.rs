#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dengue breeding-risk types shared across the dengue-watch workspace.
//!
//! [`RiskLevel`] is the single categorical scale used by the weather
//! scorer, the outbreak prediction client, and the citizen report client.
//! Backend responses spell levels in several ways (`"high"`, `"HIGH"`,
//! `"moderate"`), so parsing is case-insensitive and accepts the known
//! aliases.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Categorical dengue breeding / outbreak risk, ordered from least to most
/// severe.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum RiskLevel {
    /// Conditions unlikely to support larval development.
    #[strum(to_string = "Low", serialize = "minimal", serialize = "low_risk")]
    Low,
    /// Some favourable conditions present.
    #[strum(to_string = "Medium", serialize = "moderate", serialize = "medium_risk")]
    Medium,
    /// Conditions broadly favourable for breeding.
    #[strum(to_string = "High", serialize = "high_risk")]
    High,
    /// Near-optimal breeding conditions; outbreak likely.
    #[strum(to_string = "Critical", serialize = "severe", serialize = "very_high")]
    Critical,
}

impl RiskLevel {
    /// All levels, least severe first.
    pub const ALL: &[Self] = &[Self::Low, Self::Medium, Self::High, Self::Critical];
}

/// Result of scoring a set of weather conditions for breeding risk.
///
/// Always derived from inputs, never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Categorical level derived from [`Self::score`].
    pub level: RiskLevel,
    /// Summed rule points. Can be negative for very dry air.
    pub score: i32,
    /// One entry per contributing rule, in evaluation order
    /// (temperature, humidity, rainfall).
    pub reasons: Vec<String>,
    /// Fixed narrative for the level.
    pub historical_context: String,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(RiskLevel::from_str("high").unwrap(), RiskLevel::High);
        assert_eq!(RiskLevel::from_str("CRITICAL").unwrap(), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_str("Moderate").unwrap(), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_str("low_risk").unwrap(), RiskLevel::Low);
        assert!(RiskLevel::from_str("unknown").is_err());
    }

    #[test]
    fn displays_canonical_names() {
        assert_eq!(RiskLevel::Medium.to_string(), "Medium");
        assert_eq!(RiskLevel::Critical.as_ref(), "Critical");
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        for window in RiskLevel::ALL.windows(2) {
            assert!(window[0] < window[1]);
        }
    }

    #[test]
    fn assessment_serializes_camel_case() {
        let assessment = RiskAssessment {
            level: RiskLevel::High,
            score: 5,
            reasons: vec!["humid".to_string()],
            historical_context: "context".to_string(),
        };
        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(json["level"], "High");
        assert_eq!(json["historicalContext"], "context");
    }
}
