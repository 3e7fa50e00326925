//! Backend response normalization.
//!
//! The prediction backend has shipped several response shapes. Each
//! canonical field lists its JSON pointers newest first: top-level
//! camelCase, then the nested `prediction` object, then flat snake_case,
//! then legacy names.

use std::str::FromStr as _;

use chrono::{DateTime, Utc};
use dengue_watch_prediction_models::{EnvironmentalFactors, PredictionResult, PredictionSource};
use dengue_watch_risk::{RiskLevel, level_for_probability, recommendations_for};
use dengue_watch_transport::fields::{NumberField, first_str, first_string_list};
use serde_json::Value;

/// Outbreak probability, a fraction or percentage.
pub const OUTBREAK_PROBABILITY: NumberField = NumberField {
    name: "outbreakProbability",
    pointers: &[
        "/outbreakProbability",
        "/prediction/outbreakProbability",
        "/prediction/outbreak_probability",
        "/outbreak_probability",
        "/probability",
        "/risk_probability",
    ],
    default: 0.5,
};

/// Expected case count.
pub const PREDICTED_CASES: NumberField = NumberField {
    name: "predictedCases",
    pointers: &[
        "/predictedCases",
        "/prediction/predictedCases",
        "/prediction/predicted_cases",
        "/predicted_cases",
        "/expected_cases",
        "/cases",
    ],
    default: 85.0,
};

/// Model confidence.
pub const CONFIDENCE: NumberField = NumberField {
    name: "confidence",
    pointers: &[
        "/confidence",
        "/prediction/confidence",
        "/model_confidence",
        "/confidence_score",
    ],
    default: 0.85,
};

/// Contribution of temperature to the risk.
pub const TEMPERATURE_IMPACT: NumberField = NumberField {
    name: "temperatureImpact",
    pointers: &[
        "/environmentalFactors/temperatureImpact",
        "/prediction/environmentalFactors/temperatureImpact",
        "/prediction/environmental_factors/temperature_impact",
        "/environmental_factors/temperature_impact",
        "/factors/temperature",
    ],
    default: 0.5,
};

/// Contribution of humidity.
pub const HUMIDITY_IMPACT: NumberField = NumberField {
    name: "humidityImpact",
    pointers: &[
        "/environmentalFactors/humidityImpact",
        "/prediction/environmentalFactors/humidityImpact",
        "/prediction/environmental_factors/humidity_impact",
        "/environmental_factors/humidity_impact",
        "/factors/humidity",
    ],
    default: 0.5,
};

/// Contribution of rainfall.
pub const RAINFALL_IMPACT: NumberField = NumberField {
    name: "rainfallImpact",
    pointers: &[
        "/environmentalFactors/rainfallImpact",
        "/prediction/environmentalFactors/rainfallImpact",
        "/prediction/environmental_factors/rainfall_impact",
        "/environmental_factors/rainfall_impact",
        "/factors/rainfall",
    ],
    default: 0.5,
};

/// Contribution of population density.
pub const POPULATION_DENSITY_IMPACT: NumberField = NumberField {
    name: "populationDensityImpact",
    pointers: &[
        "/environmentalFactors/populationDensityImpact",
        "/prediction/environmentalFactors/populationDensityImpact",
        "/prediction/environmental_factors/population_density_impact",
        "/environmental_factors/population_density_impact",
        "/factors/population_density",
    ],
    default: 0.5,
};

/// Risk level label.
pub const RISK_LEVEL: &[&str] = &[
    "/riskLevel",
    "/prediction/riskLevel",
    "/prediction/risk_level",
    "/risk_level",
    "/risk",
];

/// Preventive measures as a string list.
pub const RECOMMENDATIONS: &[&str] = &[
    "/recommendations",
    "/prediction/recommendations",
    "/preventive_measures",
];

/// Coalesces a backend prediction body into a [`PredictionResult`].
///
/// Every field resolves to something: an unrecognized risk level is
/// derived from the probability, and missing recommendations come from
/// the level.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn normalize(body: &Value, now: DateTime<Utc>) -> PredictionResult {
    let outbreak_probability = OUTBREAK_PROBABILITY.resolve_fraction(body);

    let risk_level = first_str(body, RISK_LEVEL)
        .and_then(|s| {
            RiskLevel::from_str(s)
                .inspect_err(|_| log::debug!("Unrecognized risk level '{s}'"))
                .ok()
        })
        .unwrap_or_else(|| level_for_probability(outbreak_probability));

    let recommendations =
        first_string_list(body, RECOMMENDATIONS).unwrap_or_else(|| recommendations_for(risk_level));

    PredictionResult {
        outbreak_probability,
        risk_level,
        predicted_cases: PREDICTED_CASES.resolve(body).max(0.0).floor() as u32,
        confidence: CONFIDENCE.resolve_fraction(body),
        environmental_factors: EnvironmentalFactors {
            temperature_impact: TEMPERATURE_IMPACT.resolve_fraction(body),
            humidity_impact: HUMIDITY_IMPACT.resolve_fraction(body),
            rainfall_impact: RAINFALL_IMPACT.resolve_fraction(body),
            population_density_impact: POPULATION_DENSITY_IMPACT.resolve_fraction(body),
        },
        recommendations,
        source: PredictionSource::Backend,
        timestamp: now,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn reads_current_camel_case_shape() {
        let body = json!({
            "outbreakProbability": 0.72,
            "riskLevel": "High",
            "predictedCases": 140,
            "confidence": 0.91,
            "environmentalFactors": {
                "temperatureImpact": 0.8,
                "humidityImpact": 0.7,
                "rainfallImpact": 0.6,
                "populationDensityImpact": 0.4
            },
            "recommendations": ["Drain standing water"]
        });
        let result = normalize(&body, Utc::now());

        assert!(close(result.outbreak_probability, 0.72));
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.predicted_cases, 140);
        assert!(close(result.confidence, 0.91));
        assert!(close(result.environmental_factors.population_density_impact, 0.4));
        assert_eq!(result.recommendations, vec!["Drain standing water"]);
        assert_eq!(result.source, PredictionSource::Backend);
    }

    #[test]
    fn reads_nested_snake_case_shape() {
        let body = json!({
            "prediction": {
                "outbreak_probability": 0.3,
                "risk_level": "low_risk",
                "predicted_cases": 12.7,
                "confidence": 0.6,
                "environmental_factors": { "humidity_impact": 0.2 }
            }
        });
        let result = normalize(&body, Utc::now());

        assert!(close(result.outbreak_probability, 0.3));
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.predicted_cases, 12);
        assert!(close(result.environmental_factors.humidity_impact, 0.2));
        assert!(close(result.environmental_factors.temperature_impact, 0.5));
    }

    #[test]
    fn camel_case_wins_over_legacy() {
        let body = json!({
            "probability": 0.1,
            "outbreak_probability": 0.2,
            "outbreakProbability": 0.9
        });
        let result = normalize(&body, Utc::now());
        assert!(close(result.outbreak_probability, 0.9));
        assert_eq!(result.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn empty_body_takes_defaults() {
        let result = normalize(&json!({}), Utc::now());

        assert!(close(result.outbreak_probability, 0.5));
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(result.predicted_cases, 85);
        assert!(close(result.confidence, 0.85));
        assert!(close(result.environmental_factors.rainfall_impact, 0.5));
        assert_eq!(result.recommendations, recommendations_for(RiskLevel::Medium));
    }

    #[test]
    fn percentages_are_scaled() {
        let body = json!({ "probability": 85, "confidence": "92" });
        let result = normalize(&body, Utc::now());
        assert!(close(result.outbreak_probability, 0.85));
        assert!(close(result.confidence, 0.92));
        assert_eq!(result.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn unknown_risk_level_is_derived_from_probability() {
        let body = json!({ "outbreakProbability": 0.65, "riskLevel": "apocalyptic" });
        assert_eq!(normalize(&body, Utc::now()).risk_level, RiskLevel::High);
    }

    #[test]
    fn negative_cases_clamp_to_zero() {
        let body = json!({ "predictedCases": -4 });
        assert_eq!(normalize(&body, Utc::now()).predicted_cases, 0);
    }
}
