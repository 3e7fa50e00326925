//! Locally simulated predictions.
//!
//! A deliberately crude stand-in for the backend model, used only when
//! the backend is unreachable or erroring. Each weather variable maps to
//! a fixed impact by a single threshold; the outbreak probability is
//! their mean.

use chrono::{DateTime, Utc};
use dengue_watch_prediction_models::{
    EnvironmentalFactors, PredictionRequest, PredictionResult, PredictionSource,
};
use dengue_watch_risk::{level_for_probability, recommendations_for};

/// Confidence reported for every simulated result.
pub const SIMULATED_CONFIDENCE: f64 = 0.75;
/// Predicted cases per unit of outbreak probability.
pub const CASES_PER_PROBABILITY: f64 = 150.0;
/// Population density impact, which the simulation cannot estimate.
pub const POPULATION_DENSITY_IMPACT: f64 = 0.5;

/// Temperature assumed when the request has none (°C).
pub const DEFAULT_TEMPERATURE: f64 = 31.0;
/// Humidity assumed when the request has none (%).
pub const DEFAULT_HUMIDITY: f64 = 75.0;
/// Rainfall assumed when the request has none (mm).
pub const DEFAULT_RAINFALL: f64 = 10.0;

/// Simulates a prediction for `request`, filling absent weather fields
/// with regional defaults.
#[must_use]
pub fn simulate(request: &PredictionRequest, now: DateTime<Utc>) -> PredictionResult {
    simulate_from(
        request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        request.humidity.unwrap_or(DEFAULT_HUMIDITY),
        request.rainfall.unwrap_or(DEFAULT_RAINFALL),
        now,
    )
}

/// Simulates a prediction from explicit weather values.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn simulate_from(
    temperature: f64,
    humidity: f64,
    rainfall: f64,
    now: DateTime<Utc>,
) -> PredictionResult {
    let temperature_impact = if temperature > 28.0 { 0.8 } else { 0.5 };
    let humidity_impact = if humidity > 70.0 { 0.9 } else { 0.6 };
    let rainfall_impact = if rainfall > 5.0 { 0.7 } else { 0.4 };

    let probability = (temperature_impact + humidity_impact + rainfall_impact) / 3.0;
    let risk_level = level_for_probability(probability);

    PredictionResult {
        outbreak_probability: probability,
        risk_level,
        predicted_cases: (probability * CASES_PER_PROBABILITY).floor() as u32,
        confidence: SIMULATED_CONFIDENCE,
        environmental_factors: EnvironmentalFactors {
            temperature_impact,
            humidity_impact,
            rainfall_impact,
            population_density_impact: POPULATION_DENSITY_IMPACT,
        },
        recommendations: recommendations_for(risk_level),
        source: PredictionSource::Simulated,
        timestamp: now,
    }
}

#[cfg(test)]
mod tests {
    use dengue_watch_risk::RiskLevel;

    use super::*;

    #[test]
    fn hot_humid_wet_is_critical() {
        let result = simulate_from(32.0, 80.0, 10.0, Utc::now());
        assert!((result.outbreak_probability - 0.8).abs() < 1e-9);
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert_eq!(result.predicted_cases, 120);
        assert!((result.confidence - SIMULATED_CONFIDENCE).abs() < f64::EPSILON);
        assert!(result.is_simulated());
    }

    #[test]
    fn cool_dry_is_medium() {
        let result = simulate_from(22.0, 50.0, 0.0, Utc::now());
        assert!((result.outbreak_probability - 0.5).abs() < 1e-9);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(result.predicted_cases, 75);
    }

    #[test]
    fn thresholds_are_strict() {
        let result = simulate_from(28.0, 70.0, 5.0, Utc::now());
        let factors = result.environmental_factors;
        assert!((factors.temperature_impact - 0.5).abs() < f64::EPSILON);
        assert!((factors.humidity_impact - 0.6).abs() < f64::EPSILON);
        assert!((factors.rainfall_impact - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_weather_uses_regional_defaults() {
        let request = PredictionRequest::new("Dhaka", "Dhaka Division");
        let from_request = simulate(&request, Utc::now());
        let explicit = simulate_from(
            DEFAULT_TEMPERATURE,
            DEFAULT_HUMIDITY,
            DEFAULT_RAINFALL,
            from_request.timestamp,
        );
        assert_eq!(from_request, explicit);
    }

    #[test]
    fn result_is_fully_populated() {
        let result = simulate_from(f64::NAN, f64::NAN, f64::NAN, Utc::now());
        assert!(!result.recommendations.is_empty());
        assert!((0.0..=1.0).contains(&result.outbreak_probability));
        assert!(
            (result.environmental_factors.population_density_impact - POPULATION_DENSITY_IMPACT)
                .abs()
                < f64::EPSILON
        );
    }
}
