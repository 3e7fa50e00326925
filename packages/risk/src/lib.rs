#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Heuristic dengue breeding-risk scoring.
//!
//! Scores current weather against the thresholds at which *Aedes*
//! mosquitoes breed most successfully:
//!
//! | Variable    | Condition        | Points |
//! |-------------|------------------|--------|
//! | Temperature | 25–30 °C         | +3     |
//! | Temperature | 30–35 °C         | +2     |
//! | Temperature | > 35 °C          | +1     |
//! | Humidity    | ≥ 70 %           | +3     |
//! | Humidity    | 60–70 %          | +2     |
//! | Humidity    | < 50 %           | −1     |
//! | Rainfall    | > 100 mm         | +3     |
//! | Rainfall    | > 50 mm          | +2     |
//!
//! The summed score maps to a [`RiskLevel`]: ≥ 7 critical, ≥ 5 high,
//! ≥ 3 medium, otherwise low.
//!
//! The same module hosts the probability breakpoints and per-level
//! recommendations that the prediction and report clients fall back on,
//! so every locally derived result speaks the same heuristic.

pub use dengue_watch_risk_models::{RiskAssessment, RiskLevel};

/// Score at or above which conditions are [`RiskLevel::Critical`].
pub const CRITICAL_SCORE: i32 = 7;
/// Score at or above which conditions are [`RiskLevel::High`].
pub const HIGH_SCORE: i32 = 5;
/// Score at or above which conditions are [`RiskLevel::Medium`].
pub const MEDIUM_SCORE: i32 = 3;

/// Scores temperature (°C), relative humidity (%) and rainfall (mm) for
/// dengue breeding risk.
///
/// Total over all `f64` inputs: out-of-range or `NaN` values simply fail
/// to match any rule and contribute nothing.
#[must_use]
pub fn assess_risk(temperature: f64, humidity: f64, rainfall: f64) -> RiskAssessment {
    let mut score = 0;
    let mut reasons = Vec::new();

    if (25.0..=30.0).contains(&temperature) {
        score += 3;
        reasons.push(format!(
            "Temperature {temperature:.1}°C is in the optimal breeding range (25-30°C)"
        ));
    } else if temperature > 30.0 && temperature <= 35.0 {
        score += 2;
        reasons.push(format!(
            "Temperature {temperature:.1}°C is warm enough to sustain breeding"
        ));
    } else if temperature > 35.0 {
        score += 1;
        reasons.push(format!(
            "Temperature {temperature:.1}°C is extreme heat, which dampens mosquito activity"
        ));
    }

    if humidity >= 70.0 {
        score += 3;
        reasons.push(format!(
            "Humidity {humidity:.0}% favours mosquito survival and egg viability"
        ));
    } else if humidity >= 60.0 {
        score += 2;
        reasons.push(format!("Humidity {humidity:.0}% is moderately favourable"));
    } else if humidity < 50.0 {
        score -= 1;
        reasons.push(format!(
            "Humidity {humidity:.0}% is dry enough to shorten mosquito lifespan"
        ));
    }

    if rainfall > 100.0 {
        score += 3;
        reasons.push(format!(
            "Rainfall {rainfall:.1}mm leaves abundant standing water for breeding"
        ));
    } else if rainfall > 50.0 {
        score += 2;
        reasons.push(format!(
            "Rainfall {rainfall:.1}mm creates breeding sites in containers"
        ));
    }

    let level = level_for_score(score);
    log::trace!("assess_risk: t={temperature} h={humidity} r={rainfall} -> {level} ({score})");

    RiskAssessment {
        level,
        score,
        reasons,
        historical_context: historical_context(level).to_string(),
    }
}

/// Maps a summed rule score to a [`RiskLevel`].
#[must_use]
pub const fn level_for_score(score: i32) -> RiskLevel {
    if score >= CRITICAL_SCORE {
        RiskLevel::Critical
    } else if score >= HIGH_SCORE {
        RiskLevel::High
    } else if score >= MEDIUM_SCORE {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Maps an outbreak probability in `[0, 1]` to a [`RiskLevel`].
///
/// Breakpoints are strict: exactly `0.8` is [`RiskLevel::High`].
#[must_use]
pub fn level_for_probability(probability: f64) -> RiskLevel {
    if probability > 0.8 {
        RiskLevel::Critical
    } else if probability > 0.6 {
        RiskLevel::High
    } else if probability > 0.4 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Fixed narrative describing how past outbreaks looked at this level.
#[must_use]
pub const fn historical_context(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => {
            "Past outbreaks in the region followed weeks with these conditions; \
             case counts typically rise sharply within 2-3 weeks."
        }
        RiskLevel::High => {
            "Similar conditions have historically preceded localized case \
             clusters during the monsoon season."
        }
        RiskLevel::Medium => {
            "Conditions like these have produced sporadic cases in previous \
             years, mostly in densely populated wards."
        }
        RiskLevel::Low => {
            "Historically, few dengue cases have been recorded under these \
             conditions."
        }
    }
}

/// Preventive actions to show for a risk level, most urgent first.
#[must_use]
pub fn recommendations_for(level: RiskLevel) -> Vec<String> {
    let items: &[&str] = match level {
        RiskLevel::Critical => &[
            "Alert local health authorities and request fogging in the area",
            "Eliminate all standing water around homes daily",
            "Use mosquito repellent and wear long sleeves, especially at dawn and dusk",
            "Seek medical care immediately for fever with joint pain or rash",
        ],
        RiskLevel::High => &[
            "Empty and scrub water containers at least twice a week",
            "Install or repair window and door screens",
            "Use mosquito repellent during the day",
        ],
        RiskLevel::Medium => &[
            "Check for and remove stagnant water weekly",
            "Cover water storage containers",
        ],
        RiskLevel::Low => &["Continue routine checks for standing water"],
    };
    items.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimal_conditions_are_critical() {
        for temperature in [25.0, 27.5, 30.0] {
            for humidity in [70.0, 85.0, 100.0] {
                for rainfall in [100.5, 150.0, 400.0] {
                    let risk = assess_risk(temperature, humidity, rainfall);
                    assert_eq!(risk.level, RiskLevel::Critical);
                    assert!(risk.score >= CRITICAL_SCORE);
                }
            }
        }
    }

    #[test]
    fn reasons_follow_evaluation_order() {
        let risk = assess_risk(28.0, 75.0, 120.0);
        assert_eq!(risk.score, 9);
        assert_eq!(risk.reasons.len(), 3);
        assert!(risk.reasons[0].starts_with("Temperature"));
        assert!(risk.reasons[1].starts_with("Humidity"));
        assert!(risk.reasons[2].starts_with("Rainfall"));
    }

    #[test]
    fn temperature_bands() {
        assert_eq!(assess_risk(32.0, 55.0, 0.0).score, 2);
        assert_eq!(assess_risk(35.0, 55.0, 0.0).score, 2);
        assert_eq!(assess_risk(38.0, 55.0, 0.0).score, 1);
        assert_eq!(assess_risk(20.0, 55.0, 0.0).score, 0);
    }

    #[test]
    fn dry_air_subtracts_a_point() {
        let risk = assess_risk(20.0, 40.0, 0.0);
        assert_eq!(risk.score, -1);
        assert_eq!(risk.level, RiskLevel::Low);
        assert_eq!(risk.reasons.len(), 1);
    }

    #[test]
    fn rainfall_thresholds_are_strict() {
        assert_eq!(assess_risk(20.0, 55.0, 50.0).score, 0);
        assert_eq!(assess_risk(20.0, 55.0, 50.1).score, 2);
        assert_eq!(assess_risk(20.0, 55.0, 100.0).score, 2);
        assert_eq!(assess_risk(20.0, 55.0, 100.1).score, 3);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(level_for_score(7), RiskLevel::Critical);
        assert_eq!(level_for_score(6), RiskLevel::High);
        assert_eq!(level_for_score(5), RiskLevel::High);
        assert_eq!(level_for_score(4), RiskLevel::Medium);
        assert_eq!(level_for_score(3), RiskLevel::Medium);
        assert_eq!(level_for_score(2), RiskLevel::Low);
        assert_eq!(level_for_score(-1), RiskLevel::Low);
    }

    #[test]
    fn historical_context_depends_only_on_level() {
        let a = assess_risk(26.0, 72.0, 120.0);
        let b = assess_risk(32.0, 72.0, 60.0);
        assert_eq!(a.score, 9);
        assert_eq!(b.score, 7);
        assert_eq!(a.level, b.level);
        assert_eq!(a.historical_context, b.historical_context);
    }

    #[test]
    fn nonsensical_inputs_still_score() {
        let risk = assess_risk(f64::NAN, -10.0, f64::INFINITY);
        assert_eq!(risk.score, 2);
        assert_eq!(risk.level, RiskLevel::Low);

        let risk = assess_risk(f64::NAN, f64::NAN, f64::NAN);
        assert_eq!(risk.score, 0);
        assert!(risk.reasons.is_empty());
    }

    #[test]
    fn positive_scores_always_have_reasons() {
        for t in [-5.0, 10.0, 25.0, 31.0, 40.0] {
            for h in [-1.0, 45.0, 55.0, 65.0, 90.0] {
                for r in [0.0, 60.0, 150.0] {
                    let risk = assess_risk(t, h, r);
                    if risk.score > 0 {
                        assert!(!risk.reasons.is_empty());
                    }
                }
            }
        }
    }

    #[test]
    fn probability_breakpoints_are_strict() {
        assert_eq!(level_for_probability(0.81), RiskLevel::Critical);
        assert_eq!(level_for_probability(0.8), RiskLevel::High);
        assert_eq!(level_for_probability(0.6), RiskLevel::Medium);
        assert_eq!(level_for_probability(0.4), RiskLevel::Low);
        assert_eq!(level_for_probability(0.0), RiskLevel::Low);
    }

    #[test]
    fn every_level_has_recommendations() {
        for level in RiskLevel::ALL {
            assert!(!recommendations_for(*level).is_empty());
        }
    }
}
