//! Analysis response normalization.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDateTime, Utc};
use dengue_watch_report_models::{AnalysisResult, ReportCategory, Rewards, WeatherSnapshot};
use dengue_watch_risk::{RiskLevel, recommendations_for};
use dengue_watch_transport::fields::{
    NumberField, first_f64, first_str, first_string_list, first_value,
};
use serde_json::Value;
use uuid::Uuid;

/// Category vocabularies, most specific first. The first table with a
/// term contained in the backend's label wins, so `not_breeding` is
/// never read as `breeding`.
const CATEGORY_VOCABULARY: &[(ReportCategory, &[&str])] = &[
    (ReportCategory::Invalid, &["invalid"]),
    (
        ReportCategory::NotHotspot,
        &[
            "not_hotspot",
            "nothotspot",
            "not_breeding",
            "notbreeding",
            "low_risk",
            "clean",
            "safe",
        ],
    ),
    (ReportCategory::Potential, &["medium_risk", "potential"]),
    (
        ReportCategory::Hotspot,
        &["breeding", "high_risk", "critical", "hotspot"],
    ),
];

const CATEGORY: &[&str] = &[
    "/category",
    "/analysis/category",
    "/classification",
    "/prediction",
    "/label",
];

const CONFIDENCE: NumberField = NumberField {
    name: "confidence",
    pointers: &[
        "/confidence",
        "/analysis/confidence",
        "/confidence_score",
        "/score",
    ],
    default: 0.85,
};

const RISK_LEVEL: &[&str] = &["/riskLevel", "/risk_level", "/analysis/risk_level"];

const RECOMMENDATIONS: &[&str] = &[
    "/recommendations",
    "/analysis/recommendations",
    "/preventive_measures",
];

const POINTS: &[&str] = &["/rewards/points", "/points_earned"];
const XP: &[&str] = &["/rewards/xp", "/xp_earned"];

const WEATHER: &[&str] = &["/weather", "/weather_data", "/weatherSnapshot"];

const REPORT_ID: &[&str] = &["/report_id", "/reportId", "/id"];
const TIMESTAMP: &[&str] = &["/timestamp", "/created_at"];

/// Classifies a backend label by case-insensitive substring match.
///
/// Unrecognized labels are treated as [`ReportCategory::Hotspot`]: a
/// false alarm costs an inspection, a missed site costs an outbreak.
#[must_use]
pub fn classify(label: &str) -> ReportCategory {
    let label = label.trim().to_lowercase().replace([' ', '-'], "_");
    CATEGORY_VOCABULARY
        .iter()
        .find(|(_, terms)| terms.iter().any(|t| label.contains(t)))
        .map_or_else(
            || {
                log::debug!("Unrecognized report category '{label}', treating as hotspot");
                ReportCategory::Hotspot
            },
            |(category, _)| *category,
        )
}

/// Coalesces a backend analysis body into an [`AnalysisResult`].
#[must_use]
pub fn normalize(body: &Value, now: DateTime<Utc>) -> AnalysisResult {
    let category = first_str(body, CATEGORY).map_or(ReportCategory::Hotspot, classify);

    let risk_level = first_str(body, RISK_LEVEL)
        .and_then(|s| RiskLevel::from_str(s).ok())
        .unwrap_or_else(|| category.default_risk_level());

    AnalysisResult {
        category,
        confidence: CONFIDENCE.resolve_fraction(body),
        risk_level,
        recommendations: first_string_list(body, RECOMMENDATIONS)
            .unwrap_or_else(|| recommendations_for(risk_level)),
        rewards: rewards(body),
        weather_snapshot: weather_snapshot(body),
        timestamp: first_str(body, TIMESTAMP)
            .and_then(parse_timestamp)
            .unwrap_or(now),
        report_id: report_id(body),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rewards(body: &Value) -> Rewards {
    let defaults = Rewards::default();
    let count = |pointers: &[&str], default: u32| {
        first_f64(body, pointers).map_or(default, |v| v.max(0.0).min(f64::from(u32::MAX)) as u32)
    };
    Rewards {
        points: count(POINTS, defaults.points),
        xp: count(XP, defaults.xp),
    }
}

fn weather_snapshot(body: &Value) -> Option<WeatherSnapshot> {
    let weather = first_value(body, WEATHER).filter(|v| v.is_object())?;
    let snapshot = WeatherSnapshot {
        temperature: first_f64(weather, &["/temperature", "/temp"]),
        humidity: first_f64(weather, &["/humidity"]),
        rainfall_mm: first_f64(weather, &["/rainfall", "/rainfall_mm", "/precip"]),
        wind_speed_kmh: first_f64(weather, &["/wind_speed", "/windSpeed", "/wind_speed_kmh"]),
        conditions: first_str(weather, &["/conditions", "/description", "/weather_descriptions/0"])
            .map(String::from),
    };
    (!snapshot.is_empty()).then_some(snapshot)
}

fn report_id(body: &Value) -> String {
    match first_value(body, REPORT_ID) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => Uuid::new_v4().to_string(),
    }
}

/// Parses RFC 3339, or a naive ISO timestamp taken as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
