//! Weatherstack current-conditions client.
//!
//! Primary provider. Reports temperature in °C, humidity in percent,
//! precipitation in mm and wind in km/h when `units=m`. Errors such as a
//! bad access key come back as HTTP 200 with `"success": false`, which
//! [`dengue_watch_transport::HttpResponse::success_json`] rejects before
//! parsing.
//!
//! See <https://weatherstack.com/documentation>

use chrono::{DateTime, Utc};
use dengue_watch_transport::{HttpRequest, fields, join_url};
use dengue_watch_weather_models::{DataQuality, WeatherReading};

use crate::WeatherError;

/// Builds the `GET /current` request for a free-form location.
#[must_use]
pub fn current_request(base_url: &str, access_key: &str, location: &str) -> HttpRequest {
    HttpRequest::get(join_url(base_url, "current"))
        .query("access_key", access_key)
        .query("query", location)
        .query("units", "m")
}

/// Parses a Weatherstack `current` response.
///
/// Temperature and humidity are required; precipitation and wind default
/// to zero when absent.
///
/// # Errors
///
/// Returns [`WeatherError::Parse`] if the `current` block or a required
/// field is missing.
pub fn parse_response(
    body: &serde_json::Value,
    provider_id: &str,
    now: DateTime<Utc>,
) -> Result<WeatherReading, WeatherError> {
    let current = body.get("current").ok_or_else(|| WeatherError::Parse {
        message: "Weatherstack response has no current block".to_string(),
    })?;

    let temperature =
        fields::first_f64(current, &["/temperature"]).ok_or_else(|| WeatherError::Parse {
            message: "Missing temperature in Weatherstack response".to_string(),
        })?;
    let humidity =
        fields::first_f64(current, &["/humidity"]).ok_or_else(|| WeatherError::Parse {
            message: "Missing humidity in Weatherstack response".to_string(),
        })?;
    let rainfall_mm = fields::first_f64(current, &["/precip"]).unwrap_or(0.0);
    let wind_speed_kmh = fields::first_f64(current, &["/wind_speed"]).unwrap_or(0.0);

    let observed_at = body
        .pointer("/location/localtime_epoch")
        .and_then(serde_json::Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(now);

    Ok(WeatherReading {
        temperature,
        humidity,
        rainfall_mm,
        wind_speed_kmh,
        observed_at,
        provider: Some(provider_id.to_string()),
        quality: DataQuality::Observed,
    })
}
