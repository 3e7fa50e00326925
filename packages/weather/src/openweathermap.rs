//! `OpenWeatherMap` forecast client.
//!
//! Secondary provider, used only when Weatherstack fails. The 3-hour
//! forecast's first slot stands in for current conditions. Wind arrives
//! in m/s and is converted to km/h; rain is the slot's `3h` accumulation.
//!
//! See <https://openweathermap.org/forecast5>

use chrono::{DateTime, Utc};
use dengue_watch_transport::{HttpRequest, join_url};
use dengue_watch_weather_models::{DataQuality, WeatherReading};
use serde::Deserialize;

use crate::WeatherError;

const MS_TO_KMH: f64 = 3.6;

#[derive(Deserialize)]
struct ForecastResponse {
    cod: Option<serde_json::Value>,
    message: Option<serde_json::Value>,
    #[serde(default)]
    list: Vec<ForecastSlot>,
}

#[derive(Deserialize)]
struct ForecastSlot {
    dt: Option<i64>,
    main: SlotMain,
    wind: Option<SlotWind>,
    rain: Option<SlotRain>,
}

#[derive(Deserialize)]
struct SlotMain {
    temp: f64,
    humidity: f64,
}

#[derive(Deserialize)]
struct SlotWind {
    speed: f64,
}

#[derive(Deserialize)]
struct SlotRain {
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

/// Builds the `GET /forecast` request for a free-form location.
#[must_use]
pub fn forecast_request(base_url: &str, api_key: &str, location: &str) -> HttpRequest {
    HttpRequest::get(join_url(base_url, "forecast"))
        .query("q", location)
        .query("appid", api_key)
        .query("units", "metric")
        .query("cnt", "1")
}

/// Parses an `OpenWeatherMap` forecast response into a reading.
///
/// # Errors
///
/// Returns [`WeatherError::Parse`] if the body does not match the
/// forecast schema, reports a non-200 `cod`, or has no slots.
pub fn parse_response(
    body: serde_json::Value,
    provider_id: &str,
    now: DateTime<Utc>,
) -> Result<WeatherReading, WeatherError> {
    let response: ForecastResponse =
        serde_json::from_value(body).map_err(|e| WeatherError::Parse {
            message: format!("Unexpected OpenWeatherMap forecast shape: {e}"),
        })?;

    if let Some(cod) = &response.cod {
        let code = cod.as_str().map_or_else(|| cod.to_string(), String::from);
        if code != "200" {
            let message = response
                .message
                .as_ref()
                .map_or_else(String::new, |m| {
                    m.as_str().map_or_else(|| m.to_string(), String::from)
                });
            return Err(WeatherError::Parse {
                message: format!("OpenWeatherMap returned cod {code}: {message}"),
            });
        }
    }

    let slot = response
        .list
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::Parse {
            message: "OpenWeatherMap forecast has no slots".to_string(),
        })?;

    Ok(WeatherReading {
        temperature: slot.main.temp,
        humidity: slot.main.humidity,
        rainfall_mm: slot.rain.and_then(|r| r.three_hour).unwrap_or(0.0),
        wind_speed_kmh: slot.wind.map_or(0.0, |w| w.speed * MS_TO_KMH),
        observed_at: slot
            .dt
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or(now),
        provider: Some(provider_id.to_string()),
        quality: DataQuality::Observed,
    })
}
