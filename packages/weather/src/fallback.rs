//! Estimated readings for when every provider fails.
//!
//! Values are drawn uniformly from a plausible range for the deployment
//! region and tagged [`DataQuality::Estimated`]. They are not
//! reproducible from call to call, only guaranteed to lie within the
//! range.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use dengue_watch_weather_models::{DataQuality, WeatherReading};
use rand::Rng;

/// Bounds for each estimated variable.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackRange {
    /// Temperature in °C.
    pub temperature: RangeInclusive<f64>,
    /// Relative humidity in percent.
    pub humidity: RangeInclusive<f64>,
    /// Rainfall in millimetres.
    pub rainfall_mm: RangeInclusive<f64>,
    /// Wind speed in km/h.
    pub wind_speed_kmh: RangeInclusive<f64>,
}

impl Default for FallbackRange {
    /// Monsoon-season conditions for the South Asian deployment region.
    fn default() -> Self {
        Self {
            temperature: 28.0..=34.0,
            humidity: 65.0..=85.0,
            rainfall_mm: 0.0..=20.0,
            wind_speed_kmh: 5.0..=20.0,
        }
    }
}

impl FallbackRange {
    /// Midpoint of every range, as a `(temperature, humidity, rainfall)`
    /// triple.
    #[must_use]
    pub fn midpoint(&self) -> (f64, f64, f64) {
        (
            midpoint(&self.temperature),
            midpoint(&self.humidity),
            midpoint(&self.rainfall_mm),
        )
    }
}

/// Generates an estimated reading using the thread-local RNG.
#[must_use]
pub fn estimate(range: &FallbackRange, now: DateTime<Utc>) -> WeatherReading {
    estimate_with(&mut rand::thread_rng(), range, now)
}

/// Generates an estimated reading using `rng`.
#[must_use]
pub fn estimate_with<R: Rng + ?Sized>(
    rng: &mut R,
    range: &FallbackRange,
    now: DateTime<Utc>,
) -> WeatherReading {
    WeatherReading {
        temperature: sample(rng, &range.temperature),
        humidity: sample(rng, &range.humidity),
        rainfall_mm: sample(rng, &range.rainfall_mm),
        wind_speed_kmh: sample(rng, &range.wind_speed_kmh),
        observed_at: now,
        provider: None,
        quality: DataQuality::Estimated,
    }
}

/// Draws from `range`, rounded to one decimal and kept inside the bounds.
/// Degenerate ranges yield their start.
fn sample<R: Rng + ?Sized>(rng: &mut R, range: &RangeInclusive<f64>) -> f64 {
    let (lo, hi) = (*range.start(), *range.end());
    if lo.partial_cmp(&hi) != Some(Ordering::Less) {
        return lo;
    }
    let value = rng.gen_range(lo..=hi);
    ((value * 10.0).round() / 10.0).clamp(lo, hi)
}

fn midpoint(range: &RangeInclusive<f64>) -> f64 {
    (range.start() + range.end()) / 2.0
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn estimates_stay_in_range() {
        let range = FallbackRange::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let reading = estimate_with(&mut rng, &range, Utc::now());
            assert!(range.temperature.contains(&reading.temperature));
            assert!(range.humidity.contains(&reading.humidity));
            assert!(range.rainfall_mm.contains(&reading.rainfall_mm));
            assert!(range.wind_speed_kmh.contains(&reading.wind_speed_kmh));
            assert!(reading.is_estimated());
            assert!(reading.provider.is_none());
        }
    }

    #[test]
    fn degenerate_range_yields_start() {
        let range = FallbackRange {
            temperature: 30.0..=30.0,
            humidity: 90.0..=10.0,
            ..FallbackRange::default()
        };
        let reading = estimate(&range, Utc::now());
        assert!((reading.temperature - 30.0).abs() < f64::EPSILON);
        assert!((reading.humidity - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn default_midpoint() {
        assert_eq!(FallbackRange::default().midpoint(), (31.0, 75.0, 10.0));
    }
}
