//! Ordered field coalescing over JSON responses.
//!
//! Backends in the wild disagree on field names (`outbreakProbability`
//! vs `prediction.outbreak_probability` vs `probability`). Normalizers
//! describe each canonical field as an ordered list of JSON pointers plus
//! a default, and resolve it with one call. Adding a response variant is
//! a change to that list, not to the normalizer.

use serde_json::Value;

/// A numeric canonical field: candidate JSON pointers in precedence order
/// and the value used when none resolves.
#[derive(Debug, Clone, Copy)]
pub struct NumberField {
    /// Canonical field name, for logging.
    pub name: &'static str,
    /// JSON pointers tried in order (e.g. `"/prediction/confidence"`).
    pub pointers: &'static [&'static str],
    /// Value used when no pointer resolves to a number.
    pub default: f64,
}

impl NumberField {
    /// Resolves the field against `body`, falling back to the default.
    #[must_use]
    pub fn resolve(&self, body: &Value) -> f64 {
        first_f64(body, self.pointers).unwrap_or_else(|| {
            log::debug!("{} missing from response, using {}", self.name, self.default);
            self.default
        })
    }

    /// Like [`Self::resolve`], scaled into `[0, 1]` with [`unit_fraction`].
    #[must_use]
    pub fn resolve_fraction(&self, body: &Value) -> f64 {
        unit_fraction(self.resolve(body))
    }
}

/// Returns the first pointer that resolves to a non-null value.
#[must_use]
pub fn first_value<'a>(body: &'a Value, pointers: &[&str]) -> Option<&'a Value> {
    pointers
        .iter()
        .filter_map(|p| body.pointer(p))
        .find(|v| !v.is_null())
}

/// Returns the first pointer that resolves to a number or a numeric
/// string.
#[must_use]
pub fn first_f64(body: &Value, pointers: &[&str]) -> Option<f64> {
    pointers
        .iter()
        .filter_map(|p| body.pointer(p))
        .find_map(as_f64_lenient)
}

/// Returns the first pointer that resolves to a non-empty string.
#[must_use]
pub fn first_str<'a>(body: &'a Value, pointers: &[&str]) -> Option<&'a str> {
    pointers
        .iter()
        .filter_map(|p| body.pointer(p))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Returns the first pointer that resolves to a non-empty array of
/// strings. Non-string elements are skipped.
#[must_use]
pub fn first_string_list(body: &Value, pointers: &[&str]) -> Option<Vec<String>> {
    pointers
        .iter()
        .filter_map(|p| body.pointer(p))
        .filter_map(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .find(|items| !items.is_empty())
}

/// Reads a number, accepting numeric strings such as `"0.82"`.
#[must_use]
pub fn as_f64_lenient(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Scales a probability-like value into `[0, 1]`.
///
/// Values in `(1, 100]` are treated as percentages. Anything else is
/// clamped.
#[must_use]
pub fn unit_fraction(value: f64) -> f64 {
    if value > 1.0 && value <= 100.0 {
        value / 100.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Detects an error reported inside an otherwise successful payload.
///
/// Recognizes a non-empty `error` field, `"success": false`, and
/// `"status": "error"`. `null`, `false`, blank strings and empty
/// containers in `error` are not errors. Returns the best available
/// message.
#[must_use]
pub fn embedded_error(body: &Value) -> Option<String> {
    match body.get("error") {
        None | Some(Value::Null | Value::Bool(false)) => {}
        Some(Value::String(s)) if s.trim().is_empty() => {}
        Some(Value::Object(o)) if o.is_empty() => {}
        Some(Value::Array(a)) if a.is_empty() => {}
        Some(Value::String(s)) => return Some(s.trim().to_string()),
        Some(err @ Value::Object(_)) => {
            let message = first_str(err, &["/message", "/info", "/detail", "/type"])
                .map_or_else(|| err.to_string(), String::from);
            return Some(message);
        }
        Some(other) => return Some(other.to_string()),
    }

    let failed = body.get("success") == Some(&Value::Bool(false))
        || body
            .get("status")
            .and_then(Value::as_str)
            .is_some_and(|s| s.eq_ignore_ascii_case("error"));

    failed.then(|| {
        first_str(body, &["/message", "/detail"])
            .unwrap_or("request reported failure")
            .to_string()
    })
}
