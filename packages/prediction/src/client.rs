//! The prediction client.

use std::sync::Arc;

use chrono::Utc;
use dengue_watch_prediction_models::{PredictionRequest, PredictionResult};
use dengue_watch_transport::{HttpRequest, HttpTransport, Outcome, attempt_or_degrade, join_url};
use serde_json::Value;

use crate::{PredictionError, normalize, simulate};

/// Liveness probe, relative to the backend base URL.
pub const HEALTH_PATH: &str = "health";
/// Prediction endpoint for requests that carry weather.
pub const PREDICT_PATH: &str = "predict";
/// Prediction endpoint that looks up live weather server-side.
pub const LIVE_WEATHER_PATH: &str = "predict/live-weather";

/// `status` values that mean the backend is up but not serving.
const UNHEALTHY_STATUSES: &[&str] = &["error", "unhealthy", "down", "fail", "failed"];

/// Result of a successful `/health` probe.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    /// The backend's reported `status` string.
    pub status: String,
    /// The full probe body.
    pub body: Value,
}

/// Outbreak prediction client that falls back to a local simulation.
pub struct PredictionClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl PredictionClient {
    /// Creates a client for the backend at `base_url`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probes `GET /health`.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::Transport`] if the probe fails or
    /// returns non-2xx, and [`PredictionError::Unhealthy`] if the body
    /// lacks a string `status` or reports a failing one.
    pub async fn check_health(&self) -> Result<HealthStatus, PredictionError> {
        let url = join_url(&self.base_url, HEALTH_PATH);
        let body = self.transport.send(HttpRequest::get(url)).await?.success_json()?;

        let Some(status) = body.get("status").and_then(Value::as_str) else {
            return Err(PredictionError::Unhealthy {
                status: "missing status".to_string(),
            });
        };

        if UNHEALTHY_STATUSES
            .iter()
            .any(|s| s.eq_ignore_ascii_case(status.trim()))
        {
            return Err(PredictionError::Unhealthy {
                status: status.to_string(),
            });
        }

        Ok(HealthStatus {
            status: status.to_string(),
            body,
        })
    }

    /// Returns an outbreak prediction for `request`.
    ///
    /// Never fails: if the backend is unhealthy or errors, the result is
    /// simulated locally (see [`PredictionResult::is_simulated`]).
    pub async fn predict_outbreak(&self, request: &PredictionRequest) -> PredictionResult {
        self.predict_outbreak_outcome(request).await.into_value()
    }

    /// Like [`Self::predict_outbreak`], but reports whether the result was
    /// simulated and why.
    pub async fn predict_outbreak_outcome(
        &self,
        request: &PredictionRequest,
    ) -> Outcome<PredictionResult> {
        attempt_or_degrade(
            "outbreak prediction",
            self.request_prediction(request),
            || simulate::simulate(request, Utc::now()),
        )
        .await
    }

    async fn request_prediction(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionError> {
        let health = self.check_health().await?;
        log::debug!("Prediction backend healthy: {}", health.status);

        let path = if request.has_weather() {
            PREDICT_PATH
        } else {
            LIVE_WEATHER_PATH
        };
        let url = join_url(&self.base_url, path);
        let payload = serde_json::to_value(request)?;

        let body = self
            .transport
            .send(HttpRequest::post_json(url, payload))
            .await?
            .success_json()?;

        log::info!("Prediction for '{}' from backend", request.location);
        Ok(normalize::normalize(&body, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use dengue_watch_prediction_models::PredictionSource;
    use dengue_watch_risk::RiskLevel;
    use dengue_watch_transport::RequestBody;
    use dengue_watch_transport::mock::{MockReply, MockTransport};
    use serde_json::json;

    use super::*;

    const BASE: &str = "http://backend.test";

    fn healthy() -> MockReply {
        MockReply::json(200, &json!({ "status": "healthy", "model_loaded": true }))
    }

    fn client(transport: &Arc<MockTransport>) -> PredictionClient {
        PredictionClient::new(transport.clone(), BASE)
    }

    fn dhaka() -> PredictionRequest {
        PredictionRequest::new("Dhaka", "Dhaka Division").with_weather(32.0, 80.0, 10.0)
    }

    #[tokio::test]
    async fn failing_probe_skips_prediction_endpoint() {
        let transport = Arc::new(
            MockTransport::new()
                .on_get("/health", MockReply::fail("connection refused"))
                .on_post("/predict", MockReply::json(200, &json!({}))),
        );

        let outcome = client(&transport).predict_outbreak_outcome(&dhaka()).await;

        assert!(outcome.is_degraded());
        assert_eq!(outcome.value().source, PredictionSource::Simulated);
        assert_eq!(transport.calls("/health"), 1);
        assert_eq!(transport.calls("/predict"), 0);
    }

    #[tokio::test]
    async fn failing_backend_simulates_critical() {
        let transport = Arc::new(
            MockTransport::new()
                .on_get("/health", healthy())
                .on_post("/predict", MockReply::text(500, "Internal Server Error")),
        );

        let result = client(&transport).predict_outbreak(&dhaka()).await;

        assert_eq!(result.source, PredictionSource::Simulated);
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert!((result.outbreak_probability - 0.8).abs() < 1e-9);
        assert_eq!(result.predicted_cases, 120);
        assert_eq!(transport.calls("/predict"), 1);
    }

    #[tokio::test]
    async fn healthy_backend_is_normalized() {
        let transport = Arc::new(
            MockTransport::new().on_get("/health", healthy()).on_post(
                "/predict",
                MockReply::json(
                    200,
                    &json!({ "prediction": { "outbreak_probability": 0.42, "predicted_cases": 30 } }),
                ),
            ),
        );

        let outcome = client(&transport).predict_outbreak_outcome(&dhaka()).await;

        assert!(!outcome.is_degraded());
        let result = outcome.into_value();
        assert_eq!(result.source, PredictionSource::Backend);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(result.predicted_cases, 30);
    }

    #[tokio::test]
    async fn request_body_carries_weather() {
        let transport = Arc::new(
            MockTransport::new()
                .on_get("/health", healthy())
                .on_post("/predict", MockReply::json(200, &json!({}))),
        );

        client(&transport).predict_outbreak(&dhaka()).await;

        let predict = transport
            .requests()
            .into_iter()
            .find(|r| r.url.ends_with("/predict"))
            .unwrap();
        let RequestBody::Json(body) = predict.body else {
            panic!("expected a JSON body");
        };
        assert_eq!(body["location"], "Dhaka");
        assert_eq!(body["temperature"], 32.0);
        assert!(body.get("wind_speed").is_none());
    }

    #[tokio::test]
    async fn request_without_weather_uses_live_endpoint() {
        let transport = Arc::new(
            MockTransport::new()
                .on_get("/health", healthy())
                .on_post("/predict/live-weather", MockReply::json(200, &json!({}))),
        );

        let result = client(&transport)
            .predict_outbreak(&PredictionRequest::new("Sylhet", "Sylhet Division"))
            .await;

        assert_eq!(result.source, PredictionSource::Backend);
        assert_eq!(transport.calls("/predict/live-weather"), 1);
    }

    #[tokio::test]
    async fn embedded_error_simulates() {
        let transport = Arc::new(
            MockTransport::new().on_get("/health", healthy()).on_post(
                "/predict",
                MockReply::json(200, &json!({ "error": "model not loaded" })),
            ),
        );

        let outcome = client(&transport).predict_outbreak_outcome(&dhaka()).await;

        assert!(outcome.is_degraded());
        assert!(outcome.reason().unwrap().contains("model not loaded"));
    }

    #[tokio::test]
    async fn blank_error_field_keeps_backend_result() {
        let transport = Arc::new(
            MockTransport::new().on_get("/health", healthy()).on_post(
                "/predict",
                MockReply::json(200, &json!({ "outbreakProbability": 0.3, "error": "" })),
            ),
        );

        let outcome = client(&transport).predict_outbreak_outcome(&dhaka()).await;

        assert!(!outcome.is_degraded());
        let result = outcome.into_value();
        assert_eq!(result.source, PredictionSource::Backend);
        assert!((result.outbreak_probability - 0.3).abs() < 1e-9);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[tokio::test]
    async fn unhealthy_status_is_an_error() {
        let transport = Arc::new(
            MockTransport::new().on_get("/health", MockReply::json(200, &json!({ "status": "Down" }))),
        );

        let err = client(&transport).check_health().await.unwrap_err();
        assert!(matches!(err, PredictionError::Unhealthy { .. }));
    }

    #[tokio::test]
    async fn health_without_status_is_an_error() {
        let transport =
            Arc::new(MockTransport::new().on_get("/health", MockReply::json(200, &json!({}))));

        assert!(client(&transport).check_health().await.is_err());
    }

    #[tokio::test]
    async fn healthy_status_is_reported() {
        let transport = Arc::new(MockTransport::new().on_get("/health", healthy()));

        let health = client(&transport).check_health().await.unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.body["model_loaded"], true);
    }
}
