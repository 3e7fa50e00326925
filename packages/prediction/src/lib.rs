#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Outbreak prediction client for dengue-watch.
//!
//! Every prediction is gated on a `GET /health` probe. A healthy backend
//! is asked via `POST /predict` (or `/predict/live-weather` when the
//! request carries no weather), and its response is coalesced into a
//! [`PredictionResult`] by [`normalize`]. Any failure along the way yields
//! a locally [`simulate`]d result tagged
//! [`PredictionSource::Simulated`] instead of an error.

pub mod client;
pub mod normalize;
pub mod simulate;

pub use client::{HealthStatus, PredictionClient};
pub use dengue_watch_prediction_models::{
    EnvironmentalFactors, PredictionRequest, PredictionResult, PredictionSource,
};

use dengue_watch_transport::TransportError;
use thiserror::Error;

/// Errors from the prediction backend.
///
/// [`PredictionClient::predict_outbreak`] absorbs these into a simulated
/// result; only [`PredictionClient::check_health`] returns them.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// The probe or prediction request failed, returned non-2xx, or
    /// carried an error payload.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request could not be serialized.
    #[error("Failed to encode prediction request: {0}")]
    Encode(#[from] serde_json::Error),

    /// The health probe answered but did not report a serving backend.
    #[error("Prediction backend unhealthy: {status}")]
    Unhealthy {
        /// The reported status, or a description of what was missing.
        status: String,
    },
}
