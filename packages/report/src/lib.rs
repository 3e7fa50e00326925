#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Citizen breeding-site report client for dengue-watch.
//!
//! Reports are posted as `multipart/form-data` to `/api/v1/report`. Unlike
//! weather and prediction lookups there is no local fallback: a rejected
//! submission is returned to the caller as a [`ReportError`] carrying the
//! backend's own explanation. Accepted submissions are coalesced into an
//! [`AnalysisResult`] by [`normalize`].

pub mod client;
pub mod normalize;

pub use client::ReportClient;
pub use dengue_watch_report_models::{
    AnalysisResult, ImageUpload, ReportCategory, ReportSubmission, Rewards, WeatherSnapshot,
};

use dengue_watch_transport::TransportError;
use thiserror::Error;

/// Errors from report submission.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The request failed, or a 2xx body was not JSON or reported an
    /// error.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The backend answered with a non-2xx status.
    #[error("Report rejected (HTTP {status}): {detail}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Backend-provided reason, or the HTTP status text.
        detail: String,
    },
}
