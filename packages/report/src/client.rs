//! The report submission client.

use std::sync::Arc;

use chrono::Utc;
use dengue_watch_report_models::{AnalysisResult, ImageUpload, ReportSubmission};
use dengue_watch_transport::fields::first_str;
use dengue_watch_transport::{
    FilePart, HttpRequest, HttpResponse, HttpTransport, MultipartForm, join_url,
};
use serde_json::Value;

use crate::{ReportError, normalize};

/// Submission endpoint, relative to the backend base URL.
pub const REPORT_PATH: &str = "api/v1/report";

/// Description sent with image-only analysis requests.
pub const IMAGE_ANALYSIS_DESCRIPTION: &str = "Image submitted for breeding site analysis";

const DETAIL: &[&str] = &["/detail", "/detail/0/msg", "/message", "/error"];

/// Submits citizen reports and normalizes the analysis.
pub struct ReportClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl ReportClient {
    /// Creates a client for the backend at `base_url`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Submits `submission` and returns the backend's analysis.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Rejected`] if the backend answers non-2xx,
    /// and [`ReportError::Transport`] if the request fails or a 2xx body is
    /// not JSON or reports an error.
    pub async fn submit_report(
        &self,
        submission: &ReportSubmission,
    ) -> Result<AnalysisResult, ReportError> {
        let url = join_url(&self.base_url, REPORT_PATH);
        let response = self
            .transport
            .send(HttpRequest::post_multipart(url, build_form(submission)))
            .await?;

        if !response.is_success() {
            let detail = error_detail(&response);
            log::warn!(
                "Report for '{}' rejected with HTTP {}: {detail}",
                submission.location,
                response.status
            );
            return Err(ReportError::Rejected {
                status: response.status,
                detail,
            });
        }

        let body = response.success_json()?;
        let result = normalize::normalize(&body, Utc::now());
        log::info!(
            "Report {} for '{}' classified as {}",
            result.report_id,
            submission.location,
            result.category
        );
        Ok(result)
    }

    /// Submits an image for analysis without a written description.
    ///
    /// # Errors
    ///
    /// See [`Self::submit_report`].
    pub async fn analyze_image(
        &self,
        image: ImageUpload,
        location: &str,
    ) -> Result<AnalysisResult, ReportError> {
        let submission =
            ReportSubmission::new(location, IMAGE_ANALYSIS_DESCRIPTION).with_image(image);
        self.submit_report(&submission).await
    }
}

fn build_form(submission: &ReportSubmission) -> MultipartForm {
    let form = MultipartForm::new()
        .text("location", submission.location.as_str())
        .text("description", submission.description.as_str())
        .text_opt("latitude", submission.latitude.map(|v| v.to_string()))
        .text_opt("longitude", submission.longitude.map(|v| v.to_string()))
        .text_opt("reporter_contact", submission.contact.as_deref());

    match &submission.image {
        Some(image) => form.file(FilePart {
            field: "image".to_string(),
            file_name: image.file_name.clone(),
            content_type: image.content_type.clone(),
            bytes: image.bytes.clone(),
        }),
        None => form,
    }
}

/// Best human-readable reason from an error response: the JSON `detail`
/// (a string or the first validation message), then `message`, then
/// `error`, and finally the HTTP status text.
#[must_use]
pub fn error_detail(response: &HttpResponse) -> String {
    let body = response.json().unwrap_or(Value::Null);
    first_str(&body, DETAIL)
        .map(String::from)
        .unwrap_or_else(|| {
            if response.status_text.is_empty() {
                format!("HTTP {}", response.status)
            } else {
                response.status_text.clone()
            }
        })
}
