#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP plumbing shared by the dengue-watch clients.
//!
//! Every client talks to the network through the [`HttpTransport`] trait
//! rather than holding a `reqwest::Client` directly. Production code uses
//! [`ReqwestTransport`]; tests use the scripted `MockTransport` behind the
//! `mock` feature, which records every request so call counts can be
//! asserted.
//!
//! The crate also carries the two policies the clients share:
//!
//! - [`outcome`]: the explicit fresh-vs-degraded result type and the
//!   single [`outcome::attempt_or_degrade`] helper through which every
//!   fallback path flows.
//! - [`fields`]: ordered JSON-pointer coalescing for normalizing backend
//!   responses whose field names vary between deployments.

pub mod fields;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod outcome;
mod reqwest_transport;

pub use outcome::{Outcome, attempt_or_degrade};
pub use reqwest_transport::{DEFAULT_TIMEOUT, ReqwestTransport};

use async_trait::async_trait;
use thiserror::Error;

/// Maximum length of a response body preview included in errors and logs.
pub const BODY_PREVIEW_LEN: usize = 500;

/// Errors from a single HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, timeout, or body read failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} {status_text}")]
    Status {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase (e.g. `"Service Unavailable"`).
        status_text: String,
    },

    /// The response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A 2xx response whose body carries an explicit error field.
    #[error("Upstream error: {message}")]
    Upstream {
        /// Message extracted from the payload.
        message: String,
    },

    /// No transport could service the request.
    #[error("Transport unavailable: {message}")]
    Unavailable {
        /// Description.
        message: String,
    },
}

/// HTTP method of an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// A file attached to a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name sent to the server.
    pub file_name: String,
    /// MIME type (e.g. `"image/jpeg"`).
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// A `multipart/form-data` body.
///
/// Kept transport-agnostic so requests can be cloned, recorded, and
/// inspected in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    /// Text fields in insertion order.
    pub fields: Vec<(String, String)>,
    /// Attached files.
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Adds a text field only when `value` is `Some`.
    #[must_use]
    pub fn text_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.text(name, v),
            None => self,
        }
    }

    /// Attaches a file.
    #[must_use]
    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    /// Returns the value of the first text field named `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// `application/json` body.
    Json(serde_json::Value),
    /// `multipart/form-data` body.
    Multipart(MultipartForm),
}

/// An outgoing HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Method.
    pub method: HttpMethod,
    /// Absolute URL without query string.
    pub url: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// Body.
    pub body: RequestBody,
}

impl HttpRequest {
    /// Builds a `GET` request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Builds a `POST` request with a JSON body.
    #[must_use]
    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            query: Vec::new(),
            body: RequestBody::Json(body),
        }
    }

    /// Builds a `POST` request with a multipart body.
    #[must_use]
    pub fn post_multipart(url: impl Into<String>, form: MultipartForm) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            query: Vec::new(),
            body: RequestBody::Multipart(form),
        }
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Returns the value of the first query parameter named `name`.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A fully-read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code.
    pub status: u16,
    /// Canonical reason phrase for the status, possibly empty.
    pub status_text: String,
    /// Raw body text.
    pub body: String,
}

impl HttpResponse {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Parses the body as JSON regardless of status.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Json`] if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, TransportError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Returns an error for non-2xx statuses.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Status`] if the status is not 2xx.
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::Status {
                status: self.status,
                status_text: self.status_text,
            })
        }
    }

    /// Parses a successful JSON body, rejecting non-2xx statuses and 2xx
    /// payloads that carry an explicit error field.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the status is not 2xx, the body is not
    /// JSON, or the body reports an error.
    pub fn success_json(self) -> Result<serde_json::Value, TransportError> {
        let body = self.error_for_status()?.json()?;
        if let Some(message) = fields::embedded_error(&body) {
            return Err(TransportError::Upstream { message });
        }
        Ok(body)
    }

    /// Returns at most [`BODY_PREVIEW_LEN`] characters of the body.
    #[must_use]
    pub fn body_preview(&self) -> String {
        if self.body.chars().count() > BODY_PREVIEW_LEN {
            let head: String = self.body.chars().take(BODY_PREVIEW_LEN).collect();
            format!("{head}...")
        } else {
            self.body.clone()
        }
    }
}

/// Sends HTTP requests on behalf of a client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and reads the full response.
    ///
    /// Non-2xx statuses are returned as responses, not errors; callers
    /// decide how to treat them.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on connection failure, timeout, or body
    /// read failure.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Joins a base URL and a path with exactly one slash between them.
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: "Bad Gateway".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn joins_urls() {
        assert_eq!(join_url("http://x/", "/health"), "http://x/health");
        assert_eq!(join_url("http://x", "health"), "http://x/health");
    }

    #[test]
    fn success_json_rejects_non_2xx() {
        let err = response(502, "{}").success_json().unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 502, .. }));
        assert_eq!(err.to_string(), "HTTP 502 Bad Gateway");
    }

    #[test]
    fn success_json_rejects_embedded_error() {
        let err = response(200, r#"{"error": "model not loaded"}"#)
            .success_json()
            .unwrap_err();
        assert!(matches!(err, TransportError::Upstream { ref message } if message == "model not loaded"));
    }

    #[test]
    fn success_json_rejects_malformed_body() {
        let err = response(200, "<html>").success_json().unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
    }

    #[test]
    fn multipart_skips_absent_optionals() {
        let form = MultipartForm::new()
            .text("location", "Dhaka")
            .text_opt("latitude", None::<String>)
            .text_opt("longitude", Some("90.4"));
        assert_eq!(form.fields.len(), 2);
        assert_eq!(form.field("longitude"), Some("90.4"));
        assert_eq!(form.field("latitude"), None);
    }

    #[test]
    fn body_preview_truncates() {
        let long = "x".repeat(BODY_PREVIEW_LEN + 10);
        let preview = response(200, &long).body_preview();
        assert_eq!(preview.len(), BODY_PREVIEW_LEN + 3);
    }
}
