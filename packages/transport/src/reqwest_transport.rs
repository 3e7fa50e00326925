//! [`HttpTransport`] backed by `reqwest`.
//!
//! This transport never retries. Weather and prediction lookups degrade
//! to a local result instead, so failures must surface promptly. Every
//! request carries an explicit timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;

use crate::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartForm, RequestBody,
    TransportError,
};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// `reqwest`-backed transport with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl ReqwestTransport {
    /// Creates a transport with a fresh client and the given timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), timeout)
    }

    /// Creates a transport around an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            query,
            body,
        } = request;

        let builder = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        }
        .timeout(self.timeout);

        let builder = if query.is_empty() {
            builder
        } else {
            builder.query(&query)
        };

        let builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(into_reqwest_form(form)?),
        };

        log::debug!("{method:?} {url}");
        let response = builder.send().await.inspect_err(|e| {
            log::debug!("{method:?} {url} failed: {e}");
        })?;

        let status = response.status();
        let body = response.text().await?;

        let response = HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        };

        if !response.is_success() {
            log::debug!(
                "{method:?} {url} returned HTTP {status}\n  body preview: {}",
                response.body_preview()
            );
        }

        Ok(response)
    }
}

fn into_reqwest_form(form: MultipartForm) -> Result<multipart::Form, TransportError> {
    let mut out = multipart::Form::new();
    for (name, value) in form.fields {
        out = out.text(name, value);
    }
    for file in form.files {
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;
        out = out.part(file.field, part);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilePart;

    #[test]
    fn builds_form_with_file() {
        let form = MultipartForm::new().text("location", "Dhaka").file(FilePart {
            field: "image".to_string(),
            file_name: "site.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xff, 0xd8],
        });
        assert!(into_reqwest_form(form).is_ok());
    }

    #[test]
    fn rejects_invalid_mime() {
        let form = MultipartForm::new().file(FilePart {
            field: "image".to_string(),
            file_name: "site.jpg".to_string(),
            content_type: "not a mime".to_string(),
            bytes: Vec::new(),
        });
        assert!(matches!(
            into_reqwest_form(form),
            Err(TransportError::Http(_))
        ));
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        let transport = ReqwestTransport::new(Duration::from_millis(500));
        let result = transport
            .send(HttpRequest::get("http://127.0.0.1:9/health"))
            .await;
        assert!(matches!(result, Err(TransportError::Http(_))));
    }
}
