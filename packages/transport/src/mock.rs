//! Scripted in-memory transport for tests.
//!
//! Routes are matched by method and URL suffix (query strings live in
//! [`HttpRequest::query`], so suffixes like `"/health"` match cleanly).
//! Each route holds a queue of replies; the last reply repeats once the
//! queue drains. Every request is recorded for later assertions.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// A scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Respond with a status and body.
    Respond {
        /// Status code.
        status: u16,
        /// Reason phrase.
        status_text: String,
        /// Body text.
        body: String,
    },
    /// Fail the exchange as if the connection dropped.
    Fail(String),
}

impl MockReply {
    /// A JSON reply with the given status.
    #[must_use]
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::Respond {
            status,
            status_text: reason_phrase(status).to_string(),
            body: body.to_string(),
        }
    }

    /// A plain-text reply with the given status.
    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::Respond {
            status,
            status_text: reason_phrase(status).to_string(),
            body: body.into(),
        }
    }

    /// A transport-level failure.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

struct Route {
    method: HttpMethod,
    suffix: String,
    replies: Vec<MockReply>,
}

/// In-memory [`HttpTransport`] with scripted replies and request
/// recording.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Creates a transport with no routes; every request fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route answering `method` requests whose URL ends with
    /// `suffix`. Replies are served in order; the last one repeats.
    #[must_use]
    pub fn route(self, method: HttpMethod, suffix: &str, replies: Vec<MockReply>) -> Self {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Route {
                method,
                suffix: suffix.to_string(),
                replies,
            });
        self
    }

    /// Shorthand for a `GET` route with a single repeating reply.
    #[must_use]
    pub fn on_get(self, suffix: &str, reply: MockReply) -> Self {
        self.route(HttpMethod::Get, suffix, vec![reply])
    }

    /// Shorthand for a `POST` route with a single repeating reply.
    #[must_use]
    pub fn on_post(self, suffix: &str, reply: MockReply) -> Self {
        self.route(HttpMethod::Post, suffix, vec![reply])
    }

    /// All requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests whose URL ends with `suffix`.
    #[must_use]
    pub fn calls(&self, suffix: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.url.ends_with(suffix))
            .count()
    }

    /// Total number of requests received.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn next_reply(&self, request: &HttpRequest) -> Option<MockReply> {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let route = routes
            .iter_mut()
            .find(|r| r.method == request.method && request.url.ends_with(&r.suffix))?;
        if route.replies.len() > 1 {
            Some(route.replies.remove(0))
        } else {
            route.replies.first().cloned()
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = self.next_reply(&request);
        let url = request.url.clone();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        match reply {
            Some(MockReply::Respond {
                status,
                status_text,
                body,
            }) => Ok(HttpResponse {
                status,
                status_text,
                body,
            }),
            Some(MockReply::Fail(message)) => Err(TransportError::Unavailable { message }),
            None => Err(TransportError::Unavailable {
                message: format!("no mock route for {url}"),
            }),
        }
    }
}

const fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        413 => "Payload Too Large",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn serves_queued_replies_then_repeats_last() {
        let transport = MockTransport::new().route(
            HttpMethod::Get,
            "/health",
            vec![
                MockReply::json(503, &json!({})),
                MockReply::json(200, &json!({ "status": "ok" })),
            ],
        );
        for expected in [503, 200, 200] {
            let resp = transport
                .send(HttpRequest::get("http://api/health"))
                .await
                .unwrap();
            assert_eq!(resp.status, expected);
        }
        assert_eq!(transport.calls("/health"), 3);
    }

    #[tokio::test]
    async fn unmatched_requests_fail_and_are_recorded() {
        let transport = MockTransport::new();
        let result = transport
            .send(HttpRequest::post_json("http://api/predict", json!({})))
            .await;
        assert!(matches!(result, Err(TransportError::Unavailable { .. })));
        assert_eq!(transport.total_calls(), 1);
    }
}
