//! Blocking execution of `HttpRequest` values.
//!
//! # Design
//! `Transport` is the seam between the sans-IO builder and the network. The
//! default `UreqTransport` disables ureq's status-as-error behaviour and
//! redirect following so 3xx, 4xx and 5xx responses come back as data; only
//! failures that stop the round-trip surface as `ApiError::Transport`.

use ureq::Agent;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `ureq`-backed blocking transport.
///
/// The response body is drained only for a 200; other statuses are returned
/// with an empty body and the stream is dropped unread.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a caller-configured agent. It must have `http_status_as_error`
    /// disabled and `max_redirects(0)` with `max_redirects_will_error(false)`,
    /// otherwise non-2xx statuses surface as transport errors or 3xx
    /// responses are followed instead of reported.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let body = request.body.as_deref().unwrap_or("").as_bytes();

        let mut response = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(&request.url), request).call()?,
            HttpMethod::Delete => with_headers(self.agent.delete(&request.url), request).call()?,
            HttpMethod::Post => with_headers(self.agent.post(&request.url), request).send(body)?,
            HttpMethod::Put => with_headers(self.agent.put(&request.url), request).send(body)?,
        };

        let status = response.status().as_u16();
        let body = if status == 200 {
            response.body_mut().read_to_string()?
        } else {
            String::new()
        };

        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
