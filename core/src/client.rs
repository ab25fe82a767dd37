//! Stateless HTTP request builder for the Customer.io Track API.
//!
//! # Design
//! `CustomerIoClient` holds the two credentials and a base URL and carries
//! no mutable state between calls. Each operation has a `build_*` method that
//! produces an `HttpRequest`; `parse_status` reduces the `HttpResponse` to a
//! success flag. The round-trip itself belongs to a `Transport`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Attributes, EventPayload, TimezoneUpdate};

/// Production Track API host.
pub const DEFAULT_HOST: &str = "https://track.customer.io";
/// Path prefix shared by every resource.
pub const URL_PREFIX: &str = "/api/v1/";
pub const URL_CUSTOMERS: &str = "customers";
pub const URL_EVENTS: &str = "events";

const JSON_MIME_TYPE: &str = "application/json";

/// Synchronous, stateless request builder for the Track API.
#[derive(Clone)]
pub struct CustomerIoClient {
    site_id: String,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for CustomerIoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerIoClient")
            .field("site_id", &self.site_id)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl CustomerIoClient {
    pub fn new(site_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_base_url(site_id, api_key, DEFAULT_HOST)
    }

    /// Target a different host, e.g. the EU region or a local mock.
    pub fn with_base_url(
        site_id: impl Into<String>,
        api_key: impl Into<String>,
        base_url: &str,
    ) -> Self {
        Self {
            site_id: site_id.into(),
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `Basic base64(site_id:api_key)`.
    pub fn authorization(&self) -> String {
        let raw = format!("{}:{}", self.site_id, self.api_key);
        format!("Basic {}", STANDARD.encode(raw.as_bytes()))
    }

    /// Absolute URL for an API-relative path.
    pub fn url_for(&self, api_path: &str) -> String {
        format!("{}{}{}", self.base_url, URL_PREFIX, api_path)
    }

    pub fn build_update_user(&self, user_id: &str, attributes: &Attributes) -> Result<HttpRequest, ApiError> {
        self.build_request(&customer_path(user_id), HttpMethod::Put, Some(attributes))
    }

    pub fn build_delete_user(&self, user_id: &str) -> Result<HttpRequest, ApiError> {
        self.build_request::<()>(&customer_path(user_id), HttpMethod::Delete, None)
    }

    pub fn build_send_user_event(&self, user_id: &str, event_name: &str) -> Result<HttpRequest, ApiError> {
        let payload = EventPayload {
            name: event_name.to_string(),
        };
        let path = format!("{}/{URL_EVENTS}", customer_path(user_id));
        self.build_request(&path, HttpMethod::Post, Some(&payload))
    }

    /// Build the timezone PUT for an already-resolved timezone id.
    pub fn build_update_user_timezone(
        &self,
        user_id: &str,
        timezone_id: &str,
        offset_millis: i32,
    ) -> Result<HttpRequest, ApiError> {
        let payload = TimezoneUpdate::new(timezone_id, offset_millis);
        self.build_request(&customer_path(user_id), HttpMethod::Put, Some(&payload))
    }

    /// Generic builder shared by every operation.
    ///
    /// POST and PUT always carry a JSON body (`{}` when `payload` is `None`);
    /// GET and DELETE never do, and any payload passed with them is ignored.
    pub fn build_request<P: Serialize + ?Sized>(
        &self,
        api_path: &str,
        method: HttpMethod,
        payload: Option<&P>,
    ) -> Result<HttpRequest, ApiError> {
        let body = if method.carries_body() {
            let encoded = match payload {
                Some(p) => serde_json::to_string(p)?,
                None => "{}".to_string(),
            };
            Some(encoded)
        } else {
            None
        };

        Ok(HttpRequest {
            method,
            url: self.url_for(api_path),
            headers: vec![
                ("Content-Type".to_string(), JSON_MIME_TYPE.to_string()),
                ("Authorization".to_string(), self.authorization()),
            ],
            body,
        })
    }

    /// Exactly 200 counts as success; every other status is a failure.
    pub fn parse_status(&self, response: &HttpResponse) -> bool {
        is_success(response.status)
    }
}

pub fn is_success(status: u16) -> bool {
    status == 200
}

fn customer_path(user_id: &str) -> String {
    format!("{URL_CUSTOMERS}/{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> CustomerIoClient {
        CustomerIoClient::with_base_url("site", "secret", "http://localhost:3000")
    }

    fn body_json(req: &HttpRequest) -> serde_json::Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn default_host_is_track_api() {
        let c = CustomerIoClient::new("site", "secret");
        assert_eq!(c.url_for("customers/1"), "https://track.customer.io/api/v1/customers/1");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let c = CustomerIoClient::with_base_url("site", "secret", "http://localhost:3000/");
        assert_eq!(c.base_url(), "http://localhost:3000");
    }

    #[test]
    fn authorization_is_basic_of_site_and_key() {
        // base64("site:secret")
        assert_eq!(client().authorization(), "Basic c2l0ZTpzZWNyZXQ=");
    }

    #[test]
    fn every_request_carries_json_and_auth_headers() {
        let c = client();
        let requests = vec![
            c.build_update_user("u", &Attributes::new()).unwrap(),
            c.build_delete_user("u").unwrap(),
            c.build_send_user_event("u", "e").unwrap(),
            c.build_update_user_timezone("u", "America/New_York", 0).unwrap(),
        ];
        for req in requests {
            assert_eq!(req.header("content-type"), Some("application/json"));
            assert_eq!(req.header("authorization"), Some("Basic c2l0ZTpzZWNyZXQ="));
        }
    }

    #[test]
    fn build_update_user_sends_attributes_verbatim() {
        let attributes = json!({
            "email": "a@example.com",
            "plan": { "tier": "pro", "seats": 5 },
            "active": true,
            "tags": ["x", "y"],
        });
        let map = attributes.as_object().unwrap().clone();
        let req = client().build_update_user("user-42", &map).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:3000/api/v1/customers/user-42");
        assert_eq!(body_json(&req), attributes);
    }

    #[test]
    fn build_delete_user_has_no_body() {
        let req = client().build_delete_user("user-42").unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/api/v1/customers/user-42");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_send_user_event_wraps_name() {
        let req = client().build_send_user_event("user-42", "signed_up").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/v1/customers/user-42/events");
        assert_eq!(body_json(&req), json!({ "name": "signed_up" }));
    }

    #[test]
    fn build_update_user_timezone_sends_id_and_seconds() {
        let req = client()
            .build_update_user_timezone("user-42", "America/Bogota", -18_000_000)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(
            body_json(&req),
            json!({ "timezone": "America/Bogota", "timezone_last_modified_time": -18000 })
        );
    }

    #[test]
    fn body_method_without_payload_sends_empty_object() {
        let req = client()
            .build_request::<()>("customers/1", HttpMethod::Post, None)
            .unwrap();
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn get_ignores_payload() {
        let req = client()
            .build_request("customers/1", HttpMethod::Get, Some(&json!({ "a": 1 })))
            .unwrap();
        assert!(req.body.is_none());
    }

    #[test]
    fn only_exactly_200_is_success() {
        for status in 100u16..=599 {
            let response = HttpResponse {
                status,
                body: String::new(),
            };
            assert_eq!(client().parse_status(&response), status == 200, "status {status}");
        }
        for status in [201, 204, 301, 400, 404, 429, 500] {
            assert!(!is_success(status));
        }
    }

    #[test]
    fn debug_output_hides_api_key() {
        let rendered = format!("{:?}", client());
        assert!(rendered.contains("site"));
        assert!(!rendered.contains("secret"));
    }
}
