//! The blocking Customer.io client.
//!
//! `CustomerIo` ties the request builder to a `Transport` and a
//! `TimezoneDatabase`. Every operation performs at most one round-trip and
//! returns `Ok(true)` only for a 200 response.

use tracing::{debug, info, warn};

use crate::client::CustomerIoClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::timezone::{resolve_timezone, SystemTimezones, TimezoneDatabase};
use crate::transport::{Transport, UreqTransport};
use crate::types::Attributes;

#[derive(Debug, Clone)]
pub struct CustomerIo<T = UreqTransport, Z = SystemTimezones> {
    client: CustomerIoClient,
    transport: T,
    timezones: Z,
}

impl CustomerIo {
    pub fn new(site_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_parts(
            CustomerIoClient::new(site_id, api_key),
            UreqTransport::new(),
            SystemTimezones,
        )
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_parts(
            CustomerIoClient::with_base_url(&config.site_id, &config.api_key, &config.base_url),
            UreqTransport::new(),
            SystemTimezones,
        )
    }
}

impl<T: Transport, Z: TimezoneDatabase> CustomerIo<T, Z> {
    pub fn with_parts(client: CustomerIoClient, transport: T, timezones: Z) -> Self {
        Self {
            client,
            transport,
            timezones,
        }
    }

    pub fn client(&self) -> &CustomerIoClient {
        &self.client
    }

    /// Create or update a customer with the given attributes.
    pub fn update_user(&self, user_id: &str, attributes: &Attributes) -> Result<bool, ApiError> {
        let request = self.client.build_update_user(user_id, attributes)?;
        self.send(&request)
    }

    pub fn delete_user(&self, user_id: &str) -> Result<bool, ApiError> {
        let request = self.client.build_delete_user(user_id)?;
        self.send(&request)
    }

    pub fn send_user_event(&self, user_id: &str, event_name: &str) -> Result<bool, ApiError> {
        let request = self.client.build_send_user_event(user_id, event_name)?;
        self.send(&request)
    }

    /// Set the customer's `timezone` from a UTC offset in milliseconds.
    ///
    /// Returns `Ok(false)` without any network call when no supported
    /// timezone has that offset.
    pub fn update_user_timezone(&self, user_id: &str, offset_millis: i32) -> Result<bool, ApiError> {
        let Some(timezone_id) = resolve_timezone(&self.timezones, offset_millis) else {
            return Ok(false);
        };
        let request = self
            .client
            .build_update_user_timezone(user_id, &timezone_id, offset_millis)?;
        self.send(&request)
    }

    /// Execute a built request and reduce it to a success flag.
    pub fn send(&self, request: &HttpRequest) -> Result<bool, ApiError> {
        let method = request.method.as_str();
        debug!(method, url = %request.url, "sending request");

        let response = self.transport.execute(request)?;
        info!(method, url = %request.url, status = response.status, "response received");

        let ok = self.client.parse_status(&response);
        if ok {
            debug!(body = %response.body, "response body");
        } else {
            warn!(method, url = %request.url, status = response.status, "request not successful");
        }
        Ok(ok)
    }
}
