//! Blocking client for the Customer.io Track API.
//!
//! # Overview
//! Four operations (update user, delete user, send user event, update user
//! timezone) each become one authenticated JSON request. The result is `true`
//! only when the API answers 200; transport failures are returned as
//! `ApiError`.
//!
//! # Design
//! - `CustomerIoClient` builds `HttpRequest` values without touching the
//!   network (host-does-IO pattern) and interprets statuses.
//! - `Transport` executes requests; `UreqTransport` is the blocking default.
//! - `TimezoneDatabase` supplies offset-to-zone data; `SystemTimezones` uses
//!   the IANA data bundled with `chrono-tz`.
//! - `CustomerIo` composes the three and holds no mutable state, so it can be
//!   shared across threads.
//!
//! ```no_run
//! use customerio_core::{Attributes, CustomerIo};
//!
//! # fn main() -> Result<(), customerio_core::ApiError> {
//! let cio = CustomerIo::new("site-id", "api-key");
//! let mut attributes = Attributes::new();
//! attributes.insert("email".into(), "jane@example.com".into());
//! cio.update_user("user-42", &attributes)?;
//! cio.send_user_event("user-42", "signed_up")?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod timezone;
pub mod transport;
pub mod types;

pub use api::CustomerIo;
pub use client::CustomerIoClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use timezone::{resolve_timezone, StaticTimezoneTable, SystemTimezones, TimezoneDatabase};
pub use transport::{Transport, UreqTransport};
pub use types::{Attributes, EventPayload, TimezoneUpdate};
