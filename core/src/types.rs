//! Request payloads for the Track API.

use serde::{Deserialize, Serialize};

/// Arbitrary user attributes, sent verbatim as a JSON object.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Body of `POST customers/{id}/events`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventPayload {
    pub name: String,
}

/// Body of the timezone variant of `PUT customers/{id}`.
///
/// Customer.io stores timestamps in seconds, so the millisecond offset is
/// divided by 1000 before it lands in `timezone_last_modified_time`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimezoneUpdate {
    pub timezone: String,
    pub timezone_last_modified_time: i64,
}

impl TimezoneUpdate {
    pub fn new(timezone: impl Into<String>, offset_millis: i32) -> Self {
        Self {
            timezone: timezone.into(),
            timezone_last_modified_time: i64::from(offset_millis) / 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timezone_update_converts_millis_to_seconds() {
        let update = TimezoneUpdate::new("America/New_York", -18_000_000);
        assert_eq!(update.timezone_last_modified_time, -18_000);
    }

    #[test]
    fn timezone_update_truncates_toward_zero() {
        assert_eq!(TimezoneUpdate::new("X", 1_999).timezone_last_modified_time, 1);
        assert_eq!(TimezoneUpdate::new("X", -1_999).timezone_last_modified_time, -1);
    }

    #[test]
    fn event_payload_serializes_name_only() {
        let json = serde_json::to_value(EventPayload { name: "signed_up".to_string() }).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "signed_up" }));
    }
}
