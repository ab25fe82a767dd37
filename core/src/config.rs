//! Client configuration loaded from the environment.

use crate::client::DEFAULT_HOST;
use crate::error::ApiError;

pub const ENV_SITE_ID: &str = "CUSTOMERIO_SITE_ID";
pub const ENV_API_KEY: &str = "CUSTOMERIO_API_KEY";
pub const ENV_BASE_URL: &str = "CUSTOMERIO_BASE_URL";

/// Credentials plus the host to send requests to.
#[derive(Clone)]
pub struct ClientConfig {
    pub site_id: String,
    pub api_key: String,
    pub base_url: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("site_id", &self.site_id)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(site_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_HOST.to_string(),
        }
    }

    /// Read `CUSTOMERIO_SITE_ID`, `CUSTOMERIO_API_KEY` and the optional
    /// `CUSTOMERIO_BASE_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ApiError::Configuration(format!("{key} is not set")))
        };

        let site_id = required(ENV_SITE_ID)?;
        let api_key = required(ENV_API_KEY)?;
        let base_url = lookup(ENV_BASE_URL)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        Ok(Self {
            site_id,
            api_key,
            base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn reads_credentials_with_default_host() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_SITE_ID, "site"), (ENV_API_KEY, "key")])).unwrap();
        assert_eq!(config.site_id, "site");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.base_url, DEFAULT_HOST);
    }

    #[test]
    fn base_url_override() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_SITE_ID, "site"),
            (ENV_API_KEY, "key"),
            (ENV_BASE_URL, "https://track-eu.customer.io"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://track-eu.customer.io");
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_SITE_ID, "site")])).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(ref msg) if msg.contains(ENV_API_KEY)));
    }

    #[test]
    fn empty_site_id_counts_as_missing() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_SITE_ID, ""), (ENV_API_KEY, "key")])).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", ClientConfig::new("site", "hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
