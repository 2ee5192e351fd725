//! Configuration structures for Marathon clients.
//!
//! [`MarathonConfig`] describes where Marathon lives and how to reach it. It can
//! be deserialized from any serde format the caller already uses for its own
//! settings; credentials are held as [`SecretString`], redacted in `Debug` and
//! never serialized back out.

use crate::Error;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Connection settings for a single Marathon instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MarathonConfig {
    /// Marathon base URL (e.g. `http://marathon.mesos:8080`)
    #[validate(url)]
    pub url: String,

    /// Request timeout in seconds; the transport default applies when unset
    #[validate(range(min = 1, max = 3600))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to a PEM encoded CA certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca_cert: Option<PathBuf>,

    /// HTTP basic auth user name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// HTTP basic auth password
    #[serde(default, skip_serializing)]
    pub password: Option<SecretString>,

    /// DC/OS style ACS token, sent as `Authorization: token=<token>`
    #[serde(default, skip_serializing)]
    pub token: Option<SecretString>,

    /// Extra headers sent with every request
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

const fn default_tls_verify() -> bool {
    true
}

impl MarathonConfig {
    /// Create a configuration for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            url: url.into(),
            request_timeout_secs: None,
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            username: None,
            password: None,
            token: None,
            headers: BTreeMap::new(),
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set a custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Set HTTP basic auth credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Set the ACS token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Parse the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_url(&self) -> Result<Url, Error> {
        Url::parse(&self.url).map_err(|e| Error::ConfigError(format!("Invalid Marathon URL: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_marathon_config_new() {
        let config = MarathonConfig::new("http://01.02.03.04:5678").unwrap();
        assert_eq!(config.url, "http://01.02.03.04:5678");
        assert!(config.tls_verify);
        assert!(config.request_timeout_secs.is_none());
        assert!(config.timeout().is_none());
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_marathon_config_invalid_url() {
        let result = MarathonConfig::new("not-a-url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_marathon_config_builder() {
        let config = MarathonConfig::new("https://marathon.example.com")
            .unwrap()
            .with_timeout(45)
            .with_tls_verify(false)
            .with_basic_auth("ops", "hunter2")
            .with_token("acs-token")
            .with_header("X-Request-Source", "deployer");

        assert_eq!(config.timeout(), Some(Duration::from_secs(45)));
        assert!(!config.tls_verify);
        assert_eq!(config.username.as_deref(), Some("ops"));
        assert_eq!(
            config.password.as_ref().map(|secret| secret.expose_secret()),
            Some("hunter2")
        );
        assert_eq!(
            config.token.as_ref().map(|secret| secret.expose_secret()),
            Some("acs-token")
        );
        assert_eq!(
            config.headers.get("X-Request-Source").map(String::as_str),
            Some("deployer")
        );
    }

    #[test]
    fn test_marathon_config_parse_url() {
        let config = MarathonConfig::new("https://marathon.example.com:8443").unwrap();
        let url = config.parse_url().unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("marathon.example.com"));
        assert_eq!(url.port(), Some(8443));
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = MarathonConfig::new("http://marathon:8080").unwrap();
        config.request_timeout_secs = Some(0);
        assert!(config.validate().is_err());

        config.request_timeout_secs = Some(3601);
        assert!(config.validate().is_err());

        config.request_timeout_secs = Some(30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let config: MarathonConfig =
            serde_json::from_str(r#"{"url": "http://marathon:8080", "token": "abc"}"#).unwrap();
        assert!(config.tls_verify);
        assert_eq!(
            config.token.as_ref().map(|secret| secret.expose_secret()),
            Some("abc")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_omits_secrets() {
        let config = MarathonConfig::new("http://marathon:8080")
            .unwrap()
            .with_basic_auth("ops", "hunter2")
            .with_token("acs-token");

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("ops"));
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("acs-token"));
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let config = MarathonConfig::new("http://marathon:8080")
            .unwrap()
            .with_token("acs-token");
        let debug = format!("{config:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("acs-token"));
    }
}
