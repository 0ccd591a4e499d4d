// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client configuration.
//!
//! Configuration is read from TOML. After parsing, environment variables
//! override the file values:
//!
//! ```text
//! UA_ASYNC_ENDPOINT=opc.tcp://plc-7:4840
//! UA_ASYNC_REQUEST_TIMEOUT=2s
//! ```
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use ua_async_client::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .endpoint("opc.tcp://localhost:4840")
//!     .request_timeout(Duration::from_secs(2))
//!     .build()
//!     .unwrap();
//! assert_eq!(config.application_name, "ua-async client");
//! ```

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ua_async_core::{ConfigurationError, UaResult};

/// Environment variable overriding [`ClientConfig::endpoint`].
pub const ENV_ENDPOINT: &str = "UA_ASYNC_ENDPOINT";

/// Environment variable overriding [`ClientConfig::request_timeout`].
pub const ENV_REQUEST_TIMEOUT: &str = "UA_ASYNC_REQUEST_TIMEOUT";

// =============================================================================
// ClientConfig
// =============================================================================

/// OPC UA client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server endpoint URL (e.g., "opc.tcp://localhost:4840").
    pub endpoint: String,

    /// Application name.
    #[serde(default = "default_application_name")]
    pub application_name: String,

    /// Session name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_name: Option<String>,

    /// Upper bound for a synchronous request, pumping included.
    #[serde(default = "default_request_timeout")]
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Maximum number of requests queued on the transport (0 = unlimited).
    #[serde(default)]
    pub max_pending_requests: usize,
}

fn default_endpoint() -> String {
    "opc.tcp://localhost:4840".to_string()
}

fn default_application_name() -> String {
    "ua-async client".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

impl ClientConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Creates a configuration with just the endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Validates this configuration.
    pub fn validate(&self) -> UaResult<()> {
        if self.endpoint.is_empty() {
            return Err(ConfigurationError::missing_field("endpoint").into());
        }

        if !self.endpoint.starts_with("opc.tcp://") {
            return Err(ConfigurationError::invalid_endpoint(
                &self.endpoint,
                "Endpoint must start with opc.tcp://",
            )
            .into());
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigurationError::invalid_timeout(
                self.request_timeout,
                "Request timeout must be greater than 0",
            )
            .into());
        }

        Ok(())
    }

    /// Parses a TOML document, applies environment overrides and validates.
    pub fn from_toml_str(content: &str) -> UaResult<Self> {
        Self::parse_toml(content, "<string>")
    }

    /// Loads a TOML file, applies environment overrides and validates.
    pub fn load(path: impl AsRef<Path>) -> UaResult<Self> {
        let path = path.as_ref();
        info!("Loading client configuration from: {}", path.display());

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigurationError::load(path.display().to_string(), e.to_string()))?;
        Self::parse_toml(&content, &path.display().to_string())
    }

    fn parse_toml(content: &str, source_name: &str) -> UaResult<Self> {
        let mut config: Self = toml::from_str(content)
            .map_err(|e| ConfigurationError::load(source_name, e.to_string()))?;
        config.apply_env_overrides_with(|name| env::var(name).ok())?;
        config.validate()?;
        debug!(endpoint = %config.endpoint, "client configuration loaded");
        Ok(config)
    }

    /// Applies overrides looked up through `lookup`.
    ///
    /// `lookup` receives [`ENV_ENDPOINT`] and [`ENV_REQUEST_TIMEOUT`] and
    /// returns the override text, if any.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> UaResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ENDPOINT) {
            debug!(variable = ENV_ENDPOINT, "endpoint overridden from environment");
            self.endpoint = value;
        }
        if let Some(value) = lookup(ENV_REQUEST_TIMEOUT) {
            self.request_timeout = humantime::parse_duration(value.trim()).map_err(|e| {
                ConfigurationError::load(ENV_REQUEST_TIMEOUT, format!("invalid duration: {}", e))
            })?;
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            application_name: default_application_name(),
            session_name: None,
            request_timeout: default_request_timeout(),
            max_pending_requests: 0,
        }
    }
}

// =============================================================================
// ClientConfigBuilder
// =============================================================================

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    endpoint: Option<String>,
    application_name: Option<String>,
    session_name: Option<String>,
    request_timeout: Option<Duration>,
    max_pending_requests: Option<usize>,
}

impl ClientConfigBuilder {
    /// Sets the server endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the application name.
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Sets the session name.
    pub fn session_name(mut self, name: impl Into<String>) -> Self {
        self.session_name = Some(name.into());
        self
    }

    /// Sets the request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the maximum number of queued requests.
    pub fn max_pending_requests(mut self, max: usize) -> Self {
        self.max_pending_requests = Some(max);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> UaResult<ClientConfig> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| ConfigurationError::missing_field("endpoint"))?;

        let config = ClientConfig {
            endpoint,
            application_name: self.application_name.unwrap_or_else(default_application_name),
            session_name: self.session_name,
            request_timeout: self.request_timeout.unwrap_or_else(default_request_timeout),
            max_pending_requests: self.max_pending_requests.unwrap_or(0),
        };

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// humantime_serde helper
// =============================================================================

mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        humantime::format_duration(*duration)
            .to_string()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use ua_async_core::UaError;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::builder()
            .endpoint("opc.tcp://localhost:4840")
            .build()
            .unwrap();

        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.max_pending_requests, 0);
        assert!(config.session_name.is_none());
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_builder_missing_endpoint() {
        let error = ClientConfig::builder().build().unwrap_err();
        assert!(matches!(
            error,
            UaError::Configuration(ConfigurationError::MissingField { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let error = ClientConfig::new("http://localhost:4840").validate().unwrap_err();
        assert!(matches!(
            error,
            UaError::Configuration(ConfigurationError::InvalidEndpoint { .. })
        ));

        let mut config = ClientConfig::default();
        config.request_timeout = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(UaError::Configuration(ConfigurationError::InvalidTimeout { .. }))
        ));
    }

    #[test]
    fn test_parse_toml() {
        let config = ClientConfig::parse_toml(
            r#"
                endpoint = "opc.tcp://plc-7:4840"
                session_name = "line-7"
                request_timeout = "750ms"
                max_pending_requests = 32
            "#,
            "<test>",
        )
        .unwrap();

        assert_eq!(config.endpoint, "opc.tcp://plc-7:4840");
        assert_eq!(config.session_name.as_deref(), Some("line-7"));
        assert_eq!(config.request_timeout, Duration::from_millis(750));
        assert_eq!(config.max_pending_requests, 32);
        assert_eq!(config.application_name, "ua-async client");
    }

    #[test]
    fn test_parse_toml_errors() {
        let error = ClientConfig::from_toml_str("endpoint = 5").unwrap_err();
        assert!(matches!(
            error,
            UaError::Configuration(ConfigurationError::Load { .. })
        ));

        let error = ClientConfig::from_toml_str(
            "endpoint = \"opc.tcp://a\"\nrequest_timeout = \"soon\"",
        )
        .unwrap_err();
        assert!(matches!(error, UaError::Configuration(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        config
            .apply_env_overrides_with(|name| match name {
                ENV_ENDPOINT => Some("opc.tcp://override:4841".to_string()),
                ENV_REQUEST_TIMEOUT => Some("3s".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.endpoint, "opc.tcp://override:4841");
        assert_eq!(config.request_timeout, Duration::from_secs(3));

        let mut config = ClientConfig::default();
        config.apply_env_overrides_with(no_env).unwrap();
        assert_eq!(config, ClientConfig::default());

        let error = config
            .apply_env_overrides_with(|name| {
                (name == ENV_REQUEST_TIMEOUT).then(|| "later".to_string())
            })
            .unwrap_err();
        assert!(matches!(error, UaError::Configuration(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = \"opc.tcp://file:4840\"").unwrap();
        writeln!(file, "request_timeout = \"5s\"").unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        if env::var(ENV_ENDPOINT).is_err() {
            assert_eq!(config.endpoint, "opc.tcp://file:4840");
        }

        let error = ClientConfig::load("/nonexistent/ua-async.toml").unwrap_err();
        assert!(matches!(
            error,
            UaError::Configuration(ConfigurationError::Load { .. })
        ));
    }

    #[test]
    fn test_serialize_round_trip_uses_humantime() {
        let config = ClientConfig::builder()
            .endpoint("opc.tcp://localhost:4840")
            .request_timeout(Duration::from_millis(1500))
            .build()
            .unwrap();
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("request_timeout = \"1s 500ms\""));
    }
}
