// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Configuration Integration Tests
//!
//! Loading client configuration from TOML files and wiring it into a client.
//!
//! ## Test Categories
//!
//! - `test_load_*`: File loading
//! - `test_override_*`: Environment overrides
//! - `test_config_*`: Configuration effects on the client

use std::fs;
use std::time::Duration;

use ua_async_client::services::attribute;
use ua_async_client::types::NodeId;
use ua_async_client::{
    Client, ClientConfig, LoopbackTransport, ENV_ENDPOINT, ENV_REQUEST_TIMEOUT,
};
use ua_async_core::{StatusCode, UaError, UseFuture};

use ua_async_tests::prelude::*;

// =============================================================================
// File Loading
// =============================================================================

#[test]
fn test_load_full_file() {
    let resources = TestHarness::new(TestHarnessConfig::new("load_full").with_temp_dir()).setup();
    let path = resources.temp_file("client.toml").unwrap();
    fs::write(&path, ConfigFixtures::full_toml()).unwrap();

    let config = ClientConfig::load(&path).unwrap();
    assert_eq!(config.endpoint, "opc.tcp://plant-server:4840");
    assert_eq!(config.application_name, "line-monitor");
    assert_eq!(config.session_name.as_deref(), Some("line-monitor-session"));
    assert_eq!(config.request_timeout, Duration::from_millis(2500));
    assert_eq!(config.max_pending_requests, 64);
}

#[test]
fn test_load_minimal_file_uses_defaults() {
    let dir = temp_test_dir("ua-async-config-");
    let path = dir.path().join("minimal.toml");
    fs::write(&path, ConfigFixtures::minimal_toml()).unwrap();

    let config = ClientConfig::load(&path).unwrap();
    let defaults = ClientConfig::default();
    assert_eq!(config.application_name, defaults.application_name);
    assert_eq!(config.request_timeout, defaults.request_timeout);
    assert_eq!(config.max_pending_requests, 0);
}

#[test]
fn test_load_rejects_invalid_endpoint() {
    let dir = temp_test_dir("ua-async-config-");
    let path = dir.path().join("invalid.toml");
    fs::write(&path, ConfigFixtures::invalid_endpoint_toml()).unwrap();

    let error = ClientConfig::load(&path).unwrap_err();
    assert!(matches!(error, UaError::Configuration(_)));
    assert_eq!(error.status_code(), StatusCode::BAD_CONFIGURATION_ERROR);
}

#[test]
fn test_load_missing_file() {
    let dir = temp_test_dir("ua-async-config-");
    let error = ClientConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(error, UaError::Configuration(_)));
}

// =============================================================================
// Environment Overrides
// =============================================================================

#[test]
fn test_override_from_lookup() {
    let mut config = ClientConfig::from_toml_str(ConfigFixtures::full_toml()).unwrap();
    config
        .apply_env_overrides_with(|name| match name {
            ENV_ENDPOINT => Some("opc.tcp://standby-server:4840".to_string()),
            ENV_REQUEST_TIMEOUT => Some("750ms".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.endpoint, "opc.tcp://standby-server:4840");
    assert_eq!(config.request_timeout, Duration::from_millis(750));
    assert!(config.validate().is_ok());
}

#[test]
fn test_override_with_bad_endpoint_fails_validation() {
    let mut config = ClientConfig::from_toml_str(ConfigFixtures::minimal_toml()).unwrap();
    config
        .apply_env_overrides_with(|name| (name == ENV_ENDPOINT).then(|| "tcp://nowhere".to_string()))
        .unwrap();
    assert!(config.validate().is_err());
}

// =============================================================================
// Client Wiring
// =============================================================================

#[test]
fn test_config_queue_limit_applies_to_loopback() {
    let config = ClientConfig::from_toml_str(
        r#"
endpoint = "opc.tcp://plant-server:4840"
max_pending_requests = 1
"#,
    )
    .unwrap();
    let client = Client::with_config(LoopbackTransport::from_config(&config), config);

    let _queued = attribute::read_value_async(&client, &NodeId::OBJECTS_FOLDER, UseFuture);
    let mut rejected = attribute::read_value_async(&client, &NodeId::OBJECTS_FOLDER, UseFuture);
    rejected
        .try_take()
        .unwrap()
        .assert_status(StatusCode::BAD_TOO_MANY_OPERATIONS);
}

#[test]
fn test_config_roundtrips_through_client() {
    let config = ClientConfig::builder()
        .endpoint("opc.tcp://plant-server:4840")
        .session_name("audit")
        .request_timeout(Duration::from_secs(3))
        .build()
        .unwrap();
    let client = Client::with_config(LoopbackTransport::new(), config.clone());
    assert_eq!(client.config(), &config);
}
