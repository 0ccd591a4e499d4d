// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! Sets up a client over a fresh loopback transport, with optional tracing
//! and a temp directory that lives as long as the resources.

use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;
use tracing::debug;

use ua_async_client::{Client, ClientConfig, LoopbackTransport};

use super::{init_test_logging, temp_test_dir};

/// Client type used throughout the integration tests.
pub type TestClient = Client<LoopbackTransport>;

// =============================================================================
// Test Harness
// =============================================================================

/// Configuration for the test harness.
#[derive(Debug, Clone)]
pub struct TestHarnessConfig {
    /// Name of the test (used for the temp directory prefix and endpoint).
    pub test_name: String,

    /// Upper bound for synchronous operations.
    pub request_timeout: Duration,

    /// Loopback queue limit; 0 means unlimited.
    pub max_pending_requests: usize,

    /// Whether to create a temp directory for the test.
    pub create_temp_dir: bool,

    /// Whether to enable tracing for the test.
    pub enable_tracing: bool,
}

impl Default for TestHarnessConfig {
    fn default() -> Self {
        Self {
            test_name: "unknown_test".to_string(),
            request_timeout: Duration::from_secs(2),
            max_pending_requests: 0,
            create_temp_dir: false,
            enable_tracing: true,
        }
    }
}

impl TestHarnessConfig {
    /// Create a new config with a test name.
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the loopback queue limit.
    pub fn max_pending_requests(mut self, max: usize) -> Self {
        self.max_pending_requests = max;
        self
    }

    /// Create a temp directory.
    pub fn with_temp_dir(mut self) -> Self {
        self.create_temp_dir = true;
        self
    }

    /// Disable tracing.
    pub fn without_tracing(mut self) -> Self {
        self.enable_tracing = false;
        self
    }

    /// Builds the client configuration for this test.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::builder()
            .endpoint("opc.tcp://loopback:4840")
            .application_name(format!("ua-async-tests/{}", self.test_name))
            .request_timeout(self.request_timeout)
            .max_pending_requests(self.max_pending_requests)
            .build()
            .expect("harness configuration is valid")
    }
}

/// Resources provided by the test harness.
pub struct TestResources {
    /// Configuration used to create this harness.
    pub config: TestHarnessConfig,

    client: TestClient,

    temp_dir: Option<TempDir>,
}

impl TestResources {
    /// The client under test.
    pub fn client(&self) -> &TestClient {
        &self.client
    }

    /// The loopback transport behind the client.
    pub fn transport(&self) -> &LoopbackTransport {
        self.client.transport()
    }

    /// Get the temp directory path.
    pub fn temp_path(&self) -> Option<PathBuf> {
        self.temp_dir.as_ref().map(|d| d.path().to_path_buf())
    }

    /// Create a file path in the temp directory.
    pub fn temp_file(&self, name: &str) -> Option<PathBuf> {
        self.temp_dir.as_ref().map(|d| d.path().join(name))
    }

    /// Pumps until the loopback queue is empty, returning the callbacks run.
    ///
    /// Stops at the first failure raised by a pump pass.
    pub fn drain(&self) -> ua_async_core::UaResult<usize> {
        let mut total = 0;
        while self.transport().pending() > 0 {
            total += self.client.run_iterate()?;
        }
        Ok(total)
    }
}

/// The main test harness.
pub struct TestHarness {
    config: TestHarnessConfig,
}

impl TestHarness {
    /// Create a new test harness with a config.
    pub fn new(config: TestHarnessConfig) -> Self {
        Self { config }
    }

    /// Create a new test harness with a test name.
    pub fn with_name(test_name: impl Into<String>) -> Self {
        Self::new(TestHarnessConfig::new(test_name))
    }

    /// Set up the test environment.
    pub fn setup(self) -> TestResources {
        if self.config.enable_tracing {
            init_test_logging();
        }

        let temp_dir = self
            .config
            .create_temp_dir
            .then(|| temp_test_dir(&format!("ua-async-{}-", self.config.test_name)));

        let client_config = self.config.client_config();
        let transport = LoopbackTransport::from_config(&client_config);
        let client = Client::with_config(transport, client_config);
        debug!(test = %self.config.test_name, "test harness ready");

        TestResources {
            config: self.config,
            client,
            temp_dir,
        }
    }
}
