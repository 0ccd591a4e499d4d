// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # ua-async Integration Tests
//!
//! End-to-end tests for request dispatch, completion tokens and the service
//! sets, run against the in-process loopback transport.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Node ids, node items and configuration documents
//!   - `assertions`: Completion recorders and status assertions
//!   - `harness`: Client setup with tracing and temp directories
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p ua-async-tests
//!
//! # Run specific test suite
//! cargo test -p ua-async-tests --test integration_dispatch
//! cargo test -p ua-async-tests --test integration_node_management
//! cargo test -p ua-async-tests --test integration_config
//!
//! # With dispatch logging
//! RUST_LOG=ua_async_client=trace cargo test -p ua-async-tests -- --nocapture
//! ```
//!
//! ## Test Categories
//!
//! ### Dispatch Tests (`integration_dispatch.rs`)
//! - Exactly-once completion for every token kind
//! - Transform and completion-handler failures
//! - Submission rejection and disconnect
//!
//! ### NodeManagement Tests (`integration_node_management.rs`)
//! - Building and tearing down a small model
//! - Per-item status propagation
//!
//! ### Config Tests (`integration_config.rs`)
//! - TOML loading, validation and environment overrides
//!
//! ## Using the Harness
//!
//! ```
//! use ua_async_tests::common::harness::TestHarness;
//! use ua_async_client::services::attribute;
//! use ua_async_client::types::NodeId;
//!
//! let harness = TestHarness::with_name("doc_example").setup();
//! let client = harness.client();
//! assert!(attribute::read_value(client, &NodeId::OBJECTS_FOLDER).is_err());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::{init_test_logging, temp_test_dir};
}
