// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA client request dispatch over callback-only transports.
//!
//! The transport underneath a [`Client`] only knows how to queue a request
//! and later call a plain function with an opaque context. This crate turns
//! that into typed service operations whose outcome is delivered through any
//! completion token from `ua-async-core`, or synchronously.
//!
//! # Features
//!
//! - Attribute services: Read, Write
//! - NodeManagement services: AddNodes, AddReferences, DeleteNodes,
//!   DeleteReferences
//! - Completion by closure, future, deferred launch, detached, or blocking
//! - Completion-handler failures parked per connection and rethrown from
//!   [`Client::run_iterate`]
//! - In-process [`LoopbackTransport`] for tests and examples
//!
//! # Example
//!
//! ```
//! use ua_async_client::services::{attribute, node_management, NodeAttributes};
//! use ua_async_client::types::{NodeId, Variant};
//! use ua_async_client::{Client, LoopbackTransport};
//! use ua_async_core::StatusCode;
//!
//! let client = Client::new(LoopbackTransport::new());
//!
//! let id = node_management::add_variable(
//!     &client,
//!     &NodeId::OBJECTS_FOLDER,
//!     &NodeId::string(1, "Speed"),
//!     "Speed",
//!     NodeAttributes {
//!         value: Some(Variant::Double(0.0)),
//!         ..Default::default()
//!     },
//! )
//! .unwrap();
//!
//! attribute::write_value_async(&client, &id, Variant::Double(12.5), |code: StatusCode| {
//!     assert!(code.is_good());
//! });
//! client.run_iterate().unwrap();
//!
//! assert_eq!(attribute::read_value(&client, &id).unwrap(), Variant::Double(12.5));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod loopback;
pub mod services;
pub mod types;

pub use client::{
    send_request, send_request_default, Async, Blocking, CallbackAndContext, Client, ClientStats,
    RawCallback, RawContext, RequestId, RequestToken, ServiceAdapter, ServiceKind, SubmitError,
    SyncOperation, Transform, Transport, TransportState,
};
pub use config::{ClientConfig, ClientConfigBuilder, ENV_ENDPOINT, ENV_REQUEST_TIMEOUT};
pub use loopback::{AddressSpace, LoopbackTransport};
pub use types::{
    AttributeId, DataValue, LocalizedText, ModellingRule, NodeClass, NodeId, NodeIdentifier,
    QualifiedName, Variant,
};
