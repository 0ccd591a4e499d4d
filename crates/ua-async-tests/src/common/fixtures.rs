// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built node ids, node items and configuration documents.

use ua_async_client::services::{AddNodesItem, NodeAttributes, ReadRequest, ReadValueId};
use ua_async_client::types::{AttributeId, LocalizedText, NodeId, Variant};

/// Namespace used for nodes created by tests.
pub const TEST_NAMESPACE: u16 = 2;

// =============================================================================
// Node Fixtures
// =============================================================================

/// A small plant model: a line folder holding a pump with two variables.
pub struct NodeFixtures;

impl NodeFixtures {
    /// Folder for production line 1.
    pub fn line() -> NodeId {
        NodeId::string(TEST_NAMESPACE, "Line1")
    }

    /// Pump object inside the line.
    pub fn pump() -> NodeId {
        NodeId::string(TEST_NAMESPACE, "Line1.Pump")
    }

    /// Pump speed variable.
    pub fn speed() -> NodeId {
        NodeId::string(TEST_NAMESPACE, "Line1.Pump.Speed")
    }

    /// Pump serial number property.
    pub fn serial_number() -> NodeId {
        NodeId::string(TEST_NAMESPACE, "Line1.Pump.SerialNumber")
    }

    /// A node id that no fixture creates.
    pub fn unknown() -> NodeId {
        NodeId::numeric(TEST_NAMESPACE, 404)
    }

    /// Items building the whole model, parents first.
    pub fn model_items() -> Vec<AddNodesItem> {
        vec![
            AddNodesItem::folder(&NodeId::OBJECTS_FOLDER, &Self::line(), "Line1"),
            AddNodesItem::object(&Self::line(), &Self::pump(), "Pump")
                .with_description("Feed pump"),
            AddNodesItem::variable(&Self::pump(), &Self::speed(), "Speed")
                .with_value(0.0)
                .with_display_name("Pump speed"),
            AddNodesItem::property(&Self::pump(), &Self::serial_number(), "SerialNumber")
                .with_value("SN-0042"),
        ]
    }

    /// Attributes for a variable holding `value`.
    pub fn variable_attributes(value: impl Into<Variant>) -> NodeAttributes {
        NodeAttributes {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Attributes for an object with a display name.
    pub fn object_attributes(display_name: &str) -> NodeAttributes {
        NodeAttributes {
            display_name: LocalizedText::text(display_name),
            ..Default::default()
        }
    }

    /// Read of the browse name of the Objects folder.
    pub fn objects_browse_name_read() -> ReadRequest {
        ReadRequest::new(vec![ReadValueId::new(
            NodeId::OBJECTS_FOLDER,
            AttributeId::BrowseName,
        )])
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Configuration documents.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// Complete TOML configuration.
    pub fn full_toml() -> &'static str {
        r#"
endpoint = "opc.tcp://plant-server:4840"
application_name = "line-monitor"
session_name = "line-monitor-session"
request_timeout = "2s 500ms"
max_pending_requests = 64
"#
    }

    /// Minimal TOML configuration relying on defaults.
    pub fn minimal_toml() -> &'static str {
        r#"endpoint = "opc.tcp://plant-server:4840""#
    }

    /// TOML configuration with an endpoint of the wrong scheme.
    pub fn invalid_endpoint_toml() -> &'static str {
        r#"endpoint = "http://plant-server:4840""#
    }
}
