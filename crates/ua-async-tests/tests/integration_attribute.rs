// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Attribute Integration Tests
//!
//! Reads and writes against a seeded model through the Attribute services.
//!
//! ## Test Categories
//!
//! - `test_write_*`: Write service and its shortcuts
//! - `test_read_*`: Read service with several items

use ua_async_client::services::{attribute, ReadRequest, ReadValueId, WriteRequest, WriteValue};
use ua_async_client::types::{AttributeId, DataValue, NodeId, Variant};
use ua_async_core::{StatusCode, UseFuture};

use ua_async_tests::prelude::*;

fn seeded(name: &str) -> TestResources {
    let resources = TestHarness::new(TestHarnessConfig::new(name).without_tracing()).setup();
    resources.transport().address_space_mut().insert_variable(
        &NodeId::OBJECTS_FOLDER,
        &NodeFixtures::speed(),
        "Speed",
        Variant::Double(0.0),
    );
    resources
}

// =============================================================================
// Write
// =============================================================================

#[test]
fn test_write_value_then_read_back() {
    let resources = seeded("write_value");
    let client = resources.client();

    attribute::write_value(client, &NodeFixtures::speed(), Variant::Double(1450.0)).unwrap();
    assert_eq!(
        attribute::read_value(client, &NodeFixtures::speed()).unwrap(),
        Variant::Double(1450.0)
    );

    attribute::write_value(client, &NodeFixtures::speed(), Variant::String("fast".into()))
        .assert_status(StatusCode::BAD_TYPE_MISMATCH);
    attribute::write_value(client, &NodeFixtures::unknown(), Variant::Double(1.0))
        .assert_status(StatusCode::BAD_NODE_ID_UNKNOWN);
}

#[test]
fn test_write_attribute_rejects_non_value_attributes() {
    let resources = seeded("write_attribute");
    let client = resources.client();

    attribute::write_attribute(
        client,
        &NodeFixtures::speed(),
        AttributeId::DisplayName,
        DataValue::new("Motor speed"),
    )
    .assert_status(StatusCode::BAD_NOT_WRITABLE);

    attribute::write_attribute(
        client,
        &NodeFixtures::speed(),
        AttributeId::Value,
        DataValue::new(3.5f64),
    )
    .unwrap();
}

#[test]
fn test_write_batch_keeps_item_statuses() {
    let resources = seeded("write_batch");
    let client = resources.client();

    let response = attribute::write(
        client,
        WriteRequest::new(vec![
            WriteValue::new(NodeFixtures::speed(), AttributeId::Value, DataValue::new(9.0f64)),
            WriteValue::new(NodeId::OBJECTS_FOLDER, AttributeId::Value, DataValue::new(1i32)),
        ]),
    )
    .unwrap();
    assert_eq!(
        response.results,
        vec![StatusCode::GOOD, StatusCode::BAD_NOT_WRITABLE]
    );
}

// =============================================================================
// Read
// =============================================================================

#[test]
fn test_read_batch_through_future() {
    let resources = seeded("read_batch");
    let client = resources.client();

    let mut future = attribute::read_async(
        client,
        ReadRequest::new(vec![
            ReadValueId::new(NodeFixtures::speed(), AttributeId::Value),
            ReadValueId::new(NodeFixtures::unknown(), AttributeId::Value),
        ]),
        UseFuture,
    );
    assert_eq!(resources.drain().unwrap(), 1);

    let response = future.try_take().unwrap().unwrap();
    assert_eq!(response.results[0].value, Variant::Double(0.0));
    assert_eq!(response.results[1].status, StatusCode::BAD_NODE_ID_UNKNOWN);
}
