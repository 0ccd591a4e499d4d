// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # NodeManagement Integration Tests
//!
//! Builds a small plant model through the NodeManagement services, reads it
//! back through the Attribute services and tears it down again.
//!
//! ## Test Categories
//!
//! - `test_model_*`: Whole-model scenarios
//! - `test_item_*`: Per-item status propagation

use ua_async_client::services::{
    attribute, node_management, AddNodesItem, AddNodesRequest, DeleteNodesItem,
    DeleteNodesRequest, RequestHeader,
};
use ua_async_client::types::{AttributeId, ModellingRule, NodeId, Variant};
use ua_async_core::{StatusCode, UseFuture};

use ua_async_tests::prelude::*;

fn build_model(resources: &TestResources) {
    let response = node_management::add_nodes(
        resources.client(),
        AddNodesRequest {
            header: RequestHeader::default(),
            nodes_to_add: NodeFixtures::model_items(),
        },
    )
    .unwrap();
    assert!(response.results.iter().all(|r| r.status_code.is_good()));
}

// =============================================================================
// Model Scenarios
// =============================================================================

#[test]
fn test_model_build_and_read_back() {
    let resources = TestHarness::with_name("model_build").setup();
    let client = resources.client();
    build_model(&resources);

    let description =
        attribute::read_attribute(client, &NodeFixtures::pump(), AttributeId::Description).unwrap();
    assert!(matches!(description.value, Variant::LocalizedText(ref t) if t.text == "Feed pump"));

    let display_name =
        attribute::read_attribute(client, &NodeFixtures::speed(), AttributeId::DisplayName).unwrap();
    assert!(matches!(display_name.value, Variant::LocalizedText(ref t) if t.text == "Pump speed"));

    assert_eq!(
        attribute::read_value(client, &NodeFixtures::serial_number()).unwrap(),
        Variant::String("SN-0042".to_string())
    );

    let space = resources.transport().address_space();
    assert!(space.has_reference(&NodeId::OBJECTS_FOLDER, &NodeId::ORGANIZES, &NodeFixtures::line()));
    assert!(space.has_reference(&NodeFixtures::line(), &NodeId::HAS_COMPONENT, &NodeFixtures::pump()));
    assert!(space.has_reference(
        &NodeFixtures::pump(),
        &NodeId::HAS_PROPERTY,
        &NodeFixtures::serial_number()
    ));
}

#[test]
fn test_model_operations_chained_from_callbacks() {
    let resources = TestHarness::with_name("model_chained").setup();
    let client = resources.client();
    let recorder = CompletionRecorder::<NodeId>::new();

    let inner = client.clone();
    let chained = recorder.clone();
    node_management::add_folder_async(
        client,
        &NodeId::OBJECTS_FOLDER,
        &NodeFixtures::line(),
        "Line1",
        Default::default(),
        move |code: StatusCode, line: NodeId| {
            assert!(code.is_good());
            node_management::add_object_async(
                &inner,
                &line,
                &NodeFixtures::pump(),
                "Pump",
                NodeFixtures::object_attributes("Feed pump"),
                chained.handler(),
            );
        },
    );

    assert_eq!(resources.drain().unwrap(), 2);
    recorder.assert_completed_once_with(StatusCode::GOOD);
    assert_eq!(recorder.last_value(), Some(NodeFixtures::pump()));
}

#[test]
fn test_model_modelling_rules() {
    let resources = TestHarness::with_name("modelling_rules").setup();
    let client = resources.client();
    build_model(&resources);

    node_management::add_modelling_rule(client, &NodeFixtures::speed(), ModellingRule::Mandatory)
        .unwrap();
    node_management::add_modelling_rule(
        client,
        &NodeFixtures::serial_number(),
        ModellingRule::Optional,
    )
    .unwrap();

    node_management::add_modelling_rule(client, &NodeFixtures::speed(), ModellingRule::Mandatory)
        .assert_status(StatusCode::BAD_DUPLICATE_REFERENCE_NOT_ALLOWED);
    node_management::add_modelling_rule(client, &NodeFixtures::unknown(), ModellingRule::Optional)
        .assert_status(StatusCode::BAD_SOURCE_NODE_ID_INVALID);
}

#[test]
fn test_model_with_custom_types() {
    let resources = TestHarness::with_name("custom_types").setup();
    let client = resources.client();

    let pump_type = node_management::add_object_type(
        client,
        &NodeId::BASE_OBJECT_TYPE,
        &NodeId::string(TEST_NAMESPACE, "PumpType"),
        "PumpType",
        NodeFixtures::object_attributes("Centrifugal pump"),
    )
    .unwrap();
    let feeds = node_management::add_reference_type(
        client,
        &NodeId::HIERARCHICAL_REFERENCES,
        &NodeId::string(TEST_NAMESPACE, "Feeds"),
        "Feeds",
        Default::default(),
    )
    .unwrap();
    let overview = node_management::add_view(
        client,
        &NodeId::VIEWS_FOLDER,
        &NodeId::string(TEST_NAMESPACE, "Overview"),
        "Overview",
        Default::default(),
    )
    .unwrap();

    let pump = node_management::add_node(
        client,
        AddNodesItem::object(&NodeId::OBJECTS_FOLDER, &NodeFixtures::pump(), "Pump")
            .with_type_definition(pump_type.clone()),
    )
    .unwrap();
    node_management::add_reference(client, &overview, &pump, &feeds, true).unwrap();

    let display_name =
        attribute::read_attribute(client, &pump_type, AttributeId::DisplayName).unwrap();
    assert!(matches!(display_name.value, Variant::LocalizedText(ref t) if t.text == "Centrifugal pump"));

    let space = resources.transport().address_space();
    assert!(space.has_reference(&pump, &NodeId::HAS_TYPE_DEFINITION, &pump_type));
    assert!(space.has_reference(&overview, &feeds, &pump));
}

#[test]
fn test_model_teardown() {
    let resources = TestHarness::with_name("model_teardown").setup();
    let client = resources.client();
    let baseline = resources.transport().address_space().node_count();
    build_model(&resources);

    let ids = [
        NodeFixtures::serial_number(),
        NodeFixtures::speed(),
        NodeFixtures::pump(),
        NodeFixtures::line(),
    ];
    let response = node_management::delete_nodes(
        client,
        DeleteNodesRequest {
            header: RequestHeader::default(),
            nodes_to_delete: ids
                .iter()
                .map(|id| DeleteNodesItem {
                    node_id: id.clone(),
                    delete_target_references: true,
                })
                .collect(),
        },
    )
    .unwrap();

    assert_eq!(response.results, vec![StatusCode::GOOD; 4]);
    assert_eq!(resources.transport().address_space().node_count(), baseline);
    assert_eq!(
        resources
            .transport()
            .address_space()
            .references_from(&NodeId::OBJECTS_FOLDER)
            .filter(|r| r.target == NodeFixtures::line())
            .count(),
        0
    );
}

// =============================================================================
// Per-Item Status
// =============================================================================

#[test]
fn test_item_status_reaches_callback() {
    let resources = TestHarness::with_name("item_status").setup();
    let client = resources.client();
    let recorder = CompletionRecorder::<NodeId>::new();

    node_management::add_variable_async(
        client,
        &NodeFixtures::unknown(),
        &NodeFixtures::speed(),
        "Speed",
        NodeFixtures::variable_attributes(0.0),
        recorder.handler(),
    );
    client.run_iterate().unwrap();

    recorder.assert_completed_once_with(StatusCode::BAD_PARENT_NODE_ID_INVALID);
    assert_eq!(recorder.last_value(), Some(NodeId::null()));
}

#[test]
fn test_item_status_reaches_future() {
    let resources = TestHarness::with_name("item_status_future").setup();
    let client = resources.client();
    build_model(&resources);

    let mut future = node_management::add_object_async(
        client,
        &NodeFixtures::line(),
        &NodeFixtures::pump(),
        "Pump",
        Default::default(),
        UseFuture,
    );
    client.run_iterate().unwrap();
    future
        .try_take()
        .unwrap()
        .assert_status(StatusCode::BAD_NODE_ID_EXISTS);
}

#[test]
fn test_item_status_for_references() {
    let resources = TestHarness::with_name("reference_status").setup();
    let client = resources.client();
    build_model(&resources);

    node_management::add_reference(
        client,
        &NodeFixtures::pump(),
        &NodeFixtures::unknown(),
        &NodeId::ORGANIZES,
        true,
    )
    .assert_status(StatusCode::BAD_TARGET_NODE_ID_INVALID);

    node_management::add_reference(
        client,
        &NodeFixtures::pump(),
        &NodeFixtures::line(),
        &NodeId::OBJECTS_FOLDER,
        true,
    )
    .assert_status(StatusCode::BAD_REFERENCE_TYPE_ID_INVALID);

    node_management::delete_reference(
        client,
        &NodeFixtures::line(),
        &NodeFixtures::pump(),
        &NodeId::HAS_COMPONENT,
        true,
        true,
    )
    .unwrap();
    node_management::delete_reference(
        client,
        &NodeFixtures::line(),
        &NodeFixtures::pump(),
        &NodeId::HAS_COMPONENT,
        true,
        true,
    )
    .assert_status(StatusCode::BAD_NOT_FOUND);
}

#[test]
fn test_item_uncertain_delete_completes_good() {
    let resources = TestHarness::with_name("delete_uncertain").setup();
    let client = resources.client();
    build_model(&resources);

    let recorder = CompletionRecorder::<()>::new();
    node_management::delete_node_async(client, &NodeFixtures::speed(), false, recorder.handler());
    client.run_iterate().unwrap();

    recorder.assert_completed_once_with(StatusCode::GOOD);
    let space = resources.transport().address_space();
    assert!(!space.contains(&NodeFixtures::speed()));
    assert!(space.has_reference(&NodeFixtures::pump(), &NodeId::HAS_COMPONENT, &NodeFixtures::speed()));
}
