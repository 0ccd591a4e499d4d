// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! NodeManagement service set: add and delete nodes and references.
//!
//! The single-item helpers check the per-item status, so a rejected item
//! reaches the completion handler as that status (for example
//! `BadNodeIdExists`) rather than as a generic internal error.
//!
//! # Examples
//!
//! ```
//! use ua_async_client::services::{node_management, NodeAttributes};
//! use ua_async_client::types::{ModellingRule, NodeId};
//! use ua_async_client::{Client, LoopbackTransport};
//!
//! let client = Client::new(LoopbackTransport::new());
//!
//! let line = node_management::add_folder(
//!     &client,
//!     &NodeId::OBJECTS_FOLDER,
//!     &NodeId::string(1, "Line1"),
//!     "Line1",
//!     NodeAttributes::default(),
//! )
//! .unwrap();
//! let pump = node_management::add_object(
//!     &client,
//!     &line,
//!     &NodeId::null(),
//!     "Pump",
//!     NodeAttributes::default(),
//! )
//! .unwrap();
//! node_management::add_modelling_rule(&client, &pump, ModellingRule::Mandatory).unwrap();
//! node_management::delete_node(&client, &pump, true).unwrap();
//! ```

use ua_async_core::UaResult;

use crate::client::{send_request, Client, RequestToken, SyncOperation, Transport};
use crate::types::{ModellingRule, NodeClass, NodeId};

use super::messages::{
    AddNodesItem, AddNodesRequest, AddNodesResponse, AddReferencesItem, AddReferencesRequest,
    AddReferencesResponse, DeleteNodesItem, DeleteNodesRequest, DeleteNodesResponse,
    DeleteReferencesItem, DeleteReferencesRequest, DeleteReferencesResponse, NodeAttributes,
    RequestHeader,
};
use super::{single_result, wrap_response};

// =============================================================================
// AddNodes
// =============================================================================

/// Adds one or more nodes.
pub fn add_nodes_async<Tr, K, M>(client: &Client<Tr>, request: AddNodesRequest, token: K) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<AddNodesResponse, M>,
{
    send_request(client, request, wrap_response, token)
}

/// Adds one or more nodes.
pub fn add_nodes<Tr>(client: &Client<Tr>, request: AddNodesRequest) -> UaResult<AddNodesResponse>
where
    Tr: Transport + 'static,
{
    add_nodes_async(client, request, SyncOperation)
}

/// Adds one node and returns its id.
pub fn add_node_async<Tr, K, M>(client: &Client<Tr>, item: AddNodesItem, token: K) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<NodeId, M>,
{
    let request = AddNodesRequest {
        header: RequestHeader::default(),
        nodes_to_add: vec![item],
    };
    send_request(
        client,
        request,
        |response: &mut AddNodesResponse| {
            let result = single_result(response)?;
            result.status_code.throw_if_bad()?;
            Ok(result.added_node_id)
        },
        token,
    )
}

/// Adds one node and returns its id.
pub fn add_node<Tr>(client: &Client<Tr>, item: AddNodesItem) -> UaResult<NodeId>
where
    Tr: Transport + 'static,
{
    add_node_async(client, item, SyncOperation)
}

macro_rules! add_node_shortcut {
    ($(#[$doc:meta])* $name:ident, $name_async:ident, $ctor:ident) => {
        $(#[$doc])*
        pub fn $name_async<Tr, K, M>(
            client: &Client<Tr>,
            parent_id: &NodeId,
            id: &NodeId,
            browse_name: &str,
            attributes: NodeAttributes,
            token: K,
        ) -> K::Output
        where
            Tr: Transport + 'static,
            K: RequestToken<NodeId, M>,
        {
            let item = AddNodesItem::$ctor(parent_id, id, browse_name).with_attributes(attributes);
            add_node_async(client, item, token)
        }

        $(#[$doc])*
        pub fn $name<Tr>(
            client: &Client<Tr>,
            parent_id: &NodeId,
            id: &NodeId,
            browse_name: &str,
            attributes: NodeAttributes,
        ) -> UaResult<NodeId>
        where
            Tr: Transport + 'static,
        {
            $name_async(client, parent_id, id, browse_name, attributes, SyncOperation)
        }
    };
}

add_node_shortcut!(
    /// Adds an object of `BaseObjectType` below `parent_id` with `HasComponent`.
    add_object,
    add_object_async,
    object
);

add_node_shortcut!(
    /// Adds a folder below `parent_id` with `Organizes`.
    add_folder,
    add_folder_async,
    folder
);

add_node_shortcut!(
    /// Adds a variable of `BaseDataVariableType` below `parent_id` with `HasComponent`.
    add_variable,
    add_variable_async,
    variable
);

add_node_shortcut!(
    /// Adds a property below `parent_id` with `HasProperty`.
    add_property,
    add_property_async,
    property
);

add_node_shortcut!(
    /// Adds an object type below its supertype `parent_id` with `HasSubtype`.
    add_object_type,
    add_object_type_async,
    object_type
);

add_node_shortcut!(
    /// Adds a variable type below its supertype `parent_id` with `HasSubtype`.
    add_variable_type,
    add_variable_type_async,
    variable_type
);

add_node_shortcut!(
    /// Adds a reference type below its supertype `parent_id` with `HasSubtype`.
    add_reference_type,
    add_reference_type_async,
    reference_type
);

add_node_shortcut!(
    /// Adds a data type below its supertype `parent_id` with `HasSubtype`.
    add_data_type,
    add_data_type_async,
    data_type
);

add_node_shortcut!(
    /// Adds a view below `parent_id` with `Organizes`.
    add_view,
    add_view_async,
    view
);

add_node_shortcut!(
    /// Adds a method below `parent_id` with `HasComponent`.
    ///
    /// The method has no callback; a server binds one afterwards.
    add_method,
    add_method_async,
    method
);

// =============================================================================
// AddReferences
// =============================================================================

/// Adds one or more references.
pub fn add_references_async<Tr, K, M>(
    client: &Client<Tr>,
    request: AddReferencesRequest,
    token: K,
) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<AddReferencesResponse, M>,
{
    send_request(client, request, wrap_response, token)
}

/// Adds one or more references.
pub fn add_references<Tr>(
    client: &Client<Tr>,
    request: AddReferencesRequest,
) -> UaResult<AddReferencesResponse>
where
    Tr: Transport + 'static,
{
    add_references_async(client, request, SyncOperation)
}

/// Adds one reference.
pub fn add_reference_async<Tr, K, M>(
    client: &Client<Tr>,
    source_id: &NodeId,
    target_id: &NodeId,
    reference_type: &NodeId,
    is_forward: bool,
    token: K,
) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<(), M>,
{
    let request = AddReferencesRequest {
        header: RequestHeader::default(),
        references_to_add: vec![AddReferencesItem::new(
            source_id,
            target_id,
            reference_type,
            is_forward,
        )],
    };
    send_request(
        client,
        request,
        |response: &mut AddReferencesResponse| single_result(response)?.throw_if_bad(),
        token,
    )
}

/// Adds one reference.
pub fn add_reference<Tr>(
    client: &Client<Tr>,
    source_id: &NodeId,
    target_id: &NodeId,
    reference_type: &NodeId,
    is_forward: bool,
) -> UaResult<()>
where
    Tr: Transport + 'static,
{
    add_reference_async(client, source_id, target_id, reference_type, is_forward, SyncOperation)
}

/// Attaches a modelling rule to `id` with a `HasModellingRule` reference.
pub fn add_modelling_rule_async<Tr, K, M>(
    client: &Client<Tr>,
    id: &NodeId,
    rule: ModellingRule,
    token: K,
) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<(), M>,
{
    let mut item = AddReferencesItem::new(id, &rule.node_id(), &NodeId::HAS_MODELLING_RULE, true);
    item.target_node_class = Some(NodeClass::Object);
    let request = AddReferencesRequest {
        header: RequestHeader::default(),
        references_to_add: vec![item],
    };
    send_request(
        client,
        request,
        |response: &mut AddReferencesResponse| single_result(response)?.throw_if_bad(),
        token,
    )
}

/// Attaches a modelling rule to `id`.
pub fn add_modelling_rule<Tr>(client: &Client<Tr>, id: &NodeId, rule: ModellingRule) -> UaResult<()>
where
    Tr: Transport + 'static,
{
    add_modelling_rule_async(client, id, rule, SyncOperation)
}

// =============================================================================
// DeleteNodes
// =============================================================================

/// Deletes one or more nodes.
pub fn delete_nodes_async<Tr, K, M>(
    client: &Client<Tr>,
    request: DeleteNodesRequest,
    token: K,
) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<DeleteNodesResponse, M>,
{
    send_request(client, request, wrap_response, token)
}

/// Deletes one or more nodes.
pub fn delete_nodes<Tr>(
    client: &Client<Tr>,
    request: DeleteNodesRequest,
) -> UaResult<DeleteNodesResponse>
where
    Tr: Transport + 'static,
{
    delete_nodes_async(client, request, SyncOperation)
}

/// Deletes one node.
///
/// With `delete_references`, references pointing at the node from other
/// nodes are removed too.
pub fn delete_node_async<Tr, K, M>(
    client: &Client<Tr>,
    id: &NodeId,
    delete_references: bool,
    token: K,
) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<(), M>,
{
    let request = DeleteNodesRequest {
        header: RequestHeader::default(),
        nodes_to_delete: vec![DeleteNodesItem {
            node_id: id.clone(),
            delete_target_references: delete_references,
        }],
    };
    send_request(
        client,
        request,
        |response: &mut DeleteNodesResponse| single_result(response)?.throw_if_bad(),
        token,
    )
}

/// Deletes one node.
pub fn delete_node<Tr>(client: &Client<Tr>, id: &NodeId, delete_references: bool) -> UaResult<()>
where
    Tr: Transport + 'static,
{
    delete_node_async(client, id, delete_references, SyncOperation)
}

// =============================================================================
// DeleteReferences
// =============================================================================

/// Deletes one or more references.
pub fn delete_references_async<Tr, K, M>(
    client: &Client<Tr>,
    request: DeleteReferencesRequest,
    token: K,
) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<DeleteReferencesResponse, M>,
{
    send_request(client, request, wrap_response, token)
}

/// Deletes one or more references.
pub fn delete_references<Tr>(
    client: &Client<Tr>,
    request: DeleteReferencesRequest,
) -> UaResult<DeleteReferencesResponse>
where
    Tr: Transport + 'static,
{
    delete_references_async(client, request, SyncOperation)
}

/// Deletes one reference.
pub fn delete_reference_async<Tr, K, M>(
    client: &Client<Tr>,
    source_id: &NodeId,
    target_id: &NodeId,
    reference_type: &NodeId,
    is_forward: bool,
    delete_bidirectional: bool,
    token: K,
) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<(), M>,
{
    let request = DeleteReferencesRequest {
        header: RequestHeader::default(),
        references_to_delete: vec![DeleteReferencesItem {
            source_node_id: source_id.clone(),
            reference_type_id: reference_type.clone(),
            is_forward,
            target_node_id: target_id.clone(),
            delete_bidirectional,
        }],
    };
    send_request(
        client,
        request,
        |response: &mut DeleteReferencesResponse| single_result(response)?.throw_if_bad(),
        token,
    )
}

/// Deletes one reference.
pub fn delete_reference<Tr>(
    client: &Client<Tr>,
    source_id: &NodeId,
    target_id: &NodeId,
    reference_type: &NodeId,
    is_forward: bool,
    delete_bidirectional: bool,
) -> UaResult<()>
where
    Tr: Transport + 'static,
{
    delete_reference_async(
        client,
        source_id,
        target_id,
        reference_type,
        is_forward,
        delete_bidirectional,
        SyncOperation,
    )
}

// =============================================================================
// Tests
// =============================================================================
