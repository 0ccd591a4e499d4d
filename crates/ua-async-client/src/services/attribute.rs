// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Attribute service set: Read and Write.
//!
//! # Examples
//!
//! ```
//! use ua_async_client::services::attribute;
//! use ua_async_client::types::{NodeId, Variant};
//! use ua_async_client::{Client, LoopbackTransport};
//! use ua_async_core::UseFuture;
//!
//! let client = Client::new(LoopbackTransport::new());
//! let mut future = attribute::read_value_async(&client, &NodeId::OBJECTS_FOLDER, UseFuture);
//! client.run_iterate().unwrap();
//!
//! // Objects is not a variable.
//! assert!(future.try_take().unwrap().is_err());
//! ```

use ua_async_core::UaResult;

use crate::client::{send_request, Client, RequestToken, SyncOperation, Transport};
use crate::types::{AttributeId, DataValue, NodeId, Variant};

use super::messages::{ReadRequest, ReadResponse, ReadValueId, WriteRequest, WriteResponse, WriteValue};
use super::{single_result, wrap_response};

// =============================================================================
// Read
// =============================================================================

/// Reads one or more attributes.
pub fn read_async<Tr, K, M>(client: &Client<Tr>, request: ReadRequest, token: K) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<ReadResponse, M>,
{
    send_request(client, request, wrap_response, token)
}

/// Reads one or more attributes.
pub fn read<Tr>(client: &Client<Tr>, request: ReadRequest) -> UaResult<ReadResponse>
where
    Tr: Transport + 'static,
{
    read_async(client, request, SyncOperation)
}

/// Reads one attribute of a node.
///
/// A bad status on the returned value fails the operation with that status.
pub fn read_attribute_async<Tr, K, M>(
    client: &Client<Tr>,
    node_id: &NodeId,
    attribute_id: AttributeId,
    token: K,
) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<DataValue, M>,
{
    let request = ReadRequest::new(vec![ReadValueId::new(node_id.clone(), attribute_id)]);
    send_request(
        client,
        request,
        |response: &mut ReadResponse| {
            let value = single_result(response)?;
            value.status.throw_if_bad()?;
            Ok(value)
        },
        token,
    )
}

/// Reads one attribute of a node.
pub fn read_attribute<Tr>(
    client: &Client<Tr>,
    node_id: &NodeId,
    attribute_id: AttributeId,
) -> UaResult<DataValue>
where
    Tr: Transport + 'static,
{
    read_attribute_async(client, node_id, attribute_id, SyncOperation)
}

/// Reads the value attribute of a variable.
pub fn read_value_async<Tr, K, M>(client: &Client<Tr>, node_id: &NodeId, token: K) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<Variant, M>,
{
    let request = ReadRequest::new(vec![ReadValueId::new(node_id.clone(), AttributeId::Value)]);
    send_request(
        client,
        request,
        |response: &mut ReadResponse| {
            let value = single_result(response)?;
            value.status.throw_if_bad()?;
            Ok(value.value)
        },
        token,
    )
}

/// Reads the value attribute of a variable.
pub fn read_value<Tr>(client: &Client<Tr>, node_id: &NodeId) -> UaResult<Variant>
where
    Tr: Transport + 'static,
{
    read_value_async(client, node_id, SyncOperation)
}

// =============================================================================
// Write
// =============================================================================

/// Writes one or more attributes.
pub fn write_async<Tr, K, M>(client: &Client<Tr>, request: WriteRequest, token: K) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<WriteResponse, M>,
{
    send_request(client, request, wrap_response, token)
}

/// Writes one or more attributes.
pub fn write<Tr>(client: &Client<Tr>, request: WriteRequest) -> UaResult<WriteResponse>
where
    Tr: Transport + 'static,
{
    write_async(client, request, SyncOperation)
}

/// Writes one attribute of a node.
pub fn write_attribute_async<Tr, K, M>(
    client: &Client<Tr>,
    node_id: &NodeId,
    attribute_id: AttributeId,
    value: DataValue,
    token: K,
) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<(), M>,
{
    let request = WriteRequest::new(vec![WriteValue::new(node_id.clone(), attribute_id, value)]);
    send_request(
        client,
        request,
        |response: &mut WriteResponse| single_result(response)?.throw_if_bad(),
        token,
    )
}

/// Writes one attribute of a node.
pub fn write_attribute<Tr>(
    client: &Client<Tr>,
    node_id: &NodeId,
    attribute_id: AttributeId,
    value: DataValue,
) -> UaResult<()>
where
    Tr: Transport + 'static,
{
    write_attribute_async(client, node_id, attribute_id, value, SyncOperation)
}

/// Writes the value attribute of a variable.
pub fn write_value_async<Tr, K, M>(
    client: &Client<Tr>,
    node_id: &NodeId,
    value: Variant,
    token: K,
) -> K::Output
where
    Tr: Transport + 'static,
    K: RequestToken<(), M>,
{
    write_attribute_async(client, node_id, AttributeId::Value, DataValue::new(value), token)
}

/// Writes the value attribute of a variable.
pub fn write_value<Tr>(client: &Client<Tr>, node_id: &NodeId, value: Variant) -> UaResult<()>
where
    Tr: Transport + 'static,
{
    write_value_async(client, node_id, value, SyncOperation)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use ua_async_core::{StatusCode, UseFuture};

    use super::*;
    use crate::loopback::LoopbackTransport;
    use crate::types::QualifiedName;

    fn client() -> Client<LoopbackTransport> {
        Client::new(LoopbackTransport::new())
    }

    #[test]
    fn test_read_browse_name() {
        let client = client();
        let value = read_attribute(&client, &NodeId::OBJECTS_FOLDER, AttributeId::BrowseName)
            .unwrap();
        assert_eq!(
            value.value.as_qualified_name(),
            Some(&QualifiedName::new(0, "Objects"))
        );
        assert!(value.server_timestamp.is_some());
    }

    #[test]
    fn test_read_unknown_node_fails_with_item_status() {
        let client = client();
        let error = read_value(&client, &NodeId::numeric(1, 4242)).unwrap_err();
        assert_eq!(error.status_code(), StatusCode::BAD_NODE_ID_UNKNOWN);
    }

    #[test]
    fn test_read_many_keeps_item_statuses() {
        let client = client();
        let response = read(
            &client,
            ReadRequest::new(vec![
                ReadValueId::new(NodeId::ROOT_FOLDER, AttributeId::DisplayName),
                ReadValueId::new(NodeId::numeric(1, 4242), AttributeId::Value),
            ]),
        )
        .unwrap();
        assert_eq!(response.results.len(), 2);
        assert!(response.results[0].is_good());
        assert_eq!(response.results[1].status, StatusCode::BAD_NODE_ID_UNKNOWN);
    }

    #[test]
    fn test_write_then_read_value_async() {
        let client = client();
        let id = NodeId::string(1, "Setpoint");
        client
            .transport()
            .address_space_mut()
            .insert_variable(&NodeId::OBJECTS_FOLDER, &id, "Setpoint", Variant::Double(0.0));

        let written = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&written);
        write_value_async(&client, &id, Variant::Double(42.5), move |code: StatusCode| {
            *sink.borrow_mut() = Some(code);
        });
        let mut future = read_value_async(&client, &id, UseFuture);
        client.run_iterate().unwrap();

        assert_eq!(*written.borrow(), Some(StatusCode::GOOD));
        assert_eq!(future.try_take().unwrap().unwrap(), Variant::Double(42.5));
    }

    #[test]
    fn test_write_non_value_attribute_is_rejected() {
        let client = client();
        let error = write_attribute(
            &client,
            &NodeId::OBJECTS_FOLDER,
            AttributeId::DisplayName,
            DataValue::new("Things"),
        )
        .unwrap_err();
        assert_eq!(error.status_code(), StatusCode::BAD_NOT_WRITABLE);
    }
}
