// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA service sets.
//!
//! Every operation comes in two forms: `op(...)` runs synchronously and
//! returns `UaResult<T>`, `op_async(..., token)` accepts any request token
//! and returns whatever that token produces.
//!
//! - [`attribute`]: Read and Write
//! - [`node_management`]: AddNodes, AddReferences, DeleteNodes, DeleteReferences

pub mod attribute;
pub mod messages;
pub mod node_management;

use std::mem;

use ua_async_core::{StatusCode, UaError, UaResult};

pub use messages::{
    AddNodesItem, AddNodesRequest, AddNodesResponse, AddNodesResult, AddReferencesItem,
    AddReferencesRequest, AddReferencesResponse, DeleteNodesItem, DeleteNodesRequest,
    DeleteNodesResponse, DeleteReferencesItem, DeleteReferencesRequest, DeleteReferencesResponse,
    NodeAttributes, ReadRequest, ReadResponse, ReadValueId, RequestHeader, ResponseHeader,
    ServiceRequest, ServiceResponse, WriteRequest, WriteResponse, WriteValue,
};

/// Transform returning the whole response.
pub fn wrap_response<Resp: Default>(response: &mut Resp) -> UaResult<Resp> {
    Ok(mem::take(response))
}

/// Transform returning the only result of a single-item request.
///
/// Fails with the service result if it is bad, and with
/// `BadUnexpectedError` unless there is exactly one result.
pub fn single_result<Resp: ServiceResponse>(response: &mut Resp) -> UaResult<Resp::Result> {
    response.response_header().service_result.throw_if_bad()?;
    let results = response.results_mut();
    if results.len() != 1 {
        return Err(UaError::from_status(StatusCode::BAD_UNEXPECTED_ERROR));
    }
    results
        .pop()
        .ok_or_else(|| UaError::from_status(StatusCode::BAD_UNEXPECTED_ERROR))
}
