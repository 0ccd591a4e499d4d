// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-process transport.
//!
//! [`LoopbackTransport`] queues requests on `submit` and answers them from an
//! in-memory [`AddressSpace`] during `pump`. Each pass serves the requests that
//! were queued when it started; requests submitted by callbacks during the
//! pass wait for the next one.
//!
//! Fault injection for tests:
//!
//! - [`fail_next_submit`](LoopbackTransport::fail_next_submit) rejects the next
//!   submission with a given status;
//! - [`drop_next_response`](LoopbackTransport::drop_next_response) delivers a
//!   null response for the next request served;
//! - [`close`](LoopbackTransport::close) disconnects: submissions are rejected
//!   with `BadDisconnect`, queued requests receive null responses and `pump`
//!   reports [`UaError::Disconnected`].

mod address_space;

use std::any::Any;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace, warn};

use ua_async_core::{StatusCode, UaError, UaResult};

use crate::client::{
    RawCallback, RawContext, RequestId, ServiceKind, SubmitError, Transport, TransportState,
};
use crate::config::ClientConfig;
use crate::services::messages::{
    AddNodesRequest, AddNodesResponse, AddReferencesRequest, AddReferencesResponse,
    DeleteNodesRequest, DeleteNodesResponse, DeleteReferencesRequest, DeleteReferencesResponse,
    ReadRequest, ReadResponse, ResponseHeader, ServiceRequest, WriteRequest, WriteResponse,
};

pub use address_space::{AddressSpace, Node, Reference};

struct PendingRequest {
    request_id: RequestId,
    service: ServiceKind,
    request: Box<dyn Any>,
    callback: RawCallback,
    context: RawContext,
}

/// Transport answering requests from an in-memory address space.
pub struct LoopbackTransport {
    state: Cell<TransportState>,
    queue: RefCell<VecDeque<PendingRequest>>,
    address_space: RefCell<AddressSpace>,
    next_request_id: Cell<RequestId>,
    max_pending: usize,
    fail_next: Cell<Option<StatusCode>>,
    drop_next: Cell<bool>,
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackTransport {
    /// Creates a connected transport over the standard namespace 0 nodes.
    pub fn new() -> Self {
        Self::with_address_space(AddressSpace::new())
    }

    /// Creates a connected transport over `address_space`.
    pub fn with_address_space(address_space: AddressSpace) -> Self {
        Self {
            state: Cell::new(TransportState::Connected),
            queue: RefCell::new(VecDeque::new()),
            address_space: RefCell::new(address_space),
            next_request_id: Cell::new(1),
            max_pending: 0,
            fail_next: Cell::new(None),
            drop_next: Cell::new(false),
        }
    }

    /// Creates a transport honoring the queue limit of `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new().with_max_pending(config.max_pending_requests)
    }

    /// Limits the number of queued requests; 0 means unlimited.
    ///
    /// Submissions beyond the limit are rejected with `BadTooManyOperations`.
    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }

    /// Returns the number of queued requests.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Rejects the next submission with `status`.
    pub fn fail_next_submit(&self, status: StatusCode) {
        self.fail_next.set(Some(status));
    }

    /// Delivers a null response for the next request served.
    pub fn drop_next_response(&self) {
        self.drop_next.set(true);
    }

    /// Disconnects the transport.
    pub fn close(&self) {
        debug!(pending = self.pending(), "loopback transport closed");
        self.state.set(TransportState::Disconnected);
    }

    /// Reconnects a closed transport.
    pub fn reopen(&self) {
        debug!("loopback transport reopened");
        self.state.set(TransportState::Connected);
    }

    /// Returns the address space.
    ///
    /// # Panics
    ///
    /// Panics if called while the address space is mutably borrowed.
    pub fn address_space(&self) -> Ref<'_, AddressSpace> {
        self.address_space.borrow()
    }

    /// Returns the address space for direct modification.
    ///
    /// # Panics
    ///
    /// Panics if the address space is already borrowed.
    pub fn address_space_mut(&self) -> RefMut<'_, AddressSpace> {
        self.address_space.borrow_mut()
    }

    fn allocate_request_id(&self) -> RequestId {
        let id = self.next_request_id.get();
        self.next_request_id.set(id.wrapping_add(1).max(1));
        id
    }

    fn serve(&self, service: ServiceKind, request: &dyn Any) -> Option<Box<dyn Any>> {
        match service {
            ServiceKind::Read => self.answer::<ReadRequest, _>(request, |space, request| ReadResponse {
                header: ResponseHeader::answering(&request.header, StatusCode::GOOD),
                results: request.nodes_to_read.iter().map(|item| space.read(item)).collect(),
            }),
            ServiceKind::Write => self.answer::<WriteRequest, _>(request, |space, request| WriteResponse {
                header: ResponseHeader::answering(&request.header, StatusCode::GOOD),
                results: request
                    .nodes_to_write
                    .iter()
                    .map(|item| space.write(item))
                    .collect(),
            }),
            ServiceKind::AddNodes => {
                self.answer::<AddNodesRequest, _>(request, |space, request| AddNodesResponse {
                    header: ResponseHeader::answering(&request.header, StatusCode::GOOD),
                    results: request
                        .nodes_to_add
                        .iter()
                        .map(|item| space.add_node(item))
                        .collect(),
                })
            }
            ServiceKind::AddReferences => {
                self.answer::<AddReferencesRequest, _>(request, |space, request| {
                    AddReferencesResponse {
                        header: ResponseHeader::answering(&request.header, StatusCode::GOOD),
                        results: request
                            .references_to_add
                            .iter()
                            .map(|item| space.add_reference(item))
                            .collect(),
                    }
                })
            }
            ServiceKind::DeleteNodes => {
                self.answer::<DeleteNodesRequest, _>(request, |space, request| DeleteNodesResponse {
                    header: ResponseHeader::answering(&request.header, StatusCode::GOOD),
                    results: request
                        .nodes_to_delete
                        .iter()
                        .map(|item| space.delete_node(item))
                        .collect(),
                })
            }
            ServiceKind::DeleteReferences => {
                self.answer::<DeleteReferencesRequest, _>(request, |space, request| {
                    DeleteReferencesResponse {
                        header: ResponseHeader::answering(&request.header, StatusCode::GOOD),
                        results: request
                            .references_to_delete
                            .iter()
                            .map(|item| space.delete_reference(item))
                            .collect(),
                    }
                })
            }
        }
    }

    fn answer<R, H>(&self, request: &dyn Any, handler: H) -> Option<Box<dyn Any>>
    where
        R: ServiceRequest,
        H: FnOnce(&mut AddressSpace, &R) -> R::Response,
    {
        let Some(request) = request.downcast_ref::<R>() else {
            warn!(service = %R::KIND, "request does not match its service");
            return None;
        };
        let response = handler(&mut self.address_space.borrow_mut(), request);
        Some(Box::new(response))
    }
}

impl Transport for LoopbackTransport {
    fn state(&self) -> TransportState {
        self.state.get()
    }

    fn submit(
        &self,
        service: ServiceKind,
        request: Box<dyn Any>,
        callback: RawCallback,
        context: RawContext,
    ) -> Result<RequestId, SubmitError> {
        if let Some(status) = self.fail_next.take() {
            return Err(SubmitError::new(status, context));
        }
        if !self.state.get().is_connected() {
            return Err(SubmitError::new(StatusCode::BAD_DISCONNECT, context));
        }
        if self.max_pending > 0 && self.pending() >= self.max_pending {
            return Err(SubmitError::new(StatusCode::BAD_TOO_MANY_OPERATIONS, context));
        }

        let request_id = self.allocate_request_id();
        self.queue.borrow_mut().push_back(PendingRequest {
            request_id,
            service,
            request,
            callback,
            context,
        });
        Ok(request_id)
    }

    fn pump(&self) -> UaResult<usize> {
        let batch: Vec<PendingRequest> = self.queue.borrow_mut().drain(..).collect();

        if !self.state.get().is_connected() {
            let abandoned = batch.len();
            for pending in batch {
                (pending.callback)(pending.context, pending.request_id, None);
            }
            debug!(abandoned, "pump on closed loopback transport");
            return Err(UaError::Disconnected);
        }

        let mut served = 0;
        for pending in batch {
            let PendingRequest {
                request_id,
                service,
                request,
                callback,
                context,
            } = pending;

            let mut response = if self.drop_next.replace(false) {
                None
            } else {
                self.serve(service, request.as_ref())
            };
            trace!(request_id, service = %service, delivered = response.is_some(), "serving request");
            callback(context, request_id, response.as_deref_mut());
            served += 1;
        }

        if served > 0 {
            debug!(served, "loopback pump pass");
        }
        Ok(served)
    }
}

impl fmt::Debug for LoopbackTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopbackTransport")
            .field("state", &self.state.get())
            .field("pending", &self.pending())
            .field("max_pending", &self.max_pending)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
