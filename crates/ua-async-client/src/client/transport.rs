// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Transport abstraction layer.
//!
//! A transport is the callback-oriented stack that actually exchanges
//! messages with a server. It accepts a request together with a raw callback
//! and an opaque context, and later, from inside [`Transport::pump`], invokes
//! the callback exactly once with the context it was given and the response
//! (or `None` if no response could be produced).

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

use ua_async_core::{StatusCode, UaResult};

/// Identifier assigned by the transport to a submitted request.
pub type RequestId = u32;

/// Function the transport calls once per submitted request.
pub type RawCallback = fn(RawContext, RequestId, Option<&mut dyn Any>);

// =============================================================================
// TransportState
// =============================================================================

/// Connection state of the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    /// Transport is not connected.
    #[default]
    Disconnected,

    /// Transport is connected and ready.
    Connected,
}

impl TransportState {
    /// Returns `true` if the transport is connected.
    #[inline]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connected => write!(f, "Connected"),
        }
    }
}

// =============================================================================
// ServiceKind
// =============================================================================

/// OPC UA service a request belongs to.
///
/// Transports use it to route the type-erased request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// Read service.
    Read,
    /// Write service.
    Write,
    /// AddNodes service.
    AddNodes,
    /// AddReferences service.
    AddReferences,
    /// DeleteNodes service.
    DeleteNodes,
    /// DeleteReferences service.
    DeleteReferences,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::AddNodes => "AddNodes",
            Self::AddReferences => "AddReferences",
            Self::DeleteNodes => "DeleteNodes",
            Self::DeleteReferences => "DeleteReferences",
        })
    }
}

// =============================================================================
// RawContext
// =============================================================================

/// Opaque state travelling with a request through the transport.
///
/// Transports only move it: from `submit` into the callback, or back to the
/// caller inside a [`SubmitError`]. Its contents are private to this crate.
pub struct RawContext(Box<dyn Any>);

impl RawContext {
    pub(crate) fn new<C: 'static>(context: C) -> Self {
        Self(Box::new(context))
    }

    /// Takes back ownership of the typed context.
    pub(crate) fn reclaim<C: 'static>(self) -> Option<C> {
        self.0.downcast::<C>().ok().map(|context| *context)
    }
}

impl fmt::Debug for RawContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawContext").finish_non_exhaustive()
    }
}

// =============================================================================
// SubmitError
// =============================================================================

/// Immediate rejection of a submitted request.
///
/// The transport hands the context back so the caller can complete the
/// operation itself.
#[derive(Debug)]
pub struct SubmitError {
    /// Why the request was rejected.
    pub status: StatusCode,
    /// The context passed to `submit`.
    pub context: RawContext,
}

impl SubmitError {
    /// Creates a rejection.
    pub fn new(status: StatusCode, context: RawContext) -> Self {
        Self { status, context }
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Callback-driven OPC UA transport.
///
/// All methods take `&self`: callbacks run from inside [`pump`](Self::pump)
/// may submit further requests, so implementations keep their state in
/// cells and release every borrow before invoking a callback.
pub trait Transport {
    /// Returns the current connection state.
    fn state(&self) -> TransportState;

    /// Queues `request` for `service`.
    ///
    /// On success the transport must eventually call `callback` exactly once
    /// with `context`, from inside [`pump`](Self::pump). On failure it must
    /// not call `callback` and returns the context inside the error.
    fn submit(
        &self,
        service: ServiceKind,
        request: Box<dyn Any>,
        callback: RawCallback,
        context: RawContext,
    ) -> Result<RequestId, SubmitError>;

    /// Runs one non-blocking dispatch pass, invoking the callbacks of the
    /// requests that completed. Returns the number of callbacks invoked.
    fn pump(&self) -> UaResult<usize>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_context_reclaim() {
        let context = RawContext::new(String::from("ctx"));
        assert_eq!(context.reclaim::<String>().as_deref(), Some("ctx"));

        let context = RawContext::new(7u32);
        assert!(context.reclaim::<String>().is_none());
    }

    #[test]
    fn test_transport_state() {
        assert!(TransportState::Connected.is_connected());
        assert!(!TransportState::Disconnected.is_connected());
        assert_eq!(TransportState::default(), TransportState::Disconnected);
        assert_eq!(TransportState::Connected.to_string(), "Connected");
    }

    #[test]
    fn test_service_kind_display() {
        assert_eq!(ServiceKind::AddNodes.to_string(), "AddNodes");
        assert_eq!(ServiceKind::DeleteReferences.to_string(), "DeleteReferences");
    }
}
