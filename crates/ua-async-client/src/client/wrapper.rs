// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client handle.
//!
//! A [`Client`] owns the transport, the connection-scoped
//! [`ExceptionCatcher`], the configuration and statistics. Cloning it is
//! cheap and every clone refers to the same connection.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, trace, warn};

use ua_async_core::{ExceptionCatcher, OperationFuture, StatusCode, UaError, UaResult};

use crate::config::ClientConfig;

use super::transport::{Transport, TransportState};

// =============================================================================
// ClientStats
// =============================================================================

/// Statistics for request dispatch.
#[derive(Debug, Default)]
pub struct ClientStats {
    /// Requests accepted by the transport.
    submitted: Cell<u64>,

    /// Requests rejected at submission.
    rejected: Cell<u64>,

    /// Pump passes.
    iterations: Cell<u64>,

    /// Callbacks invoked by the transport.
    callbacks: Cell<u64>,

    /// Deferred failures rethrown to the caller.
    rethrown: Cell<u64>,
}

fn bump(counter: &Cell<u64>, by: u64) {
    counter.set(counter.get().saturating_add(by));
}

impl ClientStats {
    /// Creates new statistics.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_submitted(&self) {
        bump(&self.submitted, 1);
    }

    pub(crate) fn record_rejected(&self) {
        bump(&self.rejected, 1);
    }

    fn record_iteration(&self, callbacks: usize) {
        bump(&self.iterations, 1);
        bump(&self.callbacks, callbacks as u64);
    }

    fn record_rethrown(&self) {
        bump(&self.rethrown, 1);
    }

    /// Returns the number of requests accepted by the transport.
    pub fn submitted(&self) -> u64 {
        self.submitted.get()
    }

    /// Returns the number of requests rejected at submission.
    pub fn rejected(&self) -> u64 {
        self.rejected.get()
    }

    /// Returns the number of pump passes.
    pub fn iterations(&self) -> u64 {
        self.iterations.get()
    }

    /// Returns the number of callbacks invoked.
    pub fn callbacks(&self) -> u64 {
        self.callbacks.get()
    }

    /// Returns the number of deferred failures rethrown.
    pub fn rethrown(&self) -> u64 {
        self.rethrown.get()
    }
}

// =============================================================================
// Client
// =============================================================================

struct ClientInner<Tr> {
    transport: Tr,
    catcher: Rc<ExceptionCatcher>,
    config: ClientConfig,
    stats: ClientStats,
}

/// Handle to one connection.
///
/// The client is single-threaded: callbacks run on the thread that calls
/// [`run_iterate`](Self::run_iterate) or waits on a synchronous operation.
///
/// # Examples
///
/// ```
/// use ua_async_client::services::attribute;
/// use ua_async_client::types::{AttributeId, DataValue, NodeId, Variant};
/// use ua_async_client::{Client, LoopbackTransport};
/// use ua_async_core::StatusCode;
///
/// let client = Client::new(LoopbackTransport::new());
///
/// attribute::read_attribute_async(
///     &client,
///     &NodeId::OBJECTS_FOLDER,
///     AttributeId::BrowseName,
///     |code: StatusCode, value: DataValue| {
///         assert!(code.is_good());
///         assert!(matches!(value.value, Variant::QualifiedName(_)));
///     },
/// );
/// client.run_iterate().unwrap();
/// ```
pub struct Client<Tr: Transport> {
    inner: Rc<ClientInner<Tr>>,
}

impl<Tr: Transport> Client<Tr> {
    /// Creates a client with the default configuration.
    pub fn new(transport: Tr) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Creates a client with `config`.
    pub fn with_config(transport: Tr, config: ClientConfig) -> Self {
        debug!(
            endpoint = %config.endpoint,
            application = %config.application_name,
            "client created"
        );
        Self {
            inner: Rc::new(ClientInner {
                transport,
                catcher: Rc::new(ExceptionCatcher::new()),
                config,
                stats: ClientStats::new(),
            }),
        }
    }

    /// Returns the transport.
    pub fn transport(&self) -> &Tr {
        &self.inner.transport
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Returns the connection state reported by the transport.
    pub fn state(&self) -> TransportState {
        self.inner.transport.state()
    }

    /// Returns the client statistics.
    pub fn stats(&self) -> &ClientStats {
        &self.inner.stats
    }

    /// Returns the catcher holding deferred completion-handler failures.
    pub fn exception_catcher(&self) -> &ExceptionCatcher {
        &self.inner.catcher
    }

    pub(crate) fn shared_catcher(&self) -> Rc<ExceptionCatcher> {
        Rc::clone(&self.inner.catcher)
    }

    /// Runs one transport pump pass, then rethrows a deferred failure if a
    /// completion handler failed.
    ///
    /// Returns the number of callbacks invoked.
    pub fn run_iterate(&self) -> UaResult<usize> {
        let callbacks = self.inner.transport.pump()?;
        self.inner.stats.record_iteration(callbacks);
        trace!(callbacks, "pump pass finished");

        if let Err(e) = self.inner.catcher.rethrow() {
            self.inner.stats.record_rethrown();
            e.log("run_iterate");
            return Err(e);
        }
        Ok(callbacks)
    }

    /// Pumps the transport until `future` resolves.
    ///
    /// Gives up with `BadTimeout` once the configured request timeout has
    /// elapsed. A timeout too large to represent as an instant never expires.
    /// Failures raised while pumping are returned immediately.
    pub fn wait<T>(&self, mut future: OperationFuture<T>) -> UaResult<T> {
        let deadline = Instant::now().checked_add(self.inner.config.request_timeout);
        loop {
            if let Some(outcome) = future.try_take() {
                return outcome;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                warn!(
                    timeout = ?self.inner.config.request_timeout,
                    "synchronous request timed out"
                );
                return Err(UaError::from_status(StatusCode::BAD_TIMEOUT));
            }
            self.run_iterate()?;
        }
    }
}

impl<Tr: Transport> Clone for Client<Tr> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<Tr: Transport> fmt::Debug for Client<Tr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.inner.config.endpoint)
            .field("state", &self.state())
            .field("stats", &self.inner.stats)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
