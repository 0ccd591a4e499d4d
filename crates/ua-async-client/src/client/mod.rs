// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request dispatch over a callback-driven transport.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 services::{attribute, node_management}          │
//! │                  (typed op / op_async functions)                │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       send_request                              │
//! │            (token dispatch: callback, future, sync)             │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      ServiceAdapter                             │
//! │        (raw callback + context, transform, catcher)             │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Transport                                │
//! │                (submit / pump, raw callbacks)                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Completion handlers run inside [`Client::run_iterate`]. A handler that
//! fails does not unwind through the transport: its error is parked in the
//! client's exception catcher and returned by the `run_iterate` call that
//! invoked it.

mod adapter;
mod sender;
mod transport;
mod wrapper;

pub use adapter::{CallbackAndContext, ServiceAdapter, Transform};
pub use sender::{send_request, send_request_default, Async, Blocking, RequestToken, SyncOperation};
pub use transport::{
    RawCallback, RawContext, RequestId, ServiceKind, SubmitError, Transport, TransportState,
};
pub use wrapper::{Client, ClientStats};
