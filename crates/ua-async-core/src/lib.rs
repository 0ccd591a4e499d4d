// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Completion model for callback-driven OPC UA clients.
//!
//! OPC UA client stacks report the outcome of a request by invoking a
//! callback on their own dispatcher thread or pump loop. This crate provides
//! the pieces needed to turn that into a Rust API where the caller picks how
//! the outcome is consumed:
//!
//! - **Status model**: [`StatusCode`] with good/uncertain/bad classification
//! - **Failure types**: [`UaError`], the error raised from bad status codes,
//!   user code and caught panics
//! - **Deferred failures**: [`ExceptionCatcher`], which parks failures raised
//!   inside callbacks until the caller re-enters
//! - **Completion tokens**: [`UseFuture`], [`UseDeferred`], [`UseDetached`] and
//!   plain closures, dispatched through [`CompletionToken`]
//!
//! # Error Handling
//!
//! ```text
//! UaError
//! ├── BadStatus      - Bad status code reported for an operation
//! ├── Disconnected   - BadDisconnect
//! ├── User           - Error returned by a transform or completion handler
//! ├── Panicked       - Panic caught at the callback boundary
//! └── Configuration  - Invalid settings
//! ```
//!
//! # Example
//!
//! ```
//! use ua_async_core::{initiate, Completion, StatusCode, UseFuture};
//!
//! let mut future = initiate(
//!     |completion: Completion<u32>| {
//!         let _ = completion(StatusCode::GOOD, 7);
//!     },
//!     UseFuture,
//! );
//! assert_eq!(future.try_take().unwrap().unwrap(), 7);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod catcher;
pub mod completion;
pub mod error;
pub mod status;

pub use catcher::{catch_panic, ExceptionCatcher};
pub use completion::{
    initiate, marker, Completion, CompletionToken, DefaultCompletionToken, Deferred,
    HandlerOutcome, OperationFuture, UseDeferred, UseDetached, UseFuture,
};
pub use error::{BoxError, ConfigurationError, UaError, UaResult};
pub use status::{throw_if_bad, Severity, StatusCode};
