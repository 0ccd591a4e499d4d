// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Deferred failure store.
//!
//! Raw callbacks run inside the transport's dispatcher, which has no way to
//! propagate errors back to the caller. Failures raised there are parked in an
//! [`ExceptionCatcher`] and re-raised by [`ExceptionCatcher::rethrow`] the next
//! time the caller re-enters (usually right after pumping the transport).
//!
//! The catcher holds at most one failure. A failure arriving while another is
//! pending is dropped: the first one wins.
//!
//! # Examples
//!
//! ```
//! use ua_async_core::{ExceptionCatcher, StatusCode, UaError};
//!
//! let catcher = ExceptionCatcher::new();
//! catcher.catching_exceptions(|| -> Result<(), UaError> {
//!     Err(UaError::from_status(StatusCode::BAD_TIMEOUT))
//! });
//! assert!(catcher.has_exception());
//!
//! let error = catcher.rethrow().unwrap_err();
//! assert_eq!(error.status_code(), StatusCode::BAD_TIMEOUT);
//! assert!(!catcher.has_exception());
//! ```

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::error::{UaError, UaResult};

/// Runs `f`, turning a panic into [`UaError::Panicked`].
///
/// Used wherever user code runs on a stack frame owned by the transport.
pub fn catch_panic<F, R>(f: F) -> UaResult<R>
where
    F: FnOnce() -> UaResult<R>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(UaError::from_panic(payload)),
    }
}

/// Single-slot store for one deferred failure.
#[derive(Debug, Default)]
pub struct ExceptionCatcher {
    slot: RefCell<Option<UaError>>,
}

impl ExceptionCatcher {
    /// Creates an empty catcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a failure is stored.
    pub fn has_exception(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Stores `error` if the slot is empty; otherwise drops it.
    pub fn store(&self, error: UaError) {
        let mut slot = self.slot.borrow_mut();
        if let Some(pending) = slot.as_ref() {
            warn!(
                pending = %pending,
                dropped = %error,
                "deferred failure already pending, dropping new failure"
            );
            return;
        }
        debug!(error = %error, category = error.category(), "deferred failure stored");
        *slot = Some(error);
    }

    /// Clears the slot and returns the stored failure as `Err`.
    ///
    /// Returns `Ok(())` when nothing is stored.
    pub fn rethrow(&self) -> UaResult<()> {
        let stored = self.slot.borrow_mut().take();
        match stored {
            Some(error) => {
                debug!(error = %error, "rethrowing deferred failure");
                Err(error)
            }
            None => Ok(()),
        }
    }

    /// Runs `f`, storing its failure (returned error or panic) instead of
    /// letting it escape.
    ///
    /// Returns `None` if `f` failed.
    pub fn catching_exceptions<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce() -> UaResult<R>,
    {
        match catch_panic(f) {
            Ok(value) => Some(value),
            Err(error) => {
                self.store(error);
                None
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusCode;

    #[test]
    fn test_empty_catcher() {
        let catcher = ExceptionCatcher::new();
        assert!(!catcher.has_exception());
        assert!(catcher.rethrow().is_ok());
        assert!(!catcher.has_exception());
    }

    #[test]
    fn test_store_then_rethrow() {
        let catcher = ExceptionCatcher::new();
        catcher.store(UaError::from_status(StatusCode::BAD_NOT_FOUND));
        assert!(catcher.has_exception());

        let error = catcher.rethrow().unwrap_err();
        assert_eq!(error.status_code(), StatusCode::BAD_NOT_FOUND);
        assert!(!catcher.has_exception());
        assert!(catcher.rethrow().is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        let catcher = ExceptionCatcher::new();
        catcher.store(UaError::from_status(StatusCode::BAD_TIMEOUT));
        catcher.store(UaError::from_status(StatusCode::BAD_NOT_FOUND));
        catcher.store(UaError::Disconnected);

        let error = catcher.rethrow().unwrap_err();
        assert_eq!(error.status_code(), StatusCode::BAD_TIMEOUT);
        assert!(!catcher.has_exception());
    }

    #[test]
    fn test_catching_exceptions_passes_values_through() {
        let catcher = ExceptionCatcher::new();
        let value = catcher.catching_exceptions(|| Ok(7));
        assert_eq!(value, Some(7));
        assert!(!catcher.has_exception());
    }

    #[test]
    fn test_catching_exceptions_stores_errors() {
        let catcher = ExceptionCatcher::new();
        let value: Option<()> =
            catcher.catching_exceptions(|| Err(UaError::from_status(StatusCode::BAD_TIMEOUT)));
        assert!(value.is_none());
        assert!(catcher.has_exception());
    }

    #[test]
    fn test_catching_exceptions_stores_panics() {
        let catcher = ExceptionCatcher::new();
        let value: Option<()> = catcher.catching_exceptions(|| panic!("handler exploded"));
        assert!(value.is_none());

        match catcher.rethrow() {
            Err(UaError::Panicked(message)) => assert_eq!(message, "handler exploded"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_catch_panic() {
        assert_eq!(catch_panic(|| Ok(1)).ok(), Some(1));
        assert!(matches!(
            catch_panic::<_, ()>(|| panic!("transform")),
            Err(UaError::Panicked(_))
        ));
    }
}
