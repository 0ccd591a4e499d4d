// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Recorders for completion handlers and status assertions on results.

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use ua_async_core::{StatusCode, UaError, UaResult};

// =============================================================================
// CompletionRecorder
// =============================================================================

/// Records every invocation of the completion handlers it hands out.
///
/// ```
/// use ua_async_core::{initiate, Completion, StatusCode};
/// use ua_async_tests::common::assertions::CompletionRecorder;
///
/// let recorder = CompletionRecorder::<u8>::new();
/// initiate(
///     |completion: Completion<u8>| {
///         let _ = completion(StatusCode::GOOD, 3);
///     },
///     recorder.handler(),
/// );
/// recorder.assert_completed_once_with(StatusCode::GOOD);
/// assert_eq!(recorder.last_value(), Some(3));
/// ```
pub struct CompletionRecorder<T> {
    calls: Rc<RefCell<Vec<(StatusCode, T)>>>,
}

impl<T> Clone for CompletionRecorder<T> {
    fn clone(&self) -> Self {
        Self {
            calls: Rc::clone(&self.calls),
        }
    }
}

impl<T: 'static> Default for CompletionRecorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> CompletionRecorder<T> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A by-value completion handler recording into this recorder.
    pub fn handler(&self) -> impl FnOnce(StatusCode, T) + 'static {
        let calls = Rc::clone(&self.calls);
        move |code: StatusCode, value: T| calls.borrow_mut().push((code, value))
    }

    /// A completion handler that records, then fails with `error`.
    pub fn failing_handler(
        &self,
        error: UaError,
    ) -> impl FnOnce(StatusCode, T) -> UaResult<()> + 'static {
        let calls = Rc::clone(&self.calls);
        move |code: StatusCode, value: T| {
            calls.borrow_mut().push((code, value));
            Err(error)
        }
    }

    /// Number of invocations so far.
    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Statuses of every invocation, in order.
    pub fn statuses(&self) -> Vec<StatusCode> {
        self.calls.borrow().iter().map(|(code, _)| *code).collect()
    }

    /// Assert the handler ran exactly once with `expected`.
    pub fn assert_completed_once_with(&self, expected: StatusCode) {
        let statuses = self.statuses();
        assert_eq!(
            statuses,
            vec![expected],
            "Expected exactly one completion with {}, got {:?}",
            expected,
            statuses
        );
    }

    /// Assert the handler has not run.
    pub fn assert_not_completed(&self) {
        assert_eq!(self.count(), 0, "Expected no completion, got {:?}", self.statuses());
    }
}

impl<T: Clone + 'static> CompletionRecorder<T> {
    /// Value of the most recent invocation.
    pub fn last_value(&self) -> Option<T> {
        self.calls.borrow().last().map(|(_, value)| value.clone())
    }
}

// =============================================================================
// Result Assertions
// =============================================================================

/// Assertion extensions for operation results.
pub trait StatusAssertions {
    /// Assert the result failed with `expected`.
    fn assert_status(self, expected: StatusCode);

    /// Assert the result failed with a disconnect.
    fn assert_disconnected(self);
}

impl<T: Debug> StatusAssertions for UaResult<T> {
    fn assert_status(self, expected: StatusCode) {
        match self {
            Ok(value) => panic!("Expected failure with {}, got Ok({:?})", expected, value),
            Err(e) => assert_eq!(
                e.status_code(),
                expected,
                "Expected failure with {}, got {}",
                expected,
                e
            ),
        }
    }

    fn assert_disconnected(self) {
        match self {
            Ok(value) => panic!("Expected disconnect, got Ok({:?})", value),
            Err(e) => assert!(e.is_disconnect(), "Expected disconnect, got {}", e),
        }
    }
}
