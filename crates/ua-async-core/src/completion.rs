// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Completion tokens.
//!
//! Every asynchronous operation takes a completion token as its last
//! argument. The token decides how the outcome `(StatusCode, T)` is delivered
//! and what the operation returns:
//!
//! | token | returns | outcome delivered to |
//! |---|---|---|
//! | [`UseFuture`] | [`OperationFuture<T>`] | the future (`Err` on bad status) |
//! | [`UseDeferred`] | [`Deferred<T>`] | whatever token is passed to [`Deferred::launch`] |
//! | [`UseDetached`] | `()` | nowhere |
//! | closure | `()` | the closure itself |
//!
//! Closures may take `(StatusCode)` for operations without a result, or
//! `(StatusCode, T)`, `(StatusCode, &mut T)`, `(StatusCode, &T)` otherwise,
//! and may return `()` or `Result<(), E>` with `E: Into<UaError>`.
//! A closure of any other shape does not implement [`CompletionToken`], so a
//! mismatch is rejected at compile time.
//!
//! Closure parameter types must be written out, since the compiler infers
//! them from the token trait only after choosing an impl:
//!
//! ```
//! use ua_async_core::completion::{initiate, Completion, UseDeferred, UseFuture};
//! use ua_async_core::StatusCode;
//!
//! // An operation that completes immediately with 42.
//! fn answer(completion: Completion<u32>) {
//!     let _ = completion(StatusCode::GOOD, 42);
//! }
//!
//! initiate(answer, |code: StatusCode, value: u32| {
//!     assert!(code.is_good());
//!     assert_eq!(value, 42);
//! });
//!
//! let mut future = initiate(answer, UseFuture);
//! assert_eq!(future.try_take().unwrap().unwrap(), 42);
//!
//! let deferred = initiate(answer, UseDeferred);
//! let mut future = deferred.launch(UseFuture);
//! assert_eq!(future.try_take().unwrap().unwrap(), 42);
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::{UaError, UaResult};
use crate::status::StatusCode;

/// Type-erased completion handler handed to an initiation.
///
/// Returns `Err` if the handler itself failed; callers running it on a
/// transport stack frame must route that error to an
/// [`ExceptionCatcher`](crate::ExceptionCatcher).
pub type Completion<T> = Box<dyn FnOnce(StatusCode, T) -> UaResult<()>>;

/// Default completion token for asynchronous operations.
pub type DefaultCompletionToken = UseFuture;

/// Marker types selecting a [`CompletionToken`] implementation.
///
/// They only disambiguate impls; they are never constructed.
pub mod marker {
    /// Built-in token types.
    #[derive(Debug)]
    pub enum Strategy {}

    /// Closure taking `(StatusCode)`.
    #[derive(Debug)]
    pub enum StatusOnly {}

    /// Closure taking `(StatusCode, T)`.
    #[derive(Debug)]
    pub enum ByValue {}

    /// Closure taking `(StatusCode, &mut T)`.
    #[derive(Debug)]
    pub enum ByMut {}

    /// Closure taking `(StatusCode, &T)`.
    #[derive(Debug)]
    pub enum ByRef {}
}

// =============================================================================
// HandlerOutcome
// =============================================================================

/// Return types accepted from completion-handler closures.
pub trait HandlerOutcome {
    /// Converts into the handler's success or failure.
    fn into_outcome(self) -> UaResult<()>;
}

impl HandlerOutcome for () {
    #[inline]
    fn into_outcome(self) -> UaResult<()> {
        Ok(())
    }
}

impl<E> HandlerOutcome for Result<(), E>
where
    E: Into<UaError>,
{
    #[inline]
    fn into_outcome(self) -> UaResult<()> {
        self.map_err(Into::into)
    }
}

// =============================================================================
// CompletionToken
// =============================================================================

/// A consumption strategy for an operation producing `T`.
pub trait CompletionToken<T, M = marker::Strategy>: Sized {
    /// What the operation returns to its caller.
    type Output;

    /// Starts the operation.
    ///
    /// `initiation` receives the completion handler it must eventually call
    /// exactly once.
    fn initiate<I>(self, initiation: I) -> Self::Output
    where
        I: FnOnce(Completion<T>) + 'static;
}

/// Dispatches `initiation` according to `token`.
#[inline]
pub fn initiate<T, K, M, I>(initiation: I, token: K) -> K::Output
where
    K: CompletionToken<T, M>,
    I: FnOnce(Completion<T>) + 'static,
{
    token.initiate(initiation)
}

impl<F, R> CompletionToken<(), marker::StatusOnly> for F
where
    F: FnOnce(StatusCode) -> R + 'static,
    R: HandlerOutcome,
{
    type Output = ();

    fn initiate<I>(self, initiation: I)
    where
        I: FnOnce(Completion<()>) + 'static,
    {
        initiation(Box::new(move |code, ()| self(code).into_outcome()));
    }
}

impl<T, F, R> CompletionToken<T, marker::ByValue> for F
where
    T: 'static,
    F: FnOnce(StatusCode, T) -> R + 'static,
    R: HandlerOutcome,
{
    type Output = ();

    fn initiate<I>(self, initiation: I)
    where
        I: FnOnce(Completion<T>) + 'static,
    {
        initiation(Box::new(move |code, result| self(code, result).into_outcome()));
    }
}

impl<T, F, R> CompletionToken<T, marker::ByMut> for F
where
    T: 'static,
    F: FnOnce(StatusCode, &mut T) -> R + 'static,
    R: HandlerOutcome,
{
    type Output = ();

    fn initiate<I>(self, initiation: I)
    where
        I: FnOnce(Completion<T>) + 'static,
    {
        initiation(Box::new(move |code, mut result| {
            self(code, &mut result).into_outcome()
        }));
    }
}

impl<T, F, R> CompletionToken<T, marker::ByRef> for F
where
    T: 'static,
    F: FnOnce(StatusCode, &T) -> R + 'static,
    R: HandlerOutcome,
{
    type Output = ();

    fn initiate<I>(self, initiation: I)
    where
        I: FnOnce(Completion<T>) + 'static,
    {
        initiation(Box::new(move |code, result| self(code, &result).into_outcome()));
    }
}

// =============================================================================
// Future
// =============================================================================

/// Token making an operation return an [`OperationFuture`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UseFuture;

impl<T: 'static> CompletionToken<T> for UseFuture {
    type Output = OperationFuture<T>;

    fn initiate<I>(self, initiation: I) -> OperationFuture<T>
    where
        I: FnOnce(Completion<T>) + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        initiation(Box::new(move |code, result| {
            let outcome = if code.is_bad() {
                Err(UaError::from_status(code))
            } else {
                Ok(result)
            };
            // The caller may have dropped the future; the outcome is simply discarded.
            let _ = sender.send(outcome);
            Ok(())
        }));
        OperationFuture { receiver }
    }
}

/// Handle to the eventual outcome of an operation started with [`UseFuture`].
///
/// The operation only makes progress while the transport is pumped. Either
/// `.await` it while something else drives the transport, or poll it with
/// [`try_take`](Self::try_take) after pumping.
///
/// If the transport drops the operation without completing it, the outcome
/// is `BadShutdown`.
#[must_use = "the outcome of the operation is lost if the future is dropped"]
pub struct OperationFuture<T> {
    receiver: oneshot::Receiver<UaResult<T>>,
}

impl<T> OperationFuture<T> {
    /// Takes the outcome if the operation has completed.
    ///
    /// Returns `None` while the operation is pending. Once the outcome has
    /// been taken, further calls report `BadShutdown`.
    pub fn try_take(&mut self) -> Option<UaResult<T>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(abandoned())),
        }
    }
}

impl<T> Future for OperationFuture<T> {
    type Output = UaResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(abandoned())))
    }
}

impl<T> fmt::Debug for OperationFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationFuture").finish_non_exhaustive()
    }
}

fn abandoned() -> UaError {
    UaError::from_status(StatusCode::BAD_SHUTDOWN)
}

// =============================================================================
// Deferred
// =============================================================================

/// Token making an operation return a [`Deferred`] launcher instead of
/// starting it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UseDeferred;

impl<T: 'static> CompletionToken<T> for UseDeferred {
    type Output = Deferred<T>;

    fn initiate<I>(self, initiation: I) -> Deferred<T>
    where
        I: FnOnce(Completion<T>) + 'static,
    {
        Deferred {
            initiation: Box::new(initiation),
        }
    }
}

/// An operation that has been prepared but not started.
#[must_use = "a deferred operation does nothing until launched"]
pub struct Deferred<T> {
    initiation: Box<dyn FnOnce(Completion<T>)>,
}

impl<T: 'static> Deferred<T> {
    /// Starts the operation, delivering its outcome through `token`.
    pub fn launch<K, M>(self, token: K) -> K::Output
    where
        K: CompletionToken<T, M>,
    {
        token.initiate(self.initiation)
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").finish_non_exhaustive()
    }
}

// =============================================================================
// Detached
// =============================================================================

/// Token starting an operation whose outcome nobody observes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UseDetached;

impl<T: 'static> CompletionToken<T> for UseDetached {
    type Output = ();

    fn initiate<I>(self, initiation: I)
    where
        I: FnOnce(Completion<T>) + 'static,
    {
        initiation(Box::new(|_code, _result| Ok(())));
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    /// Parks the completion so the test decides when the operation finishes.
    type Slot<T> = Rc<RefCell<Option<Completion<T>>>>;

    fn parked<T: 'static>(slot: &Slot<T>) -> impl FnOnce(Completion<T>) + 'static {
        let slot = Rc::clone(slot);
        move |completion| *slot.borrow_mut() = Some(completion)
    }

    fn complete<T>(slot: &Slot<T>, code: StatusCode, value: T) -> UaResult<()> {
        let completion = slot.borrow_mut().take().expect("operation was not initiated");
        completion(code, value)
    }

    #[test]
    fn test_callback_by_value() {
        let slot: Slot<String> = Rc::default();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);

        initiate(parked(&slot), move |code: StatusCode, value: String| {
            *sink.borrow_mut() = Some((code, value));
        });
        assert!(seen.borrow().is_none());

        complete(&slot, StatusCode::GOOD, "Objects".to_string()).unwrap();
        assert_eq!(
            seen.borrow().clone(),
            Some((StatusCode::GOOD, "Objects".to_string()))
        );
    }

    #[test]
    fn test_callback_by_reference_shapes() {
        let slot: Slot<Vec<u8>> = Rc::default();
        let total = Rc::new(Cell::new(0usize));

        let sink = Rc::clone(&total);
        initiate(parked(&slot), move |_code: StatusCode, value: &mut Vec<u8>| {
            value.push(4);
            sink.set(value.len());
        });
        complete(&slot, StatusCode::GOOD, vec![1, 2, 3]).unwrap();
        assert_eq!(total.get(), 4);

        let sink = Rc::clone(&total);
        initiate(parked(&slot), move |_code: StatusCode, value: &Vec<u8>| {
            sink.set(value.len());
        });
        complete(&slot, StatusCode::GOOD, vec![9]).unwrap();
        assert_eq!(total.get(), 1);
    }

    #[test]
    fn test_status_only_callback() {
        let slot: Slot<()> = Rc::default();
        let seen = Rc::new(Cell::new(StatusCode::GOOD));
        let sink = Rc::clone(&seen);

        initiate(parked(&slot), move |code: StatusCode| sink.set(code));
        complete(&slot, StatusCode::BAD_NOT_FOUND, ()).unwrap();
        assert_eq!(seen.get(), StatusCode::BAD_NOT_FOUND);
    }

    #[test]
    fn test_callback_failure_is_returned_to_the_caller() {
        let slot: Slot<u32> = Rc::default();
        initiate(parked(&slot), |_code: StatusCode, _value: u32| -> UaResult<()> {
            Err(UaError::from_status(StatusCode::BAD_TIMEOUT))
        });

        let error = complete(&slot, StatusCode::GOOD, 1).unwrap_err();
        assert_eq!(error.status_code(), StatusCode::BAD_TIMEOUT);
    }

    #[test]
    fn test_future_resolves_on_good_status() {
        let slot: Slot<u32> = Rc::default();
        let mut future = initiate(parked(&slot), UseFuture);
        assert!(future.try_take().is_none());

        complete(&slot, StatusCode::GOOD, 5).unwrap();
        assert_eq!(future.try_take().unwrap().unwrap(), 5);
    }

    #[test]
    fn test_future_fails_on_bad_status() {
        let slot: Slot<u32> = Rc::default();
        let mut future = initiate(parked(&slot), UseFuture);

        complete(&slot, StatusCode::BAD_DISCONNECT, 0).unwrap();
        assert!(matches!(future.try_take(), Some(Err(UaError::Disconnected))));
    }

    #[test]
    fn test_future_uncertain_status_is_a_value() {
        let slot: Slot<u32> = Rc::default();
        let mut future = initiate(parked(&slot), UseFuture);

        complete(&slot, StatusCode::UNCERTAIN_REFERENCE_NOT_DELETED, 3).unwrap();
        assert_eq!(future.try_take().unwrap().unwrap(), 3);
    }

    #[test]
    fn test_future_abandoned_operation() {
        let slot: Slot<u32> = Rc::default();
        let mut future = initiate(parked(&slot), UseFuture);
        slot.borrow_mut().take();

        let error = future.try_take().unwrap().unwrap_err();
        assert_eq!(error.status_code(), StatusCode::BAD_SHUTDOWN);
    }

    #[tokio::test]
    async fn test_future_can_be_awaited() {
        let slot: Slot<&'static str> = Rc::default();
        let future = initiate(parked(&slot), UseFuture);
        complete(&slot, StatusCode::GOOD, "done").unwrap();

        assert_eq!(future.await.unwrap(), "done");
    }

    #[test]
    fn test_deferred_does_not_start_until_launched() {
        let started = Rc::new(Cell::new(false));
        let flag = Rc::clone(&started);

        let deferred = initiate(
            move |completion: Completion<u32>| {
                flag.set(true);
                let _ = completion(StatusCode::GOOD, 11);
            },
            UseDeferred,
        );
        assert!(!started.get());

        let mut future = deferred.launch(UseFuture);
        assert!(started.get());
        assert_eq!(future.try_take().unwrap().unwrap(), 11);
    }

    #[test]
    fn test_deferred_launch_with_callback_and_nested_deferred() {
        let seen = Rc::new(Cell::new(0u32));
        let sink = Rc::clone(&seen);

        let deferred = initiate(
            |completion: Completion<u32>| {
                let _ = completion(StatusCode::GOOD, 21);
            },
            UseDeferred,
        );
        let deferred = deferred.launch(UseDeferred);
        deferred.launch(move |_code: StatusCode, value: u32| sink.set(value * 2));
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn test_detached_discards_outcome() {
        let slot: Slot<u32> = Rc::default();
        initiate(parked(&slot), UseDetached);
        assert!(complete(&slot, StatusCode::BAD_TIMEOUT, 0).is_ok());
    }
}
