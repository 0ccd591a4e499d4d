// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bridge between raw transport callbacks and completion handlers.
//!
//! [`ServiceAdapter::create_callback_and_context`] packs a response transform
//! and a completion handler into a [`RawContext`] and returns the matching
//! monomorphized [`RawCallback`]. When the transport calls it:
//!
//! 1. the context is reclaimed (and dropped on every path);
//! 2. a missing response, or one of the wrong type, yields
//!    `BadInternalError` with a default result;
//! 3. otherwise the transform runs; if it fails, the failure becomes a status
//!    (its own code if it is a status failure, `BadInternalError` otherwise)
//!    with a default result, and the catcher is left untouched;
//! 4. the completion handler runs inside the catcher, so a failing handler is
//!    stored for the next `rethrow` instead of unwinding into the transport.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use tracing::{debug, error, trace, warn};

use ua_async_core::{catch_panic, Completion, ExceptionCatcher, StatusCode, UaError, UaResult};

use super::transport::{RawCallback, RawContext, RequestId};

/// Response transform run inside the raw callback.
pub type Transform<Resp, T> = Box<dyn FnOnce(&mut Resp) -> UaResult<T>>;

/// Raw callback and the context it expects.
pub struct CallbackAndContext {
    /// Function to hand to the transport.
    pub callback: RawCallback,
    /// Context to hand to the transport alongside `callback`.
    pub context: RawContext,
}

impl fmt::Debug for CallbackAndContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackAndContext")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

struct CallbackContext<Resp, T> {
    catcher: Rc<ExceptionCatcher>,
    transform: Transform<Resp, T>,
    completion: Completion<T>,
}

/// Adapter for operations whose raw response is `Resp` and whose result is `T`.
///
/// Operations without a result use `T = ()`.
pub struct ServiceAdapter<Resp, T> {
    _marker: PhantomData<fn(Resp) -> T>,
}

impl<Resp, T> ServiceAdapter<Resp, T>
where
    Resp: Any,
    T: Default + 'static,
{
    /// Builds the callback/context pair for one operation.
    pub fn create_callback_and_context<F>(
        catcher: Rc<ExceptionCatcher>,
        transform: F,
        completion: Completion<T>,
    ) -> CallbackAndContext
    where
        F: FnOnce(&mut Resp) -> UaResult<T> + 'static,
    {
        let context = CallbackContext::<Resp, T> {
            catcher,
            transform: Box::new(transform),
            completion,
        };
        CallbackAndContext {
            callback: Self::raw_callback,
            context: RawContext::new(context),
        }
    }

    /// Completes an operation whose submission was rejected.
    ///
    /// The handler sees `status` and a default result; the transform does
    /// not run.
    pub fn fail(context: RawContext, status: StatusCode) {
        let Some(context) = Self::reclaim(context) else {
            return;
        };
        let CallbackContext {
            catcher,
            completion,
            ..
        } = context;
        catcher.catching_exceptions(|| completion(status, T::default()));
    }

    fn raw_callback(context: RawContext, request_id: RequestId, response: Option<&mut dyn Any>) {
        let Some(context) = Self::reclaim(context) else {
            return;
        };
        let CallbackContext {
            catcher,
            transform,
            completion,
        } = context;

        let (status, result) = match response.and_then(|r| r.downcast_mut::<Resp>()) {
            None => {
                warn!(request_id, "no response delivered for request");
                (StatusCode::BAD_INTERNAL_ERROR, T::default())
            }
            Some(response) => match catch_panic(|| transform(response)) {
                Ok(result) => (StatusCode::GOOD, result),
                Err(e) => {
                    let status = transform_failure_status(&e);
                    debug!(request_id, status = %status, error = %e, "response transform failed");
                    (status, T::default())
                }
            },
        };

        trace!(request_id, status = %status, "invoking completion handler");
        catcher.catching_exceptions(|| completion(status, result));
    }

    fn reclaim(context: RawContext) -> Option<CallbackContext<Resp, T>> {
        let context = context.reclaim::<CallbackContext<Resp, T>>();
        if context.is_none() {
            error!(
                response = std::any::type_name::<Resp>(),
                "raw callback received a foreign context; operation cannot complete"
            );
        }
        context
    }
}

/// Status reported to the handler when the transform fails.
fn transform_failure_status(error: &UaError) -> StatusCode {
    match error {
        UaError::BadStatus(code) => *code,
        UaError::Disconnected => StatusCode::BAD_DISCONNECT,
        _ => StatusCode::BAD_INTERNAL_ERROR,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use thiserror::Error;

    use super::*;

    #[derive(Debug, Error)]
    #[error("{0}")]
    struct Boom(&'static str);

    type Adapter = ServiceAdapter<i32, i32>;

    struct Recorder {
        catcher: Rc<ExceptionCatcher>,
        seen: Rc<RefCell<Option<(StatusCode, i32)>>>,
        transform_calls: Rc<Cell<u32>>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                catcher: Rc::new(ExceptionCatcher::new()),
                seen: Rc::default(),
                transform_calls: Rc::default(),
            }
        }

        fn pair(&self, throw_in_transform: bool, throw_in_handler: bool) -> CallbackAndContext {
            let calls = Rc::clone(&self.transform_calls);
            let seen = Rc::clone(&self.seen);
            Adapter::create_callback_and_context(
                Rc::clone(&self.catcher),
                move |value: &mut i32| {
                    calls.set(calls.get() + 1);
                    if throw_in_transform {
                        return Err(UaError::user(Boom("transform")));
                    }
                    Ok(*value)
                },
                Box::new(move |code, value| {
                    *seen.borrow_mut() = Some((code, value));
                    if throw_in_handler {
                        return Err(UaError::user(Boom("completion handler")));
                    }
                    Ok(())
                }),
            )
        }

        fn seen(&self) -> Option<(StatusCode, i32)> {
            *self.seen.borrow()
        }
    }

    fn invoke(pair: CallbackAndContext, response: Option<&mut i32>) {
        (pair.callback)(pair.context, 0, response.map(|r| r as &mut dyn Any));
    }

    #[test]
    fn test_success() {
        let recorder = Recorder::new();
        let mut response = 5;
        invoke(recorder.pair(false, false), Some(&mut response));

        assert_eq!(recorder.seen(), Some((StatusCode::GOOD, 5)));
        assert!(!recorder.catcher.has_exception());
    }

    #[test]
    fn test_null_response() {
        let recorder = Recorder::new();
        invoke(recorder.pair(false, false), None);

        assert_eq!(recorder.seen(), Some((StatusCode::BAD_INTERNAL_ERROR, 0)));
        assert_eq!(recorder.transform_calls.get(), 0);
        assert!(!recorder.catcher.has_exception());
    }

    #[test]
    fn test_response_of_wrong_type_is_treated_as_null() {
        let recorder = Recorder::new();
        let pair = recorder.pair(false, false);
        let mut response = String::from("not an i32");
        (pair.callback)(pair.context, 3, Some(&mut response as &mut dyn Any));

        assert_eq!(recorder.seen(), Some((StatusCode::BAD_INTERNAL_ERROR, 0)));
        assert_eq!(recorder.transform_calls.get(), 0);
    }

    #[test]
    fn test_transform_failure_becomes_status() {
        let recorder = Recorder::new();
        let mut response = 5;
        invoke(recorder.pair(true, false), Some(&mut response));

        assert_eq!(recorder.seen(), Some((StatusCode::BAD_INTERNAL_ERROR, 0)));
        assert!(!recorder.catcher.has_exception());
    }

    #[test]
    fn test_transform_status_failure_keeps_code() {
        let catcher = Rc::new(ExceptionCatcher::new());
        let seen = Rc::new(Cell::new(StatusCode::GOOD));
        let sink = Rc::clone(&seen);
        let pair = Adapter::create_callback_and_context(
            Rc::clone(&catcher),
            |_: &mut i32| Err(UaError::from_status(StatusCode::BAD_NODE_ID_EXISTS)),
            Box::new(move |code, _| {
                sink.set(code);
                Ok(())
            }),
        );
        invoke(pair, Some(&mut 1));

        assert_eq!(seen.get(), StatusCode::BAD_NODE_ID_EXISTS);
        assert!(!catcher.has_exception());
    }

    #[test]
    fn test_transform_panic_becomes_status() {
        let catcher = Rc::new(ExceptionCatcher::new());
        let seen = Rc::new(Cell::new(StatusCode::GOOD));
        let sink = Rc::clone(&seen);
        let pair = Adapter::create_callback_and_context(
            Rc::clone(&catcher),
            |_: &mut i32| panic!("transform panicked"),
            Box::new(move |code, _| {
                sink.set(code);
                Ok(())
            }),
        );
        invoke(pair, Some(&mut 1));

        assert_eq!(seen.get(), StatusCode::BAD_INTERNAL_ERROR);
        assert!(!catcher.has_exception());
    }

    #[test]
    fn test_completion_handler_failure_is_deferred() {
        let recorder = Recorder::new();
        let mut response = 5;
        invoke(recorder.pair(false, true), Some(&mut response));

        assert_eq!(recorder.seen(), Some((StatusCode::GOOD, 5)));
        assert!(recorder.catcher.has_exception());

        let error = recorder.catcher.rethrow().unwrap_err();
        assert_eq!(error.to_string(), "completion handler");
        assert!(error.downcast_ref::<Boom>().is_some());
    }

    #[test]
    fn test_submit_failure_completes_without_transform() {
        let recorder = Recorder::new();
        let pair = recorder.pair(false, false);
        Adapter::fail(pair.context, StatusCode::BAD_DISCONNECT);

        assert_eq!(recorder.seen(), Some((StatusCode::BAD_DISCONNECT, 0)));
        assert_eq!(recorder.transform_calls.get(), 0);
    }

    #[test]
    fn test_context_is_released_on_every_path() {
        let catcher = Rc::new(ExceptionCatcher::new());
        let token = Rc::new(());

        for response in [Some(1), None] {
            let held = Rc::clone(&token);
            let pair = Adapter::create_callback_and_context(
                Rc::clone(&catcher),
                move |v: &mut i32| {
                    let _ = &held;
                    Ok(*v)
                },
                Box::new(|_, _| Ok(())),
            );
            let mut response = response;
            invoke(pair, response.as_mut());
        }
        assert_eq!(Rc::strong_count(&token), 1);
    }

    #[test]
    fn test_status_only_operation() {
        let catcher = Rc::new(ExceptionCatcher::new());
        let seen = Rc::new(Cell::new(StatusCode::BAD_TIMEOUT));
        let sink = Rc::clone(&seen);
        let pair = ServiceAdapter::<i32, ()>::create_callback_and_context(
            Rc::clone(&catcher),
            |_: &mut i32| Ok(()),
            Box::new(move |code, ()| {
                sink.set(code);
                Ok(())
            }),
        );
        invoke(pair, Some(&mut 0));
        assert_eq!(seen.get(), StatusCode::GOOD);
    }
}
