// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request submission.
//!
//! [`send_request`] is the single entry point every service operation goes
//! through. The token decides the return shape:
//!
//! - any [`CompletionToken`] dispatches asynchronously; the caller pumps the
//!   transport with [`Client::run_iterate`] later;
//! - [`SyncOperation`] takes the [`UseFuture`] path and then waits on the
//!   future with [`Client::wait`], returning `UaResult<T>`.
//!
//! A failing transform on the synchronous path surfaces as the status the
//! adapter derived from it, not as the transform's own error.

use std::marker::PhantomData;

use chrono::Utc;
use tracing::{trace, warn};

use ua_async_core::{
    Completion, CompletionToken, DefaultCompletionToken, OperationFuture, UaResult, UseFuture,
};

use crate::services::messages::ServiceRequest;

use super::adapter::{CallbackAndContext, ServiceAdapter};
use super::transport::{SubmitError, Transport};
use super::wrapper::Client;

/// Token running an operation to completion before returning.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOperation;

/// Marker selecting the [`SyncOperation`] implementation of [`RequestToken`].
#[derive(Debug)]
pub enum Blocking {}

/// Marker wrapping the [`CompletionToken`] marker `M` of an asynchronous
/// token, keeping it apart from [`Blocking`].
#[derive(Debug)]
pub struct Async<M>(PhantomData<fn() -> M>);

/// Tokens accepted by service operations: every completion token, plus
/// [`SyncOperation`].
pub trait RequestToken<T, M>: Sized {
    /// What the operation returns.
    type Output;

    /// Starts `initiation` on `client`.
    fn dispatch<Tr, I>(self, client: &Client<Tr>, initiation: I) -> Self::Output
    where
        Tr: Transport,
        I: FnOnce(Completion<T>) + 'static;
}

impl<T, M, K> RequestToken<T, Async<M>> for K
where
    K: CompletionToken<T, M>,
{
    type Output = K::Output;

    #[inline]
    fn dispatch<Tr, I>(self, _client: &Client<Tr>, initiation: I) -> Self::Output
    where
        Tr: Transport,
        I: FnOnce(Completion<T>) + 'static,
    {
        self.initiate(initiation)
    }
}

impl<T: 'static> RequestToken<T, Blocking> for SyncOperation {
    type Output = UaResult<T>;

    fn dispatch<Tr, I>(self, client: &Client<Tr>, initiation: I) -> UaResult<T>
    where
        Tr: Transport,
        I: FnOnce(Completion<T>) + 'static,
    {
        let future: OperationFuture<T> = UseFuture.initiate(initiation);
        client.wait(future)
    }
}

/// Sends `request`, converting the response with `transform` and delivering
/// the outcome through `token`.
///
/// The request is submitted when the token starts the operation: at once
/// for every token except [`UseDeferred`](ua_async_core::UseDeferred), which
/// submits on launch.
pub fn send_request<Tr, R, T, F, K, M>(
    client: &Client<Tr>,
    request: R,
    transform: F,
    token: K,
) -> K::Output
where
    Tr: Transport + 'static,
    R: ServiceRequest,
    T: Default + 'static,
    F: FnOnce(&mut R::Response) -> UaResult<T> + 'static,
    K: RequestToken<T, M>,
{
    let submitter = client.clone();
    token.dispatch(client, move |completion| {
        submit(&submitter, request, transform, completion)
    })
}

/// [`send_request`] with the [`DefaultCompletionToken`].
pub fn send_request_default<Tr, R, T, F>(
    client: &Client<Tr>,
    request: R,
    transform: F,
) -> OperationFuture<T>
where
    Tr: Transport + 'static,
    R: ServiceRequest,
    T: Default + 'static,
    F: FnOnce(&mut R::Response) -> UaResult<T> + 'static,
{
    send_request(client, request, transform, DefaultCompletionToken::default())
}

fn submit<Tr, R, T, F>(client: &Client<Tr>, mut request: R, transform: F, completion: Completion<T>)
where
    Tr: Transport,
    R: ServiceRequest,
    T: Default + 'static,
    F: FnOnce(&mut R::Response) -> UaResult<T> + 'static,
{
    request.request_header_mut().timestamp = Utc::now();

    let CallbackAndContext { callback, context } =
        ServiceAdapter::<R::Response, T>::create_callback_and_context(
            client.shared_catcher(),
            transform,
            completion,
        );

    match client
        .transport()
        .submit(R::KIND, Box::new(request), callback, context)
    {
        Ok(request_id) => {
            client.stats().record_submitted();
            trace!(request_id, service = %R::KIND, "request submitted");
        }
        Err(SubmitError { status, context }) => {
            client.stats().record_rejected();
            warn!(service = %R::KIND, status = %status, "request rejected by transport");
            ServiceAdapter::<R::Response, T>::fail(context, status);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
