//! Core handler services for the Tether framework.
//!
//! [`HandlerService<F, R, T>`] wraps a single event handler and implements
//! `tower::Service<Arc<HandlerContext>>`. [`CommandService<F, R, T>`] does the
//! same for command handlers, whose response is the "handled" flag. Guards
//! and other cross-cutting concerns are ordinary tower layers stacked on top.

use std::marker::PhantomData;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use tower::{BoxError, Service};
use tracing::trace;

use super::traits::FromCtxFn;
use crate::context::HandlerContext;
use crate::error::{ExtractError, HandlerSkipped};

// ============================================================================
// Responses
// ============================================================================

/// A type that can be returned from an event handler.
///
/// `Err` aborts the dispatch of the current event.
pub trait HandlerResponse: Send + 'static {
    /// Converts the return value into the handler's outcome.
    fn into_outcome(self) -> Result<(), BoxError>;
}

impl HandlerResponse for () {
    fn into_outcome(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<T, E> HandlerResponse for Result<T, E>
where
    T: HandlerResponse,
    E: Into<BoxError> + Send + 'static,
{
    fn into_outcome(self) -> Result<(), BoxError> {
        match self {
            Ok(t) => t.into_outcome(),
            Err(e) => Err(e.into()),
        }
    }
}

/// A type that can be returned from a command handler.
///
/// `true` means the command was recognised and handled, whatever the
/// handler's own business outcome was.
pub trait CommandResponse: Send + 'static {
    /// Converts the return value into the "handled" flag.
    fn into_handled(self) -> Result<bool, BoxError>;
}

impl CommandResponse for bool {
    fn into_handled(self) -> Result<bool, BoxError> {
        Ok(self)
    }
}

impl<E> CommandResponse for Result<bool, E>
where
    E: Into<BoxError> + Send + 'static,
{
    fn into_handled(self) -> Result<bool, BoxError> {
        self.map_err(Into::into)
    }
}

// ============================================================================
// HandlerService
// ============================================================================

/// A tower [`Service`] that calls a single event handler.
///
/// A parameter that fails to extract makes the call resolve to
/// [`HandlerSkipped`], the same outcome as a failing guard.
///
/// # Example
///
/// ```rust,ignore
/// let svc = HandlerService::new(my_handler);
/// // Apply a guard on top:
/// let guarded = on_entry_module().service(svc);
/// ```
pub struct HandlerService<F, R, T> {
    handler: F,
    _marker: PhantomData<fn() -> (R, T)>,
}

impl<F, R, T> HandlerService<F, R, T> {
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

impl<F: Clone, R, T> Clone for HandlerService<F, R, T> {
    fn clone(&self) -> Self {
        HandlerService {
            handler: self.handler.clone(),
            _marker: PhantomData,
        }
    }
}

impl<F, R, T> From<F> for HandlerService<F, R, T> {
    fn from(handler: F) -> Self {
        HandlerService::new(handler)
    }
}

impl<F, R, T> Service<Arc<HandlerContext>> for HandlerService<F, R, T>
where
    F: FromCtxFn<R, T>,
    R: HandlerResponse,
{
    type Response = ();
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<(), Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, ctx: Arc<HandlerContext>) -> Self::Future {
        let handler = self.handler.clone();
        async move {
            match handler.call(ctx).await {
                Ok(r) => r.into_outcome(),
                Err(e) => {
                    trace!(error = %e, "handler parameters did not extract");
                    Err(HandlerSkipped.into())
                }
            }
        }
        .boxed()
    }
}

// ============================================================================
// CommandService
// ============================================================================

/// A tower [`Service`] that calls a single command handler.
///
/// Help output and usage errors raised while parsing the arguments are
/// reported through the logger service and count as handled.
pub struct CommandService<F, R, T> {
    handler: F,
    _marker: PhantomData<fn() -> (R, T)>,
}

impl<F, R, T> CommandService<F, R, T> {
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

impl<F: Clone, R, T> Clone for CommandService<F, R, T> {
    fn clone(&self) -> Self {
        CommandService {
            handler: self.handler.clone(),
            _marker: PhantomData,
        }
    }
}

impl<F, R, T> Service<Arc<HandlerContext>> for CommandService<F, R, T>
where
    F: FromCtxFn<R, T>,
    R: CommandResponse,
{
    type Response = bool;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<bool, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, ctx: Arc<HandlerContext>) -> Self::Future {
        let handler = self.handler.clone();
        async move {
            match handler.call(Arc::clone(&ctx)).await {
                Ok(r) => r.into_handled(),
                Err(ExtractError::Help(text)) => {
                    ctx.services().logger().log(&text);
                    Ok(true)
                }
                Err(ExtractError::Usage(text)) => {
                    ctx.services().logger().error(&text);
                    Ok(true)
                }
                Err(e) => Err(e.into()),
            }
        }
        .boxed()
    }
}
