//! Extension trait for tower service builder.
//!
//! Provides convenience methods for building handler services with guards.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tower::filter::{AsyncFilterLayer, AsyncPredicate, FilterLayer, Predicate};
use tower::{BoxError, Layer, ServiceBuilder};
use tower_layer::Stack;

use super::service::{HandlerResponse, HandlerService};
use super::traits::{Blocking, FromCtxFn, SyncFn};
use crate::context::HandlerContext;
use crate::error::HandlerSkipped;

// ============================================================================
// Guards
// ============================================================================

/// A type-erased, [`Predicate`]-implementing wrapper for synchronous guards.
///
/// When the inner predicate returns `false` the request is rejected with
/// [`HandlerSkipped`].
#[derive(Clone)]
pub struct EventPredicate(Arc<dyn Fn(&HandlerContext) -> bool + Send + Sync>);

impl EventPredicate {
    /// Creates a new `EventPredicate` from a synchronous closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&HandlerContext) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }
}

impl Predicate<Arc<HandlerContext>> for EventPredicate {
    type Request = Arc<HandlerContext>;

    fn check(&mut self, request: Arc<HandlerContext>) -> Result<Arc<HandlerContext>, BoxError> {
        if (self.0)(&request) {
            Ok(request)
        } else {
            Err(Box::new(HandlerSkipped))
        }
    }
}

/// A type-erased, [`AsyncPredicate`]-implementing wrapper for asynchronous guards.
#[derive(Clone)]
pub struct AsyncEventPredicate(
    Arc<dyn Fn(Arc<HandlerContext>) -> BoxFuture<'static, bool> + Send + Sync>,
);

impl AsyncEventPredicate {
    /// Creates a new `AsyncEventPredicate` from an asynchronous closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Arc<HandlerContext>) -> BoxFuture<'static, bool> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }
}

impl AsyncPredicate<Arc<HandlerContext>> for AsyncEventPredicate {
    type Future = BoxFuture<'static, Result<Arc<HandlerContext>, BoxError>>;
    type Request = Arc<HandlerContext>;

    fn check(&mut self, request: Arc<HandlerContext>) -> Self::Future {
        let f = self.0.clone();
        async move {
            if f(request.clone()).await {
                Ok(request)
            } else {
                Err(HandlerSkipped.into())
            }
        }
        .boxed()
    }
}

// ============================================================================
// ServiceBuilderExt
// ============================================================================

/// Extension trait for [`tower::ServiceBuilder`] that adds convenience methods
/// for building handler services.
///
/// This trait is available via `use tether::prelude::*`.
pub trait ServiceBuilderExt<L> {
    /// Wraps an async `handler` in a [`HandlerService`] and applies all
    /// stacked layers, returning the final composed service.
    fn handler<F, R, T>(self, handler: F) -> L::Service
    where
        F: FromCtxFn<R, T>,
        R: HandlerResponse,
        L: Layer<HandlerService<F, R, T>>;

    /// Same as [`handler`](Self::handler) for a synchronous function.
    fn handler_sync<F, R, T>(self, handler: F) -> L::Service
    where
        SyncFn<F>: FromCtxFn<R, Blocking<T>>,
        R: HandlerResponse,
        L: Layer<HandlerService<SyncFn<F>, R, Blocking<T>>>;

    /// Attaches a synchronous guard.
    ///
    /// Equivalent to `.filter(EventPredicate::new(predicate))`.
    fn rule_sync<F>(self, predicate: F) -> ServiceBuilder<Stack<FilterLayer<EventPredicate>, L>>
    where
        F: Fn(&HandlerContext) -> bool + Send + Sync + 'static;

    /// Attaches an asynchronous guard whose parameters are extracted like a
    /// handler's. A failed extraction counts as `false`.
    fn rule<F, T>(
        self,
        predicate: F,
    ) -> ServiceBuilder<Stack<AsyncFilterLayer<AsyncEventPredicate>, L>>
    where
        F: FromCtxFn<bool, T>;
}

impl<L> ServiceBuilderExt<L> for ServiceBuilder<L> {
    fn handler<F, R, T>(self, handler: F) -> L::Service
    where
        F: FromCtxFn<R, T>,
        R: HandlerResponse,
        L: Layer<HandlerService<F, R, T>>,
    {
        self.service(HandlerService::new(handler))
    }

    fn handler_sync<F, R, T>(self, handler: F) -> L::Service
    where
        SyncFn<F>: FromCtxFn<R, Blocking<T>>,
        R: HandlerResponse,
        L: Layer<HandlerService<SyncFn<F>, R, Blocking<T>>>,
    {
        self.service(HandlerService::new(SyncFn(handler)))
    }

    fn rule_sync<F>(self, predicate: F) -> ServiceBuilder<Stack<FilterLayer<EventPredicate>, L>>
    where
        F: Fn(&HandlerContext) -> bool + Send + Sync + 'static,
    {
        self.filter(EventPredicate::new(predicate))
    }

    fn rule<F, T>(
        self,
        predicate: F,
    ) -> ServiceBuilder<Stack<AsyncFilterLayer<AsyncEventPredicate>, L>>
    where
        F: FromCtxFn<bool, T>,
    {
        self.filter_async(AsyncEventPredicate::new(move |ctx| {
            predicate
                .clone()
                .call(ctx)
                .map(|f| f.unwrap_or(false))
                .boxed()
        }))
    }
}
