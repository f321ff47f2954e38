//! Handler function adapters.
//!
//! [`FromCtxFn`] is implemented for every function whose parameters all
//! implement [`FromContext`]: async functions directly, synchronous ones
//! through the [`SyncFn`] wrapper. The second type parameter only exists to
//! keep the arity impls (and the async/sync families) from overlapping.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};

use crate::context::HandlerContext;
use crate::error::ExtractResult;
use crate::extractor::FromContext;

/// A function that can be invoked with values extracted from a
/// [`HandlerContext`].
///
/// The returned future resolves to `Err` when any parameter failed to
/// extract; the function itself is not called in that case.
pub trait FromCtxFn<R, T>: Clone + Send + Sync + 'static {
    /// Extracts the parameters from `ctx` and calls the function.
    fn call(self, ctx: Arc<HandlerContext>) -> BoxFuture<'static, ExtractResult<R>>;
}

/// Wraps a synchronous function so it can be used where a [`FromCtxFn`] is
/// expected.
#[derive(Debug, Clone, Copy)]
pub struct SyncFn<F>(pub F);

/// Marker distinguishing synchronous parameter lists.
#[derive(Debug)]
pub struct Blocking<T>(PhantomData<fn() -> T>);

macro_rules! impl_from_ctx_fn {
    (
        $($ty:ident),*
    ) => {
        #[allow(non_snake_case, unused_variables)]
        impl<F, Fut, R, $($ty,)*> FromCtxFn<R, ($($ty,)*)> for F
        where
            F: FnOnce($($ty,)*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: Send + 'static,
            $( $ty: FromContext + Send + 'static, )*
        {
            fn call(self, ctx: Arc<HandlerContext>) -> BoxFuture<'static, ExtractResult<R>> {
                async move {
                    $(
                        let $ty = $ty::from_context(&ctx)?;
                    )*
                    Ok((self)($($ty,)*).await)
                }
                .boxed()
            }
        }

        #[allow(non_snake_case, unused_variables)]
        impl<F, R, $($ty,)*> FromCtxFn<R, Blocking<($($ty,)*)>> for SyncFn<F>
        where
            F: FnOnce($($ty,)*) -> R + Clone + Send + Sync + 'static,
            R: Send + 'static,
            $( $ty: FromContext + Send + 'static, )*
        {
            fn call(self, ctx: Arc<HandlerContext>) -> BoxFuture<'static, ExtractResult<R>> {
                $(
                    let $ty = match $ty::from_context(&ctx) {
                        Ok(value) => value,
                        Err(e) => return future::ready(Err(e)).boxed(),
                    };
                )*
                future::ready(Ok((self.0)($($ty,)*))).boxed()
            }
        }
    };
}

impl_from_ctx_fn!();
impl_from_ctx_fn!(T1);
impl_from_ctx_fn!(T1, T2);
impl_from_ctx_fn!(T1, T2, T3);
impl_from_ctx_fn!(T1, T2, T3, T4);
impl_from_ctx_fn!(T1, T2, T3, T4, T5);
impl_from_ctx_fn!(T1, T2, T3, T4, T5, T6);
impl_from_ctx_fn!(T1, T2, T3, T4, T5, T6, T7);
impl_from_ctx_fn!(T1, T2, T3, T4, T5, T6, T7, T8);
