use std::ops::Deref;
use std::sync::Arc;

use tether_core::{FileSystemService, HostEvent, HostServices, LoggerService};

use crate::context::HandlerContext;
use crate::error::{ExtractError, ExtractResult};

/// A trait for types that can be extracted from a [`HandlerContext`].
///
/// Types implementing this trait can be used directly as handler function
/// parameters. When extraction fails the handler is not called: an event
/// handler counts as skipped, a command handler reports the error.
pub trait FromContext: Sized {
    /// Attempts to extract this type from the given context.
    fn from_context(ctx: &HandlerContext) -> ExtractResult<Self>;
}

/// Optional parameters never fail.
impl<T: FromContext> FromContext for Option<T> {
    fn from_context(ctx: &HandlerContext) -> ExtractResult<Self> {
        Ok(T::from_context(ctx).ok())
    }
}

/// The whole event, whatever its kind.
impl FromContext for HostEvent {
    fn from_context(ctx: &HandlerContext) -> ExtractResult<Self> {
        ctx.event().cloned().ok_or(ExtractError::NotAnEvent)
    }
}

/// The full service bundle.
impl FromContext for HostServices {
    fn from_context(ctx: &HandlerContext) -> ExtractResult<Self> {
        Ok(ctx.services().clone())
    }
}

/// The host's logger service.
///
/// ```rust,ignore
/// fn on_install(logger: Logger) {
///     logger.log("installed");
/// }
/// ```
#[derive(Clone)]
pub struct Logger(pub Arc<dyn LoggerService>);

impl Deref for Logger {
    type Target = dyn LoggerService;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl FromContext for Logger {
    fn from_context(ctx: &HandlerContext) -> ExtractResult<Self> {
        Ok(Self(Arc::clone(ctx.services().logger())))
    }
}

/// The host's file system service.
#[derive(Clone)]
pub struct FileSystem(pub Arc<dyn FileSystemService>);

impl Deref for FileSystem {
    type Target = dyn FileSystemService;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl FromContext for FileSystem {
    fn from_context(ctx: &HandlerContext) -> ExtractResult<Self> {
        Ok(Self(Arc::clone(ctx.services().file_system())))
    }
}
