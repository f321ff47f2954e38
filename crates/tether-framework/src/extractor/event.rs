use std::any::type_name;
use std::fmt;
use std::ops::Deref;

use tether_core::FromHostEvent;

use crate::context::HandlerContext;
use crate::error::{ExtractError, ExtractResult};
use crate::extractor::FromContext;

/// The typed payload of the event being dispatched.
///
/// Use `Deref` to access payload fields directly.
///
/// ```rust,ignore
/// fn on_manifest(event: Event<BuildManifestEvent>) {
///     event.manifest.edit(|json| json["something"] = "".into());
/// }
/// ```
///
/// Extraction fails with [`ExtractError::KindMismatch`] when the event is of
/// a different kind, which skips the handler.
#[derive(Clone)]
pub struct Event<T: FromHostEvent>(pub T);

impl<T: FromHostEvent> Event<T> {
    /// Unwraps the payload.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: FromHostEvent> Deref for Event<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: FromHostEvent + fmt::Debug> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Event").field(&self.0).finish()
    }
}

impl<T: FromHostEvent> FromContext for Event<T> {
    fn from_context(ctx: &HandlerContext) -> ExtractResult<Self> {
        let event = ctx.event().ok_or(ExtractError::NotAnEvent)?;
        T::from_host_event(event)
            .map(Event)
            .ok_or_else(|| ExtractError::KindMismatch {
                expected: type_name::<T>(),
                got: event.kind(),
            })
    }
}
