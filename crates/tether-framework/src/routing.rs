//! Payload guards.
//!
//! Convenience functions returning pre-configured [`ServiceBuilder`]s with a
//! guard stacked. The guards reject with [`HandlerSkipped`](crate::HandlerSkipped),
//! which the event router treats as a silent no-op.
//!
//! # Example
//!
//! ```rust,ignore
//! use tether::prelude::*;
//!
//! registrar.on(
//!     EventKind::AfterAdjustIgnoreFile,
//!     on_entry_module().handler(save_marker),
//! );
//! ```

use tower::ServiceBuilder;
use tower::filter::FilterLayer;
use tower_layer::{Identity, Stack};

use tether_core::EventKind;

use crate::context::HandlerContext;
use crate::handler::{EventPredicate, ServiceBuilderExt};

/// Convenience type alias for the `ServiceBuilder` returned by the guard
/// builders in this module.
pub type FilterServiceBuilder = ServiceBuilder<Stack<FilterLayer<EventPredicate>, Identity>>;

/// Passes when the event carries the host project file.
pub fn is_host_project(ctx: &HandlerContext) -> bool {
    ctx.event()
        .and_then(|e| e.project())
        .is_some_and(|p| p.is_host)
}

/// Passes when the event refers to the entry module.
pub fn is_entry_module(ctx: &HandlerContext) -> bool {
    ctx.event()
        .and_then(|e| e.module())
        .is_some_and(|m| m.is_entry)
}

/// Creates a [`ServiceBuilder`] that only passes events of `kind`.
///
/// The router already routes by kind; this is for services that are shared
/// between several registrations.
pub fn on_kind(kind: EventKind) -> FilterServiceBuilder {
    ServiceBuilder::new()
        .rule_sync(move |ctx: &HandlerContext| ctx.event_kind().as_ref() == Some(&kind))
}

/// Creates a [`ServiceBuilder`] that only passes events for the host project.
pub fn on_host_project() -> FilterServiceBuilder {
    ServiceBuilder::new().rule_sync(is_host_project)
}

/// Creates a [`ServiceBuilder`] that only passes events for the entry module.
pub fn on_entry_module() -> FilterServiceBuilder {
    ServiceBuilder::new().rule_sync(is_entry_module)
}
