//! Extractor system for the Tether framework.
//!
//! Handler functions declare what they need as parameters, and the framework
//! provides it from the current [`HandlerContext`](crate::HandlerContext):
//!
//! ```rust,ignore
//! pub trait FromContext: Sized {
//!     fn from_context(ctx: &HandlerContext) -> ExtractResult<Self>;
//! }
//! ```
//!
//! If an extractor fails, an event handler is skipped with
//! [`HandlerSkipped`](crate::HandlerSkipped). Optional extractors with
//! [`Option<T>`] never fail.

pub mod core;
pub mod event;
pub mod plugin;

pub use self::core::{FileSystem, FromContext, Logger};
pub use event::Event;
pub use plugin::{PluginName, Settings};
