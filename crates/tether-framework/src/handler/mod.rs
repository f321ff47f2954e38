//! Handler and service system for the Tether framework.
//!
//! - **Traits** ([`traits`]): [`FromCtxFn`], implemented for functions whose
//!   parameters all implement [`FromContext`](crate::FromContext)
//! - **Service** ([`service`]): [`HandlerService`] and [`CommandService`],
//!   the tower services every registration ends up as
//! - **Builder** ([`builder`]): guards and the [`ServiceBuilderExt`] helpers
//!
//! ```rust,ignore
//! use tether::prelude::*;
//!
//! // Sync handler, only for the entry module
//! fn on_manifest(event: Event<BuildManifestEvent>, logger: Logger) {
//!     logger.log("manifest");
//! }
//!
//! registrar.on(
//!     EventKind::BeforeAdjustBuildManifest,
//!     on_entry_module().handler_sync(on_manifest),
//! );
//! ```
//!
//! ```text
//! on_entry_module()           ← ServiceBuilder with FilterLayer pre-stacked
//!     .handler_sync(f)        ← HandlerService<SyncFn<f>> + FilterLayer
//! ```

pub mod builder;
pub mod service;
pub mod traits;

pub use builder::{AsyncEventPredicate, EventPredicate, ServiceBuilderExt};
pub use service::{CommandResponse, CommandService, HandlerResponse, HandlerService};
pub use traits::{Blocking, FromCtxFn, SyncFn};

pub use tower::Layer;
