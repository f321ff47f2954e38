//! Event router.
//!
//! An [`EventRouterBuilder`] accumulates `(kind, service)` registrations during
//! plugin init and is frozen into an immutable [`EventRouter`]. Dispatch runs
//! every handler registered for the event's kind, in registration order, each
//! one to completion before the next starts.
//!
//! Handler outcomes:
//!
//! | Outcome                    | Effect                                  |
//! |----------------------------|-----------------------------------------|
//! | `Ok(())`                   | counted, next handler runs              |
//! | `Err(HandlerSkipped)`      | silent, next handler runs               |
//! | any other `Err`            | dispatch stops, [`DispatchError`]       |

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tower::util::BoxCloneSyncService;
use tower::{BoxError, Service, ServiceExt};
use tracing::{Instrument, debug, debug_span, trace};

use tether_core::EventKind;

use crate::context::HandlerContext;
use crate::error::{DispatchError, HandlerSkipped};

/// A type-erased event handler service.
pub type BoxedHandler = BoxCloneSyncService<Arc<HandlerContext>, (), BoxError>;

// =============================================================================
// EventRouterBuilder
// =============================================================================

/// Accumulates event handler registrations.
#[derive(Default)]
pub struct EventRouterBuilder {
    routes: HashMap<EventKind, Vec<BoxedHandler>>,
}

impl EventRouterBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `service` to the handlers of `kind`.
    ///
    /// Registering several handlers for the same kind is allowed; they run in
    /// the order they were registered.
    pub fn on<S>(&mut self, kind: EventKind, service: S) -> &mut Self
    where
        S: Service<Arc<HandlerContext>, Response = (), Error = BoxError>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        let handlers = self.routes.entry(kind.clone()).or_default();
        handlers.push(BoxCloneSyncService::new(service));
        debug!(event_kind = %kind, index = handlers.len() - 1, "Registered event handler");
        self
    }

    /// Freezes the registrations.
    pub fn build(self) -> EventRouter {
        EventRouter {
            routes: Arc::new(self.routes),
        }
    }
}

// =============================================================================
// EventRouter
// =============================================================================

/// Immutable mapping from event kind to its ordered handlers.
#[derive(Clone, Default)]
pub struct EventRouter {
    routes: Arc<HashMap<EventKind, Vec<BoxedHandler>>>,
}

impl EventRouter {
    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: &EventKind) -> usize {
        self.routes.get(kind).map_or(0, Vec::len)
    }

    /// Kinds with at least one handler.
    pub fn kinds(&self) -> impl Iterator<Item = &EventKind> {
        self.routes.keys()
    }

    /// Returns `true` if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatches the event carried by `ctx`.
    ///
    /// Returns the number of handlers that ran (skipped ones excluded). A kind
    /// with no handlers, or a context carrying a command instead of an
    /// event, is a no-op returning `Ok(0)`.
    pub async fn dispatch(&self, ctx: Arc<HandlerContext>) -> Result<usize, DispatchError> {
        let Some(kind) = ctx.event_kind() else {
            return Ok(0);
        };
        let Some(handlers) = self.routes.get(&kind) else {
            trace!(event_kind = %kind, "No handlers registered");
            return Ok(0);
        };

        let span = debug_span!("dispatch", event_kind = %kind, plugin = ctx.plugin_name());
        async move {
            let mut completed = 0;
            for (index, handler) in handlers.iter().enumerate() {
                match handler.clone().oneshot(Arc::clone(&ctx)).await {
                    Ok(()) => completed += 1,
                    Err(e) if e.is::<HandlerSkipped>() => {
                        trace!(index, "Handler skipped");
                    }
                    Err(source) => {
                        debug!(index, error = %source, "Event handler failed");
                        return Err(DispatchError {
                            kind: kind.clone(),
                            plugin: ctx.plugin_name().to_string(),
                            index,
                            source,
                        });
                    }
                }
            }
            debug!(completed, total = handlers.len(), "Dispatch finished");
            Ok(completed)
        }
        .instrument(span)
        .await
    }
}

impl fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, handlers) in self.routes.iter() {
            map.entry(&kind.as_str(), &handlers.len());
        }
        map.finish()
    }
}
