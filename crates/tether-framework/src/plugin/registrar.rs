use std::sync::Arc;

use tower::{BoxError, Service};
use tracing::debug;

use tether_core::EventKind;

use crate::command::{CommandRouter, CommandRouterBuilder};
use crate::context::HandlerContext;
use crate::handler::{Blocking, CommandResponse, FromCtxFn, SyncFn};
use crate::router::{EventRouter, EventRouterBuilder};

// ─── Registrar ────────────────────────────────────────────────────────────────

/// Collects a plugin's registrations during [`Plugin::init`](super::Plugin::init).
///
/// ```rust,ignore
/// fn init(&self, registrar: &mut Registrar) {
///     registrar
///         .on(EventKind::AfterInstall, on_host_project().handler_sync(after_install))
///         .command_sync("example", example);
/// }
/// ```
pub struct Registrar {
    plugin: Arc<str>,
    events: EventRouterBuilder,
    commands: CommandRouterBuilder,
}

impl Registrar {
    /// Creates an empty registrar for `plugin`.
    pub fn new(plugin: impl Into<Arc<str>>) -> Self {
        Self {
            plugin: plugin.into(),
            events: EventRouterBuilder::new(),
            commands: CommandRouterBuilder::new(),
        }
    }

    /// Name of the plugin being initialised.
    pub fn plugin_name(&self) -> &str {
        &self.plugin
    }

    /// Appends an event handler service for `kind`.
    pub fn on<S>(&mut self, kind: EventKind, service: S) -> &mut Self
    where
        S: Service<Arc<HandlerContext>, Response = (), Error = BoxError>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        self.events.on(kind, service);
        self
    }

    /// Registers an async command handler, replacing any handler of the same
    /// name.
    pub fn command<F, R, T>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: FromCtxFn<R, T>,
        R: CommandResponse,
        T: 'static,
    {
        self.commands.command(name, handler);
        self
    }

    /// Registers a synchronous command handler, replacing any handler of the
    /// same name.
    pub fn command_sync<F, R, T>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        SyncFn<F>: FromCtxFn<R, Blocking<T>>,
        R: CommandResponse,
        T: 'static,
    {
        self.commands.command_sync(name, handler);
        self
    }

    /// Freezes the registrations.
    pub fn into_routes(self) -> PluginRoutes {
        let routes = PluginRoutes {
            events: self.events.build(),
            commands: self.commands.build(),
        };
        debug!(
            plugin = %self.plugin,
            event_kinds = routes.events.kinds().count(),
            commands = routes.commands.names().count(),
            "Plugin routes built"
        );
        routes
    }
}

// ─── PluginRoutes ─────────────────────────────────────────────────────────────

/// Immutable snapshot of a plugin's registrations.
#[derive(Debug, Clone, Default)]
pub struct PluginRoutes {
    events: EventRouter,
    commands: CommandRouter,
}

impl PluginRoutes {
    /// The event router.
    pub fn events(&self) -> &EventRouter {
        &self.events
    }

    /// The command router.
    pub fn commands(&self) -> &CommandRouter {
        &self.commands
    }
}
