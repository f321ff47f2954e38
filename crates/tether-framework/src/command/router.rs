//! Command router.
//!
//! One handler per command name; registering a name again replaces the
//! previous handler.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tower::util::BoxCloneSyncService;
use tower::{BoxError, Service, ServiceExt};
use tracing::{Instrument, debug, debug_span};

use crate::context::HandlerContext;
use crate::error::CommandError;
use crate::handler::{Blocking, CommandResponse, CommandService, FromCtxFn, SyncFn};

/// A type-erased command handler service.
pub type BoxedCommand = BoxCloneSyncService<Arc<HandlerContext>, bool, BoxError>;

// =============================================================================
// CommandRouterBuilder
// =============================================================================

/// Accumulates command registrations.
#[derive(Default)]
pub struct CommandRouterBuilder {
    commands: BTreeMap<String, BoxedCommand>,
}

impl CommandRouterBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an async command handler.
    pub fn command<F, R, T>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: FromCtxFn<R, T>,
        R: CommandResponse,
        T: 'static,
    {
        self.service(name, CommandService::new(handler))
    }

    /// Registers a synchronous command handler.
    pub fn command_sync<F, R, T>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        SyncFn<F>: FromCtxFn<R, Blocking<T>>,
        R: CommandResponse,
        T: 'static,
    {
        self.service(name, CommandService::new(SyncFn(handler)))
    }

    /// Registers an arbitrary command service.
    pub fn service<S>(&mut self, name: impl Into<String>, service: S) -> &mut Self
    where
        S: Service<Arc<HandlerContext>, Response = bool, Error = BoxError>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        let name = name.into();
        if self
            .commands
            .insert(name.clone(), BoxCloneSyncService::new(service))
            .is_some()
        {
            debug!(command = %name, "Replaced command handler");
        } else {
            debug!(command = %name, "Registered command handler");
        }
        self
    }

    /// Freezes the registrations.
    pub fn build(self) -> CommandRouter {
        CommandRouter {
            commands: Arc::new(self.commands),
        }
    }
}

// =============================================================================
// CommandRouter
// =============================================================================

/// Immutable mapping from command name to its handler.
#[derive(Clone, Default)]
pub struct CommandRouter {
    commands: Arc<BTreeMap<String, BoxedCommand>>,
}

impl CommandRouter {
    /// The advertised command names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Returns `true` if `name` has a handler.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Dispatches the command carried by `ctx`.
    ///
    /// Returns `Ok(false)` when no handler is registered under the name (or
    /// `ctx` carries an event); otherwise the handler's result verbatim.
    pub async fn dispatch(&self, ctx: Arc<HandlerContext>) -> Result<bool, CommandError> {
        let Some(name) = ctx.command() else {
            return Ok(false);
        };
        let Some(handler) = self.commands.get(name) else {
            return Ok(false);
        };

        let span = debug_span!("command", command = name, plugin = ctx.plugin_name());
        handler
            .clone()
            .oneshot(Arc::clone(&ctx))
            .instrument(span)
            .await
            .map_err(|source| {
                debug!(command = name, error = %source, "Command handler failed");
                CommandError {
                    command: name.to_string(),
                    plugin: ctx.plugin_name().to_string(),
                    source,
                }
            })
    }
}

impl fmt::Debug for CommandRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.commands.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Args;
    use crate::extractor::Logger;
    use crate::test_support::{command_ctx, command_ctx_with, event_ctx, services};

    #[tokio::test]
    async fn test_unregistered_command_returns_false() {
        let router = CommandRouterBuilder::new().build();
        assert!(!router.dispatch(command_ctx("nope", &[])).await.unwrap());
    }

    #[tokio::test]
    async fn test_dispatch_returns_handler_result() {
        let mut builder = CommandRouterBuilder::new();
        builder.command_sync("yes", || true);
        builder.command_sync("no", || false);
        builder.command("async", |args: Args| async move { args.len() == 2 });
        let router = builder.build();

        assert!(router.dispatch(command_ctx("yes", &[])).await.unwrap());
        assert!(!router.dispatch(command_ctx("no", &[])).await.unwrap());
        assert!(router.dispatch(command_ctx("async", &["a", "b"])).await.unwrap());
        assert!(!router.dispatch(command_ctx("async", &["a"])).await.unwrap());
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let mut builder = CommandRouterBuilder::new();
        builder.command_sync("example", || false);
        builder.command_sync("example", || true);
        let router = builder.build();

        assert_eq!(router.names().collect::<Vec<_>>(), ["example"]);
        assert!(router.dispatch(command_ctx("example", &[])).await.unwrap());
    }

    #[tokio::test]
    async fn test_args_are_passed_unparsed() {
        let (services, logger) = services();
        let mut builder = CommandRouterBuilder::new();
        builder.command_sync("testing", |args: Args, logger: Logger| {
            logger.log(&args.join(", "));
            true
        });
        let router = builder.build();

        let ctx = command_ctx_with("testing", &["--x", "two words"], services);
        assert!(router.dispatch(ctx).await.unwrap());
        assert_eq!(*logger.lines.lock(), ["log: --x, two words"]);
    }

    #[tokio::test]
    async fn test_handler_error_carries_command_and_plugin() {
        let mut builder = CommandRouterBuilder::new();
        builder.command_sync("broken", || -> Result<bool, std::io::Error> {
            Err(std::io::Error::other("boom"))
        });
        let router = builder.build();

        let err = router.dispatch(command_ctx("broken", &[])).await.unwrap_err();
        assert_eq!(err.command, "broken");
        assert_eq!(err.plugin, "test-plugin");
        assert_eq!(err.source.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_event_context_is_not_a_command() {
        let mut builder = CommandRouterBuilder::new();
        builder.command_sync("yes", || true);
        let router = builder.build();
        let ctx = event_ctx(tether_core::AfterInstallEvent::default().into());
        assert!(!router.dispatch(ctx).await.unwrap());
    }
}
