//! Plugin contract.
//!
//! # Architecture
//!
//! A plugin is a value implementing [`Plugin`]. The host drives it through
//! two hooks:
//!
//! - [`Plugin::install`] runs once per installation action and turns the
//!   previously persisted configuration into a new one, prompting the user
//!   through the [`ConfigResolver`](crate::ConfigResolver) for whatever is
//!   still missing.
//! - [`Plugin::init`] runs once per host run and registers every event and
//!   command handler on a [`Registrar`]. The registrar is frozen into
//!   immutable [`PluginRoutes`] when `init` returns.
//!
//! Hosts hold plugins as [`ErasedPlugin`] trait objects, which deal in
//! [`StoredConfig`](tether_core::StoredConfig) envelopes instead of the
//! plugin's own settings type, and get a [`LoadedPlugin`] back from
//! [`ErasedPlugin::load`].
//!
//! # Quick start
//!
//! ```rust,ignore
//! use tether::prelude::*;
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! #[serde(default, rename_all = "camelCase")]
//! struct EchoConfig {
//!     prefix: Option<String>,
//! }
//!
//! impl PluginSettings for EchoConfig {}
//!
//! fn echo(args: Args, cfg: Settings<EchoConfig>, logger: Logger) -> bool {
//!     logger.log(&format!("{}{}", cfg.prefix.as_deref().unwrap_or(""), args.join(" ")));
//!     true
//! }
//!
//! struct EchoPlugin;
//!
//! #[async_trait]
//! impl Plugin for EchoPlugin {
//!     type Config = EchoConfig;
//!
//!     fn name(&self) -> &str {
//!         "EchoPlugin"
//!     }
//!
//!     async fn install(&self, existing: &EchoConfig, ctx: &InstallContext) -> EchoConfig {
//!         let prefix = ctx
//!             .resolver()
//!             .input(existing.prefix.as_ref(), &InputPrompt::new("Prefix"))
//!             .await;
//!         EchoConfig { prefix }
//!     }
//!
//!     fn init(&self, registrar: &mut Registrar) {
//!         registrar.command_sync("echo", echo);
//!     }
//! }
//! ```

mod erased;
mod registrar;

pub use erased::{ErasedPlugin, LoadedPlugin};
pub use registrar::{PluginRoutes, Registrar};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tether_core::{HostServices, LoggerService, PluginSettings};

use crate::resolver::ConfigResolver;

// ─── Plugin ───────────────────────────────────────────────────────────────────

/// A unit of extension code loaded by the host.
#[async_trait]
pub trait Plugin: Send + Sync + 'static {
    /// The plugin's configuration schema.
    type Config: PluginSettings;

    /// Name used for logging and as the configuration key.
    fn name(&self) -> &str;

    /// Produces a new configuration from the existing one.
    ///
    /// Must leave every already-set setting unchanged unless the user supplies
    /// a new value, so that running install twice is harmless.
    async fn install(&self, existing: &Self::Config, ctx: &InstallContext) -> Self::Config;

    /// Registers every handler the plugin exposes during this run.
    fn init(&self, registrar: &mut Registrar);
}

// ─── InstallContext ───────────────────────────────────────────────────────────

/// What a plugin can use while installing.
pub struct InstallContext {
    plugin: Arc<str>,
    resolver: ConfigResolver,
    services: HostServices,
}

impl InstallContext {
    /// Creates an install context resolving through the service bundle's
    /// prompt service.
    pub fn new(plugin: impl Into<Arc<str>>, services: HostServices) -> Self {
        Self {
            plugin: plugin.into(),
            resolver: ConfigResolver::new(Arc::clone(services.prompt())),
            services,
        }
    }

    /// The installing plugin's name.
    pub fn plugin_name(&self) -> &str {
        &self.plugin
    }

    /// The config merge resolver.
    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    /// The host's logger service.
    pub fn logger(&self) -> &dyn LoggerService {
        self.services.logger().as_ref()
    }

    /// The full service bundle.
    pub fn services(&self) -> &HostServices {
        &self.services
    }
}

impl fmt::Debug for InstallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallContext")
            .field("plugin", &self.plugin)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
