//! # Tether
//!
//! The extension contract between a build-orchestration host and its
//! plugins. A plugin
//!
//! - negotiates its configuration during an interactive install, never
//!   overwriting values the user already set,
//! - subscribes typed handlers to the lifecycle events the host emits,
//! - registers CLI subcommands the host dispatches into.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐ install / init ┌──────────────────────────────┐
//! │  PluginHost  │───────────────▶│ Plugin "template"            │
//! │              │   HostEvent    │   EventRouter  ─▶ handlers   │──▶ Logger
//! │              │───────────────▶│   CommandRouter ─▶ commands  │──▶ FileSystem
//! │              │   argv         └──────────────────────────────┘
//! │              │───────────────▶  Plugin "testing" ...
//! └──────────────┘
//! ```
//!
//! ## Writing a plugin
//!
//! ```rust,ignore
//! use tether::prelude::*;
//!
//! fn greet(settings: Settings<MyConfig>, logger: Logger) {
//!     logger.log(settings.greeting.as_deref().unwrap_or("hello"));
//! }
//!
//! struct MyPlugin;
//!
//! #[async_trait]
//! impl Plugin for MyPlugin {
//!     type Config = MyConfig;
//!
//!     fn name(&self) -> &str { "my-plugin" }
//!
//!     async fn install(&self, existing: &MyConfig, ctx: &InstallContext) -> MyConfig {
//!         MyConfig {
//!             greeting: ctx.resolver()
//!                 .input(existing.greeting.as_ref(), &InputPrompt::new("Greeting?"))
//!                 .await,
//!         }
//!     }
//!
//!     fn init(&self, registrar: &mut Registrar) {
//!         registrar.on(EventKind::AfterInstall, on_host_project().handler_sync(greet));
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - `command` *(default)*: clap-parsed command arguments via `Parsed<T>`
//! - `toml-config` *(default)* / `yaml-config`: host configuration formats
//! - `json-log`: JSON log output
//! - `terminal-prompt`: interactive prompts on the terminal

pub use tether_core as core;
pub use tether_framework as framework;
pub use tether_runtime as runtime;

pub use async_trait::async_trait;

/// Commonly used types for writing plugins and hosts.
///
/// ```rust,ignore
/// use tether::prelude::*;
/// ```
pub mod prelude {
    pub use async_trait::async_trait;
    pub use tower::ServiceBuilder;

    // Contract types
    pub use tether_core::{
        AfterInstallEvent, BuildManifestEvent, CheckboxPrompt, CustomEvent, Document, EventKind,
        FuzzyPathPrompt, HostEvent, HostServices, IgnoreFileEvent, InputPrompt, ModuleRef,
        PathItemType, PluginSettings, ProjectFile, StoredConfig,
    };

    // Plugin authoring
    pub use tether_framework::{InstallContext, Plugin, Registrar};
    pub use tether_framework::handler::{Layer, ServiceBuilderExt};

    // Extractors
    pub use tether_framework::{
        Args, CommandName, Event, FileSystem, FromContext, Logger, PluginName, Settings,
    };

    // Guards
    pub use tether_framework::{on_entry_module, on_host_project, on_kind};

    #[cfg(feature = "command")]
    pub use tether_framework::Parsed;

    // Hosting
    pub use tether_runtime::{FailurePolicy, MemoryConfigStore, PluginHost, PluginLoadState};
}
