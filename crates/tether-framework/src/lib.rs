//! # Tether Framework
//!
//! The plugin-side machinery of the Tether contract:
//!
//! - Config merge resolver ([`ConfigResolver`]) used during install
//! - Event router: ordered, sequential dispatch of typed host events
//! - Command router: one handler per command name
//! - Axum-style handlers with [`FromContext`] extractors and tower guards
//! - The [`Plugin`] trait, its init-time [`Registrar`] and the type-erased
//!   [`ErasedPlugin`] the host holds
//! - Clap-based argument parsing for commands (with `command` feature)

pub mod command;
pub mod context;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod plugin;
pub mod resolver;
pub mod router;
pub mod routing;

#[cfg(test)]
pub(crate) mod test_support;

pub use command::{
    Args, CommandName, CommandRouter, CommandRouterBuilder, parse_command_line,
    split_command_line,
};
#[cfg(feature = "command")]
pub use command::Parsed;
pub use context::{HandlerContext, PluginContext, Trigger};
pub use error::{CommandError, DispatchError, ExtractError, ExtractResult, HandlerSkipped};
pub use extractor::{Event, FileSystem, FromContext, Logger, PluginName, Settings};
pub use handler::{
    CommandResponse, FromCtxFn, HandlerResponse, HandlerService, ServiceBuilderExt, SyncFn,
};
pub use plugin::{ErasedPlugin, InstallContext, LoadedPlugin, Plugin, PluginRoutes, Registrar};
pub use resolver::{ConfigResolver, merge_setting};
pub use router::{EventRouter, EventRouterBuilder};
pub use routing::{
    FilterServiceBuilder, is_entry_module, is_host_project, on_entry_module, on_host_project,
    on_kind,
};
