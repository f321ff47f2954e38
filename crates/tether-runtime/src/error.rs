//! Runtime error types.

use tether_core::SettingsError;
use tether_framework::{CommandError, DispatchError};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during host operations.
#[derive(Error, Debug)]
pub enum HostError {
    /// No plugin with this name is registered.
    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    /// A plugin with this name is already registered.
    #[error("Plugin already registered: {0}")]
    DuplicatePlugin(String),

    /// The plugin exists but is not active.
    #[error("Plugin not active: {0}")]
    PluginNotActive(String),

    /// Converting a plugin configuration failed.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// An event handler failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// A command handler failed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The configuration store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;
