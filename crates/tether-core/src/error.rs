//! Unified error types for the Tether core contract.
//!
//! Framework-level errors (extraction, dispatch, commands) live in
//! `tether-framework`; host-level errors live in `tether-runtime`.

use thiserror::Error;

// =============================================================================
// Service Errors
// =============================================================================

/// Errors raised by the host services a plugin consumes.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The prompt could not be shown or read.
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// The user interrupted the prompt (e.g. Ctrl+C).
    #[error("prompt interrupted")]
    Interrupted,

    /// A file system operation failed.
    #[error("file system error at '{path}': {reason}")]
    FileSystem {
        /// Path the operation targeted.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl ServiceError {
    /// Creates a prompt error.
    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    /// Creates a file system error for `path`.
    pub fn file_system(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FileSystem {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// Settings Errors
// =============================================================================

/// Errors converting a plugin's typed settings to or from the persisted form.
#[derive(Debug, Clone, Error)]
pub enum SettingsError {
    /// The settings could not be serialized.
    #[error("failed to serialize settings for '{plugin}': {reason}")]
    Serialize {
        /// The owning plugin.
        plugin: String,
        /// Reason for failure.
        reason: String,
    },

    /// The persisted settings do not match the plugin's schema.
    #[error("failed to deserialize settings for '{plugin}' (schema v{version}): {reason}")]
    Deserialize {
        /// The owning plugin.
        plugin: String,
        /// Schema version recorded in the stored envelope.
        version: u32,
        /// Reason for failure.
        reason: String,
    },
}

// =============================================================================
// Event Errors
// =============================================================================

/// Errors building a [`HostEvent`](crate::HostEvent) from its wire form.
#[derive(Debug, Clone, Error)]
pub enum EventError {
    /// The payload does not match the built-in kind it was sent as.
    #[error("invalid payload for event '{kind}': {reason}")]
    Payload {
        /// The event's wire name.
        kind: String,
        /// Reason for failure.
        reason: String,
    },
}

impl EventError {
    /// Creates a payload error.
    pub fn payload(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Payload {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for host service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type for settings conversion.
pub type SettingsResult<T> = Result<T, SettingsError>;
