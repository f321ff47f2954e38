//! Error types for the Tether framework.

use tether_core::EventKind;
use thiserror::Error;
use tower::BoxError;

/// Returned by a guard or extractor when a handler does **not** apply.
///
/// The event router recognises this error and moves on to the next handler
/// without logging anything. All other errors are treated as genuine failures.
#[derive(Debug, Clone, Error)]
#[error("handler skipped by guard")]
pub struct HandlerSkipped;

/// Errors that can occur during context extraction.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// The event is not of the kind the extractor expects.
    #[error("event kind mismatch: expected '{expected}', got '{got}'")]
    KindMismatch {
        /// Expected payload type name.
        expected: &'static str,
        /// Actual event kind.
        got: EventKind,
    },

    /// The extractor needs an event but the handler was invoked for a command.
    #[error("handler was not invoked for an event")]
    NotAnEvent,

    /// The extractor needs a command but the handler was invoked for an event.
    #[error("handler was not invoked for a command")]
    NotACommand,

    /// The plugin's settings are not of the requested type.
    #[error("settings type mismatch: expected '{expected}'")]
    SettingsMismatch {
        /// Expected settings type name.
        expected: &'static str,
    },

    /// The command arguments did not parse. The message is shown to the user.
    #[error("{0}")]
    Usage(String),

    /// The user asked for help or version output. The text is shown to the user.
    #[error("{0}")]
    Help(String),

    /// Custom extraction error.
    #[error("{0}")]
    Custom(String),
}

impl ExtractError {
    /// Creates a custom extraction error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// An event handler failed; remaining handlers for the event were not run.
#[derive(Debug, Error)]
#[error("handler #{index} of plugin '{plugin}' failed on {kind}: {source}")]
pub struct DispatchError {
    /// The event kind being dispatched.
    pub kind: EventKind,
    /// The plugin owning the handler.
    pub plugin: String,
    /// Registration index of the failing handler within its kind.
    pub index: usize,
    /// The handler's error.
    #[source]
    pub source: BoxError,
}

/// A command handler failed.
#[derive(Debug, Error)]
#[error("command '{command}' of plugin '{plugin}' failed: {source}")]
pub struct CommandError {
    /// The command name.
    pub command: String,
    /// The plugin owning the handler.
    pub plugin: String,
    /// The handler's error.
    #[source]
    pub source: BoxError,
}
