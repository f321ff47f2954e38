//! Handler context.
//!
//! Every handler invocation receives an `Arc<`[`HandlerContext`]`>` built by
//! the plugin for one event instance or one command. It combines:
//!
//! - the [`Trigger`] (the host event, or the command name and raw tokens);
//! - the [`PluginContext`]: plugin identity, its active settings and the host
//!   services it may use.
//!
//! The context only lives for the duration of the dispatch call. Handlers must
//! not stash it (or the payload inside) anywhere that outlives the call.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tether_core::{EventKind, HostEvent, HostServices};

/// Type-erased settings value. Downcast with [`HandlerContext::settings`].
pub type SettingsArc = Arc<dyn Any + Send + Sync>;

/// What caused a handler to run.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// A host event.
    Event(HostEvent),
    /// A CLI command routed by the host.
    Command {
        /// The command name.
        name: String,
        /// Every token following the command name, unparsed.
        args: Vec<String>,
    },
}

// =============================================================================
// PluginContext
// =============================================================================

/// Plugin-specific data attached to every dispatch.
#[derive(Clone)]
pub struct PluginContext {
    name: Arc<str>,
    settings: SettingsArc,
    services: HostServices,
}

impl PluginContext {
    /// Creates a new `PluginContext`.
    pub fn new(name: impl Into<Arc<str>>, settings: SettingsArc, services: HostServices) -> Self {
        Self {
            name: name.into(),
            settings,
            services,
        }
    }

    /// The plugin's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The host services.
    pub fn services(&self) -> &HostServices {
        &self.services
    }

    /// The plugin's active settings, if they are of type `T`.
    pub fn settings<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.settings).downcast::<T>().ok()
    }
}

impl fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginContext")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// HandlerContext
// =============================================================================

/// The full context handed to handlers.
#[derive(Debug)]
pub struct HandlerContext {
    trigger: Trigger,
    plugin: PluginContext,
}

impl HandlerContext {
    /// Creates a context for an event dispatch.
    pub fn for_event(event: HostEvent, plugin: PluginContext) -> Self {
        Self {
            trigger: Trigger::Event(event),
            plugin,
        }
    }

    /// Creates a context for a command dispatch.
    pub fn for_command(name: impl Into<String>, args: Vec<String>, plugin: PluginContext) -> Self {
        Self {
            trigger: Trigger::Command {
                name: name.into(),
                args,
            },
            plugin,
        }
    }

    /// What caused this dispatch.
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// The event, if this is an event dispatch.
    pub fn event(&self) -> Option<&HostEvent> {
        match &self.trigger {
            Trigger::Event(e) => Some(e),
            Trigger::Command { .. } => None,
        }
    }

    /// The event kind, if this is an event dispatch.
    pub fn event_kind(&self) -> Option<EventKind> {
        self.event().map(HostEvent::kind)
    }

    /// The command name, if this is a command dispatch.
    pub fn command(&self) -> Option<&str> {
        match &self.trigger {
            Trigger::Command { name, .. } => Some(name),
            Trigger::Event(_) => None,
        }
    }

    /// The raw command tokens, if this is a command dispatch.
    pub fn args(&self) -> Option<&[String]> {
        match &self.trigger {
            Trigger::Command { args, .. } => Some(args),
            Trigger::Event(_) => None,
        }
    }

    /// The owning plugin's name.
    pub fn plugin_name(&self) -> &str {
        self.plugin.name()
    }

    /// The plugin-specific part of the context.
    pub fn plugin(&self) -> &PluginContext {
        &self.plugin
    }

    /// The host services.
    pub fn services(&self) -> &HostServices {
        self.plugin.services()
    }

    /// The plugin's active settings, if they are of type `T`.
    pub fn settings<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.plugin.settings()
    }
}
