//! Host service implementations.
//!
//! | Service | Implementations |
//! |---------|-----------------|
//! | prompt | [`TerminalPrompt`] (`terminal-prompt` feature), [`NonInteractivePrompt`], [`ScriptedPrompt`] |
//! | logger | [`TracingLogger`], [`MemoryLogger`] |
//! | file system | [`LocalFileSystem`], [`MemoryFileSystem`] |

mod fs;
mod logger;
mod prompt;
#[cfg(feature = "terminal-prompt")]
mod terminal;

use std::sync::Arc;

use tether_core::{HostServices, PromptService};

pub use fs::{LocalFileSystem, MemoryFileSystem};
pub use logger::{LogEntry, LogLevel, MemoryLogger, TracingLogger};
pub use prompt::{NonInteractivePrompt, ScriptedAnswer, ScriptedPrompt};
#[cfg(feature = "terminal-prompt")]
pub use terminal::TerminalPrompt;

use crate::config::HostSettings;

/// The services a standalone host runs with.
///
/// Logs go to `tracing`, files to disk under `base_dir`. Prompts are
/// answered with defaults when `non_interactive` is set or no terminal
/// prompt is compiled in.
pub fn standard(settings: &HostSettings) -> HostServices {
    let file_system = match &settings.base_dir {
        Some(base) => LocalFileSystem::with_base(base),
        None => LocalFileSystem::new(),
    };
    HostServices::new(
        interactive_prompt(settings.non_interactive),
        Arc::new(TracingLogger),
        Arc::new(file_system),
    )
}

#[cfg(feature = "terminal-prompt")]
fn interactive_prompt(non_interactive: bool) -> Arc<dyn PromptService> {
    if non_interactive {
        Arc::new(NonInteractivePrompt)
    } else {
        Arc::new(TerminalPrompt)
    }
}

#[cfg(not(feature = "terminal-prompt"))]
fn interactive_prompt(_non_interactive: bool) -> Arc<dyn PromptService> {
    Arc::new(NonInteractivePrompt)
}
