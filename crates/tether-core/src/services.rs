//! Host services consumed by plugins.
//!
//! These are the only capabilities a plugin gets from its host. They are
//! injected explicitly (install receives them through its context, handlers
//! through extractors) rather than reached through process-wide state, so
//! every piece of plugin logic can be exercised against a stub.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServiceResult;
use crate::prompt::{CheckboxPrompt, FuzzyPathPrompt, InputPrompt};

/// Interactive prompts shown during install.
///
/// Every method returns `Ok(None)` when the user gave no answer (cancelled,
/// or the service legitimately has nothing to return). Implementations apply
/// the prompt's default themselves when the user submits an empty
/// answer, and re-prompt `input` until its validator accepts.
#[async_trait]
pub trait PromptService: Send + Sync {
    /// Asks for free text.
    async fn input(&self, request: &InputPrompt) -> ServiceResult<Option<String>>;

    /// Asks for a filesystem path.
    async fn fuzzy_path(&self, request: &FuzzyPathPrompt) -> ServiceResult<Option<String>>;

    /// Asks the user to pick any number of choices.
    async fn checkbox(&self, request: &CheckboxPrompt) -> ServiceResult<Option<BTreeSet<String>>>;
}

/// Fire-and-forget user-facing log output.
pub trait LoggerService: Send + Sync {
    /// Logs an informational message.
    fn log(&self, message: &str);

    /// Logs an error message.
    fn error(&self, message: &str);
}

/// File writes performed by plugins.
#[async_trait]
pub trait FileSystemService: Send + Sync {
    /// Writes `content` to `path`, replacing any existing file.
    async fn save_file(&self, path: &Path, content: &str) -> ServiceResult<()>;
}

/// The bundle of services a host hands to its plugins.
#[derive(Clone)]
pub struct HostServices {
    prompt: Arc<dyn PromptService>,
    logger: Arc<dyn LoggerService>,
    file_system: Arc<dyn FileSystemService>,
}

impl HostServices {
    /// Creates a service bundle.
    pub fn new(
        prompt: Arc<dyn PromptService>,
        logger: Arc<dyn LoggerService>,
        file_system: Arc<dyn FileSystemService>,
    ) -> Self {
        Self {
            prompt,
            logger,
            file_system,
        }
    }

    /// Replaces the prompt service.
    pub fn with_prompt(mut self, prompt: Arc<dyn PromptService>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Replaces the logger service.
    pub fn with_logger(mut self, logger: Arc<dyn LoggerService>) -> Self {
        self.logger = logger;
        self
    }

    /// Replaces the file system service.
    pub fn with_file_system(mut self, file_system: Arc<dyn FileSystemService>) -> Self {
        self.file_system = file_system;
        self
    }

    /// The prompt service.
    pub fn prompt(&self) -> &Arc<dyn PromptService> {
        &self.prompt
    }

    /// The logger service.
    pub fn logger(&self) -> &Arc<dyn LoggerService> {
        &self.logger
    }

    /// The file system service.
    pub fn file_system(&self) -> &Arc<dyn FileSystemService> {
        &self.file_system
    }
}

impl fmt::Debug for HostServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostServices").finish_non_exhaustive()
    }
}
