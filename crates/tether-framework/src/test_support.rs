//! Stub services shared by the unit tests of this crate.

use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tether_core::{
    CheckboxPrompt, FileSystemService, FuzzyPathPrompt, HostEvent, HostServices, InputPrompt,
    LoggerService, PromptService, ServiceError, ServiceResult,
};

use crate::context::{HandlerContext, PluginContext, SettingsArc};

#[derive(Default)]
pub struct RecordingLogger {
    pub lines: Mutex<Vec<String>>,
}

impl LoggerService for RecordingLogger {
    fn log(&self, message: &str) {
        self.lines.lock().push(format!("log: {message}"));
    }

    fn error(&self, message: &str) {
        self.lines.lock().push(format!("error: {message}"));
    }
}

#[derive(Default)]
pub struct MemoryFs {
    pub files: Mutex<Vec<(PathBuf, String)>>,
}

#[async_trait]
impl FileSystemService for MemoryFs {
    async fn save_file(&self, path: &Path, content: &str) -> ServiceResult<()> {
        self.files.lock().push((path.to_path_buf(), content.to_string()));
        Ok(())
    }
}

/// Answers prompts from queues; an exhausted queue answers `None`.
#[derive(Default)]
pub struct QueuedPrompt {
    pub text: Mutex<VecDeque<ServiceResult<Option<String>>>>,
    pub sets: Mutex<VecDeque<Option<BTreeSet<String>>>>,
    pub calls: Mutex<Vec<String>>,
}

impl QueuedPrompt {
    pub fn answer(self, value: &str) -> Self {
        self.text.lock().push_back(Ok(Some(value.to_string())));
        self
    }

    pub fn fail(self) -> Self {
        self.text.lock().push_back(Err(ServiceError::Interrupted));
        self
    }

    pub fn answer_set(self, values: &[&str]) -> Self {
        self.sets
            .lock()
            .push_back(Some(values.iter().map(|v| v.to_string()).collect()));
        self
    }
}

#[async_trait]
impl PromptService for QueuedPrompt {
    async fn input(&self, request: &InputPrompt) -> ServiceResult<Option<String>> {
        self.calls.lock().push(request.message.clone());
        self.text.lock().pop_front().unwrap_or(Ok(None))
    }

    async fn fuzzy_path(&self, request: &FuzzyPathPrompt) -> ServiceResult<Option<String>> {
        self.calls.lock().push(request.message.clone());
        self.text.lock().pop_front().unwrap_or(Ok(None))
    }

    async fn checkbox(&self, request: &CheckboxPrompt) -> ServiceResult<Option<BTreeSet<String>>> {
        self.calls.lock().push(request.message.clone());
        Ok(self.sets.lock().pop_front().flatten())
    }
}

pub fn services_with(prompt: Arc<QueuedPrompt>) -> (HostServices, Arc<RecordingLogger>) {
    let logger = Arc::new(RecordingLogger::default());
    let services = HostServices::new(prompt, logger.clone(), Arc::new(MemoryFs::default()));
    (services, logger)
}

pub fn services() -> (HostServices, Arc<RecordingLogger>) {
    services_with(Arc::new(QueuedPrompt::default()))
}

pub fn plugin_ctx(services: HostServices, settings: SettingsArc) -> PluginContext {
    PluginContext::new("test-plugin", settings, services)
}

pub fn event_ctx(event: HostEvent) -> Arc<HandlerContext> {
    let (services, _) = services();
    Arc::new(HandlerContext::for_event(
        event,
        plugin_ctx(services, Arc::new(())),
    ))
}

pub fn command_ctx(name: &str, args: &[&str]) -> Arc<HandlerContext> {
    let (services, _) = services();
    command_ctx_with(name, args, services)
}

pub fn command_ctx_with(name: &str, args: &[&str], services: HostServices) -> Arc<HandlerContext> {
    Arc::new(HandlerContext::for_command(
        name,
        args.iter().map(|a| a.to_string()).collect(),
        plugin_ctx(services, Arc::new(())),
    ))
}
