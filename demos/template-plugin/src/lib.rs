//! A plugin skeleton showing every part of the contract: install prompts,
//! guarded event handlers (sync and async) and a command.

mod config;

use std::path::Path;

use serde_json::Value;
use tether::core::{ModuleRef, ServiceError};
use tether::prelude::*;

pub use config::TemplateConfig;

pub const PLUGIN_NAME: &str = "TemplatePlugin";

pub const OPTIONS: [&str; 5] = ["Option1", "Option2", "Option3", "Option4", "Option5"];

/// The template plugin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatePlugin;

fn module_name(module: Option<&ModuleRef>) -> &str {
    module
        .and_then(|m| m.module_name.as_deref())
        .unwrap_or_default()
}

fn log_first_module(
    Event(event): Event<AfterInstallEvent>,
    settings: Settings<TemplateConfig>,
    logger: Logger,
) {
    let first = event.project.as_ref().and_then(|p| p.modules.first());
    logger.log(&format!(
        "{} --> {}",
        settings.some_setting.as_deref().unwrap_or_default(),
        module_name(first)
    ));
}

fn mark_manifest(Event(event): Event<BuildManifestEvent>, logger: Logger) {
    event.manifest.edit(|doc| {
        if let Some(doc) = doc.as_object_mut() {
            doc.insert("something".to_string(), Value::String(String::new()));
        }
    });
    logger.log(&format!("entry module: {}", module_name(event.module.as_ref())));
}

async fn save_marker(
    Event(event): Event<IgnoreFileEvent>,
    fs: FileSystem,
    logger: Logger,
) -> Result<(), ServiceError> {
    fs.save_file(Path::new("myPath"), "myContent").await?;
    logger.log(&format!("entry module: {}", module_name(event.module.as_ref())));
    Ok(())
}

fn example(args: Args, logger: Logger) -> bool {
    logger.error("This command has yet to be implemented ¯\\_(ツ)_/¯");
    logger.error(args.first().map(String::as_str).unwrap_or_default());
    true
}

#[async_trait]
impl Plugin for TemplatePlugin {
    type Config = TemplateConfig;

    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn install(&self, existing: &TemplateConfig, ctx: &InstallContext) -> TemplateConfig {
        let resolver = ctx.resolver();

        let some_setting = resolver
            .input(
                existing.some_setting.as_ref(),
                &InputPrompt::new("Please enter a string configuration property")
                    .default_value("default value")
                    .validator(|v| v.ends_with(".json")),
            )
            .await;

        let some_path_setting = resolver
            .fuzzy_path(
                existing.some_path_setting.as_ref(),
                &FuzzyPathPrompt::new("Please enter a (fuzzy)path configuration property")
                    .default_value("test/directory")
                    .item_type(PathItemType::File),
            )
            .await;

        let some_array_setting = resolver
            .checkbox(
                existing.some_array_setting.as_ref(),
                &CheckboxPrompt::with_choices("Please select options", OPTIONS),
            )
            .await;

        TemplateConfig {
            some_setting,
            some_path_setting,
            some_array_setting,
        }
    }

    fn init(&self, registrar: &mut Registrar) {
        registrar
            .on(
                EventKind::AfterInstall,
                on_host_project().handler_sync(log_first_module),
            )
            .on(
                EventKind::BeforeAdjustBuildManifest,
                on_entry_module().handler_sync(mark_manifest),
            )
            .on(
                EventKind::AfterAdjustIgnoreFile,
                on_entry_module().handler(save_marker),
            )
            .command_sync("example", example);
    }
}
