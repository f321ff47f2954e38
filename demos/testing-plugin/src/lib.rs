//! A plugin that reports every hook it receives. Hosts use it to check
//! their event and command plumbing end to end.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tether::core::ServiceError;
use tether::prelude::*;

pub const PLUGIN_NAME: &str = "TestingPlugin";

/// Name of the host project inside the build manifest.
pub const HOST_PROJECT: &str = "tether-host";

pub const MARKER_FILE: &str = "test.txt";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestingConfig {
    pub some_setting: Option<String>,
    pub some_path_setting: Option<String>,
    pub some_array_setting: Option<BTreeSet<String>>,
}

impl PluginSettings for TestingConfig {}

#[derive(Debug, Clone, Copy, Default)]
pub struct TestingPlugin;

fn report_install(
    Event(event): Event<AfterInstallEvent>,
    settings: Settings<TestingConfig>,
    logger: Logger,
) {
    let modules = event
        .project
        .as_ref()
        .map(|p| p.module_names().collect::<Vec<_>>().join(", "))
        .unwrap_or_default();
    logger.log(&format!(
        "AFTER_INSTALL has been called for configured modules {modules}"
    ));
    logger.log(&format!(
        "PluginConfig -> someSetting : {}",
        settings.some_setting.as_deref().unwrap_or_default()
    ));
}

fn report_manifest(Event(event): Event<BuildManifestEvent>, logger: Logger) {
    let pointer = format!("/projects/{HOST_PROJECT}/projectType");
    let project_type = event
        .manifest
        .pointer(&pointer)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());
    logger.log(&format!(
        "BEFORE_ADJUST_BUILD_MANIFEST has been called. ProjectType from manifest is: {project_type}"
    ));
}

async fn write_marker(fs: FileSystem, logger: Logger) -> Result<(), ServiceError> {
    logger.log("AFTER_ADJUST_IGNORE_FILE has been called");
    fs.save_file(Path::new(MARKER_FILE), "AFTER_ADJUST_IGNORE_FILE was here")
        .await?;
    logger.log("AFTER_ADJUST_IGNORE_FILE ran an async operation");
    Ok(())
}

fn testing(args: Args, logger: Logger) -> bool {
    logger.log("Test command works! ¯\\_(ツ)_/¯");
    logger.log(&args.join(", "));
    true
}

#[async_trait]
impl Plugin for TestingPlugin {
    type Config = TestingConfig;

    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn install(&self, existing: &TestingConfig, ctx: &InstallContext) -> TestingConfig {
        ctx.logger().log(&format!(
            "TestPlugin {} configuration started",
            env!("CARGO_PKG_VERSION")
        ));
        let resolver = ctx.resolver();

        TestingConfig {
            some_setting: resolver
                .input(
                    existing.some_setting.as_ref(),
                    &InputPrompt::new("Please enter a string configuration property")
                        .default_value("default value")
                        .validator(|v| v.ends_with(".json")),
                )
                .await,
            some_path_setting: resolver
                .fuzzy_path(
                    existing.some_path_setting.as_ref(),
                    &FuzzyPathPrompt::new("Please enter a (fuzzy)path configuration property")
                        .default_value("test/directory")
                        .item_type(PathItemType::File),
                )
                .await,
            some_array_setting: resolver
                .checkbox(
                    existing.some_array_setting.as_ref(),
                    &CheckboxPrompt::with_choices(
                        "Please select options",
                        ["Option1", "Option2", "Option3", "Option4", "Option5"],
                    ),
                )
                .await,
        }
    }

    fn init(&self, registrar: &mut Registrar) {
        registrar
            .on(
                EventKind::AfterInstall,
                ServiceBuilder::new().handler_sync(report_install),
            )
            .on(
                EventKind::BeforeAdjustBuildManifest,
                ServiceBuilder::new().handler_sync(report_manifest),
            )
            .on(
                EventKind::AfterAdjustIgnoreFile,
                ServiceBuilder::new().handler(write_marker),
            )
            .command_sync("testing", testing);
    }
}
