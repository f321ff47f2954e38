use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::json;
use tether::prelude::*;
use tether::runtime::services::{LogLevel, MemoryFileSystem, MemoryLogger, ScriptedPrompt};
use tether_template_plugin::{PLUGIN_NAME, TemplateConfig, TemplatePlugin};
use tokio_test::{assert_err, assert_ok};

struct Harness {
    host: PluginHost,
    prompt: Arc<ScriptedPrompt>,
    logger: Arc<MemoryLogger>,
    fs: Arc<MemoryFileSystem>,
    store: Arc<MemoryConfigStore>,
}

fn harness(prompt: ScriptedPrompt, store: MemoryConfigStore) -> Harness {
    let prompt = Arc::new(prompt);
    let logger = Arc::new(MemoryLogger::new());
    let fs = Arc::new(MemoryFileSystem::new());
    let store = Arc::new(store);
    let services = HostServices::new(prompt.clone(), logger.clone(), fs.clone());

    let mut host = PluginHost::new(services, store.clone());
    host.register(TemplatePlugin).unwrap();
    Harness {
        host,
        prompt,
        logger,
        fs,
        store,
    }
}

fn configured() -> StoredConfig {
    StoredConfig {
        version: 1,
        settings: json!({
            "someSetting": "foo.json",
            "somePathSetting": "src/main.ts",
            "someArraySetting": ["Option2"],
        }),
    }
}

fn host_project() -> ProjectFile {
    ProjectFile {
        is_host: true,
        modules: vec![ModuleRef::entry("app"), ModuleRef::new("lib")],
    }
}

#[tokio::test]
async fn install_collects_all_three_settings() {
    let prompt = ScriptedPrompt::new()
        .text("foo.yaml")
        .text("foo.json")
        .text("")
        .choices(["Option1", "Option3"]);
    let h = harness(prompt, MemoryConfigStore::new());

    let stored = assert_ok!(h.host.install(PLUGIN_NAME).await);
    let config: TemplateConfig = stored.to_settings(PLUGIN_NAME).unwrap();

    assert_eq!(config.some_setting.as_deref(), Some("foo.json"));
    assert_eq!(config.some_path_setting.as_deref(), Some("test/directory"));
    assert_eq!(
        config.some_array_setting,
        Some(BTreeSet::from(["Option1".to_string(), "Option3".to_string()]))
    );
    assert_eq!(h.store.get(PLUGIN_NAME), Some(stored));
    assert_eq!(h.prompt.remaining(), 0);
}

#[tokio::test]
async fn reinstall_keeps_existing_values_without_prompting() {
    let h = harness(
        ScriptedPrompt::new().text("other.json"),
        MemoryConfigStore::new().with_entry(PLUGIN_NAME, configured()),
    );

    let stored = assert_ok!(h.host.install(PLUGIN_NAME).await);
    assert_eq!(stored, configured());
    assert!(h.prompt.asked().is_empty());
}

#[tokio::test]
async fn reinstall_only_asks_for_missing_values() {
    let partial = StoredConfig {
        version: 1,
        settings: json!({ "someSetting": "foo.json", "somePathSetting": "" }),
    };
    let h = harness(
        ScriptedPrompt::new().text("lib/index.ts").skip(),
        MemoryConfigStore::new().with_entry(PLUGIN_NAME, partial),
    );

    let stored = assert_ok!(h.host.install(PLUGIN_NAME).await);
    assert_eq!(
        h.prompt.asked(),
        [
            "Please enter a (fuzzy)path configuration property",
            "Please select options"
        ]
    );
    assert_eq!(
        stored.settings,
        json!({
            "someSetting": "foo.json",
            "somePathSetting": "lib/index.ts",
            "someArraySetting": null,
        })
    );
}

#[tokio::test]
async fn after_install_only_reacts_to_the_host_project() {
    let mut h = harness(
        ScriptedPrompt::new(),
        MemoryConfigStore::new().with_entry(PLUGIN_NAME, configured()),
    );
    assert_eq!(h.host.init_all().await, 1);

    let module_project = AfterInstallEvent {
        project: Some(ProjectFile {
            is_host: false,
            ..host_project()
        }),
    };
    let report = assert_ok!(h.host.emit(module_project.into()).await);
    assert_eq!(report.handlers, 0);
    assert!(h.logger.entries().is_empty());

    let event = AfterInstallEvent {
        project: Some(host_project()),
    };
    assert_ok!(h.host.emit(event.into()).await);
    assert_eq!(h.logger.messages(LogLevel::Log), ["foo.json --> app"]);
}

#[tokio::test]
async fn build_manifest_is_adjusted_for_the_entry_module() {
    let mut h = harness(ScriptedPrompt::new(), MemoryConfigStore::new());
    h.host.init_all().await;

    let manifest = Document::new(json!({ "projects": {} }));
    let other = BuildManifestEvent {
        module: Some(ModuleRef::new("lib")),
        manifest: manifest.clone(),
    };
    assert_ok!(h.host.emit(other.into()).await);
    assert_eq!(manifest.snapshot(), json!({ "projects": {} }));

    let entry = BuildManifestEvent {
        module: Some(ModuleRef::entry("app")),
        manifest: manifest.clone(),
    };
    assert_ok!(h.host.emit(entry.into()).await);
    assert_eq!(manifest.snapshot(), json!({ "projects": {}, "something": "" }));
    assert_eq!(h.logger.messages(LogLevel::Log), ["entry module: app"]);
}

#[tokio::test]
async fn ignore_file_handler_writes_asynchronously() {
    let mut h = harness(ScriptedPrompt::new(), MemoryConfigStore::new());
    h.host.init_all().await;

    let event = IgnoreFileEvent {
        module: Some(ModuleRef::entry("app")),
        ignore_file: Some(".gitignore".into()),
    };
    let report = assert_ok!(h.host.emit(event.into()).await);

    assert_eq!(report.handlers, 1);
    assert_eq!(h.fs.read("myPath").as_deref(), Some("myContent"));
    assert_eq!(h.logger.messages(LogLevel::Log), ["entry module: app"]);
}

#[tokio::test]
async fn example_command_reports_through_the_logger() {
    let mut h = harness(ScriptedPrompt::new(), MemoryConfigStore::new());
    h.host.init_all().await;

    assert!(assert_ok!(h.host.run_command_line("example first second").await));
    assert_eq!(
        h.logger.messages(LogLevel::Error),
        ["This command has yet to be implemented ¯\\_(ツ)_/¯", "first"]
    );
    assert!(!assert_ok!(h.host.run_command("unknown", &[]).await));
}

#[tokio::test]
async fn unknown_plugins_are_reported() {
    let h = harness(ScriptedPrompt::new(), MemoryConfigStore::new());
    assert_err!(h.host.install("NotThere").await);
}
