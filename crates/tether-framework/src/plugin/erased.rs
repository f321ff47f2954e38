use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use tether_core::{HostEvent, HostServices, PluginSettings, SettingsResult, StoredConfig};

use super::{InstallContext, Plugin, PluginRoutes, Registrar};
use crate::context::{HandlerContext, PluginContext};
use crate::error::{CommandError, DispatchError};

// ─── ErasedPlugin ─────────────────────────────────────────────────────────────

/// Object-safe view of a [`Plugin`], implemented for every plugin.
///
/// The method names differ from [`Plugin`]'s so both traits can be in scope.
#[async_trait]
pub trait ErasedPlugin: Send + Sync {
    /// The plugin's name.
    fn plugin_name(&self) -> &str;

    /// Runs install against the persisted envelope.
    ///
    /// An absent envelope, or one that no longer decodes, installs from an
    /// empty configuration.
    async fn install_stored(
        &self,
        existing: Option<StoredConfig>,
        services: &HostServices,
    ) -> SettingsResult<StoredConfig>;

    /// Decodes the persisted envelope and runs init.
    ///
    /// Fails when the envelope does not decode; installing again repairs it.
    fn load(
        &self,
        stored: Option<StoredConfig>,
        services: HostServices,
    ) -> SettingsResult<LoadedPlugin>;
}

fn warn_on_version<T: PluginSettings>(plugin: &str, stored: &StoredConfig) {
    if !stored.is_current::<T>() {
        warn!(
            plugin,
            stored = stored.version,
            current = T::SCHEMA_VERSION,
            "Configuration was written with another schema version"
        );
    }
}

#[async_trait]
impl<P: Plugin> ErasedPlugin for P {
    fn plugin_name(&self) -> &str {
        Plugin::name(self)
    }

    async fn install_stored(
        &self,
        existing: Option<StoredConfig>,
        services: &HostServices,
    ) -> SettingsResult<StoredConfig> {
        let name = Plugin::name(self);
        let existing = match existing {
            Some(stored) => {
                warn_on_version::<P::Config>(name, &stored);
                stored.to_settings::<P::Config>(name).unwrap_or_else(|e| {
                    warn!(plugin = name, error = %e, "Discarding unreadable configuration");
                    P::Config::default()
                })
            }
            None => P::Config::default(),
        };

        let ctx = InstallContext::new(name, services.clone());
        let config = Plugin::install(self, &existing, &ctx).await;
        debug!(
            plugin = name,
            prompts = ctx.resolver().prompts_issued(),
            "Install finished"
        );
        StoredConfig::from_settings(name, &config)
    }

    fn load(
        &self,
        stored: Option<StoredConfig>,
        services: HostServices,
    ) -> SettingsResult<LoadedPlugin> {
        let name = Plugin::name(self);
        let config = match stored {
            Some(stored) => {
                warn_on_version::<P::Config>(name, &stored);
                stored.to_settings::<P::Config>(name)?
            }
            None => P::Config::default(),
        };

        let mut registrar = Registrar::new(name);
        Plugin::init(self, &mut registrar);

        Ok(LoadedPlugin {
            context: PluginContext::new(name, Arc::new(config), services),
            routes: registrar.into_routes(),
        })
    }
}

// ─── LoadedPlugin ─────────────────────────────────────────────────────────────

/// An initialised plugin: its identity, active configuration and routes.
#[derive(Clone)]
pub struct LoadedPlugin {
    context: PluginContext,
    routes: PluginRoutes,
}

impl LoadedPlugin {
    /// The plugin's name.
    pub fn name(&self) -> &str {
        self.context.name()
    }

    /// The plugin's registrations.
    pub fn routes(&self) -> &PluginRoutes {
        &self.routes
    }

    /// The active configuration, if it is of type `T`.
    pub fn settings<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.context.settings()
    }

    /// The advertised command names.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.routes.commands().names()
    }

    /// Dispatches `event` to this plugin's handlers.
    pub async fn dispatch_event(&self, event: HostEvent) -> Result<usize, DispatchError> {
        let ctx = HandlerContext::for_event(event, self.context.clone());
        self.routes.events().dispatch(Arc::new(ctx)).await
    }

    /// Dispatches a command to this plugin's handler for `name`.
    pub async fn dispatch_command(
        &self,
        name: &str,
        args: &[String],
    ) -> Result<bool, CommandError> {
        let ctx = HandlerContext::for_command(name, args.to_vec(), self.context.clone());
        self.routes.commands().dispatch(Arc::new(ctx)).await
    }
}

impl fmt::Debug for LoadedPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedPlugin")
            .field("name", &self.name())
            .field("routes", &self.routes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use tether_core::{AfterInstallEvent, CheckboxPrompt, EventKind, InputPrompt, ProjectFile};
    use tower::ServiceBuilder;

    use super::*;
    use crate::command::Args;
    use crate::extractor::{Logger, Settings};
    use crate::handler::ServiceBuilderExt;
    use crate::test_support::{QueuedPrompt, services_with};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    struct DemoConfig {
        some_setting: Option<String>,
        some_array_setting: Option<BTreeSet<String>>,
    }

    impl PluginSettings for DemoConfig {}

    struct Demo;

    fn after_install(cfg: Settings<DemoConfig>, logger: Logger) {
        logger.log(cfg.some_setting.as_deref().unwrap_or("<unset>"));
    }

    fn echo(args: Args, logger: Logger) -> bool {
        logger.log(&args.join(", "));
        true
    }

    #[async_trait]
    impl Plugin for Demo {
        type Config = DemoConfig;

        fn name(&self) -> &str {
            "Demo"
        }

        async fn install(&self, existing: &DemoConfig, ctx: &InstallContext) -> DemoConfig {
            let resolver = ctx.resolver();
            DemoConfig {
                some_setting: resolver
                    .input(
                        existing.some_setting.as_ref(),
                        &InputPrompt::new("setting").validator(|v| v.ends_with(".json")),
                    )
                    .await,
                some_array_setting: resolver
                    .checkbox(
                        existing.some_array_setting.as_ref(),
                        &CheckboxPrompt::with_choices("options", ["Option1", "Option2"]),
                    )
                    .await,
            }
        }

        fn init(&self, registrar: &mut Registrar) {
            registrar
                .on(
                    EventKind::AfterInstall,
                    ServiceBuilder::new().handler_sync(after_install),
                )
                .command_sync("echo", echo);
        }
    }

    #[tokio::test]
    async fn test_install_is_idempotent() {
        let prompt = Arc::new(
            QueuedPrompt::default()
                .answer("foo.json")
                .answer_set(&["Option1"]),
        );
        let (services, _) = services_with(prompt.clone());

        let first = Demo.install_stored(None, &services).await.unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(
            first.settings,
            json!({ "someSetting": "foo.json", "someArraySetting": ["Option1"] })
        );
        assert_eq!(prompt.calls.lock().len(), 2);

        let second = Demo.install_stored(Some(first.clone()), &services).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(prompt.calls.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_config_installs_from_scratch() {
        let prompt = Arc::new(QueuedPrompt::default().answer("new.json"));
        let (services, _) = services_with(prompt);
        let broken = StoredConfig {
            version: 1,
            settings: json!({ "someSetting": 42 }),
        };

        let stored = Demo.install_stored(Some(broken), &services).await.unwrap();
        assert_eq!(stored.settings["someSetting"], "new.json");
    }

    #[tokio::test]
    async fn test_loaded_plugin_sees_its_settings() {
        let (services, logger) = services_with(Arc::new(QueuedPrompt::default()));
        let stored = StoredConfig {
            version: 1,
            settings: json!({ "someSetting": "foo.json" }),
        };
        let loaded = Demo.load(Some(stored), services).unwrap();

        assert_eq!(loaded.name(), "Demo");
        assert_eq!(loaded.commands().collect::<Vec<_>>(), ["echo"]);
        assert_eq!(
            loaded.settings::<DemoConfig>().unwrap().some_setting.as_deref(),
            Some("foo.json")
        );

        let event = AfterInstallEvent {
            project: Some(ProjectFile::default()),
        };
        assert_eq!(loaded.dispatch_event(event.into()).await.unwrap(), 1);
        assert!(
            loaded
                .dispatch_command("echo", &["a".into(), "b".into()])
                .await
                .unwrap()
        );
        assert!(!loaded.dispatch_command("nope", &[]).await.unwrap());
        assert_eq!(*logger.lines.lock(), ["log: foo.json", "log: a, b"]);
    }

    #[test]
    fn test_load_rejects_unreadable_config() {
        let (services, _) = services_with(Arc::new(QueuedPrompt::default()));
        let broken = StoredConfig {
            version: 1,
            settings: json!({ "someArraySetting": "not a list" }),
        };
        assert!(Demo.load(Some(broken), services).is_err());
    }
}
