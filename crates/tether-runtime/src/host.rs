//! Plugin lifecycle and dispatch on the host side.
//!
//! [`PluginHost`] owns every registered plugin and drives it through the
//! contract:
//!
//! ```text
//! register() ──► Registered
//!   init_all() ──► Active   (stored config decoded, init ran)
//!              ──► Failed   (config unreadable or store error; skipped)
//! ```
//!
//! `install` may run for any registered plugin at any time; its result is
//! persisted and takes effect on the next `init_all`.
//!
//! Events and commands reach active plugins one at a time, in registration
//! order, and each plugin's handlers run to completion before the next
//! plugin is called.

use std::fmt;
use std::sync::Arc;

use tether_core::{EventKind, HostEvent, HostServices, StoredConfig};
use tether_framework::{DispatchError, ErasedPlugin, LoadedPlugin, Plugin, parse_command_line};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::{FailurePolicy, HostSettings};
use crate::error::{HostError, HostResult};
use crate::store::ConfigStore;

/// Tracks the activation state of a plugin registered with [`PluginHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginLoadState {
    /// Registered, `init` has not run.
    Registered,
    /// Initialised; receives events and commands.
    Active,
    /// Could not be initialised; ignored by dispatch.
    Failed,
}

struct PluginEntry {
    plugin: Arc<dyn ErasedPlugin>,
    state: PluginLoadState,
    loaded: Option<LoadedPlugin>,
}

impl PluginEntry {
    fn name(&self) -> &str {
        self.plugin.plugin_name()
    }

    fn active(&self) -> Option<&LoadedPlugin> {
        match self.state {
            PluginLoadState::Active => self.loaded.as_ref(),
            _ => None,
        }
    }
}

/// Outcome of delivering one event to every active plugin.
#[derive(Debug)]
pub struct EmitReport {
    /// The kind delivered.
    pub kind: EventKind,
    /// Active plugins the event was delivered to.
    pub plugins: usize,
    /// Handlers that ran to completion.
    pub handlers: usize,
    /// Handler failures tolerated under [`FailurePolicy::Continue`].
    pub failures: Vec<DispatchError>,
}

impl EmitReport {
    /// Returns `true` if no handler failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns plugins and drives install, init, events and commands.
pub struct PluginHost {
    services: HostServices,
    store: Arc<dyn ConfigStore>,
    policy: FailurePolicy,
    plugins: Vec<PluginEntry>,
}

impl PluginHost {
    /// Creates a host with the default [`FailurePolicy`].
    pub fn new(services: HostServices, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            services,
            store,
            policy: FailurePolicy::default(),
            plugins: Vec::new(),
        }
    }

    /// Creates a host configured by `settings`.
    pub fn from_settings(
        settings: &HostSettings,
        services: HostServices,
        store: Arc<dyn ConfigStore>,
    ) -> Self {
        Self::new(services, store).with_failure_policy(settings.failure_policy)
    }

    /// Sets how handler failures during [`emit`](Self::emit) are treated.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The services handed to plugins.
    pub fn services(&self) -> &HostServices {
        &self.services
    }

    // ─── Registration ─────────────────────────────────────────────────────────

    /// Registers a plugin. Names must be unique.
    pub fn register<P: Plugin>(&mut self, plugin: P) -> HostResult<()> {
        self.register_erased(Arc::new(plugin))
    }

    /// Registers an already type-erased plugin.
    pub fn register_erased(&mut self, plugin: Arc<dyn ErasedPlugin>) -> HostResult<()> {
        let name = plugin.plugin_name().to_string();
        if self.entry(&name).is_some() {
            return Err(HostError::DuplicatePlugin(name));
        }
        info!(plugin = %name, "Plugin registered");
        self.plugins.push(PluginEntry {
            plugin,
            state: PluginLoadState::Registered,
            loaded: None,
        });
        Ok(())
    }

    /// Registered plugin names, in registration order.
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(PluginEntry::name)
    }

    /// The state of `name`, if registered.
    pub fn plugin_state(&self, name: &str) -> Option<PluginLoadState> {
        self.entry(name).map(|e| e.state)
    }

    /// The initialised form of `name`.
    pub fn loaded(&self, name: &str) -> HostResult<&LoadedPlugin> {
        let entry = self
            .entry(name)
            .ok_or_else(|| HostError::UnknownPlugin(name.to_string()))?;
        entry
            .active()
            .ok_or_else(|| HostError::PluginNotActive(name.to_string()))
    }

    fn entry(&self, name: &str) -> Option<&PluginEntry> {
        self.plugins.iter().find(|e| e.name() == name)
    }

    // ─── Install / init ───────────────────────────────────────────────────────

    /// Runs the install flow of `name` and persists the result.
    pub async fn install(&self, name: &str) -> HostResult<StoredConfig> {
        let entry = self
            .entry(name)
            .ok_or_else(|| HostError::UnknownPlugin(name.to_string()))?;

        let span = info_span!("install", plugin = name);
        async {
            let existing = self.store.load(name).await?;
            let stored = entry
                .plugin
                .install_stored(existing, &self.services)
                .await?;
            self.store.save(name, &stored).await?;
            info!(version = stored.version, "Plugin configuration saved");
            Ok::<_, HostError>(stored)
        }
        .instrument(span)
        .await
    }

    /// Installs every registered plugin in registration order.
    ///
    /// Stops at the first failure.
    pub async fn install_all(&self) -> HostResult<()> {
        for name in self.plugin_names() {
            self.install(name).await?;
        }
        Ok(())
    }

    /// Initialises every plugin that is not active yet.
    ///
    /// A plugin whose configuration cannot be read is marked
    /// [`PluginLoadState::Failed`] and the others still start. Returns the
    /// number of active plugins.
    pub async fn init_all(&mut self) -> usize {
        for entry in &mut self.plugins {
            if entry.state == PluginLoadState::Active {
                continue;
            }
            let name = entry.plugin.plugin_name().to_string();

            let loaded = match self.store.load(&name).await {
                Ok(stored) => entry
                    .plugin
                    .load(stored, self.services.clone())
                    .map_err(HostError::from),
                Err(e) => Err(HostError::from(e)),
            };

            match loaded {
                Ok(loaded) => {
                    debug!(
                        plugin = %name,
                        event_kinds = loaded.routes().events().kinds().count(),
                        commands = loaded.routes().commands().names().count(),
                        "Plugin initialised"
                    );
                    entry.loaded = Some(loaded);
                    entry.state = PluginLoadState::Active;
                }
                Err(e) => {
                    error!(plugin = %name, error = %e, "Plugin failed to initialise");
                    entry.loaded = None;
                    entry.state = PluginLoadState::Failed;
                }
            }
        }

        let active = self.active().count();
        info!(active, total = self.plugins.len(), "Plugins initialised");
        active
    }

    fn active(&self) -> impl Iterator<Item = &LoadedPlugin> {
        self.plugins.iter().filter_map(PluginEntry::active)
    }

    // ─── Events ───────────────────────────────────────────────────────────────

    /// Delivers `event` to every active plugin in registration order.
    ///
    /// Each plugin gets its own clone of the event; clones share any
    /// [`Document`](tether_core::Document), so manifest edits are visible to
    /// the caller and to later plugins.
    pub async fn emit(&self, event: HostEvent) -> HostResult<EmitReport> {
        let mut report = EmitReport {
            kind: event.kind(),
            plugins: 0,
            handlers: 0,
            failures: Vec::new(),
        };

        for plugin in self.active() {
            report.plugins += 1;
            match plugin.dispatch_event(event.clone()).await {
                Ok(ran) => report.handlers += ran,
                Err(e) => {
                    error!(
                        plugin = plugin.name(),
                        event_kind = %report.kind,
                        handler = e.index,
                        error = %e,
                        "Event handler failed"
                    );
                    match self.policy {
                        FailurePolicy::Abort => return Err(e.into()),
                        FailurePolicy::Continue => report.failures.push(e),
                    }
                }
            }
        }

        debug!(
            event_kind = %report.kind,
            plugins = report.plugins,
            handlers = report.handlers,
            "Event delivered"
        );
        Ok(report)
    }

    // ─── Commands ─────────────────────────────────────────────────────────────

    /// Every advertised command as `(plugin, command)`.
    pub fn commands(&self) -> Vec<(&str, &str)> {
        self.active()
            .flat_map(|p| p.commands().map(move |c| (p.name(), c)))
            .collect()
    }

    /// Runs command `name` on the first active plugin that handles it.
    ///
    /// Returns `false` when no plugin did.
    pub async fn run_command(&self, name: &str, args: &[String]) -> HostResult<bool> {
        for plugin in self.active() {
            let handled = plugin.dispatch_command(name, args).await.inspect_err(|e| {
                error!(
                    plugin = plugin.name(),
                    command = name,
                    error = %e,
                    "Command handler failed"
                );
            })?;
            if handled {
                debug!(plugin = plugin.name(), command = name, "Command handled");
                return Ok(true);
            }
        }
        warn!(command = name, "Unknown command");
        Ok(false)
    }

    /// Splits `line` into a command name and arguments and runs it.
    pub async fn run_command_line(&self, line: &str) -> HostResult<bool> {
        match parse_command_line(line) {
            Some((name, args)) => self.run_command(&name, &args).await,
            None => Ok(false),
        }
    }
}

impl fmt::Debug for PluginHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states: Vec<_> = self.plugins.iter().map(|e| (e.name(), e.state)).collect();
        f.debug_struct("PluginHost")
            .field("policy", &self.policy)
            .field("plugins", &states)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use tether_core::{
        AfterInstallEvent, BuildManifestEvent, Document, IgnoreFileEvent, InputPrompt,
        PluginSettings,
    };
    use tether_framework::{
        Args, Event, InstallContext, Logger, PluginName, Registrar, ServiceBuilderExt, Settings,
    };
    use tower::ServiceBuilder;
    use tracing::Level;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    use super::*;
    use crate::services::{LogLevel, MemoryFileSystem, MemoryLogger, ScriptedPrompt};
    use crate::store::MemoryConfigStore;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct EchoConfig {
        greeting: Option<String>,
    }

    impl PluginSettings for EchoConfig {}

    struct Echo {
        name: &'static str,
        claims_greet: bool,
        fails_on_ignore_file: bool,
    }

    impl Echo {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                claims_greet: true,
                fails_on_ignore_file: false,
            }
        }
    }

    #[async_trait]
    impl Plugin for Echo {
        type Config = EchoConfig;

        fn name(&self) -> &str {
            self.name
        }

        async fn install(&self, existing: &EchoConfig, ctx: &InstallContext) -> EchoConfig {
            EchoConfig {
                greeting: ctx
                    .resolver()
                    .input(
                        existing.greeting.as_ref(),
                        &InputPrompt::new("greeting").default_value("hello"),
                    )
                    .await,
            }
        }

        fn init(&self, registrar: &mut Registrar) {
            let claims = self.claims_greet;
            registrar
                .on(
                    EventKind::AfterInstall,
                    ServiceBuilder::new().handler_sync(
                        |cfg: Settings<EchoConfig>, name: PluginName, logger: Logger| {
                            let greeting = cfg.greeting.as_deref().unwrap_or("<unset>");
                            logger.log(&format!("{}: {greeting}", name.0));
                        },
                    ),
                )
                .on(
                    EventKind::BeforeAdjustBuildManifest,
                    ServiceBuilder::new().handler_sync(
                        |Event(event): Event<BuildManifestEvent>, name: PluginName| {
                            event.manifest.edit(|doc| {
                                if let Some(visited) = doc["visited"].as_array_mut() {
                                    visited.push(json!(name.0));
                                }
                            });
                        },
                    ),
                )
                .command_sync("greet", move |args: Args, name: PluginName, logger: Logger| {
                    if claims {
                        logger.log(&format!("{} greets {}", name.0, args.join(" ")));
                    }
                    claims
                });

            if self.fails_on_ignore_file {
                registrar
                    .on(
                        EventKind::AfterAdjustIgnoreFile,
                        ServiceBuilder::new().handler_sync(|| -> Result<(), io::Error> {
                            Err(io::Error::other("boom"))
                        }),
                    )
                    .command_sync("explode", || -> Result<bool, io::Error> {
                        Err(io::Error::other("boom"))
                    });
            } else {
                registrar.on(
                    EventKind::AfterAdjustIgnoreFile,
                    ServiceBuilder::new().handler_sync(|name: PluginName, logger: Logger| {
                        logger.log(&format!("{} saw ignore file", name.0));
                    }),
                );
            }
        }
    }

    struct Fixture {
        logger: Arc<MemoryLogger>,
        prompt: Arc<ScriptedPrompt>,
        store: Arc<MemoryConfigStore>,
    }

    impl Fixture {
        fn new(prompt: ScriptedPrompt, store: MemoryConfigStore) -> Self {
            Self {
                logger: Arc::new(MemoryLogger::new()),
                prompt: Arc::new(prompt),
                store: Arc::new(store),
            }
        }

        fn host(&self) -> PluginHost {
            let services = HostServices::new(
                self.prompt.clone(),
                self.logger.clone(),
                Arc::new(MemoryFileSystem::new()),
            );
            PluginHost::new(services, self.store.clone())
        }

        fn logs(&self) -> Vec<String> {
            self.logger.messages(LogLevel::Log)
        }
    }

    /// Counts error-level events.
    #[derive(Clone, Default)]
    struct ErrorEvents(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for ErrorEvents {
        fn on_event(&self, event: &tracing::Event<'_>, _: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn stored(greeting: &str) -> StoredConfig {
        StoredConfig {
            version: 1,
            settings: json!({ "greeting": greeting }),
        }
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let fx = Fixture::new(ScriptedPrompt::new(), MemoryConfigStore::new());
        let mut host = fx.host();
        host.register(Echo::new("a")).unwrap();

        assert!(matches!(
            host.register(Echo::new("a")),
            Err(HostError::DuplicatePlugin(name)) if name == "a"
        ));
        assert_eq!(host.plugin_names().collect::<Vec<_>>(), ["a"]);
        assert_eq!(host.plugin_state("a"), Some(PluginLoadState::Registered));
    }

    #[tokio::test]
    async fn test_install_persists_and_is_idempotent() {
        let fx = Fixture::new(ScriptedPrompt::new().text("hi"), MemoryConfigStore::new());
        let mut host = fx.host();
        host.register(Echo::new("a")).unwrap();

        let first = host.install("a").await.unwrap();
        assert_eq!(first, stored("hi"));
        assert_eq!(fx.store.get("a"), Some(stored("hi")));

        let second = host.install("a").await.unwrap();
        assert_eq!(second, first);
        assert_eq!(fx.prompt.asked(), ["greeting"]);

        assert!(matches!(
            host.install("missing").await,
            Err(HostError::UnknownPlugin(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_answer_installs_default() {
        let fx = Fixture::new(ScriptedPrompt::new().text(""), MemoryConfigStore::new());
        let mut host = fx.host();
        host.register(Echo::new("a")).unwrap();

        assert_eq!(host.install("a").await.unwrap(), stored("hello"));
    }

    #[tokio::test]
    async fn test_broken_config_fails_only_that_plugin() {
        let store = MemoryConfigStore::new()
            .with_entry("a", stored("hey"))
            .with_entry(
                "b",
                StoredConfig {
                    version: 1,
                    settings: json!({ "greeting": ["not", "text"] }),
                },
            );
        let fx = Fixture::new(ScriptedPrompt::new(), store);
        let mut host = fx.host();
        host.register(Echo::new("a")).unwrap();
        host.register(Echo::new("b")).unwrap();

        assert_eq!(host.init_all().await, 1);
        assert_eq!(host.plugin_state("a"), Some(PluginLoadState::Active));
        assert_eq!(host.plugin_state("b"), Some(PluginLoadState::Failed));
        assert!(matches!(host.loaded("b"), Err(HostError::PluginNotActive(_))));

        let report = host.emit(AfterInstallEvent::default().into()).await.unwrap();
        assert_eq!(report.plugins, 1);
        assert_eq!(fx.logs(), ["a: hey"]);
    }

    #[tokio::test]
    async fn test_emit_visits_plugins_in_registration_order() {
        let fx = Fixture::new(ScriptedPrompt::new(), MemoryConfigStore::new());
        let mut host = fx.host();
        for name in ["first", "second", "third"] {
            host.register(Echo::new(name)).unwrap();
        }
        host.init_all().await;

        let manifest = Document::new(json!({ "visited": [] }));
        let event = BuildManifestEvent {
            manifest: manifest.clone(),
            ..Default::default()
        };
        let report = host.emit(event.into()).await.unwrap();

        assert_eq!(report.kind, EventKind::BeforeAdjustBuildManifest);
        assert_eq!((report.plugins, report.handlers), (3, 3));
        assert!(report.is_clean());
        assert_eq!(
            manifest.snapshot(),
            json!({ "visited": ["first", "second", "third"] })
        );
    }

    #[tokio::test]
    async fn test_abort_policy_stops_at_first_failure() {
        let fx = Fixture::new(ScriptedPrompt::new(), MemoryConfigStore::new());
        let mut host = fx.host();
        host.register(Echo {
            fails_on_ignore_file: true,
            ..Echo::new("broken")
        })
        .unwrap();
        host.register(Echo::new("after")).unwrap();
        host.init_all().await;

        let err = host.emit(IgnoreFileEvent::default().into()).await.unwrap_err();
        match err {
            HostError::Dispatch(e) => {
                assert_eq!(e.plugin, "broken");
                assert_eq!(e.kind, EventKind::AfterAdjustIgnoreFile);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(fx.logs().is_empty());
    }

    #[tokio::test]
    async fn test_continue_policy_reports_failures() {
        let fx = Fixture::new(ScriptedPrompt::new(), MemoryConfigStore::new());
        let mut host = fx.host().with_failure_policy(FailurePolicy::Continue);
        host.register(Echo {
            fails_on_ignore_file: true,
            ..Echo::new("broken")
        })
        .unwrap();
        host.register(Echo::new("after")).unwrap();
        host.init_all().await;

        let report = host.emit(IgnoreFileEvent::default().into()).await.unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.handlers, 1);
        assert_eq!(fx.logs(), ["after saw ignore file"]);
    }

    #[tokio::test]
    async fn test_first_plugin_claiming_a_command_wins() {
        let fx = Fixture::new(ScriptedPrompt::new(), MemoryConfigStore::new());
        let mut host = fx.host();
        host.register(Echo {
            claims_greet: false,
            ..Echo::new("shy")
        })
        .unwrap();
        host.register(Echo::new("loud")).unwrap();
        host.register(Echo::new("late")).unwrap();
        host.init_all().await;

        assert!(host.run_command_line(r#"greet "the world""#).await.unwrap());
        assert_eq!(fx.logs(), ["loud greets the world"]);

        assert!(!host.run_command("unknown", &[]).await.unwrap());
        assert!(!host.run_command_line("   ").await.unwrap());
        assert_eq!(host.commands().len(), 3);
    }

    #[test]
    fn test_handler_failures_are_logged_once() {
        let errors = ErrorEvents::default();
        let subscriber = tracing_subscriber::registry().with(errors.clone());

        tracing::subscriber::with_default(subscriber, || {
            tokio_test::block_on(async {
                let fx = Fixture::new(ScriptedPrompt::new(), MemoryConfigStore::new());
                let mut host = fx.host();
                host.register(Echo {
                    fails_on_ignore_file: true,
                    ..Echo::new("broken")
                })
                .unwrap();
                host.init_all().await;

                assert!(host.emit(IgnoreFileEvent::default().into()).await.is_err());
                assert!(matches!(
                    host.run_command("explode", &[]).await,
                    Err(HostError::Command(e)) if e.plugin == "broken"
                ));
            })
        });

        assert_eq!(errors.0.load(Ordering::SeqCst), 2);
    }
}
