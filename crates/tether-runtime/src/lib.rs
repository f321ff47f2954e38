//! # Tether Runtime
//!
//! The host side of the Tether contract:
//!
//! - [`PluginHost`]: registration, install, init and sequential dispatch of
//!   events and commands to plugins
//! - [`ConfigStore`]: where plugin configurations are persisted
//! - [`services`]: logger, file system and prompt implementations
//! - [`config`]: figment-based host configuration (`tether.toml`, `TETHER_*`)
//! - [`logging`]: tracing subscriber setup
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tether_runtime::{PluginHost, MemoryConfigStore, config::load_config, logging, services};
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//!
//! let services = services::standard(&config.host);
//! let mut host = PluginHost::from_settings(&config.host, services, Arc::new(MemoryConfigStore::new()));
//! host.register(TemplatePlugin)?;
//! host.install_all().await?;
//! host.init_all().await;
//! host.emit(AfterInstallEvent::default().into()).await?;
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod services;
pub mod store;

pub use config::{ConfigLoader, FailurePolicy, HostSettings, TetherConfig, load_config};
pub use error::{HostError, HostResult};
pub use host::{EmitReport, PluginHost, PluginLoadState};
pub use store::{ConfigStore, MemoryConfigStore, StoreError};
