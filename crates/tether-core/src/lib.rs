//! # Tether Core
//!
//! The contract shared by a build-orchestration host and its plugins.
//!
//! This crate holds the leaf types everything else is built on:
//!
//! - **Event taxonomy**: [`EventKind`] and the tagged [`HostEvent`] union with
//!   one payload type per kind, plus the shared mutable [`Document`] handle.
//! - **Settings**: the [`SettingValue`] emptiness rule, the typed
//!   [`PluginSettings`] schema trait and the versioned [`StoredConfig`]
//!   envelope the host persists.
//! - **Prompt definitions**: [`InputPrompt`], [`FuzzyPathPrompt`] and
//!   [`CheckboxPrompt`].
//! - **Host services**: the capabilities a plugin consumes
//!   ([`PromptService`], [`LoggerService`], [`FileSystemService`]) bundled as
//!   [`HostServices`].
//!
//! ## Flow
//!
//! ```text
//! ┌────────┐ install(existing) ┌────────┐      ┌────────────────┐
//! │  Host  │──────────────────▶│ Plugin │─────▶│ PromptService  │
//! │        │◀──────────────────│        │      └────────────────┘
//! │        │   StoredConfig    │        │
//! │        │ init()            │        │
//! │        │──────────────────▶│        │ registers handlers
//! │        │ HostEvent / argv  │        │
//! │        │──────────────────▶│        │─────▶ Logger / FileSystem
//! └────────┘                   └────────┘
//! ```

pub mod error;
pub mod event;
pub mod prompt;
pub mod services;
pub mod settings;

pub use error::{EventError, ServiceError, ServiceResult, SettingsError, SettingsResult};
pub use event::{
    AfterInstallEvent, BuildManifestEvent, CustomEvent, Document, EventKind, FromHostEvent,
    HostEvent, IgnoreFileEvent, ModuleRef, ProjectFile,
};
pub use prompt::{
    CheckboxPrompt, ChoicesFn, EnabledFn, FuzzyPathPrompt, InputPrompt, PathItemType, Validator,
};
pub use services::{FileSystemService, HostServices, LoggerService, PromptService};
pub use settings::{PluginSettings, SettingValue, StoredConfig, is_set, non_empty};
