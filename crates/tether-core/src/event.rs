//! Host event taxonomy.
//!
//! The host emits [`HostEvent`]s during its run. Every event is a tagged value:
//! the discriminant is its [`EventKind`], the payload is a type unique to that
//! kind. Routing keys off the tag, never off runtime field probing.
//!
//! - [`EventKind`] - The routing key, including [`EventKind::Custom`] for kinds
//!   the core does not know about at compile time
//! - [`HostEvent`] - The tagged union handed to the event router
//! - [`FromHostEvent`] - Typed payload extraction used by handler extractors
//! - [`Document`] - The explicitly mutable part of a payload
//!
//! # Example
//!
//! ```rust,ignore
//! use tether_core::{BuildManifestEvent, Document, HostEvent, ModuleRef};
//!
//! let manifest = Document::new(serde_json::json!({ "projects": {} }));
//! let event = HostEvent::BeforeAdjustBuildManifest(BuildManifestEvent {
//!     module: Some(ModuleRef::entry("app")),
//!     manifest: manifest.clone(),
//! });
//!
//! // ... dispatch `event` to every plugin ...
//!
//! let adjusted = manifest.snapshot();
//! ```

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::EventError;

// ============================================================================
// EventKind
// ============================================================================

/// The discriminant identifying which lifecycle moment an event represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Emitted once the host finished installing the project.
    AfterInstall,
    /// Emitted before the host persists the generated build manifest.
    BeforeAdjustBuildManifest,
    /// Emitted after the host rewrote the project's ignore file.
    AfterAdjustIgnoreFile,
    /// Any kind this version of the core does not know about.
    Custom(Cow<'static, str>),
}

impl EventKind {
    /// Creates a kind from its wire name.
    ///
    /// Names of the built-in kinds map to their own variant, so
    /// `EventKind::custom("AFTER_INSTALL")` is [`EventKind::AfterInstall`].
    pub fn custom(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        Self::builtin(&name).unwrap_or(Self::Custom(name))
    }

    fn builtin(name: &str) -> Option<Self> {
        match name {
            "AFTER_INSTALL" => Some(Self::AfterInstall),
            "BEFORE_ADJUST_BUILD_MANIFEST" => Some(Self::BeforeAdjustBuildManifest),
            "AFTER_ADJUST_IGNORE_FILE" => Some(Self::AfterAdjustIgnoreFile),
            _ => None,
        }
    }

    /// Returns the canonical wire name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::AfterInstall => "AFTER_INSTALL",
            Self::BeforeAdjustBuildManifest => "BEFORE_ADJUST_BUILD_MANIFEST",
            Self::AfterAdjustIgnoreFile => "AFTER_ADJUST_IGNORE_FILE",
            Self::Custom(name) => name,
        }
    }

    /// Returns `true` for kinds declared by this crate.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl FromStr for EventKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::custom(s.to_string()))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Payload building blocks
// ============================================================================

/// A module known to the host project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRef {
    /// The module's configured name.
    #[serde(default)]
    pub module_name: Option<String>,
    /// Whether this module is the project's entry module.
    #[serde(default)]
    pub is_entry: bool,
    /// Directory of the module, relative to the project root.
    #[serde(default)]
    pub base_path: Option<PathBuf>,
}

impl ModuleRef {
    /// Creates a non-entry module reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            module_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Creates an entry module reference.
    pub fn entry(name: impl Into<String>) -> Self {
        Self {
            module_name: Some(name.into()),
            is_entry: true,
            base_path: None,
        }
    }
}

/// The project descriptor the host is operating on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    /// `true` for the host project, `false` for a dependency module project.
    #[serde(default)]
    pub is_host: bool,
    /// Modules configured in this project.
    #[serde(default)]
    pub modules: Vec<ModuleRef>,
}

impl ProjectFile {
    /// Names of all modules that have one, in declaration order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules
            .iter()
            .filter_map(|m| m.module_name.as_deref())
            .filter(|n| !n.is_empty())
    }
}

// ============================================================================
// Document - the mutable sub-field of a payload
// ============================================================================

/// A shared, mutable JSON document carried inside an event payload.
///
/// Cloning a `Document` clones the handle, not the contents: the host keeps
/// one clone, handlers edit through theirs, and after dispatch the host reads
/// the result back with [`snapshot`](Self::snapshot).
#[derive(Clone, Default)]
pub struct Document(Arc<Mutex<Value>>);

impl Document {
    /// Wraps `value` in a new document.
    pub fn new(value: Value) -> Self {
        Self(Arc::new(Mutex::new(value)))
    }

    /// Runs `f` with shared access to the document.
    pub fn read<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&self.0.lock())
    }

    /// Runs `f` with exclusive access to the document.
    pub fn edit<R>(&self, f: impl FnOnce(&mut Value) -> R) -> R {
        f(&mut self.0.lock())
    }

    /// Returns a deep copy of the current contents.
    pub fn snapshot(&self) -> Value {
        self.0.lock().clone()
    }

    /// Reads the value at a JSON pointer (e.g. `/projects/host/projectType`).
    pub fn pointer(&self, pointer: &str) -> Option<Value> {
        self.0.lock().pointer(pointer).cloned()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Document").field(&*self.0.lock()).finish()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::new)
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Payload of [`EventKind::AfterInstall`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AfterInstallEvent {
    /// The project that was just installed.
    pub project: Option<ProjectFile>,
}

/// Payload of [`EventKind::BeforeAdjustBuildManifest`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildManifestEvent {
    /// The module whose manifest is being generated.
    pub module: Option<ModuleRef>,
    /// The generated manifest. Edits are persisted by the host after dispatch.
    pub manifest: Document,
}

/// Payload of [`EventKind::AfterAdjustIgnoreFile`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IgnoreFileEvent {
    /// The module whose ignore file was adjusted.
    pub module: Option<ModuleRef>,
    /// Path of the ignore file that was written.
    pub ignore_file: Option<PathBuf>,
}

/// Payload of an event kind unknown to this crate.
///
/// Build it with [`HostEvent::custom`], which turns built-in names into their
/// typed event instead.
#[derive(Debug, Clone)]
pub struct CustomEvent {
    /// The kind's wire name.
    pub kind: String,
    /// Free-form payload.
    pub payload: Value,
}

// ============================================================================
// HostEvent
// ============================================================================

/// An event instance emitted by the host.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// See [`EventKind::AfterInstall`].
    AfterInstall(AfterInstallEvent),
    /// See [`EventKind::BeforeAdjustBuildManifest`].
    BeforeAdjustBuildManifest(BuildManifestEvent),
    /// See [`EventKind::AfterAdjustIgnoreFile`].
    AfterAdjustIgnoreFile(IgnoreFileEvent),
    /// See [`EventKind::Custom`].
    Custom(CustomEvent),
}

impl HostEvent {
    /// Creates an event from its wire name and a JSON payload.
    ///
    /// For a built-in kind the payload is decoded into the typed event (a
    /// `null` payload reads as an empty object), so typed handlers receive
    /// it. Any other name becomes a [`CustomEvent`].
    pub fn custom(kind: impl Into<String>, payload: Value) -> Result<Self, EventError> {
        let kind = kind.into();
        let event = match EventKind::custom(kind.clone()) {
            EventKind::AfterInstall => decode(payload).map(Self::AfterInstall),
            EventKind::BeforeAdjustBuildManifest => {
                decode(payload).map(Self::BeforeAdjustBuildManifest)
            }
            EventKind::AfterAdjustIgnoreFile => decode(payload).map(Self::AfterAdjustIgnoreFile),
            EventKind::Custom(_) => return Ok(Self::Custom(CustomEvent { kind, payload })),
        };
        event.map_err(|e| EventError::payload(kind, e.to_string()))
    }

    /// Returns the routing key of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::AfterInstall(_) => EventKind::AfterInstall,
            Self::BeforeAdjustBuildManifest(_) => EventKind::BeforeAdjustBuildManifest,
            Self::AfterAdjustIgnoreFile(_) => EventKind::AfterAdjustIgnoreFile,
            Self::Custom(e) => EventKind::Custom(Cow::Owned(e.kind.clone())),
        }
    }

    /// The module the event refers to, for kinds that carry one.
    pub fn module(&self) -> Option<&ModuleRef> {
        match self {
            Self::BeforeAdjustBuildManifest(e) => e.module.as_ref(),
            Self::AfterAdjustIgnoreFile(e) => e.module.as_ref(),
            Self::AfterInstall(_) | Self::Custom(_) => None,
        }
    }

    /// The project file the event refers to, for kinds that carry one.
    pub fn project(&self) -> Option<&ProjectFile> {
        match self {
            Self::AfterInstall(e) => e.project.as_ref(),
            _ => None,
        }
    }
}

fn decode<T: DeserializeOwned>(payload: Value) -> serde_json::Result<T> {
    match payload {
        Value::Null => serde_json::from_value(Value::Object(Map::new())),
        payload => serde_json::from_value(payload),
    }
}

impl From<AfterInstallEvent> for HostEvent {
    fn from(e: AfterInstallEvent) -> Self {
        Self::AfterInstall(e)
    }
}

impl From<BuildManifestEvent> for HostEvent {
    fn from(e: BuildManifestEvent) -> Self {
        Self::BeforeAdjustBuildManifest(e)
    }
}

impl From<IgnoreFileEvent> for HostEvent {
    fn from(e: IgnoreFileEvent) -> Self {
        Self::AfterAdjustIgnoreFile(e)
    }
}

impl From<CustomEvent> for HostEvent {
    fn from(e: CustomEvent) -> Self {
        Self::Custom(e)
    }
}

// ============================================================================
// Typed extraction
// ============================================================================

/// Trait for extracting a typed payload from a [`HostEvent`].
///
/// Returns `None` when the event is of a different kind.
pub trait FromHostEvent: Sized + Clone + Send + Sync + 'static {
    /// Attempts to extract this payload type from `event`.
    fn from_host_event(event: &HostEvent) -> Option<Self>;
}

impl FromHostEvent for HostEvent {
    fn from_host_event(event: &HostEvent) -> Option<Self> {
        Some(event.clone())
    }
}

macro_rules! impl_from_host_event {
    ($($payload:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromHostEvent for $payload {
                fn from_host_event(event: &HostEvent) -> Option<Self> {
                    match event {
                        HostEvent::$variant(e) => Some(e.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_host_event! {
    AfterInstallEvent => AfterInstall,
    BuildManifestEvent => BeforeAdjustBuildManifest,
    IgnoreFileEvent => AfterAdjustIgnoreFile,
    CustomEvent => Custom,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_round_trips_through_wire_name() {
        for kind in [
            EventKind::AfterInstall,
            EventKind::BeforeAdjustBuildManifest,
            EventKind::AfterAdjustIgnoreFile,
        ] {
            assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_name_parses_to_custom() {
        let kind: EventKind = "FILES_COPIED".parse().unwrap();
        assert_eq!(kind, EventKind::custom("FILES_COPIED"));
        assert!(!kind.is_builtin());
    }

    #[test]
    fn test_custom_event_routes_by_its_own_name() {
        let event = HostEvent::custom("FILES_COPIED", Value::Null).unwrap();
        assert_eq!(event.kind(), EventKind::custom("FILES_COPIED"));
    }

    #[test]
    fn test_builtin_names_are_never_custom() {
        for kind in [
            EventKind::AfterInstall,
            EventKind::BeforeAdjustBuildManifest,
            EventKind::AfterAdjustIgnoreFile,
        ] {
            let by_name = EventKind::custom(kind.as_str().to_string());
            assert_eq!(by_name, kind);
            assert_eq!(by_name, kind.as_str().parse::<EventKind>().unwrap());
            assert!(by_name.is_builtin());
        }
    }

    #[test]
    fn test_builtin_name_decodes_typed_payload() {
        let event = HostEvent::custom(
            "AFTER_INSTALL",
            json!({ "project": { "isHost": true, "modules": [{ "moduleName": "app" }] } }),
        )
        .unwrap();
        assert_eq!(event.kind(), EventKind::AfterInstall);
        let payload = AfterInstallEvent::from_host_event(&event).unwrap();
        assert_eq!(payload.project.unwrap().module_names().collect::<Vec<_>>(), ["app"]);

        let event = HostEvent::custom(
            "BEFORE_ADJUST_BUILD_MANIFEST",
            json!({ "module": { "moduleName": "app", "isEntry": true }, "manifest": { "a": 1 } }),
        )
        .unwrap();
        let payload = BuildManifestEvent::from_host_event(&event).unwrap();
        assert!(payload.module.unwrap().is_entry);
        assert_eq!(payload.manifest.pointer("/a"), Some(json!(1)));

        let event = HostEvent::custom("AFTER_ADJUST_IGNORE_FILE", Value::Null).unwrap();
        assert!(IgnoreFileEvent::from_host_event(&event).is_some());
        assert!(CustomEvent::from_host_event(&event).is_none());
    }

    #[test]
    fn test_builtin_name_with_bad_payload_is_rejected() {
        let err = HostEvent::custom("AFTER_INSTALL", json!({ "project": 3 })).unwrap_err();
        assert!(matches!(err, EventError::Payload { kind, .. } if kind == "AFTER_INSTALL"));
    }

    #[test]
    fn test_document_edits_are_shared_between_clones() {
        let doc = Document::new(json!({
            "projects": { "host": { "projectType": "application" } }
        }));
        let handle = doc.clone();
        handle.edit(|v| v["something"] = json!(""));

        assert_eq!(doc.pointer("/something"), Some(json!("")));
        assert_eq!(
            doc.pointer("/projects/host/projectType"),
            Some(json!("application"))
        );
    }

    #[test]
    fn test_payload_extraction_matches_variant_only() {
        let event: HostEvent = AfterInstallEvent {
            project: Some(ProjectFile {
                is_host: true,
                modules: vec![ModuleRef::entry("app"), ModuleRef::default()],
            }),
        }
        .into();

        let payload = AfterInstallEvent::from_host_event(&event).unwrap();
        assert_eq!(payload.project.unwrap().module_names().collect::<Vec<_>>(), ["app"]);
        assert!(BuildManifestEvent::from_host_event(&event).is_none());
    }
}
