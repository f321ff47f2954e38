//! Plugin settings and the persisted configuration envelope.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SettingsError, SettingsResult};

// ============================================================================
// SettingValue
// ============================================================================

/// A value a single configuration setting can hold.
///
/// An empty value is treated exactly like an absent one: it never counts as
/// "already configured" and never wins over a fallback.
pub trait SettingValue: Clone + Send + Sync + 'static {
    /// Returns `true` if the value carries no information.
    fn is_empty_value(&self) -> bool;
}

impl SettingValue for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl SettingValue for PathBuf {
    fn is_empty_value(&self) -> bool {
        self.as_os_str().is_empty()
    }
}

impl SettingValue for BTreeSet<String> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl SettingValue for Vec<String> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

/// Returns `value` only if it is present and non-empty.
pub fn non_empty<V: SettingValue>(value: Option<V>) -> Option<V> {
    value.filter(|v| !v.is_empty_value())
}

/// Returns `true` if `value` is present and non-empty.
pub fn is_set<V: SettingValue>(value: Option<&V>) -> bool {
    value.is_some_and(|v| !v.is_empty_value())
}

// ============================================================================
// PluginSettings
// ============================================================================

/// The statically typed configuration schema of one plugin.
///
/// Every field should be an `Option<_>` so that "unset" is representable, and
/// the struct should carry `#[serde(default)]` so older documents still load.
///
/// ```rust,ignore
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// #[serde(default, rename_all = "camelCase")]
/// struct TemplateConfig {
///     some_setting: Option<String>,
///     some_path_setting: Option<String>,
///     some_array_setting: Option<BTreeSet<String>>,
/// }
///
/// impl PluginSettings for TemplateConfig {}
/// ```
pub trait PluginSettings:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    /// Version of this schema, recorded in every persisted envelope.
    const SCHEMA_VERSION: u32 = 1;
}

// ============================================================================
// StoredConfig
// ============================================================================

/// The envelope the host persists for each plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    /// Schema version the settings were written with.
    pub version: u32,
    /// The settings document.
    pub settings: Value,
}

impl StoredConfig {
    /// Serializes typed settings into an envelope.
    pub fn from_settings<T: PluginSettings>(plugin: &str, settings: &T) -> SettingsResult<Self> {
        let settings = serde_json::to_value(settings).map_err(|e| SettingsError::Serialize {
            plugin: plugin.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            version: T::SCHEMA_VERSION,
            settings,
        })
    }

    /// Deserializes the envelope into typed settings.
    pub fn to_settings<T: PluginSettings>(&self, plugin: &str) -> SettingsResult<T> {
        T::deserialize(&self.settings).map_err(|e| SettingsError::Deserialize {
            plugin: plugin.to_string(),
            version: self.version,
            reason: e.to_string(),
        })
    }

    /// Returns `true` if the envelope was written with `T`'s current schema.
    pub fn is_current<T: PluginSettings>(&self) -> bool {
        self.version == T::SCHEMA_VERSION
    }
}
