use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tether::prelude::PluginSettings;

/// Settings collected by the template plugin's install flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateConfig {
    pub some_setting: Option<String>,
    pub some_path_setting: Option<String>,
    pub some_array_setting: Option<BTreeSet<String>>,
}

impl PluginSettings for TemplateConfig {}
