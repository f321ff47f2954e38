use std::any::type_name;
use std::ops::Deref;
use std::sync::Arc;

use crate::context::HandlerContext;
use crate::error::{ExtractError, ExtractResult};
use crate::extractor::FromContext;

/// Read-only view of the plugin's active configuration.
///
/// The value is the configuration loaded when the plugin was initialised; it
/// does not change for the rest of the run.
///
/// ```rust,ignore
/// fn on_install(settings: Settings<TemplateConfig>, logger: Logger) {
///     logger.log(settings.some_setting.as_deref().unwrap_or_default());
/// }
/// ```
#[derive(Debug)]
pub struct Settings<T>(pub Arc<T>);

impl<T> Clone for Settings<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for Settings<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Send + Sync + 'static> FromContext for Settings<T> {
    fn from_context(ctx: &HandlerContext) -> ExtractResult<Self> {
        ctx.settings::<T>()
            .map(Settings)
            .ok_or(ExtractError::SettingsMismatch {
                expected: type_name::<T>(),
            })
    }
}

/// The name of the plugin owning the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginName(pub String);

impl FromContext for PluginName {
    fn from_context(ctx: &HandlerContext) -> ExtractResult<Self> {
        Ok(Self(ctx.plugin_name().to_string()))
    }
}
