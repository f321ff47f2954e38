//! Prompt definitions.
//!
//! A prompt definition is built fresh for each setting asked during
//! install and handed to the [`PromptService`](crate::PromptService). It is
//! never persisted.
//!
//! Every definition carries an *enabled* predicate evaluated against the
//! setting's existing value. When none is given the prompt is enabled only if
//! the existing value is absent or empty, so re-running install never asks
//! again for something already configured.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::settings::{SettingValue, is_set};

/// Predicate deciding whether to prompt, given the existing value.
pub type EnabledFn<V> = Arc<dyn Fn(Option<&V>) -> bool + Send + Sync>;

/// Text validator. The prompt service re-prompts until it returns `true`.
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Producer of the choices offered by a checkbox prompt.
pub type ChoicesFn = Arc<dyn Fn() -> Vec<String> + Send + Sync>;

fn evaluate_enabled<V: SettingValue>(enabled: Option<&EnabledFn<V>>, existing: Option<&V>) -> bool {
    match enabled {
        Some(f) => f(existing),
        None => !is_set(existing),
    }
}

// ============================================================================
// InputPrompt
// ============================================================================

/// A free text prompt.
#[derive(Clone)]
pub struct InputPrompt {
    /// Message shown to the user.
    pub message: String,
    /// Value applied when the user submits an empty answer.
    pub default: Option<String>,
    /// Optional validator.
    pub validator: Option<Validator>,
    enabled: Option<EnabledFn<String>>,
}

impl InputPrompt {
    /// Creates a text prompt with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            default: None,
            validator: None,
            enabled: None,
        }
    }

    /// Sets the default answer.
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the validator.
    pub fn validator<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(f));
        self
    }

    /// Overrides the enabled predicate.
    pub fn enabled<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&String>) -> bool + Send + Sync + 'static,
    {
        self.enabled = Some(Arc::new(f));
        self
    }

    /// Evaluates the enabled predicate against `existing`.
    pub fn is_enabled(&self, existing: Option<&String>) -> bool {
        evaluate_enabled(self.enabled.as_ref(), existing)
    }

    /// Returns `true` if `answer` passes the validator (or there is none).
    pub fn accepts(&self, answer: &str) -> bool {
        self.validator.as_ref().is_none_or(|v| v(answer))
    }
}

impl fmt::Debug for InputPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputPrompt")
            .field("message", &self.message)
            .field("default", &self.default)
            .field("has_validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// FuzzyPathPrompt
// ============================================================================

/// What kind of filesystem entry a path prompt accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathItemType {
    /// Files only.
    File,
    /// Directories only.
    Directory,
    /// Files and directories.
    #[default]
    Any,
}

/// A filesystem path prompt with fuzzy completion.
#[derive(Clone)]
pub struct FuzzyPathPrompt {
    /// Message shown to the user.
    pub message: String,
    /// Value applied when the user submits an empty answer.
    pub default: Option<String>,
    /// Which entries are offered for completion.
    pub item_type: PathItemType,
    /// Directory completion starts from. `None` means the working directory.
    pub root: Option<PathBuf>,
    enabled: Option<EnabledFn<String>>,
}

impl FuzzyPathPrompt {
    /// Creates a path prompt with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            default: None,
            item_type: PathItemType::Any,
            root: None,
            enabled: None,
        }
    }

    /// Sets the default answer.
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Restricts completion to one kind of entry.
    pub fn item_type(mut self, item_type: PathItemType) -> Self {
        self.item_type = item_type;
        self
    }

    /// Sets the directory completion starts from.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Overrides the enabled predicate.
    pub fn enabled<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&String>) -> bool + Send + Sync + 'static,
    {
        self.enabled = Some(Arc::new(f));
        self
    }

    /// Evaluates the enabled predicate against `existing`.
    pub fn is_enabled(&self, existing: Option<&String>) -> bool {
        evaluate_enabled(self.enabled.as_ref(), existing)
    }
}

impl fmt::Debug for FuzzyPathPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuzzyPathPrompt")
            .field("message", &self.message)
            .field("default", &self.default)
            .field("item_type", &self.item_type)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// CheckboxPrompt
// ============================================================================

/// A multi-choice prompt.
#[derive(Clone)]
pub struct CheckboxPrompt {
    /// Message shown to the user.
    pub message: String,
    /// Choices preselected when the prompt opens.
    pub default: BTreeSet<String>,
    choices: ChoicesFn,
    enabled: Option<EnabledFn<BTreeSet<String>>>,
}

impl CheckboxPrompt {
    /// Creates a checkbox prompt offering the choices produced by `choices`.
    pub fn new<F>(message: impl Into<String>, choices: F) -> Self
    where
        F: Fn() -> Vec<String> + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            default: BTreeSet::new(),
            choices: Arc::new(choices),
            enabled: None,
        }
    }

    /// Creates a checkbox prompt over a fixed list of choices.
    pub fn with_choices<I, S>(message: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
        Self::new(message, move || choices.clone())
    }

    /// Sets the preselected choices.
    pub fn default_value<I, S>(mut self, default: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default = default.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the enabled predicate.
    pub fn enabled<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&BTreeSet<String>>) -> bool + Send + Sync + 'static,
    {
        self.enabled = Some(Arc::new(f));
        self
    }

    /// Produces the current list of choices.
    pub fn choices(&self) -> Vec<String> {
        (self.choices)()
    }

    /// Evaluates the enabled predicate against `existing`.
    pub fn is_enabled(&self, existing: Option<&BTreeSet<String>>) -> bool {
        evaluate_enabled(self.enabled.as_ref(), existing)
    }
}

impl fmt::Debug for CheckboxPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckboxPrompt")
            .field("message", &self.message)
            .field("default", &self.default)
            .field("choices", &self.choices())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enabled_prompts_only_when_unset() {
        let prompt = InputPrompt::new("name");
        assert!(prompt.is_enabled(None));
        assert!(prompt.is_enabled(Some(&String::new())));
        assert!(!prompt.is_enabled(Some(&"foo.json".to_string())));
    }

    #[test]
    fn test_enabled_override_wins() {
        let prompt = InputPrompt::new("name").enabled(|_| true);
        assert!(prompt.is_enabled(Some(&"foo.json".to_string())));
    }

    #[test]
    fn test_validator() {
        let prompt = InputPrompt::new("name").validator(|v| v.ends_with(".json"));
        assert!(prompt.accepts("foo.json"));
        assert!(!prompt.accepts("foo.yaml"));
        assert!(InputPrompt::new("free").accepts(""));
    }

    #[test]
    fn test_checkbox_choices_are_produced_lazily() {
        let prompt = CheckboxPrompt::with_choices("pick", ["Option1", "Option2"])
            .default_value(["Option2"]);
        assert_eq!(prompt.choices(), ["Option1", "Option2"]);
        assert!(prompt.default.contains("Option2"));
        assert!(prompt.is_enabled(Some(&BTreeSet::new())));
    }
}
