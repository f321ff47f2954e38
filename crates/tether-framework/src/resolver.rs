//! Config merge resolver.
//!
//! Computes each setting of a fresh configuration from the previously
//! persisted value and the user's answer:
//!
//! 1. If the prompt's `enabled` predicate rejects the existing value, the
//!    prompt service is not called and the existing value is carried over.
//! 2. Otherwise the user is prompted and the first non-empty value of
//!    *answer*, *existing*, *default* wins. Empty answers count as no answer,
//!    and a text default the validator rejects is never applied.
//!
//! The resolver never fails: a prompt service error is logged and treated as
//! no answer, and a setting nothing resolves stays unset.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tether_core::{
    CheckboxPrompt, FuzzyPathPrompt, InputPrompt, PromptService, ServiceResult, SettingValue,
    non_empty,
};
use tracing::{debug, warn};

/// The fallback chain applied to a prompted setting.
pub fn merge_setting<V: SettingValue>(
    existing: Option<V>,
    prompt_result: Option<V>,
    default: Option<V>,
) -> Option<V> {
    non_empty(prompt_result)
        .or_else(|| non_empty(existing))
        .or_else(|| non_empty(default))
}

/// Resolves settings against a [`PromptService`].
pub struct ConfigResolver {
    prompt: Arc<dyn PromptService>,
    issued: AtomicUsize,
}

impl ConfigResolver {
    /// Creates a resolver prompting through `prompt`.
    pub fn new(prompt: Arc<dyn PromptService>) -> Self {
        Self {
            prompt,
            issued: AtomicUsize::new(0),
        }
    }

    /// Number of prompts actually sent to the prompt service.
    pub fn prompts_issued(&self) -> usize {
        self.issued.load(Ordering::Relaxed)
    }

    /// Resolves a free text setting.
    pub async fn input(&self, existing: Option<&String>, request: &InputPrompt) -> Option<String> {
        if !request.is_enabled(existing) {
            debug!(prompt = %request.message, "Prompt disabled, keeping existing value");
            return existing.cloned();
        }
        let answer = self.ask(&request.message, self.prompt.input(request)).await;
        let default = request.default.clone().filter(|d| request.accepts(d));
        merge_setting(existing.cloned(), answer, default)
    }

    /// Resolves a path setting.
    pub async fn fuzzy_path(
        &self,
        existing: Option<&String>,
        request: &FuzzyPathPrompt,
    ) -> Option<String> {
        if !request.is_enabled(existing) {
            debug!(prompt = %request.message, "Prompt disabled, keeping existing value");
            return existing.cloned();
        }
        let answer = self.ask(&request.message, self.prompt.fuzzy_path(request)).await;
        merge_setting(existing.cloned(), answer, request.default.clone())
    }

    /// Resolves a multi-choice setting.
    pub async fn checkbox(
        &self,
        existing: Option<&BTreeSet<String>>,
        request: &CheckboxPrompt,
    ) -> Option<BTreeSet<String>> {
        if !request.is_enabled(existing) {
            debug!(prompt = %request.message, "Prompt disabled, keeping existing value");
            return existing.cloned();
        }
        let answer = self.ask(&request.message, self.prompt.checkbox(request)).await;
        merge_setting(existing.cloned(), answer, Some(request.default.clone()))
    }

    async fn ask<V>(
        &self,
        message: &str,
        answer: impl Future<Output = ServiceResult<Option<V>>>,
    ) -> Option<V> {
        self.issued.fetch_add(1, Ordering::Relaxed);
        match answer.await {
            Ok(value) => value,
            Err(e) => {
                warn!(prompt = %message, error = %e, "Prompt failed, treating as no answer");
                None
            }
        }
    }
}

impl fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("prompts_issued", &self.prompts_issued())
            .finish_non_exhaustive()
    }
}
