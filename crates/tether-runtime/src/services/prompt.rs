use std::collections::{BTreeSet, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use tether_core::{
    CheckboxPrompt, FuzzyPathPrompt, InputPrompt, PromptService, ServiceError, ServiceResult,
};
use tracing::debug;

/// Answers every prompt with its default without asking anyone.
///
/// Used for CI and other unattended installs. A default the input validator
/// rejects is not an answer, so that prompt goes unanswered.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractivePrompt;

#[async_trait]
impl PromptService for NonInteractivePrompt {
    async fn input(&self, request: &InputPrompt) -> ServiceResult<Option<String>> {
        Ok(request.default.clone().filter(|d| request.accepts(d)))
    }

    async fn fuzzy_path(&self, request: &FuzzyPathPrompt) -> ServiceResult<Option<String>> {
        Ok(request.default.clone())
    }

    async fn checkbox(&self, request: &CheckboxPrompt) -> ServiceResult<Option<BTreeSet<String>>> {
        Ok(Some(request.default.clone()))
    }
}

/// One prepared answer for a [`ScriptedPrompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedAnswer {
    /// Typed text. An empty string submits the prompt's default, which still
    /// has to pass the validator.
    Text(String),
    /// Checkbox selection.
    Choices(BTreeSet<String>),
    /// The user dismissed the prompt.
    Skip,
    /// The user pressed Ctrl+C.
    Interrupt,
}

/// Replays prepared answers in order.
///
/// Text answers rejected by an input validator are consumed and the next
/// answer is tried, the way a user retypes after a validation message. An
/// empty answer whose default is rejected counts as rejected. Once the script
/// runs out every prompt goes unanswered.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<ScriptedAnswer>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a text answer.
    pub fn text(self, answer: impl Into<String>) -> Self {
        self.push(ScriptedAnswer::Text(answer.into()))
    }

    /// Queues a checkbox selection.
    pub fn choices<I, S>(self, answer: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(ScriptedAnswer::Choices(
            answer.into_iter().map(Into::into).collect(),
        ))
    }

    /// Queues a dismissed prompt.
    pub fn skip(self) -> Self {
        self.push(ScriptedAnswer::Skip)
    }

    /// Queues an interrupted prompt.
    pub fn interrupt(self) -> Self {
        self.push(ScriptedAnswer::Interrupt)
    }

    /// Messages of the prompts shown so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }

    /// Number of answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.lock().len()
    }

    fn push(self, answer: ScriptedAnswer) -> Self {
        self.answers.lock().push_back(answer);
        self
    }

    fn next(&self, message: &str) -> Option<ScriptedAnswer> {
        self.answers
            .lock()
            .pop_front()
            .inspect(|answer| debug!(prompt = message, ?answer, "Scripted answer"))
    }

    fn text_answer(
        &self,
        message: &str,
        default: &Option<String>,
        accepts: impl Fn(&str) -> bool,
    ) -> ServiceResult<Option<String>> {
        self.asked.lock().push(message.to_string());
        loop {
            match self.next(message) {
                None | Some(ScriptedAnswer::Skip) => return Ok(None),
                Some(ScriptedAnswer::Interrupt) => return Err(ServiceError::Interrupted),
                Some(ScriptedAnswer::Choices(_)) => {
                    return Err(ServiceError::prompt(format!(
                        "expected a text answer for '{message}'"
                    )));
                }
                Some(ScriptedAnswer::Text(text)) => {
                    let submitted = match (text.is_empty(), default) {
                        (false, _) => text,
                        (true, Some(default)) => default.clone(),
                        (true, None) => return Ok(None),
                    };
                    if accepts(&submitted) {
                        return Ok(Some(submitted));
                    }
                }
            }
        }
    }
}

#[async_trait]
impl PromptService for ScriptedPrompt {
    async fn input(&self, request: &InputPrompt) -> ServiceResult<Option<String>> {
        self.text_answer(&request.message, &request.default, |text| request.accepts(text))
    }

    async fn fuzzy_path(&self, request: &FuzzyPathPrompt) -> ServiceResult<Option<String>> {
        self.text_answer(&request.message, &request.default, |_| true)
    }

    async fn checkbox(&self, request: &CheckboxPrompt) -> ServiceResult<Option<BTreeSet<String>>> {
        self.asked.lock().push(request.message.clone());
        match self.next(&request.message) {
            None | Some(ScriptedAnswer::Skip) => Ok(None),
            Some(ScriptedAnswer::Interrupt) => Err(ServiceError::Interrupted),
            Some(ScriptedAnswer::Choices(choices)) => Ok(Some(choices)),
            Some(ScriptedAnswer::Text(_)) => Err(ServiceError::prompt(format!(
                "expected a selection for '{}'",
                request.message
            ))),
        }
    }
}
