use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tether_core::{
    CheckboxPrompt, FuzzyPathPrompt, InputPrompt, PathItemType, PromptService, ServiceError,
    ServiceResult,
};
use tokio::task::spawn_blocking;

/// Prompts on the controlling terminal with `cliclack`.
///
/// Each prompt runs on the blocking pool. An empty answer submits the
/// prompt's default, which input prompts validate like a typed answer. Path
/// prompts check the entry exists and has the requested type; they do not
/// offer completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

fn map_io(err: io::Error) -> ServiceError {
    match err.kind() {
        io::ErrorKind::Interrupted => ServiceError::Interrupted,
        _ => ServiceError::from(err),
    }
}

async fn blocking<T, F>(f: F) -> ServiceResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::prompt(e.to_string()))?
        .map_err(map_io)
}

fn with_default(answer: String, default: Option<String>) -> Option<String> {
    if answer.is_empty() { default } else { Some(answer) }
}

/// Whether `value` may be submitted to `request`, validating the default in
/// place of an empty answer.
fn input_accepts(request: &InputPrompt, value: &str) -> bool {
    match (value.is_empty(), request.default.as_deref()) {
        (false, _) => request.accepts(value),
        (true, Some(default)) => request.accepts(default),
        (true, None) => true,
    }
}

fn path_matches(root: Option<&PathBuf>, answer: &str, item_type: PathItemType) -> bool {
    let path = match root {
        Some(root) => root.join(answer),
        None => PathBuf::from(answer),
    };
    match item_type {
        PathItemType::File => path.is_file(),
        PathItemType::Directory => path.is_dir(),
        PathItemType::Any => path.exists(),
    }
}

#[async_trait]
impl PromptService for TerminalPrompt {
    async fn input(&self, request: &InputPrompt) -> ServiceResult<Option<String>> {
        let request = request.clone();
        blocking(move || {
            let placeholder = request.default.clone().unwrap_or_default();
            let check = request.clone();
            let answer: String = cliclack::input(&request.message)
                .placeholder(&placeholder)
                .required(false)
                .validate(move |value: &String| {
                    if input_accepts(&check, value) {
                        Ok(())
                    } else {
                        Err("Invalid value")
                    }
                })
                .interact()?;
            Ok(with_default(answer, request.default))
        })
        .await
    }

    async fn fuzzy_path(&self, request: &FuzzyPathPrompt) -> ServiceResult<Option<String>> {
        let request = request.clone();
        blocking(move || {
            let placeholder = request.default.clone().unwrap_or_default();
            let (root, item_type) = (request.root.clone(), request.item_type);
            let answer: String = cliclack::input(&request.message)
                .placeholder(&placeholder)
                .required(false)
                .validate(move |value: &String| {
                    if value.is_empty() || path_matches(root.as_ref(), value, item_type) {
                        Ok(())
                    } else {
                        Err("No such path")
                    }
                })
                .interact()?;
            Ok(with_default(answer, request.default))
        })
        .await
    }

    async fn checkbox(&self, request: &CheckboxPrompt) -> ServiceResult<Option<BTreeSet<String>>> {
        let (message, choices, initial) = (
            request.message.clone(),
            request.choices(),
            request.default.iter().cloned().collect::<Vec<_>>(),
        );
        blocking(move || {
            let mut select = cliclack::multiselect(message)
                .initial_values(initial)
                .required(false);
            for choice in &choices {
                select = select.item(choice.clone(), choice, "");
            }
            let picked = select.interact()?;
            Ok(Some(picked.into_iter().collect()))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_maps_to_interrupted() {
        let err = map_io(io::Error::new(io::ErrorKind::Interrupted, "ctrl-c"));
        assert!(matches!(err, ServiceError::Interrupted));
        let err = map_io(io::Error::other("tty gone"));
        assert!(matches!(err, ServiceError::Io(_)));
    }

    #[test]
    fn test_empty_answer_takes_default() {
        assert_eq!(with_default(String::new(), Some("d".into())).as_deref(), Some("d"));
        assert_eq!(with_default("x".into(), Some("d".into())).as_deref(), Some("x"));
        assert_eq!(with_default(String::new(), None), None);
    }

    #[test]
    fn test_empty_answer_validates_default() {
        let request = InputPrompt::new("file")
            .default_value("default value")
            .validator(|v| v.ends_with(".json"));

        assert!(!input_accepts(&request, ""));
        assert!(!input_accepts(&request, "foo.yaml"));
        assert!(input_accepts(&request, "foo.json"));
        assert!(input_accepts(&request.clone().default_value("a.json"), ""));
        assert!(input_accepts(&InputPrompt::new("free"), ""));
    }

    #[test]
    fn test_path_matches_item_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        let root = dir.path().to_path_buf();

        assert!(path_matches(Some(&root), "a.txt", PathItemType::File));
        assert!(!path_matches(Some(&root), "a.txt", PathItemType::Directory));
        assert!(path_matches(Some(&root), ".", PathItemType::Directory));
        assert!(!path_matches(Some(&root), "missing", PathItemType::Any));
    }
}
