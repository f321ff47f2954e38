use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use tether_core::{FileSystemService, ServiceError, ServiceResult};
use tracing::debug;

/// Writes plugin files to disk.
///
/// Relative paths resolve against the base directory. Missing parent
/// directories are created.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem {
    base: Option<PathBuf>,
}

impl LocalFileSystem {
    /// Resolves relative paths against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative paths against `base`.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    /// The path a write to `path` lands at.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl FileSystemService for LocalFileSystem {
    async fn save_file(&self, path: &Path, content: &str) -> ServiceResult<()> {
        let target = self.resolve(path);
        let fail = |e: std::io::Error| {
            ServiceError::file_system(target.display().to_string(), e.to_string())
        };

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(fail)?;
        }
        tokio::fs::write(&target, content).await.map_err(fail)?;

        debug!(path = %target.display(), bytes = content.len(), "Saved file");
        Ok(())
    }
}

/// Keeps plugin files in memory, keyed by path. Later writes replace
/// earlier ones.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content written to `path`, if any.
    pub fn read(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().get(path.as_ref()).cloned()
    }

    /// All written paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().keys().cloned().collect()
    }
}

#[async_trait]
impl FileSystemService for MemoryFileSystem {
    async fn save_file(&self, path: &Path, content: &str) -> ServiceResult<()> {
        self.files
            .lock()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}
