use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Docs builder configuration.
///
/// The docs directory has no default; the CLI takes it from `--docs-dir` or `BODHI_DOCS_DIR`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory holding the markdown tree.
    pub docs_dir: PathBuf,
}

impl Config {
    pub fn new(docs_dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let docs_dir = docs_dir.into();
        if !docs_dir.is_dir() {
            return Err(AppError::Config(format!(
                "docs directory not found: {}",
                docs_dir.display()
            )));
        }
        Ok(Self { docs_dir })
    }

    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }
}
