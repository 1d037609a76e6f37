use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CommonError;

/// Client-side state that survives between page loads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupFlags {
    /// Set once the download-models setup page has been shown.
    #[serde(default)]
    pub models_page_shown: bool,
}

/// JSON file holding [`SetupFlags`].
///
/// Reads degrade to defaults: a missing or unreadable file yields `SetupFlags::default()`.
/// Writes surface their errors.
#[derive(Debug, Clone)]
pub struct FlagStore {
    path: PathBuf,
}

impl FlagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> SetupFlags {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return SetupFlags::default(),
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "failed to read flags, using defaults");
                return SetupFlags::default();
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(error = %e, path = %self.path.display(), "malformed flags file, using defaults"))
            .unwrap_or_default()
    }

    pub async fn save(&self, flags: &SetupFlags) -> Result<(), CommonError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| CommonError::Io {
                    path: parent.display().to_string(),
                    source,
                })?;
        }
        let json = serde_json::to_string_pretty(flags)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| CommonError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        info!(path = %self.path.display(), models_page_shown = flags.models_page_shown, "flags saved");
        Ok(())
    }

    pub async fn mark_models_page_shown(&self) -> Result<SetupFlags, CommonError> {
        let mut flags = self.load().await;
        flags.models_page_shown = true;
        self.save(&flags).await?;
        Ok(flags)
    }

    pub async fn reset(&self) -> Result<(), CommonError> {
        self.save(&SetupFlags::default()).await
    }
}
