use std::path::PathBuf;

use bodhi_common::client::BodhiClientConfig;

use crate::error::AppError;

const FLAGS_FILE: &str = "ui-flags.json";

/// Guard configuration loaded from environment variables, with CLI overrides applied on top.
#[derive(Debug, Clone)]
pub struct Config {
    pub client: BodhiClientConfig,
    /// JSON file holding the persisted setup flags.
    pub flags_path: PathBuf,
}

impl Config {
    /// Optional:
    /// - `BODHI_URL`, `BODHI_TIMEOUT_SECS`, `BODHI_API_TOKEN` (see [`BodhiClientConfig::from_env`])
    /// - `BODHI_FLAGS_PATH`: flags file; otherwise `$BODHI_HOME/ui-flags.json`, otherwise
    ///   `$HOME/.cache/bodhi/ui-flags.json`
    pub fn from_env() -> Result<Self, AppError> {
        let flags_path = match std::env::var("BODHI_FLAGS_PATH") {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_flags_path(
                std::env::var("BODHI_HOME").ok(),
                std::env::var("HOME").ok(),
            )?,
        };
        Ok(Self {
            client: BodhiClientConfig::from_env(),
            flags_path,
        })
    }

    pub fn with_overrides(mut self, url: Option<&str>, flags_path: Option<PathBuf>) -> Self {
        if let Some(url) = url {
            self.client.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = flags_path {
            self.flags_path = path;
        }
        self
    }
}

fn default_flags_path(
    bodhi_home: Option<String>,
    home: Option<String>,
) -> Result<PathBuf, AppError> {
    if let Some(bodhi_home) = bodhi_home.filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(bodhi_home).join(FLAGS_FILE));
    }
    match home.filter(|h| !h.is_empty()) {
        Some(home) => Ok(PathBuf::from(home).join(".cache").join("bodhi").join(FLAGS_FILE)),
        None => Err(AppError::Config(
            "cannot locate flags file: set BODHI_FLAGS_PATH, BODHI_HOME or HOME".to_string(),
        )),
    }
}
