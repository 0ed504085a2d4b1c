//! Configuration handling for the TUI

use crate::state::{FormDefinition, DEFAULT_DRAFT_KEY};
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the submission endpoint
pub const ENDPOINT_ENV: &str = "INTAKE_ENDPOINT";

const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 1000;
const DEFAULT_NOTICE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IntakeConfig {
    /// URL the completed form is POSTed to
    pub endpoint: Option<String>,
    /// JSON form definition replacing the built-in form
    pub form_definition: Option<PathBuf>,
    /// Storage key for the saved draft
    pub draft_key: Option<String>,
    /// Idle time after typing before the draft is saved
    pub autosave_delay_ms: Option<u64>,
    /// How long error notices stay up
    pub notice_timeout_secs: Option<u64>,
    /// Submission request timeout
    pub request_timeout_secs: Option<u64>,
}

impl IntakeConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "intake", "intake-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: IntakeConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Endpoint from the environment, falling back to the config file
    pub fn endpoint(&self) -> Option<String> {
        std::env::var(ENDPOINT_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.endpoint.clone())
    }

    pub fn draft_key(&self) -> &str {
        self.draft_key.as_deref().unwrap_or(DEFAULT_DRAFT_KEY)
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms.unwrap_or(DEFAULT_AUTOSAVE_DELAY_MS))
    }

    pub fn notice_timeout(&self) -> Duration {
        Duration::from_secs(self.notice_timeout_secs.unwrap_or(DEFAULT_NOTICE_TIMEOUT_SECS))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// The configured form definition, or the built-in one
    pub fn form_definition(&self) -> Result<FormDefinition> {
        match &self.form_definition {
            Some(path) => FormDefinition::load(path),
            None => Ok(FormDefinition::default()),
        }
    }
}
