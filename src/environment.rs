// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_log;
use crate::core::api_client::DEFAULT_API_URL;

pub const CONFIG_FILE: &str = "good-job.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub session_dir: Option<PathBuf>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: Option<EnvironmentConfig>,
    production: Option<EnvironmentConfig>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            session_dir: None,
            timeout_seconds: None,
        }
    }
}

impl EnvironmentConfig {
    /// Load configuration: `good-job.yaml` (when present) for the current
    /// environment, then `GOOD_JOB_*` variables on top.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        app_log!(info, "Loading configuration for environment: {}", environment);

        let mut config = Self::load_from_file(Path::new(CONFIG_FILE), &environment)?
            .unwrap_or_default();
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("GOOD_JOB_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from_file(path: &Path, environment: &str) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
            .map(Some)
    }

    /// Pick the section for `environment` out of a config document. A missing
    /// section falls back to defaults.
    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };
        Ok(section.unwrap_or_default())
    }

    /// Apply `GOOD_JOB_API_URL`, `GOOD_JOB_SESSION_DIR` and
    /// `GOOD_JOB_TIMEOUT_SECS` as returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_url) = lookup("GOOD_JOB_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_url = api_url;
        }
        if let Some(dir) = lookup("GOOD_JOB_SESSION_DIR").filter(|v| !v.trim().is_empty()) {
            self.session_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = lookup("GOOD_JOB_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.timeout_seconds = Some(secs),
                Err(_) => app_log!(warn, "Ignoring GOOD_JOB_TIMEOUT_SECS={}: not a number", raw),
            }
        }
    }

    /// Where portal sessions are persisted
    pub fn session_dir(&self) -> PathBuf {
        self.session_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("good-job")
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}
