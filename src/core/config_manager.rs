// src/core/config_manager.rs
//! Configuration for one portal run: environment plus portal-specific wiring

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::app_log;
use crate::core::{ApiClient, FileStorage, SessionStore};
use crate::environment::EnvironmentConfig;
use crate::types::Portal;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub portal: PortalConfig,
}

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub portal: Portal,
    pub storage_path: PathBuf,
}

/// Values given on the command line; they beat file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub session_dir: Option<PathBuf>,
}

impl ConfigManager {
    pub fn load(portal: Portal, overrides: &Overrides) -> Result<Self> {
        let environment = EnvironmentConfig::load()?;
        Ok(Self::from_environment(portal, environment, overrides))
    }

    pub fn from_environment(
        portal: Portal,
        mut environment: EnvironmentConfig,
        overrides: &Overrides,
    ) -> Self {
        if let Some(api_url) = &overrides.api_url {
            environment.api_url = api_url.clone();
        }
        if let Some(dir) = &overrides.session_dir {
            environment.session_dir = Some(dir.clone());
        }

        let storage_path = FileStorage::for_portal(&environment.session_dir(), portal)
            .path()
            .to_path_buf();

        Self {
            environment,
            portal: PortalConfig {
                portal,
                storage_path,
            },
        }
    }

    pub fn api_client(&self) -> Result<ApiClient> {
        app_log!(info, "API base URL: {}", self.environment.api_url);
        ApiClient::new(self.environment.api_url.clone(), self.environment.timeout())
    }

    /// File-backed session store for this portal, already hydrated
    pub fn open_session(&self) -> Result<SessionStore> {
        let storage = FileStorage::new(self.portal.storage_path.clone());
        SessionStore::open(self.portal.portal, storage).with_context(|| {
            format!(
                "Failed to load session from {}",
                self.portal.storage_path.display()
            )
        })
    }
}
