use std::path::PathBuf;

use anyhow::{Context, Result};
use platform_store::{StoreBackend, StoreSettings};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store = StoreSettings::from_lookup(&lookup).context("invalid store settings")?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            store,
            cors_allowed_origins,
        })
    }

    /// Applies command line overrides on top of the environment.
    pub fn with_store_overrides(
        mut self,
        backend: Option<StoreBackend>,
        data_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(backend) = backend {
            self.store.backend = backend;
        }
        if let Some(data_dir) = data_dir {
            self.store.data_dir = data_dir;
        }
        self
    }
}
