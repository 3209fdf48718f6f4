use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs;

const LAST_CITY_FILE: &str = "last_city.toml";

/// On-disk payload for the single persisted key.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSelection {
    city: String,
}

/// Persists the most recently selected city name across restarts.
///
/// One writer (the selection flow) and one reader (startup), never
/// overlapping. Read failures are indistinguishable from "nothing stored";
/// the workflow falls back to the default city either way.
#[derive(Debug, Clone)]
pub struct LastCityStore {
    path: PathBuf,
}

impl LastCityStore {
    /// Store rooted in the platform config directory.
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(Self { path: dirs.config_dir().join(LAST_CITY_FILE) })
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Last selected city, or `None` when nothing usable is stored.
    pub async fn load(&self) -> Option<String> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) => {
                tracing::debug!(path = %self.path.display(), %err, "no stored city");
                return None;
            }
        };

        match toml::from_str::<StoredSelection>(&contents) {
            Ok(stored) => Some(stored.city),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "stored city unreadable");
                None
            }
        }
    }

    /// Overwrite the stored selection, creating parent directories as needed.
    pub async fn save(&self, city: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(&StoredSelection { city: city.to_string() })
            .context("Failed to serialize stored city")?;

        fs::write(&self.path, toml)
            .await
            .with_context(|| format!("Failed to write store file: {}", self.path.display()))?;

        Ok(())
    }
}
