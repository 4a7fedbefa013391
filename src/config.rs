use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::quick_entry::Taxonomy;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Runtime settings, read from the environment with platform defaults.
///
/// | variable           | default                          |
/// |--------------------|----------------------------------|
/// | `POUPP_DATA_DIR`   | platform data dir for Poupp      |
/// | `POUPP_CONFIG_DIR` | platform config dir for Poupp    |
/// | `POUPP_USER`       | `$USER`, then `local`            |
/// | `POUPP_LOG`        | `warn`                           |
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) data_dir: PathBuf,
    pub(crate) config_dir: PathBuf,
    pub(crate) user_id: String,
    pub(crate) log_filter: String,
}

impl Settings {
    pub(crate) fn load() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let (data_dir, config_dir) = match (var("POUPP_DATA_DIR"), var("POUPP_CONFIG_DIR")) {
            (Some(data), Some(config)) => (PathBuf::from(data), PathBuf::from(config)),
            (data, config) => {
                let proj_dirs = directories::ProjectDirs::from("com", "poupp", "Poupp")
                    .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
                (
                    data.map_or_else(|| proj_dirs.data_dir().to_path_buf(), PathBuf::from),
                    config.map_or_else(|| proj_dirs.config_dir().to_path_buf(), PathBuf::from),
                )
            }
        };

        let user_id = var("POUPP_USER")
            .or_else(|| var("USER"))
            .unwrap_or_else(|| "local".to_string());
        let log_filter = var("POUPP_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            data_dir,
            config_dir,
            user_id,
            log_filter,
        })
    }

    /// Path of the ledger file, creating the data directory if needed.
    pub(crate) fn db_path(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                self.data_dir.display()
            )
        })?;
        Ok(self.data_dir.join("poupp.db"))
    }

    pub(crate) fn taxonomy_path(&self) -> PathBuf {
        self.config_dir.join("taxonomy.toml")
    }

    pub(crate) fn load_taxonomy(&self) -> Result<Taxonomy> {
        let path = self.taxonomy_path();
        let taxonomy = Taxonomy::load_or_default(&path)?;
        if path.exists() {
            tracing::debug!("using taxonomy from {}", path.display());
        }
        Ok(taxonomy)
    }
}
