use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const DB_FILE_NAME: &str = "spendiq.db";

/// Where the record store keeps its data and whether a brand-new store
/// starts out with the demonstration dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub seed_demo_data: bool,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            seed_demo_data: true,
        }
    }

    /// Database file inside the platform data directory, which is created if missing.
    pub fn in_data_dir() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "spendiq", "SpendIQ")
            .ok_or_else(|| Error::Config("could not determine data directory".into()))?;
        Self::in_dir(proj_dirs.data_dir())
    }

    pub fn in_dir(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self::new(dir.join(DB_FILE_NAME)))
    }

    pub fn with_demo_data(mut self, seed: bool) -> Self {
        self.seed_demo_data = seed;
        self
    }
}
