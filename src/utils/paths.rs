use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::ClosingError;

const DEFAULT_DIR_NAME: &str = ".closing_core";
const HOME_ENV: &str = "CLOSING_CORE_HOME";
const CONFIG_FILE: &str = "config.json";
const SNAPSHOT_DIR: &str = "snapshots";

/// Resolves the directories used by the configuration and snapshot files.
pub struct PathResolver;

impl PathResolver {
    /// Returns the application data directory, defaulting to `~/.closing_core`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn snapshots_dir() -> PathBuf {
        snapshots_dir_in(&Self::base_dir())
    }
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn snapshots_dir_in(base: &Path) -> PathBuf {
    base.join(SNAPSHOT_DIR)
}

pub fn ensure_dir(path: &Path) -> Result<(), ClosingError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
