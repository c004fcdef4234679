use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    currency::{is_known_locale, is_valid_date_format},
    errors::ClosingError,
    utils::paths::{config_file_in, ensure_dir, PathResolver},
};

const TMP_SUFFIX: &str = "tmp";

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Reporting preferences shared by every query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// strftime pattern used for DRE period labels.
    pub date_format: String,
    /// Memoize report results per snapshot version.
    pub cache_reports: bool,
    /// Most reports kept in memory at once.
    pub cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            date_format: "%d/%m/%Y".into(),
            cache_reports: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ClosingError> {
        if !is_known_locale(&self.locale) {
            return Err(ClosingError::ConfigError(format!(
                "unsupported locale `{}`",
                self.locale
            )));
        }
        if self.currency.trim().len() != 3 {
            return Err(ClosingError::ConfigError(format!(
                "currency `{}` is not an ISO 4217 code",
                self.currency
            )));
        }
        if !is_valid_date_format(&self.date_format) {
            return Err(ClosingError::ConfigError(format!(
                "invalid date format `{}`",
                self.date_format
            )));
        }
        if self.cache_capacity == 0 {
            return Err(ClosingError::ConfigError(
                "cache capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ClosingError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ClosingError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, ClosingError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Loads the stored configuration, returning defaults when none exists.
    pub fn load(&self) -> Result<Config, ClosingError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.validate()?;
            tracing::debug!(path = %self.path.display(), "configuration loaded");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ClosingError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ClosingError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
