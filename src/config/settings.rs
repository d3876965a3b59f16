//! Per-user application directory holding the last-used settings and the
//! run history.

use crate::domain::model::{HistoryEntry, Replacement};
use crate::utils::error::{NoticeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "NotificationGenerator";
pub const APP_DIR_ENV: &str = "FLAT_NOTICES_HOME";
pub const SETTINGS_FILE: &str = "settings.json";
pub const HISTORY_FILE: &str = "history.json";

#[derive(Debug, Clone)]
pub struct AppDirs {
    root: PathBuf,
}

impl AppDirs {
    /// Explicit directory first, then `FLAT_NOTICES_HOME`, then `~/NotificationGenerator`.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = match explicit {
            Some(dir) => dir.to_path_buf(),
            None => match std::env::var_os(APP_DIR_ENV) {
                Some(dir) if !dir.is_empty() => PathBuf::from(dir),
                _ => dirs::home_dir()
                    .ok_or_else(|| NoticeError::ConfigError {
                        message: "Could not determine the home directory".to_string(),
                    })?
                    .join(APP_DIR_NAME),
            },
        };
        Ok(Self { root })
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn settings(&self) -> SettingsStore {
        SettingsStore {
            path: self.root.join(SETTINGS_FILE),
        }
    }

    pub fn history(&self) -> HistoryStore {
        HistoryStore {
            path: self.root.join(HISTORY_FILE),
        }
    }
}

/// Last-used form values. Everything is optional and kept as entered; dates
/// and times are validated only when a run is resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub template: Option<String>,
    pub apartments: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub time_from: Option<String>,
    pub time_to: Option<String>,
    pub archive_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replacements: Vec<Replacement>,
}

impl Settings {
    pub fn is_empty(&self) -> bool {
        *self == Settings::default()
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable file yields empty settings.
    pub fn load(&self) -> Settings {
        if !self.path.exists() {
            return Settings::default();
        }

        let parsed = fs::read_to_string(&self.path)
            .map_err(NoticeError::from)
            .and_then(|content| serde_json::from_str(&content).map_err(NoticeError::from));

        match parsed {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable settings file {}: {}",
                    self.path.display(),
                    e
                );
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        tracing::debug!("Settings saved to {}", self.path.display());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or corrupt history reads as empty.
    pub fn load(&self) -> Vec<HistoryEntry> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(
                "History file {} is corrupt and will be replaced: {}",
                self.path.display(),
                e
            );
            Vec::new()
        })
    }

    pub fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut history = self.load();
        history.push(entry);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&history)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
