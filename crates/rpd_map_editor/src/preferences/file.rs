//! Preferences file save/load operations

use super::{Preferences, Settings};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{info, warn};

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Preferences are not tied to a file")]
    NoPath,
}

impl Preferences {
    /// Get the config directory path for the editor
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("org", "rpd_map", "rpd_map").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the preferences file path
    pub fn preferences_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(PREFERENCES_FILE))
    }

    /// Load preferences from the config directory, returning defaults on failure
    pub fn load() -> Self {
        let Some(path) = Self::preferences_path() else {
            warn!("Could not load preferences: {}. Using defaults.", PreferencesError::NoConfigDir);
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!("Could not load preferences: {}. Using defaults.", e);
                let mut prefs = Self::default();
                prefs.path = Some(path);
                prefs.record_run();
                prefs
            }
        }
    }

    /// Load preferences from `path`. A missing file yields defaults.
    ///
    /// Every load counts as one run of the editor.
    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        let settings = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<Settings>(&content).map_err(PreferencesError::Parse)?
        } else {
            Settings::default()
        };

        let mut prefs = Self::with_settings(settings);
        prefs.path = Some(path.to_path_buf());
        prefs.record_run();
        Ok(prefs)
    }

    fn record_run(&mut self) {
        if self.settings.first_run.is_none() {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            self.settings.first_run = Some(now);
        }
        self.settings.run_count = self.settings.run_count.saturating_add(1);
        self.dirty = true;
    }

    /// File these preferences are saved to
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Save preferences to the file they were loaded from
    pub fn save(&mut self) -> Result<(), PreferencesError> {
        let path = self.path.clone().ok_or(PreferencesError::NoPath)?;
        self.save_to(&path)
    }

    /// Save preferences to `path`, creating its directory if needed
    pub fn save_to(&mut self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content =
            serde_json::to_string_pretty(&self.settings).map_err(PreferencesError::Serialize)?;
        std::fs::write(path, content)?;

        self.dirty = false;
        info!("Saved preferences to {:?}", path);
        Ok(())
    }
}
