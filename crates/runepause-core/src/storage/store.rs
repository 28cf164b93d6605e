//! Settings persistence.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{data_dir, Settings};
use crate::error::ConfigError;

/// Where settings are read from and written to.
///
/// Loaded once when the orchestrator is built and saved on every change.
pub trait SettingsStore: Send {
    fn load(&self) -> Result<Settings, ConfigError>;
    fn save(&self, settings: &Settings) -> Result<(), ConfigError>;
}

/// TOML file store, `settings.toml` inside [`data_dir`] by default.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn default_location() -> Result<Self, ConfigError> {
        Ok(Self::new(data_dir()?.join("settings.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_failed(&self, message: impl ToString) -> ConfigError {
        ConfigError::LoadFailed {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }

    fn save_failed(&self, message: impl ToString) -> ConfigError {
        ConfigError::SaveFailed {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }
}

impl SettingsStore for TomlSettingsStore {
    /// A missing file yields the defaults, which are written back.
    fn load(&self) -> Result<Settings, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => toml::from_str(&content).map_err(|e| self.load_failed(e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no settings file, writing defaults");
                let settings = Settings::default();
                self.save(&settings)?;
                Ok(settings)
            }
            Err(e) => Err(self.load_failed(e)),
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(settings).map_err(|e| self.save_failed(e))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.save_failed(e))?;
        }
        std::fs::write(&self.path, content).map_err(|e| self.save_failed(e))?;
        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Settings>,
    saves: Mutex<usize>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
            saves: Mutex::new(0),
        }
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or_default()
    }

    pub fn current(&self) -> Settings {
        self.settings
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        self.settings
            .lock()
            .map(|s| s.clone())
            .map_err(|e| ConfigError::LoadFailed {
                path: "<memory>".into(),
                message: e.to_string(),
            })
    }

    fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        let poisoned = |e: String| ConfigError::SaveFailed {
            path: "<memory>".into(),
            message: e,
        };
        *self.settings.lock().map_err(|e| poisoned(e.to_string()))? = settings.clone();
        *self.saves.lock().map_err(|e| poisoned(e.to_string()))? += 1;
        Ok(())
    }
}
