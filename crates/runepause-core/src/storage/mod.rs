mod settings;
mod store;

pub use settings::{
    BreakSettings, BreathingSettings, Settings, SoundSettings, StretchSettings, UiSettings,
};
pub use store::{MemorySettingsStore, SettingsStore, TomlSettingsStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/runepause[-dev]/`.
///
/// Set RUNEPAUSE_ENV=dev to use the development directory, or
/// RUNEPAUSE_HOME to replace `~/.config` entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = match std::env::var_os("RUNEPAUSE_HOME") {
        Some(home) => PathBuf::from(home),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config"),
    };

    let env = std::env::var("RUNEPAUSE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("runepause-dev")
    } else {
        base_dir.join("runepause")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::NoDataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
