use clap::Subcommand;
use runepause_core::storage::SettingsStore;
use runepause_core::{Settings, TomlSettingsStore};

use super::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a settings value
    Get {
        /// Dot-separated key (e.g. "breaks.short_interval_min", "sound.kind")
        key: String,
    },
    /// Set a settings value
    Set {
        /// Dot-separated key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    let store = TomlSettingsStore::default_location()?;
    match action {
        ConfigAction::Get { key } => {
            let settings = store.load()?;
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = store.load()?;
            settings.set(&key, &value)?;
            store.save(&settings)?;
            println!("ok");
        }
        ConfigAction::List => {
            let settings = store.load()?;
            let json = serde_json::to_string_pretty(&settings)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            store.save(&Settings::default())?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
