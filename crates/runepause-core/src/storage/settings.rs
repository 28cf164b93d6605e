//! Application settings.
//!
//! Stores user preferences including:
//! - Break intervals and durations
//! - Ambient sound and notification preferences
//! - Activity selection preferences
//! - Default breathing pattern and stretch routine
//!
//! Persisted as TOML by a [`super::SettingsStore`].

use serde::{Deserialize, Serialize};

use crate::activity::{ActivityPreferences, BreakKind};
use crate::error::ConfigError;
use crate::sound::SoundKind;
use crate::stepper::{PatternKey, RoutineKind, DEFAULT_CYCLES};

/// Break cadence and length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakSettings {
    /// Minutes of work between breaks.
    #[serde(default = "default_short_interval")]
    pub short_interval_min: u32,
    /// Minutes of work after which the next break is a long one.
    #[serde(default = "default_long_interval")]
    pub long_interval_min: u32,
    #[serde(default = "default_short_duration")]
    pub short_duration_secs: u32,
    #[serde(default = "default_long_duration")]
    pub long_duration_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub kind: SoundKind,
    #[serde(default = "default_volume")]
    pub volume: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default)]
    pub dark_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingSettings {
    #[serde(default)]
    pub pattern: PatternKey,
    #[serde(default = "default_cycles")]
    pub cycles: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StretchSettings {
    /// Routine for a standalone stretch session.
    #[serde(default)]
    pub default_routine: RoutineKind,
}

/// Application settings. Every field has a default, so a partial file loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schedule breaks at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub notifications: bool,
    /// Pick an activity automatically instead of offering a list.
    #[serde(default = "default_true")]
    pub auto_select_activity: bool,
    #[serde(default)]
    pub breaks: BreakSettings,
    #[serde(default)]
    pub sound: SoundSettings,
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub activity_preferences: ActivityPreferences,
    #[serde(default)]
    pub breathing: BreathingSettings,
    #[serde(default)]
    pub stretch: StretchSettings,
}

// Default functions
fn default_short_interval() -> u32 {
    20
}
fn default_long_interval() -> u32 {
    60
}
fn default_short_duration() -> u32 {
    20
}
fn default_long_duration() -> u32 {
    300
}
fn default_volume() -> u32 {
    30
}
fn default_cycles() -> u32 {
    DEFAULT_CYCLES
}
fn default_true() -> bool {
    true
}

impl Default for BreakSettings {
    fn default() -> Self {
        Self {
            short_interval_min: default_short_interval(),
            long_interval_min: default_long_interval(),
            short_duration_secs: default_short_duration(),
            long_duration_secs: default_long_duration(),
        }
    }
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: SoundKind::default(),
            volume: default_volume(),
        }
    }
}

impl Default for BreathingSettings {
    fn default() -> Self {
        Self {
            pattern: PatternKey::default(),
            cycles: default_cycles(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            notifications: true,
            auto_select_activity: true,
            breaks: BreakSettings::default(),
            sound: SoundSettings::default(),
            ui: UiSettings::default(),
            activity_preferences: ActivityPreferences::default(),
            breathing: BreathingSettings::default(),
            stretch: StretchSettings::default(),
        }
    }
}

impl Settings {
    pub fn break_duration_secs(&self, kind: BreakKind) -> u32 {
        match kind {
            BreakKind::Short => self.breaks.short_duration_secs,
            BreakKind::Long => self.breaks.long_duration_secs,
        }
    }

    /// Work interval before the next break, in seconds.
    pub fn work_interval_secs(&self) -> u32 {
        self.breaks.short_interval_min.saturating_mul(60)
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value.parse::<u64>().map_err(|e| invalid(e.to_string()))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Get a settings value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, checked against the existing type.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit.
    /// `self` is left untouched on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
