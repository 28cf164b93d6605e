//! Relaxation activities and the selection policy.
//!
//! The catalog holds two fixed lists of activities, one per break length.
//! The selector filters them by time of day and user preference, weights
//! the survivors and draws one at random.

mod catalog;
mod selector;

pub use catalog::Catalog;
pub use selector::{weight, weighted_pick, ActivitySelector};

use std::fmt;
use std::str::FromStr;

use chrono::{Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::stepper::RoutineKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Simple,
    Breathing,
    Stretch,
}

/// What an activity does once chosen. Only stretching carries a routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActivityKind {
    /// A message shown during the break; no stepper runs.
    Simple,
    Breathing,
    Stretch { routine: RoutineKind },
}

impl ActivityKind {
    pub fn activity_type(self) -> ActivityType {
        match self {
            ActivityKind::Simple => ActivityType::Simple,
            ActivityKind::Breathing => ActivityType::Breathing,
            ActivityKind::Stretch { .. } => ActivityType::Stretch,
        }
    }

    pub fn is_interactive(self) -> bool {
        !matches!(self, ActivityKind::Simple)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Midday,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Midday,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    /// Morning 05-11, midday 12-17, evening 18-22, night 23-04.
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            5..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Midday,
            18..=22 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn now() -> Self {
        Self::from_hour(Local::now().hour())
    }

    /// Energy level that suits this part of the day.
    pub fn favored_energy(self) -> EnergyLevel {
        match self {
            TimeOfDay::Morning => EnergyLevel::High,
            TimeOfDay::Midday => EnergyLevel::Medium,
            TimeOfDay::Evening | TimeOfDay::Night => EnergyLevel::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Midday => "midday",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    Short,
    Long,
}

impl BreakKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BreakKind::Short => "short",
            BreakKind::Long => "long",
        }
    }
}

macro_rules! impl_text_enum {
    ($ty:ty, $label:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CatalogError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|v: &$ty| v.as_str() == s)
                    .ok_or_else(|| CatalogError::UnknownValue {
                        kind: $label,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::Simple => "simple",
            ActivityType::Breathing => "breathing",
            ActivityType::Stretch => "stretch",
        }
    }
}

impl EnergyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EnergyLevel::Low => "low",
            EnergyLevel::Medium => "medium",
            EnergyLevel::High => "high",
        }
    }
}

impl_text_enum!(ActivityType, "activity type", [ActivityType::Simple, ActivityType::Breathing, ActivityType::Stretch]);
impl_text_enum!(TimeOfDay, "time of day", [TimeOfDay::Morning, TimeOfDay::Midday, TimeOfDay::Evening, TimeOfDay::Night]);
impl_text_enum!(EnergyLevel, "energy level", [EnergyLevel::Low, EnergyLevel::Medium, EnergyLevel::High]);
impl_text_enum!(BreakKind, "break kind", [BreakKind::Short, BreakKind::Long]);

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub title: String,
    pub description: String,
    pub glyph: String,
    pub kind: ActivityKind,
    /// Parts of the day this activity suits. `None` suits any time.
    #[serde(default)]
    pub time_affinity: Option<Vec<TimeOfDay>>,
    #[serde(default)]
    pub energy_level: Option<EnergyLevel>,
}

impl Activity {
    pub fn activity_type(&self) -> ActivityType {
        self.kind.activity_type()
    }

    /// True when the activity has no affinity or lists `time`.
    pub fn suits(&self, time: TimeOfDay) -> bool {
        self.time_affinity
            .as_ref()
            .map_or(true, |times| times.contains(&time))
    }

    /// True only when the activity explicitly lists `time`.
    pub fn has_affinity(&self, time: TimeOfDay) -> bool {
        self.time_affinity
            .as_ref()
            .is_some_and(|times| times.contains(&time))
    }
}

/// User activity preferences, read from settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityPreferences {
    #[serde(default)]
    pub preferred_types: std::collections::BTreeSet<ActivityType>,
    #[serde(default)]
    pub energy_level: EnergyLevel,
    #[serde(default)]
    pub avoid_types: std::collections::BTreeSet<ActivityType>,
}

/// The selection query for one break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakContext {
    pub kind: BreakKind,
    pub time_of_day: TimeOfDay,
    pub preferences: ActivityPreferences,
}
