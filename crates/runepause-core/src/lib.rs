//! # Runepause Core Library
//!
//! Scheduling core for the Runepause break reminder: a work countdown that
//! triggers breaks, an activity selector that suggests what to do during
//! them, and guided breathing and stretch sessions. The `runepause` CLI and
//! any desktop shell are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Countdown**: second-granularity state machine; the caller invokes
//!   `tick()` once per second, or hands it to a [`runtime::Ticker`]
//! - **Steppers**: breathing (cyclic) and stretch (single pass) sessions
//! - **Activities**: built-in catalog and a seedable weighted selector
//! - **Orchestrator**: work/break mode switch, rescheduling, ambient sound
//! - **Storage**: TOML settings behind the [`SettingsStore`] trait
//!
//! ## Key Components
//!
//! - [`BreakOrchestrator`]: top-level state machine
//! - [`CountdownTimer`]: work and break countdowns
//! - [`BreathingSession`] / [`StretchSession`]: interactive activities
//! - [`ActivitySelector`]: smart activity choice
//! - [`bridge::dispatch`]: JSON command channel for shells

pub mod activity;
pub mod bridge;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod runtime;
pub mod sound;
pub mod stepper;
pub mod storage;
pub mod timer;

pub use activity::{
    Activity, ActivityKind, ActivityPreferences, ActivitySelector, ActivityType, BreakContext,
    BreakKind, Catalog, EnergyLevel, TimeOfDay,
};
pub use error::{CatalogError, ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use orchestrator::{BreakMode, BreakOrchestrator, BreakStatus, Clock, FixedClock, SystemClock};
pub use sound::{AmbientSound, NullSound, SoundKind};
pub use stepper::{BreathingSession, PatternKey, RoutineKind, StretchSession};
pub use storage::{Settings, SettingsStore, TomlSettingsStore};
pub use timer::{CountdownTimer, Tickable, TimerState};
