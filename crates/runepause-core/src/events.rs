use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{ActivityType, BreakKind, TimeOfDay};
use crate::stepper::{PatternKey, PhaseKind, RoutineKind};

/// Every state change in the system produces an Event.
///
/// Commands and ticks return the events they caused; a shell renders
/// them, forwards them to a tray, or ignores them. The `*Tick` and
/// `*Completed` variants play the role of per-second and completion
/// callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CountdownStarted {
        duration_secs: u32,
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    CountdownPaused {
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    CountdownTick {
        time_left_secs: u32,
        duration_secs: u32,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
    CountdownReset {
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    CountdownStopped {
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    CountdownCompleted {
        duration_secs: u32,
        at: DateTime<Utc>,
    },

    BreathingStarted {
        pattern: PatternKey,
        total_cycles: u32,
        at: DateTime<Utc>,
    },
    BreathingPaused {
        at: DateTime<Utc>,
    },
    BreathingReset {
        pattern: PatternKey,
        at: DateTime<Utc>,
    },
    BreathingTick {
        phase_index: usize,
        phase: PhaseKind,
        time_left_secs: u32,
        phase_progress_pct: f64,
        overall_progress_pct: f64,
        cycles_completed: u32,
        at: DateTime<Utc>,
    },
    BreathingPhaseChanged {
        phase_index: usize,
        phase: PhaseKind,
        duration_secs: u32,
        instruction: String,
        at: DateTime<Utc>,
    },
    BreathingCycleCompleted {
        cycles_completed: u32,
        total_cycles: u32,
        at: DateTime<Utc>,
    },
    BreathingCompleted {
        pattern: PatternKey,
        cycles_completed: u32,
        at: DateTime<Utc>,
    },

    StretchStarted {
        routine: RoutineKind,
        at: DateTime<Utc>,
    },
    StretchPaused {
        at: DateTime<Utc>,
    },
    StretchReset {
        routine: RoutineKind,
        at: DateTime<Utc>,
    },
    StretchTick {
        step_index: usize,
        time_left_secs: u32,
        step_progress_pct: f64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
    StretchStepAdvanced {
        step_index: usize,
        name: String,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    StretchCompleted {
        routine: RoutineKind,
        at: DateTime<Utc>,
    },

    BreakStarted {
        kind: BreakKind,
        time_of_day: TimeOfDay,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    ActivitySelected {
        title: String,
        activity_type: ActivityType,
        at: DateTime<Utc>,
    },
    ActivityEngaged {
        title: String,
        activity_type: ActivityType,
        at: DateTime<Utc>,
    },
    /// User left an interactive activity and returned to the selection view.
    ActivityLeft {
        title: String,
        at: DateTime<Utc>,
    },
    BreakCompleted {
        kind: BreakKind,
        at: DateTime<Utc>,
    },
    BreakSkipped {
        kind: Option<BreakKind>,
        at: DateTime<Utc>,
    },
    NextBreakScheduled {
        kind: BreakKind,
        in_secs: u32,
        at: DateTime<Utc>,
    },
    SettingsChanged {
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True for the events that end a countdown or stepper session.
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Event::CountdownCompleted { .. }
                | Event::BreathingCompleted { .. }
                | Event::StretchCompleted { .. }
        )
    }
}
