//! Phase steppers for interactive break activities.
//!
//! Both steppers walk an ordered list of timed segments at one-second
//! granularity. Breathing loops over its phases for a fixed number of
//! cycles; stretching makes a single pass over its steps.

mod breathing;
mod stretch;

pub use breathing::{
    breathing_scale, BreathingPattern, BreathingSession, BreathingSnapshot, PatternKey, Phase,
    PhaseKind, DEFAULT_CYCLES,
};
pub use stretch::{RoutineKind, StretchRoutine, StretchSession, StretchSnapshot, StretchStep};
