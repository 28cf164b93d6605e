//! Short/long break cadence.

use serde::{Deserialize, Serialize};

use crate::activity::BreakKind;
use crate::storage::BreakSettings;

/// Tracks work time since the last long break.
///
/// The next break is long once the minutes worked since the last long
/// break reach `long_interval_min`; every other break is short.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakPlanner {
    worked_secs_since_long: u64,
}

impl BreakPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn worked_secs_since_long(&self) -> u64 {
        self.worked_secs_since_long
    }

    pub fn next_kind(&self, breaks: &BreakSettings) -> BreakKind {
        let long_after = u64::from(breaks.long_interval_min) * 60;
        if long_after > 0 && self.worked_secs_since_long >= long_after {
            BreakKind::Long
        } else {
            BreakKind::Short
        }
    }

    pub fn record_work(&mut self, secs: u32) {
        self.worked_secs_since_long += u64::from(secs);
    }

    /// A long break clears the tally. Short breaks leave it alone.
    pub fn record_break(&mut self, kind: BreakKind) {
        if kind == BreakKind::Long {
            self.worked_secs_since_long = 0;
        }
    }
}
