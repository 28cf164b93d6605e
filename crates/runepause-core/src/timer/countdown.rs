//! Second-granularity countdown timer.
//!
//! Like the rest of the core, the countdown owns no thread. The caller
//! (normally [`crate::runtime::Ticker`]) calls `tick()` once per second
//! while the timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |
//!           v
//!       Completed  (tick reaches zero, or stop())
//! ```
//!
//! `reset()` and `set_duration()` return to `Idle` with the full duration.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{elapsed_pct, Tickable};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Point-in-time view of a countdown, suitable for a UI or a tray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub state: TimerState,
    pub is_active: bool,
    pub time_left_secs: u32,
    pub duration_secs: u32,
    /// 0.0 .. 100.0
    pub progress_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownTimer {
    duration_secs: u32,
    time_left_secs: u32,
    state: TimerState,
}

impl CountdownTimer {
    /// Create an idle countdown with `time_left == duration`.
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            time_left_secs: duration_secs,
            state: TimerState::Idle,
        }
    }

    /// Create a countdown that is already running.
    pub fn started(duration_secs: u32) -> Self {
        let mut timer = Self::new(duration_secs);
        timer.start();
        timer
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// 0.0 .. 100.0
    pub fn progress_pct(&self) -> f64 {
        elapsed_pct(self.duration_secs, self.time_left_secs)
    }

    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot {
            state: self.state,
            is_active: self.is_active(),
            time_left_secs: self.time_left_secs,
            duration_secs: self.duration_secs,
            progress_pct: self.progress_pct(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down. A no-op when already running or completed.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::Paused => {
                self.state = TimerState::Running;
                Some(Event::CountdownStarted {
                    duration_secs: self.duration_secs,
                    time_left_secs: self.time_left_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Running | TimerState::Completed => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        self.start()
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        Some(Event::CountdownPaused {
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Event {
        self.state = TimerState::Idle;
        self.time_left_secs = self.duration_secs;
        Event::CountdownReset {
            duration_secs: self.duration_secs,
            at: Utc::now(),
        }
    }

    /// Force the countdown to its end without reporting a completion.
    pub fn stop(&mut self) -> Event {
        self.state = TimerState::Completed;
        self.time_left_secs = 0;
        Event::CountdownStopped {
            duration_secs: self.duration_secs,
            at: Utc::now(),
        }
    }

    /// Change the duration. Ignored while running.
    pub fn set_duration(&mut self, duration_secs: u32) -> Option<Event> {
        if self.is_active() {
            tracing::debug!(duration_secs, "ignoring duration change on a running countdown");
            return None;
        }
        self.duration_secs = duration_secs;
        Some(self.reset())
    }

    /// Stop ticking for good. Safe to call any number of times.
    pub fn destroy(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }
}

impl Tickable for CountdownTimer {
    /// Returns a `CountdownTick`, followed by `CountdownCompleted` on the
    /// tick that reaches zero.
    fn tick(&mut self) -> Vec<Event> {
        if self.state != TimerState::Running {
            return Vec::new();
        }

        self.time_left_secs = self.time_left_secs.saturating_sub(1);
        let mut events = vec![Event::CountdownTick {
            time_left_secs: self.time_left_secs,
            duration_secs: self.duration_secs,
            progress_pct: self.progress_pct(),
            at: Utc::now(),
        }];

        if self.time_left_secs == 0 {
            self.state = TimerState::Completed;
            events.push(Event::CountdownCompleted {
                duration_secs: self.duration_secs,
                at: Utc::now(),
            });
        }
        events
    }

    fn is_running(&self) -> bool {
        self.is_active()
    }
}
