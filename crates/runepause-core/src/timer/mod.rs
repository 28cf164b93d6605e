mod countdown;
mod status;

pub use countdown::{CountdownSnapshot, CountdownTimer, TimerState};
pub use status::{format_clock, status_line};

use crate::events::Event;

/// A state machine advanced by a periodic one-second callback.
///
/// Implementors do nothing on `tick()` unless they are running, so a
/// caller that ticks a paused or finished session gets no events back.
pub trait Tickable {
    fn tick(&mut self) -> Vec<Event>;

    fn is_running(&self) -> bool;
}

/// Percentage of `duration` that has elapsed when `left` remains.
///
/// A zero-length duration counts as fully elapsed.
pub(crate) fn elapsed_pct(duration: u32, left: u32) -> f64 {
    if duration == 0 {
        return 100.0;
    }
    let left = left.min(duration);
    f64::from(duration - left) / f64::from(duration) * 100.0
}
