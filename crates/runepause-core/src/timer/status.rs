//! Tray/status text derived from countdown state.

use super::{CountdownTimer, TimerState};

/// Format seconds as `MM:SS`. Minutes are not wrapped at 60.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Status indicator text: `▶ 04:59`, `⏸ 04:59 (Paused)` or `⏹ 00:00`.
pub fn status_line(timer: &CountdownTimer) -> String {
    match timer.state() {
        TimerState::Running => format!("▶ {}", format_clock(timer.time_left_secs())),
        TimerState::Paused => format!("⏸ {} (Paused)", format_clock(timer.time_left_secs())),
        TimerState::Idle | TimerState::Completed => format!("⏹ {}", format_clock(0)),
    }
}
