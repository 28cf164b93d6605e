//! Breathing exercise stepper.
//!
//! A pattern is an ordered list of timed phases. One traversal of the
//! list is a cycle; the session repeats the pattern until `total_cycles`
//! cycles have completed, then reports `BreathingCompleted` once.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, ValidationError};
use crate::events::Event;
use crate::timer::{elapsed_pct, Tickable, TimerState};

pub const DEFAULT_CYCLES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Inhale,
    Hold,
    Exhale,
    Pause,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub kind: PhaseKind,
    pub duration_secs: u32,
    pub instruction: String,
}

impl Phase {
    fn new(kind: PhaseKind, duration_secs: u32, instruction: &str) -> Self {
        Self {
            kind,
            duration_secs,
            instruction: instruction.into(),
        }
    }
}

/// Built-in breathing patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PatternKey {
    /// 4-7-8 relaxing breath.
    #[default]
    #[serde(rename = "4-7-8")]
    FourSevenEight,
    /// Box breathing, four equal sides.
    #[serde(rename = "box")]
    Box,
}

impl PatternKey {
    pub const ALL: [PatternKey; 2] = [PatternKey::FourSevenEight, PatternKey::Box];

    pub fn as_str(self) -> &'static str {
        match self {
            PatternKey::FourSevenEight => "4-7-8",
            PatternKey::Box => "box",
        }
    }

    pub fn pattern(self) -> BreathingPattern {
        let phases = match self {
            PatternKey::FourSevenEight => vec![
                Phase::new(PhaseKind::Inhale, 4, "Breathe in"),
                Phase::new(PhaseKind::Hold, 7, "Hold your breath"),
                Phase::new(PhaseKind::Exhale, 8, "Breathe out"),
                Phase::new(PhaseKind::Pause, 2, "Rest"),
            ],
            PatternKey::Box => vec![
                Phase::new(PhaseKind::Inhale, 4, "Breathe in"),
                Phase::new(PhaseKind::Hold, 4, "Hold"),
                Phase::new(PhaseKind::Exhale, 4, "Breathe out"),
                Phase::new(PhaseKind::Pause, 4, "Rest"),
            ],
        };
        let (name, description, glyph) = match self {
            PatternKey::FourSevenEight => ("4-7-8 Technique", "Classic calming breath", "ᚨᚾᛞ"),
            PatternKey::Box => ("Box Breathing", "Square breathing for balance", "ᚠᚤᚱ"),
        };
        BreathingPattern {
            key: self,
            name: name.into(),
            description: description.into(),
            glyph: glyph.into(),
            phases,
        }
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatternKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownPattern(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PatternFields")]
pub struct BreathingPattern {
    pub key: PatternKey,
    pub name: String,
    pub description: String,
    pub glyph: String,
    phases: Vec<Phase>,
}

/// Unvalidated wire form of [`BreathingPattern`].
#[derive(Deserialize)]
struct PatternFields {
    key: PatternKey,
    name: String,
    description: String,
    glyph: String,
    phases: Vec<Phase>,
}

impl TryFrom<PatternFields> for BreathingPattern {
    type Error = ValidationError;

    fn try_from(f: PatternFields) -> Result<Self, Self::Error> {
        Self::new(f.key, f.name, f.description, f.glyph, f.phases)
    }
}

impl BreathingPattern {
    /// Build a pattern, rejecting an empty phase list or a zero-second phase.
    pub fn new(
        key: PatternKey,
        name: impl Into<String>,
        description: impl Into<String>,
        glyph: impl Into<String>,
        phases: Vec<Phase>,
    ) -> Result<Self, ValidationError> {
        if phases.is_empty() {
            return Err(ValidationError::EmptyCollection("breathing phases".into()));
        }
        if let Some(index) = phases.iter().position(|p| p.duration_secs == 0) {
            return Err(ValidationError::ZeroDuration {
                collection: "breathing phases".into(),
                index,
            });
        }
        Ok(Self {
            key,
            name: name.into(),
            description: description.into(),
            glyph: glyph.into(),
            phases,
        })
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn cycle_secs(&self) -> u32 {
        self.phases.iter().map(|p| p.duration_secs).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingSnapshot {
    pub state: TimerState,
    pub pattern: PatternKey,
    pub phase_index: usize,
    pub phase: Phase,
    pub time_left_secs: u32,
    pub cycles_completed: u32,
    pub total_cycles: u32,
    pub phase_progress_pct: f64,
    pub overall_progress_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreathingSession {
    pattern: BreathingPattern,
    state: TimerState,
    phase_index: usize,
    time_left_secs: u32,
    cycles_completed: u32,
    total_cycles: u32,
    phase_progress_pct: f64,
    overall_progress_pct: f64,
}

impl BreathingSession {
    /// `total_cycles` below one is treated as one.
    pub fn new(pattern: BreathingPattern, total_cycles: u32) -> Self {
        let time_left_secs = pattern.phases[0].duration_secs;
        Self {
            pattern,
            state: TimerState::Idle,
            phase_index: 0,
            time_left_secs,
            cycles_completed: 0,
            total_cycles: total_cycles.max(1),
            phase_progress_pct: 0.0,
            overall_progress_pct: 0.0,
        }
    }

    pub fn from_key(key: PatternKey, total_cycles: u32) -> Self {
        Self::new(key.pattern(), total_cycles)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn pattern(&self) -> &BreathingPattern {
        &self.pattern
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn current_phase(&self) -> &Phase {
        &self.pattern.phases[self.phase_index]
    }

    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    pub fn total_cycles(&self) -> u32 {
        self.total_cycles
    }

    pub fn is_complete(&self) -> bool {
        self.state == TimerState::Completed
    }

    pub fn phase_progress_pct(&self) -> f64 {
        self.phase_progress_pct
    }

    pub fn overall_progress_pct(&self) -> f64 {
        self.overall_progress_pct
    }

    /// Current animation scale for the breathing circle.
    pub fn scale(&self) -> f64 {
        breathing_scale(self.current_phase().kind, self.phase_progress_pct / 100.0)
    }

    pub fn total_secs(&self) -> u32 {
        self.pattern.cycle_secs().saturating_mul(self.total_cycles)
    }

    pub fn snapshot(&self) -> BreathingSnapshot {
        BreathingSnapshot {
            state: self.state,
            pattern: self.pattern.key,
            phase_index: self.phase_index,
            phase: self.current_phase().clone(),
            time_left_secs: self.time_left_secs,
            cycles_completed: self.cycles_completed,
            total_cycles: self.total_cycles,
            phase_progress_pct: self.phase_progress_pct,
            overall_progress_pct: self.overall_progress_pct,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin or resume. A paused session keeps its place in the phase.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::Paused => {
                self.state = TimerState::Running;
                Some(Event::BreathingStarted {
                    pattern: self.pattern.key,
                    total_cycles: self.total_cycles,
                    at: Utc::now(),
                })
            }
            TimerState::Running | TimerState::Completed => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        Some(Event::BreathingPaused { at: Utc::now() })
    }

    /// Back to the first phase of the first cycle. `total_cycles` is kept.
    pub fn reset(&mut self) -> Event {
        self.state = TimerState::Idle;
        self.phase_index = 0;
        self.time_left_secs = self.pattern.phases[0].duration_secs;
        self.cycles_completed = 0;
        self.phase_progress_pct = 0.0;
        self.overall_progress_pct = 0.0;
        Event::BreathingReset {
            pattern: self.pattern.key,
            at: Utc::now(),
        }
    }

    pub fn change_pattern(&mut self, pattern: BreathingPattern) -> Event {
        self.pause();
        self.pattern = pattern;
        self.reset()
    }

    pub fn destroy(&mut self) {
        self.pause();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn update_progress(&mut self) {
        let phase_duration = self.current_phase().duration_secs;
        self.phase_progress_pct = elapsed_pct(phase_duration, self.time_left_secs);

        let per_cycle = self.pattern.phases.len() as f64;
        let total_phases = f64::from(self.total_cycles) * per_cycle;
        let completed_phases = f64::from(self.cycles_completed) * per_cycle + self.phase_index as f64;
        self.overall_progress_pct =
            (completed_phases + self.phase_progress_pct / 100.0) / total_phases * 100.0;
    }

    fn advance(&mut self, events: &mut Vec<Event>) {
        let next = (self.phase_index + 1) % self.pattern.phases.len();

        if next == 0 {
            self.cycles_completed += 1;
            events.push(Event::BreathingCycleCompleted {
                cycles_completed: self.cycles_completed,
                total_cycles: self.total_cycles,
                at: Utc::now(),
            });

            if self.cycles_completed >= self.total_cycles {
                self.state = TimerState::Completed;
                tracing::debug!(pattern = %self.pattern.key, cycles = self.cycles_completed, "breathing session complete");
                events.push(Event::BreathingCompleted {
                    pattern: self.pattern.key,
                    cycles_completed: self.cycles_completed,
                    at: Utc::now(),
                });
                return;
            }
        }

        self.phase_index = next;
        let phase = &self.pattern.phases[next];
        self.time_left_secs = phase.duration_secs;
        events.push(Event::BreathingPhaseChanged {
            phase_index: next,
            phase: phase.kind,
            duration_secs: phase.duration_secs,
            instruction: phase.instruction.clone(),
            at: Utc::now(),
        });
    }
}

impl Tickable for BreathingSession {
    fn tick(&mut self) -> Vec<Event> {
        if self.state != TimerState::Running {
            return Vec::new();
        }

        self.time_left_secs = self.time_left_secs.saturating_sub(1);
        self.update_progress();

        let mut events = vec![Event::BreathingTick {
            phase_index: self.phase_index,
            phase: self.current_phase().kind,
            time_left_secs: self.time_left_secs,
            phase_progress_pct: self.phase_progress_pct,
            overall_progress_pct: self.overall_progress_pct,
            cycles_completed: self.cycles_completed,
            at: Utc::now(),
        }];

        if self.time_left_secs == 0 {
            self.advance(&mut events);
        }
        events
    }

    fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }
}

/// Scale of the breathing circle for a phase at `fraction` (0..1) of its
/// duration: inhale grows 1.0 -> 1.5, hold stays at 1.5, exhale shrinks
/// back to 1.0, pause stays at 1.0.
pub fn breathing_scale(kind: PhaseKind, fraction: f64) -> f64 {
    let fraction = fraction.clamp(0.0, 1.0);
    match kind {
        PhaseKind::Inhale => 1.0 + 0.5 * fraction,
        PhaseKind::Hold => 1.5,
        PhaseKind::Exhale => 1.5 - 0.5 * fraction,
        PhaseKind::Pause => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(durations: &[u32]) -> BreathingPattern {
        let kinds = [PhaseKind::Inhale, PhaseKind::Hold, PhaseKind::Exhale, PhaseKind::Pause];
        let phases = durations
            .iter()
            .enumerate()
            .map(|(i, &d)| Phase::new(kinds[i % 4], d, "step"))
            .collect();
        BreathingPattern::new(PatternKey::FourSevenEight, "test", "", "", phases).unwrap()
    }

    fn run(session: &mut BreathingSession, n: u32) -> Vec<Event> {
        (0..n).flat_map(|_| session.tick()).collect()
    }

    fn count_completed(events: &[Event]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, Event::BreathingCompleted { .. }))
            .count()
    }

    #[test]
    fn four_seven_eight_three_cycles() {
        let mut session = BreathingSession::new(pattern(&[4, 7, 8, 2]), 3);
        session.start();

        let first = run(&mut session, 21);
        assert_eq!(session.cycles_completed(), 1);
        assert_eq!(session.phase_index(), 0);
        assert_eq!(session.time_left_secs(), 4);
        assert_eq!(count_completed(&first), 0);

        let rest = run(&mut session, 42);
        assert_eq!(session.cycles_completed(), 3);
        assert_eq!(count_completed(&rest), 1);
        assert!(session.is_complete());
        assert_eq!(session.overall_progress_pct(), 100.0);

        assert!(run(&mut session, 30).is_empty());
    }

    #[test]
    fn phase_changes_follow_pattern_order() {
        let mut session = BreathingSession::from_key(PatternKey::FourSevenEight, 1);
        session.start();
        let events = run(&mut session, 21);
        let kinds: Vec<PhaseKind> = events
            .iter()
            .filter_map(|e| match e {
                Event::BreathingPhaseChanged { phase, .. } => Some(*phase),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec![PhaseKind::Hold, PhaseKind::Exhale, PhaseKind::Pause]);
    }

    #[test]
    fn overall_progress_interpolates_within_phase() {
        let mut session = BreathingSession::new(pattern(&[4, 4]), 2);
        session.start();
        run(&mut session, 2);
        // Half of the first of four phases.
        assert!((session.phase_progress_pct() - 50.0).abs() < 1e-9);
        assert!((session.overall_progress_pct() - 12.5).abs() < 1e-9);
    }

    #[test]
    fn pause_keeps_place_and_start_is_idempotent() {
        let mut session = BreathingSession::from_key(PatternKey::Box, 2);
        assert!(session.start().is_some());
        assert!(session.start().is_none());
        run(&mut session, 3);
        session.pause();
        assert!(run(&mut session, 5).is_empty());
        assert_eq!(session.time_left_secs(), 1);
        session.start();
        run(&mut session, 1);
        assert_eq!(session.phase_index(), 1);
    }

    #[test]
    fn reset_keeps_total_cycles() {
        let mut session = BreathingSession::from_key(PatternKey::Box, 5);
        session.start();
        run(&mut session, 20);
        assert_eq!(session.cycles_completed(), 1);
        session.reset();
        assert_eq!(session.cycles_completed(), 0);
        assert_eq!(session.phase_index(), 0);
        assert_eq!(session.total_cycles(), 5);
        assert_eq!(session.state(), TimerState::Idle);
        assert_eq!(session.overall_progress_pct(), 0.0);
    }

    #[test]
    fn change_pattern_stops_and_resets() {
        let mut session = BreathingSession::from_key(PatternKey::FourSevenEight, 3);
        session.start();
        run(&mut session, 10);
        session.change_pattern(PatternKey::Box.pattern());
        assert_eq!(session.pattern().key, PatternKey::Box);
        assert_eq!(session.state(), TimerState::Idle);
        assert_eq!(session.phase_index(), 0);
        assert_eq!(session.time_left_secs(), 4);
        assert_eq!(session.total_cycles(), 3);
    }

    #[test]
    fn zero_cycles_is_clamped() {
        let session = BreathingSession::from_key(PatternKey::Box, 0);
        assert_eq!(session.total_cycles(), 1);
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        let empty = BreathingPattern::new(PatternKey::Box, "x", "", "", vec![]);
        assert!(matches!(empty, Err(ValidationError::EmptyCollection(_))));

        let zero = BreathingPattern::new(
            PatternKey::Box,
            "x",
            "",
            "",
            vec![Phase::new(PhaseKind::Inhale, 4, ""), Phase::new(PhaseKind::Hold, 0, "")],
        );
        assert!(matches!(zero, Err(ValidationError::ZeroDuration { index: 1, .. })));
    }

    #[test]
    fn deserialized_patterns_are_validated() {
        let mut json = serde_json::to_value(PatternKey::Box.pattern()).unwrap();
        let back: BreathingPattern = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, PatternKey::Box.pattern());

        json["phases"] = serde_json::json!([]);
        let err = serde_json::from_value::<BreathingPattern>(json.clone()).unwrap_err();
        assert!(err.to_string().contains("breathing phases"));

        json["phases"] = serde_json::json!([{ "kind": "inhale", "duration_secs": 0, "instruction": "" }]);
        assert!(serde_json::from_value::<BreathingPattern>(json).is_err());
    }

    #[test]
    fn pattern_keys_parse_or_fail_fast() {
        assert_eq!("4-7-8".parse::<PatternKey>().unwrap(), PatternKey::FourSevenEight);
        assert_eq!("box".parse::<PatternKey>().unwrap(), PatternKey::Box);
        assert_eq!(
            "square".parse::<PatternKey>(),
            Err(CatalogError::UnknownPattern("square".into()))
        );
    }

    #[test]
    fn scale_mapping() {
        assert_eq!(breathing_scale(PhaseKind::Inhale, 0.0), 1.0);
        assert_eq!(breathing_scale(PhaseKind::Inhale, 0.5), 1.25);
        assert_eq!(breathing_scale(PhaseKind::Inhale, 1.0), 1.5);
        assert_eq!(breathing_scale(PhaseKind::Hold, 0.3), 1.5);
        assert_eq!(breathing_scale(PhaseKind::Exhale, 1.0), 1.0);
        assert_eq!(breathing_scale(PhaseKind::Exhale, 0.5), 1.25);
        assert_eq!(breathing_scale(PhaseKind::Pause, 0.9), 1.0);
        assert_eq!(breathing_scale(PhaseKind::Inhale, 7.0), 1.5);
    }
}
