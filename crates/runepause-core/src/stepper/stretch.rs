//! Stretch routine stepper.
//!
//! Same shape as the breathing stepper but non-cyclic: a single pass over
//! the steps, then `StretchCompleted` once. The session stays on the last
//! step after completing.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, ValidationError};
use crate::events::Event;
use crate::timer::{elapsed_pct, Tickable, TimerState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StretchStep {
    pub name: String,
    pub description: String,
    pub duration_secs: u32,
    pub instruction: String,
    #[serde(default)]
    pub tip: Option<String>,
}

impl StretchStep {
    fn new(name: &str, description: &str, duration_secs: u32, instruction: &str, tip: &str) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            duration_secs,
            instruction: instruction.into(),
            tip: Some(tip.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineKind {
    #[default]
    Desk,
    Full,
}

impl RoutineKind {
    pub const ALL: [RoutineKind; 2] = [RoutineKind::Desk, RoutineKind::Full];

    pub fn as_str(self) -> &'static str {
        match self {
            RoutineKind::Desk => "desk",
            RoutineKind::Full => "full",
        }
    }

    pub fn routine(self) -> StretchRoutine {
        match self {
            RoutineKind::Desk => StretchRoutine {
                kind: self,
                name: "Desk Stretching".into(),
                description: "For long working days".into(),
                glyph: "ᛊᛏᚱᛖᚲ".into(),
                steps: vec![
                    StretchStep::new(
                        "Neck rotation",
                        "Gentle rotations to release tension",
                        30,
                        "Slowly roll your head in a circle, first to the right, then to the left.",
                        "Keep your shoulders relaxed",
                    ),
                    StretchStep::new(
                        "Shoulder rolls",
                        "Loosen the shoulders and upper back",
                        20,
                        "Lift your shoulders toward your ears, roll them back and let them drop.",
                        "Make big, slow movements",
                    ),
                    StretchStep::new(
                        "Arm reach",
                        "Stretch your arms overhead",
                        25,
                        "Reach straight up, interlace your fingers and stretch toward the ceiling.",
                        "Breathe deeply and feel the stretch",
                    ),
                    StretchStep::new(
                        "Side bend",
                        "Stretch along your sides",
                        30,
                        "Lean right with your right arm overhead. Repeat to the left.",
                        "Keep your hips facing forward",
                    ),
                ],
            },
            RoutineKind::Full => StretchRoutine {
                kind: self,
                name: "Full Body Stretch".into(),
                description: "A complete stretching routine".into(),
                glyph: "ᚺᛖᛚ".into(),
                steps: vec![
                    StretchStep::new(
                        "Cat stretch",
                        "Standing back stretch",
                        30,
                        "Bend forward, round your back like a cat, then arch backward.",
                        "Move slowly and with control",
                    ),
                    StretchStep::new(
                        "Calf stretch",
                        "Stretch the back of the legs",
                        40,
                        "Stand against a wall, step one foot back and press the heel down.",
                        "Keep the back leg straight",
                    ),
                    StretchStep::new(
                        "Hip flexors",
                        "Open up the hips",
                        35,
                        "Take a big step back and lower your body. Feel the stretch in the hip.",
                        "Keep your back straight",
                    ),
                    StretchStep::new(
                        "Shoulders and chest",
                        "Open the chest",
                        30,
                        "Draw your arms back and feel the stretch across the chest.",
                        "Keep your head upright",
                    ),
                    StretchStep::new(
                        "Full relaxation",
                        "Deep relaxation",
                        45,
                        "Stand tall, breathe deeply and let your whole body relax.",
                        "Focus on your breathing",
                    ),
                ],
            },
        }
    }
}

impl fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutineKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoutineKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownRoutine(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RoutineFields")]
pub struct StretchRoutine {
    pub kind: RoutineKind,
    pub name: String,
    pub description: String,
    pub glyph: String,
    steps: Vec<StretchStep>,
}

#[derive(Deserialize)]
struct RoutineFields {
    kind: RoutineKind,
    name: String,
    description: String,
    glyph: String,
    steps: Vec<StretchStep>,
}

impl TryFrom<RoutineFields> for StretchRoutine {
    type Error = ValidationError;

    fn try_from(f: RoutineFields) -> Result<Self, Self::Error> {
        Self::new(f.kind, f.name, f.description, f.glyph, f.steps)
    }
}

impl StretchRoutine {
    pub fn new(
        kind: RoutineKind,
        name: impl Into<String>,
        description: impl Into<String>,
        glyph: impl Into<String>,
        steps: Vec<StretchStep>,
    ) -> Result<Self, ValidationError> {
        if steps.is_empty() {
            return Err(ValidationError::EmptyCollection("stretch steps".into()));
        }
        if let Some(index) = steps.iter().position(|s| s.duration_secs == 0) {
            return Err(ValidationError::ZeroDuration {
                collection: "stretch steps".into(),
                index,
            });
        }
        Ok(Self {
            kind,
            name: name.into(),
            description: description.into(),
            glyph: glyph.into(),
            steps,
        })
    }

    pub fn steps(&self) -> &[StretchStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&StretchStep> {
        self.steps.get(index)
    }

    pub fn total_duration_secs(&self) -> u32 {
        self.steps.iter().map(|s| s.duration_secs).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StretchSnapshot {
    pub state: TimerState,
    pub routine: RoutineKind,
    pub step_index: usize,
    pub step: StretchStep,
    pub time_left_secs: u32,
    pub step_progress_pct: f64,
    pub progress_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StretchSession {
    routine: StretchRoutine,
    state: TimerState,
    step_index: usize,
    time_left_secs: u32,
    step_progress_pct: f64,
    progress_pct: f64,
}

impl StretchSession {
    pub fn new(routine: StretchRoutine) -> Self {
        let time_left_secs = routine.steps[0].duration_secs;
        Self {
            routine,
            state: TimerState::Idle,
            step_index: 0,
            time_left_secs,
            step_progress_pct: 0.0,
            progress_pct: 0.0,
        }
    }

    pub fn from_kind(kind: RoutineKind) -> Self {
        Self::new(kind.routine())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn routine(&self) -> &StretchRoutine {
        &self.routine
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn current_step(&self) -> &StretchStep {
        &self.routine.steps[self.step_index]
    }

    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    pub fn is_complete(&self) -> bool {
        self.state == TimerState::Completed
    }

    pub fn step_progress_pct(&self) -> f64 {
        self.step_progress_pct
    }

    /// Coarse routine progress: `(step_index + 1) / steps * 100`.
    pub fn progress_pct(&self) -> f64 {
        self.progress_pct
    }

    pub fn snapshot(&self) -> StretchSnapshot {
        StretchSnapshot {
            state: self.state,
            routine: self.routine.kind,
            step_index: self.step_index,
            step: self.current_step().clone(),
            time_left_secs: self.time_left_secs,
            step_progress_pct: self.step_progress_pct,
            progress_pct: self.progress_pct,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::Paused => {
                self.state = TimerState::Running;
                Some(Event::StretchStarted {
                    routine: self.routine.kind,
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
        Some(Event::StretchPaused { at: Utc::now() })
    }

    pub fn reset(&mut self) -> Event {
        self.state = TimerState::Idle;
        self.step_index = 0;
        self.time_left_secs = self.routine.steps[0].duration_secs;
        self.step_progress_pct = 0.0;
        self.progress_pct = 0.0;
        Event::StretchReset {
            routine: self.routine.kind,
            at: Utc::now(),
        }
    }

    pub fn change_routine(&mut self, routine: StretchRoutine) -> Event {
        self.pause();
        self.routine = routine;
        self.reset()
    }

    pub fn destroy(&mut self) {
        self.pause();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn update_progress(&mut self) {
        self.step_progress_pct = elapsed_pct(self.current_step().duration_secs, self.time_left_secs);
        self.progress_pct =
            (self.step_index + 1) as f64 / self.routine.steps.len() as f64 * 100.0;
    }

    fn advance(&mut self, events: &mut Vec<Event>) {
        if self.step_index + 1 >= self.routine.steps.len() {
            self.state = TimerState::Completed;
            tracing::debug!(routine = %self.routine.kind, "stretch routine complete");
            events.push(Event::StretchCompleted {
                routine: self.routine.kind,
                at: Utc::now(),
            });
            return;
        }

        self.step_index += 1;
        let step = &self.routine.steps[self.step_index];
        self.time_left_secs = step.duration_secs;
        events.push(Event::StretchStepAdvanced {
            step_index: self.step_index,
            name: step.name.clone(),
            duration_secs: step.duration_secs,
            at: Utc::now(),
        });
    }
}

impl Tickable for StretchSession {
    fn tick(&mut self) -> Vec<Event> {
        if self.state != TimerState::Running {
            return Vec::new();
        }

        self.time_left_secs = self.time_left_secs.saturating_sub(1);
        self.update_progress();

        let mut events = vec![Event::StretchTick {
            step_index: self.step_index,
            time_left_secs: self.time_left_secs,
            step_progress_pct: self.step_progress_pct,
            progress_pct: self.progress_pct,
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
