//! Break orchestrator.
//!
//! Top-level mode switch between work and breaks. Like the countdown and
//! the steppers it has no thread of its own: the caller ticks it once per
//! second and receives the resulting events.
//!
//! ## Modes
//!
//! ```text
//! Idle --trigger/expiry--> Selecting --interactive pick--> Active
//!  ^                        |    ^                           |
//!  |                        |    +-----back_to_selection-----+
//!  +---complete/skip/0s-----+<----------stepper done---------+
//! ```
//!
//! In `Idle` the work countdown runs toward the next break. In
//! `Selecting` the break countdown runs and a simple activity (or none)
//! is shown. In `Active` a breathing or stretch stepper runs and the
//! break countdown is held; the stepper's completion ends the break.

mod clock;
mod planner;

pub use clock::{Clock, FixedClock, SystemClock};
pub use planner::BreakPlanner;

use chrono::Utc;
use rand::Rng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::activity::{
    Activity, ActivityKind, ActivitySelector, BreakContext, BreakKind, TimeOfDay,
};
use crate::error::{CoreError, Result, ValidationError};
use crate::events::Event;
use crate::sound::{AmbientSound, NullSound, SoundKind};
use crate::stepper::{BreathingSession, BreathingSnapshot, StretchSession, StretchSnapshot};
use crate::storage::{Settings, SettingsStore};
use crate::timer::{status_line, CountdownSnapshot, CountdownTimer, Tickable, TimerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakMode {
    Idle,
    Selecting,
    Active,
}

impl BreakMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BreakMode::Idle => "idle",
            BreakMode::Selecting => "selecting",
            BreakMode::Active => "active",
        }
    }
}

/// The stepper driving an interactive activity.
#[derive(Debug, Clone)]
pub enum ActiveStepper {
    Breathing(BreathingSession),
    Stretch(StretchSession),
}

impl ActiveStepper {
    fn destroy(&mut self) {
        match self {
            ActiveStepper::Breathing(session) => session.destroy(),
            ActiveStepper::Stretch(session) => session.destroy(),
        }
    }
}

impl Tickable for ActiveStepper {
    fn tick(&mut self) -> Vec<Event> {
        match self {
            ActiveStepper::Breathing(session) => session.tick(),
            ActiveStepper::Stretch(session) => session.tick(),
        }
    }

    fn is_running(&self) -> bool {
        match self {
            ActiveStepper::Breathing(session) => session.is_running(),
            ActiveStepper::Stretch(session) => session.is_running(),
        }
    }
}

/// One break from start to completion or skip.
#[derive(Debug, Clone)]
struct BreakSession {
    kind: BreakKind,
    time_of_day: TimeOfDay,
    countdown: CountdownTimer,
    /// Entries offered for manual selection.
    choices: Vec<Activity>,
    activity: Option<Activity>,
    stepper: Option<ActiveStepper>,
    sound_playing: bool,
}

/// Serializable snapshot of the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakStatus {
    pub mode: BreakMode,
    pub enabled: bool,
    pub status_line: String,
    pub work: CountdownSnapshot,
    pub next_break: BreakKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_kind: Option<BreakKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_countdown: Option<CountdownSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Activity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breathing: Option<BreathingSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stretch: Option<StretchSnapshot>,
}

/// Owns the settings, the work countdown and the current break.
pub struct BreakOrchestrator<R = Pcg64> {
    settings: Settings,
    store: Box<dyn SettingsStore>,
    selector: ActivitySelector<R>,
    clock: Box<dyn Clock>,
    sound: Box<dyn AmbientSound>,
    planner: BreakPlanner,
    work: CountdownTimer,
    current: Option<BreakSession>,
}

impl BreakOrchestrator<Pcg64> {
    /// Built-in catalog with an entropy-seeded selector.
    pub fn load(store: impl SettingsStore + 'static) -> Result<Self> {
        Self::new(store, ActivitySelector::from_entropy())
    }
}

impl<R: Rng> BreakOrchestrator<R> {
    /// Loads settings from `store`. The work countdown starts idle.
    pub fn new(store: impl SettingsStore + 'static, selector: ActivitySelector<R>) -> Result<Self> {
        let settings = store.load()?;
        let work = CountdownTimer::new(settings.work_interval_secs());
        Ok(Self {
            settings,
            store: Box::new(store),
            selector,
            clock: Box::new(SystemClock),
            sound: Box::new(NullSound),
            planner: BreakPlanner::new(),
            work,
            current: None,
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_sound(mut self, sound: impl AmbientSound + 'static) -> Self {
        self.sound = Box::new(sound);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> BreakMode {
        match &self.current {
            None => BreakMode::Idle,
            Some(BreakSession { stepper: None, .. }) => BreakMode::Selecting,
            Some(BreakSession { stepper: Some(_), .. }) => BreakMode::Active,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn planner(&self) -> &BreakPlanner {
        &self.planner
    }

    pub fn work_timer(&self) -> &CountdownTimer {
        &self.work
    }

    pub fn break_kind(&self) -> Option<BreakKind> {
        self.current.as_ref().map(|b| b.kind)
    }

    pub fn break_countdown(&self) -> Option<&CountdownTimer> {
        self.current.as_ref().map(|b| &b.countdown)
    }

    pub fn activity(&self) -> Option<&Activity> {
        self.current.as_ref().and_then(|b| b.activity.as_ref())
    }

    pub fn stepper(&self) -> Option<&ActiveStepper> {
        self.current.as_ref().and_then(|b| b.stepper.as_ref())
    }

    pub fn next_break_kind(&self) -> BreakKind {
        self.planner.next_kind(&self.settings.breaks)
    }

    /// During a break, the entries offered for manual selection. Otherwise
    /// what the next break would offer at the current time of day.
    pub fn activities(&self) -> Vec<Activity> {
        match &self.current {
            Some(session) => session.choices.clone(),
            None => self
                .selector
                .activities_for_time(self.next_break_kind(), self.clock.time_of_day()),
        }
    }

    /// Tray text for whichever countdown is current.
    pub fn status_line(&self) -> String {
        match &self.current {
            Some(session) => status_line(&session.countdown),
            None => status_line(&self.work),
        }
    }

    pub fn status(&self) -> BreakStatus {
        let session = self.current.as_ref();
        let (breathing, stretch) = match session.and_then(|s| s.stepper.as_ref()) {
            Some(ActiveStepper::Breathing(b)) => (Some(b.snapshot()), None),
            Some(ActiveStepper::Stretch(s)) => (None, Some(s.snapshot())),
            None => (None, None),
        };
        BreakStatus {
            mode: self.mode(),
            enabled: self.settings.enabled,
            status_line: self.status_line(),
            work: self.work.snapshot(),
            next_break: self.next_break_kind(),
            break_kind: session.map(|s| s.kind),
            time_of_day: session.map(|s| s.time_of_day),
            break_countdown: session.map(|s| s.countdown.snapshot()),
            activity: session.and_then(|s| s.activity.clone()),
            choices: session.map(|s| s.choices.clone()).unwrap_or_default(),
            breathing,
            stretch,
        }
    }

    // ── Commands: work countdown ─────────────────────────────────────

    /// Start the work countdown, optionally with a new length in seconds.
    pub fn start_timer(&mut self, secs: Option<u32>) -> Result<Vec<Event>> {
        self.require_idle("start the timer")?;
        let mut events = Vec::new();
        if let Some(secs) = secs {
            if self.work.is_active() {
                events.push(self.work.reset());
            }
            events.extend(self.work.set_duration(secs));
        } else if self.work.state() == TimerState::Completed {
            events.push(self.work.reset());
        }
        events.extend(self.work.start());
        Ok(events)
    }

    pub fn pause_timer(&mut self) -> Result<Option<Event>> {
        self.require_idle("pause the timer")?;
        Ok(self.work.pause())
    }

    pub fn resume_timer(&mut self) -> Result<Option<Event>> {
        self.require_idle("resume the timer")?;
        Ok(self.work.resume())
    }

    /// Stops the work countdown without triggering a break.
    pub fn stop_timer(&mut self) -> Result<Event> {
        self.require_idle("stop the timer")?;
        let event = self.work.reset();
        Ok(event)
    }

    // ── Commands: breaks ─────────────────────────────────────────────

    /// Start a break now. `None` lets the planner pick short or long.
    pub fn trigger_break(&mut self, kind: Option<BreakKind>) -> Result<Vec<Event>> {
        self.require_idle("start a break")?;
        let kind = kind.unwrap_or_else(|| self.next_break_kind());
        Ok(self.begin_break(kind))
    }

    /// Pick entry `index` of the manual selection list.
    pub fn choose_activity(&mut self, index: usize) -> Result<Vec<Event>> {
        let session = self.selecting_session("choose an activity")?;
        let activity = session.choices.get(index).cloned().ok_or_else(|| {
            ValidationError::OutOfBounds {
                collection: "activities".into(),
                index,
                len: session.choices.len(),
            }
        })?;
        Ok(self.engage(activity))
    }

    /// Re-run the weighted selection from the selection view.
    pub fn shuffle(&mut self) -> Result<Vec<Event>> {
        let session = self.selecting_session("shuffle")?;
        let ctx = BreakContext {
            kind: session.kind,
            time_of_day: session.time_of_day,
            preferences: self.settings.activity_preferences.clone(),
        };
        let activity = self.selector.select(&ctx);
        Ok(self.engage(activity))
    }

    /// Leave the interactive activity and resume the break countdown.
    pub fn back_to_selection(&mut self) -> Result<Vec<Event>> {
        let mode = self.mode();
        let Some(session) = self.current.as_mut().filter(|s| s.stepper.is_some()) else {
            return Err(CoreError::InvalidTransition {
                action: "go back to selection",
                mode: mode.as_str().into(),
            });
        };

        let mut events = Vec::new();
        if let Some(mut stepper) = session.stepper.take() {
            stepper.destroy();
        }
        if let Some(activity) = session.activity.take() {
            events.push(Event::ActivityLeft {
                title: activity.title,
                at: Utc::now(),
            });
        }
        events.extend(session.countdown.resume());
        Ok(events)
    }

    /// End the current break as completed and schedule the next one.
    pub fn complete(&mut self) -> Result<Vec<Event>> {
        if self.current.is_none() {
            return Err(CoreError::InvalidTransition {
                action: "complete a break",
                mode: BreakMode::Idle.as_str().into(),
            });
        }
        Ok(self.finish_break(false))
    }

    /// Valid in every mode. Ends any break and restarts the work countdown.
    pub fn skip(&mut self) -> Vec<Event> {
        if self.current.is_some() {
            return self.finish_break(true);
        }
        let mut events = vec![Event::BreakSkipped {
            kind: None,
            at: Utc::now(),
        }];
        self.reschedule(&mut events);
        events
    }

    // ── Commands: settings ───────────────────────────────────────────

    /// Persist `settings` and apply them. A work countdown that has not
    /// been started picks up the new interval at once, and re-enabling
    /// breaks outside a break schedules the next one.
    pub fn update_settings(&mut self, settings: Settings) -> Result<Vec<Event>> {
        self.store.save(&settings)?;
        let was_enabled = self.settings.enabled;
        self.settings = settings;
        let mut events = vec![Event::SettingsChanged { at: Utc::now() }];
        self.apply_settings(was_enabled, &mut events);
        tracing::info!("settings updated");
        Ok(events)
    }

    /// Re-read settings from the store and apply them.
    pub fn reload_settings(&mut self) -> Result<Vec<Event>> {
        let was_enabled = self.settings.enabled;
        self.settings = self.store.load()?;
        let mut events = Vec::new();
        self.apply_settings(was_enabled, &mut events);
        Ok(events)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn require_idle(&self, action: &'static str) -> Result<()> {
        match self.mode() {
            BreakMode::Idle => Ok(()),
            mode => Err(CoreError::InvalidTransition {
                action,
                mode: mode.as_str().into(),
            }),
        }
    }

    fn selecting_session(&self, action: &'static str) -> Result<&BreakSession> {
        match (&self.current, self.mode()) {
            (Some(session), BreakMode::Selecting) => Ok(session),
            (_, mode) => Err(CoreError::InvalidTransition {
                action,
                mode: mode.as_str().into(),
            }),
        }
    }

    fn begin_break(&mut self, kind: BreakKind) -> Vec<Event> {
        let worked = self.work.duration_secs().saturating_sub(self.work.time_left_secs());
        self.planner.record_work(worked);
        self.work.destroy();

        let time_of_day = self.clock.time_of_day();
        let duration_secs = self.settings.break_duration_secs(kind);
        let mut countdown = CountdownTimer::new(duration_secs);

        let mut events = vec![Event::BreakStarted {
            kind,
            time_of_day,
            duration_secs,
            at: Utc::now(),
        }];
        events.extend(countdown.start());
        tracing::info!(%kind, time = %time_of_day, duration_secs, "break started");

        let sound_playing = self.start_sound();
        self.current = Some(BreakSession {
            kind,
            time_of_day,
            countdown,
            choices: self.selector.activities_for_time(kind, time_of_day),
            activity: None,
            stepper: None,
            sound_playing,
        });

        if self.settings.auto_select_activity {
            let ctx = BreakContext {
                kind,
                time_of_day,
                preferences: self.settings.activity_preferences.clone(),
            };
            let activity = self.selector.select(&ctx);
            events.extend(self.engage(activity));
        }
        events
    }

    /// Show `activity`; interactive kinds start their stepper and hold the
    /// break countdown.
    fn engage(&mut self, activity: Activity) -> Vec<Event> {
        let Some(session) = self.current.as_mut() else {
            return Vec::new();
        };

        let mut events = vec![Event::ActivitySelected {
            title: activity.title.clone(),
            activity_type: activity.activity_type(),
            at: Utc::now(),
        }];

        let stepper = match activity.kind {
            ActivityKind::Simple => None,
            ActivityKind::Breathing => Some(ActiveStepper::Breathing(BreathingSession::from_key(
                self.settings.breathing.pattern,
                self.settings.breathing.cycles,
            ))),
            ActivityKind::Stretch { routine } => {
                Some(ActiveStepper::Stretch(StretchSession::from_kind(routine)))
            }
        };

        if let Some(mut stepper) = stepper {
            events.extend(session.countdown.pause());
            events.extend(match &mut stepper {
                ActiveStepper::Breathing(b) => b.start(),
                ActiveStepper::Stretch(s) => s.start(),
            });
            events.push(Event::ActivityEngaged {
                title: activity.title.clone(),
                activity_type: activity.activity_type(),
                at: Utc::now(),
            });
            session.stepper = Some(stepper);
        }
        tracing::debug!(title = %activity.title, "activity shown");
        session.activity = Some(activity);
        events
    }

    fn finish_break(&mut self, skipped: bool) -> Vec<Event> {
        let Some(mut session) = self.current.take() else {
            return Vec::new();
        };
        session.countdown.destroy();
        if let Some(stepper) = session.stepper.as_mut() {
            stepper.destroy();
        }
        if session.sound_playing {
            self.sound.stop();
        }
        self.planner.record_break(session.kind);

        let mut events = vec![if skipped {
            Event::BreakSkipped {
                kind: Some(session.kind),
                at: Utc::now(),
            }
        } else {
            Event::BreakCompleted {
                kind: session.kind,
                at: Utc::now(),
            }
        }];
        tracing::info!(kind = %session.kind, skipped, "break ended");
        self.reschedule(&mut events);
        events
    }

    fn apply_settings(&mut self, was_enabled: bool, events: &mut Vec<Event>) {
        if self.current.is_some() {
            // The work countdown is rebuilt when the break ends.
            return;
        }
        if self.settings.enabled && !was_enabled {
            self.reschedule(events);
            return;
        }
        if self.work.state() == TimerState::Idle {
            events.extend(self.work.set_duration(self.settings.work_interval_secs()));
        }
        if !self.settings.enabled {
            self.work.destroy();
        }
    }

    fn reschedule(&mut self, events: &mut Vec<Event>) {
        self.work = CountdownTimer::new(self.settings.work_interval_secs());
        if !self.settings.enabled {
            tracing::debug!("breaks disabled, nothing scheduled");
            return;
        }
        events.extend(self.work.start());
        events.push(Event::NextBreakScheduled {
            kind: self.next_break_kind(),
            in_secs: self.work.duration_secs(),
            at: Utc::now(),
        });
    }

    fn sound_wanted(&self) -> bool {
        self.settings.sound.enabled && self.settings.sound.kind != SoundKind::Silence
    }

    /// Returns whether a loop is now playing.
    fn start_sound(&mut self) -> bool {
        if !self.sound_wanted() {
            return false;
        }
        let kind = self.settings.sound.kind;
        match self.sound.play(kind, self.settings.sound.volume) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%kind, error = %e, "ambient sound unavailable");
                false
            }
        }
    }
}

impl<R: Rng> Tickable for BreakOrchestrator<R> {
    fn tick(&mut self) -> Vec<Event> {
        let Some(session) = self.current.as_mut() else {
            let mut events = self.work.tick();
            if events.iter().any(Event::is_completion) && self.settings.enabled {
                let kind = self.next_break_kind();
                events.extend(self.begin_break(kind));
            }
            return events;
        };

        let (events, done) = match session.stepper.as_mut() {
            Some(stepper) => {
                let events = stepper.tick();
                let done = events.iter().any(Event::is_completion);
                (events, done)
            }
            None => {
                let events = session.countdown.tick();
                let done = events.iter().any(Event::is_completion);
                (events, done)
            }
        };

        let mut events = events;
        if done {
            events.extend(self.finish_break(false));
        }
        events
    }

    fn is_running(&self) -> bool {
        match &self.current {
            None => self.work.is_running(),
            Some(session) => match &session.stepper {
                Some(stepper) => stepper.is_running(),
                None => session.countdown.is_running(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rand::SeedableRng;

    use super::*;
    use crate::activity::{ActivityPreferences, ActivityType, Catalog};
    use crate::sound::SoundError;
    use crate::storage::MemorySettingsStore;
    use crate::stepper::RoutineKind;

    fn orchestrator(settings: Settings, hour: u32) -> BreakOrchestrator {
        BreakOrchestrator::new(
            MemorySettingsStore::new(settings),
            ActivitySelector::seeded(5),
        )
        .unwrap()
        .with_clock(FixedClock::at_hour(hour))
    }

    fn manual() -> Settings {
        Settings {
            auto_select_activity: false,
            ..Default::default()
        }
    }

    fn simple(title: &str) -> Activity {
        Activity {
            title: title.into(),
            description: String::new(),
            glyph: String::new(),
            kind: ActivityKind::Simple,
            time_affinity: None,
            energy_level: None,
        }
    }

    fn tick_n(o: &mut BreakOrchestrator<impl Rng>, n: u32) -> Vec<Event> {
        (0..n).flat_map(|_| o.tick()).collect()
    }

    #[test]
    fn starts_idle_with_work_interval() {
        let o = orchestrator(Settings::default(), 9);
        assert_eq!(o.mode(), BreakMode::Idle);
        assert_eq!(o.work_timer().duration_secs(), 1200);
        assert!(!o.is_running());
        assert_eq!(o.status_line(), "⏹ 00:00");
    }

    #[test]
    fn work_expiry_starts_a_break() {
        let mut o = orchestrator(manual(), 9);
        o.start_timer(Some(3)).unwrap();
        let events = tick_n(&mut o, 3);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::BreakStarted { kind: BreakKind::Short, time_of_day: TimeOfDay::Morning, .. })));
        assert_eq!(o.mode(), BreakMode::Selecting);
        assert_eq!(o.break_countdown().unwrap().duration_secs(), 20);
        assert!(o.break_countdown().unwrap().is_active());
    }

    #[test]
    fn manual_selection_lists_time_filtered_entries() {
        let mut o = orchestrator(manual(), 23);
        o.trigger_break(Some(BreakKind::Short)).unwrap();
        let titles: Vec<String> = o.activities().into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["Breathe", "Evening breath"]);
        assert!(o.activity().is_none());

        let err = o.choose_activity(5).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfBounds { len: 2, .. })));
    }

    #[test]
    fn simple_activity_stays_in_selection_and_completes_at_zero() {
        let mut o = orchestrator(manual(), 23);
        o.trigger_break(Some(BreakKind::Short)).unwrap();
        o.choose_activity(0).unwrap();
        assert_eq!(o.mode(), BreakMode::Selecting);
        assert_eq!(o.activity().unwrap().title, "Breathe");

        let events = tick_n(&mut o, 20);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::BreakCompleted { kind: BreakKind::Short, .. })));
        assert_eq!(o.mode(), BreakMode::Idle);
        assert!(o.work_timer().is_active());
        assert!(events.iter().any(|e| matches!(e, Event::NextBreakScheduled { in_secs: 1200, .. })));
    }

    #[test]
    fn interactive_activity_holds_break_countdown() {
        let mut o = orchestrator(manual(), 23);
        o.trigger_break(Some(BreakKind::Short)).unwrap();
        let events = o.choose_activity(1).unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::ActivityEngaged { activity_type: ActivityType::Breathing, .. })));
        assert_eq!(o.mode(), BreakMode::Active);
        assert_eq!(o.status_line(), "⏸ 00:20 (Paused)");

        // Well past the nominal 20 s break, the stepper is still authoritative.
        tick_n(&mut o, 30);
        assert_eq!(o.mode(), BreakMode::Active);
        assert_eq!(o.break_countdown().unwrap().time_left_secs(), 20);

        // 4-7-8 x 3 cycles = 63 s in total.
        let events = tick_n(&mut o, 33);
        let completions = events.iter().filter(|e| matches!(e, Event::BreakCompleted { .. })).count();
        assert_eq!(completions, 1);
        assert_eq!(o.mode(), BreakMode::Idle);
    }

    #[test]
    fn stretch_activity_uses_its_routine() {
        let mut o = orchestrator(manual(), 14);
        o.trigger_break(Some(BreakKind::Long)).unwrap();
        let index = o
            .activities()
            .iter()
            .position(|a| a.title == "Workday stretch")
            .unwrap();
        o.choose_activity(index).unwrap();
        match o.stepper() {
            Some(ActiveStepper::Stretch(session)) => {
                assert_eq!(session.routine().kind, RoutineKind::Desk)
            }
            other => panic!("expected stretch stepper, got {other:?}"),
        }
        let status = o.status();
        assert_eq!(status.mode, BreakMode::Active);
        assert!(status.stretch.is_some());
        assert!(status.breathing.is_none());
    }

    #[test]
    fn back_to_selection_resumes_countdown() {
        let mut o = orchestrator(manual(), 23);
        o.trigger_break(Some(BreakKind::Short)).unwrap();
        tick_n(&mut o, 5);
        o.choose_activity(1).unwrap();
        tick_n(&mut o, 10);

        let events = o.back_to_selection().unwrap();
        assert!(matches!(events[0], Event::ActivityLeft { .. }));
        assert_eq!(o.mode(), BreakMode::Selecting);
        assert!(o.activity().is_none());
        assert_eq!(o.break_countdown().unwrap().time_left_secs(), 15);
        assert!(o.break_countdown().unwrap().is_active());

        assert!(o.back_to_selection().is_err());
    }

    #[test]
    fn auto_select_engages_immediately() {
        let settings = Settings {
            activity_preferences: ActivityPreferences {
                preferred_types: [ActivityType::Breathing].into_iter().collect(),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut o = orchestrator(settings, 23);
        let events = o.trigger_break(Some(BreakKind::Short)).unwrap();
        assert!(events.iter().any(|e| matches!(e, Event::ActivitySelected { .. })));
        assert_eq!(o.activity().unwrap().activity_type(), ActivityType::Breathing);
        assert_eq!(o.mode(), BreakMode::Active);
    }

    #[test]
    fn shuffle_only_from_selection() {
        let mut o = orchestrator(manual(), 23);
        assert!(o.shuffle().is_err());
        o.trigger_break(Some(BreakKind::Short)).unwrap();
        let events = o.shuffle().unwrap();
        assert!(matches!(events[0], Event::ActivitySelected { .. }));
        let picked = o.activity().unwrap();
        assert!(picked.suits(TimeOfDay::Night));
    }

    #[test]
    fn skip_is_valid_everywhere() {
        let mut o = orchestrator(manual(), 9);
        let events = o.skip();
        assert!(matches!(events[0], Event::BreakSkipped { kind: None, .. }));
        assert!(o.work_timer().is_active());

        o.trigger_break(None).unwrap();
        o.choose_activity(0).unwrap();
        let events = o.skip();
        assert!(matches!(events[0], Event::BreakSkipped { kind: Some(BreakKind::Short), .. }));
        assert_eq!(o.mode(), BreakMode::Idle);
    }

    #[test]
    fn complete_requires_a_break() {
        let mut o = orchestrator(manual(), 9);
        assert!(matches!(
            o.complete(),
            Err(CoreError::InvalidTransition { mode, .. }) if mode == "idle"
        ));
        o.trigger_break(Some(BreakKind::Long)).unwrap();
        let events = o.complete().unwrap();
        assert!(matches!(events[0], Event::BreakCompleted { kind: BreakKind::Long, .. }));
    }

    #[test]
    fn timer_commands_rejected_during_break() {
        let mut o = orchestrator(manual(), 9);
        o.trigger_break(None).unwrap();
        assert!(o.start_timer(None).is_err());
        assert!(o.pause_timer().is_err());
        assert!(o.trigger_break(None).is_err());
    }

    #[test]
    fn work_timer_commands() {
        let mut o = orchestrator(manual(), 9);
        assert_eq!(o.start_timer(None).unwrap().len(), 1);
        o.tick();
        assert_eq!(o.status_line(), "▶ 19:59");
        assert!(o.pause_timer().unwrap().is_some());
        assert_eq!(o.status_line(), "⏸ 19:59 (Paused)");
        assert!(o.resume_timer().unwrap().is_some());
        o.stop_timer().unwrap();
        assert_eq!(o.work_timer().time_left_secs(), 1200);
        assert!(!o.is_running());
    }

    #[test]
    fn third_scheduled_break_is_long() {
        let mut settings = manual();
        settings.breaks.short_interval_min = 1;
        settings.breaks.long_interval_min = 3;
        let mut o = orchestrator(settings, 9);
        o.start_timer(None).unwrap();

        let mut kinds = Vec::new();
        for _ in 0..3 {
            let events = tick_n(&mut o, 60);
            kinds.extend(events.iter().filter_map(|e| match e {
                Event::BreakStarted { kind, .. } => Some(*kind),
                _ => None,
            }));
            o.skip();
        }
        assert_eq!(kinds, vec![BreakKind::Short, BreakKind::Short, BreakKind::Long]);
    }

    #[test]
    fn disabled_settings_stop_scheduling() {
        let settings = Settings {
            enabled: false,
            ..manual()
        };
        let mut o = orchestrator(settings, 9);
        o.trigger_break(Some(BreakKind::Short)).unwrap();
        let events = o.complete().unwrap();
        assert!(!events.iter().any(|e| matches!(e, Event::NextBreakScheduled { .. })));
        assert!(!o.work_timer().is_active());
    }

    #[test]
    fn update_settings_saves_and_applies() {
        let mut o = orchestrator(Settings::default(), 9);
        let mut settings = o.settings().clone();
        settings.breaks.short_interval_min = 45;
        let events = o.update_settings(settings).unwrap();
        assert!(matches!(events[0], Event::SettingsChanged { .. }));
        assert!(matches!(events[1], Event::CountdownReset { duration_secs: 2700, .. }));
        assert_eq!(o.work_timer().duration_secs(), 45 * 60);
        o.reload_settings().unwrap();
        assert_eq!(o.settings().breaks.short_interval_min, 45);
    }

    #[test]
    fn re_enabling_breaks_schedules_the_next_one() {
        let mut o = orchestrator(manual(), 9);
        o.start_timer(None).unwrap();

        let mut settings = o.settings().clone();
        settings.enabled = false;
        o.update_settings(settings.clone()).unwrap();
        assert!(!o.work_timer().is_active());

        settings.enabled = true;
        let events = o.update_settings(settings).unwrap();
        assert!(o.work_timer().is_active());
        assert_eq!(o.work_timer().time_left_secs(), 1200);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::NextBreakScheduled { in_secs: 1200, .. })));
    }

    #[test]
    fn settings_change_during_break_leaves_work_timer_for_reschedule() {
        let mut o = orchestrator(manual(), 9);
        o.trigger_break(None).unwrap();
        let mut settings = o.settings().clone();
        settings.breaks.short_interval_min = 30;
        let events = o.update_settings(settings).unwrap();
        assert_eq!(events.len(), 1);

        let events = o.skip();
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::NextBreakScheduled { in_secs: 1800, .. })));
    }

    #[derive(Clone, Default)]
    struct RecordingSound {
        calls: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl AmbientSound for RecordingSound {
        fn play(&mut self, kind: SoundKind, volume: u32) -> std::result::Result<(), SoundError> {
            self.calls.lock().unwrap().push(format!("play {kind} {volume}"));
            if self.fail {
                return Err(SoundError::DeviceUnavailable("no output".into()));
            }
            Ok(())
        }

        fn stop(&mut self) {
            self.calls.lock().unwrap().push("stop".into());
        }
    }

    #[test]
    fn sound_follows_break_lifecycle() {
        let mut settings = manual();
        settings.sound.enabled = true;
        settings.sound.kind = SoundKind::Rain;
        let sound = RecordingSound::default();
        let mut o = orchestrator(settings, 9).with_sound(sound.clone());
        o.trigger_break(None).unwrap();
        o.skip();
        assert_eq!(*sound.calls.lock().unwrap(), vec!["play rain 30", "stop"]);
    }

    #[test]
    fn sound_stops_even_if_disabled_mid_break() {
        let mut settings = manual();
        settings.sound.enabled = true;
        settings.sound.kind = SoundKind::Rain;
        let sound = RecordingSound::default();
        let mut o = orchestrator(settings, 9).with_sound(sound.clone());
        o.trigger_break(None).unwrap();

        let mut settings = o.settings().clone();
        settings.sound.enabled = false;
        o.update_settings(settings).unwrap();
        o.skip();
        assert_eq!(*sound.calls.lock().unwrap(), vec!["play rain 30", "stop"]);
    }

    #[test]
    fn failed_playback_is_not_stopped() {
        let mut settings = manual();
        settings.sound.enabled = true;
        let sound = RecordingSound {
            fail: true,
            ..Default::default()
        };
        let mut o = orchestrator(settings, 9).with_sound(sound.clone());
        o.trigger_break(None).unwrap();
        o.skip();
        assert_eq!(*sound.calls.lock().unwrap(), vec!["play wind 30"]);
    }

    #[test]
    fn sound_failure_does_not_interrupt_break() {
        let mut settings = manual();
        settings.sound.enabled = true;
        let sound = RecordingSound {
            fail: true,
            ..Default::default()
        };
        let mut o = orchestrator(settings, 9).with_sound(sound);
        assert!(o.trigger_break(None).is_ok());
        assert_eq!(o.mode(), BreakMode::Selecting);
    }

    #[test]
    fn silence_never_plays() {
        let mut settings = manual();
        settings.sound.enabled = true;
        settings.sound.kind = SoundKind::Silence;
        let sound = RecordingSound::default();
        let mut o = orchestrator(settings, 9).with_sound(sound.clone());
        o.trigger_break(None).unwrap();
        o.skip();
        assert!(sound.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn custom_catalog_and_seed() {
        let catalog = Catalog::new(vec![simple("only")], vec![simple("only long")]).unwrap();
        let selector = ActivitySelector::new(catalog, Pcg64::seed_from_u64(1));
        let mut o = BreakOrchestrator::new(MemorySettingsStore::default(), selector)
            .unwrap()
            .with_clock(FixedClock::at_hour(3));
        o.trigger_break(Some(BreakKind::Long)).unwrap();
        assert_eq!(o.activity().unwrap().title, "only long");
    }
}
