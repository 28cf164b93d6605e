//! Integration tests for the full work/break cycle.
//!
//! Drives the orchestrator tick by tick the way a shell would, with a
//! TOML settings file on disk and a fixed clock.

use runepause_core::activity::ActivitySelector;
use runepause_core::storage::SettingsStore;
use runepause_core::{
    ActivityType, BreakKind, BreakMode, BreakOrchestrator, Event, FixedClock, Settings, Tickable,
    TomlSettingsStore,
};

fn write_settings(dir: &std::path::Path, settings: &Settings) -> TomlSettingsStore {
    let store = TomlSettingsStore::new(dir.join("settings.toml"));
    store.save(settings).unwrap();
    store
}

fn run(o: &mut BreakOrchestrator, ticks: u32) -> Vec<Event> {
    (0..ticks).flat_map(|_| o.tick()).collect()
}

#[test]
fn test_work_break_work_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.auto_select_activity = false;
    settings.breaks.short_interval_min = 1;
    settings.breaks.short_duration_secs = 10;
    let store = write_settings(dir.path(), &settings);

    let mut o = BreakOrchestrator::new(store, ActivitySelector::seeded(8))
        .unwrap()
        .with_clock(FixedClock::at_hour(15));
    o.start_timer(None).unwrap();

    let events = run(&mut o, 60);
    assert_eq!(o.mode(), BreakMode::Selecting);
    assert!(events.iter().any(|e| matches!(e, Event::BreakStarted { duration_secs: 10, .. })));

    // Nothing chosen: the break ends with its countdown.
    let events = run(&mut o, 10);
    assert!(events.iter().any(|e| matches!(e, Event::BreakCompleted { kind: BreakKind::Short, .. })));
    assert_eq!(o.mode(), BreakMode::Idle);
    assert_eq!(o.work_timer().time_left_secs(), 60);
    assert!(o.is_running());
}

#[test]
fn test_stretch_break_runs_past_nominal_length() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.auto_select_activity = false;
    let store = write_settings(dir.path(), &settings);

    let mut o = BreakOrchestrator::new(store, ActivitySelector::seeded(8))
        .unwrap()
        .with_clock(FixedClock::at_hour(9));
    o.trigger_break(Some(BreakKind::Short)).unwrap();

    let index = o
        .activities()
        .iter()
        .position(|a| a.activity_type() == ActivityType::Stretch)
        .unwrap();
    o.choose_activity(index).unwrap();
    assert_eq!(o.mode(), BreakMode::Active);

    // Desk routine: 30 + 20 + 25 + 30 seconds, far past the 20 s break.
    let events = run(&mut o, 104);
    assert_eq!(o.mode(), BreakMode::Active);
    let advanced = events
        .iter()
        .filter(|e| matches!(e, Event::StretchStepAdvanced { .. }))
        .count();
    assert_eq!(advanced, 3);

    let events = run(&mut o, 1);
    assert!(events.iter().any(|e| matches!(e, Event::StretchCompleted { .. })));
    assert!(events.iter().any(|e| matches!(e, Event::BreakCompleted { .. })));
    assert_eq!(o.mode(), BreakMode::Idle);
}

#[test]
fn test_settings_changes_persist_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_settings(dir.path(), &Settings::default());
    let path = store.path().to_path_buf();

    let mut o = BreakOrchestrator::new(store, ActivitySelector::seeded(1)).unwrap();
    let mut settings = o.settings().clone();
    settings.set("breaks.long_duration_secs", "600").unwrap();
    settings.set("sound.kind", "forest").unwrap();
    o.update_settings(settings).unwrap();

    let reread = TomlSettingsStore::new(path).load().unwrap();
    assert_eq!(reread.breaks.long_duration_secs, 600);
    assert_eq!(reread.get("sound.kind").as_deref(), Some("forest"));
}

#[test]
fn test_long_break_follows_long_interval() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.auto_select_activity = false;
    settings.breaks.short_interval_min = 1;
    settings.breaks.long_interval_min = 2;
    settings.breaks.long_duration_secs = 5;
    let store = write_settings(dir.path(), &settings);

    let mut o = BreakOrchestrator::new(store, ActivitySelector::seeded(3))
        .unwrap()
        .with_clock(FixedClock::at_hour(20));
    o.start_timer(None).unwrap();

    run(&mut o, 60);
    assert_eq!(o.break_kind(), Some(BreakKind::Short));
    o.skip();

    run(&mut o, 60);
    assert_eq!(o.break_kind(), Some(BreakKind::Long));
    let events = run(&mut o, 5);
    assert!(events.iter().any(|e| matches!(e, Event::BreakCompleted { kind: BreakKind::Long, .. })));
    assert_eq!(o.next_break_kind(), BreakKind::Short);
}

#[test]
fn test_events_serialize_with_type_tag() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_settings(dir.path(), &Settings::default());
    let mut o = BreakOrchestrator::new(store, ActivitySelector::seeded(2))
        .unwrap()
        .with_clock(FixedClock::at_hour(12));
    let events = o.trigger_break(Some(BreakKind::Long)).unwrap();
    let json = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(json["type"], "BreakStarted");
    assert_eq!(json["kind"], "long");
    assert_eq!(json["time_of_day"], "midday");
    assert_eq!(json["duration_secs"], 300);
}
