use serde::Serialize;

use super::{Activity, ActivityKind, BreakKind, EnergyLevel, TimeOfDay};
use crate::error::ValidationError;
use crate::stepper::RoutineKind;

use EnergyLevel::{High, Low, Medium};
use TimeOfDay::{Evening, Midday, Morning, Night};

/// Activities available per break length. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    short: Vec<Activity>,
    long: Vec<Activity>,
}

impl Catalog {
    /// Both lists must be non-empty so selection always has a fallback.
    pub fn new(short: Vec<Activity>, long: Vec<Activity>) -> Result<Self, ValidationError> {
        if short.is_empty() {
            return Err(ValidationError::EmptyCollection("short-break activities".into()));
        }
        if long.is_empty() {
            return Err(ValidationError::EmptyCollection("long-break activities".into()));
        }
        Ok(Self { short, long })
    }

    pub fn builtin() -> Self {
        Self {
            short: vec![
                entry("Breathe", "Three deep breaths", "ᚨ", ActivityKind::Simple, &[Morning, Midday, Evening, Night], Low),
                entry("Rest your eyes", "Look away from the screen", "ᛋ", ActivityKind::Simple, &[Midday, Evening], Low),
                entry("Reach up", "Raise your arms above your head", "ᚱ", ActivityKind::Simple, &[Morning, Midday], Medium),
                entry("Morning breath", "Energizing breathing technique", "ᚨᚾᛞ", ActivityKind::Breathing, &[Morning], Medium),
                entry("Focus breath", "Breathing for concentration", "ᚠᛟᚲ", ActivityKind::Breathing, &[Midday], Medium),
                entry("Evening breath", "Relaxing breathing technique", "ᚱᛟ", ActivityKind::Breathing, &[Evening, Night], Low),
                entry("Quick stretch", "A short stretch sequence", "ᛊᚱᚨ", stretch(RoutineKind::Desk), &[Morning, Midday], Medium),
            ],
            long: vec![
                entry("Take a walk", "Walk around for a few minutes", "ᚠ", ActivityKind::Simple, &[Morning, Midday, Evening], High),
                entry("Drink water", "Rehydrate your body", "ᚲ", ActivityKind::Simple, &[Morning, Midday, Evening, Night], Low),
                entry("Rest completely", "Close your eyes and rest", "ᛁ", ActivityKind::Simple, &[Evening, Night], Low),
                entry("Morning yoga", "Energizing stretch routine", "ᛊᛏᚱ", stretch(RoutineKind::Full), &[Morning], High),
                entry("Workday stretch", "Desk-friendly exercises", "ᚨᚱᛒ", stretch(RoutineKind::Desk), &[Midday], Medium),
                entry("Evening stretch", "Relaxing stretches", "ᚲᚢᚨ", stretch(RoutineKind::Full), &[Evening], Low),
                entry("Deep breathing", "Advanced breathing technique", "ᚨᚾᛞ", ActivityKind::Breathing, &[Morning, Evening], Medium),
                entry("Meditation", "Guided mindfulness exercise", "ᛗᛖᛞ", ActivityKind::Breathing, &[Evening, Night], Low),
                entry("Full body stretch", "A complete stretch routine", "ᚺᛖᛚ", stretch(RoutineKind::Full), &[Morning, Evening], High),
            ],
        }
    }

    pub fn activities(&self, kind: BreakKind) -> &[Activity] {
        match kind {
            BreakKind::Short => &self.short,
            BreakKind::Long => &self.long,
        }
    }

    /// Activities that suit `time`, in catalog order.
    pub fn activities_for_time(&self, kind: BreakKind, time: TimeOfDay) -> Vec<&Activity> {
        self.activities(kind)
            .iter()
            .filter(|activity| activity.suits(time))
            .collect()
    }

    pub fn contains(&self, kind: BreakKind, activity: &Activity) -> bool {
        self.activities(kind).contains(activity)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn stretch(routine: RoutineKind) -> ActivityKind {
    ActivityKind::Stretch { routine }
}

fn entry(
    title: &str,
    description: &str,
    glyph: &str,
    kind: ActivityKind,
    times: &[TimeOfDay],
    energy: EnergyLevel,
) -> Activity {
    Activity {
        title: title.into(),
        description: description.into(),
        glyph: glyph.into(),
        kind,
        time_affinity: Some(times.to_vec()),
        energy_level: Some(energy),
    }
}
