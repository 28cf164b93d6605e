//! Weighted activity selection.
//!
//! ## Selection steps
//!
//! 1. Keep catalog entries that suit the time of day.
//! 2. Narrow to the preferred types, unless that leaves nothing.
//! 3. Drop avoided types, even if that leaves nothing.
//! 4. Weight each survivor (base 1, +2 time affinity, +1.5 energy that
//!    suits the time of day, +1 energy matching the user's preference).
//! 5. Draw one by weight.
//! 6. If step 3 emptied the set, fall back to the first entry of step 1,
//!    or to the first catalog entry for the break length.
//!
//! The random source is injected so a fixed seed yields a fixed sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use super::{Activity, BreakContext, BreakKind, Catalog, TimeOfDay};

pub struct ActivitySelector<R = Pcg64> {
    catalog: Catalog,
    rng: R,
}

impl ActivitySelector<Pcg64> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(Catalog::builtin(), Pcg64::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(Catalog::builtin(), Pcg64::from_entropy())
    }
}

impl<R: Rng> ActivitySelector<R> {
    pub fn new(catalog: Catalog, rng: R) -> Self {
        Self { catalog, rng }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Unweighted list for manual selection.
    pub fn activities_for_time(&self, kind: BreakKind, time: TimeOfDay) -> Vec<Activity> {
        self.catalog
            .activities_for_time(kind, time)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn all_activities(&self, kind: BreakKind) -> &[Activity] {
        self.catalog.activities(kind)
    }

    /// Pick an activity for the break. Always returns a catalog entry.
    pub fn select(&mut self, ctx: &BreakContext) -> Activity {
        let pool = self.catalog.activities(ctx.kind);
        let timed = self.catalog.activities_for_time(ctx.kind, ctx.time_of_day);
        let prefs = &ctx.preferences;

        let mut candidates = timed.clone();
        if !prefs.preferred_types.is_empty() {
            let narrowed: Vec<&Activity> = candidates
                .iter()
                .copied()
                .filter(|a| prefs.preferred_types.contains(&a.activity_type()))
                .collect();
            if !narrowed.is_empty() {
                candidates = narrowed;
            }
        }
        candidates.retain(|a| !prefs.avoid_types.contains(&a.activity_type()));

        let weighted: Vec<(&Activity, f64)> = candidates
            .into_iter()
            .map(|a| (a, weight(a, ctx)))
            .collect();

        let chosen = match weighted_pick(&weighted, &mut self.rng) {
            Some(activity) => *activity,
            None => {
                // Catalog lists are non-empty by construction.
                let fallback = timed.first().copied().unwrap_or(&pool[0]);
                tracing::debug!(title = %fallback.title, "no candidates left after filtering, using fallback");
                fallback
            }
        };

        tracing::debug!(
            kind = %ctx.kind,
            time = %ctx.time_of_day,
            title = %chosen.title,
            "selected activity"
        );
        chosen.clone()
    }
}

/// Additive selection weight of `activity` for the break described by `ctx`.
pub fn weight(activity: &Activity, ctx: &BreakContext) -> f64 {
    let mut weight = 1.0;
    if activity.has_affinity(ctx.time_of_day) {
        weight += 2.0;
    }
    if activity.energy_level == Some(ctx.time_of_day.favored_energy()) {
        weight += 1.5;
    }
    if activity.energy_level == Some(ctx.preferences.energy_level) {
        weight += 1.0;
    }
    weight
}

/// Draw `r` in `[0, total)` and walk the items subtracting weights; the
/// first item that brings `r` to zero or below wins. Returns `None` only
/// for an empty slice.
pub fn weighted_pick<'a, T, R: Rng + ?Sized>(items: &'a [(T, f64)], rng: &mut R) -> Option<&'a T> {
    let total: f64 = items.iter().map(|(_, w)| w).sum();
    let mut remainder = rng.gen::<f64>() * total;

    for (item, weight) in items {
        remainder -= weight;
        if remainder <= 0.0 {
            return Some(item);
        }
    }
    // Rounding can leave a sliver of remainder past the last weight.
    items.last().map(|(item, _)| item)
}
