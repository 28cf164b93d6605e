use clap::Args;
use runepause_core::activity::ActivitySelector;
use runepause_core::storage::SettingsStore;
use runepause_core::{Activity, BreakContext, BreakKind, TimeOfDay, TomlSettingsStore};

use super::CliResult;

#[derive(Args)]
pub struct SelectArgs {
    /// Break length: short or long
    #[arg(long, default_value = "short")]
    kind: BreakKind,
    /// morning, midday, evening or night (defaults to now)
    #[arg(long)]
    time: Option<TimeOfDay>,
    /// Seed for a reproducible pick
    #[arg(long)]
    seed: Option<u64>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Break length: short or long
    #[arg(long, default_value = "short")]
    kind: BreakKind,
    /// Only activities suited to this time of day
    #[arg(long)]
    time: Option<TimeOfDay>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run_select(args: SelectArgs) -> CliResult {
    let settings = TomlSettingsStore::default_location()?.load()?;
    let mut selector = match args.seed {
        Some(seed) => ActivitySelector::seeded(seed),
        None => ActivitySelector::from_entropy(),
    };
    let ctx = BreakContext {
        kind: args.kind,
        time_of_day: args.time.unwrap_or_else(TimeOfDay::now),
        preferences: settings.activity_preferences,
    };

    let activity = selector.select(&ctx);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&activity)?);
    } else {
        println!("{}", describe(&activity));
    }
    Ok(())
}

pub fn run_list(args: ListArgs) -> CliResult {
    let selector = ActivitySelector::from_entropy();
    let activities = match args.time {
        Some(time) => selector.activities_for_time(args.kind, time),
        None => selector.all_activities(args.kind).to_vec(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&activities)?);
        return Ok(());
    }
    for (i, activity) in activities.iter().enumerate() {
        println!("{i:>2}  {}", describe(activity));
    }
    Ok(())
}

fn describe(activity: &Activity) -> String {
    format!(
        "{} {} [{}] {}",
        activity.glyph,
        activity.title,
        activity.activity_type(),
        activity.description
    )
}
