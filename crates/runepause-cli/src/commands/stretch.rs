use clap::Args;
use runepause_core::stepper::{RoutineKind, StretchSession};
use runepause_core::storage::SettingsStore;
use runepause_core::TomlSettingsStore;

use super::{drive, emit, CliResult};

#[derive(Args)]
pub struct StretchArgs {
    /// Routine: desk or full (defaults to the configured one)
    #[arg(long)]
    routine: Option<RoutineKind>,
    /// Tick without waiting a second between ticks
    #[arg(long)]
    fast: bool,
}

pub fn run(args: StretchArgs) -> CliResult {
    let routine = match args.routine {
        Some(routine) => routine,
        None => {
            TomlSettingsStore::default_location()?
                .load()?
                .stretch
                .default_routine
        }
    };

    let mut session = StretchSession::from_kind(routine);
    let def = session.routine();
    eprintln!(
        "{} {}: {} ({} steps, {}s)",
        def.glyph,
        def.name,
        def.description,
        def.steps().len(),
        def.total_duration_secs()
    );
    for (i, step) in def.steps().iter().enumerate() {
        eprintln!("  {}. {} ({}s) {}", i + 1, step.name, step.duration_secs, step.instruction);
    }

    if let Some(event) = session.start() {
        emit(&event)?;
    }
    drive(&mut session, args.fast)
}
