use clap::Args;
use runepause_core::stepper::{BreathingSession, PatternKey};
use runepause_core::storage::SettingsStore;
use runepause_core::TomlSettingsStore;

use super::{drive, emit, CliResult};

#[derive(Args)]
pub struct BreatheArgs {
    /// Breathing pattern: 4-7-8 or box (defaults to the configured one)
    #[arg(long)]
    pattern: Option<PatternKey>,
    /// Number of cycles (defaults to the configured count)
    #[arg(long)]
    cycles: Option<u32>,
    /// Tick without waiting a second between ticks
    #[arg(long)]
    fast: bool,
}

pub fn run(args: BreatheArgs) -> CliResult {
    let settings = TomlSettingsStore::default_location()?.load()?;
    let pattern = args.pattern.unwrap_or(settings.breathing.pattern);
    let cycles = args.cycles.unwrap_or(settings.breathing.cycles);

    let mut session = BreathingSession::from_key(pattern, cycles);
    let def = session.pattern();
    eprintln!(
        "{} {}: {} ({} cycles of {}s)",
        def.glyph,
        def.name,
        def.description,
        session.total_cycles(),
        def.cycle_secs()
    );

    if let Some(event) = session.start() {
        emit(&event)?;
    }
    drive(&mut session, args.fast)
}
