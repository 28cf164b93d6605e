pub mod breathe;
pub mod bridge;
pub mod config;
pub mod run;
pub mod select;
pub mod stretch;

use std::io::Write;

use runepause_core::{Event, Tickable};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Print one event as a JSON line on stdout.
pub fn emit(event: &Event) -> CliResult {
    let line = serde_json::to_string(event)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}")?;
    stdout.flush()?;
    Ok(())
}

/// Tick `target` until it emits a completion, printing every event.
///
/// With `fast` set, ticks follow each other without waiting.
pub fn drive<T: Tickable>(target: &mut T, fast: bool) -> CliResult {
    loop {
        if !fast {
            std::thread::sleep(std::time::Duration::from_secs(1));
        }
        let events = target.tick();
        if events.is_empty() && !target.is_running() {
            return Ok(());
        }
        for event in &events {
            emit(event)?;
        }
        if events.iter().any(Event::is_completion) {
            return Ok(());
        }
    }
}
