use std::io::{BufRead, Write};

use runepause_core::bridge::{dispatch, error_response, Command};
use runepause_core::{BreakOrchestrator, TomlSettingsStore};

use super::CliResult;

/// One JSON command per stdin line, one JSON response per stdout line.
pub fn run() -> CliResult {
    let store = TomlSettingsStore::default_location()?;
    let mut orchestrator = BreakOrchestrator::load(store)?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Command>(&line) {
            Ok(command) => match dispatch(&mut orchestrator, command) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(error = %e, "bridge command failed");
                    error_response(e)
                }
            },
            Err(e) => error_response(format!("invalid command: {e}")),
        };
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}
