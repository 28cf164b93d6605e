//! Request/response command channel for an enclosing shell.
//!
//! A shell (tray app, webview, pipe) sends [`Command`] values and gets
//! JSON back. Commands that change state answer with the events they
//! produced plus a fresh [`BreakStatus`](crate::orchestrator::BreakStatus).

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::activity::BreakKind;
use crate::error::Result;
use crate::events::Event;
use crate::orchestrator::BreakOrchestrator;
use crate::storage::Settings;
use crate::timer::Tickable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    StartTimer {
        #[serde(default)]
        secs: Option<u32>,
    },
    PauseTimer,
    ResumeTimer,
    StopTimer,
    GetStatus,
    /// Advance one second.
    Tick,
    TriggerBreak {
        #[serde(default)]
        kind: Option<BreakKind>,
    },
    ChooseActivity {
        index: usize,
    },
    Shuffle,
    BackToSelection,
    SkipBreak,
    CompleteBreak,
    LoadSettings,
    SaveSettings {
        settings: Settings,
    },
    ListActivities,
}

/// Run one command against the orchestrator.
///
/// # Errors
///
/// Returns an error for commands the current mode does not accept and
/// for settings that cannot be read or written.
pub fn dispatch<R: Rng>(orchestrator: &mut BreakOrchestrator<R>, command: Command) -> Result<Value> {
    tracing::debug!(?command, "bridge command");
    let events: Vec<Event> = match command {
        Command::GetStatus => return Ok(serde_json::to_value(orchestrator.status())?),
        Command::ListActivities => return Ok(serde_json::to_value(orchestrator.activities())?),
        Command::LoadSettings => {
            orchestrator.reload_settings()?;
            return Ok(serde_json::to_value(orchestrator.settings())?);
        }
        Command::StartTimer { secs } => orchestrator.start_timer(secs)?,
        Command::PauseTimer => orchestrator.pause_timer()?.into_iter().collect(),
        Command::ResumeTimer => orchestrator.resume_timer()?.into_iter().collect(),
        Command::StopTimer => vec![orchestrator.stop_timer()?],
        Command::Tick => orchestrator.tick(),
        Command::TriggerBreak { kind } => orchestrator.trigger_break(kind)?,
        Command::ChooseActivity { index } => orchestrator.choose_activity(index)?,
        Command::Shuffle => orchestrator.shuffle()?,
        Command::BackToSelection => orchestrator.back_to_selection()?,
        Command::SkipBreak => orchestrator.skip(),
        Command::CompleteBreak => orchestrator.complete()?,
        Command::SaveSettings { settings } => orchestrator.update_settings(settings)?,
    };

    Ok(json!({
        "events": events,
        "status": orchestrator.status(),
    }))
}

/// Error payload for a failed command.
pub fn error_response(message: impl std::fmt::Display) -> Value {
    json!({ "error": message.to_string() })
}
