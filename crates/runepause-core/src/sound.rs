//! Ambient sound collaborator.
//!
//! The core never produces audio itself. The orchestrator asks an
//! [`AmbientSound`] implementation to start a loop when a break begins
//! and to stop it when the break ends. Playback failures are reported
//! back but never interrupt a break.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundKind {
    #[default]
    Wind,
    Forest,
    Rain,
    Silence,
}

impl SoundKind {
    pub const ALL: [SoundKind; 4] = [
        SoundKind::Wind,
        SoundKind::Forest,
        SoundKind::Rain,
        SoundKind::Silence,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SoundKind::Wind => "wind",
            SoundKind::Forest => "forest",
            SoundKind::Rain => "rain",
            SoundKind::Silence => "silence",
        }
    }
}

impl fmt::Display for SoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownValue {
                kind: "sound",
                value: s.to_string(),
            })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SoundError {
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Playback failed: {0}")]
    Playback(String),
}

/// Something that can loop ambient audio during a break.
pub trait AmbientSound: Send {
    /// Start looping `kind` at `volume` (0..=100), replacing any current loop.
    fn play(&mut self, kind: SoundKind, volume: u32) -> Result<(), SoundError>;

    fn stop(&mut self);
}

/// Plays nothing. Used when no audio backend is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSound;

impl AmbientSound for NullSound {
    fn play(&mut self, kind: SoundKind, _volume: u32) -> Result<(), SoundError> {
        tracing::trace!(%kind, "null sound: play");
        Ok(())
    }

    fn stop(&mut self) {}
}
