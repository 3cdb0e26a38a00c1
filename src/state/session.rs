//! Per-session state: the timer plus the moderator's volume settings

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Command, Cue, TimerState};
use crate::error::{Result, TimerError};

/// Default level for both sliders
pub const DEFAULT_VOLUME: f32 = 0.9;

/// Playback levels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volumes {
    pub knock: f32,
    pub bell: f32,
}

impl Volumes {
    /// Build from untrusted levels, clamping into range
    pub fn clamped(knock: f32, bell: f32) -> Self {
        let clamp = |v: f32| if v.is_nan() { DEFAULT_VOLUME } else { v.clamp(0.0, 1.0) };
        Self {
            knock: clamp(knock),
            bell: clamp(bell),
        }
    }

    /// Level a given cue plays at
    pub fn for_cue(&self, cue: Cue) -> f32 {
        if cue.is_knock() {
            self.knock
        } else {
            self.bell
        }
    }
}

impl Default for Volumes {
    fn default() -> Self {
        Self {
            knock: DEFAULT_VOLUME,
            bell: DEFAULT_VOLUME,
        }
    }
}

fn checked_volume(level: f32) -> Result<f32> {
    if (0.0..=1.0).contains(&level) {
        Ok(level)
    } else {
        Err(TimerError::InvalidVolume(level))
    }
}

/// A cue due for playback together with the level to play it at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuePlayback {
    pub cue: Cue,
    pub volume: f32,
}

/// Everything one moderator session owns
#[derive(Debug, Clone)]
pub struct Session {
    pub timer: TimerState,
    pub volumes: Volumes,
}

impl Session {
    pub fn new(timer: TimerState, volumes: Volumes) -> Self {
        Self { timer, volumes }
    }

    /// Run one evaluation pass: apply `command` (if any), tick, evaluate cues,
    /// then check for the end of the stage. A rejected command leaves the
    /// session untouched and skips the pass.
    pub fn evaluate(&mut self, command: Option<Command>, now: Instant) -> Result<Vec<CuePlayback>> {
        let mut cues = Vec::new();
        if let Some(command) = command {
            cues.extend(self.apply(command, now)?);
        }
        cues.extend(self.timer.advance(now));

        Ok(cues
            .into_iter()
            .map(|cue| CuePlayback {
                cue,
                volume: self.volumes.for_cue(cue),
            })
            .collect())
    }

    fn apply(&mut self, command: Command, now: Instant) -> Result<Option<Cue>> {
        match command {
            Command::Start => self.timer.start(now),
            Command::Pause => self.timer.pause(now),
            Command::Reset => self.timer.reset(),
            Command::Next => self.timer.next(now),
            Command::Prev => self.timer.prev(now),
            Command::JumpTo { index } => self.timer.jump_to(index, now)?,
            Command::JumpToThreeMinutes => return self.timer.jump_to_three_minutes(),
            Command::SetKnockVolume { level } => {
                self.volumes.knock = checked_volume(level)?;
                info!("Knock volume set to {:.2}", level);
            }
            Command::SetBellVolume { level } => {
                self.volumes.bell = checked_volume(level)?;
                info!("Bell volume set to {:.2}", level);
            }
            Command::TestSound { cue } => return Ok(Some(cue)),
        }
        Ok(None)
    }
}
