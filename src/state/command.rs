//! Moderator actions

use super::Cue;

/// A moderator action applied at the start of an evaluation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Next,
    Prev,
    JumpTo { index: usize },
    JumpToThreeMinutes,
    SetKnockVolume { level: f32 },
    SetBellVolume { level: f32 },
    TestSound { cue: Cue },
}

impl Command {
    /// Short name used for last-action tracking and logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Reset => "reset",
            Command::Next => "next",
            Command::Prev => "prev",
            Command::JumpTo { .. } => "jump",
            Command::JumpToThreeMinutes => "jump-to-three-minutes",
            Command::SetKnockVolume { .. } => "knock-volume",
            Command::SetBellVolume { .. } => "bell-volume",
            Command::TestSound { .. } => "test-sound",
        }
    }
}
