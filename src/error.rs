//! Error types shared across the timer

use std::{io, path::PathBuf};

use crate::state::Cue;

/// Result alias carrying [`TimerError`].
pub type Result<T> = std::result::Result<T, TimerError>;

/// Everything that can go wrong between startup and a moderator action.
#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    /// A sound asset could not be read at startup
    #[error("failed to load {cue} sound from {}: {source}", .path.display())]
    AssetLoad {
        cue: Cue,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A sound asset exists but holds no samples
    #[error("{cue} sound at {} is empty", .path.display())]
    EmptyAsset { cue: Cue, path: PathBuf },
    #[error("stage index {index} is out of range (sequence has {count} stages)")]
    StageOutOfRange { index: usize, count: usize },
    /// The 3:00 shortcut only applies to speaker turns
    #[error("stage {index} is not a speaker stage")]
    NotSpeakerStage { index: usize },
    #[error("volume {0} is outside 0.0..=1.0")]
    InvalidVolume(f32),
    #[error("unknown cue `{0}`")]
    UnknownCue(String),
    #[error("timer state lock poisoned")]
    StatePoisoned,
}
