//! State management module
//!
//! The stage sequence, the countdown clock with its cue bookkeeping, and the
//! shared application state that owns them.

pub mod app_state;
pub mod command;
pub mod cues;
pub mod sequence;
pub mod session;
pub mod snapshot;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use command::Command;
pub use cues::{Cue, CueSet};
pub use sequence::{Sequence, Stage, StageKind};
pub use session::{CuePlayback, Session, Volumes};
pub use snapshot::TimerSnapshot;
pub use timer_state::TimerState;
