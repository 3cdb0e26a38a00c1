//! Audio module
//!
//! Sound assets and the players that sound them.

pub mod assets;
pub mod player;

pub use assets::SoundBank;
#[cfg(feature = "playback")]
pub use player::RodioPlayer;
pub use player::{CommandPlayer, CuePlayer, SilentPlayer};
