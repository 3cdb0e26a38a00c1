//! Debate Timer - a moderator-controlled countdown for staged debate rounds
//!
//! This library provides the fixed stage sequence, a wall-clock countdown with
//! at-most-once audio cues per stage, and the HTTP control panel around it.

pub mod api;
pub mod audio;
pub mod config;
pub mod error;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{Result, TimerError};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
