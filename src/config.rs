//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::state::Volumes;

/// Shortest poll interval accepted on the command line
const MIN_POLL_INTERVAL_MS: u64 = 50;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "debate-timer")]
#[command(about = "A moderator-controlled countdown timer for staged debates")]
#[command(version)]
pub struct Config {
    /// Port to bind the control panel to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding knock1.wav, knock2.wav and bell.wav
    #[arg(short, long, default_value = ".")]
    pub sounds_dir: PathBuf,

    /// How often a running clock is re-evaluated, in milliseconds
    #[arg(long, default_value = "500")]
    pub poll_interval_ms: u64,

    /// Initial knock volume (0.0 - 1.0)
    #[arg(long, default_value = "0.9")]
    pub knock_volume: f32,

    /// Initial bell volume (0.0 - 1.0)
    #[arg(long, default_value = "0.9")]
    pub bell_volume: f32,

    /// Log cues instead of playing them
    #[arg(long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    /// Starting slider levels, clamped into range
    pub fn volumes(&self) -> Volumes {
        Volumes::clamped(self.knock_volume, self.bell_volume)
    }
}
