//! Fire-and-forget cue playback
//!
//! Every player returns immediately and swallows its own failures: a cue that
//! cannot sound now is dropped, never retried.

use std::{process::Stdio, sync::Arc};

use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, info};

/// Something that can play a sound once without blocking the caller
pub trait CuePlayer: Send + Sync {
    fn play(&self, samples: Arc<[u8]>, volume: f32, key: &str);
}

/// Plays through PulseAudio's `paplay`, feeding the samples on stdin.
/// Must be called from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
}

impl CommandPlayer {
    pub fn new() -> Self {
        Self::with_program("paplay")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CommandPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// `paplay` volume scale, where 65536 is 100%
fn pulse_volume(volume: f32) -> u32 {
    (volume.clamp(0.0, 1.0) * 65536.0).round() as u32
}

impl CuePlayer for CommandPlayer {
    fn play(&self, samples: Arc<[u8]>, volume: f32, key: &str) {
        let program = self.program.clone();
        let key = key.to_string();

        tokio::spawn(async move {
            if let Err(e) = run_player(&program, &samples, volume).await {
                debug!("Playback of {} failed: {}", key, e);
            }
        });
    }
}

async fn run_player(program: &str, samples: &[u8], volume: f32) -> std::io::Result<()> {
    let mut child = Command::new(program)
        .arg(format!("--volume={}", pulse_volume(volume)))
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(samples).await?;
    }
    child.wait().await?;
    Ok(())
}

/// Plays through the default output device via rodio on a detached thread
#[cfg(feature = "playback")]
#[derive(Debug, Clone, Default)]
pub struct RodioPlayer;

#[cfg(feature = "playback")]
impl CuePlayer for RodioPlayer {
    fn play(&self, samples: Arc<[u8]>, volume: f32, key: &str) {
        let key = key.to_string();
        std::thread::spawn(move || {
            use rodio::{Decoder, OutputStream, Sink};
            use std::io::Cursor;

            let Ok((_stream, stream_handle)) = OutputStream::try_default() else {
                debug!("No audio output device for {}", key);
                return;
            };
            let Ok(source) = Decoder::new(Cursor::new(samples)) else {
                debug!("Could not decode {}", key);
                return;
            };
            let Ok(sink) = Sink::try_new(&stream_handle) else {
                return;
            };

            sink.set_volume(volume.clamp(0.0, 1.0));
            sink.append(source);
            sink.sleep_until_end();
        });
    }
}

/// Logs cues instead of playing them (`--mute`)
#[derive(Debug, Clone, Default)]
pub struct SilentPlayer;

impl CuePlayer for SilentPlayer {
    fn play(&self, samples: Arc<[u8]>, volume: f32, key: &str) {
        info!("Cue {} (muted, {} bytes at volume {:.2})", key, samples.len(), volume);
    }
}
