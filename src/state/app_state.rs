//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{Command, Sequence, Session, TimerSnapshot, TimerState, Volumes};
use crate::{
    audio::{CuePlayer, SoundBank},
    error::{Result, TimerError},
};

/// Shared state behind the control API and the evaluation loop.
///
/// The session sits behind a single lock that is held for a whole evaluation
/// pass, so passes never interleave.
pub struct AppState {
    session: Mutex<Session>,
    sounds: SoundBank,
    player: Arc<dyn CuePlayer>,
    /// How often the evaluation loop re-runs while the clock is running
    pub poll_interval: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Snapshot published after every evaluation pass
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a fresh session on the standard sequence
    pub fn new(
        sounds: SoundBank,
        player: Arc<dyn CuePlayer>,
        volumes: Volumes,
        poll_interval: Duration,
        host: String,
        port: u16,
    ) -> Self {
        let timer = TimerState::new(Sequence::standard());
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerSnapshot::capture(&timer));

        Self {
            session: Mutex::new(Session::new(timer, volumes)),
            sounds,
            player,
            poll_interval,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Apply a moderator command and run an evaluation pass
    pub fn dispatch(&self, command: Command) -> Result<TimerSnapshot> {
        info!("Moderator action: {:?}", command);
        let snapshot = self.evaluate(Some(command))?;
        self.record_action(command.name());
        Ok(snapshot)
    }

    /// Evaluation pass with no pending command, as driven by the polling loop
    pub fn poll(&self) -> Result<TimerSnapshot> {
        self.evaluate(None)
    }

    fn evaluate(&self, command: Option<Command>) -> Result<TimerSnapshot> {
        let now = Instant::now();
        let (cues, snapshot) = {
            let mut session = self.session.lock().map_err(|_| TimerError::StatePoisoned)?;
            let cues = session.evaluate(command, now)?;
            (cues, TimerSnapshot::capture(&session.timer))
        };

        for playback in cues {
            info!("Cue {} at volume {:.2}", playback.cue, playback.volume);
            self.player.play(
                self.sounds.samples(playback.cue),
                playback.volume,
                playback.cue.key(),
            );
        }

        // Notify the evaluation loop and any display watchers
        if let Err(e) = self.timer_update_tx.send(snapshot.clone()) {
            warn!("Failed to send timer update: {}", e);
        }

        Ok(snapshot)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Current display snapshot without advancing the clock
    pub fn snapshot(&self) -> Result<TimerSnapshot> {
        self.session
            .lock()
            .map(|session| TimerSnapshot::capture(&session.timer))
            .map_err(|_| TimerError::StatePoisoned)
    }

    pub fn volumes(&self) -> Result<Volumes> {
        self.session
            .lock()
            .map(|session| session.volumes)
            .map_err(|_| TimerError::StatePoisoned)
    }

    pub fn sequence(&self) -> Result<Sequence> {
        self.session
            .lock()
            .map(|session| session.timer.sequence().clone())
            .map_err(|_| TimerError::StatePoisoned)
    }

    /// Subscribe to the snapshot published after each pass
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
