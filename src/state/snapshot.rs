//! Read-only view of the timer for display

use serde::{Deserialize, Serialize};

use super::{Cue, StageKind, TimerState};

const RUNNING_MESSAGE: &str = "Running… (Pause / Next anytime)";
const PAUSED_MESSAGE: &str = "Paused — Waiting for moderator to press Start/Resume";

/// Everything the display needs after an evaluation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub stage_index: usize,
    pub stage_name: String,
    pub stage_kind: StageKind,
    pub total_count: usize,
    pub remaining_seconds: f64,
    pub total_seconds: u32,
    pub running: bool,
    /// `01 / 16 — Prep – Both Teams`
    pub header: String,
    /// Digital clock, `MM:SS`
    pub clock: String,
    /// Fraction of the stage still left, for the progress ring
    pub progress: f64,
    pub status_message: String,
    /// Whether the 3:00 shortcut is offered on this stage
    pub three_minute_shortcut: bool,
    pub cues_fired: Vec<Cue>,
}

impl TimerSnapshot {
    pub fn capture(timer: &TimerState) -> Self {
        let stage = timer.current_stage();
        let index = timer.current_index();
        let total_count = timer.sequence().len();
        let remaining = timer.remaining();
        let running = timer.is_running();

        Self {
            stage_index: index,
            stage_name: stage.name.clone(),
            stage_kind: stage.kind,
            total_count,
            remaining_seconds: remaining,
            total_seconds: stage.duration_seconds,
            running,
            header: format!("{:02} / {} — {}", index + 1, total_count, stage.name),
            clock: format_clock(remaining),
            progress: progress(remaining, stage.duration()),
            status_message: if running { RUNNING_MESSAGE } else { PAUSED_MESSAGE }.to_string(),
            three_minute_shortcut: stage.is_speaker(),
            cues_fired: timer.cues_fired().iter().collect(),
        }
    }
}

/// Format whole seconds as `MM:SS`, dropping any fraction
pub fn format_clock(seconds: f64) -> String {
    let whole = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

fn progress(remaining: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    (remaining / total).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::state::Sequence;

    #[test]
    fn clock_truncates_fractions() {
        assert_eq!(format_clock(900.0), "15:00");
        assert_eq!(format_clock(59.99), "00:59");
        assert_eq!(format_clock(0.004), "00:00");
        assert_eq!(format_clock(-3.0), "00:00");
    }

    #[test]
    fn captures_the_initial_display() {
        let timer = TimerState::new(Sequence::standard());
        let snap = TimerSnapshot::capture(&timer);

        assert_eq!(snap.stage_index, 0);
        assert_eq!(snap.total_count, 16);
        assert_eq!(snap.header, "01 / 16 — Prep – Both Teams");
        assert_eq!(snap.clock, "15:00");
        assert_eq!(snap.progress, 1.0);
        assert!(!snap.running);
        assert_eq!(snap.status_message, PAUSED_MESSAGE);
        assert!(!snap.three_minute_shortcut);
        assert!(snap.cues_fired.is_empty());
    }

    #[test]
    fn speaker_snapshot_offers_the_shortcut() {
        let t0 = Instant::now();
        let mut timer = TimerState::new(Sequence::standard());
        timer.jump_to(1, t0).unwrap();
        timer.advance(t0 + Duration::from_secs(120));

        let snap = TimerSnapshot::capture(&timer);
        assert!(snap.running);
        assert!(snap.three_minute_shortcut);
        assert_eq!(snap.clock, "02:00");
        assert_eq!(snap.progress, 0.5);
        assert_eq!(snap.status_message, RUNNING_MESSAGE);
    }

    #[test]
    fn serializes_cues_by_key() {
        let t0 = Instant::now();
        let mut timer = TimerState::new(Sequence::standard());
        timer.jump_to(1, t0).unwrap();
        timer.jump_to_three_minutes().unwrap();

        let json = serde_json::to_value(TimerSnapshot::capture(&timer)).unwrap();
        assert_eq!(json["cues_fired"], serde_json::json!(["knock-1"]));
        assert_eq!(json["stage_kind"], "speaker");
    }
}
