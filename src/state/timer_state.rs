//! Stage sequencer, countdown clock and per-activation cue tracking

use std::time::Instant;

use tracing::{debug, info};

use super::{
    cues::{due_threshold_cues, terminal_cue, THREE_MINUTE_MARK_REMAINING},
    Cue, CueSet, Sequence, Stage,
};
use crate::error::{Result, TimerError};

/// Remaining time at or below which a running stage counts as finished
pub const END_EPSILON: f64 = 0.01;

/// Countdown state for one session.
///
/// Time is measured from `Instant` deltas between evaluations, so the countdown
/// stays accurate however irregularly it is polled. The clock runs exactly
/// while `last_tick` is set.
#[derive(Debug, Clone)]
pub struct TimerState {
    sequence: Sequence,
    current_index: usize,
    remaining: f64,
    last_tick: Option<Instant>,
    cues_fired: CueSet,
}

impl TimerState {
    /// Create a paused timer on the first stage
    pub fn new(sequence: Sequence) -> Self {
        let remaining = sequence[0].duration();
        Self {
            sequence,
            current_index: 0,
            remaining,
            last_tick: None,
            cues_fired: CueSet::new(),
        }
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_stage(&self) -> &Stage {
        &self.sequence[self.current_index]
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn elapsed(&self) -> f64 {
        self.current_stage().duration() - self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.last_tick.is_some()
    }

    pub fn last_tick(&self) -> Option<Instant> {
        self.last_tick
    }

    pub fn cues_fired(&self) -> CueSet {
        self.cues_fired
    }

    // --- clock ---

    /// Start or resume the countdown. No-op while already running.
    pub fn start(&mut self, now: Instant) {
        if self.last_tick.is_none() {
            debug!("Clock started at {:.2}s remaining", self.remaining);
            self.last_tick = Some(now);
        }
    }

    /// Stop the countdown, banking the time spent since the last tick
    pub fn pause(&mut self, now: Instant) {
        if let Some(last) = self.last_tick.take() {
            self.consume(now.saturating_duration_since(last).as_secs_f64());
            debug!("Clock paused at {:.2}s remaining", self.remaining);
        }
    }

    /// Stop and rewind the current stage to its full duration
    pub fn reset(&mut self) {
        self.last_tick = None;
        self.activate(self.current_index);
    }

    /// Advance the countdown by the wall time since the previous tick
    pub fn tick(&mut self, now: Instant) {
        let Some(last) = self.last_tick else {
            return;
        };
        let delta = now.saturating_duration_since(last).as_secs_f64();
        self.last_tick = Some(now);
        self.consume(delta);
        debug!(
            "Tick: -{:.3}s, {:.2}s remaining on stage {}",
            delta, self.remaining, self.current_index
        );
    }

    fn consume(&mut self, seconds: f64) {
        self.remaining = (self.remaining - seconds).max(0.0);
    }

    // --- sequencer ---

    /// Make `index` the current stage and start it running
    pub fn jump_to(&mut self, index: usize, now: Instant) -> Result<()> {
        if index >= self.sequence.len() {
            return Err(TimerError::StageOutOfRange {
                index,
                count: self.sequence.len(),
            });
        }
        self.last_tick = None;
        self.activate(index);
        self.start(now);
        Ok(())
    }

    /// Pause and move to the following stage. Stays on the last stage.
    pub fn next(&mut self, now: Instant) {
        self.pause(now);
        let index = (self.current_index + 1).min(self.sequence.last_index());
        self.activate(index);
    }

    /// Pause and move to the preceding stage. Stays on the first stage.
    pub fn prev(&mut self, now: Instant) {
        self.pause(now);
        self.activate(self.current_index.saturating_sub(1));
    }

    fn activate(&mut self, index: usize) {
        self.current_index = index;
        self.remaining = self.sequence[index].duration();
        self.cues_fired.clear();
        info!(
            "Stage {}/{} active: {} ({}s)",
            index + 1,
            self.sequence.len(),
            self.sequence[index].name,
            self.sequence[index].duration_seconds
        );
    }

    // --- cues ---

    /// Put a speaker turn at 3:00 elapsed. Returns the first knock if it has
    /// not sounded yet this activation.
    pub fn jump_to_three_minutes(&mut self) -> Result<Option<Cue>> {
        if !self.current_stage().is_speaker() {
            return Err(TimerError::NotSpeakerStage {
                index: self.current_index,
            });
        }
        self.remaining = THREE_MINUTE_MARK_REMAINING.min(self.current_stage().duration());
        Ok(self.cues_fired.insert(Cue::Knock1).then_some(Cue::Knock1))
    }

    /// Cues whose elapsed-time threshold has been crossed this activation
    pub fn evaluate_cues(&mut self) -> Vec<Cue> {
        let kind = self.current_stage().kind;
        let elapsed = self.elapsed();
        due_threshold_cues(kind, elapsed, &mut self.cues_fired)
    }

    /// Stop a running stage that has run out and return its closing cues
    pub fn check_stage_end(&mut self) -> Vec<Cue> {
        if self.last_tick.is_none() || self.remaining > END_EPSILON {
            return Vec::new();
        }

        self.remaining = 0.0;
        self.last_tick = None;
        info!("Stage {} ended: {}", self.current_index + 1, self.current_stage().name);

        let kind = self.current_stage().kind;
        let mut cues = due_threshold_cues(kind, self.elapsed(), &mut self.cues_fired);
        cues.extend(terminal_cue(kind, &mut self.cues_fired));
        cues
    }

    /// One evaluation pass after any moderator command: tick, threshold cues,
    /// then end-of-stage handling.
    pub fn advance(&mut self, now: Instant) -> Vec<Cue> {
        self.tick(now);
        let mut cues = self.evaluate_cues();
        cues.extend(self.check_stage_end());
        cues
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::state::StageKind;

    const SPEAKER_1: usize = 1;
    const GAP_1: usize = 2;
    const TEAM_FEEDBACK: usize = 12;
    const LAST: usize = 15;

    fn timer() -> TimerState {
        TimerState::new(Sequence::standard())
    }

    fn secs(t0: Instant, s: f64) -> Instant {
        t0 + Duration::from_secs_f64(s)
    }

    fn assert_invariants(t: &TimerState) {
        assert!(t.remaining() >= 0.0);
        assert!(t.remaining() <= t.current_stage().duration());
        assert_eq!(t.is_running(), t.last_tick().is_some());
        for cue in t.cues_fired().iter() {
            assert!(cue.applies_to(t.current_stage().kind));
        }
    }

    #[test]
    fn starts_paused_on_prep_with_full_time() {
        let t = timer();
        assert_eq!(t.current_index(), 0);
        assert_eq!(t.remaining(), 900.0);
        assert!(!t.is_running());
        assert!(t.cues_fired().is_empty());
        assert_invariants(&t);
    }

    #[test]
    fn start_is_idempotent() {
        let t0 = Instant::now();
        let mut t = timer();
        t.start(t0);
        t.start(secs(t0, 5.0));
        assert_eq!(t.last_tick(), Some(t0));
    }

    #[test]
    fn pause_banks_elapsed_time_and_is_idempotent() {
        let t0 = Instant::now();
        let mut t = timer();
        t.start(t0);
        t.pause(secs(t0, 10.0));
        assert!((t.remaining() - 890.0).abs() < 1e-9);
        assert!(!t.is_running());

        t.pause(secs(t0, 50.0));
        assert!((t.remaining() - 890.0).abs() < 1e-9);
        assert_invariants(&t);
    }

    #[test]
    fn tick_is_a_no_op_while_paused() {
        let t0 = Instant::now();
        let mut t = timer();
        t.tick(secs(t0, 100.0));
        assert_eq!(t.remaining(), 900.0);
        assert!(!t.is_running());
    }

    #[test]
    fn ticks_measure_wall_time_not_call_count() {
        let t0 = Instant::now();
        let mut t = timer();
        t.start(t0);
        t.tick(secs(t0, 0.5));
        t.tick(secs(t0, 3.0));
        t.tick(secs(t0, 3.1));
        assert!((t.remaining() - 896.9).abs() < 1e-9);
    }

    #[test]
    fn remaining_never_increases_while_running() {
        let t0 = Instant::now();
        let mut t = timer();
        t.start(t0);
        let mut previous = t.remaining();
        for step in [0.4, 0.9, 0.9, 2.5, 7.0, 7.0, 30.0] {
            t.advance(secs(t0, step));
            assert!(t.remaining() <= previous);
            previous = t.remaining();
            assert_invariants(&t);
        }
    }

    #[test]
    fn reset_rewinds_and_pauses() {
        let t0 = Instant::now();
        let mut t = timer();
        t.jump_to(SPEAKER_1, t0).unwrap();
        t.advance(secs(t0, 200.0));
        assert!(t.cues_fired().contains(Cue::Knock1));

        t.reset();
        assert_eq!(t.current_index(), SPEAKER_1);
        assert_eq!(t.remaining(), 240.0);
        assert!(!t.is_running());
        assert!(t.cues_fired().is_empty());
    }

    #[test]
    fn prep_runs_out_and_rings_one_bell() {
        let t0 = Instant::now();
        let mut t = timer();
        t.start(t0);

        let cues = t.advance(secs(t0, 900.5));
        assert_eq!(cues, vec![Cue::Bell]);
        assert_eq!(t.remaining(), 0.0);
        assert!(!t.is_running());

        // Resuming at zero must not ring again
        t.start(secs(t0, 901.0));
        assert!(t.advance(secs(t0, 901.5)).is_empty());
        assert!(!t.is_running());
        assert_invariants(&t);
    }

    #[test]
    fn stage_ends_within_epsilon() {
        let t0 = Instant::now();
        let mut t = timer();
        t.jump_to(GAP_1, t0).unwrap();
        let cues = t.advance(secs(t0, 59.995));
        assert_eq!(cues, vec![Cue::Bell]);
        assert_eq!(t.remaining(), 0.0);
        assert!(!t.is_running());
    }

    #[test]
    fn team_feedback_rings_exactly_one_bell_and_no_knocks() {
        let t0 = Instant::now();
        let mut t = timer();
        t.jump_to(TEAM_FEEDBACK, t0).unwrap();
        assert_eq!(t.current_stage().kind, StageKind::TeamFeedback);

        let mut all = Vec::new();
        for s in [30.0, 60.0, 89.0, 90.0, 91.0, 120.0] {
            all.extend(t.advance(secs(t0, s)));
        }
        assert_eq!(all, vec![Cue::Bell]);
    }

    #[test]
    fn speaker_knocks_fire_once_each_and_never_ring_the_bell() {
        let t0 = Instant::now();
        let mut t = timer();
        t.jump_to(SPEAKER_1, t0).unwrap();

        let mut all = Vec::new();
        for s in [100.0, 179.0, 180.0, 181.0, 200.0, 239.0, 239.995, 240.0, 250.0] {
            all.extend(t.advance(secs(t0, s)));
            assert_invariants(&t);
        }
        assert_eq!(all, vec![Cue::Knock1, Cue::Knock2]);
        assert_eq!(t.remaining(), 0.0);
        assert!(!t.is_running());
    }

    #[test]
    fn speaker_ending_inside_epsilon_still_gets_second_knock() {
        let t0 = Instant::now();
        let mut t = timer();
        t.jump_to(SPEAKER_1, t0).unwrap();
        t.advance(secs(t0, 181.0));

        let cues = t.advance(secs(t0, 239.995));
        assert_eq!(cues, vec![Cue::Knock2]);
    }

    #[test]
    fn jump_to_starts_the_stage_fresh() {
        let t0 = Instant::now();
        let mut t = timer();
        t.jump_to(SPEAKER_1, t0).unwrap();
        assert!(t.is_running());
        assert_eq!(t.remaining(), 240.0);
        t.advance(secs(t0, 250.0));
        assert!(t.cues_fired().contains(Cue::Knock2));

        t.jump_to(SPEAKER_1, secs(t0, 300.0)).unwrap();
        assert!(t.is_running());
        assert_eq!(t.last_tick(), Some(secs(t0, 300.0)));
        assert!(t.cues_fired().is_empty());

        let cues = t.advance(secs(t0, 300.0 + 180.0));
        assert_eq!(cues, vec![Cue::Knock1]);
    }

    #[test]
    fn jump_to_rejects_out_of_range_without_changes() {
        let t0 = Instant::now();
        let mut t = timer();
        let err = t.jump_to(16, t0).unwrap_err();
        assert!(matches!(err, TimerError::StageOutOfRange { index: 16, count: 16 }));
        assert_eq!(t.current_index(), 0);
        assert!(!t.is_running());
    }

    #[test]
    fn next_pauses_and_does_not_auto_start() {
        let t0 = Instant::now();
        let mut t = timer();
        t.start(t0);
        t.next(secs(t0, 5.0));
        assert_eq!(t.current_index(), SPEAKER_1);
        assert_eq!(t.remaining(), 240.0);
        assert!(!t.is_running());
    }

    #[test]
    fn next_clamps_at_the_last_stage_but_rewinds_it() {
        let t0 = Instant::now();
        let mut t = timer();
        t.jump_to(LAST, t0).unwrap();
        t.advance(secs(t0, 95.0));
        assert!(t.cues_fired().contains(Cue::Bell));

        t.next(secs(t0, 96.0));
        assert_eq!(t.current_index(), LAST);
        assert_eq!(t.remaining(), 90.0);
        assert!(t.cues_fired().is_empty());
    }

    #[test]
    fn prev_at_first_stage_still_rewinds_and_clears_cues() {
        let t0 = Instant::now();
        let mut t = timer();
        t.start(t0);
        t.advance(secs(t0, 901.0));
        assert!(t.cues_fired().contains(Cue::Bell));

        t.prev(secs(t0, 902.0));
        assert_eq!(t.current_index(), 0);
        assert_eq!(t.remaining(), 900.0);
        assert!(t.cues_fired().is_empty());
        assert!(!t.is_running());
    }

    #[test]
    fn navigation_clears_cues_so_they_can_fire_again() {
        let t0 = Instant::now();
        let mut t = timer();
        t.jump_to(GAP_1, t0).unwrap();
        assert_eq!(t.advance(secs(t0, 61.0)), vec![Cue::Bell]);

        t.prev(secs(t0, 62.0));
        t.next(secs(t0, 63.0));
        assert_eq!(t.current_index(), GAP_1);
        t.start(secs(t0, 64.0));
        assert_eq!(t.advance(secs(t0, 125.0)), vec![Cue::Bell]);
    }

    #[test]
    fn three_minute_shortcut_fires_first_knock_once() {
        let t0 = Instant::now();
        let mut t = timer();
        t.jump_to(SPEAKER_1, t0).unwrap();

        assert_eq!(t.jump_to_three_minutes().unwrap(), Some(Cue::Knock1));
        assert_eq!(t.remaining(), 60.0);
        assert!(t.cues_fired().contains(Cue::Knock1));
        assert!(!t.cues_fired().contains(Cue::Knock2));

        // Same pass: the threshold check must not knock a second time
        assert!(t.advance(t0).is_empty());

        assert_eq!(t.jump_to_three_minutes().unwrap(), None);
    }

    #[test]
    fn three_minute_shortcut_then_run_out_gives_second_knock_only() {
        let t0 = Instant::now();
        let mut t = timer();
        t.jump_to(SPEAKER_1, t0).unwrap();
        t.jump_to_three_minutes().unwrap();
        assert_eq!(t.advance(secs(t0, 61.0)), vec![Cue::Knock2]);
        assert!(!t.is_running());
    }

    #[test]
    fn three_minute_shortcut_is_rejected_off_speaker_stages() {
        let mut t = timer();
        let err = t.jump_to_three_minutes().unwrap_err();
        assert!(matches!(err, TimerError::NotSpeakerStage { index: 0 }));
        assert_eq!(t.remaining(), 900.0);
    }

    #[test]
    fn three_minute_shortcut_leaves_clock_state_alone() {
        let t0 = Instant::now();
        let mut t = timer();
        t.next(t0);
        assert!(!t.is_running());
        t.jump_to_three_minutes().unwrap();
        assert!(!t.is_running());
        assert_eq!(t.current_index(), SPEAKER_1);
    }
}
