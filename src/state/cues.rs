//! Audio cues and the rules that decide when they fire

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::StageKind;
use crate::error::TimerError;

/// Elapsed seconds of a speaker turn at which the single knock sounds
pub const FIRST_KNOCK_AT: f64 = 180.0;
/// Elapsed seconds of a speaker turn at which the double knock sounds
pub const SECOND_KNOCK_AT: f64 = 240.0;
/// Remaining time the "jump to 3:00" shortcut leaves on the clock
pub const THREE_MINUTE_MARK_REMAINING: f64 = 60.0;

/// A named audio signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    #[serde(rename = "knock-1")]
    Knock1,
    #[serde(rename = "knock-2")]
    Knock2,
    #[serde(rename = "bell")]
    Bell,
}

impl Cue {
    pub const ALL: [Cue; 3] = [Cue::Knock1, Cue::Knock2, Cue::Bell];

    pub fn key(self) -> &'static str {
        match self {
            Cue::Knock1 => "knock-1",
            Cue::Knock2 => "knock-2",
            Cue::Bell => "bell",
        }
    }

    pub fn is_knock(self) -> bool {
        matches!(self, Cue::Knock1 | Cue::Knock2)
    }

    /// Whether this cue can ever fire during a stage of `kind`
    pub fn applies_to(self, kind: StageKind) -> bool {
        match kind {
            StageKind::Speaker => self.is_knock(),
            _ => self == Cue::Bell,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Cue::Knock1 => 0b001,
            Cue::Knock2 => 0b010,
            Cue::Bell => 0b100,
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Cue {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cue::ALL
            .into_iter()
            .find(|cue| cue.key() == s)
            .ok_or_else(|| TimerError::UnknownCue(s.to_string()))
    }
}

/// Cues already fired during the current stage activation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CueSet(u8);

impl CueSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn contains(&self, cue: Cue) -> bool {
        self.0 & cue.bit() != 0
    }

    /// Marks `cue` as fired. Returns `true` only the first time.
    pub fn insert(&mut self, cue: Cue) -> bool {
        let fresh = !self.contains(cue);
        self.0 |= cue.bit();
        fresh
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Cue> + '_ {
        Cue::ALL.into_iter().filter(|cue| self.contains(*cue))
    }
}

/// Cues due at `elapsed` seconds into a stage of `kind` that have not fired yet.
/// Each returned cue is marked in `fired`.
pub fn due_threshold_cues(kind: StageKind, elapsed: f64, fired: &mut CueSet) -> Vec<Cue> {
    if kind != StageKind::Speaker {
        return Vec::new();
    }

    [(Cue::Knock1, FIRST_KNOCK_AT), (Cue::Knock2, SECOND_KNOCK_AT)]
        .into_iter()
        .filter(|&(cue, threshold)| elapsed >= threshold && fired.insert(cue))
        .map(|(cue, _)| cue)
        .collect()
}

/// Cue for a stage of `kind` running out, if any. Speaker turns end on the knocks.
pub fn terminal_cue(kind: StageKind, fired: &mut CueSet) -> Option<Cue> {
    match kind {
        StageKind::Speaker => None,
        _ => fired.insert(Cue::Bell).then_some(Cue::Bell),
    }
}
