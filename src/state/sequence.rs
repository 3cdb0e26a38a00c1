//! Fixed stage sequence of a debate round

use serde::{Deserialize, Serialize};

/// Number of speakers in a round
pub const SPEAKER_COUNT: usize = 6;

/// Category of a stage, which decides the cues it gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StageKind {
    Prep,
    Speaker,
    Gap,
    TeamFeedback,
    PeerFeedback,
}

/// One named, timed segment of the round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub duration_seconds: u32,
    pub kind: StageKind,
}

impl Stage {
    pub fn new(name: impl Into<String>, duration_seconds: u32, kind: StageKind) -> Self {
        Self {
            name: name.into(),
            duration_seconds,
            kind,
        }
    }

    pub fn duration(&self) -> f64 {
        f64::from(self.duration_seconds)
    }

    pub fn is_speaker(&self) -> bool {
        self.kind == StageKind::Speaker
    }
}

/// Ordered, never-empty list of stages. Immutable once built.
#[derive(Debug, Clone)]
pub struct Sequence {
    stages: Vec<Stage>,
}

impl Sequence {
    /// The standard round: prep, six speakers separated by gaps, then feedback.
    pub fn standard() -> Self {
        let mut stages = vec![Stage::new("Prep – Both Teams", 15 * 60, StageKind::Prep)];

        for speaker in 1..=SPEAKER_COUNT {
            stages.push(Stage::new(
                format!("Speaker {speaker}"),
                4 * 60,
                StageKind::Speaker,
            ));
            if speaker < SPEAKER_COUNT {
                stages.push(Stage::new(
                    format!("Prep Gap before Speaker {}", speaker + 1),
                    60,
                    StageKind::Gap,
                ));
            }
        }

        stages.extend([
            Stage::new("Team Feedback – Negative first", 90, StageKind::TeamFeedback),
            Stage::new("Team Feedback – Affirmative", 90, StageKind::TeamFeedback),
            Stage::new("Peer Feedback – Negative", 90, StageKind::PeerFeedback),
            Stage::new("Peer Feedback – Affirmative", 90, StageKind::PeerFeedback),
        ]);

        Self { stages }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    pub fn last_index(&self) -> usize {
        self.stages.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    /// Label used by the jump selector, e.g. `03. Prep Gap before Speaker 2`
    pub fn label(&self, index: usize) -> Option<String> {
        self.get(index)
            .map(|stage| format!("{:02}. {}", index + 1, stage.name))
    }

    /// Human readable summary of the running order
    pub fn order_summary() -> Vec<&'static str> {
        vec![
            "1) Prep 15:00",
            "2) Speakers 1–6 (each 4:00), with 1:00 prep gaps after Speakers 1–5",
            "3) Team Feedback: 90s each (Neg → Aff)",
            "4) Peer Feedback: 90s each (Neg → Aff)",
        ]
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::ops::Index<usize> for Sequence {
    type Output = Stage;

    fn index(&self, index: usize) -> &Stage {
        &self.stages[index]
    }
}
