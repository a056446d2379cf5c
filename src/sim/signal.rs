use serde::{Deserialize, Serialize};

use crate::model::StatKind;

/// A notification emitted by the core so presentation can re-render.
/// The core never reads these back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// In-fiction year the signal was emitted in.
    pub year: i32,
    pub kind: SignalKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalKind {
    AgeUp {
        age: u32,
    },
    StatChanged {
        stat: StatKind,
        old: i32,
        new: i32,
    },
    EventTriggered {
        event_id: String,
    },
    ChoiceMade {
        event_id: String,
        choice_index: usize,
    },
    Death {
        cause: String,
    },
    CareerHired {
        career_id: String,
    },
    CareerPromoted {
        title: String,
    },
    CareerFired {
        career_id: String,
    },
    ShadowCaptured,
    NpcDied {
        npc_id: u64,
        cause: String,
    },
    PoliticalElectionWon {
        position_id: String,
    },
    PoliticalElectionLost {
        position_id: String,
    },
    PoliticalScandal {
        scandal_id: String,
    },
    PoliticalImpeached {
        position_id: String,
    },
    PoliticalTermEnded {
        position_id: String,
    },
    PoliticalCoup {
        success: bool,
    },
    PoliticalRevolutionThreat {
        risk: f64,
    },
}

impl SignalKind {
    /// Channel name subscribers filter on.
    pub fn name(&self) -> &'static str {
        match self {
            SignalKind::AgeUp { .. } => "age_up",
            SignalKind::StatChanged { .. } => "stat_changed",
            SignalKind::EventTriggered { .. } => "event_triggered",
            SignalKind::ChoiceMade { .. } => "choice_made",
            SignalKind::Death { .. } => "death",
            SignalKind::CareerHired { .. } => "career_hired",
            SignalKind::CareerPromoted { .. } => "career_promoted",
            SignalKind::CareerFired { .. } => "career_fired",
            SignalKind::ShadowCaptured => "shadow_captured",
            SignalKind::NpcDied { .. } => "npc_died",
            SignalKind::PoliticalElectionWon { .. } => "political_election_won",
            SignalKind::PoliticalElectionLost { .. } => "political_election_lost",
            SignalKind::PoliticalScandal { .. } => "political_scandal",
            SignalKind::PoliticalImpeached { .. } => "political_impeached",
            SignalKind::PoliticalTermEnded { .. } => "political_term_ended",
            SignalKind::PoliticalCoup { .. } => "political_coup",
            SignalKind::PoliticalRevolutionThreat { .. } => "political_revolution_threat",
        }
    }

    pub fn is_political(&self) -> bool {
        self.name().starts_with("political_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_tag_matches_channel_name() {
        let kinds = [
            SignalKind::AgeUp { age: 3 },
            SignalKind::Death {
                cause: "Old age".to_string(),
            },
            SignalKind::PoliticalCoup { success: true },
            SignalKind::ShadowCaptured,
        ];
        for kind in kinds {
            let json = serde_json::to_value(&kind).unwrap();
            assert_eq!(json["type"], kind.name());
        }
    }

    #[test]
    fn political_prefix() {
        assert!(SignalKind::PoliticalScandal {
            scandal_id: "x".to_string()
        }
        .is_political());
        assert!(!SignalKind::AgeUp { age: 1 }.is_political());
    }
}
