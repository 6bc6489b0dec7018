use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roster::{Participant, ParticipantId};

/// One pool member as reported in a spin outcome: the probability it held in
/// the pre-draw distribution alongside its selection count after the draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolMember {
    pub name: String,
    pub probability: f64,
    pub times_selected: u32,
}

/// Result of one draw, random or externally recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub winner: String,
    pub participants: Vec<PoolMember>,
    pub winner_probability: f64,
    pub spin_time: DateTime<Utc>,
}

/// Participant as exposed to callers of the roster operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub id: ParticipantId,
    pub name: String,
    pub times_selected: u32,
    pub probability_weight: f64,
    pub created_at: DateTime<Utc>,
    pub last_selected_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl From<&Participant> for ParticipantSummary {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id,
            name: participant.name.clone(),
            times_selected: participant.times_selected,
            probability_weight: participant.weight,
            created_at: participant.created_at,
            last_selected_at: participant.last_selected_at,
            is_active: participant.is_active,
        }
    }
}
