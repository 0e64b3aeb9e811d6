//! Sorted-order derivation and the rows the initiative list renders.

use std::cmp::Ordering;

use super::participant::{Participant, ParticipantKind};
use super::store::CombatState;

/// Highest initiative first. Used with stable sorts so ties keep insertion
/// order.
pub fn compare_initiative(a: &Participant, b: &Participant) -> Ordering {
    b.initiative().cmp(&a.initiative())
}

/// Participants sorted by descending initiative. Pure; the input is not
/// touched.
pub fn derive_order(participants: &[Participant]) -> Vec<&Participant> {
    let mut ordered: Vec<&Participant> = participants.iter().collect();
    ordered.sort_by(|a, b| compare_initiative(a, b));
    ordered
}

/// Hit point health band for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HpBand {
    Low,
    Medium,
    Healthy,
}

impl HpBand {
    pub fn from_hp(current: u32, max: u32) -> Self {
        if max == 0 {
            return Self::Low;
        }
        let pct = u64::from(current) * 100 / u64::from(max);
        match pct {
            0..=25 => Self::Low,
            26..=50 => Self::Medium,
            _ => Self::Healthy,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitiativeRow {
    pub id: String,
    pub name: String,
    pub initiative: i32,
    pub ac: u32,
    pub kind: ParticipantKind,
    /// `(current, max)` for monsters.
    pub hp: Option<(u32, u32)>,
    pub hp_band: Option<HpBand>,
    pub defeated: bool,
    pub active: bool,
}

impl InitiativeRow {
    fn new(participant: &Participant, active: bool) -> Self {
        let monster = participant.as_monster();
        let hp = monster.map(|m| (m.current_hp(), m.max_hp()));
        Self {
            id: participant.id().to_string(),
            name: participant.name().to_string(),
            initiative: participant.initiative(),
            ac: participant.ac(),
            kind: participant.kind(),
            hp,
            hp_band: hp.map(|(current, max)| HpBand::from_hp(current, max)),
            defeated: monster.is_some_and(|m| m.defeated()),
            active,
        }
    }
}

/// Rows in initiative order with the active participant marked.
pub fn initiative_rows(state: &CombatState) -> Vec<InitiativeRow> {
    let active_id = state.active_participant().map(|p| p.id());
    derive_order(state.participants())
        .into_iter()
        .map(|p| InitiativeRow::new(p, Some(p.id()) == active_id))
        .collect()
}
