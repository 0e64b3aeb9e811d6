//! Participant Store
//!
//! Single source of truth for the roster, the turn pointer, round and turn
//! counters, the loaded monster list and the monster detail cache.
//!
//! Every mutator validates its input. A rejected call logs a warning and
//! leaves the state untouched.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::error::{CombatError, Result};
use super::order::compare_initiative;
use super::participant::{MonsterParticipant, Participant, ParticipantUpdate};
use crate::core::bestiary::{MonsterDetail, MonsterSummary};

#[derive(Debug, Clone)]
pub struct CombatState {
    participants: Vec<Participant>,
    current_turn_index: Option<usize>,
    combat_started: bool,
    current_round: u32,
    total_turns: u32,
    monster_list: Vec<MonsterSummary>,
    monster_details: HashMap<String, MonsterDetail>,
}

impl CombatState {
    pub fn new() -> Self {
        Self {
            participants: vec![],
            current_turn_index: None,
            combat_started: false,
            current_round: 0,
            total_turns: 0,
            monster_list: vec![],
            monster_details: HashMap::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Roster
    // ------------------------------------------------------------------------

    /// Participants in store order (last sorted by initiative).
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id() == id)
    }

    pub(crate) fn participant_mut(&mut self, id: &str) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.participants.iter().position(|p| p.id() == id)
    }

    /// Monster by id, distinguishing "absent" from "not a monster".
    pub fn monster(&self, id: &str) -> Result<&MonsterParticipant> {
        let participant = self
            .participant(id)
            .ok_or_else(|| CombatError::ParticipantNotFound(id.to_string()))?;
        participant
            .as_monster()
            .ok_or_else(|| CombatError::NotAMonster(participant.name().to_string()))
    }

    pub(crate) fn monster_mut(&mut self, id: &str) -> Result<&mut MonsterParticipant> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| CombatError::ParticipantNotFound(id.to_string()))?;
        let name = participant.name().to_string();
        participant.as_monster_mut().ok_or(CombatError::NotAMonster(name))
    }

    pub fn players(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_player())
    }

    pub fn add_participant(&mut self, participant: impl Into<Participant>) -> Result<()> {
        let participant = participant.into();
        if participant.id().trim().is_empty() {
            warn!(name = participant.name(), "rejected participant without id");
            return Err(CombatError::MissingId);
        }
        if self.participant(participant.id()).is_some() {
            warn!(id = participant.id(), "rejected duplicate participant");
            return Err(CombatError::DuplicateParticipant(participant.id().to_string()));
        }

        debug!(id = participant.id(), name = participant.name(), "participant added");
        self.participants.push(participant);
        Ok(())
    }

    /// Merge the set fields of `update` into the participant. Actions only
    /// apply to monsters and are ignored for players.
    pub fn update_participant(&mut self, id: &str, update: ParticipantUpdate) -> Result<()> {
        let Some(participant) = self.participant_mut(id) else {
            warn!(id, "update for unknown participant");
            return Err(CombatError::ParticipantNotFound(id.to_string()));
        };

        match participant {
            Participant::Player(player) => {
                if let Some(name) = update.name {
                    player.name = name;
                }
                if let Some(initiative) = update.initiative {
                    player.initiative = initiative;
                }
                if let Some(ac) = update.ac {
                    player.ac = ac;
                }
                if update.actions.is_some() {
                    warn!(id, "ignoring actions update for a player");
                }
            }
            Participant::Monster(monster) => {
                if let Some(name) = update.name {
                    monster.name = name;
                }
                if let Some(initiative) = update.initiative {
                    monster.initiative = initiative;
                }
                if let Some(ac) = update.ac {
                    monster.ac = ac;
                }
                if let Some(actions) = update.actions {
                    monster.actions = actions;
                }
            }
        }
        Ok(())
    }

    /// Remove a participant. The turn pointer is clamped into the shorter
    /// roster and is `None` once the roster is empty.
    pub fn remove_participant(&mut self, id: &str) -> Result<Participant> {
        let Some(pos) = self.position(id) else {
            warn!(id, "remove for unknown participant");
            return Err(CombatError::ParticipantNotFound(id.to_string()));
        };

        let removed = self.participants.remove(pos);
        if let Some(current) = self.current_turn_index {
            if current >= self.participants.len() {
                self.current_turn_index = self.participants.len().checked_sub(1);
            }
        }

        debug!(id, name = removed.name(), "participant removed");
        Ok(removed)
    }

    // ------------------------------------------------------------------------
    // Turn State
    // ------------------------------------------------------------------------

    pub fn current_turn_index(&self) -> Option<usize> {
        self.current_turn_index
    }

    /// Set the active index. Out-of-range values clamp to the last
    /// participant (or `None` on an empty roster). Returns the stored index.
    pub fn set_current_turn_index(&mut self, index: Option<usize>) -> Option<usize> {
        let len = self.participants.len();
        self.current_turn_index = match index {
            Some(i) if i >= len => {
                warn!(index = i, len, "turn index out of range, clamping");
                len.checked_sub(1)
            }
            other => other,
        };
        self.current_turn_index
    }

    pub fn active_participant(&self) -> Option<&Participant> {
        self.current_turn_index
            .and_then(|i| self.participants.get(i))
    }

    pub fn combat_started(&self) -> bool {
        self.combat_started
    }

    pub fn set_combat_started(&mut self, started: bool) {
        self.combat_started = started;
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn set_current_round(&mut self, round: u32) {
        self.current_round = round;
    }

    pub fn increment_current_round(&mut self) -> u32 {
        self.current_round = self.current_round.saturating_add(1);
        self.current_round
    }

    pub fn total_turns(&self) -> u32 {
        self.total_turns
    }

    pub fn set_total_turns(&mut self, turns: u32) {
        self.total_turns = turns;
    }

    pub fn increment_total_turns(&mut self) -> u32 {
        self.total_turns = self.total_turns.saturating_add(1);
        self.total_turns
    }

    /// Stable sort by descending initiative. The turn pointer follows the
    /// participant it pointed at.
    pub fn sort_by_initiative(&mut self) {
        let active_id = self.active_participant().map(|p| p.id().to_string());
        self.participants.sort_by(compare_initiative);
        if let Some(id) = active_id {
            self.current_turn_index = self.position(&id);
        }
    }

    // ------------------------------------------------------------------------
    // Monster Reference Data
    // ------------------------------------------------------------------------

    pub fn cache_monster_detail(&mut self, index: &str, detail: MonsterDetail) -> Result<()> {
        if index.trim().is_empty() {
            warn!("rejected monster detail with empty key");
            return Err(CombatError::EmptyMonsterKey);
        }
        if self.monster_details.insert(index.to_string(), detail).is_some() {
            debug!(index, "monster detail replaced");
        }
        Ok(())
    }

    pub fn monster_detail(&self, index: &str) -> Option<&MonsterDetail> {
        self.monster_details.get(index)
    }

    pub fn cached_monster_count(&self) -> usize {
        self.monster_details.len()
    }

    pub fn set_monster_list(&mut self, list: Vec<MonsterSummary>) {
        self.monster_list = list;
    }

    pub fn monster_list(&self) -> &[MonsterSummary] {
        &self.monster_list
    }

    /// Exact name match, ignoring case and surrounding whitespace.
    pub fn find_monster(&self, name: &str) -> Option<&MonsterSummary> {
        let wanted = name.trim();
        if wanted.is_empty() {
            return None;
        }
        self.monster_list
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(wanted))
    }
}

impl Default for CombatState {
    fn default() -> Self {
        Self::new()
    }
}
