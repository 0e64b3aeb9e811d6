//! Initiative Engine
//!
//! [`Encounter`] owns everything a combat needs: the participant store, the
//! dice source and the combat log. Every operation the UI can trigger goes
//! through it.
//!
//! Turn flow:
//! ```text
//! start_combat ─▶ process_turn ─┬─▶ Player prompt
//!                     ▲         ├─▶ Monster prompt (actions)
//!                     │         └─▶ defeated monster ─▶ advance ─┐
//!                     └──────────────────────────────────────────┘
//! ```
//! Skipping is bounded: once no participant can act the engine stops with
//! [`TurnPrompt::Stalled`].

use tracing::{debug, info, warn};

use super::actions::{resolve_action, ActionOutcome, Target};
use super::error::{CombatError, Result};
use super::events::{CombatEvent, CombatEventKind, CombatLog};
use super::hp::HpChange;
use super::order::{initiative_rows, InitiativeRow};
use super::participant::{Participant, ParticipantUpdate, PlayerCharacter};
use super::roster::{monster_group, random_players, MAX_MONSTER_BATCH};
use super::store::CombatState;
use crate::core::bestiary::MonsterDetail;
use crate::core::dice::{DiceRoller, DiceSource};

/// An action offered on a monster's turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionChoice {
    pub index: usize,
    pub name: String,
    pub is_attack: bool,
}

/// What the UI should ask for after a turn change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnPrompt {
    Player { id: String, name: String },
    Monster {
        id: String,
        name: String,
        actions: Vec<ActionChoice>,
    },
    /// Every participant is a defeated monster; nobody can take a turn.
    Stalled,
}

impl TurnPrompt {
    pub fn headline(&self) -> String {
        match self {
            Self::Player { name, .. } | Self::Monster { name, .. } => format!("{name}'s turn"),
            Self::Stalled => "Combat cannot continue: no one is left to act.".to_string(),
        }
    }
}

pub struct Encounter {
    state: CombatState,
    dice: Box<dyn DiceSource + Send>,
    log: CombatLog,
}

impl Encounter {
    pub fn new(dice: Box<dyn DiceSource + Send>) -> Self {
        Self {
            state: CombatState::new(),
            dice,
            log: CombatLog::new(),
        }
    }

    /// Encounter with a reproducible dice sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Box::new(DiceRoller::seeded(seed)))
    }

    pub fn state(&self) -> &CombatState {
        &self.state
    }

    /// Direct store access for reference data (monster list, detail cache).
    pub fn state_mut(&mut self) -> &mut CombatState {
        &mut self.state
    }

    pub fn log(&self) -> &[CombatEvent] {
        self.log.events()
    }

    pub fn recent_events(&self, n: usize) -> &[CombatEvent] {
        self.log.recent(n)
    }

    /// Roll one die with the encounter's dice source.
    pub fn roll_die(&mut self, sides: u32) -> i32 {
        self.dice.roll_die(sides)
    }

    fn record(&mut self, actor: &str, kind: CombatEventKind, description: impl Into<String>) {
        self.log.record(
            self.state.current_round(),
            self.state.total_turns(),
            actor,
            kind,
            description,
        );
    }

    // ========================================================================
    // Roster
    // ========================================================================

    pub fn add_player(&mut self, name: &str, initiative: i32, ac: u32) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CombatError::EmptyName);
        }
        let player = PlayerCharacter::new(name, initiative, ac);
        let id = player.id.clone();
        self.state.add_participant(player)?;
        info!(%id, name, initiative, ac, "player added");
        self.record(name, CombatEventKind::Joined, format!("{name} joins (initiative {initiative}, AC {ac})"));
        Ok(id)
    }

    /// Add `count` random player characters (clamped to 1..=10). Returns
    /// their ids.
    pub fn add_random_players(&mut self, count: usize) -> Result<Vec<String>> {
        let existing: Vec<String> = self
            .state
            .players()
            .map(|p| p.name().to_string())
            .collect();
        let players = random_players(
            self.dice.as_mut(),
            count,
            existing.iter().map(String::as_str),
        );

        let mut ids = Vec::with_capacity(players.len());
        for player in players {
            let (name, initiative, ac) = (player.name.clone(), player.initiative, player.ac);
            ids.push(player.id.clone());
            self.state.add_participant(player)?;
            self.record(
                &name,
                CombatEventKind::Joined,
                format!("Added random PC: {name} (Initiative: {initiative}, AC: {ac})"),
            );
        }
        info!(count = ids.len(), "random players added");
        Ok(ids)
    }

    /// Cache `detail` under `index` and add `count` monsters built from it.
    pub fn add_monsters(
        &mut self,
        index: &str,
        detail: &MonsterDetail,
        count: usize,
    ) -> Result<Vec<String>> {
        if count == 0 {
            return Err(CombatError::InvalidAmount(0));
        }
        if count > MAX_MONSTER_BATCH {
            warn!(index, requested = count, cap = MAX_MONSTER_BATCH, "monster batch capped");
        }
        self.state.cache_monster_detail(index, detail.clone())?;

        let monsters = monster_group(self.dice.as_mut(), index, detail, count);
        let mut ids = Vec::with_capacity(monsters.len());
        for monster in monsters {
            let description = format!(
                "{} joins (initiative {}, AC {}, HP {})",
                monster.name,
                monster.initiative,
                monster.ac,
                monster.max_hp()
            );
            let name = monster.name.clone();
            ids.push(monster.id.clone());
            self.state.add_participant(monster)?;
            self.record(&name, CombatEventKind::Joined, description);
        }
        info!(index, count = ids.len(), "monsters added");
        Ok(ids)
    }

    pub fn update_participant(&mut self, id: &str, update: ParticipantUpdate) -> Result<()> {
        self.state.update_participant(id, update)
    }

    /// Remove a participant. During combat the turn pointer is clamped, not
    /// shifted, so the next participant in line may become active.
    pub fn remove_participant(&mut self, id: &str) -> Result<Participant> {
        let removed = self.state.remove_participant(id)?;
        self.record(
            removed.name(),
            CombatEventKind::Removed,
            format!("{} leaves the encounter", removed.name()),
        );
        Ok(removed)
    }

    // ========================================================================
    // Order
    // ========================================================================

    /// Re-sort the store by initiative, keeping the active participant.
    pub fn update_initiative_list(&mut self) {
        self.state.sort_by_initiative();
    }

    pub fn initiative_view(&self) -> Vec<InitiativeRow> {
        initiative_rows(&self.state)
    }

    /// `(position, n)` where position is `((total_turns - 1) mod n) + 1`.
    pub fn turn_counter(&self) -> (usize, usize) {
        let n = self.state.len();
        if n == 0 {
            return (0, 0);
        }
        match self.state.total_turns() as usize {
            0 => (0, n),
            turns => ((turns - 1) % n + 1, n),
        }
    }

    // ========================================================================
    // Turns
    // ========================================================================

    pub fn start_combat(&mut self) -> Result<TurnPrompt> {
        let count = self.state.len();
        if count < 2 {
            warn!(count, "not enough participants to start combat");
            return Err(CombatError::NotEnoughParticipants { count });
        }

        self.state.set_current_turn_index(None);
        self.state.sort_by_initiative();
        self.state.set_combat_started(true);
        self.state.set_current_turn_index(Some(0));
        self.state.set_current_round(1);
        self.state.set_total_turns(1);

        info!(participants = count, "combat started");
        self.record("", CombatEventKind::CombatStarted, format!("Combat begins with {count} participants"));
        Ok(self.process_turn())
    }

    pub fn next_turn(&mut self) -> Result<TurnPrompt> {
        if !self.state.combat_started() || self.state.is_empty() {
            return Err(CombatError::CombatNotStarted);
        }
        self.advance();
        Ok(self.process_turn())
    }

    fn advance(&mut self) {
        let n = self.state.len();
        let next = self
            .state
            .current_turn_index()
            .map_or(0, |current| (current + 1) % n);
        if next == 0 {
            let round = self.state.increment_current_round();
            debug!(round, "new round");
        }
        self.state.increment_total_turns();
        self.state.set_current_turn_index(Some(next));
        self.state.sort_by_initiative();
    }

    /// Prompt for the active participant, skipping defeated monsters.
    pub fn process_turn(&mut self) -> TurnPrompt {
        loop {
            let Some(active) = self.state.active_participant() else {
                return TurnPrompt::Stalled;
            };

            if active.can_act() {
                let prompt = match active {
                    Participant::Player(p) => TurnPrompt::Player {
                        id: p.id.clone(),
                        name: p.name.clone(),
                    },
                    Participant::Monster(m) => TurnPrompt::Monster {
                        id: m.id.clone(),
                        name: m.name.clone(),
                        actions: self.available_actions(&m.id),
                    },
                };
                let name = active.name().to_string();
                self.record(&name, CombatEventKind::TurnStarted, format!("{name}'s turn"));
                return prompt;
            }

            if !self.state.participants().iter().any(Participant::can_act) {
                warn!("no participant can act, combat stalled");
                self.record("", CombatEventKind::Stalled, "Combat cannot continue");
                return TurnPrompt::Stalled;
            }

            let name = active.name().to_string();
            debug!(%name, "skipping defeated monster");
            self.record(&name, CombatEventKind::TurnSkipped, format!("{name} is defeated, skipping"));
            self.advance();
        }
    }

    /// Actions offered for a monster: its own list, or the cached stat
    /// block's when it has none.
    pub fn available_actions(&self, monster_id: &str) -> Vec<ActionChoice> {
        let Ok(monster) = self.state.monster(monster_id) else {
            return vec![];
        };
        let actions = if monster.actions.is_empty() {
            self.state
                .monster_detail(&monster.monster_index)
                .map(|d| d.actions.as_slice())
                .unwrap_or_default()
        } else {
            monster.actions.as_slice()
        };
        actions
            .iter()
            .enumerate()
            .map(|(index, a)| ActionChoice {
                index,
                name: a.name.clone(),
                is_attack: a.is_attack(),
            })
            .collect()
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Resolve a monster action against a random player. Damage is only
    /// reported; use [`Encounter::apply_damage`] to apply it.
    pub fn perform_monster_action(
        &mut self,
        monster_id: &str,
        action_index: usize,
    ) -> Result<ActionOutcome> {
        let monster = self.state.monster(monster_id)?;
        let (name, monster_index) = (monster.name.clone(), monster.monster_index.clone());

        let action = match monster.actions.get(action_index) {
            Some(action) => action.clone(),
            None => {
                let cached = self
                    .state
                    .monster_detail(&monster_index)
                    .and_then(|d| d.actions.get(action_index).map(|a| (a.clone(), d.actions.clone())));
                let Some((action, all)) = cached else {
                    warn!(monster = %name, action_index, "action not available");
                    return Err(CombatError::ActionNotAvailable {
                        monster: name,
                        action_index,
                    });
                };
                if monster.actions.is_empty() {
                    debug!(monster = %name, "back-filling actions from cached stat block");
                    self.state.update_participant(
                        monster_id,
                        ParticipantUpdate {
                            actions: Some(all),
                            ..Default::default()
                        },
                    )?;
                }
                action
            }
        };

        let targets: Vec<(String, String, u32)> = self
            .state
            .players()
            .map(|p| (p.id().to_string(), p.name().to_string(), p.ac()))
            .collect();
        if targets.is_empty() {
            return Err(CombatError::NoTargets);
        }
        let pick = self.dice.choose_index(targets.len()).min(targets.len() - 1);
        let (target_id, target_name, target_ac) = &targets[pick];

        let outcome = resolve_action(
            self.dice.as_mut(),
            &name,
            &action,
            Target {
                id: target_id,
                name: target_name,
                ac: *target_ac,
            },
        );

        let kind = match &outcome {
            ActionOutcome::Attack(_) => CombatEventKind::Attack,
            ActionOutcome::Narrative(_) => CombatEventKind::Action,
        };
        info!(monster = %name, action = %action.name, "{outcome}");
        self.record(&name, kind, outcome.to_string());
        Ok(outcome)
    }

    // ========================================================================
    // Hit Points
    // ========================================================================

    pub fn apply_damage(&mut self, id: &str, amount: i64) -> Result<HpChange> {
        let change = self.state.apply_damage(id, amount)?;
        let name = self.participant_name(id);
        self.record(
            &name,
            CombatEventKind::Damage,
            format!("{name} takes {amount} damage ({}/{})", change.after, change.max),
        );
        if change.defeated && change.before > 0 {
            info!(%name, "monster defeated");
            self.record(&name, CombatEventKind::Defeated, format!("{name} is defeated"));
        }
        Ok(change)
    }

    pub fn apply_heal(&mut self, id: &str, amount: i64) -> Result<HpChange> {
        let change = self.state.apply_heal(id, amount)?;
        let name = self.participant_name(id);
        self.record(
            &name,
            CombatEventKind::Healing,
            format!("{name} heals {amount} ({}/{})", change.after, change.max),
        );
        Ok(change)
    }

    fn participant_name(&self, id: &str) -> String {
        self.state
            .participant(id)
            .map(|p| p.name().to_string())
            .unwrap_or_default()
    }
}

impl Default for Encounter {
    fn default() -> Self {
        Self::new(Box::new(DiceRoller::new()))
    }
}

impl std::fmt::Debug for Encounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encounter")
            .field("state", &self.state)
            .field("events", &self.log.len())
            .finish_non_exhaustive()
    }
}
