//! Combat Management
//!
//! Participant store, initiative engine, HP adjustment and monster action
//! resolution.

pub mod actions;
pub mod engine;
pub mod error;
pub mod events;
pub mod hp;
pub mod order;
pub mod participant;
pub mod roster;
pub mod store;

pub use actions::{ActionOutcome, AttackReport, DamageReport, DamageRoll, NarrativeReport};
pub use engine::{ActionChoice, Encounter, TurnPrompt};
pub use error::{CombatError, ErrorCategory, Result};
pub use events::{CombatEvent, CombatEventKind};
pub use hp::HpChange;
pub use order::{derive_order, HpBand, InitiativeRow};
pub use participant::{
    Ability, AbilityScore, AbilityScores, MonsterParticipant, Participant, ParticipantKind,
    ParticipantUpdate, PlayerCharacter,
};
pub use roster::{MAX_MONSTER_BATCH, MAX_RANDOM_PLAYERS};
pub use store::CombatState;
