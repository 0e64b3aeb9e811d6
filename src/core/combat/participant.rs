//! Participants in an encounter.
//!
//! Players carry only what initiative and targeting need. Monsters carry
//! their stat block and hit points; only they can take damage, heal or act.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::CombatError;
use crate::core::bestiary::{MonsterAction, MonsterDetail, SpecialAbility};
use crate::core::dice::{ability_modifier, average_hit_points};

// ============================================================================
// Kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    Player,
    Monster,
}

impl ParticipantKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Monster => "monster",
        }
    }
}

// ============================================================================
// Ability Scores
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Three-letter code, `STR` .. `CHA`.
    pub fn code(self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Constitution => "CON",
            Self::Intelligence => "INT",
            Self::Wisdom => "WIS",
            Self::Charisma => "CHA",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    pub score: i32,
    pub modifier: i32,
}

impl AbilityScore {
    pub fn from_score(score: i32) -> Self {
        Self {
            score,
            modifier: ability_modifier(score),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub str: AbilityScore,
    pub dex: AbilityScore,
    pub con: AbilityScore,
    pub int: AbilityScore,
    pub wis: AbilityScore,
    pub cha: AbilityScore,
}

impl AbilityScores {
    pub fn from_detail(detail: &MonsterDetail) -> Self {
        Self {
            str: AbilityScore::from_score(detail.strength),
            dex: AbilityScore::from_score(detail.dexterity),
            con: AbilityScore::from_score(detail.constitution),
            int: AbilityScore::from_score(detail.intelligence),
            wis: AbilityScore::from_score(detail.wisdom),
            cha: AbilityScore::from_score(detail.charisma),
        }
    }

    pub fn get(&self, ability: Ability) -> AbilityScore {
        match ability {
            Ability::Strength => self.str,
            Ability::Dexterity => self.dex,
            Ability::Constitution => self.con,
            Ability::Intelligence => self.int,
            Ability::Wisdom => self.wis,
            Ability::Charisma => self.cha,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, AbilityScore)> + '_ {
        Ability::ALL.into_iter().map(move |a| (a, self.get(a)))
    }
}

// ============================================================================
// Player
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCharacter {
    pub id: String,
    pub name: String,
    pub initiative: i32,
    pub ac: u32,
}

impl PlayerCharacter {
    pub fn new(name: impl Into<String>, initiative: i32, ac: u32) -> Self {
        Self {
            id: format!("pc-{}", Uuid::new_v4()),
            name: name.into(),
            initiative,
            ac,
        }
    }
}

// ============================================================================
// Monster
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MonsterRecord")]
pub struct MonsterParticipant {
    pub id: String,
    pub name: String,
    pub initiative: i32,
    pub ac: u32,
    /// Key of the cached stat block this monster was built from.
    pub monster_index: String,
    max_hp: u32,
    current_hp: u32,
    pub ability_scores: AbilityScores,
    pub speed: IndexMap<String, Value>,
    pub challenge_rating: f64,
    pub size: String,
    pub monster_type: String,
    pub subtype: Option<String>,
    pub alignment: String,
    pub senses: IndexMap<String, Value>,
    pub languages: String,
    pub special_abilities: Vec<SpecialAbility>,
    pub actions: Vec<MonsterAction>,
}

/// Serialized form of [`MonsterParticipant`], checked on the way in so a
/// loaded monster never holds more hit points than its maximum.
#[derive(Deserialize)]
struct MonsterRecord {
    id: String,
    name: String,
    initiative: i32,
    ac: u32,
    monster_index: String,
    max_hp: u32,
    current_hp: u32,
    ability_scores: AbilityScores,
    speed: IndexMap<String, Value>,
    challenge_rating: f64,
    size: String,
    monster_type: String,
    subtype: Option<String>,
    alignment: String,
    senses: IndexMap<String, Value>,
    languages: String,
    special_abilities: Vec<SpecialAbility>,
    actions: Vec<MonsterAction>,
}

impl TryFrom<MonsterRecord> for MonsterParticipant {
    type Error = CombatError;

    fn try_from(record: MonsterRecord) -> Result<Self, Self::Error> {
        if record.current_hp > record.max_hp {
            return Err(CombatError::HitPointsOutOfRange {
                current: record.current_hp,
                max: record.max_hp,
            });
        }
        Ok(Self {
            id: record.id,
            name: record.name,
            initiative: record.initiative,
            ac: record.ac,
            monster_index: record.monster_index,
            max_hp: record.max_hp,
            current_hp: record.current_hp,
            ability_scores: record.ability_scores,
            speed: record.speed,
            challenge_rating: record.challenge_rating,
            size: record.size,
            monster_type: record.monster_type,
            subtype: record.subtype,
            alignment: record.alignment,
            senses: record.senses,
            languages: record.languages,
            special_abilities: record.special_abilities,
            actions: record.actions,
        })
    }
}

impl MonsterParticipant {
    /// Build a monster from a stat block at full average hit points.
    pub fn from_detail(
        index: impl Into<String>,
        detail: &MonsterDetail,
        name: impl Into<String>,
        initiative: i32,
    ) -> Self {
        let max_hp = average_hit_points(&detail.hit_dice).max(0) as u32;
        Self {
            id: format!("monster-{}", Uuid::new_v4()),
            name: name.into(),
            initiative,
            ac: detail.primary_armor_class(),
            monster_index: index.into(),
            max_hp,
            current_hp: max_hp,
            ability_scores: AbilityScores::from_detail(detail),
            speed: detail.speed.clone(),
            challenge_rating: detail.challenge_rating,
            size: detail.size.clone(),
            monster_type: detail.monster_type.clone(),
            subtype: detail.subtype.clone(),
            alignment: detail.alignment.clone(),
            senses: detail.senses.clone(),
            languages: detail.languages.clone(),
            special_abilities: detail.special_abilities.clone(),
            actions: detail.actions.clone(),
        }
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    /// True exactly when hit points are 0.
    pub fn defeated(&self) -> bool {
        self.current_hp == 0
    }

    /// Set hit points, clamped to `[0, max_hp]`.
    pub fn set_current_hp(&mut self, hp: i64) {
        self.current_hp = hp.clamp(0, i64::from(self.max_hp)) as u32;
    }

    /// New max, keeping current hit points inside it.
    pub fn set_max_hp(&mut self, max_hp: u32) {
        self.max_hp = max_hp;
        self.current_hp = self.current_hp.min(max_hp);
    }

    /// `type (subtype), alignment` line for stat blocks.
    pub fn type_line(&self) -> String {
        let mut line = format!("{} {}", self.size, self.monster_type);
        if let Some(sub) = self.subtype.as_deref().filter(|s| !s.is_empty()) {
            line.push_str(&format!(" ({sub})"));
        }
        if !self.alignment.is_empty() {
            line.push_str(&format!(", {}", self.alignment));
        }
        line
    }
}

// ============================================================================
// Participant
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Participant {
    Player(PlayerCharacter),
    Monster(MonsterParticipant),
}

impl Participant {
    pub fn id(&self) -> &str {
        match self {
            Self::Player(p) => &p.id,
            Self::Monster(m) => &m.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Player(p) => &p.name,
            Self::Monster(m) => &m.name,
        }
    }

    pub fn initiative(&self) -> i32 {
        match self {
            Self::Player(p) => p.initiative,
            Self::Monster(m) => m.initiative,
        }
    }

    pub fn ac(&self) -> u32 {
        match self {
            Self::Player(p) => p.ac,
            Self::Monster(m) => m.ac,
        }
    }

    pub fn kind(&self) -> ParticipantKind {
        match self {
            Self::Player(_) => ParticipantKind::Player,
            Self::Monster(_) => ParticipantKind::Monster,
        }
    }

    pub fn as_monster(&self) -> Option<&MonsterParticipant> {
        match self {
            Self::Monster(m) => Some(m),
            Self::Player(_) => None,
        }
    }

    pub fn as_monster_mut(&mut self) -> Option<&mut MonsterParticipant> {
        match self {
            Self::Monster(m) => Some(m),
            Self::Player(_) => None,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Self::Player(_))
    }

    /// Defeated monsters lose their turns; everyone else can act.
    pub fn can_act(&self) -> bool {
        match self {
            Self::Player(_) => true,
            Self::Monster(m) => !m.defeated(),
        }
    }
}

impl From<PlayerCharacter> for Participant {
    fn from(value: PlayerCharacter) -> Self {
        Self::Player(value)
    }
}

impl From<MonsterParticipant> for Participant {
    fn from(value: MonsterParticipant) -> Self {
        Self::Monster(value)
    }
}

/// Partial update merged by [`CombatState::update_participant`].
///
/// [`CombatState::update_participant`]: super::CombatState::update_participant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantUpdate {
    pub name: Option<String>,
    pub initiative: Option<i32>,
    pub ac: Option<u32>,
    /// Monster only.
    pub actions: Option<Vec<MonsterAction>>,
}

impl ParticipantUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.initiative.is_none()
            && self.ac.is_none()
            && self.actions.is_none()
    }
}
