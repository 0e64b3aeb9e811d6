//! Test Fixtures
//!
//! Stat blocks shaped like the SRD API records, a monster list, and a dice
//! source that replays a fixed sequence.

use std::collections::VecDeque;

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::core::bestiary::{
    ArmorClass, Damage, DamageType, MonsterAction, MonsterDetail, MonsterSummary, SpecialAbility,
};
use crate::core::combat::Encounter;
use crate::core::dice::DiceSource;

// =============================================================================
// Scripted Dice
// =============================================================================

/// Dice source that replays `rolls` in order, starting over when it runs
/// out. `choose_index` pops from `picks` and falls back to 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: Vec<i32>,
    next: usize,
    picks: VecDeque<usize>,
}

impl ScriptedDice {
    pub fn new(rolls: &[i32]) -> Self {
        Self {
            rolls: rolls.to_vec(),
            next: 0,
            picks: VecDeque::new(),
        }
    }

    pub fn with_picks(mut self, picks: &[usize]) -> Self {
        self.picks = picks.iter().copied().collect();
        self
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self, _sides: u32) -> i32 {
        if self.rolls.is_empty() {
            return 1;
        }
        let roll = self.rolls[self.next % self.rolls.len()];
        self.next += 1;
        roll
    }

    fn choose_index(&mut self, _len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0)
    }
}

/// Encounter driven by a fixed roll sequence.
pub fn scripted_encounter(rolls: &[i32]) -> Encounter {
    Encounter::new(Box::new(ScriptedDice::new(rolls)))
}

// =============================================================================
// Stat Block Builders
// =============================================================================

fn map(value: Value) -> IndexMap<String, Value> {
    serde_json::from_value(value).unwrap_or_default()
}

/// Attack action with one damage component written as `NdM+B`.
pub fn attack(name: &str, attack_bonus: i32, dice: &str, damage_type: &str) -> MonsterAction {
    MonsterAction {
        name: name.to_string(),
        desc: format!("Weapon Attack: +{attack_bonus} to hit. Hit: ({dice}) {damage_type} damage."),
        attack_bonus: Some(attack_bonus),
        damage: vec![Damage {
            damage_dice: Some(dice.to_string()),
            damage_bonus: None,
            damage_type: Some(DamageType {
                index: Some(damage_type.to_lowercase()),
                name: damage_type.to_string(),
            }),
        }],
    }
}

/// Non-attack action.
pub fn narrative(name: &str, desc: &str) -> MonsterAction {
    MonsterAction {
        name: name.to_string(),
        desc: desc.to_string(),
        attack_bonus: None,
        damage: vec![],
    }
}

pub fn monster_detail(
    index: &str,
    name: &str,
    hit_dice: &str,
    armor_class: u32,
    dexterity: i32,
    actions: Vec<MonsterAction>,
) -> MonsterDetail {
    MonsterDetail {
        index: index.to_string(),
        name: name.to_string(),
        size: "Medium".to_string(),
        monster_type: "humanoid".to_string(),
        subtype: None,
        alignment: "any alignment".to_string(),
        armor_class: vec![ArmorClass {
            kind: Some("natural".to_string()),
            value: armor_class,
        }],
        hit_points: None,
        hit_dice: hit_dice.to_string(),
        speed: map(json!({"walk": "30 ft."})),
        strength: 10,
        dexterity,
        constitution: 10,
        intelligence: 10,
        wisdom: 10,
        charisma: 10,
        challenge_rating: 1.0,
        senses: map(json!({"passive_perception": 10})),
        languages: "Common".to_string(),
        special_abilities: vec![],
        actions,
    }
}

// =============================================================================
// SRD Records
// =============================================================================

/// Goblin: AC 15, 2d6 (7 HP), DEX 14 (+2), Scimitar and Shortbow at +4.
pub fn goblin_detail() -> MonsterDetail {
    MonsterDetail {
        size: "Small".to_string(),
        subtype: Some("goblinoid".to_string()),
        alignment: "neutral evil".to_string(),
        hit_points: Some(7),
        strength: 8,
        wisdom: 8,
        charisma: 8,
        challenge_rating: 0.25,
        senses: map(json!({"darkvision": "60 ft.", "passive_perception": 9})),
        languages: "Common, Goblin".to_string(),
        special_abilities: vec![SpecialAbility {
            name: "Nimble Escape".to_string(),
            desc: "The goblin can take the Disengage or Hide action as a bonus action on each of its turns.".to_string(),
        }],
        ..monster_detail(
            "goblin",
            "Goblin",
            "2d6",
            15,
            14,
            vec![
                attack("Scimitar", 4, "1d6+2", "Slashing"),
                attack("Shortbow", 4, "1d6+2", "Piercing"),
            ],
        )
    }
}

/// Ogre: AC 11, 7d10+21 (59 HP), DEX 8 (-1), Greatclub at +6.
pub fn ogre_detail() -> MonsterDetail {
    MonsterDetail {
        size: "Large".to_string(),
        monster_type: "giant".to_string(),
        alignment: "chaotic evil".to_string(),
        hit_points: Some(59),
        strength: 19,
        constitution: 16,
        challenge_rating: 2.0,
        ..monster_detail(
            "ogre",
            "Ogre",
            "7d10+21",
            11,
            8,
            vec![attack("Greatclub", 6, "2d8+4", "Bludgeoning")],
        )
    }
}

/// Bandit Captain: Multiattack narrative first, then a Scimitar whose
/// damage carries a flat `damage_bonus`.
pub fn bandit_captain_detail() -> MonsterDetail {
    let mut scimitar = attack("Scimitar", 5, "1d6", "Slashing");
    scimitar.damage[0].damage_bonus = Some(3);
    monster_detail(
        "bandit-captain",
        "Bandit Captain",
        "10d8+20",
        15,
        16,
        vec![
            narrative(
                "Multiattack",
                "The captain makes three melee attacks: two with its scimitar and one with its dagger.",
            ),
            scimitar,
            narrative("Parry", ""),
        ],
    )
}

pub fn monster_list() -> Vec<MonsterSummary> {
    [
        ("aboleth", "Aboleth"),
        ("bandit-captain", "Bandit Captain"),
        ("goblin", "Goblin"),
        ("goblin-boss", "Goblin Boss"),
        ("ogre", "Ogre"),
    ]
    .into_iter()
    .map(|(index, name)| MonsterSummary {
        index: index.to_string(),
        name: name.to_string(),
    })
    .collect()
}
