//! Wire types for the D&D 5e SRD monster endpoints.
//!
//! Only the fields the tracker reads are modelled. Everything is
//! `#[serde(default)]` so partial records still decode.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /monsters` response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterList {
    pub count: Option<u32>,
    pub results: Vec<MonsterSummary>,
}

/// One entry of the monster list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterSummary {
    pub index: String,
    pub name: String,
}

/// `GET /monsters/{index}` response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterDetail {
    pub index: String,
    pub name: String,
    pub size: String,
    #[serde(rename = "type")]
    pub monster_type: String,
    pub subtype: Option<String>,
    pub alignment: String,
    pub armor_class: Vec<ArmorClass>,
    pub hit_points: Option<i32>,
    pub hit_dice: String,
    pub speed: IndexMap<String, Value>,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub challenge_rating: f64,
    pub senses: IndexMap<String, Value>,
    pub languages: String,
    pub special_abilities: Vec<SpecialAbility>,
    pub actions: Vec<MonsterAction>,
}

impl MonsterDetail {
    /// First listed armor class, or 10 when the record has none.
    pub fn primary_armor_class(&self) -> u32 {
        self.armor_class.first().map(|ac| ac.value).unwrap_or(10)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorClass {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub value: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialAbility {
    pub name: String,
    pub desc: String,
}

/// A stat-block action. Attacks carry `attack_bonus`; everything else is
/// narrative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterAction {
    pub name: String,
    pub desc: String,
    pub attack_bonus: Option<i32>,
    pub damage: Vec<Damage>,
}

impl MonsterAction {
    pub fn is_attack(&self) -> bool {
        self.attack_bonus.is_some()
    }
}

/// One damage component of an action. Choice entries (`choose`/`from`) in
/// the source data decode with no `damage_dice` and are skipped when rolling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Damage {
    pub damage_dice: Option<String>,
    pub damage_bonus: Option<i32>,
    pub damage_type: Option<DamageType>,
}

impl Damage {
    pub fn type_name(&self) -> &str {
        self.damage_type
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or("untyped")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageType {
    pub index: Option<String>,
    pub name: String,
}

/// Render a JSON map value the way a stat block prints it.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `30 ft., fly 60 ft., hover`
pub fn format_speed(speed: &IndexMap<String, Value>) -> String {
    speed
        .iter()
        .map(|(kind, value)| match value {
            Value::Bool(true) => kind.clone(),
            _ if kind == "walk" => display_value(value),
            _ => format!("{kind} {}", display_value(value)),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `darkvision 60 ft., passive perception 9`
pub fn format_senses(senses: &IndexMap<String, Value>) -> String {
    senses
        .iter()
        .map(|(kind, value)| format!("{} {}", kind.replace('_', " "), display_value(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `1/4`, `1/2`, `1/8` or the integer rating.
pub fn format_challenge_rating(cr: f64) -> String {
    if cr > 0.0 && cr < 1.0 {
        format!("1/{}", (1.0 / cr).round() as u32)
    } else {
        format!("{}", cr.round() as i64)
    }
}
