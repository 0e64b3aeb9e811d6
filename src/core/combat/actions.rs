//! Monster action resolution.
//!
//! Attack actions roll d20 + attack bonus against the target's AC and, on a
//! hit, roll every damage component. The damage total is reported to the
//! game master and never applied to the target.

use std::fmt;

use serde::Serialize;

use crate::core::bestiary::{Damage, MonsterAction};
use crate::core::dice::{roll_dice_expression, DiceSource};

/// One rolled damage component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DamageRoll {
    /// Dice plus any bonus written inside the dice expression.
    pub rolled: i32,
    /// Flat `damage_bonus` of the component.
    pub bonus: i32,
    pub damage_type: String,
}

impl DamageRoll {
    pub fn total(&self) -> i32 {
        self.rolled + self.bonus
    }
}

impl fmt::Display for DamageRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} {}", self.rolled, self.bonus, self.damage_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DamageReport {
    pub rolls: Vec<DamageRoll>,
}

impl DamageReport {
    pub fn total(&self) -> i32 {
        self.rolls.iter().map(DamageRoll::total).sum()
    }

    /// `"5 + 2 slashing, 3 + 0 fire"`
    pub fn breakdown(&self) -> String {
        self.rolls
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackReport {
    pub attacker: String,
    pub action: String,
    pub target_id: String,
    pub target: String,
    pub d20: i32,
    pub attack_bonus: i32,
    pub target_ac: u32,
    /// Present exactly when the attack hit.
    pub damage: Option<DamageReport>,
}

impl AttackReport {
    pub fn attack_total(&self) -> i32 {
        self.d20 + self.attack_bonus
    }

    pub fn hit(&self) -> bool {
        self.damage.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeReport {
    pub actor: String,
    pub action: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ActionOutcome {
    Attack(AttackReport),
    Narrative(NarrativeReport),
}

impl ActionOutcome {
    pub fn actor(&self) -> &str {
        match self {
            Self::Attack(a) => &a.attacker,
            Self::Narrative(n) => &n.actor,
        }
    }

    /// Text lines for the turn info panel.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Attack(a) => {
                let mut lines = vec![
                    format!("{} uses {} on {}.", a.attacker, a.action, a.target),
                    format!(
                        "Attack roll: {} + {} = {} vs AC {}",
                        a.d20,
                        a.attack_bonus,
                        a.attack_total(),
                        a.target_ac
                    ),
                ];
                lines.push(match &a.damage {
                    Some(damage) => format!(
                        "Hit! Deals {} damage ({}).",
                        damage.total(),
                        damage.breakdown()
                    ),
                    None => "Misses!".to_string(),
                });
                lines
            }
            Self::Narrative(n) => vec![
                format!("{} uses {}.", n.actor, n.action),
                n.description.clone(),
            ],
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join(" "))
    }
}

/// A target as seen by an attack roll.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub ac: u32,
}

fn roll_damage(dice: &mut dyn DiceSource, components: &[Damage]) -> DamageReport {
    let rolls = components
        .iter()
        .filter_map(|component| {
            let expr = component.damage_dice.as_deref()?;
            // An inline `+B` in the dice string is not part of the roll
            let rolled = roll_dice_expression(dice, expr);
            Some(DamageRoll {
                rolled,
                bonus: component.damage_bonus.unwrap_or(0),
                damage_type: component.type_name().to_string(),
            })
        })
        .collect();
    DamageReport { rolls }
}

/// Resolve `action` by `actor` against `target`. Ties on the attack roll hit.
pub fn resolve_action(
    dice: &mut dyn DiceSource,
    actor: &str,
    action: &MonsterAction,
    target: Target<'_>,
) -> ActionOutcome {
    let Some(attack_bonus) = action.attack_bonus else {
        let description = if action.desc.trim().is_empty() {
            "No description available.".to_string()
        } else {
            action.desc.clone()
        };
        return ActionOutcome::Narrative(NarrativeReport {
            actor: actor.to_string(),
            action: action.name.clone(),
            description,
        });
    };

    let d20 = dice.roll_die(20);
    let hit = i64::from(d20) + i64::from(attack_bonus) >= i64::from(target.ac);
    let damage = hit.then(|| roll_damage(dice, &action.damage));

    ActionOutcome::Attack(AttackReport {
        attacker: actor.to_string(),
        action: action.name.clone(),
        target_id: target.id.to_string(),
        target: target.name.to_string(),
        d20,
        attack_bonus,
        target_ac: target.ac,
        damage,
    })
}
