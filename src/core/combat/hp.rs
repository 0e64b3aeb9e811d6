//! HP Adjustment
//!
//! Damage and healing apply to monsters only. Amounts must be positive;
//! results are clamped to `[0, max_hp]`.

use serde::Serialize;
use tracing::{debug, warn};

use super::error::{CombatError, Result};
use super::store::CombatState;

/// Hit points before and after an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HpChange {
    pub before: u32,
    pub after: u32,
    pub max: u32,
    pub defeated: bool,
}

impl HpChange {
    /// Hit points actually lost or gained.
    pub fn delta(&self) -> i64 {
        i64::from(self.after) - i64::from(self.before)
    }
}

fn validate_amount(amount: i64) -> Result<()> {
    if amount <= 0 {
        warn!(amount, "rejected non-positive hit point amount");
        return Err(CombatError::InvalidAmount(amount));
    }
    Ok(())
}

impl CombatState {
    /// `current_hp = max(0, current_hp - amount)`
    pub fn apply_damage(&mut self, id: &str, amount: i64) -> Result<HpChange> {
        validate_amount(amount)?;
        let monster = self.monster_mut(id)?;
        let before = monster.current_hp();
        monster.set_current_hp(i64::from(before) - amount);

        let change = HpChange {
            before,
            after: monster.current_hp(),
            max: monster.max_hp(),
            defeated: monster.defeated(),
        };
        debug!(id, amount, before, after = change.after, "damage applied");
        Ok(change)
    }

    /// `current_hp = min(max_hp, current_hp + amount)`
    pub fn apply_heal(&mut self, id: &str, amount: i64) -> Result<HpChange> {
        validate_amount(amount)?;
        let monster = self.monster_mut(id)?;
        let before = monster.current_hp();
        monster.set_current_hp(i64::from(before).saturating_add(amount));

        let change = HpChange {
            before,
            after: monster.current_hp(),
            max: monster.max_hp(),
            defeated: monster.defeated(),
        };
        debug!(id, amount, before, after = change.after, "healing applied");
        Ok(change)
    }
}
