//! Dice Utility
//!
//! Die rolls, `NdM` expressions, hit-dice averages and modifier formatting.
//!
//! Randomness is drawn through [`DiceSource`] so the combat engine can be
//! driven by a seeded roller in tests or a scripted mock when a specific
//! roll matters.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

/// Hit points used when a hit-dice expression cannot be parsed.
pub const FALLBACK_HIT_POINTS: i32 = 10;

/// Largest die count an expression may carry.
pub const MAX_DICE_COUNT: u32 = 1000;

static DICE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)d(\d+)(?:\+(\d+))?").expect("dice pattern is valid"));

// ============================================================================
// Random Source
// ============================================================================

/// Source of random numbers for every roll the tracker makes.
#[cfg_attr(test, mockall::automock)]
pub trait DiceSource {
    /// Uniform integer in `[1, sides]`. A zero-sided die rolls 0.
    fn roll_die(&mut self, sides: u32) -> i32;

    /// Uniform index in `[0, len)`. Callers never pass `len == 0`.
    fn choose_index(&mut self, len: usize) -> usize;
}

/// Default dice source backed by a standard RNG.
pub struct DiceRoller {
    rng: StdRng,
}

impl DiceRoller {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic roller, used for reproducible encounters.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for DiceRoller {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceSource for DiceRoller {
    fn roll_die(&mut self, sides: u32) -> i32 {
        if sides == 0 {
            return 0;
        }
        let sides = sides.min(i32::MAX as u32);
        self.rng.gen_range(1..=sides) as i32
    }

    fn choose_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

// ============================================================================
// Dice Expressions
// ============================================================================

/// A parsed `NdM(+B)` expression.
///
/// `count` is at most [`MAX_DICE_COUNT`] and `sides` fits in an `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceExpression {
    pub count: u32,
    pub sides: u32,
    pub bonus: i32,
}

impl DiceExpression {
    /// Parse the first `NdM` group in `text`, with an optional `+B` written
    /// directly after it. Anything else after the group is ignored.
    ///
    /// Returns `None` when no dice group is present or a number is out of
    /// range.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = DICE_PATTERN.captures(text)?;
        let count: u32 = caps.get(1)?.as_str().parse().ok()?;
        let sides: u32 = caps.get(2)?.as_str().parse().ok()?;
        if count > MAX_DICE_COUNT || sides > i32::MAX as u32 {
            return None;
        }
        let bonus = match caps.get(3) {
            Some(value) => value.as_str().parse().ok()?,
            None => 0,
        };
        Some(Self {
            count,
            sides,
            bonus,
        })
    }

    /// `floor(count * (sides + 1) / 2) + bonus`
    pub fn average(&self) -> i32 {
        let dice = u64::from(self.count) * (u64::from(self.sides) + 1) / 2;
        (dice as i64 + i64::from(self.bonus)).clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    /// Sum of `count` rolls, without the bonus.
    pub fn roll_dice(&self, dice: &mut dyn DiceSource) -> i32 {
        (0..self.count)
            .map(|_| dice.roll_die(self.sides))
            .fold(0i32, i32::saturating_add)
    }

    /// Sum of `count` rolls plus the bonus.
    pub fn roll(&self, dice: &mut dyn DiceSource) -> i32 {
        self.roll_dice(dice).saturating_add(self.bonus)
    }
}

impl std::fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.bonus != 0 {
            write!(f, "{}", format_modifier(self.bonus))?;
        }
        Ok(())
    }
}

// ============================================================================
// Free Functions
// ============================================================================

/// Roll a single die.
pub fn roll_die(dice: &mut dyn DiceSource, sides: u32) -> i32 {
    dice.roll_die(sides)
}

/// Roll the `NdM` part of `expr` and sum it. Any bonus is left to the caller.
///
/// Returns 0 when `expr` holds no dice group.
pub fn roll_dice_expression(dice: &mut dyn DiceSource, expr: &str) -> i32 {
    DiceExpression::parse(expr)
        .map(|parsed| parsed.roll_dice(dice))
        .unwrap_or(0)
}

/// Average hit points for a hit-dice expression such as `3d8+6`.
pub fn average_hit_points(hit_dice: &str) -> i32 {
    DiceExpression::parse(hit_dice)
        .map(|parsed| parsed.average())
        .unwrap_or(FALLBACK_HIT_POINTS)
}

/// `+2` / `-1` style modifier text.
pub fn format_modifier(modifier: i32) -> String {
    if modifier >= 0 {
        format!("+{modifier}")
    } else {
        format!("{modifier}")
    }
}

/// Ability modifier for a score: `floor((score - 10) / 2)`.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}
