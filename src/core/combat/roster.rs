//! Builders for new roster entries.

use std::collections::HashSet;

use super::participant::{MonsterParticipant, PlayerCharacter};
use crate::core::bestiary::MonsterDetail;
use crate::core::dice::{ability_modifier, DiceSource};

/// Largest batch of random player characters added at once.
pub const MAX_RANDOM_PLAYERS: usize = 10;

/// Largest batch of one monster kind added at once.
pub const MAX_MONSTER_BATCH: usize = 20;

pub const RANDOM_PLAYER_NAMES: [&str; 50] = [
    "Aragorn",
    "Gandalf",
    "Legolas",
    "Gimli",
    "Frodo",
    "Samwise",
    "Meriadoc",
    "Peregrin",
    "Boromir",
    "Faramir",
    "Éowyn",
    "Éomer",
    "Théoden",
    "Galadriel",
    "Elrond",
    "Arwen",
    "Bilbo",
    "Thorin",
    "Balin",
    "Dwalin",
    "Fíli",
    "Kíli",
    "Glóin",
    "Óin",
    "Dori",
    "Nori",
    "Ori",
    "Bifur",
    "Bofur",
    "Bombur",
    "Thranduil",
    "Tauriel",
    "Bard",
    "Beorn",
    "Radagast",
    "Saruman",
    "Gollum",
    "Smaug",
    "Denethor",
    "Celeborn",
    "Haldir",
    "Glorfindel",
    "Círdan",
    "Elendil",
    "Isildur",
    "Gil-galad",
    "Celebrimbor",
    "Thingol",
    "Lúthien",
    "Beren",
];

/// Pick a name not in `used`. Once the list is exhausted a random name gets
/// `" <ordinal>"` appended until it is unique.
fn pick_name(dice: &mut dyn DiceSource, used: &HashSet<String>, ordinal: usize) -> String {
    let free: Vec<&str> = RANDOM_PLAYER_NAMES
        .iter()
        .copied()
        .filter(|n| !used.contains(*n))
        .collect();
    if !free.is_empty() {
        return free[dice.choose_index(free.len()).min(free.len() - 1)].to_string();
    }

    let base = RANDOM_PLAYER_NAMES[dice
        .choose_index(RANDOM_PLAYER_NAMES.len())
        .min(RANDOM_PLAYER_NAMES.len() - 1)];
    let mut suffix = ordinal;
    loop {
        let candidate = format!("{base} {suffix}");
        if !used.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// `count` random player characters (clamped to 1..=10) with names unique
/// among themselves and `existing_names`.
///
/// Initiative is d20 + 0..=4, AC is 12..=19.
pub fn random_players<'a>(
    dice: &mut dyn DiceSource,
    count: usize,
    existing_names: impl IntoIterator<Item = &'a str>,
) -> Vec<PlayerCharacter> {
    let count = count.clamp(1, MAX_RANDOM_PLAYERS);
    let mut used: HashSet<String> = existing_names.into_iter().map(str::to_string).collect();

    (0..count)
        .map(|i| {
            let name = pick_name(dice, &used, i + 1);
            used.insert(name.clone());
            let initiative = dice.roll_die(20) + (dice.roll_die(5) - 1);
            let ac = (11 + dice.roll_die(8)).max(0) as u32;
            PlayerCharacter::new(name, initiative, ac)
        })
        .collect()
}

/// `count` copies of one monster. With more than one, names are suffixed
/// `" 1"` through `" <count>"`. Each copy rolls its own d20 + DEX initiative.
pub fn monster_group(
    dice: &mut dyn DiceSource,
    index: &str,
    detail: &MonsterDetail,
    count: usize,
) -> Vec<MonsterParticipant> {
    let count = count.clamp(1, MAX_MONSTER_BATCH);
    let dex_mod = ability_modifier(detail.dexterity);

    (1..=count)
        .map(|n| {
            let name = if count > 1 {
                format!("{} {n}", detail.name)
            } else {
                detail.name.clone()
            };
            let initiative = dice.roll_die(20) + dex_mod;
            MonsterParticipant::from_detail(index, detail, name, initiative)
        })
        .collect()
}
