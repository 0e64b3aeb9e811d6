//! Roster builders: random player characters, monster groups, and the
//! encounter entry points that use them.

use std::collections::HashSet;

use crate::core::combat::roster::{monster_group, random_players, RANDOM_PLAYER_NAMES};
use crate::core::combat::{CombatError, CombatEventKind, MAX_MONSTER_BATCH, MAX_RANDOM_PLAYERS};
use crate::core::dice::DiceRoller;
use crate::tests::common::{goblin_detail, ogre_detail, scripted_encounter, ScriptedDice};

// ============================================================================
// Random players
// ============================================================================

#[test]
fn test_random_player_count_is_clamped() {
    let mut dice = DiceRoller::seeded(1);
    assert_eq!(random_players(&mut dice, 0, []).len(), 1);
    assert_eq!(random_players(&mut dice, 4, []).len(), 4);
    assert_eq!(random_players(&mut dice, 99, []).len(), MAX_RANDOM_PLAYERS);
}

#[test]
fn test_random_player_stats_in_range() {
    let mut dice = DiceRoller::seeded(99);
    for pc in random_players(&mut dice, MAX_RANDOM_PLAYERS, []) {
        assert!((1..=24).contains(&pc.initiative), "initiative {}", pc.initiative);
        assert!((12..=19).contains(&pc.ac), "ac {}", pc.ac);
        assert!(pc.id.starts_with("pc-"));
    }
}

#[test]
fn test_random_player_stats_from_rolls() {
    // name pick 0, d20 = 20, d5 = 5, d8 = 8
    let mut dice = ScriptedDice::new(&[20, 5, 8]);
    let pcs = random_players(&mut dice, 1, []);
    assert_eq!(pcs[0].name, "Aragorn");
    assert_eq!(pcs[0].initiative, 24);
    assert_eq!(pcs[0].ac, 19);
}

#[test]
fn test_random_names_avoid_existing_players() {
    let mut dice = ScriptedDice::new(&[10]);
    let pcs = random_players(&mut dice, 3, ["Aragorn", "Gandalf"]);
    let names: Vec<&str> = pcs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Legolas", "Gimli", "Frodo"]);
}

#[test]
fn test_random_names_fall_back_to_suffix() {
    let mut dice = DiceRoller::seeded(5);
    let pcs = random_players(&mut dice, 5, RANDOM_PLAYER_NAMES);

    let names: HashSet<&str> = pcs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names.len(), 5);
    for name in &names {
        assert!(!RANDOM_PLAYER_NAMES.contains(name), "{name} reused");
        let (base, suffix) = name.rsplit_once(' ').unwrap();
        assert!(RANDOM_PLAYER_NAMES.contains(&base));
        assert!(suffix.parse::<usize>().is_ok());
    }
}

#[test]
fn test_encounter_random_players_are_logged() {
    let mut encounter = scripted_encounter(&[20, 5, 8]);
    encounter.add_player("Aragorn", 10, 14).unwrap();

    let ids = encounter.add_random_players(1).unwrap();

    let pc = encounter.state().participant(&ids[0]).unwrap();
    assert_eq!(pc.name(), "Gandalf");
    assert_eq!(
        encounter.log().last().unwrap().description,
        "Added random PC: Gandalf (Initiative: 24, AC: 19)"
    );
}

// ============================================================================
// Monster groups
// ============================================================================

#[test]
fn test_single_monster_keeps_plain_name() {
    let mut dice = ScriptedDice::new(&[7]);
    let group = monster_group(&mut dice, "goblin", &goblin_detail(), 1);
    assert_eq!(group[0].name, "Goblin");
    assert_eq!(group[0].initiative, 9);
    assert_eq!(group[0].max_hp(), 7);
    assert_eq!(group[0].current_hp(), 7);
    assert_eq!(group[0].ac, 15);
}

#[test]
fn test_group_names_are_numbered_with_own_initiative() {
    let mut dice = ScriptedDice::new(&[3, 12, 20]);
    let group = monster_group(&mut dice, "ogre", &ogre_detail(), 3);

    let summary: Vec<(&str, i32)> = group
        .iter()
        .map(|m| (m.name.as_str(), m.initiative))
        .collect();
    assert_eq!(summary, [("Ogre 1", 2), ("Ogre 2", 11), ("Ogre 3", 19)]);
    let ids: HashSet<&str> = group.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_add_monsters_caches_detail() {
    let mut encounter = scripted_encounter(&[10]);
    encounter.add_monsters("goblin", &goblin_detail(), 2).unwrap();

    assert_eq!(encounter.state().cached_monster_count(), 1);
    assert!(encounter.state().monster_detail("goblin").is_some());
    assert_eq!(
        encounter
            .log()
            .iter()
            .filter(|e| e.kind == CombatEventKind::Joined)
            .count(),
        2
    );
}

#[test]
fn test_add_monsters_rejects_zero() {
    let mut encounter = scripted_encounter(&[10]);
    assert_eq!(
        encounter.add_monsters("goblin", &goblin_detail(), 0),
        Err(CombatError::InvalidAmount(0))
    );
    assert!(encounter.state().is_empty());
    assert_eq!(encounter.state().cached_monster_count(), 0);
}

#[test]
fn test_add_monsters_caps_batch() {
    let mut encounter = scripted_encounter(&[10]);
    let ids = encounter.add_monsters("goblin", &goblin_detail(), 50).unwrap();
    assert_eq!(ids.len(), MAX_MONSTER_BATCH);
}

#[test]
fn test_add_monsters_rejects_empty_index() {
    let mut encounter = scripted_encounter(&[10]);
    assert_eq!(
        encounter.add_monsters(" ", &goblin_detail(), 1),
        Err(CombatError::EmptyMonsterKey)
    );
    assert!(encounter.state().is_empty());
}

// ============================================================================
// Players
// ============================================================================

#[test]
fn test_add_player_trims_and_requires_name() {
    let mut encounter = scripted_encounter(&[]);
    assert_eq!(encounter.add_player("   ", 10, 12), Err(CombatError::EmptyName));

    let id = encounter.add_player("  Aria ", 10, 12).unwrap();
    assert_eq!(encounter.state().participant(&id).unwrap().name(), "Aria");
}

#[test]
fn test_duplicate_player_names_are_allowed() {
    let mut encounter = scripted_encounter(&[]);
    let a = encounter.add_player("Aria", 10, 12).unwrap();
    let b = encounter.add_player("Aria", 10, 12).unwrap();
    assert_ne!(a, b);
    assert_eq!(encounter.state().len(), 2);
}
