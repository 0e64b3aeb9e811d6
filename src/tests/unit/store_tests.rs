//! Participant store tests: roster validation, turn pointer clamping and
//! the monster reference data.

use crate::core::combat::{
    CombatError, CombatState, MonsterParticipant, Participant, ParticipantUpdate, PlayerCharacter,
};
use crate::tests::common::{goblin_detail, monster_list, narrative};

fn player(name: &str, initiative: i32) -> PlayerCharacter {
    PlayerCharacter::new(name, initiative, 14)
}

fn goblin(name: &str, initiative: i32) -> MonsterParticipant {
    MonsterParticipant::from_detail("goblin", &goblin_detail(), name, initiative)
}

fn names(state: &CombatState) -> Vec<&str> {
    state.participants().iter().map(Participant::name).collect()
}

// ============================================================================
// Roster
// ============================================================================

#[test]
fn test_add_rejects_missing_id() {
    let mut state = CombatState::new();
    let mut pc = player("Aria", 10);
    pc.id = "  ".to_string();

    assert_eq!(state.add_participant(pc), Err(CombatError::MissingId));
    assert!(state.is_empty());
}

#[test]
fn test_add_rejects_duplicate_id() {
    let mut state = CombatState::new();
    let pc = player("Aria", 10);
    let mut twin = player("Bram", 12);
    twin.id = pc.id.clone();

    state.add_participant(pc).unwrap();
    assert!(matches!(
        state.add_participant(twin),
        Err(CombatError::DuplicateParticipant(_))
    ));
    assert_eq!(names(&state), ["Aria"]);
}

#[test]
fn test_add_keeps_insertion_order() {
    let mut state = CombatState::new();
    state.add_participant(player("Aria", 5)).unwrap();
    state.add_participant(goblin("Goblin", 20)).unwrap();
    state.add_participant(player("Bram", 12)).unwrap();

    assert_eq!(names(&state), ["Aria", "Goblin", "Bram"]);
    assert_eq!(state.players().count(), 2);
}

#[test]
fn test_update_merges_only_set_fields() {
    let mut state = CombatState::new();
    let pc = player("Aria", 10);
    let id = pc.id.clone();
    state.add_participant(pc).unwrap();

    state
        .update_participant(
            &id,
            ParticipantUpdate {
                initiative: Some(18),
                ..Default::default()
            },
        )
        .unwrap();

    let updated = state.participant(&id).unwrap();
    assert_eq!(updated.name(), "Aria");
    assert_eq!(updated.initiative(), 18);
    assert_eq!(updated.ac(), 14);
}

#[test]
fn test_update_actions_only_touch_monsters() {
    let mut state = CombatState::new();
    let pc = player("Aria", 10);
    let pc_id = pc.id.clone();
    let gob = goblin("Goblin", 12);
    let gob_id = gob.id.clone();
    state.add_participant(pc).unwrap();
    state.add_participant(gob).unwrap();

    let update = ParticipantUpdate {
        actions: Some(vec![narrative("Shriek", "It shrieks.")]),
        ..Default::default()
    };
    state.update_participant(&pc_id, update.clone()).unwrap();
    state.update_participant(&gob_id, update).unwrap();

    assert!(state.participant(&pc_id).unwrap().as_monster().is_none());
    let monster = state.monster(&gob_id).unwrap();
    assert_eq!(monster.actions.len(), 1);
    assert_eq!(monster.actions[0].name, "Shriek");
}

#[test]
fn test_update_unknown_participant() {
    let mut state = CombatState::new();
    assert_eq!(
        state.update_participant("nope", ParticipantUpdate::default()),
        Err(CombatError::ParticipantNotFound("nope".into()))
    );
}

#[test]
fn test_monster_lookup_distinguishes_errors() {
    let mut state = CombatState::new();
    let pc = player("Aria", 10);
    let pc_id = pc.id.clone();
    state.add_participant(pc).unwrap();

    assert_eq!(
        state.monster(&pc_id).unwrap_err(),
        CombatError::NotAMonster("Aria".into())
    );
    assert_eq!(
        state.monster("ghost").unwrap_err(),
        CombatError::ParticipantNotFound("ghost".into())
    );
}

// ============================================================================
// Removal and the turn pointer
// ============================================================================

#[test]
fn test_remove_clamps_turn_index() {
    let mut state = CombatState::new();
    let ids: Vec<String> = ["Aria", "Bram", "Cade"]
        .iter()
        .map(|n| {
            let pc = player(n, 10);
            let id = pc.id.clone();
            state.add_participant(pc).unwrap();
            id
        })
        .collect();
    state.set_current_turn_index(Some(2));

    state.remove_participant(&ids[2]).unwrap();
    assert_eq!(state.current_turn_index(), Some(1));

    state.remove_participant(&ids[0]).unwrap();
    // Index 1 is now past the end of a single-entry roster
    assert_eq!(state.current_turn_index(), Some(0));

    state.remove_participant(&ids[1]).unwrap();
    assert_eq!(state.current_turn_index(), None);
    assert!(state.active_participant().is_none());
}

#[test]
fn test_remove_before_active_does_not_shift_pointer() {
    let mut state = CombatState::new();
    let first = player("Aria", 10);
    let first_id = first.id.clone();
    state.add_participant(first).unwrap();
    state.add_participant(player("Bram", 10)).unwrap();
    state.add_participant(player("Cade", 10)).unwrap();
    state.set_current_turn_index(Some(1));

    state.remove_participant(&first_id).unwrap();
    assert_eq!(state.current_turn_index(), Some(1));
    assert_eq!(state.active_participant().unwrap().name(), "Cade");
}

#[test]
fn test_remove_unknown_leaves_state() {
    let mut state = CombatState::new();
    state.add_participant(player("Aria", 10)).unwrap();

    assert!(state.remove_participant("ghost").is_err());
    assert_eq!(state.len(), 1);
}

#[test]
fn test_set_turn_index_clamps() {
    let mut state = CombatState::new();
    assert_eq!(state.set_current_turn_index(Some(3)), None);

    state.add_participant(player("Aria", 10)).unwrap();
    state.add_participant(player("Bram", 10)).unwrap();
    assert_eq!(state.set_current_turn_index(Some(7)), Some(1));
    assert_eq!(state.set_current_turn_index(None), None);
}

#[test]
fn test_sort_follows_active_participant() {
    let mut state = CombatState::new();
    state.add_participant(player("Slow", 3)).unwrap();
    state.add_participant(player("Fast", 19)).unwrap();
    state.add_participant(player("Mid", 11)).unwrap();
    state.set_current_turn_index(Some(0));

    state.sort_by_initiative();

    assert_eq!(names(&state), ["Fast", "Mid", "Slow"]);
    assert_eq!(state.current_turn_index(), Some(2));
    assert_eq!(state.active_participant().unwrap().name(), "Slow");
}

#[test]
fn test_counters() {
    let mut state = CombatState::new();
    assert_eq!(state.current_round(), 0);
    assert_eq!(state.increment_current_round(), 1);
    state.set_total_turns(4);
    assert_eq!(state.increment_total_turns(), 5);
    state.set_combat_started(true);
    assert!(state.combat_started());
}

// ============================================================================
// Reference data
// ============================================================================

#[test]
fn test_cache_rejects_empty_key() {
    let mut state = CombatState::new();
    assert_eq!(
        state.cache_monster_detail(" ", goblin_detail()),
        Err(CombatError::EmptyMonsterKey)
    );
    assert_eq!(state.cached_monster_count(), 0);
}

#[test]
fn test_cache_overwrites_same_key() {
    let mut state = CombatState::new();
    state.cache_monster_detail("goblin", goblin_detail()).unwrap();
    let mut renamed = goblin_detail();
    renamed.name = "Goblin Scout".into();
    state.cache_monster_detail("goblin", renamed).unwrap();

    assert_eq!(state.cached_monster_count(), 1);
    assert_eq!(state.monster_detail("goblin").unwrap().name, "Goblin Scout");
}

#[test]
fn test_find_monster_is_exact_and_case_insensitive() {
    let mut state = CombatState::new();
    state.set_monster_list(monster_list());

    assert_eq!(state.find_monster("  goblin ").unwrap().index, "goblin");
    assert_eq!(state.find_monster("GOBLIN BOSS").unwrap().index, "goblin-boss");
    assert!(state.find_monster("gob").is_none());
    assert!(state.find_monster("").is_none());
}
