//! Monster action resolution: attack rolls, damage breakdowns, narrative
//! actions and the engine's target and fallback handling.

use mockall::predicate::eq;

use crate::core::bestiary::Damage;
use crate::core::combat::actions::{resolve_action, Target};
use crate::core::combat::{
    ActionOutcome, CombatError, CombatEventKind, Encounter, ParticipantUpdate,
};
use crate::core::dice::MockDiceSource;
use crate::tests::common::{
    attack, bandit_captain_detail, goblin_detail, narrative, scripted_encounter, ScriptedDice,
};

const ARIA: Target<'static> = Target {
    id: "pc-aria",
    name: "Aria",
    ac: 14,
};

fn d20(value: i32) -> MockDiceSource {
    let mut dice = MockDiceSource::new();
    dice.expect_roll_die()
        .with(eq(20))
        .times(1)
        .return_const(value);
    dice
}

// ============================================================================
// resolve_action
// ============================================================================

#[test]
fn test_attack_tie_hits() {
    let mut dice = d20(10);
    dice.expect_roll_die().with(eq(6)).times(1).return_const(3);

    let outcome = resolve_action(&mut dice, "Goblin", &attack("Scimitar", 4, "1d6+2", "Slashing"), ARIA);

    let ActionOutcome::Attack(report) = &outcome else {
        panic!("expected an attack");
    };
    assert!(report.hit());
    assert_eq!(report.attack_total(), 14);
    assert_eq!(
        outcome.lines(),
        [
            "Goblin uses Scimitar on Aria.",
            "Attack roll: 10 + 4 = 14 vs AC 14",
            "Hit! Deals 3 damage (3 + 0 Slashing).",
        ]
    );
}

#[test]
fn test_inline_dice_bonus_is_not_added() {
    let mut dice = ScriptedDice::new(&[10, 3]);

    let outcome = resolve_action(&mut dice, "Goblin", &attack("Scimitar", 4, "1d6+2", "Slashing"), ARIA);

    let ActionOutcome::Attack(report) = outcome else {
        panic!("expected an attack");
    };
    let damage = report.damage.unwrap();
    assert_eq!(damage.total(), 3);
    assert_eq!(damage.breakdown(), "3 + 0 Slashing");
}

#[test]
fn test_miss_rolls_no_damage() {
    let mut dice = d20(5);

    let outcome = resolve_action(&mut dice, "Goblin", &attack("Scimitar", 4, "1d6+2", "Slashing"), ARIA);

    let ActionOutcome::Attack(report) = &outcome else {
        panic!("expected an attack");
    };
    assert!(!report.hit());
    assert_eq!(outcome.lines().last().map(String::as_str), Some("Misses!"));
}

#[test]
fn test_damage_bonus_is_reported_separately() {
    let mut dice = d20(18);
    dice.expect_roll_die().with(eq(6)).times(1).return_const(4);
    let scimitar = bandit_captain_detail().actions[1].clone();

    let outcome = resolve_action(&mut dice, "Bandit Captain", &scimitar, ARIA);

    assert_eq!(
        outcome.lines()[2],
        "Hit! Deals 7 damage (4 + 3 Slashing)."
    );
}

#[test]
fn test_multiple_damage_components() {
    let mut dice = d20(15);
    dice.expect_roll_die().with(eq(8)).times(2).return_const(5);
    dice.expect_roll_die().with(eq(6)).times(1).return_const(2);

    let mut action = attack("Flame Tongue", 7, "2d8+4", "Slashing");
    action.damage.push(Damage {
        damage_dice: Some("1d6".into()),
        damage_bonus: None,
        damage_type: None,
    });
    // Choice entries carry no dice and are skipped
    action.damage.push(Damage::default());

    let outcome = resolve_action(&mut dice, "Knight", &action, ARIA);
    let ActionOutcome::Attack(report) = outcome else {
        panic!("expected an attack");
    };
    let damage = report.damage.unwrap();
    assert_eq!(damage.rolls.len(), 2);
    assert_eq!(damage.total(), 12);
    assert_eq!(damage.breakdown(), "10 + 0 Slashing, 2 + 0 untyped");
}

#[test]
fn test_narrative_action_rolls_nothing() {
    let mut dice = MockDiceSource::new();
    dice.expect_roll_die().never();

    let outcome = resolve_action(
        &mut dice,
        "Bandit Captain",
        &narrative("Multiattack", "Three attacks."),
        ARIA,
    );
    assert_eq!(
        outcome.lines(),
        ["Bandit Captain uses Multiattack.", "Three attacks."]
    );
}

#[test]
fn test_narrative_without_description() {
    let mut dice = MockDiceSource::new();
    let outcome = resolve_action(&mut dice, "Bandit Captain", &narrative("Parry", "  "), ARIA);
    assert_eq!(outcome.lines()[1], "No description available.");
    assert_eq!(outcome.actor(), "Bandit Captain");
}

// ============================================================================
// Encounter::perform_monster_action
// ============================================================================

#[test]
fn test_perform_targets_chosen_player() {
    // goblin init, d20, d6
    let dice = ScriptedDice::new(&[10, 16, 6]).with_picks(&[1]);
    let mut encounter = Encounter::new(Box::new(dice));
    encounter.add_player("Aria", 12, 14).unwrap();
    let bram = encounter.add_player("Bram", 9, 18).unwrap();
    let goblin = encounter
        .add_monsters("goblin", &goblin_detail(), 1)
        .unwrap()
        .remove(0);

    let outcome = encounter.perform_monster_action(&goblin, 0).unwrap();

    let ActionOutcome::Attack(report) = &outcome else {
        panic!("expected an attack");
    };
    assert_eq!(report.target_id, bram);
    assert_eq!(report.target_ac, 18);
    assert!(report.hit());
    assert_eq!(report.damage.as_ref().unwrap().total(), 6);
    assert!(encounter
        .log()
        .iter()
        .any(|e| e.kind == CombatEventKind::Attack && e.description.contains("on Bram")));
}

#[test]
fn test_perform_does_not_apply_damage() {
    let mut encounter = scripted_encounter(&[10, 20, 6]);
    encounter.add_player("Aria", 12, 14).unwrap();
    let goblins = encounter.add_monsters("goblin", &goblin_detail(), 2).unwrap();

    encounter.perform_monster_action(&goblins[0], 0).unwrap();

    for id in &goblins {
        let monster = encounter.state().monster(id).unwrap();
        assert_eq!(monster.current_hp(), monster.max_hp());
    }
}

#[test]
fn test_perform_without_players() {
    let mut encounter = scripted_encounter(&[10]);
    let goblin = encounter
        .add_monsters("goblin", &goblin_detail(), 1)
        .unwrap()
        .remove(0);

    assert_eq!(
        encounter.perform_monster_action(&goblin, 0),
        Err(CombatError::NoTargets)
    );
}

#[test]
fn test_perform_out_of_range_action() {
    let mut encounter = scripted_encounter(&[10]);
    encounter.add_player("Aria", 12, 14).unwrap();
    let goblin = encounter
        .add_monsters("goblin", &goblin_detail(), 1)
        .unwrap()
        .remove(0);

    assert_eq!(
        encounter.perform_monster_action(&goblin, 5),
        Err(CombatError::ActionNotAvailable {
            monster: "Goblin".into(),
            action_index: 5
        })
    );
}

#[test]
fn test_perform_rejects_players() {
    let mut encounter = scripted_encounter(&[]);
    let aria = encounter.add_player("Aria", 12, 14).unwrap();

    assert_eq!(
        encounter.perform_monster_action(&aria, 0),
        Err(CombatError::NotAMonster("Aria".into()))
    );
}

#[test]
fn test_perform_falls_back_to_cached_stat_block() {
    let mut encounter = scripted_encounter(&[10, 19, 4]);
    encounter.add_player("Aria", 12, 14).unwrap();
    let goblin = encounter
        .add_monsters("goblin", &goblin_detail(), 1)
        .unwrap()
        .remove(0);
    encounter
        .update_participant(
            &goblin,
            ParticipantUpdate {
                actions: Some(vec![]),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(encounter.available_actions(&goblin).len(), 2);

    let outcome = encounter.perform_monster_action(&goblin, 1).unwrap();

    assert_eq!(outcome.lines()[0], "Goblin uses Shortbow on Aria.");
    // The monster's own action list is filled in from the cache
    assert_eq!(encounter.state().monster(&goblin).unwrap().actions.len(), 2);
}

#[test]
fn test_narrative_action_logged_as_action() {
    let mut encounter = scripted_encounter(&[10]);
    encounter.add_player("Aria", 12, 14).unwrap();
    let captain = encounter
        .add_monsters("bandit-captain", &bandit_captain_detail(), 1)
        .unwrap()
        .remove(0);

    let outcome = encounter.perform_monster_action(&captain, 0).unwrap();

    assert!(matches!(outcome, ActionOutcome::Narrative(_)));
    let last = encounter.log().last().unwrap();
    assert_eq!(last.kind, CombatEventKind::Action);
    assert!(last.description.starts_with("Bandit Captain uses Multiattack."));
}
