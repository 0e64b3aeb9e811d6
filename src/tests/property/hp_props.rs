//! Property-based tests for hit point adjustment
//!
//! Tests invariants:
//! - Hit points never leave `[0, max_hp]` under any sequence of changes
//! - Defeated exactly when hit points are 0
//! - Non-positive amounts never change anything

use proptest::prelude::*;

use crate::core::combat::CombatState;
use crate::core::combat::MonsterParticipant;
use crate::tests::common::{monster_detail, narrative};

#[derive(Debug, Clone, Copy)]
enum Change {
    Damage(i64),
    Heal(i64),
}

fn arb_change() -> impl Strategy<Value = Change> {
    prop_oneof![
        (-5i64..200).prop_map(Change::Damage),
        (-5i64..200).prop_map(Change::Heal),
    ]
}

fn state_with_monster(hit_dice: &str) -> (CombatState, String) {
    let detail = monster_detail("brute", "Brute", hit_dice, 12, 10, vec![narrative("Roar", "")]);
    let monster = MonsterParticipant::from_detail("brute", &detail, "Brute", 10);
    let id = monster.id.clone();
    let mut state = CombatState::new();
    state.add_participant(monster).unwrap();
    (state, id)
}

proptest! {
    #[test]
    fn hp_stays_in_bounds(
        count in 1u32..=12,
        sides in 4u32..=12,
        changes in prop::collection::vec(arb_change(), 0..40),
    ) {
        let (mut state, id) = state_with_monster(&format!("{count}d{sides}"));
        let max = state.monster(&id).unwrap().max_hp();

        for change in changes {
            let before = state.monster(&id).unwrap().current_hp();
            let result = match change {
                Change::Damage(amount) => state.apply_damage(&id, amount),
                Change::Heal(amount) => state.apply_heal(&id, amount),
            };
            let monster = state.monster(&id).unwrap();

            match (change, result) {
                (Change::Damage(a) | Change::Heal(a), Err(_)) => {
                    prop_assert!(a <= 0);
                    prop_assert_eq!(monster.current_hp(), before);
                }
                (_, Ok(hp)) => {
                    prop_assert_eq!(hp.after, monster.current_hp());
                    prop_assert_eq!(hp.max, max);
                }
            }
            prop_assert!(monster.current_hp() <= max);
            prop_assert_eq!(monster.defeated(), monster.current_hp() == 0);
        }
    }

    #[test]
    fn damage_then_equal_heal_restores(amount in 1i64..30) {
        let (mut state, id) = state_with_monster("10d10");
        let max = i64::from(state.monster(&id).unwrap().max_hp());

        state.apply_damage(&id, amount).unwrap();
        let healed = state.apply_heal(&id, amount).unwrap();

        prop_assert!(amount < max);
        prop_assert_eq!(i64::from(healed.after), max);
    }
}
