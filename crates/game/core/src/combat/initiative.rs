//! Turn order and turn advancement.

use crate::state::{Actor, CombatState, Side};

/// Participant indices sorted by descending agility. Ties keep input order.
pub fn roll_initiative(participants: &[Actor]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..participants.len()).collect();
    // `sort_by_key` is stable.
    order.sort_by_key(|&i| std::cmp::Reverse(participants[i].agility()));
    order
}

/// Moves `current_turn` to the next living participant.
///
/// Wrapping past the end of the order starts a new round. The scan is
/// bounded by the order length, so an all-dead encounter leaves the pointer
/// on the last checked slot.
pub fn advance(state: &mut CombatState) {
    let len = state.turn_order.len();
    if len == 0 {
        return;
    }

    for _ in 0..len {
        state.current_turn += 1;
        if state.current_turn >= len {
            state.current_turn = 0;
            state.round += 1;
        }
        if state.current_actor().is_some_and(Actor::is_alive) {
            break;
        }
    }

    state.is_player_turn = state
        .current_actor()
        .is_some_and(|a| a.side() == Side::Player);
}
