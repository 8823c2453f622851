//! Priority passing.
//!
//! Players receive priority in turn order starting with the active player.
//! A pass moves priority to the next player; any other action resets the
//! count and gives priority back to the actor. Once every player in the
//! game has passed in a row, [`resolve_passed_priority`] either resolves
//! the top of the stack or, with an empty stack, ends the step.

use tracing::trace;

use super::machine::advance_step;
use crate::core::{GameState, PlayerId, Transition};
use crate::effects::{EffectExecutor, LegalityChecker};
use crate::error::{Result, RuleError};
use crate::stack::{resolve_top_of_stack, Resolution};
use crate::triggers::GameEvent;

/// Check whether every player still in the game has passed in a row.
#[must_use]
pub fn all_players_passed(state: &GameState) -> bool {
    state.turn.consecutive_passes == state.players_in_game().len()
}

/// `player` passes priority.
pub fn pass_priority(state: &GameState, player: PlayerId) -> Result<Transition> {
    if state.is_game_over() {
        return Err(RuleError::GameOver);
    }
    let step = state.turn.step;
    if !step.grants_priority() {
        return Err(RuleError::NoPriorityInStep { step });
    }
    if state.turn.priority_player != player {
        return Err(RuleError::NotPriorityHolder { player });
    }
    if all_players_passed(state) {
        return Err(RuleError::AwaitingResolution);
    }
    if !state.pending_triggers.is_empty() {
        return Err(RuleError::TriggersPending {
            count: state.pending_triggers.len(),
        });
    }

    let mut next = state.clone();
    next.turn.consecutive_passes += 1;
    next.turn.priority_player = state.turn.next_player_after(player);
    trace!(%player, passes = next.turn.consecutive_passes, "priority passed");

    Ok(Transition::new(next, vec![GameEvent::PriorityPassed { player }]))
}

/// Record a non-pass action by `actor`: they keep priority and the pass
/// count restarts.
#[must_use]
pub fn take_action(state: &GameState, actor: PlayerId) -> GameState {
    let mut next = state.clone();
    next.turn.consecutive_passes = 0;
    next.turn.priority_player = actor;
    next
}

/// Act on a completed round of passes.
///
/// With objects on the stack the top one resolves and the active player
/// receives priority; otherwise the game moves to the next step.
///
/// # Panics
///
/// Panics unless every player has passed.
#[must_use]
pub fn resolve_passed_priority<E, L>(
    state: &GameState,
    executor: &E,
    legality: &L,
) -> (Transition, Resolution)
where
    E: EffectExecutor + ?Sized,
    L: LegalityChecker + ?Sized,
{
    assert!(
        all_players_passed(state),
        "resolve_passed_priority called with {} of {} passes",
        state.turn.consecutive_passes,
        state.players_in_game().len()
    );

    if state.stack().is_empty() {
        return (advance_step(state), Resolution::Empty);
    }

    let (mut transition, resolution) = resolve_top_of_stack(state, executor, legality);
    transition.state.turn.consecutive_passes = 0;
    transition.state.turn.priority_player = transition.state.turn.active_player;
    (transition, resolution)
}
