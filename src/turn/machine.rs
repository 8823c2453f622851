//! Turn state and step advancement.
//!
//! `TurnState` tracks whose turn it is, the current step, who holds
//! priority, and how many players have passed in a row. [`advance_step`]
//! moves to the next step and performs that step's turn-based actions.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::step::{Phase, Step};
use crate::combat;
use crate::core::{ComponentKind, GameState, PlayerId, Transition};
use crate::triggers::GameEvent;

/// Turn, step, and priority bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Starts at 1.
    pub turn_number: u32,
    pub active_player: PlayerId,
    pub priority_player: PlayerId,
    pub step: Step,
    /// Players still in the game, in seat order.
    pub player_order: Vector<PlayerId>,
    /// Consecutive passes since the last non-pass action.
    pub consecutive_passes: usize,
    /// Lands the active player has played this turn.
    pub lands_played: u32,
}

impl TurnState {
    /// Turn 1, untap step, player 0 active.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            turn_number: 1,
            active_player: PlayerId(0),
            priority_player: PlayerId(0),
            step: Step::Untap,
            player_order: PlayerId::all(player_count).collect(),
            consecutive_passes: 0,
            lands_played: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.step.phase()
    }

    /// The next player in the game after `player`, wrapping around.
    ///
    /// `player` itself need not still be in the game. With a single player
    /// left that player is returned.
    #[must_use]
    pub fn next_player_after(&self, player: PlayerId) -> PlayerId {
        self.player_order
            .iter()
            .find(|p| p.0 > player.0)
            .or_else(|| self.player_order.front())
            .copied()
            .unwrap_or(player)
    }

    /// Players in APNAP order: the active player, then the others in turn
    /// order.
    #[must_use]
    pub fn apnap_order(&self) -> Vec<PlayerId> {
        let start = if self.player_order.contains(&self.active_player) {
            self.active_player
        } else {
            self.next_player_after(self.active_player)
        };
        let Some(offset) = self.player_order.iter().position(|p| *p == start) else {
            return Vec::new();
        };
        let n = self.player_order.len();
        (0..n).map(|i| self.player_order[(offset + i) % n]).collect()
    }

    /// Take a player out of the turn order.
    ///
    /// Priority moves on if they held it and the pass count restarts.
    pub fn remove_player(&mut self, player: PlayerId) {
        let Some(index) = self.player_order.iter().position(|p| *p == player) else {
            return;
        };
        self.player_order.remove(index);
        if self.priority_player == player {
            self.priority_player = self.next_player_after(player);
        }
        self.consecutive_passes = 0;
    }
}

/// Move to the next step and perform its turn-based actions.
///
/// Leaving cleanup starts the next turn: the turn number increments, the
/// next player in order becomes active, land plays reset, and the new
/// active player's permanents stop being summoning sick. Every step entry
/// gives priority to the active player with no passes recorded.
#[must_use]
pub fn advance_step(state: &GameState) -> Transition {
    let mut next = state.clone();
    let mut events = Vec::new();
    let (step, wrapped) = state.turn.step.next();

    if wrapped {
        let active = state.turn.next_player_after(state.turn.active_player);
        next.turn.turn_number += 1;
        next.turn.active_player = active;
        next.turn.lands_played = 0;
        for id in next.permanents_controlled_by(active) {
            if next.entity(id).is_summoning_sick() {
                next = next.remove_component(id, ComponentKind::SummoningSick);
            }
        }
        events.push(GameEvent::TurnBegan {
            turn: next.turn.turn_number,
            active_player: active,
        });
        debug!(turn = next.turn.turn_number, active = %active, "turn began");
    }

    next.turn.step = step;
    next.turn.consecutive_passes = 0;
    next.turn.priority_player = next.turn.active_player;
    events.push(GameEvent::StepBegan {
        turn: next.turn.turn_number,
        step,
        active_player: next.turn.active_player,
    });
    debug!(turn = next.turn.turn_number, %step, "step began");

    let next = turn_based_actions(&next, step, &mut events);
    Transition::new(next, events)
}

fn turn_based_actions(state: &GameState, step: Step, events: &mut Vec<GameEvent>) -> GameState {
    let active = state.turn.active_player;
    match step {
        Step::Untap => state
            .permanents_controlled_by(active)
            .into_iter()
            .fold(state.clone(), |s, id| s.untap(id)),

        Step::Draw => {
            if state.turn.turn_number == 1 && state.config.skip_first_draw {
                state.clone()
            } else {
                state.draw_card(active, events)
            }
        }

        Step::BeginCombat => {
            let defender = state.turn.next_player_after(active);
            if defender == active {
                state.clone()
            } else {
                combat::start_combat(state, defender, events)
            }
        }

        Step::DeclareBlockers => combat::snapshot_eligible_blockers(state),
        Step::FirstStrikeDamage => combat::assign_combat_damage(state, true, events),
        Step::CombatDamage => combat::assign_combat_damage(state, false, events),

        Step::PostcombatMain => {
            if state.combat.is_some() {
                combat::end_combat(state, events)
            } else {
                state.clone()
            }
        }

        Step::Cleanup => state.battlefield().iter().fold(state.clone(), |s, id| {
            s.update_entity(*id, |c| {
                c.without(ComponentKind::Damage)
                    .without(ComponentKind::Deathtouched)
            })
        }),

        Step::Upkeep
        | Step::PrecombatMain
        | Step::DeclareAttackers
        | Step::EndCombat
        | Step::End => state.clone(),
    }
}
