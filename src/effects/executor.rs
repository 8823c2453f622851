//! Effect execution.
//!
//! The stack resolver hands each resolving object's effect to an
//! `EffectExecutor` together with its controller, source, and the targets
//! that are still legal. The executor returns the new state, the events it
//! caused, and any [`ResolverCommand`]s (countering) the resolver must
//! carry out as part of the same resolution.
//!
//! `BasicEffects` executes the [`Effect`] vocabulary defined in this crate.

use tracing::trace;

use super::effect::{Effect, Recipient};
use crate::core::{EntityId, GameState, PlayerId};
use crate::triggers::GameEvent;

/// Instructions from an effect to the stack resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolverCommand {
    /// Remove this stack object without resolving it.
    Counter(EntityId),
}

/// What executing an effect produced.
#[derive(Clone, Debug)]
pub struct EffectOutcome {
    pub state: GameState,
    pub events: Vec<GameEvent>,
    pub commands: Vec<ResolverCommand>,
}

impl EffectOutcome {
    /// An outcome that leaves `state` unchanged.
    #[must_use]
    pub fn unchanged(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            events: Vec::new(),
            commands: Vec::new(),
        }
    }
}

/// Applies resolved effects to game state.
pub trait EffectExecutor {
    fn apply(
        &self,
        state: &GameState,
        effect: &Effect,
        controller: PlayerId,
        source: EntityId,
        targets: &[EntityId],
    ) -> EffectOutcome;
}

/// Executor for the built-in effect vocabulary.
///
/// Recipients that have vanished or moved out of the relevant zone since
/// the effect was put on the stack are skipped.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicEffects;

impl EffectExecutor for BasicEffects {
    fn apply(
        &self,
        state: &GameState,
        effect: &Effect,
        controller: PlayerId,
        source: EntityId,
        targets: &[EntityId],
    ) -> EffectOutcome {
        let mut outcome = EffectOutcome::unchanged(state);
        let ctx = Context { controller, source, targets };
        execute(&mut outcome, effect, &ctx);
        outcome
    }
}

struct Context<'a> {
    controller: PlayerId,
    source: EntityId,
    targets: &'a [EntityId],
}

fn recipients(state: &GameState, recipient: Recipient, ctx: &Context) -> Vec<EntityId> {
    match recipient {
        Recipient::Targets => ctx.targets.to_vec(),
        Recipient::Controller => vec![EntityId::player(ctx.controller)],
        Recipient::Source => vec![ctx.source],
        Recipient::EachOpponent => state
            .players_in_game()
            .iter()
            .filter(|p| **p != ctx.controller)
            .map(|p| EntityId::player(*p))
            .collect(),
        Recipient::EachPlayer => state
            .players_in_game()
            .iter()
            .map(|p| EntityId::player(*p))
            .collect(),
    }
}

/// Recipients that are players still in the game.
fn player_recipients(state: &GameState, recipient: Recipient, ctx: &Context) -> Vec<PlayerId> {
    recipients(state, recipient, ctx)
        .into_iter()
        .filter_map(|id| id.as_player(state.player_count()))
        .filter(|p| state.is_in_game(*p))
        .collect()
}

/// Recipients that are permanents on the battlefield.
fn permanent_recipients(state: &GameState, recipient: Recipient, ctx: &Context) -> Vec<EntityId> {
    recipients(state, recipient, ctx)
        .into_iter()
        .filter(|id| state.is_on_battlefield(*id))
        .collect()
}

fn execute(outcome: &mut EffectOutcome, effect: &Effect, ctx: &Context) {
    trace!(?effect, source = %ctx.source, "executing effect");
    let events = &mut outcome.events;

    match effect {
        Effect::DealDamage { amount, to } => {
            for target in recipients(&outcome.state, *to, ctx) {
                let state = &outcome.state;
                let damageable = match target.as_player(state.player_count()) {
                    Some(player) => state.is_in_game(player),
                    None => state.is_on_battlefield(target),
                };
                if damageable {
                    outcome.state = state.deal_damage(ctx.source, target, *amount, false, events);
                }
            }
        }

        Effect::GainLife { amount, to } => {
            for player in player_recipients(&outcome.state, *to, ctx) {
                outcome.state = outcome.state.gain_life(player, *amount, events);
            }
        }

        Effect::LoseLife { amount, to } => {
            for player in player_recipients(&outcome.state, *to, ctx) {
                outcome.state = outcome.state.lose_life(player, *amount, events);
            }
        }

        Effect::DrawCards { count, to } => {
            for player in player_recipients(&outcome.state, *to, ctx) {
                for _ in 0..*count {
                    outcome.state = outcome.state.draw_card(player, events);
                }
            }
        }

        Effect::ShuffleLibrary { to } => {
            for player in player_recipients(&outcome.state, *to, ctx) {
                outcome.state = outcome.state.shuffle_library(player);
            }
        }

        Effect::Destroy { what } => {
            for id in permanent_recipients(&outcome.state, *what, ctx) {
                outcome.state = outcome.state.move_to_graveyard(id, events);
            }
        }

        Effect::DestroyAll { filter } => {
            let doomed: Vec<EntityId> = outcome
                .state
                .battlefield()
                .iter()
                .copied()
                .filter(|id| filter.matches(&outcome.state, ctx.controller, *id))
                .collect();
            for id in doomed {
                outcome.state = outcome.state.move_to_graveyard(id, events);
            }
        }

        Effect::AddCounters { kind, amount, to } => {
            for id in recipients(&outcome.state, *to, ctx) {
                let state = &outcome.state;
                let eligible = match id.as_player(state.player_count()) {
                    Some(player) => state.is_in_game(player),
                    None => state.is_on_battlefield(id),
                };
                if eligible {
                    outcome.state = state.add_counters(id, *kind, *amount, events);
                }
            }
        }

        Effect::CreateToken { token, count } => {
            for _ in 0..*count {
                let (_, state) = outcome.state.create_token(token, ctx.controller, events);
                outcome.state = state;
            }
        }

        Effect::Tap { what } => {
            for id in permanent_recipients(&outcome.state, *what, ctx) {
                outcome.state = outcome.state.tap(id);
            }
        }

        Effect::Untap { what } => {
            for id in permanent_recipients(&outcome.state, *what, ctx) {
                outcome.state = outcome.state.untap(id);
            }
        }

        Effect::Attach => {
            let state = &outcome.state;
            if let Some(target) = ctx.targets.first().copied() {
                if state.is_on_battlefield(ctx.source) && state.is_on_battlefield(target) {
                    outcome.state = state.attach(ctx.source, target, events);
                }
            }
        }

        Effect::CounterTarget => {
            let state = &outcome.state;
            for target in ctx.targets {
                if state.stack().contains(target) {
                    outcome.commands.push(ResolverCommand::Counter(*target));
                }
            }
        }

        Effect::Sequence(effects) => {
            for effect in effects {
                execute(outcome, effect, ctx);
            }
        }
    }
}
