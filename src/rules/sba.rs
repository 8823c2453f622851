//! State-based actions.
//!
//! State-based actions are checked whenever a player would receive
//! priority. Each pass first collects every violation from one snapshot of
//! the state, then applies them in a fixed category order:
//!
//! 1. A player with 0 or less life loses.
//! 2. A player with too many poison counters loses.
//! 3. A player who tried to draw from an empty library loses.
//! 4. A creature with 0 or less toughness, lethal damage, or damage from a
//!    deathtouch source goes to its owner's graveyard.
//! 5. An Aura attached illegally (or to nothing) goes to the graveyard; an
//!    Equipment attached illegally becomes unattached.
//! 6. A token anywhere but the battlefield or stack ceases to exist.
//! 7. +1/+1 and -1/-1 counters on the same permanent cancel out.
//! 8. Duplicate legends under one controller await a choice.
//!
//! Passes repeat until one finds nothing to do. Players who lost leave the
//! turn order; when at most one player is left the game is over.

use tracing::{debug, trace, warn};

use super::engine::GameResult;
use super::legend::{legend_duplicates, PendingLegendRuleChoice};
use crate::cards::AttachmentRule;
use crate::core::{
    Component, ComponentKind, CounterKind, EntityId, GameState, LossReason, PlayerId, Transition,
};
use crate::effects::LegalityChecker;
use crate::triggers::{clear_pending, GameEvent};
use crate::zones::ZoneId;

/// One state-based action found in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateBasedAction {
    PlayerLoses { player: PlayerId, reason: LossReason },
    CreatureDies(EntityId),
    AuraFalls(EntityId),
    EquipmentUnattaches(EntityId),
    TokenCeases(EntityId),
    CountersAnnihilate { entity: EntityId, amount: u32 },
    LegendChoice(PendingLegendRuleChoice),
    DropLegendChoice { controller: PlayerId, name: String },
}

/// Every state-based action that applies to `state`, in application order.
#[must_use]
pub fn collect_state_based_actions<L>(state: &GameState, legality: &L) -> Vec<StateBasedAction>
where
    L: LegalityChecker + ?Sized,
{
    let mut actions = Vec::new();

    // Players
    for &player in state.players_in_game() {
        if state.has_lost(player) {
            continue;
        }
        let components = state.entity(state.player_entity(player));
        let reason = if state.life(player) <= 0 {
            Some(LossReason::ZeroLife)
        } else if state.poison(player) >= state.config.poison_limit {
            Some(LossReason::Poison)
        } else if components.has(ComponentKind::DrawFailed) {
            Some(LossReason::DrewFromEmptyLibrary)
        } else {
            None
        };
        if let Some(reason) = reason {
            actions.push(StateBasedAction::PlayerLoses { player, reason });
        }
    }

    // Creatures
    for &id in state.battlefield() {
        if !state.is_creature(id) {
            continue;
        }
        let toughness = state.toughness(id).unwrap_or(0);
        let components = state.entity(id);
        let damage = i64::from(components.damage());
        let deathtouched = components.has(ComponentKind::Deathtouched) && damage > 0;
        if toughness <= 0 || damage >= toughness || deathtouched {
            actions.push(StateBasedAction::CreatureDies(id));
        }
    }

    // Attachments
    for &id in state.battlefield() {
        let components = state.entity(id);
        let Some(rule) = components.attachment() else {
            continue;
        };
        let legal = components
            .attached_to()
            .is_some_and(|target| legality.is_legal_attachment(state, id, target).is_legal());
        match (rule, components.attached_to()) {
            (AttachmentRule::Aura { .. }, _) if !legal => {
                actions.push(StateBasedAction::AuraFalls(id));
            }
            (AttachmentRule::Equipment, Some(_)) if !legal => {
                actions.push(StateBasedAction::EquipmentUnattaches(id));
            }
            _ => {}
        }
    }

    // Tokens
    for (id, components) in state.store.iter() {
        if !components.is_token() {
            continue;
        }
        if !matches!(state.zone_of(id), Some(ZoneId::Battlefield | ZoneId::Stack)) {
            actions.push(StateBasedAction::TokenCeases(id));
        }
    }

    // Counters
    for &id in state.battlefield() {
        let counters = state.entity(id).counters();
        let amount = counters
            .get(CounterKind::PlusOne)
            .min(counters.get(CounterKind::MinusOne));
        if amount > 0 {
            actions.push(StateBasedAction::CountersAnnihilate { entity: id, amount });
        }
    }

    // Legend rule
    let groups = legend_duplicates(state);
    for group in &groups {
        let existing = state
            .legend_choices
            .iter()
            .find(|c| c.matches(group.controller, &group.name));
        if existing != Some(group) {
            actions.push(StateBasedAction::LegendChoice(group.clone()));
        }
    }
    for choice in &state.legend_choices {
        if !groups.iter().any(|g| g.matches(choice.controller, &choice.name)) {
            actions.push(StateBasedAction::DropLegendChoice {
                controller: choice.controller,
                name: choice.name.clone(),
            });
        }
    }

    actions
}

fn apply(state: &GameState, action: StateBasedAction, events: &mut Vec<GameEvent>) -> GameState {
    trace!(?action, "applying state-based action");
    match action {
        StateBasedAction::PlayerLoses { player, reason } => {
            let mut next = state.add_component(state.player_entity(player), Component::Lost(reason));
            next.turn.remove_player(player);
            events.push(GameEvent::PlayerLost { player, reason });
            debug!(%player, ?reason, "player lost");
            next
        }

        StateBasedAction::CreatureDies(id) | StateBasedAction::AuraFalls(id) => {
            if state.is_on_battlefield(id) {
                state.move_to_graveyard(id, events)
            } else {
                state.clone()
            }
        }

        StateBasedAction::EquipmentUnattaches(id) => {
            if state.is_on_battlefield(id) {
                events.push(GameEvent::Unattached { attachment: id });
                state.remove_component(id, ComponentKind::AttachedTo)
            } else {
                state.clone()
            }
        }

        StateBasedAction::TokenCeases(id) => {
            if state.exists(id) {
                state.cease_to_exist(id, events)
            } else {
                state.clone()
            }
        }

        StateBasedAction::CountersAnnihilate { entity, amount } => {
            if !state.is_on_battlefield(entity) {
                return state.clone();
            }
            events.push(GameEvent::CountersAnnihilated { entity, amount });
            state.update_entity(entity, |c| {
                let counters = c
                    .counters()
                    .remove(CounterKind::PlusOne, amount)
                    .remove(CounterKind::MinusOne, amount);
                if counters.is_empty() {
                    c.without(ComponentKind::Counters)
                } else {
                    c.with(Component::Counters(counters))
                }
            })
        }

        StateBasedAction::LegendChoice(choice) => {
            let mut next = state.clone();
            match next
                .legend_choices
                .iter()
                .position(|c| c.matches(choice.controller, &choice.name))
            {
                Some(index) => {
                    next.legend_choices.set(index, choice);
                }
                None => {
                    events.push(GameEvent::LegendRuleChoicePending {
                        controller: choice.controller,
                        name: choice.name.clone(),
                    });
                    next.legend_choices.push_back(choice);
                }
            }
            next
        }

        StateBasedAction::DropLegendChoice { controller, name } => {
            let mut next = state.clone();
            next.legend_choices.retain(|c| !c.matches(controller, &name));
            next
        }
    }
}

/// Run state-based actions to a fixed point.
///
/// Never fails; everything that happens is reported as events.
#[must_use]
pub fn check_state_based_actions<L>(state: &GameState, legality: &L) -> Transition
where
    L: LegalityChecker + ?Sized,
{
    let mut next = state.clone();
    let mut events = Vec::new();
    let mut passes = 0;

    loop {
        let actions = collect_state_based_actions(&next, legality);
        if actions.is_empty() {
            break;
        }
        if passes == state.config.max_sba_passes {
            warn!(
                passes,
                remaining = actions.len(),
                "state-based actions did not reach a fixed point"
            );
            break;
        }
        passes += 1;
        debug!(pass = passes, count = actions.len(), "state-based action pass");

        let mut eliminated = false;
        for action in actions {
            eliminated |= matches!(action, StateBasedAction::PlayerLoses { .. });
            next = apply(&next, action, &mut events);
        }
        if eliminated {
            next = check_game_over(&next, &mut events);
        }
    }

    Transition::new(next, events)
}

fn check_game_over(state: &GameState, events: &mut Vec<GameEvent>) -> GameState {
    if state.is_game_over() || state.players_in_game().len() > 1 {
        return state.clone();
    }
    let result = match state.players_in_game().front() {
        Some(&winner) => GameResult::Winner(winner),
        None => GameResult::Draw,
    };
    debug!(?result, "game over");
    events.push(GameEvent::GameOver { result: result.clone() });

    let mut next = clear_pending(state);
    next.result = Some(result);
    next
}
