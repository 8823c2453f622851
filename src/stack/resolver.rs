//! Putting objects on the stack and resolving them.
//!
//! Resolution is LIFO: only the top object resolves, and exactly one object
//! resolves per call. Targets are checked again on resolution through the
//! [`LegalityChecker`]; an object whose targets have all become illegal
//! fizzles and does nothing.
//!
//! Countering is an effect outcome. The executor reports
//! [`ResolverCommand::Counter`] and the resolver removes the countered
//! object inside the same resolution, so no state is observable in which a
//! counterspell has resolved but its target has not been countered.

use tracing::debug;

use super::item::StackItem;
use crate::cards::AttachmentRule;
use crate::core::{Component, Components, EntityId, GameState, Transition};
use crate::effects::{EffectExecutor, LegalityChecker, ResolverCommand};
use crate::triggers::GameEvent;
use crate::zones::ZoneId;

/// What a call to [`resolve_top_of_stack`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The stack was empty; nothing happened.
    Empty,
    Resolved(EntityId),
    Fizzled(EntityId),
}

/// Move a spell from its zone onto the stack.
///
/// `item.source` must be the spell itself.
#[must_use]
pub fn push_spell(state: &GameState, item: StackItem, events: &mut Vec<GameEvent>) -> GameState {
    assert!(item.is_spell(), "push_spell needs a spell, got {:?}", item.kind);
    let spell = item.source;
    let player = item.controller;
    let card = state.entity(spell).card();

    let next = state
        .move_to_zone(spell, ZoneId::Stack, events)
        .add_component(spell, Component::OnStack(item));
    events.push(GameEvent::SpellCast { player, spell, card });
    next
}

/// Create an ability object on top of the stack.
#[must_use]
pub fn push_ability(
    state: &GameState,
    item: StackItem,
    events: &mut Vec<GameEvent>,
) -> (EntityId, GameState) {
    assert!(item.is_ability(), "push_ability needs an ability");
    let controller = item.controller;

    let mut next = state.clone();
    let (id, store) = state.store.create_entity(
        Components::new()
            .with(Component::Owner(controller))
            .with(Component::OnStack(item)),
    );
    next.store = store;
    next.zones = state.zones.add_to_zone(id, ZoneId::Stack);

    events.push(GameEvent::ZoneChanged {
        entity: id,
        from: None,
        to: ZoneId::Stack,
        controller: Some(controller),
        card: None,
    });
    (id, next)
}

/// Resolve the top object of the stack.
///
/// An empty stack is not an error: the state comes back unchanged with
/// [`Resolution::Empty`].
pub fn resolve_top_of_stack<E, L>(
    state: &GameState,
    executor: &E,
    legality: &L,
) -> (Transition, Resolution)
where
    E: EffectExecutor + ?Sized,
    L: LegalityChecker + ?Sized,
{
    let Some(top) = state.top_of_stack() else {
        return (Transition::unchanged(state), Resolution::Empty);
    };
    let item = match state.entity(top).stack_item() {
        Some(item) => item.clone(),
        None => panic!("{} is on the stack without stack data", top),
    };
    let mut events = Vec::new();

    let legal_targets: Vec<EntityId> = match &item.target_spec {
        Some(spec) => item
            .targets
            .iter()
            .copied()
            .filter(|target| {
                legality
                    .validate_target(state, item.controller, spec, item.source, *target)
                    .is_legal()
            })
            .collect(),
        None => item.targets.iter().copied().collect(),
    };

    if !item.targets.is_empty() && legal_targets.is_empty() {
        debug!(entity = %top, "fizzled");
        events.push(GameEvent::Fizzled { entity: top });
        let next = leave_stack(state, top, &item, &mut events);
        return (Transition::new(next, events), Resolution::Fizzled(top));
    }

    let is_permanent_spell = item.is_spell()
        && state
            .characteristics(top)
            .is_some_and(|c| c.is_permanent());

    let next = if is_permanent_spell {
        let mut next = state.put_onto_battlefield(top, item.controller, &mut events);
        if next.is_creature(top) {
            next = next.add_component(top, Component::SummoningSick);
        }
        if let Some(AttachmentRule::Aura { .. }) = next.entity(top).attachment() {
            if let Some(target) = legal_targets.first() {
                next = next.attach(top, *target, &mut events);
            }
        }
        events.push(GameEvent::Resolved { entity: top });
        next
    } else {
        let outcome = executor.apply(state, &item.effect, item.controller, item.source, &legal_targets);
        let mut next = outcome.state;
        events.extend(outcome.events);

        for command in outcome.commands {
            match command {
                ResolverCommand::Counter(target) => {
                    if target != top && next.zone_of(target) == Some(ZoneId::Stack) {
                        next = counter(&next, target, &mut events);
                    }
                }
            }
        }

        events.push(GameEvent::Resolved { entity: top });
        if next.zone_of(top) == Some(ZoneId::Stack) {
            next = leave_stack(&next, top, &item, &mut events);
        }
        next
    };

    debug!(entity = %top, targets = legal_targets.len(), "resolved");
    (Transition::new(next, events), Resolution::Resolved(top))
}

/// Remove a stack object without resolving it.
fn counter(state: &GameState, id: EntityId, events: &mut Vec<GameEvent>) -> GameState {
    let item = match state.entity(id).stack_item() {
        Some(item) => item.clone(),
        None => panic!("{} is on the stack without stack data", id),
    };
    debug!(entity = %id, "countered");
    events.push(GameEvent::Countered { entity: id });
    leave_stack(state, id, &item, events)
}

/// Spells go to their owner's graveyard; abilities cease to exist.
fn leave_stack(
    state: &GameState,
    id: EntityId,
    item: &StackItem,
    events: &mut Vec<GameEvent>,
) -> GameState {
    if item.is_spell() {
        state.move_to_graveyard(id, events)
    } else {
        state.cease_to_exist(id, events)
    }
}
