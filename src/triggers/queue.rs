//! The pending-trigger queue.
//!
//! Detected triggers wait on the state until their controllers put them on
//! the stack. The queue is kept in APNAP order and triggers leave it from
//! the front, one controller at a time: the active player's triggers go on
//! the stack first and therefore resolve last. Within a controller's group
//! the controller picks the order.

use im::Vector;
use tracing::debug;

use super::detector::sort_apnap;
use super::event::GameEvent;
use super::trigger::PendingTrigger;
use crate::core::{EntityId, GameState, Transition};
use crate::effects::LegalityChecker;
use crate::error::{Result, RuleError};
use crate::stack::{push_ability, StackItem, StackItemKind};

/// Append newly detected triggers and restore APNAP order.
///
/// Triggers controlled by players no longer in the game are dropped, both
/// new ones and any still waiting in the queue.
#[must_use]
pub fn enqueue(state: &GameState, triggers: Vec<PendingTrigger>) -> GameState {
    let mut all: Vec<PendingTrigger> = state
        .pending_triggers
        .iter()
        .cloned()
        .chain(triggers)
        .filter(|t| state.is_in_game(t.controller))
        .collect();
    sort_apnap(state, &mut all);

    let mut next = state.clone();
    next.pending_triggers = all.into_iter().collect();
    next
}

/// Put the pending trigger at `index` on the stack with `targets`.
///
/// Only triggers controlled by the first controller in the queue may be
/// stacked. A targeted trigger given no targets, when it needs at least
/// one, is removed from the queue without going on the stack.
pub fn stack_pending_trigger<L>(
    state: &GameState,
    index: usize,
    targets: &[EntityId],
    legality: &L,
) -> Result<Transition>
where
    L: LegalityChecker + ?Sized,
{
    let Some(trigger) = state.pending_triggers.get(index) else {
        return Err(RuleError::NoSuchTrigger { index });
    };
    let first = state.pending_triggers[0].controller;
    if trigger.controller != first {
        return Err(RuleError::TriggerOutOfOrder { first });
    }

    let declaration = &trigger.declaration;
    if let Some(spec) = &declaration.targets {
        if targets.is_empty() && spec.minimum() > 0 {
            debug!(source = %trigger.source, "trigger removed: no legal targets chosen");
            let mut next = state.clone();
            next.pending_triggers.remove(index);
            return Ok(Transition::new(next, Vec::new()));
        }
        if !spec.accepts_count(targets.len()) {
            return Err(RuleError::TargetCount {
                expected: spec.describe_count(),
                got: targets.len(),
            });
        }
        for target in targets {
            let verdict =
                legality.validate_target(state, trigger.controller, spec, trigger.source, *target);
            if let Some(reason) = verdict.reason() {
                return Err(RuleError::IllegalTarget {
                    target: *target,
                    reason: reason.to_string(),
                });
            }
        }
    } else if !targets.is_empty() {
        return Err(RuleError::TargetCount {
            expected: "no".to_string(),
            got: targets.len(),
        });
    }

    let trigger = trigger.clone();
    let mut next = state.clone();
    next.pending_triggers.remove(index);
    next.turn.consecutive_passes = 0;
    next.turn.priority_player = state.turn.active_player;

    let item = StackItem::ability(
        StackItemKind::TriggeredAbility { context: trigger.context.clone() },
        trigger.controller,
        trigger.source,
        trigger.declaration.effect.clone(),
        trigger.declaration.targets.clone(),
        targets,
    );
    let mut events = Vec::new();
    let (ability, next) = push_ability(&next, item, &mut events);
    events.push(GameEvent::TriggerStacked {
        controller: trigger.controller,
        source: trigger.source,
        ability,
    });
    debug!(source = %trigger.source, %ability, controller = %trigger.controller, "trigger stacked");

    Ok(Transition::new(next, events))
}

/// Stack every leading pending trigger that needs no targets.
///
/// Stops at the first trigger that needs targets; its controller has to
/// choose them through [`stack_pending_trigger`].
#[must_use]
pub fn stack_untargeted_triggers<L>(state: &GameState, legality: &L) -> Transition
where
    L: LegalityChecker + ?Sized,
{
    let mut transition = Transition::unchanged(state);
    while let Some(front) = transition.state.pending_triggers.front() {
        if front.needs_targets() {
            break;
        }
        match stack_pending_trigger(&transition.state, 0, &[], legality) {
            Ok(step) => {
                transition.state = step.state;
                transition.events.extend(step.events);
            }
            Err(_) => break,
        }
    }
    transition
}

/// Drop every pending trigger.
#[must_use]
pub fn clear_pending(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.pending_triggers = Vector::new();
    next
}
