//! Trigger detection.
//!
//! After an action completes, the detector walks its event log in order
//! and tests every triggered ability of every permanent against each
//! event. Each match becomes one [`PendingTrigger`]. The result is sorted
//! APNAP: the active player's triggers first, then each other player's in
//! turn order, detection order preserved within a controller.
//!
//! ## Look-back
//!
//! Leaves-the-battlefield and dies abilities "look back in time": a
//! permanent that left the battlefield in the same batch of events still
//! sees those events, using the card and controller it had on the
//! battlefield. This lets a creature that dies alongside others (e.g. to a
//! mass removal spell) trigger on its own death and on theirs.
//!
//! ## Steps
//!
//! "At the beginning of ..." abilities are not driven by the event log.
//! They are found by [`detect_step_triggers`], called once per step.

use tracing::debug;

use super::event::GameEvent;
use super::trigger::{AbilityRegistry, PendingTrigger, TriggerContext, TriggerKind, TriggeredAbilityDeclaration};
use crate::cards::CardId;
use crate::core::{EntityId, GameState, PlayerId};
use crate::turn::Step;
use crate::zones::ZoneId;

/// A potential trigger source: a permanent, or one that just left.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    entity: EntityId,
    card: CardId,
    controller: PlayerId,
    departed: bool,
}

/// Detect triggers for an ordered event log.
///
/// Step-began events are ignored here; see [`detect_step_triggers`].
pub fn detect_triggers<R>(
    state: &GameState,
    events: &[GameEvent],
    registry: &R,
) -> Vec<PendingTrigger>
where
    R: AbilityRegistry + ?Sized,
{
    let on_battlefield = battlefield_candidates(state);
    let departed = departed_candidates(state, events);

    let mut found = Vec::new();
    for event in events {
        let looks_back = matches!(
            event,
            GameEvent::Died { .. }
                | GameEvent::ZoneChanged { from: Some(ZoneId::Battlefield), .. }
        );

        let candidates = on_battlefield
            .iter()
            .chain(departed.iter().filter(|_| looks_back));

        for candidate in candidates {
            for declaration in registry.triggered_abilities(candidate.card) {
                if candidate.departed
                    && !matches!(
                        declaration.kind,
                        TriggerKind::LeavesBattlefield | TriggerKind::Dies
                    )
                {
                    continue;
                }
                if let Some(context) = match_event(state, declaration, event, candidate) {
                    found.push(PendingTrigger {
                        source: candidate.entity,
                        controller: candidate.controller,
                        declaration: declaration.clone(),
                        context,
                    });
                }
            }
        }
    }

    sort_apnap(state, &mut found);
    if !found.is_empty() {
        debug!(count = found.len(), events = events.len(), "triggers detected");
    }
    found
}

/// Detect "at the beginning of `step`" triggers.
pub fn detect_step_triggers<R>(state: &GameState, step: Step, registry: &R) -> Vec<PendingTrigger>
where
    R: AbilityRegistry + ?Sized,
{
    let active = state.turn.active_player;
    let mut found = Vec::new();

    for candidate in battlefield_candidates(state) {
        for declaration in registry.triggered_abilities(candidate.card) {
            if declaration.kind != TriggerKind::StepBegins(step) {
                continue;
            }
            if declaration.controller_only && candidate.controller != active {
                continue;
            }
            found.push(PendingTrigger {
                source: candidate.entity,
                controller: candidate.controller,
                declaration: declaration.clone(),
                context: TriggerContext::Step {
                    turn: state.turn.turn_number,
                    step,
                },
            });
        }
    }

    sort_apnap(state, &mut found);
    if !found.is_empty() {
        debug!(count = found.len(), %step, "step triggers detected");
    }
    found
}

/// Stable-sort triggers into APNAP order.
pub fn sort_apnap(state: &GameState, triggers: &mut [PendingTrigger]) {
    let order = state.turn.apnap_order();
    triggers.sort_by_key(|t| {
        order
            .iter()
            .position(|p| *p == t.controller)
            .unwrap_or(order.len())
    });
}

fn battlefield_candidates(state: &GameState) -> Vec<Candidate> {
    state
        .battlefield()
        .iter()
        .filter_map(|&entity| {
            let card = state.entity(entity).card()?;
            let controller = state.controller_of(entity)?;
            Some(Candidate { entity, card, controller, departed: false })
        })
        .collect()
}

/// Permanents that left the battlefield during this event batch.
fn departed_candidates(state: &GameState, events: &[GameEvent]) -> Vec<Candidate> {
    let mut departed: Vec<Candidate> = Vec::new();
    for event in events {
        if let GameEvent::ZoneChanged {
            entity,
            from: Some(ZoneId::Battlefield),
            controller: Some(controller),
            card: Some(card),
            ..
        } = event
        {
            let back_already = state.is_on_battlefield(*entity);
            let seen = departed.iter().any(|c| c.entity == *entity);
            if !back_already && !seen {
                departed.push(Candidate {
                    entity: *entity,
                    card: *card,
                    controller: *controller,
                    departed: true,
                });
            }
        }
    }
    departed
}

/// Test one declaration against one event.
fn match_event(
    state: &GameState,
    declaration: &TriggeredAbilityDeclaration,
    event: &GameEvent,
    candidate: &Candidate,
) -> Option<TriggerContext> {
    let (subject, subject_controller, context) = match (declaration.kind, event) {
        (
            TriggerKind::EntersBattlefield,
            GameEvent::ZoneChanged { entity, from, to: ZoneId::Battlefield, controller, .. },
        ) => (
            *entity,
            *controller,
            TriggerContext::ZoneChange { entity: *entity, from: *from, to: ZoneId::Battlefield },
        ),

        (
            TriggerKind::LeavesBattlefield,
            GameEvent::ZoneChanged { entity, from: Some(ZoneId::Battlefield), to, controller, .. },
        ) => (
            *entity,
            *controller,
            TriggerContext::ZoneChange {
                entity: *entity,
                from: Some(ZoneId::Battlefield),
                to: *to,
            },
        ),

        (TriggerKind::Dies, GameEvent::Died { entity, controller, owner, .. }) => (
            *entity,
            Some(*controller),
            TriggerContext::ZoneChange {
                entity: *entity,
                from: Some(ZoneId::Battlefield),
                to: ZoneId::Graveyard(*owner),
            },
        ),

        (TriggerKind::CardDrawn, GameEvent::CardDrawn { player, entity }) => (
            *entity,
            Some(*player),
            TriggerContext::Draw { player: *player, entity: *entity },
        ),

        (TriggerKind::DamageDealt, GameEvent::DamageDealt { source, target, amount, combat }) => (
            *source,
            state.controller_of(*source),
            TriggerContext::Damage {
                source: *source,
                target: *target,
                amount: *amount,
                combat: *combat,
            },
        ),

        (TriggerKind::SpellCast, GameEvent::SpellCast { player, spell, .. }) => (
            *spell,
            Some(*player),
            TriggerContext::SpellCast { player: *player, spell: *spell },
        ),

        (TriggerKind::AttackerDeclared, GameEvent::AttackerDeclared { attacker, .. }) => (
            *attacker,
            state.controller_of(*attacker),
            TriggerContext::Combat { attacker: *attacker, blocker: None },
        ),

        (TriggerKind::BlockerDeclared, GameEvent::BlockerDeclared { blocker, attacker }) => (
            *blocker,
            state.controller_of(*blocker),
            TriggerContext::Combat { attacker: *attacker, blocker: Some(*blocker) },
        ),

        _ => return None,
    };

    if declaration.self_only && subject != candidate.entity {
        return None;
    }
    if declaration.controller_only && subject_controller != Some(candidate.controller) {
        return None;
    }
    Some(context)
}
