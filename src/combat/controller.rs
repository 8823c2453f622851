//! Combat declarations and damage.
//!
//! Declarations are rule-checked and return `Result`; turn-based combat
//! actions (starting combat, locking attackers, dealing damage, ending
//! combat) are driven by step entry and always succeed.
//!
//! ## Damage
//!
//! Each damage step deals all of its combat damage as one batch: every
//! assignment is computed from the same snapshot and only then applied.
//! A blocked attacker assigns lethal damage to each blocker in order before
//! moving to the next, and the last blocker takes whatever is left. An
//! attacker whose blockers have all gone deals no damage.

use tracing::debug;

use super::state::{CombatStage, CombatState};
use crate::cards::Keyword;
use crate::core::{Component, ComponentKind, EntityId, GameState, PlayerId, Transition};
use crate::effects::LegalityChecker;
use crate::error::{Result, RuleError};
use crate::triggers::GameEvent;
use crate::turn::Step;

/// Begin combat with the active player attacking `defender`.
#[must_use]
pub fn start_combat(state: &GameState, defender: PlayerId, events: &mut Vec<GameEvent>) -> GameState {
    let attacker = state.turn.active_player;
    let mut next = state.clone();
    next.combat = Some(CombatState::new(attacker, defender));
    events.push(GameEvent::CombatBegan {
        attacking_player: attacker,
        defending_player: defender,
    });
    debug!(attacking = %attacker, defending = %defender, "combat began");
    next
}

/// Declare `attacker` as attacking the defending player.
///
/// The attacker taps unless it has vigilance.
pub fn declare_attacker<L>(
    state: &GameState,
    player: PlayerId,
    attacker: EntityId,
    legality: &L,
) -> Result<Transition>
where
    L: LegalityChecker + ?Sized,
{
    let combat = current_combat(state)?;
    require_step(state, Step::DeclareAttackers)?;
    if player != state.turn.active_player {
        return Err(RuleError::NotActivePlayer { player });
    }
    if !state.stack().is_empty() {
        return Err(RuleError::StackNotEmpty);
    }
    if let Some(reason) = legality.validate_attacker(state, player, attacker).reason() {
        return Err(RuleError::IllegalAttacker {
            attacker,
            reason: reason.to_string(),
        });
    }

    let defending_player = combat.defending_player;
    let mut next = state.add_component(attacker, Component::Attacking(defending_player));
    if !state.has_keyword(attacker, Keyword::Vigilance) {
        next = next.tap(attacker);
    }
    debug!(%attacker, defending = %defending_player, "attacker declared");

    Ok(Transition::new(
        next,
        vec![GameEvent::AttackerDeclared { attacker, defending_player }],
    ))
}

/// Lock in attackers and record which creatures may block.
///
/// Eligible blockers are the defending player's creatures on the
/// battlefield when the declare blockers step begins. Whether one is
/// tapped is checked when it is declared as a blocker.
#[must_use]
pub fn snapshot_eligible_blockers(state: &GameState) -> GameState {
    let Some(combat) = &state.combat else {
        return state.clone();
    };
    let eligible = state
        .creatures_controlled_by(combat.defending_player)
        .into_iter()
        .collect();

    let mut next = state.clone();
    next.combat = Some(CombatState {
        stage: CombatStage::AttackersDeclared,
        eligible_blockers: eligible,
        ..combat.clone()
    });
    next
}

/// Declare `blocker` as blocking `attacker`.
pub fn declare_blocker<L>(
    state: &GameState,
    player: PlayerId,
    blocker: EntityId,
    attacker: EntityId,
    legality: &L,
) -> Result<Transition>
where
    L: LegalityChecker + ?Sized,
{
    let combat = current_combat(state)?;
    require_step(state, Step::DeclareBlockers)?;
    if player != combat.defending_player {
        return Err(RuleError::NotDefendingPlayer { player });
    }
    if !state.stack().is_empty() {
        return Err(RuleError::StackNotEmpty);
    }
    if !combat.is_eligible_blocker(blocker) {
        return Err(RuleError::NotEligibleBlocker { blocker });
    }
    if let Some(reason) = legality.validate_blocker(state, player, blocker, attacker).reason() {
        return Err(RuleError::IllegalBlocker {
            blocker,
            reason: reason.to_string(),
        });
    }

    let mut blocked_by = state.entity(attacker).blocked_by().cloned().unwrap_or_default();
    blocked_by.push_back(blocker);

    let mut next = state
        .add_component(blocker, Component::Blocking(attacker))
        .add_component(attacker, Component::BlockedBy(blocked_by));
    next.combat = Some(CombatState {
        stage: CombatStage::BlockersDeclared,
        ..combat.clone()
    });
    debug!(%blocker, %attacker, "blocker declared");

    Ok(Transition::new(next, vec![GameEvent::BlockerDeclared { blocker, attacker }]))
}

/// Deal one pass of combat damage.
///
/// The first-strike pass covers creatures with first strike or double
/// strike; the regular pass covers every creature that did not deal
/// first-strike damage, plus double strikers.
#[must_use]
pub fn assign_combat_damage(
    state: &GameState,
    first_strike: bool,
    events: &mut Vec<GameEvent>,
) -> GameState {
    let Some(combat) = &state.combat else {
        return state.clone();
    };

    let deals_damage = |id: EntityId| -> bool {
        let Some(characteristics) = state.characteristics(id) else {
            return false;
        };
        if first_strike {
            characteristics.strikes_first()
        } else {
            !combat.first_strike_dealt.contains(&id)
                || characteristics.has_keyword(Keyword::DoubleStrike)
        }
    };
    let power_of = |id: EntityId| -> u32 {
        u32::try_from(state.power(id).unwrap_or(0).max(0)).unwrap_or(u32::MAX)
    };

    let mut assignments: Vec<(EntityId, EntityId, u32)> = Vec::new();
    let mut strikers = Vec::new();

    for &attacker in state.battlefield() {
        let components = state.entity(attacker);
        if components.attacking().is_none() || !state.is_creature(attacker) {
            continue;
        }
        if deals_damage(attacker) {
            strikers.push(attacker);
            assign_attacker_damage(state, combat, attacker, power_of(attacker), &mut assignments);
        }
    }

    for &blocker in state.battlefield() {
        let Some(attacker) = state.entity(blocker).blocking() else {
            continue;
        };
        if !state.is_creature(blocker) || !state.is_on_battlefield(attacker) {
            continue;
        }
        if deals_damage(blocker) {
            strikers.push(blocker);
            assignments.push((blocker, attacker, power_of(blocker)));
        }
    }

    debug!(first_strike, assignments = assignments.len(), "combat damage");

    let mut next = assignments
        .into_iter()
        .fold(state.clone(), |s, (source, target, amount)| {
            s.deal_damage(source, target, amount, true, events)
        });

    let mut combat = combat.clone();
    if first_strike {
        combat.first_strike_dealt.extend(strikers);
        combat.stage = CombatStage::FirstStrikeDamage;
    } else {
        combat.stage = CombatStage::RegularDamage;
    }
    next.combat = Some(combat);
    next
}

fn assign_attacker_damage(
    state: &GameState,
    combat: &CombatState,
    attacker: EntityId,
    power: u32,
    assignments: &mut Vec<(EntityId, EntityId, u32)>,
) {
    let blocked_by = state.entity(attacker).blocked_by();
    let Some(blocked_by) = blocked_by.filter(|b| !b.is_empty()) else {
        if state.is_in_game(combat.defending_player) {
            let defender = state.player_entity(combat.defending_player);
            assignments.push((attacker, defender, power));
        }
        return;
    };

    let living: Vec<EntityId> = blocked_by
        .iter()
        .copied()
        .filter(|b| state.is_on_battlefield(*b) && state.entity(*b).blocking() == Some(attacker))
        .collect();

    let deathtouch = state.has_keyword(attacker, Keyword::Deathtouch);
    let mut remaining = power;
    for (i, &blocker) in living.iter().enumerate() {
        let amount = if i + 1 == living.len() {
            remaining
        } else {
            let lethal = if deathtouch {
                1
            } else {
                let toughness = state.toughness(blocker).unwrap_or(0);
                let marked = i64::from(state.entity(blocker).damage());
                u32::try_from((toughness - marked).max(0)).unwrap_or(u32::MAX)
            };
            lethal.min(remaining)
        };
        remaining -= amount;
        assignments.push((attacker, blocker, amount));
    }
}

/// End combat: forget attackers and blockers. Marked damage stays until
/// cleanup.
#[must_use]
pub fn end_combat(state: &GameState, events: &mut Vec<GameEvent>) -> GameState {
    let with_roles: Vec<EntityId> = state
        .battlefield()
        .iter()
        .copied()
        .filter(|id| {
            let c = state.entity(*id);
            ComponentKind::COMBAT_ROLES.iter().any(|kind| c.has(*kind))
        })
        .collect();

    let mut next = with_roles.into_iter().fold(state.clone(), |s, id| {
        s.update_entity(id, |c| {
            ComponentKind::COMBAT_ROLES
                .iter()
                .fold(c.clone(), |c, kind| c.without(*kind))
        })
    });
    next.combat = None;
    events.push(GameEvent::CombatEnded);
    debug!("combat ended");
    next
}

fn current_combat(state: &GameState) -> Result<&CombatState> {
    if state.is_game_over() {
        return Err(RuleError::GameOver);
    }
    state.combat.as_ref().ok_or(RuleError::NoCombat)
}

fn require_step(state: &GameState, expected: Step) -> Result<()> {
    let actual = state.turn.step;
    if actual == expected {
        Ok(())
    } else {
        Err(RuleError::WrongStep { expected, actual })
    }
}
