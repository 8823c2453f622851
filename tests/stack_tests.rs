//! Stack integration tests.
//!
//! These tests cast spells and activate abilities through the engine and
//! verify LIFO resolution, countering, fizzling, and permanent spells.

use ccg_rules::cards::{CardDefinition, CardId, CardRegistry, CardType};
use ccg_rules::core::{Component, ComponentKind, EntityId, GameState, PlayerId, RulesConfig};
use ccg_rules::effects::{BasicEffects, BasicLegality, Effect, TargetFilter, TargetSpec};
use ccg_rules::rules::Engine;
use ccg_rules::stack::{push_ability, resolve_top_of_stack, Resolution, StackItem, StackItemKind};
use ccg_rules::triggers::GameEvent;
use ccg_rules::turn::Step;
use ccg_rules::zones::ZoneId;
use ccg_rules::RuleError;

const P0: PlayerId = PlayerId(0);
const P1: PlayerId = PlayerId(1);

fn bolt() -> CardDefinition {
    CardDefinition::new(CardId::new(1), "Lightning Bolt", [CardType::Instant]).with_spell(
        Effect::damage(3),
        Some(TargetSpec::single(TargetFilter::AnyTarget)),
    )
}

fn cancel() -> CardDefinition {
    CardDefinition::new(CardId::new(2), "Cancel", [CardType::Instant])
        .with_spell(Effect::counter(), Some(TargetSpec::single(TargetFilter::Spell)))
}

fn bear() -> CardDefinition {
    CardDefinition::creature(CardId::new(3), "Grizzly Bears", 2, 2)
}

fn pacifism() -> CardDefinition {
    CardDefinition::aura(CardId::new(4), "Pacifism", TargetFilter::Creature)
}

fn divination() -> CardDefinition {
    CardDefinition::sorcery(CardId::new(5), "Divination", Effect::draw(2))
}

fn wrath() -> CardDefinition {
    CardDefinition::sorcery(CardId::new(6), "Wrath of God", Effect::destroy_all(TargetFilter::Creature))
}

fn engine() -> Engine {
    Engine::new(
        [bolt(), cancel(), bear(), pacifism(), divination(), wrath()]
            .into_iter()
            .collect::<CardRegistry>(),
    )
}

fn main_phase() -> GameState {
    let mut state = GameState::new(2, RulesConfig::default(), 5);
    state.turn.step = Step::PrecombatMain;
    state
}

fn in_hand(state: &GameState, def: &CardDefinition, player: PlayerId) -> (EntityId, GameState) {
    state.create_card(def, player, ZoneId::Hand(player))
}

/// Every player passes once, starting with the priority holder.
fn pass_round(engine: &Engine, state: &GameState) -> (GameState, Vec<GameEvent>) {
    let mut state = state.clone();
    let mut events = Vec::new();
    for _ in 0..state.players_in_game().len() {
        let holder = state.turn.priority_player;
        let transition = engine.pass_priority(&state, holder).unwrap();
        state = transition.state;
        events.extend(transition.events);
    }
    (state, events)
}

// =============================================================================
// Resolution Order
// =============================================================================

/// Only the top object resolves when everyone passes.
#[test]
fn test_only_top_item_resolves() {
    let engine = engine();
    let state = main_phase();
    let (first, state) = in_hand(&state, &bolt(), P0);
    let (second, state) = in_hand(&state, &bolt(), P0);
    let face = state.player_entity(P1);

    let state = engine.cast_spell(&state, P0, first, &[face]).unwrap().state;
    let state = engine.cast_spell(&state, P0, second, &[face]).unwrap().state;
    assert_eq!(state.stack().len(), 2);

    let (state, events) = pass_round(&engine, &state);
    assert!(events.contains(&GameEvent::Resolved { entity: second }));
    assert!(!events.contains(&GameEvent::Resolved { entity: first }));
    assert_eq!(state.top_of_stack(), Some(first));
    assert_eq!(state.life(P1), 17);

    let (state, _) = pass_round(&engine, &state);
    assert!(state.stack().is_empty());
    assert_eq!(state.life(P1), 14);
    assert_eq!(state.turn.step, Step::PrecombatMain);
}

#[test]
fn test_abilities_resolve_last_in_first_out() {
    let state = main_phase();
    let mut pushed = Vec::new();
    let mut state = state;
    for amount in 1..=4 {
        let item = StackItem::ability(
            StackItemKind::ActivatedAbility,
            P0,
            state.player_entity(P0),
            Effect::gain_life(amount),
            None,
            &[],
        );
        let (id, next) = push_ability(&state, item, &mut Vec::new());
        pushed.push(id);
        state = next;
    }

    let mut resolved = Vec::new();
    loop {
        let (transition, resolution) = resolve_top_of_stack(&state, &BasicEffects, &BasicLegality);
        match resolution {
            Resolution::Resolved(id) => resolved.push(id),
            Resolution::Empty => break,
            Resolution::Fizzled(id) => panic!("{} fizzled", id),
        }
        state = transition.state;
    }

    pushed.reverse();
    assert_eq!(resolved, pushed);
    assert_eq!(state.life(P0), 30);
    // Abilities cease to exist once they leave the stack.
    assert!(pushed.iter().all(|id| !state.exists(*id)));
}

// =============================================================================
// Countering
// =============================================================================

/// Wrath, countered by Cancel, which is itself countered: Wrath resolves.
#[test]
fn test_counterspell_war() {
    let engine = engine();
    let state = main_phase();
    let (mine, state) = state.create_card(&bear(), P0, ZoneId::Battlefield);
    let (theirs, state) = state.create_card(&bear(), P1, ZoneId::Battlefield);
    let (wrath_id, state) = in_hand(&state, &wrath(), P0);
    let (cancel_p1, state) = in_hand(&state, &cancel(), P1);
    let (cancel_p0, state) = in_hand(&state, &cancel(), P0);

    let state = engine.cast_spell(&state, P0, wrath_id, &[]).unwrap().state;
    let state = engine.pass_priority(&state, P0).unwrap().state;
    let state = engine.cast_spell(&state, P1, cancel_p1, &[wrath_id]).unwrap().state;
    let state = engine.pass_priority(&state, P1).unwrap().state;
    let state = engine.cast_spell(&state, P0, cancel_p0, &[cancel_p1]).unwrap().state;
    assert_eq!(state.stack().len(), 3);

    // P0's Cancel resolves and counters P1's Cancel in the same resolution.
    let (state, events) = pass_round(&engine, &state);
    assert!(events.contains(&GameEvent::Countered { entity: cancel_p1 }));
    assert_eq!(state.zone_of(cancel_p1), Some(ZoneId::Graveyard(P1)));
    assert_eq!(state.zone_of(cancel_p0), Some(ZoneId::Graveyard(P0)));
    assert_eq!(state.stack().len(), 1);
    assert_eq!(state.top_of_stack(), Some(wrath_id));

    let (state, events) = pass_round(&engine, &state);
    assert!(events.contains(&GameEvent::Resolved { entity: wrath_id }));
    assert!(state.battlefield().iter().all(|id| !state.is_creature(*id)));
    assert_eq!(state.zone_of(mine), Some(ZoneId::Graveyard(P0)));
    assert_eq!(state.zone_of(theirs), Some(ZoneId::Graveyard(P1)));
    assert_eq!(state.zone_of(wrath_id), Some(ZoneId::Graveyard(P0)));
}

#[test]
fn test_counter_cannot_target_itself() {
    let engine = engine();
    let state = main_phase();
    let (cancel_id, state) = in_hand(&state, &cancel(), P0);

    assert!(matches!(
        engine.cast_spell(&state, P0, cancel_id, &[cancel_id]),
        Err(RuleError::IllegalTarget { .. })
    ));
}

// =============================================================================
// Fizzling
// =============================================================================

#[test]
fn test_spell_fizzles_when_target_leaves() {
    let engine = engine();
    let state = main_phase();
    let (bear_id, state) = state.create_card(&bear(), P1, ZoneId::Battlefield);
    let (bolt_id, state) = in_hand(&state, &bolt(), P0);

    let state = engine.cast_spell(&state, P0, bolt_id, &[bear_id]).unwrap().state;
    let state = state.move_to_graveyard(bear_id, &mut Vec::new());

    let (state, events) = pass_round(&engine, &state);
    assert!(events.contains(&GameEvent::Fizzled { entity: bolt_id }));
    assert!(!events.contains(&GameEvent::Resolved { entity: bolt_id }));
    assert_eq!(state.zone_of(bolt_id), Some(ZoneId::Graveyard(P0)));
    assert_eq!(state.life(P1), 20);
}

// =============================================================================
// Permanent Spells
// =============================================================================

#[test]
fn test_creature_spell_enters_summoning_sick() {
    let engine = engine();
    let state = main_phase();
    let (bear_id, state) = in_hand(&state, &bear(), P0);

    let state = engine.cast_spell(&state, P0, bear_id, &[]).unwrap().state;
    let (state, events) = pass_round(&engine, &state);

    assert!(state.is_on_battlefield(bear_id));
    assert_eq!(state.controller_of(bear_id), Some(P0));
    assert!(state.entity(bear_id).has(ComponentKind::SummoningSick));
    assert!(!state.entity(bear_id).has(ComponentKind::OnStack));
    assert!(events.contains(&GameEvent::Resolved { entity: bear_id }));
}

#[test]
fn test_aura_attaches_to_target() {
    let engine = engine();
    let state = main_phase();
    let (bear_id, state) = state.create_card(&bear(), P1, ZoneId::Battlefield);
    let (aura, state) = in_hand(&state, &pacifism(), P0);

    let state = engine.cast_spell(&state, P0, aura, &[bear_id]).unwrap().state;
    let (state, events) = pass_round(&engine, &state);

    assert!(state.is_on_battlefield(aura));
    assert_eq!(state.entity(aura).attached_to(), Some(bear_id));
    assert!(events.contains(&GameEvent::Attached {
        attachment: aura,
        target: bear_id
    }));
}

// =============================================================================
// Timing
// =============================================================================

#[test]
fn test_sorcery_needs_empty_stack() {
    let engine = engine();
    let state = main_phase();
    let (bolt_id, state) = in_hand(&state, &bolt(), P0);
    let (sorcery, state) = in_hand(&state, &divination(), P0);
    let face = state.player_entity(P1);

    let state = engine.cast_spell(&state, P0, bolt_id, &[face]).unwrap().state;
    assert_eq!(
        engine.cast_spell(&state, P0, sorcery, &[]),
        Err(RuleError::StackNotEmpty)
    );
}

#[test]
fn test_instant_on_opponents_turn() {
    let engine = engine();
    let mut state = main_phase();
    state.turn.step = Step::Upkeep;
    let (bolt_id, state) = in_hand(&state, &bolt(), P1);
    let face = state.player_entity(P0);

    assert_eq!(
        engine.cast_spell(&state, P1, bolt_id, &[face]),
        Err(RuleError::NotPriorityHolder { player: P1 })
    );
    let state = engine.pass_priority(&state, P0).unwrap().state;
    let state = engine.cast_spell(&state, P1, bolt_id, &[face]).unwrap().state;
    assert_eq!(state.turn.priority_player, P1);
    assert_eq!(state.turn.consecutive_passes, 0);
}

#[test]
fn test_cast_requires_card_in_hand() {
    let engine = engine();
    let state = main_phase();
    let (bolt_id, state) = state.create_card(&bolt(), P0, ZoneId::Library(P0));
    let face = state.player_entity(P1);

    assert_eq!(
        engine.cast_spell(&state, P0, bolt_id, &[face]),
        Err(RuleError::NotInZone {
            entity: bolt_id,
            zone: ZoneId::Hand(P0)
        })
    );
}

#[test]
fn test_ability_object_keeps_source() {
    let state = main_phase();
    let (bear_id, state) = state.create_card(&bear(), P0, ZoneId::Battlefield);
    let item = StackItem::ability(
        StackItemKind::ActivatedAbility,
        P0,
        bear_id,
        Effect::gain_life(1),
        None,
        &[],
    );
    let (ability, state) = push_ability(&state, item, &mut Vec::new());

    let stacked = state.entity(ability).stack_item().cloned();
    assert_eq!(stacked.map(|i| i.source), Some(bear_id));
    assert!(state.entity(ability).get(ComponentKind::OnStack).is_some());
    assert!(matches!(
        state.entity(ability).get(ComponentKind::OnStack),
        Some(Component::OnStack(_))
    ));
}
