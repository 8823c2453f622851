//! State-based action integration tests.
//!
//! These tests verify player losses, creature deaths, attachments, tokens,
//! counters, and the legend rule, both through the engine and through
//! direct state-based action checks.

use ccg_rules::cards::{CardDefinition, CardId, CardRegistry, CardType, TokenSpec};
use ccg_rules::core::{CounterKind, GameState, LossReason, PlayerId, RulesConfig};
use ccg_rules::effects::{BasicLegality, Effect, TargetFilter, TargetSpec};
use ccg_rules::rules::{
    check_state_based_actions, collect_state_based_actions, Engine, GameResult,
};
use ccg_rules::triggers::GameEvent;
use ccg_rules::turn::Step;
use ccg_rules::zones::ZoneId;
use ccg_rules::RuleError;

const P0: PlayerId = PlayerId(0);
const P1: PlayerId = PlayerId(1);
const P2: PlayerId = PlayerId(2);

fn bolt() -> CardDefinition {
    CardDefinition::new(CardId::new(1), "Lightning Bolt", [CardType::Instant]).with_spell(
        Effect::damage(3),
        Some(TargetSpec::single(TargetFilter::AnyTarget)),
    )
}

fn bear() -> CardDefinition {
    CardDefinition::creature(CardId::new(2), "Grizzly Bears", 2, 2)
}

fn legend() -> CardDefinition {
    CardDefinition::creature(CardId::new(3), "Isamaru", 2, 1).legendary()
}

fn aura() -> CardDefinition {
    CardDefinition::aura(CardId::new(4), "Holy Strength", TargetFilter::Creature)
}

fn sword() -> CardDefinition {
    CardDefinition::equipment(CardId::new(5), "Short Sword")
}

fn engine() -> Engine {
    Engine::new(
        [bolt(), bear(), legend(), aura(), sword()]
            .into_iter()
            .collect::<CardRegistry>(),
    )
}

fn main_phase(players: usize) -> GameState {
    let mut state = GameState::new(players, RulesConfig::default(), 13);
    state.turn.step = Step::PrecombatMain;
    state
}

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
// Player Losses
// =============================================================================

#[test]
fn test_life_loss_ends_two_player_game() {
    let engine = engine();
    let config = RulesConfig::default().with_starting_life(3);
    let mut state = GameState::new(2, config, 13);
    state.turn.step = Step::PrecombatMain;
    let (bolt_id, state) = state.create_card(&bolt(), P0, ZoneId::Hand(P0));
    let face = state.player_entity(P1);

    let state = engine.cast_spell(&state, P0, bolt_id, &[face]).unwrap().state;
    let (state, events) = pass_round(&engine, &state);

    assert_eq!(state.life(P1), 0);
    assert!(state.has_lost(P1));
    assert_eq!(state.result, Some(GameResult::Winner(P0)));
    assert!(events.contains(&GameEvent::PlayerLost {
        player: P1,
        reason: LossReason::ZeroLife
    }));
    assert!(events.contains(&GameEvent::GameOver {
        result: GameResult::Winner(P0)
    }));

    assert_eq!(engine.pass_priority(&state, P0), Err(RuleError::GameOver));
}

#[test]
fn test_draw_from_empty_library_loses() {
    let engine = engine();
    let mut state = GameState::new(2, RulesConfig::default(), 13);
    state.turn.turn_number = 2;
    state.turn.active_player = P1;
    state.turn.priority_player = P1;
    state.turn.step = Step::Upkeep;

    let (state, events) = pass_round(&engine, &state);

    assert_eq!(state.turn.step, Step::Draw);
    assert!(events.contains(&GameEvent::DrawFailed { player: P1 }));
    assert!(events.contains(&GameEvent::PlayerLost {
        player: P1,
        reason: LossReason::DrewFromEmptyLibrary
    }));
    assert_eq!(state.result, Some(GameResult::Winner(P0)));
}

#[test]
fn test_poison_limit_loses() {
    let state = main_phase(2);
    let player = state.player_entity(P0);
    let state = state.add_counters(player, CounterKind::Poison, 10, &mut Vec::new());

    let transition = check_state_based_actions(&state, &BasicLegality);
    assert!(transition.events.contains(&GameEvent::PlayerLost {
        player: P0,
        reason: LossReason::Poison
    }));
    assert_eq!(transition.state.result, Some(GameResult::Winner(P1)));
}

#[test]
fn test_simultaneous_loss_is_draw() {
    let state = main_phase(2);
    let mut events = Vec::new();
    let state = state.lose_life(P0, 20, &mut events);
    let state = state.lose_life(P1, 25, &mut events);

    let transition = check_state_based_actions(&state, &BasicLegality);
    assert_eq!(transition.state.result, Some(GameResult::Draw));
    assert!(transition.state.players_in_game().is_empty());
}

#[test]
fn test_multiplayer_elimination_continues_game() {
    let state = main_phase(3);
    let state = state.lose_life(P1, 20, &mut Vec::new());

    let transition = check_state_based_actions(&state, &BasicLegality);
    let state = transition.state;
    assert!(!state.is_game_over());
    assert!(!state.is_in_game(P1));
    assert_eq!(state.turn.apnap_order(), vec![P0, P2]);
    assert_eq!(state.turn.next_player_after(P0), P2);
}

// =============================================================================
// Permanents
// =============================================================================

#[test]
fn test_lethal_damage_and_zero_toughness() {
    let state = main_phase(2);
    let (damaged, state) = state.create_card(&bear(), P0, ZoneId::Battlefield);
    let (shrunk, state) = state.create_card(&bear(), P1, ZoneId::Battlefield);
    let (healthy, state) = state.create_card(&bear(), P1, ZoneId::Battlefield);
    let source = state.player_entity(P1);
    let mut events = Vec::new();
    let state = state.deal_damage(source, damaged, 2, false, &mut events);
    let state = state.add_counters(shrunk, CounterKind::MinusOne, 2, &mut events);
    let state = state.deal_damage(source, healthy, 1, false, &mut events);

    let state = check_state_based_actions(&state, &BasicLegality).state;
    assert_eq!(state.zone_of(damaged), Some(ZoneId::Graveyard(P0)));
    assert_eq!(state.zone_of(shrunk), Some(ZoneId::Graveyard(P1)));
    assert!(state.is_on_battlefield(healthy));
}

/// Killing the enchanted creature makes the Aura fall in a later pass; the
/// check keeps going until nothing changes.
#[test]
fn test_fixed_point_across_passes() {
    let state = main_phase(2);
    let (bear_id, state) = state.create_card(&bear(), P0, ZoneId::Battlefield);
    let (aura_id, state) = state.create_card(&aura(), P0, ZoneId::Battlefield);
    let mut events = Vec::new();
    let state = state.attach(aura_id, bear_id, &mut events);
    let source = state.player_entity(P1);
    let state = state.deal_damage(source, bear_id, 5, false, &mut events);

    let transition = check_state_based_actions(&state, &BasicLegality);
    let state = transition.state;
    assert_eq!(state.zone_of(bear_id), Some(ZoneId::Graveyard(P0)));
    assert_eq!(state.zone_of(aura_id), Some(ZoneId::Graveyard(P0)));
    assert!(collect_state_based_actions(&state, &BasicLegality).is_empty());

    // Running the check again changes nothing.
    let again = check_state_based_actions(&state, &BasicLegality);
    assert!(again.events.is_empty());
    assert_eq!(again.state, state);
}

#[test]
fn test_equipment_unattaches_instead_of_dying() {
    let state = main_phase(2);
    let (bear_id, state) = state.create_card(&bear(), P0, ZoneId::Battlefield);
    let (sword_id, state) = state.create_card(&sword(), P0, ZoneId::Battlefield);
    let mut events = Vec::new();
    let state = state.attach(sword_id, bear_id, &mut events);
    let state = state.move_to_graveyard(bear_id, &mut events);

    let transition = check_state_based_actions(&state, &BasicLegality);
    assert!(transition.state.is_on_battlefield(sword_id));
    assert_eq!(transition.state.entity(sword_id).attached_to(), None);
    assert!(transition
        .events
        .contains(&GameEvent::Unattached { attachment: sword_id }));
}

#[test]
fn test_token_ceases_to_exist_off_battlefield() {
    let state = main_phase(2);
    let mut events = Vec::new();
    let (token, state) = state.create_token(&TokenSpec::creature("Soldier", 1, 1), P0, &mut events);
    let state = state.move_to_graveyard(token, &mut events);
    assert!(state.exists(token));

    let transition = check_state_based_actions(&state, &BasicLegality);
    assert!(!transition.state.exists(token));
    assert!(transition
        .events
        .contains(&GameEvent::CeasedToExist { entity: token }));
}

#[test]
fn test_counters_annihilate() {
    let state = main_phase(2);
    let (bear_id, state) = state.create_card(&bear(), P0, ZoneId::Battlefield);
    let mut events = Vec::new();
    let state = state.add_counters(bear_id, CounterKind::PlusOne, 3, &mut events);
    let state = state.add_counters(bear_id, CounterKind::MinusOne, 1, &mut events);

    let transition = check_state_based_actions(&state, &BasicLegality);
    let counters = transition.state.entity(bear_id).counters();
    assert_eq!(counters.get(CounterKind::PlusOne), 2);
    assert_eq!(counters.get(CounterKind::MinusOne), 0);
    assert_eq!(transition.state.power(bear_id), Some(4));
    assert!(transition.events.contains(&GameEvent::CountersAnnihilated {
        entity: bear_id,
        amount: 1
    }));
}

// =============================================================================
// Legend Rule
// =============================================================================

#[test]
fn test_legend_rule_same_controller() {
    let engine = engine();
    let state = main_phase(2);
    let (old, state) = state.create_card(&legend(), P0, ZoneId::Battlefield);
    let (new, state) = state.create_card(&legend(), P0, ZoneId::Battlefield);

    let transition = engine.check_state_based_actions(&state);
    assert!(transition.events.contains(&GameEvent::LegendRuleChoicePending {
        controller: P0,
        name: "Isamaru".to_string()
    }));
    let state = transition.state;
    assert_eq!(state.legend_choices.len(), 1);
    assert!(state.is_on_battlefield(old) && state.is_on_battlefield(new));

    // A pending choice does not block priority.
    assert!(engine.pass_priority(&state, P0).is_ok());

    assert!(matches!(
        engine.choose_legend_survivor(&state, P1, "Isamaru", new),
        Err(RuleError::NoLegendChoice { .. })
    ));
    let state = engine
        .choose_legend_survivor(&state, P0, "Isamaru", new)
        .unwrap()
        .state;
    assert!(state.is_on_battlefield(new));
    assert_eq!(state.zone_of(old), Some(ZoneId::Graveyard(P0)));
    assert!(state.legend_choices.is_empty());
}

#[test]
fn test_legend_rule_different_controllers() {
    let engine = engine();
    let state = main_phase(2);
    let (mine, state) = state.create_card(&legend(), P0, ZoneId::Battlefield);
    let (theirs, state) = state.create_card(&legend(), P1, ZoneId::Battlefield);

    let transition = engine.check_state_based_actions(&state);
    assert!(transition.events.is_empty());
    assert!(transition.state.legend_choices.is_empty());
    assert!(transition.state.is_on_battlefield(mine));
    assert!(transition.state.is_on_battlefield(theirs));
}

#[test]
fn test_legend_choice_dropped_when_duplicate_leaves() {
    let engine = engine();
    let state = main_phase(2);
    let (old, state) = state.create_card(&legend(), P0, ZoneId::Battlefield);
    let (new, state) = state.create_card(&legend(), P0, ZoneId::Battlefield);
    let state = engine.check_state_based_actions(&state).state;
    assert_eq!(state.legend_choices.len(), 1);

    let state = state.move_to_graveyard(old, &mut Vec::new());
    let state = engine.check_state_based_actions(&state).state;
    assert!(state.legend_choices.is_empty());
    assert!(state.is_on_battlefield(new));
}
