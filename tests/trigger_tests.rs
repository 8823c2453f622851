//! Trigger integration tests.
//!
//! These tests verify that triggers are detected from an action's events,
//! queued in APNAP order, and put on the stack by their controllers.

use ccg_rules::cards::{CardDefinition, CardId, CardRegistry, CardType};
use ccg_rules::core::{GameState, PlayerId, RulesConfig};
use ccg_rules::effects::{Effect, TargetFilter, TargetSpec};
use ccg_rules::rules::Engine;
use ccg_rules::triggers::{
    GameEvent, TriggerContext, TriggerKind, TriggeredAbilityDeclaration,
};
use ccg_rules::turn::Step;
use ccg_rules::zones::ZoneId;
use ccg_rules::RuleError;

const P0: PlayerId = PlayerId(0);
const P1: PlayerId = PlayerId(1);
const P2: PlayerId = PlayerId(2);

/// "Whenever a creature you control dies, you gain 1 life."
fn blood_altar() -> CardDefinition {
    CardDefinition::new(CardId::new(1), "Blood Altar", [CardType::Enchantment]).with_trigger(
        TriggeredAbilityDeclaration::new(TriggerKind::Dies, Effect::gain_life(1)).controller_only(),
    )
}

fn bear() -> CardDefinition {
    CardDefinition::creature(CardId::new(2), "Grizzly Bears", 2, 2)
}

fn wrath() -> CardDefinition {
    CardDefinition::sorcery(
        CardId::new(3),
        "Wrath of God",
        Effect::destroy_all(TargetFilter::Creature),
    )
}

/// "When this creature enters, it deals 1 damage to any target."
fn shocker() -> CardDefinition {
    CardDefinition::creature(CardId::new(4), "Shocker", 1, 1).with_trigger(
        TriggeredAbilityDeclaration::new(TriggerKind::EntersBattlefield, Effect::damage(1))
            .self_only()
            .with_targets(TargetSpec::single(TargetFilter::AnyTarget)),
    )
}

/// "At the beginning of your upkeep, you gain 1 life."
fn shrine() -> CardDefinition {
    CardDefinition::new(CardId::new(5), "Shrine", [CardType::Artifact]).with_trigger(
        TriggeredAbilityDeclaration::new(TriggerKind::StepBegins(Step::Upkeep), Effect::gain_life(1))
            .controller_only(),
    )
}

/// "When this leaves the battlefield, draw a card."
fn keeper() -> CardDefinition {
    CardDefinition::creature(CardId::new(6), "Keeper", 1, 1).with_trigger(
        TriggeredAbilityDeclaration::new(TriggerKind::LeavesBattlefield, Effect::draw(1))
            .self_only(),
    )
}

/// A 0/0 that dies as soon as it enters: "When this enters, you gain 1 life."
fn husk() -> CardDefinition {
    CardDefinition::creature(CardId::new(8), "Husk", 0, 0).with_trigger(
        TriggeredAbilityDeclaration::new(TriggerKind::EntersBattlefield, Effect::gain_life(1))
            .self_only(),
    )
}

/// "Whenever a creature you control dies, deal 1 damage to any target."
fn vengeful_altar() -> CardDefinition {
    CardDefinition::new(CardId::new(9), "Vengeful Altar", [CardType::Enchantment]).with_trigger(
        TriggeredAbilityDeclaration::new(TriggerKind::Dies, Effect::damage(1))
            .controller_only()
            .with_targets(TargetSpec::single(TargetFilter::AnyTarget)),
    )
}

fn engine() -> Engine {
    Engine::new(
        [
            blood_altar(),
            bear(),
            wrath(),
            shocker(),
            shrine(),
            keeper(),
            forest_in_library(),
            husk(),
            vengeful_altar(),
        ]
            .into_iter()
            .collect::<CardRegistry>(),
    )
}

fn main_phase(players: usize) -> GameState {
    let mut state = GameState::new(players, RulesConfig::default(), 9);
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

/// Board with an altar and a bear for each player, and a Wrath resolved by
/// the active player.
fn after_wrath(players: usize) -> GameState {
    let engine = engine();
    let mut state = main_phase(players);
    for p in PlayerId::all(players) {
        state = state.create_card(&blood_altar(), p, ZoneId::Battlefield).1;
        state = state.create_card(&bear(), p, ZoneId::Battlefield).1;
    }
    let (wrath_id, state) = state.create_card(&wrath(), P0, ZoneId::Hand(P0));

    let state = engine.cast_spell(&state, P0, wrath_id, &[]).unwrap().state;
    pass_round(&engine, &state).0
}

// =============================================================================
// APNAP Ordering
// =============================================================================

#[test]
fn test_simultaneous_triggers_queue_in_apnap_order() {
    let state = after_wrath(3);

    let controllers: Vec<PlayerId> = state.pending_triggers.iter().map(|t| t.controller).collect();
    assert_eq!(controllers, vec![P0, P1, P2]);
    assert!(state.battlefield().iter().all(|id| !state.is_creature(*id)));
}

#[test]
fn test_apnap_order_follows_active_player() {
    let engine = engine();
    let mut state = main_phase(3);
    for p in PlayerId::all(3) {
        state = state.create_card(&blood_altar(), p, ZoneId::Battlefield).1;
        state = state.create_card(&bear(), p, ZoneId::Battlefield).1;
    }
    state.turn.active_player = P1;
    state.turn.priority_player = P1;
    let (wrath_id, state) = state.create_card(&wrath(), P1, ZoneId::Hand(P1));

    let state = engine.cast_spell(&state, P1, wrath_id, &[]).unwrap().state;
    let (state, _) = pass_round(&engine, &state);

    let controllers: Vec<PlayerId> = state.pending_triggers.iter().map(|t| t.controller).collect();
    assert_eq!(controllers, vec![P1, P2, P0]);
}

#[test]
fn test_non_active_player_waits_for_active_player() {
    let engine = engine();
    let state = after_wrath(2);

    assert_eq!(
        engine.stack_trigger(&state, P1, 1, &[]),
        Err(RuleError::TriggerOutOfOrder { first: P0 })
    );
    assert_eq!(
        engine.pass_priority(&state, state.turn.priority_player),
        Err(RuleError::TriggersPending { count: 2 })
    );
}

/// The active player's trigger goes on the stack first and resolves last.
#[test]
fn test_active_player_trigger_resolves_last() {
    let engine = engine();
    let state = after_wrath(2);

    let transition = engine.stack_untargeted_triggers(&state);
    let state = transition.state;
    assert!(state.pending_triggers.is_empty());
    assert_eq!(state.stack().len(), 2);

    let (state, events) = pass_round(&engine, &state);
    assert!(events.contains(&GameEvent::LifeGained { player: P1, amount: 1 }));
    assert_eq!(state.life(P0), 20);

    let (state, _) = pass_round(&engine, &state);
    assert_eq!(state.life(P0), 21);
    assert_eq!(state.life(P1), 21);
}

#[test]
fn test_dies_trigger_context() {
    let state = after_wrath(2);
    let trigger = &state.pending_triggers[0];

    match &trigger.context {
        TriggerContext::ZoneChange { from, to, .. } => {
            assert_eq!(*from, Some(ZoneId::Battlefield));
            assert_eq!(*to, ZoneId::Graveyard(P0));
        }
        other => panic!("unexpected context {:?}", other),
    }
}

// =============================================================================
// Targeted Triggers
// =============================================================================

#[test]
fn test_targeted_trigger_waits_for_targets() {
    let engine = engine();
    let state = main_phase(2);
    let (shocker_id, state) = state.create_card(&shocker(), P0, ZoneId::Hand(P0));

    let state = engine.cast_spell(&state, P0, shocker_id, &[]).unwrap().state;
    let (state, _) = pass_round(&engine, &state);
    assert_eq!(state.pending_triggers.len(), 1);

    // Not stacked automatically.
    let state = engine.stack_untargeted_triggers(&state).state;
    assert_eq!(state.pending_triggers.len(), 1);
    assert!(state.stack().is_empty());

    let face = state.player_entity(P1);
    let transition = engine.stack_trigger(&state, P0, 0, &[face]).unwrap();
    assert!(transition.events.iter().any(|e| matches!(
        e,
        GameEvent::TriggerStacked { source, .. } if *source == shocker_id
    )));

    let (state, _) = pass_round(&engine, &transition.state);
    assert_eq!(state.life(P1), 19);
}

#[test]
fn test_targeted_trigger_without_targets_is_removed() {
    let engine = engine();
    let state = main_phase(2);
    let (shocker_id, state) = state.create_card(&shocker(), P0, ZoneId::Hand(P0));

    let state = engine.cast_spell(&state, P0, shocker_id, &[]).unwrap().state;
    let (state, _) = pass_round(&engine, &state);

    let state = engine.stack_trigger(&state, P0, 0, &[]).unwrap().state;
    assert!(state.pending_triggers.is_empty());
    assert!(state.stack().is_empty());
}

#[test]
fn test_enters_trigger_of_creature_killed_by_state_based_actions() {
    let engine = engine();
    let state = main_phase(2);
    let (husk_id, state) = state.create_card(&husk(), P0, ZoneId::Hand(P0));

    let state = engine.cast_spell(&state, P0, husk_id, &[]).unwrap().state;
    let (state, events) = pass_round(&engine, &state);

    assert!(events.iter().any(|e| matches!(e, GameEvent::Died { entity, .. } if *entity == husk_id)));
    assert_eq!(state.zone_of(husk_id), Some(ZoneId::Graveyard(P0)));
    assert_eq!(state.pending_triggers.len(), 1);
    assert_eq!(state.pending_triggers[0].source, husk_id);

    let state = engine.stack_untargeted_triggers(&state).state;
    let (state, _) = pass_round(&engine, &state);
    assert_eq!(state.life(P0), 21);
}

#[test]
fn test_eliminated_player_triggers_are_not_queued() {
    let engine = engine();
    let state = main_phase(3);
    let (_, state) = state.create_card(&vengeful_altar(), P1, ZoneId::Battlefield);
    let (theirs, state) = state.create_card(&bear(), P1, ZoneId::Battlefield);
    let (_, state) = state.create_card(&bear(), P2, ZoneId::Battlefield);
    let state = state.lose_life(P1, 20, &mut Vec::new());
    let state = engine.check_state_based_actions(&state).state;
    assert!(!state.is_in_game(P1));
    assert!(state.is_on_battlefield(theirs));

    let (wrath_id, state) = state.create_card(&wrath(), P0, ZoneId::Hand(P0));
    let state = engine.cast_spell(&state, P0, wrath_id, &[]).unwrap().state;
    let (state, _) = pass_round(&engine, &state);

    assert_eq!(state.zone_of(theirs), Some(ZoneId::Graveyard(P1)));
    assert!(state.pending_triggers.is_empty());
    assert!(engine.pass_priority(&state, P0).is_ok());
}

// =============================================================================
// Step and Leave Triggers
// =============================================================================

#[test]
fn test_upkeep_trigger_only_for_controller() {
    let engine = engine();
    let state = GameState::new(2, RulesConfig::default(), 9);
    let (_, state) = state.create_card(&shrine(), P0, ZoneId::Battlefield);
    let (_, state) = state.create_card(&shrine(), P1, ZoneId::Battlefield);

    let state = engine.advance_step(&state, P0).unwrap().state;
    assert_eq!(state.pending_triggers.len(), 1);
    assert_eq!(state.pending_triggers[0].controller, P0);
    assert_eq!(
        state.pending_triggers[0].context,
        TriggerContext::Step {
            turn: 1,
            step: Step::Upkeep
        }
    );
}

#[test]
fn test_leaves_battlefield_trigger_sees_departed_object() {
    let engine = engine();
    let state = main_phase(2);
    let (keeper_id, state) = state.create_card(&keeper(), P1, ZoneId::Battlefield);
    let (_, state) = state.create_card(&forest_in_library(), P1, ZoneId::Library(P1));
    let (wrath_id, state) = state.create_card(&wrath(), P0, ZoneId::Hand(P0));

    let state = engine.cast_spell(&state, P0, wrath_id, &[]).unwrap().state;
    let (state, _) = pass_round(&engine, &state);

    assert_eq!(state.zone_of(keeper_id), Some(ZoneId::Graveyard(P1)));
    assert_eq!(state.pending_triggers.len(), 1);
    assert_eq!(state.pending_triggers[0].source, keeper_id);
    assert_eq!(state.pending_triggers[0].controller, P1);

    let state = engine.stack_untargeted_triggers(&state).state;
    let (state, _) = pass_round(&engine, &state);
    assert_eq!(state.hand(P1).len(), 1);
}

fn forest_in_library() -> CardDefinition {
    CardDefinition::land(CardId::new(7), "Forest")
}

#[test]
fn test_no_triggers_after_game_over() {
    let engine = engine();
    let state = main_phase(2);
    let (_, state) = state.create_card(&blood_altar(), P1, ZoneId::Battlefield);
    let (bear_id, state) = state.create_card(&bear(), P1, ZoneId::Battlefield);
    let face = state.player_entity(P1);
    let mut events = Vec::new();
    let state = state.deal_damage(bear_id, face, 20, false, &mut events);
    let state = state.deal_damage(face, bear_id, 2, false, &mut events);

    // The bear dies in the same check that ends the game.
    let transition = engine.check_state_based_actions(&state);
    assert!(transition
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::Died { entity, .. } if *entity == bear_id)));
    assert!(transition.state.is_game_over());
    assert!(transition.state.pending_triggers.is_empty());
}
