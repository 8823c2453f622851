//! The action engine.
//!
//! `Engine` is the entry point for player actions. Every action is checked
//! against the rules, applied, and then settled: state-based actions run to
//! a fixed point and the action's events are scanned for triggers, which
//! join the pending queue in APNAP order.
//!
//! The engine holds no game state. Each call takes a `&GameState` and
//! returns a [`Transition`] or a [`RuleError`]; a rejected action leaves the
//! caller's state as it was.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::legend::resolve_legend_choice;
use super::sba::check_state_based_actions;
use crate::cards::{CardDefinition, CardRegistry, Keyword};
use crate::combat;
use crate::core::{Action, ActionRecord, EntityId, GameState, PlayerId, Transition};
use crate::effects::{BasicEffects, BasicLegality, Effect, EffectExecutor, LegalityChecker, TargetSpec};
use crate::error::{Result, RuleError};
use crate::stack::{push_ability, push_spell, StackItem, StackItemKind};
use crate::triggers::{self, detect_step_triggers, detect_triggers, enqueue, GameEvent, PendingTrigger};
use crate::turn::{self, all_players_passed, resolve_passed_priority, take_action, Step};
use crate::zones::ZoneId;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Every remaining player lost at once.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Draw => false,
        }
    }
}

/// Rules engine over a card registry and the two content seams.
///
/// ## Example
///
/// ```
/// use ccg_rules::cards::{CardDefinition, CardId, CardRegistry};
/// use ccg_rules::core::{Action, GameState, PlayerId, RulesConfig};
/// use ccg_rules::rules::Engine;
/// use ccg_rules::turn::Step;
/// use ccg_rules::zones::ZoneId;
///
/// let forest = CardDefinition::land(CardId::new(1), "Forest");
/// let engine = Engine::new([forest.clone()].into_iter().collect::<CardRegistry>());
///
/// let p0 = PlayerId::new(0);
/// let state = GameState::new(2, RulesConfig::default(), 7);
/// let (card, mut state) = state.create_card(&forest, p0, ZoneId::Hand(p0));
/// state.turn.step = Step::PrecombatMain;
///
/// let transition = engine.apply(&state, p0, &Action::PlayLand { card }).unwrap();
/// assert!(transition.state.is_on_battlefield(card));
/// assert_eq!(transition.state.history.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Engine<E = BasicEffects, L = BasicLegality> {
    registry: CardRegistry,
    executor: E,
    legality: L,
}

impl Engine {
    /// An engine with the basic effect executor and legality rules.
    #[must_use]
    pub fn new(registry: CardRegistry) -> Self {
        Self::with_parts(registry, BasicEffects, BasicLegality)
    }
}

impl<E, L> Engine<E, L>
where
    E: EffectExecutor,
    L: LegalityChecker,
{
    /// An engine with a custom executor and legality checker.
    #[must_use]
    pub fn with_parts(registry: CardRegistry, executor: E, legality: L) -> Self {
        Self {
            registry,
            executor,
            legality,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    #[must_use]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    #[must_use]
    pub fn legality(&self) -> &L {
        &self.legality
    }

    /// Apply `action` for `player` and record it in the state's history.
    pub fn apply(&self, state: &GameState, player: PlayerId, action: &Action) -> Result<Transition> {
        let mut transition = match action {
            Action::PassPriority => self.pass_priority(state, player),
            Action::PlayLand { card } => self.play_land(state, player, *card),
            Action::CastSpell { card, targets } => self.cast_spell(state, player, *card, targets),
            Action::ActivateAbility {
                source,
                index,
                targets,
            } => self.activate_ability(state, player, *source, *index, targets),
            Action::DeclareAttacker { attacker } => self.declare_attacker(state, player, *attacker),
            Action::DeclareBlocker { blocker, attacker } => {
                self.declare_blocker(state, player, *blocker, *attacker)
            }
            Action::StackTrigger { index, targets } => {
                self.stack_trigger(state, player, *index, targets)
            }
            Action::ChooseLegendSurvivor { name, survivor } => {
                self.choose_legend_survivor(state, player, name, *survivor)
            }
            Action::AdvanceStep => self.advance_step(state, player),
            Action::PerformCleanup => self.perform_cleanup(state, player),
        }?;

        let sequence = state.history.len() as u32;
        transition.state.history.push_back(ActionRecord::new(
            player,
            action.clone(),
            state.turn.turn_number,
            sequence,
        ));
        Ok(transition)
    }

    /// Pass priority. When this completes a round of passes, the top of the
    /// stack resolves or, with an empty stack, the game moves to the next
    /// step.
    pub fn pass_priority(&self, state: &GameState, player: PlayerId) -> Result<Transition> {
        let passed = turn::pass_priority(state, player)?;
        if !all_players_passed(&passed.state) {
            return Ok(passed);
        }

        let (resolved, resolution) =
            resolve_passed_priority(&passed.state, &self.executor, &self.legality);
        debug!(?resolution, step = %resolved.state.turn.step, "all players passed");

        let mut events = passed.events;
        events.extend(resolved.events);
        Ok(self.settle(Transition::new(resolved.state, events)))
    }

    /// Play a land from hand.
    pub fn play_land(&self, state: &GameState, player: PlayerId, card: EntityId) -> Result<Transition> {
        self.check_priority(state, player)?;
        check_sorcery_timing(state, player)?;
        check_in_zone(state, card, ZoneId::Hand(player))?;

        let is_land = state
            .characteristics(card)
            .map_or(false, |c| c.is_land());
        if !is_land {
            return Err(RuleError::NotALand { entity: card });
        }
        let limit = state.config.lands_per_turn;
        if state.turn.lands_played >= limit {
            return Err(RuleError::LandLimitReached { limit });
        }

        let mut events = Vec::new();
        let mut next = state.put_onto_battlefield(card, player, &mut events);
        next.turn.lands_played += 1;
        events.push(GameEvent::LandPlayed { player, entity: card });
        debug!(%player, %card, "land played");

        let next = take_action(&next, player);
        Ok(self.settle(Transition::new(next, events)))
    }

    /// Cast a spell from hand with the chosen targets.
    pub fn cast_spell(
        &self,
        state: &GameState,
        player: PlayerId,
        card: EntityId,
        targets: &[EntityId],
    ) -> Result<Transition> {
        self.check_priority(state, player)?;
        check_in_zone(state, card, ZoneId::Hand(player))?;

        let def = self.definition_of(state, card)?;
        if def.characteristics.is_land() {
            return Err(RuleError::CannotCastLand { entity: card });
        }
        if def.characteristics.is_sorcery_speed() {
            check_sorcery_timing(state, player)?;
        }

        let (effect, spec) = match &def.spell {
            Some(spell) => (spell.effect.clone(), spell.targets.clone()),
            None => (Effect::none(), None),
        };
        self.check_targets(state, player, spec.as_ref(), card, targets)?;

        let mut events = Vec::new();
        let item = StackItem::spell(player, card, effect, spec, targets);
        let next = push_spell(state, item, &mut events);
        debug!(%player, %card, name = def.name(), "spell cast");

        let next = take_action(&next, player);
        Ok(self.settle(Transition::new(next, events)))
    }

    /// Activate ability `index` of a permanent `player` controls.
    pub fn activate_ability(
        &self,
        state: &GameState,
        player: PlayerId,
        source: EntityId,
        index: usize,
        targets: &[EntityId],
    ) -> Result<Transition> {
        self.check_priority(state, player)?;
        check_in_zone(state, source, ZoneId::Battlefield)?;
        if state.controller_of(source) != Some(player) {
            return Err(RuleError::NotController {
                player,
                entity: source,
            });
        }

        let def = self.definition_of(state, source)?;
        let Some(ability) = def.activated.get(index) else {
            return Err(RuleError::NoSuchAbility {
                entity: source,
                index,
            });
        };
        if ability.sorcery_speed {
            check_sorcery_timing(state, player)?;
        }
        if ability.tap_cost {
            let components = state.entity(source);
            if components.is_tapped() {
                return Err(RuleError::AlreadyTapped { entity: source });
            }
            if state.is_creature(source)
                && components.is_summoning_sick()
                && !state.has_keyword(source, Keyword::Haste)
            {
                return Err(RuleError::SummoningSick { entity: source });
            }
        }
        self.check_targets(state, player, ability.targets.as_ref(), source, targets)?;

        let mut events = Vec::new();
        let next = if ability.tap_cost {
            state.tap(source)
        } else {
            state.clone()
        };
        let item = StackItem::ability(
            StackItemKind::ActivatedAbility,
            player,
            source,
            ability.effect.clone(),
            ability.targets.clone(),
            targets,
        );
        let (id, next) = push_ability(&next, item, &mut events);
        events.push(GameEvent::AbilityActivated {
            player,
            source,
            ability: id,
        });
        debug!(%player, %source, index, ability = %id, "ability activated");

        let next = take_action(&next, player);
        Ok(self.settle(Transition::new(next, events)))
    }

    /// Declare an attacker during the declare attackers step.
    pub fn declare_attacker(
        &self,
        state: &GameState,
        player: PlayerId,
        attacker: EntityId,
    ) -> Result<Transition> {
        let declared = combat::declare_attacker(state, player, attacker, &self.legality)?;
        let next = take_action(&declared.state, player);
        Ok(self.settle(Transition::new(next, declared.events)))
    }

    /// Declare a blocker during the declare blockers step.
    pub fn declare_blocker(
        &self,
        state: &GameState,
        player: PlayerId,
        blocker: EntityId,
        attacker: EntityId,
    ) -> Result<Transition> {
        let declared = combat::declare_blocker(state, player, blocker, attacker, &self.legality)?;
        let next = take_action(&declared.state, state.turn.active_player);
        Ok(self.settle(Transition::new(next, declared.events)))
    }

    /// Put the pending trigger at `index` on the stack.
    pub fn stack_trigger(
        &self,
        state: &GameState,
        player: PlayerId,
        index: usize,
        targets: &[EntityId],
    ) -> Result<Transition> {
        if state.is_game_over() {
            return Err(RuleError::GameOver);
        }
        let Some(trigger) = state.pending_triggers.get(index) else {
            return Err(RuleError::NoSuchTrigger { index });
        };
        if trigger.controller != player {
            return Err(RuleError::NotController {
                player,
                entity: trigger.source,
            });
        }
        let stacked = triggers::stack_pending_trigger(state, index, targets, &self.legality)?;
        Ok(self.settle(stacked))
    }

    /// Stack every leading pending trigger that needs no targets.
    #[must_use]
    pub fn stack_untargeted_triggers(&self, state: &GameState) -> Transition {
        let stacked = triggers::stack_untargeted_triggers(state, &self.legality);
        self.settle(stacked)
    }

    /// Keep `survivor` among `player`'s legends named `name`.
    pub fn choose_legend_survivor(
        &self,
        state: &GameState,
        player: PlayerId,
        name: &str,
        survivor: EntityId,
    ) -> Result<Transition> {
        if state.is_game_over() {
            return Err(RuleError::GameOver);
        }
        let resolved = resolve_legend_choice(state, player, name, survivor)?;
        Ok(self.settle(resolved))
    }

    /// Leave the untap step, which grants no priority.
    pub fn advance_step(&self, state: &GameState, player: PlayerId) -> Result<Transition> {
        self.check_no_priority_step(state, player, Step::Untap)?;
        Ok(self.settle(turn::advance_step(state)))
    }

    /// Finish the cleanup step and begin the next turn.
    pub fn perform_cleanup(&self, state: &GameState, player: PlayerId) -> Result<Transition> {
        self.check_no_priority_step(state, player, Step::Cleanup)?;
        Ok(self.settle(turn::advance_step(state)))
    }

    /// Run state-based actions and trigger detection without an action.
    #[must_use]
    pub fn check_state_based_actions(&self, state: &GameState) -> Transition {
        self.settle(Transition::unchanged(state))
    }

    /// Stabilize after an action: detect triggers from the action's events,
    /// run state-based actions to a fixed point, then detect triggers from
    /// what the state-based actions did.
    fn settle(&self, transition: Transition) -> Transition {
        let mut found = self.detect(&transition.state, &transition.events);
        let acted = transition.events.len();

        let checked = transition.then(|s| check_state_based_actions(s, &self.legality));
        if checked.state.is_game_over() {
            return checked;
        }
        found.extend(self.detect(&checked.state, &checked.events[acted..]));

        if found.is_empty() && checked.state.pending_triggers.is_empty() {
            return checked;
        }
        let state = enqueue(&checked.state, found);
        Transition::new(state, checked.events)
    }

    fn detect(&self, state: &GameState, events: &[GameEvent]) -> Vec<PendingTrigger> {
        let mut found = detect_triggers(state, events, &self.registry);
        for event in events {
            if let GameEvent::StepBegan { step, .. } = event {
                found.extend(detect_step_triggers(state, *step, &self.registry));
            }
        }
        found
    }

    fn check_priority(&self, state: &GameState, player: PlayerId) -> Result<()> {
        if state.is_game_over() {
            return Err(RuleError::GameOver);
        }
        let step = state.turn.step;
        if !step.grants_priority() {
            return Err(RuleError::NoPriorityInStep { step });
        }
        if state.turn.priority_player != player {
            return Err(RuleError::NotPriorityHolder { player });
        }
        if !state.pending_triggers.is_empty() {
            return Err(RuleError::TriggersPending {
                count: state.pending_triggers.len(),
            });
        }
        Ok(())
    }

    fn check_no_priority_step(&self, state: &GameState, player: PlayerId, expected: Step) -> Result<()> {
        if state.is_game_over() {
            return Err(RuleError::GameOver);
        }
        let actual = state.turn.step;
        if actual != expected {
            return Err(RuleError::WrongStep { expected, actual });
        }
        if player != state.turn.active_player {
            return Err(RuleError::NotActivePlayer { player });
        }
        Ok(())
    }

    fn definition_of(&self, state: &GameState, entity: EntityId) -> Result<&CardDefinition> {
        let Some(card) = state.entity(entity).card() else {
            return Err(RuleError::NotACard { entity });
        };
        self.registry
            .get(card)
            .ok_or(RuleError::UnknownCard { card })
    }

    fn check_targets(
        &self,
        state: &GameState,
        controller: PlayerId,
        spec: Option<&TargetSpec>,
        source: EntityId,
        targets: &[EntityId],
    ) -> Result<()> {
        let Some(spec) = spec else {
            if targets.is_empty() {
                return Ok(());
            }
            return Err(RuleError::TargetCount {
                expected: "no".to_string(),
                got: targets.len(),
            });
        };
        if !spec.accepts_count(targets.len()) {
            return Err(RuleError::TargetCount {
                expected: spec.describe_count(),
                got: targets.len(),
            });
        }
        for &target in targets {
            let verdict = self
                .legality
                .validate_target(state, controller, spec, source, target);
            if let Some(reason) = verdict.reason() {
                return Err(RuleError::IllegalTarget {
                    target,
                    reason: reason.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn check_in_zone(state: &GameState, entity: EntityId, zone: ZoneId) -> Result<()> {
    if state.zone_of(entity) == Some(zone) {
        Ok(())
    } else {
        Err(RuleError::NotInZone { entity, zone })
    }
}

/// Sorcery timing: a main step of the player's own turn with an empty stack.
fn check_sorcery_timing(state: &GameState, player: PlayerId) -> Result<()> {
    let step = state.turn.step;
    if !step.allows_sorcery_speed() {
        return Err(RuleError::SorcerySpeedOnly { step });
    }
    if player != state.turn.active_player {
        return Err(RuleError::NotActivePlayer { player });
    }
    if !state.stack().is_empty() {
        return Err(RuleError::StackNotEmpty);
    }
    Ok(())
}
