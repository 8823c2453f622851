//! Game state: the single value threaded through every transition.
//!
//! ## GameState
//!
//! Complete game state:
//! - Entity/component store (players, cards, tokens, abilities)
//! - Zone manager (where everything is)
//! - Turn state (step, active player, priority, passes)
//! - Combat state, present only during combat
//! - Pending triggers and legend rule choices
//! - Rules configuration and RNG
//!
//! ## Purity
//!
//! Every operation takes `&self` and returns a new `GameState`; the input is
//! never modified. All containers are `im` persistent structures, so a copy
//! shares almost everything with its original and cloning is cheap.
//! Operations that produce events append them to a caller-supplied log in
//! the order they happen.
//!
//! ```
//! use ccg_rules::core::{GameState, PlayerId, RulesConfig};
//! use ccg_rules::triggers::GameEvent;
//!
//! let state = GameState::new(2, RulesConfig::default(), 42);
//! let p1 = PlayerId::new(1);
//!
//! // Drawing from an empty library is recorded, not a crash.
//! let mut events = Vec::new();
//! let next = state.draw_card(p1, &mut events);
//!
//! assert_eq!(events, vec![GameEvent::DrawFailed { player: p1 }]);
//! assert!(next.entity(next.player_entity(p1)).has(ccg_rules::core::ComponentKind::DrawFailed));
//! assert_eq!(state.life(p1), 20);
//! ```

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::action::ActionRecord;
use super::component::{Component, ComponentKind, Components, CounterKind};
use super::config::RulesConfig;
use super::entity::EntityId;
use super::player::PlayerId;
use super::rng::GameRng;
use super::store::EntityStore;
use crate::cards::{CardDefinition, Characteristics, Keyword, TokenSpec};
use crate::combat::CombatState;
use crate::rules::{GameResult, PendingLegendRuleChoice};
use crate::triggers::{GameEvent, PendingTrigger};
use crate::turn::TurnState;
use crate::zones::{ZoneId, ZoneManager};

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    player_count: usize,

    /// Rules constants for this game.
    pub config: RulesConfig,

    /// Components of every entity.
    pub store: EntityStore,

    /// Entity locations.
    pub zones: ZoneManager,

    /// Turn, step, and priority.
    pub turn: TurnState,

    /// Present only between the beginning and the end of combat.
    pub combat: Option<CombatState>,

    /// Detected triggers waiting to be put on the stack, in APNAP order.
    pub pending_triggers: Vector<PendingTrigger>,

    /// Unresolved legend rule choices.
    pub legend_choices: Vector<PendingLegendRuleChoice>,

    /// Set once the game has ended.
    pub result: Option<GameResult>,

    /// Successful actions, oldest first.
    pub history: Vector<ActionRecord>,

    /// Deterministic RNG for shuffles.
    pub rng: GameRng,
}

impl GameState {
    /// Create a new game with empty zones.
    ///
    /// Player entities take IDs `0..player_count` and start with
    /// `config.starting_life`. The game starts in turn 1's untap step with
    /// player 0 active.
    #[must_use]
    pub fn new(player_count: usize, config: RulesConfig, seed: u64) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let store = PlayerId::all(player_count).fold(EntityStore::new(player_count), |store, p| {
            store.insert_with_id(
                EntityId::player(p),
                Components::new()
                    .with(Component::Player(p))
                    .with(Component::Life(config.starting_life)),
            )
        });

        Self {
            player_count,
            store,
            zones: ZoneManager::new(player_count),
            turn: TurnState::new(player_count),
            combat: None,
            pending_triggers: Vector::new(),
            legend_choices: Vector::new(),
            result: None,
            history: Vector::new(),
            rng: GameRng::new(seed),
            config,
        }
    }

    /// Get player count (including players who have left the game).
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Players still in the game, in turn order.
    #[must_use]
    pub fn players_in_game(&self) -> &Vector<PlayerId> {
        &self.turn.player_order
    }

    #[must_use]
    pub fn is_in_game(&self, player: PlayerId) -> bool {
        self.turn.player_order.contains(&player)
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    /// Entity ID of a player.
    #[must_use]
    pub fn player_entity(&self, player: PlayerId) -> EntityId {
        assert!(player.index() < self.player_count, "{} is not in this game", player);
        EntityId::player(player)
    }

    // === Entity/component access ===

    /// Components of an entity. Panics if it does not exist.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> &Components {
        self.store.get(id)
    }

    #[must_use]
    pub fn try_entity(&self, id: EntityId) -> Option<&Components> {
        self.store.try_get(id)
    }

    #[must_use]
    pub fn exists(&self, id: EntityId) -> bool {
        self.store.contains(id)
    }

    /// Replace an entity's components with `f(components)`.
    #[must_use]
    pub fn update_entity<F>(&self, id: EntityId, f: F) -> Self
    where
        F: FnOnce(&Components) -> Components,
    {
        let mut next = self.clone();
        next.store = self.store.update_entity(id, f);
        next
    }

    #[must_use]
    pub fn add_component(&self, id: EntityId, component: Component) -> Self {
        self.update_entity(id, |c| c.with(component))
    }

    #[must_use]
    pub fn remove_component(&self, id: EntityId, kind: ComponentKind) -> Self {
        self.update_entity(id, |c| c.without(kind))
    }

    // === Zone queries ===

    #[must_use]
    pub fn zone_of(&self, id: EntityId) -> Option<ZoneId> {
        self.zones.zone_of(id)
    }

    /// Entities in a zone, bottom first.
    #[must_use]
    pub fn zone_contents(&self, zone: ZoneId) -> &Vector<EntityId> {
        self.zones.zone_contents(zone)
    }

    #[must_use]
    pub fn battlefield(&self) -> &Vector<EntityId> {
        self.zones.zone_contents(ZoneId::Battlefield)
    }

    #[must_use]
    pub fn is_on_battlefield(&self, id: EntityId) -> bool {
        self.zones.is_in_zone(id, ZoneId::Battlefield)
    }

    /// The stack, bottom first.
    #[must_use]
    pub fn stack(&self) -> &Vector<EntityId> {
        self.zones.zone_contents(ZoneId::Stack)
    }

    #[must_use]
    pub fn top_of_stack(&self) -> Option<EntityId> {
        self.zones.top_of(ZoneId::Stack)
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &Vector<EntityId> {
        self.zones.zone_contents(ZoneId::Hand(player))
    }

    #[must_use]
    pub fn library_size(&self, player: PlayerId) -> usize {
        self.zones.size(ZoneId::Library(player))
    }

    // === Ownership and characteristics ===

    /// Owner of an object; players own themselves.
    #[must_use]
    pub fn owner_of(&self, id: EntityId) -> Option<PlayerId> {
        let components = self.try_entity(id)?;
        components.player().or_else(|| components.owner())
    }

    /// Controller of an object.
    ///
    /// Permanents use their `Controller` component, stack objects their
    /// stack item, and anything else falls back to its owner.
    #[must_use]
    pub fn controller_of(&self, id: EntityId) -> Option<PlayerId> {
        let components = self.try_entity(id)?;
        components
            .controller()
            .or_else(|| components.stack_item().map(|item| item.controller))
            .or_else(|| components.player())
            .or_else(|| components.owner())
    }

    #[must_use]
    pub fn characteristics(&self, id: EntityId) -> Option<&Characteristics> {
        self.try_entity(id)?.characteristics()
    }

    #[must_use]
    pub fn is_creature(&self, id: EntityId) -> bool {
        self.characteristics(id).is_some_and(Characteristics::is_creature)
    }

    #[must_use]
    pub fn has_keyword(&self, id: EntityId, keyword: Keyword) -> bool {
        self.characteristics(id).is_some_and(|c| c.has_keyword(keyword))
    }

    /// Power including +1/+1 and -1/-1 counters.
    #[must_use]
    pub fn power(&self, id: EntityId) -> Option<i64> {
        let components = self.try_entity(id)?;
        let base = components.power_toughness()?.power;
        Some(base + counter_modifier(components))
    }

    /// Toughness including +1/+1 and -1/-1 counters.
    #[must_use]
    pub fn toughness(&self, id: EntityId) -> Option<i64> {
        let components = self.try_entity(id)?;
        let base = components.power_toughness()?.toughness;
        Some(base + counter_modifier(components))
    }

    /// Permanents a player controls, in battlefield order.
    #[must_use]
    pub fn permanents_controlled_by(&self, player: PlayerId) -> Vec<EntityId> {
        self.battlefield()
            .iter()
            .copied()
            .filter(|id| self.controller_of(*id) == Some(player))
            .collect()
    }

    /// Creatures a player controls, in battlefield order.
    #[must_use]
    pub fn creatures_controlled_by(&self, player: PlayerId) -> Vec<EntityId> {
        self.permanents_controlled_by(player)
            .into_iter()
            .filter(|id| self.is_creature(*id))
            .collect()
    }

    // === Player queries ===

    #[must_use]
    pub fn life(&self, player: PlayerId) -> i64 {
        self.entity(self.player_entity(player)).life().unwrap_or(0)
    }

    #[must_use]
    pub fn poison(&self, player: PlayerId) -> u32 {
        self.entity(self.player_entity(player))
            .counters()
            .get(CounterKind::Poison)
    }

    #[must_use]
    pub fn has_lost(&self, player: PlayerId) -> bool {
        self.entity(self.player_entity(player)).lost().is_some()
    }

    // === Object creation ===

    /// Create a card entity from its definition directly in a zone.
    ///
    /// Game setup helper: emits no events. A card created on the battlefield
    /// is controlled by its owner and is not summoning sick.
    #[must_use]
    pub fn create_card(
        &self,
        def: &CardDefinition,
        owner: PlayerId,
        zone: ZoneId,
    ) -> (EntityId, Self) {
        let mut components = Components::new()
            .with(Component::Card(def.id))
            .with(Component::Characteristics(def.characteristics.clone()))
            .with(Component::Owner(owner));
        if let Some(pt) = def.power_toughness {
            components = components.with(Component::PowerToughness(pt));
        }
        if let Some(rule) = &def.attachment {
            components = components.with(Component::Attachment(rule.clone()));
        }
        if zone == ZoneId::Battlefield {
            components = components.with(Component::Controller(owner));
        }

        let mut next = self.clone();
        let (id, store) = self.store.create_entity(components);
        next.store = store;
        next.zones = self.zones.add_to_zone(id, zone);
        (id, next)
    }

    /// Create a token on the battlefield.
    #[must_use]
    pub fn create_token(
        &self,
        spec: &TokenSpec,
        controller: PlayerId,
        events: &mut Vec<GameEvent>,
    ) -> (EntityId, Self) {
        let mut components = Components::new()
            .with(Component::Token)
            .with(Component::Characteristics(spec.characteristics.clone()))
            .with(Component::Owner(controller))
            .with(Component::Controller(controller));
        if let Some(pt) = spec.power_toughness {
            components = components.with(Component::PowerToughness(pt));
        }
        if let Some(card) = spec.card {
            components = components.with(Component::Card(card));
        }
        if spec.characteristics.is_creature() {
            components = components.with(Component::SummoningSick);
        }

        let mut next = self.clone();
        let (id, store) = self.store.create_entity(components);
        next.store = store;
        next.zones = self.zones.add_to_zone(id, ZoneId::Battlefield);

        events.push(GameEvent::TokenCreated { entity: id, controller });
        events.push(GameEvent::ZoneChanged {
            entity: id,
            from: None,
            to: ZoneId::Battlefield,
            controller: Some(controller),
            card: spec.card,
        });
        (id, next)
    }

    // === Zone changes ===

    /// Move an object to the top of another zone.
    ///
    /// A permanent leaving the battlefield loses every permanent-only
    /// component and a stack object leaving the stack loses its stack data,
    /// so the object arrives as a new object. Arriving on the battlefield
    /// makes the owner its controller; see
    /// [`put_onto_battlefield`](Self::put_onto_battlefield) for anything else.
    #[must_use]
    pub fn move_to_zone(&self, id: EntityId, to: ZoneId, events: &mut Vec<GameEvent>) -> Self {
        let controller = self.owner_of(id);
        self.move_under(id, to, controller, events)
    }

    /// Move an object onto the battlefield under `controller`.
    #[must_use]
    pub fn put_onto_battlefield(
        &self,
        id: EntityId,
        controller: PlayerId,
        events: &mut Vec<GameEvent>,
    ) -> Self {
        self.move_under(id, ZoneId::Battlefield, Some(controller), events)
    }

    /// Move an object to its owner's graveyard.
    #[must_use]
    pub fn move_to_graveyard(&self, id: EntityId, events: &mut Vec<GameEvent>) -> Self {
        let owner = match self.owner_of(id) {
            Some(owner) => owner,
            None => panic!("{} has no owner", id),
        };
        let next = self.move_to_zone(id, ZoneId::Graveyard(owner), events);
        events.push(GameEvent::MovedToGraveyard { entity: id, owner });
        next
    }

    fn move_under(
        &self,
        id: EntityId,
        to: ZoneId,
        new_controller: Option<PlayerId>,
        events: &mut Vec<GameEvent>,
    ) -> Self {
        let from = match self.zone_of(id) {
            Some(zone) => zone,
            None => panic!("{} is not in any zone", id),
        };
        let before = self.entity(id);
        let old_controller = self.controller_of(id);
        let card = before.card();
        let was_creature = before.characteristics().is_some_and(Characteristics::is_creature);

        let mut components = before.clone();
        if from == ZoneId::Battlefield {
            for kind in ComponentKind::PERMANENT_STATUS {
                components = components.without(kind);
            }
        }
        if from == ZoneId::Stack {
            components = components.without(ComponentKind::OnStack);
        }
        if to == ZoneId::Battlefield {
            if let Some(controller) = new_controller {
                components = components.with(Component::Controller(controller));
            }
        }

        let mut next = self.clone();
        next.store = self.store.update_entity(id, |_| components);
        next.zones = self.zones.move_entity(id, from, to);

        trace!(entity = %id, %from, %to, "zone change");

        let controller = if to == ZoneId::Battlefield {
            new_controller
        } else {
            old_controller
        };
        events.push(GameEvent::ZoneChanged {
            entity: id,
            from: Some(from),
            to,
            controller,
            card,
        });
        if let (ZoneId::Battlefield, ZoneId::Graveyard(owner), true) = (from, to, was_creature) {
            if let Some(controller) = old_controller {
                events.push(GameEvent::Died { entity: id, controller, owner, card });
            }
        }
        next
    }

    /// Remove an object from its zone and from the store.
    #[must_use]
    pub fn cease_to_exist(&self, id: EntityId, events: &mut Vec<GameEvent>) -> Self {
        let mut next = self.clone();
        if let Some(zone) = self.zone_of(id) {
            next.zones = self.zones.remove_from_zone(id, zone);
        }
        next.store = self.store.destroy_entity(id);
        events.push(GameEvent::CeasedToExist { entity: id });
        next
    }

    /// Draw the top card of a player's library.
    ///
    /// With an empty library the player is marked `DrawFailed`; the
    /// state-based action check turns that into a loss.
    #[must_use]
    pub fn draw_card(&self, player: PlayerId, events: &mut Vec<GameEvent>) -> Self {
        match self.zones.top_of(ZoneId::Library(player)) {
            Some(card) => {
                let mut next = self.clone();
                next.zones = self
                    .zones
                    .move_entity(card, ZoneId::Library(player), ZoneId::Hand(player));
                events.push(GameEvent::CardDrawn { player, entity: card });
                next
            }
            None => {
                events.push(GameEvent::DrawFailed { player });
                self.add_component(self.player_entity(player), Component::DrawFailed)
            }
        }
    }

    /// Shuffle a player's library with the game RNG.
    #[must_use]
    pub fn shuffle_library(&self, player: PlayerId) -> Self {
        let mut next = self.clone();
        next.zones = self.zones.shuffle(ZoneId::Library(player), &mut next.rng);
        next
    }

    // === Damage, life, counters ===

    /// Deal damage from `source` to a player or permanent.
    ///
    /// Damage to a player reduces life; damage to a permanent is marked on
    /// it. Damage from a deathtouch source also marks a creature as
    /// deathtouched. Zero damage is not dealt at all.
    #[must_use]
    pub fn deal_damage(
        &self,
        source: EntityId,
        target: EntityId,
        amount: u32,
        combat: bool,
        events: &mut Vec<GameEvent>,
    ) -> Self {
        if amount == 0 {
            return self.clone();
        }

        let target_components = self.entity(target);
        let next = if target_components.player().is_some() {
            let life = target_components.life().unwrap_or(0);
            self.add_component(target, Component::Life(life - i64::from(amount)))
        } else {
            let marked = target_components.damage() + amount;
            let deathtouch = self.has_keyword(source, Keyword::Deathtouch) && self.is_creature(target);
            self.update_entity(target, |c| {
                let c = c.with(Component::Damage(marked));
                if deathtouch {
                    c.with(Component::Deathtouched)
                } else {
                    c
                }
            })
        };

        events.push(GameEvent::DamageDealt { source, target, amount, combat });
        next
    }

    #[must_use]
    pub fn gain_life(&self, player: PlayerId, amount: u32, events: &mut Vec<GameEvent>) -> Self {
        let id = self.player_entity(player);
        let life = self.life(player) + i64::from(amount);
        events.push(GameEvent::LifeGained { player, amount });
        self.add_component(id, Component::Life(life))
    }

    #[must_use]
    pub fn lose_life(&self, player: PlayerId, amount: u32, events: &mut Vec<GameEvent>) -> Self {
        let id = self.player_entity(player);
        let life = self.life(player) - i64::from(amount);
        events.push(GameEvent::LifeLost { player, amount });
        self.add_component(id, Component::Life(life))
    }

    /// Put counters on a permanent or player.
    #[must_use]
    pub fn add_counters(
        &self,
        id: EntityId,
        kind: CounterKind,
        amount: u32,
        events: &mut Vec<GameEvent>,
    ) -> Self {
        if amount == 0 {
            return self.clone();
        }
        events.push(GameEvent::CountersAdded { entity: id, kind, amount });
        self.update_entity(id, |c| c.with(Component::Counters(c.counters().add(kind, amount))))
    }

    #[must_use]
    pub fn tap(&self, id: EntityId) -> Self {
        self.add_component(id, Component::Tapped)
    }

    #[must_use]
    pub fn untap(&self, id: EntityId) -> Self {
        self.remove_component(id, ComponentKind::Tapped)
    }

    /// Attach `attachment` to `target`, replacing any previous attachment.
    #[must_use]
    pub fn attach(
        &self,
        attachment: EntityId,
        target: EntityId,
        events: &mut Vec<GameEvent>,
    ) -> Self {
        events.push(GameEvent::Attached { attachment, target });
        self.add_component(attachment, Component::AttachedTo(target))
    }
}

fn counter_modifier(components: &Components) -> i64 {
    let counters = components.counters();
    i64::from(counters.get(CounterKind::PlusOne)) - i64::from(counters.get(CounterKind::MinusOne))
}
