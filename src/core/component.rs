//! Components: typed data attached to entities.
//!
//! `Component` is a closed sum type; each variant has a matching
//! `ComponentKind`, and an entity holds at most one component per kind.
//! The `Components` container is a persistent map, so `with`/`without`
//! return a new container that shares structure with the old one.
//!
//! ```
//! use ccg_rules::core::{Component, ComponentKind, Components, PlayerId};
//!
//! let base = Components::new().with(Component::Controller(PlayerId::new(0)));
//! let tapped = base.with(Component::Tapped);
//!
//! assert!(!base.has(ComponentKind::Tapped));
//! assert!(tapped.is_tapped());
//! assert_eq!(tapped.controller(), Some(PlayerId::new(0)));
//! ```

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::player::PlayerId;
use crate::cards::{AttachmentRule, CardId, Characteristics, PowerToughness};
use crate::stack::StackItem;

/// Why a player lost the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossReason {
    /// Life total is 0 or less.
    ZeroLife,
    /// Poison counters reached the configured limit.
    Poison,
    /// Attempted to draw from an empty library.
    DrewFromEmptyLibrary,
}

/// Kinds of counters that can sit on permanents or players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CounterKind {
    /// +1/+1 counter.
    PlusOne,
    /// -1/-1 counter.
    MinusOne,
    /// Poison counter (players).
    Poison,
    Charge,
    Loyalty,
}

/// Counter totals by kind. Kinds with zero counters are not stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters(OrdMap<CounterKind, u32>);

impl Counters {
    /// Empty counter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of counters of a kind.
    #[must_use]
    pub fn get(&self, kind: CounterKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Add `amount` counters of a kind.
    #[must_use]
    pub fn add(&self, kind: CounterKind, amount: u32) -> Self {
        if amount == 0 {
            return self.clone();
        }
        Self(self.0.update(kind, self.get(kind) + amount))
    }

    /// Remove up to `amount` counters of a kind.
    #[must_use]
    pub fn remove(&self, kind: CounterKind, amount: u32) -> Self {
        let remaining = self.get(kind).saturating_sub(amount);
        if remaining == 0 {
            Self(self.0.without(&kind))
        } else {
            Self(self.0.update(kind, remaining))
        }
    }

    /// Check if no counters are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (kind, count) pairs in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (CounterKind, u32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

/// Discriminant of a [`Component`]; the key of the component map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Player,
    Life,
    Lost,
    DrawFailed,
    Card,
    Characteristics,
    PowerToughness,
    Owner,
    Controller,
    Tapped,
    SummoningSick,
    Damage,
    Deathtouched,
    Counters,
    AttachedTo,
    Attachment,
    Token,
    OnStack,
    Attacking,
    Blocking,
    BlockedBy,
}

impl ComponentKind {
    /// Components that only make sense while the object is a permanent.
    ///
    /// Stripped whenever an entity leaves the battlefield.
    pub const PERMANENT_STATUS: [ComponentKind; 10] = [
        ComponentKind::Tapped,
        ComponentKind::SummoningSick,
        ComponentKind::Damage,
        ComponentKind::Deathtouched,
        ComponentKind::Counters,
        ComponentKind::AttachedTo,
        ComponentKind::Attacking,
        ComponentKind::Blocking,
        ComponentKind::BlockedBy,
        ComponentKind::Controller,
    ];

    /// Components written by the combat controller.
    pub const COMBAT_ROLES: [ComponentKind; 3] = [
        ComponentKind::Attacking,
        ComponentKind::Blocking,
        ComponentKind::BlockedBy,
    ];
}

/// A typed piece of entity data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Component {
    /// Marks the entity as a player.
    Player(PlayerId),
    /// Player life total.
    Life(i64),
    /// The player has lost the game.
    Lost(LossReason),
    /// The player attempted to draw from an empty library.
    DrawFailed,

    /// Card identity for ability lookups.
    Card(CardId),
    /// Name, types, supertypes, keywords.
    Characteristics(Characteristics),
    /// Printed power and toughness.
    PowerToughness(PowerToughness),
    Owner(PlayerId),
    Controller(PlayerId),

    Tapped,
    SummoningSick,
    /// Damage marked this turn.
    Damage(u32),
    /// Damaged by a source with deathtouch since the last cleanup.
    Deathtouched,
    Counters(Counters),

    /// This permanent is attached to another entity.
    AttachedTo(EntityId),
    /// This permanent is an Aura or Equipment.
    Attachment(AttachmentRule),
    Token,

    /// Spell or ability data while the object is on the stack.
    OnStack(StackItem),

    /// Attacking the given player.
    Attacking(PlayerId),
    /// Blocking the given attacker.
    Blocking(EntityId),
    /// Blockers of this attacker, in damage assignment order.
    BlockedBy(Vector<EntityId>),
}

impl Component {
    /// The kind of this component.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Player(_) => ComponentKind::Player,
            Component::Life(_) => ComponentKind::Life,
            Component::Lost(_) => ComponentKind::Lost,
            Component::DrawFailed => ComponentKind::DrawFailed,
            Component::Card(_) => ComponentKind::Card,
            Component::Characteristics(_) => ComponentKind::Characteristics,
            Component::PowerToughness(_) => ComponentKind::PowerToughness,
            Component::Owner(_) => ComponentKind::Owner,
            Component::Controller(_) => ComponentKind::Controller,
            Component::Tapped => ComponentKind::Tapped,
            Component::SummoningSick => ComponentKind::SummoningSick,
            Component::Damage(_) => ComponentKind::Damage,
            Component::Deathtouched => ComponentKind::Deathtouched,
            Component::Counters(_) => ComponentKind::Counters,
            Component::AttachedTo(_) => ComponentKind::AttachedTo,
            Component::Attachment(_) => ComponentKind::Attachment,
            Component::Token => ComponentKind::Token,
            Component::OnStack(_) => ComponentKind::OnStack,
            Component::Attacking(_) => ComponentKind::Attacking,
            Component::Blocking(_) => ComponentKind::Blocking,
            Component::BlockedBy(_) => ComponentKind::BlockedBy,
        }
    }
}

/// Immutable component container for one entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Components(OrdMap<ComponentKind, Component>);

impl Components {
    /// Empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A container with `component` set, replacing any value of the same kind.
    #[must_use]
    pub fn with(&self, component: Component) -> Self {
        Self(self.0.update(component.kind(), component))
    }

    /// A container without any component of `kind`.
    #[must_use]
    pub fn without(&self, kind: ComponentKind) -> Self {
        Self(self.0.without(&kind))
    }

    /// Get the component of a kind.
    #[must_use]
    pub fn get(&self, kind: ComponentKind) -> Option<&Component> {
        self.0.get(&kind)
    }

    /// Check if a component of `kind` is present.
    #[must_use]
    pub fn has(&self, kind: ComponentKind) -> bool {
        self.0.contains_key(&kind)
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the container is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over components in kind order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.0.values()
    }

    // === Typed accessors ===

    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self.get(ComponentKind::Player) {
            Some(Component::Player(p)) => Some(*p),
            _ => None,
        }
    }

    #[must_use]
    pub fn life(&self) -> Option<i64> {
        match self.get(ComponentKind::Life) {
            Some(Component::Life(life)) => Some(*life),
            _ => None,
        }
    }

    #[must_use]
    pub fn lost(&self) -> Option<LossReason> {
        match self.get(ComponentKind::Lost) {
            Some(Component::Lost(reason)) => Some(*reason),
            _ => None,
        }
    }

    #[must_use]
    pub fn card(&self) -> Option<CardId> {
        match self.get(ComponentKind::Card) {
            Some(Component::Card(id)) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn characteristics(&self) -> Option<&Characteristics> {
        match self.get(ComponentKind::Characteristics) {
            Some(Component::Characteristics(c)) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn power_toughness(&self) -> Option<PowerToughness> {
        match self.get(ComponentKind::PowerToughness) {
            Some(Component::PowerToughness(pt)) => Some(*pt),
            _ => None,
        }
    }

    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        match self.get(ComponentKind::Owner) {
            Some(Component::Owner(p)) => Some(*p),
            _ => None,
        }
    }

    #[must_use]
    pub fn controller(&self) -> Option<PlayerId> {
        match self.get(ComponentKind::Controller) {
            Some(Component::Controller(p)) => Some(*p),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_tapped(&self) -> bool {
        self.has(ComponentKind::Tapped)
    }

    #[must_use]
    pub fn is_summoning_sick(&self) -> bool {
        self.has(ComponentKind::SummoningSick)
    }

    #[must_use]
    pub fn is_token(&self) -> bool {
        self.has(ComponentKind::Token)
    }

    /// Damage marked, 0 when none.
    #[must_use]
    pub fn damage(&self) -> u32 {
        match self.get(ComponentKind::Damage) {
            Some(Component::Damage(d)) => *d,
            _ => 0,
        }
    }

    /// Counters, empty when none.
    #[must_use]
    pub fn counters(&self) -> Counters {
        match self.get(ComponentKind::Counters) {
            Some(Component::Counters(c)) => c.clone(),
            _ => Counters::new(),
        }
    }

    #[must_use]
    pub fn attached_to(&self) -> Option<EntityId> {
        match self.get(ComponentKind::AttachedTo) {
            Some(Component::AttachedTo(id)) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn attachment(&self) -> Option<&AttachmentRule> {
        match self.get(ComponentKind::Attachment) {
            Some(Component::Attachment(rule)) => Some(rule),
            _ => None,
        }
    }

    #[must_use]
    pub fn stack_item(&self) -> Option<&StackItem> {
        match self.get(ComponentKind::OnStack) {
            Some(Component::OnStack(item)) => Some(item),
            _ => None,
        }
    }

    #[must_use]
    pub fn attacking(&self) -> Option<PlayerId> {
        match self.get(ComponentKind::Attacking) {
            Some(Component::Attacking(p)) => Some(*p),
            _ => None,
        }
    }

    #[must_use]
    pub fn blocking(&self) -> Option<EntityId> {
        match self.get(ComponentKind::Blocking) {
            Some(Component::Blocking(id)) => Some(*id),
            _ => None,
        }
    }

    /// Blockers of this attacker; `None` if it was never blocked.
    #[must_use]
    pub fn blocked_by(&self) -> Option<&Vector<EntityId>> {
        match self.get(ComponentKind::BlockedBy) {
            Some(Component::BlockedBy(ids)) => Some(ids),
            _ => None,
        }
    }
}

impl FromIterator<Component> for Components {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Components::new(), |acc, component| acc.with(component))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_replaces_same_kind() {
        let c = Components::new()
            .with(Component::Damage(2))
            .with(Component::Damage(5));

        assert_eq!(c.len(), 1);
        assert_eq!(c.damage(), 5);
    }

    #[test]
    fn test_with_leaves_original_untouched() {
        let original = Components::new().with(Component::Life(20));
        let changed = original.with(Component::Life(3));

        assert_eq!(original.life(), Some(20));
        assert_eq!(changed.life(), Some(3));
    }

    #[test]
    fn test_without() {
        let c = Components::new()
            .with(Component::Tapped)
            .with(Component::Token);
        let untapped = c.without(ComponentKind::Tapped);

        assert!(c.is_tapped());
        assert!(!untapped.is_tapped());
        assert!(untapped.is_token());
    }

    #[test]
    fn test_kind_matches_variant() {
        let comps = [
            Component::Player(PlayerId::new(0)),
            Component::DrawFailed,
            Component::Owner(PlayerId::new(1)),
            Component::Blocking(EntityId(4)),
            Component::BlockedBy(Vector::new()),
        ];
        let kinds: Vec<_> = comps.iter().map(Component::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ComponentKind::Player,
                ComponentKind::DrawFailed,
                ComponentKind::Owner,
                ComponentKind::Blocking,
                ComponentKind::BlockedBy,
            ]
        );
    }

    #[test]
    fn test_defaults_for_missing_numbers() {
        let c = Components::new();
        assert_eq!(c.damage(), 0);
        assert!(c.counters().is_empty());
        assert_eq!(c.controller(), None);
    }

    #[test]
    fn test_counters_add_remove() {
        let counters = Counters::new()
            .add(CounterKind::PlusOne, 3)
            .add(CounterKind::MinusOne, 1);

        assert_eq!(counters.get(CounterKind::PlusOne), 3);

        let reduced = counters.remove(CounterKind::PlusOne, 5);
        assert_eq!(reduced.get(CounterKind::PlusOne), 0);
        assert_eq!(reduced.iter().count(), 1);
    }

    #[test]
    fn test_from_iterator() {
        let c: Components = vec![Component::Tapped, Component::Damage(1)].into_iter().collect();
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_serialization() {
        let c = Components::new()
            .with(Component::Controller(PlayerId::new(1)))
            .with(Component::Counters(Counters::new().add(CounterKind::Poison, 2)));
        let json = serde_json::to_string(&c).unwrap();
        let restored: Components = serde_json::from_str(&json).unwrap();
        assert_eq!(c, restored);
    }
}
