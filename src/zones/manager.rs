//! Zone manager for entity locations and movement.
//!
//! The `ZoneManager` tracks where every zoned entity is and keeps each zone
//! in order. Like the entity store, it is a persistent value: every
//! operation returns a new manager.
//!
//! ## Ordering
//!
//! Every zone is an ordered list with index 0 at the bottom and the last
//! element on top. Order matters for the library and the stack; the
//! battlefield keeps arrival order, which gives deterministic iteration.
//!
//! ## Contract
//!
//! The following are caller bugs and panic:
//! - using a zone that was never created (e.g. a library for a player
//!   outside the game)
//! - adding an entity that is already in a zone
//! - removing or moving an entity from a zone it is not in

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use crate::core::{EntityId, GameRng, PlayerId};

/// Identifies a zone.
///
/// Library, hand and graveyard are per player; the rest are shared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ZoneId {
    Library(PlayerId),
    Hand(PlayerId),
    Graveyard(PlayerId),
    Battlefield,
    Stack,
    Exile,
}

impl ZoneId {
    /// The player a per-player zone belongs to.
    #[must_use]
    pub const fn owner(self) -> Option<PlayerId> {
        match self {
            ZoneId::Library(p) | ZoneId::Hand(p) | ZoneId::Graveyard(p) => Some(p),
            ZoneId::Battlefield | ZoneId::Stack | ZoneId::Exile => None,
        }
    }

    /// Hidden zones: contents are not public information.
    #[must_use]
    pub const fn is_hidden(self) -> bool {
        matches!(self, ZoneId::Library(_) | ZoneId::Hand(_))
    }

    /// Every zone of a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = ZoneId> {
        PlayerId::all(player_count)
            .flat_map(|p| [ZoneId::Library(p), ZoneId::Hand(p), ZoneId::Graveyard(p)])
            .chain([ZoneId::Battlefield, ZoneId::Stack, ZoneId::Exile])
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneId::Library(p) => write!(f, "Library({})", p.0),
            ZoneId::Hand(p) => write!(f, "Hand({})", p.0),
            ZoneId::Graveyard(p) => write!(f, "Graveyard({})", p.0),
            ZoneId::Battlefield => write!(f, "Battlefield"),
            ZoneId::Stack => write!(f, "Stack"),
            ZoneId::Exile => write!(f, "Exile"),
        }
    }
}

/// Manages entity locations across zones.
///
/// ## Usage
///
/// ```
/// use ccg_rules::core::{EntityId, PlayerId};
/// use ccg_rules::zones::{ZoneId, ZoneManager};
///
/// let p0 = PlayerId::new(0);
/// let zones = ZoneManager::new(2)
///     .add_to_zone(EntityId(10), ZoneId::Library(p0))
///     .add_to_zone_bottom(EntityId(11), ZoneId::Library(p0));
///
/// assert_eq!(zones.top_of(ZoneId::Library(p0)), Some(EntityId(10)));
///
/// let zones = zones.move_entity(EntityId(10), ZoneId::Library(p0), ZoneId::Hand(p0));
/// assert_eq!(zones.zone_of(EntityId(10)), Some(ZoneId::Hand(p0)));
/// assert_eq!(zones.size(ZoneId::Library(p0)), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneManager {
    /// Zone contents, index 0 = bottom.
    zones: OrdMap<ZoneId, Vector<EntityId>>,

    /// Entity locations: entity_id -> zone_id
    locations: OrdMap<EntityId, ZoneId>,
}

impl ZoneManager {
    /// Create empty zones for a game with `player_count` players.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            zones: ZoneId::all(player_count).map(|z| (z, Vector::new())).collect(),
            locations: OrdMap::new(),
        }
    }

    fn contents(&self, zone: ZoneId) -> &Vector<EntityId> {
        match self.zones.get(&zone) {
            Some(contents) => contents,
            None => panic!("Zone {} does not exist", zone),
        }
    }

    fn insert(&self, entity: EntityId, zone: ZoneId, on_top: bool) -> Self {
        if let Some(current) = self.locations.get(&entity) {
            panic!("Entity {} already exists in zone {}", entity, current);
        }

        let mut contents = self.contents(zone).clone();
        if on_top {
            contents.push_back(entity);
        } else {
            contents.push_front(entity);
        }

        Self {
            zones: self.zones.update(zone, contents),
            locations: self.locations.update(entity, zone),
        }
    }

    /// Put an entity on top of a zone.
    #[must_use]
    pub fn add_to_zone(&self, entity: EntityId, zone: ZoneId) -> Self {
        self.insert(entity, zone, true)
    }

    /// Put an entity at the bottom of a zone.
    #[must_use]
    pub fn add_to_zone_bottom(&self, entity: EntityId, zone: ZoneId) -> Self {
        self.insert(entity, zone, false)
    }

    /// Take an entity out of the zone it is in.
    #[must_use]
    pub fn remove_from_zone(&self, entity: EntityId, zone: ZoneId) -> Self {
        match self.locations.get(&entity) {
            Some(current) if *current == zone => {}
            Some(current) => panic!("Entity {} is in {}, not {}", entity, current, zone),
            None => panic!("Entity {} is not in any zone", entity),
        }

        let contents: Vector<EntityId> = self
            .contents(zone)
            .iter()
            .copied()
            .filter(|e| *e != entity)
            .collect();

        Self {
            zones: self.zones.update(zone, contents),
            locations: self.locations.without(&entity),
        }
    }

    /// Move an entity from `from` to the top of `to`.
    ///
    /// Remove-then-add; no intermediate state is observable.
    #[must_use]
    pub fn move_entity(&self, entity: EntityId, from: ZoneId, to: ZoneId) -> Self {
        self.remove_from_zone(entity, from).add_to_zone(entity, to)
    }

    /// Shuffle a zone's contents.
    #[must_use]
    pub fn shuffle(&self, zone: ZoneId, rng: &mut GameRng) -> Self {
        let mut order: Vec<EntityId> = self.contents(zone).iter().copied().collect();
        rng.shuffle(&mut order);
        Self {
            zones: self.zones.update(zone, order.into_iter().collect()),
            locations: self.locations.clone(),
        }
    }

    // === Queries ===

    /// Get the zone an entity is in.
    #[must_use]
    pub fn zone_of(&self, entity: EntityId) -> Option<ZoneId> {
        self.locations.get(&entity).copied()
    }

    /// Check if an entity is in a specific zone.
    #[must_use]
    pub fn is_in_zone(&self, entity: EntityId, zone: ZoneId) -> bool {
        self.locations.get(&entity) == Some(&zone)
    }

    /// Entities in a zone, bottom first.
    #[must_use]
    pub fn zone_contents(&self, zone: ZoneId) -> &Vector<EntityId> {
        self.contents(zone)
    }

    /// Top entity of a zone.
    #[must_use]
    pub fn top_of(&self, zone: ZoneId) -> Option<EntityId> {
        self.contents(zone).last().copied()
    }

    /// Number of entities in a zone.
    #[must_use]
    pub fn size(&self, zone: ZoneId) -> usize {
        self.contents(zone).len()
    }

    /// Check if a zone exists in this game.
    #[must_use]
    pub fn has_zone(&self, zone: ZoneId) -> bool {
        self.zones.contains_key(&zone)
    }
}
