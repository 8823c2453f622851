//! Entity/component store.
//!
//! Keyed storage of heterogeneous component data. Every operation takes the
//! store by reference and returns a new store; the old value stays valid and
//! shares structure with the new one, so states can be branched and compared
//! cheaply.
//!
//! Touching an entity that does not exist is a caller bug and panics.
//! Use [`EntityStore::contains`] first when existence is uncertain.
//!
//! ```
//! use ccg_rules::core::{Component, Components, EntityStore, PlayerId};
//!
//! let store = EntityStore::new(2);
//! let (id, store2) = store.create_entity(
//!     Components::new().with(Component::Owner(PlayerId::new(0))),
//! );
//!
//! assert!(!store.contains(id));
//! assert!(store2.contains(id));
//!
//! let store3 = store2.add_component(id, Component::Tapped);
//! assert!(store3.get(id).is_tapped());
//! assert!(!store2.get(id).is_tapped());
//! ```

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::component::{Component, ComponentKind, Components};
use super::entity::EntityId;

/// Persistent map from entity to its components.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStore {
    entities: OrdMap<EntityId, Components>,
    next_id: u32,
}

impl EntityStore {
    /// Create an empty store whose allocator skips the player ID range.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            entities: OrdMap::new(),
            next_id: EntityId::first_non_player(player_count),
        }
    }

    /// Allocate a fresh entity with the given components.
    #[must_use]
    pub fn create_entity(&self, components: Components) -> (EntityId, Self) {
        let id = EntityId(self.next_id);
        let store = Self {
            entities: self.entities.update(id, components),
            next_id: self.next_id + 1,
        };
        (id, store)
    }

    /// Insert an entity under a reserved ID (players).
    ///
    /// Panics if the ID is already in use.
    #[must_use]
    pub fn insert_with_id(&self, id: EntityId, components: Components) -> Self {
        assert!(
            !self.entities.contains_key(&id),
            "Entity {} already exists",
            id
        );
        Self {
            entities: self.entities.update(id, components),
            next_id: self.next_id.max(id.0 + 1),
        }
    }

    /// Replace an entity's components with `f(components)`.
    #[must_use]
    pub fn update_entity<F>(&self, id: EntityId, f: F) -> Self
    where
        F: FnOnce(&Components) -> Components,
    {
        let updated = f(self.get(id));
        Self {
            entities: self.entities.update(id, updated),
            next_id: self.next_id,
        }
    }

    /// Set a component, replacing any existing one of the same kind.
    #[must_use]
    pub fn add_component(&self, id: EntityId, component: Component) -> Self {
        self.update_entity(id, |c| c.with(component))
    }

    /// Remove the component of `kind`, if present.
    #[must_use]
    pub fn remove_component(&self, id: EntityId, kind: ComponentKind) -> Self {
        self.update_entity(id, |c| c.without(kind))
    }

    /// Remove the entity and all of its components.
    #[must_use]
    pub fn destroy_entity(&self, id: EntityId) -> Self {
        assert!(self.contains(id), "Entity {} does not exist", id);
        Self {
            entities: self.entities.without(&id),
            next_id: self.next_id,
        }
    }

    /// Components of an entity. Panics if it does not exist.
    #[must_use]
    pub fn get(&self, id: EntityId) -> &Components {
        match self.entities.get(&id) {
            Some(components) => components,
            None => panic!("Entity {} does not exist", id),
        }
    }

    /// Components of an entity, or `None`.
    #[must_use]
    pub fn try_get(&self, id: EntityId) -> Option<&Components> {
        self.entities.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over entities in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Components)> {
        self.entities.iter().map(|(id, c)| (*id, c))
    }
}
