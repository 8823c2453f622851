//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores all card definitions for a game. The rules
//! core looks up spell abilities, activated abilities, and triggered
//! abilities through it by `CardId`.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId, CardType};
use crate::triggers::{AbilityRegistry, TriggeredAbilityDeclaration};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use ccg_rules::cards::{CardDefinition, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::creature(CardId::new(1), "Grizzly Bears", 2, 2));
///
/// let found = registry.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name(), "Grizzly Bears");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {} already registered", card.id);
        }
        self.cards.insert(card.id, card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Find cards of a type.
    pub fn find_by_type(&self, card_type: CardType) -> impl Iterator<Item = &CardDefinition> {
        self.cards
            .values()
            .filter(move |c| c.characteristics.is(card_type))
    }
}

impl AbilityRegistry for CardRegistry {
    fn triggered_abilities(&self, card: CardId) -> &[TriggeredAbilityDeclaration] {
        self.cards.get(&card).map_or(&[], |def| def.triggered.as_slice())
    }
}

impl FromIterator<CardDefinition> for CardRegistry {
    fn from_iter<I: IntoIterator<Item = CardDefinition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for card in iter {
            registry.register(card);
        }
        registry
    }
}
