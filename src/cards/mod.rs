//! Card system: definitions and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Static card data and abilities
//! - `Characteristics`: Name, types, supertypes, keywords
//! - `CardRegistry`: Card definition lookup, and the trigger registry
//!
//! Per-game state (zone, damage, counters, controller) is not part of a
//! definition. It lives in the entity's components.

pub mod definition;
pub mod registry;

pub use definition::{
    ActivatedAbility, AttachmentRule, CardDefinition, CardId, CardType, Characteristics, Keyword,
    PowerToughness, SpellAbility, Supertype, TokenSpec,
};
pub use registry::CardRegistry;
