//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: its
//! characteristics, printed power/toughness, and the abilities the content
//! layer attached to it. Per-game state (damage, counters, zone) lives in
//! the entity's components instead.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use crate::effects::{Effect, TargetFilter, TargetSpec};
use crate::triggers::TriggeredAbilityDeclaration;

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Lightning Bolt"),
/// not a specific instance in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardType {
    Artifact,
    Creature,
    Enchantment,
    Instant,
    Land,
    Planeswalker,
    Sorcery,
}

impl CardType {
    /// Permanent types enter the battlefield when they resolve.
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        !matches!(self, CardType::Instant | CardType::Sorcery)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Supertype {
    Basic,
    Legendary,
}

/// Keyword abilities the rules core itself understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Flying,
    Reach,
    FirstStrike,
    DoubleStrike,
    Haste,
    Vigilance,
    Defender,
    Deathtouch,
    Flash,
}

/// Name, types, supertypes, and keywords of an object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristics {
    pub name: String,
    pub types: OrdSet<CardType>,
    pub supertypes: OrdSet<Supertype>,
    pub keywords: OrdSet<Keyword>,
}

impl Characteristics {
    /// Create characteristics with a name and types.
    pub fn new(name: impl Into<String>, types: impl IntoIterator<Item = CardType>) -> Self {
        Self {
            name: name.into(),
            types: types.into_iter().collect(),
            supertypes: OrdSet::new(),
            keywords: OrdSet::new(),
        }
    }

    #[must_use]
    pub fn is(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }

    #[must_use]
    pub fn is_creature(&self) -> bool {
        self.is(CardType::Creature)
    }

    #[must_use]
    pub fn is_land(&self) -> bool {
        self.is(CardType::Land)
    }

    /// Has at least one permanent type.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.types.iter().any(|t| t.is_permanent())
    }

    /// Can be cast only when sorceries could. Instants and cards with
    /// flash can be cast any time their controller has priority.
    #[must_use]
    pub fn is_sorcery_speed(&self) -> bool {
        !self.is(CardType::Instant) && !self.has_keyword(Keyword::Flash)
    }

    #[must_use]
    pub fn is_legendary(&self) -> bool {
        self.supertypes.contains(&Supertype::Legendary)
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }

    /// Deals combat damage in the first-strike step.
    #[must_use]
    pub fn strikes_first(&self) -> bool {
        self.has_keyword(Keyword::FirstStrike) || self.has_keyword(Keyword::DoubleStrike)
    }

    /// Deals combat damage in the regular damage step.
    #[must_use]
    pub fn strikes_regularly(&self) -> bool {
        !self.has_keyword(Keyword::FirstStrike) || self.has_keyword(Keyword::DoubleStrike)
    }
}

/// Printed power and toughness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PowerToughness {
    pub power: i64,
    pub toughness: i64,
}

impl PowerToughness {
    #[must_use]
    pub const fn new(power: i64, toughness: i64) -> Self {
        Self { power, toughness }
    }
}

/// How an attachment permanent relates to what it is attached to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentRule {
    /// Aura: goes to the graveyard if its object becomes illegal.
    Aura { enchant: TargetFilter },
    /// Equipment: becomes unattached if its creature becomes illegal.
    Equipment,
}

/// What a spell does when it resolves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellAbility {
    pub effect: Effect,
    pub targets: Option<TargetSpec>,
}

/// An activated ability with an optional `{T}` cost.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatedAbility {
    pub description: String,
    pub tap_cost: bool,
    pub sorcery_speed: bool,
    pub effect: Effect,
    pub targets: Option<TargetSpec>,
}

impl ActivatedAbility {
    /// An instant-speed ability without a tap cost.
    pub fn new(description: impl Into<String>, effect: Effect) -> Self {
        Self {
            description: description.into(),
            tap_cost: false,
            sorcery_speed: false,
            effect,
            targets: None,
        }
    }

    /// Require `{T}` as a cost.
    #[must_use]
    pub fn with_tap_cost(mut self) -> Self {
        self.tap_cost = true;
        self
    }

    /// Restrict activation to sorcery timing.
    #[must_use]
    pub fn sorcery_speed(mut self) -> Self {
        self.sorcery_speed = true;
        self
    }

    /// Require targets.
    #[must_use]
    pub fn with_targets(mut self, spec: TargetSpec) -> Self {
        self.targets = Some(spec);
        self
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use ccg_rules::cards::{CardDefinition, CardId, Keyword};
///
/// let knight = CardDefinition::creature(CardId::new(1), "White Knight", 2, 2)
///     .with_keyword(Keyword::FirstStrike);
///
/// assert!(knight.characteristics.is_creature());
/// assert!(knight.characteristics.strikes_first());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Name, types, supertypes, and keywords.
    pub characteristics: Characteristics,

    /// Printed power/toughness (creatures only).
    pub power_toughness: Option<PowerToughness>,

    /// Resolution behaviour of a non-permanent spell; target spec of an Aura.
    pub spell: Option<SpellAbility>,

    /// Activated abilities, addressed by index.
    pub activated: Vec<ActivatedAbility>,

    /// Triggered abilities, addressed by index.
    pub triggered: Vec<TriggeredAbilityDeclaration>,

    /// Aura/Equipment rule.
    pub attachment: Option<AttachmentRule>,
}

impl CardDefinition {
    /// Create a card definition with the given types.
    pub fn new(
        id: CardId,
        name: impl Into<String>,
        types: impl IntoIterator<Item = CardType>,
    ) -> Self {
        Self {
            id,
            characteristics: Characteristics::new(name, types),
            power_toughness: None,
            spell: None,
            activated: Vec::new(),
            triggered: Vec::new(),
            attachment: None,
        }
    }

    /// A creature card.
    pub fn creature(id: CardId, name: impl Into<String>, power: i64, toughness: i64) -> Self {
        let mut def = Self::new(id, name, [CardType::Creature]);
        def.power_toughness = Some(PowerToughness::new(power, toughness));
        def
    }

    /// An instant with an effect.
    pub fn instant(id: CardId, name: impl Into<String>, effect: Effect) -> Self {
        Self::new(id, name, [CardType::Instant]).with_spell(effect, None)
    }

    /// A sorcery with an effect.
    pub fn sorcery(id: CardId, name: impl Into<String>, effect: Effect) -> Self {
        Self::new(id, name, [CardType::Sorcery]).with_spell(effect, None)
    }

    /// A land card.
    pub fn land(id: CardId, name: impl Into<String>) -> Self {
        Self::new(id, name, [CardType::Land])
    }

    /// An Aura that enchants objects matching `enchant`.
    pub fn aura(id: CardId, name: impl Into<String>, enchant: TargetFilter) -> Self {
        let mut def = Self::new(id, name, [CardType::Enchantment]);
        def.spell = Some(SpellAbility {
            effect: Effect::none(),
            targets: Some(TargetSpec::single(enchant.clone())),
        });
        def.attachment = Some(AttachmentRule::Aura { enchant });
        def
    }

    /// An Equipment artifact.
    pub fn equipment(id: CardId, name: impl Into<String>) -> Self {
        let mut def = Self::new(id, name, [CardType::Artifact]);
        def.attachment = Some(AttachmentRule::Equipment);
        def
    }

    /// Add the legendary supertype (builder pattern).
    #[must_use]
    pub fn legendary(mut self) -> Self {
        self.characteristics.supertypes.insert(Supertype::Legendary);
        self
    }

    /// Add a keyword (builder pattern).
    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.characteristics.keywords.insert(keyword);
        self
    }

    /// Set the spell ability (builder pattern).
    #[must_use]
    pub fn with_spell(mut self, effect: Effect, targets: Option<TargetSpec>) -> Self {
        self.spell = Some(SpellAbility { effect, targets });
        self
    }

    /// Add an activated ability (builder pattern).
    #[must_use]
    pub fn with_activated(mut self, ability: ActivatedAbility) -> Self {
        self.activated.push(ability);
        self
    }

    /// Add a triggered ability (builder pattern).
    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggeredAbilityDeclaration) -> Self {
        self.triggered.push(trigger);
        self
    }

    /// Card name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.characteristics.name
    }
}

/// Data for creating a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    pub characteristics: Characteristics,
    pub power_toughness: Option<PowerToughness>,
    /// Definition to borrow abilities from, if any.
    pub card: Option<CardId>,
}

impl TokenSpec {
    /// A vanilla creature token.
    pub fn creature(name: impl Into<String>, power: i64, toughness: i64) -> Self {
        Self {
            characteristics: Characteristics::new(name, [CardType::Creature]),
            power_toughness: Some(PowerToughness::new(power, toughness)),
            card: None,
        }
    }

    /// A token copy of a card definition's printed characteristics.
    #[must_use]
    pub fn from_definition(def: &CardDefinition) -> Self {
        Self {
            characteristics: def.characteristics.clone(),
            power_toughness: def.power_toughness,
            card: Some(def.id),
        }
    }
}
