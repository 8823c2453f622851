//! Triggered ability declarations and pending triggers.
//!
//! A card declares its triggered abilities as data: a [`TriggerKind`]
//! saying which events it listens for, two scoping flags, and the effect
//! it puts on the stack. The detector never sees anything else about the
//! card.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{EntityId, PlayerId};
use crate::effects::{Effect, TargetSpec};
use crate::turn::Step;
use crate::zones::ZoneId;

/// The kind of event a triggered ability listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    /// A permanent enters the battlefield.
    EntersBattlefield,
    /// A permanent leaves the battlefield.
    LeavesBattlefield,
    /// A creature goes from the battlefield to a graveyard.
    Dies,
    CardDrawn,
    DamageDealt,
    SpellCast,
    /// The given step begins. Detected per step, not from the event log.
    StepBegins(Step),
    AttackerDeclared,
    BlockerDeclared,
}

/// A triggered ability as declared by a card.
///
/// ## Scoping
///
/// - `self_only`: the event's subject must be the ability's own source
///   ("when this creature enters").
/// - `controller_only`: the event's subject must be controlled by the
///   ability's controller ("whenever a creature you control dies", "at the
///   beginning of your upkeep").
///
/// ## Example
///
/// ```
/// use ccg_rules::effects::Effect;
/// use ccg_rules::triggers::{TriggerKind, TriggeredAbilityDeclaration};
///
/// // "When this creature enters, draw a card."
/// let etb = TriggeredAbilityDeclaration::new(TriggerKind::EntersBattlefield, Effect::draw(1))
///     .self_only()
///     .with_description("draw a card");
///
/// assert!(etb.self_only);
/// assert!(!etb.controller_only);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredAbilityDeclaration {
    pub kind: TriggerKind,
    pub self_only: bool,
    pub controller_only: bool,
    pub effect: Effect,
    pub targets: Option<TargetSpec>,
    pub description: String,
}

impl TriggeredAbilityDeclaration {
    /// Create a declaration listening for `kind`.
    #[must_use]
    pub fn new(kind: TriggerKind, effect: Effect) -> Self {
        Self {
            kind,
            self_only: false,
            controller_only: false,
            effect,
            targets: None,
            description: String::new(),
        }
    }

    /// Only trigger when the event is about the source itself.
    #[must_use]
    pub fn self_only(mut self) -> Self {
        self.self_only = true;
        self
    }

    /// Only trigger for events involving the controller's objects.
    #[must_use]
    pub fn controller_only(mut self) -> Self {
        self.controller_only = true;
        self
    }

    /// Require targets when put on the stack.
    #[must_use]
    pub fn with_targets(mut self, spec: TargetSpec) -> Self {
        self.targets = Some(spec);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Looks up triggered abilities by card identity.
pub trait AbilityRegistry {
    fn triggered_abilities(&self, card: CardId) -> &[TriggeredAbilityDeclaration];
}

/// What caused a trigger. Read-only data for the effect executor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerContext {
    ZoneChange {
        entity: EntityId,
        from: Option<ZoneId>,
        to: ZoneId,
    },
    Damage {
        source: EntityId,
        target: EntityId,
        amount: u32,
        combat: bool,
    },
    Draw {
        player: PlayerId,
        entity: EntityId,
    },
    Step {
        turn: u32,
        step: Step,
    },
    SpellCast {
        player: PlayerId,
        spell: EntityId,
    },
    Combat {
        attacker: EntityId,
        blocker: Option<EntityId>,
    },
}

/// A detected trigger waiting to be put on the stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTrigger {
    /// The permanent whose ability triggered.
    pub source: EntityId,
    pub controller: PlayerId,
    pub declaration: TriggeredAbilityDeclaration,
    pub context: TriggerContext,
}

impl PendingTrigger {
    /// Check if the ability needs targets chosen.
    #[must_use]
    pub fn needs_targets(&self) -> bool {
        self.declaration.targets.is_some()
    }
}
