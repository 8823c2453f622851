//! Effect definitions.
//!
//! An `Effect` is the resolved consequence of one stack object. The rules
//! core never interprets it; it stores the value on the stack and hands it
//! to an [`EffectExecutor`](super::EffectExecutor) at resolution.
//!
//! ## Recipients
//!
//! Most effects name who they apply to with a [`Recipient`]: the chosen
//! targets, the controller, the source itself, or a group of players.
//!
//! ## Composite Effects
//!
//! - `Sequence`: Execute multiple effects in order
//!
//! Modal spells pick their mode when cast: the chosen mode's effect is the
//! one stored on the stack.

use serde::{Deserialize, Serialize};

use super::targeting::TargetFilter;
use crate::cards::TokenSpec;
use crate::core::CounterKind;

/// Who an effect applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// The stack object's chosen (and still legal) targets.
    Targets,
    /// The controlling player.
    Controller,
    /// The object the ability comes from.
    Source,
    /// Every player in the game except the controller.
    EachOpponent,
    /// Every player in the game.
    EachPlayer,
}

/// A game effect.
///
/// ## Example
///
/// ```
/// use ccg_rules::effects::{Effect, Recipient};
///
/// // "Deal 2 damage to any target. You gain 2 life."
/// let effect = Effect::damage(2).then(Effect::GainLife {
///     amount: 2,
///     to: Recipient::Controller,
/// });
///
/// assert_eq!(effect.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    // === Players and damage ===
    DealDamage { amount: u32, to: Recipient },
    GainLife { amount: u32, to: Recipient },
    LoseLife { amount: u32, to: Recipient },
    DrawCards { count: u32, to: Recipient },
    ShuffleLibrary { to: Recipient },

    // === Permanents ===
    /// Put permanents into their owners' graveyards.
    Destroy { what: Recipient },
    /// Destroy every permanent matching the filter, simultaneously.
    DestroyAll { filter: TargetFilter },
    AddCounters {
        kind: CounterKind,
        amount: u32,
        to: Recipient,
    },
    CreateToken { token: TokenSpec, count: u32 },
    Tap { what: Recipient },
    Untap { what: Recipient },
    /// Attach the source to the first target.
    Attach,

    // === Stack ===
    /// Counter target spells or abilities.
    CounterTarget,

    // === Composite ===
    Sequence(Vec<Effect>),
}

impl Effect {
    /// An effect that does nothing.
    #[must_use]
    pub fn none() -> Self {
        Effect::Sequence(Vec::new())
    }

    /// Deal damage to the targets.
    #[must_use]
    pub fn damage(amount: u32) -> Self {
        Effect::DealDamage { amount, to: Recipient::Targets }
    }

    /// Controller draws cards.
    #[must_use]
    pub fn draw(count: u32) -> Self {
        Effect::DrawCards { count, to: Recipient::Controller }
    }

    /// Controller gains life.
    #[must_use]
    pub fn gain_life(amount: u32) -> Self {
        Effect::GainLife { amount, to: Recipient::Controller }
    }

    /// Destroy the targets.
    #[must_use]
    pub fn destroy_target() -> Self {
        Effect::Destroy { what: Recipient::Targets }
    }

    /// Destroy all permanents matching a filter.
    #[must_use]
    pub fn destroy_all(filter: TargetFilter) -> Self {
        Effect::DestroyAll { filter }
    }

    /// Counter the targets.
    #[must_use]
    pub fn counter() -> Self {
        Effect::CounterTarget
    }

    /// Run `other` after this effect.
    #[must_use]
    pub fn then(self, other: Effect) -> Self {
        match self {
            Effect::Sequence(mut effects) => {
                effects.push(other);
                Effect::Sequence(effects)
            }
            first => Effect::Sequence(vec![first, other]),
        }
    }

    /// Number of primitive effects (sequences flattened).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Effect::Sequence(effects) => effects.iter().map(Effect::len).sum(),
            _ => 1,
        }
    }

    /// Check if this effect does nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
