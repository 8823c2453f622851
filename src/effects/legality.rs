//! Legality interface.
//!
//! The rules core asks a `LegalityChecker` whether a chosen target, a
//! declared attacker or blocker, or an attachment is legal. The answer is a
//! [`Legality`] with a human-readable reason when illegal. `BasicLegality`
//! implements the checks the core's own keywords and filters need; content
//! layers with richer rules provide their own implementation.

use serde::{Deserialize, Serialize};

use super::targeting::{TargetFilter, TargetSpec};
use crate::cards::{AttachmentRule, Keyword};
use crate::core::{EntityId, GameState, PlayerId};
use crate::zones::ZoneId;

/// Verdict of a legality check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Legality {
    Legal,
    Illegal(String),
}

impl Legality {
    #[must_use]
    pub fn illegal(reason: impl Into<String>) -> Self {
        Legality::Illegal(reason.into())
    }

    #[must_use]
    pub fn is_legal(&self) -> bool {
        matches!(self, Legality::Legal)
    }

    /// The reason, if illegal.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Legality::Legal => None,
            Legality::Illegal(reason) => Some(reason),
        }
    }

    /// Continue with `f` only if legal.
    #[must_use]
    pub fn and_then<F>(self, f: F) -> Self
    where
        F: FnOnce() -> Legality,
    {
        match self {
            Legality::Legal => f(),
            illegal => illegal,
        }
    }

    fn require(condition: bool, reason: &str) -> Self {
        if condition {
            Legality::Legal
        } else {
            Legality::illegal(reason)
        }
    }
}

/// Validates targets and combat declarations against current state.
pub trait LegalityChecker {
    /// Check one chosen target of a spell or ability.
    fn validate_target(
        &self,
        state: &GameState,
        controller: PlayerId,
        spec: &TargetSpec,
        source: EntityId,
        target: EntityId,
    ) -> Legality;

    /// Check that `player` may attack with `attacker`.
    fn validate_attacker(&self, state: &GameState, player: PlayerId, attacker: EntityId)
        -> Legality;

    /// Check that `player` may block `attacker` with `blocker`.
    fn validate_blocker(
        &self,
        state: &GameState,
        player: PlayerId,
        blocker: EntityId,
        attacker: EntityId,
    ) -> Legality;

    /// Check that `attachment` may stay attached to `target`.
    fn is_legal_attachment(
        &self,
        state: &GameState,
        attachment: EntityId,
        target: EntityId,
    ) -> Legality;
}

/// Legality rules for the core's filters and keywords.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicLegality;

impl LegalityChecker for BasicLegality {
    fn validate_target(
        &self,
        state: &GameState,
        controller: PlayerId,
        spec: &TargetSpec,
        source: EntityId,
        target: EntityId,
    ) -> Legality {
        if !state.exists(target) {
            return Legality::illegal("it no longer exists");
        }
        if target == source && state.zone_of(target) == Some(ZoneId::Stack) {
            return Legality::illegal("a spell cannot target itself");
        }
        Legality::require(
            spec.filter.matches(state, controller, target),
            "it does not match the target restriction",
        )
    }

    fn validate_attacker(
        &self,
        state: &GameState,
        player: PlayerId,
        attacker: EntityId,
    ) -> Legality {
        Legality::require(state.is_on_battlefield(attacker), "not on the battlefield")
            .and_then(|| Legality::require(state.is_creature(attacker), "not a creature"))
            .and_then(|| {
                Legality::require(
                    state.controller_of(attacker) == Some(player),
                    "controlled by another player",
                )
            })
            .and_then(|| Legality::require(!state.entity(attacker).is_tapped(), "tapped"))
            .and_then(|| {
                Legality::require(
                    !state.entity(attacker).is_summoning_sick()
                        || state.has_keyword(attacker, Keyword::Haste),
                    "summoning sick",
                )
            })
            .and_then(|| {
                Legality::require(!state.has_keyword(attacker, Keyword::Defender), "has defender")
            })
            .and_then(|| {
                Legality::require(state.entity(attacker).attacking().is_none(), "already attacking")
            })
    }

    fn validate_blocker(
        &self,
        state: &GameState,
        player: PlayerId,
        blocker: EntityId,
        attacker: EntityId,
    ) -> Legality {
        Legality::require(state.is_on_battlefield(blocker), "not on the battlefield")
            .and_then(|| Legality::require(state.is_creature(blocker), "not a creature"))
            .and_then(|| {
                Legality::require(
                    state.controller_of(blocker) == Some(player),
                    "controlled by another player",
                )
            })
            .and_then(|| Legality::require(!state.entity(blocker).is_tapped(), "tapped"))
            .and_then(|| {
                Legality::require(state.entity(blocker).blocking().is_none(), "already blocking")
            })
            .and_then(|| {
                Legality::require(
                    state.is_on_battlefield(attacker)
                        && state.entity(attacker).attacking().is_some(),
                    "the blocked creature is not attacking",
                )
            })
            .and_then(|| {
                Legality::require(
                    !state.has_keyword(attacker, Keyword::Flying)
                        || state.has_keyword(blocker, Keyword::Flying)
                        || state.has_keyword(blocker, Keyword::Reach),
                    "cannot block a creature with flying",
                )
            })
    }

    fn is_legal_attachment(
        &self,
        state: &GameState,
        attachment: EntityId,
        target: EntityId,
    ) -> Legality {
        if attachment == target {
            return Legality::illegal("cannot be attached to itself");
        }
        if !state.exists(target) || !state.is_on_battlefield(target) {
            return Legality::illegal("the object it is attached to is gone");
        }
        let Some(controller) = state.controller_of(attachment) else {
            return Legality::illegal("has no controller");
        };
        match state.entity(attachment).attachment() {
            Some(AttachmentRule::Aura { enchant }) => Legality::require(
                enchant.matches(state, controller, target),
                "the enchanted object is no longer legal",
            ),
            Some(AttachmentRule::Equipment) => Legality::require(
                TargetFilter::CreatureYouControl.matches(state, controller, target),
                "equipment must be attached to a creature its controller controls",
            ),
            None => Legality::illegal("not an Aura or Equipment"),
        }
    }
}
