//! Rule errors: rejected player actions.
//!
//! A `RuleError` is a normal game outcome, not a fault. The action it
//! belongs to had no effect, and the caller keeps the prior state. Contract
//! violations (missing entities or zones, resolving before everyone passed)
//! panic instead.

use thiserror::Error;

use crate::cards::CardId;
use crate::core::{EntityId, PlayerId};
use crate::turn::Step;
use crate::zones::ZoneId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("The game is over")]
    GameOver,

    #[error("{player} does not have priority")]
    NotPriorityHolder { player: PlayerId },

    #[error("{player} is not the active player")]
    NotActivePlayer { player: PlayerId },

    #[error("No player receives priority during {step}")]
    NoPriorityInStep { step: Step },

    #[error("Expected the {expected} step, current step is {actual}")]
    WrongStep { expected: Step, actual: Step },

    #[error("All players have passed; the stack or step must resolve first")]
    AwaitingResolution,

    #[error("{count} triggered abilities must be put on the stack first")]
    TriggersPending { count: usize },

    #[error("Sorcery-speed action is not allowed during {step}")]
    SorcerySpeedOnly { step: Step },

    #[error("The stack is not empty")]
    StackNotEmpty,

    #[error("{entity} is not in {zone}")]
    NotInZone { entity: EntityId, zone: ZoneId },

    #[error("{player} does not control {entity}")]
    NotController { player: PlayerId, entity: EntityId },

    #[error("{entity} is not a land")]
    NotALand { entity: EntityId },

    #[error("{entity} is a land and cannot be cast")]
    CannotCastLand { entity: EntityId },

    #[error("Already played {limit} land(s) this turn")]
    LandLimitReached { limit: u32 },

    #[error("{entity} has no card definition")]
    NotACard { entity: EntityId },

    #[error("Unknown card definition {card}")]
    UnknownCard { card: CardId },

    #[error("{entity} has no activated ability {index}")]
    NoSuchAbility { entity: EntityId, index: usize },

    #[error("{entity} is already tapped")]
    AlreadyTapped { entity: EntityId },

    #[error("{entity} has summoning sickness")]
    SummoningSick { entity: EntityId },

    #[error("Wrong number of targets: expected {expected}, got {got}")]
    TargetCount { expected: String, got: usize },

    #[error("Illegal target {target}: {reason}")]
    IllegalTarget { target: EntityId, reason: String },

    #[error("Illegal attacker {attacker}: {reason}")]
    IllegalAttacker { attacker: EntityId, reason: String },

    #[error("Illegal blocker {blocker}: {reason}")]
    IllegalBlocker { blocker: EntityId, reason: String },

    #[error("{blocker} was not able to block when blockers were determined")]
    NotEligibleBlocker { blocker: EntityId },

    #[error("No combat in progress")]
    NoCombat,

    #[error("{player} is not the defending player")]
    NotDefendingPlayer { player: PlayerId },

    #[error("No pending trigger at index {index}")]
    NoSuchTrigger { index: usize },

    #[error("Triggers controlled by {first} must be put on the stack first")]
    TriggerOutOfOrder { first: PlayerId },

    #[error("No pending legend rule choice for {player} named {name}")]
    NoLegendChoice { player: PlayerId, name: String },

    #[error("{survivor} is not one of the duplicates named {name}")]
    InvalidSurvivor { survivor: EntityId, name: String },
}

/// Result type for rule-checked actions.
pub type Result<T> = std::result::Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_readable() {
        let err = RuleError::LandLimitReached { limit: 1 };
        assert_eq!(err.to_string(), "Already played 1 land(s) this turn");

        let err = RuleError::NotPriorityHolder { player: PlayerId::new(1) };
        assert_eq!(err.to_string(), "Player 1 does not have priority");

        let err = RuleError::NoPriorityInStep { step: Step::Cleanup };
        assert_eq!(err.to_string(), "No player receives priority during Cleanup");
    }
}
