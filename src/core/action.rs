//! Player actions and transitions.
//!
//! An `Action` names what a player wants to do; the engine either applies
//! it and returns a [`Transition`] (new state plus ordered events) or
//! rejects it with a [`RuleError`](crate::RuleError) and the prior state
//! stays current. Successful actions are appended to the state's history
//! as `ActionRecord`s for replay and debugging.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::EntityId;
use super::player::PlayerId;
use super::state::GameState;
use crate::triggers::GameEvent;

/// Chosen targets. Most spells and abilities have at most three.
pub type Targets = SmallVec<[EntityId; 3]>;

/// Something a player does.
///
/// ## Example
///
/// ```
/// use ccg_rules::core::{Action, EntityId};
///
/// let pass = Action::PassPriority;
/// let bolt = Action::cast(EntityId(10), &[EntityId(1)]);
///
/// assert!(pass.is_pass());
/// assert!(!bolt.is_pass());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    PassPriority,
    PlayLand {
        card: EntityId,
    },
    CastSpell {
        card: EntityId,
        targets: Targets,
    },
    ActivateAbility {
        source: EntityId,
        index: usize,
        targets: Targets,
    },
    DeclareAttacker {
        attacker: EntityId,
    },
    DeclareBlocker {
        blocker: EntityId,
        attacker: EntityId,
    },
    /// Put the pending trigger at `index` on the stack.
    StackTrigger {
        index: usize,
        targets: Targets,
    },
    ChooseLegendSurvivor {
        name: String,
        survivor: EntityId,
    },
    /// Advance out of a step that grants no priority.
    AdvanceStep,
    PerformCleanup,
}

impl Action {
    /// Cast a spell with the given targets.
    #[must_use]
    pub fn cast(card: EntityId, targets: &[EntityId]) -> Self {
        Action::CastSpell {
            card,
            targets: SmallVec::from_slice(targets),
        }
    }

    /// Activate ability `index` of `source`.
    #[must_use]
    pub fn activate(source: EntityId, index: usize, targets: &[EntityId]) -> Self {
        Action::ActivateAbility {
            source,
            index,
            targets: SmallVec::from_slice(targets),
        }
    }

    /// Put a pending trigger on the stack.
    #[must_use]
    pub fn stack_trigger(index: usize, targets: &[EntityId]) -> Self {
        Action::StackTrigger {
            index,
            targets: SmallVec::from_slice(targets),
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Action::PassPriority)
    }
}

/// A recorded action with metadata for history tracking.
///
/// Used for replay and debugging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Sequence number within the game (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}

/// The result of a successful transition: the new state and what happened,
/// in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

impl Transition {
    #[must_use]
    pub fn new(state: GameState, events: Vec<GameEvent>) -> Self {
        Self { state, events }
    }

    /// A transition that changed nothing.
    #[must_use]
    pub fn unchanged(state: &GameState) -> Self {
        Self::new(state.clone(), Vec::new())
    }

    /// Chain another transition, concatenating events.
    #[must_use]
    pub fn then<F>(self, f: F) -> Self
    where
        F: FnOnce(&GameState) -> Transition,
    {
        let next = f(&self.state);
        let mut events = self.events;
        events.extend(next.events);
        Self::new(next.state, events)
    }
}
