//! Combat bookkeeping.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};

/// How far combat has progressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CombatStage {
    /// Combat has begun; attackers may be declared.
    Beginning,
    /// Attackers are locked in; blockers may be declared.
    AttackersDeclared,
    /// At least one blocker has been declared.
    BlockersDeclared,
    /// First-strike combat damage has been dealt.
    FirstStrikeDamage,
    /// Regular combat damage has been dealt.
    RegularDamage,
}

/// State of the current combat.
///
/// Who attacks and who blocks is stored on the creatures themselves as
/// `Attacking`, `Blocking`, and `BlockedBy` components.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    pub attacking_player: PlayerId,
    pub defending_player: PlayerId,
    pub stage: CombatStage,
    /// Creatures that could block when the declare blockers step began.
    pub eligible_blockers: OrdSet<EntityId>,
    /// Creatures that dealt damage in the first-strike pass.
    pub first_strike_dealt: OrdSet<EntityId>,
}

impl CombatState {
    #[must_use]
    pub fn new(attacking_player: PlayerId, defending_player: PlayerId) -> Self {
        Self {
            attacking_player,
            defending_player,
            stage: CombatStage::Beginning,
            eligible_blockers: OrdSet::new(),
            first_strike_dealt: OrdSet::new(),
        }
    }

    /// Check whether `blocker` was in the snapshot taken when blockers
    /// became declarable.
    #[must_use]
    pub fn is_eligible_blocker(&self, blocker: EntityId) -> bool {
        self.eligible_blockers.contains(&blocker)
    }
}
