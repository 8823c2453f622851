//! Phases and steps.
//!
//! A turn is a fixed sequence of 13 steps grouped into 5 phases. Step
//! properties are static: they never depend on game state.

use serde::{Deserialize, Serialize};

/// The five phases of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Beginning,
    PrecombatMain,
    Combat,
    PostcombatMain,
    Ending,
}

/// The thirteen steps of a turn, in order.
///
/// ```
/// use ccg_rules::turn::{Phase, Step};
///
/// assert_eq!(Step::Draw.next(), (Step::PrecombatMain, false));
/// assert_eq!(Step::Cleanup.next(), (Step::Untap, true));
/// assert_eq!(Step::CombatDamage.phase(), Phase::Combat);
/// assert!(!Step::Untap.grants_priority());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    Untap,
    Upkeep,
    Draw,
    PrecombatMain,
    BeginCombat,
    DeclareAttackers,
    DeclareBlockers,
    FirstStrikeDamage,
    CombatDamage,
    EndCombat,
    PostcombatMain,
    End,
    Cleanup,
}

impl Step {
    /// All steps in turn order.
    pub const ALL: [Step; 13] = [
        Step::Untap,
        Step::Upkeep,
        Step::Draw,
        Step::PrecombatMain,
        Step::BeginCombat,
        Step::DeclareAttackers,
        Step::DeclareBlockers,
        Step::FirstStrikeDamage,
        Step::CombatDamage,
        Step::EndCombat,
        Step::PostcombatMain,
        Step::End,
        Step::Cleanup,
    ];

    /// The following step, and whether that crosses into the next turn.
    #[must_use]
    pub fn next(self) -> (Step, bool) {
        let index = self as usize;
        if index + 1 == Self::ALL.len() {
            (Step::Untap, true)
        } else {
            (Self::ALL[index + 1], false)
        }
    }

    /// The phase this step belongs to.
    #[must_use]
    pub const fn phase(self) -> Phase {
        match self {
            Step::Untap | Step::Upkeep | Step::Draw => Phase::Beginning,
            Step::PrecombatMain => Phase::PrecombatMain,
            Step::BeginCombat
            | Step::DeclareAttackers
            | Step::DeclareBlockers
            | Step::FirstStrikeDamage
            | Step::CombatDamage
            | Step::EndCombat => Phase::Combat,
            Step::PostcombatMain => Phase::PostcombatMain,
            Step::End | Step::Cleanup => Phase::Ending,
        }
    }

    /// Untap and cleanup are advanced by the caller, not by passing.
    #[must_use]
    pub const fn grants_priority(self) -> bool {
        !matches!(self, Step::Untap | Step::Cleanup)
    }

    #[must_use]
    pub const fn is_main(self) -> bool {
        matches!(self, Step::PrecombatMain | Step::PostcombatMain)
    }

    /// Sorcery-speed actions additionally need the active player and an
    /// empty stack.
    #[must_use]
    pub const fn allows_sorcery_speed(self) -> bool {
        self.is_main()
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::Untap => "Untap",
            Step::Upkeep => "Upkeep",
            Step::Draw => "Draw",
            Step::PrecombatMain => "Precombat Main",
            Step::BeginCombat => "Beginning of Combat",
            Step::DeclareAttackers => "Declare Attackers",
            Step::DeclareBlockers => "Declare Blockers",
            Step::FirstStrikeDamage => "First Strike Damage",
            Step::CombatDamage => "Combat Damage",
            Step::EndCombat => "End of Combat",
            Step::PostcombatMain => "Postcombat Main",
            Step::End => "End",
            Step::Cleanup => "Cleanup",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_total_and_wraps() {
        let mut step = Step::Untap;
        for expected in Step::ALL.iter().skip(1) {
            let (next, wrapped) = step.next();
            assert_eq!(next, *expected);
            assert!(!wrapped);
            step = next;
        }
        assert_eq!(step.next(), (Step::Untap, true));
    }

    #[test]
    fn test_priority_steps() {
        let silent: Vec<_> = Step::ALL.iter().filter(|s| !s.grants_priority()).collect();
        assert_eq!(silent, vec![&Step::Untap, &Step::Cleanup]);
    }

    #[test]
    fn test_main_steps() {
        let main: Vec<_> = Step::ALL.iter().filter(|s| s.allows_sorcery_speed()).collect();
        assert_eq!(main, vec![&Step::PrecombatMain, &Step::PostcombatMain]);
    }

    #[test]
    fn test_phases() {
        assert_eq!(Step::Upkeep.phase(), Phase::Beginning);
        assert_eq!(Step::FirstStrikeDamage.phase(), Phase::Combat);
        assert_eq!(Step::Cleanup.phase(), Phase::Ending);
    }
}
