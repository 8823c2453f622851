//! Combat: attackers, blockers, and combat damage.
//!
//! Combat exists only between the beginning of combat step and the
//! postcombat main phase. The active player attacks the next player in
//! turn order.
//!
//! ## Stages
//!
//! ```text
//! (no combat) -> Beginning -> AttackersDeclared -> BlockersDeclared
//!             -> FirstStrikeDamage -> RegularDamage -> (no combat)
//! ```

mod controller;
mod state;

pub use controller::{
    assign_combat_damage, declare_attacker, declare_blocker, end_combat,
    snapshot_eligible_blockers, start_combat,
};
pub use state::{CombatStage, CombatState};
