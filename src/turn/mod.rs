//! Turn structure: phases, steps, and priority.
//!
//! - `Step` / `Phase`: The fixed sequence of a turn
//! - `TurnState`: Whose turn, which step, who holds priority
//! - `advance_step`: Step transitions and turn-based actions
//! - `pass_priority` / `resolve_passed_priority`: The priority round
//!
//! ## Example Usage
//!
//! ```
//! use ccg_rules::core::{GameState, PlayerId, RulesConfig};
//! use ccg_rules::turn::{advance_step, all_players_passed, pass_priority, Step};
//!
//! let state = GameState::new(2, RulesConfig::default(), 42);
//! let state = advance_step(&state).state;
//! assert_eq!(state.turn.step, Step::Upkeep);
//!
//! let state = pass_priority(&state, PlayerId::new(0)).unwrap().state;
//! let state = pass_priority(&state, PlayerId::new(1)).unwrap().state;
//! assert!(all_players_passed(&state));
//! ```

mod machine;
mod priority;
mod step;

pub use machine::{advance_step, TurnState};
pub use priority::{all_players_passed, pass_priority, resolve_passed_priority, take_action};
pub use step::{Phase, Step};
