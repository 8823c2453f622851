//! Rules enforcement: state-based actions, the legend rule, and the action
//! engine.
//!
//! - [`check_state_based_actions`]: Apply SBAs until nothing changes
//! - [`resolve_legend_choice`]: Settle a pending legend rule choice
//! - [`Engine`]: Rule-checked player actions, settled after each one
//!
//! The SBA check never fails. Everything it does is reported as events, and
//! a game that ends during the check records its [`GameResult`] on the
//! state.

mod engine;
mod legend;
mod sba;

pub use engine::{Engine, GameResult};
pub use legend::{legend_duplicates, resolve_legend_choice, PendingLegendRuleChoice};
pub use sba::{check_state_based_actions, collect_state_based_actions, StateBasedAction};
