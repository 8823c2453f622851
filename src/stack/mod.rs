//! The stack: spells and abilities waiting to resolve.
//!
//! - `StackItem`: What a stack object is and what it will do
//! - `push_spell` / `push_ability`: Put objects on the stack
//! - `resolve_top_of_stack`: LIFO resolution, one object per call
//!
//! ## Design Philosophy
//!
//! The stack is an ordinary zone. Objects on it are entities carrying an
//! `OnStack` component, so they can be targeted, countered, and inspected
//! with the same queries as anything else.
//!
//! ## Example Usage
//!
//! ```
//! use ccg_rules::core::{GameState, PlayerId, RulesConfig};
//! use ccg_rules::effects::{BasicEffects, BasicLegality, Effect};
//! use ccg_rules::stack::{push_ability, resolve_top_of_stack, Resolution, StackItem, StackItemKind};
//!
//! let state = GameState::new(2, RulesConfig::default(), 42);
//! let p0 = PlayerId::new(0);
//!
//! let item = StackItem::ability(
//!     StackItemKind::ActivatedAbility,
//!     p0,
//!     state.player_entity(p0),
//!     Effect::gain_life(2),
//!     None,
//!     &[],
//! );
//! let (ability, state) = push_ability(&state, item, &mut Vec::new());
//!
//! let (transition, resolution) = resolve_top_of_stack(&state, &BasicEffects, &BasicLegality);
//! assert_eq!(resolution, Resolution::Resolved(ability));
//! assert_eq!(transition.state.life(p0), 22);
//! assert!(transition.state.stack().is_empty());
//! ```

mod item;
mod resolver;

pub use item::{StackItem, StackItemKind};
pub use resolver::{push_ability, push_spell, resolve_top_of_stack, Resolution};
