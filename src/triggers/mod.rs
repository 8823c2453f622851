//! Trigger system for event-driven abilities.
//!
//! ## Key Components
//!
//! - [`GameEvent`]: Something that happened during an action
//! - [`TriggeredAbilityDeclaration`]: What a card listens for and does
//! - [`AbilityRegistry`]: Lookup of declarations by card identity
//! - [`detect_triggers`]: Scan an event log for matching abilities
//! - [`stack_pending_trigger`]: Move a detected trigger onto the stack
//!
//! ## Design Philosophy
//!
//! Every action produces an ordered event log. Trigger detection is a
//! synchronous scan over that log after the action completes; there is no
//! observer registration and nothing fires mid-action. Detected triggers
//! wait in the state's pending queue until their controllers stack them.
//!
//! ## Example Usage
//!
//! ```
//! use ccg_rules::cards::{CardDefinition, CardId, CardRegistry};
//! use ccg_rules::core::{GameState, PlayerId, RulesConfig};
//! use ccg_rules::effects::Effect;
//! use ccg_rules::triggers::{detect_triggers, TriggerKind, TriggeredAbilityDeclaration};
//! use ccg_rules::zones::ZoneId;
//!
//! // "Whenever a creature you control dies, gain 1 life."
//! let mut registry = CardRegistry::new();
//! let priest = CardDefinition::creature(CardId::new(1), "Priest", 1, 1).with_trigger(
//!     TriggeredAbilityDeclaration::new(TriggerKind::Dies, Effect::gain_life(1)).controller_only(),
//! );
//! let bear = CardDefinition::creature(CardId::new(2), "Bear", 2, 2);
//! registry.register(priest.clone());
//! registry.register(bear.clone());
//!
//! let p0 = PlayerId::new(0);
//! let state = GameState::new(2, RulesConfig::default(), 42);
//! let (_, state) = state.create_card(&priest, p0, ZoneId::Battlefield);
//! let (bear_id, state) = state.create_card(&bear, p0, ZoneId::Battlefield);
//!
//! let mut events = Vec::new();
//! let state = state.move_to_graveyard(bear_id, &mut events);
//!
//! let triggers = detect_triggers(&state, &events, &registry);
//! assert_eq!(triggers.len(), 1);
//! assert_eq!(triggers[0].controller, p0);
//! ```

mod detector;
mod event;
mod queue;
mod trigger;

pub use detector::{detect_step_triggers, detect_triggers, sort_apnap};
pub use event::GameEvent;
pub use queue::{clear_pending, enqueue, stack_pending_trigger, stack_untargeted_triggers};
pub use trigger::{
    AbilityRegistry, PendingTrigger, TriggerContext, TriggerKind, TriggeredAbilityDeclaration,
};
