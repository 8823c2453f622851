//! # ccg-rules
//!
//! Rules-enforcement core for a turn-based trading card game.
//!
//! ## Design Principles
//!
//! 1. **One Immutable State**: Every transition takes a `&GameState` and
//!    returns a new one. Containers are `im` persistent structures, so
//!    snapshots are cheap and rollback is free.
//!
//! 2. **Explicit Event Log**: Actions append `GameEvent`s in order. Trigger
//!    detection scans the log after the action; nothing fires mid-action.
//!
//! 3. **N-Player First**: Turn order, APNAP ordering, and elimination work
//!    for any number of players.
//!
//! 4. **Content at the Seams**: Effects and target legality go through the
//!    `EffectExecutor` and `LegalityChecker` traits.
//!
//! ## Modules
//!
//! - `core`: Entity IDs, players, components, state, actions, RNG, config
//! - `zones`: Zone membership and ordering
//! - `cards`: Card definitions and registry
//! - `effects`: Effect vocabulary, executor, targeting, legality
//! - `triggers`: Events, triggered abilities, detection, pending queue
//! - `stack`: Stack objects and LIFO resolution
//! - `turn`: Steps, turn state, priority
//! - `combat`: Attackers, blockers, combat damage
//! - `rules`: State-based actions, the legend rule, the action engine

pub mod cards;
pub mod combat;
pub mod core;
pub mod effects;
pub mod error;
pub mod rules;
pub mod stack;
pub mod triggers;
pub mod turn;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, Component, ComponentKind, EntityId, GameRng, GameState, PlayerId,
    RulesConfig, Transition,
};

pub use crate::zones::{ZoneId, ZoneManager};

pub use crate::cards::{CardDefinition, CardId, CardRegistry, CardType, Keyword};

pub use crate::effects::{
    BasicEffects, BasicLegality, Effect, EffectExecutor, LegalityChecker, TargetFilter, TargetSpec,
};

pub use crate::triggers::{GameEvent, TriggerKind, TriggeredAbilityDeclaration};

pub use crate::stack::{Resolution, StackItem};

pub use crate::turn::{Phase, Step};

pub use crate::rules::{Engine, GameResult};

pub use crate::error::{Result, RuleError};
