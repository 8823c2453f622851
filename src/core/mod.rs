//! Core types: entities, players, components, state, actions, RNG,
//! configuration.
//!
//! Everything the rest of the crate threads through a transition lives
//! here. `GameState` is the one value every operation takes and returns.

pub mod action;
pub mod component;
pub mod config;
pub mod entity;
pub mod player;
pub mod rng;
pub mod state;
pub mod store;

pub use action::{Action, ActionRecord, Targets, Transition};
pub use component::{Component, ComponentKind, Components, CounterKind, Counters, LossReason};
pub use config::RulesConfig;
pub use entity::EntityId;
pub use player::PlayerId;
pub use rng::{GameRng, GameRngState};
pub use state::GameState;
pub use store::EntityStore;
