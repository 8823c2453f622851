//! Zone system for entity locations.
//!
//! ## Key Types
//!
//! - `ZoneId`: Library, hand and graveyard per player; battlefield, stack
//!   and exile shared
//! - `ZoneManager`: Location tracking and movement

pub mod manager;

pub use manager::{ZoneId, ZoneManager};
