//! Entity identification system.
//!
//! Every game object (player, card, token, ability on the stack) has a
//! unique `EntityId`. An entity owns no data itself; everything about it
//! lives in its [`Components`](super::Components).
//!
//! ## ID Layout
//!
//! - `0..player_count`: Reserved for players
//! - `player_count..`: Cards, tokens, and abilities
//!
//! ```
//! use ccg_rules::core::{EntityId, PlayerId};
//!
//! let player_count = 2;
//!
//! let p1 = EntityId::player(PlayerId::new(1));
//! assert!(p1.is_player(player_count));
//!
//! let card = EntityId(10);
//! assert!(!card.is_player(player_count));
//! ```

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Unique identifier for any game entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// First entity ID available for non-player entities.
    #[must_use]
    pub const fn first_non_player(player_count: usize) -> u32 {
        player_count as u32
    }

    /// Entity ID of a player.
    #[must_use]
    pub const fn player(id: PlayerId) -> Self {
        Self(id.0 as u32)
    }

    /// Check if this entity ID refers to a player.
    #[must_use]
    pub const fn is_player(self, player_count: usize) -> bool {
        self.0 < player_count as u32
    }

    /// Convert to `PlayerId` if this is a player entity.
    ///
    /// ```
    /// use ccg_rules::core::{EntityId, PlayerId};
    ///
    /// assert_eq!(EntityId(1).as_player(2), Some(PlayerId::new(1)));
    /// assert_eq!(EntityId(2).as_player(2), None);
    /// ```
    #[must_use]
    pub fn as_player(self, player_count: usize) -> Option<PlayerId> {
        if self.is_player(player_count) {
            Some(PlayerId::new(self.0 as u8))
        } else {
            None
        }
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
