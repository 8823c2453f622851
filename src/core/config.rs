//! Rules configuration.
//!
//! Tunable constants of the rules core. The content layer can build a
//! `RulesConfig` in code or deserialize one; every `GameState` carries its
//! own copy so transitions never consult anything outside the state.

use serde::{Deserialize, Serialize};

/// Rules constants for one game.
///
/// ```
/// use ccg_rules::core::RulesConfig;
///
/// let config = RulesConfig::default()
///     .with_starting_life(40)
///     .with_skip_first_draw(false);
///
/// assert_eq!(config.starting_life, 40);
/// assert_eq!(config.poison_limit, 10);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Life total each player starts with.
    pub starting_life: i64,

    /// Poison counters at which a player loses.
    pub poison_limit: u32,

    /// Lands the active player may play per turn.
    pub lands_per_turn: u32,

    /// Whether the starting player skips the draw on turn 1.
    pub skip_first_draw: bool,

    /// Upper bound on state-based action passes in one check.
    ///
    /// Every category strictly reduces the state, so a stable game
    /// reaches its fixed point long before this.
    pub max_sba_passes: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_life: 20,
            poison_limit: 10,
            lands_per_turn: 1,
            skip_first_draw: true,
            max_sba_passes: 64,
        }
    }
}

impl RulesConfig {
    /// Set the starting life total.
    #[must_use]
    pub fn with_starting_life(mut self, life: i64) -> Self {
        self.starting_life = life;
        self
    }

    /// Set the poison-counter loss threshold.
    #[must_use]
    pub fn with_poison_limit(mut self, limit: u32) -> Self {
        self.poison_limit = limit;
        self
    }

    /// Set the number of land plays per turn.
    #[must_use]
    pub fn with_lands_per_turn(mut self, lands: u32) -> Self {
        self.lands_per_turn = lands;
        self
    }

    /// Choose whether the starting player skips their first draw.
    #[must_use]
    pub fn with_skip_first_draw(mut self, skip: bool) -> Self {
        self.skip_first_draw = skip;
        self
    }

    /// Set the state-based action pass bound.
    #[must_use]
    pub fn with_max_sba_passes(mut self, passes: usize) -> Self {
        assert!(passes > 0, "At least one SBA pass is required");
        self.max_sba_passes = passes;
        self
    }
}
