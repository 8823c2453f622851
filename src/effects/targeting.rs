//! Effect targeting.
//!
//! - `TargetFilter`: What kind of object or player can be chosen
//! - `TargetSpec`: A filter plus how many targets to choose
//!
//! Filters are evaluated against the current state from the point of view
//! of the controlling player, both when targets are chosen and again when
//! the stack object resolves.

use serde::{Deserialize, Serialize};

use crate::cards::{CardType, Characteristics};
use crate::core::{EntityId, GameState, PlayerId};
use crate::stack::StackItemKind;
use crate::zones::ZoneId;

/// Number of targets to choose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetCount {
    /// Exactly N targets.
    Exactly(usize),
    /// Between zero and N targets.
    UpTo(usize),
}

/// Filters for valid targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetFilter {
    /// A player, creature, or planeswalker.
    AnyTarget,

    // === Player Filters ===
    Player,
    Opponent,

    // === Permanent Filters ===
    Creature,
    CreatureYouControl,
    CreatureOpponentControls,
    Permanent,
    NonlandPermanent,
    PermanentOfType(CardType),

    // === Stack Filters ===
    /// A spell on the stack.
    Spell,
    /// A spell or ability on the stack.
    StackObject,
}

impl TargetFilter {
    /// Check whether `entity` matches this filter for `controller`.
    ///
    /// Players must still be in the game; permanents must be on the
    /// battlefield; stack filters need the object on the stack.
    #[must_use]
    pub fn matches(&self, state: &GameState, controller: PlayerId, entity: EntityId) -> bool {
        let Some(components) = state.try_entity(entity) else {
            return false;
        };

        if let Some(player) = components.player() {
            let in_game = state.is_in_game(player);
            return match self {
                TargetFilter::AnyTarget | TargetFilter::Player => in_game,
                TargetFilter::Opponent => in_game && player != controller,
                _ => false,
            };
        }

        let zone = state.zone_of(entity);
        let on_battlefield = zone == Some(ZoneId::Battlefield);
        let is = |t: CardType| components.characteristics().is_some_and(|c| c.is(t));
        let controlled_by_you = state.controller_of(entity) == Some(controller);

        match self {
            TargetFilter::AnyTarget => {
                on_battlefield && (is(CardType::Creature) || is(CardType::Planeswalker))
            }
            TargetFilter::Player | TargetFilter::Opponent => false,
            TargetFilter::Creature => on_battlefield && is(CardType::Creature),
            TargetFilter::CreatureYouControl => {
                on_battlefield && is(CardType::Creature) && controlled_by_you
            }
            TargetFilter::CreatureOpponentControls => {
                on_battlefield && is(CardType::Creature) && !controlled_by_you
            }
            TargetFilter::Permanent => on_battlefield,
            TargetFilter::NonlandPermanent => {
                on_battlefield
                    && !components
                        .characteristics()
                        .is_some_and(Characteristics::is_land)
            }
            TargetFilter::PermanentOfType(t) => on_battlefield && is(*t),
            TargetFilter::Spell => {
                zone == Some(ZoneId::Stack)
                    && components
                        .stack_item()
                        .is_some_and(|item| matches!(item.kind, StackItemKind::Spell))
            }
            TargetFilter::StackObject => zone == Some(ZoneId::Stack),
        }
    }
}

/// Specification for effect targeting: a filter and a count.
///
/// ```
/// use ccg_rules::effects::{TargetFilter, TargetSpec};
///
/// let spec = TargetSpec::up_to(2, TargetFilter::Creature);
/// assert!(spec.accepts_count(0));
/// assert!(spec.accepts_count(2));
/// assert!(!spec.accepts_count(3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub filter: TargetFilter,
    pub count: TargetCount,
}

impl TargetSpec {
    /// Exactly one target.
    #[must_use]
    pub fn single(filter: TargetFilter) -> Self {
        Self::exactly(1, filter)
    }

    #[must_use]
    pub fn exactly(count: usize, filter: TargetFilter) -> Self {
        Self {
            filter,
            count: TargetCount::Exactly(count),
        }
    }

    #[must_use]
    pub fn up_to(count: usize, filter: TargetFilter) -> Self {
        Self {
            filter,
            count: TargetCount::UpTo(count),
        }
    }

    /// Check whether choosing `n` targets satisfies the count.
    #[must_use]
    pub fn accepts_count(&self, n: usize) -> bool {
        match self.count {
            TargetCount::Exactly(count) => n == count,
            TargetCount::UpTo(count) => n <= count,
        }
    }

    /// Smallest number of targets that must be chosen.
    #[must_use]
    pub fn minimum(&self) -> usize {
        match self.count {
            TargetCount::Exactly(count) => count,
            TargetCount::UpTo(_) => 0,
        }
    }

    /// Human-readable count for error messages.
    #[must_use]
    pub fn describe_count(&self) -> String {
        match self.count {
            TargetCount::Exactly(count) => format!("exactly {}", count),
            TargetCount::UpTo(count) => format!("up to {}", count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId};
    use crate::core::RulesConfig;

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);

    fn setup() -> (GameState, EntityId, EntityId, EntityId) {
        let state = GameState::new(2, RulesConfig::default(), 1);
        let bear = CardDefinition::creature(CardId::new(1), "Grizzly Bears", 2, 2);
        let land = CardDefinition::land(CardId::new(2), "Forest");
        let (mine, state) = state.create_card(&bear, P0, ZoneId::Battlefield);
        let (theirs, state) = state.create_card(&bear, P1, ZoneId::Battlefield);
        let (forest, state) = state.create_card(&land, P0, ZoneId::Battlefield);
        (state, mine, theirs, forest)
    }

    #[test]
    fn test_player_filters() {
        let (state, mine, _, _) = setup();
        let p0 = state.player_entity(P0);
        let p1 = state.player_entity(P1);

        assert!(TargetFilter::Player.matches(&state, P0, p0));
        assert!(TargetFilter::Opponent.matches(&state, P0, p1));
        assert!(!TargetFilter::Opponent.matches(&state, P0, p0));
        assert!(TargetFilter::AnyTarget.matches(&state, P0, p1));
        assert!(!TargetFilter::Player.matches(&state, P0, mine));
    }

    #[test]
    fn test_creature_filters() {
        let (state, mine, theirs, forest) = setup();

        assert!(TargetFilter::Creature.matches(&state, P0, theirs));
        assert!(TargetFilter::CreatureYouControl.matches(&state, P0, mine));
        assert!(!TargetFilter::CreatureYouControl.matches(&state, P0, theirs));
        assert!(TargetFilter::CreatureOpponentControls.matches(&state, P0, theirs));
        assert!(!TargetFilter::Creature.matches(&state, P0, forest));
        assert!(TargetFilter::AnyTarget.matches(&state, P0, mine));
        assert!(!TargetFilter::AnyTarget.matches(&state, P0, forest));
    }

    #[test]
    fn test_permanent_filters() {
        let (state, mine, _, forest) = setup();

        assert!(TargetFilter::Permanent.matches(&state, P0, forest));
        assert!(!TargetFilter::NonlandPermanent.matches(&state, P0, forest));
        assert!(TargetFilter::NonlandPermanent.matches(&state, P0, mine));
        assert!(TargetFilter::PermanentOfType(CardType::Land).matches(&state, P0, forest));
    }

    #[test]
    fn test_off_battlefield_and_missing_never_match() {
        let (state, mine, _, _) = setup();
        let moved = state.move_to_zone(mine, ZoneId::Graveyard(P0), &mut Vec::new());

        assert!(!TargetFilter::Creature.matches(&moved, P0, mine));
        assert!(!TargetFilter::Permanent.matches(&moved, P0, EntityId(999)));
        assert!(!TargetFilter::StackObject.matches(&state, P0, mine));
    }

    #[test]
    fn test_counts() {
        let spec = TargetSpec::single(TargetFilter::Creature);
        assert!(spec.accepts_count(1));
        assert!(!spec.accepts_count(0));
        assert_eq!(spec.minimum(), 1);
        assert_eq!(spec.describe_count(), "exactly 1");
        assert_eq!(TargetSpec::up_to(2, TargetFilter::Player).minimum(), 0);
    }
}
