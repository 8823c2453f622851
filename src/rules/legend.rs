//! The legend rule.
//!
//! When a player controls two or more legendary permanents with the same
//! name, the state-based action check records a
//! [`PendingLegendRuleChoice`]. The controller then picks one to keep and
//! the rest go to their owners' graveyards. Legends with the same name
//! under different controllers coexist.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{EntityId, GameState, PlayerId, Transition};
use crate::error::{Result, RuleError};
use crate::triggers::GameEvent;

/// A player must choose which of their same-named legends survives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLegendRuleChoice {
    pub controller: PlayerId,
    pub name: String,
    /// The duplicates, in battlefield order.
    pub duplicates: Vector<EntityId>,
}

impl PendingLegendRuleChoice {
    #[must_use]
    pub fn matches(&self, controller: PlayerId, name: &str) -> bool {
        self.controller == controller && self.name == name
    }
}

/// Legendary permanents grouped by controller and name, keeping only groups
/// with duplicates. Groups are ordered by first appearance on the
/// battlefield.
#[must_use]
pub fn legend_duplicates(state: &GameState) -> Vec<PendingLegendRuleChoice> {
    let mut groups: Vec<PendingLegendRuleChoice> = Vec::new();
    for &id in state.battlefield() {
        let Some(characteristics) = state.characteristics(id) else {
            continue;
        };
        if !characteristics.is_legendary() {
            continue;
        }
        let Some(controller) = state.controller_of(id) else {
            continue;
        };
        match groups
            .iter_mut()
            .find(|g| g.matches(controller, &characteristics.name))
        {
            Some(group) => group.duplicates.push_back(id),
            None => groups.push(PendingLegendRuleChoice {
                controller,
                name: characteristics.name.clone(),
                duplicates: Vector::unit(id),
            }),
        }
    }
    groups.retain(|g| g.duplicates.len() > 1);
    groups
}

/// `controller` keeps `survivor`; the other duplicates named `name` go to
/// their owners' graveyards.
pub fn resolve_legend_choice(
    state: &GameState,
    controller: PlayerId,
    name: &str,
    survivor: EntityId,
) -> Result<Transition> {
    let Some(index) = state
        .legend_choices
        .iter()
        .position(|c| c.matches(controller, name))
    else {
        return Err(RuleError::NoLegendChoice {
            player: controller,
            name: name.to_string(),
        });
    };
    let choice = &state.legend_choices[index];
    if !choice.duplicates.contains(&survivor) || !state.is_on_battlefield(survivor) {
        return Err(RuleError::InvalidSurvivor {
            survivor,
            name: name.to_string(),
        });
    }

    let mut events = Vec::new();
    let mut next = state.clone();
    next.legend_choices.remove(index);
    for &id in &choice.duplicates {
        if id != survivor
            && next.is_on_battlefield(id)
            && next.controller_of(id) == Some(controller)
        {
            next = next.move_to_graveyard(id, &mut events);
        }
    }
    events.push(GameEvent::LegendRuleResolved {
        controller,
        name: name.to_string(),
        survivor,
    });
    debug!(%controller, name, %survivor, "legend rule resolved");

    Ok(Transition::new(next, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId};
    use crate::core::RulesConfig;
    use crate::zones::ZoneId;

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);

    fn legend() -> CardDefinition {
        CardDefinition::creature(CardId::new(1), "Isamaru", 2, 1).legendary()
    }

    #[test]
    fn test_duplicates_grouped_per_controller() {
        let state = GameState::new(2, RulesConfig::default(), 1);
        let (a, state) = state.create_card(&legend(), P0, ZoneId::Battlefield);
        let (_, state) = state.create_card(&legend(), P1, ZoneId::Battlefield);
        assert!(legend_duplicates(&state).is_empty());

        let (b, state) = state.create_card(&legend(), P0, ZoneId::Battlefield);
        let groups = legend_duplicates(&state);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].controller, P0);
        assert_eq!(groups[0].duplicates.iter().copied().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_resolve_keeps_survivor() {
        let state = GameState::new(2, RulesConfig::default(), 1);
        let (a, state) = state.create_card(&legend(), P0, ZoneId::Battlefield);
        let (b, state) = state.create_card(&legend(), P0, ZoneId::Battlefield);
        let mut state = state;
        state.legend_choices = legend_duplicates(&state).into_iter().collect();

        let transition = resolve_legend_choice(&state, P0, "Isamaru", b).unwrap();
        let next = transition.state;
        assert!(next.is_on_battlefield(b));
        assert_eq!(next.zone_of(a), Some(ZoneId::Graveyard(P0)));
        assert!(next.legend_choices.is_empty());
    }

    #[test]
    fn test_resolve_rejects_bad_requests() {
        let state = GameState::new(2, RulesConfig::default(), 1);
        let (_, state) = state.create_card(&legend(), P0, ZoneId::Battlefield);
        let (_, state) = state.create_card(&legend(), P0, ZoneId::Battlefield);
        let (other, state) = state.create_card(&legend(), P1, ZoneId::Battlefield);
        let mut state = state;
        state.legend_choices = legend_duplicates(&state).into_iter().collect();

        assert!(matches!(
            resolve_legend_choice(&state, P1, "Isamaru", other),
            Err(RuleError::NoLegendChoice { .. })
        ));
        assert!(matches!(
            resolve_legend_choice(&state, P0, "Isamaru", other),
            Err(RuleError::InvalidSurvivor { .. })
        ));
    }
}
