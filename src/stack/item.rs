//! Stack objects.
//!
//! Every object on the stack is an entity carrying an `OnStack` component
//! with its [`StackItem`]. A spell is the card entity itself; an activated
//! or triggered ability is a fresh entity that ceases to exist once it
//! leaves the stack.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};
use crate::effects::{Effect, TargetSpec};
use crate::triggers::TriggerContext;

/// What kind of object is on the stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackItemKind {
    Spell,
    ActivatedAbility,
    TriggeredAbility { context: TriggerContext },
}

/// Stack data for one object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackItem {
    pub kind: StackItemKind,
    pub controller: PlayerId,
    /// For spells, the spell itself; for abilities, the permanent (or
    /// departed object) the ability came from.
    pub source: EntityId,
    pub effect: Effect,
    pub target_spec: Option<TargetSpec>,
    /// Targets chosen when the object was put on the stack.
    pub targets: Vector<EntityId>,
}

impl StackItem {
    #[must_use]
    pub fn spell(
        controller: PlayerId,
        spell: EntityId,
        effect: Effect,
        target_spec: Option<TargetSpec>,
        targets: &[EntityId],
    ) -> Self {
        Self {
            kind: StackItemKind::Spell,
            controller,
            source: spell,
            effect,
            target_spec,
            targets: targets.iter().copied().collect(),
        }
    }

    #[must_use]
    pub fn ability(
        kind: StackItemKind,
        controller: PlayerId,
        source: EntityId,
        effect: Effect,
        target_spec: Option<TargetSpec>,
        targets: &[EntityId],
    ) -> Self {
        debug_assert!(!matches!(kind, StackItemKind::Spell));
        Self {
            kind,
            controller,
            source,
            effect,
            target_spec,
            targets: targets.iter().copied().collect(),
        }
    }

    #[must_use]
    pub fn is_spell(&self) -> bool {
        matches!(self.kind, StackItemKind::Spell)
    }

    /// Abilities are not cards; they cease to exist when they leave.
    #[must_use]
    pub fn is_ability(&self) -> bool {
        !self.is_spell()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spell_vs_ability() {
        let spell = StackItem::spell(PlayerId(0), EntityId(4), Effect::draw(1), None, &[]);
        assert!(spell.is_spell());
        assert_eq!(spell.source, EntityId(4));

        let ability = StackItem::ability(
            StackItemKind::ActivatedAbility,
            PlayerId(1),
            EntityId(5),
            Effect::none(),
            None,
            &[EntityId(0)],
        );
        assert!(ability.is_ability());
        assert_eq!(ability.targets.len(), 1);
    }
}
