//! Game event types.
//!
//! Events record things that happened during an action, in the order they
//! happened. The trigger detector scans them after the action completes;
//! the presentation and logging layers read them too.
//!
//! ## Design Philosophy
//!
//! Events are a closed sum type. Every consumer matches exhaustively, so a
//! new kind of event is a compile-checked change at every consumption site.
//! Events carry everything an observer needs even after the objects they
//! name have moved on (e.g. `Died` records the controller the creature had
//! on the battlefield).

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{CounterKind, EntityId, LossReason, PlayerId};
use crate::rules::GameResult;
use crate::turn::Step;
use crate::zones::ZoneId;

/// Something that happened during an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    // === Turn structure ===
    TurnBegan {
        turn: u32,
        active_player: PlayerId,
    },
    StepBegan {
        turn: u32,
        step: Step,
        active_player: PlayerId,
    },
    PriorityPassed {
        player: PlayerId,
    },

    // === Zones ===
    /// An entity changed zones. `from` is `None` when it was created there.
    ///
    /// `controller` is the controller after arriving on the battlefield,
    /// otherwise the controller before the move.
    ZoneChanged {
        entity: EntityId,
        from: Option<ZoneId>,
        to: ZoneId,
        controller: Option<PlayerId>,
        card: Option<CardId>,
    },
    /// A creature went from the battlefield to a graveyard.
    Died {
        entity: EntityId,
        controller: PlayerId,
        owner: PlayerId,
        card: Option<CardId>,
    },
    CardDrawn {
        player: PlayerId,
        entity: EntityId,
    },
    /// A player tried to draw from an empty library.
    DrawFailed {
        player: PlayerId,
    },

    // === Life and damage ===
    DamageDealt {
        source: EntityId,
        target: EntityId,
        amount: u32,
        combat: bool,
    },
    LifeGained {
        player: PlayerId,
        amount: u32,
    },
    LifeLost {
        player: PlayerId,
        amount: u32,
    },

    // === Player actions ===
    LandPlayed {
        player: PlayerId,
        entity: EntityId,
    },
    SpellCast {
        player: PlayerId,
        spell: EntityId,
        card: Option<CardId>,
    },
    AbilityActivated {
        player: PlayerId,
        source: EntityId,
        ability: EntityId,
    },
    TriggerStacked {
        controller: PlayerId,
        source: EntityId,
        ability: EntityId,
    },

    // === Stack ===
    Resolved {
        entity: EntityId,
    },
    MovedToGraveyard {
        entity: EntityId,
        owner: PlayerId,
    },
    Countered {
        entity: EntityId,
    },
    Fizzled {
        entity: EntityId,
    },
    /// Removed from the game entirely (abilities, tokens).
    CeasedToExist {
        entity: EntityId,
    },

    // === Permanents ===
    TokenCreated {
        entity: EntityId,
        controller: PlayerId,
    },
    CountersAdded {
        entity: EntityId,
        kind: CounterKind,
        amount: u32,
    },
    /// +1/+1 and -1/-1 counters cancelled each other.
    CountersAnnihilated {
        entity: EntityId,
        amount: u32,
    },
    Attached {
        attachment: EntityId,
        target: EntityId,
    },
    Unattached {
        attachment: EntityId,
    },

    // === Combat ===
    CombatBegan {
        attacking_player: PlayerId,
        defending_player: PlayerId,
    },
    AttackerDeclared {
        attacker: EntityId,
        defending_player: PlayerId,
    },
    BlockerDeclared {
        blocker: EntityId,
        attacker: EntityId,
    },
    CombatEnded,

    // === Game outcome ===
    PlayerLost {
        player: PlayerId,
        reason: LossReason,
    },
    GameOver {
        result: GameResult,
    },
    LegendRuleChoicePending {
        controller: PlayerId,
        name: String,
    },
    LegendRuleResolved {
        controller: PlayerId,
        name: String,
        survivor: EntityId,
    },
}

impl GameEvent {
    /// Short label for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::TurnBegan { .. } => "turn_began",
            GameEvent::StepBegan { .. } => "step_began",
            GameEvent::PriorityPassed { .. } => "priority_passed",
            GameEvent::ZoneChanged { .. } => "zone_changed",
            GameEvent::Died { .. } => "died",
            GameEvent::CardDrawn { .. } => "card_drawn",
            GameEvent::DrawFailed { .. } => "draw_failed",
            GameEvent::DamageDealt { .. } => "damage_dealt",
            GameEvent::LifeGained { .. } => "life_gained",
            GameEvent::LifeLost { .. } => "life_lost",
            GameEvent::LandPlayed { .. } => "land_played",
            GameEvent::SpellCast { .. } => "spell_cast",
            GameEvent::AbilityActivated { .. } => "ability_activated",
            GameEvent::TriggerStacked { .. } => "trigger_stacked",
            GameEvent::Resolved { .. } => "resolved",
            GameEvent::MovedToGraveyard { .. } => "moved_to_graveyard",
            GameEvent::Countered { .. } => "countered",
            GameEvent::Fizzled { .. } => "fizzled",
            GameEvent::CeasedToExist { .. } => "ceased_to_exist",
            GameEvent::TokenCreated { .. } => "token_created",
            GameEvent::CountersAdded { .. } => "counters_added",
            GameEvent::CountersAnnihilated { .. } => "counters_annihilated",
            GameEvent::Attached { .. } => "attached",
            GameEvent::Unattached { .. } => "unattached",
            GameEvent::CombatBegan { .. } => "combat_began",
            GameEvent::AttackerDeclared { .. } => "attacker_declared",
            GameEvent::BlockerDeclared { .. } => "blocker_declared",
            GameEvent::CombatEnded => "combat_ended",
            GameEvent::PlayerLost { .. } => "player_lost",
            GameEvent::GameOver { .. } => "game_over",
            GameEvent::LegendRuleChoicePending { .. } => "legend_rule_choice_pending",
            GameEvent::LegendRuleResolved { .. } => "legend_rule_resolved",
        }
    }

    /// Check if this is a zone change into `zone`.
    #[must_use]
    pub fn is_move_to(&self, zone: ZoneId) -> bool {
        matches!(self, GameEvent::ZoneChanged { to, .. } if *to == zone)
    }

    /// Check if this is a zone change out of `zone`.
    #[must_use]
    pub fn is_move_from(&self, zone: ZoneId) -> bool {
        matches!(self, GameEvent::ZoneChanged { from: Some(from), .. } if *from == zone)
    }
}
