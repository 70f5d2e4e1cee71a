// Player intents queued for a round.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{PlayerId, RoundId, ZoneId};
use crate::domain::items::ItemId;

/// What a player wants to do this round, together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PlayerAction {
    SearchHealth,
    SearchArmor,
    SearchWeapon,
    Heal {
        #[serde(default)]
        healthkit_id: Option<ItemId>,
    },
    Revive {
        target_player_id: PlayerId,
    },
    Hide,
    Hunt {
        #[serde(default)]
        weapon_id: Option<ItemId>,
        #[serde(default)]
        target_player_id: Option<PlayerId>,
    },
    Cheer {
        target_player_id: PlayerId,
    },
    ChangeLocation {
        location_id: ZoneId,
    },
    StayOnLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    SearchHealth,
    SearchArmor,
    SearchWeapon,
    Heal,
    Revive,
    Hide,
    Hunt,
    Cheer,
    ChangeLocation,
    StayOnLocation,
}

impl ActionKind {
    /// Order in which a zone's queue is drained. Movement runs after every zone.
    pub const ZONE_ORDER: [ActionKind; 9] = [
        ActionKind::SearchHealth,
        ActionKind::SearchArmor,
        ActionKind::SearchWeapon,
        ActionKind::Heal,
        ActionKind::Revive,
        ActionKind::Hide,
        ActionKind::Hunt,
        ActionKind::Cheer,
        ActionKind::StayOnLocation,
    ];

    // Dead players and spectators may still cheer from the sidelines.
    pub fn requires_alive_actor(self) -> bool {
        !matches!(self, ActionKind::Cheer)
    }
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::SearchHealth => ActionKind::SearchHealth,
            PlayerAction::SearchArmor => ActionKind::SearchArmor,
            PlayerAction::SearchWeapon => ActionKind::SearchWeapon,
            PlayerAction::Heal { .. } => ActionKind::Heal,
            PlayerAction::Revive { .. } => ActionKind::Revive,
            PlayerAction::Hide => ActionKind::Hide,
            PlayerAction::Hunt { .. } => ActionKind::Hunt,
            PlayerAction::Cheer { .. } => ActionKind::Cheer,
            PlayerAction::ChangeLocation { .. } => ActionKind::ChangeLocation,
            PlayerAction::StayOnLocation => ActionKind::StayOnLocation,
        }
    }
}

// One pending or completed intent. Keyed by (player_id, round_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundAction {
    pub player_id: PlayerId,
    pub round_id: RoundId,
    pub action: PlayerAction,
    pub is_completed: bool,
    pub completed_at: Option<u64>,
}

impl RoundAction {
    pub fn pending(player_id: PlayerId, round_id: RoundId, action: PlayerAction) -> Self {
        Self {
            player_id,
            round_id,
            action,
            is_completed: false,
            completed_at: None,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }

    // Completing twice keeps the first completion time.
    pub fn complete(&mut self, now: u64) {
        if !self.is_completed {
            self.is_completed = true;
            self.completed_at = Some(now);
        }
    }
}
