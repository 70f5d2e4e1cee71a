// Persisted game entities shared by the engine and its adapters.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::abilities::ModifierSet;
use crate::domain::items::Inventory;

pub type GameId = Uuid;
pub type RoundId = Uuid;
pub type PlayerId = u64;
pub type ZoneId = u32;
pub type TeamId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Arena,
    Tower,
}

// A participant in one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub user_id: String,
    pub game_id: GameId,
    pub team_id: Option<TeamId>,
    pub zone_id: Option<ZoneId>,
    pub health: u32,
    pub is_visible: bool,
    pub is_spectator: bool,
    pub is_boss: bool,
    pub luck_boost: f64,
    pub abilities: ModifierSet,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub cheers_received: u32,
}

impl Player {
    pub fn new(id: PlayerId, user_id: impl Into<String>, game_id: GameId, health: u32) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            game_id,
            team_id: None,
            zone_id: None,
            health,
            is_visible: true,
            is_spectator: false,
            is_boss: false,
            luck_boost: 0.0,
            abilities: ModifierSet::default(),
            inventory: Inventory::default(),
            cheers_received: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    // Living, non-spectator participants are the ones still in the fight.
    pub fn is_contender(&self) -> bool {
        self.is_alive() && !self.is_spectator
    }

    pub fn is_teammate_of(&self, other: &Player) -> bool {
        matches!((self.team_id, other.team_id), (Some(a), Some(b)) if a == b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub game_id: GameId,
    pub number: u32,
    pub is_active: bool,
    pub is_everyone_visible: bool,
    pub started_at: u64,
    pub ended_at: Option<u64>,
}

impl Round {
    pub fn start(game_id: GameId, number: u32, is_everyone_visible: bool, now: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id,
            number,
            is_active: true,
            is_everyone_visible,
            started_at: now,
            ended_at: None,
        }
    }

    pub fn end(&mut self, now: u64) {
        self.is_active = false;
        self.ended_at = Some(now);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub emoji: String,
    // Shrink tier code such as "1A", "2C" or "5".
    pub ring: String,
    pub is_active: bool,
    pub is_archived: bool,
    // The streaming zone spectators watch from; never shrinks or fills up.
    #[serde(default)]
    pub is_spectator: bool,
}

impl Zone {
    pub fn is_playable(&self) -> bool {
        self.is_active && !self.is_archived
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub kind: GameKind,
    pub is_active: bool,
    pub team_based: bool,
    pub has_zone_deactivation: bool,
    pub ring_system_algorithm: char,
    pub current_ring_deactivation: u32,
    pub inactive_zone_penalty_power: u32,
    // Zones this game's ring has closed. The layout itself is shared by every game.
    #[serde(default)]
    pub closed_zones: BTreeSet<ZoneId>,
    pub created_at: u64,
    pub ended_at: Option<u64>,
}

impl Game {
    /// The shared layout as seen from this game.
    pub fn zone_view(&self, layout: Vec<Zone>) -> Vec<Zone> {
        layout
            .into_iter()
            .map(|mut zone| {
                if self.closed_zones.contains(&zone.id) {
                    zone.is_active = false;
                }
                zone
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPerformance {
    pub player_id: PlayerId,
    pub game_id: GameId,
    pub damage_dealt: u32,
    pub healed: u32,
    pub kills: u32,
    pub weapons_found: u32,
    pub cheers_given: u32,
    pub cheers_received: u32,
    pub first_blood: bool,
}

impl PlayerPerformance {
    pub fn new(player_id: PlayerId, game_id: GameId) -> Self {
        Self {
            player_id,
            game_id,
            ..Self::default()
        }
    }
}
