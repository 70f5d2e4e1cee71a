use serde::{Deserialize, Serialize};

use crate::domain::actions::{ActionKind, PlayerAction};
use crate::domain::entities::{GameId, GameKind, PlayerId, RoundId, TeamId, ZoneId};

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub kind: GameKind,
    #[serde(default)]
    pub team_based: bool,
    // Zones shrink by default; set false for a fixed map.
    #[serde(default = "enabled")]
    pub has_zone_deactivation: bool,
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct CreateGameResponse {
    pub game_id: GameId,
    pub round_id: RoundId,
    pub round_number: u32,
    pub ring_system_algorithm: char,
}

#[derive(Debug, Deserialize)]
pub struct JoinGameRequest {
    // Chat-platform identity of the joining user.
    pub user_id: String,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub spectator: bool,
}

#[derive(Debug, Serialize)]
pub struct JoinGameResponse {
    pub player_id: PlayerId,
    pub zone_id: Option<ZoneId>,
    pub health: u32,
    pub spectator: bool,
}

#[derive(Debug, Deserialize)]
pub struct SubmitActionRequest {
    pub player_id: PlayerId,
    // Round the command was issued against; stale ids are rejected.
    #[serde(default)]
    pub round_id: Option<RoundId>,
    pub action: PlayerAction,
}

#[derive(Debug, Serialize)]
pub struct SubmitActionResponse {
    pub player_id: PlayerId,
    pub round_id: RoundId,
    pub kind: ActionKind,
}

#[derive(Debug, Deserialize)]
pub struct AdminRequest {
    // Who asked, for the audit log.
    pub requested_by: String,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceRoundRequest {
    pub requested_by: String,
    // Turns off hiding from the next round until the game ends.
    #[serde(default)]
    pub everyone_visible: bool,
}

#[derive(Debug, Serialize)]
pub struct AdvanceRoundResponse {
    pub resolved_round_id: RoundId,
    pub round_number: u32,
    pub actions_resolved: usize,
    pub zone_order: Vec<ZoneId>,
    pub game_over: bool,
    pub winner_player_id: Option<PlayerId>,
    pub winner_team_id: Option<TeamId>,
    pub next_round_id: Option<RoundId>,
    pub next_round_number: Option<u32>,
    pub everyone_visible: bool,
    pub deactivated_zones: Vec<ZoneId>,
}

#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub cleared: bool,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
