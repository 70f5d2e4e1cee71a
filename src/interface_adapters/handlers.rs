use crate::domain::entities::GameId;
use crate::domain::errors::ArenaError;
use crate::domain::systems::victory::Victory;
use crate::interface_adapters::protocol::{
    AdminRequest, AdvanceRoundRequest, AdvanceRoundResponse, CreateGameRequest,
    CreateGameResponse, ErrorResponse, JoinGameRequest, JoinGameResponse, SubmitActionRequest,
    SubmitActionResponse, UnlockResponse,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{ActionSubmission, GameSettings, GameStatus, JoinRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;
use tracing::{error, info};

type ApiError = (StatusCode, Json<ErrorResponse>);

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

#[tracing::instrument(name = "create_game", skip_all, fields(kind = ?body.kind))]
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>, ApiError> {
    require_admin(&state, &headers)?;

    let settings = GameSettings {
        kind: body.kind,
        team_based: body.team_based,
        has_zone_deactivation: body.has_zone_deactivation,
    };
    let (game, round) = state
        .engine
        .start_game(settings)
        .await
        .map_err(map_arena_error)?;

    Ok(Json(CreateGameResponse {
        game_id: game.id,
        round_id: round.id,
        round_number: round.number,
        ring_system_algorithm: game.ring_system_algorithm,
    }))
}

#[tracing::instrument(name = "join_game", skip_all, fields(game_id = %game_id))]
pub async fn join_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<GameId>,
    Json(body): Json<JoinGameRequest>,
) -> Result<Json<JoinGameResponse>, ApiError> {
    let request = JoinRequest {
        user_id: body.user_id,
        team_id: body.team_id,
        spectator: body.spectator,
    };
    let player = state
        .engine
        .join_game(game_id, request)
        .await
        .map_err(map_arena_error)?;

    Ok(Json(JoinGameResponse {
        player_id: player.id,
        zone_id: player.zone_id,
        health: player.health,
        spectator: player.is_spectator,
    }))
}

#[tracing::instrument(
    name = "submit_action",
    skip_all,
    fields(game_id = %game_id, player_id = body.player_id)
)]
pub async fn submit_action(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<GameId>,
    Json(body): Json<SubmitActionRequest>,
) -> Result<Json<SubmitActionResponse>, ApiError> {
    let submission = ActionSubmission {
        player_id: body.player_id,
        game_id,
        round_id: body.round_id,
        action: body.action,
    };
    let queued = state
        .engine
        .submit_action(submission)
        .await
        .map_err(map_arena_error)?;

    Ok(Json(SubmitActionResponse {
        player_id: queued.player_id,
        round_id: queued.round_id,
        kind: queued.kind(),
    }))
}

#[tracing::instrument(name = "advance_round", skip_all, fields(game_id = %game_id))]
pub async fn advance_round(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<GameId>,
    headers: HeaderMap,
    Json(body): Json<AdvanceRoundRequest>,
) -> Result<Json<AdvanceRoundResponse>, ApiError> {
    require_admin(&state, &headers)?;

    let report = state
        .engine
        .advance_round(game_id, &body.requested_by, body.everyone_visible)
        .await
        .map_err(map_arena_error)?;

    let (winner_player_id, winner_team_id) = match report.victory {
        Some(Victory::Player(id)) => (Some(id), None),
        Some(Victory::Team(id)) => (None, Some(id)),
        Some(Victory::NoSurvivors) | None => (None, None),
    };
    Ok(Json(AdvanceRoundResponse {
        resolved_round_id: report.resolved_round_id,
        round_number: report.round_number,
        actions_resolved: report.actions_resolved,
        zone_order: report.zone_order,
        game_over: report.victory.is_some(),
        winner_player_id,
        winner_team_id,
        next_round_id: report.next_round.as_ref().map(|round| round.id),
        next_round_number: report.next_round.as_ref().map(|round| round.number),
        everyone_visible: report
            .next_round
            .as_ref()
            .is_some_and(|round| round.is_everyone_visible),
        deactivated_zones: report.ring.map(|ring| ring.deactivated).unwrap_or_default(),
    }))
}

#[tracing::instrument(name = "unlock_game", skip_all, fields(game_id = %game_id))]
pub async fn unlock_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<GameId>,
    headers: HeaderMap,
    Json(body): Json<AdminRequest>,
) -> Result<Json<UnlockResponse>, ApiError> {
    require_admin(&state, &headers)?;

    let cleared = state
        .engine
        .clear_resolving(game_id, &body.requested_by)
        .await;
    Ok(Json(UnlockResponse { cleared }))
}

#[tracing::instrument(name = "game_status", skip_all, fields(game_id = %game_id))]
pub async fn game_status(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<GameId>,
) -> Result<Json<GameStatus>, ApiError> {
    state
        .engine
        .game_status(game_id)
        .await
        .map(Json)
        .map_err(map_arena_error)
}

// Admin routes need the configured token; with none configured they stay closed.
fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let supplied = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    match (state.admin_token.as_deref(), supplied) {
        (Some(expected), Some(supplied)) if expected == supplied => Ok(()),
        _ => {
            info!("admin request rejected");
            Err(map_arena_error(ArenaError::Authorization))
        }
    }
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}

fn map_arena_error(err: ArenaError) -> ApiError {
    match &err {
        ArenaError::Validation(_) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
        ArenaError::Authorization => error_response(StatusCode::FORBIDDEN, &err.to_string()),
        ArenaError::NotFound { .. } => error_response(StatusCode::NOT_FOUND, &err.to_string()),
        ArenaError::Concurrency(_) => error_response(StatusCode::CONFLICT, &err.to_string()),
        ArenaError::FatalStore(reason) => {
            error!(error = %reason, "state store failure");
            error_response(StatusCode::BAD_GATEWAY, "storage error")
        }
    }
}
