use crate::domain::actions::{ActionKind, PlayerAction, RoundAction};
use crate::domain::entities::{Game, GameId, Player, PlayerId, RoundId};
use crate::domain::errors::ArenaError;
use crate::domain::ports::GameStateStore;
use crate::use_cases::action_queue::ActionQueue;

// A validated command from the chat transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSubmission {
    pub player_id: PlayerId,
    pub game_id: GameId,
    // Round the player saw when issuing the command, if the transport knows it.
    pub round_id: Option<RoundId>,
    pub action: PlayerAction,
}

// Submission use case. Callers serialize it against round resolution.
pub struct SubmitActionUseCase<'a, S> {
    pub store: &'a S,
}

impl<S> SubmitActionUseCase<'_, S>
where
    S: GameStateStore,
{
    pub async fn execute(&self, submission: ActionSubmission) -> Result<RoundAction, ArenaError> {
        let player = self
            .store
            .player(submission.player_id)
            .await
            .map_err(ArenaError::FatalStore)?
            .ok_or_else(|| ArenaError::not_found("player", submission.player_id))?;
        if player.game_id != submission.game_id {
            return Err(ArenaError::Validation(
                "player is not part of this game".to_string(),
            ));
        }

        let game = self
            .store
            .game(submission.game_id)
            .await
            .map_err(ArenaError::FatalStore)?
            .ok_or_else(|| ArenaError::not_found("game", submission.game_id))?;
        if !game.is_active {
            return Err(ArenaError::Concurrency("game has ended".to_string()));
        }

        let round = self
            .store
            .active_round(game.id)
            .await
            .map_err(ArenaError::FatalStore)?
            .ok_or_else(|| ArenaError::Concurrency("no round is open".to_string()))?;
        if submission.round_id.is_some_and(|id| id != round.id) {
            return Err(ArenaError::Concurrency("round closed".to_string()));
        }

        self.validate(&game, &player, &submission.action).await?;

        ActionQueue { store: self.store }
            .set_action(player.id, round.id, submission.action)
            .await
    }

    async fn validate(
        &self,
        game: &Game,
        player: &Player,
        action: &PlayerAction,
    ) -> Result<(), ArenaError> {
        let kind = action.kind();
        if kind.requires_alive_actor() && !player.is_alive() {
            return Err(ArenaError::Validation(
                "dead players can only cheer".to_string(),
            ));
        }
        if player.is_spectator && kind != ActionKind::Cheer {
            return Err(ArenaError::Validation(
                "spectators can only cheer".to_string(),
            ));
        }

        match action {
            PlayerAction::Hunt {
                weapon_id,
                target_player_id,
            } => {
                let missing = weapon_id.filter(|id| player.inventory.weapon(*id).is_none());
                if let Some(weapon_id) = missing {
                    return Err(ArenaError::Validation(format!(
                        "weapon {weapon_id} is not in your inventory"
                    )));
                }
                if *target_player_id == Some(player.id) {
                    return Err(ArenaError::Validation("you cannot hunt yourself".to_string()));
                }
            }
            PlayerAction::Heal { healthkit_id } => {
                let held = match healthkit_id {
                    Some(id) => player
                        .inventory
                        .healthkits
                        .iter()
                        .any(|owned| owned.item.id == *id && owned.is_usable()),
                    None => player.inventory.healthkit_count() > 0,
                };
                if !held {
                    return Err(ArenaError::Validation("no healthkit to use".to_string()));
                }
            }
            PlayerAction::Revive { target_player_id } => {
                if !game.team_based {
                    return Err(ArenaError::Validation(
                        "revive is only available in team games".to_string(),
                    ));
                }
                if player.inventory.healthkit_count() == 0 {
                    return Err(ArenaError::Validation("no healthkit to use".to_string()));
                }
                let target = self.game_player(game.id, *target_player_id).await?;
                if !target.is_teammate_of(player) {
                    return Err(ArenaError::Validation(
                        "you can only revive teammates".to_string(),
                    ));
                }
                if target.is_alive() {
                    return Err(ArenaError::Validation("teammate is still up".to_string()));
                }
            }
            PlayerAction::Cheer { target_player_id } => {
                if *target_player_id == player.id {
                    return Err(ArenaError::Validation(
                        "you cannot cheer for yourself".to_string(),
                    ));
                }
                let target = self.game_player(game.id, *target_player_id).await?;
                if target.is_spectator {
                    return Err(ArenaError::Validation(
                        "spectators cannot be cheered".to_string(),
                    ));
                }
            }
            PlayerAction::ChangeLocation { location_id } => {
                let layout = self.store.zones().await.map_err(ArenaError::FatalStore)?;
                let zones = game.zone_view(layout);
                let zone = zones
                    .iter()
                    .find(|zone| zone.id == *location_id)
                    .ok_or_else(|| ArenaError::not_found("zone", location_id))?;
                if !zone.is_playable() || zone.is_spectator {
                    return Err(ArenaError::Validation(format!(
                        "{} is closed",
                        zone.name
                    )));
                }
                if player.zone_id == Some(zone.id) {
                    return Err(ArenaError::Validation(format!(
                        "you are already in {}",
                        zone.name
                    )));
                }
            }
            PlayerAction::SearchHealth
            | PlayerAction::SearchArmor
            | PlayerAction::SearchWeapon
            | PlayerAction::Hide
            | PlayerAction::StayOnLocation => {}
        }
        Ok(())
    }

    async fn game_player(
        &self,
        game_id: GameId,
        player_id: PlayerId,
    ) -> Result<Player, ArenaError> {
        self.store
            .player(player_id)
            .await
            .map_err(ArenaError::FatalStore)?
            .filter(|player| player.game_id == game_id)
            .ok_or_else(|| ArenaError::not_found("player", player_id))
    }
}
