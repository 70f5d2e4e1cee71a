// Game creation, joining and shutdown.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{Game, GameId, GameKind, Player, Round, TeamId, Zone, ZoneId};
use crate::domain::errors::ArenaError;
use crate::domain::narration::Narration;
use crate::domain::ports::{Clock, GameStateStore, StoreWrite};
use crate::domain::systems::ring::{choose_ring_algorithm, zone_capacity};
use crate::domain::tuning::ArenaTuning;
use crate::domain::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub kind: GameKind,
    pub team_based: bool,
    pub has_zone_deactivation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub user_id: String,
    pub team_id: Option<TeamId>,
    pub spectator: bool,
}

pub struct GameLifecycle<'a, S, C> {
    pub store: &'a S,
    pub clock: &'a C,
    pub tuning: &'a ArenaTuning,
}

impl<S, C> GameLifecycle<'_, S, C>
where
    S: GameStateStore,
    C: Clock,
{
    /// Opens a new game of `settings.kind` with its first round.
    pub async fn start_game<R: Rng + ?Sized>(
        &self,
        settings: GameSettings,
        rng: &mut R,
    ) -> Result<(Game, Round), ArenaError> {
        let existing = self
            .store
            .active_game(settings.kind)
            .await
            .map_err(ArenaError::FatalStore)?;
        if existing.is_some() {
            return Err(ArenaError::Concurrency(format!(
                "a {:?} game is already running",
                settings.kind
            )));
        }

        let now = self.clock.now_epoch_seconds();
        let zones = self.store.zones().await.map_err(ArenaError::FatalStore)?;
        let ring = &self.tuning.ring;
        let game = Game {
            id: Uuid::new_v4(),
            kind: settings.kind,
            is_active: true,
            team_based: settings.team_based,
            has_zone_deactivation: settings.has_zone_deactivation,
            ring_system_algorithm: choose_ring_algorithm(&zones, ring.default_algorithm, rng),
            current_ring_deactivation: ring.first_tier,
            inactive_zone_penalty_power: 0,
            closed_zones: BTreeSet::new(),
            created_at: now,
            ended_at: None,
        };
        let round = Round::start(game.id, 1, false, now);

        let writes = vec![
            StoreWrite::Game(game.clone()),
            StoreWrite::Round(round.clone()),
        ];
        self.store
            .apply_batch(writes)
            .await
            .map_err(ArenaError::FatalStore)?;

        info!(
            game_id = %game.id,
            kind = ?game.kind,
            ring = %game.ring_system_algorithm,
            "game started"
        );
        Ok((game, round))
    }

    pub async fn join_game<R: Rng + ?Sized>(
        &self,
        game_id: GameId,
        request: JoinRequest,
        rng: &mut R,
    ) -> Result<Player, ArenaError> {
        let user_id = request.user_id.trim();
        if user_id.is_empty() {
            return Err(ArenaError::Validation("user_id is required".to_string()));
        }

        let game = self
            .store
            .game(game_id)
            .await
            .map_err(ArenaError::FatalStore)?
            .ok_or_else(|| ArenaError::not_found("game", game_id))?;
        if !game.is_active {
            return Err(ArenaError::Concurrency("game has ended".to_string()));
        }
        if game.team_based && !request.spectator && request.team_id.is_none() {
            return Err(ArenaError::Validation(
                "team_id is required in team games".to_string(),
            ));
        }

        let players = self
            .store
            .players(game_id)
            .await
            .map_err(ArenaError::FatalStore)?;
        if players.iter().any(|player| player.user_id == user_id) {
            return Err(ArenaError::Validation("already joined this game".to_string()));
        }

        let layout = self.store.zones().await.map_err(ArenaError::FatalStore)?;
        let zones = game.zone_view(layout);
        let zone_id = if request.spectator {
            zones
                .iter()
                .find(|zone| zone.is_spectator)
                .map(|zone| zone.id)
                .ok_or_else(|| ArenaError::not_found("zone", "spectator"))?
        } else {
            self.pick_open_zone(&zones, &players, rng)?
        };

        let player_id = self
            .store
            .next_player_id()
            .await
            .map_err(ArenaError::FatalStore)?;
        let mut player = Player::new(player_id, user_id, game_id, self.tuning.player.max_health);
        player.team_id = request.team_id;
        player.zone_id = Some(zone_id);
        player.is_spectator = request.spectator;

        self.store
            .apply_batch(vec![StoreWrite::Player(player.clone())])
            .await
            .map_err(ArenaError::FatalStore)?;

        info!(
            game_id = %game_id,
            player_id = player.id,
            zone_id,
            spectator = player.is_spectator,
            "player joined"
        );
        Ok(player)
    }

    fn pick_open_zone<R: Rng + ?Sized>(
        &self,
        zones: &[Zone],
        players: &[Player],
        rng: &mut R,
    ) -> Result<ZoneId, ArenaError> {
        let capacity = capacity_for(zones, self.tuning.ring.base_zone_capacity);
        let open: Vec<ZoneId> = zones
            .iter()
            .filter(|zone| zone.is_playable() && !zone.is_spectator)
            .filter(|zone| occupancy(players, zone.id) < capacity)
            .map(|zone| zone.id)
            .collect();
        open.choose(rng)
            .copied()
            .ok_or_else(|| ArenaError::Validation("every zone is full".to_string()))
    }
}

/// Current per-zone capacity for a zone layout.
pub fn capacity_for(zones: &[Zone], base: u32) -> u32 {
    let ringed = zones.iter().filter(|zone| !zone.is_spectator && !zone.is_archived);
    let (active, closed) = ringed.fold((0, 0), |(active, closed), zone| {
        if zone.is_active {
            (active + 1, closed)
        } else {
            (active, closed + 1)
        }
    });
    zone_capacity(base, active, closed)
}

pub fn occupancy(players: &[Player], zone_id: ZoneId) -> u32 {
    let count = players
        .iter()
        .filter(|player| player.zone_id == Some(zone_id) && !player.is_spectator)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Ends the game in `world`: closes the round and clears every player's zone.
pub fn end_game(world: &mut World, now: u64) -> Vec<Narration> {
    let game = world.game_mut();
    game.is_active = false;
    game.ended_at = Some(now);
    world.round.end(now);

    let ids: Vec<_> = world.players().map(|player| player.id).collect();
    for id in ids {
        if let Some(player) = world.player_mut(id) {
            player.zone_id = None;
        }
    }
    vec![Narration::GameEnded]
}
