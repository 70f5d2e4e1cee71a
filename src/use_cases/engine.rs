// Engine facade shared by every transport: owns the per-game resolving flags
// and the seeded random source.

use std::collections::HashSet;
use std::sync::Arc;

use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::domain::actions::RoundAction;
use crate::domain::entities::{Game, GameId, Player, Round, Zone};
use crate::domain::errors::ArenaError;
use crate::domain::ports::{Clock, GameStateStore};
use crate::domain::tuning::ArenaTuning;
use crate::use_cases::lifecycle::{GameLifecycle, GameSettings, JoinRequest};
use crate::use_cases::narration::NarrationPublisher;
use crate::use_cases::resolution::{EngineRng, RoundReport, RoundResolver};
use crate::use_cases::submit_action::{ActionSubmission, SubmitActionUseCase};

/// Snapshot returned to status queries.
#[derive(Debug, Clone, Serialize)]
pub struct GameStatus {
    pub game: Game,
    pub round: Option<Round>,
    pub players: Vec<Player>,
    pub zones: Vec<Zone>,
    pub resolving: bool,
}

pub struct ArenaEngine<S, C> {
    store: Arc<S>,
    clock: C,
    tuning: ArenaTuning,
    narration: NarrationPublisher,
    rng: std::sync::Mutex<EngineRng>,
    // Games whose round is being resolved, or whose last pass failed to commit.
    resolving: Mutex<HashSet<GameId>>,
}

impl<S, C> ArenaEngine<S, C>
where
    S: GameStateStore,
    C: Clock,
{
    pub fn new(
        store: Arc<S>,
        clock: C,
        tuning: ArenaTuning,
        narration: NarrationPublisher,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => EngineRng::seed_from_u64(seed),
            None => EngineRng::from_rng(&mut rand::rng()),
        };
        Self {
            store,
            clock,
            tuning,
            narration,
            rng: std::sync::Mutex::new(rng),
            resolving: Mutex::new(HashSet::new()),
        }
    }

    /// Queues an action. Rejected while the game's round is resolving.
    pub async fn submit_action(
        &self,
        submission: ActionSubmission,
    ) -> Result<RoundAction, ArenaError> {
        // Held across the write so a resolution pass cannot start mid-submission.
        let resolving = self.resolving.lock().await;
        if resolving.contains(&submission.game_id) {
            return Err(ArenaError::Concurrency("round is resolving".to_string()));
        }
        let use_case = SubmitActionUseCase {
            store: self.store.as_ref(),
        };
        use_case.execute(submission).await
    }

    /// Resolves the open round of `game_id`. A pass that fails to commit
    /// leaves the game flagged until `clear_resolving` is called.
    /// `reveal_next` turns on everyone-visible for every later round.
    pub async fn advance_round(
        &self,
        game_id: GameId,
        requested_by: &str,
        reveal_next: bool,
    ) -> Result<RoundReport, ArenaError> {
        {
            let mut resolving = self.resolving.lock().await;
            if !resolving.insert(game_id) {
                return Err(ArenaError::Concurrency(
                    "round is already resolving".to_string(),
                ));
            }
        }
        info!(game_id = %game_id, requested_by, reveal_next, "round resolution requested");

        let mut rng = self.fork_rng();
        let resolver = RoundResolver {
            store: self.store.as_ref(),
            clock: &self.clock,
            tuning: &self.tuning,
            narration: &self.narration,
        };
        let result = resolver.resolve(game_id, reveal_next, &mut rng).await;

        match &result {
            Err(ArenaError::FatalStore(err)) => {
                error!(
                    game_id = %game_id,
                    error = %err,
                    "resolution aborted; game stays locked until cleared"
                );
            }
            _ => {
                self.resolving.lock().await.remove(&game_id);
            }
        }
        result
    }

    /// Drops a stuck resolving flag. Returns whether one was set.
    pub async fn clear_resolving(&self, game_id: GameId, requested_by: &str) -> bool {
        let cleared = self.resolving.lock().await.remove(&game_id);
        if cleared {
            warn!(game_id = %game_id, requested_by, "resolving flag cleared");
        }
        cleared
    }

    pub async fn is_resolving(&self, game_id: GameId) -> bool {
        self.resolving.lock().await.contains(&game_id)
    }

    pub async fn start_game(&self, settings: GameSettings) -> Result<(Game, Round), ArenaError> {
        let mut rng = self.fork_rng();
        self.lifecycle().start_game(settings, &mut rng).await
    }

    pub async fn join_game(
        &self,
        game_id: GameId,
        request: JoinRequest,
    ) -> Result<Player, ArenaError> {
        let resolving = self.resolving.lock().await;
        if resolving.contains(&game_id) {
            return Err(ArenaError::Concurrency("round is resolving".to_string()));
        }
        let mut rng = self.fork_rng();
        self.lifecycle().join_game(game_id, request, &mut rng).await
    }

    pub async fn game_status(&self, game_id: GameId) -> Result<GameStatus, ArenaError> {
        let game = self
            .store
            .game(game_id)
            .await
            .map_err(ArenaError::FatalStore)?
            .ok_or_else(|| ArenaError::not_found("game", game_id))?;
        let round = self
            .store
            .active_round(game_id)
            .await
            .map_err(ArenaError::FatalStore)?;
        let players = self
            .store
            .players(game_id)
            .await
            .map_err(ArenaError::FatalStore)?;
        let layout = self.store.zones().await.map_err(ArenaError::FatalStore)?;
        let zones = game.zone_view(layout);
        Ok(GameStatus {
            game,
            round,
            players,
            zones,
            resolving: self.is_resolving(game_id).await,
        })
    }

    fn lifecycle(&self) -> GameLifecycle<'_, S, C> {
        GameLifecycle {
            store: self.store.as_ref(),
            clock: &self.clock,
            tuning: &self.tuning,
        }
    }

    // Each pass draws from its own stream so the master lock is never held
    // across an await.
    fn fork_rng(&self) -> EngineRng {
        let mut master = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        EngineRng::from_rng(&mut *master)
    }
}
