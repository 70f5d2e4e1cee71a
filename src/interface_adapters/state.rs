use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{Mutex, broadcast};

use crate::domain::actions::RoundAction;
use crate::domain::entities::{
    Game, GameId, GameKind, Player, PlayerId, PlayerPerformance, Round, RoundId, Zone, ZoneId,
};
use crate::domain::items::ItemCatalog;
use crate::domain::narration::NarrationEvent;
use crate::domain::ports::{Clock, GameStateStore, StoreWrite};
use crate::use_cases::engine::ArenaEngine;

pub type Engine = ArenaEngine<InMemoryGameStore, SystemClock>;

// Application state shared by the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    // Required in the x-admin-token header for admin routes; None disables them.
    pub admin_token: Option<Arc<str>>,
    // In-process narration feed for local subscribers.
    pub narration: broadcast::Sender<NarrationEvent>,
}

#[derive(Debug, Clone, Default)]
struct ArenaTables {
    games: HashMap<GameId, Game>,
    rounds: HashMap<RoundId, Round>,
    players: BTreeMap<PlayerId, Player>,
    actions: BTreeMap<(RoundId, PlayerId), RoundAction>,
    zones: BTreeMap<ZoneId, Zone>,
    performances: BTreeMap<(GameId, PlayerId), PlayerPerformance>,
    catalog: ItemCatalog,
    last_player_id: PlayerId,
}

impl ArenaTables {
    fn apply(&mut self, write: StoreWrite) {
        match write {
            StoreWrite::Game(game) => {
                self.games.insert(game.id, game);
            }
            StoreWrite::Round(round) => {
                self.rounds.insert(round.id, round);
            }
            StoreWrite::Player(player) => {
                self.last_player_id = self.last_player_id.max(player.id);
                self.players.insert(player.id, player);
            }
            StoreWrite::Action(action) => {
                self.actions.insert((action.round_id, action.player_id), action);
            }
            StoreWrite::Performance(performance) => {
                let key = (performance.game_id, performance.player_id);
                self.performances.insert(key, performance);
            }
        }
    }

    // Constraints the store enforces on every committed batch.
    fn check(&self) -> Result<(), String> {
        let mut open_rounds = HashSet::new();
        for round in self.rounds.values().filter(|round| round.is_active) {
            if !open_rounds.insert(round.game_id) {
                return Err(format!("game {} has more than one active round", round.game_id));
            }
        }

        let mut running: HashSet<GameKind> = HashSet::new();
        for game in self.games.values().filter(|game| game.is_active) {
            if !running.insert(game.kind) {
                return Err(format!("more than one active {:?} game", game.kind));
            }
        }

        for (round_id, _) in self.actions.keys() {
            if !self.rounds.contains_key(round_id) {
                return Err(format!("action references unknown round {round_id}"));
            }
        }
        Ok(())
    }
}

// In-memory game state adapter. Batches apply to a copy of the tables and
// replace them only when every write succeeded.
#[derive(Clone)]
pub struct InMemoryGameStore {
    tables: Arc<Mutex<ArenaTables>>,
}

impl InMemoryGameStore {
    pub fn new(zones: Vec<Zone>, catalog: ItemCatalog) -> Self {
        let tables = ArenaTables {
            zones: zones.into_iter().map(|zone| (zone.id, zone)).collect(),
            catalog,
            ..ArenaTables::default()
        };
        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }
}

#[async_trait]
impl GameStateStore for InMemoryGameStore {
    async fn game(&self, game_id: GameId) -> Result<Option<Game>, String> {
        let tables = self.tables.lock().await;
        Ok(tables.games.get(&game_id).cloned())
    }

    async fn active_game(&self, kind: GameKind) -> Result<Option<Game>, String> {
        let tables = self.tables.lock().await;
        Ok(tables
            .games
            .values()
            .find(|game| game.is_active && game.kind == kind)
            .cloned())
    }

    async fn player(&self, player_id: PlayerId) -> Result<Option<Player>, String> {
        let tables = self.tables.lock().await;
        Ok(tables.players.get(&player_id).cloned())
    }

    async fn players(&self, game_id: GameId) -> Result<Vec<Player>, String> {
        let tables = self.tables.lock().await;
        Ok(tables
            .players
            .values()
            .filter(|player| player.game_id == game_id)
            .cloned()
            .collect())
    }

    async fn zones(&self) -> Result<Vec<Zone>, String> {
        let tables = self.tables.lock().await;
        Ok(tables.zones.values().cloned().collect())
    }

    async fn active_round(&self, game_id: GameId) -> Result<Option<Round>, String> {
        let tables = self.tables.lock().await;
        Ok(tables
            .rounds
            .values()
            .find(|round| round.game_id == game_id && round.is_active)
            .cloned())
    }

    async fn round_actions(&self, round_id: RoundId) -> Result<Vec<RoundAction>, String> {
        let tables = self.tables.lock().await;
        Ok(tables
            .actions
            .values()
            .filter(|action| action.round_id == round_id)
            .cloned()
            .collect())
    }

    async fn performances(&self, game_id: GameId) -> Result<Vec<PlayerPerformance>, String> {
        let tables = self.tables.lock().await;
        Ok(tables
            .performances
            .values()
            .filter(|performance| performance.game_id == game_id)
            .cloned()
            .collect())
    }

    async fn catalog(&self) -> Result<ItemCatalog, String> {
        let tables = self.tables.lock().await;
        Ok(tables.catalog.clone())
    }

    async fn next_player_id(&self) -> Result<PlayerId, String> {
        let mut tables = self.tables.lock().await;
        tables.last_player_id = tables
            .last_player_id
            .checked_add(1)
            .ok_or_else(|| "player ids exhausted".to_string())?;
        Ok(tables.last_player_id)
    }

    async fn apply_batch(&self, writes: Vec<StoreWrite>) -> Result<(), String> {
        let mut tables = self.tables.lock().await;
        let mut staged = tables.clone();
        for write in writes {
            staged.apply(write);
        }
        staged.check()?;
        *tables = staged;
        Ok(())
    }
}

// System clock adapter used by arena use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
