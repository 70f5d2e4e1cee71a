use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::actions::RoundAction;
use crate::domain::entities::{
    Game, GameId, GameKind, Player, PlayerId, PlayerPerformance, Round, RoundId, Zone,
};
use crate::domain::items::ItemCatalog;
use crate::domain::ports::{Clock, GameStateStore, StoreWrite};
use crate::frameworks::seed::{default_catalog, default_zones};
use crate::interface_adapters::state::InMemoryGameStore;

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub reads: bool,
    pub apply_batch: bool,
    // Lets this many more batches commit, then fails every later one.
    pub fail_after: Option<usize>,
}

// In-memory store that can be told to fail and remembers every committed batch.
#[derive(Clone)]
pub(crate) struct RecordingStore {
    inner: InMemoryGameStore,
    failures: Arc<Mutex<FailureFlags>>,
    batches: Arc<Mutex<Vec<Vec<StoreWrite>>>>,
}

impl RecordingStore {
    pub(crate) fn new(inner: InMemoryGameStore) -> Self {
        Self {
            inner,
            failures: Arc::new(Mutex::new(FailureFlags::default())),
            batches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn set_failures(&self, failures: FailureFlags) {
        *self.failures.lock().expect("failures mutex poisoned") = failures;
    }

    pub(crate) fn batches(&self) -> Vec<Vec<StoreWrite>> {
        self.batches.lock().expect("batches mutex poisoned").clone()
    }

    fn read_guard(&self) -> Result<(), String> {
        if self.failures.lock().expect("failures mutex poisoned").reads {
            return Err("read failed".to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl GameStateStore for RecordingStore {
    async fn game(&self, game_id: GameId) -> Result<Option<Game>, String> {
        self.read_guard()?;
        self.inner.game(game_id).await
    }

    async fn active_game(&self, kind: GameKind) -> Result<Option<Game>, String> {
        self.read_guard()?;
        self.inner.active_game(kind).await
    }

    async fn player(&self, player_id: PlayerId) -> Result<Option<Player>, String> {
        self.read_guard()?;
        self.inner.player(player_id).await
    }

    async fn players(&self, game_id: GameId) -> Result<Vec<Player>, String> {
        self.read_guard()?;
        self.inner.players(game_id).await
    }

    async fn zones(&self) -> Result<Vec<Zone>, String> {
        self.read_guard()?;
        self.inner.zones().await
    }

    async fn active_round(&self, game_id: GameId) -> Result<Option<Round>, String> {
        self.read_guard()?;
        self.inner.active_round(game_id).await
    }

    async fn round_actions(&self, round_id: RoundId) -> Result<Vec<RoundAction>, String> {
        self.read_guard()?;
        self.inner.round_actions(round_id).await
    }

    async fn performances(&self, game_id: GameId) -> Result<Vec<PlayerPerformance>, String> {
        self.read_guard()?;
        self.inner.performances(game_id).await
    }

    async fn catalog(&self) -> Result<ItemCatalog, String> {
        self.read_guard()?;
        self.inner.catalog().await
    }

    async fn next_player_id(&self) -> Result<PlayerId, String> {
        self.inner.next_player_id().await
    }

    async fn apply_batch(&self, writes: Vec<StoreWrite>) -> Result<(), String> {
        {
            let mut failures = self.failures.lock().expect("failures mutex poisoned");
            if failures.apply_batch {
                return Err("apply_batch failed".to_string());
            }
            match failures.fail_after.as_mut() {
                Some(0) => return Err("apply_batch failed".to_string()),
                Some(remaining) => *remaining -= 1,
                None => {}
            }
        }
        self.inner.apply_batch(writes.clone()).await?;
        self.batches
            .lock()
            .expect("batches mutex poisoned")
            .push(writes);
        Ok(())
    }
}

pub(crate) fn store_with_layout() -> RecordingStore {
    RecordingStore::new(InMemoryGameStore::new(default_zones(), default_catalog()))
}

pub(crate) struct SeededGame {
    pub store: RecordingStore,
    pub game: Game,
    pub round: Round,
    pub players: Vec<PlayerId>,
    pub zones: Vec<Zone>,
}

// An active free-for-all game in round 1 with every player in the first zone.
pub(crate) async fn seeded_store(player_count: usize) -> SeededGame {
    let store = store_with_layout();
    let zones = store.zones().await.expect("expected zones");
    let game = Game {
        id: Uuid::new_v4(),
        kind: GameKind::Arena,
        is_active: true,
        team_based: false,
        has_zone_deactivation: true,
        ring_system_algorithm: '5',
        current_ring_deactivation: 1,
        inactive_zone_penalty_power: 0,
        closed_zones: BTreeSet::new(),
        created_at: 0,
        ended_at: None,
    };
    let round = Round::start(game.id, 1, false, 0);

    let mut writes = vec![
        StoreWrite::Game(game.clone()),
        StoreWrite::Round(round.clone()),
    ];
    let mut players = Vec::with_capacity(player_count);
    for n in 1..=player_count {
        let id = store.next_player_id().await.expect("expected player id");
        let mut player = Player::new(id, format!("U{n}"), game.id, 100);
        player.zone_id = Some(zones[0].id);
        writes.push(StoreWrite::Player(player));
        players.push(id);
    }
    store.apply_batch(writes).await.expect("expected seed batch");

    SeededGame {
        store,
        game,
        round,
        players,
        zones,
    }
}
