use async_trait::async_trait;

use crate::domain::actions::RoundAction;
use crate::domain::entities::{
    Game, GameId, GameKind, Player, PlayerId, PlayerPerformance, Round, RoundId, Zone,
};
use crate::domain::items::ItemCatalog;
use crate::domain::narration::NarrationEvent;

// One entity write inside an atomic batch. Writes replace by natural key.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreWrite {
    Game(Game),
    Round(Round),
    Player(Player),
    Action(RoundAction),
    Performance(PlayerPerformance),
}

// Port for reading and writing game state used by arena use cases.
#[async_trait]
pub trait GameStateStore: Send + Sync {
    async fn game(&self, game_id: GameId) -> Result<Option<Game>, String>;
    async fn active_game(&self, kind: GameKind) -> Result<Option<Game>, String>;
    async fn player(&self, player_id: PlayerId) -> Result<Option<Player>, String>;
    async fn players(&self, game_id: GameId) -> Result<Vec<Player>, String>;
    // Shared layout; per-game closures live on `Game::closed_zones`.
    async fn zones(&self) -> Result<Vec<Zone>, String>;
    async fn active_round(&self, game_id: GameId) -> Result<Option<Round>, String>;
    async fn round_actions(&self, round_id: RoundId) -> Result<Vec<RoundAction>, String>;
    async fn performances(&self, game_id: GameId) -> Result<Vec<PlayerPerformance>, String>;
    async fn catalog(&self) -> Result<ItemCatalog, String>;
    // Allocates a fresh player id.
    async fn next_player_id(&self) -> Result<PlayerId, String>;
    // Applies every write or none of them.
    async fn apply_batch(&self, writes: Vec<StoreWrite>) -> Result<(), String>;
}

// Port for delivering narration to the chat/rendering layer.
#[async_trait]
pub trait NarrationSink: Send + Sync {
    async fn publish(&self, event: NarrationEvent) -> Result<(), String>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}
