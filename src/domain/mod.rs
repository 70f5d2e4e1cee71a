// Domain layer: arena entities, resolution rules and ports.

pub mod abilities;
pub mod actions;
pub mod entities;
pub mod errors;
pub mod items;
pub mod narration;
pub mod perks;
pub mod ports;
pub mod systems;
pub mod tuning;
pub mod world;

pub use abilities::{ModifierSet, Stat};
pub use actions::{ActionKind, PlayerAction, RoundAction};
pub use entities::{Game, GameId, GameKind, Player, PlayerId, Round, RoundId, Zone, ZoneId};
pub use errors::ArenaError;
pub use narration::{Narration, NarrationEvent};
pub use world::World;
