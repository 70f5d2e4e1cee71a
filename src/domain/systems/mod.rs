// Pure round-resolution rules. Nothing in here touches the store or the clock.

pub mod combat;
pub mod loot;
pub mod luck;
pub mod ring;
pub mod search;
pub mod targeting;
pub mod victory;
