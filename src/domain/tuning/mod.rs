// Gameplay tuning. Defaults match the reference deployment; a TOML file may
// override any subset of fields.

pub mod combat;
pub mod ring;

use serde::Deserialize;

pub use combat::CombatTuning;
pub use ring::RingTuning;

/// Gameplay tuning for player vitals and searching.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Health every player starts with and can never exceed.
    pub max_health: u32,

    /// Base chance for a search to find anything.
    pub search_base_rate: f64,

    /// Cumulative upper bounds of the rarity roll for common, rare and epic.
    /// Anything above the last bound is legendary.
    pub rarity_bounds: [f64; 3],

    /// Multiplier applied to flat perk bonuses; None adds them unscaled.
    pub perk_flat_multiplier: Option<f64>,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100,
            search_base_rate: 0.6,
            rarity_bounds: [0.60, 0.85, 0.96],
            perk_flat_multiplier: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub player: PlayerTuning,
    pub combat: CombatTuning,
    pub ring: RingTuning,
}
