use serde::Deserialize;

/// Gameplay tuning for hunts and hits.
///
/// Keep this separate from runtime/server configuration (ports, tokens, timeouts).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Base chance for a player's attack to land, before evasion and luck.
    pub base_hit_rate: f64,

    /// Base chance for a boss attack to land.
    pub boss_hit_rate: f64,

    /// Boss intrinsic damage range (inclusive).
    pub boss_min_damage: u32,
    pub boss_max_damage: u32,

    /// Chance for a boss carrying the instant-kill trait to one-shot a target.
    pub boss_instant_kill_chance: f64,

    /// Damage range when hunting without a weapon.
    pub unarmed_min_damage: u32,
    pub unarmed_max_damage: u32,

    /// Health at or below which attackers gain an adrenaline bonus.
    pub adrenaline_threshold: u32,

    /// Bonus damage at zero health with an attack rate of 1.0.
    pub adrenaline_scale: f64,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            base_hit_rate: 0.7,
            boss_hit_rate: 0.8,
            boss_min_damage: 15,
            boss_max_damage: 30,
            boss_instant_kill_chance: 0.05,
            unarmed_min_damage: 5,
            unarmed_max_damage: 10,
            adrenaline_threshold: 30,
            adrenaline_scale: 10.0,
        }
    }
}
