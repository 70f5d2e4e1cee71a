use serde::Deserialize;

/// Gameplay tuning for zones and the shrinking ring.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RingTuning {
    /// Algorithm letter that shrinks whole tiers.
    pub default_algorithm: char,

    /// First tier deactivated by the ring.
    pub first_tier: u32,

    /// Tier that ends a non-default cycle and, under the default letter,
    /// never shrinks.
    pub portal_tier: u32,

    /// Completed rounds between ring advances.
    pub cadence_rounds: u32,

    /// Damage per penalty power point taken in an inactive zone.
    pub penalty_base: u32,

    /// Upper bound for the escalating penalty power.
    pub max_penalty_power: u32,

    /// Player capacity of a zone before any deactivation.
    pub base_zone_capacity: u32,
}

impl Default for RingTuning {
    fn default() -> Self {
        Self {
            default_algorithm: '5',
            first_tier: 1,
            portal_tier: 5,
            cadence_rounds: 3,
            penalty_base: 10,
            max_penalty_power: 5,
            base_zone_capacity: 6,
        }
    }
}
