// Cheer thresholds and the stat perks they unlock.

use serde::{Deserialize, Serialize};

use crate::domain::abilities::{ModifierSet, Stat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perk {
    KeenEye,
    Nimble,
    Brawler,
    IronSkin,
    CrowdFavorite,
}

impl Perk {
    /// Perks in unlock order.
    pub const LADDER: [Perk; 5] = [
        Perk::KeenEye,
        Perk::Nimble,
        Perk::Brawler,
        Perk::IronSkin,
        Perk::CrowdFavorite,
    ];

    pub fn threshold(self) -> u32 {
        match self {
            Perk::KeenEye => 6,
            Perk::Nimble => 13,
            Perk::Brawler => 21,
            Perk::IronSkin => 30,
            Perk::CrowdFavorite => 40,
        }
    }

    pub fn bonus(self) -> ModifierSet {
        let zero = ModifierSet::zero();
        match self {
            Perk::KeenEye => zero.with(Stat::Accuracy, 0.05),
            Perk::Nimble => zero.with(Stat::EvadeRate, 0.05),
            Perk::Brawler => zero.with(Stat::FlatAttackBonus, 3.0),
            Perk::IronSkin => zero.with(Stat::FlatDefenseBonus, 3.0),
            Perk::CrowdFavorite => zero
                .with(Stat::FlatHealingBoost, 10.0)
                .with(Stat::AttackRate, 0.25),
        }
    }
}

/// Highest perk unlocked at `cheers`, if any.
pub fn perk_for_threshold(cheers: u32) -> Option<Perk> {
    perks_held(cheers).last().copied()
}

/// Every perk whose threshold is at or below `cheers`.
pub fn perks_held(cheers: u32) -> Vec<Perk> {
    Perk::LADDER
        .iter()
        .copied()
        .filter(|perk| perk.threshold() <= cheers)
        .collect()
}

/// Perks crossed when the counter moves from `before` to `after`.
pub fn perks_unlocked_between(before: u32, after: u32) -> Vec<Perk> {
    Perk::LADDER
        .iter()
        .copied()
        .filter(|perk| perk.threshold() > before && perk.threshold() <= after)
        .collect()
}

/// Base abilities plus every held perk's bonus.
pub fn effective_abilities(
    base: &ModifierSet,
    cheers: u32,
    flat_multiplier: Option<f64>,
) -> ModifierSet {
    perks_held(cheers)
        .into_iter()
        .fold(*base, |abilities, perk| {
            abilities.combine(&perk.bonus(), flat_multiplier)
        })
}
