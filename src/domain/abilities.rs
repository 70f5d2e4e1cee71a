// Numeric combat modifiers carried by players and granted by perks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const STAT_COUNT: usize = 11;

/// Every modifier a character can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    RarityRateBonus,
    SearchRate,
    WeaponSearchRate,
    Accuracy,
    FlatAttackBonus,
    FlatDefenseBonus,
    AttackRate,
    StunBlockRate,
    EvadeRate,
    FlatHealingBoost,
    Initiative,
}

impl Stat {
    pub const ALL: [Stat; STAT_COUNT] = [
        Stat::RarityRateBonus,
        Stat::SearchRate,
        Stat::WeaponSearchRate,
        Stat::Accuracy,
        Stat::FlatAttackBonus,
        Stat::FlatDefenseBonus,
        Stat::AttackRate,
        Stat::StunBlockRate,
        Stat::EvadeRate,
        Stat::FlatHealingBoost,
        Stat::Initiative,
    ];

    /// Flat stats scale with the optional multiplier in [`ModifierSet::combine`].
    pub fn is_flat(self) -> bool {
        matches!(
            self,
            Stat::FlatAttackBonus | Stat::FlatDefenseBonus | Stat::FlatHealingBoost
        )
    }

    fn default_value(self) -> f64 {
        match self {
            Stat::Initiative => 1.0,
            _ => 0.0,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A named set of numeric stats.
///
/// Reads use default-zero semantics: a stat that was never set reads as its
/// default (0, or 1 for initiative). Use [`ModifierSet::is_set`] when the
/// caller needs to tell "unset" apart from an explicit value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Stat, f64>", into = "BTreeMap<Stat, f64>")]
pub struct ModifierSet {
    values: [f64; STAT_COUNT],
}

impl Default for ModifierSet {
    fn default() -> Self {
        let mut values = [0.0; STAT_COUNT];
        for stat in Stat::ALL {
            values[stat.index()] = stat.default_value();
        }
        Self { values }
    }
}

impl ModifierSet {
    /// All-zero set, including initiative. Used for deltas such as perk bonuses.
    pub fn zero() -> Self {
        Self {
            values: [0.0; STAT_COUNT],
        }
    }

    /// Builds a set from defaults plus the given overrides.
    pub fn new(overrides: impl IntoIterator<Item = (Stat, f64)>) -> Self {
        overrides
            .into_iter()
            .fold(Self::default(), |set, (stat, value)| set.with(stat, value))
    }

    pub fn with(mut self, stat: Stat, value: f64) -> Self {
        self.values[stat.index()] = round2(value);
        self
    }

    pub fn get(&self, stat: Stat) -> f64 {
        self.values[stat.index()]
    }

    pub fn is_set(&self, stat: Stat) -> bool {
        (self.get(stat) - stat.default_value()).abs() > f64::EPSILON
    }

    /// Adds `delta` onto `self`. Flat stats add `delta * multiplier` when a
    /// multiplier is supplied; every other stat adds the raw delta.
    pub fn combine(&self, delta: &ModifierSet, flat_multiplier: Option<f64>) -> ModifierSet {
        let mut combined = *self;
        for stat in Stat::ALL {
            let added = match flat_multiplier {
                Some(multiplier) if stat.is_flat() => delta.get(stat) * multiplier,
                _ => delta.get(stat),
            };
            combined.values[stat.index()] = round2(self.get(stat) + added);
        }
        combined
    }
}

impl From<BTreeMap<Stat, f64>> for ModifierSet {
    fn from(map: BTreeMap<Stat, f64>) -> Self {
        Self::new(map)
    }
}

impl From<ModifierSet> for BTreeMap<Stat, f64> {
    fn from(set: ModifierSet) -> Self {
        Stat::ALL
            .iter()
            .map(|stat| (*stat, set.get(*stat)))
            .collect()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
