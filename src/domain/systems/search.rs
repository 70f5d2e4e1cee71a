// Search rolls against the item catalog.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::domain::abilities::{ModifierSet, Stat};
use crate::domain::items::{Armor, Healthkit, ItemCatalog, Rarity, Weapon};
use crate::domain::narration::ItemKind;
use crate::domain::systems::luck::luck_roll;
use crate::domain::tuning::PlayerTuning;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchFind {
    Weapon(Weapon),
    Armor(Armor),
    Healthkit(Healthkit),
}

pub fn search<R: Rng + ?Sized>(
    kind: ItemKind,
    abilities: &ModifierSet,
    luck_boost: f64,
    catalog: &ItemCatalog,
    tuning: &PlayerTuning,
    rng: &mut R,
) -> Option<SearchFind> {
    let mut rate = tuning.search_base_rate + abilities.get(Stat::SearchRate);
    if kind == ItemKind::Weapon {
        rate += abilities.get(Stat::WeaponSearchRate);
    }
    if !luck_roll(rng, rate, luck_boost) {
        return None;
    }

    let rarity = roll_rarity(
        rng,
        abilities.get(Stat::RarityRateBonus),
        tuning.rarity_bounds,
    );
    match kind {
        ItemKind::Weapon => pick(&catalog.weapons, rarity, |w| w.rarity, rng)
            .cloned()
            .map(SearchFind::Weapon),
        ItemKind::Armor => pick(&catalog.armors, rarity, |a| a.rarity, rng)
            .cloned()
            .map(SearchFind::Armor),
        ItemKind::Healthkit => pick(&catalog.healthkits, rarity, |h| h.rarity, rng)
            .cloned()
            .map(SearchFind::Healthkit),
    }
}

/// Rolls a rarity; `bonus` shifts the roll towards rarer tiers.
pub fn roll_rarity<R: Rng + ?Sized>(rng: &mut R, bonus: f64, bounds: [f64; 3]) -> Rarity {
    let roll = (rng.random::<f64>() + bonus).clamp(0.0, 1.0);
    if roll < bounds[0] {
        Rarity::Common
    } else if roll < bounds[1] {
        Rarity::Rare
    } else if roll < bounds[2] {
        Rarity::Epic
    } else {
        Rarity::Legendary
    }
}

// Items of the rolled rarity, falling back through lower rarities, then to anything.
fn pick<'a, T, R: Rng + ?Sized>(
    items: &'a [T],
    rarity: Rarity,
    rarity_of: impl Fn(&T) -> Rarity,
    rng: &mut R,
) -> Option<&'a T> {
    let fallbacks = Rarity::ASCENDING
        .iter()
        .rev()
        .copied()
        .filter(|candidate| *candidate <= rarity);
    for candidate in fallbacks {
        let matching: Vec<&T> = items
            .iter()
            .filter(|item| rarity_of(item) == candidate)
            .collect();
        if let Some(item) = matching.choose(rng) {
            return Some(*item);
        }
    }
    items.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn catalog() -> ItemCatalog {
        ItemCatalog {
            weapons: vec![Weapon {
                id: 1,
                name: "Slingshot".to_string(),
                emoji: ":slingshot:".to_string(),
                rarity: Rarity::Common,
                min_damage: 4,
                max_damage: 8,
                traits: Vec::new(),
                usage_limit: Some(5),
            }],
            armors: Vec::new(),
            healthkits: vec![Healthkit {
                id: 2,
                name: "Medkit".to_string(),
                emoji: ":pill:".to_string(),
                rarity: Rarity::Epic,
                healing: 40,
                usage_limit: Some(1),
            }],
        }
    }

    #[test]
    fn when_search_is_certain_then_an_item_of_that_kind_is_found() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let tuning = PlayerTuning {
            search_base_rate: 1.0,
            ..PlayerTuning::default()
        };

        let found = search(
            ItemKind::Weapon,
            &ModifierSet::default(),
            0.0,
            &catalog(),
            &tuning,
            &mut rng,
        );

        assert!(matches!(found, Some(SearchFind::Weapon(w)) if w.id == 1));
    }

    #[test]
    fn when_search_rate_is_zero_then_nothing_is_found() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let tuning = PlayerTuning {
            search_base_rate: 0.0,
            ..PlayerTuning::default()
        };

        let found = search(
            ItemKind::Healthkit,
            &ModifierSet::default(),
            0.0,
            &catalog(),
            &tuning,
            &mut rng,
        );

        assert_eq!(found, None);
    }

    #[test]
    fn when_catalog_has_no_items_of_kind_then_nothing_is_found() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let tuning = PlayerTuning {
            search_base_rate: 1.0,
            ..PlayerTuning::default()
        };

        let found = search(
            ItemKind::Armor,
            &ModifierSet::default(),
            0.0,
            &catalog(),
            &tuning,
            &mut rng,
        );

        assert_eq!(found, None);
    }

    #[test]
    fn when_rarity_bonus_is_maxed_then_roll_is_legendary() {
        let mut rng = ChaCha8Rng::seed_from_u64(24);
        let bounds = PlayerTuning::default().rarity_bounds;
        for _ in 0..20 {
            assert_eq!(roll_rarity(&mut rng, 1.0, bounds), Rarity::Legendary);
        }
    }
}
