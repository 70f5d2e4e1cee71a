// Built-in map layout and item catalog loaded at startup.

use crate::domain::entities::Zone;
use crate::domain::items::{Armor, Healthkit, ItemCatalog, ItemId, Rarity, Weapon, WeaponTrait};

const ZONES: [(&str, &str, &str); 13] = [
    ("1A", "Outer Docks", ":anchor:"),
    ("1B", "Scrapyard", ":wrench:"),
    ("1C", "Old Quarry", ":rock:"),
    ("2A", "Market Row", ":shopping_bags:"),
    ("2B", "Rail Yard", ":railway_track:"),
    ("2C", "Greenhouse", ":seedling:"),
    ("3A", "Barracks", ":shield:"),
    ("3B", "Archive", ":books:"),
    ("3C", "Reservoir", ":droplet:"),
    ("4A", "Sky Bridge", ":bridge_at_night:"),
    ("4B", "Foundry", ":fire:"),
    ("4C", "Observatory", ":telescope:"),
    ("5", "The Core", ":crossed_swords:"),
];

/// Ring zones ordered outside-in, followed by the spectator stand.
pub fn default_zones() -> Vec<Zone> {
    let mut zones: Vec<Zone> = ZONES
        .iter()
        .zip(1..)
        .map(|((ring, name, emoji), id)| Zone {
            id,
            name: name.to_string(),
            emoji: emoji.to_string(),
            ring: ring.to_string(),
            is_active: true,
            is_archived: false,
            is_spectator: false,
        })
        .collect();
    zones.push(Zone {
        id: 100,
        name: "Stands".to_string(),
        emoji: ":popcorn:".to_string(),
        ring: "S".to_string(),
        is_active: true,
        is_archived: false,
        is_spectator: true,
    });
    zones
}

pub fn default_catalog() -> ItemCatalog {
    ItemCatalog {
        weapons: vec![
            weapon(1, "Rusty Knife", Rarity::Common, (8, 14), &[], None),
            weapon(2, "Slingshot", Rarity::Common, (6, 12), &[], Some(5)),
            weapon(3, "Crossbow", Rarity::Rare, (14, 22), &[WeaponTrait::Piercing], Some(4)),
            weapon(4, "Twin Daggers", Rarity::Rare, (9, 15), &[WeaponTrait::DualStrike], None),
            weapon(5, "Scatter Gun", Rarity::Epic, (12, 20), &[WeaponTrait::BlastTwo], Some(3)),
            weapon(6, "Seeker Bow", Rarity::Epic, (16, 24), &[WeaponTrait::Tracking], Some(3)),
            weapon(
                7,
                "Rail Lance",
                Rarity::Legendary,
                (25, 35),
                &[WeaponTrait::SureShot, WeaponTrait::ArmorBreak],
                Some(2),
            ),
            weapon(
                8,
                "Storm Caller",
                Rarity::Legendary,
                (15, 25),
                &[WeaponTrait::BlastAll],
                Some(1),
            ),
        ],
        armors: vec![
            armor(101, "Padded Vest", Rarity::Common, 0.15, Some(3)),
            armor(102, "Chain Shirt", Rarity::Rare, 0.25, Some(4)),
            armor(103, "Riot Plate", Rarity::Epic, 0.35, Some(5)),
            armor(104, "Aegis Shell", Rarity::Legendary, 0.5, Some(6)),
        ],
        healthkits: vec![
            healthkit(201, "Bandage", Rarity::Common, 15, Some(2)),
            healthkit(202, "Medkit", Rarity::Rare, 30, Some(1)),
            healthkit(203, "Stim Pack", Rarity::Epic, 45, Some(1)),
            healthkit(204, "Phoenix Vial", Rarity::Legendary, 80, Some(1)),
        ],
    }
}

fn weapon(
    id: ItemId,
    name: &str,
    rarity: Rarity,
    (min_damage, max_damage): (u32, u32),
    traits: &[WeaponTrait],
    usage_limit: Option<u32>,
) -> Weapon {
    Weapon {
        id,
        name: name.to_string(),
        emoji: ":dagger_knife:".to_string(),
        rarity,
        min_damage,
        max_damage,
        traits: traits.to_vec(),
        usage_limit,
    }
}

fn armor(id: ItemId, name: &str, rarity: Rarity, reduction_rate: f64, uses: Option<u32>) -> Armor {
    Armor {
        id,
        name: name.to_string(),
        emoji: ":shield:".to_string(),
        rarity,
        reduction_rate,
        usage_limit: uses,
    }
}

fn healthkit(id: ItemId, name: &str, rarity: Rarity, healing: u32, uses: Option<u32>) -> Healthkit {
    Healthkit {
        id,
        name: name.to_string(),
        emoji: ":adhesive_bandage:".to_string(),
        rarity,
        healing,
        usage_limit: uses,
    }
}
