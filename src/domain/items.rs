// Item definitions, inventory entries and the searchable catalog.

use serde::{Deserialize, Serialize};

pub type ItemId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ASCENDING: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeaponTrait {
    // Hits every other huntable player in the zone.
    BlastAll,
    // Adds two extra random targets.
    BlastThree,
    // Adds one extra random target.
    BlastTwo,
    // Each target is struck twice.
    DualStrike,
    // Skips the accuracy roll.
    SureShot,
    // Ignores armor mitigation.
    Piercing,
    // Destroys the target's armor after the hit lands.
    ArmorBreak,
    // Can target hidden players and reveals them on hit.
    Tracking,
    // Boss only: small chance to deal the target's max health.
    InstantKill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: ItemId,
    pub name: String,
    pub emoji: String,
    pub rarity: Rarity,
    pub min_damage: u32,
    pub max_damage: u32,
    #[serde(default)]
    pub traits: Vec<WeaponTrait>,
    // None means the weapon never runs out.
    pub usage_limit: Option<u32>,
}

impl Weapon {
    pub fn has_trait(&self, weapon_trait: WeaponTrait) -> bool {
        self.traits.contains(&weapon_trait)
    }

    pub fn is_consumable(&self) -> bool {
        self.usage_limit.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub id: ItemId,
    pub name: String,
    pub emoji: String,
    pub rarity: Rarity,
    // Fraction of incoming damage removed, 0.0..=1.0.
    pub reduction_rate: f64,
    pub usage_limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Healthkit {
    pub id: ItemId,
    pub name: String,
    pub emoji: String,
    pub rarity: Rarity,
    pub healing: u32,
    // Stack size handed out when the kit is found.
    pub usage_limit: Option<u32>,
}

/// An item held in an inventory together with its remaining uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owned<T> {
    pub item: T,
    pub remaining_uses: Option<u32>,
}

impl<T> Owned<T> {
    pub fn is_usable(&self) -> bool {
        self.remaining_uses != Some(0)
    }

    /// Spends one use. Returns true when the item is now exhausted.
    pub fn consume(&mut self) -> bool {
        match self.remaining_uses.as_mut() {
            Some(uses) => {
                *uses = uses.saturating_sub(1);
                *uses == 0
            }
            None => false,
        }
    }
}

impl Owned<Weapon> {
    pub fn fresh(weapon: Weapon) -> Self {
        let remaining_uses = weapon.usage_limit;
        Self {
            item: weapon,
            remaining_uses,
        }
    }
}

impl Owned<Armor> {
    pub fn fresh(armor: Armor) -> Self {
        let remaining_uses = armor.usage_limit;
        Self {
            item: armor,
            remaining_uses,
        }
    }
}

impl Owned<Healthkit> {
    pub fn fresh(healthkit: Healthkit) -> Self {
        let remaining_uses = Some(healthkit.usage_limit.unwrap_or(1));
        Self {
            item: healthkit,
            remaining_uses,
        }
    }

    pub fn count(&self) -> u32 {
        self.remaining_uses.unwrap_or(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub weapons: Vec<Owned<Weapon>>,
    #[serde(default)]
    pub armors: Vec<Owned<Armor>>,
    #[serde(default)]
    pub healthkits: Vec<Owned<Healthkit>>,
}

impl Inventory {
    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty() && self.armors.is_empty() && self.healthkits.is_empty()
    }

    pub fn weapon(&self, weapon_id: ItemId) -> Option<&Owned<Weapon>> {
        self.weapons
            .iter()
            .find(|owned| owned.item.id == weapon_id && owned.is_usable())
    }

    pub fn weapon_index(&self, weapon_id: ItemId) -> Option<usize> {
        self.weapons
            .iter()
            .position(|owned| owned.item.id == weapon_id && owned.is_usable())
    }

    pub fn usable_armor_index(&self) -> Option<usize> {
        self.armors.iter().position(Owned::is_usable)
    }

    pub fn healthkit_count(&self) -> u32 {
        self.healthkits
            .iter()
            .filter(|owned| owned.is_usable())
            .map(Owned::count)
            .sum()
    }

    /// Index of the highest-rarity weapon; the first one wins ties.
    pub fn best_weapon_index(&self) -> Option<usize> {
        self.weapons
            .iter()
            .enumerate()
            .filter(|(_, owned)| owned.is_usable())
            .fold(None, |best: Option<(usize, Rarity)>, (index, owned)| match best {
                Some((_, rarity)) if rarity >= owned.item.rarity => best,
                _ => Some((index, owned.item.rarity)),
            })
            .map(|(index, _)| index)
    }

    /// Adds a weapon, merging ammo into an existing consumable copy.
    /// Returns false when an unlimited copy is already held.
    pub fn add_weapon(&mut self, weapon: Weapon, extra_uses: u32) -> bool {
        if let Some(existing) = self
            .weapons
            .iter_mut()
            .find(|owned| owned.item.id == weapon.id)
        {
            return match (existing.remaining_uses.as_mut(), weapon.usage_limit) {
                (Some(uses), Some(limit)) => {
                    *uses += limit + extra_uses;
                    true
                }
                _ => false,
            };
        }

        let mut owned = Owned::<Weapon>::fresh(weapon);
        if let Some(uses) = owned.remaining_uses.as_mut() {
            *uses += extra_uses;
        }
        self.weapons.push(owned);
        true
    }

    pub fn add_armor(&mut self, armor: Armor) {
        self.armors.push(Owned::<Armor>::fresh(armor));
    }

    /// Stacks healthkits by id.
    pub fn add_healthkits(&mut self, healthkit: Healthkit, count: u32) {
        if count == 0 {
            return;
        }
        if let Some(existing) = self
            .healthkits
            .iter_mut()
            .find(|owned| owned.item.id == healthkit.id)
        {
            existing.remaining_uses = Some(existing.count() + count);
            return;
        }
        self.healthkits.push(Owned {
            item: healthkit,
            remaining_uses: Some(count),
        });
    }

    pub fn prune_exhausted(&mut self) {
        self.weapons.retain(Owned::is_usable);
        self.armors.retain(Owned::is_usable);
        self.healthkits.retain(Owned::is_usable);
    }
}

/// Everything that can turn up while searching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemCatalog {
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    #[serde(default)]
    pub armors: Vec<Armor>,
    #[serde(default)]
    pub healthkits: Vec<Healthkit>,
}
