// Inventory transfer from a fallen player to their killer.

use crate::domain::entities::Player;
use crate::domain::items::{ItemId, Owned, Rarity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LootOutcome {
    // Weapon taken off the dead player, if they had one.
    pub weapon_id: Option<ItemId>,
    // Health restored by an auto-applied healthkit.
    pub healthkit_applied: Option<u32>,
    // Healthkits moved into the killer's inventory unapplied.
    pub healthkits_transferred: u32,
}

pub fn transfer_loot(
    killer: &mut Player,
    dead: &mut Player,
    max_health: u32,
    healing_boost: f64,
) -> LootOutcome {
    let mut outcome = LootOutcome::default();
    if dead.inventory.is_empty() {
        return outcome;
    }

    if let Some(index) = dead.inventory.best_weapon_index() {
        let looted = dead.inventory.weapons.remove(index);
        outcome.weapon_id = Some(looted.item.id);
        let gifted = looted.remaining_uses.unwrap_or(0);

        match killer
            .inventory
            .weapons
            .iter_mut()
            .find(|owned| owned.item.id == looted.item.id)
        {
            Some(existing) => {
                let consumable = looted.item.is_consumable();
                if let (true, Some(uses)) = (consumable, existing.remaining_uses.as_mut()) {
                    *uses += gifted;
                }
            }
            None => {
                killer.inventory.add_weapon(looted.item, gifted);
            }
        }
    }

    let common_kit = dead
        .inventory
        .healthkits
        .iter()
        .position(|owned| owned.item.rarity == Rarity::Common && owned.is_usable());
    if let Some(index) = common_kit {
        if killer.health < max_health {
            let kit = &mut dead.inventory.healthkits[index];
            let healing = boosted_healing(kit.item.healing, healing_boost);
            let before = killer.health;
            killer.health = (killer.health + healing).min(max_health);
            kit.consume();
            outcome.healthkit_applied = Some(killer.health - before);
        } else if killer.inventory.healthkit_count() == 0 {
            let stacks: Vec<Owned<_>> = dead
                .inventory
                .healthkits
                .iter()
                .filter(|owned| owned.item.rarity == Rarity::Common && owned.is_usable())
                .cloned()
                .collect();
            dead.inventory
                .healthkits
                .retain(|owned| owned.item.rarity != Rarity::Common);
            for stack in stacks {
                outcome.healthkits_transferred += stack.count();
                let count = stack.count();
                killer.inventory.add_healthkits(stack.item, count);
            }
        }
    }

    dead.inventory.prune_exhausted();
    outcome
}

pub fn boosted_healing(healing: u32, boost: f64) -> u32 {
    let total = (f64::from(healing) + boost).round();
    if total <= 0.0 { 0 } else { total as u32 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::items::{Healthkit, Weapon};
    use uuid::Uuid;

    fn weapon(id: ItemId, rarity: Rarity, usage_limit: Option<u32>) -> Weapon {
        Weapon {
            id,
            name: format!("weapon-{id}"),
            emoji: ":crossed_swords:".to_string(),
            rarity,
            min_damage: 5,
            max_damage: 10,
            traits: Vec::new(),
            usage_limit,
        }
    }

    fn bandage() -> Healthkit {
        Healthkit {
            id: 50,
            name: "Bandage".to_string(),
            emoji: ":adhesive_bandage:".to_string(),
            rarity: Rarity::Common,
            healing: 20,
            usage_limit: Some(1),
        }
    }

    fn pair() -> (Player, Player) {
        let game_id = Uuid::new_v4();
        (
            Player::new(1, "U1", game_id, 100),
            Player::new(2, "U2", game_id, 0),
        )
    }

    #[test]
    fn when_dead_player_has_nothing_then_killer_inventory_is_unchanged() {
        let (mut killer, mut dead) = pair();
        killer.inventory.add_weapon(weapon(1, Rarity::Common, Some(2)), 0);
        let before = killer.clone();

        let outcome = transfer_loot(&mut killer, &mut dead, 100, 0.0);

        assert_eq!(outcome, LootOutcome::default());
        assert_eq!(killer, before);
    }

    #[test]
    fn when_dead_player_has_weapons_then_killer_takes_only_the_rarest() {
        let (mut killer, mut dead) = pair();
        dead.inventory.add_weapon(weapon(1, Rarity::Common, None), 0);
        dead.inventory.add_weapon(weapon(2, Rarity::Epic, Some(4)), 0);
        dead.inventory.weapons[1].remaining_uses = Some(2);

        let outcome = transfer_loot(&mut killer, &mut dead, 100, 0.0);

        assert_eq!(outcome.weapon_id, Some(2));
        assert_eq!(killer.inventory.weapons.len(), 1);
        // Default allotment of 4 plus the 2 shots the dead player had left.
        assert_eq!(killer.inventory.weapons[0].remaining_uses, Some(6));
        assert_eq!(dead.inventory.weapons.len(), 1);
        assert_eq!(dead.inventory.weapons[0].item.id, 1);
    }

    #[test]
    fn when_killer_already_holds_consumable_weapon_then_ammo_merges() {
        let (mut killer, mut dead) = pair();
        killer.inventory.add_weapon(weapon(3, Rarity::Rare, Some(5)), 0);
        killer.inventory.weapons[0].remaining_uses = Some(1);
        dead.inventory.add_weapon(weapon(3, Rarity::Rare, Some(5)), 0);
        dead.inventory.weapons[0].remaining_uses = Some(3);

        transfer_loot(&mut killer, &mut dead, 100, 0.0);

        assert_eq!(killer.inventory.weapons.len(), 1);
        assert_eq!(killer.inventory.weapons[0].remaining_uses, Some(4));
        assert!(dead.inventory.weapons.is_empty());
    }

    #[test]
    fn when_killer_already_holds_unlimited_weapon_then_it_is_not_duplicated() {
        let (mut killer, mut dead) = pair();
        killer.inventory.add_weapon(weapon(4, Rarity::Epic, None), 0);
        dead.inventory.add_weapon(weapon(4, Rarity::Epic, None), 0);

        let outcome = transfer_loot(&mut killer, &mut dead, 100, 0.0);

        assert_eq!(outcome.weapon_id, Some(4));
        assert_eq!(killer.inventory.weapons.len(), 1);
        assert_eq!(killer.inventory.weapons[0].remaining_uses, None);
        assert!(dead.inventory.is_empty());
    }

    #[test]
    fn when_killer_is_hurt_then_one_common_healthkit_auto_applies() {
        let (mut killer, mut dead) = pair();
        killer.health = 70;
        dead.inventory.add_healthkits(bandage(), 3);

        let outcome = transfer_loot(&mut killer, &mut dead, 100, 0.0);

        assert_eq!(outcome.healthkit_applied, Some(20));
        assert_eq!(killer.health, 90);
        assert_eq!(dead.inventory.healthkit_count(), 2);
        assert_eq!(killer.inventory.healthkit_count(), 0);
    }

    #[test]
    fn when_killer_is_full_and_has_no_kits_then_whole_stack_transfers() {
        let (mut killer, mut dead) = pair();
        dead.inventory.add_healthkits(bandage(), 3);

        let outcome = transfer_loot(&mut killer, &mut dead, 100, 0.0);

        assert_eq!(outcome.healthkits_transferred, 3);
        assert_eq!(killer.inventory.healthkit_count(), 3);
        assert_eq!(dead.inventory.healthkit_count(), 0);
    }

    #[test]
    fn when_killer_is_full_and_carries_kits_then_nothing_transfers() {
        let (mut killer, mut dead) = pair();
        killer.inventory.add_healthkits(bandage(), 1);
        dead.inventory.add_healthkits(bandage(), 3);

        let outcome = transfer_loot(&mut killer, &mut dead, 100, 0.0);

        assert_eq!(outcome.healthkits_transferred, 0);
        assert_eq!(killer.inventory.healthkit_count(), 1);
        assert_eq!(dead.inventory.healthkit_count(), 3);
    }
}
