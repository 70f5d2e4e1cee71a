//! Single-hit combat resolution.
//!
//! One call resolves one strike of one attacker against one target: the
//! accuracy roll, the damage roll, adrenaline, armor and defense mitigation,
//! and the health/visibility update on the target. Kill bookkeeping and loot
//! stay with the caller so they can join the same state batch.

use rand::Rng;

use crate::domain::abilities::{ModifierSet, Stat};
use crate::domain::entities::Player;
use crate::domain::items::{Weapon, WeaponTrait};
use crate::domain::systems::luck::luck_roll;
use crate::domain::tuning::CombatTuning;

/// Attacker stats captured before the strike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackerProfile {
    pub health: u32,
    pub luck_boost: f64,
    pub abilities: ModifierSet,
}

/// What the attacker strikes with.
#[derive(Debug, Clone, Copy)]
pub enum Armament<'a> {
    Weapon(&'a Weapon),
    Unarmed,
    // Boss intrinsic attack; weapon traits other than instant-kill do not apply.
    Boss { instant_kill: bool },
}

impl Armament<'_> {
    fn has_trait(&self, weapon_trait: WeaponTrait) -> bool {
        match self {
            Armament::Weapon(weapon) => weapon.has_trait(weapon_trait),
            Armament::Unarmed => false,
            Armament::Boss { instant_kill } => {
                *instant_kill && weapon_trait == WeaponTrait::InstantKill
            }
        }
    }
}

/// What happens to the target's visibility when a hit lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityOnHit {
    Unchanged,
    Reveal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitContext {
    pub everyone_visible: bool,
    pub visibility: VisibilityOnHit,
    pub target_max_health: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitOutcome {
    pub hit: bool,
    pub damage: u32,
    pub killed: bool,
    pub armor_broken: bool,
}

pub fn resolve_hit<R: Rng + ?Sized>(
    attacker: &AttackerProfile,
    armament: Armament<'_>,
    target: &mut Player,
    target_abilities: &ModifierSet,
    context: HitContext,
    tuning: &CombatTuning,
    rng: &mut R,
) -> HitOutcome {
    if !target.is_alive() {
        return HitOutcome::default();
    }

    let accuracy_boost = attacker.luck_boost + attacker.abilities.get(Stat::Accuracy);
    let base_hit_rate = match armament {
        Armament::Boss { .. } => tuning.boss_hit_rate,
        _ => tuning.base_hit_rate,
    };
    let hit = armament.has_trait(WeaponTrait::SureShot)
        || luck_roll(
            rng,
            base_hit_rate - target_abilities.get(Stat::EvadeRate),
            accuracy_boost,
        );
    if !hit {
        return HitOutcome::default();
    }

    let (min_damage, max_damage) = match armament {
        Armament::Weapon(weapon) => (weapon.min_damage, weapon.max_damage),
        Armament::Unarmed => (tuning.unarmed_min_damage, tuning.unarmed_max_damage),
        Armament::Boss { .. } => (tuning.boss_min_damage, tuning.boss_max_damage),
    };
    let mut damage = f64::from(rng.random_range(min_damage.min(max_damage)..=max_damage))
        + attacker.abilities.get(Stat::FlatAttackBonus);

    if armament.has_trait(WeaponTrait::InstantKill)
        && rng.random::<f64>() < tuning.boss_instant_kill_chance
    {
        damage = f64::from(context.target_max_health);
    }

    damage += adrenaline_bonus(attacker, tuning);

    let mut armor_broken = false;
    if let Some(index) = target.inventory.usable_armor_index() {
        if !armament.has_trait(WeaponTrait::Piercing) {
            let reduction = target.inventory.armors[index]
                .item
                .reduction_rate
                .clamp(0.0, 1.0);
            damage = mitigate(damage, reduction);
            target.inventory.armors[index].consume();
        }
        if armament.has_trait(WeaponTrait::ArmorBreak) {
            target.inventory.armors.remove(index);
            armor_broken = true;
        }
        target.inventory.prune_exhausted();
    }

    damage -= target_abilities.get(Stat::FlatDefenseBonus);
    let damage = clamp_damage(damage, target.health);

    target.health -= damage;
    if context.everyone_visible || context.visibility == VisibilityOnHit::Reveal {
        target.is_visible = true;
    }

    HitOutcome {
        hit: true,
        damage,
        killed: target.health == 0,
        armor_broken,
    }
}

/// Extra damage for attackers fighting on low health.
pub fn adrenaline_bonus(attacker: &AttackerProfile, tuning: &CombatTuning) -> f64 {
    if tuning.adrenaline_threshold == 0 || attacker.health > tuning.adrenaline_threshold {
        return 0.0;
    }
    let missing = 1.0 - f64::from(attacker.health) / f64::from(tuning.adrenaline_threshold);
    tuning.adrenaline_scale * missing * attacker.abilities.get(Stat::AttackRate)
}

pub fn mitigate(damage: f64, reduction_rate: f64) -> f64 {
    damage * (1.0 - reduction_rate.clamp(0.0, 1.0))
}

// Damage never goes below zero or past what the target has left.
fn clamp_damage(damage: f64, remaining_health: u32) -> u32 {
    let rounded = damage.round().max(0.0);
    if rounded >= f64::from(remaining_health) {
        remaining_health
    } else {
        rounded as u32
    }
}
