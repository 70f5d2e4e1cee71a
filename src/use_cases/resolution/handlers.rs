// Per-kind action handlers run while a zone drains its queue.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::abilities::Stat;
use crate::domain::actions::{ActionKind, PlayerAction, RoundAction};
use crate::domain::entities::{PlayerId, ZoneId};
use crate::domain::errors::ArenaError;
use crate::domain::items::{ItemCatalog, ItemId, Owned, WeaponTrait};
use crate::domain::narration::{ItemKind, Narration};
use crate::domain::perks::perks_unlocked_between;
use crate::domain::systems::combat::{
    Armament, AttackerProfile, HitContext, HitOutcome, VisibilityOnHit, resolve_hit,
};
use crate::domain::systems::loot::{boosted_healing, transfer_loot};
use crate::domain::systems::search::{SearchFind, search};
use crate::domain::systems::targeting::{TargetFilter, huntable_targets, pick_targets};
use crate::domain::tuning::ArenaTuning;
use crate::domain::world::World;
use crate::use_cases::resolution::EngineRng;

/// Mutable state shared by the handlers of one zone.
pub struct ZoneContext<'a> {
    pub world: &'a mut World,
    pub catalog: &'a ItemCatalog,
    pub tuning: &'a ArenaTuning,
    pub rng: &'a mut EngineRng,
    pub events: Vec<Narration>,
}

impl ZoneContext<'_> {
    fn flat_multiplier(&self) -> Option<f64> {
        self.tuning.player.perk_flat_multiplier
    }

    fn max_health(&self) -> u32 {
        self.tuning.player.max_health
    }
}

pub type Handler = fn(&mut ZoneContext<'_>, PlayerId, &PlayerAction) -> Result<(), ArenaError>;

/// Handlers in zone drain order.
pub const ZONE_HANDLERS: [(ActionKind, Handler); 9] = [
    (ActionKind::SearchHealth, search_health),
    (ActionKind::SearchArmor, search_armor),
    (ActionKind::SearchWeapon, search_weapon),
    (ActionKind::Heal, heal),
    (ActionKind::Revive, revive),
    (ActionKind::Hide, hide),
    (ActionKind::Hunt, hunt),
    (ActionKind::Cheer, cheer),
    (ActionKind::StayOnLocation, stay),
];

/// Runs one queued action. Anything it cannot act on becomes a skip narration.
pub fn run_action(ctx: &mut ZoneContext<'_>, handler: Handler, action: &RoundAction) {
    let actor_id = action.player_id;
    let alive = ctx.world.player(actor_id).map(|actor| actor.is_alive());
    let result = match alive {
        None => Err(ArenaError::not_found("player", actor_id)),
        Some(false) if action.kind().requires_alive_actor() => {
            Err(ArenaError::Validation("player is down".to_string()))
        }
        Some(_) => handler(ctx, actor_id, &action.action),
    };

    if let Err(err) = result {
        debug!(player_id = actor_id, kind = ?action.kind(), error = %err, "action skipped");
        ctx.events.push(Narration::ActionSkipped {
            actor_id,
            reason: err.to_string(),
        });
    }
}

fn search_health(
    ctx: &mut ZoneContext<'_>,
    actor_id: PlayerId,
    _: &PlayerAction,
) -> Result<(), ArenaError> {
    search_for(ctx, actor_id, ItemKind::Healthkit)
}

fn search_armor(
    ctx: &mut ZoneContext<'_>,
    actor_id: PlayerId,
    _: &PlayerAction,
) -> Result<(), ArenaError> {
    search_for(ctx, actor_id, ItemKind::Armor)
}

fn search_weapon(
    ctx: &mut ZoneContext<'_>,
    actor_id: PlayerId,
    _: &PlayerAction,
) -> Result<(), ArenaError> {
    search_for(ctx, actor_id, ItemKind::Weapon)
}

fn search_for(
    ctx: &mut ZoneContext<'_>,
    actor_id: PlayerId,
    kind: ItemKind,
) -> Result<(), ArenaError> {
    let luck_boost = ctx
        .world
        .player(actor_id)
        .map(|actor| actor.luck_boost)
        .ok_or_else(|| ArenaError::not_found("player", actor_id))?;
    let abilities = ctx.world.abilities_of(actor_id, ctx.flat_multiplier());

    let found = search(
        kind,
        &abilities,
        luck_boost,
        ctx.catalog,
        &ctx.tuning.player,
        &mut *ctx.rng,
    );
    let Some(found) = found else {
        ctx.events.push(Narration::NothingFound {
            actor_id,
            item: kind,
        });
        return Ok(());
    };

    let actor = ctx
        .world
        .player_mut(actor_id)
        .ok_or_else(|| ArenaError::not_found("player", actor_id))?;
    let (item_id, is_weapon) = match found {
        SearchFind::Weapon(weapon) => {
            let id = weapon.id;
            actor.inventory.add_weapon(weapon, 0);
            (id, true)
        }
        SearchFind::Armor(armor) => {
            let id = armor.id;
            actor.inventory.add_armor(armor);
            (id, false)
        }
        SearchFind::Healthkit(healthkit) => {
            let id = healthkit.id;
            let count = healthkit.usage_limit.unwrap_or(1);
            actor.inventory.add_healthkits(healthkit, count);
            (id, false)
        }
    };
    if is_weapon {
        ctx.world.performance_mut(actor_id).weapons_found += 1;
    }

    ctx.events.push(Narration::ItemFound {
        actor_id,
        item: kind,
        item_id,
    });
    Ok(())
}

fn heal(
    ctx: &mut ZoneContext<'_>,
    actor_id: PlayerId,
    action: &PlayerAction,
) -> Result<(), ArenaError> {
    let PlayerAction::Heal { healthkit_id } = action else {
        return Ok(());
    };
    let boost = ctx
        .world
        .abilities_of(actor_id, ctx.flat_multiplier())
        .get(Stat::FlatHealingBoost);
    let max_health = ctx.max_health();

    let actor = ctx
        .world
        .player_mut(actor_id)
        .ok_or_else(|| ArenaError::not_found("player", actor_id))?;
    let index = actor
        .inventory
        .healthkits
        .iter()
        .position(|owned| owned.is_usable() && healthkit_id.is_none_or(|id| owned.item.id == id))
        .ok_or_else(|| ArenaError::not_found("healthkit", describe_item(*healthkit_id)))?;

    let kit = &mut actor.inventory.healthkits[index];
    let healing = boosted_healing(kit.item.healing, boost);
    kit.consume();
    let before = actor.health;
    actor.health = before.saturating_add(healing).min(max_health);
    let amount = actor.health - before;
    actor.inventory.prune_exhausted();

    ctx.world.performance_mut(actor_id).healed += amount;
    ctx.events.push(Narration::Healed { actor_id, amount });
    Ok(())
}

fn revive(
    ctx: &mut ZoneContext<'_>,
    actor_id: PlayerId,
    action: &PlayerAction,
) -> Result<(), ArenaError> {
    let PlayerAction::Revive { target_player_id } = action else {
        return Ok(());
    };
    let target_id = *target_player_id;
    if !ctx.world.game().team_based {
        return Err(ArenaError::Validation(
            "revive is only available in team games".to_string(),
        ));
    }

    let actor = ctx
        .world
        .player(actor_id)
        .ok_or_else(|| ArenaError::not_found("player", actor_id))?;
    let target = ctx
        .world
        .player(target_id)
        .ok_or_else(|| ArenaError::not_found("player", target_id))?;
    let revivable = target.is_teammate_of(actor)
        && !target.is_alive()
        && !target.is_spectator
        && target.zone_id == actor.zone_id;
    if !revivable {
        return Err(ArenaError::Validation(
            "teammate cannot be revived from here".to_string(),
        ));
    }

    let boost = ctx
        .world
        .abilities_of(actor_id, ctx.flat_multiplier())
        .get(Stat::FlatHealingBoost);
    let max_health = ctx.max_health();
    let amount = ctx
        .world
        .with_pair(actor_id, target_id, |actor, target| {
            let index = actor.inventory.healthkits.iter().position(Owned::is_usable)?;
            let kit = &mut actor.inventory.healthkits[index];
            let healing = boosted_healing(kit.item.healing, boost).clamp(1, max_health.max(1));
            kit.consume();
            actor.inventory.prune_exhausted();
            target.health = healing;
            Some(healing)
        })
        .flatten()
        .ok_or_else(|| ArenaError::not_found("healthkit", "any"))?;

    ctx.world.performance_mut(actor_id).healed += amount;
    ctx.events.push(Narration::Revived {
        actor_id,
        target_id,
        amount,
    });
    Ok(())
}

fn hide(ctx: &mut ZoneContext<'_>, actor_id: PlayerId, _: &PlayerAction) -> Result<(), ArenaError> {
    if ctx.world.round.is_everyone_visible {
        ctx.events.push(Narration::Exposed { actor_id });
        return Ok(());
    }
    let actor = ctx
        .world
        .player_mut(actor_id)
        .ok_or_else(|| ArenaError::not_found("player", actor_id))?;
    actor.is_visible = false;
    ctx.events.push(Narration::Hid { actor_id });
    Ok(())
}

fn hunt(
    ctx: &mut ZoneContext<'_>,
    actor_id: PlayerId,
    action: &PlayerAction,
) -> Result<(), ArenaError> {
    let PlayerAction::Hunt {
        weapon_id,
        target_player_id,
    } = action
    else {
        return Ok(());
    };
    let multiplier = ctx.flat_multiplier();
    let team_based = ctx.world.game().team_based;

    let actor = ctx
        .world
        .player(actor_id)
        .ok_or_else(|| ArenaError::not_found("player", actor_id))?;
    let zone_id = actor
        .zone_id
        .ok_or_else(|| ArenaError::not_found("zone", "none"))?;
    let is_boss = actor.is_boss;
    let weapon = match (is_boss, weapon_id) {
        (false, Some(id)) => Some(
            actor
                .inventory
                .weapon(*id)
                .map(|owned| owned.item.clone())
                .ok_or_else(|| ArenaError::not_found("weapon", id))?,
        ),
        _ => None,
    };
    let attacker = AttackerProfile {
        health: actor.health,
        luck_boost: actor.luck_boost,
        abilities: ctx.world.abilities_of(actor_id, multiplier),
    };
    let traits: Vec<WeaponTrait> = weapon
        .as_ref()
        .map(|weapon| weapon.traits.clone())
        .unwrap_or_default();
    let tracking = traits.contains(&WeaponTrait::Tracking);
    let filter = TargetFilter {
        team_based,
        ignore_hiding: tracking,
    };
    let pool = huntable_targets(actor, ctx.world.occupants(zone_id), filter);

    // Attacking gives the hunter's position away.
    if let Some(actor) = ctx.world.player_mut(actor_id) {
        actor.is_visible = true;
    }

    if pool.is_empty() {
        ctx.events.push(Narration::NoTargets { actor_id });
        return Ok(());
    }

    let selection = if is_boss {
        pick_targets(&[], &pool, *target_player_id, &mut *ctx.rng)
    } else {
        pick_targets(&traits, &pool, *target_player_id, &mut *ctx.rng)
    };
    let armament = match (&weapon, is_boss) {
        (_, true) => Armament::Boss { instant_kill: true },
        (Some(weapon), false) => Armament::Weapon(weapon),
        (None, false) => Armament::Unarmed,
    };
    let context = HitContext {
        everyone_visible: ctx.world.round.is_everyone_visible,
        visibility: if tracking {
            VisibilityOnHit::Reveal
        } else {
            VisibilityOnHit::Unchanged
        },
        target_max_health: ctx.max_health(),
    };

    for target_id in selection.targets {
        for _ in 0..selection.hit_count {
            let target_abilities = ctx.world.abilities_of(target_id, multiplier);
            let Some(target) = ctx.world.player_mut(target_id) else {
                break;
            };
            if !target.is_alive() {
                break;
            }
            let outcome = resolve_hit(
                &attacker,
                armament,
                target,
                &target_abilities,
                context,
                &ctx.tuning.combat,
                &mut *ctx.rng,
            );
            record_strike(ctx, actor_id, target_id, weapon.as_ref().map(|w| w.id), outcome);
            if outcome.killed {
                break;
            }
        }
    }

    if let (Some(weapon), Some(actor)) = (&weapon, ctx.world.player_mut(actor_id)) {
        if let Some(index) = actor.inventory.weapon_index(weapon.id) {
            actor.inventory.weapons[index].consume();
            actor.inventory.prune_exhausted();
        }
    }
    Ok(())
}

fn record_strike(
    ctx: &mut ZoneContext<'_>,
    actor_id: PlayerId,
    target_id: PlayerId,
    weapon_id: Option<ItemId>,
    outcome: HitOutcome,
) {
    if !outcome.hit {
        ctx.events.push(Narration::Missed {
            actor_id,
            target_id,
        });
        return;
    }

    ctx.events.push(Narration::Hit {
        actor_id,
        target_id,
        amount: outcome.damage,
        weapon_id,
    });
    ctx.world.performance_mut(actor_id).damage_dealt += outcome.damage;
    if outcome.armor_broken {
        ctx.events.push(Narration::ArmorBroken {
            actor_id,
            target_id,
        });
    }
    if !outcome.killed {
        return;
    }

    ctx.events.push(Narration::Killed {
        actor_id,
        target_id,
    });
    if ctx.world.record_kill(actor_id) {
        ctx.events.push(Narration::FirstBlood { actor_id });
    }

    let boost = ctx
        .world
        .abilities_of(actor_id, ctx.flat_multiplier())
        .get(Stat::FlatHealingBoost);
    let max_health = ctx.max_health();
    let Some(loot) = ctx.world.with_pair(actor_id, target_id, |killer, dead| {
        transfer_loot(killer, dead, max_health, boost)
    }) else {
        return;
    };

    if let Some(weapon_id) = loot.weapon_id {
        ctx.events.push(Narration::WeaponLooted {
            actor_id,
            target_id,
            weapon_id,
        });
    }
    if let Some(amount) = loot.healthkit_applied {
        ctx.world.performance_mut(actor_id).healed += amount;
        ctx.events.push(Narration::HealthkitApplied {
            actor_id,
            target_id,
            amount,
        });
    }
    if loot.healthkits_transferred > 0 {
        ctx.events.push(Narration::HealthkitsLooted {
            actor_id,
            target_id,
            amount: loot.healthkits_transferred,
        });
    }
}

fn cheer(
    ctx: &mut ZoneContext<'_>,
    actor_id: PlayerId,
    action: &PlayerAction,
) -> Result<(), ArenaError> {
    let PlayerAction::Cheer { target_player_id } = action else {
        return Ok(());
    };
    let target_id = *target_player_id;
    if target_id == actor_id {
        return Err(ArenaError::Validation(
            "you cannot cheer for yourself".to_string(),
        ));
    }

    let target = ctx
        .world
        .player_mut(target_id)
        .filter(|target| !target.is_spectator)
        .ok_or_else(|| ArenaError::not_found("player", target_id))?;
    let before = target.cheers_received;
    target.cheers_received += 1;
    let after = target.cheers_received;

    ctx.world.performance_mut(actor_id).cheers_given += 1;
    ctx.world.performance_mut(target_id).cheers_received += 1;
    ctx.events.push(Narration::Cheered {
        actor_id,
        target_id,
    });
    for perk in perks_unlocked_between(before, after) {
        ctx.events.push(Narration::PerkUnlocked {
            actor_id: target_id,
            perk,
        });
    }
    Ok(())
}

fn stay(_: &mut ZoneContext<'_>, _: PlayerId, _: &PlayerAction) -> Result<(), ArenaError> {
    Ok(())
}

/// Damages everyone who stays in a closed zone. No killer, no loot.
pub fn zone_penalty(
    ctx: &mut ZoneContext<'_>,
    zone_id: ZoneId,
    leaving: &BTreeSet<PlayerId>,
) {
    let closed = ctx
        .world
        .zone(zone_id)
        .is_some_and(|zone| !zone.is_playable() && !zone.is_spectator);
    if !closed {
        return;
    }
    let amount = ctx.tuning.ring.penalty_base * ctx.world.game().inactive_zone_penalty_power;
    if amount == 0 {
        return;
    }

    let victims: Vec<PlayerId> = ctx
        .world
        .occupants(zone_id)
        .filter(|player| player.is_contender() && !leaving.contains(&player.id))
        .map(|player| player.id)
        .collect();
    for actor_id in victims {
        let Some(player) = ctx.world.player_mut(actor_id) else {
            continue;
        };
        let damage = amount.min(player.health);
        player.health -= damage;
        let collapsed = player.health == 0;
        ctx.events.push(Narration::ZonePenalty {
            actor_id,
            amount: damage,
        });
        if collapsed {
            ctx.events.push(Narration::CollapsedInZone { actor_id });
        }
    }
}

fn describe_item(id: Option<ItemId>) -> String {
    id.map_or_else(|| "any".to_string(), |id| id.to_string())
}
