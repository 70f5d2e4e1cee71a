// Target filtering and selection for hunts.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::domain::entities::{Player, PlayerId};
use crate::domain::items::WeaponTrait;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetFilter {
    pub team_based: bool,
    // Tracking weapons see through hiding.
    pub ignore_hiding: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSelection {
    pub targets: Vec<PlayerId>,
    pub hit_count: u32,
}

/// Players `actor` may legally attack out of `pool`.
///
/// Team games only rule out teammates; hiding protects in free-for-all games.
pub fn huntable_targets<'a>(
    actor: &Player,
    pool: impl IntoIterator<Item = &'a Player>,
    filter: TargetFilter,
) -> Vec<PlayerId> {
    pool.into_iter()
        .filter(|candidate| candidate.id != actor.id)
        .filter(|candidate| candidate.is_contender())
        .filter(|candidate| {
            if filter.team_based {
                !candidate.is_teammate_of(actor)
            } else {
                filter.ignore_hiding || candidate.is_visible
            }
        })
        .map(|candidate| candidate.id)
        .collect()
}

/// Picks who an attack lands on.
///
/// A preferred target present in `pool` always comes first. Without one, a
/// random target is drawn so the attack still has an effect. Area traits then
/// add extra random targets from whoever is left.
pub fn pick_targets<R: Rng + ?Sized>(
    traits: &[WeaponTrait],
    pool: &[PlayerId],
    preferred: Option<PlayerId>,
    rng: &mut R,
) -> TargetSelection {
    let mut remaining: Vec<PlayerId> = pool.to_vec();
    let mut targets = Vec::new();

    match preferred.filter(|id| pool.contains(id)) {
        Some(target) => {
            remaining.retain(|id| *id != target);
            targets.push(target);
        }
        None => {
            if !remaining.is_empty() {
                let index = rng.random_range(0..remaining.len());
                targets.push(remaining.remove(index));
            }
        }
    }

    let extra = if traits.contains(&WeaponTrait::BlastAll) {
        remaining.len()
    } else if traits.contains(&WeaponTrait::BlastThree) {
        2
    } else if traits.contains(&WeaponTrait::BlastTwo) {
        1
    } else {
        0
    };
    targets.extend(remaining.choose_multiple(rng, extra).copied());

    let hit_count = if traits.contains(&WeaponTrait::DualStrike) {
        2
    } else {
        1
    };

    TargetSelection { targets, hit_count }
}
