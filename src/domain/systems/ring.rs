// Zone capacity and the shrinking ring.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::domain::entities::{Game, Zone, ZoneId};
use crate::domain::tuning::RingTuning;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingAdvance {
    pub deactivated: Vec<ZoneId>,
    // The cycle finished and the game fell back to the default letter.
    pub algorithm_reset: bool,
}

/// Players a single active zone may hold once some zones have closed.
pub fn zone_capacity(base: u32, active_zones: u32, deactivated_zones: u32) -> u32 {
    if active_zones == 0 {
        return base;
    }
    base + (deactivated_zones * base).div_ceil(active_zones)
}

/// Zones in `tier` that do not carry the surviving `letter`.
pub fn zones_to_deactivate(zones: &[Zone], letter: char, tier: u32) -> Vec<ZoneId> {
    let prefix = tier.to_string();
    zones
        .iter()
        .filter(|zone| !zone.is_spectator)
        .filter(|zone| zone.ring.starts_with(&prefix) && !zone.ring.ends_with(letter))
        .map(|zone| zone.id)
        .collect()
}

pub fn advance_ring(game: &mut Game, zones: &mut [Zone], tuning: &RingTuning) -> RingAdvance {
    let letter = game.ring_system_algorithm;
    let tier = game.current_ring_deactivation;

    if letter != tuning.default_algorithm && tier >= tuning.portal_tier {
        game.ring_system_algorithm = tuning.default_algorithm;
        game.current_ring_deactivation = tuning.first_tier;
        return RingAdvance {
            deactivated: Vec::new(),
            algorithm_reset: true,
        };
    }

    // The portal tier under the default letter is where the ring settles.
    if letter == tuning.default_algorithm && tier >= tuning.portal_tier {
        return RingAdvance::default();
    }

    let targets = zones_to_deactivate(zones, letter, tier);
    let mut deactivated = Vec::new();
    for zone in zones.iter_mut() {
        if targets.contains(&zone.id) && zone.is_active {
            zone.is_active = false;
            game.closed_zones.insert(zone.id);
            deactivated.push(zone.id);
        }
    }

    game.inactive_zone_penalty_power =
        (game.inactive_zone_penalty_power + 1).min(tuning.max_penalty_power);
    game.current_ring_deactivation = tier + 1;

    RingAdvance {
        deactivated,
        algorithm_reset: false,
    }
}

/// Whether the round that just completed should shrink the ring.
pub fn should_advance_ring(
    completed_round: u32,
    tuning: &RingTuning,
    active_zones: usize,
    has_zone_deactivation: bool,
) -> bool {
    has_zone_deactivation
        && tuning.cadence_rounds > 0
        && completed_round > 0
        && completed_round % tuning.cadence_rounds == 0
        && active_zones > 1
}

/// Draws the ring letter for a new game from the letters present in the layout.
pub fn choose_ring_algorithm<R: Rng + ?Sized>(zones: &[Zone], default: char, rng: &mut R) -> char {
    let mut letters: Vec<char> = zones
        .iter()
        .filter(|zone| !zone.is_spectator && !zone.is_archived)
        .filter_map(|zone| zone.ring.chars().last())
        .filter(|letter| letter.is_ascii_alphabetic())
        .collect();
    letters.push(default);
    letters.sort_unstable();
    letters.dedup();
    letters.choose(rng).copied().unwrap_or(default)
}
