use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::domain::entities::{Zone, ZoneId};

/// Order in which zones with pending actions are resolved.
///
/// Active zones come before closed ones and are shuffled within each group.
/// The spectator zone goes last among the zones of its group.
pub fn zone_order<R: Rng + ?Sized>(
    zones: &[Zone],
    with_actions: &BTreeSet<ZoneId>,
    rng: &mut R,
) -> Vec<ZoneId> {
    let mut active = Vec::new();
    let mut active_spectator = Vec::new();
    let mut inactive = Vec::new();
    let mut inactive_spectator = Vec::new();

    let mut candidates: Vec<&Zone> = zones
        .iter()
        .filter(|zone| with_actions.contains(&zone.id))
        .collect();
    candidates.sort_by_key(|zone| zone.id);

    for zone in candidates {
        let bucket = match (zone.is_playable(), zone.is_spectator) {
            (true, false) => &mut active,
            (true, true) => &mut active_spectator,
            (false, false) => &mut inactive,
            (false, true) => &mut inactive_spectator,
        };
        bucket.push(zone.id);
    }

    active.shuffle(rng);
    inactive.shuffle(rng);

    active
        .into_iter()
        .chain(active_spectator)
        .chain(inactive)
        .chain(inactive_spectator)
        .collect()
}
