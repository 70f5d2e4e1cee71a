use crate::domain::actions::{ActionKind, PlayerAction, RoundAction};
use crate::domain::entities::{PlayerId, ZoneId};
use crate::domain::narration::Narration;
use crate::domain::world::World;
use crate::use_cases::lifecycle::capacity_for;

/// Applies queued location changes in player-id order.
///
/// Returns the indices of the actions it completed.
pub fn resolve_movement(
    world: &mut World,
    actions: &mut [RoundAction],
    base_capacity: u32,
    now: u64,
    events: &mut Vec<Narration>,
) -> Vec<usize> {
    let mut order: Vec<usize> = actions
        .iter()
        .enumerate()
        .filter(|(_, action)| !action.is_completed && action.kind() == ActionKind::ChangeLocation)
        .map(|(index, _)| index)
        .collect();
    order.sort_by_key(|index| actions[*index].player_id);

    let capacity = capacity_for(world.zones(), base_capacity);
    for &index in &order {
        let actor_id = actions[index].player_id;
        if let PlayerAction::ChangeLocation { location_id } = actions[index].action {
            events.push(move_player(world, actor_id, location_id, capacity));
        }
        actions[index].complete(now);
    }
    order
}

fn move_player(
    world: &mut World,
    actor_id: PlayerId,
    to_zone_id: ZoneId,
    capacity: u32,
) -> Narration {
    let blocked = |reason: &str| Narration::MoveBlocked {
        actor_id,
        to_zone_id,
        reason: reason.to_string(),
    };

    let Some(player) = world.player(actor_id) else {
        return Narration::ActionSkipped {
            actor_id,
            reason: format!("player {actor_id} not found"),
        };
    };
    if !player.is_alive() {
        return blocked("player is down");
    }
    if player.zone_id == Some(to_zone_id) {
        return blocked("already there");
    }
    let Some(zone) = world.zone(to_zone_id) else {
        return Narration::ActionSkipped {
            actor_id,
            reason: format!("zone {to_zone_id} not found"),
        };
    };
    if !zone.is_playable() || zone.is_spectator {
        return blocked("zone is closed");
    }
    let occupants = world
        .occupants(to_zone_id)
        .filter(|player| !player.is_spectator)
        .count();
    if occupants >= capacity as usize {
        return blocked("zone is full");
    }

    let Some(player) = world.player_mut(actor_id) else {
        return blocked("player vanished");
    };
    let from_zone_id = player.zone_id.replace(to_zone_id);
    Narration::Moved {
        actor_id,
        from_zone_id,
        to_zone_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Game, GameKind, Player, Round};
    use crate::frameworks::seed::default_zones;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn world(players: u64, zone_id: u32) -> World {
        let game = Game {
            id: Uuid::new_v4(),
            kind: GameKind::Arena,
            is_active: true,
            team_based: false,
            has_zone_deactivation: true,
            ring_system_algorithm: '5',
            current_ring_deactivation: 1,
            inactive_zone_penalty_power: 0,
            closed_zones: BTreeSet::new(),
            created_at: 0,
            ended_at: None,
        };
        let round = Round::start(game.id, 1, false, 0);
        let roster = (1..=players)
            .map(|id| {
                let mut player = Player::new(id, format!("U{id}"), game.id, 100);
                player.zone_id = Some(zone_id);
                player
            })
            .collect();
        World::new(game, round, roster, default_zones(), Vec::new())
    }

    #[test]
    fn when_destination_is_open_then_player_moves() {
        let mut world = world(2, 1);
        let round_id = world.round.id;
        let mut actions = vec![RoundAction::pending(
            2,
            round_id,
            PlayerAction::ChangeLocation { location_id: 2 },
        )];
        let mut events = Vec::new();

        let done = resolve_movement(&mut world, &mut actions, 6, 9, &mut events);

        assert_eq!(done, vec![0]);
        assert!(actions[0].is_completed);
        assert_eq!(world.player(2).and_then(|p| p.zone_id), Some(2));
        assert_eq!(
            events,
            vec![Narration::Moved {
                actor_id: 2,
                from_zone_id: Some(1),
                to_zone_id: 2
            }]
        );
    }

    #[test]
    fn when_destination_is_full_then_move_is_blocked() {
        let mut world = world(3, 2);
        if let Some(player) = world.player_mut(3) {
            player.zone_id = Some(1);
        }
        let round_id = world.round.id;
        let mut actions = vec![RoundAction::pending(
            3,
            round_id,
            PlayerAction::ChangeLocation { location_id: 2 },
        )];
        let mut events = Vec::new();

        resolve_movement(&mut world, &mut actions, 2, 9, &mut events);

        assert_eq!(world.player(3).and_then(|p| p.zone_id), Some(1));
        assert!(matches!(
            events.as_slice(),
            [Narration::MoveBlocked { reason, .. }] if reason == "zone is full"
        ));
        assert!(actions[0].is_completed);
    }

    #[test]
    fn when_player_died_this_round_then_move_is_blocked() {
        let mut world = world(1, 1);
        if let Some(player) = world.player_mut(1) {
            player.health = 0;
        }
        let round_id = world.round.id;
        let mut actions = vec![RoundAction::pending(
            1,
            round_id,
            PlayerAction::ChangeLocation { location_id: 2 },
        )];
        let mut events = Vec::new();

        resolve_movement(&mut world, &mut actions, 6, 9, &mut events);

        assert_eq!(world.player(1).and_then(|p| p.zone_id), Some(1));
    }
}
