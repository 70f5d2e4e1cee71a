// Per-round action queue: one intent per (player, round).

use std::collections::BTreeSet;

use crate::domain::actions::{ActionKind, PlayerAction, RoundAction};
use crate::domain::entities::{Player, PlayerId, RoundId, ZoneId};
use crate::domain::errors::ArenaError;
use crate::domain::ports::{GameStateStore, StoreWrite};
use crate::domain::world::World;

pub struct ActionQueue<'a, S> {
    pub store: &'a S,
}

impl<S> ActionQueue<'_, S>
where
    S: GameStateStore,
{
    /// Upserts the player's action for the round. A later call replaces the
    /// earlier one and reopens it.
    pub async fn set_action(
        &self,
        player_id: PlayerId,
        round_id: RoundId,
        action: PlayerAction,
    ) -> Result<RoundAction, ArenaError> {
        let queued = RoundAction::pending(player_id, round_id, action);
        self.store
            .apply_batch(vec![StoreWrite::Action(queued.clone())])
            .await
            .map_err(ArenaError::FatalStore)?;
        Ok(queued)
    }

    pub async fn find_by_round(
        &self,
        round_id: RoundId,
        kind: Option<ActionKind>,
    ) -> Result<Vec<RoundAction>, ArenaError> {
        let mut actions = self
            .store
            .round_actions(round_id)
            .await
            .map_err(ArenaError::FatalStore)?;
        if let Some(kind) = kind {
            actions.retain(|action| action.kind() == kind);
        }
        actions.sort_by_key(|action| action.player_id);
        Ok(actions)
    }
}

/// Indices of the actions whose actor currently stands in `zone_id`.
pub fn find_by_zone(actions: &[RoundAction], world: &World, zone_id: ZoneId) -> Vec<usize> {
    actions
        .iter()
        .enumerate()
        .filter(|(_, action)| {
            world
                .player(action.player_id)
                .is_some_and(|player| player.zone_id == Some(zone_id))
        })
        .map(|(index, _)| index)
        .collect()
}

/// Living contenders with nothing queued.
pub fn find_idle<'a>(
    players: impl IntoIterator<Item = &'a Player>,
    submitted: &[RoundAction],
) -> Vec<PlayerId> {
    let acted: BTreeSet<PlayerId> = submitted.iter().map(|action| action.player_id).collect();
    players
        .into_iter()
        .filter(|player| player.is_contender() && !acted.contains(&player.id))
        .map(|player| player.id)
        .collect()
}

pub fn complete(action: &mut RoundAction, now: u64) {
    action.complete(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{SeededGame, seeded_store};
    use uuid::Uuid;

    #[tokio::test]
    async fn when_action_is_set_twice_then_only_the_second_remains() {
        let SeededGame { store, round, players, .. } = seeded_store(3).await;
        let queue = ActionQueue { store: &store };

        queue
            .set_action(players[0], round.id, PlayerAction::Hide)
            .await
            .expect("expected first upsert");
        queue
            .set_action(players[0], round.id, PlayerAction::SearchArmor)
            .await
            .expect("expected second upsert");

        let actions = queue
            .find_by_round(round.id, None)
            .await
            .expect("expected actions");
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action, PlayerAction::SearchArmor);
        assert!(!actions[0].is_completed);
    }

    #[tokio::test]
    async fn when_completed_action_is_replaced_then_it_is_pending_again() {
        let SeededGame { store, round, players, .. } = seeded_store(2).await;
        let queue = ActionQueue { store: &store };
        let mut action = queue
            .set_action(players[1], round.id, PlayerAction::Hide)
            .await
            .expect("expected upsert");
        complete(&mut action, 5);
        store
            .apply_batch(vec![StoreWrite::Action(action)])
            .await
            .expect("expected completion write");

        let replaced = queue
            .set_action(players[1], round.id, PlayerAction::Hide)
            .await
            .expect("expected upsert");

        assert!(!replaced.is_completed);
        assert_eq!(replaced.completed_at, None);
    }

    #[tokio::test]
    async fn when_filtering_by_kind_then_other_kinds_are_dropped() {
        let SeededGame { store, round, players, .. } = seeded_store(3).await;
        let queue = ActionQueue { store: &store };
        for (player, action) in [
            (players[0], PlayerAction::Hide),
            (players[1], PlayerAction::SearchWeapon),
            (players[2], PlayerAction::Hide),
        ] {
            queue
                .set_action(player, round.id, action)
                .await
                .expect("expected upsert");
        }

        let hides = queue
            .find_by_round(round.id, Some(ActionKind::Hide))
            .await
            .expect("expected actions");

        assert_eq!(hides.len(), 2);
        assert!(hides.iter().all(|a| a.kind() == ActionKind::Hide));
    }

    #[test]
    fn when_players_have_no_action_then_they_are_idle() {
        let game_id = Uuid::new_v4();
        let round_id = Uuid::new_v4();
        let mut players: Vec<Player> = (1..=4)
            .map(|id| Player::new(id, format!("U{id}"), game_id, 100))
            .collect();
        players[2].health = 0;
        players[3].is_spectator = true;
        let submitted = vec![RoundAction::pending(1, round_id, PlayerAction::Hide)];

        assert_eq!(find_idle(&players, &submitted), vec![2]);
    }

    #[test]
    fn when_completing_twice_then_first_time_is_kept() {
        let mut action = RoundAction::pending(1, Uuid::new_v4(), PlayerAction::Hide);
        complete(&mut action, 10);
        complete(&mut action, 20);
        assert_eq!(action.completed_at, Some(10));
    }
}
