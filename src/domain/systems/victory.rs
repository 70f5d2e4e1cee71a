use std::collections::BTreeSet;

use crate::domain::entities::{Player, PlayerId, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Victory {
    Player(PlayerId),
    Team(TeamId),
    NoSurvivors,
}

/// Returns the game result once at most one contender (or one team) remains.
pub fn check_victory<'a>(
    players: impl IntoIterator<Item = &'a Player>,
    team_based: bool,
) -> Option<Victory> {
    let contenders: Vec<&Player> = players
        .into_iter()
        .filter(|player| player.is_contender())
        .collect();

    match contenders.as_slice() {
        [] => return Some(Victory::NoSurvivors),
        [last] => {
            return Some(match (team_based, last.team_id) {
                (true, Some(team_id)) => Victory::Team(team_id),
                _ => Victory::Player(last.id),
            });
        }
        _ => {}
    }

    if !team_based {
        return None;
    }

    // Solo players without a team count as their own side.
    if contenders.iter().any(|player| player.team_id.is_none()) {
        return None;
    }
    let teams: BTreeSet<TeamId> = contenders
        .iter()
        .filter_map(|player| player.team_id)
        .collect();
    match teams.len() {
        1 => teams.first().copied().map(Victory::Team),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn roster(count: u64) -> Vec<Player> {
        let game_id = Uuid::new_v4();
        (1..=count)
            .map(|id| Player::new(id, format!("U{id}"), game_id, 100))
            .collect()
    }

    #[test]
    fn when_several_players_live_then_there_is_no_winner() {
        assert_eq!(check_victory(&roster(3), false), None);
    }

    #[test]
    fn when_one_player_lives_then_they_win() {
        let mut players = roster(3);
        players[0].health = 0;
        players[2].health = 0;

        assert_eq!(check_victory(&players, false), Some(Victory::Player(2)));
    }

    #[test]
    fn when_only_spectators_remain_then_nobody_survives() {
        let mut players = roster(2);
        players[0].health = 0;
        players[1].is_spectator = true;

        assert_eq!(check_victory(&players, false), Some(Victory::NoSurvivors));
    }

    #[test]
    fn when_one_team_remains_then_team_wins() {
        let mut players = roster(4);
        players[0].team_id = Some(1);
        players[1].team_id = Some(1);
        players[2].team_id = Some(2);
        players[3].team_id = Some(2);
        players[2].health = 0;
        players[3].health = 0;

        assert_eq!(check_victory(&players, true), Some(Victory::Team(1)));
        assert_eq!(check_victory(&players, false), None);
    }
}
