// Working copy of one game's state during a resolution pass. Tracks which
// entities changed so each zone can commit exactly its own writes. Zones are
// the shared layout with this game's closed zones applied.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::abilities::ModifierSet;
use crate::domain::entities::{Game, Player, PlayerId, PlayerPerformance, Round, Zone, ZoneId};
use crate::domain::perks::effective_abilities;
use crate::domain::ports::StoreWrite;
use crate::domain::systems::ring::{RingAdvance, advance_ring};
use crate::domain::tuning::RingTuning;

#[derive(Debug, Clone)]
pub struct World {
    pub round: Round,
    game: Game,
    players: BTreeMap<PlayerId, Player>,
    zones: Vec<Zone>,
    performances: BTreeMap<PlayerId, PlayerPerformance>,
    game_dirty: bool,
    dirty_players: BTreeSet<PlayerId>,
    dirty_performances: BTreeSet<PlayerId>,
}

impl World {
    pub fn new(
        game: Game,
        round: Round,
        players: Vec<Player>,
        layout: Vec<Zone>,
        performances: Vec<PlayerPerformance>,
    ) -> Self {
        let mut zones = game.zone_view(layout);
        zones.sort_by_key(|zone| zone.id);
        Self {
            round,
            game,
            players: players.into_iter().map(|p| (p.id, p)).collect(),
            zones,
            performances: performances
                .into_iter()
                .map(|p| (p.player_id, p))
                .collect(),
            game_dirty: false,
            dirty_players: BTreeSet::new(),
            dirty_performances: BTreeSet::new(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        self.game_dirty = true;
        &mut self.game
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        let player = self.players.get_mut(&id)?;
        self.dirty_players.insert(id);
        Some(player)
    }

    /// Players ordered by id.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn occupants(&self, zone_id: ZoneId) -> impl Iterator<Item = &Player> {
        self.players
            .values()
            .filter(move |player| player.zone_id == Some(zone_id))
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Runs `f` with two distinct players borrowed mutably at once.
    pub fn with_pair<T>(
        &mut self,
        first: PlayerId,
        second: PlayerId,
        f: impl FnOnce(&mut Player, &mut Player) -> T,
    ) -> Option<T> {
        if first == second {
            return None;
        }
        let mut other = self.players.remove(&second)?;
        let result = self.players.get_mut(&first).map(|player| f(player, &mut other));
        self.players.insert(second, other);
        if result.is_some() {
            self.dirty_players.insert(first);
            self.dirty_players.insert(second);
        }
        result
    }

    pub fn performance_mut(&mut self, player_id: PlayerId) -> &mut PlayerPerformance {
        self.dirty_performances.insert(player_id);
        let game_id = self.game.id;
        self.performances
            .entry(player_id)
            .or_insert_with(|| PlayerPerformance::new(player_id, game_id))
    }

    pub fn performance(&self, player_id: PlayerId) -> Option<&PlayerPerformance> {
        self.performances.get(&player_id)
    }

    pub fn first_blood_taken(&self) -> bool {
        self.performances.values().any(|p| p.first_blood)
    }

    /// Counts a kill; returns true when it is the first of the game.
    pub fn record_kill(&mut self, killer: PlayerId) -> bool {
        let first_blood = !self.first_blood_taken();
        let performance = self.performance_mut(killer);
        performance.kills += 1;
        if first_blood {
            performance.first_blood = true;
        }
        first_blood
    }

    /// Base abilities combined with cheer perks.
    pub fn abilities_of(&self, id: PlayerId, flat_multiplier: Option<f64>) -> ModifierSet {
        match self.players.get(&id) {
            Some(player) => {
                effective_abilities(&player.abilities, player.cheers_received, flat_multiplier)
            }
            None => ModifierSet::default(),
        }
    }

    pub fn active_zone_count(&self) -> usize {
        self.zones
            .iter()
            .filter(|zone| zone.is_playable() && !zone.is_spectator)
            .count()
    }

    pub fn advance_ring(&mut self, tuning: &RingTuning) -> RingAdvance {
        self.game_dirty = true;
        advance_ring(&mut self.game, &mut self.zones, tuning)
    }

    /// Drains pending changes into store writes, ordered game, players, performances.
    pub fn take_writes(&mut self) -> Vec<StoreWrite> {
        let mut writes = Vec::new();
        if std::mem::take(&mut self.game_dirty) {
            writes.push(StoreWrite::Game(self.game.clone()));
        }
        for id in std::mem::take(&mut self.dirty_players) {
            if let Some(player) = self.players.get(&id) {
                writes.push(StoreWrite::Player(player.clone()));
            }
        }
        for id in std::mem::take(&mut self.dirty_performances) {
            if let Some(performance) = self.performances.get(&id) {
                writes.push(StoreWrite::Performance(performance.clone()));
            }
        }
        writes
    }
}
