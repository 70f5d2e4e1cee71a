// One resolution pass: drain every zone's queue, move players, check for a
// winner and open the next round.

pub mod handlers;
pub mod movement;
pub mod zone_order;

use std::collections::BTreeSet;

use rand_chacha::ChaCha8Rng;
use tracing::{error, info};

use crate::domain::actions::{ActionKind, PlayerAction, RoundAction};
use crate::domain::entities::{GameId, PlayerId, Round, RoundId, ZoneId};
use crate::domain::errors::ArenaError;
use crate::domain::items::ItemCatalog;
use crate::domain::narration::{Narration, NarrationEvent};
use crate::domain::ports::{Clock, GameStateStore, StoreWrite};
use crate::domain::systems::ring::{RingAdvance, should_advance_ring};
use crate::domain::systems::victory::{Victory, check_victory};
use crate::domain::tuning::ArenaTuning;
use crate::domain::world::World;
use crate::use_cases::action_queue::{complete, find_by_zone, find_idle};
use crate::use_cases::lifecycle::end_game;
use crate::use_cases::narration::NarrationPublisher;

use handlers::{ZONE_HANDLERS, ZoneContext, run_action, zone_penalty};
use movement::resolve_movement;
use zone_order::zone_order;

pub type EngineRng = ChaCha8Rng;

/// Summary of a finished resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub game_id: GameId,
    pub resolved_round_id: RoundId,
    pub round_number: u32,
    pub zone_order: Vec<ZoneId>,
    pub actions_resolved: usize,
    pub victory: Option<Victory>,
    pub next_round: Option<Round>,
    pub ring: Option<RingAdvance>,
}

pub struct RoundResolver<'a, S, C> {
    pub store: &'a S,
    pub clock: &'a C,
    pub tuning: &'a ArenaTuning,
    pub narration: &'a NarrationPublisher,
}

impl<S, C> RoundResolver<'_, S, C>
where
    S: GameStateStore,
    C: Clock,
{
    /// Resolves the game's open round. Each zone, movement and the round
    /// transition commit as separate atomic batches; narration for a batch is
    /// published only after it commits.
    ///
    /// `reveal_next` makes everyone visible from the next round on.
    pub async fn resolve(
        &self,
        game_id: GameId,
        reveal_next: bool,
        rng: &mut EngineRng,
    ) -> Result<RoundReport, ArenaError> {
        let now = self.clock.now_epoch_seconds();
        let (mut world, mut pending, catalog) = self.load(game_id).await?;
        let round_id = world.round.id;
        let round_number = world.round.number;

        let with_actions: BTreeSet<ZoneId> = pending
            .iter()
            .filter_map(|action| world.player(action.player_id))
            .filter_map(|player| player.zone_id)
            .collect();
        let order = zone_order(world.zones(), &with_actions, &mut *rng);
        let leaving = leaving_players(&world, &pending, self.tuning.ring.base_zone_capacity);
        let mut resolved = 0;

        for &zone_id in &order {
            let indices: Vec<usize> = find_by_zone(&pending, &world, zone_id)
                .into_iter()
                .filter(|index| pending[*index].kind() != ActionKind::ChangeLocation)
                .collect();

            let mut ctx = ZoneContext {
                world: &mut world,
                catalog: &catalog,
                tuning: self.tuning,
                rng: &mut *rng,
                events: vec![Narration::ZoneReport { zone_id }],
            };
            for (kind, handler) in ZONE_HANDLERS {
                for &index in &indices {
                    if pending[index].kind() == kind {
                        run_action(&mut ctx, handler, &pending[index]);
                        complete(&mut pending[index], now);
                    }
                }
            }
            zone_penalty(&mut ctx, zone_id, &leaving);
            let ZoneContext { events, .. } = ctx;

            let mut writes = world.take_writes();
            writes.extend(
                indices
                    .iter()
                    .map(|index| StoreWrite::Action(pending[*index].clone())),
            );
            self.commit(game_id, "zone", writes).await?;
            resolved += indices.len();
            self.publish(game_id, round_id, Some(zone_id), events);
        }

        let mut events = Vec::new();
        let moved = resolve_movement(
            &mut world,
            &mut pending,
            self.tuning.ring.base_zone_capacity,
            now,
            &mut events,
        );
        let mut finished = moved;
        for (index, action) in pending.iter_mut().enumerate() {
            if !action.is_completed {
                events.push(Narration::ActionSkipped {
                    actor_id: action.player_id,
                    reason: "player is not in any zone".to_string(),
                });
                complete(action, now);
                finished.push(index);
            }
        }
        let mut writes = world.take_writes();
        writes.extend(
            finished
                .iter()
                .map(|index| StoreWrite::Action(pending[*index].clone())),
        );
        self.commit(game_id, "movement", writes).await?;
        resolved += finished.len();
        self.publish(game_id, round_id, None, events);

        let victory = check_victory(world.players(), world.game().team_based);
        let mut report = RoundReport {
            game_id,
            resolved_round_id: round_id,
            round_number,
            zone_order: order,
            actions_resolved: resolved,
            victory,
            next_round: None,
            ring: None,
        };

        if let Some(victory) = victory {
            let mut events = vec![victory_narration(victory)];
            events.extend(end_game(&mut world, now));
            let mut writes = world.take_writes();
            writes.push(StoreWrite::Round(world.round.clone()));
            self.commit(game_id, "game end", writes).await?;
            self.publish(game_id, round_id, None, events);
            info!(game_id = %game_id, round = round_number, ?victory, "game finished");
            return Ok(report);
        }

        world.round.end(now);
        let everyone_visible = world.round.is_everyone_visible || reveal_next;
        let next = Round::start(game_id, round_number + 1, everyone_visible, now);
        let mut events = Vec::new();
        if everyone_visible && !world.round.is_everyone_visible {
            events.push(Narration::EveryoneVisible);
        }
        let advance_due = should_advance_ring(
            round_number,
            &self.tuning.ring,
            world.active_zone_count(),
            world.game().has_zone_deactivation,
        );
        if advance_due {
            let advance = world.advance_ring(&self.tuning.ring);
            events.extend(
                advance
                    .deactivated
                    .iter()
                    .map(|zone_id| Narration::ZoneDeactivated { zone_id: *zone_id }),
            );
            report.ring = Some(advance);
        }

        let mut writes = vec![
            StoreWrite::Round(world.round.clone()),
            StoreWrite::Round(next.clone()),
        ];
        writes.extend(world.take_writes());
        self.commit(game_id, "round transition", writes).await?;
        self.publish(game_id, round_id, None, events);
        self.publish(
            game_id,
            next.id,
            None,
            vec![Narration::RoundStarted {
                round_number: next.number,
            }],
        );

        info!(
            game_id = %game_id,
            round = round_number,
            actions = resolved,
            zones = report.zone_order.len(),
            "round resolved"
        );
        report.next_round = Some(next);
        Ok(report)
    }

    async fn load(
        &self,
        game_id: GameId,
    ) -> Result<(World, Vec<RoundAction>, ItemCatalog), ArenaError> {
        let game = self
            .store
            .game(game_id)
            .await
            .map_err(ArenaError::FatalStore)?
            .ok_or_else(|| ArenaError::not_found("game", game_id))?;
        if !game.is_active {
            return Err(ArenaError::Concurrency("game has ended".to_string()));
        }
        let round = self
            .store
            .active_round(game_id)
            .await
            .map_err(ArenaError::FatalStore)?
            .ok_or_else(|| ArenaError::Concurrency("no round is open".to_string()))?;

        let players = self
            .store
            .players(game_id)
            .await
            .map_err(ArenaError::FatalStore)?;
        let zones = self.store.zones().await.map_err(ArenaError::FatalStore)?;
        let performances = self
            .store
            .performances(game_id)
            .await
            .map_err(ArenaError::FatalStore)?;
        let catalog = self.store.catalog().await.map_err(ArenaError::FatalStore)?;
        let submitted = self
            .store
            .round_actions(round.id)
            .await
            .map_err(ArenaError::FatalStore)?;

        let world = World::new(game, round, players, zones, performances);
        let mut pending: Vec<RoundAction> = submitted
            .iter()
            .filter(|action| !action.is_completed)
            .cloned()
            .collect();
        pending.extend(idle_actions(&world, &submitted));
        pending.sort_by_key(|action| action.player_id);
        Ok((world, pending, catalog))
    }

    async fn commit(
        &self,
        game_id: GameId,
        stage: &'static str,
        writes: Vec<StoreWrite>,
    ) -> Result<(), ArenaError> {
        if writes.is_empty() {
            return Ok(());
        }
        self.store.apply_batch(writes).await.map_err(|err| {
            error!(game_id = %game_id, stage, error = %err, "resolution batch failed");
            ArenaError::FatalStore(err)
        })
    }

    fn publish(
        &self,
        game_id: GameId,
        round_id: RoundId,
        zone_id: Option<ZoneId>,
        events: Vec<Narration>,
    ) {
        self.narration.publish_all(
            events
                .into_iter()
                .map(|narration| NarrationEvent {
                    game_id,
                    round_id,
                    zone_id,
                    narration,
                })
                .collect(),
        );
    }
}

/// Actions queued on behalf of contenders who submitted nothing: bosses hunt,
/// and anyone standing in a closed zone stays put so the penalty reaches them.
fn idle_actions(world: &World, submitted: &[RoundAction]) -> Vec<RoundAction> {
    let round_id = world.round.id;
    find_idle(world.players(), submitted)
        .into_iter()
        .filter_map(|player_id| {
            let player = world.player(player_id)?;
            if player.is_boss {
                let hunt = PlayerAction::Hunt {
                    weapon_id: None,
                    target_player_id: None,
                };
                return Some(RoundAction::pending(player_id, round_id, hunt));
            }
            let zone = world.zone(player.zone_id?)?;
            (!zone.is_playable() && !zone.is_spectator).then(|| {
                RoundAction::pending(player_id, round_id, PlayerAction::StayOnLocation)
            })
        })
        .collect()
}

/// Players whose queued move goes through. Moves are replayed on a copy of
/// the state at the start of the pass, so a blocked move never dodges the
/// closed-zone penalty.
fn leaving_players(
    world: &World,
    pending: &[RoundAction],
    base_capacity: u32,
) -> BTreeSet<PlayerId> {
    let mut preview = world.clone();
    let mut moves: Vec<RoundAction> = pending
        .iter()
        .filter(|action| action.kind() == ActionKind::ChangeLocation)
        .cloned()
        .collect();
    let mut events = Vec::new();
    resolve_movement(&mut preview, &mut moves, base_capacity, 0, &mut events);
    events
        .into_iter()
        .filter_map(|event| match event {
            Narration::Moved { actor_id, .. } => Some(actor_id),
            _ => None,
        })
        .collect()
}

fn victory_narration(victory: Victory) -> Narration {
    match victory {
        Victory::Player(actor_id) => Narration::PlayerWon { actor_id },
        Victory::Team(team_id) => Narration::TeamWon { team_id },
        Victory::NoSurvivors => Narration::NoSurvivors,
    }
}
