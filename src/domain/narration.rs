// Structured narration facts emitted by round resolution.
// Rendering to chat text happens outside the engine.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{GameId, PlayerId, RoundId, TeamId, ZoneId};
use crate::domain::items::ItemId;
use crate::domain::perks::Perk;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Armor,
    Healthkit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Narration {
    RoundStarted {
        round_number: u32,
    },
    // Header for a zone's block of events.
    ZoneReport {
        zone_id: ZoneId,
    },
    ItemFound {
        actor_id: PlayerId,
        item: ItemKind,
        item_id: ItemId,
    },
    NothingFound {
        actor_id: PlayerId,
        item: ItemKind,
    },
    Healed {
        actor_id: PlayerId,
        amount: u32,
    },
    Revived {
        actor_id: PlayerId,
        target_id: PlayerId,
        amount: u32,
    },
    Hid {
        actor_id: PlayerId,
    },
    // Hiding failed because the round forces everyone visible.
    Exposed {
        actor_id: PlayerId,
    },
    NoTargets {
        actor_id: PlayerId,
    },
    Missed {
        actor_id: PlayerId,
        target_id: PlayerId,
    },
    Hit {
        actor_id: PlayerId,
        target_id: PlayerId,
        amount: u32,
        weapon_id: Option<ItemId>,
    },
    ArmorBroken {
        actor_id: PlayerId,
        target_id: PlayerId,
    },
    Killed {
        actor_id: PlayerId,
        target_id: PlayerId,
    },
    FirstBlood {
        actor_id: PlayerId,
    },
    WeaponLooted {
        actor_id: PlayerId,
        target_id: PlayerId,
        weapon_id: ItemId,
    },
    HealthkitApplied {
        actor_id: PlayerId,
        target_id: PlayerId,
        amount: u32,
    },
    HealthkitsLooted {
        actor_id: PlayerId,
        target_id: PlayerId,
        amount: u32,
    },
    Cheered {
        actor_id: PlayerId,
        target_id: PlayerId,
    },
    PerkUnlocked {
        actor_id: PlayerId,
        perk: Perk,
    },
    ZonePenalty {
        actor_id: PlayerId,
        amount: u32,
    },
    CollapsedInZone {
        actor_id: PlayerId,
    },
    Moved {
        actor_id: PlayerId,
        from_zone_id: Option<ZoneId>,
        to_zone_id: ZoneId,
    },
    MoveBlocked {
        actor_id: PlayerId,
        to_zone_id: ZoneId,
        reason: String,
    },
    // A queued action referenced something that no longer exists.
    ActionSkipped {
        actor_id: PlayerId,
        reason: String,
    },
    ZoneDeactivated {
        zone_id: ZoneId,
    },
    // Hiding stops working from the next round on.
    EveryoneVisible,
    PlayerWon {
        actor_id: PlayerId,
    },
    TeamWon {
        team_id: TeamId,
    },
    NoSurvivors,
    GameEnded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationEvent {
    pub game_id: GameId,
    pub round_id: RoundId,
    pub zone_id: Option<ZoneId>,
    #[serde(flatten)]
    pub narration: Narration,
}
