// Wire protocol DTOs and conversions for public arena server messages.

use crate::domain::{Entity, PlayerInput};
use crate::use_cases::ServerStats;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Flattened body state for snapshots. Field names are part of the client contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityStateDto {
    pub x: f32,
    pub y: f32,
    pub a: f32,
    pub vx: f32,
    pub vy: f32,
    pub va: f32,
    pub r: f32,
    // Positive for ships, negated owner id for projectiles.
    pub id: i64,
}

impl From<&Entity> for EntityStateDto {
    fn from(e: &Entity) -> Self {
        Self {
            x: e.x,
            y: e.y,
            a: e.a,
            vx: e.vx,
            vy: e.vy,
            va: e.va,
            r: e.r,
            id: e.kind.wire_id(),
        }
    }
}

/// Per-recipient envelope around the shared, pre-encoded entity list.
#[derive(Debug, Serialize)]
pub struct SnapshotDto<'a> {
    pub players: &'a RawValue,
    pub yourid: i64,
}

/// Held keys sent by the client whenever they change. Missing keys are released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PlayerInputDto {
    #[serde(default)]
    pub l: bool,
    #[serde(default)]
    pub r: bool,
    #[serde(default)]
    pub u: bool,
    #[serde(default)]
    pub d: bool,
}

impl From<PlayerInputDto> for PlayerInput {
    fn from(input: PlayerInputDto) -> Self {
        Self {
            turn_left: input.l,
            turn_right: input.r,
            thrust: input.u,
            fire: input.d,
        }
    }
}

/// Counters exposed on the internal stats route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsDto {
    pub connections: usize,
    pub projectiles: usize,
    pub ticks: u64,
}

impl From<ServerStats> for StatsDto {
    fn from(stats: ServerStats) -> Self {
        Self {
            connections: stats.connections,
            projectiles: stats.projectiles,
            ticks: stats.ticks,
        }
    }
}
