// Use-case level inputs/outputs for the server loop.

use super::ports::Transport;
use crate::domain::PlayerInput;
use serde_json::value::RawValue;
use std::sync::Arc;

/// The per-tick entity list, already encoded and shared by every recipient.
pub type EncodedEntities = Arc<RawValue>;

/// Events the server loop reacts to, besides its own timers.
pub enum ServerEvent {
    /// A freshly accepted connection that needs a player.
    Arrival(Transport),
    /// Latest held keys for a player; replaces the previous input.
    Input { player_id: u64, input: PlayerInput },
    /// The connection is gone or failed. Safe to send more than once.
    Departure { player_id: u64 },
}

/// Personalised per-tick message: the shared entity list plus the recipient's id.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub entities: EncodedEntities,
    pub your_id: i64,
}

/// Read-only copy of the loop's counters, published after every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerStats {
    pub connections: usize,
    pub projectiles: usize,
    pub ticks: u64,
}
