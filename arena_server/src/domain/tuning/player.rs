use serde::Deserialize;

/// Gameplay tuning for player-controlled ships.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// World-space collision radius.
    pub radius: f32,

    /// Rotation speed in radians per second while a turn key is held.
    pub turn_rate: f32,

    /// Forward acceleration in units per second squared while thrusting.
    pub acceleration: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 15.0,
            turn_rate: 1.4,
            acceleration: 80.0,
        }
    }
}
