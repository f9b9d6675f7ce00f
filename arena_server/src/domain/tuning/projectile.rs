use serde::Deserialize;

/// Gameplay tuning for projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// World-space collision radius.
    pub radius: f32,

    /// Muzzle speed in units per second, added on top of the shooter's velocity.
    pub speed: f32,

    /// Fraction of the muzzle speed pushed back onto the shooter.
    pub recoil: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            radius: 5.0,
            speed: 150.0,
            recoil: 0.1,
        }
    }
}
