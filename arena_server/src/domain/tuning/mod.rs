// Gameplay tuning grouped by concern; loaded once at startup and then read-only.

pub mod arena;
pub mod player;
pub mod projectile;

use serde::Deserialize;

use crate::domain::errors::InvalidTuning;
use arena::ArenaTuning;
use player::PlayerTuning;
use projectile::ProjectileTuning;

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
}

impl Tuning {
    /// Rejects values that would break the simulation invariants (bodies outside the
    /// arena, energy gain on collision, growing velocities).
    pub fn validate(&self) -> Result<(), InvalidTuning> {
        positive("arena.width", self.arena.width)?;
        positive("arena.height", self.arena.height)?;
        positive("player.radius", self.player.radius)?;
        positive("projectile.radius", self.projectile.radius)?;
        positive("projectile.speed", self.projectile.speed)?;
        finite("player.turn_rate", self.player.turn_rate)?;
        finite("player.acceleration", self.player.acceleration)?;
        finite("projectile.recoil", self.projectile.recoil)?;

        let diameter = self.player.radius * 2.0;
        if self.arena.width <= diameter || self.arena.height <= diameter {
            return Err(InvalidTuning(format!(
                "arena {}x{} cannot fit a player of radius {}",
                self.arena.width, self.arena.height, self.player.radius
            )));
        }

        finite("arena.friction", self.arena.friction)?;
        if self.arena.friction > 0.0 {
            return Err(InvalidTuning(format!(
                "arena.friction must be <= 0, got {}",
                self.arena.friction
            )));
        }

        if !(0.0..=1.0).contains(&self.arena.restitution) {
            return Err(InvalidTuning(format!(
                "arena.restitution must be within [0, 1], got {}",
                self.arena.restitution
            )));
        }

        Ok(())
    }
}

fn finite(name: &str, value: f32) -> Result<(), InvalidTuning> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InvalidTuning(format!("{name} must be finite, got {value}")))
    }
}

fn positive(name: &str, value: f32) -> Result<(), InvalidTuning> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(InvalidTuning(format!("{name} must be positive, got {value}")))
    }
}
