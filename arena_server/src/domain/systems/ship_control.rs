use crate::domain::state::{Entity, EntityKind, PlayerInput};
use crate::domain::tuning::player::PlayerTuning;
use crate::domain::tuning::projectile::ProjectileTuning;

/// Sets angular velocity from the turn keys and integrates the heading.
/// Holding both keys cancels steering.
pub fn steer(e: &mut Entity, input: &PlayerInput, tuning: &PlayerTuning, dt: f32) {
    e.va = match (input.turn_left, input.turn_right) {
        (true, false) => -tuning.turn_rate,
        (false, true) => tuning.turn_rate,
        _ => 0.0,
    };
    super::kinematics::integrate_angular(e, dt);
}

/// Accelerates along the current heading.
pub fn thrust(e: &mut Entity, tuning: &PlayerTuning, dt: f32) {
    let (dir_y, dir_x) = e.a.sin_cos();
    e.vx += dir_x * tuning.acceleration * dt;
    e.vy += dir_y * tuning.acceleration * dt;
}

/// Spawns a projectile at the shooter's centre and pushes the shooter back.
pub fn fire(shooter: &mut Entity, owner_id: u64, tuning: &ProjectileTuning) -> Entity {
    let (dir_y, dir_x) = shooter.a.sin_cos();

    let projectile = Entity {
        kind: EntityKind::Projectile { owner_id },
        x: shooter.x,
        y: shooter.y,
        a: shooter.a,
        vx: shooter.vx + dir_x * tuning.speed,
        vy: shooter.vy + dir_y * tuning.speed,
        va: 0.0,
        r: tuning.radius,
    };

    let kick = tuning.speed * tuning.recoil;
    shooter.vx -= dir_x * kick;
    shooter.vy -= dir_y * kick;

    projectile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship() -> Entity {
        Entity::player(3, 100.0, 100.0, 15.0)
    }

    #[test]
    fn when_both_turn_keys_are_held_then_heading_is_unchanged() {
        let mut e = ship();
        let input = PlayerInput {
            turn_left: true,
            turn_right: true,
            ..PlayerInput::default()
        };

        steer(&mut e, &input, &PlayerTuning::default(), 0.1);

        assert_eq!(e.va, 0.0);
        assert_eq!(e.a, 0.0);
    }

    #[test]
    fn when_turning_left_then_heading_decreases() {
        let mut e = ship();
        let tuning = PlayerTuning::default();
        let input = PlayerInput {
            turn_left: true,
            ..PlayerInput::default()
        };

        steer(&mut e, &input, &tuning, 0.5);

        assert_eq!(e.va, -tuning.turn_rate);
        assert!((e.a + tuning.turn_rate * 0.5).abs() < 1e-6);
    }

    #[test]
    fn when_thrusting_at_heading_zero_then_only_vx_grows() {
        let mut e = ship();
        let tuning = PlayerTuning::default();

        thrust(&mut e, &tuning, 0.1);

        assert!((e.vx - tuning.acceleration * 0.1).abs() < 1e-5);
        assert!(e.vy.abs() < 1e-6);
    }

    #[test]
    fn when_firing_then_projectile_inherits_shooter_velocity_and_shooter_recoils() {
        let mut e = ship();
        e.vx = 10.0;
        e.a = std::f32::consts::FRAC_PI_2;
        let tuning = ProjectileTuning::default();

        let p = fire(&mut e, 3, &tuning);

        assert_eq!(p.kind.wire_id(), -3);
        assert_eq!(p.r, tuning.radius);
        assert_eq!((p.x, p.y), (100.0, 100.0));
        assert!((p.vx - 10.0).abs() < 1e-4);
        assert!((p.vy - tuning.speed).abs() < 1e-4);
        assert!((e.vy + tuning.speed * tuning.recoil).abs() < 1e-4);
        assert!((e.vx - 10.0).abs() < 1e-4);
    }
}
