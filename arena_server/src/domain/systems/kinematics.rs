use crate::domain::state::Entity;
use crate::domain::tuning::arena::ArenaTuning;

/// Applies drag, then moves the body along its velocity.
pub fn integrate_linear(e: &mut Entity, friction: f32, dt: f32) {
    e.vx += e.vx * friction * dt;
    e.vy += e.vy * friction * dt;
    e.x += e.vx * dt;
    e.y += e.vy * dt;
}

pub fn integrate_angular(e: &mut Entity, dt: f32) {
    e.a += e.va * dt;
}

/// Keeps a body fully inside the arena, reflecting the velocity component that
/// pointed through the wall it hit.
pub fn bounce_off_walls(e: &mut Entity, arena: &ArenaTuning) {
    let (left, right) = (e.r, arena.width - e.r);
    let (top, bottom) = (e.r, arena.height - e.r);

    if e.x < left {
        e.x = left;
        e.vx = -e.vx;
    } else if e.x > right {
        e.x = right;
        e.vx = -e.vx;
    }

    if e.y < top {
        e.y = top;
        e.vy = -e.vy;
    } else if e.y > bottom {
        e.y = bottom;
        e.vy = -e.vy;
    }
}

/// True once the body's bounding circle has completely left the arena.
pub fn is_out_of_field(e: &Entity, arena: &ArenaTuning) -> bool {
    e.x < -e.r || e.x > arena.width + e.r || e.y < -e.r || e.y > arena.height + e.r
}
