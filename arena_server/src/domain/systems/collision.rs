use crate::domain::state::Entity;

/// Bodies belonging to the same player never collide: a ship with itself, a ship with
/// its own projectiles, or two projectiles fired by the same ship.
pub fn is_exempt(a: &Entity, b: &Entity) -> bool {
    a.kind.owner() == b.kind.owner()
}

/// Separates two overlapping circles and exchanges momentum along the contact normal.
///
/// Each body is pushed out in proportion to the *other* body's radius, so the larger
/// body yields less and the pair ends up exactly touching. The impulse uses the
/// relative normal velocity and the restitution coefficient, again weighted by the
/// opposing radius. Returns `false` when nothing was resolved, including coincident
/// centres where the normal is undefined.
pub fn resolve_pair(a: &mut Entity, b: &mut Entity, restitution: f32) -> bool {
    if is_exempt(a, b) {
        return false;
    }

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d = dx.hypot(dy);
    let l = a.r + b.r;
    if d == 0.0 || !d.is_finite() || d >= l {
        return false;
    }

    let nx = dx / d;
    let ny = dy / d;

    let overlap = l - d;
    let push_a = overlap * b.r / l;
    let push_b = overlap * a.r / l;
    a.x -= nx * push_a;
    a.y -= ny * push_a;
    b.x += nx * push_b;
    b.y += ny * push_b;

    let dvx = b.vx - a.vx;
    let dvy = b.vy - a.vy;
    let impulse = (dvx * nx + dvy * ny) * (1.0 + restitution) / l;
    a.vx += nx * impulse * b.r;
    a.vy += ny * impulse * b.r;
    b.vx -= nx * impulse * a.r;
    b.vy -= ny * impulse * a.r;

    true
}

/// Resolves every unordered pair once (naive O(n^2)). Returns the number of contacts.
pub fn resolve_all(bodies: &mut [&mut Entity], restitution: f32) -> usize {
    let mut contacts = 0;
    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut *head[i];
        for b in tail.iter_mut() {
            if resolve_pair(a, b, restitution) {
                contacts += 1;
            }
        }
    }
    contacts
}
