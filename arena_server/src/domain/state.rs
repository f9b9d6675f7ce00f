// Domain-level simulation entities and input types.

/// Who a body belongs to. Ownership decides identifiers on the wire and which
/// pairs are exempt from collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player { id: u64 },
    Projectile { owner_id: u64 },
}

impl EntityKind {
    /// Signed identifier sent to clients: players are positive, projectiles carry the
    /// negated id of the player that fired them.
    pub fn wire_id(self) -> i64 {
        match self {
            EntityKind::Player { id } => id as i64,
            EntityKind::Projectile { owner_id } => -(owner_id as i64),
        }
    }

    /// The player this body belongs to (itself for players).
    pub fn owner(self) -> u64 {
        match self {
            EntityKind::Player { id } => id,
            EntityKind::Projectile { owner_id } => owner_id,
        }
    }
}

/// A simulated circular body.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    // Heading in radians; 0 points along +x.
    pub a: f32,
    pub vx: f32,
    pub vy: f32,
    pub va: f32,
    pub r: f32,
}

impl Entity {
    pub fn player(id: u64, x: f32, y: f32, r: f32) -> Self {
        Self {
            kind: EntityKind::Player { id },
            x,
            y,
            a: 0.0,
            vx: 0.0,
            vy: 0.0,
            va: 0.0,
            r,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player { .. })
    }
}

/// Keys currently held by a client. Replaced wholesale by every input message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust: bool,
    pub fire: bool,
}

/// A connected player's body plus the input that drives it.
#[derive(Debug, Clone)]
pub struct Ship {
    pub body: Entity,
    pub input: PlayerInput,
}
