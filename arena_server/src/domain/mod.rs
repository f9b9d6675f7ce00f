// Domain layer: core simulation types and rules.

pub mod errors;
pub mod state;
pub mod systems;
pub mod tuning;
pub mod world;

pub use state::{Entity, EntityKind, PlayerInput, Ship};
pub use tuning::Tuning;
pub use world::World;
