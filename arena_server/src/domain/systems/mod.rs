// Pure simulation systems; no shared state, no I/O.

pub mod collision;
pub mod kinematics;
pub mod ship_control;
