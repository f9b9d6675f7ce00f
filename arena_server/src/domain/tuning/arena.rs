use serde::Deserialize;

/// Gameplay tuning for the playing field itself.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    /// Arena width in world units; the field spans `[0, width]`.
    pub width: f32,

    /// Arena height in world units; the field spans `[0, height]`.
    pub height: f32,

    /// Linear drag coefficient applied to every body. Negative values decay velocity.
    pub friction: f32,

    /// Coefficient of restitution used by body-vs-body collisions.
    pub restitution: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 320.0,
            friction: -0.2,
            restitution: 0.9,
        }
    }
}
