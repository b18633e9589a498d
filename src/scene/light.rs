//! Light Components

use glam::Vec3;

/// The closed set of light categories the light-buffer pass understands.
#[derive(Debug, Clone)]
pub enum LightKind {
    /// Constant ambient term, no position.
    Ambient,
    /// Infinitely distant light along `direction`.
    Directional { direction: Vec3 },
    /// Omnidirectional light with distance falloff.
    Point { range: f32 },
    /// Cone light; angles are half-angles in radians.
    Spot {
        direction: Vec3,
        range: f32,
        inner_cone: f32,
        outer_cone: f32,
    },
}

/// A light placed in the scene.
#[derive(Debug, Clone)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            color,
            intensity,
            kind: LightKind::Ambient,
        }
    }

    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32, direction: Vec3) -> Self {
        Self {
            position: Vec3::ZERO,
            color,
            intensity,
            kind: LightKind::Directional { direction },
        }
    }

    #[must_use]
    pub fn new_point(color: Vec3, intensity: f32, position: Vec3, range: f32) -> Self {
        Self {
            position,
            color,
            intensity,
            kind: LightKind::Point { range },
        }
    }

    #[must_use]
    pub fn new_spot(
        color: Vec3,
        intensity: f32,
        position: Vec3,
        direction: Vec3,
        range: f32,
        inner_cone: f32,
        outer_cone: f32,
    ) -> Self {
        Self {
            position,
            color,
            intensity,
            kind: LightKind::Spot {
                direction,
                range,
                inner_cone,
                outer_cone,
            },
        }
    }
}
