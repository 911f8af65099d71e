//! Analytic light sources.

use helios_math::{ColorRGB, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Directional,
}

/// A point or directional light.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub kind: LightKind,
    pub origin: Vec3,
    pub direction: Vec3,
    pub color: ColorRGB,
    pub intensity: f32,
}

impl Light {
    pub fn point(origin: Vec3, color: ColorRGB, intensity: f32) -> Self {
        Self {
            kind: LightKind::Point,
            origin,
            direction: Vec3::ZERO,
            color,
            intensity,
        }
    }

    /// `direction` is the direction the light shines in (toward surfaces).
    pub fn directional(direction: Vec3, color: ColorRGB, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            origin: Vec3::ZERO,
            direction: direction.normalize(),
            color,
            intensity,
        }
    }

    /// Vector from `target` to the light. For a point light the length is
    /// the distance to the light (shadow rays use it as their far limit);
    /// for a directional light it is the unit vector opposing the light
    /// direction.
    pub fn direction_to(&self, target: Vec3) -> Vec3 {
        match self.kind {
            LightKind::Point => self.origin - target,
            LightKind::Directional => -self.direction,
        }
    }

    /// Incident radiance at `target`: inverse-square falloff for point
    /// lights, constant for directional lights.
    pub fn radiance(&self, target: Vec3) -> ColorRGB {
        match self.kind {
            LightKind::Point => {
                self.color * self.intensity / (self.origin - target).length_squared()
            }
            LightKind::Directional => self.color * self.intensity,
        }
    }
}
