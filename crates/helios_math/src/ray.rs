use crate::Vec3;

/// Default near clip that keeps secondary rays from re-hitting the surface
/// they were spawned on.
pub const DEFAULT_T_MIN: f32 = 1e-4;

/// A ray in 3D space with a valid parameter window `[t_min, t_max]`.
///
/// `inverse_direction` holds the componentwise reciprocal of `direction`,
/// precomputed once so the AABB slab test is three multiplies per axis.
/// Primary and shadow rays carry a unit `direction`; the intersection
/// kernels themselves do not require unit length.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub inverse_direction: Vec3,
    pub t_min: f32,
    pub t_max: f32,
}

impl Ray {
    /// Create a ray with the default window `[1e-4, +inf]`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_limit(origin, direction, f32::INFINITY)
    }

    /// Create a ray with an explicit far limit. Shadow rays set this to the
    /// distance to the light so occluders beyond the light are ignored.
    pub fn with_limit(origin: Vec3, direction: Vec3, t_max: f32) -> Self {
        Self {
            origin,
            direction,
            inverse_direction: direction.recip(),
            t_min: DEFAULT_T_MIN,
            t_max,
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_defaults() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(ray.t_min, DEFAULT_T_MIN);
        assert_eq!(ray.t_max, f32::INFINITY);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_inverse_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(2.0, -4.0, 0.5));
        assert_eq!(ray.inverse_direction, Vec3::new(0.5, -0.25, 2.0));
    }

    #[test]
    fn test_inverse_direction_axis_aligned() {
        // A zero component becomes an infinity the slab test can consume.
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(ray.inverse_direction.x.is_infinite());
        assert!(ray.inverse_direction.y.is_infinite());
        assert_eq!(ray.inverse_direction.z, 1.0);
    }
}
