//! Infinite plane primitive.

use crate::hit::HitRecord;
use helios_math::{Ray, Vec3};

/// An infinite plane through `origin` with unit `normal`.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub origin: Vec3,
    pub normal: Vec3,
    pub material_index: usize,
}

impl Plane {
    pub fn new(origin: Vec3, normal: Vec3, material_index: usize) -> Self {
        debug_assert!(normal.is_normalized());
        Self {
            origin,
            normal,
            material_index,
        }
    }

    fn solve(&self, ray: &Ray) -> f32 {
        // A grazing ray (direction orthogonal to the normal) divides by
        // zero; the resulting infinity or NaN fails the window check.
        (self.origin - ray.origin).dot(self.normal) / ray.direction.dot(self.normal)
    }

    /// Closest-hit test. The recorded normal is the plane normal, never
    /// flipped toward the ray.
    pub fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        let t = self.solve(ray);
        if !(t >= ray.t_min && t <= ray.t_max) {
            return false;
        }

        if t < rec.t {
            rec.t = t;
            rec.did_hit = true;
            rec.material_index = self.material_index;
            rec.origin = ray.at(t);
            rec.normal = self.normal;
        }
        true
    }

    /// Occlusion test.
    pub fn hit_any(&self, ray: &Ray) -> bool {
        let t = self.solve(ray);
        t >= ray.t_min && t <= ray.t_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xz_plane_from_above() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y, 3);
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y);

        let mut rec = HitRecord::default();
        assert!(plane.hit(&ray, &mut rec));
        assert!((rec.t - 5.0).abs() < 1e-6);
        assert!(rec.origin.length() < 1e-6);
        assert_eq!(rec.normal, Vec3::Y);
        assert_eq!(rec.material_index, 3);
    }

    #[test]
    fn test_grazing_ray_misses() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y, 0);
        // Direction orthogonal to the normal: d.n == 0
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);

        let mut rec = HitRecord::default();
        assert!(!plane.hit(&ray, &mut rec));
        assert!(!plane.hit_any(&ray));
    }

    #[test]
    fn test_plane_behind_ray() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y, 0);
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);

        let mut rec = HitRecord::default();
        assert!(!plane.hit(&ray, &mut rec));
    }

    #[test]
    fn test_normal_not_flipped_from_below() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y, 0);
        let ray = Ray::new(Vec3::new(0.0, -2.0, 0.0), Vec3::Y);

        let mut rec = HitRecord::default();
        assert!(plane.hit(&ray, &mut rec));
        assert_eq!(rec.normal, Vec3::Y);
    }
}
