//! Sphere primitive and its closed-form intersection kernel.

use crate::hit::HitRecord;
use helios_math::{Ray, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub origin: Vec3,
    pub radius: f32,
    pub material_index: usize,
}

impl Sphere {
    /// Create a new sphere. The radius must be positive; a zero-radius
    /// sphere is ill-formed and never hit.
    pub fn new(origin: Vec3, radius: f32, material_index: usize) -> Self {
        debug_assert!(radius > 0.0);
        Self {
            origin,
            radius,
            material_index,
        }
    }

    /// Solve the quadratic and return the candidate parameter: the smaller
    /// non-negative root, before range checking.
    fn solve(&self, ray: &Ray) -> Option<f32> {
        let oc = ray.origin - self.origin;

        let a = ray.direction.dot(ray.direction);
        let b = 2.0 * ray.direction.dot(oc);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let t_near = (-b - sqrt_d) / (2.0 * a);
        let t_far = (-b + sqrt_d) / (2.0 * a);

        // A tangent ray (discriminant == 0) collapses both roots into one.
        Some(if t_near >= 0.0 { t_near } else { t_far })
    }

    /// Closest-hit test. Updates the record when this sphere is nearer than
    /// the current hit; returns whether the ray intersects the sphere
    /// within its `[t_min, t_max]` window at all.
    pub fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        let Some(t) = self.solve(ray) else {
            return false;
        };
        if t < ray.t_min || t > ray.t_max {
            return false;
        }

        if t < rec.t {
            rec.t = t;
            rec.did_hit = true;
            rec.material_index = self.material_index;
            rec.origin = ray.at(t);
            rec.normal = (rec.origin - self.origin) / self.radius;
        }
        true
    }

    /// Occlusion test: does the ray intersect within its window?
    pub fn hit_any(&self, ray: &Ray) -> bool {
        match self.solve(ray) {
            Some(t) => t >= ray.t_min && t <= ray.t_max,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_sphere_head_on() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, 7);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, &mut rec));
        assert!(rec.did_hit);
        assert!((rec.t - 4.0).abs() < 1e-6);
        assert!((rec.origin - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
        assert!((rec.normal - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
        assert_eq!(rec.material_index, 7);
    }

    #[test]
    fn test_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, 0);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);

        let mut rec = HitRecord::default();
        assert!(!sphere.hit(&ray, &mut rec));
        assert!(!rec.did_hit);
    }

    #[test]
    fn test_tangent_ray_single_root() {
        // Grazes the unit sphere at (0, 1, 0)
        let sphere = Sphere::new(Vec3::ZERO, 1.0, 0);
        let ray = Ray::new(Vec3::new(0.0, 1.0, -5.0), Vec3::Z);

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, &mut rec));
        assert!((rec.t - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_ray_origin_inside_sphere() {
        // The near root is negative; the far root is the exit point.
        let sphere = Sphere::new(Vec3::ZERO, 2.0, 0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_window_rejects_far_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0, 0);
        let ray = Ray::with_limit(Vec3::ZERO, Vec3::Z, 5.0);

        let mut rec = HitRecord::default();
        assert!(!sphere.hit(&ray, &mut rec));
        assert!(!sphere.hit_any(&ray));
    }

    #[test]
    fn test_keeps_closer_record() {
        let near = Sphere::new(Vec3::new(0.0, 0.0, 3.0), 1.0, 1);
        let far = Sphere::new(Vec3::new(0.0, 0.0, 6.0), 1.0, 2);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let mut rec = HitRecord::default();
        far.hit(&ray, &mut rec);
        near.hit(&ray, &mut rec);
        assert_eq!(rec.material_index, 1);

        // Testing the far sphere again must not clobber the nearer hit,
        // even though it still reports an intersection.
        assert!(far.hit(&ray, &mut rec));
        assert_eq!(rec.material_index, 1);
        assert!((rec.t - 2.0).abs() < 1e-6);
    }
}
