//! Triangle primitive with the Möller-Trumbore intersection kernel.

use crate::hit::{HitRecord, QueryKind};
use helios_math::{Ray, Vec3};

/// Which side of a triangle is ignored by intersection tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    FrontFace,
    #[default]
    BackFace,
    NoCulling,
}

/// A single triangle with a stored unit face normal.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    pub normal: Vec3,
    pub cull_mode: CullMode,
    pub material_index: usize,
}

impl Triangle {
    /// Create a triangle, deriving the face normal from the winding order.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, cull_mode: CullMode, material_index: usize) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize();
        Self {
            v0,
            v1,
            v2,
            normal,
            cull_mode,
            material_index,
        }
    }

    /// Create a triangle with an explicitly supplied normal.
    pub fn with_normal(
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        normal: Vec3,
        cull_mode: CullMode,
        material_index: usize,
    ) -> Self {
        Self {
            v0,
            v1,
            v2,
            normal: normal.normalize(),
            cull_mode,
            material_index,
        }
    }

    /// Arithmetic mean of the three vertices.
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Closest-hit test. Updates the record when this triangle is nearer
    /// than the current hit.
    pub fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        let Some(t) = moller_trumbore(
            self.v0,
            self.v1,
            self.v2,
            self.cull_mode,
            ray,
            QueryKind::Primary,
        ) else {
            return false;
        };

        if t < rec.t {
            rec.t = t;
            rec.did_hit = true;
            rec.material_index = self.material_index;
            rec.origin = ray.at(t);
            rec.normal = self.normal;
        }
        true
    }

    /// Occlusion test, applying the shadow-query culling rules.
    pub fn hit_any(&self, ray: &Ray) -> bool {
        moller_trumbore(
            self.v0,
            self.v1,
            self.v2,
            self.cull_mode,
            ray,
            QueryKind::Shadow,
        )
        .is_some()
    }
}

/// Möller-Trumbore ray-triangle intersection.
///
/// The determinant's sign encodes which side the ray approaches from, so
/// culling is a sign test on `det`. Shadow queries invert the test: a
/// shadow ray runs from the surface toward the light, crossing the
/// triangle in the opposite sense of the camera ray that would see it, and
/// an opaque mesh must still occlude through its culled side.
pub(crate) fn moller_trumbore(
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    cull_mode: CullMode,
    ray: &Ray,
    query: QueryKind,
) -> Option<f32> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;

    let p = ray.direction.cross(e2);
    let det = e1.dot(p);

    match (cull_mode, query) {
        (CullMode::BackFace, QueryKind::Primary) if det < 0.0 => return None,
        (CullMode::BackFace, QueryKind::Shadow) if det > 0.0 => return None,
        (CullMode::FrontFace, QueryKind::Primary) if det > 0.0 => return None,
        (CullMode::FrontFace, QueryKind::Shadow) if det < 0.0 => return None,
        _ => {}
    }

    // Degenerate triangles and exactly in-plane rays
    if det == 0.0 {
        return None;
    }

    let inv = 1.0 / det;
    let s = ray.origin - v0;

    let u = inv * s.dot(p);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = inv * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv * e2.dot(q);
    if t < ray.t_min || t > ray.t_max {
        return None;
    }

    Some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_triangle(cull_mode: CullMode) -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            cull_mode,
            0,
        )
    }

    #[test]
    fn test_hit_through_interior() {
        let tri = test_triangle(CullMode::NoCulling);
        let ray = Ray::new(Vec3::new(0.0, 1.0, -1.0), Vec3::Z);

        let mut rec = HitRecord::default();
        assert!(tri.hit(&ray, &mut rec));
        assert!((rec.t - 1.0).abs() < 1e-6);
        assert!((rec.origin - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);
        assert_eq!(rec.normal, tri.normal);
    }

    #[test]
    fn test_miss_outside_edges() {
        let tri = test_triangle(CullMode::NoCulling);

        let mut rec = HitRecord::default();
        // Past v2 in y
        assert!(!tri.hit(&Ray::new(Vec3::new(0.0, 3.0, -1.0), Vec3::Z), &mut rec));
        // Off to the side
        assert!(!tri.hit(&Ray::new(Vec3::new(2.0, 0.5, -1.0), Vec3::Z), &mut rec));
    }

    #[test]
    fn test_in_plane_ray_misses() {
        let tri = test_triangle(CullMode::NoCulling);
        let ray = Ray::new(Vec3::new(-5.0, 0.5, 0.0), Vec3::X);

        let mut rec = HitRecord::default();
        assert!(!tri.hit(&ray, &mut rec));
    }

    #[test]
    fn test_degenerate_triangle_misses() {
        // All three vertices on a line: zero-area, det == 0
        let tri = Triangle::with_normal(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::Y,
            CullMode::NoCulling,
            0,
        );
        let ray = Ray::new(Vec3::new(1.0, 1.0, 0.0), -Vec3::Y);

        let mut rec = HitRecord::default();
        assert!(!tri.hit(&ray, &mut rec));
    }

    #[test]
    fn test_backface_culling_front_vs_back() {
        let tri = test_triangle(CullMode::BackFace);

        // The derived normal points +Z; approaching against the normal
        // sees the front face.
        let front = Ray::new(Vec3::new(0.0, 1.0, 1.0), -Vec3::Z);
        let back = Ray::new(Vec3::new(0.0, 1.0, -1.0), Vec3::Z);

        let mut rec = HitRecord::default();
        assert!(tri.hit(&front, &mut rec));

        let mut rec = HitRecord::default();
        assert!(!tri.hit(&back, &mut rec));
    }

    #[test]
    fn test_frontface_culling_inverts() {
        let tri = test_triangle(CullMode::FrontFace);

        let front = Ray::new(Vec3::new(0.0, 1.0, 1.0), -Vec3::Z);
        let back = Ray::new(Vec3::new(0.0, 1.0, -1.0), Vec3::Z);

        let mut rec = HitRecord::default();
        assert!(!tri.hit(&front, &mut rec));

        let mut rec = HitRecord::default();
        assert!(tri.hit(&back, &mut rec));
    }

    #[test]
    fn test_shadow_query_occludes_through_culled_side() {
        let tri = test_triangle(CullMode::BackFace);
        let back = Ray::new(Vec3::new(0.0, 1.0, -1.0), Vec3::Z);

        // A camera ray from the back is culled, but the same ray as a
        // shadow query is occluded.
        let mut rec = HitRecord::default();
        assert!(!tri.hit(&back, &mut rec));
        assert!(tri.hit_any(&back));

        // And symmetrically: the front side stops camera rays but not
        // shadow rays.
        let front = Ray::new(Vec3::new(0.0, 1.0, 1.0), -Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(tri.hit(&front, &mut rec));
        assert!(!tri.hit_any(&front));
    }

    #[test]
    fn test_bias_epsilon_avoids_self_intersection() {
        let tri = test_triangle(CullMode::NoCulling);

        // Start exactly on the surface, nudged along the normal, shooting
        // away: the t_min window must reject the surface itself.
        let origin = Vec3::new(0.0, 1.0, 0.0) + tri.normal * 2e-4;
        let ray = Ray::new(origin, tri.normal);
        assert!(!tri.hit_any(&ray));
    }
}
