//! Hit record and query classification for ray-object intersection.

use helios_math::Vec3;

/// Which kind of query an intersection kernel is serving.
///
/// Closest-hit (primary) queries and occlusion (shadow) queries apply
/// opposite face-culling rules: a shadow ray travelling from a surface
/// toward a light crosses triangles in the reverse direction, so the side
/// that occludes is the side a camera ray would have culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Primary,
    Shadow,
}

/// Record of the closest intersection found so far along a ray.
///
/// `t` starts at infinity; kernels only write the record when they find a
/// strictly closer hit, so a record can be threaded through any number of
/// primitive tests. When `did_hit` is true, `t` is finite and `normal` is
/// unit length.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Hit point: ray origin + t * ray direction
    pub origin: Vec3,
    /// Outward unit surface normal at the hit point
    pub normal: Vec3,
    /// Ray parameter of the hit
    pub t: f32,
    /// Index into the scene's material list
    pub material_index: usize,
    pub did_hit: bool,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            normal: Vec3::ZERO,
            t: f32::INFINITY,
            material_index: 0,
            did_hit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_a_miss_at_infinity() {
        let rec = HitRecord::default();
        assert!(!rec.did_hit);
        assert_eq!(rec.t, f32::INFINITY);
    }
}
