use crate::{Ray, Vec3};

/// Axis-aligned bounding box stored as two corner points.
///
/// The empty box uses inverted infinite corners so that growing it by any
/// point yields that point's degenerate box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// A box that contains nothing (min > max on every axis).
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create a box from two corner points (in any order).
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Extend the box to contain a point.
    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// The componentwise union of two boxes.
    pub fn union(a: &Aabb, b: &Aabb) -> Aabb {
        Aabb {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Half-surface-area proxy `xy + yz + zx`, the quantity the SAH split
    /// cost is measured in. Not the true surface area (that would be twice
    /// this); only ratios matter to the heuristic.
    pub fn half_area(&self) -> f32 {
        let extent = self.max - self.min;
        extent.x * extent.y + extent.y * extent.z + extent.z * extent.x
    }

    /// Slab test against a ray using its precomputed reciprocals.
    ///
    /// Axis-aligned rays produce infinities that IEEE arithmetic resolves
    /// correctly: an axis the ray is parallel to either always passes
    /// (origin inside the slab) or forces an empty interval.
    pub fn hit(&self, ray: &Ray) -> bool {
        let t1 = (self.min - ray.origin) * ray.inverse_direction;
        let t2 = (self.max - ray.origin) * ray.inverse_direction;

        let t_near = t1.min(t2).max_element();
        let t_far = t1.max(t2).min_element();

        t_far >= 0.0 && t_far >= t_near
    }
}
