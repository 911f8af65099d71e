// Transform utilities for Mat4
//
// Extends glam::Mat4 with the vector and normal transforms the tracer
// needs. glam::Mat4 already provides transform_point3() and inverse().

use glam::{Mat4, Vec3, Vec4};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a vector in 3D space (applies rotation and scale, but NOT
    /// translation). Vectors have an implicit w=0 component.
    fn transform_vector3(&self, vector: Vec3) -> Vec3;

    /// Transform a surface normal by this matrix and renormalize.
    ///
    /// Valid for rotations, translations and uniform scale. Under
    /// non-uniform scale the result is skewed; the inverse-transpose of
    /// the matrix would be required instead.
    fn transform_normal(&self, normal: Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn transform_vector3(&self, vector: Vec3) -> Vec3 {
        // Transform as direction (w=0) - translation should not affect vectors
        let v4 = Vec4::new(vector.x, vector.y, vector.z, 0.0);
        let transformed = *self * v4;
        Vec3::new(transformed.x, transformed.y, transformed.z)
    }

    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.transform_vector3(normal).normalize()
    }
}
