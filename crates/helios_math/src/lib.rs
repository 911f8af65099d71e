//! Math kernel for the helios CPU ray tracer.
//!
//! Re-exports glam for vector and matrix algebra and layers the tracer's
//! domain types on top: rays with precomputed slab-test reciprocals,
//! min/max-corner bounding boxes, and RGB color helpers.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod color;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use color::{max_to_one, pack_rgb, ColorRGB};
pub use ray::Ray;
pub use transform::Mat4Ext;
