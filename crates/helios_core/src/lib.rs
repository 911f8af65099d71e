//! Helios core - scene representation and ray intersection.
//!
//! This crate provides:
//!
//! - **Primitives**: `Sphere`, `Plane`, `Triangle` with their analytic
//!   intersection kernels
//! - **Meshes**: `TriangleMesh` with a flat SAH-built BVH that is refit on
//!   transform changes
//! - **Shading inputs**: `Material` variants with pure BRDF evaluation,
//!   `Light` sources
//! - **Scene**: owning collections with closest-hit and occlusion queries
//! - **Loading**: a minimal OBJ subset parser
//!
//! # Example
//!
//! ```ignore
//! use helios_core::{Scene, Sphere, Material};
//! use helios_math::{Ray, Vec3};
//!
//! let mut scene = Scene::new();
//! let red = scene.add_material(Material::SolidColor { color: Vec3::new(1.0, 0.0, 0.0) });
//! scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, 3.0), 1.0, red));
//!
//! let hit = scene.closest_hit(&Ray::new(Vec3::ZERO, Vec3::Z));
//! assert!(hit.did_hit);
//! ```

mod bvh;
mod hit;
mod light;
mod material;
mod mesh;
mod obj;
mod plane;
mod scene;
mod sphere;
mod triangle;

pub use bvh::BvhNode;
pub use hit::{HitRecord, QueryKind};
pub use light::{Light, LightKind};
pub use material::{brdf, Material};
pub use mesh::TriangleMesh;
pub use obj::{load_obj, parse_obj, ObjError, ObjMesh};
pub use plane::Plane;
pub use scene::Scene;
pub use sphere::Sphere;
pub use triangle::{CullMode, Triangle};
