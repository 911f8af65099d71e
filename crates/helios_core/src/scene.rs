//! Scene ownership and ray queries.
//!
//! The scene owns parallel collections of primitives, meshes, lights and
//! materials; hit records refer to materials by index so shading never
//! borrows into the scene. During a frame everything here is read-only.

use crate::hit::HitRecord;
use crate::light::Light;
use crate::material::Material;
use crate::mesh::TriangleMesh;
use crate::plane::Plane;
use crate::sphere::Sphere;
use helios_math::Ray;

/// A complete renderable scene.
#[derive(Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
    planes: Vec<Plane>,
    meshes: Vec<TriangleMesh>,
    lights: Vec<Light>,
    materials: Vec<Material>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material and return its index for primitives to reference.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    pub fn add_plane(&mut self, plane: Plane) {
        self.planes.push(plane);
    }

    pub fn add_mesh(&mut self, mesh: TriangleMesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn meshes(&self) -> &[TriangleMesh] {
        &self.meshes
    }

    /// Mutable mesh access for between-frame animation (rigid transforms).
    pub fn meshes_mut(&mut self) -> &mut [TriangleMesh] {
        &mut self.meshes
    }

    /// Find the closest intersection along the ray across every primitive
    /// and mesh. The returned record is a miss (`t` infinite) when nothing
    /// intersects inside the ray's window.
    pub fn closest_hit(&self, ray: &Ray) -> HitRecord {
        let mut rec = HitRecord::default();

        for sphere in &self.spheres {
            sphere.hit(ray, &mut rec);
        }
        for plane in &self.planes {
            plane.hit(ray, &mut rec);
        }
        for mesh in &self.meshes {
            mesh.hit(ray, &mut rec);
        }

        rec
    }

    /// Occlusion query: is anything inside the ray's window? Applies the
    /// shadow-query culling rules and stops at the first hit.
    pub fn does_hit(&self, ray: &Ray) -> bool {
        self.spheres.iter().any(|s| s.hit_any(ray))
            || self.planes.iter().any(|p| p.hit_any(ray))
            || self.meshes.iter().any(|m| m.hit_any(ray))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helios_math::{ColorRGB, Vec3};

    fn two_sphere_scene() -> Scene {
        let mut scene = Scene::new();
        let near_mat = scene.add_material(Material::SolidColor { color: ColorRGB::ONE });
        let far_mat = scene.add_material(Material::SolidColor {
            color: ColorRGB::ZERO,
        });

        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, near_mat));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, far_mat));
        scene
    }

    #[test]
    fn test_overlapping_spheres_return_the_nearer() {
        let scene = two_sphere_scene();
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        let hit = scene.closest_hit(&ray);
        assert!(hit.did_hit);
        assert_eq!(hit.material_index, 0);
        assert!((hit.t - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut scene = Scene::new();
        let near_mat = scene.add_material(Material::SolidColor { color: ColorRGB::ONE });
        // Far sphere added first
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, 1));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, near_mat));

        let hit = scene.closest_hit(&Ray::new(Vec3::ZERO, -Vec3::Z));
        assert_eq!(hit.material_index, near_mat);
    }

    #[test]
    fn test_does_hit_implies_closest_hit() {
        let scene = two_sphere_scene();

        let hitting = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(scene.does_hit(&hitting));
        let closest = scene.closest_hit(&hitting);
        assert!(closest.did_hit);
        assert!(closest.t <= hitting.t_max);

        let missing = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(!scene.does_hit(&missing));
        assert!(!scene.closest_hit(&missing).did_hit);
    }

    #[test]
    fn test_shadow_window_stops_at_the_light() {
        let scene = two_sphere_scene();

        // Occluder sits at t in [2, 4]; a window ending before it is clear.
        let blocked = Ray::with_limit(Vec3::ZERO, -Vec3::Z, 10.0);
        let clear = Ray::with_limit(Vec3::ZERO, -Vec3::Z, 1.5);

        assert!(scene.does_hit(&blocked));
        assert!(!scene.does_hit(&clear));
    }

    #[test]
    fn test_mixed_primitives() {
        use crate::triangle::CullMode;

        let mut scene = Scene::new();
        let mat = scene.add_material(Material::SolidColor { color: ColorRGB::ONE });
        scene.add_plane(Plane::new(Vec3::new(0.0, -2.0, 0.0), Vec3::Y, mat));
        scene.add_mesh(TriangleMesh::new(
            vec![
                Vec3::new(-1.0, -1.0, -4.0),
                Vec3::new(1.0, -1.0, -4.0),
                Vec3::new(0.0, 1.0, -4.0),
            ],
            vec![0, 1, 2],
            CullMode::NoCulling,
            mat,
        ));

        // Triangle in front of nothing else
        let hit = scene.closest_hit(&Ray::new(Vec3::ZERO, -Vec3::Z));
        assert!(hit.did_hit);
        assert!((hit.t - 4.0).abs() < 1e-5);

        // Straight down finds the plane
        let hit = scene.closest_hit(&Ray::new(Vec3::ZERO, -Vec3::Y));
        assert!(hit.did_hit);
        assert!((hit.t - 2.0).abs() < 1e-6);
    }
}
