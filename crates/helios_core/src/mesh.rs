//! Indexed triangle mesh with per-instance transforms.
//!
//! A mesh keeps its authored arrays immutable in meaning (the partition
//! during BVH construction permutes triangle order, but always moves a
//! triangle's index triple, normal and centroid together) and derives the
//! transformed arrays from them whenever a transform component changes.

use crate::bvh::BvhNode;
use crate::hit::HitRecord;
use crate::triangle::{CullMode, Triangle};
use helios_math::{Mat4, Mat4Ext, Ray, Vec3};

/// An indexed triangle mesh with translation / rotation / scale instance
/// transforms and a flat BVH over its triangles.
///
/// Lifecycle: the BVH topology is built once by [`TriangleMesh::rebuild`]
/// (called from the constructors); transform changes go through
/// [`TriangleMesh::update_transforms`], which recomputes the transformed
/// arrays and refits the node bounds without touching topology.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    /// Authored vertex positions, addressed through `indices`. Never
    /// permuted by the BVH build.
    pub positions: Vec<Vec3>,
    /// Triples of position indices, one triple per triangle
    pub indices: Vec<u32>,
    /// One authored face normal per triangle
    pub normals: Vec<Vec3>,
    /// One authored centroid per triangle
    pub centroids: Vec<Vec3>,

    pub cull_mode: CullMode,
    pub material_index: usize,

    translation: Mat4,
    rotation: Mat4,
    scale: Mat4,

    /// World-space mirrors of the authored arrays
    pub transformed_positions: Vec<Vec3>,
    pub transformed_normals: Vec<Vec3>,
    pub transformed_centroids: Vec<Vec3>,

    pub(crate) bvh_nodes: Vec<BvhNode>,
    pub(crate) root_index: u32,
    pub(crate) nodes_used: u32,
}

impl TriangleMesh {
    /// Create a mesh from positions and index triples, deriving per-face
    /// normals from the winding order.
    pub fn new(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        cull_mode: CullMode,
        material_index: usize,
    ) -> Self {
        let mut mesh = Self::empty(cull_mode, material_index);
        mesh.positions = positions;
        mesh.indices = indices;
        mesh.rebuild();
        mesh
    }

    /// Create a mesh with pre-computed per-triangle normals (e.g. from the
    /// OBJ loader).
    pub fn with_normals(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Vec<Vec3>,
        cull_mode: CullMode,
        material_index: usize,
    ) -> Self {
        debug_assert_eq!(indices.len(), normals.len() * 3);

        let mut mesh = Self::empty(cull_mode, material_index);
        mesh.positions = positions;
        mesh.indices = indices;
        mesh.normals = normals;
        mesh.rebuild();
        mesh
    }

    /// An empty mesh to author triangles into. Call
    /// [`TriangleMesh::rebuild`] after the last
    /// [`TriangleMesh::append_triangle`].
    pub fn empty(cull_mode: CullMode, material_index: usize) -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
            normals: Vec::new(),
            centroids: Vec::new(),
            cull_mode,
            material_index,
            translation: Mat4::IDENTITY,
            rotation: Mat4::IDENTITY,
            scale: Mat4::IDENTITY,
            transformed_positions: Vec::new(),
            transformed_normals: Vec::new(),
            transformed_centroids: Vec::new(),
            bvh_nodes: Vec::new(),
            root_index: 0,
            nodes_used: 0,
        }
    }

    /// Append a loose triangle: three fresh positions, an index triple and
    /// the triangle's normal and centroid.
    pub fn append_triangle(&mut self, triangle: &Triangle) {
        let start = self.positions.len() as u32;

        self.positions.push(triangle.v0);
        self.positions.push(triangle.v1);
        self.positions.push(triangle.v2);

        self.indices.push(start);
        self.indices.push(start + 1);
        self.indices.push(start + 2);

        self.normals.push(triangle.normal);
        self.centroids.push(triangle.centroid());
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The three world-space vertices of triangle `tri`.
    pub(crate) fn triangle_vertices(&self, tri: usize) -> (Vec3, Vec3, Vec3) {
        let i = tri * 3;
        (
            self.transformed_positions[self.indices[i] as usize],
            self.transformed_positions[self.indices[i + 1] as usize],
            self.transformed_positions[self.indices[i + 2] as usize],
        )
    }

    /// Recompute per-face normals from positions and winding order.
    pub fn calculate_normals(&mut self) {
        self.normals.clear();
        self.normals.reserve(self.triangle_count());

        for triple in self.indices.chunks_exact(3) {
            let v0 = self.positions[triple[0] as usize];
            let v1 = self.positions[triple[1] as usize];
            let v2 = self.positions[triple[2] as usize];
            self.normals.push((v1 - v0).cross(v2 - v0).normalize());
        }
    }

    fn calculate_centroids(&mut self) {
        self.centroids.clear();
        self.centroids.reserve(self.triangle_count());

        for triple in self.indices.chunks_exact(3) {
            let v0 = self.positions[triple[0] as usize];
            let v1 = self.positions[triple[1] as usize];
            let v2 = self.positions[triple[2] as usize];
            self.centroids.push((v0 + v1 + v2) / 3.0);
        }
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = Mat4::from_translation(translation);
    }

    pub fn set_rotation_y(&mut self, yaw: f32) {
        self.rotation = Mat4::from_rotation_y(yaw);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = Mat4::from_scale(scale);
    }

    /// Recompute the transformed arrays from the authored ones (scale,
    /// then rotation, then translation) and refit the BVH bounds.
    ///
    /// Normals go through the model matrix plus renormalization, which is
    /// exact for the uniform scales this renderer uses.
    pub fn update_transforms(&mut self) {
        let matrix = self.translation * self.rotation * self.scale;

        self.transformed_positions.clear();
        self.transformed_positions
            .extend(self.positions.iter().map(|&p| matrix.transform_point3(p)));

        self.transformed_centroids.clear();
        self.transformed_centroids
            .extend(self.centroids.iter().map(|&c| matrix.transform_point3(c)));

        self.transformed_normals.clear();
        self.transformed_normals
            .extend(self.normals.iter().map(|&n| matrix.transform_normal(n)));

        if !self.bvh_nodes.is_empty() {
            self.refit_bvh();
        }
    }

    /// Bring the mesh to a renderable state after authoring: derive any
    /// missing per-triangle data, apply the current transforms and build
    /// the BVH topology from scratch.
    pub fn rebuild(&mut self) {
        if self.normals.len() != self.triangle_count() {
            self.calculate_normals();
        }
        if self.centroids.len() != self.triangle_count() {
            self.calculate_centroids();
        }

        // Order matters: the build reads transformed positions/centroids.
        self.bvh_nodes.clear();
        self.update_transforms();
        self.init_bvh();

        log::debug!(
            "mesh rebuilt: {} triangles, {} bvh nodes",
            self.triangle_count(),
            self.nodes_used
        );
    }

    /// Closest-hit query against the mesh via BVH traversal.
    pub fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        if self.bvh_nodes.is_empty() {
            return false;
        }
        self.intersect_bvh(ray, self.root_index as usize, rec)
    }

    /// Occlusion query: returns at the first confirmed triangle hit.
    pub fn hit_any(&self, ray: &Ray) -> bool {
        !self.bvh_nodes.is_empty() && self.occluded_bvh(ray, self.root_index as usize)
    }
}
