//! Flat-array bounding volume hierarchy over a mesh's triangles.
//!
//! Construction uses a surface-area-heuristic sweep over triangle
//! centroids with an in-place partition, after the layout popularized by
//! the jacco BVH series: nodes live in one contiguous array, a node is a
//! leaf iff `prim_count > 0`, and an internal node's children sit at
//! `left_first` and `left_first + 1`. Transform changes refit the node
//! bounds bottom-up without rebuilding topology.

use crate::hit::{HitRecord, QueryKind};
use crate::mesh::TriangleMesh;
use crate::triangle::moller_trumbore;
use helios_math::{Aabb, Ray, Vec3};

/// One BVH node, 32 bytes.
///
/// - `prim_count > 0`: leaf covering triangles
///   `[left_first, left_first + prim_count)` of the mesh's triangle order.
/// - `prim_count == 0`: internal; children are `left_first` and
///   `left_first + 1` in the node array.
#[derive(Debug, Clone, Copy)]
pub struct BvhNode {
    pub min_aabb: Vec3,
    pub max_aabb: Vec3,
    pub left_first: u32,
    pub prim_count: u32,
}

impl Default for BvhNode {
    fn default() -> Self {
        Self {
            min_aabb: Vec3::INFINITY,
            max_aabb: Vec3::NEG_INFINITY,
            left_first: 0,
            prim_count: 0,
        }
    }
}

impl BvhNode {
    pub fn is_leaf(&self) -> bool {
        self.prim_count > 0
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.min_aabb,
            max: self.max_aabb,
        }
    }
}

impl TriangleMesh {
    /// Build the BVH topology from scratch over the current transformed
    /// positions. Allocates the worst-case `2n - 1` node slots up front;
    /// `nodes_used` tracks how many the build actually claimed.
    pub fn init_bvh(&mut self) {
        let n = self.triangle_count();
        if n == 0 {
            self.bvh_nodes.clear();
            self.nodes_used = 0;
            return;
        }

        self.bvh_nodes = vec![BvhNode::default(); 2 * n - 1];
        self.root_index = 0;
        self.nodes_used = 1;

        self.bvh_nodes[0].left_first = 0;
        self.bvh_nodes[0].prim_count = n as u32;

        self.update_node_bounds(0);
        self.subdivide(0);
    }

    /// Recompute the bounds of all nodes bottom-up, keeping topology.
    /// Called after every transform change; O(nodes).
    pub fn refit_bvh(&mut self) {
        for i in (0..self.nodes_used as usize).rev() {
            let node = self.bvh_nodes[i];
            if node.is_leaf() {
                self.update_node_bounds(i);
            } else {
                let left = self.bvh_nodes[node.left_first as usize];
                let right = self.bvh_nodes[node.left_first as usize + 1];
                self.bvh_nodes[i].min_aabb = left.min_aabb.min(right.min_aabb);
                self.bvh_nodes[i].max_aabb = left.max_aabb.max(right.max_aabb);
            }
        }
    }

    /// Recompute a leaf's bounds from the transformed vertices of the
    /// triangles it covers.
    fn update_node_bounds(&mut self, node_index: usize) {
        let node = self.bvh_nodes[node_index];

        let mut aabb = Aabb::EMPTY;
        let start = node.left_first as usize * 3;
        let end = start + node.prim_count as usize * 3;
        for &index in &self.indices[start..end] {
            aabb.grow(self.transformed_positions[index as usize]);
        }

        self.bvh_nodes[node_index].min_aabb = aabb.min;
        self.bvh_nodes[node_index].max_aabb = aabb.max;
    }

    /// Split cost of partitioning a node's triangles at `pos` on `axis`:
    /// `|L| * area(L) + |R| * area(R)` with the half-area proxy. A split
    /// that leaves one side empty costs infinity.
    fn evaluate_sah(&self, first: usize, count: usize, axis: usize, pos: f32) -> f32 {
        let mut left_box = Aabb::EMPTY;
        let mut right_box = Aabb::EMPTY;
        let mut left_count = 0u32;
        let mut right_count = 0u32;

        for tri in first..first + count {
            let (v0, v1, v2) = self.triangle_vertices(tri);
            if self.transformed_centroids[tri][axis] < pos {
                left_count += 1;
                left_box.grow(v0);
                left_box.grow(v1);
                left_box.grow(v2);
            } else {
                right_count += 1;
                right_box.grow(v0);
                right_box.grow(v1);
                right_box.grow(v2);
            }
        }

        let cost = left_count as f32 * left_box.half_area()
            + right_count as f32 * right_box.half_area();
        // An empty side turns the cost into NaN (0 * inf); treat it,
        // and a zero cost, as unusable.
        if cost > 0.0 {
            cost
        } else {
            f32::INFINITY
        }
    }

    fn subdivide(&mut self, node_index: usize) {
        let (first, count) = {
            let node = &self.bvh_nodes[node_index];
            (node.left_first as usize, node.prim_count as usize)
        };

        // Sweep every triangle centroid on every axis as a split candidate;
        // ties keep the earliest candidate.
        let mut best_axis = 0usize;
        let mut best_pos = 0.0f32;
        let mut best_cost = f32::INFINITY;

        for axis in 0..3 {
            for tri in first..first + count {
                let candidate = self.transformed_centroids[tri][axis];
                let cost = self.evaluate_sah(first, count, axis, candidate);
                if cost < best_cost {
                    best_cost = cost;
                    best_axis = axis;
                    best_pos = candidate;
                }
            }
        }

        // Splitting must beat leaving this node a leaf.
        let parent_cost = count as f32 * self.bvh_nodes[node_index].aabb().half_area();
        if best_cost >= parent_cost {
            return;
        }

        // Hoare-style in-place partition; a swap moves all of a triangle's
        // state together (index triple, normals, centroids).
        let mut left = first as isize;
        let mut right = (first + count - 1) as isize;
        while left <= right {
            if self.transformed_centroids[left as usize][best_axis] < best_pos {
                left += 1;
            } else {
                self.swap_triangles(left as usize, right as usize);
                right -= 1;
            }
        }

        let left_count = left as usize - first;
        if left_count == 0 || left_count == count {
            // Degenerate partition (identical centroids): stay a leaf.
            return;
        }

        let left_child = self.nodes_used as usize;
        self.nodes_used += 2;

        self.bvh_nodes[left_child].left_first = first as u32;
        self.bvh_nodes[left_child].prim_count = left_count as u32;
        self.bvh_nodes[left_child + 1].left_first = left as u32;
        self.bvh_nodes[left_child + 1].prim_count = (count - left_count) as u32;

        self.bvh_nodes[node_index].left_first = left_child as u32;
        self.bvh_nodes[node_index].prim_count = 0;

        self.update_node_bounds(left_child);
        self.update_node_bounds(left_child + 1);

        self.subdivide(left_child);
        self.subdivide(left_child + 1);
    }

    /// Swap every piece of per-triangle state between two triangles. The
    /// positions array is shared between triangles and stays put;
    /// triangles are addressed through their index triples.
    fn swap_triangles(&mut self, a: usize, b: usize) {
        for k in 0..3 {
            self.indices.swap(a * 3 + k, b * 3 + k);
        }
        self.normals.swap(a, b);
        self.transformed_normals.swap(a, b);
        self.centroids.swap(a, b);
        self.transformed_centroids.swap(a, b);
    }

    /// Recursive closest-hit traversal. Returns whether any covered
    /// triangle intersects the ray within its window.
    pub(crate) fn intersect_bvh(&self, ray: &Ray, node_index: usize, rec: &mut HitRecord) -> bool {
        let node = &self.bvh_nodes[node_index];
        if !node.aabb().hit(ray) {
            return false;
        }

        if node.is_leaf() {
            let mut any = false;
            let first = node.left_first as usize;
            for tri in first..first + node.prim_count as usize {
                any |= self.hit_triangle(tri, ray, rec);
            }
            any
        } else {
            let left = node.left_first as usize;
            let hit_left = self.intersect_bvh(ray, left, rec);
            let hit_right = self.intersect_bvh(ray, left + 1, rec);
            hit_left || hit_right
        }
    }

    /// Recursive occlusion traversal: true at the first confirmed hit.
    pub(crate) fn occluded_bvh(&self, ray: &Ray, node_index: usize) -> bool {
        let node = &self.bvh_nodes[node_index];
        if !node.aabb().hit(ray) {
            return false;
        }

        if node.is_leaf() {
            let first = node.left_first as usize;
            for tri in first..first + node.prim_count as usize {
                let (v0, v1, v2) = self.triangle_vertices(tri);
                if moller_trumbore(v0, v1, v2, self.cull_mode, ray, QueryKind::Shadow).is_some() {
                    return true;
                }
            }
            false
        } else {
            let left = node.left_first as usize;
            self.occluded_bvh(ray, left) || self.occluded_bvh(ray, left + 1)
        }
    }

    fn hit_triangle(&self, tri: usize, ray: &Ray, rec: &mut HitRecord) -> bool {
        let (v0, v1, v2) = self.triangle_vertices(tri);
        let Some(t) = moller_trumbore(v0, v1, v2, self.cull_mode, ray, QueryKind::Primary) else {
            return false;
        };

        if t < rec.t {
            rec.t = t;
            rec.did_hit = true;
            rec.material_index = self.material_index;
            rec.origin = ray.at(t);
            rec.normal = self.transformed_normals[tri];
        }
        true
    }
}
