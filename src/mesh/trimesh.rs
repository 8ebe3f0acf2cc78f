//! Corner-table triangle mesh.
//!
//! This module provides the mesh store: four flat arenas (vertices, triangles,
//! edges, corners) whose records refer to each other only through typed
//! indices.
//!
//! # Structure
//!
//! - Each **triangle** stores its three vertices, the three edges bounding it
//!   (edge slot `k` joins vertex slots `k` and `k + 1`) and its three corners
//! - Each **corner** is one (triangle, vertex) incidence. It knows the edge
//!   facing it, the **next** and **previous** corners of its triangle, and the
//!   **opposite** corner on the far side of that edge
//! - Each **edge** stores its two endpoints and every triangle incident to it
//! - Each **vertex** stores its fan of incident triangles (rotationally
//!   ordered) and its corners
//!
//! # Boundary Handling
//!
//! A boundary edge has a single incident triangle; the corner facing it has
//! no opposite. Non-manifold edges keep all of their triangles, but only two
//! of their corners are paired.

use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};

use super::geometry;
use super::index::{CornerId, EdgeId, TriangleId, VertexId};

/// An RGB vertex color with channels in `[0, 1]`.
pub type Color = [f64; 3];

/// Color assigned to every vertex until an analysis pass overrides it.
pub const DEFAULT_COLOR: Color = [0.6, 0.6, 0.6];

/// A vertex in the mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Average of the incident face normals.
    pub normal: Vector3<f64>,

    /// Incident triangles, ordered as a fan around the vertex.
    /// For boundary vertices the fan starts and ends on a boundary triangle.
    pub triangles: Vec<TriangleId>,

    /// Corners located at this vertex.
    pub corners: Vec<CornerId>,

    /// Display color.
    pub color: Color,
}

impl Vertex {
    /// Create an unconnected vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: Vector3::zeros(),
            triangles: Vec::new(),
            corners: Vec::new(),
            color: DEFAULT_COLOR,
        }
    }
}

/// A triangle in the mesh.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// The three vertices, pairwise distinct.
    pub vertices: [VertexId; 3],

    /// Edge slot `k` joins `vertices[k]` and `vertices[(k + 1) % 3]`.
    pub edges: [EdgeId; 3],

    /// Corner slot `k` sits at `vertices[k]`.
    pub corners: [CornerId; 3],

    /// Outward unit normal.
    pub normal: Vector3<f64>,

    /// Area (Heron's formula over the edge lengths).
    pub area: f64,
}

impl Triangle {
    /// Slot of `v` within this triangle, if it is one of its vertices.
    #[inline]
    pub fn slot_of(&self, v: VertexId) -> Option<usize> {
        self.vertices.iter().position(|&x| x == v)
    }
}

/// An edge in the mesh.
#[derive(Debug, Clone)]
pub struct Edge {
    /// The two endpoints, in the direction the edge was first seen.
    pub vertices: [VertexId; 2],

    /// Incident triangles: one on the boundary, two on a manifold edge.
    pub triangles: Vec<TriangleId>,

    /// Euclidean length.
    pub length: f64,
}

impl Edge {
    /// Check if this edge has a single incident triangle.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.triangles.len() == 1
    }

    /// Check if this edge has more than two incident triangles.
    #[inline]
    pub fn is_non_manifold(&self) -> bool {
        self.triangles.len() > 2
    }

    /// Endpoints ordered by index; the key corners are sorted by.
    #[inline]
    pub fn key(&self) -> (VertexId, VertexId) {
        let [a, b] = self.vertices;
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// A corner: one vertex of one triangle.
#[derive(Debug, Clone, Copy)]
pub struct Corner {
    /// The triangle this corner belongs to.
    pub triangle: TriangleId,

    /// The vertex at this corner.
    pub vertex: VertexId,

    /// Position (0, 1 or 2) of this corner within its triangle.
    pub slot: usize,

    /// The edge facing this corner (edge slot `(slot + 1) % 3`).
    pub edge: EdgeId,

    /// The next corner of the same triangle.
    pub next: CornerId,

    /// The previous corner of the same triangle.
    pub prev: CornerId,

    /// The corner facing the same edge from the neighbouring triangle.
    /// `None` on the boundary.
    pub opposite: Option<CornerId>,
}

/// Global winding of the input triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Triangles wind counter-clockwise seen from outside.
    CounterClockwise,
    /// Triangles wind clockwise seen from outside; face normals were flipped.
    Clockwise,
}

/// Approximate bounding sphere around the axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Midpoint of the bounding box.
    pub center: Point3<f64>,
    /// Distance from the center to the minimum box corner.
    pub radius: f64,
}

impl BoundingSphere {
    /// Sphere around the bounding box of `points`.
    pub fn from_points(points: &[Point3<f64>]) -> Self {
        match geometry::bounds(points.iter().copied()) {
            Some((min, max)) => {
                let center = geometry::midpoint(&min, &max);
                Self {
                    center,
                    radius: (center - min).norm(),
                }
            }
            None => Self {
                center: Point3::origin(),
                radius: 0.0,
            },
        }
    }
}

/// Element counts and topology summary of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshStats {
    /// Number of vertices.
    pub vertices: usize,
    /// Number of edges.
    pub edges: usize,
    /// Number of triangles.
    pub triangles: usize,
    /// Number of corners (always three per triangle).
    pub corners: usize,
    /// Edges with a single incident triangle.
    pub boundary_edges: usize,
    /// Edges with more than two incident triangles.
    pub non_manifold_edges: usize,
    /// V - E + F.
    pub euler_characteristic: i64,
}

/// A triangle mesh with full corner-table connectivity.
///
/// Built by [`build_from_triangles`](super::build_from_triangles); rebuilt
/// wholesale whenever its topology changes.
#[derive(Debug, Clone)]
pub struct TriMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) triangles: Vec<Triangle>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) corners: Vec<Corner>,
    pub(crate) bounds: BoundingSphere,
    pub(crate) area: f64,
    pub(crate) orientation: Orientation,
    pub(crate) seed: Option<TriangleId>,
}

impl TriMesh {
    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of corners.
    #[inline]
    pub fn num_corners(&self) -> usize {
        self.corners.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a triangle by ID.
    #[inline]
    pub fn triangle(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Get a corner by ID.
    #[inline]
    pub fn corner(&self, id: CornerId) -> &Corner {
        &self.corners[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Get the three vertices of a triangle.
    #[inline]
    pub fn triangle_vertices(&self, t: TriangleId) -> [VertexId; 3] {
        self.triangle(t).vertices
    }

    /// Get the positions of the three vertices of a triangle.
    pub fn triangle_positions(&self, t: TriangleId) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.triangle_vertices(t);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// Approximate bounding sphere computed at build time.
    #[inline]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounds
    }

    /// Total surface area (sum of triangle areas).
    #[inline]
    pub fn surface_area(&self) -> f64 {
        self.area
    }

    /// Mean triangle area.
    pub fn average_triangle_area(&self) -> f64 {
        if self.triangles.is_empty() {
            0.0
        } else {
            self.area / self.triangles.len() as f64
        }
    }

    /// Winding detected when the face normals were computed.
    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Currently highlighted triangle, if any.
    #[inline]
    pub fn seed(&self) -> Option<TriangleId> {
        self.seed
    }

    /// Set the highlighted triangle.
    #[inline]
    pub fn set_seed(&mut self, seed: Option<TriangleId>) {
        self.seed = seed;
    }

    /// Set the display color of a vertex.
    #[inline]
    pub fn set_color(&mut self, v: VertexId, color: Color) {
        self.vertices[v.index()].color = color;
    }

    /// Reset every vertex to [`DEFAULT_COLOR`].
    pub fn reset_colors(&mut self) {
        for v in &mut self.vertices {
            v.color = DEFAULT_COLOR;
        }
    }

    // ==================== Corner Navigation ====================

    /// Next corner within the same triangle.
    #[inline]
    pub fn next(&self, c: CornerId) -> CornerId {
        self.corner(c).next
    }

    /// Previous corner within the same triangle.
    #[inline]
    pub fn prev(&self, c: CornerId) -> CornerId {
        self.corner(c).prev
    }

    /// Corner across the edge facing `c`.
    #[inline]
    pub fn opposite(&self, c: CornerId) -> Option<CornerId> {
        self.corner(c).opposite
    }

    /// Rotate around the vertex of `c` to the corner of the same vertex in
    /// the neighbouring triangle (`next -> opposite -> next`).
    ///
    /// Returns `None` when the step would cross a boundary edge.
    pub fn swing(&self, c: CornerId) -> Option<CornerId> {
        self.opposite(self.next(c)).map(|o| self.next(o))
    }

    /// Interior angle of the triangle at corner `c`, in radians.
    ///
    /// Always computed from the current vertex positions.
    pub fn corner_angle(&self, c: CornerId) -> f64 {
        let corner = self.corner(c);
        let p = self.position(corner.vertex);
        let pn = self.position(self.corner(corner.next).vertex);
        let pp = self.position(self.corner(corner.prev).vertex);
        geometry::angle_between(&(pn - p), &(pp - p))
    }

    /// Interior angles of all corners, indexed by corner.
    pub fn corner_angles(&self) -> Vec<f64> {
        self.corner_ids().map(|c| self.corner_angle(c)).collect()
    }

    /// Angle deficit `2π - Σθ` at a vertex.
    pub fn angle_deficit(&self, v: VertexId) -> f64 {
        TAU - self
            .vertex(v)
            .corners
            .iter()
            .map(|&c| self.corner_angle(c))
            .sum::<f64>()
    }

    // ==================== Topology Queries ====================

    /// The triangle across `e` from `t`, if any.
    ///
    /// On a non-manifold edge this is the first other incident triangle.
    pub fn other_triangle(&self, e: EdgeId, t: TriangleId) -> Option<TriangleId> {
        other_triangle(self.edge(e), t)
    }

    /// Check if an edge is on the boundary.
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId) -> bool {
        self.edge(e).is_boundary()
    }

    /// Check if a vertex touches a boundary edge (or no triangle at all).
    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        let vertex = self.vertex(v);
        if vertex.triangles.is_empty() {
            return true;
        }
        vertex.triangles.iter().any(|&t| {
            let tri = self.triangle(t);
            tri.slot_of(v).is_some_and(|s| {
                self.is_boundary_edge(tri.edges[s]) || self.is_boundary_edge(tri.edges[(s + 2) % 3])
            })
        })
    }

    /// Number of corners at a vertex.
    #[inline]
    pub fn valence(&self, v: VertexId) -> usize {
        self.vertex(v).corners.len()
    }

    /// Midpoint of an edge.
    pub fn edge_midpoint(&self, e: EdgeId) -> Point3<f64> {
        let [a, b] = self.edge(e).vertices;
        geometry::midpoint(self.position(a), self.position(b))
    }

    /// V - E + F.
    pub fn euler_characteristic(&self) -> i64 {
        self.vertices.len() as i64 - self.edges.len() as i64 + self.triangles.len() as i64
    }

    /// Element counts and topology summary.
    pub fn stats(&self) -> MeshStats {
        MeshStats {
            vertices: self.num_vertices(),
            edges: self.num_edges(),
            triangles: self.num_triangles(),
            corners: self.num_corners(),
            boundary_edges: self.edges.iter().filter(|e| e.is_boundary()).count(),
            non_manifold_edges: self.edges.iter().filter(|e| e.is_non_manifold()).count(),
            euler_characteristic: self.euler_characteristic(),
        }
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all triangle IDs.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId> + '_ {
        (0..self.triangles.len()).map(TriangleId::new)
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all corner IDs.
    pub fn corner_ids(&self) -> impl Iterator<Item = CornerId> + '_ {
        (0..self.corners.len()).map(CornerId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all triangles with their IDs.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, &Triangle)> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .map(|(i, t)| (TriangleId::new(i), t))
    }

    /// Iterate over all edges with their IDs.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e))
    }

    /// Iterate over all corners with their IDs.
    pub fn corners(&self) -> impl Iterator<Item = (CornerId, &Corner)> + '_ {
        self.corners
            .iter()
            .enumerate()
            .map(|(i, c)| (CornerId::new(i), c))
    }

    // ==================== Validation ====================

    /// Check if the mesh is valid (all cross references are consistent).
    pub fn is_valid(&self) -> bool {
        if self.corners.len() != 3 * self.triangles.len() {
            return false;
        }

        for (tid, tri) in self.triangles() {
            for k in 0..3 {
                let c = self.corner(tri.corners[k]);
                if c.triangle != tid || c.vertex != tri.vertices[k] || c.slot != k {
                    return false;
                }
                if c.next != tri.corners[(k + 1) % 3] || c.prev != tri.corners[(k + 2) % 3] {
                    return false;
                }
                if c.edge != tri.edges[(k + 1) % 3] {
                    return false;
                }

                // Edge slot k must join vertex slots k and k + 1
                let (a, b) = self.edge(tri.edges[k]).key();
                let (x, y) = (tri.vertices[k], tri.vertices[(k + 1) % 3]);
                if (a, b) != (x.min(y), x.max(y)) {
                    return false;
                }
                if !self.edge(tri.edges[k]).triangles.contains(&tid) {
                    return false;
                }
            }
        }

        for (cid, c) in self.corners() {
            if let Some(o) = c.opposite {
                let oc = self.corner(o);
                if oc.opposite != Some(cid) || oc.edge != c.edge {
                    return false;
                }
            }
        }

        for (vid, v) in self.vertices() {
            if v.corners.iter().any(|&c| self.corner(c).vertex != vid) {
                return false;
            }
            if v.triangles.iter().any(|&t| self.triangle(t).slot_of(vid).is_none()) {
                return false;
            }
        }

        true
    }
}

/// First triangle of `edge` other than `t`.
pub(crate) fn other_triangle(edge: &Edge, t: TriangleId) -> Option<TriangleId> {
    edge.triangles.iter().copied().find(|&x| x != t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;

    fn tetrahedron() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn single_triangle() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap()
    }

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::new(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(v.position, Point3::new(1.0, 2.0, 3.0));
        assert!(v.triangles.is_empty());
        assert_eq!(v.color, DEFAULT_COLOR);
    }

    #[test]
    fn test_bounding_sphere() {
        let sphere = BoundingSphere::from_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 2.0),
        ]);
        assert_eq!(sphere.center, Point3::new(1.0, 1.0, 1.0));
        assert!((sphere.radius - 3.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_corner_angles_right_triangle() {
        let mesh = single_triangle();
        let angles = mesh.corner_angles();
        assert!((angles[0] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((angles[1] - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert!((angles[2] - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_angle_sum_per_triangle() {
        let mesh = tetrahedron();
        for (_, tri) in mesh.triangles() {
            let sum: f64 = tri.corners.iter().map(|&c| mesh.corner_angle(c)).sum();
            assert!((sum - std::f64::consts::PI).abs() < 1e-9);
        }
    }

    #[test]
    fn test_boundary_queries() {
        let mesh = single_triangle();
        assert!(mesh.edge_ids().all(|e| mesh.is_boundary_edge(e)));
        assert!(mesh.vertex_ids().all(|v| mesh.is_boundary_vertex(v)));
        assert!(mesh.corner_ids().all(|c| mesh.swing(c).is_none()));

        let closed = tetrahedron();
        assert!(closed.vertex_ids().all(|v| !closed.is_boundary_vertex(v)));
    }

    #[test]
    fn test_stats() {
        let stats = tetrahedron().stats();
        assert_eq!(
            stats,
            MeshStats {
                vertices: 4,
                edges: 6,
                triangles: 4,
                corners: 12,
                boundary_edges: 0,
                non_manifold_edges: 0,
                euler_characteristic: 2,
            }
        );
    }

    #[test]
    fn test_seed_and_colors() {
        let mut mesh = tetrahedron();
        assert_eq!(mesh.seed(), None);
        mesh.set_seed(Some(TriangleId::new(2)));
        assert_eq!(mesh.seed(), Some(TriangleId::new(2)));

        mesh.set_color(VertexId::new(1), [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertex(VertexId::new(1)).color, [1.0, 0.0, 0.0]);
        mesh.reset_colors();
        assert!(mesh.vertices().all(|(_, v)| v.color == DEFAULT_COLOR));
    }

    #[test]
    fn test_edge_midpoint() {
        let mesh = single_triangle();
        let e = mesh.triangle(TriangleId::new(0)).edges[0];
        assert_eq!(mesh.edge_midpoint(e), Point3::new(0.5, 0.0, 0.0));
    }
}
