//! Core mesh data structures.
//!
//! This module provides the corner-table mesh representation and related
//! types for representing and manipulating triangle meshes.
//!
//! # Overview
//!
//! The primary type is [`TriMesh`], which stores vertices, triangles, edges
//! and corners in flat arenas. Corners give O(1) access to the next and
//! previous vertex of a triangle and to the triangle across each edge; the
//! [`TriMesh::swing`] step walks around a vertex.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`TriangleId`] - Identifies a triangle
//! - [`EdgeId`] - Identifies an edge
//! - [`CornerId`] - Identifies a corner
//!
//! # Construction
//!
//! Meshes are constructed from file I/O or from face-vertex lists:
//!
//! ```
//! use cornice::mesh::{build_from_triangles, TriMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_edges(), 3);
//! ```
//!
//! A mesh is never edited in place: operations that change topology build
//! a fresh face list and run it through the builder again.

mod builder;
mod corners;
pub mod geometry;
mod index;
mod trimesh;

pub use builder::{build_from_polygons, build_from_triangles, to_face_vertex};
pub use index::{CornerId, EdgeId, TriangleId, VertexId};
pub use trimesh::{
    BoundingSphere, Color, Corner, Edge, MeshStats, Orientation, Triangle, TriMesh, Vertex,
    DEFAULT_COLOR,
};
