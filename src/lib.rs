//! # Cornice
//!
//! Triangle mesh connectivity built on corner tables, with regular and
//! adaptive midpoint subdivision.
//!
//! Cornice turns a face-vertex list into a fully connected mesh: unique
//! edges, rotationally ordered vertex fans, and a corner table linking every
//! corner to its neighbours and to the corner across the facing edge. On
//! top of that it provides subdivision schemes and per-vertex analyses.
//!
//! ## Features
//!
//! - **Corner-table mesh**: O(1) next/previous/opposite corner queries with
//!   type-safe indices
//! - **Robust construction**: degenerate faces dropped, boundary and
//!   non-manifold edges tolerated, global orientation detected
//! - **Subdivision**: regular 1-to-4 and irregular sliver-targeting schemes
//! - **Analysis**: valence deficit, angle deficit, checkerboard coloring
//! - **File formats**: PLY
//!
//! ## Quick Start
//!
//! ```no_run
//! use cornice::prelude::*;
//! use cornice::algo::subdivide::{regular_subdivide, SubdivideOptions};
//!
//! // Load a mesh
//! let mut mesh: TriMesh = cornice::io::load("model.ply").unwrap();
//!
//! // Query mesh properties
//! println!("Vertices: {}", mesh.num_vertices());
//! println!("Triangles: {}", mesh.num_triangles());
//! println!("V - E + F = {}", mesh.euler_characteristic());
//!
//! // Subdivide and save
//! regular_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();
//! cornice::io::save(&mesh, "output.ply").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use cornice::prelude::*;
//! use nalgebra::Point3;
//!
//! // Define vertices and faces
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! // Build the mesh
//! let mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_triangles(), 4);
//! assert_eq!(mesh.num_edges(), 6);
//! ```
//!
//! ## Corner Traversal
//!
//! ```
//! use cornice::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! #     Point3::new(0.5, 0.5, 1.0),
//! # ];
//! # let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! # let mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
//! // Walk around vertex 0 by swinging from corner to corner
//! let start = mesh.vertex(VertexId::new(0)).corners[0];
//! let mut c = start;
//! loop {
//!     println!("{:?} in {:?}, angle {}", c, mesh.corner(c).triangle, mesh.corner_angle(c));
//!     match mesh.swing(c) {
//!         Some(next) if next != start => c = next,
//!         _ => break,
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

pub use error::{MeshError, Result};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use cornice::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_triangles, to_face_vertex, Corner, CornerId, Edge, EdgeId,
        Orientation, Triangle, TriangleId, TriMesh, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
