//! Regular (1-to-4) midpoint subdivision.

use crate::algo::Progress;
use crate::error::Result;
use crate::mesh::TriMesh;

use super::{run_passes, Midpoints, Refinement, SubdivideOptions, SubdivideStats};

/// Split every triangle into four by bisecting every edge.
///
/// Original vertices keep their indices; midpoints are appended after them.
/// The mesh is rebuilt after each iteration, so vertex colors return to the
/// default and the seed triangle is cleared.
///
/// # Arguments
///
/// * `mesh` - The mesh to subdivide (replaced on success)
/// * `options` - Subdivision parameters (only `iterations` is used)
///
/// # Errors
///
/// [`MeshError::AllocationFailed`](crate::MeshError::AllocationFailed) if the
/// output buffers cannot be reserved. The mesh is unchanged on error.
pub fn regular_subdivide(mesh: &mut TriMesh, options: &SubdivideOptions) -> Result<SubdivideStats> {
    regular_subdivide_with_progress(mesh, options, &Progress::none())
}

/// Regular subdivision with progress reporting.
pub fn regular_subdivide_with_progress(
    mesh: &mut TriMesh,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<SubdivideStats> {
    run_passes(
        mesh,
        options.iterations,
        "Regular subdivision",
        progress,
        regular_pass,
    )
}

/// One iteration: midpoints in vertex/corner order, then four triangles
/// per input triangle in triangle order.
fn regular_pass(mesh: &TriMesh, stats: &mut SubdivideStats) -> Result<Refinement> {
    let mut out = Refinement::reserve(mesh)?;
    let mut mids = Midpoints::new(mesh.num_edges());

    for (_, vertex) in mesh.vertices() {
        for &c in &vertex.corners {
            mids.split(mesh, mesh.corner(c).edge, &mut out);
        }
    }

    for (_, tri) in mesh.triangles() {
        let m = tri.edges.map(|e| mids.split(mesh, e, &mut out));
        out.push_quadrisection(tri.vertices, m);
    }

    stats.three_edge_splits += mesh.num_triangles();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_triangles, to_face_vertex, TriangleId, VertexId};
    use nalgebra::Point3;

    fn create_tetrahedron() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn create_triangle() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap()
    }

    #[test]
    fn test_regular_subdivide_tetrahedron() {
        let mut mesh = create_tetrahedron();
        let stats = regular_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        assert_eq!(mesh.num_triangles(), 16);
        assert_eq!(mesh.num_vertices(), 10);
        assert_eq!(mesh.num_edges(), 24);
        assert_eq!(mesh.euler_characteristic(), 2);
        assert!(mesh.is_valid());
        assert!(mesh.corners().all(|(_, c)| c.opposite.is_some()));

        assert_eq!(stats.triangles_before, 4);
        assert_eq!(stats.triangles_after, 16);
        assert_eq!(stats.vertices_added, 6);
        assert_eq!(stats.three_edge_splits, 4);
    }

    #[test]
    fn test_regular_subdivide_single_triangle() {
        let mut mesh = create_triangle();
        regular_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        let (positions, faces) = to_face_vertex(&mesh);
        assert_eq!(faces.len(), 4);
        assert_eq!(positions.len(), 6);

        // Originals keep their slots
        assert_eq!(positions[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(positions[1], Point3::new(2.0, 0.0, 0.0));
        assert_eq!(positions[2], Point3::new(0.0, 2.0, 0.0));

        // Vertex 0's corner faces edge (1, 2): its midpoint comes first
        assert_eq!(positions[3], Point3::new(1.0, 1.0, 0.0));

        // First emitted triangle is the corner triangle at v0
        let [a, b, c] = faces[0];
        assert_eq!(a, 0);
        assert_eq!(positions[b], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(positions[c], Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_regular_subdivide_preserves_area() {
        let mut mesh = create_tetrahedron();
        let before = mesh.surface_area();
        regular_subdivide(&mut mesh, &SubdivideOptions::new(2)).unwrap();

        assert_eq!(mesh.num_triangles(), 64);
        assert!((mesh.surface_area() - before).abs() < 1e-9 * before);
        for (_, tri) in mesh.triangles() {
            assert!(tri.area > 0.0);
        }
    }

    #[test]
    fn test_regular_subdivide_keeps_orientation() {
        let mut mesh = create_tetrahedron();
        let orientation = mesh.orientation();
        regular_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();
        assert_eq!(mesh.orientation(), orientation);
    }

    #[test]
    fn test_regular_subdivide_zero_iterations() {
        let mut mesh = create_tetrahedron();
        mesh.set_seed(Some(TriangleId::new(1)));
        let stats = regular_subdivide(&mut mesh, &SubdivideOptions::new(0)).unwrap();

        assert_eq!(mesh.num_triangles(), 4);
        assert_eq!(mesh.seed(), Some(TriangleId::new(1)));
        assert_eq!(stats.iterations, 0);
        assert_eq!(stats.triangles_after, 4);
    }

    #[test]
    fn test_regular_subdivide_resets_seed_and_colors() {
        let mut mesh = create_tetrahedron();
        mesh.set_seed(Some(TriangleId::new(1)));
        mesh.set_color(VertexId::new(0), [1.0, 0.0, 0.0]);
        regular_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        assert_eq!(mesh.seed(), None);
        assert_eq!(mesh.vertex(VertexId::new(0)).color, crate::mesh::DEFAULT_COLOR);
    }

    #[test]
    fn test_regular_subdivide_open_mesh() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(1.5, 1.0, 0.0),
        ];
        let mut mesh = build_from_triangles(&vertices, &[[0, 1, 2], [1, 3, 2]]).unwrap();
        regular_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        assert_eq!(mesh.num_triangles(), 8);
        assert_eq!(mesh.num_vertices(), 9);
        assert_eq!(mesh.stats().boundary_edges, 8);
        assert_eq!(mesh.euler_characteristic(), 1);
    }
}
