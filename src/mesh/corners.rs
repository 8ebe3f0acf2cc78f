//! Corner creation and opposite pairing.
//!
//! Every triangle contributes three corners. Two corners are opposite when
//! they face the same edge from different triangles; pairing is found by a
//! stable sort on the facing edge's endpoint indices followed by a linear
//! scan, so it costs O(C log C) with no hashing.

use super::index::{CornerId, EdgeId, TriangleId, VertexId};
use super::trimesh::{Corner, Edge};

/// Corners of a mesh plus the per-triangle and per-vertex corner lists.
pub(crate) struct CornerTable {
    pub corners: Vec<Corner>,
    pub triangle_corners: Vec<[CornerId; 3]>,
    pub vertex_corners: Vec<Vec<CornerId>>,
}

/// Create three corners per triangle (in triangle order) and pair opposites.
pub(crate) fn build_corners(
    triangles: &[[VertexId; 3]],
    tri_edges: &[[EdgeId; 3]],
    edges: &[Edge],
    num_vertices: usize,
) -> CornerTable {
    let mut corners = Vec::with_capacity(3 * triangles.len());
    let mut triangle_corners = Vec::with_capacity(triangles.len());
    let mut vertex_corners = vec![Vec::new(); num_vertices];

    for (t, (verts, tedges)) in triangles.iter().zip(tri_edges).enumerate() {
        let base = corners.len();
        let ids = [0, 1, 2].map(|k| CornerId::new(base + k));

        for k in 0..3 {
            corners.push(Corner {
                triangle: TriangleId::new(t),
                vertex: verts[k],
                slot: k,
                edge: tedges[(k + 1) % 3],
                next: ids[(k + 1) % 3],
                prev: ids[(k + 2) % 3],
                opposite: None,
            });
            vertex_corners[verts[k].index()].push(ids[k]);
        }
        triangle_corners.push(ids);
    }

    pair_opposites(&mut corners, edges);

    CornerTable {
        corners,
        triangle_corners,
        vertex_corners,
    }
}

/// Link corners facing the same edge.
///
/// Consecutive corners in sorted order with the same edge become mutual
/// opposites and the scan moves past both. On an edge with three or more
/// triangles only the first two corners pair.
fn pair_opposites(corners: &mut [Corner], edges: &[Edge]) {
    let mut order: Vec<CornerId> = (0..corners.len()).map(CornerId::new).collect();
    order.sort_by_key(|c| edges[corners[c.index()].edge.index()].key());

    let mut i = 0;
    while i + 1 < order.len() {
        let (a, b) = (order[i], order[i + 1]);
        if corners[a.index()].edge == corners[b.index()].edge {
            corners[a.index()].opposite = Some(b);
            corners[b.index()].opposite = Some(a);
            // Skip the rest of a non-manifold run
            let edge = corners[a.index()].edge;
            i += 2;
            while i < order.len() && corners[order[i].index()].edge == edge {
                i += 1;
            }
        } else {
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: usize, b: usize, triangles: &[usize]) -> Edge {
        Edge {
            vertices: [VertexId::new(a), VertexId::new(b)],
            triangles: triangles.iter().map(|&t| TriangleId::new(t)).collect(),
            length: 1.0,
        }
    }

    /// Two triangles (0, 1, 2) and (1, 3, 2) sharing edge 1.
    fn quad() -> (Vec<[VertexId; 3]>, Vec<[EdgeId; 3]>, Vec<Edge>) {
        let triangles = vec![[0, 1, 2].map(VertexId::new), [1, 3, 2].map(VertexId::new)];
        let edges = vec![
            edge(0, 1, &[0]),
            edge(1, 2, &[0, 1]),
            edge(2, 0, &[0]),
            edge(1, 3, &[1]),
            edge(3, 2, &[1]),
        ];
        let tri_edges = vec![[0, 1, 2].map(EdgeId::new), [3, 4, 1].map(EdgeId::new)];
        (triangles, tri_edges, edges)
    }

    #[test]
    fn test_corner_layout() {
        let (triangles, tri_edges, edges) = quad();
        let table = build_corners(&triangles, &tri_edges, &edges, 4);

        assert_eq!(table.corners.len(), 6);
        let c = &table.corners[0];
        assert_eq!(c.vertex, VertexId::new(0));
        assert_eq!(c.edge, EdgeId::new(1));
        assert_eq!(c.next, CornerId::new(1));
        assert_eq!(c.prev, CornerId::new(2));

        let c = &table.corners[5];
        assert_eq!(c.slot, 2);
        assert_eq!(c.triangle, TriangleId::new(1));
        assert_eq!(c.edge, EdgeId::new(3));
        assert_eq!(c.next, CornerId::new(3));

        assert_eq!(table.vertex_corners[1], vec![CornerId::new(1), CornerId::new(3)]);
        assert_eq!(table.vertex_corners[3], vec![CornerId::new(4)]);
    }

    #[test]
    fn test_pairing() {
        let (triangles, tri_edges, edges) = quad();
        let table = build_corners(&triangles, &tri_edges, &edges, 4);

        assert_eq!(table.corners[0].opposite, Some(CornerId::new(4)));
        assert_eq!(table.corners[4].opposite, Some(CornerId::new(0)));
        let unpaired = table.corners.iter().filter(|c| c.opposite.is_none()).count();
        assert_eq!(unpaired, 4);
    }

    #[test]
    fn test_non_manifold_run() {
        // Three triangles on edge (0, 1)
        let triangles = vec![
            [0, 1, 2].map(VertexId::new),
            [1, 0, 3].map(VertexId::new),
            [1, 0, 4].map(VertexId::new),
        ];
        let edges = vec![
            edge(0, 1, &[0, 1, 2]),
            edge(1, 2, &[0]),
            edge(2, 0, &[0]),
            edge(0, 3, &[1]),
            edge(3, 1, &[1]),
            edge(0, 4, &[2]),
            edge(4, 1, &[2]),
        ];
        let tri_edges = vec![
            [0, 1, 2].map(EdgeId::new),
            [0, 3, 4].map(EdgeId::new),
            [0, 5, 6].map(EdgeId::new),
        ];
        let table = build_corners(&triangles, &tri_edges, &edges, 5);

        // Corner 2 of each triangle faces edge 0
        assert_eq!(table.corners[2].opposite, Some(CornerId::new(5)));
        assert_eq!(table.corners[5].opposite, Some(CornerId::new(2)));
        assert_eq!(table.corners[8].opposite, None);
    }
}
