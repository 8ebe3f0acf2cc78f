//! Mesh construction utilities.
//!
//! This module builds a [`TriMesh`] with complete corner-table connectivity
//! from face-vertex lists as commonly found in mesh file formats, and
//! converts a mesh back into that form.
//!
//! Construction runs in fixed stages: validation, vertex/triangle incidence,
//! edge creation, face geometry and orientation, fan ordering, corner
//! pairing, vertex normals. Any inconsistency aborts the build; no partial
//! mesh is ever returned.

use log::{debug, warn};
use nalgebra::{Point3, Vector3};

use super::corners::build_corners;
use super::geometry;
use super::index::{EdgeId, TriangleId, VertexId};
use super::trimesh::{other_triangle, BoundingSphere, Edge, Orientation, Triangle, TriMesh, Vertex};
use crate::error::{MeshError, Result};

/// Build a mesh from vertices and triangle faces.
///
/// Faces that repeat a vertex index are dropped (the rest keep their order).
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Returns
/// A connected mesh, or an error if the input is invalid.
///
/// # Example
/// ```
/// use cornice::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_triangles(), 1);
/// assert_eq!(mesh.num_corners(), 3);
/// ```
pub fn build_from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<TriMesh> {
    let triangles = validate_faces(vertices.len(), faces)?;
    if triangles.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let mut fans = incident_triangles(vertices.len(), &triangles);
    let (edges, tri_edges) = create_edges(vertices, &triangles, &fans)?;

    let non_manifold = edges.iter().filter(|e| e.is_non_manifold()).count();
    if non_manifold > 0 {
        warn!("{} non-manifold edges (more than two incident triangles)", non_manifold);
    }

    let bounds = BoundingSphere::from_points(vertices);
    let face_data = face_geometry(vertices, &triangles, &tri_edges, &edges, &bounds);

    for (v, fan) in fans.iter_mut().enumerate() {
        order_fan(VertexId::new(v), fan, &triangles, &tri_edges, &edges)?;
    }

    let table = build_corners(&triangles, &tri_edges, &edges, vertices.len());

    let triangles: Vec<Triangle> = triangles
        .iter()
        .zip(&tri_edges)
        .zip(&table.triangle_corners)
        .zip(&face_data.normals)
        .zip(&face_data.areas)
        .map(|((((&vertices, &edges), &corners), &normal), &area)| Triangle {
            vertices,
            edges,
            corners,
            normal,
            area,
        })
        .collect();

    let vertices: Vec<Vertex> = vertices
        .iter()
        .zip(fans)
        .zip(table.vertex_corners)
        .map(|((&position, fan), corners)| {
            let sum = fan
                .iter()
                .fold(Vector3::zeros(), |acc, t| acc + triangles[t.index()].normal);
            Vertex {
                normal: geometry::normalize_or_zero(sum),
                triangles: fan,
                corners,
                ..Vertex::new(position)
            }
        })
        .collect();

    debug!(
        "built mesh: {} vertices, {} edges, {} triangles, {} corners",
        vertices.len(),
        edges.len(),
        triangles.len(),
        table.corners.len()
    );

    Ok(TriMesh {
        vertices,
        triangles,
        edges,
        corners: table.corners,
        bounds,
        area: face_data.total_area,
        orientation: face_data.orientation,
        seed: None,
    })
}

/// Build a mesh from vertices and polygon faces of arbitrary length.
///
/// Every face must have exactly three vertices; anything else is rejected
/// with [`MeshError::NonTriangularFace`].
pub fn build_from_polygons(vertices: &[Point3<f64>], faces: &[Vec<usize>]) -> Result<TriMesh> {
    let triangles = faces
        .iter()
        .enumerate()
        .map(|(fi, face)| match face.as_slice() {
            &[a, b, c] => Ok([a, b, c]),
            _ => Err(MeshError::NonTriangularFace {
                face: fi,
                count: face.len(),
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    build_from_triangles(vertices, &triangles)
}

/// Extract vertex positions and triangle faces from a mesh.
///
/// Returns (vertices, faces) suitable for export to file formats.
pub fn to_face_vertex(mesh: &TriMesh) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[usize; 3]> = mesh
        .triangle_ids()
        .map(|t| {
            let [v0, v1, v2] = mesh.triangle_vertices(t);
            [v0.index(), v1.index(), v2.index()]
        })
        .collect();

    (vertices, faces)
}

/// Check vertex indices and drop faces that repeat a vertex.
fn validate_faces(num_vertices: usize, faces: &[[usize; 3]]) -> Result<Vec<[VertexId; 3]>> {
    let mut triangles = Vec::with_capacity(faces.len());

    for (fi, face) in faces.iter().enumerate() {
        if let Some(&vi) = face.iter().find(|&&vi| vi >= num_vertices) {
            return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            continue;
        }
        triangles.push(face.map(VertexId::new));
    }

    let dropped = faces.len() - triangles.len();
    if dropped > 0 {
        warn!("dropped {} degenerate triangles", dropped);
    }

    Ok(triangles)
}

/// Unordered vertex -> triangle incidence, in triangle order.
fn incident_triangles(num_vertices: usize, triangles: &[[VertexId; 3]]) -> Vec<Vec<TriangleId>> {
    let mut fans = vec![Vec::new(); num_vertices];
    for (t, tri) in triangles.iter().enumerate() {
        for v in tri {
            fans[v.index()].push(TriangleId::new(t));
        }
    }
    fans
}

/// Create one edge per unordered vertex pair and fill every triangle's
/// edge slots.
fn create_edges(
    positions: &[Point3<f64>],
    triangles: &[[VertexId; 3]],
    fans: &[Vec<TriangleId>],
) -> Result<(Vec<Edge>, Vec<[EdgeId; 3]>)> {
    let mut slots: Vec<[Option<EdgeId>; 3]> = vec![[None; 3]; triangles.len()];
    let mut edges: Vec<Edge> = Vec::new();

    for t in 0..triangles.len() {
        for j in 0..3 {
            if slots[t][j].is_some() {
                continue;
            }

            let v1 = triangles[t][j];
            let v2 = triangles[t][(j + 1) % 3];
            let id = EdgeId::new(edges.len());
            let mut incident = Vec::with_capacity(2);

            for &f in &fans[v1.index()] {
                let verts = &triangles[f.index()];
                let Some(s) = verts.iter().position(|&x| x == v2) else {
                    continue;
                };

                let slot = if verts[(s + 1) % 3] == v1 {
                    s
                } else if verts[(s + 2) % 3] == v1 {
                    (s + 2) % 3
                } else {
                    return Err(MeshError::InconsistentWinding {
                        triangle: f.index(),
                        v0: v1.index(),
                        v1: v2.index(),
                    });
                };

                slots[f.index()][slot] = Some(id);
                incident.push(f);
            }

            edges.push(Edge {
                vertices: [v1, v2],
                triangles: incident,
                length: (positions[v2.index()] - positions[v1.index()]).norm(),
            });
        }
    }

    let tri_edges = slots
        .iter()
        .enumerate()
        .map(|(t, s)| match *s {
            [Some(a), Some(b), Some(c)] => Ok([a, b, c]),
            _ => {
                let j = s.iter().position(Option::is_none).unwrap_or(0);
                Err(MeshError::InconsistentWinding {
                    triangle: t,
                    v0: triangles[t][j].index(),
                    v1: triangles[t][(j + 1) % 3].index(),
                })
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((edges, tri_edges))
}

/// Per-triangle normals and areas plus the detected orientation.
struct FaceGeometry {
    normals: Vec<Vector3<f64>>,
    areas: Vec<f64>,
    total_area: f64,
    orientation: Orientation,
}

fn face_geometry(
    positions: &[Point3<f64>],
    triangles: &[[VertexId; 3]],
    tri_edges: &[[EdgeId; 3]],
    edges: &[Edge],
    bounds: &BoundingSphere,
) -> FaceGeometry {
    let areas: Vec<f64> = tri_edges
        .iter()
        .map(|e| {
            geometry::heron_area(
                edges[e[0].index()].length,
                edges[e[1].index()].length,
                edges[e[2].index()].length,
            )
        })
        .collect();
    let total_area: f64 = areas.iter().sum();

    let mut normals: Vec<Vector3<f64>> = triangles
        .iter()
        .map(|tri| {
            let [p0, p1, p2] = tri.map(|v| positions[v.index()]);
            geometry::triangle_normal(&p0, &p1, &p2)
        })
        .collect();

    // Positive when the normals lean toward the center
    let signed: f64 = if total_area > 0.0 {
        triangles
            .iter()
            .zip(&normals)
            .zip(&areas)
            .map(|((tri, n), area)| {
                (bounds.center - positions[tri[0].index()]).dot(n) * area / total_area
            })
            .sum()
    } else {
        0.0
    };

    let orientation = if signed > 0.0 {
        for n in &mut normals {
            *n = -*n;
        }
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    };

    debug!("orientation {:?} (signed measure {:.6})", orientation, signed);

    FaceGeometry {
        normals,
        areas,
        total_area,
        orientation,
    }
}

/// Order the triangles around `v` so that consecutive entries share an edge.
///
/// Walks backward across the edge leaving `v` until it closes the loop or
/// hits the boundary (that triangle moves to the front), then walks forward
/// from the first triangle across the edge entering `v`.
fn order_fan(
    v: VertexId,
    fan: &mut [TriangleId],
    triangles: &[[VertexId; 3]],
    tri_edges: &[[EdgeId; 3]],
    edges: &[Edge],
) -> Result<()> {
    let nf = fan.len();
    if nf == 0 {
        return Ok(());
    }

    let slot_of = |t: TriangleId| -> Result<usize> {
        triangles[t.index()]
            .iter()
            .position(|&x| x == v)
            .ok_or(MeshError::VertexNotInTriangle {
                vertex: v.index(),
                triangle: t.index(),
            })
    };

    // Backward walk
    let mut f = fan[0];
    for _ in 0..nf {
        let slot = slot_of(f)?;
        match other_triangle(&edges[tri_edges[f.index()][slot].index()], f) {
            Some(g) => f = g,
            None => {
                if let Some(j) = fan.iter().position(|&x| x == f) {
                    fan.swap(0, j);
                }
                break;
            }
        }
    }

    // Forward walk
    let mut f = fan[0];
    for i in 1..nf {
        let slot = (slot_of(f)? + 2) % 3;
        let Some(next) = other_triangle(&edges[tri_edges[f.index()][slot].index()], f) else {
            break;
        };
        match fan[i..].iter().position(|&x| x == next) {
            Some(k) => fan.swap(i, i + k),
            None => break,
        }
        f = next;
    }

    Ok(())
}
