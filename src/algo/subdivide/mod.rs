//! Mesh subdivision algorithms.
//!
//! Both schemes split edges at their midpoints; vertex positions never move.
//!
//! # Regular Subdivision
//!
//! Every edge is bisected once and every triangle becomes four: three
//! corner triangles and one middle triangle. Triangle count grows by 4x per
//! iteration and the shape of every triangle is preserved.
//!
//! # Irregular Subdivision
//!
//! An adaptive scheme aimed at sliver triangles. Each triangle is tested
//! corner by corner:
//!
//! 1. A corner wider than the obtuse threshold keeps the triangle as is
//! 2. A corner narrower than the small threshold, whose two companions are
//!    both wider than the wide threshold, splits only the two edges meeting
//!    at the narrow corner (three output triangles). Triangles much smaller
//!    than the mesh average are kept instead
//! 3. Otherwise all three edges are split as in the regular scheme
//!
//! Kept triangles next to split ones leave T-junctions in the output; the
//! rebuilt mesh reports those edges as boundary.
//!
//! # Example
//!
//! ```no_run
//! use cornice::algo::subdivide::{irregular_subdivide, SubdivideOptions};
//!
//! let mut mesh = cornice::io::load("input.ply").unwrap();
//!
//! let options = SubdivideOptions::new(2); // 2 iterations
//! let stats = irregular_subdivide(&mut mesh, &options).unwrap();
//! println!("{} -> {} triangles", stats.triangles_before, stats.triangles_after);
//!
//! cornice::io::save(&mesh, "output.ply").unwrap();
//! ```
//!
//! # Failure
//!
//! Each pass reserves its worst-case output (`V + E` vertices, `4T`
//! triangles) up front. If that reservation or the rebuild fails, the
//! error is returned and the caller's mesh is left exactly as it was.

mod irregular;
mod regular;

pub use irregular::{irregular_subdivide, irregular_subdivide_with_progress};
pub use regular::{regular_subdivide, regular_subdivide_with_progress};

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_6, PI};

use log::{info, warn};
use nalgebra::Point3;

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, EdgeId, TriMesh, VertexId};

/// Angle and area thresholds for irregular subdivision.
///
/// Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitThresholds {
    /// A corner wider than this keeps its triangle unsplit (default 90°).
    pub obtuse: f64,

    /// A corner narrower than this is a sliver tip (default 30°).
    pub small: f64,

    /// Both other corners of a sliver must be wider than this (default 60°).
    pub wide: f64,

    /// Slivers with area below this fraction of the average triangle area
    /// are kept (default 0.25).
    pub min_area_fraction: f64,
}

impl Default for SplitThresholds {
    fn default() -> Self {
        Self {
            obtuse: FRAC_PI_2,
            small: FRAC_PI_6,
            wide: FRAC_PI_3,
            min_area_fraction: 0.25,
        }
    }
}

impl SplitThresholds {
    /// Thresholds from angles given in degrees, with the default area fraction.
    pub fn from_degrees(obtuse: f64, small: f64, wide: f64) -> Self {
        Self {
            obtuse: obtuse.to_radians(),
            small: small.to_radians(),
            wide: wide.to_radians(),
            ..Self::default()
        }
    }

    /// Set the minimum area fraction.
    pub fn with_min_area_fraction(mut self, fraction: f64) -> Self {
        self.min_area_fraction = fraction;
        self
    }

    /// Check that every threshold is finite and in range.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("obtuse", self.obtuse), ("small", self.small), ("wide", self.wide)] {
            if !value.is_finite() || value <= 0.0 || value >= PI {
                return Err(MeshError::invalid_param(name, value, "must be in (0, pi)"));
            }
        }
        if self.small >= self.wide {
            return Err(MeshError::invalid_param(
                "small",
                self.small,
                "must be less than the wide threshold",
            ));
        }
        if !self.min_area_fraction.is_finite() || self.min_area_fraction < 0.0 {
            return Err(MeshError::invalid_param(
                "min_area_fraction",
                self.min_area_fraction,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Options for subdivision algorithms.
#[derive(Debug, Clone, Default)]
pub struct SubdivideOptions {
    /// Number of subdivision iterations.
    pub iterations: usize,

    /// Thresholds used by irregular subdivision.
    pub thresholds: SplitThresholds,
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            thresholds: SplitThresholds::default(),
        }
    }

    /// Set the irregular split thresholds.
    pub fn with_thresholds(mut self, thresholds: SplitThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

/// What a subdivision call did, summed over its iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubdivideStats {
    /// Iterations performed.
    pub iterations: usize,
    /// Triangle count before the first iteration.
    pub triangles_before: usize,
    /// Triangle count after the last iteration.
    pub triangles_after: usize,
    /// Midpoint vertices created.
    pub vertices_added: usize,
    /// Triangles kept because of an obtuse corner.
    pub kept: usize,
    /// Sliver triangles kept because of their small area.
    pub small_kept: usize,
    /// Triangles split along two edges.
    pub two_edge_splits: usize,
    /// Triangles split along all three edges.
    pub three_edge_splits: usize,
}

impl SubdivideStats {
    fn absorb(&mut self, pass: &SubdivideStats) {
        self.vertices_added += pass.vertices_added;
        self.kept += pass.kept;
        self.small_kept += pass.small_kept;
        self.two_edge_splits += pass.two_edge_splits;
        self.three_edge_splits += pass.three_edge_splits;
    }
}

/// Output of one pass: positions and faces for the rebuild.
struct Refinement {
    positions: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
}

impl Refinement {
    /// Start from the mesh's vertices, with room for one midpoint per edge
    /// and four triangles per input triangle.
    fn reserve(mesh: &TriMesh) -> Result<Self> {
        let max_vertices = mesh.num_vertices() + mesh.num_edges();
        let max_faces = 4 * mesh.num_triangles();

        let mut positions = Vec::new();
        positions.try_reserve_exact(max_vertices).map_err(|_| {
            warn!("could not reserve {} vertices", max_vertices);
            MeshError::alloc("vertices", max_vertices)
        })?;
        let mut faces = Vec::new();
        faces.try_reserve_exact(max_faces).map_err(|_| {
            warn!("could not reserve {} triangles", max_faces);
            MeshError::alloc("triangles", max_faces)
        })?;

        positions.extend(mesh.vertex_ids().map(|v| *mesh.position(v)));
        Ok(Self { positions, faces })
    }

    fn push(&mut self, tri: [VertexId; 3]) {
        self.faces.push(tri.map(VertexId::index));
    }

    /// Emit the four triangles of a full split; `m[k]` bisects edge slot `k`.
    fn push_quadrisection(&mut self, v: [VertexId; 3], m: [VertexId; 3]) {
        self.push([v[0], m[0], m[2]]);
        self.push([m[0], m[1], m[2]]);
        self.push([m[0], v[1], m[1]]);
        self.push([m[2], m[1], v[2]]);
    }
}

/// Edge -> midpoint side table, scoped to one pass.
struct Midpoints {
    table: Vec<Option<VertexId>>,
}

impl Midpoints {
    fn new(num_edges: usize) -> Self {
        Self {
            table: vec![None; num_edges],
        }
    }

    fn is_split(&self, e: EdgeId) -> bool {
        self.table[e.index()].is_some()
    }

    /// Midpoint of `e`, created on first request.
    fn split(&mut self, mesh: &TriMesh, e: EdgeId, out: &mut Refinement) -> VertexId {
        *self.table[e.index()].get_or_insert_with(|| {
            let id = VertexId::new(out.positions.len());
            out.positions.push(mesh.edge_midpoint(e));
            id
        })
    }
}

/// Run `pass` for every iteration and swap the result in at the end.
fn run_passes<F>(
    mesh: &mut TriMesh,
    iterations: usize,
    label: &str,
    progress: &Progress,
    pass: F,
) -> Result<SubdivideStats>
where
    F: Fn(&TriMesh, &mut SubdivideStats) -> Result<Refinement>,
{
    let mut stats = SubdivideStats {
        triangles_before: mesh.num_triangles(),
        triangles_after: mesh.num_triangles(),
        ..Default::default()
    };

    let mut current: Option<TriMesh> = None;
    for iter in 0..iterations {
        progress.report(iter, iterations, label);

        let src: &TriMesh = match &current {
            Some(m) => m,
            None => &*mesh,
        };
        let mut counts = SubdivideStats::default();
        let refined = pass(src, &mut counts)?;
        counts.vertices_added = refined.positions.len() - src.num_vertices();

        let next = build_from_triangles(&refined.positions, &refined.faces)?;
        stats.absorb(&counts);
        stats.iterations += 1;
        stats.triangles_after = next.num_triangles();
        current = Some(next);
    }

    if let Some(next) = current {
        *mesh = next;
        progress.report(iterations, iterations, label);
        info!(
            "{}: {} -> {} triangles in {} iterations",
            label, stats.triangles_before, stats.triangles_after, stats.iterations
        );
    }

    Ok(stats)
}
