//! Irregular (adaptive) subdivision targeting sliver triangles.

use log::{debug, warn};

use crate::algo::Progress;
use crate::error::Result;
use crate::mesh::{TriMesh, Triangle};

use super::{run_passes, Midpoints, Refinement, SplitThresholds, SubdivideOptions, SubdivideStats};

/// How one triangle is refined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Obtuse corner: emit unchanged.
    Keep,
    /// Sliver too small to bother with: emit unchanged.
    KeepSmall,
    /// Split the two edges meeting at the given corner slot.
    SplitTwo(usize),
    /// Split all three edges.
    SplitThree,
}

/// Adaptively subdivide slivers while leaving obtuse triangles alone.
///
/// Each triangle is classified from its corner angles, tested in slot order
/// with the first matching rule winning:
///
/// - a corner above `thresholds.obtuse` keeps the triangle
/// - a corner below `thresholds.small` with both other corners above
///   `thresholds.wide`, whose facing edge is still whole, splits the two
///   edges at that corner (unless the triangle's area is below
///   `thresholds.min_area_fraction` of the average, in which case it is kept)
/// - otherwise all three edges are split
///
/// Midpoints are shared between neighbours, so an edge is never split twice
/// in one pass.
///
/// # Errors
///
/// [`MeshError::InvalidParameter`](crate::MeshError::InvalidParameter) for
/// bad thresholds, or an allocation failure. The mesh is unchanged on error.
pub fn irregular_subdivide(
    mesh: &mut TriMesh,
    options: &SubdivideOptions,
) -> Result<SubdivideStats> {
    irregular_subdivide_with_progress(mesh, options, &Progress::none())
}

/// Irregular subdivision with progress reporting.
pub fn irregular_subdivide_with_progress(
    mesh: &mut TriMesh,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<SubdivideStats> {
    let thresholds = options.thresholds;
    thresholds.validate()?;

    run_passes(
        mesh,
        options.iterations,
        "Irregular subdivision",
        progress,
        |src, stats| irregular_pass(src, &thresholds, stats),
    )
}

fn irregular_pass(
    mesh: &TriMesh,
    thresholds: &SplitThresholds,
    stats: &mut SubdivideStats,
) -> Result<Refinement> {
    let angles = mesh.corner_angles();
    let min_area = mesh.average_triangle_area() * thresholds.min_area_fraction;

    let mut out = Refinement::reserve(mesh)?;
    let mut mids = Midpoints::new(mesh.num_edges());

    for (tid, tri) in mesh.triangles() {
        let theta = tri.corners.map(|c| angles[c.index()]);

        match classify(tri, theta, thresholds, min_area, &mids) {
            Action::Keep => {
                out.push(tri.vertices);
                stats.kept += 1;
            }
            Action::KeepSmall => {
                warn!(
                    "{:?} is a sliver below the minimum area ({:.3e} < {:.3e}); kept",
                    tid, tri.area, min_area
                );
                out.push(tri.vertices);
                stats.small_kept += 1;
            }
            Action::SplitTwo(j) => {
                let s = tri.vertices[j];
                let a = tri.vertices[(j + 1) % 3];
                let b = tri.vertices[(j + 2) % 3];
                let m_sa = mids.split(mesh, tri.edges[j], &mut out);
                let m_bs = mids.split(mesh, tri.edges[(j + 2) % 3], &mut out);

                out.push([s, m_sa, m_bs]);
                out.push([m_sa, a, b]);
                out.push([m_sa, b, m_bs]);
                stats.two_edge_splits += 1;
            }
            Action::SplitThree => {
                let m = tri.edges.map(|e| mids.split(mesh, e, &mut out));
                out.push_quadrisection(tri.vertices, m);
                stats.three_edge_splits += 1;
            }
        }
    }

    debug!(
        "irregular pass: {} kept, {} small kept, {} two-edge, {} three-edge",
        stats.kept, stats.small_kept, stats.two_edge_splits, stats.three_edge_splits
    );

    Ok(out)
}

/// First rule matched by the corners of `tri`, in slot order.
fn classify(
    tri: &Triangle,
    theta: [f64; 3],
    thresholds: &SplitThresholds,
    min_area: f64,
    mids: &Midpoints,
) -> Action {
    for j in 0..3 {
        if theta[j] > thresholds.obtuse {
            return Action::Keep;
        }

        let sliver = theta[j] < thresholds.small
            && theta[(j + 1) % 3] > thresholds.wide
            && theta[(j + 2) % 3] > thresholds.wide;
        // The edge facing corner j sits in edge slot j + 1
        if sliver && !mids.is_split(tri.edges[(j + 1) % 3]) {
            return if tri.area < min_area {
                Action::KeepSmall
            } else {
                Action::SplitTwo(j)
            };
        }
    }
    Action::SplitThree
}
