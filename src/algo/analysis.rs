//! Per-vertex mesh analyses that write vertex colors.
//!
//! Every analysis first resets all vertices to
//! [`DEFAULT_COLOR`](crate::mesh::DEFAULT_COLOR), then colors the vertices it
//! flags and returns a summary.
//!
//! # Analyses
//!
//! - [`valence_deficit`]: `6 - valence`, highlighting irregular vertices
//! - [`angle_deficit`]: `2π - Σθ`, the discrete Gaussian curvature
//! - [`checkerboard`]: a 3D checker pattern in object space
//!
//! # Example
//!
//! ```
//! use cornice::algo::analysis::angle_deficit;
//! use cornice::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! // Gauss-Bonnet: total deficit of a sphere is 4π
//! let summary = angle_deficit(&mut mesh);
//! assert!((summary.total() - 4.0 * std::f64::consts::PI).abs() < 1e-9);
//! ```

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8};

use log::info;

use crate::error::{MeshError, Result};
use crate::mesh::{Color, TriMesh, VertexId};

const ORANGE: Color = [1.0, 0.7, 0.0];
const DARK_ORANGE: Color = [1.0, 0.3, 0.0];
const RED: Color = [1.0, 0.0, 0.0];

/// Per-vertex deficits with their total.
#[derive(Debug, Clone)]
pub struct DeficitSummary<T> {
    deficits: Vec<T>,
    total: T,
    positive: usize,
}

impl<T: Copy> DeficitSummary<T> {
    /// Deficit at a vertex.
    #[inline]
    pub fn deficit(&self, v: VertexId) -> T {
        self.deficits[v.index()]
    }

    /// All deficits, indexed by vertex.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.deficits
    }

    /// Sum over all vertices, negative deficits included.
    #[inline]
    pub fn total(&self) -> T {
        self.total
    }

    /// Number of vertices with a positive deficit.
    #[inline]
    pub fn positive_count(&self) -> usize {
        self.positive
    }
}

/// Valence deficit `6 - valence` per vertex.
///
/// Vertices with deficit 1, 2 and 3 or more are colored orange, dark orange
/// and red.
pub fn valence_deficit(mesh: &mut TriMesh) -> DeficitSummary<i64> {
    mesh.reset_colors();

    let deficits: Vec<i64> = mesh
        .vertex_ids()
        .map(|v| 6 - mesh.valence(v) as i64)
        .collect();

    for (i, &d) in deficits.iter().enumerate() {
        let color = match d {
            1 => ORANGE,
            2 => DARK_ORANGE,
            d if d >= 3 => RED,
            _ => continue,
        };
        mesh.set_color(VertexId::new(i), color);
    }

    let summary = DeficitSummary {
        total: deficits.iter().sum(),
        positive: deficits.iter().filter(|&&d| d > 0).count(),
        deficits,
    };
    info!(
        "valence deficit: total {}, {} vertices below valence 6",
        summary.total, summary.positive
    );
    summary
}

/// Angle deficit `2π - Σθ` per vertex.
///
/// Deficits in `[π/8, π/4)`, `[π/4, π/2)` and `[π/2, ∞)` are colored orange,
/// dark orange and red. On a closed mesh the total is `2πχ`.
pub fn angle_deficit(mesh: &mut TriMesh) -> DeficitSummary<f64> {
    mesh.reset_colors();

    let deficits: Vec<f64> = mesh.vertex_ids().map(|v| mesh.angle_deficit(v)).collect();

    for (i, &d) in deficits.iter().enumerate() {
        let color = if d >= FRAC_PI_2 {
            RED
        } else if d >= FRAC_PI_4 {
            DARK_ORANGE
        } else if d >= FRAC_PI_8 {
            ORANGE
        } else {
            continue;
        };
        mesh.set_color(VertexId::new(i), color);
    }

    let summary = DeficitSummary {
        total: deficits.iter().sum(),
        positive: deficits.iter().filter(|&&d| d > 0.0).count(),
        deficits,
    };
    info!(
        "angle deficit: total {:.6}, {} vertices with positive deficit",
        summary.total, summary.positive
    );
    summary
}

/// Options for the checkerboard pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckerboardOptions {
    /// Edge length of one checker cell in object units.
    pub period: f64,
}

impl Default for CheckerboardOptions {
    fn default() -> Self {
        Self { period: 0.1 }
    }
}

impl CheckerboardOptions {
    /// Create options with the given cell size.
    pub fn new(period: f64) -> Self {
        Self { period }
    }
}

/// Color vertices by a 3D checker pattern.
///
/// Each channel is 1 when `floor(coord / period)` is even and 0 otherwise,
/// with x, y and z driving red, green and blue.
pub fn checkerboard(mesh: &mut TriMesh, options: &CheckerboardOptions) -> Result<()> {
    let period = options.period;
    if !period.is_finite() || period <= 0.0 {
        return Err(MeshError::invalid_param(
            "period",
            period,
            "must be finite and positive",
        ));
    }

    let even = |x: f64| -> f64 {
        if (x / period).floor().rem_euclid(2.0) == 0.0 {
            1.0
        } else {
            0.0
        }
    };

    for v in mesh.vertex_ids().collect::<Vec<_>>() {
        let p = *mesh.position(v);
        mesh.set_color(v, [even(p.x), even(p.y), even(p.z)]);
    }
    Ok(())
}

/// Map a scalar in `[0, 1]` onto a white-red-yellow-green ramp.
///
/// 0 is white, 1/3 red, 2/3 yellow and 1 green; values above 1 saturate to
/// yellow.
pub fn color_mapping(t: f64) -> Color {
    let color = if t == 0.0 {
        [1.0, 1.0, 1.0]
    } else if t <= 1.0 / 3.0 {
        [1.0, 1.0 - 3.0 * t, 1.0 - 3.0 * t]
    } else if t <= 2.0 / 3.0 {
        [1.0, 3.0 * t - 1.0, 0.0]
    } else if t <= 1.0 {
        [3.0 - 3.0 * t, 1.0, 0.0]
    } else {
        [1.0, 1.0, 0.0]
    };
    color.map(|c| c.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_triangles, DEFAULT_COLOR};
    use nalgebra::Point3;
    use std::f64::consts::PI;

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

    fn create_octahedron() -> TriMesh {
        let vertices = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, -1.0),
        ];
        let faces = vec![
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_valence_deficit_tetrahedron() {
        let mut mesh = create_tetrahedron();
        let summary = valence_deficit(&mut mesh);

        assert_eq!(summary.total(), 12);
        assert_eq!(summary.positive_count(), 4);
        assert_eq!(summary.deficit(VertexId::new(0)), 3);
        assert!(mesh.vertices().all(|(_, v)| v.color == RED));
    }

    #[test]
    fn test_valence_deficit_octahedron() {
        let mut mesh = create_octahedron();
        let summary = valence_deficit(&mut mesh);

        assert_eq!(summary.total(), 12);
        assert!(summary.values().iter().all(|&d| d == 2));
        assert!(mesh.vertices().all(|(_, v)| v.color == DARK_ORANGE));
    }

    #[test]
    fn test_angle_deficit_gauss_bonnet() {
        let mut mesh = create_tetrahedron();
        let summary = angle_deficit(&mut mesh);

        assert!((summary.total() - 4.0 * PI).abs() < 1e-9);
        assert_eq!(summary.positive_count(), 4);
    }

    #[test]
    fn test_angle_deficit_octahedron() {
        let mut mesh = create_octahedron();
        let summary = angle_deficit(&mut mesh);

        for &d in summary.values() {
            assert!((d - 2.0 * PI / 3.0).abs() < 1e-9);
        }
        assert!(mesh.vertices().all(|(_, v)| v.color == RED));
    }

    #[test]
    fn test_flat_interior_vertex_uncolored() {
        // Four right triangles around the origin; the center is flat
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1]];
        let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
        mesh.set_color(VertexId::new(0), RED);

        let summary = angle_deficit(&mut mesh);
        assert!(summary.deficit(VertexId::new(0)).abs() < 1e-12);
        assert_eq!(mesh.vertex(VertexId::new(0)).color, DEFAULT_COLOR);
    }

    #[test]
    fn test_checkerboard() {
        let vertices = vec![
            Point3::new(0.05, 0.15, -0.05),
            Point3::new(0.25, 0.05, 0.05),
            Point3::new(0.15, 0.25, 0.15),
        ];
        let mut mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        checkerboard(&mut mesh, &CheckerboardOptions::default()).unwrap();

        assert_eq!(mesh.vertex(VertexId::new(0)).color, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertex(VertexId::new(1)).color, [1.0, 1.0, 1.0]);
        assert_eq!(mesh.vertex(VertexId::new(2)).color, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_checkerboard_rejects_bad_period() {
        let mut mesh = create_tetrahedron();
        assert!(checkerboard(&mut mesh, &CheckerboardOptions::new(0.0)).is_err());
        assert!(checkerboard(&mut mesh, &CheckerboardOptions::new(f64::NAN)).is_err());
    }

    #[test]
    fn test_color_mapping_ramp() {
        assert_eq!(color_mapping(0.0), [1.0, 1.0, 1.0]);
        assert_eq!(color_mapping(1.0 / 3.0), [1.0, 0.0, 0.0]);
        assert_eq!(color_mapping(1.0), [0.0, 1.0, 0.0]);
        assert_eq!(color_mapping(2.0), [1.0, 1.0, 0.0]);

        let mid = color_mapping(0.5);
        assert!((mid[1] - 0.5).abs() < 1e-12);
        assert_eq!(mid[2], 0.0);
    }
}
