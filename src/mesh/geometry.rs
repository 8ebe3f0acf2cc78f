//! Geometry primitives.
//!
//! Small pure functions over `nalgebra` points and vectors used by the
//! connectivity builder and the subdivision schemes.

use nalgebra::{Point3, Vector3};

/// Normalize a vector, returning the zero vector for (near) zero input.
#[inline]
pub fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
}

/// Midpoint of a segment.
#[inline]
pub fn midpoint(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    Point3::from((a.coords + b.coords) * 0.5)
}

/// Triangle area from its three side lengths (Heron's formula).
///
/// Round-off on collinear input can push the radicand slightly below zero;
/// it is clamped so the result is never NaN.
pub fn heron_area(a: f64, b: f64, c: f64) -> f64 {
    let s = (a + b + c) / 2.0;
    (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt()
}

/// Unit normal of the triangle `(p0, p1, p2)`: `(p2 - p1) x (p0 - p1)`.
///
/// Counter-clockwise input yields the right-handed normal.
pub fn triangle_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    normalize_or_zero((p2 - p1).cross(&(p0 - p1)))
}

/// Angle between two vectors, in radians.
///
/// Returns 0 when either vector has zero length.
pub fn angle_between(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    let denom = v1.norm() * v2.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (v1.dot(v2) / denom).clamp(-1.0, 1.0).acos()
}

/// Axis-aligned bounds of a point set, or `None` if it is empty.
pub fn bounds(points: impl IntoIterator<Item = Point3<f64>>) -> Option<(Point3<f64>, Point3<f64>)> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let (mut min, mut max) = (first, first);
    for p in iter {
        for i in 0..3 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};

    #[test]
    fn test_heron_right_triangle() {
        assert!((heron_area(3.0, 4.0, 5.0) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_heron_collinear_is_zero() {
        assert_eq!(heron_area(1.0, 1.0, 2.0), 0.0);
    }

    #[test]
    fn test_triangle_normal_ccw() {
        let n = triangle_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
        );
        assert!((n - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_angle_between() {
        assert!((angle_between(&Vector3::x(), &Vector3::y()) - FRAC_PI_2).abs() < 1e-12);
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(0.5, 3.0_f64.sqrt() / 2.0, 0.0);
        assert!((angle_between(&a, &b) - FRAC_PI_3).abs() < 1e-12);
        assert_eq!(angle_between(&Vector3::zeros(), &a), 0.0);
    }

    #[test]
    fn test_bounds() {
        let (min, max) = bounds(vec![
            Point3::new(1.0, -2.0, 0.0),
            Point3::new(-1.0, 2.0, 3.0),
        ])
        .unwrap();
        assert_eq!(min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 2.0, 3.0));
        assert!(bounds(Vec::new()).is_none());
    }

    #[test]
    fn test_normalize_zero() {
        assert_eq!(normalize_or_zero(Vector3::zeros()), Vector3::zeros());
    }
}
