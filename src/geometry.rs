//! Spherical vector math
//!
//! Orientation, circumcircle and arc-length primitives on unit vectors. These
//! feed the two predicates the triangulation needs: orientation (winding and
//! point-in-triangle) and the empty-circumcircle test.

use glam::DVec3;

/// Scalar triple product `a · (b × c)`
#[inline]
pub fn triple_product(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    a.dot(b.cross(c))
}

/// Whether `a, b, c` wind counter-clockwise seen from outside the sphere
///
/// Collinear (great-circle) configurations count as counter-clockwise.
#[inline]
pub fn is_counter_clockwise(a: DVec3, b: DVec3, c: DVec3) -> bool {
    triple_product(a, b, c) >= 0.0
}

/// Circumcentre of a spherical triangle, as a unit vector
///
/// For a counter-clockwise triangle this points to the triangle's side of the
/// sphere. Degenerate triangles yield the zero vector.
#[inline]
pub fn circumcentre(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Angular circumradius of a spherical triangle
///
/// NaN for degenerate triangles.
#[inline]
pub fn circumradius(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    let n = a.cross(b) + b.cross(c) + c.cross(a);
    (triple_product(a, b, c) / n.length()).clamp(-1.0, 1.0).acos()
}

/// Great-circle distance between two unit vectors
#[inline]
pub fn arc_length(p: DVec3, q: DVec3) -> f64 {
    p.dot(q).clamp(-1.0, 1.0).acos()
}

/// Whether `p` lies inside (or on the border of) the counter-clockwise triangle `a, b, c`
#[inline]
pub fn triangle_contains(a: DVec3, b: DVec3, c: DVec3, p: DVec3) -> bool {
    is_counter_clockwise(a, b, p) && is_counter_clockwise(b, c, p) && is_counter_clockwise(c, a, p)
}

/// Like [`triangle_contains`] but accepts points up to `tolerance` outside each edge
#[inline]
pub fn triangle_contains_within(a: DVec3, b: DVec3, c: DVec3, p: DVec3, tolerance: f64) -> bool {
    triple_product(a, b, p) >= -tolerance
        && triple_product(b, c, p) >= -tolerance
        && triple_product(c, a, p) >= -tolerance
}

/// Empty-circumcircle test: is `p` strictly inside the circumcircle of `a, b, c`?
///
/// Degenerate triangles have no usable circle and never report a violation.
#[inline]
pub fn in_circumcircle(a: DVec3, b: DVec3, c: DVec3, p: DVec3) -> bool {
    let centre = circumcentre(a, b, c);
    let radius = circumradius(a, b, c);
    if centre == DVec3::ZERO || !radius.is_finite() {
        return false;
    }
    arc_length(p, centre) < radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn octant() -> (DVec3, DVec3, DVec3) {
        (DVec3::X, DVec3::Y, DVec3::Z)
    }

    #[test]
    fn test_orientation() {
        let (a, b, c) = octant();
        assert!(is_counter_clockwise(a, b, c));
        assert!(is_counter_clockwise(b, c, a));
        assert!(!is_counter_clockwise(a, c, b));
    }

    #[test]
    fn test_orientation_collinear_counts_as_ccw() {
        // All three on the equator great circle
        let a = DVec3::X;
        let b = DVec3::new(0.6, 0.8, 0.0);
        let c = DVec3::Y;
        assert_eq!(triple_product(a, b, c), 0.0);
        assert!(is_counter_clockwise(a, b, c));
    }

    #[test]
    fn test_octant_circumcircle() {
        let (a, b, c) = octant();
        let centre = circumcentre(a, b, c);
        let expected = DVec3::ONE.normalize();
        assert!((centre - expected).length() < 1e-12);

        let radius = circumradius(a, b, c);
        // Every vertex sits exactly one circumradius from the centre
        for v in [a, b, c] {
            assert!((arc_length(v, centre) - radius).abs() < 1e-12);
        }
        assert!((radius - (1.0 / 3.0f64.sqrt()).acos()).abs() < 1e-12);
    }

    #[test]
    fn test_arc_length_clamps_overshoot() {
        let p = DVec3::new(1.0 + 1e-15, 0.0, 0.0);
        assert_eq!(arc_length(p, DVec3::X), 0.0);
        assert!((arc_length(DVec3::X, DVec3::Y) - FRAC_PI_2).abs() < 1e-12);
        assert!(arc_length(DVec3::X, -DVec3::X).is_finite());
    }

    #[test]
    fn test_triangle_contains() {
        let (a, b, c) = octant();
        let inside = DVec3::ONE.normalize();
        let outside = -inside;
        assert!(triangle_contains(a, b, c, inside));
        assert!(!triangle_contains(a, b, c, outside));
        // Vertices are on the border and therefore contained
        assert!(triangle_contains(a, b, c, a));
        assert!(triangle_contains(a, b, c, c));
    }

    #[test]
    fn test_in_circumcircle() {
        let (a, b, c) = octant();
        let centre = DVec3::ONE.normalize();
        assert!(in_circumcircle(a, b, c, centre));
        assert!(!in_circumcircle(a, b, c, -centre));
        // On the circle is not inside
        assert!(!in_circumcircle(a, b, c, a));
    }

    #[test]
    fn test_degenerate_circle_never_violates() {
        let a = DVec3::X;
        let b = DVec3::new(0.6, 0.8, 0.0);
        assert!(!in_circumcircle(a, a, b, DVec3::Z));
    }
}
