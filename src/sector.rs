//! Azimuthal sectors
//!
//! The sphere is cut into `N` equal wedges about the Z axis. Each wedge is
//! covered by two scaffold triangles sharing the equator edge between the
//! wedge's start and end points: a northern one closed by the north pole and a
//! southern one closed by the south pole.

use glam::DVec3;
use std::f64::consts::TAU;
use std::ops::Range;

use crate::config::SCAFFOLD_VERTICES;
use crate::geometry::triangle_contains;

/// Slot of the wedge start point within a sector's scaffold block
pub const SCAFFOLD_START: usize = 0;
/// Slot of the wedge end point
pub const SCAFFOLD_END: usize = 1;
/// Slot of the north pole
pub const SCAFFOLD_NORTH: usize = 2;
/// Slot of the south pole
pub const SCAFFOLD_SOUTH: usize = 3;

/// One azimuthal wedge of the sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    index: usize,
    count: usize,
}

impl Sector {
    /// Create sector `index` of `count`
    pub fn new(index: usize, count: usize) -> Self {
        debug_assert!(index < count);
        Self { index, count }
    }

    /// All `count` sectors in order
    pub fn all(count: usize) -> impl Iterator<Item = Sector> {
        (0..count).map(move |index| Sector::new(index, count))
    }

    /// Position of this sector in the partition
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of sectors in the partition
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Angular width of every sector
    #[inline]
    pub fn width(&self) -> f64 {
        TAU / self.count as f64
    }

    /// Azimuth range `[start, end)` covered by this sector
    pub fn azimuth_range(&self) -> Range<f64> {
        let width = self.width();
        let start = self.index as f64 * width;
        start..start + width
    }

    /// The four scaffold positions: start, end, north pole, south pole
    ///
    /// Adjacent sectors share bit-identical boundary points, so no point can
    /// fall in a gap between two wedges.
    pub fn scaffold_positions(&self) -> [DVec3; SCAFFOLD_VERTICES] {
        [
            self.boundary_point(self.index),
            self.boundary_point(self.index + 1),
            DVec3::Z,
            DVec3::NEG_Z,
        ]
    }

    fn boundary_point(&self, boundary: usize) -> DVec3 {
        let angle = (boundary % self.count) as f64 * self.width();
        DVec3::new(angle.cos(), angle.sin(), 0.0)
    }

    /// Whether `point` lies inside one of this sector's scaffold triangles
    ///
    /// Uses the same orientation predicate as point location, so a point
    /// accepted here is always locatable in this sector's history.
    pub fn contains(&self, point: DVec3) -> bool {
        let [start, end, north, south] = self.scaffold_positions();
        triangle_contains(start, end, north, point) || triangle_contains(start, south, end, point)
    }

    /// Sector whose azimuth range contains `point`'s azimuth
    pub fn by_azimuth(point: DVec3, count: usize) -> Sector {
        let azimuth = point.y.atan2(point.x).rem_euclid(TAU);
        let index = ((azimuth / (TAU / count as f64)) as usize).min(count - 1);
        Sector::new(index, count)
    }

    /// Neighbouring sectors (previous, next), wrapping around the partition
    pub fn adjacent(&self) -> (Sector, Sector) {
        let prev = (self.index + self.count - 1) % self.count;
        let next = (self.index + 1) % self.count;
        (Sector::new(prev, self.count), Sector::new(next, self.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::is_counter_clockwise;

    #[test]
    fn test_sector_ranges_tile_circle() {
        let sectors: Vec<Sector> = Sector::all(5).collect();
        assert_eq!(sectors.len(), 5);
        assert_eq!(sectors[0].azimuth_range().start, 0.0);
        for pair in sectors.windows(2) {
            let a = pair[0].azimuth_range();
            let b = pair[1].azimuth_range();
            assert!((a.end - b.start).abs() < 1e-12);
        }
        assert!((sectors[4].azimuth_range().end - TAU).abs() < 1e-12);
    }

    #[test]
    fn test_adjacent_sectors_share_boundary_points() {
        for count in [3, 4, 9] {
            for sector in Sector::all(count) {
                let (_, next) = sector.adjacent();
                assert_eq!(
                    sector.scaffold_positions()[SCAFFOLD_END],
                    next.scaffold_positions()[SCAFFOLD_START]
                );
            }
        }
    }

    #[test]
    fn test_scaffold_positions_on_unit_sphere() {
        for sector in Sector::all(3) {
            for p in sector.scaffold_positions() {
                assert!((p.length() - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_northern_scaffold_is_ccw() {
        for count in [3, 4, 7, 16] {
            for sector in Sector::all(count) {
                let [start, end, north, _] = sector.scaffold_positions();
                assert!(is_counter_clockwise(start, end, north));
            }
        }
    }

    #[test]
    fn test_contains_matches_azimuth() {
        let count = 6;
        let point = DVec3::new(0.3, 0.9, 0.2).normalize();
        let sector = Sector::by_azimuth(point, count);
        assert!(sector.contains(point));

        let (prev, next) = sector.adjacent();
        let opposite = Sector::new((sector.index() + count / 2) % count, count);
        assert!(!opposite.contains(point));
        assert_ne!(prev.index(), next.index());
    }

    #[test]
    fn test_poles_belong_to_every_sector() {
        for sector in Sector::all(4) {
            assert!(sector.contains(DVec3::Z));
            assert!(sector.contains(DVec3::NEG_Z));
        }
    }

    #[test]
    fn test_by_azimuth_wraps_negative_angles() {
        let point = DVec3::new(1.0, -0.01, 0.0).normalize();
        assert_eq!(Sector::by_azimuth(point, 4).index(), 3);
    }
}
