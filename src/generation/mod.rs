//! Vertex sampling and sector layout
//!
//! Samples the sphere with a Fibonacci lattice, assigns every point to one
//! azimuthal sector and lays the shared position array out as one contiguous
//! block per sector: the sector's four scaffold slots, then its points.

mod fibonacci;

pub use fibonacci::{fibonacci_point, generate_fibonacci_sphere_points};

use glam::DVec3;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::ops::Range;

use crate::config::{validate_counts, MeshConfig, SCAFFOLD_VERTICES};
use crate::error::{MeshError, Result};
use crate::sector::Sector;

/// Where one sector's vertices live in the shared position array
#[derive(Debug, Clone, PartialEq)]
pub struct SectorLayout {
    /// The sector this block belongs to
    pub sector: Sector,
    /// Indices of the start, end, north pole and south pole scaffold vertices
    pub scaffold: [u32; SCAFFOLD_VERTICES],
    /// Indices of the sampled points owned by the sector
    pub points: Range<u32>,
}

impl SectorLayout {
    /// Number of sampled points in the sector
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// The whole block, scaffold slots included
    pub fn block(&self) -> Range<u32> {
        self.scaffold[0]..self.points.end
    }

    /// The sector's point indices in a seeded random order
    ///
    /// Lattice order sweeps the wedge along the spiral, which makes the
    /// history a long chain. A random order keeps its depth logarithmic.
    /// Each sector draws from its own stream of the seeded generator.
    pub fn insertion_order(&self, seed: u64) -> Vec<u32> {
        let mut order: Vec<u32> = self.points.clone().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        // Stream 0 is the jitter stream
        rng.set_stream(self.sector.index() as u64 + 1);
        order.shuffle(&mut rng);
        order
    }
}

/// Sampler output: the shared position array and its per-sector layout
#[derive(Debug, Clone)]
pub struct SampledSphere {
    /// Unit-sphere positions, written once and never mutated afterwards
    pub positions: Vec<DVec3>,
    /// One layout per sector, in sector order
    pub sectors: Vec<SectorLayout>,
}

impl SampledSphere {
    /// Number of sampled points, scaffold excluded
    pub fn point_count(&self) -> usize {
        self.sectors.iter().map(SectorLayout::point_count).sum()
    }
}

/// Find the sector whose scaffold triangles contain `point`
///
/// The azimuth gives a candidate. Membership is then confirmed with the
/// orientation predicate used by point location, trying the neighbouring
/// sectors if the candidate rejects the point.
///
/// # Errors
///
/// Returns `PointLocationFailure` if no sector accepts the point.
pub fn assign_sector(point: DVec3, sector_count: usize) -> Result<Sector> {
    let candidate = Sector::by_azimuth(point, sector_count);
    if candidate.contains(point) {
        return Ok(candidate);
    }

    let (prev, next) = candidate.adjacent();
    [prev, next]
        .into_iter()
        .find(|sector| sector.contains(point))
        .ok_or(MeshError::PointLocationFailure {
            vertex: None,
            point: point.to_array(),
        })
}

/// Sample `point_count` lattice points and lay them out by sector
///
/// With `jitter == 0` the output depends only on the two counts and is
/// bit-identical between calls.
///
/// # Errors
///
/// Returns `DegenerateConfiguration` for an invalid request and
/// `PointLocationFailure` if a point cannot be assigned to a sector.
///
/// # Example
///
/// ```rust
/// use rust_delaunay_sphere::generation::sample_sphere;
///
/// let sampled = sample_sphere(100, 4, 0.0, 0).unwrap();
/// assert_eq!(sampled.positions.len(), 100 + 4 * 4);
/// assert_eq!(sampled.point_count(), 100);
/// ```
pub fn sample_sphere(
    point_count: usize,
    sector_count: usize,
    jitter: f64,
    seed: u64,
) -> Result<SampledSphere> {
    validate_counts(point_count, sector_count)?;

    let points = generate_fibonacci_sphere_points(point_count, jitter, seed);

    let mut buckets: Vec<Vec<DVec3>> = vec![Vec::new(); sector_count];
    for point in points {
        let sector = assign_sector(point, sector_count)?;
        buckets[sector.index()].push(point);
    }

    let mut positions = Vec::with_capacity(point_count + sector_count * SCAFFOLD_VERTICES);
    let mut sectors = Vec::with_capacity(sector_count);

    for (sector, bucket) in Sector::all(sector_count).zip(buckets) {
        let base = positions.len() as u32;
        positions.extend_from_slice(&sector.scaffold_positions());
        positions.extend(bucket);

        let first_point = base + SCAFFOLD_VERTICES as u32;
        sectors.push(SectorLayout {
            sector,
            scaffold: [base, base + 1, base + 2, base + 3],
            points: first_point..positions.len() as u32,
        });
    }

    Ok(SampledSphere { positions, sectors })
}

/// Sample the sphere described by `config`
pub fn sample_with_config(config: &MeshConfig) -> Result<SampledSphere> {
    config.validate()?;
    sample_sphere(config.point_count(), config.sector_count, config.jitter, config.seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sector::{SCAFFOLD_NORTH, SCAFFOLD_SOUTH};

    #[test]
    fn test_layout_sizes() {
        let sampled = sample_sphere(1000, 6, 0.0, 0).unwrap();
        assert_eq!(sampled.positions.len(), 1000 + 6 * SCAFFOLD_VERTICES);
        assert_eq!(sampled.sectors.len(), 6);
        assert_eq!(sampled.point_count(), 1000);
    }

    #[test]
    fn test_blocks_are_contiguous_and_ordered() {
        let sampled = sample_sphere(500, 5, 0.0, 0).unwrap();
        let mut next = 0u32;
        for (i, layout) in sampled.sectors.iter().enumerate() {
            assert_eq!(layout.sector.index(), i);
            assert_eq!(layout.block().start, next);
            assert_eq!(layout.points.start, layout.scaffold[3] + 1);
            next = layout.block().end;
        }
        assert_eq!(next as usize, sampled.positions.len());
    }

    #[test]
    fn test_scaffold_slots_hold_scaffold_positions() {
        let sampled = sample_sphere(200, 4, 0.0, 0).unwrap();
        for layout in &sampled.sectors {
            let expected = layout.sector.scaffold_positions();
            for (slot, &index) in layout.scaffold.iter().enumerate() {
                assert_eq!(sampled.positions[index as usize], expected[slot]);
            }
            assert_eq!(sampled.positions[layout.scaffold[SCAFFOLD_NORTH] as usize], DVec3::Z);
            assert_eq!(sampled.positions[layout.scaffold[SCAFFOLD_SOUTH] as usize], DVec3::NEG_Z);
        }
    }

    #[test]
    fn test_every_point_lies_in_its_sector() {
        let sampled = sample_sphere(2000, 7, 0.3, 11).unwrap();
        for layout in &sampled.sectors {
            for index in layout.points.clone() {
                assert!(layout.sector.contains(sampled.positions[index as usize]));
            }
        }
    }

    #[test]
    fn test_sampling_is_idempotent() {
        let first = sample_sphere(1234, 4, 0.0, 0).unwrap();
        let second = sample_sphere(1234, 4, 0.0, 99).unwrap();
        assert_eq!(first.positions, second.positions);
        assert_eq!(first.sectors, second.sectors);
    }

    #[test]
    fn test_sampled_points_are_a_permutation_of_the_lattice() {
        let sampled = sample_sphere(300, 3, 0.0, 0).unwrap();
        let lattice = generate_fibonacci_sphere_points(300, 0.0, 0);
        let mut found = 0;
        for layout in &sampled.sectors {
            for index in layout.points.clone() {
                assert!(lattice.contains(&sampled.positions[index as usize]));
                found += 1;
            }
        }
        assert_eq!(found, 300);
    }

    #[test]
    fn test_assign_sector_boundary_point() {
        // A point exactly on the wedge boundary belongs to one of the two wedges
        let point = DVec3::new(0.0, 1.0, 0.2).normalize();
        let sector = assign_sector(point, 4).unwrap();
        assert!(sector.index() == 0 || sector.index() == 1);
        assert!(sector.contains(point));
    }

    #[test]
    fn test_invalid_requests_rejected() {
        assert!(matches!(
            sample_sphere(100, 2, 0.0, 0),
            Err(MeshError::DegenerateConfiguration(_))
        ));
        assert!(matches!(
            sample_sphere(3, 4, 0.0, 0),
            Err(MeshError::DegenerateConfiguration(_))
        ));
    }

    #[test]
    fn test_insertion_order_is_seeded_permutation() {
        let sampled = sample_sphere(500, 4, 0.0, 0).unwrap();
        let layout = &sampled.sectors[1];

        let order = layout.insertion_order(3);
        assert_eq!(order, layout.insertion_order(3));
        assert_ne!(order, layout.insertion_order(4));
        assert_ne!(order, layout.points.clone().collect::<Vec<_>>());

        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, layout.points.clone().collect::<Vec<_>>());
    }

    #[test]
    fn test_insertion_order_differs_per_sector() {
        let sampled = sample_sphere(400, 4, 0.0, 0).unwrap();
        let offsets = |layout: &SectorLayout| -> Vec<u32> {
            layout
                .insertion_order(0)
                .iter()
                .map(|v| v - layout.points.start)
                .take(20)
                .collect()
        };
        assert_ne!(offsets(&sampled.sectors[0]), offsets(&sampled.sectors[2]));
    }
}
