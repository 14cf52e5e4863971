//! Triangulation engine
//!
//! Samples the sphere, triangulates every sector on its own worker thread and
//! concatenates the sector triangle lists in sector order.

use glam::DVec3;
use rayon::prelude::*;
use std::time::Instant;

use crate::config::{MeshConfig, MeshDetail};
use crate::error::{MeshError, Result};
use crate::generation::{sample_with_config, SectorLayout};
use crate::triangulation::{SectorStats, SectorTriangulation, SectorTriangulator};

/// Layout and counters of one triangulated sector
#[derive(Debug, Clone, PartialEq)]
pub struct SectorSummary {
    /// Where the sector's vertices live in the position array
    pub layout: SectorLayout,
    /// Insertion, flip and output counters
    pub stats: SectorStats,
}

/// A finished sphere triangulation
///
/// `positions` is the shared unit-sphere vertex array, scaffold slots
/// included. `indices` holds three counter-clockwise vertex indices per
/// triangle and never references a scaffold slot.
#[derive(Debug, Clone)]
pub struct Triangulation {
    positions: Vec<DVec3>,
    indices: Vec<u32>,
    sectors: Vec<SectorSummary>,
}

impl Triangulation {
    /// Unit-sphere vertex positions
    #[inline]
    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Flat triangle index list
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Per-sector layout and statistics, in sector order
    #[inline]
    pub fn sectors(&self) -> &[SectorSummary] {
        &self.sectors
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Whether `vertex` is one of the reserved scaffold slots
    pub fn is_scaffold(&self, vertex: u32) -> bool {
        self.sectors
            .iter()
            .any(|summary| summary.layout.scaffold.contains(&vertex))
    }

    /// Hand the position and index buffers over to the caller
    pub fn into_buffers(self) -> (Vec<DVec3>, Vec<u32>) {
        (self.positions, self.indices)
    }
}

/// Orchestrates sampling, parallel sector triangulation and the merge
///
/// # Example
///
/// ```rust
/// use rust_delaunay_sphere::*;
///
/// let config = MeshConfigBuilder::new()
///     .detail(MeshDetail::Custom { point_count: 500 })
///     .sector_count(4)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let triangulation = TriangulationEngine::new(config).unwrap().generate().unwrap();
/// assert!(triangulation.triangle_count() > 0);
/// assert_eq!(triangulation.indices().len() % 3, 0);
/// ```
#[derive(Debug, Clone)]
pub struct TriangulationEngine {
    config: MeshConfig,
}

impl TriangulationEngine {
    /// Create an engine for `config`
    ///
    /// # Errors
    ///
    /// Returns `DegenerateConfiguration` if the configuration is invalid.
    pub fn new(config: MeshConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    /// Run the whole pipeline
    ///
    /// The first failing sector aborts the request; results from the other
    /// sectors are discarded.
    pub fn generate(&self) -> Result<Triangulation> {
        let started = Instant::now();
        let sector_count = self.config.sector_count;
        tracing::info!(
            points = self.config.point_count(),
            sectors = sector_count,
            jitter = self.config.jitter,
            "generating sphere triangulation"
        );

        let sampled = sample_with_config(&self.config)?;
        let results = triangulate_sectors(&sampled.positions, &sampled.sectors, self.config.seed)?;

        let triangulation = merge(sampled.positions, sampled.sectors, results);
        tracing::info!(
            vertices = triangulation.vertex_count(),
            triangles = triangulation.triangle_count(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "sphere triangulation complete"
        );

        Ok(triangulation)
    }
}

/// Triangulate every sector on a pool with one thread per sector
///
/// Results come back in sector order. The first error wins and every other
/// sector's output is dropped.
fn triangulate_sectors(
    positions: &[DVec3],
    layouts: &[SectorLayout],
    seed: u64,
) -> Result<Vec<SectorTriangulation>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(layouts.len())
        .thread_name(|i| format!("sector-{i}"))
        .build()
        .map_err(|err| MeshError::WorkerPool(err.to_string()))?;

    pool.install(|| {
        layouts
            .par_iter()
            .map(|layout| triangulate_sector(positions, layout, seed))
            .collect::<Result<Vec<_>>>()
    })
}

fn triangulate_sector(
    positions: &[DVec3],
    layout: &SectorLayout,
    seed: u64,
) -> Result<SectorTriangulation> {
    SectorTriangulator::new(layout.sector, positions, layout.scaffold)?.run(layout.insertion_order(seed))
}

/// Concatenate sector results in sector order
fn merge(
    positions: Vec<DVec3>,
    layouts: Vec<SectorLayout>,
    results: Vec<SectorTriangulation>,
) -> Triangulation {
    let total = results.iter().map(|r| r.indices.len()).sum();
    let mut indices = Vec::with_capacity(total);
    let mut sectors = Vec::with_capacity(layouts.len());

    for (layout, result) in layouts.into_iter().zip(results) {
        debug_assert_eq!(layout.sector, result.sector);
        indices.extend_from_slice(&result.indices);
        sectors.push(SectorSummary {
            layout,
            stats: result.stats,
        });
    }

    Triangulation {
        positions,
        indices,
        sectors,
    }
}

/// Triangulate `point_count` Fibonacci points over `sector_count` sectors
///
/// # Example
///
/// ```rust
/// let triangulation = rust_delaunay_sphere::generate(12, 4).unwrap();
/// assert_eq!(triangulation.positions().len(), 12 + 4 * 4);
/// ```
pub fn generate(point_count: usize, sector_count: usize) -> Result<Triangulation> {
    let config = MeshConfig {
        detail: MeshDetail::Custom { point_count },
        sector_count,
        ..MeshConfig::default()
    };
    TriangulationEngine::new(config)?.generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::sample_sphere;
    use crate::geometry::is_counter_clockwise;

    #[test]
    fn test_minimal_request() {
        let triangulation = generate(12, 4).unwrap();
        assert_eq!(triangulation.vertex_count(), 28);
        assert_eq!(triangulation.sectors().len(), 4);
        assert_eq!(triangulation.indices().len(), 3 * triangulation.triangle_count());

        let from_stats: usize = triangulation.sectors().iter().map(|s| s.stats.triangles).sum();
        assert_eq!(from_stats, triangulation.triangle_count());

        for summary in triangulation.sectors() {
            // Two scaffold roots plus two leaves per inserted point
            assert_eq!(summary.stats.leaves, 2 + 2 * summary.stats.inserted);
            assert_eq!(summary.stats.inserted, summary.layout.point_count());
        }
    }

    #[test]
    fn test_indices_are_valid_and_skip_scaffold() {
        let triangulation = generate(2_000, 5).unwrap();
        let count = triangulation.vertex_count() as u32;
        for index in triangulation.indices() {
            assert!(*index < count);
            assert!(!triangulation.is_scaffold(*index));
        }
    }

    #[test]
    fn test_triangles_wind_counter_clockwise() {
        let triangulation = generate(1_000, 4).unwrap();
        let positions = triangulation.positions();
        for [a, b, c] in triangulation.triangles() {
            assert!(is_counter_clockwise(
                positions[a as usize],
                positions[b as usize],
                positions[c as usize]
            ));
        }
    }

    #[test]
    fn test_result_independent_of_sector_order() {
        let parallel = generate(800, 6).unwrap();

        let sampled = sample_sphere(800, 6, 0.0, 0).unwrap();
        let mut results: Vec<SectorTriangulation> = sampled
            .sectors
            .iter()
            .rev()
            .map(|layout| triangulate_sector(&sampled.positions, layout, 0).unwrap())
            .collect();
        results.reverse();
        let sequential = merge(sampled.positions, sampled.sectors, results);

        assert_eq!(parallel.positions(), sequential.positions());
        assert_eq!(parallel.indices(), sequential.indices());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = MeshConfig {
            detail: MeshDetail::Custom { point_count: 600 },
            sector_count: 3,
            jitter: 0.4,
            seed: 5,
            ..MeshConfig::default()
        };
        let engine = TriangulationEngine::new(config).unwrap();
        let first = engine.generate().unwrap();
        let second = engine.generate().unwrap();
        assert_eq!(first.positions(), second.positions());
        assert_eq!(first.indices(), second.indices());
    }

    #[test]
    fn test_invalid_requests_fail_before_work() {
        assert!(matches!(generate(100, 2), Err(MeshError::DegenerateConfiguration(_))));
        assert!(matches!(generate(2, 4), Err(MeshError::DegenerateConfiguration(_))));

        let config = MeshConfig {
            radius: -1.0,
            ..MeshConfig::default()
        };
        assert!(TriangulationEngine::new(config).is_err());
    }

    #[test]
    fn test_into_buffers() {
        let triangulation = generate(50, 3).unwrap();
        let triangles = triangulation.triangle_count();
        let (positions, indices) = triangulation.into_buffers();
        assert_eq!(positions.len(), 50 + 12);
        assert_eq!(indices.len(), triangles * 3);
    }

    #[test]
    fn test_failing_sector_aborts_request() {
        let sampled = sample_sphere(400, 4, 0.0, 0).unwrap();
        let mut layouts = sampled.sectors.clone();
        // Sector 2 is handed the points of the opposite wedge
        layouts[2].points = sampled.sectors[0].points.clone();

        let result = triangulate_sectors(&sampled.positions, &layouts, 0);
        match result {
            Err(MeshError::PointLocationFailure { vertex: Some(v), .. }) => {
                assert!(sampled.sectors[0].points.contains(&v));
            }
            other => panic!("expected a location failure, got {other:?}"),
        }

        // The untouched layout still succeeds
        assert_eq!(
            triangulate_sectors(&sampled.positions, &sampled.sectors, 0).unwrap().len(),
            4
        );
    }

    #[test]
    fn test_history_depth_stays_shallow() {
        let triangulation = generate(10_000, 4).unwrap();
        for summary in triangulation.sectors() {
            assert!(
                summary.stats.max_depth < 200,
                "sector {} history depth {}",
                summary.layout.sector.index(),
                summary.stats.max_depth
            );
        }
    }

    #[test]
    fn test_seed_changes_order_not_validity() {
        let config = |seed| MeshConfig {
            detail: MeshDetail::Custom { point_count: 500 },
            seed,
            ..MeshConfig::default()
        };
        let a = TriangulationEngine::new(config(1)).unwrap().generate().unwrap();
        let b = TriangulationEngine::new(config(2)).unwrap().generate().unwrap();

        assert_eq!(a.positions(), b.positions());
        assert!(crate::validation::validate(&a).is_valid());
        assert!(crate::validation::validate(&b).is_valid());
    }
}
