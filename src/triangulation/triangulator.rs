//! Per-sector incremental Delaunay triangulation
//!
//! A sector triangulator owns one wedge's point indices and its triangle
//! history. Points are inserted one at a time; after each insertion the edges
//! opposite the new vertex are legalized by flipping any edge whose far
//! triangle's circumcircle contains the new vertex.
//!
//! # Lifecycle
//!
//! `Seeded` → `Inserting` → `Finalizing` → `Done`. The history is dropped
//! together with the triangulator once the sector's triangles are collected.

use glam::DVec3;
use std::time::Instant;

use super::history::TriangleHistory;
use super::simplex::SimplexId;
use crate::error::{MeshError, Result};
use crate::geometry::in_circumcircle;
use crate::sector::{Sector, SCAFFOLD_END, SCAFFOLD_NORTH, SCAFFOLD_SOUTH, SCAFFOLD_START};

/// Where a sector triangulator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorState {
    /// Scaffold triangles built, nothing inserted yet
    Seeded,
    /// Processing the sector's points
    Inserting,
    /// Collecting leaves into an index list
    Finalizing,
    /// Triangles collected; no further insertions allowed
    Done,
}

/// Counters reported by a finished sector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectorStats {
    /// Points inserted (scaffold excluded)
    pub inserted: usize,
    /// Edge flips performed during legalization
    pub flips: usize,
    /// Leaves in the final triangulation, scaffold triangles included
    pub leaves: usize,
    /// Triangles emitted after dropping scaffold-touching leaves
    pub triangles: usize,
    /// Simplices created over the sector's lifetime
    pub history_size: usize,
    /// Deepest root-to-simplex chain in the history
    pub max_depth: u32,
}

/// Finished output of one sector
#[derive(Debug, Clone)]
pub struct SectorTriangulation {
    /// The sector that produced these triangles
    pub sector: Sector,
    /// Flat triangle list, three global vertex indices per triangle
    pub indices: Vec<u32>,
    /// Counters for logging and inspection
    pub stats: SectorStats,
}

/// Incremental Delaunay triangulator for one sector
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use rust_delaunay_sphere::sector::Sector;
/// use rust_delaunay_sphere::triangulation::SectorTriangulator;
///
/// let sector = Sector::new(0, 4);
/// let mut positions = sector.scaffold_positions().to_vec();
/// positions.push(DVec3::new(1.0, 1.0, 1.0).normalize());
///
/// let mut triangulator = SectorTriangulator::new(sector, &positions, [0, 1, 2, 3]).unwrap();
/// assert_eq!(triangulator.history().leaf_count(), 2);
///
/// triangulator.insert(4).unwrap();
/// assert_eq!(triangulator.history().leaf_count(), 4);
/// ```
#[derive(Debug)]
pub struct SectorTriangulator<'a> {
    sector: Sector,
    positions: &'a [DVec3],
    scaffold: [u32; 4],
    history: TriangleHistory,
    state: SectorState,
    stats: SectorStats,
}

impl<'a> SectorTriangulator<'a> {
    /// Build the scaffold for `sector`
    ///
    /// `scaffold` holds the indices of the start, end, north pole and south
    /// pole positions, which must already be written to `positions`.
    pub fn new(sector: Sector, positions: &'a [DVec3], scaffold: [u32; 4]) -> Result<Self> {
        let north = [
            scaffold[SCAFFOLD_START],
            scaffold[SCAFFOLD_END],
            scaffold[SCAFFOLD_NORTH],
        ];
        let south = [
            scaffold[SCAFFOLD_START],
            scaffold[SCAFFOLD_END],
            scaffold[SCAFFOLD_SOUTH],
        ];
        let history = TriangleHistory::new(north, south, positions)?;

        Ok(Self {
            sector,
            positions,
            scaffold,
            history,
            state: SectorState::Seeded,
            stats: SectorStats::default(),
        })
    }

    #[inline]
    pub fn sector(&self) -> Sector {
        self.sector
    }

    #[inline]
    pub fn state(&self) -> SectorState {
        self.state
    }

    #[inline]
    pub fn stats(&self) -> SectorStats {
        self.stats
    }

    /// The triangle history built so far
    #[inline]
    pub fn history(&self) -> &TriangleHistory {
        &self.history
    }

    /// Scaffold vertex indices: start, end, north pole, south pole
    #[inline]
    pub fn scaffold(&self) -> [u32; 4] {
        self.scaffold
    }

    /// Insert one point and restore the Delaunay property around it
    ///
    /// # Errors
    ///
    /// Returns `PointLocationFailure` if the point lies outside the sector's
    /// scaffold, and `InvalidTopology` if neighbour wiring is inconsistent.
    /// Inserting after [`SectorTriangulator::finalize`] is an
    /// `InvalidTopology` error as well.
    pub fn insert(&mut self, vertex: u32) -> Result<()> {
        match self.state {
            SectorState::Seeded => self.state = SectorState::Inserting,
            SectorState::Inserting => {}
            SectorState::Finalizing | SectorState::Done => {
                return Err(MeshError::InvalidTopology {
                    vertex,
                    triangle: [
                        self.scaffold[SCAFFOLD_START],
                        self.scaffold[SCAFFOLD_END],
                        self.scaffold[SCAFFOLD_NORTH],
                    ],
                });
            }
        }

        // An index with no position cannot be located anywhere
        let point = *self
            .positions
            .get(vertex as usize)
            .ok_or(MeshError::PointLocationFailure {
                vertex: Some(vertex),
                point: [f64::NAN; 3],
            })?;
        let leaf = self.history.locate(point, self.positions).map_err(|err| match err {
            MeshError::PointLocationFailure { point, .. } => MeshError::PointLocationFailure {
                vertex: Some(vertex),
                point,
            },
            other => other,
        })?;

        let children = self.history.insert_vertex(vertex, leaf, self.positions)?;
        self.legalize(vertex, children)?;
        self.stats.inserted += 1;

        Ok(())
    }

    /// Flip cascade for the edges opposite `vertex`
    ///
    /// Runs on an explicit worklist. Each flip adds one triangle around
    /// `vertex`, so the cascade is bounded by the vertex count.
    fn legalize(&mut self, vertex: u32, created: [SimplexId; 3]) -> Result<()> {
        let point = self.positions[vertex as usize];
        let mut pending: Vec<SimplexId> = created.iter().rev().copied().collect();
        let mut flips = 0usize;

        while let Some(tri) = pending.pop() {
            // Superseded by a flip reached through another edge
            if !self.history.is_leaf(tri) {
                continue;
            }

            let Some(opp) = self.history.simplex(tri).neighbor_across(vertex)? else {
                continue;
            };

            let [a, b, c] = self
                .history
                .simplex(opp)
                .vertices()
                .map(|v| self.positions[v as usize]);
            if !in_circumcircle(a, b, c, point) {
                continue;
            }

            let [first, second] = self.history.flip(tri, opp, vertex, self.positions)?;
            flips += 1;
            pending.push(second);
            pending.push(first);
        }

        if flips > 0 {
            tracing::trace!(sector = self.sector.index(), vertex, flips, "legalized");
        }
        self.stats.flips += flips;

        Ok(())
    }

    /// Collect every leaf not touching the scaffold into a flat index list
    ///
    /// Leaves reachable from both scaffold roots are emitted once.
    pub fn finalize(&mut self) -> Vec<u32> {
        self.state = SectorState::Finalizing;

        let leaves = self.history.leaves();
        let mut indices = Vec::with_capacity(leaves.len() * 3);
        for id in &leaves {
            let simplex = self.history.simplex(*id);
            if !simplex.touches_any(&self.scaffold) {
                indices.extend_from_slice(&simplex.vertices());
            }
        }

        self.stats.leaves = leaves.len();
        self.stats.triangles = indices.len() / 3;
        self.stats.history_size = self.history.len();
        self.stats.max_depth = self.history.max_depth();
        self.state = SectorState::Done;

        indices
    }

    /// Insert all `points` in order, then finalize
    ///
    /// Consumes the triangulator; its history is released on return.
    pub fn run<I>(mut self, points: I) -> Result<SectorTriangulation>
    where
        I: IntoIterator<Item = u32>,
    {
        let started = Instant::now();

        for vertex in points {
            if let Err(err) = self.insert(vertex) {
                tracing::error!(sector = self.sector.index(), vertex, %err, "sector triangulation failed");
                return Err(err);
            }
        }
        debug_assert!(self.history.verify_links().is_ok());

        let indices = self.finalize();
        tracing::debug!(
            sector = self.sector.index(),
            inserted = self.stats.inserted,
            flips = self.stats.flips,
            triangles = self.stats.triangles,
            max_depth = self.stats.max_depth,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "sector triangulated"
        );

        Ok(SectorTriangulation {
            sector: self.sector,
            indices,
            stats: self.stats,
        })
    }
}
