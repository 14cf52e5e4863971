//! Sphere Mesh Configuration and Builder
//!
//! This module provides configuration types for deterministic sphere mesh generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};

/// Smallest sector count for which the scaffold triangles are non-degenerate
pub const MIN_SECTORS: usize = 3;

/// Upper bound on sectors (one worker thread per sector)
pub const MAX_SECTORS: usize = 64;

/// Scaffold vertices reserved per sector: start, end, north pole, south pole
pub const SCAFFOLD_VERTICES: usize = 4;

/// Mesh detail presets
///
/// Each preset maps to a number of sampled points on the sphere.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshDetail {
    /// ~10,000 points, quick previews
    Low,
    /// ~50,000 points (default)
    Medium,
    /// ~100,000 points, full planet-scale mesh
    High,
    /// Custom point count
    Custom {
        /// Number of points to sample
        point_count: usize,
    },
}

impl MeshDetail {
    /// Get the number of sampled points for this preset
    pub fn point_count(self) -> usize {
        match self {
            MeshDetail::Low => 10_000,
            MeshDetail::Medium => 50_000,
            MeshDetail::High => 100_000,
            MeshDetail::Custom { point_count } => point_count,
        }
    }

    /// Get a human-readable name for this preset
    pub fn name(self) -> &'static str {
        match self {
            MeshDetail::Low => "Low",
            MeshDetail::Medium => "Medium",
            MeshDetail::High => "High",
            MeshDetail::Custom { .. } => "Custom",
        }
    }
}

impl Default for MeshDetail {
    fn default() -> Self {
        MeshDetail::Medium
    }
}

/// Configuration for deterministic sphere mesh generation
///
/// The same configuration always produces the identical mesh: sampling is a
/// closed-form lattice, while the optional jitter and the per-sector insertion
/// order are driven by a seeded RNG.
///
/// # Example
///
/// ```rust
/// use rust_delaunay_sphere::*;
///
/// let config = MeshConfigBuilder::new()
///     .detail(MeshDetail::Custom { point_count: 2_000 })
///     .sector_count(6)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.point_count(), 2_000);
/// assert_eq!(config.total_vertices(), 2_000 + 6 * 4);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshConfig {
    /// Detail preset (determines the sampled point count)
    pub detail: MeshDetail,

    /// Number of azimuthal sectors triangulated in parallel (>= 3)
    pub sector_count: usize,

    /// Sphere radius applied when producing render buffers
    ///
    /// Triangulation always runs on the unit sphere.
    pub radius: f64,

    /// Tangential jitter as a fraction of the average point spacing
    ///
    /// - 0.0: Pure Fibonacci lattice (default)
    /// - 0.3: Breaks up the spiral pattern while keeping spacing even
    pub jitter: f64,

    /// Seed for the jitter and insertion-order RNG
    ///
    /// Positions ignore it when jitter is 0; the triangle list does not.
    pub seed: u64,
}

impl MeshConfig {
    /// Get the number of sampled points
    #[inline]
    pub fn point_count(&self) -> usize {
        self.detail.point_count()
    }

    /// Get the size of the shared position array, scaffold slots included
    #[inline]
    pub fn total_vertices(&self) -> usize {
        self.point_count() + self.sector_count * SCAFFOLD_VERTICES
    }

    /// Check the configuration against the scaffold bootstrap requirements
    ///
    /// # Errors
    ///
    /// Returns `DegenerateConfiguration` if the sector count is outside
    /// `3..=64`, if there are fewer points than sectors, if the vertex count
    /// does not fit a `u32` index, or if radius/jitter are out of range.
    pub fn validate(&self) -> Result<()> {
        validate_counts(self.point_count(), self.sector_count)?;

        if !(self.radius > 0.0) || !self.radius.is_finite() {
            return Err(MeshError::DegenerateConfiguration(format!(
                "radius must be positive and finite (got {})",
                self.radius
            )));
        }

        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(MeshError::DegenerateConfiguration(format!(
                "jitter must be within [0, 1] (got {})",
                self.jitter
            )));
        }

        Ok(())
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            detail: MeshDetail::default(),
            sector_count: 4,
            radius: 1.0,
            jitter: 0.0,
            seed: 0,
        }
    }
}

/// Validate a raw `(point_count, sector_count)` request
pub(crate) fn validate_counts(point_count: usize, sector_count: usize) -> Result<()> {
    if !(MIN_SECTORS..=MAX_SECTORS).contains(&sector_count) {
        return Err(MeshError::DegenerateConfiguration(format!(
            "sector count must be within {}..={} (got {})",
            MIN_SECTORS, MAX_SECTORS, sector_count
        )));
    }

    if point_count < sector_count {
        return Err(MeshError::DegenerateConfiguration(format!(
            "need at least one point per sector: {} points for {} sectors",
            point_count, sector_count
        )));
    }

    let total = point_count as u64 + (sector_count * SCAFFOLD_VERTICES) as u64;
    if total > u32::MAX as u64 {
        return Err(MeshError::DegenerateConfiguration(format!(
            "{} vertices do not fit a 32-bit index buffer",
            total
        )));
    }

    Ok(())
}

/// Builder for creating MeshConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_delaunay_sphere::*;
///
/// let config = MeshConfigBuilder::new()
///     .detail(MeshDetail::Low)
///     .radius(6.0)
///     .unwrap()
///     .jitter(0.25)
///     .unwrap()
///     .seed(7)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.radius, 6.0);
/// ```
#[derive(Debug, Clone)]
pub struct MeshConfigBuilder {
    detail: MeshDetail,
    sector_count: usize,
    radius: f64,
    jitter: f64,
    seed: u64,
}

impl MeshConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - detail: Medium (~50,000 points)
    /// - sector_count: 4
    /// - radius: 1.0
    /// - jitter: 0.0 (pure Fibonacci lattice)
    /// - seed: 0
    pub fn new() -> Self {
        let defaults = MeshConfig::default();
        Self {
            detail: defaults.detail,
            sector_count: defaults.sector_count,
            radius: defaults.radius,
            jitter: defaults.jitter,
            seed: defaults.seed,
        }
    }

    /// Set the detail preset
    pub fn detail(mut self, detail: MeshDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Set the number of sectors
    ///
    /// # Errors
    ///
    /// Returns `DegenerateConfiguration` if the count is outside `3..=64`
    pub fn sector_count(mut self, sectors: usize) -> Result<Self> {
        if !(MIN_SECTORS..=MAX_SECTORS).contains(&sectors) {
            return Err(MeshError::DegenerateConfiguration(format!(
                "sector count must be within {}..={} (got {})",
                MIN_SECTORS, MAX_SECTORS, sectors
            )));
        }
        self.sector_count = sectors;
        Ok(self)
    }

    /// Set the output radius
    ///
    /// # Errors
    ///
    /// Returns `DegenerateConfiguration` if radius <= 0.0
    pub fn radius(mut self, radius: f64) -> Result<Self> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(MeshError::DegenerateConfiguration(format!(
                "radius must be positive and finite (got {})",
                radius
            )));
        }
        self.radius = radius;
        Ok(self)
    }

    /// Set the tangential jitter strength
    ///
    /// # Errors
    ///
    /// Returns `DegenerateConfiguration` if jitter is outside `[0, 1]`
    pub fn jitter(mut self, jitter: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&jitter) {
            return Err(MeshError::DegenerateConfiguration(format!(
                "jitter must be within [0, 1] (got {})",
                jitter
            )));
        }
        self.jitter = jitter;
        Ok(self)
    }

    /// Set the RNG seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `DegenerateConfiguration` if the point count is too small for
    /// the sector count (see [`MeshConfig::validate`]).
    pub fn build(self) -> Result<MeshConfig> {
        let config = MeshConfig {
            detail: self.detail,
            sector_count: self.sector_count,
            radius: self.radius,
            jitter: self.jitter,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for MeshConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
