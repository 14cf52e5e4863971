//! Topological and geometric validation of sphere triangulations
//!
//! Checks the properties every generated mesh must satisfy: index bounds,
//! counter-clockwise winding, edge manifoldness and the local Delaunay
//! condition across every shared edge. Useful for debugging, testing, and
//! catching numerical issues.
//!
//! Edges used by a single triangle are expected: each sector drops the
//! triangles touching its scaffold, which leaves open seams along the sector
//! boundaries. They are reported but do not make a mesh invalid.

use glam::DVec3;
use std::collections::HashMap;

use crate::engine::Triangulation;
use crate::geometry::{arc_length, circumcentre, circumradius, triple_product};

/// Slack on the empty-circumcircle check, in radians
const DELAUNAY_TOLERANCE: f64 = 1e-9;

/// Detailed validation report for a triangle mesh on the unit sphere
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of vertices in the position array
    pub num_vertices: usize,
    /// Number of complete triangles
    pub num_triangles: usize,
    /// Number of distinct undirected edges
    pub num_edges: usize,

    /// Trailing indices that do not form a whole triangle
    pub dangling_indices: usize,
    /// Indices pointing past the end of the position array
    pub out_of_bounds_indices: usize,
    /// Indices referencing reserved scaffold slots
    pub scaffold_references: usize,

    /// Triangles with a repeated vertex index
    pub degenerate_triangles: usize,
    /// Triangles wound clockwise seen from outside the sphere
    pub clockwise_triangles: usize,

    /// Edges used by exactly one triangle (sector seams)
    pub boundary_edges: usize,
    /// Edges used by more than two triangles
    pub non_manifold_edges: usize,
    /// Directed edges used twice, i.e. neighbours with opposite winding
    pub orientation_conflicts: usize,
    /// Shared edges whose opposite vertex lies inside the circumcircle
    pub delaunay_violations: usize,
}

impl ValidationReport {
    /// Check every property; open seams are tolerated
    pub fn is_valid(&self) -> bool {
        self.dangling_indices == 0
            && self.out_of_bounds_indices == 0
            && self.scaffold_references == 0
            && self.degenerate_triangles == 0
            && self.clockwise_triangles == 0
            && self.non_manifold_edges == 0
            && self.orientation_conflicts == 0
            && self.delaunay_violations == 0
    }

    /// Valid and closed: no seam edges either
    pub fn is_closed(&self) -> bool {
        self.is_valid() && self.boundary_edges == 0
    }

    /// Format a summary of any issues found
    pub fn summary(&self) -> String {
        let mut issues = Vec::new();

        if self.dangling_indices > 0 {
            issues.push(format!("{} dangling indices", self.dangling_indices));
        }
        if self.out_of_bounds_indices > 0 {
            issues.push(format!("{} out-of-bounds indices", self.out_of_bounds_indices));
        }
        if self.scaffold_references > 0 {
            issues.push(format!("{} scaffold references", self.scaffold_references));
        }
        if self.degenerate_triangles > 0 {
            issues.push(format!("{} degenerate triangles", self.degenerate_triangles));
        }
        if self.clockwise_triangles > 0 {
            issues.push(format!("{} clockwise triangles", self.clockwise_triangles));
        }
        if self.non_manifold_edges > 0 {
            issues.push(format!("{} non-manifold edges", self.non_manifold_edges));
        }
        if self.orientation_conflicts > 0 {
            issues.push(format!("{} orientation conflicts", self.orientation_conflicts));
        }
        if self.delaunay_violations > 0 {
            issues.push(format!("{} Delaunay violations", self.delaunay_violations));
        }

        if !issues.is_empty() {
            issues.join(", ")
        } else if self.boundary_edges > 0 {
            format!("Valid ({} seam edges)", self.boundary_edges)
        } else {
            "Closed".to_string()
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ValidationReport {{ V={}, E={}, F={}, {} }}",
            self.num_vertices,
            self.num_edges,
            self.num_triangles,
            self.summary()
        )
    }
}

/// Validate a finished triangulation, including scaffold exclusion
pub fn validate(triangulation: &Triangulation) -> ValidationReport {
    let mut report = validate_mesh(triangulation.positions(), triangulation.indices());
    report.scaffold_references = triangulation
        .indices()
        .iter()
        .filter(|&&v| triangulation.is_scaffold(v))
        .count();
    report
}

/// Validate raw position and index buffers
pub fn validate_mesh(positions: &[DVec3], indices: &[u32]) -> ValidationReport {
    let mut report = ValidationReport {
        num_vertices: positions.len(),
        num_triangles: indices.len() / 3,
        dangling_indices: indices.len() % 3,
        out_of_bounds_indices: indices
            .iter()
            .filter(|&&v| v as usize >= positions.len())
            .count(),
        ..ValidationReport::default()
    };

    // Directed edge -> opposite vertex of every triangle using it
    let mut directed: HashMap<(u32, u32), Vec<u32>> = HashMap::new();

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]];
        if a == b || b == c || c == a {
            report.degenerate_triangles += 1;
            continue;
        }
        if tri.iter().any(|&v| v as usize >= positions.len()) {
            continue;
        }

        let [pa, pb, pc] = [a, b, c].map(|v| positions[v as usize]);
        if triple_product(pa, pb, pc) < 0.0 {
            report.clockwise_triangles += 1;
        }

        for (from, to, opposite) in [(a, b, c), (b, c, a), (c, a, b)] {
            directed.entry((from, to)).or_default().push(opposite);
        }
    }

    let mut undirected: HashMap<(u32, u32), usize> = HashMap::new();
    for (&(from, to), opposites) in &directed {
        if opposites.len() > 1 {
            report.orientation_conflicts += 1;
        }
        *undirected.entry((from.min(to), from.max(to))).or_default() += opposites.len();
    }

    report.num_edges = undirected.len();
    for (&(low, high), &uses) in &undirected {
        match uses {
            1 => report.boundary_edges += 1,
            2 => {
                // Only a properly oriented pair is checked for the empty circle
                let (Some([near]), Some([far])) = (
                    directed.get(&(low, high)).map(Vec::as_slice),
                    directed.get(&(high, low)).map(Vec::as_slice),
                ) else {
                    continue;
                };
                if violates_delaunay(positions, [low, high, *near], *far)
                    || violates_delaunay(positions, [high, low, *far], *near)
                {
                    report.delaunay_violations += 1;
                }
            }
            _ => report.non_manifold_edges += 1,
        }
    }

    report
}

fn violates_delaunay(positions: &[DVec3], triangle: [u32; 3], vertex: u32) -> bool {
    let [a, b, c] = triangle.map(|v| positions[v as usize]);
    let centre = circumcentre(a, b, c);
    let radius = circumradius(a, b, c);
    if centre == DVec3::ZERO || !radius.is_finite() {
        return false;
    }
    arc_length(positions[vertex as usize], centre) < radius - DELAUNAY_TOLERANCE
}
