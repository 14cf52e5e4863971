//! Triangle records
//!
//! A simplex stores three vertex indices and, for each vertex, the identifier
//! of the triangle across the edge opposite that vertex.

use glam::DVec3;
use std::fmt;

use crate::error::{MeshError, Result};
use crate::geometry::is_counter_clockwise;

/// Stable identifier of a simplex inside one sector's history arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimplexId(u32);

impl SimplexId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        Self(index as u32)
    }

    /// Position of the simplex in its arena
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SimplexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A triangle: three vertex indices and the neighbour opposite each of them
///
/// Vertices are always counter-clockwise seen from outside the sphere. The
/// constructor is the only place winding is corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simplex {
    vertices: [u32; 3],
    neighbors: [Option<SimplexId>; 3],
}

impl Simplex {
    /// Create a simplex, swapping the last two vertex/neighbour pairs if the
    /// given order is clockwise
    ///
    /// `neighbors[i]` is the triangle across the edge opposite `vertices[i]`.
    pub fn new(vertices: [u32; 3], neighbors: [Option<SimplexId>; 3], positions: &[DVec3]) -> Self {
        let [a, b, c] = vertices;
        let ccw = is_counter_clockwise(
            positions[a as usize],
            positions[b as usize],
            positions[c as usize],
        );

        if ccw {
            Self { vertices, neighbors }
        } else {
            Self {
                vertices: [a, c, b],
                neighbors: [neighbors[0], neighbors[2], neighbors[1]],
            }
        }
    }

    /// Vertex indices in counter-clockwise order
    #[inline]
    pub fn vertices(&self) -> [u32; 3] {
        self.vertices
    }

    /// Neighbour slots, aligned with [`Simplex::vertices`]
    #[inline]
    pub fn neighbors(&self) -> [Option<SimplexId>; 3] {
        self.neighbors
    }

    /// Whether `vertex` is one of the three corners
    #[inline]
    pub fn contains_vertex(&self, vertex: u32) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Whether both `a` and `b` are corners, i.e. `ab` is an edge
    #[inline]
    pub fn has_edge(&self, a: u32, b: u32) -> bool {
        a != b && self.contains_vertex(a) && self.contains_vertex(b)
    }

    /// Whether any corner is in `vertices`
    pub fn touches_any(&self, vertices: &[u32]) -> bool {
        self.vertices.iter().any(|v| vertices.contains(v))
    }

    fn slot(&self, vertex: u32) -> Result<usize> {
        self.vertices
            .iter()
            .position(|&v| v == vertex)
            .ok_or(MeshError::InvalidTopology {
                vertex,
                triangle: self.vertices,
            })
    }

    /// The vertex that is neither `a` nor `b`
    pub fn third_vertex(&self, a: u32, b: u32) -> Result<u32> {
        let ia = self.slot(a)?;
        let ib = self.slot(b)?;
        if ia == ib {
            return Err(MeshError::InvalidTopology {
                vertex: b,
                triangle: self.vertices,
            });
        }
        Ok(self.vertices[3 - ia - ib])
    }

    /// The triangle across the edge opposite `vertex`
    pub fn neighbor_across(&self, vertex: u32) -> Result<Option<SimplexId>> {
        Ok(self.neighbors[self.slot(vertex)?])
    }

    /// Set the triangle across the edge opposite `vertex`
    pub fn set_neighbor_across(&mut self, vertex: u32, neighbor: Option<SimplexId>) -> Result<()> {
        let slot = self.slot(vertex)?;
        self.neighbors[slot] = neighbor;
        Ok(())
    }

    /// The other two vertices, in the counter-clockwise order of the edge
    /// opposite `excluding`
    pub fn other_two_vertices(&self, excluding: u32) -> Result<(u32, u32)> {
        let slot = self.slot(excluding)?;
        Ok((self.vertices[(slot + 1) % 3], self.vertices[(slot + 2) % 3]))
    }

    /// Redirect the neighbour slot currently pointing at `old` to `new`
    ///
    /// Returns `false` if no slot referenced `old`.
    pub fn replace_neighbor(&mut self, old: SimplexId, new: SimplexId) -> bool {
        match self.neighbors.iter_mut().find(|n| **n == Some(old)) {
            Some(slot) => {
                *slot = Some(new);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions() -> Vec<DVec3> {
        vec![DVec3::X, DVec3::Y, DVec3::Z, DVec3::NEG_X]
    }

    #[test]
    fn test_ccw_order_is_kept() {
        let p = positions();
        let s = Simplex::new([0, 1, 2], [Some(SimplexId::new(5)), None, None], &p);
        assert_eq!(s.vertices(), [0, 1, 2]);
        assert_eq!(s.neighbors()[0], Some(SimplexId::new(5)));
    }

    #[test]
    fn test_clockwise_order_is_corrected_with_neighbours() {
        let p = positions();
        let n0 = Some(SimplexId::new(10));
        let n1 = Some(SimplexId::new(11));
        let n2 = Some(SimplexId::new(12));
        let s = Simplex::new([0, 2, 1], [n0, n1, n2], &p);

        assert_eq!(s.vertices(), [0, 1, 2]);
        // Each neighbour still sits opposite the same vertex
        assert_eq!(s.neighbor_across(0).unwrap(), n0);
        assert_eq!(s.neighbor_across(2).unwrap(), n1);
        assert_eq!(s.neighbor_across(1).unwrap(), n2);
    }

    #[test]
    fn test_third_vertex() {
        let s = Simplex::new([0, 1, 2], [None; 3], &positions());
        assert_eq!(s.third_vertex(0, 1).unwrap(), 2);
        assert_eq!(s.third_vertex(2, 0).unwrap(), 1);
        assert_eq!(s.third_vertex(1, 2).unwrap(), 0);
        assert!(s.third_vertex(1, 1).is_err());
    }

    #[test]
    fn test_other_two_vertices_follow_winding() {
        let s = Simplex::new([0, 1, 2], [None; 3], &positions());
        assert_eq!(s.other_two_vertices(0).unwrap(), (1, 2));
        assert_eq!(s.other_two_vertices(1).unwrap(), (2, 0));
        assert_eq!(s.other_two_vertices(2).unwrap(), (0, 1));
    }

    #[test]
    fn test_foreign_vertex_is_invalid_topology() {
        let mut s = Simplex::new([0, 1, 2], [None; 3], &positions());
        let err = s.neighbor_across(3).unwrap_err();
        assert_eq!(
            err,
            MeshError::InvalidTopology {
                vertex: 3,
                triangle: [0, 1, 2]
            }
        );
        assert!(s.set_neighbor_across(3, None).is_err());
        assert!(s.other_two_vertices(3).is_err());
        assert!(s.third_vertex(0, 3).is_err());
    }

    #[test]
    fn test_set_and_replace_neighbor() {
        let mut s = Simplex::new([0, 1, 2], [None; 3], &positions());
        let old = SimplexId::new(1);
        let new = SimplexId::new(2);

        s.set_neighbor_across(1, Some(old)).unwrap();
        assert!(s.replace_neighbor(old, new));
        assert_eq!(s.neighbor_across(1).unwrap(), Some(new));
        assert!(!s.replace_neighbor(old, new));
    }

    #[test]
    fn test_edges_and_membership() {
        let s = Simplex::new([0, 1, 2], [None; 3], &positions());
        assert!(s.has_edge(0, 2));
        assert!(!s.has_edge(0, 3));
        assert!(!s.has_edge(1, 1));
        assert!(s.touches_any(&[7, 2]));
        assert!(!s.touches_any(&[3, 4]));
    }
}
