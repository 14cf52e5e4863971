//! Triangle history forest
//!
//! Every simplex a sector ever creates is kept in an append-only arena. The
//! history node at the same index records where it came from (one parent for
//! a vertex split, two for an edge flip) and what superseded it (three
//! children for a split, two for a flip). Leaves are the live triangulation.
//!
//! The forest has two roots, the northern and southern scaffold triangles of
//! the sector, which share the equator edge and become mutual neighbours.
//!
//! # Point location
//!
//! Children of a node exactly cover it, so locating a point is a walk from
//! the root that contains it down through whichever child contains it.

use glam::DVec3;

use super::simplex::{Simplex, SimplexId};
use crate::error::{MeshError, Result};
use crate::geometry::{triangle_contains, triangle_contains_within};

/// Slack on orientation tests when pruning the adjacency search
///
/// Only used to decide which subtrees may hold an edge; never for insertion.
const ADJACENCY_TOLERANCE: f64 = 1e-9;

/// What superseded a history node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Children {
    /// Still part of the active triangulation
    Leaf,
    /// Split into three by inserting a vertex inside it
    Split([SimplexId; 3]),
    /// Replaced, together with its flip partner, by two triangles
    Flipped([SimplexId; 2]),
}

impl Children {
    /// Child identifiers, empty for a leaf
    pub fn as_slice(&self) -> &[SimplexId] {
        match self {
            Children::Leaf => &[],
            Children::Split(ids) => ids,
            Children::Flipped(ids) => ids,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Children::Leaf)
    }
}

/// Ancestry record of one simplex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryNode {
    parents: [Option<SimplexId>; 2],
    children: Children,
    depth: u32,
}

impl HistoryNode {
    fn root() -> Self {
        Self {
            parents: [None, None],
            children: Children::Leaf,
            depth: 0,
        }
    }

    /// Parent simplices (two when created by a flip)
    pub fn parents(&self) -> impl Iterator<Item = SimplexId> + '_ {
        self.parents.iter().flatten().copied()
    }

    /// What superseded this node
    pub fn children(&self) -> Children {
        self.children
    }

    /// Distance from the scaffold roots (deepest parent + 1)
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// Append-only arena of simplices and their history, for one sector
#[derive(Debug, Clone)]
pub struct TriangleHistory {
    simplices: Vec<Simplex>,
    nodes: Vec<HistoryNode>,
    roots: [SimplexId; 2],
    leaves: usize,
}

impl TriangleHistory {
    /// Build the forest from the two scaffold triangles
    ///
    /// The triangles must share exactly one edge; they are wired as each
    /// other's neighbour across it.
    pub fn new(north: [u32; 3], south: [u32; 3], positions: &[DVec3]) -> Result<Self> {
        let top = Simplex::new(north, [None; 3], positions);
        let bottom = Simplex::new(south, [None; 3], positions);

        let shared: Vec<u32> = north.iter().copied().filter(|v| south.contains(v)).collect();
        let [a, b] = shared[..] else {
            return Err(MeshError::InvalidTopology {
                vertex: south[0],
                triangle: north,
            });
        };

        let mut history = Self {
            simplices: vec![top, bottom],
            nodes: vec![HistoryNode::root(), HistoryNode::root()],
            roots: [SimplexId::new(0), SimplexId::new(1)],
            leaves: 2,
        };

        let [top_id, bottom_id] = history.roots;
        let top_apex = top.third_vertex(a, b)?;
        let bottom_apex = bottom.third_vertex(a, b)?;
        history.simplices[top_id.index()].set_neighbor_across(top_apex, Some(bottom_id))?;
        history.simplices[bottom_id.index()].set_neighbor_across(bottom_apex, Some(top_id))?;

        Ok(history)
    }

    /// The northern and southern scaffold roots
    #[inline]
    pub fn roots(&self) -> [SimplexId; 2] {
        self.roots
    }

    /// Number of simplices ever created
    #[inline]
    pub fn len(&self) -> usize {
        self.simplices.len()
    }

    /// Always false: a history starts with its two roots
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    /// Number of simplices in the active triangulation
    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// Longest parent chain from a root to any simplex
    ///
    /// Bounds the work of a single [`TriangleHistory::locate`].
    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(HistoryNode::depth).max().unwrap_or(0)
    }

    #[inline]
    pub fn simplex(&self, id: SimplexId) -> &Simplex {
        &self.simplices[id.index()]
    }

    #[inline]
    pub fn node(&self, id: SimplexId) -> &HistoryNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn is_leaf(&self, id: SimplexId) -> bool {
        self.nodes[id.index()].children.is_leaf()
    }

    fn corners(&self, id: SimplexId, positions: &[DVec3]) -> [DVec3; 3] {
        self.simplices[id.index()]
            .vertices()
            .map(|v| positions[v as usize])
    }

    /// Whether the triangle `id` contains `point` (border inclusive)
    pub fn contains(&self, id: SimplexId, point: DVec3, positions: &[DVec3]) -> bool {
        let [a, b, c] = self.corners(id, positions);
        triangle_contains(a, b, c, point)
    }

    /// Find the leaf triangle containing `point`
    ///
    /// # Errors
    ///
    /// Returns `PointLocationFailure` if neither root contains the point, or
    /// if a node contains it but none of its children do.
    pub fn locate(&self, point: DVec3, positions: &[DVec3]) -> Result<SimplexId> {
        let failure = || MeshError::PointLocationFailure {
            vertex: None,
            point: point.to_array(),
        };

        let mut current = self
            .roots
            .iter()
            .copied()
            .find(|&root| self.contains(root, point, positions))
            .ok_or_else(failure)?;

        loop {
            let children = self.nodes[current.index()].children;
            if children.is_leaf() {
                return Ok(current);
            }
            current = children
                .as_slice()
                .iter()
                .copied()
                .find(|&child| self.contains(child, point, positions))
                .ok_or_else(failure)?;
        }
    }

    /// Find the leaf that has edge `ab`, other than `excluding` and its descendants
    ///
    /// Both roots are searched, since leaves of the northern and southern
    /// trees border each other. Subtrees whose triangle does not contain the
    /// edge midpoint are skipped. When several leaves qualify the deepest one
    /// wins.
    pub fn find_across_edge(
        &self,
        a: u32,
        b: u32,
        excluding: Option<SimplexId>,
        positions: &[DVec3],
    ) -> Option<SimplexId> {
        let excluded = self.descendants(excluding);
        // Every leaf holding the edge contains its midpoint, and so does at
        // least one parent of any node that contains it.
        let midpoint = (positions[a as usize] + positions[b as usize]).normalize_or_zero();

        let mut visited = vec![false; self.nodes.len()];
        let mut stack: Vec<SimplexId> = self.roots.iter().rev().copied().collect();
        let mut best: Option<SimplexId> = None;

        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut visited[id.index()], true) || excluded[id.index()] {
                continue;
            }

            let [x, y, z] = self.corners(id, positions);
            if !triangle_contains_within(x, y, z, midpoint, ADJACENCY_TOLERANCE) {
                continue;
            }

            let node = &self.nodes[id.index()];
            if node.children.is_leaf() {
                if self.simplices[id.index()].has_edge(a, b) {
                    let deeper = best.map_or(true, |current| {
                        (node.depth, id) > (self.nodes[current.index()].depth, current)
                    });
                    if deeper {
                        best = Some(id);
                    }
                }
            } else {
                stack.extend(node.children.as_slice().iter().rev());
            }
        }

        best
    }

    fn descendants(&self, root: Option<SimplexId>) -> Vec<bool> {
        let mut marked = vec![false; self.nodes.len()];
        let mut stack: Vec<SimplexId> = root.into_iter().collect();
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut marked[id.index()], true) {
                continue;
            }
            stack.extend(self.nodes[id.index()].children.as_slice());
        }
        marked
    }

    fn push(&mut self, simplex: Simplex, parents: [Option<SimplexId>; 2]) -> SimplexId {
        let depth = parents
            .iter()
            .flatten()
            .map(|p| self.nodes[p.index()].depth)
            .max()
            .map_or(0, |d| d + 1);

        let id = SimplexId::new(self.simplices.len());
        self.simplices.push(simplex);
        self.nodes.push(HistoryNode {
            parents,
            children: Children::Leaf,
            depth,
        });
        id
    }

    /// Point the back-reference of `neighbor` from `old` to `new`
    fn relink(&mut self, neighbor: Option<SimplexId>, old: SimplexId, new: SimplexId) -> Result<()> {
        let Some(neighbor) = neighbor else {
            return Ok(());
        };
        let old_vertex = self.simplices[old.index()].vertices()[0];
        let simplex = &mut self.simplices[neighbor.index()];
        if simplex.replace_neighbor(old, new) {
            Ok(())
        } else {
            Err(MeshError::InvalidTopology {
                vertex: old_vertex,
                triangle: simplex.vertices(),
            })
        }
    }

    /// Split `leaf` into three by connecting `vertex` to each of its edges
    ///
    /// `vertex` must lie inside `leaf`. Returns the children in edge order
    /// `(a, b)`, `(b, c)`, `(c, a)` of the leaf; in each, the edge opposite
    /// `vertex` is the leaf's original edge.
    pub fn insert_vertex(
        &mut self,
        vertex: u32,
        leaf: SimplexId,
        positions: &[DVec3],
    ) -> Result<[SimplexId; 3]> {
        debug_assert!(self.is_leaf(leaf), "insert into superseded simplex {leaf}");

        let parent = self.simplices[leaf.index()];
        let [a, b, c] = parent.vertices();
        let [na, nb, nc] = parent.neighbors();

        let base = self.simplices.len();
        let s0 = SimplexId::new(base);
        let s1 = SimplexId::new(base + 1);
        let s2 = SimplexId::new(base + 2);

        // Each child: (edge, far neighbour across it, neighbours across the two spokes)
        let layout = [
            ([a, b, vertex], nc, [(a, s1), (b, s2)]),
            ([b, c, vertex], na, [(b, s2), (c, s0)]),
            ([c, a, vertex], nb, [(c, s0), (a, s1)]),
        ];

        for (corners, far, spokes) in layout {
            let mut child = Simplex::new(corners, [None; 3], positions);
            child.set_neighbor_across(vertex, far)?;
            for (opposite, neighbor) in spokes {
                child.set_neighbor_across(opposite, Some(neighbor))?;
            }
            self.push(child, [Some(leaf), None]);
        }

        self.relink(nc, leaf, s0)?;
        self.relink(na, leaf, s1)?;
        self.relink(nb, leaf, s2)?;

        self.nodes[leaf.index()].children = Children::Split([s0, s1, s2]);
        self.leaves += 2;

        Ok([s0, s1, s2])
    }

    /// Flip the edge shared by `tri` and `opp`
    ///
    /// `vertex` is the corner of `tri` opposite the shared edge. The two new
    /// triangles both use `vertex` and the apex of `opp`; in each, the edge
    /// opposite `vertex` is one of `opp`'s outer edges, which is what the
    /// legalization cascade checks next.
    pub fn flip(
        &mut self,
        tri: SimplexId,
        opp: SimplexId,
        vertex: u32,
        positions: &[DVec3],
    ) -> Result<[SimplexId; 2]> {
        debug_assert!(self.is_leaf(tri) && self.is_leaf(opp));

        let near = self.simplices[tri.index()];
        let far = self.simplices[opp.index()];

        // tri = (vertex, a, b) counter-clockwise, opp = (apex, b, a)
        let (a, b) = near.other_two_vertices(vertex)?;
        let apex = far.third_vertex(a, b)?;

        let n_va = near.neighbor_across(b)?;
        let n_bv = near.neighbor_across(a)?;
        let n_at = far.neighbor_across(b)?;
        let n_tb = far.neighbor_across(a)?;

        let base = self.simplices.len();
        let new0 = SimplexId::new(base);
        let new1 = SimplexId::new(base + 1);

        let mut first = Simplex::new([vertex, a, apex], [None; 3], positions);
        first.set_neighbor_across(vertex, n_at)?;
        first.set_neighbor_across(a, Some(new1))?;
        first.set_neighbor_across(apex, n_va)?;

        let mut second = Simplex::new([vertex, apex, b], [None; 3], positions);
        second.set_neighbor_across(vertex, n_tb)?;
        second.set_neighbor_across(b, Some(new0))?;
        second.set_neighbor_across(apex, n_bv)?;

        self.push(first, [Some(tri), Some(opp)]);
        self.push(second, [Some(tri), Some(opp)]);

        self.relink(n_at, opp, new0)?;
        self.relink(n_va, tri, new0)?;
        self.relink(n_tb, opp, new1)?;
        self.relink(n_bv, tri, new1)?;

        self.nodes[tri.index()].children = Children::Flipped([new0, new1]);
        self.nodes[opp.index()].children = Children::Flipped([new0, new1]);

        Ok([new0, new1])
    }

    /// All leaves reachable from the roots, each exactly once, in depth-first order
    pub fn leaves(&self) -> Vec<SimplexId> {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack: Vec<SimplexId> = self.roots.iter().rev().copied().collect();
        let mut leaves = Vec::with_capacity(self.leaves);

        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut visited[id.index()], true) {
                continue;
            }
            let children = self.nodes[id.index()].children;
            if children.is_leaf() {
                leaves.push(id);
            } else {
                stack.extend(children.as_slice().iter().rev());
            }
        }

        leaves
    }

    /// Check that every leaf's neighbours are leaves that point back across
    /// the same edge
    pub fn verify_links(&self) -> Result<()> {
        for id in self.leaves() {
            let simplex = &self.simplices[id.index()];
            for vertex in simplex.vertices() {
                let Some(neighbor) = simplex.neighbor_across(vertex)? else {
                    continue;
                };
                let broken = MeshError::InvalidTopology {
                    vertex,
                    triangle: simplex.vertices(),
                };

                if !self.is_leaf(neighbor) {
                    return Err(broken);
                }
                let (a, b) = simplex.other_two_vertices(vertex)?;
                let other = &self.simplices[neighbor.index()];
                if !other.has_edge(a, b) {
                    return Err(broken);
                }
                if other.neighbor_across(other.third_vertex(a, b)?)? != Some(id) {
                    return Err(broken);
                }
            }
        }
        Ok(())
    }
}
