//! Incremental Delaunay triangulation on the sphere
//!
//! Each sector is triangulated independently: a [`SectorTriangulator`] inserts
//! the sector's points into a [`TriangleHistory`] seeded with two scaffold
//! triangles, legalizing with edge flips under the spherical empty-circumcircle
//! test, and finally emits every leaf that does not touch the scaffold.

mod history;
mod simplex;
mod triangulator;

pub use history::{Children, HistoryNode, TriangleHistory};
pub use simplex::{Simplex, SimplexId};
pub use triangulator::{SectorState, SectorStats, SectorTriangulation, SectorTriangulator};
