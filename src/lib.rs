//! Sector-parallel Delaunay triangulation of the sphere
//!
//! Samples a near-uniform Fibonacci point cloud on the unit sphere, splits it
//! into azimuthal sectors and triangulates every sector incrementally on its
//! own thread. The result is a flat position array and a flat CCW triangle
//! index array, ready to hand to any rendering engine.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_delaunay_sphere::*;
//!
//! let config = MeshConfigBuilder::new()
//!     .detail(MeshDetail::High)
//!     .sector_count(8).unwrap()
//!     .radius(6_371.0).unwrap()
//!     .build().unwrap();
//!
//! let triangulation = TriangulationEngine::new(config).unwrap().generate().unwrap();
//! println!("Generated {} triangles", triangulation.triangle_count());
//!
//! // Render buffers
//! let mesh = MeshData::from_triangulation(&triangulation, config.radius);
//! assert_eq!(mesh.triangle_count(), triangulation.triangle_count());
//! ```
//!
//! # Features
//!
//! - `serde`: Enables serialization support for configuration and mesh data

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod sector;
pub mod triangulation;
pub mod generation;
pub mod engine;
pub mod mesh;
pub mod validation;

// Re-export core types for convenience
pub use error::{MeshError, Result};
pub use config::{MeshConfig, MeshConfigBuilder, MeshDetail};
pub use engine::{generate, SectorSummary, Triangulation, TriangulationEngine};
pub use mesh::{generate_mesh, MeshData};
pub use validation::{validate, validate_mesh, ValidationReport};

// Re-export glam::DVec3 for convenience
pub use glam::DVec3;
