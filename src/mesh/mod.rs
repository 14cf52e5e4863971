//! Render buffers for triangulated spheres
//!
//! Converts a [`Triangulation`] into engine-agnostic mesh data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::MeshConfig;
use crate::engine::{Triangulation, TriangulationEngine};
use crate::error::Result;

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
///
/// The vertex array is the triangulation's position array unchanged in
/// order, so reserved scaffold slots are present but never indexed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions, scaled to the sphere radius
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals (normalized direction from sphere center)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices, counter-clockwise seen from outside
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Build render buffers from a triangulation
    ///
    /// # Example
    ///
    /// ```rust
    /// use rust_delaunay_sphere::*;
    ///
    /// let triangulation = generate(200, 4).unwrap();
    /// let mesh = MeshData::from_triangulation(&triangulation, 10.0);
    ///
    /// assert_eq!(mesh.vertex_count(), triangulation.vertex_count());
    /// assert_eq!(mesh.triangle_count(), triangulation.triangle_count());
    /// ```
    pub fn from_triangulation(triangulation: &Triangulation, radius: f64) -> Self {
        let positions = triangulation.positions();
        let mut mesh = MeshData {
            positions: Vec::with_capacity(positions.len()),
            normals: Vec::with_capacity(positions.len()),
            indices: triangulation.indices().to_vec(),
        };

        for point in positions {
            let normal = point.normalize_or_zero();
            mesh.positions.push((*point * radius).as_vec3().to_array());
            mesh.normals.push(normal.as_vec3().to_array());
        }

        mesh
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl From<&Triangulation> for MeshData {
    fn from(triangulation: &Triangulation) -> Self {
        MeshData::from_triangulation(triangulation, 1.0)
    }
}

/// Triangulate the sphere described by `config` and build its render buffers
///
/// Positions are scaled by `config.radius`.
pub fn generate_mesh(config: &MeshConfig) -> Result<MeshData> {
    let triangulation = TriangulationEngine::new(*config)?.generate()?;
    Ok(MeshData::from_triangulation(&triangulation, config.radius))
}
