//! Error types for sphere triangulation

/// Errors that can occur while generating a sphere mesh
///
/// None of these are recoverable at generation time: a geometric predicate
/// contradiction means either bad input or a precision defect, so the whole
/// request is aborted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// A triangle was asked about a vertex it does not own
    #[error("invalid topology: vertex {vertex} is not part of triangle {triangle:?}")]
    InvalidTopology {
        /// The vertex index that was queried
        vertex: u32,
        /// The three vertex indices of the queried triangle
        triangle: [u32; 3],
    },

    /// No containing triangle could be found for a point
    #[error("point location failed for {point:?} (vertex {vertex:?})")]
    PointLocationFailure {
        /// Vertex index of the point, when the point is a sampled vertex
        vertex: Option<u32>,
        /// Position of the point
        point: [f64; 3],
    },

    /// The request cannot produce a valid scaffold
    #[error("degenerate configuration: {0}")]
    DegenerateConfiguration(String),

    /// The per-sector worker pool could not be started
    #[error("worker pool: {0}")]
    WorkerPool(String),
}

/// Result type alias for triangulation operations
pub type Result<T> = std::result::Result<T, MeshError>;
