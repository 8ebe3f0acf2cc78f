//! Error types for cornice.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no (non-degenerate) triangles.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face does not have exactly three vertices.
    #[error("face {face} has {count} vertices (should be three)")]
    NonTriangularFace {
        /// The face index.
        face: usize,
        /// Number of vertices the face declares.
        count: usize,
    },

    /// An edge could not be placed in a triangle's edge slots.
    #[error("inconsistent winding: edge ({v0}, {v1}) does not fit triangle {triangle}")]
    InconsistentWinding {
        /// The triangle index.
        triangle: usize,
        /// First endpoint of the edge.
        v0: usize,
        /// Second endpoint of the edge.
        v1: usize,
    },

    /// A triangle listed in a vertex fan does not reference that vertex.
    #[error("vertex {vertex} not found in triangle {triangle}")]
    VertexNotInTriangle {
        /// The vertex index.
        vertex: usize,
        /// The triangle index.
        triangle: usize,
    },

    /// A worst-case output buffer could not be reserved.
    #[error("failed to allocate {requested} {what}")]
    AllocationFailed {
        /// What was being allocated.
        what: &'static str,
        /// Number of elements requested.
        requested: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create an allocation failure error.
    pub(crate) fn alloc(what: &'static str, requested: usize) -> Self {
        MeshError::AllocationFailed { what, requested }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = MeshError::NonTriangularFace { face: 2, count: 4 };
        assert_eq!(err.to_string(), "face 2 has 4 vertices (should be three)");

        let err = MeshError::invalid_param("small", -1.0, "must be positive");
        assert_eq!(err.to_string(), "invalid parameter: small = -1 (must be positive)");
    }
}
