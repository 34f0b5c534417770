//! # Mesh Errors
//!
//! Error types for mesh generation operations.

use thiserror::Error;

/// Errors that can occur during mesh generation.
///
/// These surface geometry-layer problems (spec §7's "Geometry warning" and
/// "I/O warning" classes) - callers degrade the affected node to an empty
/// mesh and keep going rather than aborting the whole build.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Evaluation error from the eval layer
    #[error("Evaluation error: {0}")]
    EvalError(#[from] openscad_eval::EvalError),

    /// Invalid mesh topology
    #[error("Invalid topology: {message}")]
    InvalidTopology { message: String },

    /// Degenerate geometry
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    /// Boolean operation failed
    #[error("Boolean operation failed: {message}")]
    BooleanFailed { message: String },

    /// Unsupported operation
    #[error("Unsupported: {message}")]
    Unsupported { message: String },

    /// Mesh validation failed
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// Too many vertices
    #[error("Too many vertices: {count} (max: {max})")]
    TooManyVertices { count: usize, max: usize },

    /// Too many triangles
    #[error("Too many triangles: {count} (max: {max})")]
    TooManyTriangles { count: usize, max: usize },

    /// Referenced file could not be read or parsed (`import()`/`surface()`).
    #[error("I/O error reading {path}: {message}")]
    IoError { path: String, message: String },
}

impl MeshError {
    /// Creates an invalid topology error.
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology { message: message.into() }
    }

    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry { message: message.into() }
    }

    /// Creates a boolean operation failed error.
    pub fn boolean_failed(message: impl Into<String>) -> Self {
        Self::BooleanFailed { message: message.into() }
    }

    /// Creates an unsupported operation error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported { message: message.into() }
    }

    /// Creates an I/O error for a referenced file.
    pub fn io_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::IoError { path: path.into(), message: message.into() }
    }
}
