//! Shared types for the still-life workspace.
//!
//! # Invariants
//! - The model matrix is always composed as `T · Rz · Ry · Rx · S`.
//! - Rotation angles cross crate boundaries in degrees, never radians.

mod types;

pub use types::{ShapeKind, TransformParams};

pub fn crate_info() -> &'static str {
    "stilllife-common v0.1.0"
}
