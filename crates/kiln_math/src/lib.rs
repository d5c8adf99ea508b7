//! Kiln math - epsilon-aware value types for the ray tracer.
//!
//! Raw arithmetic is done with `glam`'s double precision `DVec3`; the types
//! here add the invariants the intersection code relies on: points and
//! vectors snap near-zero coordinates to zero, and a [`Vector`] can never be
//! the zero vector.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod point;
mod ray;
pub mod util;
mod vector;

pub use aabb::Aabb;
pub use interval::Interval;
pub use point::Point3;
pub use ray::Ray;
pub use util::{align_zero, is_zero};
pub use vector::Vector;

use thiserror::Error;

/// Color type alias (RGB channels on a 0-255 linear scale, not clamped).
pub type Color = DVec3;

/// Errors raised by vector math.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("zero vector has no direction")]
    ZeroVector,
}

/// Result alias for vector math.
pub type MathResult<T> = Result<T, MathError>;
