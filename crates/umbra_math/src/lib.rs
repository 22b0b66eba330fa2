//! Umbra math types.
//!
//! `Vec3` comes straight from glam and is used for points, directions and
//! linear RGB colors alike. This crate adds the ray and bounding-box types the
//! renderer's spatial index is built on.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::{Ray, RAY_EPSILON};
