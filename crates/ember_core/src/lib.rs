//! Ember core types
//!
//! Plain value types shared across the Ember crates:
//!
//! - [`Vec2`], [`Vec3`], [`Mat4`] - column-major math, `bytemuck::Pod` for GPU upload
//! - [`Color`] - RGBA configuration color, serialized as hex
//! - [`Rgb`] - packed per-vertex color

pub mod color;
pub mod math;

pub use color::{Color, ParseColorError, Rgb};
pub use math::{Mat4, Vec2, Vec3};
