//! Prelude module for common imports
//!
//! ```rust,ignore
//! use ember_field::prelude::*;
//! ```

pub use crate::config::{
    ColorScheme, FieldOptions, FieldOptionsPatch, FieldStyle, HeroOptions, MotionParams, TimeStep,
};
pub use crate::error::{FieldError, Result};
pub use crate::hero::{FrameOutput, HeroBackground};
pub use crate::quality::{Breakpoint, QualityTier};
pub use crate::render::{FieldBuffers, FieldRenderer, Headless};
pub use crate::sampling::Distribution;
pub use crate::simulator::ParticleSimulator;

pub use ember_animation::{FadeConfig, FadeEvent, Visibility};
pub use ember_core::{Color, Vec3};
