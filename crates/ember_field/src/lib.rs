//! # Ember Field
//!
//! Pointer-reactive particle field for a hero background.
//!
//! The crate is split into the simulation core and the orchestration around
//! it:
//!
//! - [`ParticleField`] holds particles as parallel GPU-ready arrays and
//!   advances them: pointer attraction, bounded wander, optional noise drift,
//!   and a soft clamp back into bounds.
//! - [`ParticleSimulator`] owns a field plus its renderer handle and
//!   supports whole-field reconfiguration and disposal.
//! - [`HeroBackground`] drives a simulator from UI events: pointer, resize,
//!   scroll, show/hide, and automatic quality downgrades.
//!
//! ## Quick Start
//!
//! ```rust
//! use ember_field::prelude::*;
//!
//! let mut hero = HeroBackground::new(HeroOptions::default(), 1280.0, 720.0, Headless)?;
//! hero.pointer_moved(640.0, 360.0);
//! let frame = hero.frame(1.0 / 60.0);
//! assert!(frame.is_drawn());
//! # Ok::<(), ember_field::FieldError>(())
//! ```
//!
//! ## Features
//!
//! - `gpu` - [`gpu::WgpuRenderer`], a `wgpu` backend writing the particle
//!   buffers into instance vertex buffers

pub mod accent;
pub mod config;
pub mod error;
pub mod field;
pub mod hero;
pub mod noise;
pub mod parallax;
pub mod pointer;
pub mod quality;
pub mod render;
pub mod sampling;
pub mod simulator;

#[cfg(feature = "gpu")]
pub mod gpu;

pub mod prelude;

pub use accent::{AccentParams, FloatingAccent};
pub use config::{
    ColorScheme, FieldOptions, FieldOptionsPatch, FieldSetup, FieldStyle, HeroOptions,
    MotionParams, TimeStep,
};
pub use error::{FieldError, Result};
pub use field::ParticleField;
pub use hero::{FrameOutput, HeroBackground};
pub use parallax::FieldTransform;
pub use pointer::{PointerProjector, Ray};
pub use quality::{Breakpoint, FrameRateMonitor, QualityTier};
pub use render::{FieldBuffers, FieldRenderer, Headless};
pub use sampling::Distribution;
pub use simulator::ParticleSimulator;

#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
