//! Ember Animation
//!
//! Time-based value animation for the hero background.
//!
//! # Features
//!
//! - **Easing**: power curves matching the site's `power2` in/out fades
//! - **Tweens**: fixed-duration interpolation for any [`Interpolate`] type
//! - **Visibility**: an explicit `Hidden -> FadingIn -> Visible -> FadingOut`
//!   state machine driving a fade tween

pub mod easing;
pub mod tween;
pub mod values;
pub mod visibility;

pub use easing::Easing;
pub use tween::Tween;
pub use values::Interpolate;
pub use visibility::{FadeConfig, FadeEvent, Visibility, VisibilityFade};
