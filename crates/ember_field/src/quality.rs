//! Quality tiers, responsive breakpoints and frame-rate monitoring
//!
//! Particle counts scale with two independent factors: the device
//! [`QualityTier`] (lowered at runtime by [`FrameRateMonitor`]) and the
//! layout [`Breakpoint`] picked from the viewport width.

use crate::config::FieldOptionsPatch;
use serde::{Deserialize, Serialize};

/// Rendering quality tier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityTier {
    /// Multiplier applied to the base particle count
    pub fn factor(self) -> f32 {
        match self {
            QualityTier::Low => 0.3,
            QualityTier::Medium => 0.6,
            QualityTier::High => 1.0,
        }
    }

    /// Next tier down; `Low` stays `Low`
    pub fn downgrade(self) -> Self {
        match self {
            QualityTier::High => QualityTier::Medium,
            QualityTier::Medium | QualityTier::Low => QualityTier::Low,
        }
    }

    /// Upper bound for the renderer's device pixel ratio
    pub fn max_pixel_ratio(self) -> f32 {
        match self {
            QualityTier::Low => 1.0,
            QualityTier::Medium => 1.5,
            QualityTier::High => 2.0,
        }
    }
}

/// Responsive layout breakpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    /// Up to 480px wide
    Mobile,
    /// Up to 768px wide
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub const MOBILE_MAX_WIDTH: f32 = 480.0;
    pub const TABLET_MAX_WIDTH: f32 = 768.0;

    pub fn from_width(width: f32) -> Self {
        if width <= Self::MOBILE_MAX_WIDTH {
            Breakpoint::Mobile
        } else if width <= Self::TABLET_MAX_WIDTH {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }

    /// World-space scale of the field bounds
    pub fn scale(self) -> f32 {
        match self {
            Breakpoint::Mobile => 0.5,
            Breakpoint::Tablet => 0.7,
            Breakpoint::Desktop => 1.0,
        }
    }

    /// Particle density factor
    pub fn density(self) -> f32 {
        match self {
            Breakpoint::Mobile => 0.3,
            Breakpoint::Tablet => 0.6,
            Breakpoint::Desktop => 1.0,
        }
    }

    /// Options patch applying this breakpoint's scale and density
    pub fn patch(self) -> FieldOptionsPatch {
        FieldOptionsPatch::default()
            .with_scale(self.scale())
            .with_density(self.density())
    }
}

/// Measures frame rate over one-second windows and flags sustained slowdowns
///
/// A window counts as slow when its average fps is under
/// `target_fps * SLOW_RATIO`. After [`FrameRateMonitor::SLOW_WINDOWS`]
/// consecutive slow windows, [`FrameRateMonitor::record_frame`] returns true
/// once and the streak restarts.
#[derive(Clone, Debug)]
pub struct FrameRateMonitor {
    target_fps: f32,
    window_elapsed: f32,
    window_frames: u32,
    fps: f32,
    frame_time_ms: f32,
    slow_windows: u32,
}

impl FrameRateMonitor {
    pub const SLOW_RATIO: f32 = 0.7;
    pub const SLOW_WINDOWS: u32 = 3;
    const WINDOW_SECONDS: f32 = 1.0;

    pub fn new(target_fps: f32) -> Self {
        Self {
            target_fps,
            window_elapsed: 0.0,
            window_frames: 0,
            fps: 0.0,
            frame_time_ms: 0.0,
            slow_windows: 0,
        }
    }

    /// Record one rendered frame that took `dt` seconds.
    ///
    /// Returns true when quality should be reduced.
    pub fn record_frame(&mut self, dt: f32) -> bool {
        self.window_elapsed += dt.max(0.0);
        self.window_frames += 1;

        if self.window_elapsed < Self::WINDOW_SECONDS {
            return false;
        }

        self.fps = self.window_frames as f32 / self.window_elapsed;
        self.frame_time_ms = self.window_elapsed * 1000.0 / self.window_frames as f32;
        self.window_elapsed = 0.0;
        self.window_frames = 0;

        if self.fps < self.target_fps * Self::SLOW_RATIO {
            self.slow_windows += 1;
            if self.slow_windows >= Self::SLOW_WINDOWS {
                self.slow_windows = 0;
                return true;
            }
        } else {
            self.slow_windows = 0;
        }
        false
    }

    /// Average fps of the last completed window
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Average frame time (ms) of the last completed window
    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time_ms
    }

    pub fn target_fps(&self) -> f32 {
        self.target_fps
    }
}

impl Default for FrameRateMonitor {
    fn default() -> Self {
        Self::new(60.0)
    }
}
