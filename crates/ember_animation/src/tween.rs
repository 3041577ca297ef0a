//! Fixed-duration tweens

use crate::easing::Easing;
use crate::values::Interpolate;

/// Interpolates from one value to another over a fixed duration
#[derive(Clone, Debug)]
pub struct Tween<T: Interpolate> {
    from: T,
    to: T,
    /// Duration in seconds
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl<T: Interpolate> Tween<T> {
    /// Create a tween; a non-positive duration completes on the first step
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    /// Advance by `dt` seconds; returns true once the tween has finished
    pub fn step(&mut self, dt: f32) -> bool {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    /// Current eased value
    pub fn value(&self) -> T {
        self.from.lerp(&self.to, self.easing.apply(self.progress()))
    }

    pub fn target(&self) -> &T {
        &self.to
    }

    /// Jump straight to the end value
    pub fn finish(&mut self) {
        self.elapsed = self.duration;
    }
}
