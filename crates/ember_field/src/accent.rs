//! Floating accent object
//!
//! A single decorative object that bobs and spins slowly in front of the
//! field. Only its transform lives here; what it looks like is up to the
//! renderer.

use ember_core::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccentParams {
    /// Rest position the bob oscillates around
    pub base: Vec3,
    /// Bob height
    pub amplitude: f32,
    /// Bob angular rate, radians per second
    pub frequency: f32,
    /// Y spin per frame in radians; x spins at half this rate
    pub spin: f32,
}

impl Default for AccentParams {
    fn default() -> Self {
        Self {
            base: Vec3::ZERO,
            amplitude: 2.0,
            frequency: 0.5,
            spin: 0.005,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FloatingAccent {
    params: AccentParams,
    position: Vec3,
    rotation_x: f32,
    rotation_y: f32,
}

impl FloatingAccent {
    pub fn new(params: AccentParams) -> Self {
        Self {
            position: params.base,
            params,
            rotation_x: 0.0,
            rotation_y: 0.0,
        }
    }

    /// Advance one frame at `time` seconds since start
    pub fn update(&mut self, time: f32) {
        let bob = (time * self.params.frequency).sin() * self.params.amplitude;
        self.position = self.params.base + Vec3::UP * bob;
        self.rotation_y += self.params.spin;
        self.rotation_x += self.params.spin * 0.5;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// `(x, y)` rotation in radians
    pub fn rotation(&self) -> (f32, f32) {
        (self.rotation_x, self.rotation_y)
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::translation(self.position.x, self.position.y, self.position.z)
            .mul(&Mat4::rotation_x(self.rotation_x))
            .mul(&Mat4::rotation_y(self.rotation_y))
    }
}

impl Default for FloatingAccent {
    fn default() -> Self {
        Self::new(AccentParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_bob_peaks_at_amplitude() {
        let mut accent = FloatingAccent::default();
        accent.update(PI);
        assert!((accent.position().y - 2.0).abs() < 1e-5);
        accent.update(0.0);
        assert!(accent.position().y.abs() < 1e-6);
    }

    #[test]
    fn test_spin_accumulates_per_frame() {
        let mut accent = FloatingAccent::default();
        for frame in 0..100 {
            accent.update(frame as f32 / 60.0);
        }
        let (x, y) = accent.rotation();
        assert!((y - 0.5).abs() < 1e-4);
        assert!((x - 0.25).abs() < 1e-4);
    }
}
