//! Particle buffers and the per-tick update
//!
//! A [`ParticleField`] stores particles as parallel arrays (structure of
//! arrays) so positions, sizes and colors can be uploaded as vertex buffers
//! without repacking. Buffer lengths are fixed for the lifetime of a field;
//! a different particle count means building a new field.

use crate::config::{FieldSetup, FieldStyle, MotionParams};
use crate::error::Result;
use crate::noise::value_noise_3d;
use crate::render::FieldBuffers;
use ember_core::{Rgb, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// Drift of the noise field over time, per second of simulation
const NOISE_TIME_SCALE: f32 = 0.1;

#[derive(Clone, Debug)]
pub struct ParticleField {
    positions: Vec<Vec3>,
    sizes: Vec<f32>,
    colors: Vec<Rgb>,
    speeds: Vec<f32>,
    phases: Vec<f32>,
    bounds: f32,
    elapsed: f32,
}

impl ParticleField {
    /// Build a field with randomized positions, sizes, colors and speeds
    pub fn new(setup: &FieldSetup, rng: &mut impl Rng) -> Result<Self> {
        setup.validate()?;

        let count = setup.count;
        let mut positions = Vec::with_capacity(count);
        let mut sizes = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        let mut speeds = Vec::with_capacity(count);
        let mut phases = Vec::with_capacity(count);

        let (size_min, size_max) = setup.size_range;
        let (speed_min, speed_max) = setup.speed_range;

        for _ in 0..count {
            positions.push(setup.distribution.sample(setup.bounds, rng));
            sizes.push(size_min + rng.gen::<f32>() * (size_max - size_min));
            colors.push(setup.palette[rng.gen_range(0..setup.palette.len())]);
            speeds.push(speed_min + rng.gen::<f32>() * (speed_max - speed_min));
            phases.push(rng.gen::<f32>() * TAU);
        }

        Ok(Self {
            positions,
            sizes,
            colors,
            speeds,
            phases,
            bounds: setup.bounds,
            elapsed: 0.0,
        })
    }

    /// Advance every particle by one tick.
    ///
    /// Order per particle: pointer attraction, random wander, optional noise
    /// and oscillation, then the soft bounds clamp. `dt` only matters for
    /// noise time and [`TimeStep::Scaled`](crate::config::TimeStep::Scaled).
    pub fn step(
        &mut self,
        pointer: Vec3,
        dt: f32,
        motion: &MotionParams,
        style: FieldStyle,
        rng: &mut impl Rng,
    ) {
        let k = motion.frame_scale(dt);
        let gain = (motion.attraction_gain * k).min(1.0);
        let jitter = motion.jitter * k;
        let damping = if k == 1.0 {
            motion.damping
        } else {
            motion.damping.powf(k)
        };
        let bounds = self.bounds;

        self.elapsed += dt.max(0.0);
        let time = self.elapsed;
        let noise_offset = Vec3::new(time, time * 0.7, time * 1.3) * NOISE_TIME_SCALE;

        for i in 0..self.positions.len() {
            let mut p = self.positions[i];

            // 1. attraction
            if p.planar_distance(pointer) < motion.attraction_radius {
                p.x += (pointer.x - p.x) * gain;
                p.y += (pointer.y - p.y) * gain;
            }

            // 2. wander
            p.x += (rng.gen::<f32>() - 0.5) * jitter;
            p.y += (rng.gen::<f32>() - 0.5) * jitter;
            p.z += (rng.gen::<f32>() - 0.5) * jitter;

            // 3. noise and oscillation
            if style.noise_motion {
                let n = value_noise_3d(p * motion.noise_frequency + noise_offset);
                p = p + n * (motion.noise_strength * k);
                p.y += (time * self.speeds[i] + self.phases[i]).sin()
                    * motion.oscillation_amplitude
                    * k;
            }

            // 4. soft clamp
            if p.x.abs() > bounds {
                p.x *= damping;
            }
            if p.y.abs() > bounds {
                p.y *= damping;
            }
            if p.z.abs() > bounds {
                p.z *= damping;
            }

            self.positions[i] = p;
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn bounds(&self) -> f32 {
        self.bounds
    }

    /// Simulated seconds since construction
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Mutable positions for scripted placement; length cannot change
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn speeds(&self) -> &[f32] {
        &self.speeds
    }

    pub fn phases(&self) -> &[f32] {
        &self.phases
    }

    pub fn buffers(&self) -> FieldBuffers<'_> {
        FieldBuffers {
            positions: &self.positions,
            sizes: &self.sizes,
            colors: &self.colors,
        }
    }
}
