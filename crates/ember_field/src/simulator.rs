//! Particle field simulator
//!
//! [`ParticleSimulator`] owns one [`ParticleField`], the renderer handle that
//! mirrors it, and the random source driving its motion. It is the unit an
//! external frame loop drives:
//!
//! ```ignore
//! let mut sim = ParticleSimulator::new(FieldOptions::default(), Headless)?;
//! loop {
//!     let buffers = sim.tick(pointer, dt);
//!     draw(buffers);
//! }
//! ```
//!
//! Reconfiguration swaps the whole field; dispose (or drop) releases the
//! renderer handle. Every handle is released exactly once.

use crate::config::{FieldOptions, FieldOptionsPatch};
use crate::error::Result;
use crate::field::ParticleField;
use crate::render::{FieldBuffers, FieldRenderer};
use ember_core::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct ParticleSimulator<R: FieldRenderer> {
    options: FieldOptions,
    field: Option<ParticleField>,
    handle: Option<R::Handle>,
    renderer: R,
    rng: StdRng,
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl<R: FieldRenderer> ParticleSimulator<R> {
    /// Validate `options`, build the field and allocate its renderer storage
    pub fn new(options: FieldOptions, mut renderer: R) -> Result<Self> {
        let setup = options.resolve()?;
        let mut rng = make_rng(options.seed);
        let field = ParticleField::new(&setup, &mut rng)?;
        let handle = renderer.allocate(&field.buffers());

        tracing::debug!(
            "ParticleSimulator: created {} particles (bounds {}, quality {:?})",
            field.len(),
            field.bounds(),
            options.quality
        );

        Ok(Self {
            options,
            field: Some(field),
            handle: Some(handle),
            renderer,
            rng,
        })
    }

    /// Advance one frame and upload the result.
    ///
    /// `pointer` is in the field's own coordinate space. Returns empty
    /// buffers once disposed.
    pub fn tick(&mut self, pointer: Vec3, dt: f32) -> FieldBuffers<'_> {
        let (Some(field), Some(handle)) = (self.field.as_mut(), self.handle.as_ref()) else {
            return FieldBuffers::empty();
        };

        field.step(
            pointer,
            dt,
            &self.options.motion,
            self.options.style,
            &mut self.rng,
        );
        let buffers = field.buffers();
        self.renderer.upload(handle, &buffers);
        buffers
    }

    /// Merge `patch` into the current options and rebuild the field.
    ///
    /// Validation happens before anything is torn down, so on error the
    /// previous field and renderer handle stay in place.
    pub fn reconfigure(&mut self, patch: FieldOptionsPatch) -> Result<()> {
        let options = self.options.merged(&patch);
        let setup = options.resolve()?;
        if patch.seed.is_some() {
            self.rng = make_rng(options.seed);
        }
        let field = ParticleField::new(&setup, &mut self.rng)?;

        if let Some(old) = self.handle.take() {
            self.renderer.release(old);
        }
        self.handle = Some(self.renderer.allocate(&field.buffers()));

        tracing::debug!(
            "ParticleSimulator: reconfigured to {} particles (bounds {})",
            field.len(),
            field.bounds()
        );

        self.field = Some(field);
        self.options = options;
        Ok(())
    }

    /// Release the renderer handle and drop the particle buffers.
    ///
    /// Safe to call repeatedly; also runs on drop.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.renderer.release(handle);
            tracing::debug!("ParticleSimulator: disposed");
        }
        self.field = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.field.is_none()
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }

    pub fn field_mut(&mut self) -> Option<&mut ParticleField> {
        self.field.as_mut()
    }

    /// Current buffers without advancing
    pub fn buffers(&self) -> FieldBuffers<'_> {
        self.field
            .as_ref()
            .map(ParticleField::buffers)
            .unwrap_or_default()
    }

    /// Particle count, zero once disposed
    pub fn particle_count(&self) -> usize {
        self.field.as_ref().map_or(0, ParticleField::len)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

impl<R: FieldRenderer> Drop for ParticleSimulator<R> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorScheme, FieldStyle};
    use crate::error::FieldError;
    use crate::quality::QualityTier;
    use crate::render::recording::RecordingRenderer;
    use crate::render::Headless;

    fn seeded(seed: u64) -> FieldOptions {
        FieldOptions {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_count_follows_density_and_quality() {
        let mut sim = ParticleSimulator::new(seeded(1), Headless).unwrap();
        let cases = [(1.0, 1.0, 1000), (0.3, 1.0, 300), (1.0, 0.6, 600), (0.5, 0.5, 250)];
        for (density, factor, expected) in cases {
            sim.reconfigure(
                FieldOptionsPatch::default()
                    .with_density(density)
                    .with_quality_factor(factor),
            )
            .unwrap();
            assert_eq!(sim.particle_count(), expected, "d={density} q={factor}");
            assert_eq!(sim.buffers().len(), expected);
        }

        sim.reconfigure(FieldOptionsPatch::default().with_quality(QualityTier::Low))
            .unwrap();
        assert_eq!(sim.particle_count(), 150);
    }

    #[test]
    fn test_ticks_never_reallocate() {
        let mut sim = ParticleSimulator::new(seeded(2), Headless).unwrap();
        let field = sim.field().unwrap();
        let ptr = field.positions().as_ptr();
        let len = field.len();

        for i in 0..10_000 {
            let pointer = Vec3::new((i % 50) as f32 - 25.0, 0.0, 0.0);
            sim.tick(pointer, 1.0 / 60.0);
        }

        let field = sim.field().unwrap();
        assert_eq!(field.positions().as_ptr(), ptr);
        assert_eq!(field.len(), len);
        assert_eq!(field.sizes().len(), len);
        assert_eq!(field.colors().len(), len);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let options = FieldOptions {
            style: FieldStyle::ORGANIC,
            ..seeded(99)
        };
        let mut a = ParticleSimulator::new(options.clone(), Headless).unwrap();
        let mut b = ParticleSimulator::new(options, Headless).unwrap();
        for _ in 0..120 {
            a.tick(Vec3::new(5.0, 5.0, 0.0), 1.0 / 60.0);
            b.tick(Vec3::new(5.0, 5.0, 0.0), 1.0 / 60.0);
        }
        let bits = |sim: &ParticleSimulator<Headless>| -> Vec<u32> {
            sim.buffers()
                .positions
                .iter()
                .flat_map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
                .collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn test_failed_reconfigure_keeps_previous_field() {
        let renderer = RecordingRenderer::default();
        let ledger = renderer.ledger.clone();
        let mut sim = ParticleSimulator::new(seeded(3), renderer).unwrap();
        let before = sim.buffers().positions.to_vec();

        let err = sim
            .reconfigure(FieldOptionsPatch::default().with_palette(ColorScheme::Custom(Vec::new())))
            .unwrap_err();
        assert!(matches!(err, FieldError::InvalidConfiguration(_)));
        assert_eq!(sim.buffers().positions, before.as_slice());
        assert_eq!(sim.options().palette, ColorScheme::Brand);
        assert_eq!(ledger.borrow().live, vec![0]);

        // still usable
        assert_eq!(sim.tick(Vec3::ZERO, 0.016).len(), 1000);
    }

    #[test]
    fn test_oversized_density_is_rejected() {
        let mut sim = ParticleSimulator::new(seeded(9), Headless).unwrap();
        let err = sim
            .reconfigure(FieldOptionsPatch::default().with_density(1.0e30))
            .unwrap_err();
        assert!(matches!(err, FieldError::InvalidConfiguration(_)));
        assert_eq!(sim.particle_count(), 1000);
    }

    #[test]
    fn test_handles_released_exactly_once() {
        crate::init_test_tracing();
        let renderer = RecordingRenderer::default();
        let ledger = renderer.ledger.clone();
        {
            let mut sim = ParticleSimulator::new(seeded(4), renderer).unwrap();
            sim.tick(Vec3::ZERO, 0.016);
            sim.reconfigure(FieldOptionsPatch::default().with_density(0.3))
                .unwrap();
            sim.reconfigure(FieldOptionsPatch::default().with_scale(0.5))
                .unwrap();
            sim.dispose();
            sim.dispose();
        }
        let ledger = ledger.borrow();
        assert!(ledger.live.is_empty());
        assert_eq!(ledger.released, vec![0, 1, 2]);
        assert_eq!(ledger.allocations, vec![(0, 1000), (1, 300), (2, 300)]);
        assert_eq!(ledger.uploads, 1);
    }

    #[test]
    fn test_drop_releases_handle() {
        let renderer = RecordingRenderer::default();
        let ledger = renderer.ledger.clone();
        let sim = ParticleSimulator::new(seeded(5), renderer).unwrap();
        drop(sim);
        assert_eq!(ledger.borrow().released, vec![0]);
    }

    #[test]
    fn test_tick_after_dispose_is_empty() {
        let renderer = RecordingRenderer::default();
        let ledger = renderer.ledger.clone();
        let mut sim = ParticleSimulator::new(seeded(6), renderer).unwrap();
        sim.dispose();
        assert!(sim.is_disposed());
        assert!(sim.tick(Vec3::ZERO, 0.016).is_empty());
        assert_eq!(sim.particle_count(), 0);
        assert_eq!(ledger.borrow().uploads, 0);
    }

    #[test]
    fn test_reconfigure_after_dispose_rebuilds() {
        let renderer = RecordingRenderer::default();
        let ledger = renderer.ledger.clone();
        let mut sim = ParticleSimulator::new(seeded(7), renderer).unwrap();
        sim.dispose();
        sim.reconfigure(FieldOptionsPatch::default()).unwrap();
        assert!(!sim.is_disposed());
        assert_eq!(ledger.borrow().live, vec![1]);
    }

    #[test]
    fn test_scale_changes_bounds() {
        let mut sim = ParticleSimulator::new(seeded(8), Headless).unwrap();
        sim.reconfigure(FieldOptionsPatch::default().with_scale(0.5))
            .unwrap();
        let field = sim.field().unwrap();
        assert_eq!(field.bounds(), 50.0);
        assert!(field.positions().iter().all(|p| p.max_abs() <= 50.0));
    }
}
