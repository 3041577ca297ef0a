//! Hero background driver
//!
//! [`HeroBackground`] wires the simulator to everything around it: pointer
//! projection, responsive breakpoints, automatic quality downgrades, the
//! show/hide fade, scroll parallax and the optional floating accent. The
//! host UI owns one instance and forwards events and frame callbacks to it;
//! nothing is shared through globals.

use crate::accent::FloatingAccent;
use crate::config::{FieldOptionsPatch, HeroOptions};
use crate::error::Result;
use crate::parallax::FieldTransform;
use crate::pointer::PointerProjector;
use crate::quality::{Breakpoint, FrameRateMonitor, QualityTier};
use crate::render::{FieldBuffers, FieldRenderer};
use crate::simulator::ParticleSimulator;
use ember_animation::{FadeEvent, Visibility, VisibilityFade};
use ember_core::{Mat4, Vec3};

/// Everything a renderer needs to draw one frame
#[derive(Clone, Copy, Debug)]
pub struct FrameOutput<'a> {
    /// Empty when nothing should be drawn
    pub buffers: FieldBuffers<'a>,
    pub opacity: f32,
    pub model: Mat4,
    pub view_projection: Mat4,
    /// Model matrix of the floating accent, when enabled
    pub accent: Option<Mat4>,
    pub max_pixel_ratio: f32,
    /// Fade that finished during this frame
    pub event: Option<FadeEvent>,
}

impl FrameOutput<'_> {
    pub fn is_drawn(&self) -> bool {
        !self.buffers.is_empty() && self.opacity > 0.0
    }
}

pub struct HeroBackground<R: FieldRenderer> {
    options: HeroOptions,
    simulator: ParticleSimulator<R>,
    projector: PointerProjector,
    monitor: Option<FrameRateMonitor>,
    fade: VisibilityFade,
    breakpoint: Breakpoint,
    /// Breakpoint changed while destroyed; applied on the next rebuild
    breakpoint_pending: bool,
    accent: Option<FloatingAccent>,
    pointer: Vec3,
    scroll: f32,
    time: f32,
    destroyed: bool,
}

impl<R: FieldRenderer> HeroBackground<R> {
    /// Build the background for a viewport of `width x height` pixels.
    ///
    /// The breakpoint for `width` overrides the configured scale and density.
    pub fn new(options: HeroOptions, width: f32, height: f32, renderer: R) -> Result<Self> {
        let breakpoint = Breakpoint::from_width(width);
        let field = options.field.merged(&breakpoint.patch());
        let simulator = ParticleSimulator::new(field, renderer)?;

        let fade = if options.start_hidden {
            VisibilityFade::hidden(options.fade)
        } else {
            VisibilityFade::visible(options.fade)
        };
        let monitor = options
            .auto_quality
            .then(|| FrameRateMonitor::new(options.target_fps));

        tracing::debug!(
            "HeroBackground: {:?} viewport {}x{}, {} particles",
            breakpoint,
            width,
            height,
            simulator.particle_count()
        );

        let mut hero = Self {
            simulator,
            projector: PointerProjector::new(width, height),
            monitor,
            fade,
            breakpoint,
            breakpoint_pending: false,
            accent: None,
            pointer: Vec3::ZERO,
            scroll: 0.0,
            time: 0.0,
            destroyed: false,
            options,
        };
        hero.sync_accent();
        Ok(hero)
    }

    /// Pointer moved to `(px, py)` in viewport pixels
    pub fn pointer_moved(&mut self, px: f32, py: f32) {
        self.pointer = self.projector.project(px, py);
    }

    /// Set the pointer directly in world space
    pub fn set_pointer_world(&mut self, pointer: Vec3) {
        self.pointer = pointer;
    }

    /// Viewport resized. The field is rebuilt only when the breakpoint changes;
    /// if that fails the previous field keeps rendering.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.projector.resize(width, height);

        let breakpoint = Breakpoint::from_width(width);
        if breakpoint == self.breakpoint {
            return;
        }
        if self.destroyed {
            self.breakpoint = breakpoint;
            self.breakpoint_pending = true;
            return;
        }
        match self.simulator.reconfigure(breakpoint.patch()) {
            Ok(()) => {
                tracing::debug!(
                    "HeroBackground: breakpoint {:?} -> {:?}",
                    self.breakpoint,
                    breakpoint
                );
                self.breakpoint = breakpoint;
            }
            Err(e) => {
                tracing::warn!("HeroBackground: keeping previous field after resize: {}", e);
            }
        }
    }

    /// Scroll progress through the hero section, `0..=1`
    pub fn scroll(&mut self, progress: f32) {
        self.scroll = progress;
    }

    pub fn show(&mut self) -> bool {
        self.fade.show()
    }

    pub fn hide(&mut self) -> bool {
        self.fade.hide()
    }

    /// Rebuild the field at `tier`
    pub fn set_quality(&mut self, tier: QualityTier) -> Result<()> {
        self.reconfigure(FieldOptionsPatch::default().with_quality(tier))?;
        tracing::info!("HeroBackground: quality set to {:?}", tier);
        Ok(())
    }

    /// Apply an arbitrary options patch to the field.
    ///
    /// A breakpoint reached while destroyed contributes its scale and density
    /// unless `patch` sets them.
    pub fn reconfigure(&mut self, mut patch: FieldOptionsPatch) -> Result<()> {
        if self.breakpoint_pending {
            let resized = self.breakpoint.patch();
            patch.scale = patch.scale.or(resized.scale);
            patch.density = patch.density.or(resized.density);
        }
        self.simulator.reconfigure(patch)?;
        self.breakpoint_pending = false;
        self.destroyed = false;
        self.sync_accent();
        Ok(())
    }

    /// Advance one displayed frame of `dt` seconds.
    ///
    /// Order: frame-rate monitor (possibly downgrading quality), fade,
    /// parallax, accent, then the particle tick. The pointer is mapped into
    /// the field's own space through the inverse model matrix before the
    /// tick. Hidden backgrounds skip the tick and return empty buffers.
    pub fn frame(&mut self, dt: f32) -> FrameOutput<'_> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if self.destroyed {
            return FrameOutput {
                buffers: FieldBuffers::empty(),
                opacity: 0.0,
                model: Mat4::IDENTITY,
                view_projection: self.projector.view_projection(),
                accent: None,
                max_pixel_ratio: self.quality().max_pixel_ratio(),
                event: None,
            };
        }

        self.time += dt;
        let rendered = self.fade.is_rendered();

        if rendered {
            let slow = self
                .monitor
                .as_mut()
                .is_some_and(|monitor| monitor.record_frame(dt));
            if slow {
                self.downgrade();
            }
        }

        let event = self.fade.advance(dt);
        if let Some(event) = event {
            tracing::debug!("HeroBackground: fade finished ({:?})", event);
        }

        let model = FieldTransform::sway(self.time)
            .with_scroll(self.scroll)
            .model_matrix();
        let accent = self.accent.as_mut().map(|accent| {
            accent.update(self.time);
            accent.model_matrix()
        });
        let max_pixel_ratio = self.simulator.options().quality.max_pixel_ratio();
        let opacity = self.fade.opacity();
        let view_projection = self.projector.view_projection();

        let buffers = if rendered {
            let pointer = model.inverse_rigid().transform_point(self.pointer);
            self.simulator.tick(pointer, dt)
        } else {
            FieldBuffers::empty()
        };

        FrameOutput {
            buffers,
            opacity,
            model,
            view_projection,
            accent,
            max_pixel_ratio,
            event,
        }
    }

    /// Release renderer resources. Further frames draw nothing until the
    /// field is reconfigured.
    pub fn destroy(&mut self) {
        if !self.destroyed {
            self.simulator.dispose();
            self.accent = None;
            self.destroyed = true;
            tracing::debug!("HeroBackground: destroyed");
        }
    }

    pub fn quality(&self) -> QualityTier {
        self.simulator.options().quality
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn visibility(&self) -> Visibility {
        self.fade.state()
    }

    pub fn opacity(&self) -> f32 {
        self.fade.opacity()
    }

    /// World-space pointer
    pub fn pointer(&self) -> Vec3 {
        self.pointer
    }

    pub fn accent(&self) -> Option<&FloatingAccent> {
        self.accent.as_ref()
    }

    pub fn simulator(&self) -> &ParticleSimulator<R> {
        &self.simulator
    }

    pub fn projector(&self) -> &PointerProjector {
        &self.projector
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn downgrade(&mut self) {
        let current = self.quality();
        let next = current.downgrade();
        if next == current {
            return;
        }
        tracing::info!(
            "HeroBackground: low frame rate ({:.1} fps), quality {:?} -> {:?}",
            self.monitor.as_ref().map_or(0.0, FrameRateMonitor::fps),
            current,
            next
        );
        if let Err(e) = self.set_quality(next) {
            tracing::warn!("HeroBackground: quality downgrade failed: {}", e);
        }
    }

    fn sync_accent(&mut self) {
        let wanted = self.simulator.options().style.floating_accent;
        match (wanted, self.accent.is_some()) {
            (true, false) => self.accent = Some(FloatingAccent::new(self.options.accent)),
            (false, true) => self.accent = None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldOptions, FieldStyle};
    use crate::render::recording::RecordingRenderer;
    use crate::render::Headless;

    fn options() -> HeroOptions {
        HeroOptions {
            field: FieldOptions {
                seed: Some(1),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_breakpoint_sets_initial_field() {
        let hero = HeroBackground::new(options(), 400.0, 800.0, Headless).unwrap();
        assert_eq!(hero.breakpoint(), Breakpoint::Mobile);
        assert_eq!(hero.simulator().particle_count(), 300);
        assert_eq!(hero.simulator().field().unwrap().bounds(), 50.0);
    }

    #[test]
    fn test_resize_rebuilds_only_on_breakpoint_change() {
        crate::init_test_tracing();
        let renderer = RecordingRenderer::default();
        let ledger = renderer.ledger.clone();
        let mut hero = HeroBackground::new(options(), 1440.0, 900.0, renderer).unwrap();

        hero.resize(1280.0, 800.0);
        hero.resize(1024.0, 800.0);
        assert_eq!(ledger.borrow().allocations.len(), 1);

        hero.resize(700.0, 900.0);
        assert_eq!(hero.breakpoint(), Breakpoint::Tablet);
        assert_eq!(ledger.borrow().allocations, vec![(0, 1000), (1, 600)]);
        assert_eq!(ledger.borrow().released, vec![0]);
        assert!((hero.projector().aspect() - 700.0 / 900.0).abs() < 1e-6);
    }

    #[test]
    fn test_hidden_background_skips_ticks() {
        let renderer = RecordingRenderer::default();
        let ledger = renderer.ledger.clone();
        let mut hero = HeroBackground::new(
            HeroOptions {
                start_hidden: true,
                ..options()
            },
            1440.0,
            900.0,
            renderer,
        )
        .unwrap();

        let out = hero.frame(0.016);
        assert!(!out.is_drawn());
        assert_eq!(ledger.borrow().uploads, 0);

        assert!(hero.show());
        let out = hero.frame(0.5);
        assert!(out.is_drawn());
        assert_eq!(out.event, None);
        let out = hero.frame(0.5);
        assert_eq!(out.event, Some(FadeEvent::Shown));
        assert!((out.opacity - 0.8).abs() < 1e-6);
        assert_eq!(hero.visibility(), Visibility::Visible);
        assert_eq!(ledger.borrow().uploads, 2);
    }

    #[test]
    fn test_hide_fades_out_then_stops_drawing() {
        let mut hero = HeroBackground::new(options(), 1440.0, 900.0, Headless).unwrap();
        assert!(hero.hide());
        assert!(hero.frame(0.5).is_drawn());
        assert_eq!(hero.frame(0.6).event, Some(FadeEvent::Hidden));
        assert!(!hero.frame(0.016).is_drawn());
    }

    #[test]
    fn test_sustained_slow_frames_downgrade_quality() {
        let mut hero = HeroBackground::new(options(), 1440.0, 900.0, Headless).unwrap();
        assert_eq!(hero.quality(), QualityTier::High);
        for _ in 0..70 {
            hero.frame(0.05);
        }
        assert_eq!(hero.quality(), QualityTier::Medium);
        assert_eq!(hero.simulator().particle_count(), 600);
        assert_eq!(hero.frame(0.05).max_pixel_ratio, 1.5);
    }

    #[test]
    fn test_auto_quality_can_be_disabled() {
        let mut hero = HeroBackground::new(
            HeroOptions {
                auto_quality: false,
                ..options()
            },
            1440.0,
            900.0,
            Headless,
        )
        .unwrap();
        for _ in 0..200 {
            hero.frame(0.05);
        }
        assert_eq!(hero.quality(), QualityTier::High);
    }

    #[test]
    fn test_pointer_projects_through_camera() {
        let mut hero = HeroBackground::new(options(), 1440.0, 900.0, Headless).unwrap();
        hero.pointer_moved(720.0, 450.0);
        assert!(hero.pointer().max_abs() < 1e-3);
        hero.pointer_moved(1440.0, 450.0);
        assert!(hero.pointer().x > 100.0);
    }

    #[test]
    fn test_scroll_moves_field_down() {
        let mut hero = HeroBackground::new(options(), 1440.0, 900.0, Headless).unwrap();
        hero.scroll(1.0);
        let out = hero.frame(0.016);
        let origin = out.model.transform_point(Vec3::ZERO);
        assert!((origin.y + 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_scrolled_field_follows_pointer() {
        let mut opts = options();
        opts.field.motion.jitter = 0.0;
        let mut hero = HeroBackground::new(opts, 1440.0, 900.0, Headless).unwrap();
        hero.scroll(1.0);
        hero.simulator.field_mut().unwrap().positions_mut()[0] = Vec3::ZERO;

        // field origin is drawn at (0, -50, 0); pointer just to its right
        hero.set_pointer_world(Vec3::new(5.0, -50.0, 0.0));
        for _ in 0..10 {
            hero.frame(0.016);
        }
        let p = hero.simulator().field().unwrap().positions()[0];
        assert!(p.x > 0.1, "particle under the pointer stayed at {p:?}");
        assert!(p.y.abs() < 0.1, "{p:?}");
    }

    #[test]
    fn test_accent_follows_style() {
        let mut hero = HeroBackground::new(options(), 1440.0, 900.0, Headless).unwrap();
        assert!(hero.frame(0.016).accent.is_none());

        hero.reconfigure(FieldOptionsPatch::default().with_style(FieldStyle::SHOWCASE))
            .unwrap();
        assert!(hero.accent().is_some());
        assert!(hero.frame(0.016).accent.is_some());
    }

    #[test]
    fn test_destroy_releases_everything() {
        let renderer = RecordingRenderer::default();
        let ledger = renderer.ledger.clone();
        let mut hero = HeroBackground::new(options(), 1440.0, 900.0, renderer).unwrap();
        hero.frame(0.016);
        hero.destroy();
        hero.destroy();
        assert!(ledger.borrow().live.is_empty());
        assert!(!hero.frame(0.016).is_drawn());
        hero.resize(400.0, 800.0);
        assert_eq!(ledger.borrow().allocations.len(), 1);
        drop(hero);
        assert_eq!(ledger.borrow().released, vec![0]);
    }

    #[test]
    fn test_resize_while_destroyed_applies_on_rebuild() {
        let mut hero = HeroBackground::new(options(), 1440.0, 900.0, Headless).unwrap();
        hero.destroy();
        hero.resize(400.0, 800.0);
        assert_eq!(hero.breakpoint(), Breakpoint::Mobile);

        hero.reconfigure(FieldOptionsPatch::default()).unwrap();
        assert_eq!(hero.simulator().particle_count(), 300);
        assert_eq!(hero.simulator().field().unwrap().bounds(), 50.0);

        // later patches no longer carry the breakpoint
        hero.reconfigure(FieldOptionsPatch::default().with_density(1.0))
            .unwrap();
        assert_eq!(hero.simulator().particle_count(), 1000);
        assert_eq!(hero.simulator().field().unwrap().bounds(), 50.0);
    }
}
