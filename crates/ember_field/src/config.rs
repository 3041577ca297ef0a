//! Field options
//!
//! [`FieldOptions`] is the merged, serializable configuration of a particle
//! field. It resolves into a validated [`FieldSetup`] (the construction input
//! of [`ParticleField`](crate::field::ParticleField)) and is updated through
//! [`FieldOptionsPatch`] when the page layout or quality tier changes.
//!
//! Options can be embedded in site configuration as TOML:
//!
//! ```toml
//! density = 0.6
//! quality = "medium"
//! palette = "brand"
//! distribution = "clustered"
//!
//! [style]
//! noise_motion = true
//!
//! [motion]
//! attraction_radius = 30.0
//! damping = 0.95
//! ```

use crate::accent::AccentParams;
use crate::error::{FieldError, Result};
use crate::quality::QualityTier;
use crate::sampling::Distribution;
use ember_animation::FadeConfig;
use ember_core::{Color, Rgb};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Particle count at density 1.0 and [`QualityTier::High`]
pub const DEFAULT_BASE_COUNT: u32 = 1000;

/// Largest particle count a field may be built with
pub const MAX_PARTICLES: usize = 1_000_000;

/// Bounds of the field at scale 1.0, in world units
pub const BASE_BOUNDS: f32 = 100.0;

/// Palette the particles pick their color from
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    /// Blue, green, yellow, red
    #[default]
    Brand,
    /// White only
    Monochrome,
    Custom(Vec<Color>),
}

impl ColorScheme {
    pub fn colors(&self) -> Vec<Color> {
        match self {
            ColorScheme::Brand => vec![
                Color::from_hex(0x4285f4),
                Color::from_hex(0x34a853),
                Color::from_hex(0xfbbc05),
                Color::from_hex(0xea4335),
            ],
            ColorScheme::Monochrome => vec![Color::WHITE],
            ColorScheme::Custom(colors) => colors.clone(),
        }
    }
}

/// Optional motion and presentation capabilities
///
/// The plain field (both flags off) uses jitter-only wander and a basic point
/// shader. `noise_motion` layers smooth noise and per-particle oscillation on
/// top; `floating_accent` adds a single slowly bobbing 3D object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldStyle {
    pub noise_motion: bool,
    pub floating_accent: bool,
}

impl FieldStyle {
    pub const BASIC: FieldStyle = FieldStyle {
        noise_motion: false,
        floating_accent: false,
    };
    pub const ORGANIC: FieldStyle = FieldStyle {
        noise_motion: true,
        floating_accent: false,
    };
    pub const SHOWCASE: FieldStyle = FieldStyle {
        noise_motion: true,
        floating_accent: true,
    };
}

/// How per-tick displacement relates to frame time
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeStep {
    /// Constants apply once per tick regardless of `dt`
    #[default]
    PerFrame,
    /// Constants are tuned for `reference_fps` and scaled by `dt`
    Scaled { reference_fps: f32 },
}

/// Per-tick motion constants
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    /// Planar distance within which particles drift toward the pointer
    pub attraction_radius: f32,
    /// Fraction of the pointer offset covered per tick
    pub attraction_gain: f32,
    /// Total width of the per-axis uniform wander step
    pub jitter: f32,
    /// Multiplier applied to an axis once it leaves the bounds
    pub damping: f32,
    /// Noise displacement per tick (noise style only)
    pub noise_strength: f32,
    /// Spatial frequency of the noise field (noise style only)
    pub noise_frequency: f32,
    /// Vertical oscillation per tick (noise style only)
    pub oscillation_amplitude: f32,
    pub time_step: TimeStep,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            attraction_radius: 30.0,
            attraction_gain: 0.01,
            jitter: 0.1,
            damping: 0.95,
            noise_strength: 0.05,
            noise_frequency: 0.02,
            oscillation_amplitude: 0.02,
            time_step: TimeStep::PerFrame,
        }
    }
}

impl MotionParams {
    /// Multiplier applied to per-tick displacement for a frame of `dt` seconds
    pub fn frame_scale(&self, dt: f32) -> f32 {
        match self.time_step {
            TimeStep::PerFrame => 1.0,
            TimeStep::Scaled { reference_fps } => (dt * reference_fps).max(0.0),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.attraction_radius,
            self.attraction_gain,
            self.jitter,
            self.damping,
            self.noise_strength,
            self.noise_frequency,
            self.oscillation_amplitude,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(FieldError::invalid("motion constants must be finite"));
        }
        if self.attraction_radius < 0.0 {
            return Err(FieldError::invalid("attraction_radius must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.attraction_gain) {
            return Err(FieldError::invalid("attraction_gain must be within [0, 1]"));
        }
        if self.jitter < 0.0 {
            return Err(FieldError::invalid("jitter must not be negative"));
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(FieldError::invalid("damping must be within (0, 1)"));
        }
        if let TimeStep::Scaled { reference_fps } = self.time_step {
            if !(reference_fps.is_finite() && reference_fps > 0.0) {
                return Err(FieldError::invalid("reference_fps must be positive"));
            }
        }
        Ok(())
    }
}

/// Resolved construction input of a particle field
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSetup {
    pub count: usize,
    pub bounds: f32,
    pub palette: Vec<Rgb>,
    /// Inclusive `(min, max)` particle size
    pub size_range: (f32, f32),
    /// Inclusive `(min, max)` oscillation rate
    pub speed_range: (f32, f32),
    pub distribution: Distribution,
}

impl FieldSetup {
    /// Setup with default speed range and uniform distribution
    pub fn new(count: usize, bounds: f32, palette: Vec<Rgb>, size_range: (f32, f32)) -> Self {
        Self {
            count,
            bounds,
            palette,
            size_range,
            speed_range: (0.5, 1.5),
            distribution: Distribution::Uniform,
        }
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(FieldError::invalid("particle count must be positive"));
        }
        if self.count > MAX_PARTICLES {
            return Err(FieldError::invalid(format!(
                "particle count {} exceeds the limit of {MAX_PARTICLES}",
                self.count
            )));
        }
        if !(self.bounds.is_finite() && self.bounds > 0.0) {
            return Err(FieldError::invalid(format!(
                "bounds must be positive, got {}",
                self.bounds
            )));
        }
        if self.palette.is_empty() {
            return Err(FieldError::invalid("palette must not be empty"));
        }
        check_range("size_range", self.size_range)?;
        check_range("speed_range", self.speed_range)?;
        Ok(())
    }
}

fn check_range(name: &str, (min, max): (f32, f32)) -> Result<()> {
    if !(min.is_finite() && max.is_finite()) {
        return Err(FieldError::invalid(format!("{name} must be finite")));
    }
    if min <= 0.0 {
        return Err(FieldError::invalid(format!("{name} minimum must be positive")));
    }
    if min > max {
        return Err(FieldError::invalid(format!(
            "{name} minimum {min} exceeds maximum {max}"
        )));
    }
    Ok(())
}

/// Complete particle field configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    /// Particle count at density 1.0 and high quality
    pub base_count: u32,
    #[serde(alias = "particleDensity")]
    pub density: f32,
    pub quality: QualityTier,
    /// Explicit quality multiplier; overrides the tier's factor when set
    pub quality_factor: Option<f32>,
    /// Scales the default bounds
    pub scale: f32,
    /// Explicit bounds; overrides `scale` when set
    pub bounds: Option<f32>,
    pub palette: ColorScheme,
    pub size_range: (f32, f32),
    pub speed_range: (f32, f32),
    pub distribution: Distribution,
    pub style: FieldStyle,
    pub motion: MotionParams,
    /// Seed for a reproducible field; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            base_count: DEFAULT_BASE_COUNT,
            density: 1.0,
            quality: QualityTier::High,
            quality_factor: None,
            scale: 1.0,
            bounds: None,
            palette: ColorScheme::Brand,
            size_range: (0.5, 2.5),
            speed_range: (0.5, 1.5),
            distribution: Distribution::Uniform,
            style: FieldStyle::BASIC,
            motion: MotionParams::default(),
            seed: None,
        }
    }
}

impl FieldOptions {
    pub fn quality_factor(&self) -> f32 {
        self.quality_factor.unwrap_or(self.quality.factor())
    }

    /// `floor(base_count * density * quality_factor)`
    pub fn particle_count(&self) -> usize {
        let raw = self.raw_count();
        if !raw.is_finite() || raw <= 0.0 {
            return 0;
        }
        // absorbs the f32 rounding of density and factor, e.g. 0.7 * 1000 = 699.99998
        (raw * (1.0 + 2.0 * f32::EPSILON as f64)).floor() as usize
    }

    fn raw_count(&self) -> f64 {
        self.base_count as f64 * self.density as f64 * self.quality_factor() as f64
    }

    pub fn bounds(&self) -> f32 {
        self.bounds.unwrap_or(BASE_BOUNDS * self.scale)
    }

    /// Validate and produce the construction input
    pub fn resolve(&self) -> Result<FieldSetup> {
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(FieldError::invalid(format!(
                "density must be positive, got {}",
                self.density
            )));
        }
        if let Some(factor) = self.quality_factor {
            if !(factor.is_finite() && factor > 0.0 && factor <= 1.0) {
                return Err(FieldError::invalid(format!(
                    "quality_factor must be within (0, 1], got {factor}"
                )));
            }
        }
        self.motion.validate()?;
        if self.raw_count() > MAX_PARTICLES as f64 {
            return Err(FieldError::invalid(format!(
                "{} x {} particles exceeds the limit of {MAX_PARTICLES}",
                self.base_count, self.density
            )));
        }

        let setup = FieldSetup {
            count: self.particle_count(),
            bounds: self.bounds(),
            palette: self.palette.colors().iter().map(Color::to_rgb).collect(),
            size_range: self.size_range,
            speed_range: self.speed_range,
            distribution: self.distribution,
        };
        setup.validate()?;
        Ok(setup)
    }

    /// Copy of these options with `patch` applied
    pub fn merged(&self, patch: &FieldOptionsPatch) -> FieldOptions {
        let mut next = self.clone();
        if let Some(base_count) = patch.base_count {
            next.base_count = base_count;
        }
        if let Some(density) = patch.density {
            next.density = density;
        }
        if let Some(quality) = patch.quality {
            next.quality = quality;
            next.quality_factor = None;
        }
        if let Some(factor) = patch.quality_factor {
            next.quality_factor = Some(factor);
        }
        if let Some(scale) = patch.scale {
            next.scale = scale;
        }
        if let Some(bounds) = patch.bounds {
            next.bounds = Some(bounds);
        }
        if let Some(palette) = &patch.palette {
            next.palette = palette.clone();
        }
        if let Some(size_range) = patch.size_range {
            next.size_range = size_range;
        }
        if let Some(distribution) = patch.distribution {
            next.distribution = distribution;
        }
        if let Some(style) = patch.style {
            next.style = style;
        }
        if let Some(motion) = patch.motion {
            next.motion = motion;
        }
        if let Some(seed) = patch.seed {
            next.seed = Some(seed);
        }
        next
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        parse_toml(s)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

/// Partial update merged into [`FieldOptions`] on reconfiguration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptionsPatch {
    pub base_count: Option<u32>,
    #[serde(alias = "particleDensity")]
    pub density: Option<f32>,
    pub quality: Option<QualityTier>,
    /// Explicit quality multiplier; a patched tier clears any previous one
    pub quality_factor: Option<f32>,
    pub scale: Option<f32>,
    pub bounds: Option<f32>,
    pub palette: Option<ColorScheme>,
    pub size_range: Option<(f32, f32)>,
    pub distribution: Option<Distribution>,
    pub style: Option<FieldStyle>,
    pub motion: Option<MotionParams>,
    pub seed: Option<u64>,
}

impl FieldOptionsPatch {
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = Some(density);
        self
    }

    pub fn with_quality(mut self, quality: QualityTier) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_quality_factor(mut self, factor: f32) -> Self {
        self.quality_factor = Some(factor);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_bounds(mut self, bounds: f32) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_palette(mut self, palette: ColorScheme) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn with_style(mut self, style: FieldStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Options for the whole hero background
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroOptions {
    pub field: FieldOptions,
    pub fade: FadeConfig,
    /// Used when `field.style.floating_accent` is set
    pub accent: AccentParams,
    /// Lower the quality tier automatically on sustained low frame rates
    pub auto_quality: bool,
    pub target_fps: f32,
    /// Start hidden and wait for `show()`
    pub start_hidden: bool,
}

impl Default for HeroOptions {
    fn default() -> Self {
        Self {
            field: FieldOptions::default(),
            fade: FadeConfig::default(),
            accent: AccentParams::default(),
            auto_quality: true,
            target_fps: 60.0,
            start_hidden: false,
        }
    }
}

impl HeroOptions {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        parse_toml(s)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

fn parse_toml<T: DeserializeOwned>(s: &str) -> Result<T> {
    Ok(toml::from_str(s)?)
}
