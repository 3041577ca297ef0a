//! Whole-field idle sway and scroll parallax

use ember_core::Mat4;

/// Rigid transform applied to the whole particle field
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldTransform {
    pub offset_y: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
}

impl FieldTransform {
    /// Vertical travel at full scroll progress
    pub const SCROLL_OFFSET: f32 = -50.0;
    /// Extra x rotation at full scroll progress
    pub const SCROLL_TILT: f32 = 0.5;

    /// Slow idle rotation at `time` seconds
    pub fn sway(time: f32) -> Self {
        Self {
            offset_y: 0.0,
            rotation_x: (time * 0.3).sin() * 0.2,
            rotation_y: (time * 0.2).cos() * 0.3,
        }
    }

    /// Apply scroll progress through the hero section, clamped to `[0, 1]`
    pub fn with_scroll(mut self, progress: f32) -> Self {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.offset_y = progress * Self::SCROLL_OFFSET;
        self.rotation_x += progress * Self::SCROLL_TILT;
        self
    }

    /// Translation, then x rotation, then y rotation (applied right to left)
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::translation(0.0, self.offset_y, 0.0)
            .mul(&Mat4::rotation_x(self.rotation_x))
            .mul(&Mat4::rotation_y(self.rotation_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Vec3;

    #[test]
    fn test_sway_at_zero() {
        let t = FieldTransform::sway(0.0);
        assert_eq!(t.rotation_x, 0.0);
        assert!((t.rotation_y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_scroll_offsets_and_tilts() {
        let t = FieldTransform::sway(0.0).with_scroll(0.5);
        assert_eq!(t.offset_y, -25.0);
        assert!((t.rotation_x - 0.25).abs() < 1e-6);

        let clamped = FieldTransform::default().with_scroll(3.0);
        assert_eq!(clamped.offset_y, -50.0);
        assert_eq!(FieldTransform::default().with_scroll(f32::NAN).offset_y, 0.0);
    }

    #[test]
    fn test_model_matrix_translates_origin() {
        let t = FieldTransform::sway(4.0).with_scroll(1.0);
        let origin = t.model_matrix().transform_point(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, -50.0, 0.0)).max_abs() < 1e-5);
    }
}
