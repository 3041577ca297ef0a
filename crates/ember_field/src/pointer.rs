//! Screen-to-world pointer projection
//!
//! The field is viewed by a fixed perspective camera on the +z axis looking
//! at the origin. A pointer in viewport pixels is turned into a ray from that
//! camera and intersected with the `z = 0` plane, which is where pointer
//! attraction is evaluated.

use ember_core::{Mat4, Vec2, Vec3};

/// Ray with a normalized direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersection with the plane `z = 0`, if the ray points toward it
    pub fn intersect_z_plane(&self) -> Option<Vec3> {
        if self.direction.z.abs() < 1e-6 {
            return None;
        }
        let t = -self.origin.z / self.direction.z;
        (t >= 0.0).then(|| self.point_at(t))
    }
}

/// Perspective camera for the hero scene plus pointer unprojection
#[derive(Clone, Debug)]
pub struct PointerProjector {
    /// Vertical field of view in degrees
    fov_deg: f32,
    camera_z: f32,
    near: f32,
    far: f32,
    viewport: Vec2,
}

impl PointerProjector {
    pub const DEFAULT_FOV_DEG: f32 = 75.0;
    pub const DEFAULT_CAMERA_Z: f32 = 100.0;

    pub fn new(width: f32, height: f32) -> Self {
        Self {
            fov_deg: Self::DEFAULT_FOV_DEG,
            camera_z: Self::DEFAULT_CAMERA_Z,
            near: 0.1,
            far: 1000.0,
            viewport: Vec2::new(width.max(1.0), height.max(1.0)),
        }
    }

    pub fn with_fov(mut self, fov_deg: f32) -> Self {
        self.fov_deg = fov_deg;
        self
    }

    pub fn with_camera_z(mut self, camera_z: f32) -> Self {
        self.camera_z = camera_z;
        self
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y
    }

    pub fn camera_position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.camera_z)
    }

    /// Pixel position to normalized device coordinates (y up)
    pub fn to_ndc(&self, px: f32, py: f32) -> Vec2 {
        Vec2::new(
            px / self.viewport.x * 2.0 - 1.0,
            -(py / self.viewport.y * 2.0 - 1.0),
        )
    }

    /// Ray from the camera through the pixel at `(px, py)`
    pub fn ray(&self, px: f32, py: f32) -> Ray {
        let ndc = self.to_ndc(px, py);
        let half_height = (self.fov_deg.to_radians() * 0.5).tan();
        let half_width = half_height * self.aspect();
        let direction = Vec3::new(ndc.x * half_width, ndc.y * half_height, -1.0);
        Ray::new(self.camera_position(), direction)
    }

    /// World-space point on the `z = 0` plane under the pointer
    pub fn project(&self, px: f32, py: f32) -> Vec3 {
        // camera always faces the plane, so the ray always hits it
        self.ray(px, py).intersect_z_plane().unwrap_or(Vec3::ZERO)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::translation(0.0, 0.0, -self.camera_z)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix().mul(&self.view_matrix())
    }
}
