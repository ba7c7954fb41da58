use crate::constants::*;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Ease the eye toward a pointer offset, keeping the target fixed.
    ///
    /// `ndc` is the pointer in normalized device coordinates (`-1..=1`, +y up).
    pub fn follow_pointer(&mut self, ndc: Vec2) {
        let goal = Vec2::new(ndc.x, -ndc.y) * CAMERA_POINTER_TRAVEL;
        self.eye.x += (goal.x - self.eye.x) * CAMERA_EASE;
        self.eye.y += (goal.y - self.eye.y) * CAMERA_EASE;
    }

    /// Intersect the pointer ray with the world plane `z = 0`.
    pub fn pointer_to_plane(&self, ndc: Vec2) -> Option<Vec3> {
        let inv = self.view_proj().inverse();
        let p_near = inv * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        if p_near.w.abs() < f32::EPSILON || p_far.w.abs() < f32::EPSILON {
            return None;
        }
        let near: Vec3 = p_near.truncate() / p_near.w;
        let far: Vec3 = p_far.truncate() / p_far.w;
        let dir = far - near;
        if dir.z.abs() < 1e-6 {
            return None;
        }
        let t = -near.z / dir.z;
        (t >= 0.0).then(|| near + dir * t)
    }
}
