use crate::constants::{CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, CAMERA_Z};
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Right-handed perspective camera looking at the globe from +Z.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
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
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}

impl Camera {
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, aspect.max(1e-4), self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Compute a world-space ray through a pixel of a `viewport`-sized canvas.
    ///
    /// Returns `(ray_origin, ray_direction)`; the direction is normalized.
    pub fn screen_to_world_ray(&self, px: Vec2, viewport: Vec2) -> (Vec3, Vec3) {
        let ndc = pixel_to_ndc(px, viewport);
        let aspect = viewport.x / viewport.y.max(1.0);
        let inv = self.view_proj(aspect).inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let ro = self.eye;
        let rd = (p1 - ro).normalize();
        (ro, rd)
    }
}

/// Pixel coordinates (origin top-left) to normalized device coordinates.
#[inline]
pub fn pixel_to_ndc(px: Vec2, viewport: Vec2) -> Vec2 {
    let w = viewport.x.max(1.0);
    let h = viewport.y.max(1.0);
    Vec2::new((2.0 * px.x / w) - 1.0, 1.0 - (2.0 * px.y / h))
}

/// Nearest non-negative intersection distance of a ray with a sphere.
///
/// `ray_dir` must be normalized. A ray starting inside the sphere reports the
/// exit point.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let s = disc.sqrt();
    let t = -b - s;
    if t >= 0.0 {
        return Some(t);
    }
    let t_exit = -b + s;
    (t_exit >= 0.0).then_some(t_exit)
}
