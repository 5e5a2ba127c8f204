//! Orientation of the globe and of the shells that travel with it.
//!
//! Each rigid group carries its own explicit yaw/pitch. The scheduler and the
//! drag handler write these values directly; nothing relies on transform
//! inheritance, so every shell's pose can be inspected without a renderer.

use crate::constants::{
    ATMOSPHERE_SPIN_RATE, BOUNDARY_SPIN_RATE, GLOBE_SPIN_RATE, PITCH_EPSILON,
    STARFIELD_DRAG_DAMPING, STARFIELD_SPIN_RATE,
};
use glam::{Mat4, Quat, Vec3};

/// Largest absolute pitch the globe may reach before it would flip over a pole.
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - PITCH_EPSILON;

#[inline]
pub fn clamp_pitch(pitch: f32) -> f32 {
    if pitch.is_nan() {
        return 0.0;
    }
    pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT)
}

/// Yaw about +Y followed by pitch about +X.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrientationState {
    pub yaw: f32,
    pub pitch: f32,
}

impl OrientationState {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch: clamp_pitch(pitch),
        }
    }

    /// Rotation taking globe-local coordinates to world coordinates.
    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch) * Quat::from_rotation_y(self.yaw)
    }

    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation())
    }

    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.rotation() * local
    }

    #[inline]
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.rotation().inverse() * world
    }

    pub fn add(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = clamp_pitch(self.pitch + d_pitch);
    }
}

/// Poses for every rigid group in the scene.
///
/// The globe body and its markers share `globe`. The atmosphere and boundary
/// shells follow every drag delta exactly, but autorotate at their own rates so
/// they drift slightly against the surface; the starfield gets a damped share
/// of both for parallax.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupTransforms {
    pub globe: OrientationState,
    pub atmosphere: OrientationState,
    pub boundary: OrientationState,
    pub starfield: OrientationState,
}

impl GroupTransforms {
    /// Apply a user drag delta. Pitch is clamped per group.
    pub fn apply_drag(&mut self, d_yaw: f32, d_pitch: f32) {
        self.globe.add(d_yaw, d_pitch);
        self.atmosphere.add(d_yaw, d_pitch);
        self.boundary.add(d_yaw, d_pitch);
        self.starfield.add(
            d_yaw * STARFIELD_DRAG_DAMPING,
            d_pitch * STARFIELD_DRAG_DAMPING,
        );
        // Shells never tilt independently of the body.
        self.atmosphere.pitch = self.globe.pitch;
        self.boundary.pitch = self.globe.pitch;
    }

    /// Advance autorotation by one frame at `speed` radians per frame.
    pub fn autorotate(&mut self, speed: f32) {
        self.globe.yaw += speed * GLOBE_SPIN_RATE;
        self.starfield.yaw += speed * STARFIELD_SPIN_RATE;
        self.atmosphere.yaw += speed * ATMOSPHERE_SPIN_RATE;
        self.boundary.yaw += speed * BOUNDARY_SPIN_RATE;
    }
}
