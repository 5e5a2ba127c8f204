//! Geographic points and their projection onto the globe surface.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A respondent location in degrees.
///
/// Identity is by value: two points with equal `lat`/`lng` are the same point,
/// which is how the host and the engine agree on which marker is selected.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Copy of the point with `lat` clamped to [-90, 90] and `lng` to [-180, 180].
    pub fn clamped(self) -> Self {
        Self {
            lat: self.lat.clamp(-90.0, 90.0),
            lng: self.lng.clamp(-180.0, 180.0),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Project latitude/longitude (degrees) onto a sphere of `radius`.
///
/// Matches the equirectangular UV layout of the base map: longitude -180 sits on
/// the +X seam and latitude +90 on +Y.
#[inline]
pub fn lat_lng_to_vec3(lat: f64, lng: f64, radius: f32) -> Vec3 {
    let r = radius as f64;
    let phi = (90.0 - lat) * (std::f64::consts::PI / 180.0);
    let theta = (lng + 180.0) * (std::f64::consts::PI / 180.0);
    let x = -(r * phi.sin() * theta.cos());
    let z = r * phi.sin() * theta.sin();
    let y = r * phi.cos();
    Vec3::new(x as f32, y as f32, z as f32)
}

/// Inverse of [`lat_lng_to_vec3`] for a point on (or near) the sphere.
pub fn vec3_to_lat_lng(p: Vec3) -> GeoPoint {
    let len = p.length().max(f32::EPSILON) as f64;
    let phi = ((p.y as f64) / len).clamp(-1.0, 1.0).acos();
    let theta = (p.z as f64).atan2(-(p.x as f64));
    let lat = 90.0 - phi.to_degrees();
    let mut lng = theta.to_degrees() - 180.0;
    if lng < -180.0 {
        lng += 360.0;
    }
    GeoPoint { lat, lng }
}
