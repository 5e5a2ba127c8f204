//! Solar illumination from wall-clock UTC time.
//!
//! A first-order subsolar point (no equation of time, circular orbit) is good
//! enough to put the terminator in the right place on a world map.

use crate::constants::{
    AMBIENT_FLOOR, AMBIENT_SPAN, AXIAL_TILT_DEG, DAYS_PER_YEAR, EQUINOX_DAY, LIGHT_DISTANCE,
    SUN_COLOR, SUN_INTENSITY,
};
use crate::geo::GeoPoint;
use crate::orientation::OrientationState;
use chrono::{DateTime, Datelike, Timelike, Utc};
use glam::{DVec3, Vec3};

/// Fractional UTC hour of day (hours + minutes/60 + seconds/3600).
#[inline]
pub fn utc_hours(t: &DateTime<Utc>) -> f64 {
    t.hour() as f64 + t.minute() as f64 / 60.0 + t.second() as f64 / 3600.0
}

/// Ordinal day of the year, 1 for Jan 1.
#[inline]
pub fn day_of_year(t: &DateTime<Utc>) -> u32 {
    t.ordinal()
}

/// Solar declination in degrees for an ordinal day.
#[inline]
pub fn declination_deg(day_of_year: u32) -> f64 {
    AXIAL_TILT_DEG
        * ((2.0 * std::f64::consts::PI / DAYS_PER_YEAR) * (day_of_year as f64 - EQUINOX_DAY)).sin()
}

/// Longitude (degrees) where the sun is overhead; 0 at 12:00 UTC.
#[inline]
pub fn subsolar_longitude_deg(utc_hours: f64) -> f64 {
    (utc_hours / 24.0) * 360.0 - 180.0
}

pub fn subsolar_point(t: &DateTime<Utc>) -> GeoPoint {
    GeoPoint {
        lat: declination_deg(day_of_year(t)),
        lng: subsolar_longitude_deg(utc_hours(t)),
    }
}

/// Unit sun direction in the globe's unrotated frame.
pub fn sun_vector_local(t: &DateTime<Utc>) -> Vec3 {
    let p = subsolar_point(t);
    let lat = p.lat.to_radians();
    let lon = p.lng.to_radians();
    let v = DVec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin()).normalize();
    v.as_vec3()
}

/// Rotate a local sun vector by the globe orientation so the lit hemisphere
/// stays fixed to the map while the user spins the globe.
#[inline]
pub fn rotate_for_orientation(sun_local: Vec3, orientation: &OrientationState) -> Vec3 {
    orientation.to_world(sun_local).normalize()
}

/// Ambient intensity for a sun elevation in [-1, 1]. Never below the floor so
/// the night side stays readable.
#[inline]
pub fn ambient_for_elevation(elevation: f32) -> f32 {
    AMBIENT_FLOOR + elevation.clamp(0.0, 1.0) * AMBIENT_SPAN
}

/// All lighting values derived for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolarLighting {
    pub subsolar: GeoPoint,
    /// World-space unit vector toward the sun.
    pub sun_dir: Vec3,
    /// Directional light position; always `sun_dir * LIGHT_DISTANCE`, aimed at the origin.
    pub light_position: Vec3,
    pub light_color: Vec3,
    pub light_intensity: f32,
    pub ambient_intensity: f32,
    /// Fresnel/glow scaling for the atmosphere and boundary shells.
    pub sun_power: f32,
}

impl SolarLighting {
    pub fn compute(t: &DateTime<Utc>, orientation: &OrientationState) -> Self {
        let local = sun_vector_local(t);
        let sun_dir = rotate_for_orientation(local, orientation);
        let light_position = sun_dir * LIGHT_DISTANCE;
        let elevation = light_position.y / LIGHT_DISTANCE;
        Self {
            subsolar: subsolar_point(t),
            sun_dir,
            light_position,
            light_color: SUN_COLOR,
            light_intensity: SUN_INTENSITY,
            ambient_intensity: ambient_for_elevation(elevation),
            sun_power: sun_dir.y.max(0.0),
        }
    }

    /// Sun elevation in [-1, 1] as seen from the light placement.
    #[inline]
    pub fn elevation(&self) -> f32 {
        self.light_position.y / LIGHT_DISTANCE
    }
}

impl Default for SolarLighting {
    fn default() -> Self {
        let sun_dir = Vec3::new(1.0, 1.0, 1.0).normalize();
        Self {
            subsolar: GeoPoint::new(0.0, 0.0),
            sun_dir,
            light_position: sun_dir * LIGHT_DISTANCE,
            light_color: SUN_COLOR,
            light_intensity: SUN_INTENSITY,
            ambient_intensity: ambient_for_elevation(sun_dir.y),
            sun_power: 1.0,
        }
    }
}
