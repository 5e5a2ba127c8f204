// Host-side tests for the solar illumination model.

use chrono::{TimeZone, Utc};
use globe_core::constants::{AMBIENT_FLOOR, AMBIENT_SPAN, LIGHT_DISTANCE};
use globe_core::*;

#[test]
fn equinox_noon_puts_sun_over_null_island() {
    let t = Utc.with_ymd_and_hms(2023, 3, 22, 12, 0, 0).unwrap();
    assert_eq!(day_of_year(&t), 81);
    let sub = subsolar_point(&t);
    assert!(sub.lat.abs() < 1e-9);
    assert!(sub.lng.abs() < 1e-9);

    let sun = sun_vector_local(&t);
    assert!((sun.x - 1.0).abs() < 1e-6);
    assert!(sun.y.abs() < 1e-6);
    assert!(sun.z.abs() < 1e-6);
}

#[test]
fn lighting_is_deterministic_for_fixed_instant() {
    let t = Utc.with_ymd_and_hms(2024, 7, 4, 9, 30, 15).unwrap();
    let o = OrientationState::default();
    let a = SolarLighting::compute(&t, &o);
    let b = SolarLighting::compute(&t, &o);
    assert_eq!(a, b);
}

#[test]
fn light_sits_at_fixed_distance_along_sun() {
    let t = Utc.with_ymd_and_hms(2024, 1, 15, 3, 0, 0).unwrap();
    let l = SolarLighting::compute(&t, &OrientationState::default());
    assert!((l.light_position.length() - LIGHT_DISTANCE).abs() < 1e-3);
    assert!((l.sun_dir.length() - 1.0).abs() < 1e-5);
    assert!((l.elevation() - l.sun_dir.y).abs() < 1e-5);
}

#[test]
fn summer_solstice_declination_near_tilt() {
    let t = Utc.with_ymd_and_hms(2023, 6, 21, 0, 0, 0).unwrap();
    let d = declination_deg(day_of_year(&t));
    assert!(d > 23.3 && d <= 23.44, "declination {}", d);
}

#[test]
fn subsolar_longitude_tracks_utc_hour() {
    assert!((subsolar_longitude_deg(0.0) + 180.0).abs() < 1e-9);
    assert!(subsolar_longitude_deg(12.0).abs() < 1e-9);
    assert!((subsolar_longitude_deg(18.0) - 90.0).abs() < 1e-9);
}

#[test]
fn ambient_stays_within_floor_and_ceiling() {
    let mut e = -1.0_f32;
    while e <= 1.0 {
        let a = ambient_for_elevation(e);
        assert!(a >= AMBIENT_FLOOR - 1e-6);
        assert!(a <= AMBIENT_FLOOR + AMBIENT_SPAN + 1e-6);
        e += 0.05;
    }
    assert!((ambient_for_elevation(-0.5) - 0.15).abs() < 1e-6);
    assert!((ambient_for_elevation(1.0) - 0.75).abs() < 1e-6);
}

#[test]
fn sun_follows_globe_yaw() {
    let t = Utc.with_ymd_and_hms(2023, 3, 22, 12, 0, 0).unwrap();
    let o = OrientationState::new(std::f32::consts::FRAC_PI_2, 0.0);
    let l = SolarLighting::compute(&t, &o);
    // Rotating +X a quarter turn about +Y lands on -Z.
    assert!(l.sun_dir.x.abs() < 1e-5);
    assert!((l.sun_dir.z + 1.0).abs() < 1e-5);
}

#[test]
fn shell_power_and_ambient_follow_sun_elevation() {
    let june = Utc.with_ymd_and_hms(2023, 6, 21, 12, 0, 0).unwrap();
    let pitched = OrientationState::new(0.4, 0.3);
    for o in [OrientationState::default(), pitched] {
        let l = SolarLighting::compute(&june, &o);
        assert_eq!(l.sun_power, l.sun_dir.y.max(0.0));
        let expected = AMBIENT_FLOOR + l.elevation().max(0.0) * AMBIENT_SPAN;
        assert!((l.ambient_intensity - expected).abs() < 1e-6);
    }

    let overhead = SolarLighting::compute(&june, &OrientationState::default());
    assert!(overhead.sun_dir.y > 0.39);
    assert!(overhead.sun_power > 0.39);
    assert!(overhead.ambient_intensity > AMBIENT_FLOOR + 0.2);
}

#[test]
fn sun_below_horizon_has_no_shell_power() {
    let december = Utc.with_ymd_and_hms(2023, 12, 21, 12, 0, 0).unwrap();
    let l = SolarLighting::compute(&december, &OrientationState::default());
    assert!(l.sun_dir.y < 0.0);
    assert_eq!(l.sun_power, 0.0);
    assert!((l.ambient_intensity - AMBIENT_FLOOR).abs() < 1e-6);
}
