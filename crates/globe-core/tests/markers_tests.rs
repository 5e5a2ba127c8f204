// Host-side tests for marker construction, picking and pulses.

use glam::Vec3;
use globe_core::constants::{
    CAMERA_Z, GLOBE_RADIUS, MARKER_ALTITUDE, MARKER_BASE_SCALE, MARKER_PULSE_SCALE, MARKER_RADIUS,
};
use globe_core::*;

fn points() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(51.5, -0.12),
        GeoPoint::new(-33.9, 151.2),
        GeoPoint::new(0.0, -90.0),
    ]
}

#[test]
fn rebuild_is_idempotent_and_releases_previous_resources() {
    let mut ledger = ResourceLedger::new();
    let mut set = MarkerSet::new();

    let first = set.rebuild(Some(&points()), &mut ledger);
    assert_eq!(first.created, 3);
    assert_eq!(first.released, 0);
    let positions: Vec<Vec3> = set.iter().map(|m| m.position).collect();

    let second = set.rebuild(Some(&points()), &mut ledger);
    assert_eq!(second.created, 3);
    // Geometry and material per marker.
    assert_eq!(second.released, 6);
    let again: Vec<Vec3> = set.iter().map(|m| m.position).collect();
    assert_eq!(positions, again);
    assert_eq!(ledger.live(), 6);
}

#[test]
fn rebuild_with_none_or_empty_clears() {
    let mut ledger = ResourceLedger::new();
    let mut set = MarkerSet::new();
    set.rebuild(Some(&points()), &mut ledger);

    let report = set.rebuild(None, &mut ledger);
    assert_eq!(report.created, 0);
    assert!(set.is_empty());
    assert_eq!(ledger.live(), 0);

    set.rebuild(Some(&points()), &mut ledger);
    set.rebuild(Some(&[]), &mut ledger);
    assert!(set.is_empty());
    assert_eq!(ledger.live(), 0);
}

#[test]
fn non_finite_points_are_skipped() {
    let mut ledger = ResourceLedger::new();
    let mut set = MarkerSet::new();
    let pts = vec![GeoPoint::new(f64::NAN, 0.0), GeoPoint::new(10.0, 10.0)];
    let report = set.rebuild(Some(&pts), &mut ledger);
    assert_eq!(report.created, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(set.len(), 1);
}

#[test]
fn markers_sit_just_above_the_surface() {
    let mut ledger = ResourceLedger::new();
    let mut set = MarkerSet::new();
    set.rebuild(Some(&points()), &mut ledger);
    for m in set.iter() {
        assert!((m.position.length() - (GLOBE_RADIUS + MARKER_ALTITUDE)).abs() < 1e-4);
        // Facing turns +Z onto the outward normal.
        let out = m.facing * Vec3::Z;
        assert!(out.dot(m.position.normalize()) > 0.999);
    }
}

#[test]
fn pulse_enlarges_then_restores() {
    let mut ledger = ResourceLedger::new();
    let mut set = MarkerSet::new();
    set.rebuild(Some(&points()), &mut ledger);
    let id = set.iter().next().unwrap().id;

    assert!(set.begin_pulse(id));
    let m = set.get(id).unwrap();
    assert!(m.is_pulsing());
    assert!((m.scale - MARKER_BASE_SCALE * MARKER_PULSE_SCALE).abs() < 1e-6);

    assert!(set.end_pulse(id));
    assert_eq!(set.get(id).unwrap().scale, MARKER_BASE_SCALE);
}

#[test]
fn stale_ids_do_not_resolve_after_rebuild() {
    let mut ledger = ResourceLedger::new();
    let mut set = MarkerSet::new();
    set.rebuild(Some(&points()), &mut ledger);
    let id = set.iter().next().unwrap().id;

    set.rebuild(Some(&points()), &mut ledger);
    assert!(set.get(id).is_none());
    assert!(!set.begin_pulse(id));
    assert!(!set.end_pulse(id));
}

#[test]
fn pick_hits_marker_facing_the_camera() {
    let mut ledger = ResourceLedger::new();
    let mut set = MarkerSet::new();
    set.rebuild(Some(&[GeoPoint::new(0.0, -90.0)]), &mut ledger);

    let origin = Vec3::new(0.0, 0.0, CAMERA_Z);
    let hit = set.pick_local(origin, -Vec3::Z).unwrap();
    assert_eq!(hit.point, GeoPoint::new(0.0, -90.0));
    let expected = CAMERA_Z - (GLOBE_RADIUS + MARKER_ALTITUDE + MARKER_RADIUS);
    assert!((hit.distance - expected).abs() < 1e-3);
}

#[test]
fn pick_ignores_markers_behind_the_globe() {
    let mut ledger = ResourceLedger::new();
    let mut set = MarkerSet::new();
    set.rebuild(Some(&[GeoPoint::new(0.0, 90.0)]), &mut ledger);

    let origin = Vec3::new(0.0, 0.0, CAMERA_Z);
    assert!(set.pick_local(origin, -Vec3::Z).is_none());
}

#[test]
fn pick_misses_empty_sky_and_empty_sets() {
    let mut ledger = ResourceLedger::new();
    let mut set = MarkerSet::new();
    let origin = Vec3::new(0.0, 0.0, CAMERA_Z);
    assert!(set.pick_local(origin, -Vec3::Z).is_none());

    set.rebuild(Some(&points()), &mut ledger);
    assert!(set.pick_local(origin, Vec3::Y).is_none());
    assert!(set.pick_local(origin, Vec3::ZERO).is_none());
}

#[test]
fn find_by_point_uses_value_equality() {
    let mut ledger = ResourceLedger::new();
    let mut set = MarkerSet::new();
    set.rebuild(Some(&points()), &mut ledger);
    let found = set.find_by_point(&GeoPoint::new(-33.9, 151.2)).unwrap();
    assert_eq!(found.id.index, 1);
    assert!(set.find_by_point(&GeoPoint::new(1.0, 1.0)).is_none());
}
