// Host-side tests for the frame scheduler, click selection and teardown.

use chrono::{TimeZone, Utc};
use glam::Vec2;
use globe_core::constants::{
    ATMOSPHERE_SPIN_RATE, BOUNDARY_SPIN_RATE, DEFAULT_ROTATION_SPEED, STARFIELD_SPIN_RATE,
};
use globe_core::*;
use std::cell::RefCell;
use std::rc::Rc;

const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);
const CENTER: Vec2 = Vec2::new(400.0, 300.0);

fn noon() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 3, 22, 12, 0, 0).unwrap()
}

fn engine_with_front_marker() -> GlobeEngine {
    let mut e = GlobeEngine::default();
    e.set_markers(Some(&[GeoPoint::new(0.0, -90.0), GeoPoint::new(0.0, 90.0)]));
    e
}

fn recorder(e: &mut GlobeEngine) -> Rc<RefCell<Vec<Option<GeoPoint>>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    e.set_on_marker_click(Some(Box::new(move |p: Option<GeoPoint>| sink.borrow_mut().push(p))));
    seen
}

#[test]
fn tick_autorotates_each_group_at_its_rate() {
    let mut e = GlobeEngine::default();
    let report = e.tick(0.0, &noon()).unwrap();
    assert!(report.autorotated);
    assert_eq!(report.passes, &RENDER_PASSES);
    let g = e.scene.transforms;
    assert!((g.globe.yaw - DEFAULT_ROTATION_SPEED).abs() < 1e-9);
    assert!((g.starfield.yaw - DEFAULT_ROTATION_SPEED * STARFIELD_SPIN_RATE).abs() < 1e-9);
    assert!((g.atmosphere.yaw - DEFAULT_ROTATION_SPEED * ATMOSPHERE_SPIN_RATE).abs() < 1e-9);
    assert!((g.boundary.yaw - DEFAULT_ROTATION_SPEED * BOUNDARY_SPIN_RATE).abs() < 1e-9);
}

#[test]
fn passes_run_base_edge_then_antialias() {
    assert_eq!(
        RENDER_PASSES,
        [
            RenderPass::Base,
            RenderPass::EdgeHighlight,
            RenderPass::AntiAlias
        ]
    );
}

#[test]
fn paused_or_dragging_suppresses_autorotation() {
    let mut e = GlobeEngine::default();
    e.toggle_pause();
    assert!(!e.tick(0.0, &noon()).unwrap().autorotated);
    assert_eq!(e.scene.transforms.globe.yaw, 0.0);

    e.toggle_pause();
    e.pointer_down(CENTER);
    assert!(!e.tick(16.0, &noon()).unwrap().autorotated);
    assert_eq!(e.scene.transforms.globe.yaw, 0.0);
}

#[test]
fn tick_refreshes_lighting() {
    let mut e = GlobeEngine::default();
    e.tick(0.0, &noon());
    let sun = e.scene.lighting.sun_dir;
    assert!(sun.x > 0.999);
    assert!((e.scene.lighting.ambient_intensity - 0.15).abs() < 1e-5);
}

#[test]
fn drag_release_relights_for_final_orientation() {
    let mut e = GlobeEngine::default();
    let t = noon();
    let before = e.refresh_sun(&t);
    e.pointer_down(Vec2::new(100.0, 100.0));
    e.pointer_move(Vec2::new(400.0, 100.0));
    assert!(e.pointer_up(Vec2::new(400.0, 100.0), VIEWPORT, &t).is_none());
    assert_eq!(
        e.scene.lighting,
        SolarLighting::compute(&t, &e.scene.transforms.globe)
    );
    assert_ne!(e.scene.lighting.sun_dir, before.sun_dir);
}

#[test]
fn release_without_drag_leaves_lighting_alone() {
    let mut e = GlobeEngine::default();
    let stale = e.scene.lighting;
    assert!(e.pointer_up(CENTER, VIEWPORT, &noon()).is_none());
    assert_eq!(e.scene.lighting, stale);
}

#[test]
fn click_on_marker_selects_once_and_pulses() {
    let mut e = engine_with_front_marker();
    let seen = recorder(&mut e);
    e.pointer_down(CENTER);
    let hit = e.pointer_up(CENTER + Vec2::new(2.0, 1.0), VIEWPORT, &noon()).unwrap();
    assert_eq!(hit.point, GeoPoint::new(0.0, -90.0));
    assert_eq!(*seen.borrow(), vec![Some(GeoPoint::new(0.0, -90.0))]);
    assert!(e.scene.markers.get(hit.id).unwrap().is_pulsing());

    assert!(e.end_pulse(hit.id));
    assert!(!e.scene.markers.get(hit.id).unwrap().is_pulsing());
}

#[test]
fn drag_over_marker_never_selects() {
    let mut e = engine_with_front_marker();
    let seen = recorder(&mut e);
    e.pointer_down(CENTER);
    e.pointer_move(CENTER + Vec2::new(6.0, 0.0));
    assert!(e.pointer_up(CENTER + Vec2::new(6.0, 0.0), VIEWPORT, &noon()).is_none());
    assert!(seen.borrow().is_empty());
}

#[test]
fn cancelled_gesture_never_selects() {
    let mut e = engine_with_front_marker();
    let seen = recorder(&mut e);
    e.pointer_down(CENTER);
    assert!(e.pointer_cancel());
    assert!(e.pointer_up(CENTER, VIEWPORT, &noon()).is_none());
    assert!(seen.borrow().is_empty());
}

#[test]
fn click_on_empty_space_is_silent() {
    let mut e = engine_with_front_marker();
    let seen = recorder(&mut e);
    e.pointer_down(Vec2::new(5.0, 5.0));
    assert!(e.pointer_up(Vec2::new(5.0, 5.0), VIEWPORT, &noon()).is_none());
    assert!(seen.borrow().is_empty());
}

#[test]
fn degenerate_viewport_is_no_hit() {
    let e = engine_with_front_marker();
    assert!(e.pick(CENTER, Vec2::ZERO).is_none());
}

#[test]
fn observers_receive_clicks_until_unsubscribed() {
    let mut e = engine_with_front_marker();
    let count = Rc::new(RefCell::new(0));
    let c = count.clone();
    let id = e.subscribe(Box::new(move |_: &GeoPoint| *c.borrow_mut() += 1));

    e.pointer_down(CENTER);
    e.pointer_up(CENTER, VIEWPORT, &noon());
    assert_eq!(*count.borrow(), 1);

    assert!(e.unsubscribe(id));
    assert!(!e.unsubscribe(id));
    e.pointer_down(CENTER);
    e.pointer_up(CENTER, VIEWPORT, &noon());
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn pulse_restore_after_rebuild_is_a_no_op() {
    let mut e = engine_with_front_marker();
    e.pointer_down(CENTER);
    let hit = e.pointer_up(CENTER, VIEWPORT, &noon()).unwrap();
    e.set_markers(Some(&[GeoPoint::new(0.0, -90.0)]));
    assert!(!e.end_pulse(hit.id));
}

#[test]
fn selected_marker_follows_host_point() {
    let mut e = engine_with_front_marker();
    assert!(e.selected_marker().is_none());
    assert!(e.set_selected_point(Some(GeoPoint::new(0.0, 90.0))));
    assert!(!e.set_selected_point(Some(GeoPoint::new(0.0, 90.0))));
    assert_eq!(
        e.selected_marker().unwrap().source,
        GeoPoint::new(0.0, 90.0)
    );
    e.set_selected_point(Some(GeoPoint::new(12.0, 12.0)));
    assert!(e.selected_marker().is_none());
    e.set_selected_point(None);
    assert!(e.selected_point().is_none());
}

#[test]
fn slider_commit_updates_speed_and_pause() {
    let mut e = GlobeEngine::default();
    assert_eq!(e.slider_commit(0.0, &noon()), 0.0);
    assert!(e.config.paused);
    let speed = e.slider_commit(0.01, &noon());
    assert!((speed - 0.01).abs() < 1e-6);
    assert!(!e.config.paused);
}

#[test]
fn debug_toggle_drives_sun_helper() {
    let mut e = GlobeEngine::default();
    assert!(e.toggle_debug());
    assert!(e.scene.sun_helper_visible);
    assert!(!e.toggle_debug());
    assert!(!e.scene.sun_helper_visible);
}

#[test]
fn texture_status_installs_map_on_load() {
    let mut e = GlobeEngine::default();
    assert_eq!(e.texture_status(), TextureStatus::Pending);
    e.set_texture_status(TextureStatus::Missing);
    assert!(!e.scene.is_textured());
    e.set_texture_status(TextureStatus::Loaded {
        width: 2048,
        height: 1024,
        source: MapSource::Fallback,
    });
    assert!(e.scene.is_textured());
    let lines = e.telemetry().lines();
    assert!(lines.iter().any(|l| l == "Image: 2048 x 1024"));
}

#[test]
fn telemetry_reports_speed_with_five_decimals() {
    let e = GlobeEngine::default();
    let lines = e.telemetry().lines();
    assert!(lines.iter().any(|l| l == "Rotation speed: 0.00100"));
    assert!(lines.iter().any(|l| l == "Paused: no"));
    assert!(lines.iter().any(|l| l == "Texture: pending"));
}

#[test]
fn teardown_releases_everything_once() {
    let mut e = engine_with_front_marker();
    e.set_texture_status(TextureStatus::Loaded {
        width: 8,
        height: 8,
        source: MapSource::Primary,
    });
    let report = e.teardown(|t| t).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.completed, vec!["pointer", "selection", "scene"]);
    assert_eq!(e.scene.ledger.live(), 0);
    assert!(e.is_torn_down());

    assert!(e.teardown(|t| t).is_none());
    assert!(e.tick(0.0, &noon()).is_none());
    assert_eq!(e.set_markers(Some(&[GeoPoint::new(0.0, 0.0)])).created, 0);
}

#[test]
fn teardown_runs_remaining_steps_after_a_failure() {
    let mut e = GlobeEngine::default();
    let ran = Rc::new(RefCell::new(false));
    let flag = ran.clone();
    let report = e
        .teardown(move |t| {
            t.step("listeners", || Err(anyhow::anyhow!("detached"))).step("timers", move || {
                *flag.borrow_mut() = true;
                Ok(())
            })
        })
        .unwrap();
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "listeners");
    assert!(report.completed.contains(&"timers"));
    assert!(*ran.borrow());
}
