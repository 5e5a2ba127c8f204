// Host-side tests for render settings and the rotation-speed control.

use globe_core::constants::{DEFAULT_ROTATION_SPEED, ROTATION_SPEED_MAX};
use globe_core::*;

#[test]
fn defaults_match_the_control() {
    let c = RenderConfig::default();
    assert_eq!(c.rotation_speed, DEFAULT_ROTATION_SPEED);
    assert!(!c.paused);
    assert!(!c.debug_overlay_visible);
    assert_eq!(SpeedSlider::new(&c).draft(), DEFAULT_ROTATION_SPEED);
}

#[test]
fn commit_at_zero_pauses() {
    let mut c = RenderConfig::default();
    let mut s = SpeedSlider::new(&c);
    s.input(0.0, &mut c);
    assert!(c.paused);
    assert_eq!(s.commit(&mut c), 0.0);
    assert!(c.paused);
    assert_eq!(c.rotation_speed, 0.0);
}

#[test]
fn commit_above_zero_resumes() {
    let mut c = RenderConfig {
        paused: true,
        ..RenderConfig::default()
    };
    let mut s = SpeedSlider::new(&c);
    s.input(0.01, &mut c);
    let speed = s.commit(&mut c);
    assert!(!c.paused);
    assert!((speed - 0.01).abs() < 1e-6);
    assert!((c.rotation_speed - 0.01).abs() < 1e-6);
}

#[test]
fn dragging_slider_does_not_change_speed_until_commit() {
    let mut c = RenderConfig::default();
    let mut s = SpeedSlider::new(&c);
    s.input(0.015, &mut c);
    assert_eq!(c.rotation_speed, DEFAULT_ROTATION_SPEED);
    assert!(!c.paused);
    s.input(0.0, &mut c);
    assert!(c.paused);
    s.input(0.002, &mut c);
    assert!(!c.paused);
}

#[test]
fn quantize_snaps_and_clamps() {
    assert!((quantize_speed(0.5) - ROTATION_SPEED_MAX).abs() < 1e-6);
    assert_eq!(quantize_speed(-1.0), 0.0);
    assert_eq!(quantize_speed(f32::NAN), 0.0);
    assert!((quantize_speed(0.00126) - 0.0015).abs() < 1e-6);
}

#[test]
fn autorotation_needs_unpaused_and_idle_pointer() {
    let mut c = RenderConfig::default();
    assert!(c.autorotates(false));
    assert!(!c.autorotates(true));
    c.toggle_pause();
    assert!(!c.autorotates(false));
}
