// Host-side tests for the pointer gesture state machine.

use glam::Vec2;
use globe_core::constants::STARFIELD_DRAG_DAMPING;
use globe_core::*;

#[test]
fn short_press_is_a_click() {
    let mut m = PointerMachine::default();
    let mut g = GroupTransforms::default();
    m.pointer_down(Vec2::new(100.0, 100.0));
    m.pointer_move(Vec2::new(102.0, 101.0), &mut g);
    assert_eq!(
        m.pointer_up(Vec2::new(102.0, 101.0)),
        GestureEnd::Click(Vec2::new(102.0, 101.0))
    );
    assert!(!m.is_dragging());
}

#[test]
fn moving_past_slop_is_a_drag() {
    let mut m = PointerMachine::default();
    let mut g = GroupTransforms::default();
    m.pointer_down(Vec2::new(100.0, 100.0));
    m.pointer_move(Vec2::new(105.0, 100.0), &mut g);
    assert_eq!(m.pointer_up(Vec2::new(105.0, 100.0)), GestureEnd::Drag);
}

#[test]
fn returning_to_start_after_drag_is_still_a_drag() {
    let mut m = PointerMachine::default();
    let mut g = GroupTransforms::default();
    m.pointer_down(Vec2::new(0.0, 0.0));
    m.pointer_move(Vec2::new(0.0, 20.0), &mut g);
    m.pointer_move(Vec2::new(0.0, 0.0), &mut g);
    assert_eq!(m.pointer_up(Vec2::new(0.0, 0.0)), GestureEnd::Drag);
}

#[test]
fn release_far_from_press_without_moves_is_a_drag() {
    let mut m = PointerMachine::default();
    m.pointer_down(Vec2::new(0.0, 0.0));
    assert_eq!(m.pointer_up(Vec2::new(30.0, 0.0)), GestureEnd::Drag);
}

#[test]
fn up_without_down_is_ignored() {
    let mut m = PointerMachine::default();
    assert_eq!(m.pointer_up(Vec2::ZERO), GestureEnd::Ignored);
}

#[test]
fn cancel_never_clicks() {
    let mut m = PointerMachine::default();
    m.pointer_down(Vec2::new(10.0, 10.0));
    assert!(m.cancel());
    assert_eq!(m.pointer_up(Vec2::new(10.0, 10.0)), GestureEnd::Ignored);
    assert!(!m.cancel());
}

#[test]
fn move_without_gesture_does_nothing() {
    let mut m = PointerMachine::default();
    let mut g = GroupTransforms::default();
    assert!(m.pointer_move(Vec2::new(50.0, 50.0), &mut g).is_none());
    assert_eq!(g, GroupTransforms::default());
}

#[test]
fn pitch_is_clamped_for_any_drag() {
    let mut m = PointerMachine::default();
    let mut g = GroupTransforms::default();
    m.pointer_down(Vec2::ZERO);
    m.pointer_move(Vec2::new(0.0, 10_000.0), &mut g);
    assert!(g.globe.pitch <= PITCH_LIMIT);
    assert!((g.globe.pitch - PITCH_LIMIT).abs() < 1e-6);
    m.pointer_move(Vec2::new(0.0, -30_000.0), &mut g);
    assert!(g.globe.pitch >= -PITCH_LIMIT);
    assert_eq!(g.atmosphere.pitch, g.globe.pitch);
    assert_eq!(g.boundary.pitch, g.globe.pitch);
}

#[test]
fn drag_moves_shells_with_globe_and_damps_starfield() {
    let mut m = PointerMachine::default();
    let mut g = GroupTransforms::default();
    m.pointer_down(Vec2::ZERO);
    let (d_yaw, _) = m.pointer_move(Vec2::new(100.0, 0.0), &mut g).unwrap();
    assert!((d_yaw - 0.5).abs() < 1e-6);
    assert_eq!(g.atmosphere.yaw, g.globe.yaw);
    assert_eq!(g.boundary.yaw, g.globe.yaw);
    assert!((g.starfield.yaw - 0.5 * STARFIELD_DRAG_DAMPING).abs() < 1e-6);
}

#[test]
fn disabled_pitch_only_yaws() {
    let mut m = PointerMachine::new(DragSettings {
        pitch_enabled: false,
        ..DragSettings::default()
    });
    let mut g = GroupTransforms::default();
    m.pointer_down(Vec2::ZERO);
    m.pointer_move(Vec2::new(10.0, 40.0), &mut g);
    assert_eq!(g.globe.pitch, 0.0);
    assert!(g.globe.yaw > 0.0);
}

#[test]
fn nan_pitch_resets_to_level() {
    assert_eq!(clamp_pitch(f32::NAN), 0.0);
}
