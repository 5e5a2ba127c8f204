// Pure pointer geometry, kept free of web-sys so it can be tested on the host.

use glam::Vec2;

/// Pointer position in CSS pixels relative to the canvas' top-left corner.
#[inline]
pub fn client_to_canvas(client: Vec2, rect_origin: Vec2) -> Vec2 {
    client - rect_origin
}

/// Canvas size used for picking. Collapsed layouts report zero and yield no hit.
#[inline]
pub fn viewport_size(rect_width: f64, rect_height: f64) -> Vec2 {
    let w = if rect_width.is_finite() { rect_width.max(0.0) } else { 0.0 };
    let h = if rect_height.is_finite() { rect_height.max(0.0) } else { 0.0 };
    Vec2::new(w as f32, h as f32)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PulseRestore {
    Restore,
    Retry { remaining: u8 },
    Skip,
}

/// What a firing pulse timeout should do given whether the engine is free.
#[inline]
pub fn pulse_restore_action(engine_busy: bool, retries: u8) -> PulseRestore {
    match (engine_busy, retries) {
        (false, _) => PulseRestore::Restore,
        (true, 0) => PulseRestore::Skip,
        (true, n) => PulseRestore::Retry { remaining: n - 1 },
    }
}
