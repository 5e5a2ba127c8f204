//! Process-wide render settings and the controls that mutate them.

use crate::constants::{DEFAULT_ROTATION_SPEED, ROTATION_SPEED_MAX, ROTATION_SPEED_STEP};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// Autorotation step in radians per frame.
    pub rotation_speed: f32,
    pub paused: bool,
    pub debug_overlay_visible: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rotation_speed: DEFAULT_ROTATION_SPEED,
            paused: false,
            debug_overlay_visible: false,
        }
    }
}

impl RenderConfig {
    /// Whether the scheduler should autorotate this frame.
    #[inline]
    pub fn autorotates(&self, dragging: bool) -> bool {
        !self.paused && !dragging
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.debug_overlay_visible = !self.debug_overlay_visible;
        self.debug_overlay_visible
    }
}

/// Snap a raw slider value to the control's range and step.
#[inline]
pub fn quantize_speed(value: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    let clamped = value.clamp(0.0, ROTATION_SPEED_MAX);
    (clamped / ROTATION_SPEED_STEP).round() * ROTATION_SPEED_STEP
}

/// Rotation-speed slider. The value being dragged is a draft; it becomes the
/// rotation speed only when the slider is released.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedSlider {
    draft: f32,
}

impl SpeedSlider {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            draft: config.rotation_speed,
        }
    }

    #[inline]
    pub fn draft(&self) -> f32 {
        self.draft
    }

    /// Slider moved. Zero pauses immediately, anything else un-pauses.
    pub fn input(&mut self, value: f32, config: &mut RenderConfig) {
        self.draft = quantize_speed(value);
        config.paused = self.draft <= 0.0;
    }

    /// Slider released: commit the draft. Returns the committed speed.
    pub fn commit(&mut self, config: &mut RenderConfig) -> f32 {
        config.rotation_speed = self.draft;
        config.paused = self.draft <= 0.0;
        self.draft
    }
}
