//! Pointer gestures: drag to orient the globe, click to select a marker.
//!
//! A gesture is a click only if the pointer never strays more than
//! `click_slop_px` from where it went down on either axis. Anything else is a
//! drag, and its pointer-up never selects.

use crate::constants::{CLICK_SLOP_PX, PITCH_PER_PX, YAW_PER_PX};
use crate::orientation::GroupTransforms;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSettings {
    pub yaw_per_px: f32,
    pub pitch_per_px: f32,
    pub click_slop_px: f32,
    pub pitch_enabled: bool,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            yaw_per_px: YAW_PER_PX,
            pitch_per_px: PITCH_PER_PX,
            click_slop_px: CLICK_SLOP_PX,
            pitch_enabled: true,
        }
    }
}

/// One pointer-down to pointer-up span.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionSession {
    pub down: Vec2,
    pub last: Vec2,
    pub moved: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PointerPhase {
    #[default]
    Idle,
    Dragging(InteractionSession),
}

/// What a pointer-up resolved to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEnd {
    /// Pointer barely moved: treat as a click at this canvas position.
    Click(Vec2),
    /// The gesture rotated the globe.
    Drag,
    /// Pointer-up without a matching pointer-down.
    Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct PointerMachine {
    pub settings: DragSettings,
    phase: PointerPhase,
}

impl PointerMachine {
    pub fn new(settings: DragSettings) -> Self {
        Self {
            settings,
            phase: PointerPhase::Idle,
        }
    }

    #[inline]
    pub fn phase(&self) -> PointerPhase {
        self.phase
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, PointerPhase::Dragging(_))
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.phase = PointerPhase::Dragging(InteractionSession {
            down: pos,
            last: pos,
            moved: false,
        });
    }

    /// Apply a pointer move. Returns the applied `(d_yaw, d_pitch)`, or `None`
    /// when no gesture is in progress.
    pub fn pointer_move(&mut self, pos: Vec2, groups: &mut GroupTransforms) -> Option<(f32, f32)> {
        let PointerPhase::Dragging(session) = &mut self.phase else {
            return None;
        };
        let delta = pos - session.last;
        session.last = pos;
        let total = pos - session.down;
        if total.x.abs() > self.settings.click_slop_px || total.y.abs() > self.settings.click_slop_px
        {
            session.moved = true;
        }
        let d_yaw = delta.x * self.settings.yaw_per_px;
        let d_pitch = if self.settings.pitch_enabled {
            delta.y * self.settings.pitch_per_px
        } else {
            0.0
        };
        groups.apply_drag(d_yaw, d_pitch);
        Some((d_yaw, d_pitch))
    }

    pub fn pointer_up(&mut self, pos: Vec2) -> GestureEnd {
        match std::mem::take(&mut self.phase) {
            PointerPhase::Idle => GestureEnd::Ignored,
            PointerPhase::Dragging(session) => {
                let total = pos - session.down;
                let strayed = total.x.abs() > self.settings.click_slop_px
                    || total.y.abs() > self.settings.click_slop_px;
                if session.moved || strayed {
                    GestureEnd::Drag
                } else {
                    GestureEnd::Click(pos)
                }
            }
        }
    }

    /// Abort the gesture (pointer-cancel, lost capture). Never a click.
    pub fn cancel(&mut self) -> bool {
        let was = self.is_dragging();
        self.phase = PointerPhase::Idle;
        was
    }
}
