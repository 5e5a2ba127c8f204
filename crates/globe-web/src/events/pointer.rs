use crate::dom::ListenerRegistry;
use crate::frame::now_utc;
use crate::input::{self, PulseRestore};
use crate::timers;
use crate::SharedEngine;
use globe_core::constants::MARKER_PULSE_MS;
use globe_core::MarkerId;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

const PULSE_RESTORE_RETRIES: u8 = 1;

pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub engine: SharedEngine,
}

/// Pointer position in CSS pixels relative to the canvas, and the canvas'
/// CSS size. Picking works in this space, independent of the backing size.
#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> (Vec2, Vec2) {
    let rect = canvas.get_bounding_client_rect();
    let pos = input::client_to_canvas(
        Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        Vec2::new(rect.left() as f32, rect.top() as f32),
    );
    (pos, input::viewport_size(rect.width(), rect.height()))
}

/// Restore a pulsed marker after `MARKER_PULSE_MS`. A restore that finds the
/// engine busy re-arms itself once before giving up.
fn schedule_pulse_end(engine: &SharedEngine, id: MarkerId, retries: u8) {
    let shared = engine.clone();
    let scheduled = timers::schedule_once(MARKER_PULSE_MS, move || {
        let busy = shared.try_borrow_mut().map(|mut eng| eng.end_pulse(id)).is_err();
        match input::pulse_restore_action(busy, retries) {
            PulseRestore::Restore => {}
            PulseRestore::Retry { remaining } => schedule_pulse_end(&shared, id, remaining),
            PulseRestore::Skip => log::warn!("[marker] pulse restore skipped: engine busy"),
        }
    });
    if let Err(e) = scheduled {
        log::warn!("[marker] could not schedule pulse restore: {:?}", e);
    }
}

/// Drag starts on the canvas; moves and releases are tracked on the window so
/// a drag that leaves the canvas still ends cleanly.
pub fn wire_input_handlers(w: &InputWiring, listeners: &mut ListenerRegistry) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;

    // pointerdown
    {
        let engine = w.engine.clone();
        let canvas = w.canvas.clone();
        listeners.listen(w.canvas.as_ref(), "pointerdown", move |ev| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            if ev.button() != 0 {
                return;
            }
            let (pos, _) = pointer_canvas_px(ev, &canvas);
            if let Ok(mut eng) = engine.try_borrow_mut() {
                eng.pointer_down(pos);
            }
            let _ = canvas.set_pointer_capture(ev.pointer_id());
            ev.prevent_default();
        })?;
    }

    // pointermove
    {
        let engine = w.engine.clone();
        let canvas = w.canvas.clone();
        listeners.listen(window.as_ref(), "pointermove", move |ev| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            let Ok(mut eng) = engine.try_borrow_mut() else {
                return;
            };
            if !eng.is_dragging() {
                return;
            }
            let (pos, _) = pointer_canvas_px(ev, &canvas);
            eng.pointer_move(pos);
        })?;
    }

    // pointerup
    {
        let engine = w.engine.clone();
        let canvas = w.canvas.clone();
        listeners.listen(window.as_ref(), "pointerup", move |ev| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            let (pos, viewport) = pointer_canvas_px(ev, &canvas);
            let hit = match engine.try_borrow_mut() {
                Ok(mut eng) => eng.pointer_up(pos, viewport, &now_utc()),
                Err(_) => return,
            };
            if let Some(hit) = hit {
                schedule_pulse_end(&engine, hit.id, PULSE_RESTORE_RETRIES);
            }
        })?;
    }

    // pointercancel
    {
        let engine = w.engine.clone();
        listeners.listen(window.as_ref(), "pointercancel", move |_| {
            if let Ok(mut eng) = engine.try_borrow_mut() {
                if eng.pointer_cancel() {
                    log::info!("[pointer] drag cancelled");
                }
            }
        })?;
    }

    Ok(())
}
