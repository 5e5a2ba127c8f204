use crate::overlay;
use crate::{SharedEngine, SharedGpu};
use chrono::{DateTime, Utc};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Wall-clock UTC from the browser clock; drives the solar model.
pub fn now_utc() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

pub struct FrameContext {
    pub engine: SharedEngine,
    pub gpu: SharedGpu,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub start: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        let utc = now_utc();
        let Ok(mut engine) = self.engine.try_borrow_mut() else {
            return;
        };
        let Some(report) = engine.tick(now_ms, &utc) else {
            return;
        };
        if report.fps.is_some() && engine.config.debug_overlay_visible {
            overlay::render(&self.document, &engine.telemetry());
        }

        let Ok(mut slot) = self.gpu.try_borrow_mut() else {
            return;
        };
        let Some(gpu) = slot.as_mut() else {
            return;
        };
        gpu.resize_if_needed(self.canvas.width(), self.canvas.height());
        let selected = engine.selected_marker().map(|m| m.id);
        match gpu.render(&engine.scene, report.passes, selected) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(e) => log::error!("[gpu] frame error: {:?}", e),
        }
    }
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Handle to a running requestAnimationFrame loop.
pub struct AnimationLoop {
    pending: Rc<Cell<Option<i32>>>,
    tick: TickSlot,
}

fn request_frame(tick: &TickSlot) -> Option<i32> {
    let window = web::window()?;
    let slot = tick.borrow();
    let cb = slot.as_ref()?;
    window.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> AnimationLoop {
    let tick: TickSlot = Rc::new(RefCell::new(None));
    let pending = Rc::new(Cell::new(None));
    let tick_clone = tick.clone();
    let pending_tick = pending.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        pending_tick.set(None);
        frame_ctx.borrow_mut().frame();
        pending_tick.set(request_frame(&tick_clone));
    }) as Box<dyn FnMut()>));
    pending.set(request_frame(&tick));
    AnimationLoop { pending, tick }
}

impl AnimationLoop {
    /// Cancel the pending frame and drop the tick closure, which also breaks
    /// the closure's reference cycle.
    pub fn cancel(self) -> Result<(), JsValue> {
        let result = match (self.pending.take(), web::window()) {
            (Some(id), Some(window)) => window.cancel_animation_frame(id),
            (Some(_), None) => Err(JsValue::from_str("no window")),
            (None, _) => Ok(()),
        };
        self.tick.borrow_mut().take();
        result
    }
}
