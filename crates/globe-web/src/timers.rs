use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// A `setInterval` registration that owns its callback until cleared.
pub struct IntervalTimer {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl IntervalTimer {
    pub fn start(period_ms: i32, tick: impl FnMut() + 'static) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let callback = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                period_ms,
            )
            .map_err(|e| anyhow::anyhow!(format!("setInterval: {:?}", e)))?;
        Ok(Self {
            id,
            _callback: callback,
        })
    }

    /// Stop the timer and drop its callback.
    pub fn clear(self) -> Result<(), JsValue> {
        let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
        window.clear_interval_with_handle(self.id);
        Ok(())
    }
}

/// Run `f` once after `delay_ms`. The callback frees itself after it runs.
pub fn schedule_once(delay_ms: i32, f: impl FnOnce() + 'static) -> Result<i32, JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let callback = Closure::once_into_js(f);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms)
}
