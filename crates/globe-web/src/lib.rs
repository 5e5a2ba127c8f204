#![cfg(target_arch = "wasm32")]

mod constants;
mod controls;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;
mod texture;
mod timers;

use dom::ListenerRegistry;
use frame::{now_utc, AnimationLoop, FrameContext};
use globe_core::constants::SUN_REFRESH_INTERVAL_MS;
use globe_core::{GeoPoint, GlobeEngine, SelectionCallback, SubscriptionId};
use instant::Instant;
use render::GpuState;
use std::cell::RefCell;
use std::rc::Rc;
use timers::IntervalTimer;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

pub(crate) type SharedEngine = Rc<RefCell<GlobeEngine>>;
pub(crate) type SharedGpu = Rc<RefCell<Option<GpuState>>>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("globe-web loaded");
    Ok(())
}

/// Mount a globe on `<canvas id={canvas_id}>`. Rejects only when the canvas
/// or a GPU adapter is missing; asset failures degrade after mounting.
#[wasm_bindgen(js_name = mountGlobe)]
pub async fn mount_globe(canvas_id: String) -> Result<GlobeHandle, JsValue> {
    mount(&canvas_id).await.map_err(|e| {
        log::error!("[mount] {:?}", e);
        JsValue::from_str(&format!("{:#}", e))
    })
}

async fn mount(canvas_id: &str) -> anyhow::Result<GlobeHandle> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, canvas_id)?;
    dom::sync_canvas_backing_size(&canvas);

    let mut engine = GlobeEngine::default();
    let gpu_state = GpuState::new(&canvas, &engine.scene).await?;
    engine.capabilities = gpu_state.capabilities();
    engine.refresh_sun(&now_utc());
    let engine: SharedEngine = Rc::new(RefCell::new(engine));
    let gpu: SharedGpu = Rc::new(RefCell::new(Some(gpu_state)));

    let mut listeners = ListenerRegistry::new();
    if let Err(e) = wire_dom(&document, &canvas, &engine, &mut listeners) {
        if let Err(js) = listeners.remove_all() {
            log::warn!("[mount] listener cleanup: {:?}", js);
        }
        if let Some(g) = gpu.borrow_mut().take() {
            g.release();
        }
        return Err(e);
    }

    let sun_timer = {
        let engine = engine.clone();
        IntervalTimer::start(SUN_REFRESH_INTERVAL_MS, move || {
            if let Ok(mut eng) = engine.try_borrow_mut() {
                eng.refresh_sun(&now_utc());
            }
        })
    };
    let sun_timer = match sun_timer {
        Ok(t) => Some(t),
        Err(e) => {
            log::warn!("[mount] sun timer unavailable: {:?}", e);
            None
        }
    };

    let frame_ctx = Rc::new(RefCell::new(FrameContext {
        engine: engine.clone(),
        gpu: gpu.clone(),
        canvas: canvas.clone(),
        document,
        start: Instant::now(),
    }));
    let animation = frame::start_loop(frame_ctx);

    spawn_local(texture::load_base_map(engine.clone(), gpu.clone()));
    log::info!(
        "[mount] globe on #{} with {} listeners",
        canvas_id,
        listeners.len()
    );

    Ok(GlobeHandle {
        engine,
        gpu,
        runtime: Some(Runtime {
            animation,
            listeners,
            sun_timer,
        }),
    })
}

fn wire_dom(
    document: &web_sys::Document,
    canvas: &web_sys::HtmlCanvasElement,
    engine: &SharedEngine,
    listeners: &mut ListenerRegistry,
) -> anyhow::Result<()> {
    events::wire_resize(canvas, listeners)?;
    events::wire_input_handlers(
        &events::InputWiring {
            canvas: canvas.clone(),
            engine: engine.clone(),
        },
        listeners,
    )?;
    controls::wire_controls(document, engine, listeners)
}

/// Browser-side registrations that only `destroy` may release.
struct Runtime {
    animation: AnimationLoop,
    listeners: ListenerRegistry,
    sun_timer: Option<IntervalTimer>,
}

fn point_to_js(point: Option<GeoPoint>) -> JsValue {
    let Some(p) = point else {
        return JsValue::NULL;
    };
    let obj = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&obj, &"lat".into(), &p.lat.into());
    let _ = js_sys::Reflect::set(&obj, &"lng".into(), &p.lng.into());
    obj.into()
}

/// `null`/`undefined` read as `None`; anything else must deserialize as `T`.
fn from_js<T: serde::de::DeserializeOwned>(value: &JsValue) -> Result<Option<T>, String> {
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    #[allow(deprecated)]
    value.into_serde::<T>().map(Some).map_err(|e| e.to_string())
}

/// Host callbacks run on the next microtask so they never re-enter the
/// engine while it is borrowed.
fn deferred_call(f: &js_sys::Function, arg: JsValue) {
    let f = f.clone();
    spawn_local(async move {
        if let Err(e) = f.call1(&JsValue::NULL, &arg) {
            log::warn!("[marker] host callback threw: {:?}", e);
        }
    });
}

#[wasm_bindgen]
pub struct GlobeHandle {
    engine: SharedEngine,
    gpu: SharedGpu,
    runtime: Option<Runtime>,
}

impl GlobeHandle {
    fn with_engine<R>(&self, op: &str, f: impl FnOnce(&mut GlobeEngine) -> R) -> Option<R> {
        match self.engine.try_borrow_mut() {
            Ok(mut eng) => Some(f(&mut eng)),
            Err(_) => {
                log::warn!("[globe] {} ignored: engine busy", op);
                None
            }
        }
    }
}

#[wasm_bindgen]
impl GlobeHandle {
    /// Replace all markers. `null` clears them; invalid points are skipped.
    #[wasm_bindgen(js_name = setMarkers)]
    pub fn set_markers(&self, points: JsValue) {
        let points = match from_js::<Vec<GeoPoint>>(&points) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("[marker] setMarkers ignored: {}", e);
                return;
            }
        };
        self.with_engine("setMarkers", |eng| eng.set_markers(points.as_deref()));
    }

    #[wasm_bindgen(js_name = setSelectedPoint)]
    pub fn set_selected_point(&self, point: JsValue) {
        let point = match from_js::<GeoPoint>(&point) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("[marker] setSelectedPoint ignored: {}", e);
                return;
            }
        };
        self.with_engine("setSelectedPoint", |eng| eng.set_selected_point(point));
    }

    /// Replace the direct click callback; `null` removes it.
    #[wasm_bindgen(js_name = onMarkerClick)]
    pub fn on_marker_click(&self, callback: JsValue) {
        let callback: Option<SelectionCallback> = match callback.dyn_into::<js_sys::Function>() {
            Ok(f) => Some(Box::new(move |p: Option<GeoPoint>| {
                deferred_call(&f, point_to_js(p))
            })),
            Err(other) if other.is_null() || other.is_undefined() => None,
            Err(other) => {
                log::warn!("[marker] onMarkerClick expects a function, got {:?}", other);
                return;
            }
        };
        self.with_engine("onMarkerClick", |eng| eng.set_on_marker_click(callback));
    }

    /// Observe every marker selection. Returns the id for `unsubscribeSelection`.
    #[wasm_bindgen(js_name = subscribeSelection)]
    pub fn subscribe_selection(&self, callback: js_sys::Function) -> Option<u32> {
        self.with_engine("subscribeSelection", |eng| {
            eng.subscribe(Box::new(move |p: &GeoPoint| {
                deferred_call(&callback, point_to_js(Some(*p)))
            }))
            .raw()
        })
    }

    #[wasm_bindgen(js_name = unsubscribeSelection)]
    pub fn unsubscribe_selection(&self, id: u32) -> bool {
        self.with_engine("unsubscribeSelection", |eng| {
            eng.unsubscribe(SubscriptionId::from_raw(id))
        })
        .unwrap_or(false)
    }

    /// Stop rendering and release everything. Safe to call more than once.
    pub fn destroy(&mut self) {
        let Ok(mut engine) = self.engine.try_borrow_mut() else {
            log::error!("[teardown] engine busy; destroy skipped");
            return;
        };
        let Some(Runtime {
            animation,
            mut listeners,
            sun_timer,
        }) = self.runtime.take()
        else {
            return;
        };
        let gpu = self.gpu.clone();
        let report = engine.teardown(move |steps| {
            steps
                .step("animation_frame", move || {
                    animation.cancel().map_err(|e| anyhow::anyhow!("{:?}", e))
                })
                .step("listeners", move || {
                    let removed = listeners
                        .remove_all()
                        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                    log::info!("[teardown] removed {} listeners", removed);
                    Ok(())
                })
                .step("gpu", move || {
                    let state = gpu
                        .try_borrow_mut()
                        .map_err(|e| anyhow::anyhow!("gpu state busy: {}", e))?
                        .take();
                    if let Some(state) = state {
                        state.release();
                    }
                    Ok(())
                })
                .step("sun_timer", move || match sun_timer {
                    Some(t) => t.clear().map_err(|e| anyhow::anyhow!("{:?}", e)),
                    None => Ok(()),
                })
        });
        if let Some(report) = report {
            log::info!(
                "[teardown] {} steps completed, {} failed",
                report.completed.len(),
                report.failed.len()
            );
        }
    }
}
