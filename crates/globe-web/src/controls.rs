//! Host page controls: the rotation-speed slider, pause and debug toggles.
//! Each control is optional; a page without it simply loses that control.

use crate::constants::{DEBUG_TOGGLE_SELECTOR, PAUSE_TOGGLE_SELECTOR, SPEED_SLIDER_SELECTOR};
use crate::dom::{self, ListenerRegistry};
use crate::frame::now_utc;
use crate::overlay;
use crate::SharedEngine;
use globe_core::constants::{ROTATION_SPEED_MAX, ROTATION_SPEED_STEP};
use wasm_bindgen::JsCast;
use web_sys as web;

fn slider_value(input: &web::HtmlInputElement) -> f32 {
    let n = input.value_as_number();
    if n.is_finite() {
        n as f32
    } else {
        input.value().trim().parse().unwrap_or(f32::NAN)
    }
}

fn set_pressed(el: &web::Element, pressed: bool) {
    let _ = el.set_attribute("aria-pressed", if pressed { "true" } else { "false" });
}

pub fn wire_controls(
    document: &web::Document,
    engine: &SharedEngine,
    listeners: &mut ListenerRegistry,
) -> anyhow::Result<()> {
    match dom::query(document, SPEED_SLIDER_SELECTOR)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    {
        Some(slider) => wire_speed_slider(&slider, engine, listeners)?,
        None => log::info!("[controls] no rotation-speed slider on this page"),
    }

    if let Some(button) = dom::query(document, PAUSE_TOGGLE_SELECTOR) {
        set_pressed(&button, engine.borrow().config.paused);
        let engine = engine.clone();
        let target = button.clone();
        listeners.listen(button.as_ref(), "click", move |_| {
            if let Ok(mut eng) = engine.try_borrow_mut() {
                let paused = eng.toggle_pause();
                set_pressed(&target, paused);
                log::info!("[controls] paused={}", paused);
            }
        })?;
    }

    if let Some(button) = dom::query(document, DEBUG_TOGGLE_SELECTOR) {
        let visible = engine.borrow().config.debug_overlay_visible;
        set_pressed(&button, visible);
        overlay::set_visible(document, visible);
        let engine = engine.clone();
        let target = button.clone();
        let document = document.clone();
        listeners.listen(button.as_ref(), "click", move |_| {
            let Ok(mut eng) = engine.try_borrow_mut() else {
                return;
            };
            let visible = eng.toggle_debug();
            set_pressed(&target, visible);
            overlay::set_visible(&document, visible);
            if visible {
                overlay::render(&document, &eng.telemetry());
            }
        })?;
    }
    Ok(())
}

/// `input` events move the draft; `change` fires on release and commits it.
fn wire_speed_slider(
    slider: &web::HtmlInputElement,
    engine: &SharedEngine,
    listeners: &mut ListenerRegistry,
) -> anyhow::Result<()> {
    slider.set_min("0");
    slider.set_max(&ROTATION_SPEED_MAX.to_string());
    slider.set_step(&ROTATION_SPEED_STEP.to_string());
    slider.set_value(&engine.borrow().slider_draft().to_string());

    {
        let engine = engine.clone();
        let input = slider.clone();
        listeners.listen(slider.as_ref(), "input", move |_| {
            if let Ok(mut eng) = engine.try_borrow_mut() {
                eng.slider_input(slider_value(&input));
            }
        })?;
    }
    {
        let engine = engine.clone();
        let input = slider.clone();
        listeners.listen(slider.as_ref(), "change", move |_| {
            if let Ok(mut eng) = engine.try_borrow_mut() {
                let speed = eng.slider_commit(slider_value(&input), &now_utc());
                input.set_value(&speed.to_string());
                log::info!("[controls] rotation speed {:.4}", speed);
            }
        })?;
    }
    Ok(())
}
