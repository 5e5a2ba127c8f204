use crate::constants::{DEBUG_OVERLAY_ID, DEBUG_OVERLAY_TITLE};
use globe_core::DebugTelemetry;
use web_sys as web;

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(DEBUG_OVERLAY_ID) {
        let _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(DEBUG_OVERLAY_ID) {
        let _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn set_visible(document: &web::Document, visible: bool) {
    if visible {
        show(document);
    } else {
        hide(document);
    }
}

pub fn render(document: &web::Document, telemetry: &DebugTelemetry) {
    let Some(el) = document.get_element_by_id(DEBUG_OVERLAY_ID) else {
        return;
    };
    let mut html = format!("<strong>{}</strong>", DEBUG_OVERLAY_TITLE);
    for line in telemetry.lines() {
        html.push_str("<br>");
        html.push_str(&line);
    }
    el.set_inner_html(&html);
}
