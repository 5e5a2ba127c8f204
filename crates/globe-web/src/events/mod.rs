pub mod pointer;

pub use pointer::{wire_input_handlers, InputWiring};

use crate::dom::{self, ListenerRegistry};
use web_sys as web;

/// Keep the canvas backing store at CSS size times the device pixel ratio.
pub fn wire_resize(
    canvas: &web::HtmlCanvasElement,
    listeners: &mut ListenerRegistry,
) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    dom::sync_canvas_backing_size(canvas);
    let canvas = canvas.clone();
    listeners.listen(window.as_ref(), "resize", move |_| {
        dom::sync_canvas_backing_size(&canvas);
    })
}
