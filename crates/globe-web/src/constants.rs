// DOM hooks the host page provides for the globe's controls

pub const SPEED_SLIDER_SELECTOR: &str = "[aria-label=\"rotation-speed\"]";
pub const PAUSE_TOGGLE_SELECTOR: &str = "[aria-label=\"pause-toggle\"]";
pub const DEBUG_TOGGLE_SELECTOR: &str = "[aria-label=\"debug-toggle\"]";
pub const DEBUG_OVERLAY_ID: &str = "globe-debug";
pub const DEBUG_OVERLAY_TITLE: &str = "Globe debug";
