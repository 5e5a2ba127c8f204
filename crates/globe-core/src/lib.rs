pub mod camera;
pub mod capabilities;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod geo;
pub mod interaction;
pub mod lifecycle;
pub mod markers;
pub mod mesh;
pub mod orientation;
pub mod resources;
pub mod scene;
pub mod selection;
pub mod solar;
pub mod texture;
pub mod timing;

pub static GLOBE_WGSL: &str = include_str!("../shaders/globe.wgsl");
pub static SHELL_WGSL: &str = include_str!("../shaders/shell.wgsl");
pub static STARS_WGSL: &str = include_str!("../shaders/stars.wgsl");
pub static MARKER_WGSL: &str = include_str!("../shaders/marker.wgsl");
pub static SUN_HELPER_WGSL: &str = include_str!("../shaders/sun_helper.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use camera::*;
pub use capabilities::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use geo::*;
pub use interaction::*;
pub use lifecycle::*;
pub use markers::*;
pub use mesh::*;
pub use orientation::*;
pub use resources::*;
pub use scene::*;
pub use selection::*;
pub use solar::*;
pub use texture::*;
pub use timing::*;
