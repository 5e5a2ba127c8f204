use glam::Vec3;

// Shared scene/interaction tuning constants used by the core and the web frontend.

// Scene layout
pub const GLOBE_RADIUS: f32 = 1.6;
pub const ATMOSPHERE_RADIUS: f32 = 1.7;
pub const BOUNDARY_RADIUS: f32 = 1.72; // Karman line shell, outlined by the edge pass
pub const SPHERE_SEGMENTS: u32 = 64;
pub const STAR_COUNT: usize = 800;
pub const STARFIELD_RADIUS: f32 = 50.0;
pub const STARFIELD_SEED: u64 = 0x5EED_57A2;

// Camera
pub const CAMERA_Z: f32 = 7.0;
pub const CAMERA_FOV_DEG: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

// Colors (linear-ish sRGB triples as authored)
pub const GLOBE_BASE_COLOR: [f32; 3] = [4.0 / 255.0, 42.0 / 255.0, 107.0 / 255.0]; // #042a6b
pub const GLOBE_OPACITY: f32 = 0.9;
pub const ATMOSPHERE_INNER: [f32; 3] = [11.0 / 255.0, 85.0 / 255.0, 123.0 / 255.0]; // #0b557b
pub const ATMOSPHERE_OUTER: [f32; 3] = [105.0 / 255.0, 183.0 / 255.0, 1.0]; // #69b7ff
pub const ATMOSPHERE_INTENSITY: f32 = 0.1;
pub const BOUNDARY_INNER: [f32; 3] = [1.0 / 255.0, 51.0 / 255.0, 83.0 / 255.0]; // #013353
pub const BOUNDARY_OUTER: [f32; 3] = [75.0 / 255.0, 119.0 / 255.0, 191.0 / 255.0]; // #4b77bf
pub const BOUNDARY_INTENSITY: f32 = 1.5;
pub const EDGE_COLOR: [f32; 3] = [127.0 / 255.0, 209.0 / 255.0, 1.0]; // #7fd1ff
pub const EDGE_STRENGTH: f32 = 0.5;
pub const EDGE_GLOW: f32 = 2.0;
pub const EDGE_THICKNESS: f32 = 0.5;
pub const MARKER_COLOR: [f32; 3] = [1.0, 0.78, 0.25];
pub const CLEAR_COLOR: [f64; 3] = [0.0, 0.0, 0.0];

// Lighting
pub const LIGHT_DISTANCE: f32 = 100.0; // directional light sits this far from the origin
pub const SUN_INTENSITY: f32 = 1.5;
pub const SUN_COLOR: Vec3 = Vec3::ONE;
pub const AMBIENT_FLOOR: f32 = 0.15;
pub const AMBIENT_SPAN: f32 = 0.6;
pub const AXIAL_TILT_DEG: f64 = 23.44;
pub const EQUINOX_DAY: f64 = 81.0;
pub const DAYS_PER_YEAR: f64 = 365.0;
pub const SUN_REFRESH_INTERVAL_MS: i32 = 60_000;
pub const SUN_HELPER_LENGTH: f32 = 2.4;

// Interaction
pub const YAW_PER_PX: f32 = 0.005;
pub const PITCH_PER_PX: f32 = 0.005;
pub const STARFIELD_DRAG_DAMPING: f32 = 0.4; // 0.002 / 0.005 of the globe's drag response
pub const CLICK_SLOP_PX: f32 = 4.0;
pub const PITCH_EPSILON: f32 = 0.01;

// Autorotation: per-shell multipliers of `rotation_speed`
pub const GLOBE_SPIN_RATE: f32 = 1.0;
pub const STARFIELD_SPIN_RATE: f32 = 0.4;
pub const ATMOSPHERE_SPIN_RATE: f32 = 0.6;
pub const BOUNDARY_SPIN_RATE: f32 = 0.9; // slightly out of sync for shimmer

// Rotation-speed control
pub const DEFAULT_ROTATION_SPEED: f32 = 0.001;
pub const ROTATION_SPEED_MAX: f32 = 0.02;
pub const ROTATION_SPEED_STEP: f32 = 0.0005;

// Markers
pub const MARKER_RADIUS: f32 = 0.025;
pub const MARKER_ALTITUDE: f32 = 0.012; // lift above the surface so markers never z-fight
pub const MARKER_BASE_SCALE: f32 = 1.0;
pub const MARKER_PULSE_SCALE: f32 = 1.6;
pub const MARKER_PULSE_MS: i32 = 350;
pub const MARKER_SEGMENTS: u32 = 12;

// Frame timing
pub const FPS_WINDOW_MS: f64 = 500.0;
pub const FPS_KEEP: f32 = 0.6;
pub const FPS_SAMPLE_WEIGHT: f32 = 0.4;

// Base map
pub const PRIMARY_MAP_URL: &str = "/images/world_map.png";
pub const FALLBACK_MAP_URL: &str = "/images/world_map_modified.png";
pub const MIN_PLAUSIBLE_TEXTURE_PX: u32 = 4; // anything this small or smaller is a broken load
pub const DEEP_OCEAN_RGBA: [u8; 4] = [4, 42, 107, 255];
pub const MAX_ANISOTROPY: u16 = 16;
