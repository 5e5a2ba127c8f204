//! Base-map loading policy and CPU-side image preparation.
//!
//! Fetching happens in the web frontend; everything from the raw bytes up to
//! an upload-ready mip chain lives here so it can be exercised on the host.

use crate::capabilities::RendererCapabilities;
use crate::constants::{
    DEEP_OCEAN_RGBA, FALLBACK_MAP_URL, MIN_PLAUSIBLE_TEXTURE_PX, PRIMARY_MAP_URL,
};
use crate::error::TextureError;
use image::imageops::{self, FilterType};
use image::RgbaImage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapSource {
    Primary,
    Fallback,
}

impl MapSource {
    pub fn url(self) -> &'static str {
        match self {
            MapSource::Primary => PRIMARY_MAP_URL,
            MapSource::Fallback => FALLBACK_MAP_URL,
        }
    }
}

/// Yields the primary source, then the fallback, then nothing.
#[derive(Clone, Debug)]
pub struct FallbackChain {
    remaining: std::vec::IntoIter<MapSource>,
}

impl Default for FallbackChain {
    fn default() -> Self {
        Self {
            remaining: vec![MapSource::Primary, MapSource::Fallback].into_iter(),
        }
    }
}

impl Iterator for FallbackChain {
    type Item = MapSource;

    fn next(&mut self) -> Option<MapSource> {
        self.remaining.next()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureStatus {
    #[default]
    Pending,
    Loaded {
        width: u32,
        height: u32,
        source: MapSource,
    },
    Missing,
}

impl TextureStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, TextureStatus::Loaded { .. })
    }
}

/// Where texel row 0 lands in the renderer's UV space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UvOrigin {
    /// v = 0 samples the first image row (WebGPU convention).
    TopLeft,
    /// v = 0 samples the last image row (GL convention).
    BottomLeft,
}

/// An image ready for upload: level 0 first, each level half the previous.
#[derive(Clone, Debug)]
pub struct PreparedMap {
    pub source: MapSource,
    /// Dimensions as decoded, before any capability clamp.
    pub original_size: (u32, u32),
    pub levels: Vec<RgbaImage>,
}

impl PreparedMap {
    pub fn size(&self) -> (u32, u32) {
        self.levels
            .first()
            .map(|l| l.dimensions())
            .unwrap_or((0, 0))
    }
}

#[inline]
pub fn is_plausible(width: u32, height: u32) -> bool {
    width > MIN_PLAUSIBLE_TEXTURE_PX && height > MIN_PLAUSIBLE_TEXTURE_PX
}

/// Paint fully transparent texels deep-ocean blue so the atmosphere never
/// shows through holes in the map. Returns how many texels were filled.
pub fn fill_transparent(img: &mut RgbaImage) -> usize {
    let mut filled = 0;
    for px in img.pixels_mut() {
        if px.0[3] == 0 {
            px.0 = DEEP_OCEAN_RGBA;
            filled += 1;
        }
    }
    filled
}

pub fn normalize_orientation(img: &mut RgbaImage, origin: UvOrigin) {
    if origin == UvOrigin::BottomLeft {
        imageops::flip_vertical_in_place(img);
    }
}

/// Number of mip levels for a full chain down to 1x1.
#[inline]
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Downscale so neither side exceeds `max_dim`, keeping the aspect ratio.
pub fn fit_within(img: RgbaImage, max_dim: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w <= max_dim && h <= max_dim {
        return img;
    }
    let scale = max_dim as f64 / w.max(h) as f64;
    let nw = ((w as f64 * scale).floor() as u32).max(1);
    let nh = ((h as f64 * scale).floor() as u32).max(1);
    imageops::resize(&img, nw, nh, FilterType::Triangle)
}

pub fn build_mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let (w, h) = base.dimensions();
    let count = mip_level_count(w, h) as usize;
    let mut levels = Vec::with_capacity(count);
    levels.push(base);
    while levels.len() < count {
        let Some(prev) = levels.last() else { break };
        let (pw, ph) = prev.dimensions();
        let next = imageops::resize(prev, (pw / 2).max(1), (ph / 2).max(1), FilterType::Triangle);
        levels.push(next);
    }
    levels
}

/// Decode and prepare one candidate base map.
pub fn prepare_base_map(
    bytes: &[u8],
    source: MapSource,
    caps: &RendererCapabilities,
    origin: UvOrigin,
) -> Result<PreparedMap, TextureError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| TextureError::Decode {
        source_kind: source,
        reason: e.to_string(),
    })?;
    let mut img = decoded.to_rgba8();
    let (width, height) = img.dimensions();
    if !is_plausible(width, height) {
        return Err(TextureError::Implausible {
            source_kind: source,
            width,
            height,
        });
    }
    let filled = fill_transparent(&mut img);
    log::info!(
        "[texture] {:?} decoded {}x{}, filled {} transparent texels",
        source,
        width,
        height,
        filled
    );
    normalize_orientation(&mut img, origin);
    let img = fit_within(img, caps.max_texture_dimension);
    Ok(PreparedMap {
        source,
        original_size: (width, height),
        levels: build_mip_chain(img),
    })
}
