//! Renderer capability facts, resolved once when the GPU is initialized.

use crate::constants::MAX_ANISOTROPY;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anisotropy {
    Supported { max: u16 },
    Unsupported,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RendererCapabilities {
    pub anisotropy: Anisotropy,
    pub srgb_surface: bool,
    pub max_texture_dimension: u32,
}

impl Default for RendererCapabilities {
    /// Conservative facts matching the WebGPU baseline limits.
    fn default() -> Self {
        Self {
            anisotropy: Anisotropy::Supported { max: MAX_ANISOTROPY },
            srgb_surface: true,
            max_texture_dimension: 8192,
        }
    }
}

impl RendererCapabilities {
    /// Sampler anisotropy clamp to use. 1 disables anisotropic filtering.
    #[inline]
    pub fn anisotropy_clamp(&self) -> u16 {
        match self.anisotropy {
            Anisotropy::Supported { max } => max.clamp(1, MAX_ANISOTROPY),
            Anisotropy::Unsupported => 1,
        }
    }
}
