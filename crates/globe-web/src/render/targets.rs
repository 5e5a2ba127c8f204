use super::helpers::{self, DEPTH_FORMAT, HDR_FORMAT, MASK_FORMAT};

/// Offscreen targets for the pass chain.
///
/// - `hdr_*` holds the lit scene from the base pass.
/// - `depth_*` is the base pass depth buffer.
/// - `mask_*` holds the boundary shell silhouette for the edge pass.
/// - `edge_*` is the outlined scene, read by the anti-aliasing pass.
pub(crate) struct RenderTargets {
    pub(crate) hdr_tex: wgpu::Texture,
    pub(crate) hdr_view: wgpu::TextureView,
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    pub(crate) mask_tex: wgpu::Texture,
    pub(crate) mask_view: wgpu::TextureView,
    pub(crate) edge_tex: wgpu::Texture,
    pub(crate) edge_view: wgpu::TextureView,
}

const SAMPLED_TARGET: wgpu::TextureUsages =
    wgpu::TextureUsages::RENDER_ATTACHMENT.union(wgpu::TextureUsages::TEXTURE_BINDING);

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (hdr_tex, hdr_view) = helpers::create_color_texture_device(
            device,
            "hdr_tex",
            width,
            height,
            HDR_FORMAT,
            SAMPLED_TARGET,
        );
        let (depth_tex, depth_view) = helpers::create_color_texture_device(
            device,
            "depth_tex",
            width,
            height,
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let (mask_tex, mask_view) = helpers::create_color_texture_device(
            device,
            "mask_tex",
            width,
            height,
            MASK_FORMAT,
            SAMPLED_TARGET,
        );
        let (edge_tex, edge_view) = helpers::create_color_texture_device(
            device,
            "edge_tex",
            width,
            height,
            HDR_FORMAT,
            SAMPLED_TARGET,
        );
        Self {
            hdr_tex,
            hdr_view,
            depth_tex,
            depth_view,
            mask_tex,
            mask_view,
            edge_tex,
            edge_view,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.destroy();
        *self = Self::new(device, width, height);
    }

    pub(crate) fn destroy(&self) {
        self.hdr_tex.destroy();
        self.depth_tex.destroy();
        self.mask_tex.destroy();
        self.edge_tex.destroy();
    }
}
