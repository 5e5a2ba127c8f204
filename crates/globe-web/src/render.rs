mod helpers;
mod post;
mod scene;
mod targets;

use globe_core::constants::{
    CLEAR_COLOR, EDGE_COLOR, EDGE_GLOW, EDGE_STRENGTH, EDGE_THICKNESS, MAX_ANISOTROPY,
};
use globe_core::{
    Anisotropy, MarkerId, PreparedMap, RenderPass, RendererCapabilities, SceneGraph, POST_WGSL,
};
use post::{PostBindGroups, PostResources, PostUniforms};
use scene::ScenePipelines;
use targets::RenderTargets;
use web_sys as web;

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    capabilities: RendererCapabilities,

    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    post: PostResources,
    post_groups: PostBindGroups,
    scene: ScenePipelines,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement, scene: &SceneGraph) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {:?}", e))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let anisotropy = if adapter
            .get_downlevel_capabilities()
            .flags
            .contains(wgpu::DownlevelFlags::ANISOTROPIC_FILTERING)
        {
            Anisotropy::Supported {
                max: MAX_ANISOTROPY,
            }
        } else {
            Anisotropy::Unsupported
        };
        let capabilities = RendererCapabilities {
            anisotropy,
            srgb_surface: format.is_srgb(),
            max_texture_dimension: device.limits().max_texture_dimension_2d,
        };
        log::info!(
            "[gpu] surface {:?} {}x{}, capabilities {:?}",
            format,
            width,
            height,
            capabilities
        );

        let targets = RenderTargets::new(&device, width, height);
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post"),
            source: wgpu::ShaderSource::Wgsl(POST_WGSL.into()),
        });
        let post = post::create_post_resources(&device, &post_shader, format);
        let post_groups = PostBindGroups::new(&device, &post, &targets, &linear_sampler);
        let scene = ScenePipelines::new(&device, &queue, scene, &capabilities);

        let clear_color = wgpu::Color {
            r: CLEAR_COLOR[0],
            g: CLEAR_COLOR[1],
            b: CLEAR_COLOR[2],
            a: 1.0,
        };

        Ok(Self {
            surface,
            device,
            queue,
            config,
            capabilities,
            targets,
            linear_sampler,
            post,
            post_groups,
            scene,
            width,
            height,
            clear_color,
        })
    }

    #[inline]
    pub fn capabilities(&self) -> RendererCapabilities {
        self.capabilities
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.reconfigure();
            self.targets.recreate(&self.device, width, height);
            self.post_groups =
                PostBindGroups::new(&self.device, &self.post, &self.targets, &self.linear_sampler);
        }
    }

    /// Reapply the surface configuration after it was lost or outdated.
    pub fn reconfigure(&mut self) {
        self.config.width = self.width;
        self.config.height = self.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn upload_base_map(&mut self, map: &PreparedMap) {
        self.scene.install_map(&self.device, &self.queue, map);
    }

    pub fn render(
        &mut self,
        scene: &SceneGraph,
        passes: &[RenderPass],
        selected: Option<MarkerId>,
    ) -> Result<(), wgpu::SurfaceError> {
        let aspect = self.width as f32 / self.height.max(1) as f32;
        self.scene
            .update(&self.device, &self.queue, scene, aspect, selected);

        let edge = if self.capabilities.srgb_surface {
            EDGE_COLOR.map(helpers::srgb_to_linear)
        } else {
            EDGE_COLOR
        };
        let uniforms = PostUniforms {
            resolution: [self.width as f32, self.height as f32],
            thickness: EDGE_THICKNESS,
            strength: EDGE_STRENGTH,
            edge_color: [edge[0], edge[1], edge[2], EDGE_GLOW],
        };
        self.queue
            .write_buffer(&self.post.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        for pass in passes {
            match pass {
                RenderPass::Base => {
                    self.base_pass(&mut encoder, scene.sun_helper_visible);
                    self.mask_pass(&mut encoder);
                }
                RenderPass::EdgeHighlight => post::blit(
                    &mut encoder,
                    "edge_pass",
                    &self.targets.edge_view,
                    wgpu::Color::BLACK,
                    &self.post.edge_pipeline,
                    &self.post_groups.from_hdr,
                    Some(&self.post_groups.mask),
                ),
                RenderPass::AntiAlias => post::blit(
                    &mut encoder,
                    "fxaa_pass",
                    &view,
                    self.clear_color,
                    &self.post.fxaa_pipeline,
                    &self.post_groups.from_edge,
                    None,
                ),
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn base_pass(&self, encoder: &mut wgpu::CommandEncoder, sun_helper: bool) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("base_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.targets.hdr_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.targets.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        self.scene.draw_base(&mut rpass, sun_helper);
    }

    fn mask_pass(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("mask_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.targets.mask_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        self.scene.draw_mask(&mut rpass);
    }

    /// Destroy every GPU object this state owns. Consumes the state so it
    /// cannot run twice.
    pub fn release(self) {
        self.scene.destroy();
        self.targets.destroy();
        self.post.uniform_buffer.destroy();
        log::info!("[gpu] released");
    }
}
