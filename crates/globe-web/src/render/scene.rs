//! Pipelines and buffers for the lit scene: starfield, globe, markers,
//! glow shells, sun helper and the boundary mask.

use super::helpers::{
    self, make_mesh_pipeline, mesh_vertex_layout, srgb_to_linear, MeshPipelineDesc, ADDITIVE,
    HDR_FORMAT, MASK_FORMAT,
};
use globe_core::constants::*;
use globe_core::{
    MarkerId, PreparedMap, RendererCapabilities, SceneGraph, ShellLook, SphereMesh, GLOBE_WGSL,
    MARKER_WGSL, SHELL_WGSL, STARS_WGSL, SUN_HELPER_WGSL,
};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    sun_dir: [f32; 4],   // w = light intensity
    sun_color: [f32; 4], // w = ambient intensity
    params: [f32; 4],    // x = sun power, y = map bound, z = helper length
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniforms {
    model: [[f32; 4]; 4],
    color_a: [f32; 4],
    color_b: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MarkerInstance {
    model: [[f32; 4]; 4],
    highlight: f32,
    _pad: [f32; 3],
}

const INSTANCE_ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    3 => Float32x4, 4 => Float32x4, 5 => Float32x4, 6 => Float32x4, 7 => Float32
];
const STAR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const MIN_INSTANCE_CAPACITY: usize = 16;

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn upload(device: &wgpu::Device, label: &str, mesh: &SphereMesh) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: mesh.index_count(),
        }
    }

    fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, instances: u32) {
        rpass.set_vertex_buffer(0, self.vertex.slice(..));
        rpass.set_index_buffer(self.index.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..instances);
    }

    fn destroy(&self) {
        self.vertex.destroy();
        self.index.destroy();
    }
}

/// A per-object uniform buffer and the bind group that exposes it.
struct ObjectSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ObjectSlot {
    fn new(device: &wgpu::Device, label: &str, layout: &wgpu::BindGroupLayout) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<ObjectUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn write(&self, queue: &wgpu::Queue, uniforms: ObjectUniforms) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&uniforms));
    }
}

/// Texture bound to the globe material plus its bind group. Swapped as a unit.
struct BaseMap {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

pub(crate) struct ScenePipelines {
    linear_colors: bool,
    map_format: wgpu::TextureFormat,

    map_bgl: wgpu::BindGroupLayout,
    map_sampler: wgpu::Sampler,
    map: BaseMap,
    map_bound: bool,

    globals_buffer: wgpu::Buffer,
    globals_bg: wgpu::BindGroup,

    globe_pipeline: wgpu::RenderPipeline,
    glow_pipeline: wgpu::RenderPipeline,
    mask_pipeline: wgpu::RenderPipeline,
    stars_pipeline: wgpu::RenderPipeline,
    marker_pipeline: wgpu::RenderPipeline,
    sun_pipeline: wgpu::RenderPipeline,

    globe_mesh: MeshBuffers,
    atmosphere_mesh: MeshBuffers,
    boundary_mesh: MeshBuffers,
    marker_mesh: MeshBuffers,
    star_buffer: wgpu::Buffer,
    star_count: u32,

    globe_obj: ObjectSlot,
    atmosphere_obj: ObjectSlot,
    boundary_obj: ObjectSlot,
    stars_obj: ObjectSlot,
    marker_obj: ObjectSlot,

    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
}

fn instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("marker_instances"),
        size: (capacity * std::mem::size_of::<MarkerInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn shader(device: &wgpu::Device, label: &str, source: &'static str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

fn pipeline_layout(
    device: &wgpu::Device,
    label: &str,
    groups: &[&wgpu::BindGroupLayout],
) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: groups,
        push_constant_ranges: &[],
    })
}

fn cols(m: Mat4) -> [[f32; 4]; 4] {
    m.to_cols_array_2d()
}

impl ScenePipelines {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &SceneGraph,
        caps: &RendererCapabilities,
    ) -> Self {
        let linear_colors = caps.srgb_surface;
        let map_format = if linear_colors {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };

        let globals_bgl = helpers::uniform_layout(device, "globals_bgl");
        let object_bgl = helpers::uniform_layout(device, "object_bgl");
        let map_bgl = helpers::texture_layout(device, "map_bgl");

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let map_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("map_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            anisotropy_clamp: caps.anisotropy_clamp(),
            ..Default::default()
        });
        let map = Self::placeholder_map(device, queue, &map_bgl, &map_sampler, map_format);

        let globe_sm = shader(device, "globe", GLOBE_WGSL);
        let shell_sm = shader(device, "shell", SHELL_WGSL);
        let stars_sm = shader(device, "stars", STARS_WGSL);
        let marker_sm = shader(device, "marker", MARKER_WGSL);
        let sun_sm = shader(device, "sun_helper", SUN_HELPER_WGSL);

        let pl_globe = pipeline_layout(device, "pl_globe", &[&globals_bgl, &object_bgl, &map_bgl]);
        let pl_object = pipeline_layout(device, "pl_object", &[&globals_bgl, &object_bgl]);
        let pl_sun = pipeline_layout(device, "pl_sun", &[&globals_bgl]);

        let mesh_layout = [mesh_vertex_layout()];
        let marker_layouts = [
            mesh_vertex_layout(),
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MarkerInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &INSTANCE_ATTRS,
            },
        ];
        let star_layout = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &STAR_ATTRS,
        }];

        let globe_pipeline = make_mesh_pipeline(
            device,
            MeshPipelineDesc {
                label: "globe",
                layout: &pl_globe,
                shader: &globe_sm,
                frag_entry: "fs_main",
                buffers: &mesh_layout,
                color_format: HDR_FORMAT,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_back: true,
                depth_write: Some(true),
            },
        );
        let glow_pipeline = make_mesh_pipeline(
            device,
            MeshPipelineDesc {
                label: "shell_glow",
                layout: &pl_object,
                shader: &shell_sm,
                frag_entry: "fs_glow",
                buffers: &mesh_layout,
                color_format: HDR_FORMAT,
                blend: Some(ADDITIVE),
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_back: true,
                depth_write: Some(false),
            },
        );
        let mask_pipeline = make_mesh_pipeline(
            device,
            MeshPipelineDesc {
                label: "shell_mask",
                layout: &pl_object,
                shader: &shell_sm,
                frag_entry: "fs_mask",
                buffers: &mesh_layout,
                color_format: MASK_FORMAT,
                blend: None,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_back: true,
                depth_write: None,
            },
        );
        let stars_pipeline = make_mesh_pipeline(
            device,
            MeshPipelineDesc {
                label: "stars",
                layout: &pl_object,
                shader: &stars_sm,
                frag_entry: "fs_main",
                buffers: &star_layout,
                color_format: HDR_FORMAT,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                topology: wgpu::PrimitiveTopology::PointList,
                cull_back: false,
                depth_write: Some(false),
            },
        );
        let marker_pipeline = make_mesh_pipeline(
            device,
            MeshPipelineDesc {
                label: "markers",
                layout: &pl_object,
                shader: &marker_sm,
                frag_entry: "fs_main",
                buffers: &marker_layouts,
                color_format: HDR_FORMAT,
                blend: None,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_back: true,
                depth_write: Some(true),
            },
        );
        let sun_pipeline = make_mesh_pipeline(
            device,
            MeshPipelineDesc {
                label: "sun_helper",
                layout: &pl_sun,
                shader: &sun_sm,
                frag_entry: "fs_main",
                buffers: &[],
                color_format: HDR_FORMAT,
                blend: None,
                topology: wgpu::PrimitiveTopology::LineList,
                cull_back: false,
                depth_write: Some(false),
            },
        );

        let globe_mesh = MeshBuffers::upload(
            device,
            "globe_mesh",
            &SphereMesh::uv_sphere(scene.globe.radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
        );
        let atmosphere_mesh = MeshBuffers::upload(
            device,
            "atmosphere_mesh",
            &SphereMesh::uv_sphere(scene.atmosphere.radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
        );
        let boundary_mesh = MeshBuffers::upload(
            device,
            "boundary_mesh",
            &SphereMesh::uv_sphere(scene.boundary.radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
        );
        let marker_mesh = MeshBuffers::upload(
            device,
            "marker_mesh",
            &SphereMesh::uv_sphere(MARKER_RADIUS, MARKER_SEGMENTS, MARKER_SEGMENTS),
        );
        let stars: Vec<[f32; 3]> = scene
            .starfield
            .positions
            .iter()
            .map(|p| p.to_array())
            .collect();
        let star_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("starfield"),
            contents: bytemuck::cast_slice(&stars),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            linear_colors,
            map_format,
            map_bgl,
            map_sampler,
            map,
            map_bound: false,
            globals_buffer,
            globals_bg,
            globe_pipeline,
            glow_pipeline,
            mask_pipeline,
            stars_pipeline,
            marker_pipeline,
            sun_pipeline,
            globe_mesh,
            atmosphere_mesh,
            boundary_mesh,
            marker_mesh,
            star_buffer,
            star_count: stars.len() as u32,
            globe_obj: ObjectSlot::new(device, "globe_obj", &object_bgl),
            atmosphere_obj: ObjectSlot::new(device, "atmosphere_obj", &object_bgl),
            boundary_obj: ObjectSlot::new(device, "boundary_obj", &object_bgl),
            stars_obj: ObjectSlot::new(device, "stars_obj", &object_bgl),
            marker_obj: ObjectSlot::new(device, "marker_obj", &object_bgl),
            instance_buffer: instance_buffer(device, MIN_INSTANCE_CAPACITY),
            instance_capacity: MIN_INSTANCE_CAPACITY,
            instance_count: 0,
        }
    }

    /// 1x1 white map so the globe bind group is valid before the real one
    /// arrives; `params.y` keeps the shader on the base color meanwhile.
    fn placeholder_map(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        format: wgpu::TextureFormat,
    ) -> BaseMap {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("map_placeholder"),
            size: wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[255, 255, 255, 255],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = helpers::texture_bind_group(device, "map_bg", layout, &view, sampler);
        BaseMap {
            texture,
            bind_group,
        }
    }

    /// Upload every mip level of a prepared map, then swap texture and bind
    /// group together. The old texture is destroyed only after the swap.
    pub(crate) fn install_map(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        map: &PreparedMap,
    ) {
        let (width, height) = map.size();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("base_map"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: map.levels.len().max(1) as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.map_format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        for (level, img) in map.levels.iter().enumerate() {
            let (w, h) = img.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                img.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * w),
                    rows_per_image: Some(h),
                },
                wgpu::Extent3d {
                    width: w,
                    height: h,
                    depth_or_array_layers: 1,
                },
            );
        }
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group =
            helpers::texture_bind_group(device, "map_bg", &self.map_bgl, &view, &self.map_sampler);
        let old = std::mem::replace(
            &mut self.map,
            BaseMap {
                texture,
                bind_group,
            },
        );
        old.texture.destroy();
        self.map_bound = true;
        log::info!(
            "[gpu] base map bound: {}x{}, {} mip levels",
            width,
            height,
            map.levels.len()
        );
    }

    fn color(&self, c: [f32; 3]) -> [f32; 3] {
        if self.linear_colors {
            c.map(srgb_to_linear)
        } else {
            c
        }
    }

    fn shell_uniforms(&self, model: Mat4, look: &ShellLook) -> ObjectUniforms {
        let inner = self.color(look.inner_color);
        let outer = self.color(look.outer_color);
        ObjectUniforms {
            model: cols(model),
            color_a: [inner[0], inner[1], inner[2], look.intensity],
            color_b: [outer[0], outer[1], outer[2], 0.0],
        }
    }

    /// Write per-frame uniforms and marker instances from the scene.
    pub(crate) fn update(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &SceneGraph,
        aspect: f32,
        selected: Option<MarkerId>,
    ) {
        let lighting = &scene.lighting;
        let sun_color = self.color(lighting.light_color.to_array());
        let globals = Globals {
            view_proj: cols(scene.camera.view_proj(aspect)),
            camera_pos: scene.camera.eye.extend(1.0).to_array(),
            sun_dir: lighting.sun_dir.extend(lighting.light_intensity).to_array(),
            sun_color: [
                sun_color[0],
                sun_color[1],
                sun_color[2],
                lighting.ambient_intensity,
            ],
            params: [
                lighting.sun_power,
                if self.map_bound { 1.0 } else { 0.0 },
                SUN_HELPER_LENGTH,
                0.0,
            ],
        };
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let t = &scene.transforms;
        let globe_model = t.globe.model_matrix();
        let base = self.color(scene.globe.base_color);
        self.globe_obj.write(
            queue,
            ObjectUniforms {
                model: cols(globe_model),
                color_a: [base[0], base[1], base[2], scene.globe.opacity],
                color_b: [0.0; 4],
            },
        );
        self.atmosphere_obj.write(
            queue,
            self.shell_uniforms(t.atmosphere.model_matrix(), &scene.atmosphere.look),
        );
        self.boundary_obj.write(
            queue,
            self.shell_uniforms(t.boundary.model_matrix(), &scene.boundary.look),
        );
        self.stars_obj.write(
            queue,
            ObjectUniforms {
                model: cols(t.starfield.model_matrix()),
                color_a: [1.0, 1.0, 1.0, 0.9],
                color_b: [0.0; 4],
            },
        );
        let marker = self.color(MARKER_COLOR);
        self.marker_obj.write(
            queue,
            ObjectUniforms {
                model: cols(globe_model),
                color_a: [marker[0], marker[1], marker[2], 1.0],
                color_b: [0.0; 4],
            },
        );

        let instances: Vec<MarkerInstance> = scene
            .markers
            .iter()
            .map(|m| MarkerInstance {
                model: cols(Mat4::from_scale_rotation_translation(
                    Vec3::splat(m.scale),
                    m.facing,
                    m.position,
                )),
                highlight: if selected == Some(m.id) { 1.0 } else { 0.0 },
                _pad: [0.0; 3],
            })
            .collect();
        if instances.len() > self.instance_capacity {
            self.instance_buffer.destroy();
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = instance_buffer(device, self.instance_capacity);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.instance_count = instances.len() as u32;
    }

    /// Stars, globe, markers, then the additive shells on top.
    pub(crate) fn draw_base(&self, rpass: &mut wgpu::RenderPass<'_>, sun_helper: bool) {
        rpass.set_bind_group(0, &self.globals_bg, &[]);

        rpass.set_pipeline(&self.stars_pipeline);
        rpass.set_bind_group(1, &self.stars_obj.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.star_buffer.slice(..));
        rpass.draw(0..self.star_count, 0..1);

        rpass.set_pipeline(&self.globe_pipeline);
        rpass.set_bind_group(1, &self.globe_obj.bind_group, &[]);
        rpass.set_bind_group(2, &self.map.bind_group, &[]);
        self.globe_mesh.draw(rpass, 1);

        if self.instance_count > 0 {
            rpass.set_pipeline(&self.marker_pipeline);
            rpass.set_bind_group(1, &self.marker_obj.bind_group, &[]);
            rpass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            self.marker_mesh.draw(rpass, self.instance_count);
        }

        rpass.set_pipeline(&self.glow_pipeline);
        rpass.set_bind_group(1, &self.atmosphere_obj.bind_group, &[]);
        self.atmosphere_mesh.draw(rpass, 1);
        rpass.set_bind_group(1, &self.boundary_obj.bind_group, &[]);
        self.boundary_mesh.draw(rpass, 1);

        if sun_helper {
            rpass.set_pipeline(&self.sun_pipeline);
            rpass.draw(0..2, 0..1);
        }
    }

    /// Boundary silhouette for the edge-highlight pass.
    pub(crate) fn draw_mask(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.mask_pipeline);
        rpass.set_bind_group(0, &self.globals_bg, &[]);
        rpass.set_bind_group(1, &self.boundary_obj.bind_group, &[]);
        self.boundary_mesh.draw(rpass, 1);
    }

    pub(crate) fn destroy(&self) {
        self.map.texture.destroy();
        self.globals_buffer.destroy();
        for mesh in [
            &self.globe_mesh,
            &self.atmosphere_mesh,
            &self.boundary_mesh,
            &self.marker_mesh,
        ] {
            mesh.destroy();
        }
        self.star_buffer.destroy();
        for slot in [
            &self.globe_obj,
            &self.atmosphere_obj,
            &self.boundary_obj,
            &self.stars_obj,
            &self.marker_obj,
        ] {
            slot.buffer.destroy();
        }
        self.instance_buffer.destroy();
    }
}
