use crate::mirror::{GlobalUniforms, ObjectUniforms, UniformMirror};
use crate::shaders;
use crate::texture::{self, GpuTexture, MipLevel};
use std::collections::{BTreeMap, HashMap};
use stilllife_common::ShapeKind;
use stilllife_geometry::{MeshData, Vertex};
use stilllife_render::{
    MeshBackend, RenderError, ShaderBackend, TextureBackend, TextureHandle, TextureUpload,
    UniformValue,
};
use wgpu::util::DeviceExt;

const INITIAL_DRAW_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Pick an adapter that can present to `surface` and open a device on it.
pub async fn request_device(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue), GpuError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .ok_or(GpuError::NoAdapter)?;

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("stilllife_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        )
        .await?;
    tracing::info!("GPU adapter: {}", adapter.get_info().name);
    Ok((adapter, device, queue))
}

/// Byte distance between consecutive per-draw blocks.
fn object_stride(alignment: u32) -> u64 {
    let size = std::mem::size_of::<ObjectUniforms>() as u64;
    let alignment = u64::from(alignment.max(1));
    size.div_ceil(alignment) * alignment
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// State captured when a draw is issued.
struct DrawCommand {
    shape: ShapeKind,
    object: ObjectUniforms,
    texture: Option<TextureHandle>,
}

/// wgpu implementation of the render backend traits.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_stride: u64,
    object_capacity: usize,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    fallback: GpuTexture,
    textures: HashMap<TextureHandle, GpuTexture>,
    units: BTreeMap<u32, TextureHandle>,
    next_handle: u32,
    meshes: HashMap<ShapeKind, GpuMesh>,
    mirror: UniformMirror,
    draws: Vec<DrawCommand>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuBackend {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let mirror = UniformMirror::default();

        // Group 0: camera and lights
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_buffer"),
            contents: bytemuck::bytes_of(&mirror.globals),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<GlobalUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        // Group 1: per-draw object block
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ObjectUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });
        let object_stride = object_stride(device.limits().min_uniform_buffer_offset_alignment);
        let (object_buffer, object_bind_group) =
            Self::create_object_buffer(&device, &object_layout, object_stride, INITIAL_DRAW_CAPACITY);

        // Group 2: object texture
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let sampler = texture::create_sampler(&device);
        let white = [MipLevel {
            width: 1,
            height: 1,
            pixels: vec![u8::MAX; 4],
        }];
        let fallback = GpuTexture::upload(
            &device,
            &queue,
            &texture_layout,
            &sampler,
            "fallback_white",
            &white,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("object_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &object_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("object_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::OBJECT_SHADER.into()),
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("object_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // The mug interior is seen through its open top.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let depth_texture = Self::create_depth_texture(&device, width, height);

        Self {
            device,
            queue,
            pipeline,
            globals_buffer,
            globals_bind_group,
            object_layout,
            object_buffer,
            object_bind_group,
            object_stride,
            object_capacity: INITIAL_DRAW_CAPACITY,
            texture_layout,
            sampler,
            fallback,
            textures: HashMap::new(),
            units: BTreeMap::new(),
            next_handle: 1,
            meshes: HashMap::new(),
            mirror,
            draws: Vec::new(),
            depth_texture,
            surface_format,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Draws recorded since the last frame was encoded.
    pub fn pending_draws(&self) -> usize {
        self.draws.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(&self.device, width, height);
    }

    /// Encode every pending draw into one pass over `target` and submit it.
    pub fn render_frame(&mut self, target: &wgpu::TextureView) {
        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&self.mirror.globals),
        );

        if self.draws.len() > self.object_capacity {
            let capacity = self.draws.len().next_power_of_two();
            let (buffer, bind_group) = Self::create_object_buffer(
                &self.device,
                &self.object_layout,
                self.object_stride,
                capacity,
            );
            self.object_buffer = buffer;
            self.object_bind_group = bind_group;
            self.object_capacity = capacity;
            tracing::debug!("object buffer grown to {capacity} draws");
        }

        let stride = self.object_stride as usize;
        if !self.draws.is_empty() {
            let mut staging = vec![0u8; stride * self.draws.len()];
            for (i, draw) in self.draws.iter().enumerate() {
                let bytes = bytemuck::bytes_of(&draw.object);
                staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
            }
            self.queue.write_buffer(&self.object_buffer, 0, &staging);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.15,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);

            for (i, draw) in self.draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(&draw.shape) else {
                    continue;
                };
                let texture = draw
                    .texture
                    .and_then(|handle| self.textures.get(&handle))
                    .unwrap_or(&self.fallback);

                pass.set_bind_group(1, &self.object_bind_group, &[(i * stride) as u32]);
                pass.set_bind_group(2, &texture.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.draws.clear();
    }

    fn create_object_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("object_buffer"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

impl ShaderBackend for WgpuBackend {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        if !self.mirror.set(name, value) {
            tracing::debug!("uniform {name} = {value} has no shader slot");
        }
    }
}

impl TextureBackend for WgpuBackend {
    fn create_texture(
        &mut self,
        label: &str,
        upload: &TextureUpload<'_>,
    ) -> Result<TextureHandle, RenderError> {
        let levels = texture::mip_chain(upload)?;
        let gpu = GpuTexture::upload(
            &self.device,
            &self.queue,
            &self.texture_layout,
            &self.sampler,
            label,
            &levels,
        );
        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        self.textures.insert(handle, gpu);
        tracing::debug!(
            "uploaded {label} as {handle}: {}x{} with {} mips",
            upload.width,
            upload.height,
            levels.len()
        );
        Ok(handle)
    }

    fn bind_texture_unit(&mut self, unit: u32, handle: TextureHandle) {
        self.units.insert(unit, handle);
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        if let Some(gpu) = self.textures.remove(&handle) {
            gpu.texture.destroy();
        }
        self.units.retain(|_, bound| *bound != handle);
    }
}

impl MeshBackend for WgpuBackend {
    fn load_mesh(&mut self, shape: ShapeKind, mesh: &MeshData) -> Result<(), RenderError> {
        if mesh.triangle_count() == 0 {
            return Err(RenderError::EmptyMesh(shape));
        }
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(shape.name()),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(shape.name()),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.meshes.insert(
            shape,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
            },
        );
        Ok(())
    }

    fn draw_mesh(&mut self, shape: ShapeKind) {
        if !self.meshes.contains_key(&shape) {
            tracing::warn!("draw of {shape} before its mesh was loaded");
            return;
        }
        let texture = if self.mirror.uses_texture() {
            self.units.get(&self.mirror.texture_unit).copied()
        } else {
            None
        };
        self.draws.push(DrawCommand {
            shape,
            object: self.mirror.object,
            texture,
        });
    }
}
