use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline, Surface, SurfaceConfiguration, TextureView};
use winit::window::Window;

use super::context::GpuContext;
use crate::camera::PerspectiveCamera;
use crate::core::Viewport;
use crate::math::hex_to_linear;
use crate::scene::{MeshNode, SceneGraph, Side};
use crate::texture::TextureImage;
use crate::traits::SceneRenderer;
use crate::types::{CameraUniform, ObjectUniform, Vertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertex, index and per-object uniform buffers of one mesh
struct GpuMesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
    object_buffer: Buffer,
    object_bind_group: BindGroup,
    uniform: ObjectUniform,
}

impl GpuMesh {
    fn new(device: &Device, layout: &BindGroupLayout, node: &MeshNode) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(node.name),
            contents: bytemuck::cast_slice(&node.mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(node.name),
            contents: bytemuck::cast_slice(&node.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform = node.to_uniform();
        let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let object_bind_group = uniform_bind_group(device, layout, &object_buffer, "Object Bind Group");

        Self {
            vertex_buffer,
            index_buffer,
            index_count: node.mesh.indices.len() as u32,
            object_buffer,
            object_bind_group,
            uniform,
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.object_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Draws the preview scene into a window surface
///
/// The surface covers the whole window; drawing is limited to the viewport
/// rectangle inside the body margin.
pub struct WgpuRenderer {
    gpu: GpuContext,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    depth_view: TextureView,
    viewport: Viewport,
    clear_color: wgpu::Color,
    camera_buffer: Buffer,
    camera_bind_group: BindGroup,
    display_pipeline: RenderPipeline,
    frame_pipeline: RenderPipeline,
    texture_layout: BindGroupLayout,
    sampler: wgpu::Sampler,
    display: GpuMesh,
    frame: GpuMesh,
    lights_bind_group: BindGroup,
    /// Uploaded display textures keyed by descriptor index
    textures: HashMap<usize, BindGroup>,
    active_texture: Option<usize>,
    placeholder: BindGroup,
}

impl WgpuRenderer {
    pub async fn new(window: Arc<Window>, graph: &SceneGraph, viewport: Viewport) -> Result<Self> {
        let size = window.inner_size();

        let instance = GpuContext::instance();
        let surface = instance
            .create_surface(window)
            .context("Failed to create window surface")?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;
        let device = gpu.device();

        let surface_config = Self::create_surface_config(&surface, gpu.adapter(), size.width, size.height)?;
        surface.configure(device, &surface_config);
        let depth_view = Self::create_depth_view(device, surface_config.width, surface_config.height);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let texture_layout = Self::create_texture_layout(device);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform {
                view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
                position: [0.0; 3],
                _pad: 0.0,
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = uniform_bind_group(device, &uniform_layout, &camera_buffer, "Camera Bind Group");

        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[graph.lights.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let lights_bind_group = uniform_bind_group(device, &uniform_layout, &lights_buffer, "Lights Bind Group");

        let display_pipeline = Self::create_mesh_pipeline(
            device,
            include_str!("../display.wgsl"),
            "Display Pipeline",
            &[&uniform_layout, &uniform_layout, &texture_layout],
            surface_config.format,
            graph.display.material.side(),
        );
        let frame_pipeline = Self::create_mesh_pipeline(
            device,
            include_str!("../frame.wgsl"),
            "Frame Pipeline",
            &[&uniform_layout, &uniform_layout, &uniform_layout],
            surface_config.format,
            graph.frame.material.side(),
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Display Texture Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let white = TextureImage::new(1, 1, vec![255; 4]);
        let placeholder = Self::upload_texture(&gpu, &texture_layout, &sampler, &white);

        let display = GpuMesh::new(device, &uniform_layout, &graph.display);
        let frame = GpuMesh::new(device, &uniform_layout, &graph.frame);

        let [r, g, b] = hex_to_linear(graph.background);

        log::info!(
            "Renderer ready: surface {}x{} ({:?}), viewport {}x{} at ({}, {})",
            surface_config.width,
            surface_config.height,
            surface_config.format,
            viewport.width,
            viewport.height,
            viewport.x,
            viewport.y
        );

        Ok(Self {
            gpu,
            surface,
            surface_config,
            depth_view,
            viewport,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
            camera_buffer,
            camera_bind_group,
            display_pipeline,
            frame_pipeline,
            texture_layout,
            sampler,
            display,
            frame,
            lights_bind_group,
            textures: HashMap::new(),
            active_texture: None,
            placeholder,
        })
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    fn create_surface_config(
        surface: &Surface,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no supported formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_view(device: &Device, width: u32, height: u32) -> TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_texture_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Display Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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
        })
    }

    fn create_mesh_pipeline(
        device: &Device,
        shader_source: &str,
        label: &str,
        bind_group_layouts: &[&BindGroupLayout],
        surface_format: wgpu::TextureFormat,
        side: Side,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        // Back-sided materials show the faces turned away from the camera
        let cull_mode = match side {
            Side::Front => wgpu::Face::Back,
            Side::Back => wgpu::Face::Front,
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(cull_mode),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    fn upload_texture(
        gpu: &GpuContext,
        layout: &BindGroupLayout,
        sampler: &wgpu::Sampler,
        image: &TextureImage,
    ) -> BindGroup {
        let format = if image.settings.srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("Display Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        gpu.queue().write_texture(
            texture.as_image_copy(),
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Display Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn reconfigure(&mut self) {
        self.surface.configure(self.gpu.device(), &self.surface_config);
        self.depth_view = Self::create_depth_view(
            self.gpu.device(),
            self.surface_config.width,
            self.surface_config.height,
        );
    }

    /// Viewport clipped to the surface
    fn draw_rect(&self) -> Option<(u32, u32, u32, u32)> {
        let (surface_width, surface_height) = self.surface_size();
        let x = self.viewport.x.min(surface_width);
        let y = self.viewport.y.min(surface_height);
        let width = self.viewport.width.min(surface_width - x);
        let height = self.viewport.height.min(surface_height - y);
        (width > 0 && height > 0).then_some((x, y, width, height))
    }
}

impl SceneRenderer for WgpuRenderer {
    fn bind_display_texture(&mut self, index: usize, image: &Arc<TextureImage>) -> Result<()> {
        let expected = image.width as usize * image.height as usize * 4;
        if image.pixels.len() != expected || image.width == 0 || image.height == 0 {
            anyhow::bail!(
                "texture {index} has {} bytes for {}x{}",
                image.pixels.len(),
                image.width,
                image.height
            );
        }
        let max_dimension = self.gpu.device().limits().max_texture_dimension_2d;
        if image.width > max_dimension || image.height > max_dimension {
            anyhow::bail!(
                "texture {index} is {}x{}, the GPU allows at most {max_dimension}",
                image.width,
                image.height
            );
        }

        if !self.textures.contains_key(&index) {
            log::debug!("Uploading texture {index} ({}x{})", image.width, image.height);
            let bind_group = Self::upload_texture(&self.gpu, &self.texture_layout, &self.sampler, image);
            self.textures.insert(index, bind_group);
        }

        self.display.uniform.uv_transform = image.settings.uv_transform();
        self.gpu.queue().write_buffer(
            &self.display.object_buffer,
            0,
            bytemuck::cast_slice(&[self.display.uniform]),
        );
        self.active_texture = Some(index);
        Ok(())
    }

    fn resize(&mut self, window_width: u32, window_height: u32, viewport: Viewport) {
        self.viewport = viewport;
        if window_width == 0 || window_height == 0 {
            return;
        }

        self.surface_config.width = window_width;
        self.surface_config.height = window_height;
        self.reconfigure();
    }

    fn render(&mut self, camera: &PerspectiveCamera) -> Result<()> {
        let Some((x, y, width, height)) = self.draw_rect() else {
            return Ok(());
        };

        self.gpu
            .queue()
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera.to_uniform()]));

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out waiting for the next surface texture");
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to acquire surface texture"),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Preview Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Preview Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_viewport(x as f32, y as f32, width as f32, height as f32, 0.0, 1.0);
            render_pass.set_scissor_rect(x, y, width, height);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            let texture = self
                .active_texture
                .and_then(|index| self.textures.get(&index))
                .unwrap_or(&self.placeholder);
            render_pass.set_pipeline(&self.display_pipeline);
            render_pass.set_bind_group(2, texture, &[]);
            self.display.draw(&mut render_pass);

            render_pass.set_pipeline(&self.frame_pipeline);
            render_pass.set_bind_group(2, &self.lights_bind_group, &[]);
            self.frame.draw(&mut render_pass);
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn uniform_bind_group(device: &Device, layout: &BindGroupLayout, buffer: &Buffer, label: &str) -> BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}
