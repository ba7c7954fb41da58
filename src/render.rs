use crate::core::{Renderer, Scene};
use crate::dom;
use crate::error::BackdropError;
use std::mem::size_of;
use web_sys as web;

pub mod canvas2d;
mod helpers;

pub use canvas2d::Canvas2dRenderer;
use helpers::{create_vertex_buffer, ensure_vertex_capacity, make_pipeline, PipelineDesc};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    link_color: [f32; 4],
    resolution: [f32; 2],
    opacity: f32,
    point_scale: f32,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PointInstance {
    pos_size: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LinkVertex {
    pos_alpha: [f32; 4],
}

const POINT_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];
const LINK_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];

/// WebGPU renderer: instanced soft point sprites plus a line list for links.
pub struct GpuRenderer {
    canvas: web::HtmlCanvasElement,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    point_pipeline: wgpu::RenderPipeline,
    link_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    point_buffer: wgpu::Buffer,
    point_capacity: usize,
    link_buffer: wgpu::Buffer,
    link_capacity: usize,
    points: Vec<PointInstance>,
    link_vertices: Vec<LinkVertex>,
    pixel_ratio_cap: f32,
    released: bool,
}

impl GpuRenderer {
    pub async fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let (width, height, _) = dom::sync_canvas_backing_size(&canvas, 1.0);

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
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: Some("backdrop_device"),
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Rgba8Unorm
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        // transparent canvas composited over the page
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
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

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particles_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::PARTICLES_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("particles_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particles_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let point_pipeline = make_pipeline(
            &device,
            &layout,
            &shader,
            format,
            &PipelineDesc {
                label: "point_pipeline",
                vs_entry: "vs_point",
                fs_entry: "fs_point",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: size_of::<PointInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &POINT_ATTRS,
                }],
                topology: wgpu::PrimitiveTopology::TriangleList,
            },
        );
        let link_pipeline = make_pipeline(
            &device,
            &layout,
            &shader,
            format,
            &PipelineDesc {
                label: "link_pipeline",
                vs_entry: "vs_link",
                fs_entry: "fs_link",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: size_of::<LinkVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &LINK_ATTRS,
                }],
                topology: wgpu::PrimitiveTopology::LineList,
            },
        );

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particles_uniforms"),
            size: size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("particles_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let point_capacity = 256;
        let link_capacity = 1024;
        let point_buffer = create_vertex_buffer(
            &device,
            "point_instances",
            point_capacity * size_of::<PointInstance>(),
        );
        let link_buffer = create_vertex_buffer(
            &device,
            "link_vertices",
            link_capacity * size_of::<LinkVertex>(),
        );

        log::info!("[gpu] surface {}x{} format={:?}", width, height, format);
        Ok(Self {
            canvas,
            surface,
            device,
            queue,
            config,
            point_pipeline,
            link_pipeline,
            uniform_buffer,
            bind_group,
            point_buffer,
            point_capacity,
            link_buffer,
            link_capacity,
            points: Vec::new(),
            link_vertices: Vec::new(),
            pixel_ratio_cap: 1.0,
            released: false,
        })
    }

    fn sync_surface(&mut self) {
        let (w, h, _) = dom::sync_canvas_backing_size(&self.canvas, self.pixel_ratio_cap);
        if w != self.config.width || h != self.config.height {
            self.config.width = w;
            self.config.height = h;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn upload(&mut self, scene: &Scene<'_>) {
        self.points.clear();
        self.points.extend(
            scene
                .positions
                .iter()
                .zip(scene.colors)
                .zip(scene.sizes)
                .map(|((p, c), s)| PointInstance {
                    pos_size: [p.x, p.y, p.z, *s],
                    color: [c.x, c.y, c.z, 1.0],
                }),
        );
        self.points.extend(scene.sparks.iter().map(|sp| PointInstance {
            pos_size: [
                sp.position.x,
                sp.position.y,
                sp.position.z,
                crate::constants::BURST_SPARK_SIZE,
            ],
            color: [sp.color.x, sp.color.y, sp.color.z, sp.opacity],
        }));
        self.link_vertices.clear();
        for link in scene.links {
            let (Some(a), Some(b)) = (
                scene.positions.get(link.a as usize),
                scene.positions.get(link.b as usize),
            ) else {
                continue;
            };
            self.link_vertices.push(LinkVertex {
                pos_alpha: [a.x, a.y, a.z, link.strength],
            });
            self.link_vertices.push(LinkVertex {
                pos_alpha: [b.x, b.y, b.z, link.strength],
            });
        }

        ensure_vertex_capacity(
            &self.device,
            &mut self.point_buffer,
            &mut self.point_capacity,
            self.points.len(),
            size_of::<PointInstance>(),
            "point_instances",
        );
        ensure_vertex_capacity(
            &self.device,
            &mut self.link_buffer,
            &mut self.link_capacity,
            self.link_vertices.len(),
            size_of::<LinkVertex>(),
            "link_vertices",
        );
        if !self.points.is_empty() {
            self.queue
                .write_buffer(&self.point_buffer, 0, bytemuck::cast_slice(&self.points));
        }
        if !self.link_vertices.is_empty() {
            self.queue
                .write_buffer(&self.link_buffer, 0, bytemuck::cast_slice(&self.link_vertices));
        }

        let [r, g, b] = scene.style.link_color;
        let u = Uniforms {
            view_proj: scene.view_proj.to_cols_array_2d(),
            link_color: [r, g, b, crate::constants::LINK_BASE_ALPHA],
            resolution: [self.config.width as f32, self.config.height as f32],
            opacity: scene.style.opacity,
            point_scale: scene.point_scale,
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));
    }
}

impl Renderer for GpuRenderer {
    fn draw(&mut self, scene: &Scene<'_>) -> anyhow::Result<()> {
        if self.released {
            return Ok(());
        }
        self.sync_surface();
        self.upload(scene);

        let frame = match self.surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => return Ok(()),
            Err(e) => return Err(BackdropError::Renderer(e.to_string()).into()),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("particles_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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
            rpass.set_bind_group(0, &self.bind_group, &[]);
            if !self.link_vertices.is_empty() {
                let bytes = (self.link_vertices.len() * size_of::<LinkVertex>()) as u64;
                rpass.set_pipeline(&self.link_pipeline);
                rpass.set_vertex_buffer(0, self.link_buffer.slice(0..bytes));
                rpass.draw(0..self.link_vertices.len() as u32, 0..1);
            }
            if !self.points.is_empty() {
                let bytes = (self.points.len() * size_of::<PointInstance>()) as u64;
                rpass.set_pipeline(&self.point_pipeline);
                rpass.set_vertex_buffer(0, self.point_buffer.slice(0..bytes));
                rpass.draw(0..6, 0..self.points.len() as u32);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn set_pixel_ratio_cap(&mut self, cap: f32) {
        self.pixel_ratio_cap = cap;
        if !self.released {
            self.sync_surface();
        }
    }

    fn resize(&mut self, _width: u32, _height: u32) {
        if !self.released {
            self.sync_surface();
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.point_buffer.destroy();
        self.link_buffer.destroy();
        self.uniform_buffer.destroy();
        self.device.destroy();
        self.canvas.remove();
        log::info!("[gpu] released");
    }
}
