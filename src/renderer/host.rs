//! wgpu render host: the surface, device, and draw path for one scene
//!
//! The host owns every GPU resource. Vertex data is rebuilt from the
//! particle registry each frame; the scene uniform carries the camera,
//! fog, and the lighting rig.

use std::sync::Arc;

use glam::Vec3;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::{EngineError, EngineResult};
use crate::particles::renderable::{Geometry, Material};
use crate::particles::ParticleRegistry;
use crate::renderer::mesh::{tessellate_shape, Vertex};
use crate::scene::{Camera, Scene};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniform {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    fog_color: [f32; 4],
    fog_params: [f32; 4],
    sun_direction: [f32; 4],
    sun_color: [f32; 4],
    ambient: [f32; 4],
    point_position: [f32; 4],
    point_color: [f32; 4],
}

fn extend(v: Vec3, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

impl SceneUniform {
    fn build(scene: &Scene, camera: &Camera) -> Self {
        let lights = &scene.lights;
        let (fog_color, fog_params) = match scene.fog {
            Some(fog) => (extend(fog.color, 1.0), [fog.near, fog.far, 0.0, 0.0]),
            None => ([0.0; 4], [0.0, 1.0, 0.0, 0.0]),
        };
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_position: extend(camera.position, 1.0),
            fog_color,
            fog_params,
            // The sun shines from its position toward the origin
            sun_direction: extend((-lights.sun.position).normalize_or_zero(), 0.0),
            sun_color: extend(lights.sun.color * lights.sun.intensity, 0.0),
            ambient: extend(lights.ambient.color * lights.ambient.intensity, 0.0),
            point_position: extend(lights.atmosphere.position, lights.atmosphere.range),
            point_color: extend(lights.atmosphere.color * lights.atmosphere.intensity, 0.0),
        }
    }
}

pub struct RenderHost {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    mesh_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
}

impl RenderHost {
    /// Bring up wgpu against `window` at the given viewport size. Every
    /// missing piece of the backend (surface, adapter, device) is an
    /// [`EngineError::Init`], reported once and never retried.
    pub fn initialize(window: Arc<Window>, width: u32, height: u32) -> EngineResult<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| EngineError::init(format!("surface creation failed: {e}")))?;

        // Try high performance first, then low power, then software fallback
        let mut adapter_options = wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        };
        let adapter = pollster::block_on(instance.request_adapter(&adapter_options))
            .or_else(|| {
                adapter_options.power_preference = wgpu::PowerPreference::LowPower;
                pollster::block_on(instance.request_adapter(&adapter_options))
            })
            .or_else(|| {
                adapter_options.force_fallback_adapter = true;
                pollster::block_on(instance.request_adapter(&adapter_options))
            })
            .ok_or_else(|| EngineError::init("no GPU adapter available"))?;

        let info = adapter.get_info();
        log::info!("render adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                label: Some("Weather Device"),
            },
            None,
        ))
        .map_err(|e| EngineError::init(format!("device creation failed: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        if surface_caps.formats.is_empty() {
            return Err(EngineError::init("no surface formats supported"));
        }
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sky Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sky.wgsl").into()),
        });

        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SceneUniform {
                view_proj: [[0.0; 4]; 4],
                camera_position: [0.0; 4],
                fog_color: [0.0; 4],
                fog_params: [0.0, 1.0, 0.0, 0.0],
                sun_direction: [0.0; 4],
                sun_color: [0.0; 4],
                ambient: [0.0; 4],
                point_position: [0.0; 4],
                point_color: [0.0; 4],
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("scene_bind_group_layout"),
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
            label: Some("scene_bind_group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sky Pipeline Layout"),
            bind_group_layouts: &[&scene_layout],
            push_constant_ranges: &[],
        });

        let mesh_pipeline = build_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
            "fs_mesh",
            true,
        );
        let point_pipeline = build_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            surface_format,
            wgpu::PrimitiveTopology::PointList,
            "fs_point",
            false,
        );

        log::info!(
            "render host initialized at {}x{} ({:?})",
            config.width,
            config.height,
            surface_format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            mesh_pipeline,
            point_pipeline,
            scene_buffer,
            scene_bind_group,
        })
    }

    /// Reconfigure the surface for a new viewport. Idempotent; zero
    /// dimensions are clamped rather than rejected.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.reconfigure();
    }

    /// Rebuild the swapchain after a resize or a lost surface
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, self.config.width, self.config.height);
    }

    /// Draw one frame of the scene. No side effects beyond the draw; the
    /// point-cloud dirty flags are cleared once their data is uploaded.
    pub fn render_frame(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        registry: &mut ParticleRegistry,
    ) -> Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::cast_slice(&[SceneUniform::build(scene, camera)]),
        );

        let (point_vertices, mesh_vertices) = collect_vertices(registry);
        let mesh_buffer = self.vertex_buffer("Mesh Vertices", &mesh_vertices);
        let point_buffer = self.vertex_buffer("Point Vertices", &point_vertices);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let clear = scene.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sky Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.x as f64,
                            g: clear.y as f64,
                            b: clear.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_bind_group(0, &self.scene_bind_group, &[]);
            if let Some(buffer) = &mesh_buffer {
                pass.set_pipeline(&self.mesh_pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..mesh_vertices.len() as u32, 0..1);
            }
            if let Some(buffer) = &point_buffer {
                pass.set_pipeline(&self.point_pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..point_vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn vertex_buffer(&self, label: &str, vertices: &[Vertex]) -> Option<wgpu::Buffer> {
        if vertices.is_empty() {
            return None;
        }
        Some(
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::cast_slice(vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
        )
    }

    /// Release the surface and device. Consuming self makes a second
    /// teardown unrepresentable; the engine guards its own flag.
    pub fn teardown(self) {
        log::info!("render host released");
    }
}

/// Flatten the registry into one point list and one triangle list
fn collect_vertices(registry: &mut ParticleRegistry) -> (Vec<Vertex>, Vec<Vertex>) {
    let mut points = Vec::new();
    let mut meshes = Vec::new();
    for group in registry.groups_mut() {
        let Some(geometry) = group.renderable.geometry_mut() else {
            continue;
        };
        match geometry {
            Geometry::Points(cloud) => {
                let color = [cloud.color.x, cloud.color.y, cloud.color.z, cloud.opacity];
                for chunk in cloud.positions().chunks_exact(3) {
                    points.push(Vertex {
                        position: [chunk[0], chunk[1], chunk[2]],
                        normal: [0.0; 3],
                        color,
                    });
                }
                cloud.mark_clean();
            }
            Geometry::Mesh(mesh) => {
                // A fully transparent mesh (idle lightning) draws nothing
                if mesh.material.opacity > 0.0 {
                    let color = material_color(&mesh.material);
                    tessellate_shape(&mut meshes, &mesh.shape, &mesh.transform.matrix(), color);
                }
            }
            Geometry::Group(cluster) => {
                let parent = cluster.transform.matrix();
                for child in &cluster.children {
                    let model = parent * child.transform.matrix();
                    tessellate_shape(
                        &mut meshes,
                        &child.shape,
                        &model,
                        material_color(&child.material),
                    );
                }
            }
        }
    }
    (points, meshes)
}

fn material_color(material: &Material) -> [f32; 4] {
    [
        material.color.x,
        material.color.y,
        material.color.z,
        material.opacity,
    ]
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
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
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    fragment_entry: &str,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Sky Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[Vertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: fragment_entry,
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Ray and lightning planes are visible from both sides
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
