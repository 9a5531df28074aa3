//! wgpu renderer: one lattice vertex buffer, one uniform buffer with a
//! 256-byte slot per band, additive blending onto a cleared surface.

use wave_core::gpu::{self, BandUniforms, LatticeVertex, MAX_BAND_DRAWS, UNIFORM_SLOT_STRIDE};
use wave_core::{CompositeParams, FrameState, WaveConfig, WaveError, WaveRenderer, GPU_SAMPLE_COUNT};
use wgpu::util::DeviceExt;

const ADDITIVE: wgpu::BlendComponent = wgpu::BlendComponent {
    src_factor: wgpu::BlendFactor::One,
    dst_factor: wgpu::BlendFactor::One,
    operation: wgpu::BlendOperation::Add,
};

pub struct GpuState<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    lattice_vb: wgpu::Buffer,
    lattice_len: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    params: CompositeParams,
    staging: Vec<u8>,
}

impl<'w> GpuState<'w> {
    pub async fn new(window: &'w winit::window::Window, wave: &WaveConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| WaveError::GpuUnavailable("no compatible adapter".into()))?;
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
            .map_err(|e| WaveError::GpuUnavailable(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = *surface_caps
            .formats
            .first()
            .ok_or_else(|| WaveError::GpuUnavailable("surface reports no formats".into()))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("siri_wave"),
            source: wgpu::ShaderSource::Wgsl(gpu::SIRI_WAVE_WGSL.into()),
        });

        let lattice = gpu::build_lattice(wave.graph_x, GPU_SAMPLE_COUNT);
        let lattice_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lattice_vb"),
            contents: bytemuck::cast_slice(&lattice),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let slots_size = UNIFORM_SLOT_STRIDE * MAX_BAND_DRAWS as u64;
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("band_uniforms"),
            size: slots_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let band_size = std::mem::size_of::<BandUniforms>() as u64;
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("band_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(band_size),
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("band_bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(band_size),
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("band_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LatticeVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 4,
                    shader_location: 1,
                },
            ],
        }];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("band_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_band"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_band"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState {
                        color: ADDITIVE,
                        alpha: ADDITIVE,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        log::info!(
            "[gpu] {:?} {}x{} lattice={} vertices",
            format,
            config.width,
            config.height,
            lattice.len()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            lattice_len: lattice.len() as u32,
            lattice_vb,
            uniform_buffer,
            bind_group,
            params: CompositeParams::from(wave),
            staging: vec![0; slots_size as usize],
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn draw(&mut self, frame: &FrameState<'_>) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let draws: Vec<_> = gpu::band_draws(frame.manager.show_guide()).collect();
        for (slot, (channel, side)) in draws.iter().enumerate() {
            let u = gpu::pack_band(frame, *channel, *side, &self.params, GPU_SAMPLE_COUNT);
            let at = slot * UNIFORM_SLOT_STRIDE as usize;
            let bytes = bytemuck::bytes_of(&u);
            self.staging[at..at + bytes.len()].copy_from_slice(bytes);
        }
        self.queue.write_buffer(&self.uniform_buffer, 0, &self.staging);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("wave_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("wave_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_vertex_buffer(0, self.lattice_vb.slice(..));
            for slot in 0..draws.len() {
                let offset = (slot as u64 * UNIFORM_SLOT_STRIDE) as u32;
                rpass.set_bind_group(0, &self.bind_group, &[offset]);
                rpass.draw(0..self.lattice_len, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// The GPU collaborator handed to the driver. Once disabled it stays
/// disabled for the rest of the process.
pub enum GpuWaveRenderer<'w> {
    Active(Box<GpuState<'w>>),
    Disabled,
}

impl<'w> GpuWaveRenderer<'w> {
    pub async fn new(window: &'w winit::window::Window, wave: &WaveConfig) -> Self {
        match GpuState::new(window, wave).await {
            Ok(state) => Self::Active(Box::new(state)),
            Err(e) => {
                log::error!("[gpu] setup failed, rendering disabled: {e:#}");
                Self::Disabled
            }
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Self::Active(state) = self {
            state.resize(width, height);
        }
    }
}

impl WaveRenderer for GpuWaveRenderer<'_> {
    fn render(&mut self, frame: &FrameState<'_>) {
        let Self::Active(state) = self else {
            return;
        };
        match state.draw(frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                log::warn!("[gpu] surface lost, reconfiguring");
                state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[gpu] out of memory, rendering disabled");
                *self = Self::Disabled;
            }
            Err(e) => log::error!("[gpu] frame skipped: {e}"),
        }
    }
}
