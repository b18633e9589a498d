//! Line Pass
//!
//! Draws the editor's ground grid as world-space line geometry. The grid
//! vertices are built once at initialization; only the camera varies per
//! frame.

use wgpu::util::DeviceExt;

use super::{
    FrameContext, PassInit, RenderPass, apply_viewport, single_uniform_bind_group,
    uniform_layout_entry,
};
use crate::renderer::CAMERA_BUFFER;
use crate::renderer::pipeline::{
    CompileRequest, LineVertex, PipelineKey, ShaderStage, VertexLayout, fx_hash_key,
};
use crate::renderer::viewport::Viewport;
use crate::scene::Scene;

const VERTEX_KEY: &str = "LineVertexShader";
const PIXEL_KEY: &str = "LinePixelShader";
const SOURCE: &str = "line";

/// Half-extent of the grid in world units; one line per unit.
const GRID_EXTENT: i32 = 10;

struct GpuState {
    camera_layout: wgpu::BindGroupLayout,
    camera_bind_group: wgpu::BindGroup,
    grid_buffer: wgpu::Buffer,
    grid_vertex_count: u32,
}

pub struct LineRenderPass {
    gpu: Option<GpuState>,
}

impl LineRenderPass {
    #[must_use]
    pub fn new() -> Self {
        Self { gpu: None }
    }

    fn build_grid() -> Vec<LineVertex> {
        let mut vertices = Vec::new();
        let extent = GRID_EXTENT as f32;
        let minor = [0.32, 0.32, 0.35, 1.0];
        let major = [0.48, 0.48, 0.52, 1.0];

        for i in -GRID_EXTENT..=GRID_EXTENT {
            let t = i as f32;
            let color = if i == 0 { major } else { minor };
            vertices.push(LineVertex::new([t, 0.0, -extent], color));
            vertices.push(LineVertex::new([t, 0.0, extent], color));
            vertices.push(LineVertex::new([-extent, 0.0, t], color));
            vertices.push(LineVertex::new([extent, 0.0, t], color));
        }
        vertices
    }
}

impl Default for LineRenderPass {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPass for LineRenderPass {
    fn name(&self) -> &'static str {
        "Line Pass"
    }

    fn initialize(&mut self, init: &mut PassInit<'_>) {
        if let Err(e) = init.shaders.register_vertex(
            VERTEX_KEY,
            CompileRequest::new(SOURCE, "vs_main", ShaderStage::Vertex),
        ) {
            log::error!("Failed to compile vertex shader '{VERTEX_KEY}': {e}");
        }
        if let Err(e) = init.shaders.register_pixel(
            PIXEL_KEY,
            CompileRequest::new(SOURCE, "fs_main", ShaderStage::Pixel),
        ) {
            log::error!("Failed to compile pixel shader '{PIXEL_KEY}': {e}");
        }
        init.shaders
            .register_input_layout(VERTEX_KEY, VertexLayout::line());

        let device = init.device;
        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Line Camera Layout"),
            entries: &[uniform_layout_entry(0, wgpu::ShaderStages::VERTEX, false)],
        });

        let Some(camera_buffer) = init.buffers.get(CAMERA_BUFFER) else {
            log::error!("Constant buffers missing, line pass disabled");
            return;
        };
        let camera_bind_group = single_uniform_bind_group(
            device,
            "Line Camera BindGroup",
            &camera_layout,
            camera_buffer,
        );

        let grid = Self::build_grid();
        let grid_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Editor Grid"),
            contents: bytemuck::cast_slice(&grid),
            usage: wgpu::BufferUsages::VERTEX,
        });

        self.gpu = Some(GpuState {
            camera_layout,
            camera_bind_group,
            grid_buffer,
            grid_vertex_count: grid.len() as u32,
        });
    }

    fn prepare_render(&mut self, _scene: &Scene) {}

    fn render(&mut self, frame: &mut FrameContext<'_>, viewport: &Viewport) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let (Some(vertex), Some(pixel)) = (
            frame.shaders.vertex_by_key(VERTEX_KEY),
            frame.shaders.pixel_by_key(PIXEL_KEY),
        ) else {
            return;
        };
        let Some(input_layout) = frame.shaders.input_layout_by_key(VERTEX_KEY) else {
            return;
        };
        let vertex = vertex.clone();
        let pixel = pixel.clone();
        let input_layout = input_layout.clone();

        let device = frame.device;
        let color_format = frame.color_format;
        let depth_format = frame.depth_format;

        let vs_module = frame.modules.get_or_create(device, &vertex).clone();
        let ps_module = frame.modules.get_or_create(device, &pixel).clone();

        let key = PipelineKey {
            pass: "line",
            vertex_hash: vertex.source_hash(),
            pixel_hash: pixel.source_hash(),
            aux: fx_hash_key(&(color_format, depth_format)),
        };
        let pipeline = frame
            .pipelines
            .get_or_create(&key, || {
                let pipeline_layout =
                    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                        label: Some("Line Pipeline Layout"),
                        bind_group_layouts: &[Some(&gpu.camera_layout)],
                        immediate_size: 0,
                    });
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("Line Pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &vs_module,
                        entry_point: Some("vs_main"),
                        buffers: &[input_layout.as_wgpu()],
                        compilation_options: Default::default(),
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &ps_module,
                        entry_point: Some("fs_main"),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: color_format,
                            blend: Some(wgpu::BlendState::REPLACE),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: Default::default(),
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::LineList,
                        ..Default::default()
                    },
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: depth_format,
                        depth_write_enabled: Some(false),
                        depth_compare: Some(wgpu::CompareFunction::LessEqual),
                        stencil: wgpu::StencilState::default(),
                        bias: wgpu::DepthBiasState::default(),
                    }),
                    multisample: wgpu::MultisampleState::default(),
                    multiview_mask: None,
                    cache: None,
                })
            })
            .clone();

        let camera_bind_group = gpu.camera_bind_group.clone();

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Line Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: frame.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });
        apply_viewport(&mut rpass, viewport.rect);
        rpass.set_pipeline(&pipeline);
        rpass.set_bind_group(0, &camera_bind_group, &[]);
        rpass.set_vertex_buffer(0, gpu.grid_buffer.slice(..));
        rpass.draw(0..gpu.grid_vertex_count, 0..1);
    }

    fn clear_render_arr(&mut self) {}
}
