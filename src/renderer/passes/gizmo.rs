//! Gizmo Pass
//!
//! Draws the translate gizmo (three colored axis lines) anchored at the
//! selected component. Renders without a depth attachment so the gizmo stays
//! visible through scene geometry.

use glam::{Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

use super::{
    FrameContext, PassInit, RenderPass, apply_viewport, single_uniform_bind_group,
    uniform_layout_entry,
};
use crate::renderer::pipeline::{
    CompileRequest, LineVertex, PipelineKey, ShaderStage, VertexLayout, fx_hash_key,
};
use crate::renderer::viewport::Viewport;
use crate::renderer::{CAMERA_BUFFER, GIZMO_BUFFER};
use crate::resources::uniforms::HelperUniforms;
use crate::scene::Scene;

const VERTEX_KEY: &str = "GizmoVertexShader";
const PIXEL_KEY: &str = "GizmoPixelShader";
const SOURCE: &str = "gizmo";

const AXIS_LENGTH: f32 = 1.2;

struct GpuState {
    camera_layout: wgpu::BindGroupLayout,
    gizmo_layout: wgpu::BindGroupLayout,
    camera_bind_group: wgpu::BindGroup,
    gizmo_bind_group: wgpu::BindGroup,
    axis_buffer: wgpu::Buffer,
    axis_vertex_count: u32,
}

pub struct GizmoRenderPass {
    anchor: Option<Vec3>,
    gpu: Option<GpuState>,
}

impl GizmoRenderPass {
    #[must_use]
    pub fn new() -> Self {
        Self {
            anchor: None,
            gpu: None,
        }
    }

    fn axis_vertices() -> Vec<LineVertex> {
        let red = [0.9, 0.15, 0.15, 1.0];
        let green = [0.15, 0.9, 0.15, 1.0];
        let blue = [0.2, 0.35, 0.95, 1.0];
        vec![
            LineVertex::new([0.0, 0.0, 0.0], red),
            LineVertex::new([AXIS_LENGTH, 0.0, 0.0], red),
            LineVertex::new([0.0, 0.0, 0.0], green),
            LineVertex::new([0.0, AXIS_LENGTH, 0.0], green),
            LineVertex::new([0.0, 0.0, 0.0], blue),
            LineVertex::new([0.0, 0.0, AXIS_LENGTH], blue),
        ]
    }
}

impl Default for GizmoRenderPass {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPass for GizmoRenderPass {
    fn name(&self) -> &'static str {
        "Gizmo Pass"
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
            label: Some("Gizmo Camera Layout"),
            entries: &[uniform_layout_entry(0, wgpu::ShaderStages::VERTEX, false)],
        });
        let gizmo_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Gizmo Helper Layout"),
            entries: &[uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                false,
            )],
        });

        let (Some(camera_buffer), Some(gizmo_buffer)) = (
            init.buffers.get(CAMERA_BUFFER),
            init.buffers.get(GIZMO_BUFFER),
        ) else {
            log::error!("Constant buffers missing, gizmo pass disabled");
            return;
        };
        let camera_bind_group = single_uniform_bind_group(
            device,
            "Gizmo Camera BindGroup",
            &camera_layout,
            camera_buffer,
        );
        let gizmo_bind_group = single_uniform_bind_group(
            device,
            "Gizmo Helper BindGroup",
            &gizmo_layout,
            gizmo_buffer,
        );

        let vertices = Self::axis_vertices();
        let axis_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gizmo Axes"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        self.gpu = Some(GpuState {
            camera_layout,
            gizmo_layout,
            camera_bind_group,
            gizmo_bind_group,
            axis_buffer,
            axis_vertex_count: vertices.len() as u32,
        });
    }

    fn prepare_render(&mut self, scene: &Scene) {
        self.anchor = scene
            .selected_component()
            .map(crate::scene::SceneComponent::position);
    }

    fn render(&mut self, frame: &mut FrameContext<'_>, viewport: &Viewport) {
        let Some(anchor) = self.anchor else {
            return;
        };
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

        let uniforms = HelperUniforms {
            model: Mat4::from_translation(anchor),
            color: Vec4::ONE,
        };
        frame.buffers.update(frame.queue, GIZMO_BUFFER, &uniforms);

        let device = frame.device;
        let color_format = frame.color_format;

        let vs_module = frame.modules.get_or_create(device, &vertex).clone();
        let ps_module = frame.modules.get_or_create(device, &pixel).clone();

        let key = PipelineKey {
            pass: "gizmo",
            vertex_hash: vertex.source_hash(),
            pixel_hash: pixel.source_hash(),
            aux: fx_hash_key(&color_format),
        };
        let pipeline = frame
            .pipelines
            .get_or_create(&key, || {
                let pipeline_layout =
                    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                        label: Some("Gizmo Pipeline Layout"),
                        bind_group_layouts: &[Some(&gpu.camera_layout), Some(&gpu.gizmo_layout)],
                        immediate_size: 0,
                    });
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("Gizmo Pipeline"),
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
                    // Gizmos draw on top of everything; no depth attachment.
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    multiview_mask: None,
                    cache: None,
                })
            })
            .clone();

        let camera_bind_group = gpu.camera_bind_group.clone();
        let gizmo_bind_group = gpu.gizmo_bind_group.clone();

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Gizmo Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            ..Default::default()
        });
        apply_viewport(&mut rpass, viewport.rect);
        rpass.set_pipeline(&pipeline);
        rpass.set_bind_group(0, &camera_bind_group, &[]);
        rpass.set_bind_group(1, &gizmo_bind_group, &[]);
        rpass.set_vertex_buffer(0, gpu.axis_buffer.slice(..));
        rpass.draw(0..gpu.axis_vertex_count, 0..1);
    }

    fn clear_render_arr(&mut self) {
        self.anchor = None;
    }
}
