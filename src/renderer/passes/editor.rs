//! Editor Helper Pass
//!
//! Editor-only visualization geometry: draws a cone outline for every spot
//! light so their coverage is visible while editing. Helper lines are built
//! on the CPU during `prepare_render` and uploaded into a per-frame vertex
//! buffer.

use glam::Vec3;

use super::{
    FrameContext, PassInit, RenderPass, apply_viewport, single_uniform_bind_group,
    uniform_layout_entry,
};
use crate::renderer::CAMERA_BUFFER;
use crate::renderer::buffers::DynamicVertexBuffer;
use crate::renderer::pipeline::{
    CompileRequest, LineVertex, PipelineKey, ShaderStage, VertexLayout, fx_hash_key,
};
use crate::renderer::viewport::Viewport;
use crate::scene::{LightKind, Scene, SceneComponent};

const VERTEX_KEY: &str = "EditorHelperVertexShader";
const PIXEL_KEY: &str = "EditorHelperPixelShader";
const SOURCE: &str = "editor_helper";

const CONE_SEGMENTS: usize = 16;

struct GpuState {
    camera_layout: wgpu::BindGroupLayout,
    camera_bind_group: wgpu::BindGroup,
}

pub struct EditorRenderPass {
    helper_lines: Vec<LineVertex>,
    vertex_buffer: DynamicVertexBuffer,
    gpu: Option<GpuState>,
}

impl EditorRenderPass {
    #[must_use]
    pub fn new() -> Self {
        Self {
            helper_lines: Vec::new(),
            vertex_buffer: DynamicVertexBuffer::new("Editor Helpers"),
            gpu: None,
        }
    }

    /// Appends the outline of one spot cone: the rim circle plus four edges
    /// from the apex.
    fn push_spot_cone(
        lines: &mut Vec<LineVertex>,
        position: Vec3,
        direction: Vec3,
        range: f32,
        outer_cone: f32,
        color: [f32; 4],
    ) {
        let axis = direction.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        let reference = if axis.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
        let u = axis.cross(reference).normalize();
        let v = axis.cross(u);

        let center = position + axis * range * outer_cone.cos();
        let radius = range * outer_cone.sin();

        let rim_point = |i: usize| {
            let angle = (i as f32 / CONE_SEGMENTS as f32) * std::f32::consts::TAU;
            center + (u * angle.cos() + v * angle.sin()) * radius
        };

        for i in 0..CONE_SEGMENTS {
            let a = rim_point(i);
            let b = rim_point(i + 1);
            lines.push(LineVertex::new(a.to_array(), color));
            lines.push(LineVertex::new(b.to_array(), color));
        }
        for i in 0..4 {
            let rim = rim_point(i * CONE_SEGMENTS / 4);
            lines.push(LineVertex::new(position.to_array(), color));
            lines.push(LineVertex::new(rim.to_array(), color));
        }
    }
}

impl Default for EditorRenderPass {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPass for EditorRenderPass {
    fn name(&self) -> &'static str {
        "Editor Helper Pass"
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
            label: Some("Editor Helper Camera Layout"),
            entries: &[uniform_layout_entry(0, wgpu::ShaderStages::VERTEX, false)],
        });

        let Some(camera_buffer) = init.buffers.get(CAMERA_BUFFER) else {
            log::error!("Constant buffers missing, editor helper pass disabled");
            return;
        };
        let camera_bind_group = single_uniform_bind_group(
            device,
            "Editor Helper Camera BindGroup",
            &camera_layout,
            camera_buffer,
        );

        self.gpu = Some(GpuState {
            camera_layout,
            camera_bind_group,
        });
    }

    fn prepare_render(&mut self, scene: &Scene) {
        for component in &scene.components {
            let SceneComponent::Light(light) = component else {
                continue;
            };
            if let LightKind::Spot {
                direction,
                range,
                outer_cone,
                ..
            } = &light.kind
            {
                let color = [light.color.x, light.color.y, light.color.z, 1.0];
                Self::push_spot_cone(
                    &mut self.helper_lines,
                    light.position,
                    *direction,
                    *range,
                    *outer_cone,
                    color,
                );
            }
        }
    }

    fn render(&mut self, frame: &mut FrameContext<'_>, viewport: &Viewport) {
        if self.helper_lines.is_empty() {
            return;
        }
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

        self.vertex_buffer
            .upload(device, frame.queue, bytemuck::cast_slice(&self.helper_lines));
        let Some(helper_buffer) = self.vertex_buffer.buffer() else {
            return;
        };
        let helper_buffer = helper_buffer.clone();

        let vs_module = frame.modules.get_or_create(device, &vertex).clone();
        let ps_module = frame.modules.get_or_create(device, &pixel).clone();

        let key = PipelineKey {
            pass: "editor_helper",
            vertex_hash: vertex.source_hash(),
            pixel_hash: pixel.source_hash(),
            aux: fx_hash_key(&(color_format, depth_format)),
        };
        let pipeline = frame
            .pipelines
            .get_or_create(&key, || {
                let pipeline_layout =
                    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                        label: Some("Editor Helper Pipeline Layout"),
                        bind_group_layouts: &[Some(&gpu.camera_layout)],
                        immediate_size: 0,
                    });
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("Editor Helper Pipeline"),
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
                            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
        let vertex_count = self.helper_lines.len() as u32;

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Editor Helper Pass"),
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
        rpass.set_vertex_buffer(0, helper_buffer.slice(..));
        rpass.draw(0..vertex_count, 0..1);
    }

    fn clear_render_arr(&mut self) {
        self.helper_lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Light;

    #[test]
    fn prepare_builds_cone_outlines_for_spot_lights_only() {
        let mut scene = Scene::new();
        scene.add(SceneComponent::Light(Light::new_point(
            Vec3::ONE,
            1.0,
            Vec3::ZERO,
            5.0,
        )));
        scene.add(SceneComponent::Light(Light::new_spot(
            Vec3::ONE,
            1.0,
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::NEG_Y,
            6.0,
            0.3,
            0.5,
        )));

        let mut pass = EditorRenderPass::new();
        pass.prepare_render(&scene);

        // One cone: rim segments plus four apex edges, two vertices each.
        assert_eq!(pass.helper_lines.len(), (CONE_SEGMENTS + 4) * 2);

        pass.clear_render_arr();
        assert!(pass.helper_lines.is_empty());
    }
}
