//! Depth Debug Pass
//!
//! Fullscreen visualization of the frame's depth buffer, used by the
//! scene-depth view mode. Samples the depth attachment written by the
//! geometry passes earlier in the same frame and maps it to a linear
//! grayscale ramp.

use super::{FrameContext, PassInit, RenderPass, apply_viewport, depth_texture_layout_entry,
    uniform_layout_entry};
use crate::renderer::SCREEN_BUFFER;
use crate::renderer::pipeline::{CompileRequest, PipelineKey, ShaderStage, fx_hash_key};
use crate::renderer::viewport::Viewport;
use crate::scene::Scene;

const VERTEX_KEY: &str = "DepthDebugVertexShader";
const PIXEL_KEY: &str = "DepthDebugPixelShader";
const SOURCE: &str = "depth_debug";

pub struct DepthDebugRenderPass {
    layout: Option<wgpu::BindGroupLayout>,
}

impl DepthDebugRenderPass {
    #[must_use]
    pub fn new() -> Self {
        Self { layout: None }
    }
}

impl Default for DepthDebugRenderPass {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPass for DepthDebugRenderPass {
    fn name(&self) -> &'static str {
        "Depth Debug Pass"
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

        self.layout = Some(init.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Depth Debug Layout"),
                entries: &[
                    depth_texture_layout_entry(0),
                    uniform_layout_entry(1, wgpu::ShaderStages::FRAGMENT, false),
                ],
            },
        ));
    }

    fn prepare_render(&mut self, _scene: &Scene) {}

    fn render(&mut self, frame: &mut FrameContext<'_>, viewport: &Viewport) {
        let Some(layout) = &self.layout else {
            return;
        };
        let (Some(vertex), Some(pixel)) = (
            frame.shaders.vertex_by_key(VERTEX_KEY),
            frame.shaders.pixel_by_key(PIXEL_KEY),
        ) else {
            return;
        };
        let vertex = vertex.clone();
        let pixel = pixel.clone();

        let device = frame.device;
        let color_format = frame.color_format;

        let Some(screen_buffer) = frame.buffers.get(SCREEN_BUFFER) else {
            return;
        };

        // The depth view changes with target size, so the bind group is
        // rebuilt per frame rather than cached.
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Depth Debug BindGroup"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(frame.depth_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: screen_buffer.as_entire_binding(),
                },
            ],
        });

        let vs_module = frame.modules.get_or_create(device, &vertex).clone();
        let ps_module = frame.modules.get_or_create(device, &pixel).clone();

        let key = PipelineKey {
            pass: "depth_debug",
            vertex_hash: vertex.source_hash(),
            pixel_hash: pixel.source_hash(),
            aux: fx_hash_key(&color_format),
        };
        let pipeline = frame
            .pipelines
            .get_or_create(&key, || {
                let pipeline_layout =
                    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                        label: Some("Depth Debug Pipeline Layout"),
                        bind_group_layouts: &[Some(layout)],
                        immediate_size: 0,
                    });
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("Depth Debug Pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &vs_module,
                        entry_point: Some("vs_main"),
                        buffers: &[],
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
                    primitive: wgpu::PrimitiveState::default(),
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    multiview_mask: None,
                    cache: None,
                })
            })
            .clone();

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Depth Debug Pass"),
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
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }

    fn clear_render_arr(&mut self) {}
}
