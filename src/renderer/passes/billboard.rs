//! Billboard Pass
//!
//! Draws camera-facing sprites. The quad corners are generated in the vertex
//! shader from the vertex index; each billboard gets one 256-byte slot of
//! per-sprite constants addressed with a dynamic offset.

use super::{
    FrameContext, PassInit, RenderPass, apply_viewport, single_uniform_bind_group,
    uniform_layout_entry,
};
use crate::renderer::CAMERA_BUFFER;
use crate::renderer::buffers::DynamicUniformBuffer;
use crate::renderer::pipeline::{CompileRequest, PipelineKey, ShaderStage, fx_hash_key};
use crate::renderer::viewport::Viewport;
use crate::resources::uniforms::BillboardUniforms;
use crate::scene::{BillboardComponent, Scene, SceneComponent};

const VERTEX_KEY: &str = "BillboardVertexShader";
const PIXEL_KEY: &str = "BillboardPixelShader";
const SOURCE: &str = "billboard";

struct GpuState {
    camera_layout: wgpu::BindGroupLayout,
    sprite_layout: wgpu::BindGroupLayout,
    camera_bind_group: wgpu::BindGroup,
}

pub struct BillboardRenderPass {
    render_arr: Vec<BillboardComponent>,
    sprite_buffer: DynamicUniformBuffer,
    sprite_bind_group: Option<wgpu::BindGroup>,
    gpu: Option<GpuState>,
}

impl BillboardRenderPass {
    #[must_use]
    pub fn new() -> Self {
        Self {
            render_arr: Vec::new(),
            sprite_buffer: DynamicUniformBuffer::new("Billboard Sprites"),
            sprite_bind_group: None,
            gpu: None,
        }
    }
}

impl Default for BillboardRenderPass {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPass for BillboardRenderPass {
    fn name(&self) -> &'static str {
        "Billboard Pass"
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

        let device = init.device;
        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Billboard Camera Layout"),
            entries: &[uniform_layout_entry(0, wgpu::ShaderStages::VERTEX, false)],
        });
        let sprite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Billboard Sprite Layout"),
            entries: &[uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                true,
            )],
        });

        let Some(camera_buffer) = init.buffers.get(CAMERA_BUFFER) else {
            log::error!("Constant buffers missing, billboard pass disabled");
            return;
        };
        let camera_bind_group = single_uniform_bind_group(
            device,
            "Billboard Camera BindGroup",
            &camera_layout,
            camera_buffer,
        );

        self.gpu = Some(GpuState {
            camera_layout,
            sprite_layout,
            camera_bind_group,
        });
    }

    fn prepare_render(&mut self, scene: &Scene) {
        for component in &scene.components {
            if let SceneComponent::Billboard(billboard) = component {
                self.render_arr.push(billboard.clone());
            }
        }
    }

    fn render(&mut self, frame: &mut FrameContext<'_>, viewport: &Viewport) {
        if self.render_arr.is_empty() {
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
        let vertex = vertex.clone();
        let pixel = pixel.clone();

        let device = frame.device;
        let color_format = frame.color_format;
        let depth_format = frame.depth_format;

        if self.sprite_buffer.ensure(device, self.render_arr.len() as u32)
            || self.sprite_bind_group.is_none()
        {
            self.sprite_bind_group =
                self.sprite_buffer
                    .binding::<BillboardUniforms>()
                    .map(|resource| {
                        device.create_bind_group(&wgpu::BindGroupDescriptor {
                            label: Some("Billboard Sprite BindGroup"),
                            layout: &gpu.sprite_layout,
                            entries: &[wgpu::BindGroupEntry {
                                binding: 0,
                                resource,
                            }],
                        })
                    });
        }
        let Some(sprite_bind_group) = self.sprite_bind_group.clone() else {
            return;
        };

        for (slot, billboard) in self.render_arr.iter().enumerate() {
            let uniforms = BillboardUniforms {
                position: billboard.position.extend(billboard.size * 0.5),
                color: billboard.color,
            };
            self.sprite_buffer.write(frame.queue, slot as u32, &uniforms);
        }

        let vs_module = frame.modules.get_or_create(device, &vertex).clone();
        let ps_module = frame.modules.get_or_create(device, &pixel).clone();

        let key = PipelineKey {
            pass: "billboard",
            vertex_hash: vertex.source_hash(),
            pixel_hash: pixel.source_hash(),
            aux: fx_hash_key(&(color_format, depth_format)),
        };
        let pipeline = frame
            .pipelines
            .get_or_create(&key, || {
                let pipeline_layout =
                    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                        label: Some("Billboard Pipeline Layout"),
                        bind_group_layouts: &[Some(&gpu.camera_layout), Some(&gpu.sprite_layout)],
                        immediate_size: 0,
                    });
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("Billboard Pipeline"),
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
                            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: Default::default(),
                    }),
                    primitive: wgpu::PrimitiveState::default(),
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: depth_format,
                        // Sprites test against scene depth but never write it.
                        depth_write_enabled: Some(false),
                        depth_compare: Some(wgpu::CompareFunction::Less),
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
            label: Some("Billboard Pass"),
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

        for slot in 0..self.render_arr.len() as u32 {
            rpass.set_bind_group(1, &sprite_bind_group, &[DynamicUniformBuffer::offset(slot)]);
            rpass.draw(0..6, 0..1);
        }
    }

    fn clear_render_arr(&mut self) {
        self.render_arr.clear();
    }
}
