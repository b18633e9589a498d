//! Fog Pass
//!
//! Fullscreen height fog blended over the lit scene. Reconstructs world
//! positions from the frame's depth buffer (the same depth resource the
//! depth-debug pass visualizes) and fades toward the fog color with distance
//! and height.

use super::{FrameContext, PassInit, RenderPass, apply_viewport, depth_texture_layout_entry,
    uniform_layout_entry};
use crate::renderer::pipeline::{CompileRequest, PipelineKey, ShaderStage, fx_hash_key};
use crate::renderer::viewport::Viewport;
use crate::renderer::{FOG_BUFFER, SCREEN_BUFFER};
use crate::resources::uniforms::FogUniforms;
use crate::scene::{FogComponent, Scene, SceneComponent};

const VERTEX_KEY: &str = "FogVertexShader";
const PIXEL_KEY: &str = "FogPixelShader";
const SOURCE: &str = "fog";

pub struct FogRenderPass {
    fog: Option<FogComponent>,
    layout: Option<wgpu::BindGroupLayout>,
}

impl FogRenderPass {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fog: None,
            layout: None,
        }
    }
}

impl Default for FogRenderPass {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPass for FogRenderPass {
    fn name(&self) -> &'static str {
        "Fog Pass"
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
                label: Some("Fog Layout"),
                entries: &[
                    depth_texture_layout_entry(0),
                    uniform_layout_entry(1, wgpu::ShaderStages::FRAGMENT, false),
                    uniform_layout_entry(2, wgpu::ShaderStages::FRAGMENT, false),
                ],
            },
        ));
    }

    fn prepare_render(&mut self, scene: &Scene) {
        // The first fog component wins; the editor only ever places one.
        for component in &scene.components {
            if let SceneComponent::Fog(fog) = component {
                self.fog = Some(fog.clone());
                break;
            }
        }
    }

    fn render(&mut self, frame: &mut FrameContext<'_>, viewport: &Viewport) {
        let Some(fog) = &self.fog else {
            return;
        };
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

        let uniforms = FogUniforms {
            color: fog.color.extend(fog.max_opacity),
            params: glam::Vec4::new(fog.density, fog.start, fog.end, fog.height_falloff),
            eye: viewport.eye.extend(0.0),
            inv_view_proj: viewport.view_proj().inverse(),
        };
        frame.buffers.update(frame.queue, FOG_BUFFER, &uniforms);

        let (Some(fog_buffer), Some(screen_buffer)) = (
            frame.buffers.get(FOG_BUFFER),
            frame.buffers.get(SCREEN_BUFFER),
        ) else {
            return;
        };

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Fog BindGroup"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(frame.depth_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: fog_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: screen_buffer.as_entire_binding(),
                },
            ],
        });

        let vs_module = frame.modules.get_or_create(device, &vertex).clone();
        let ps_module = frame.modules.get_or_create(device, &pixel).clone();

        let key = PipelineKey {
            pass: "fog",
            vertex_hash: vertex.source_hash(),
            pixel_hash: pixel.source_hash(),
            aux: fx_hash_key(&color_format),
        };
        let pipeline = frame
            .pipelines
            .get_or_create(&key, || {
                let pipeline_layout =
                    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                        label: Some("Fog Pipeline Layout"),
                        bind_group_layouts: &[Some(layout)],
                        immediate_size: 0,
                    });
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("Fog Pipeline"),
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
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    multiview_mask: None,
                    cache: None,
                })
            })
            .clone();

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Fog Pass"),
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

    fn clear_render_arr(&mut self) {
        self.fog = None;
    }
}
