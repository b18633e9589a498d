//! Static Mesh Pass
//!
//! Draws every static-mesh component with the lighting-model variant selected
//! by the active viewport. The variant is resolved by registry key on every
//! frame, so a hot-swapped program is picked up without the pass holding any
//! shader handle; a viewport whose variant never compiled falls back to
//! Unlit.

use super::{
    FrameContext, PassInit, RenderPass, apply_viewport, single_uniform_bind_group,
    uniform_layout_entry,
};
use crate::renderer::buffers::DynamicUniformBuffer;
use crate::renderer::pipeline::{
    LightingModel, PIXEL_ENTRY, PipelineKey, STATIC_MESH_VERTEX_KEY, VERTEX_ENTRY, VertexLayout,
    fx_hash_key,
};
use crate::renderer::viewport::Viewport;
use crate::renderer::{CAMERA_BUFFER, LIGHTING_BUFFER};
use crate::resources::uniforms::ObjectUniforms;
use crate::scene::{Scene, SceneComponent, StaticMeshComponent};

struct StaticMeshDraw {
    component: StaticMeshComponent,
    selected: bool,
}

struct GpuState {
    camera_layout: wgpu::BindGroupLayout,
    object_layout: wgpu::BindGroupLayout,
    lighting_layout: wgpu::BindGroupLayout,
    camera_bind_group: wgpu::BindGroup,
    lighting_bind_group: wgpu::BindGroup,
}

pub struct StaticMeshRenderPass {
    render_arr: Vec<StaticMeshDraw>,
    object_buffer: DynamicUniformBuffer,
    object_bind_group: Option<wgpu::BindGroup>,
    gpu: Option<GpuState>,
}

impl StaticMeshRenderPass {
    #[must_use]
    pub fn new() -> Self {
        Self {
            render_arr: Vec::new(),
            object_buffer: DynamicUniformBuffer::new("Static Mesh Objects"),
            object_bind_group: None,
            gpu: None,
        }
    }
}

impl Default for StaticMeshRenderPass {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPass for StaticMeshRenderPass {
    fn name(&self) -> &'static str {
        "Static Mesh Pass"
    }

    fn initialize(&mut self, init: &mut PassInit<'_>) {
        // The registry logs and skips individual variant failures; whatever
        // compiled is available for lookup.
        init.shaders.register_builtin_variants();
        init.shaders
            .register_input_layout(STATIC_MESH_VERTEX_KEY, VertexLayout::static_mesh());

        let device = init.device;
        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Static Mesh Camera Layout"),
            entries: &[uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                false,
            )],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Static Mesh Object Layout"),
            entries: &[uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                true,
            )],
        });
        let lighting_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Static Mesh Lighting Layout"),
            entries: &[uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                false,
            )],
        });

        let (Some(camera_buffer), Some(lighting_buffer)) =
            (init.buffers.get(CAMERA_BUFFER), init.buffers.get(LIGHTING_BUFFER))
        else {
            log::error!("Constant buffers missing, static mesh pass disabled");
            return;
        };

        let camera_bind_group = single_uniform_bind_group(
            device,
            "Static Mesh Camera BindGroup",
            &camera_layout,
            camera_buffer,
        );
        let lighting_bind_group = single_uniform_bind_group(
            device,
            "Static Mesh Lighting BindGroup",
            &lighting_layout,
            lighting_buffer,
        );

        self.gpu = Some(GpuState {
            camera_layout,
            object_layout,
            lighting_layout,
            camera_bind_group,
            lighting_bind_group,
        });
    }

    fn prepare_render(&mut self, scene: &Scene) {
        for (index, component) in scene.components.iter().enumerate() {
            if let SceneComponent::StaticMesh(mesh) = component {
                self.render_arr.push(StaticMeshDraw {
                    component: mesh.clone(),
                    selected: scene.selected == Some(index),
                });
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

        let model = viewport.view_mode.lighting_model();
        let Some(handles) = frame
            .shaders
            .pipeline_for(model)
            .or_else(|| frame.shaders.pipeline_for(LightingModel::Unlit))
        else {
            log::warn!("No usable static-mesh shader variant, skipping pass");
            return;
        };
        let Some(input_layout) = frame.shaders.input_layout_by_key(STATIC_MESH_VERTEX_KEY) else {
            log::warn!("Static mesh input layout missing, skipping pass");
            return;
        };
        let input_layout = input_layout.clone();

        let device = frame.device;
        let color_format = frame.color_format;
        let depth_format = frame.depth_format;

        // Per-object constants, one 256-byte slot each.
        if self.object_buffer.ensure(device, self.render_arr.len() as u32)
            || self.object_bind_group.is_none()
        {
            self.object_bind_group =
                self.object_buffer
                    .binding::<ObjectUniforms>()
                    .map(|resource| {
                        device.create_bind_group(&wgpu::BindGroupDescriptor {
                            label: Some("Static Mesh Object BindGroup"),
                            layout: &gpu.object_layout,
                            entries: &[wgpu::BindGroupEntry {
                                binding: 0,
                                resource,
                            }],
                        })
                    });
        }
        let Some(object_bind_group) = self.object_bind_group.clone() else {
            return;
        };

        for (slot, draw) in self.render_arr.iter().enumerate() {
            let uniforms = ObjectUniforms {
                model: draw.component.transform,
                diffuse: draw.component.diffuse,
                specular: draw.component.specular,
                flags: [u32::from(draw.selected), 0, 0, 0],
            };
            self.object_buffer.write(frame.queue, slot as u32, &uniforms);
        }

        let vs_module = frame.modules.get_or_create(device, &handles.vertex).clone();
        let ps_module = frame.modules.get_or_create(device, &handles.pixel).clone();

        let key = PipelineKey {
            pass: "static_mesh",
            vertex_hash: handles.vertex.source_hash(),
            pixel_hash: handles.pixel.source_hash(),
            aux: fx_hash_key(&(color_format, depth_format)),
        };
        let pipeline = frame
            .pipelines
            .get_or_create(&key, || {
                let pipeline_layout =
                    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                        label: Some("Static Mesh Pipeline Layout"),
                        bind_group_layouts: &[
                            Some(&gpu.camera_layout),
                            Some(&gpu.object_layout),
                            Some(&gpu.lighting_layout),
                        ],
                        immediate_size: 0,
                    });
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("Static Mesh Pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &vs_module,
                        entry_point: Some(VERTEX_ENTRY),
                        buffers: &[input_layout.as_wgpu()],
                        compilation_options: Default::default(),
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &ps_module,
                        entry_point: Some(PIXEL_ENTRY),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: color_format,
                            blend: Some(wgpu::BlendState::REPLACE),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: Default::default(),
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: Some(wgpu::Face::Back),
                        ..Default::default()
                    },
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: depth_format,
                        depth_write_enabled: Some(true),
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
        let lighting_bind_group = gpu.lighting_bind_group.clone();

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Static Mesh Pass"),
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
        rpass.set_bind_group(2, &lighting_bind_group, &[]);

        for (slot, draw) in self.render_arr.iter().enumerate() {
            rpass.set_bind_group(
                1,
                &object_bind_group,
                &[DynamicUniformBuffer::offset(slot as u32)],
            );
            rpass.set_vertex_buffer(0, draw.component.mesh.vertex_buffer.slice(..));
            rpass.set_index_buffer(
                draw.component.mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            rpass.draw_indexed(0..draw.component.mesh.index_count, 0, 0..1);
        }
    }

    fn clear_render_arr(&mut self) {
        self.render_arr.clear();
    }
}
